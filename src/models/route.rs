//! Route model.

use serde::{Deserialize, Serialize};

use super::Segment;

/// A fixed route: an ordered sequence of at least two stations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Unique route identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Station ids in travel order.
    pub path: Vec<String>,
}

impl Route {
    /// Creates a route over the given stations.
    pub fn new<I, S>(id: impl Into<String>, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: String::new(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the route name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// First station of the path.
    pub fn origin(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    /// Last station of the path.
    pub fn destination(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Directed segments in travel order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.path.windows(2).map(|w| Segment::new(&w[0], &w[1]))
    }

    /// The `index`-th segment, if any.
    pub fn segment(&self, index: usize) -> Option<Segment> {
        let from = self.path.get(index)?;
        let to = self.path.get(index + 1)?;
        Some(Segment::new(from, to))
    }
}
