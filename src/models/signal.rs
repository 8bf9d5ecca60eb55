//! Signal table.
//!
//! One two-aspect signal protects the entry to each directed track
//! segment. Aspects change only on explicit operator command; there is
//! no timed reversion.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A directed pair of adjacent stations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub from: String,
    pub to: String,
}

impl Segment {
    /// Creates a segment.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Persisted key, `from_to`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.from, self.to)
    }

    /// Splits a `from_to` key at the first underscore.
    ///
    /// Station ids containing `_` are ambiguous here; prefer
    /// [`Topology::segment_for_key`](super::Topology::segment_for_key),
    /// which matches against known segments first.
    pub fn parse_key(key: &str) -> Option<Self> {
        let (from, to) = key.split_once('_')?;
        if from.is_empty() || to.is_empty() {
            return None;
        }
        Some(Self::new(from, to))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.from, self.to)
    }
}

/// Signal aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAspect {
    #[default]
    Green,
    Red,
}

impl SignalAspect {
    /// The other aspect.
    pub fn flipped(self) -> Self {
        match self {
            Self::Green => Self::Red,
            Self::Red => Self::Green,
        }
    }
}

/// Aspect per segment. Segments never seen read as green.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalTable {
    aspects: HashMap<Segment, SignalAspect>,
}

impl SignalTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with every given segment green.
    pub fn all_green<I: IntoIterator<Item = Segment>>(segments: I) -> Self {
        Self {
            aspects: segments
                .into_iter()
                .map(|s| (s, SignalAspect::Green))
                .collect(),
        }
    }

    /// Current aspect; unknown segments are green.
    pub fn state_of(&self, segment: &Segment) -> SignalAspect {
        self.aspects.get(segment).copied().unwrap_or_default()
    }

    /// Whether entry into `segment` is forbidden.
    #[inline]
    pub fn is_red(&self, segment: &Segment) -> bool {
        self.state_of(segment) == SignalAspect::Red
    }

    /// Flips a known segment. A segment not yet in the table is
    /// installed as green.
    pub fn toggle(&mut self, segment: Segment) -> SignalAspect {
        let aspect = match self.aspects.get(&segment) {
            Some(current) => current.flipped(),
            None => SignalAspect::Green,
        };
        self.aspects.insert(segment, aspect);
        aspect
    }

    /// Sets an aspect directly.
    pub fn set(&mut self, segment: Segment, aspect: SignalAspect) {
        self.aspects.insert(segment, aspect);
    }

    /// Number of segments in the table.
    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// All entries sorted by segment.
    pub fn entries(&self) -> Vec<(Segment, SignalAspect)> {
        let mut entries: Vec<_> = self
            .aspects
            .iter()
            .map(|(s, a)| (s.clone(), *a))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Persisted form keyed by `from_to`.
    pub fn to_keyed(&self) -> BTreeMap<String, SignalAspect> {
        self.aspects.iter().map(|(s, a)| (s.key(), *a)).collect()
    }
}
