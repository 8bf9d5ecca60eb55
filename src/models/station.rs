//! Station and platform model.
//!
//! Stations are the fixed nodes of the network. Each has a number of
//! platforms (berths) addressed by a [`PlatformKey`] of the form
//! `stationId:platformNumber`, numbered from 1.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// A display coordinate. Used only for visual placement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other` by `t` (0.0 = self, 1.0 = other).
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// A station in the network. Immutable after topology load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Unique station identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Number of platforms (0 = through station without berths).
    pub platforms: u32,
    /// Display coordinate.
    pub position: Point,
}

impl Station {
    /// Creates a station with no platforms at the origin.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            platforms: 0,
            position: Point::default(),
        }
    }

    /// Sets the station name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the platform count.
    pub fn with_platforms(mut self, platforms: u32) -> Self {
        self.platforms = platforms;
        self
    }

    /// Sets the display coordinate.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Whether `number` addresses an existing platform here.
    pub fn has_platform(&self, number: u32) -> bool {
        number >= 1 && number <= self.platforms
    }

    /// Platform keys of this station in ascending platform order.
    pub fn platform_keys(&self) -> impl Iterator<Item = PlatformKey> + '_ {
        (1..=self.platforms).map(move |n| PlatformKey::new(self.id.clone(), n))
    }
}

/// Identifier of one platform: `stationId:platformNumber`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformKey {
    pub station_id: String,
    pub number: u32,
}

impl PlatformKey {
    /// Creates a platform key.
    pub fn new(station_id: impl Into<String>, number: u32) -> Self {
        Self {
            station_id: station_id.into(),
            number,
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.station_id, self.number)
    }
}

impl FromStr for PlatformKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("malformed platform key '{s}'"));
        let (station, number) = s.rsplit_once(':').ok_or_else(invalid)?;
        if station.is_empty() {
            return Err(invalid());
        }
        let number: u32 = number.trim().parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }
        Ok(Self::new(station, number))
    }
}

impl TryFrom<String> for PlatformKey {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlatformKey> for String {
    fn from(key: PlatformKey) -> Self {
        key.to_string()
    }
}
