//! Input validation for topologies and fleets.
//!
//! Checks structural integrity before a topology is built or a fleet is
//! loaded into the engine. Detects:
//! - Duplicate IDs
//! - Routes shorter than two stations or naming unknown stations
//! - Trains referencing unknown routes, stations, or platforms
//! - Progress outside [0, 1]
//! - Two active trains holding the same platform
//!
//! All problems are collected; validation does not stop at the first.

use crate::models::{Route, Station, Topology, Train};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A route has fewer than two stations.
    ShortRoute,
    /// A route or platform references a station that doesn't exist.
    InvalidStationReference,
    /// A train references a route that doesn't exist.
    InvalidRouteReference,
    /// A platform number is outside the station's platform range.
    InvalidPlatform,
    /// Progress is not a number in [0, 1].
    InvalidProgress,
    /// Two active trains hold the same platform.
    PlatformConflict,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates stations and routes.
///
/// Checks:
/// 1. No duplicate station IDs
/// 2. No duplicate route IDs
/// 3. Every route has at least two stations
/// 4. Every route station exists
pub fn validate_topology(stations: &[Station], routes: &[Route]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut station_ids = HashSet::new();
    for s in stations {
        if !station_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate station ID: {}", s.id),
            ));
        }
    }

    let mut route_ids = HashSet::new();
    for r in routes {
        if !route_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate route ID: {}", r.id),
            ));
        }
        if r.path.len() < 2 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ShortRoute,
                format!("Route '{}' needs at least two stations", r.id),
            ));
        }
        for station in &r.path {
            if !station_ids.contains(station.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidStationReference,
                    format!("Route '{}' references unknown station '{}'", r.id, station),
                ));
            }
        }
    }

    finish(errors)
}

/// Validates a fleet against a topology.
///
/// Checks:
/// 1. No duplicate train IDs
/// 2. Route references point to existing routes
/// 3. Platform keys point to existing stations and platform numbers
/// 4. Progress is finite and within [0, 1]
/// 5. No platform is held by two active trains
pub fn validate_fleet(trains: &[Train], topology: &Topology) -> ValidationResult {
    let mut errors = Vec::new();

    let mut train_ids = HashSet::new();
    for t in trains {
        if !train_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate train ID: {}", t.id),
            ));
        }
    }

    for t in trains {
        if let Some(route_id) = &t.route_id {
            if topology.route(route_id).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidRouteReference,
                    format!("Train '{}' references unknown route '{}'", t.id, route_id),
                ));
            }
        }

        if let Some(platform) = &t.platform {
            match topology.station(&platform.station_id) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidStationReference,
                    format!(
                        "Train '{}' references platform at unknown station '{}'",
                        t.id, platform.station_id
                    ),
                )),
                Some(station) if !station.has_platform(platform.number) => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidPlatform,
                        format!(
                            "Train '{}' references platform {} but '{}' has {} platforms",
                            t.id, platform, station.id, station.platforms
                        ),
                    ))
                }
                Some(_) => {}
            }
        }

        if !t.progress.is_finite() || !(0.0..=1.0).contains(&t.progress) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidProgress,
                format!("Train '{}' has progress {} outside [0, 1]", t.id, t.progress),
            ));
        }
    }

    let mut holders: HashMap<String, &str> = HashMap::new();
    for t in trains.iter().filter(|t| t.status.is_active()) {
        if let Some(platform) = &t.platform {
            let key = platform.to_string();
            if let Some(first) = holders.get(&key) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PlatformConflict,
                    format!(
                        "Platform {} held by both '{}' and '{}'",
                        key, first, t.id
                    ),
                ));
            } else {
                holders.insert(key, &t.id);
            }
        }
    }

    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlatformKey, TrainStatus};
    use crate::seed;

    fn train(id: &str) -> Train {
        Train::new(id, "09:00".parse().unwrap())
    }

    fn active_on(id: &str, platform: &str) -> Train {
        let mut t = train(id);
        t.status = TrainStatus::Assigned;
        t.route_id = Some("r1".into());
        t.platform = Some(platform.parse().unwrap());
        t
    }

    #[test]
    fn test_valid_defaults() {
        assert!(validate_topology(&seed::default_stations(), &seed::default_routes()).is_ok());
        let topo = seed::default_topology().unwrap();
        assert!(validate_fleet(&seed::default_trains(), &topo).is_ok());
    }

    #[test]
    fn test_duplicate_station_id() {
        let stations = vec![Station::new("a"), Station::new("a")];
        let errors = validate_topology(&stations, &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("station")));
    }

    #[test]
    fn test_short_route() {
        let stations = vec![Station::new("a")];
        let routes = vec![Route::new("r", ["a"])];
        let errors = validate_topology(&stations, &routes).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::ShortRoute));
    }

    #[test]
    fn test_route_unknown_station() {
        let stations = vec![Station::new("a")];
        let routes = vec![Route::new("r", ["a", "b"])];
        let errors = validate_topology(&stations, &routes).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidStationReference));
    }

    #[test]
    fn test_duplicate_train_id() {
        let topo = seed::default_topology().unwrap();
        let errors = validate_fleet(&[train("T1"), train("T1")], &topo).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_unknown_route_reference() {
        let topo = seed::default_topology().unwrap();
        let mut t = train("T1");
        t.route_id = Some("r99".into());
        let errors = validate_fleet(&[t], &topo).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidRouteReference));
    }

    #[test]
    fn test_platform_out_of_range() {
        let topo = seed::default_topology().unwrap();
        let mut t = train("T1");
        t.platform = Some(PlatformKey::new("westj", 5));
        let errors = validate_fleet(&[t], &topo).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidPlatform));
    }

    #[test]
    fn test_platform_unknown_station() {
        let topo = seed::default_topology().unwrap();
        let mut t = train("T1");
        t.platform = Some(PlatformKey::new("nowhere", 1));
        let errors = validate_fleet(&[t], &topo).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidStationReference));
    }

    #[test]
    fn test_progress_out_of_range() {
        let topo = seed::default_topology().unwrap();
        let mut t = train("T1");
        t.progress = 1.5;
        let errors = validate_fleet(&[t], &topo).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidProgress));
    }

    #[test]
    fn test_platform_conflict() {
        let topo = seed::default_topology().unwrap();
        let trains = vec![active_on("T1", "central:1"), active_on("T2", "central:1")];
        let errors = validate_fleet(&trains, &topo).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::PlatformConflict));
    }

    #[test]
    fn test_inactive_trains_share_platform() {
        // A cancelled train keeps its platform field but does not hold it.
        let topo = seed::default_topology().unwrap();
        let mut cancelled = active_on("T1", "central:1");
        cancelled.status = TrainStatus::Cancelled;
        let trains = vec![cancelled, active_on("T2", "central:1")];
        assert!(validate_fleet(&trains, &topo).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let topo = seed::default_topology().unwrap();
        let mut t = train("T1");
        t.route_id = Some("missing".into());
        t.progress = -0.5;
        let errors = validate_fleet(&[t.clone(), t], &topo).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
