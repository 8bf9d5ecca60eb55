//! Network topology and route geometry.
//!
//! The topology is the static part of the simulation: stations, routes,
//! and the geometry derived from station display coordinates. Progress
//! along a route is a fraction of its total drawn length, so mapping a
//! progress value to a position (or to the segment a train is about to
//! enter) is a cumulative-distance lookup.
//!
//! # Segment location
//! With `d = clamp(progress, 0, 1) * total_length` and cumulative ends
//! `c[i+1]`, the segment index is found by a linear scan:
//! - for positions, advance while `d > c[i+1]` (a point on a boundary
//!   belongs to the segment ending there);
//! - for the next segment, advance while `d >= c[i+1]` (a train standing
//!   on a boundary is about to enter the following segment).

use std::collections::{HashMap, HashSet};

use super::{Point, Route, Segment, Station};
use crate::error::{EngineError, Result};
use crate::validation;

/// Derived geometry of one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// Station coordinates in path order.
    pub coords: Vec<Point>,
    /// Length of each segment.
    pub segment_lengths: Vec<f64>,
    /// Cumulative distance at each station (`cumulative[0] == 0`).
    pub cumulative: Vec<f64>,
    /// Sum of segment lengths.
    pub total_length: f64,
}

impl RouteGeometry {
    fn build(coords: Vec<Point>) -> Self {
        let segment_lengths: Vec<f64> = coords
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .collect();
        let mut cumulative = Vec::with_capacity(coords.len().max(1));
        cumulative.push(0.0);
        let mut acc = 0.0;
        for len in &segment_lengths {
            acc += len;
            cumulative.push(acc);
        }
        Self {
            coords,
            segment_lengths,
            total_length: acc,
            cumulative,
        }
    }

    fn distance_at(&self, progress: f64) -> f64 {
        progress.clamp(0.0, 1.0) * self.total_length
    }

    fn locate(&self, distance: f64, boundary_advances: bool) -> usize {
        let mut idx = 0;
        while idx < self.segment_lengths.len() {
            let end = self.cumulative[idx + 1];
            let past = if boundary_advances {
                distance >= end
            } else {
                distance > end
            };
            if !past {
                break;
            }
            idx += 1;
        }
        idx
    }

    /// Position at `progress` along the route.
    pub fn point_at(&self, progress: f64) -> Point {
        let Some(&first) = self.coords.first() else {
            return Point::default();
        };
        if self.coords.len() < 2 || self.total_length <= 0.0 {
            return first;
        }
        let distance = self.distance_at(progress);
        let idx = self.locate(distance, false);
        let start = self.coords[idx.min(self.coords.len() - 1)];
        let end = self.coords.get(idx + 1).copied().unwrap_or(start);
        let seg_len = self.segment_lengths.get(idx).copied().unwrap_or(0.0);
        let t = if seg_len == 0.0 {
            0.0
        } else {
            (distance - self.cumulative[idx]) / seg_len
        };
        start.lerp(&end, t)
    }

    /// Index of the segment a train at `progress` is about to traverse.
    pub fn next_segment_index(&self, progress: f64) -> Option<usize> {
        if progress >= 1.0 {
            return None;
        }
        let idx = self.locate(self.distance_at(progress), true);
        (idx < self.segment_lengths.len()).then_some(idx)
    }
}

/// Stations, routes and per-route geometry. Immutable after load.
#[derive(Debug, Clone)]
pub struct Topology {
    stations: Vec<Station>,
    routes: Vec<Route>,
    station_index: HashMap<String, usize>,
    route_index: HashMap<String, usize>,
    geometry: HashMap<String, RouteGeometry>,
}

impl Topology {
    /// Builds a topology after structural validation.
    ///
    /// Fails with [`EngineError::Validation`] on duplicate ids, routes
    /// shorter than two stations, or routes naming unknown stations.
    pub fn new(stations: Vec<Station>, routes: Vec<Route>) -> Result<Self> {
        validation::validate_topology(&stations, &routes)?;

        let station_index: HashMap<String, usize> = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let route_index = routes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let geometry = routes
            .iter()
            .map(|r| {
                let coords = r
                    .path
                    .iter()
                    .filter_map(|id| station_index.get(id).map(|&i| stations[i].position))
                    .collect();
                (r.id.clone(), RouteGeometry::build(coords))
            })
            .collect();

        Ok(Self {
            stations,
            routes,
            station_index,
            route_index,
            geometry,
        })
    }

    /// All stations in load order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// All routes in load order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Looks up a station.
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.station_index.get(id).map(|&i| &self.stations[i])
    }

    /// Looks up a route.
    pub fn route(&self, id: &str) -> Option<&Route> {
        self.route_index.get(id).map(|&i| &self.routes[i])
    }

    /// Resolves a route or fails with `NotFound`.
    pub fn resolve_route(&self, id: &str) -> Result<&Route> {
        self.route(id)
            .ok_or_else(|| EngineError::not_found("route", id))
    }

    /// Resolves a station or fails with `NotFound`.
    pub fn resolve_station(&self, id: &str) -> Result<&Station> {
        self.station(id)
            .ok_or_else(|| EngineError::not_found("station", id))
    }

    /// Geometry of a route.
    pub fn geometry(&self, route_id: &str) -> Option<&RouteGeometry> {
        self.geometry.get(route_id)
    }

    /// Display position of a train at `progress` along `route_id`.
    pub fn point_at_progress(&self, route_id: &str, progress: f64) -> Result<Point> {
        self.geometry(route_id)
            .map(|g| g.point_at(progress))
            .ok_or_else(|| EngineError::not_found("route", route_id))
    }

    /// Segment a train at `progress` is about to traverse, or `None` once
    /// it has reached the end of the route.
    pub fn next_segment(&self, route_id: &str, progress: f64) -> Result<Option<Segment>> {
        let route = self.resolve_route(route_id)?;
        let Some(geometry) = self.geometry(route_id) else {
            return Err(EngineError::not_found("route geometry", route_id));
        };
        Ok(geometry
            .next_segment_index(progress)
            .and_then(|idx| route.segment(idx)))
    }

    /// Route used when no route is chosen explicitly: the first route
    /// starting at `hub`, otherwise the first route.
    pub fn default_route(&self, hub: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.origin() == Some(hub))
            .or_else(|| self.routes.first())
    }

    /// Every distinct segment of every route, in first-seen order.
    pub fn segments(&self) -> Vec<Segment> {
        let mut seen = HashSet::new();
        self.routes
            .iter()
            .flat_map(Route::segments)
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }

    /// Resolves a persisted `from_to` key, preferring known segments.
    pub fn segment_for_key(&self, key: &str) -> Option<Segment> {
        self.routes
            .iter()
            .flat_map(Route::segments)
            .find(|s| s.key() == key)
            .or_else(|| Segment::parse_key(key))
    }
}
