//! Default network and fleet.
//!
//! Five stations on a line that splits at Midline, four routes (two
//! outbound from Central, two inbound), and five unassigned trains.

use crate::error::Result;
use crate::models::{DepartureTime, Route, Station, Topology, Train};

/// The default five-station network.
pub fn default_stations() -> Vec<Station> {
    vec![
        Station::new("central")
            .with_name("Central (10 platforms)")
            .with_platforms(10)
            .at(80.0, 150.0),
        Station::new("westj")
            .with_name("West Junction (4)")
            .with_platforms(4)
            .at(260.0, 150.0),
        Station::new("mid")
            .with_name("Midline (7)")
            .with_platforms(7)
            .at(460.0, 150.0),
        Station::new("northend")
            .with_name("North End (4)")
            .with_platforms(4)
            .at(760.0, 80.0),
        Station::new("southend")
            .with_name("South End (4)")
            .with_platforms(4)
            .at(760.0, 220.0),
    ]
}

/// The default four routes.
pub fn default_routes() -> Vec<Route> {
    vec![
        Route::new("r1", ["central", "westj", "mid", "northend"])
            .with_name("Central → West → Mid → North End"),
        Route::new("r2", ["central", "westj", "mid", "southend"])
            .with_name("Central → West → Mid → South End"),
        Route::new("r3", ["northend", "mid", "westj", "central"])
            .with_name("North End → Mid → West → Central"),
        Route::new("r4", ["southend", "mid", "westj", "central"])
            .with_name("South End → Mid → West → Central"),
    ]
}

/// The default topology.
pub fn default_topology() -> Result<Topology> {
    Topology::new(default_stations(), default_routes())
}

/// The default fleet: T1..T5, all scheduled.
pub fn default_trains() -> Vec<Train> {
    [
        ("T1", "1001", 9, 0),
        ("T2", "1002", 9, 10),
        ("T3", "1003", 9, 15),
        ("T4", "1004", 9, 20),
        ("T5", "1005", 9, 30),
    ]
    .into_iter()
    .map(|(id, name, h, m)| {
        let dep = DepartureTime::new(h, m).unwrap_or_default();
        Train::new(id, dep).with_name(name)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainStatus;

    #[test]
    fn test_default_topology() {
        let t = default_topology().unwrap();
        assert_eq!(t.stations().len(), 5);
        assert_eq!(t.routes().len(), 4);
        assert_eq!(t.station("central").unwrap().platforms, 10);
        assert_eq!(t.default_route("central").unwrap().id, "r1");
    }

    #[test]
    fn test_default_trains() {
        let trains = default_trains();
        assert_eq!(trains.len(), 5);
        assert!(trains.iter().all(|t| t.status == TrainStatus::Scheduled));
        assert_eq!(trains[1].dep.to_string(), "09:10");
        assert_eq!(trains[4].name, "1005");
    }
}
