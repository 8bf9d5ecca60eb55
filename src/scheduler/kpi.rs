//! Fleet performance indicators.
//!
//! A read-only summary of the current fleet, in the spirit of a
//! departure-board status line.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | On-Time Rate | Non-cancelled trains not marked late |
//! | Total Delay | Sum of `late_by` over late trains |
//! | Platform Occupancy | Held platforms / platforms, per station |
//! | Avg Progress | Mean progress of active trains |

use std::collections::HashMap;

use crate::models::{Topology, Train, TrainStatus};

/// Fleet performance indicators.
#[derive(Debug, Clone)]
pub struct FleetKpi {
    /// Number of trains.
    pub total: usize,
    /// Trains per status.
    pub by_status: HashMap<TrainStatus, usize>,
    /// Fraction of non-cancelled trains not late (1.0 when none).
    pub on_time_rate: f64,
    /// Sum of reported delays of late trains (minutes).
    pub total_delay_minutes: u64,
    /// Largest reported delay of a late train (minutes).
    pub max_delay_minutes: u32,
    /// Held platforms / platform count per station with platforms.
    pub platform_occupancy: HashMap<String, f64>,
    /// Mean progress of active trains (0.0 when none).
    pub avg_active_progress: f64,
}

impl FleetKpi {
    /// Computes indicators for `trains` on `topology`.
    pub fn calculate(trains: &[Train], topology: &Topology) -> Self {
        let mut by_status: HashMap<TrainStatus, usize> = HashMap::new();
        let mut total_delay: u64 = 0;
        let mut max_delay: u32 = 0;
        let mut held: HashMap<&str, usize> = HashMap::new();
        let mut progress_sum = 0.0;
        let mut active = 0usize;

        for t in trains {
            *by_status.entry(t.status).or_insert(0) += 1;

            if t.status == TrainStatus::Late {
                let delay = t.late_by.unwrap_or(0);
                total_delay += u64::from(delay);
                max_delay = max_delay.max(delay);
            }

            if t.status.is_active() {
                active += 1;
                progress_sum += t.progress;
                if let Some(p) = &t.platform {
                    *held.entry(p.station_id.as_str()).or_insert(0) += 1;
                }
            }
        }

        let count = |s: TrainStatus| by_status.get(&s).copied().unwrap_or(0);
        let running = trains.len() - count(TrainStatus::Cancelled);
        let on_time_rate = if running == 0 {
            1.0
        } else {
            (running - count(TrainStatus::Late)) as f64 / running as f64
        };

        let platform_occupancy = topology
            .stations()
            .iter()
            .filter(|s| s.platforms > 0)
            .map(|s| {
                let n = held.get(s.id.as_str()).copied().unwrap_or(0);
                (s.id.clone(), n as f64 / f64::from(s.platforms))
            })
            .collect();

        Self {
            total: trains.len(),
            by_status,
            on_time_rate,
            total_delay_minutes: total_delay,
            max_delay_minutes: max_delay,
            platform_occupancy,
            avg_active_progress: if active == 0 {
                0.0
            } else {
                progress_sum / active as f64
            },
        }
    }

    /// Trains in `status`.
    pub fn count(&self, status: TrainStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlatformKey;
    use crate::seed;

    fn train(id: &str, status: TrainStatus) -> Train {
        let mut t = Train::new(id, "09:00".parse().unwrap());
        t.status = status;
        t
    }

    #[test]
    fn test_kpi_counts_and_delay() {
        let topo = seed::default_topology().unwrap();
        let mut late = train("L", TrainStatus::Late);
        late.late_by = Some(10);
        let mut later = train("L2", TrainStatus::Late);
        later.late_by = Some(25);
        let trains = vec![
            train("A", TrainStatus::Scheduled),
            train("C", TrainStatus::Cancelled),
            late,
            later,
        ];

        let kpi = FleetKpi::calculate(&trains, &topo);
        assert_eq!(kpi.total, 4);
        assert_eq!(kpi.count(TrainStatus::Late), 2);
        assert_eq!(kpi.count(TrainStatus::Moving), 0);
        assert_eq!(kpi.total_delay_minutes, 35);
        assert_eq!(kpi.max_delay_minutes, 25);
        // 3 running, 2 late.
        assert!((kpi.on_time_rate - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_platform_occupancy() {
        let topo = seed::default_topology().unwrap();
        let mut a = train("A", TrainStatus::Assigned);
        a.platform = Some(PlatformKey::new("westj", 1));
        a.progress = 0.2;
        let mut b = train("B", TrainStatus::Moving);
        b.platform = Some(PlatformKey::new("westj", 2));
        b.progress = 0.4;
        let mut gone = train("G", TrainStatus::Arrived);
        gone.platform = Some(PlatformKey::new("westj", 3));

        let kpi = FleetKpi::calculate(&[a, b, gone], &topo);
        assert!((kpi.platform_occupancy["westj"] - 0.5).abs() < 1e-10);
        assert!((kpi.platform_occupancy["central"] - 0.0).abs() < 1e-10);
        assert!((kpi.avg_active_progress - 0.3).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let topo = seed::default_topology().unwrap();
        let kpi = FleetKpi::calculate(&[], &topo);
        assert_eq!(kpi.total, 0);
        assert!((kpi.on_time_rate - 1.0).abs() < 1e-10);
        assert!((kpi.avg_active_progress - 0.0).abs() < 1e-10);
    }
}
