//! Persisted engine state and flat train records.
//!
//! A [`Snapshot`] is the full state handed to a persistence collaborator:
//! every train (including progress) plus the signal table keyed `from_to`.
//! A [`TrainRecord`] is the flat, string-typed row used by tabular
//! import/export: `id, name, dep, status, routeId, platform, note, lateBy`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::Result;
use crate::models::{DepartureTime, PlatformKey, SignalAspect, Train, TrainStatus};

/// Full engine state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Clock position.
    #[serde(default)]
    pub tick: u64,
    /// Trains in registry order.
    pub trains: Vec<Train>,
    /// Signal aspects keyed `from_to`.
    #[serde(default)]
    pub signals: BTreeMap<String, SignalAspect>,
}

impl Snapshot {
    /// Serializes to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses JSON produced by [`Snapshot::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Looks up a train.
    pub fn train(&self, id: &str) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }
}

/// Flat train row for tabular import/export.
///
/// On import, empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainRecord {
    pub id: String,
    pub name: String,
    pub dep: String,
    pub status: String,
    pub route_id: Option<String>,
    pub platform: Option<String>,
    pub note: Option<String>,
    pub late_by: Option<u32>,
}

impl From<&Train> for TrainRecord {
    fn from(t: &Train) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            dep: t.dep.to_string(),
            status: t.status.to_string(),
            route_id: t.route_id.clone(),
            platform: t.platform.as_ref().map(ToString::to_string),
            note: t.note.clone(),
            late_by: t.late_by,
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates `T` followed by four base-36 characters, avoiding `taken`.
pub fn generate_train_id<R: Rng + ?Sized>(rng: &mut R, taken: &HashSet<String>) -> String {
    loop {
        let suffix: String = (0..4)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        let id = format!("T{suffix}");
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Converts flat records to trains.
///
/// Missing id → generated, missing name → id, missing dep → `00:00`,
/// missing status → `scheduled`. Progress starts at 0. Fails with
/// `InvalidInput` on malformed departure, status or platform values;
/// references are checked later by fleet validation.
pub fn trains_from_records<R: Rng + ?Sized>(
    records: Vec<TrainRecord>,
    rng: &mut R,
) -> Result<Vec<Train>> {
    let mut taken: HashSet<String> = records
        .iter()
        .filter(|r| !r.id.trim().is_empty())
        .map(|r| r.id.trim().to_string())
        .collect();

    records
        .into_iter()
        .map(|r| -> Result<Train> {
            let id = match present(Some(r.id)) {
                Some(id) => id.trim().to_string(),
                None => {
                    let id = generate_train_id(&mut *rng, &taken);
                    taken.insert(id.clone());
                    id
                }
            };
            let name = present(Some(r.name)).unwrap_or_else(|| id.clone());
            let dep = match present(Some(r.dep)) {
                Some(dep) => dep.parse()?,
                None => DepartureTime::default(),
            };
            let status = match present(Some(r.status)) {
                Some(status) => status.parse()?,
                None => TrainStatus::Scheduled,
            };
            let platform: Option<PlatformKey> =
                present(r.platform).map(|p| p.parse()).transpose()?;

            let mut train = Train::new(id, dep).with_name(name);
            train.status = status;
            train.route_id = present(r.route_id);
            train.platform = platform;
            train.note = present(r.note);
            train.late_by = r.late_by;
            Ok(train)
        })
        .collect()
}
