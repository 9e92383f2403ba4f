//! In-memory copy of the rows fetched for one user.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use dash_domain::{Event, Subscription, Task, Transaction};

use crate::errors::{DashboardError, Result};

/// Everything the engine needs for one user, as fetched from the backend.
/// Reading it from a JSON file is a diagnostic convenience.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Snapshot {
    /// Loads a snapshot from disk, returning structured errors on failure.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|err| {
            DashboardError::Snapshot(format!("cannot read `{}`: {err}", path.display()))
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Writes the snapshot atomically by staging to a temporary file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp, json)?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_domain::TransactionKind;
    use tempfile::tempdir;
    use uuid::Uuid;

    #[test]
    fn save_then_load_keeps_rows() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        let snapshot = Snapshot {
            transactions: vec![Transaction::new(
                Uuid::new_v4(),
                "Salaire",
                2100.0,
                TransactionKind::Income,
                "Salaire",
                "2025-01-28",
            )],
            ..Snapshot::default()
        };
        snapshot.save(&path).expect("save");
        let loaded = Snapshot::load(&path).expect("load");
        assert_eq!(loaded.transactions, snapshot.transactions);
        assert!(loaded.subscription.is_none());
    }

    #[test]
    fn missing_file_is_a_snapshot_error() {
        let dir = tempdir().expect("tempdir");
        let err = Snapshot::load(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, DashboardError::Snapshot(_)));
    }

    #[test]
    fn empty_object_is_an_empty_snapshot() {
        let snapshot: Snapshot = serde_json::from_str("{}").expect("parse");
        assert!(snapshot.transactions.is_empty());
        assert!(snapshot.events.is_empty());
    }
}
