#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, TimeZone, Utc};
use dashboard_core::{
    config::ConfigManager,
    domain::{
        Event, PlanType, Subscription, SubscriptionStatus, Task, TaskPriority, Transaction,
        TransactionKind,
    },
    snapshot::Snapshot,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated base directory and a config manager rooted in it.
pub fn setup_test_env() -> (PathBuf, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, config_manager)
}

pub fn write_snapshot(base: &Path, name: &str, snapshot: &Snapshot) -> PathBuf {
    let path = base.join(name);
    snapshot.save(&path).expect("write snapshot");
    path
}

pub fn february_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 12, 12, 0, 0).unwrap()
}

/// One user's February 2025: salary, groceries, rent, a few events and tasks.
pub fn february_snapshot(subscription: Option<Subscription>) -> Snapshot {
    let user = Uuid::new_v4();
    Snapshot {
        subscription,
        transactions: vec![
            Transaction::new(
                user,
                "Salaire",
                2100.0,
                TransactionKind::Income,
                "Salaire",
                "2025-02-05",
            ),
            Transaction::new(
                user,
                "Courses",
                65.4,
                TransactionKind::Expense,
                "Alimentation",
                "2025-02-08",
            ),
            Transaction::new(
                user,
                "Loyer",
                800.0,
                TransactionKind::Expense,
                "Logement",
                "2025-02-10",
            ),
            Transaction::new(
                user,
                "Courses janvier",
                40.0,
                TransactionKind::Expense,
                "Alimentation",
                "2025-01-20",
            ),
        ],
        events: vec![
            Event::new(
                user,
                "Dentiste",
                "2025-02-13T10:00:00Z",
                "2025-02-13T11:00:00Z",
            ),
            Event::new(
                user,
                "Réunion",
                "2025-02-11T14:00:00Z",
                "2025-02-11T15:00:00Z",
            ),
        ],
        tasks: vec![
            Task::new(user, "Déclarer impôts", TaskPriority::High).due("2025-02-14"),
            Task::new(user, "Ranger garage", TaskPriority::Low).due("2025-03-20"),
        ],
    }
}

pub fn beta_subscription(beta_end: DateTime<Utc>) -> Subscription {
    Subscription::new(
        Uuid::new_v4(),
        PlanType::Free,
        SubscriptionStatus::Beta,
        Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
    )
    .with_beta_end(beta_end)
}

pub fn free_snapshot_with_events(count: usize) -> Snapshot {
    let user = Uuid::new_v4();
    Snapshot {
        events: (0..count)
            .map(|idx| {
                Event::new(
                    user,
                    format!("Événement {idx}"),
                    "2025-02-13T10:00:00Z",
                    "2025-02-13T11:00:00Z",
                )
            })
            .collect(),
        ..Snapshot::default()
    }
}
