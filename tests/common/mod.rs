#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use zbb_core::{
    config::{Config, ConfigManager, StorageKind},
    core::FixedClock,
    domain::{NamedAmount, Plan, PlannedBill, PlannedIncome, Schedule},
    BudgetManager,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated home directory that outlives the calling test.
pub fn temp_home() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (BudgetManager, ConfigManager) {
    let base = temp_home();
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    let config = Config {
        storage: StorageKind::Json,
        ..config_manager.load().expect("load default config")
    };
    let manager = BudgetManager::from_config(&config)
        .expect("create json-backed manager")
        .with_clock(Box::new(fixed_clock()));
    (manager, config_manager)
}

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2018, 6, 19, 8, 0, 0).unwrap())
}

/// A plan with one paycheck, a fixed rent, a variable utility bill, and groceries.
pub fn sample_plan() -> Plan {
    Plan {
        incomes: vec![PlannedIncome::new(
            "Salary",
            500_000,
            Schedule::HalfMonth(vec![15, 30]),
        )],
        bills: vec![
            PlannedBill::new("Rent", 120_000, Schedule::Month(1))
                .exact(true)
                .automatic(true),
            PlannedBill::new("Electric", 9_000, Schedule::Month(20)),
        ],
        expenses: vec![NamedAmount::new("Groceries", 60_000)],
        savings: vec![NamedAmount::new("Emergency fund", 25_000)],
        ..Plan::default()
    }
}

pub fn fixed_clock_now() -> chrono::DateTime<Utc> {
    use zbb_core::core::Clock;
    fixed_clock().now()
}
