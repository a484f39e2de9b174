#![doc(test(attr(deny(warnings))))]

//! Zero-based budgeting core: recurrence schedules, occurrence projection,
//! plan and budget validation, and the conversion of a plan into a budget.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;
pub mod validation;

pub use crate::core::BudgetManager;
pub use errors::{BudgetError, Result};
pub use validation::{FieldCode, InvalidField, Validate, ValidationError};

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    if utils::init_tracing() {
        tracing::info!("zbb_core tracing initialized.");
    }
}

/// Like [`init`], but honours the log filter from `config`. Has no effect on
/// the filter once tracing is initialized.
pub fn init_with(config: &config::Config) {
    if utils::init_tracing_with(&config.log_filter) {
        tracing::info!(storage = %config.storage, "zbb_core tracing initialized.");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_init_shares_one_subscriber() {
        super::init();
        super::init_with(&crate::config::Config::default());
        super::init();
        assert!(crate::utils::active_filter().is_some());
    }
}
