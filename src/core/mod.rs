pub mod budget_manager;
pub mod services;
pub mod time;
pub mod utils;

pub use budget_manager::BudgetManager;
pub use time::{Clock, FixedClock, SystemClock};
