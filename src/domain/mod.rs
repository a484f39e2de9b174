pub mod amount;
pub mod budget;
pub mod category;
pub mod common;
pub mod conversion;
pub mod date;
pub mod plan;
pub mod schedule;

pub use amount::{Amount, CategoryAmount, NamedAmount};
pub use budget::{Budget, ChecklistItem};
pub use category::Category;
pub use common::{Identifiable, NamedEntity, SafeUuid, Timestamped};
pub use conversion::Conversion;
pub use date::Date;
pub use plan::{Plan, PlannedBill, PlannedIncome, SavingsStrategy};
pub use schedule::{DayOfWeek, Schedule, ScheduleFields};
