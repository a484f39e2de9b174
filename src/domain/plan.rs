//! The plan for a typical month: expected incomes, bills, expenses, and savings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount::{validate_named_amounts, NamedAmount};
use crate::domain::common::{Identifiable, Timestamped};
use crate::domain::schedule::{Schedule, ScheduleFields};
use crate::validation::{validate_list, ErrorCollector, FieldCode, Validate, ValidationError};

/// How leftover money is split between savings lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsStrategy {
    Shared,
    Prioritized,
}

impl SavingsStrategy {
    pub const ALL: [SavingsStrategy; 2] = [SavingsStrategy::Shared, SavingsStrategy::Prioritized];

    pub fn as_str(self) -> &'static str {
        match self {
            SavingsStrategy::Shared => "shared",
            SavingsStrategy::Prioritized => "prioritized",
        }
    }
}

impl fmt::Display for SavingsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SavingsStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SavingsStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = SavingsStrategy::ALL.iter().map(|s| s.as_str()).collect();
                ValidationError::new(
                    "",
                    FieldCode::BadEnumChoice,
                    format!("You must provide a valid strategy: {}", names.join(", ")),
                )
            })
    }
}

/// An expected income and its payday schedule.
///
/// `every` keeps the wire form so a malformed schedule surfaces from
/// [`Validate::get_validated`] alongside the other field errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedIncome {
    #[serde(flatten)]
    pub item: NamedAmount,
    #[serde(default)]
    pub every: ScheduleFields,
}

impl PlannedIncome {
    pub fn new(name: impl Into<String>, amount_cents: i64, every: Schedule) -> Self {
        Self {
            item: NamedAmount::new(name, amount_cents),
            every: every.into(),
        }
    }
}

impl Validate for PlannedIncome {
    type Clean = PlannedIncome;

    fn get_validated(&self) -> Result<PlannedIncome, ValidationError> {
        let mut errors = ErrorCollector::new();
        let item = errors.check("", self.item.get_validated());
        let every = errors.check("every", self.every.get_validated());
        errors.finish_with(|| PlannedIncome {
            item: item.unwrap_or_default(),
            every: every.map_or_else(|| self.every.clone(), ScheduleFields::from),
        })
    }
}

/// A single expected payment on a schedule. Unlike expenses, a bill is one
/// transaction rather than a fund for many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedBill {
    #[serde(flatten)]
    pub item: NamedAmount,
    #[serde(default)]
    pub every: ScheduleFields,
    #[serde(default)]
    pub is_amount_exact: bool,
    #[serde(default)]
    pub is_paid_automatically: bool,
}

impl PlannedBill {
    pub fn new(name: impl Into<String>, amount_cents: i64, every: Schedule) -> Self {
        Self {
            item: NamedAmount::new(name, amount_cents),
            every: every.into(),
            is_amount_exact: false,
            is_paid_automatically: false,
        }
    }

    pub fn exact(mut self, is_amount_exact: bool) -> Self {
        self.is_amount_exact = is_amount_exact;
        self
    }

    pub fn automatic(mut self, is_paid_automatically: bool) -> Self {
        self.is_paid_automatically = is_paid_automatically;
        self
    }
}

impl Validate for PlannedBill {
    type Clean = PlannedBill;

    fn get_validated(&self) -> Result<PlannedBill, ValidationError> {
        let mut errors = ErrorCollector::new();
        let item = errors.check("", self.item.get_validated());
        let every = errors.check("every", self.every.get_validated());
        errors.finish_with(|| PlannedBill {
            item: item.unwrap_or_default(),
            every: every.map_or_else(|| self.every.clone(), ScheduleFields::from),
            is_amount_exact: self.is_amount_exact,
            is_paid_automatically: self.is_paid_automatically,
        })
    }
}

/// Incomes, bills, expenses, and savings that describe a typical month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub incomes: Vec<PlannedIncome>,
    #[serde(default)]
    pub bills: Vec<PlannedBill>,
    #[serde(default)]
    pub expenses: Vec<NamedAmount>,
    #[serde(default)]
    pub savings: Vec<NamedAmount>,
    #[serde(default)]
    pub savings_strategy: String,
    #[serde(flatten)]
    pub timestamps: Timestamped,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            incomes: Vec::new(),
            bills: Vec::new(),
            expenses: Vec::new(),
            savings: Vec::new(),
            savings_strategy: SavingsStrategy::Shared.to_string(),
            timestamps: Timestamped::default(),
        }
    }
}

impl Plan {
    /// Parsed savings strategy; `None` until the plan has been validated.
    pub fn strategy(&self) -> Option<SavingsStrategy> {
        self.savings_strategy.parse().ok()
    }

    /// Bills whose amount varies and must be supplied when converting.
    pub fn inexact_bills(&self) -> impl Iterator<Item = &PlannedBill> {
        self.bills.iter().filter(|bill| !bill.is_amount_exact)
    }

    /// Copies the user-editable fields of `input`, keeping identity and timestamps.
    pub fn replace_contents(&mut self, input: Plan) {
        self.incomes = input.incomes;
        self.bills = input.bills;
        self.expenses = input.expenses;
        self.savings = input.savings;
        self.savings_strategy = input.savings_strategy;
    }
}

impl Identifiable for Plan {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Plan {
    type Clean = Plan;

    fn get_validated(&self) -> Result<Plan, ValidationError> {
        let mut errors = ErrorCollector::new();
        let incomes = errors.check("incomes", validate_list(&self.incomes));
        let bills = errors.check("bills", validate_list(&self.bills));
        let expenses = errors.check("expenses", validate_named_amounts(&self.expenses));
        let savings = errors.check("savings", validate_named_amounts(&self.savings));
        let strategy = errors.check("savingsStrategy", self.savings_strategy.parse::<SavingsStrategy>());

        errors.finish_with(|| Plan {
            id: self.id,
            incomes: incomes.unwrap_or_default(),
            bills: bills.unwrap_or_default(),
            expenses: expenses.unwrap_or_default(),
            savings: savings.unwrap_or_default(),
            savings_strategy: strategy.unwrap_or(SavingsStrategy::Shared).to_string(),
            timestamps: self.timestamps,
        })
    }
}
