//! Concrete budgets for a date range.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount::{saturate_cents, total_cents, validate_named_amounts, Amount, NamedAmount};
use crate::domain::common::{Identifiable, Timestamped};
use crate::domain::date::Date;
use crate::validation::{is_blank, validate_list, ErrorCollector, FieldCode, Validate, ValidationError};

/// A to-do attached to a budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
        }
    }
}

impl Validate for ChecklistItem {
    type Clean = ChecklistItem;

    fn get_validated(&self) -> Result<ChecklistItem, ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::new(
                "name",
                FieldCode::Missing,
                "You must provide a name.",
            ));
        }
        Ok(ChecklistItem {
            name: self.name.trim().to_string(),
            completed: self.completed,
        })
    }
}

/// Money expected in and out between two dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub start_date: Date,
    #[serde(default)]
    pub end_date: Date,
    #[serde(default)]
    pub incomes: Vec<NamedAmount>,
    #[serde(default)]
    pub bills: Vec<NamedAmount>,
    #[serde(default)]
    pub expenses: Vec<NamedAmount>,
    #[serde(default)]
    pub savings: Vec<NamedAmount>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Derived on validation; any supplied value is discarded.
    #[serde(default)]
    pub balance: Amount,
    #[serde(flatten)]
    pub timestamps: Timestamped,
}

impl Budget {
    pub fn new(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date,
            end_date,
            ..Budget::default()
        }
    }

    /// Incomes minus expenses, bills, and savings. May be negative; saturates
    /// at the `i64` bounds.
    pub fn compute_balance(&self) -> Amount {
        Amount::new(saturate_cents(
            total_cents(&self.incomes)
                - total_cents(&self.expenses)
                - total_cents(&self.bills)
                - total_cents(&self.savings),
        ))
    }

    pub fn replace_contents(&mut self, input: Budget) {
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.incomes = input.incomes;
        self.bills = input.bills;
        self.expenses = input.expenses;
        self.savings = input.savings;
        self.checklist = input.checklist;
        self.balance = input.balance;
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Budget {
    type Clean = Budget;

    fn get_validated(&self) -> Result<Budget, ValidationError> {
        let mut errors = ErrorCollector::new();
        errors.check("startDate", self.start_date.validate_non_zero());
        errors.check("endDate", self.end_date.validate_non_zero());
        let incomes = errors.check("incomes", validate_named_amounts(&self.incomes));
        let expenses = errors.check("expenses", validate_named_amounts(&self.expenses));
        let bills = errors.check("bills", validate_named_amounts(&self.bills));
        let savings = errors.check("savings", validate_named_amounts(&self.savings));
        let checklist = errors.check("checklist", validate_list(&self.checklist));

        errors.finish_with(|| {
            let mut budget = Budget {
                id: self.id,
                start_date: self.start_date,
                end_date: self.end_date,
                incomes: incomes.unwrap_or_default(),
                bills: bills.unwrap_or_default(),
                expenses: expenses.unwrap_or_default(),
                savings: savings.unwrap_or_default(),
                checklist: checklist.unwrap_or_default(),
                balance: Amount::default(),
                timestamps: self.timestamps,
            };
            budget.balance = budget.compute_balance();
            budget
        })
    }
}
