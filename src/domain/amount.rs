//! Money values. All amounts are whole cents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::common::SafeUuid;
use crate::validation::{is_blank, validate_list, ErrorCollector, FieldCode, Validate, ValidationError};

/// The central model for putting a dollar amount on anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    #[serde(rename = "amount")]
    pub amount_cents: i64,
}

impl Amount {
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }
}

impl From<i64> for Amount {
    fn from(amount_cents: i64) -> Self {
        Self { amount_cents }
    }
}

impl Validate for Amount {
    type Clean = Amount;

    fn get_validated(&self) -> Result<Amount, ValidationError> {
        if self.amount_cents < 0 {
            return Err(ValidationError::new(
                "amount",
                FieldCode::OutOfRange,
                "The amount cannot be negative.",
            ));
        }
        Ok(*self)
    }
}

/// A labelled amount: one income, bill, expense, or saving line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAmount {
    pub name: String,
    #[serde(flatten)]
    pub amount: Amount,
}

impl NamedAmount {
    pub fn new(name: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            name: name.into(),
            amount: Amount::new(amount_cents),
        }
    }

    pub fn cents(&self) -> i64 {
        self.amount.amount_cents
    }
}

impl Validate for NamedAmount {
    type Clean = NamedAmount;

    fn get_validated(&self) -> Result<NamedAmount, ValidationError> {
        let mut errors = ErrorCollector::new();
        if is_blank(&self.name) {
            errors.push("name", FieldCode::Missing, "You must provide a name.");
        }
        let amount = errors.check("", self.amount.get_validated());
        errors.finish_with(|| NamedAmount {
            name: self.name.trim().to_string(),
            amount: amount.unwrap_or(self.amount),
        })
    }
}

/// Validates a list of named amounts, indexing any failures by position.
pub fn validate_named_amounts(items: &[NamedAmount]) -> Result<Vec<NamedAmount>, ValidationError> {
    validate_list(items)
}

/// Maps each name to its amount. Later duplicates overwrite earlier ones.
pub fn as_map(items: &[NamedAmount]) -> HashMap<String, Amount> {
    items
        .iter()
        .map(|item| (item.name.clone(), item.amount))
        .collect()
}

/// Sum of every amount in the list, widened so it cannot overflow.
pub fn total_cents(items: &[NamedAmount]) -> i128 {
    items.iter().map(|item| i128::from(item.cents())).sum()
}

/// Narrows a widened cent value, saturating at the `i64` bounds.
pub fn saturate_cents(cents: i128) -> i64 {
    cents.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// A category reference paired with an amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmount {
    #[serde(rename = "categoryID")]
    pub category_id: SafeUuid,
    #[serde(flatten)]
    pub amount: Amount,
}

impl Validate for CategoryAmount {
    type Clean = CategoryAmount;

    fn get_validated(&self) -> Result<CategoryAmount, ValidationError> {
        let mut errors = ErrorCollector::new();
        let category_id = errors.check("categoryID", self.category_id.get_validated());
        let amount = errors.check("", self.amount.get_validated());
        errors.finish_with(|| CategoryAmount {
            category_id: category_id.unwrap_or_default(),
            amount: amount.unwrap_or(self.amount),
        })
    }
}
