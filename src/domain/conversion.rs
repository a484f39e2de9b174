//! Turning a plan into a budget for a concrete date range.
//!
//! A [`Conversion`] names the plan, the range, and any amounts the user already
//! knows exactly. Validation checks it against the stored plan; derivation then
//! builds the budget, prorating flexible expenses to the length of the range.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount::{as_map, saturate_cents, validate_named_amounts, Amount, NamedAmount};
use crate::domain::budget::Budget;
use crate::domain::common::{Identifiable, SafeUuid, Timestamped};
use crate::domain::date::Date;
use crate::domain::plan::Plan;
use crate::errors::Result;
use crate::storage::PlanLookup;
use crate::validation::{ErrorCollector, FieldCode, Validate, ValidationError};

/// Days in the nominal month that plan expenses are expressed against.
pub const DAYS_PER_PLAN_MONTH: i64 = 30;

/// The data collected when turning a plan into a budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    #[serde(default)]
    pub id: Uuid,
    /// Filled in once the budget has been created.
    #[serde(default, rename = "budgetID", skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<Uuid>,
    #[serde(default, rename = "planID")]
    pub plan_id: SafeUuid,
    #[serde(default)]
    pub start_date: Date,
    #[serde(default)]
    pub end_date: Date,
    #[serde(default)]
    pub exact_incomes: Vec<NamedAmount>,
    #[serde(default)]
    pub exact_expenses: Vec<NamedAmount>,
    #[serde(default)]
    pub exact_bills: Vec<NamedAmount>,
    #[serde(flatten)]
    pub timestamps: Timestamped,
}

impl Conversion {
    pub fn new(plan_id: impl Into<SafeUuid>, start_date: Date, end_date: Date) -> Self {
        Self {
            plan_id: plan_id.into(),
            start_date,
            end_date,
            ..Conversion::default()
        }
    }

    fn validate_fields(&self) -> std::result::Result<(Conversion, Uuid), ValidationError> {
        let mut errors = ErrorCollector::new();
        let start = errors.check("startDate", self.start_date.validate_non_zero());
        let end = errors.check("endDate", self.end_date.validate_non_zero());
        if start.is_some() && end.is_some() && self.end_date < self.start_date {
            errors.push(
                "endDate",
                FieldCode::OutOfRange,
                "The end date cannot be before the start date.",
            );
        }
        let plan_id = errors
            .check("planID", self.plan_id.get_validated())
            .and_then(|id| id.to_uuid().map(|uuid| (id, uuid)));
        let exact_incomes = errors.check("exactIncomes", validate_named_amounts(&self.exact_incomes));
        let exact_expenses =
            errors.check("exactExpenses", validate_named_amounts(&self.exact_expenses));
        let exact_bills = errors.check("exactBills", validate_named_amounts(&self.exact_bills));

        errors.finish_with(|| {
            let (plan_id, plan_uuid) = plan_id.unwrap_or_default();
            let clean = Conversion {
                id: self.id,
                budget_id: self.budget_id,
                plan_id,
                start_date: self.start_date,
                end_date: self.end_date,
                exact_incomes: exact_incomes.unwrap_or_default(),
                exact_expenses: exact_expenses.unwrap_or_default(),
                exact_bills: exact_bills.unwrap_or_default(),
                timestamps: self.timestamps,
            };
            (clean, plan_uuid)
        })
    }

    /// Validates the request, then checks it against the plan it references.
    ///
    /// Field errors are reported before the plan is looked up. A missing plan is
    /// [`crate::errors::BudgetError::NotFound`]. Every plan bill whose amount is not exact must
    /// have a matching entry in `exactBills`.
    pub fn get_validated(&self, plans: &dyn PlanLookup) -> Result<(Conversion, Plan)> {
        let (clean, plan_id) = self.validate_fields()?;
        let plan = plans.find_plan(plan_id)?;

        let provided: HashSet<&str> = clean.exact_bills.iter().map(|b| b.name.as_str()).collect();
        let mut seen = HashSet::new();
        let missing: Vec<&str> = plan
            .inexact_bills()
            .map(|bill| bill.item.name.as_str())
            .filter(|name| !provided.contains(name) && seen.insert(*name))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::new(
                "exactBills",
                FieldCode::Missing,
                format!(
                    "You must provide the exact amount for these bills: {}",
                    missing.join(", ")
                ),
            )
            .into());
        }

        Ok((clean, plan))
    }

    /// Derives a budget for this conversion's range from `plan`.
    ///
    /// Each group takes the exact amounts first; plan expenses without one are
    /// prorated by `days / 30`. Exact amounts the plan does not mention are
    /// appended in the order given. Savings and the checklist start empty.
    pub fn make_budget(&self, plan: &Plan) -> Budget {
        let days = self.end_date.days_since(&self.start_date);
        let incomes = merge_overrides(
            plan.incomes.iter().map(|income| &income.item),
            &self.exact_incomes,
            NamedAmount::cents,
        );
        let bills = merge_overrides(
            plan.bills.iter().map(|bill| &bill.item),
            &self.exact_bills,
            NamedAmount::cents,
        );
        let expenses = merge_overrides(plan.expenses.iter(), &self.exact_expenses, |item| {
            prorate(item.cents(), days)
        });

        Budget {
            start_date: self.start_date,
            end_date: self.end_date,
            incomes,
            bills,
            expenses,
            ..Budget::default()
        }
    }
}

impl Identifiable for Conversion {
    fn id(&self) -> Uuid {
        self.id
    }
}

fn merge_overrides<'a, I, F>(planned: I, exact: &[NamedAmount], planned_cents: F) -> Vec<NamedAmount>
where
    I: Iterator<Item = &'a NamedAmount>,
    F: Fn(&NamedAmount) -> i64,
{
    let mut overrides = as_map(exact);
    let mut merged: Vec<NamedAmount> = planned
        .map(|item| {
            let amount = overrides
                .remove(&item.name)
                .unwrap_or_else(|| Amount::new(planned_cents(item)));
            NamedAmount {
                name: item.name.clone(),
                amount,
            }
        })
        .collect();
    for item in exact {
        if let Some(amount) = overrides.remove(&item.name) {
            merged.push(NamedAmount {
                name: item.name.clone(),
                amount,
            });
        }
    }
    merged
}

/// `cents * days / 30`, rounded half up.
pub fn prorate(cents: i64, days: i64) -> i64 {
    let scaled = cents as i128 * days as i128 * 2 + DAYS_PER_PLAN_MONTH as i128;
    saturate_cents(scaled.div_euclid(DAYS_PER_PLAN_MONTH as i128 * 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::{PlannedBill, PlannedIncome};
    use crate::domain::schedule::Schedule;
    use crate::storage::{MemoryStore, Repository};

    fn stored_plan(store: &MemoryStore<Plan>) -> Plan {
        let plan = Plan {
            id: Uuid::new_v4(),
            incomes: vec![PlannedIncome::new("Salary", 500_000, Schedule::Month(1))],
            bills: vec![
                PlannedBill::new("Rent", 120_000, Schedule::Month(1)).exact(true),
                PlannedBill::new("Electric", 9_000, Schedule::Month(20)),
            ],
            expenses: vec![NamedAmount::new("Groceries", 60_000)],
            ..Plan::default()
        };
        store.create(&plan).unwrap();
        plan
    }

    fn june(plan: &Plan) -> Conversion {
        let mut conversion = Conversion::new(plan.id, Date::new(2018, 6, 1), Date::new(2018, 7, 1));
        conversion.exact_bills = vec![NamedAmount::new("Electric", 8_750)];
        conversion
    }

    #[test]
    fn field_errors_come_before_plan_lookup() {
        let store: MemoryStore<Plan> = MemoryStore::new();
        let conversion = Conversion {
            plan_id: SafeUuid::new("not-a-uuid"),
            start_date: Date::new(2018, 6, 1),
            end_date: Date::new(2018, 2, 30),
            exact_incomes: vec![NamedAmount::new("", 1)],
            ..Conversion::default()
        };
        let err = conversion.get_validated(&store).unwrap_err();
        let fields = err.as_validation().unwrap();
        assert_eq!(fields.field_names(), vec!["endDate", "planID", "exactIncomes.0.name"]);
        assert!(fields.has("endDate", FieldCode::BadDate));
        assert!(fields.has("planID", FieldCode::BadUuid));
    }

    #[test]
    fn inverted_range_is_out_of_range() {
        let store = MemoryStore::new();
        let plan = stored_plan(&store);
        let mut conversion = june(&plan);
        conversion.end_date = Date::new(2018, 5, 1);
        let err = conversion.get_validated(&store).unwrap_err();
        assert!(err.as_validation().unwrap().has("endDate", FieldCode::OutOfRange));
    }

    #[test]
    fn unknown_plan_is_not_found() {
        let store: MemoryStore<Plan> = MemoryStore::new();
        let conversion = Conversion::new(Uuid::new_v4(), Date::new(2018, 6, 1), Date::new(2018, 7, 1));
        let err = conversion.get_validated(&store).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn inexact_bills_need_exact_amounts() {
        let store = MemoryStore::new();
        let plan = stored_plan(&store);
        let mut conversion = june(&plan);
        conversion.exact_bills.clear();
        let err = conversion.get_validated(&store).unwrap_err();
        let fields = err.as_validation().unwrap();
        assert!(fields.has("exactBills", FieldCode::Missing));
        assert!(fields.fields()[0].message.contains("Electric"));

        let (clean, found) = june(&plan).get_validated(&store).unwrap();
        assert_eq!(found, plan);
        assert_eq!(clean.plan_id.to_uuid(), Some(plan.id));
    }

    #[test]
    fn missing_bill_names_are_listed_once() {
        let store = MemoryStore::new();
        let plan = Plan {
            id: Uuid::new_v4(),
            bills: vec![
                PlannedBill::new("Water", 3_000, Schedule::Month(5)),
                PlannedBill::new("Phone", 4_000, Schedule::Month(9)),
                PlannedBill::new("Water", 3_500, Schedule::Month(20)),
            ],
            ..Plan::default()
        };
        store.create(&plan).unwrap();

        let conversion = Conversion::new(plan.id, Date::new(2018, 6, 1), Date::new(2018, 7, 1));
        let err = conversion.get_validated(&store).unwrap_err();
        let fields = err.as_validation().unwrap();
        assert_eq!(
            fields.fields()[0].message,
            "You must provide the exact amount for these bills: Water, Phone"
        );
    }

    #[test]
    fn overrides_replace_plan_amounts() {
        let store = MemoryStore::new();
        let plan = stored_plan(&store);
        let mut conversion = june(&plan);
        conversion.exact_incomes = vec![NamedAmount::new("Salary", 510_000)];
        let budget = conversion.make_budget(&plan);
        assert_eq!(budget.incomes, vec![NamedAmount::new("Salary", 510_000)]);
        assert_eq!(
            budget.bills,
            vec![NamedAmount::new("Rent", 120_000), NamedAmount::new("Electric", 8_750)]
        );
        assert_eq!(budget.start_date, conversion.start_date);
        assert!(budget.savings.is_empty());
        assert!(budget.checklist.is_empty());
    }

    #[test]
    fn unmatched_overrides_are_appended_in_order() {
        let store = MemoryStore::new();
        let plan = stored_plan(&store);
        let mut conversion = june(&plan);
        conversion.exact_incomes = vec![
            NamedAmount::new("Gift", 5_000),
            NamedAmount::new("Salary", 499_000),
            NamedAmount::new("Refund", 1_200),
        ];
        let budget = conversion.make_budget(&plan);
        assert_eq!(
            budget.incomes,
            vec![
                NamedAmount::new("Salary", 499_000),
                NamedAmount::new("Gift", 5_000),
                NamedAmount::new("Refund", 1_200)
            ]
        );
    }

    #[test]
    fn only_expenses_are_prorated() {
        let store = MemoryStore::new();
        let plan = stored_plan(&store);
        let mut conversion = june(&plan);
        conversion.end_date = Date::new(2018, 6, 16);
        let budget = conversion.make_budget(&plan);
        assert_eq!(budget.expenses, vec![NamedAmount::new("Groceries", 30_000)]);
        assert_eq!(budget.incomes[0].cents(), 500_000);

        conversion.exact_expenses = vec![NamedAmount::new("Groceries", 41_000)];
        let budget = conversion.make_budget(&plan);
        assert_eq!(budget.expenses, vec![NamedAmount::new("Groceries", 41_000)]);
    }

    #[test]
    fn prorate_rounds_half_up() {
        assert_eq!(prorate(60_000, 30), 60_000);
        assert_eq!(prorate(100, 1), 3);
        assert_eq!(prorate(45, 1), 2);
        assert_eq!(prorate(44, 1), 1);
        assert_eq!(prorate(1_000, 0), 0);
        assert_eq!(prorate(i64::MAX, 60), i64::MAX);
    }
}
