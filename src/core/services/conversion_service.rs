use uuid::Uuid;

use crate::core::time::Clock;
use crate::domain::{Budget, Conversion};
use crate::storage::{PlanLookup, Repository};

use super::{BudgetService, ServiceResult};

/// Turns plans into budgets and keeps a record of each conversion.
pub struct ConversionService;

impl ConversionService {
    /// Validates `input` against its plan, creates the derived budget, then
    /// stores the conversion with the new budget's id. If the conversion cannot
    /// be stored, the budget is removed again.
    pub fn create(
        conversions: &dyn Repository<Conversion>,
        budgets: &dyn Repository<Budget>,
        plans: &dyn PlanLookup,
        clock: &dyn Clock,
        input: &Conversion,
    ) -> ServiceResult<(Conversion, Budget)> {
        let (mut conversion, plan) = input.get_validated(plans).map_err(|err| {
            tracing::debug!(%err, "rejected conversion");
            err
        })?;
        let budget = BudgetService::create(budgets, clock, &conversion.make_budget(&plan))?;

        conversion.id = Uuid::new_v4();
        conversion.budget_id = Some(budget.id);
        conversion.timestamps.set_creation(clock.now());
        if let Err(err) = conversions.create(&conversion) {
            tracing::warn!(budget_id = %budget.id, %err, "conversion not stored, removing its budget");
            if let Err(cleanup) = budgets.delete(budget.id) {
                tracing::warn!(budget_id = %budget.id, %cleanup, "could not remove orphaned budget");
            }
            return Err(err);
        }
        tracing::info!(
            id = %conversion.id,
            plan_id = %plan.id,
            budget_id = %budget.id,
            "converted plan into budget"
        );
        Ok((conversion, budget))
    }

    pub fn retrieve(conversions: &dyn Repository<Conversion>, id: Uuid) -> ServiceResult<Conversion> {
        conversions.retrieve(id)
    }

    pub fn list(conversions: &dyn Repository<Conversion>) -> ServiceResult<Vec<Conversion>> {
        conversions.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use crate::domain::{Date, NamedAmount, Plan, PlannedIncome, Schedule};
    use crate::errors::{BudgetError, Result};
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    struct FullStore;

    impl Repository<Conversion> for FullStore {
        fn create(&self, _item: &Conversion) -> Result<()> {
            Err(BudgetError::Storage("disk full".into()))
        }

        fn retrieve(&self, id: Uuid) -> Result<Conversion> {
            Err(BudgetError::not_found("conversions", id))
        }

        fn list(&self) -> Result<Vec<Conversion>> {
            Ok(Vec::new())
        }

        fn update_by_id(&self, _id: Uuid, _item: &Conversion) -> Result<()> {
            Err(BudgetError::Storage("disk full".into()))
        }

        fn delete(&self, _id: Uuid) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_conversion_leaves_no_budget_behind() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2018, 6, 19, 8, 0, 0).unwrap());
        let plans: MemoryStore<Plan> = MemoryStore::new();
        let plan = Plan {
            id: Uuid::new_v4(),
            incomes: vec![PlannedIncome::new("Salary", 500_000, Schedule::Month(1))],
            ..Plan::default()
        };
        plans.create(&plan).unwrap();
        let budgets: MemoryStore<Budget> = MemoryStore::new();

        let input = Conversion {
            exact_incomes: vec![NamedAmount::new("Salary", 500_000)],
            ..Conversion::new(plan.id, Date::new(2018, 7, 1), Date::new(2018, 7, 31))
        };
        let err = ConversionService::create(&FullStore, &budgets, &plans, &clock, &input).unwrap_err();
        assert!(matches!(err, BudgetError::Storage(_)));
        assert!(budgets.list().unwrap().is_empty());
    }
}
