use uuid::Uuid;

use crate::core::time::Clock;
use crate::domain::Budget;
use crate::storage::Repository;

use super::{create_record, delete_record, update_record, ServiceResult};

/// Stores and edits budgets. Balances are recomputed on every write.
pub struct BudgetService;

impl BudgetService {
    pub fn create(
        repo: &dyn Repository<Budget>,
        clock: &dyn Clock,
        input: &Budget,
    ) -> ServiceResult<Budget> {
        create_record(repo, clock, input)
    }

    pub fn retrieve(repo: &dyn Repository<Budget>, id: Uuid) -> ServiceResult<Budget> {
        repo.retrieve(id)
    }

    pub fn list(repo: &dyn Repository<Budget>) -> ServiceResult<Vec<Budget>> {
        repo.list()
    }

    pub fn update(
        repo: &dyn Repository<Budget>,
        clock: &dyn Clock,
        id: Uuid,
        input: &Budget,
    ) -> ServiceResult<Budget> {
        update_record(repo, clock, id, input, Budget::replace_contents)
    }

    pub fn delete(repo: &dyn Repository<Budget>, id: Uuid) -> ServiceResult<()> {
        delete_record(repo, id)
    }
}
