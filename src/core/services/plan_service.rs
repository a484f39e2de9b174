use uuid::Uuid;

use crate::core::time::Clock;
use crate::domain::Plan;
use crate::storage::Repository;

use super::{create_record, delete_record, update_record, ServiceResult};

/// Stores and edits plans.
pub struct PlanService;

impl PlanService {
    pub fn create(repo: &dyn Repository<Plan>, clock: &dyn Clock, input: &Plan) -> ServiceResult<Plan> {
        create_record(repo, clock, input)
    }

    pub fn retrieve(repo: &dyn Repository<Plan>, id: Uuid) -> ServiceResult<Plan> {
        repo.retrieve(id)
    }

    pub fn list(repo: &dyn Repository<Plan>) -> ServiceResult<Vec<Plan>> {
        repo.list()
    }

    /// Replaces the incomes, bills, expenses, savings, and strategy of plan `id`.
    pub fn update(
        repo: &dyn Repository<Plan>,
        clock: &dyn Clock,
        id: Uuid,
        input: &Plan,
    ) -> ServiceResult<Plan> {
        update_record(repo, clock, id, input, Plan::replace_contents)
    }

    pub fn delete(repo: &dyn Repository<Plan>, id: Uuid) -> ServiceResult<()> {
        delete_record(repo, id)
    }
}
