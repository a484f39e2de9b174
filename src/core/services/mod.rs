pub mod budget_service;
pub mod category_service;
pub mod conversion_service;
pub mod plan_service;

pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use conversion_service::ConversionService;
pub use plan_service::PlanService;

use uuid::Uuid;

use crate::core::time::Clock;
use crate::domain::Identifiable;
use crate::errors::BudgetError;
use crate::storage::{Record, Repository};
use crate::validation::Validate;

pub type ServiceResult<T> = Result<T, BudgetError>;

/// Validates `input`, assigns a fresh id and creation timestamps, and stores it.
pub(crate) fn create_record<T>(
    repo: &dyn Repository<T>,
    clock: &dyn Clock,
    input: &T,
) -> ServiceResult<T>
where
    T: Record + Validate<Clean = T>,
{
    let mut record = input.get_validated().map_err(|err| {
        tracing::debug!(collection = T::COLLECTION, %err, "rejected new record");
        err
    })?;
    record.set_id(Uuid::new_v4());
    record.timestamps_mut().set_creation(clock.now());
    repo.create(&record)?;
    tracing::info!(collection = T::COLLECTION, id = %record.id(), "created");
    Ok(record)
}

/// Replaces the user-editable fields of record `id` with a validated copy of `input`.
pub(crate) fn update_record<T, F>(
    repo: &dyn Repository<T>,
    clock: &dyn Clock,
    id: Uuid,
    input: &T,
    replace: F,
) -> ServiceResult<T>
where
    T: Record + Validate<Clean = T>,
    F: FnOnce(&mut T, T),
{
    let mut current = repo.retrieve(id)?;
    let clean = input.get_validated().map_err(|err| {
        tracing::debug!(collection = T::COLLECTION, %id, %err, "rejected update");
        err
    })?;
    replace(&mut current, clean);
    current.timestamps_mut().set_modification(clock.now());
    repo.update_by_id(id, &current)?;
    tracing::info!(collection = T::COLLECTION, %id, "updated");
    Ok(current)
}

pub(crate) fn delete_record<T: Record>(repo: &dyn Repository<T>, id: Uuid) -> ServiceResult<()> {
    repo.delete(id)?;
    tracing::info!(collection = T::COLLECTION, %id, "deleted");
    Ok(())
}
