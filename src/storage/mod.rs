pub mod json_backend;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::domain::{Budget, Category, Conversion, Identifiable, Plan, Timestamped};
use crate::errors::Result;

/// An entity that can be persisted by a [`Repository`].
pub trait Record: Identifiable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (table or directory) name the entity lives in.
    const COLLECTION: &'static str;

    fn set_id(&mut self, id: Uuid);
    fn timestamps(&self) -> &Timestamped;
    fn timestamps_mut(&mut self) -> &mut Timestamped;

    fn created(&self) -> DateTime<Utc> {
        self.timestamps().created
    }
}

macro_rules! impl_record {
    ($entity:ty, $collection:literal) => {
        impl Record for $entity {
            const COLLECTION: &'static str = $collection;

            fn set_id(&mut self, id: Uuid) {
                self.id = id;
            }

            fn timestamps(&self) -> &Timestamped {
                &self.timestamps
            }

            fn timestamps_mut(&mut self) -> &mut Timestamped {
                &mut self.timestamps
            }
        }
    };
}

impl_record!(Plan, "plans");
impl_record!(Budget, "budgets");
impl_record!(Conversion, "conversions");
impl_record!(Category, "categories");

/// Abstraction over persistence backends holding one collection of records.
pub trait Repository<T: Record>: Send + Sync {
    /// Stores a new record. Fails when the id is already taken.
    fn create(&self, item: &T) -> Result<()>;
    /// Fetches one record; a missing id is [`crate::errors::BudgetError::NotFound`].
    fn retrieve(&self, id: Uuid) -> Result<T>;
    fn list(&self) -> Result<Vec<T>>;
    /// Replaces the record stored under `id`.
    fn update_by_id(&self, id: Uuid, item: &T) -> Result<()>;
    fn delete(&self, id: Uuid) -> Result<()>;
}

impl<T: Record, R: Repository<T> + ?Sized> Repository<T> for Box<R> {
    fn create(&self, item: &T) -> Result<()> {
        (**self).create(item)
    }

    fn retrieve(&self, id: Uuid) -> Result<T> {
        (**self).retrieve(id)
    }

    fn list(&self) -> Result<Vec<T>> {
        (**self).list()
    }

    fn update_by_id(&self, id: Uuid, item: &T) -> Result<()> {
        (**self).update_by_id(id, item)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        (**self).delete(id)
    }
}

/// Read access to plans, as needed when converting a plan into a budget.
pub trait PlanLookup {
    fn find_plan(&self, id: Uuid) -> Result<Plan>;
}

impl<R: Repository<Plan> + ?Sized> PlanLookup for R {
    fn find_plan(&self, id: Uuid) -> Result<Plan> {
        self.retrieve(id)
    }
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
