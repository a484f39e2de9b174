use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::domain::Identifiable;
use crate::errors::{BudgetError, Result};

use super::{Record, Repository};

/// Keeps records in insertion order behind a lock. Nothing survives the process.
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>> {
        self.records
            .read()
            .map_err(|_| BudgetError::Storage(format!("{} store lock poisoned", T::COLLECTION)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
        self.records
            .write()
            .map_err(|_| BudgetError::Storage(format!("{} store lock poisoned", T::COLLECTION)))
    }
}

impl<T: Record> Repository<T> for MemoryStore<T> {
    fn create(&self, item: &T) -> Result<()> {
        let mut records = self.write()?;
        if records.iter().any(|existing| existing.id() == item.id()) {
            return Err(BudgetError::Storage(format!(
                "{} `{}` already exists",
                T::COLLECTION,
                item.id()
            )));
        }
        records.push(item.clone());
        Ok(())
    }

    fn retrieve(&self, id: Uuid) -> Result<T> {
        self.read()?
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| BudgetError::not_found(T::COLLECTION, id))
    }

    fn list(&self) -> Result<Vec<T>> {
        Ok(self.read()?.clone())
    }

    fn update_by_id(&self, id: Uuid, item: &T) -> Result<()> {
        let mut records = self.write()?;
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| BudgetError::not_found(T::COLLECTION, id))?;
        *slot = item.clone();
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(BudgetError::not_found(T::COLLECTION, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            ..Category::new(name)
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let store = MemoryStore::new();
        let first = category("Food");
        let second = category("Fun");
        store.create(&first).unwrap();
        store.create(&second).unwrap();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Food", "Fun"]);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let store: MemoryStore<Category> = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(store.retrieve(id).unwrap_err().is_not_found());
        assert!(store.update_by_id(id, &category("x")).unwrap_err().is_not_found());
        assert!(store.delete(id).unwrap_err().is_not_found());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store = MemoryStore::new();
        let item = category("Food");
        store.create(&item).unwrap();
        assert!(matches!(store.create(&item), Err(BudgetError::Storage(_))));
    }
}
