use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::{
    core::utils::{ensure_dir, write_atomic},
    domain::Identifiable,
    errors::{BudgetError, Result},
};

use super::{Record, Repository};

const RECORD_EXTENSION: &str = "json";

/// Stores each record as a pretty-printed JSON file in `<root>/<collection>/<id>.json`.
pub struct JsonStore<T> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> JsonStore<T> {
    pub fn new(root: &Path) -> Result<Self> {
        let dir = root.join(T::COLLECTION);
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            _marker: PhantomData,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, id: Uuid) -> PathBuf {
        self.dir
            .join(format!("{}.{}", id.hyphenated(), RECORD_EXTENSION))
    }

    fn write_record(&self, id: Uuid, item: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(item)?;
        write_atomic(&self.record_path(id), &json)
    }

    fn read_record(path: &Path) -> Result<T> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl<T: Record> Repository<T> for JsonStore<T> {
    fn create(&self, item: &T) -> Result<()> {
        let id = item.id();
        if self.record_path(id).exists() {
            return Err(BudgetError::Storage(format!(
                "{} `{}` already exists",
                T::COLLECTION,
                id
            )));
        }
        self.write_record(id, item)?;
        tracing::debug!(collection = T::COLLECTION, %id, "record written");
        Ok(())
    }

    fn retrieve(&self, id: Uuid) -> Result<T> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(BudgetError::not_found(T::COLLECTION, id));
        }
        Self::read_record(&path)
    }

    fn list(&self) -> Result<Vec<T>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            records.push(Self::read_record(&path)?);
        }
        records.sort_by(|a, b| a.created().cmp(&b.created()).then(a.id().cmp(&b.id())));
        Ok(records)
    }

    fn update_by_id(&self, id: Uuid, item: &T) -> Result<()> {
        if !self.record_path(id).exists() {
            return Err(BudgetError::not_found(T::COLLECTION, id));
        }
        self.write_record(id, item)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(BudgetError::not_found(T::COLLECTION, id));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::{Duration, Utc};

    fn category(name: &str, offset_secs: i64) -> Category {
        let mut item = Category {
            id: Uuid::new_v4(),
            ..Category::new(name)
        };
        item.timestamps
            .set_creation(Utc::now() + Duration::seconds(offset_secs));
        item
    }

    #[test]
    fn records_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Category>::new(dir.path()).unwrap();
        let item = category("Groceries", 0);
        store.create(&item).unwrap();
        assert!(store.record_path(item.id).exists());
        assert_eq!(store.retrieve(item.id).unwrap(), item);
    }

    #[test]
    fn list_is_sorted_by_creation_and_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Category>::new(dir.path()).unwrap();
        let late = category("Late", 60);
        let early = category("Early", -60);
        store.create(&late).unwrap();
        store.create(&early).unwrap();
        fs::write(store.dir().join("notes.txt"), "ignore me").unwrap();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Early", "Late"]);
    }

    #[test]
    fn update_and_delete_require_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Category>::new(dir.path()).unwrap();
        let mut item = category("Fun", 0);
        assert!(store.update_by_id(item.id, &item).unwrap_err().is_not_found());

        store.create(&item).unwrap();
        item.name = "Entertainment".into();
        store.update_by_id(item.id, &item).unwrap();
        assert_eq!(store.retrieve(item.id).unwrap().name, "Entertainment");

        store.delete(item.id).unwrap();
        assert!(store.retrieve(item.id).unwrap_err().is_not_found());
        assert!(store.delete(item.id).unwrap_err().is_not_found());
    }
}
