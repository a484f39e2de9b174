use uuid::Uuid;

use crate::core::time::Clock;
use crate::domain::Category;
use crate::storage::Repository;

use super::{create_record, delete_record, update_record, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    pub fn create(
        repo: &dyn Repository<Category>,
        clock: &dyn Clock,
        input: &Category,
    ) -> ServiceResult<Category> {
        create_record(repo, clock, input)
    }

    pub fn retrieve(repo: &dyn Repository<Category>, id: Uuid) -> ServiceResult<Category> {
        repo.retrieve(id)
    }

    pub fn list(repo: &dyn Repository<Category>) -> ServiceResult<Vec<Category>> {
        repo.list()
    }

    pub fn update(
        repo: &dyn Repository<Category>,
        clock: &dyn Clock,
        id: Uuid,
        input: &Category,
    ) -> ServiceResult<Category> {
        update_record(repo, clock, id, input, Category::replace_contents)
    }

    pub fn delete(repo: &dyn Repository<Category>, id: Uuid) -> ServiceResult<()> {
        delete_record(repo, id)
    }
}
