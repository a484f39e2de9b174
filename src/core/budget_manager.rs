use uuid::Uuid;

use crate::config::{Config, StorageKind};
use crate::core::services::{
    BudgetService, CategoryService, ConversionService, PlanService, ServiceResult,
};
use crate::core::time::{Clock, SystemClock};
use crate::domain::{Budget, Category, Conversion, Plan};
use crate::errors::Result;
use crate::storage::{JsonStore, MemoryStore, Repository};

/// Entry point tying the services to their stores and clock.
pub struct BudgetManager {
    plans: Box<dyn Repository<Plan>>,
    budgets: Box<dyn Repository<Budget>>,
    conversions: Box<dyn Repository<Conversion>>,
    categories: Box<dyn Repository<Category>>,
    clock: Box<dyn Clock>,
}

impl BudgetManager {
    pub fn new(
        plans: Box<dyn Repository<Plan>>,
        budgets: Box<dyn Repository<Budget>>,
        conversions: Box<dyn Repository<Conversion>>,
        categories: Box<dyn Repository<Category>>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            plans,
            budgets,
            conversions,
            categories,
            clock,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStore::<Plan>::new()),
            Box::new(MemoryStore::<Budget>::new()),
            Box::new(MemoryStore::<Conversion>::new()),
            Box::new(MemoryStore::<Category>::new()),
            Box::new(SystemClock),
        )
    }

    pub fn json(root: &std::path::Path) -> Result<Self> {
        Ok(Self::new(
            Box::new(JsonStore::<Plan>::new(root)?),
            Box::new(JsonStore::<Budget>::new(root)?),
            Box::new(JsonStore::<Conversion>::new(root)?),
            Box::new(JsonStore::<Category>::new(root)?),
            Box::new(SystemClock),
        ))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let manager = match config.storage {
            StorageKind::Memory => Self::in_memory(),
            StorageKind::Json => Self::json(&config.data_root())?,
        };
        tracing::info!(storage = %config.storage, "budget manager ready");
        Ok(manager)
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn create_plan(&self, input: &Plan) -> ServiceResult<Plan> {
        PlanService::create(self.plans.as_ref(), self.clock.as_ref(), input)
    }

    pub fn plan(&self, id: Uuid) -> ServiceResult<Plan> {
        PlanService::retrieve(self.plans.as_ref(), id)
    }

    pub fn plans(&self) -> ServiceResult<Vec<Plan>> {
        PlanService::list(self.plans.as_ref())
    }

    pub fn update_plan(&self, id: Uuid, input: &Plan) -> ServiceResult<Plan> {
        PlanService::update(self.plans.as_ref(), self.clock.as_ref(), id, input)
    }

    pub fn delete_plan(&self, id: Uuid) -> ServiceResult<()> {
        PlanService::delete(self.plans.as_ref(), id)
    }

    pub fn create_budget(&self, input: &Budget) -> ServiceResult<Budget> {
        BudgetService::create(self.budgets.as_ref(), self.clock.as_ref(), input)
    }

    pub fn budget(&self, id: Uuid) -> ServiceResult<Budget> {
        BudgetService::retrieve(self.budgets.as_ref(), id)
    }

    pub fn budgets(&self) -> ServiceResult<Vec<Budget>> {
        BudgetService::list(self.budgets.as_ref())
    }

    pub fn update_budget(&self, id: Uuid, input: &Budget) -> ServiceResult<Budget> {
        BudgetService::update(self.budgets.as_ref(), self.clock.as_ref(), id, input)
    }

    pub fn delete_budget(&self, id: Uuid) -> ServiceResult<()> {
        BudgetService::delete(self.budgets.as_ref(), id)
    }

    pub fn create_category(&self, input: &Category) -> ServiceResult<Category> {
        CategoryService::create(self.categories.as_ref(), self.clock.as_ref(), input)
    }

    pub fn category(&self, id: Uuid) -> ServiceResult<Category> {
        CategoryService::retrieve(self.categories.as_ref(), id)
    }

    pub fn categories(&self) -> ServiceResult<Vec<Category>> {
        CategoryService::list(self.categories.as_ref())
    }

    pub fn update_category(&self, id: Uuid, input: &Category) -> ServiceResult<Category> {
        CategoryService::update(self.categories.as_ref(), self.clock.as_ref(), id, input)
    }

    pub fn delete_category(&self, id: Uuid) -> ServiceResult<()> {
        CategoryService::delete(self.categories.as_ref(), id)
    }

    /// Converts a plan into a budget, returning the stored conversion and budget.
    pub fn convert(&self, input: &Conversion) -> ServiceResult<(Conversion, Budget)> {
        ConversionService::create(
            self.conversions.as_ref(),
            self.budgets.as_ref(),
            &self.plans,
            self.clock.as_ref(),
            input,
        )
    }

    pub fn conversion(&self, id: Uuid) -> ServiceResult<Conversion> {
        ConversionService::retrieve(self.conversions.as_ref(), id)
    }

    pub fn conversions(&self) -> ServiceResult<Vec<Conversion>> {
        ConversionService::list(self.conversions.as_ref())
    }
}
