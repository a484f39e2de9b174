//! Domain types representing budget categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::validation::{is_blank, FieldCode, Validate, ValidationError};

/// Groups planned and actual spending under a user-chosen label.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub timestamps: Timestamped,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Category::default()
        }
    }

    pub fn replace_contents(&mut self, input: Category) {
        self.name = input.name;
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Validate for Category {
    type Clean = Category;

    fn get_validated(&self) -> Result<Category, ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::new(
                "name",
                FieldCode::Missing,
                "You must provide a name.",
            ));
        }
        Ok(Category {
            name: self.name.trim().to_string(),
            ..self.clone()
        })
    }
}
