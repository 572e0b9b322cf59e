use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::util::ids::new_id;

/// The top-level organizational unit: a named, ordered group of categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            id: new_id(),
            name: name.into(),
            categories: Vec::new(),
        }
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Look a category up by id, falling back to a case-insensitive name match
    pub fn resolve_category(&self, key: &str) -> Option<&Category> {
        self.category(key).or_else(|| {
            self.categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(key))
        })
    }
}
