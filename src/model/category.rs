use serde::{Deserialize, Serialize};

use super::term::Term;
use crate::util::ids::new_id;

/// A named, ordered group of terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub terms: Vec<Term>,
}

impl Category {
    /// Create an empty category with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            id: new_id(),
            name: name.into(),
            terms: Vec::new(),
        }
    }

    /// First term with the given text
    pub fn find_term(&self, text: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.text == text)
    }

    pub fn contains_term(&self, text: &str) -> bool {
        self.find_term(text).is_some()
    }
}
