use serde::{Deserialize, Serialize};

use crate::util::ids::new_id;

/// A single reusable text fragment with an optional illustrative image.
///
/// `text` is what ends up in the prompt and what the selection refers to.
/// `id` stays the same when the text is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Stable identifier (generated when missing from older data files)
    #[serde(default = "new_id")]
    pub id: String,
    pub text: String,
    /// Image URL or data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Term {
    pub fn new(text: impl Into<String>, image: Option<String>) -> Self {
        Term {
            id: new_id(),
            text: text.into(),
            image,
        }
    }
}
