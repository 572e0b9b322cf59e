use serde::{Deserialize, Serialize};

/// A saved, named list of terms that can be loaded into the selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub terms: Vec<String>,
    /// Preview image (URL or data URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
