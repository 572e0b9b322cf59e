use serde::{Deserialize, Serialize};

/// Configuration from weaver.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaverConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept
    #[serde(default = "default_max_history")]
    pub max: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            max: default_max_history(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Joins selected terms into the prompt text
    #[serde(default = "default_separator")]
    pub separator: String,
    /// How many emitted prompts the prompt log keeps
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        PromptConfig {
            separator: default_separator(),
            log_limit: default_log_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Write the data file after every committed change
    #[serde(default = "default_true")]
    pub autosave: bool,
    /// Data file name, relative to the data directory
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            autosave: true,
            data_file: default_data_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// Upload directory, relative to the data directory
    #[serde(default = "default_uploads_dir")]
    pub dir: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        UploadsConfig {
            dir: default_uploads_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_history() -> usize {
    crate::history::DEFAULT_MAX_HISTORY
}

fn default_separator() -> String {
    crate::ops::selection_ops::SEPARATOR.to_string()
}

fn default_log_limit() -> usize {
    50
}

fn default_data_file() -> String {
    "data.json".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}
