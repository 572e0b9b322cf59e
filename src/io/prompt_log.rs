use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const LOG_FILE: &str = "prompt_history.json";

/// One emitted prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptLogEntry {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub prompt: String,
}

impl PromptLogEntry {
    /// Timestamp rendered like `Mar 4, 09:15` in local time
    pub fn display_time(&self) -> String {
        match Local.timestamp_millis_opt(self.timestamp).single() {
            Some(t) => t.format("%b %-d, %H:%M").to_string(),
            None => "?".to_string(),
        }
    }
}

/// Read the prompt log, newest first. Missing or unreadable logs are empty.
pub fn read_prompt_log(data_dir: &Path) -> Vec<PromptLogEntry> {
    let Ok(content) = fs::read_to_string(data_dir.join(LOG_FILE)) else {
        return Vec::new();
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("ignoring malformed prompt log: {}", e);
            Vec::new()
        }
    }
}

/// Prepend a prompt to the log, keeping at most `limit` entries.
/// Empty prompts are not recorded; returns whether an entry was written.
pub fn record_prompt(
    data_dir: &Path,
    prompt: &str,
    now: DateTime<Utc>,
    limit: usize,
) -> Result<bool, std::io::Error> {
    if prompt.trim().is_empty() {
        return Ok(false);
    }
    let mut entries = read_prompt_log(data_dir);
    entries.insert(
        0,
        PromptLogEntry {
            timestamp: now.timestamp_millis(),
            prompt: prompt.to_string(),
        },
    );
    entries.truncate(limit);
    fs::create_dir_all(data_dir)?;
    let content = serde_json::to_string_pretty(&entries)?;
    fs::write(data_dir.join(LOG_FILE), content)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn newest_first() {
        let tmp = TempDir::new().unwrap();
        record_prompt(tmp.path(), "a, b", at(1_000), 50).unwrap();
        record_prompt(tmp.path(), "c", at(2_000), 50).unwrap();
        let log = read_prompt_log(tmp.path());
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].prompt, "c");
        assert_eq!(log[0].timestamp, 2_000);
        assert_eq!(log[1].prompt, "a, b");
    }

    #[test]
    fn caps_at_limit() {
        let tmp = TempDir::new().unwrap();
        for i in 0..5 {
            record_prompt(tmp.path(), &format!("p{i}"), at(i), 3).unwrap();
        }
        let log = read_prompt_log(tmp.path());
        let prompts: Vec<&str> = log.iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["p4", "p3", "p2"]);
    }

    #[test]
    fn empty_prompt_not_recorded() {
        let tmp = TempDir::new().unwrap();
        assert!(!record_prompt(tmp.path(), "  ", at(0), 50).unwrap());
        assert!(read_prompt_log(tmp.path()).is_empty());
    }

    #[test]
    fn malformed_log_reads_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(LOG_FILE), "{{{").unwrap();
        assert!(read_prompt_log(tmp.path()).is_empty());
    }
}
