//! Persisted list of recently used webhook URLs

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Maximum number of remembered webhook URLs
pub const MAX_HISTORY: usize = 10;

/// On-disk layout: `{ "webhooks": [url, ...] }`, most recent last
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    webhooks: Vec<String>,
}

/// Most-recently-used webhook URLs, oldest first
#[derive(Debug, Clone, Default)]
pub struct WebhookHistory {
    path: Option<PathBuf>,
    webhooks: VecDeque<String>,
}

impl WebhookHistory {
    /// History that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load history from `path`.
    ///
    /// A missing or malformed file yields an empty history; the problem is
    /// logged and never returned.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load(&path) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable webhook history");
                Self {
                    path: Some(path),
                    webhooks: VecDeque::new(),
                }
            }
        }
    }

    /// Load history from `path`, reporting read and parse failures.
    /// A missing file is not an error.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let mut history = Self {
            path: Some(path.to_path_buf()),
            webhooks: VecDeque::new(),
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No webhook history file yet");
                return Ok(history);
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: HistoryFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        for url in file.webhooks {
            history.push(url);
        }
        Ok(history)
    }

    /// Record `url` as most recent without touching disk.
    ///
    /// An existing entry is moved to the end; the oldest entry is evicted
    /// once the cap is reached. Blank URLs are ignored.
    pub fn push(&mut self, url: impl Into<String>) {
        let url = url.into();
        let url = url.trim();
        if url.is_empty() {
            return;
        }

        self.webhooks.retain(|existing| existing != url);
        self.webhooks.push_back(url.to_string());
        while self.webhooks.len() > MAX_HISTORY {
            self.webhooks.pop_front();
        }
    }

    /// Push `url` and persist
    pub fn record(&mut self, url: impl Into<String>) -> Result<(), ConfigError> {
        self.push(url);
        self.save()
    }

    /// Remove every entry and persist
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        self.webhooks.clear();
        self.save()
    }

    /// Write the history file, creating parent directories as needed
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let file = HistoryFile {
            webhooks: self.webhooks.iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| ConfigError::Serialize {
            path: path.clone(),
            message: e.to_string(),
        })?;

        std::fs::write(path, json).map_err(write_err)?;
        debug!(path = %path.display(), entries = self.webhooks.len(), "Saved webhook history");
        Ok(())
    }

    /// Most recently used URL
    pub fn latest(&self) -> Option<&str> {
        self.webhooks.back().map(String::as_str)
    }

    /// Entries from oldest to most recent
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.webhooks.iter().map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.webhooks.iter().any(|existing| existing == url)
    }

    pub fn len(&self) -> usize {
        self.webhooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.webhooks.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn url(i: usize) -> String {
        format!("https://discord.com/api/webhooks/{i}/token")
    }

    #[test]
    fn test_history_never_exceeds_cap() {
        let mut history = WebhookHistory::in_memory();
        for i in 0..MAX_HISTORY {
            history.push(url(i));
        }
        assert_eq!(history.len(), MAX_HISTORY);

        history.push(url(MAX_HISTORY));
        assert_eq!(history.len(), MAX_HISTORY);
        assert!(!history.contains(&url(0)));
        assert_eq!(history.iter().next(), Some(url(1).as_str()));
        assert_eq!(history.latest(), Some(url(MAX_HISTORY).as_str()));
    }

    #[test]
    fn test_reused_url_moves_to_end() {
        let mut history = WebhookHistory::in_memory();
        history.push(url(1));
        history.push(url(2));
        history.push(url(1));

        let entries: Vec<&str> = history.iter().collect();
        assert_eq!(entries, vec![url(2).as_str(), url(1).as_str()]);
    }

    #[test]
    fn test_blank_url_ignored() {
        let mut history = WebhookHistory::in_memory();
        history.push("  ");
        assert!(history.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let history = WebhookHistory::load(dir.path().join("webhooks.json"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("webhooks.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            WebhookHistory::try_load(&path),
            Err(ConfigError::ParseError { .. })
        ));
        let history = WebhookHistory::load(&path);
        assert!(history.is_empty());
        assert_eq!(history.path(), Some(path.as_path()));
    }

    #[test]
    fn test_record_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("webhooks.json");

        let mut history = WebhookHistory::load(&path);
        history.record(url(1)).unwrap();
        history.record(url(2)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["webhooks"], serde_json::json!([url(1), url(2)]));

        let reloaded = WebhookHistory::load(&path);
        assert_eq!(reloaded.iter().collect::<Vec<_>>(), history.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_oversized_file_keeps_most_recent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("webhooks.json");
        let urls: Vec<String> = (0..15).map(url).collect();
        std::fs::write(&path, serde_json::json!({ "webhooks": urls }).to_string()).unwrap();

        let history = WebhookHistory::load(&path);
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.iter().next(), Some(url(5).as_str()));
        assert_eq!(history.latest(), Some(url(14).as_str()));
    }

    #[test]
    fn test_clear_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("webhooks.json");
        let mut history = WebhookHistory::load(&path);
        history.record(url(1)).unwrap();
        history.clear().unwrap();

        assert!(WebhookHistory::load(&path).is_empty());
    }

    #[test]
    fn test_unwritable_path_keeps_entry_in_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut history = WebhookHistory::load(blocker.join("webhooks.json"));
        let err = history.record(url(1)).unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }), "{err}");
        assert_eq!(history.latest(), Some(url(1).as_str()));
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut history = WebhookHistory::in_memory();
        assert!(history.record(url(1)).is_ok());
        assert!(history.path().is_none());
    }
}
