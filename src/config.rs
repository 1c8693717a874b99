//! Configuration file parser for ~/.config/feedsmith/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos. Command-line flags override every key.
use clap::ValueEnum;
use serde::Deserialize;
use std::cmp::Ordering;
use std::path::Path;
use thiserror::Error;

use crate::export::{ExportOptions, FeedFormat};
use crate::feed::{Feed, Item, Timestamp};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0} bytes (max 1 MB)")]
    TooLarge(u64),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// How items are ordered before projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the order of the definition file.
    #[default]
    None,
    /// Most recent first, by created (falling back to updated).
    Newest,
    /// Oldest first, by created (falling back to updated).
    Oldest,
    /// Alphabetical by title.
    Title,
}

impl SortOrder {
    /// Reorders `feed.items` in place. Items without any timestamp sort
    /// after dated ones for both date orders.
    pub fn apply(self, feed: &mut Feed) {
        match self {
            SortOrder::None => {}
            SortOrder::Newest => feed.sort(|a, b| by_date(a, b, true)),
            SortOrder::Oldest => feed.sort(|a, b| by_date(a, b, false)),
            SortOrder::Title => feed.sort(|a, b| a.title.cmp(&b.title)),
        }
    }
}

fn item_date(item: &Item) -> Timestamp {
    item.created.or(item.updated)
}

fn by_date(a: &Item, b: &Item, newest_first: bool) -> Ordering {
    match (item_date(a), item_date(b)) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format when `--format` is not given.
    pub format: FeedFormat,

    /// Item ordering applied before projection.
    pub sort: SortOrder,

    /// Spaces per nesting level in XML and JSON output. 0 = compact.
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: FeedFormat::Atom,
            sort: SortOrder::None,
            indent: 2,
        }
    }
}

/// Top-level keys [`Config`] understands.
const KNOWN_KEYS: [&str; 3] = ["format", "sort", "indent"];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// A missing or blank file gives the defaults. Unknown keys are accepted
    /// with a warning; a wrongly typed known key is a parse error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(size));
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)?;
        warn_unknown_keys(&content);
        tracing::info!(path = %path.display(), format = ?config.format, "Loaded configuration");
        Ok(config)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            indent: self.indent,
        }
    }
}

fn warn_unknown_keys(content: &str) {
    let Ok(table) = content.parse::<toml::Table>() else {
        return;
    };
    for key in table.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        tracing::warn!(key = %key, "Unknown key in config file, ignoring");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format, FeedFormat::Atom);
        assert_eq!(config.sort, SortOrder::None);
        assert_eq!(config.indent, 2);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feedsmith_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let path = write_config("feedsmith_config_test_empty", "   \n  ");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("feedsmith_config_test_partial", "format = \"rss\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.format, FeedFormat::Rss);
        assert_eq!(config.indent, 2);
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
format = "json"
sort = "newest"
indent = 4
"#;
        let path = write_config("feedsmith_config_test_full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.format, FeedFormat::Json);
        assert_eq!(config.sort, SortOrder::Newest);
        assert_eq!(config.export_options(), ExportOptions { indent: 4 });
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("feedsmith_config_test_invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_format_returns_error() {
        let path = write_config("feedsmith_config_test_bad_format", "format = \"opml\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config(
            "feedsmith_config_test_unknown",
            "indent = 0\ntotally_fake_key = true\n",
        );
        assert_eq!(Config::load(&path).unwrap().indent, 0);
        cleanup(&path);
    }

    #[test]
    fn test_wrongly_typed_key_returns_error() {
        let path = write_config("feedsmith_config_test_bad_indent", "indent = \"wide\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        cleanup(&path);
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("feedsmith_config_test_too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(1_048_577)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }

    fn dated(title: &str, created: Option<&str>) -> Item {
        Item {
            title: title.to_string(),
            created: created.map(|s| DateTime::parse_from_rfc3339(s).unwrap()),
            ..Item::default()
        }
    }

    fn titles(feed: &Feed) -> Vec<&str> {
        feed.items.iter().map(|i| i.title.as_str()).collect()
    }

    fn unsorted() -> Feed {
        Feed {
            items: vec![
                dated("b", Some("2020-01-02T00:00:00Z")),
                dated("undated", None),
                dated("c", Some("2021-01-02T00:00:00Z")),
                dated("a", Some("2019-01-02T00:00:00Z")),
            ],
            ..Feed::default()
        }
    }

    #[test]
    fn test_sort_newest_puts_undated_last() {
        let mut feed = unsorted();
        SortOrder::Newest.apply(&mut feed);
        assert_eq!(titles(&feed), ["c", "b", "a", "undated"]);
    }

    #[test]
    fn test_sort_oldest_puts_undated_last() {
        let mut feed = unsorted();
        SortOrder::Oldest.apply(&mut feed);
        assert_eq!(titles(&feed), ["a", "b", "c", "undated"]);
    }

    #[test]
    fn test_sort_title_and_none() {
        let mut feed = unsorted();
        SortOrder::None.apply(&mut feed);
        assert_eq!(titles(&feed), ["b", "undated", "c", "a"]);
        SortOrder::Title.apply(&mut feed);
        assert_eq!(titles(&feed), ["a", "b", "c", "undated"]);
    }
}
