//! Loading feed definition files.
//!
//! A definition is a serialized [`Feed`]: JSON when the file ends in
//! `.json`, TOML otherwise. Timestamps are RFC 3339 strings in both, e.g.
//! `created = "2020-01-02T00:00:00Z"`.

use std::path::Path;
use thiserror::Error;

use crate::feed::Feed;

/// Maximum definition file size (16 MB).
const MAX_SOURCE_SIZE: u64 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read feed definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML feed definition: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON feed definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed definition too large: {0} bytes")]
    TooLarge(u64),
}

/// Definition file syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSyntax {
    Toml,
    Json,
}

impl SourceSyntax {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceSyntax::Json,
            _ => SourceSyntax::Toml,
        }
    }
}

/// Parses a definition from a string.
pub fn parse_feed(content: &str, syntax: SourceSyntax) -> Result<Feed, SourceError> {
    let feed = match syntax {
        SourceSyntax::Toml => toml::from_str(content)?,
        SourceSyntax::Json => serde_json::from_str(content)?,
    };
    Ok(feed)
}

/// Reads and parses a definition file.
pub async fn load_feed(path: &Path) -> Result<Feed, SourceError> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > MAX_SOURCE_SIZE {
        return Err(SourceError::TooLarge(meta.len()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let feed = parse_feed(&content, SourceSyntax::from_path(path))?;
    tracing::info!(
        path = %path.display(),
        title = %feed.title,
        items = feed.items.len(),
        "Loaded feed definition"
    );
    Ok(feed)
}
