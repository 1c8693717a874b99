use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Writes a rendered document to `path` atomically.
///
/// The content goes to a sibling temporary file, is synced, then renamed
/// over the destination. On failure the temporary file is removed and the
/// destination is left untouched.
pub fn export_to_file(content: &str, path: &Path) -> Result<()> {
    let temp_path = sibling_temp_path(path);
    let result = write_synced(&temp_path, content).and_then(|()| {
        std::fs::rename(&temp_path, path).with_context(|| {
            format!(
                "Failed to move '{}' into place at '{}'",
                temp_path.display(),
                path.display()
            )
        })
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote feed");
    Ok(())
}

/// `feed.xml` becomes `feed.tmp.<nanos>` in the same directory.
fn sibling_temp_path(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    path.with_extension(format!("tmp.{nanos:016x}"))
}

fn write_synced(temp_path: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .with_context(|| format!("Failed to create temporary file '{}'", temp_path.display()))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write temporary file '{}'", temp_path.display()))
}
