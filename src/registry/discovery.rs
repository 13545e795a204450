//! Discovery of registry files below a directory.

use crate::error::Result;
use anyhow::Context;
use ignore::WalkBuilder;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions recognized as registry sources.
const REGISTRY_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Recursively collects `.json` and `.toml` files under `root`, sorted by path.
///
/// Ignore files (`.gitignore`, `.ignore`) and hidden entries are honoured, so
/// a registry directory can live inside a repository next to build output.
/// Symlinked files are included. `exclude` names a file to leave out, such as
/// the schema being written into the same directory. Any walk error fails the
/// whole discovery.
pub async fn discover_registry_files(
    root: &Path,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let root = root.to_path_buf();
    // A file that does not exist yet cannot be picked up by the walk
    let exclude = exclude.and_then(|path| std::fs::canonicalize(path).ok());

    tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkBuilder::new(&root).build() {
            let entry = entry
                .with_context(|| format!("Failed to walk registry directory {}", root.display()))?;
            let path = entry.into_path();

            if !is_registry_file(&path) {
                continue;
            }
            // Follows symlinks, so a dangling link is an error
            let metadata = std::fs::metadata(&path)
                .with_context(|| format!("Failed to read registry file {}", path.display()))?;
            if !metadata.is_file() {
                continue;
            }
            if let Some(ref exclude) = exclude
                && std::fs::canonicalize(&path).is_ok_and(|canonical| canonical == *exclude)
            {
                debug!("Skipping output file {}", path.display());
                continue;
            }
            files.push(path);
        }

        // Walk order is filesystem-dependent
        files.sort();
        Ok(files)
    })
    .await
    .context("Task panicked")?
}

fn is_registry_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| REGISTRY_EXTENSIONS.contains(&ext))
}

/// Expand tilde (`~`) in paths to the user's home directory.
///
/// Examples:
/// - `~/registry/conduit.json` becomes `/home/user/registry/conduit.json`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
