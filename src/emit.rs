//! Writing the serialized schema to its destination.

use crate::error::Result;
use crate::schema::schema_digest;
use crate::types::ApiSchema;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Where the schema is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// Serializes `schema` once and writes it to `target`.
///
/// Returns the xxh3 digest of the bytes written.
pub async fn write_schema(
    schema: &ApiSchema,
    target: &OutputTarget,
    pretty: bool,
) -> Result<String> {
    let json = schema.to_json(pretty).context("Failed to serialize schema")?;
    let digest = schema_digest(json.as_bytes());

    match target {
        OutputTarget::Stdout => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(json.as_bytes())
                .await
                .context("Failed to write schema to stdout")?;
            stdout.flush().await.context("Failed to flush stdout")?;
        }
        OutputTarget::File(path) => write_file(path, &json).await?,
    }

    info!(
        "Wrote {} groups, {} methods ({} bytes, xxh3 {})",
        schema.group_count(),
        schema.method_count(),
        json.len(),
        digest
    );
    Ok(digest)
}

/// Writes to disk, creating parent directories if needed.
async fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write schema to {}", path.display()))
}
