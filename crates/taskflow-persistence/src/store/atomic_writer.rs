use std::path::Path;
use taskflow_core::TaskflowResult;
use tokio::fs;

/// Writes files through a temporary sibling and a rename, so a reader never
/// sees a half-written scope.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> TaskflowResult<()> {
        // Same directory keeps the rename on one filesystem
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).await?;
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;

        fs::write(temp_file.path(), data).await?;
        temp_file
            .persist(path)
            .map_err(|e| taskflow_core::TaskflowError::Io(e.error))?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    /// Read a file, or `None` when it does not exist.
    pub async fn read_optional(path: &Path) -> TaskflowResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove_if_exists(path: &Path) -> TaskflowResult<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
