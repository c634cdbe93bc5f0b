//! Dataset output - JSON and NDJSON files in one directory

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{CollectedFile, DomainError};

/// Writes dataset files into an output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Create the output directory if missing
    pub async fn ensure_dir(&self) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::io(format!(
                "Failed to create output directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    /// Save `data` as pretty-printed JSON
    pub async fn save_json<T: Serialize + ?Sized>(
        &self,
        data: &T,
        filename: &str,
    ) -> Result<PathBuf, DomainError> {
        let body = serde_json::to_vec_pretty(data)?;
        self.write(filename, body).await
    }

    /// Save records as NDJSON (one compact JSON document per line)
    pub async fn save_ndjson<T, I>(
        &self,
        records: I,
        filename: &str,
    ) -> Result<PathBuf, DomainError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let mut body = Vec::new();
        for record in records {
            serde_json::to_writer(&mut body, &record)?;
            body.push(b'\n');
        }
        self.write(filename, body).await
    }

    /// Regular files in the output directory, sorted by name
    pub async fn list_files(&self) -> Result<Vec<CollectedFile>, DomainError> {
        let mut files = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            files.push(CollectedFile::new(
                entry.file_name().to_string_lossy(),
                metadata.len(),
            ));
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    async fn write(&self, filename: &str, body: Vec<u8>) -> Result<PathBuf, DomainError> {
        let path = self.path(filename);
        debug!("Writing {} bytes to {}", body.len(), path.display());

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| DomainError::io(format!("Failed to write {}: {}", path.display(), e)))?;

        info!("Saved: {}", path.display());
        Ok(path)
    }
}
