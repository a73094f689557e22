// ABOUTME: Prebuilt zip archive holding the request handlers.
// ABOUTME: Loaded once per run and shared by all six function creations.

use snafu::{ResultExt, ensure};
use std::path::Path;
use std::sync::Arc;

use super::error::{InstallError, InvalidPackageSnafu, PackageSnafu};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, Clone)]
pub struct HandlerPackage {
    bytes: Arc<[u8]>,
}

impl HandlerPackage {
    /// Wrap bytes that are already in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Read the archive at `path`, rejecting anything that is not a zip file.
    pub async fn load(path: &Path) -> Result<Self, InstallError> {
        let bytes = tokio::fs::read(path).await.context(PackageSnafu { path })?;
        ensure!(bytes.starts_with(ZIP_MAGIC), InvalidPackageSnafu { path });
        tracing::debug!(path = %path.display(), size = bytes.len(), "loaded handler package");
        Ok(Self::from_bytes(bytes))
    }

    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::InstallErrorKind;

    #[tokio::test]
    async fn missing_archive_names_path() {
        let err = HandlerPackage::load(Path::new("/nonexistent/handlers.zip"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), InstallErrorKind::LocalInput);
        assert!(err.to_string().contains("/nonexistent/handlers.zip"));
    }

    #[tokio::test]
    async fn non_zip_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handlers.zip");
        std::fs::write(&path, b"not a zip").unwrap();
        let err = HandlerPackage::load(&path).await.unwrap_err();
        assert!(matches!(err, InstallError::InvalidPackage { .. }));
    }

    #[tokio::test]
    async fn zip_header_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handlers.zip");
        std::fs::write(&path, b"PK\x03\x04rest-of-archive").unwrap();
        let package = HandlerPackage::load(&path).await.unwrap();
        assert_eq!(package.len(), 19);
    }
}
