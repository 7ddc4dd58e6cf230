use crate::domain::ports::{ArtifactSink, DocumentSource};
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// 本機檔案系統，相對路徑以 `base_path` 為基準
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// 以目前工作目錄為基準
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

impl DocumentSource for LocalStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = fs::read(full_path)?;
        Ok(data)
    }
}

impl ArtifactSink for LocalStorage {
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&full_path, data)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage
            .write_file(Path::new("nested/doc.xml"), b"<doc/>")
            .unwrap();
        let data = storage.read_file(Path::new("nested/doc.xml")).unwrap();

        assert_eq!(data, b"<doc/>");
        assert!(temp_dir.path().join("nested/doc.xml").exists());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = storage
            .read_file(Path::new("missing.xml"))
            .unwrap_err();
        assert!(matches!(err, crate::utils::error::ToolError::IoError(_)));
    }

    #[test]
    fn test_read_returns_raw_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("latin1.xml"), b"<a>caf\xe9</a>").unwrap();

        let data = storage.read_file(Path::new("latin1.xml")).unwrap();
        assert_eq!(data, b"<a>caf\xe9</a>");
    }
}
