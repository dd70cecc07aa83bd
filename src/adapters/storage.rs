use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.full_path(path))?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn create_dir(&self, path: &str, parents: bool) -> Result<()> {
        let full_path = self.full_path(path);
        if full_path.is_dir() {
            return Ok(());
        }

        if parents {
            fs::create_dir_all(&full_path)?;
        } else {
            fs::create_dir(&full_path)?;
        }
        tracing::debug!("Created directory {}", full_path.display());
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        fs::rename(self.full_path(from), self.full_path(to))?;
        Ok(())
    }

    async fn import_file(&self, source: &Path, to: &str) -> Result<()> {
        let bytes = fs::copy(source, self.full_path(to))?;
        tracing::debug!("Copied {} ({} bytes) to {}", source.display(), bytes, to);
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        fs::remove_file(self.full_path(path))?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.full_path(path).exists()
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.full_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> LocalStorage {
        LocalStorage::new(dir.path().to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_write_rename_remove() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        storage.write_file("page.html", b"<html></html>").await.unwrap();
        storage.create_dir("2024-Q1", false).await.unwrap();
        storage.rename("page.html", "2024-Q1/page.html").await.unwrap();

        assert!(!storage.exists("page.html").await);
        assert_eq!(
            storage.read_file("2024-Q1/page.html").await.unwrap(),
            b"<html></html>"
        );

        storage.remove_file("2024-Q1/page.html").await.unwrap();
        assert!(!storage.exists("2024-Q1/page.html").await);
    }

    #[tokio::test]
    async fn test_create_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        storage.create_dir("2024-Q2", false).await.unwrap();
        storage.create_dir("2024-Q2", false).await.unwrap();
        assert!(dir.path().join("2024-Q2").is_dir());
    }

    #[tokio::test]
    async fn test_create_dir_without_parents_fails_on_missing_parent() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        assert!(storage.create_dir("missing/2024-Q4", false).await.is_err());
        storage.create_dir("missing/2024-Q4", true).await.unwrap();
        assert!(dir.path().join("missing/2024-Q4").is_dir());
    }

    #[tokio::test]
    async fn test_import_file() {
        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("Template.xlsx");
        std::fs::write(&source, b"xlsx bytes").unwrap();

        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        storage
            .import_file(&source, "Template-2024-Q1.xlsx")
            .await
            .unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("Template-2024-Q1.xlsx")).unwrap(),
            b"xlsx bytes"
        );
    }
}
