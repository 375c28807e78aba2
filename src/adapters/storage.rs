use crate::core::Storage;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One JSON file per key under `base_path`.
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

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(file_name_for(key))
    }
}

/// 將 key 轉成安全的檔名，例如 `@RocketShoes:cart` -> `_RocketShoes_cart.json`
pub fn file_name_for(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    name.push_str(".json");
    name
}

impl Storage for LocalStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.path_for(key);
        match fs::read(&full_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let full_path = self.path_for(key);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // 先寫入暫存檔再 rename，避免中途失敗留下半個檔案
        let temp_path = full_path.with_extension("json.tmp");
        let mut temp_file = File::create(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        fs::rename(&temp_path, &full_path)?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

/// In-process storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, key: &str, data: &[u8]) {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), data.to_vec());
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.lock().await;
        entries.get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key).await)
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        self.insert(key, data).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_for_sanitizes_key() {
        assert_eq!(file_name_for("@RocketShoes:cart"), "_RocketShoes_cart.json");
        assert_eq!(file_name_for("cart-v2"), "cart-v2.json");
        assert_eq!(file_name_for("../escape"), "___escape.json");
    }

    #[tokio::test]
    async fn test_local_storage_missing_key_reads_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert_eq!(storage.read("@RocketShoes:cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_local_storage_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested"));

        storage.write("@RocketShoes:cart", b"[]").await.unwrap();
        storage
            .write("@RocketShoes:cart", br#"[{"id":1}]"#)
            .await
            .unwrap();

        let data = storage.read("@RocketShoes:cart").await.unwrap();
        assert_eq!(data.as_deref(), Some(br#"[{"id":1}]"#.as_slice()));

        let path = storage.path_for("@RocketShoes:cart");
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_local_storage_survives_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        LocalStorage::new(temp_dir.path())
            .write("cart", b"[1,2,3]")
            .await
            .unwrap();

        let reopened = LocalStorage::new(temp_dir.path());
        assert_eq!(
            reopened.read("cart").await.unwrap(),
            Some(b"[1,2,3]".to_vec())
        );
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();

        tokio_test::block_on(async {
            tokio_test::assert_ok!(clone.write("cart", b"[]").await);

            assert_eq!(storage.read("cart").await.unwrap(), Some(b"[]".to_vec()));
            assert_eq!(storage.read("other").await.unwrap(), None);
        });
    }

    #[test]
    fn test_local_storage_overwrite_replaces_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let stored = tokio_test::block_on(async {
            tokio_test::assert_ok!(storage.write("cart", b"[1]").await);
            tokio_test::assert_ok!(storage.write("cart", b"[]").await);
            storage.read("cart").await
        });

        assert_eq!(stored.unwrap(), Some(b"[]".to_vec()));
    }
}
