// Draft persistence layer.
// Drafts live in a string key-value store keyed by list id, one slot per list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::settings::Settings;
use crate::state::{Draft, RankedList, StoredDraft};

/// Durable string-keyed, string-valued storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// One JSON file per key inside `dir`.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("tmp");

        fs::create_dir_all(&self.dir).await?;

        // Atomic write: tmp + rename
        fs::write(&tmp_path, value).await?;
        fs::rename(tmp_path, path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// File-backed drafts under the configured draft directory of `data_dir`.
    pub fn for_data_dir(settings: &Settings, data_dir: &Path) -> Self {
        Self::new(Arc::new(FileKeyValueStore::new(settings.draft_dir(data_dir))))
    }

    /// Stores `snapshot` as the draft for `list_id`, replacing any older draft.
    pub async fn save_draft(&self, list_id: &str, snapshot: &RankedList) -> Result<Draft> {
        let stored = StoredDraft {
            data: snapshot.clone(),
            date: Utc::now(),
        };
        let json = serde_json::to_string(&stored)?;
        self.store.set(list_id, &json).await?;

        log::info!("[Drafts] Saved draft for list {} ({} entries)", list_id, snapshot.entries.len());

        Ok(Draft {
            list_id: list_id.to_string(),
            snapshot: stored.data,
            saved_at: stored.date,
        })
    }

    /// Missing, unreadable and malformed drafts all come back as `None`.
    pub async fn load_draft(&self, list_id: &str) -> Option<Draft> {
        let raw = match self.store.get(list_id).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("[Drafts] Failed to read draft for list {}: {}", list_id, e);
                return None;
            }
        };

        match serde_json::from_str::<StoredDraft>(&raw) {
            Ok(stored) => Some(Draft {
                list_id: list_id.to_string(),
                snapshot: stored.data,
                saved_at: stored.date,
            }),
            Err(e) => {
                log::warn!("[Drafts] Ignoring malformed draft for list {}: {}", list_id, e);
                None
            }
        }
    }

    pub async fn clear_draft(&self, list_id: &str) -> Result<()> {
        self.store.remove(list_id).await?;
        log::debug!("[Drafts] Cleared draft for list {}", list_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sample_list;
    use tempfile::tempdir;

    fn memory_drafts() -> DraftStore {
        DraftStore::new(Arc::new(MemoryKeyValueStore::new()))
    }

    #[tokio::test]
    async fn test_save_and_load_draft() {
        let drafts = memory_drafts();
        let list = sample_list(&[3, 1, 2]);

        let saved = drafts.save_draft("list-1", &list).await.unwrap();
        let loaded = drafts.load_draft("list-1").await.expect("draft present");

        assert_eq!(loaded.list_id, "list-1");
        assert_eq!(loaded.snapshot.entry_ids(), vec![3, 1, 2]);
        assert_eq!(loaded.saved_at, saved.saved_at);
    }

    #[tokio::test]
    async fn test_missing_draft_is_none() {
        let drafts = memory_drafts();
        assert!(drafts.load_draft("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_new_draft_overwrites_old() {
        let drafts = memory_drafts();
        drafts.save_draft("list-1", &sample_list(&[1])).await.unwrap();
        drafts.save_draft("list-1", &sample_list(&[2, 1])).await.unwrap();

        let loaded = drafts.load_draft("list-1").await.unwrap();
        assert_eq!(loaded.snapshot.entry_ids(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_malformed_draft_is_treated_as_absent() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set("list-1", "{\"data\": 42}").await.unwrap();
        let drafts = DraftStore::new(kv.clone());
        assert!(drafts.load_draft("list-1").await.is_none());

        kv.set("list-1", "garbage").await.unwrap();
        assert!(drafts.load_draft("list-1").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_draft() {
        let drafts = memory_drafts();
        drafts.save_draft("list-1", &sample_list(&[1])).await.unwrap();
        drafts.clear_draft("list-1").await.unwrap();
        assert!(drafts.load_draft("list-1").await.is_none());
        // Clearing twice is fine
        drafts.clear_draft("list-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_stored_shape_has_data_and_date() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let drafts = DraftStore::new(kv.clone());
        drafts.save_draft("list-1", &sample_list(&[7])).await.unwrap();

        let raw = kv.get("list-1").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"]["entries"][0]["id"], 7);
        assert!(value["date"].is_string());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let kv = FileKeyValueStore::new(dir.path().join("drafts"));

        assert_eq!(kv.get("list/1").await.unwrap(), None);
        kv.set("list/1", "hello").await.unwrap();
        assert_eq!(kv.get("list/1").await.unwrap().as_deref(), Some("hello"));
        assert!(dir.path().join("drafts").join("list%2F1.json").exists());

        kv.remove("list/1").await.unwrap();
        assert_eq!(kv.get("list/1").await.unwrap(), None);
        kv.remove("list/1").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_backed_drafts() {
        let dir = tempdir().unwrap();
        let drafts = DraftStore::new(Arc::new(FileKeyValueStore::new(dir.path().to_path_buf())));
        drafts.save_draft("abc", &sample_list(&[1, 2])).await.unwrap();

        // A fresh store over the same directory sees the draft
        let reopened = DraftStore::new(Arc::new(FileKeyValueStore::new(dir.path().to_path_buf())));
        let loaded = reopened.load_draft("abc").await.unwrap();
        assert_eq!(loaded.snapshot.entry_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_drafts_in_configured_dir() {
        let dir = tempdir().unwrap();
        let settings = Settings::default();
        let drafts = DraftStore::for_data_dir(&settings, dir.path());
        drafts.save_draft("abc", &sample_list(&[4])).await.unwrap();
        assert!(dir.path().join("drafts").join("abc.json").exists());
    }
}
