//! Durable storage for the member document
//!
//! The whole membership map lives in a single JSON file. Writes go to a
//! sibling `.tmp` file which is synced and then renamed over the original, so a
//! reader or a crash never observes a half-written document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use super::config::RegistryConfig;
use super::error::RegistryError;
use super::member::{MemberId, MemberRecord};

/// The persisted document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Members keyed by id
    #[serde(default)]
    pub chats: BTreeMap<MemberId, MemberRecord>,
}

impl RegistryDocument {
    /// Number of members in the document
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether the document has no members
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

/// File-backed store for the registry document
#[derive(Debug, Clone)]
pub struct RegistryStore {
    config: RegistryConfig,
}

impl RegistryStore {
    /// Create a store; nothing is touched on disk until `load` or `flush`
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read the document from disk
    ///
    /// A missing file yields an empty document. An unparsable file is logged,
    /// optionally renamed aside, and also yields an empty document. Only a
    /// genuine I/O failure is returned as an error.
    pub async fn load(&self) -> Result<RegistryDocument, RegistryError> {
        let path = &self.config.path;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RegistryError::write(parent, e))?;
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No subscription file, starting empty");
                return Ok(RegistryDocument::default());
            }
            Err(e) => return Err(RegistryError::read(path, e)),
        };

        match serde_json::from_slice::<RegistryDocument>(&bytes) {
            Ok(document) => {
                tracing::info!(
                    path = %path.display(),
                    members = document.len(),
                    "Loaded subscriptions"
                );
                Ok(document)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Subscription file is corrupt, starting with an empty list"
                );
                if self.config.quarantine_corrupt {
                    self.quarantine().await;
                }
                Ok(RegistryDocument::default())
            }
        }
    }

    /// Atomically replace the on-disk document
    pub async fn flush(&self, document: &RegistryDocument) -> Result<(), RegistryError> {
        let path = &self.config.path;
        let temp_path = self.config.temp_path();

        let mut bytes = if self.config.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        bytes.push(b'\n');

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| RegistryError::write(&temp_path, e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| RegistryError::write(&temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| RegistryError::write(&temp_path, e))?;
        drop(file);

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| RegistryError::write(path, e))?;

        tracing::trace!(path = %path.display(), members = document.len(), "Flushed subscriptions");
        Ok(())
    }

    /// Move a corrupt document out of the way so its bytes survive
    async fn quarantine(&self) {
        let path = &self.config.path;
        let aside = quarantine_path(path);

        match tokio::fs::rename(path, &aside).await {
            Ok(()) => tracing::warn!(
                path = %path.display(),
                moved_to = %aside.display(),
                "Corrupt subscription file moved aside"
            ),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to move corrupt subscription file aside"
            ),
        }
    }
}

fn quarantine_path(path: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut name = path.as_os_str().to_owned();
    name.push(format!(".corrupt-{}", secs));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::member::ChatKind;

    fn store_in(dir: &tempfile::TempDir) -> RegistryStore {
        RegistryStore::new(RegistryConfig::with_path(dir.path().join("subscriptions.json")))
    }

    fn record(title: &str, kind: ChatKind) -> MemberRecord {
        MemberRecord {
            title: title.to_string(),
            kind,
        }
    }

    fn entries(dir: &tempfile::TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let document = store.load().await.unwrap();
        assert!(document.is_empty());
    }

    #[tokio::test]
    async fn test_load_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/subscriptions.json");
        let store = RegistryStore::new(RegistryConfig::with_path(&path));

        store.load().await.unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[tokio::test]
    async fn test_flush_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut document = RegistryDocument::default();
        document
            .chats
            .insert(MemberId(-100), record("Team Alpha", ChatKind::Supergroup));
        document
            .chats
            .insert(MemberId(-200), record("Beta Group", ChatKind::Channel));
        store.flush(&document).await.unwrap();

        let loaded = store_in(&dir).load().await.unwrap();
        assert_eq!(loaded, document);

        // Temp file is renamed away
        assert_eq!(entries(&dir), vec!["subscriptions.json".to_string()]);
    }

    #[tokio::test]
    async fn test_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut document = RegistryDocument::default();
        document
            .chats
            .insert(MemberId(-42), record("Équipe", ChatKind::Group));
        store.flush(&document).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("Équipe"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["chats"]["-42"]["title"], "Équipe");
        assert_eq!(value["chats"]["-42"]["type"], "group");
    }

    #[tokio::test]
    async fn test_load_document_without_chats_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{}").unwrap();

        let document = store.load().await.unwrap();
        assert!(document.is_empty());
        assert_eq!(entries(&dir), vec!["subscriptions.json".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        let document = store.load().await.unwrap();
        assert!(document.is_empty());

        let names = entries(&dir);
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("subscriptions.json.corrupt-"));

        let kept = std::fs::read_to_string(dir.path().join(&names[0])).unwrap();
        assert_eq!(kept, "{ not json");
    }

    #[tokio::test]
    async fn test_corrupt_file_left_in_place_without_quarantine() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegistryConfig::with_path(dir.path().join("subscriptions.json"))
            .quarantine_corrupt(false);
        let store = RegistryStore::new(config);
        std::fs::write(store.path(), r#"{"chats": []}"#).unwrap();

        let document = store.load().await.unwrap();
        assert!(document.is_empty());
        assert_eq!(entries(&dir), vec!["subscriptions.json".to_string()]);
    }

    #[tokio::test]
    async fn test_flush_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(RegistryConfig::with_path(
            dir.path().join("gone/subscriptions.json"),
        ));

        let result = store.flush(&RegistryDocument::default()).await;
        assert!(matches!(result, Err(RegistryError::Write { .. })));
    }
}
