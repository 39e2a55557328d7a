use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use super::{CredentialStore, NoteStore};
use crate::error::{JotError, Result};
use crate::model::{CredentialTable, Note, NoteTable};

const USERS_FILENAME: &str = "users.json";
const NOTES_FILENAME: &str = "notes.json";

/// One JSON table file plus the mutex that serializes access to it.
///
/// The lock must be held across the entire load-mutate-store cycle of every
/// operation, not just the individual reads and writes: the whole document
/// is rewritten on each mutation, so an unserialized concurrent writer
/// would clobber the table (last writer wins).
struct JsonTable {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonTable {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Read and parse the table. A missing file is an empty table; a
    /// corrupt or unreadable file also degrades to an empty table, but with
    /// a warning, since it may mask real data loss.
    async fn load<T: DeserializeOwned + Default>(&self) -> T {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!("failed to read {}: {e}; treating as empty", self.path.display());
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                warn!(
                    "corrupt table {}: {e}; treating as empty",
                    self.path.display()
                );
                T::default()
            }
        }
    }

    /// Rewrite the whole table. Write faults propagate to the caller.
    async fn store<T: Serialize>(&self, table: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let raw = serde_json::to_string_pretty(table)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }
}

/// File-backed credential store (`users.json`).
pub struct FileCredentialStore {
    table: JsonTable,
}

impl FileCredentialStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            table: JsonTable::new(data_dir.as_ref().join(USERS_FILENAME)),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<String>> {
        let _guard = self.table.lock.lock().await;
        let users: CredentialTable = self.table.load().await;
        Ok(users.get(username).cloned())
    }

    async fn register(&self, username: &str, password: &str) -> Result<()> {
        let _guard = self.table.lock.lock().await;
        let mut users: CredentialTable = self.table.load().await;

        if users.contains_key(username) {
            return Err(JotError::UserExists);
        }

        users.insert(username.to_string(), password.to_string());
        self.table.store(&users).await
    }
}

/// File-backed note store (`notes.json`).
pub struct FileNoteStore {
    table: JsonTable,
}

impl FileNoteStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            table: JsonTable::new(data_dir.as_ref().join(NOTES_FILENAME)),
        }
    }
}

impl NoteStore for FileNoteStore {
    async fn list(&self, username: &str) -> Result<Vec<Note>> {
        let _guard = self.table.lock.lock().await;
        let notes: NoteTable = self.table.load().await;
        Ok(notes.get(username).cloned().unwrap_or_default())
    }

    async fn append(&self, username: &str, note: Note) -> Result<Vec<Note>> {
        let _guard = self.table.lock.lock().await;
        let mut notes: NoteTable = self.table.load().await;

        let user_notes = notes.entry(username.to_string()).or_default();
        user_notes.push(note);
        let updated = user_notes.clone();

        self.table.store(&notes).await?;
        Ok(updated)
    }

    async fn delete(&self, username: &str, index: usize) -> Result<Note> {
        let _guard = self.table.lock.lock().await;
        let mut notes: NoteTable = self.table.load().await;

        let user_notes = notes.get_mut(username).ok_or(JotError::NoteNotFound)?;
        if index >= user_notes.len() {
            return Err(JotError::NoteNotFound);
        }

        let removed = user_notes.remove(index);
        self.table.store(&notes).await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(i: usize) -> Note {
        Note::new(format!("Note {i}"), format!("Content {i}"))
    }

    #[tokio::test]
    async fn register_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());

        store.register("alice", "secret1").await.unwrap();
        assert_eq!(
            store.lookup("alice").await.unwrap(),
            Some("secret1".to_string())
        );
        assert_eq!(store.lookup("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_register_leaves_table_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());

        store.register("alice", "secret1").await.unwrap();
        let err = store.register("alice", "other").await.unwrap_err();
        assert!(matches!(err, JotError::UserExists));

        assert_eq!(
            store.lookup("alice").await.unwrap(),
            Some("secret1".to_string())
        );
    }

    #[tokio::test]
    async fn credentials_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        FileCredentialStore::new(dir.path())
            .register("alice", "secret1")
            .await
            .unwrap();

        let reopened = FileCredentialStore::new(dir.path());
        assert_eq!(
            reopened.lookup("alice").await.unwrap(),
            Some("secret1".to_string())
        );
    }

    #[tokio::test]
    async fn list_returns_notes_in_append_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileNoteStore::new(dir.path());

        for i in 1..=5 {
            store.append("alice", note(i)).await.unwrap();
        }

        let listed = store.list("alice").await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Note 1", "Note 2", "Note 3", "Note 4", "Note 5"]);
    }

    #[tokio::test]
    async fn list_is_empty_for_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileNoteStore::new(dir.path());

        assert!(store.list("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_delete_at_zero_empties_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileNoteStore::new(dir.path());

        for i in 1..=3 {
            store.append("alice", note(i)).await.unwrap();
        }

        for i in 1..=3 {
            let removed = store.delete("alice", 0).await.unwrap();
            assert_eq!(removed.title, format!("Note {i}"));
        }

        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_shifts_later_indices_down() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileNoteStore::new(dir.path());

        for i in 1..=3 {
            store.append("alice", note(i)).await.unwrap();
        }

        let removed = store.delete("alice", 1).await.unwrap();
        assert_eq!(removed.title, "Note 2");

        let listed = store.list("alice").await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Note 1", "Note 3"]);
    }

    #[tokio::test]
    async fn out_of_range_delete_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileNoteStore::new(dir.path());

        store.append("alice", note(1)).await.unwrap();
        store.append("alice", note(2)).await.unwrap();

        let err = store.delete("alice", 5).await.unwrap_err();
        assert!(matches!(err, JotError::NoteNotFound));

        let err = store.delete("nobody", 0).await.unwrap_err();
        assert!(matches!(err, JotError::NoteNotFound));

        assert_eq!(store.list("alice").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_and_corrupt_files_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileNoteStore::new(dir.path());
        assert!(store.list("alice").await.unwrap().is_empty());

        std::fs::write(dir.path().join(NOTES_FILENAME), "{not json").unwrap();
        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_roundtrip_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileNoteStore::new(dir.path());

        store.append("alice", note(1)).await.unwrap();
        store.append("bob", note(2)).await.unwrap();

        let path = dir.path().join(NOTES_FILENAME);
        let before = std::fs::read_to_string(&path).unwrap();

        // store(load()) must not change the content
        let table: NoteTable = store.table.load().await;
        store.table.store(&table).await.unwrap();

        let after = std::fs::read_to_string(&path).unwrap();
        let reloaded_before: NoteTable = serde_json::from_str(&before).unwrap();
        let reloaded_after: NoteTable = serde_json::from_str(&after).unwrap();
        assert_eq!(reloaded_before, reloaded_after);
    }

    #[tokio::test]
    async fn concurrent_appends_for_different_users_both_land() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileNoteStore::new(dir.path()));

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.append("alice", note(1)).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.append("bob", note(2)).await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(store.list("alice").await.unwrap().len(), 1);
        assert_eq!(store.list("bob").await.unwrap().len(), 1);
    }
}
