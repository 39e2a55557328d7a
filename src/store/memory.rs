use std::sync::Mutex;

use super::{CredentialStore, NoteStore};
use crate::error::{JotError, Result};
use crate::model::{CredentialTable, Note, NoteTable};

/// In-memory credential store for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<CredentialTable>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<String>> {
        Ok(self.users.lock().unwrap().get(username).cloned())
    }

    async fn register(&self, username: &str, password: &str) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(username) {
            return Err(JotError::UserExists);
        }
        users.insert(username.to_string(), password.to_string());
        Ok(())
    }
}

/// In-memory note store for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<NoteTable>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for MemoryNoteStore {
    async fn list(&self, username: &str) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, username: &str, note: Note) -> Result<Vec<Note>> {
        let mut notes = self.notes.lock().unwrap();
        let user_notes = notes.entry(username.to_string()).or_default();
        user_notes.push(note);
        Ok(user_notes.clone())
    }

    async fn delete(&self, username: &str, index: usize) -> Result<Note> {
        let mut notes = self.notes.lock().unwrap();
        let user_notes = notes.get_mut(username).ok_or(JotError::NoteNotFound)?;
        if index >= user_notes.len() {
            return Err(JotError::NoteNotFound);
        }
        Ok(user_notes.remove(index))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub users: MemoryCredentialStore,
        pub notes: MemoryNoteStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                users: MemoryCredentialStore::new(),
                notes: MemoryNoteStore::new(),
            }
        }

        pub fn with_user(self, username: &str, password: &str) -> Self {
            self.users
                .users
                .lock()
                .unwrap()
                .insert(username.to_string(), password.to_string());
            self
        }

        pub fn with_notes(self, username: &str, count: usize) -> Self {
            let notes = (1..=count)
                .map(|i| Note::new(format!("Test Note {i}"), format!("Content for note {i}")))
                .collect();
            self.notes
                .notes
                .lock()
                .unwrap()
                .insert(username.to_string(), notes);
            self
        }
    }
}
