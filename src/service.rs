//! Orchestration for the four user-facing operations.
//!
//! [`NoteService`] is the single entry point: it authenticates, validates,
//! and persists, and returns structured `Result` types. It is generic over
//! its three collaborators so tests can swap in the in-memory stores and a
//! scripted validator. It performs no transport I/O of its own.

use subtle::ConstantTimeEq;

use crate::error::{JotError, NoteField, Result};
use crate::model::Note;
use crate::speller::{Validator, Verdict};
use crate::store::{CredentialStore, NoteStore};

/// Credentials as claimed by a request, before verification.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

pub struct NoteService<C, N, V> {
    users: C,
    notes: N,
    speller: V,
}

impl<C: CredentialStore, N: NoteStore, V: Validator> NoteService<C, N, V> {
    pub fn new(users: C, notes: N, speller: V) -> Self {
        Self {
            users,
            notes,
            speller,
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() {
            return Err(JotError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(JotError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        self.users.register(username, password).await
    }

    /// Verify claimed credentials. An unknown username and a wrong password
    /// both collapse into the same `Unauthorized` error so responses cannot
    /// be used to probe which usernames exist. The comparison itself is
    /// constant-time.
    pub async fn authenticate(&self, creds: &Credentials) -> Result<()> {
        let matched = match self.users.lookup(&creds.username).await? {
            Some(stored) => stored
                .as_bytes()
                .ct_eq(creds.password.as_bytes())
                .into(),
            None => false,
        };

        if matched {
            Ok(())
        } else {
            Err(JotError::Unauthorized)
        }
    }

    pub async fn list_notes(&self, creds: &Credentials) -> Result<Vec<Note>> {
        self.authenticate(creds).await?;
        self.notes.list(&creds.username).await
    }

    /// Add a note after spell-checking both fields. The title is checked
    /// first and a rejection short-circuits before the content is even
    /// sent; nothing is persisted unless both fields pass.
    pub async fn add_note(&self, creds: &Credentials, note: Note) -> Result<Note> {
        self.authenticate(creds).await?;

        self.check_field(NoteField::Title, &note.title).await?;
        self.check_field(NoteField::Content, &note.content).await?;

        self.notes.append(&creds.username, note.clone()).await?;
        Ok(note)
    }

    pub async fn delete_note(&self, creds: &Credentials, index: usize) -> Result<Note> {
        self.authenticate(creds).await?;
        self.notes.delete(&creds.username, index).await
    }

    async fn check_field(&self, field: NoteField, text: &str) -> Result<()> {
        match self.speller.check(text).await? {
            Verdict::Accepted => Ok(()),
            Verdict::Rejected { suggestion } => {
                Err(JotError::SpellingRejected { field, suggestion })
            }
        }
    }
}
