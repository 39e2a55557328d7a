//! # Storage Layer
//!
//! This module defines the storage abstraction for jotd. The two traits,
//! [`CredentialStore`] and [`NoteStore`], let the service layer work against
//! a contract instead of a concrete file path.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind traits to:
//! - Enable **testing** with the in-memory stores (no filesystem needed)
//! - Keep orchestration **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileCredentialStore`] / [`fs::FileNoteStore`]: production
//!   file-based storage — each table is one JSON document (`users.json`,
//!   `notes.json`) under the configured data directory.
//!
//! - [`memory::MemoryCredentialStore`] / [`memory::MemoryNoteStore`]:
//!   in-memory storage for fast, isolated tests.
//!
//! ## Consistency
//!
//! Every mutation is a full load-mutate-store cycle over the *entire* table.
//! The file stores hold a per-table async mutex across that whole cycle;
//! without it, two concurrent writers would each rewrite the full document
//! and the last one would silently clobber the other's update. No component
//! outside this module may touch the underlying files.

use std::future::Future;

use crate::error::Result;
use crate::model::Note;

pub mod fs;
pub mod memory;

/// Persisted username → password table.
pub trait CredentialStore: Send + Sync {
    /// Return the stored password for a username, if any.
    fn lookup(&self, username: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Insert a new user. Fails with `JotError::UserExists` if the username
    /// is already taken; the table is unchanged in that case.
    fn register(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Persisted username → ordered note list table.
pub trait NoteStore: Send + Sync {
    /// All notes for a user in insertion order; empty if the user has none.
    fn list(&self, username: &str) -> impl Future<Output = Result<Vec<Note>>> + Send;

    /// Append a note to the user's list (creating it if absent) and return
    /// the updated sequence.
    fn append(
        &self,
        username: &str,
        note: Note,
    ) -> impl Future<Output = Result<Vec<Note>>> + Send;

    /// Remove and return the note at `index`, shifting later notes down by
    /// one. Fails with `JotError::NoteNotFound` when the index is out of
    /// range or the user has no notes; the table is unchanged in that case.
    fn delete(&self, username: &str, index: usize) -> impl Future<Output = Result<Note>> + Send;
}
