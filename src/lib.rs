//! # jotd Architecture
//!
//! jotd is a small authenticated note-taking service. Users register with a
//! username and password, then create, list, and delete text notes over
//! HTTP. Before a note is persisted, its title and content are each checked
//! against an external spell-checking service; a flagged field rejects the
//! whole creation with a correction suggestion.
//!
//! The crate is a library with a thin server binary. Layers, outside in:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport (server.rs, wired by main.rs)                    │
//! │  - axum router, Basic-auth extraction, error → status codes │
//! │  - The ONLY place that knows about HTTP                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service (service.rs)                                       │
//! │  - NoteService<C, N, V>: authenticate, validate, persist    │
//! │  - Returns structured Result types, no I/O assumptions      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                ┌─────────────┴─────────────┐
//!                ▼                           ▼
//! ┌──────────────────────────┐  ┌──────────────────────────────┐
//! │  Storage (store/)        │  │  Spell check (speller.rs)    │
//! │  - CredentialStore and   │  │  - Validator trait           │
//! │    NoteStore traits      │  │  - SpellClient (external     │
//! │  - file + memory impls   │  │    HTTP service)             │
//! └──────────────────────────┘  └──────────────────────────────┘
//! ```
//!
//! ## Consistency model
//!
//! Both tables (users and notes) live as single JSON documents on disk and
//! are reloaded on every operation; the file is the source of truth. Each
//! file store serializes its whole load-mutate-store cycle behind a mutex,
//! so concurrent mutations of the same table cannot lose updates. See
//! [`store`] for details.
//!
//! ## Module overview
//!
//! - [`service`]: orchestration — the entry point for all operations
//! - [`store`]: storage abstraction and implementations
//! - [`speller`]: spell validation against the external checker
//! - [`model`]: core data types (`Note`, the two table types)
//! - [`config`]: environment-driven runtime configuration
//! - [`error`]: error types
//! - [`server`]: HTTP transport for the binary

pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod service;
pub mod speller;
pub mod store;
