use std::fmt;

use thiserror::Error;

/// Which field of a new note a spelling rejection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
}

impl fmt::Display for NoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteField::Title => write!(f, "title"),
            NoteField::Content => write!(f, "content"),
        }
    }
}

#[derive(Error, Debug)]
pub enum JotError {
    /// Unknown username and wrong password both map here; callers must not
    /// be able to tell which one happened.
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Username already exists")]
    UserExists,

    #[error("Note not found")]
    NoteNotFound,

    #[error("There is a mistake in the {field}! Did you mean \"{suggestion}\"? Fix it and try again")]
    SpellingRejected { field: NoteField, suggestion: String },

    #[error("Spell checking is currently unavailable, try again later")]
    SpellerUnavailable,

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, JotError>;
