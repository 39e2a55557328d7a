use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single text note.
///
/// Notes have no stable id: a note is identified by its zero-based position
/// within its owner's list, so deleting an earlier note shifts the indices
/// of the ones after it. A client that lists and then deletes by index can
/// therefore target a different note if the list changed in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// username → password. Usernames are unique and non-empty.
pub type CredentialTable = HashMap<String, String>;

/// username → notes in insertion order. An absent user and an empty list
/// both mean "no notes"; readers must treat them the same.
pub type NoteTable = HashMap<String, Vec<Note>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_serialization_roundtrip() {
        let note = Note::new("Hello", "World");

        let json = serde_json::to_string(&note).unwrap();
        let parsed: Note = serde_json::from_str(&json).unwrap();

        assert_eq!(note, parsed);
    }

    #[test]
    fn note_table_preserves_order() {
        let mut table = NoteTable::new();
        table.insert(
            "alice".to_string(),
            (1..=5).map(|i| Note::new(format!("n{i}"), "")).collect(),
        );

        let json = serde_json::to_string(&table).unwrap();
        let parsed: NoteTable = serde_json::from_str(&json).unwrap();

        let titles: Vec<&str> = parsed["alice"].iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["n1", "n2", "n3", "n4", "n5"]);
    }
}
