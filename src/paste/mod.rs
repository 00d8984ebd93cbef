//! Paste decision - turning pasted text into a plan for a new note

mod engine;
pub mod resolve;

pub use engine::PasteEngine;
pub use resolve::PathResolver;

use chrono::{DateTime, Local};

/// Extension of every note the vault stores
pub const NOTE_EXTENSION: &str = "md";

/// Context captured once per paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteContext {
    /// Active note's base name, without extension
    pub note_name: String,

    /// Vault-relative folder holding the active note ("" for the vault root)
    pub active_folder: String,

    /// Wall-clock reading for `${date}`
    pub now: DateTime<Local>,
}

impl PasteContext {
    pub fn new(note_name: impl Into<String>, active_folder: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            note_name: note_name.into(),
            active_folder: active_folder.into(),
            now,
        }
    }
}

/// Fully resolved description of what to create and what to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastePlan {
    /// Name of the rule that produced this plan
    pub rule: String,

    /// Normalized vault-relative target folder
    pub folder: String,

    /// Target file base name, without extension
    pub base_name: String,

    /// Full content of the new note
    pub content: String,

    /// Text inserted into the active note instead of the paste
    pub embed: String,
}

impl PastePlan {
    /// Vault-relative path of the note to create
    pub fn file_path(&self) -> String {
        resolve::join(&self.folder, &format!("{}.{}", self.base_name, NOTE_EXTENSION))
    }
}

/// Embed marker linking to a note by base name
pub fn embed_marker(base_name: &str) -> String {
    format!("![[{}]]\n", base_name)
}

/// Outcome of the decision phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No rule matched: the default paste proceeds untouched
    NoMatch,
    /// A rule matched and the plan is ready to commit
    Plan(PastePlan),
}

impl Decision {
    pub fn plan(&self) -> Option<&PastePlan> {
        match self {
            Decision::Plan(plan) => Some(plan),
            Decision::NoMatch => None,
        }
    }
}
