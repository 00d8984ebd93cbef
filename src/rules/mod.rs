//! Paste rules - ordered regex patterns mapped to note-creation recipes

mod matcher;
mod store;
pub mod template;

pub use matcher::RuleMatcher;
pub use store::RuleSet;
pub use template::Variable;

use serde::{Deserialize, Serialize};

/// A user-authored rule redirecting matching pasted text into a new note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Unique name, also the key in the rule set
    pub name: String,

    /// Display-only description
    #[serde(default, rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target folder template (`./` prefix = relative to the active note)
    pub folder: String,

    /// Target file base name template, without extension
    pub filename_format: String,

    /// Regex source tested against the pasted text (empty matches everything)
    pub pattern: String,

    /// Wrapper for the pasted text, via `${content}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Rule {
    /// Create a rule with no description and no template
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        folder: impl Into<String>,
        filename_format: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            folder: folder.into(),
            filename_format: filename_format.into(),
            pattern: pattern.into(),
            template: None,
        }
    }

    /// Set the content template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The template to wrap pasted text in. An empty template counts as absent.
    pub fn effective_template(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }

    /// Check that the pattern compiles
    pub fn validate(&self) -> Result<(), crate::error::PasteError> {
        matcher::compile(self).map(|_| ())
    }
}
