//! pasteroute - route pasted text into new notes
//!
//! Pasted text is tested against an ordered set of regex rules. The first
//! matching rule decides where a new note is created and what it contains,
//! and an embed marker linking to it replaces the raw paste in the active
//! note.

pub mod app;
pub mod config;
pub mod context;
pub mod datetime;
pub mod error;
pub mod host;
pub mod notifications;
pub mod paste;
pub mod rules;
pub mod theme;

pub use config::Config;
pub use context::{PasteApp, PasteOutcome, PasteSource};
pub use error::PasteError;
pub use paste::{Decision, PasteContext, PasteEngine, PastePlan};
pub use rules::{Rule, RuleMatcher, RuleSet};
pub use theme::Theme;

/// Current version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
