//! Application context - configuration plus host collaborators
//!
//! A paste runs in two phases. [`PasteApp::decide`] reads nothing but the
//! text and produces a [`Decision`]; only [`PasteApp::commit`] touches the
//! vault and the active note. The default paste is therefore suppressed only
//! once a rule is known to match.

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::PasteError;
use crate::host::{ActiveDocument, ClipboardSource, TextInserter, VaultStore};
use crate::paste::{Decision, PasteEngine, PastePlan};

/// Where the pasted text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteSource {
    /// A paste gesture carrying its payload; `None` when it has no plain text
    Event(Option<String>),
    /// An explicit command that reads the clipboard asynchronously
    Command,
}

/// What happened to a paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// A note was created and the embed marker inserted
    Embedded(PastePlan),
    /// No rule matched; the raw text was pasted as usual
    Default(String),
    /// No plain text was available; nothing happened
    Aborted,
}

/// Everything a paste needs, built once at startup and passed explicitly
pub struct PasteApp {
    config: Config,
    clipboard: Box<dyn ClipboardSource>,
    vault: Box<dyn VaultStore>,
    inserter: Box<dyn TextInserter>,
    active: Option<ActiveDocument>,
}

impl PasteApp {
    pub fn new(
        config: Config,
        clipboard: Box<dyn ClipboardSource>,
        vault: Box<dyn VaultStore>,
        inserter: Box<dyn TextInserter>,
        active: Option<ActiveDocument>,
    ) -> Self {
        Self {
            config,
            clipboard,
            vault,
            inserter,
            active,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn active_document(&self) -> Option<&ActiveDocument> {
        self.active.as_ref()
    }

    /// Obtain the pasted text. The only step that may suspend.
    pub async fn read(&self, source: PasteSource) -> Result<String, PasteError> {
        let text = match source {
            PasteSource::Event(text) => text,
            PasteSource::Command => self.clipboard.read_text().await,
        };
        text.ok_or(PasteError::NoPlainText)
    }

    /// Decision phase: no side effects
    pub fn decide(&self, text: &str, now: DateTime<Local>) -> Result<Decision, PasteError> {
        let context = self.active.as_ref().map(|doc| doc.context(now));
        PasteEngine::new(&self.config.user_rules, &self.config.datetime_format)
            .decide(text, context.as_ref())
    }

    /// Commit phase: carry out a decision.
    ///
    /// The embed marker is inserted only after the note was written, so a
    /// failed write never leaves a marker pointing at a missing note.
    pub fn commit(&mut self, decision: Decision, text: &str) -> Result<PasteOutcome, PasteError> {
        match decision {
            Decision::NoMatch => {
                self.inserter.insert(text)?;
                Ok(PasteOutcome::Default(text.to_string()))
            }
            Decision::Plan(plan) => {
                if !plan.folder.is_empty() && !self.vault.exists(&plan.folder) {
                    self.vault.create_folder(&plan.folder)?;
                }
                let file_path = plan.file_path();
                self.vault.create_file(&file_path, &plan.content)?;
                self.inserter.insert(&plan.embed)?;
                info!("Pasted into {} via rule '{}'", file_path, plan.rule);
                Ok(PasteOutcome::Embedded(plan))
            }
        }
    }

    /// Read, decide and commit one paste
    pub async fn paste(&mut self, source: PasteSource, now: DateTime<Local>) -> Result<PasteOutcome, PasteError> {
        if self.active.is_none() {
            return Err(PasteError::NoActiveDocument);
        }

        let text = match self.read(source).await {
            Ok(text) => text,
            Err(PasteError::NoPlainText) => {
                debug!("No plain text to paste, aborting");
                return Ok(PasteOutcome::Aborted);
            }
            Err(e) => return Err(e),
        };

        let decision = self.decide(&text, now)?;
        self.commit(decision, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DocumentInserter, FsVault, StaticClipboard};
    use crate::rules::Rule;
    use assert_fs::prelude::*;
    use chrono::TimeZone;
    use predicates::prelude::*;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()
    }

    fn config() -> Config {
        let mut config = Config {
            datetime_format: "YYYYMMDD".to_string(),
            ..Default::default()
        };
        config.user_rules.insert(
            Rule::new("json", r"^\{", "./plots", "${date}").with_template("```json\n${content}\n```"),
        );
        config
    }

    fn app(temp: &assert_fs::TempDir, clipboard: StaticClipboard) -> PasteApp {
        temp.child("Journal/Note.md").write_str("# Note\n").unwrap();
        PasteApp::new(
            config(),
            Box::new(clipboard),
            Box::new(FsVault::new(temp.path())),
            Box::new(DocumentInserter::new(temp.child("Journal/Note.md").path(), None)),
            Some(ActiveDocument::from_vault_path("Journal/Note.md")),
        )
    }

    #[tokio::test]
    async fn test_matching_event_creates_note_and_embed() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut app = app(&temp, StaticClipboard::empty());

        let outcome = app
            .paste(PasteSource::Event(Some(r#"{"x":1}"#.to_string())), now())
            .await
            .unwrap();

        assert!(matches!(outcome, PasteOutcome::Embedded(ref plan) if plan.folder == "Journal/plots"));
        temp.child("Journal/plots/20240102.md")
            .assert("```json\n{\"x\":1}\n```");
        temp.child("Journal/Note.md").assert("# Note\n![[20240102]]\n");
    }

    #[tokio::test]
    async fn test_no_match_pastes_raw_text() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut app = app(&temp, StaticClipboard::empty());

        let outcome = app
            .paste(PasteSource::Event(Some("plain".to_string())), now())
            .await
            .unwrap();

        assert_eq!(outcome, PasteOutcome::Default("plain".to_string()));
        temp.child("Journal/plots").assert(predicate::path::missing());
        temp.child("Journal/Note.md").assert("# Note\nplain");
    }

    #[tokio::test]
    async fn test_command_reads_clipboard() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut app = app(&temp, StaticClipboard::with_text("{}"));

        let outcome = app.paste(PasteSource::Command, now()).await.unwrap();
        assert!(matches!(outcome, PasteOutcome::Embedded(_)));
        temp.child("Journal/plots/20240102.md").assert(predicate::path::is_file());
    }

    #[tokio::test]
    async fn test_missing_plain_text_aborts_silently() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut app = app(&temp, StaticClipboard::empty());

        assert_eq!(app.paste(PasteSource::Command, now()).await.unwrap(), PasteOutcome::Aborted);
        assert_eq!(app.paste(PasteSource::Event(None), now()).await.unwrap(), PasteOutcome::Aborted);
        temp.child("Journal/Note.md").assert("# Note\n");
    }

    #[tokio::test]
    async fn test_no_active_document() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut app = PasteApp::new(
            config(),
            Box::new(StaticClipboard::with_text("{}")),
            Box::new(FsVault::new(temp.path())),
            Box::new(DocumentInserter::new(temp.child("x.md").path(), None)),
            None,
        );

        let err = app.paste(PasteSource::Command, now()).await.unwrap_err();
        assert!(matches!(err, PasteError::NoActiveDocument));
        temp.child("x.md").assert(predicate::path::missing());
    }

    #[tokio::test]
    async fn test_failed_write_skips_insertion() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Journal/plots/20240102.md").write_str("taken").unwrap();
        let mut app = app(&temp, StaticClipboard::empty());

        let err = app
            .paste(PasteSource::Event(Some("{}".to_string())), now())
            .await
            .unwrap_err();

        assert!(matches!(err, PasteError::Storage { .. }));
        temp.child("Journal/plots/20240102.md").assert("taken");
        temp.child("Journal/Note.md").assert("# Note\n");
    }

    #[test]
    fn test_decide_has_no_side_effects() {
        let temp = assert_fs::TempDir::new().unwrap();
        let app = app(&temp, StaticClipboard::empty());

        let decision = app.decide("{}", now()).unwrap();
        assert!(decision.plan().is_some());
        temp.child("Journal/plots").assert(predicate::path::missing());
        temp.child("Journal/Note.md").assert("# Note\n");
    }
}
