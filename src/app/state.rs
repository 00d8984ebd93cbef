//! Application state management

use chrono::Local;
use std::path::PathBuf;

use crate::config::Config;
use crate::host::ActiveDocument;
use crate::paste::{Decision, PasteEngine, PastePlan};
use crate::rules::Rule;
use crate::theme::Theme;

/// Note the paste preview pretends to paste into
pub const PREVIEW_NOTE: &str = "Untitled.md";

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rule list navigation
    #[default]
    Normal,
    /// Help dialog
    Help,
    /// Editing an existing rule
    EditRule,
    /// Adding a new rule
    AddRule,
    /// Confirming deletion of the selected rule
    ConfirmDelete,
    /// Editing the datetime format
    EditFormat,
    /// Showing what a paste would do
    Preview,
}

/// How a rule field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single line of text
    Line,
    /// Text that may contain newlines
    Multiline,
}

/// Fields of the rule form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleField {
    #[default]
    Name,
    Description,
    Pattern,
    Folder,
    FilenameFormat,
    Template,
}

impl RuleField {
    pub fn all() -> &'static [RuleField] {
        &[
            RuleField::Name,
            RuleField::Description,
            RuleField::Pattern,
            RuleField::Folder,
            RuleField::FilenameFormat,
            RuleField::Template,
        ]
    }

    fn index(self) -> usize {
        Self::all().iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Get the next field in tab order
    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    /// Get the previous field in tab order
    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            RuleField::Name => "Name",
            RuleField::Description => "Description",
            RuleField::Pattern => "Pattern",
            RuleField::Folder => "Folder",
            RuleField::FilenameFormat => "File name",
            RuleField::Template => "Template",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            RuleField::Template => FieldKind::Multiline,
            _ => FieldKind::Line,
        }
    }

    /// Shown when the field is empty
    pub fn placeholder(self) -> &'static str {
        match self {
            RuleField::Name => "(required)",
            RuleField::Description => "(optional)",
            RuleField::Pattern => "(empty matches everything)",
            RuleField::Folder => "(vault root)",
            RuleField::FilenameFormat => "${date}",
            RuleField::Template => "(paste as is)",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            RuleField::Name => "Unique name. Renaming moves the rule to the lowest priority",
            RuleField::Description => "Shown in the rule list only",
            RuleField::Pattern => "Regex tested against the pasted text",
            RuleField::Folder => "Start with ./ to stay next to the active note. Supports ${notename}",
            RuleField::FilenameFormat => "Note name without extension. Supports ${notename} and ${date}",
            RuleField::Template => "${content} is replaced by the paste. Ctrl+N inserts a newline",
        }
    }
}

/// Editable text with a cursor counted in characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    /// Input holding `value` with the cursor at its end
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    /// Byte offset of the cursor
    pub fn byte_cursor(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn optional(&self) -> Option<String> {
        if self.value.is_empty() {
            None
        } else {
            Some(self.value.clone())
        }
    }
}

/// State for the rule editor dialog
#[derive(Debug, Clone, Default)]
pub struct RuleEditorState {
    /// Currently focused field
    pub field: RuleField,

    /// Name of the rule being edited (None if adding new)
    pub original_name: Option<String>,

    inputs: [TextInput; 6],
}

impl RuleEditorState {
    /// Create a new empty editor state for adding a rule
    pub fn new_rule() -> Self {
        let mut editor = Self::default();
        *editor.input_mut(RuleField::FilenameFormat) = TextInput::new("${date}");
        editor
    }

    /// Create editor state from an existing rule
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            field: RuleField::Name,
            original_name: Some(rule.name.clone()),
            inputs: [
                TextInput::new(&rule.name),
                TextInput::new(rule.description.clone().unwrap_or_default()),
                TextInput::new(&rule.pattern),
                TextInput::new(&rule.folder),
                TextInput::new(&rule.filename_format),
                TextInput::new(rule.template.clone().unwrap_or_default()),
            ],
        }
    }

    pub fn input(&self, field: RuleField) -> &TextInput {
        &self.inputs[field.index()]
    }

    pub fn input_mut(&mut self, field: RuleField) -> &mut TextInput {
        &mut self.inputs[field.index()]
    }

    /// Build a Rule from the editor state. Fields are not validated.
    pub fn to_rule(&self) -> Rule {
        Rule {
            name: self.input(RuleField::Name).value.trim().to_string(),
            description: self.input(RuleField::Description).optional(),
            folder: self.input(RuleField::Folder).value.clone(),
            filename_format: self.input(RuleField::FilenameFormat).value.clone(),
            pattern: self.input(RuleField::Pattern).value.clone(),
            template: self.input(RuleField::Template).optional(),
        }
    }
}

/// Result of a paste preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewResult {
    Plan(PastePlan),
    NoMatch,
    Error(String),
}

/// A pasted text and what the rules would do with it
#[derive(Debug, Clone)]
pub struct Preview {
    pub text: String,
    pub result: PreviewResult,
}

/// Main application state
#[derive(Debug)]
pub struct AppState {
    /// Current input mode
    pub mode: Mode,

    /// Loaded configuration
    pub config: Config,

    /// Where the configuration is saved (None = default location)
    pub config_path: Option<PathBuf>,

    /// Current theme
    pub theme: Theme,

    /// Index of selected rule
    pub selected_rule: Option<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    /// Rule editor state
    pub rule_editor: Option<RuleEditorState>,

    /// Datetime format editor state
    pub format_editor: Option<TextInput>,

    /// Rule awaiting delete confirmation
    pub pending_delete: Option<String>,

    /// Last paste preview
    pub preview: Option<Preview>,
}

impl AppState {
    /// Create a new application state from config
    pub fn new(config: Config, config_path: Option<PathBuf>, theme: Theme) -> Self {
        let selected_rule = if config.user_rules.is_empty() {
            None
        } else {
            Some(0)
        };
        let status_message = Some(format!("Loaded {} rules", config.user_rules.len()));

        Self {
            mode: Mode::default(),
            config,
            config_path,
            theme,
            selected_rule,
            should_quit: false,
            status_message,
            rule_editor: None,
            format_editor: None,
            pending_delete: None,
            preview: None,
        }
    }

    /// Get the currently selected rule, if any
    pub fn current_rule(&self) -> Option<&Rule> {
        self.selected_rule
            .and_then(|i| self.config.user_rules.get_index(i))
    }

    /// Set a temporary status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Keep the selection inside the rule list
    pub fn clamp_selection(&mut self) {
        let len = self.config.user_rules.len();
        self.selected_rule = match self.selected_rule {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            other => other,
        };
    }

    /// Run the rules against pasted text for a sample note
    pub fn preview_paste(&mut self, text: String) {
        let context = ActiveDocument::from_vault_path(PREVIEW_NOTE).context(Local::now());
        let engine = PasteEngine::new(&self.config.user_rules, &self.config.datetime_format);

        let result = match engine.decide(&text, Some(&context)) {
            Ok(Decision::Plan(plan)) => PreviewResult::Plan(plan),
            Ok(Decision::NoMatch) => PreviewResult::NoMatch,
            Err(e) => PreviewResult::Error(e.to_string()),
        };

        self.preview = Some(Preview { text, result });
        self.mode = Mode::Preview;
    }
}
