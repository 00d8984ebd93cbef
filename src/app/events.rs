//! Event handling for the TUI

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, FieldKind, Mode, RuleEditorState, TextInput};
use crate::datetime;

/// Handle a key event and update state
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Handle mode-specific input first
    match state.mode {
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            return;
        }
        Mode::Preview => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                state.mode = Mode::Normal;
            }
            return;
        }
        Mode::EditRule | Mode::AddRule => {
            handle_rule_editor_key(state, key);
            return;
        }
        Mode::ConfirmDelete => {
            handle_confirm_delete_key(state, key);
            return;
        }
        Mode::EditFormat => {
            handle_format_editor_key(state, key);
            return;
        }
        Mode::Normal => {}
    }

    state.status_message = None;

    // Global keybindings
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c'))
        | (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
            state.should_quit = true;
            return;
        }
        (_, KeyCode::Char('q')) => {
            state.should_quit = true;
            return;
        }
        (_, KeyCode::Char('?')) | (_, KeyCode::F(1)) => {
            state.mode = Mode::Help;
            return;
        }
        (_, KeyCode::Char('f')) => {
            state.format_editor = Some(TextInput::new(&state.config.datetime_format));
            state.mode = Mode::EditFormat;
            return;
        }
        _ => {}
    }

    handle_rules_key(state, key);
}

/// Handle text arriving through a bracketed paste
pub fn handle_paste(state: &mut AppState, text: String) {
    match state.mode {
        Mode::EditRule | Mode::AddRule => {
            if let Some(editor) = state.rule_editor.as_mut() {
                let field = editor.field;
                let text = match field.kind() {
                    FieldKind::Line => text.replace(['\r', '\n'], ""),
                    FieldKind::Multiline => text.replace("\r\n", "\n"),
                };
                insert_str(editor.input_mut(field), &text);
            }
        }
        Mode::EditFormat => {
            if let Some(input) = state.format_editor.as_mut() {
                insert_str(input, &text.replace(['\r', '\n'], ""));
            }
        }
        Mode::Normal | Mode::Preview => state.preview_paste(text),
        Mode::Help | Mode::ConfirmDelete => {}
    }
}

fn handle_rules_key(state: &mut AppState, key: KeyEvent) {
    let len = state.config.user_rules.len();

    // Allow adding new rules even if list is empty
    if key.code == KeyCode::Char('n') {
        state.rule_editor = Some(RuleEditorState::new_rule());
        state.mode = Mode::AddRule;
        return;
    }

    if len == 0 {
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected_rule = Some(
                state
                    .selected_rule
                    .map(|i| i.saturating_sub(1))
                    .unwrap_or(0),
            );
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.selected_rule = Some(
                state
                    .selected_rule
                    .map(|i| (i + 1).min(len - 1))
                    .unwrap_or(0),
            );
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.selected_rule = Some(0);
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.selected_rule = Some(len.saturating_sub(1));
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(rule) = state.current_rule() {
                state.rule_editor = Some(RuleEditorState::from_rule(rule));
                state.mode = Mode::EditRule;
            } else {
                state.set_status("Select a rule first");
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(rule) = state.current_rule() {
                state.pending_delete = Some(rule.name.clone());
                state.mode = Mode::ConfirmDelete;
            } else {
                state.set_status("Select a rule first");
            }
        }
        _ => {}
    }
}

fn handle_confirm_delete_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(name) = state.pending_delete.take()
                && state.config.user_rules.remove(&name).is_some()
            {
                state.clamp_selection();
                save_config(state);
                state.set_status(format!("Deleted rule '{}'", name));
            }
            state.mode = Mode::Normal;
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.pending_delete = None;
            state.mode = Mode::Normal;
        }
        _ => {}
    }
}

fn save_config(state: &mut AppState) {
    if let Err(e) = state.config.save(state.config_path.as_deref()) {
        state.set_status(format!("Failed to save config: {}", e));
    }
}

fn handle_rule_editor_key(state: &mut AppState, key: KeyEvent) {
    let Some(ref mut editor) = state.rule_editor else {
        state.mode = Mode::Normal;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            state.rule_editor = None;
            state.mode = Mode::Normal;
            state.set_status("Cancelled");
        }
        (_, KeyCode::Tab) | (_, KeyCode::Down) => {
            editor.field = editor.field.next();
        }
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => {
            editor.field = editor.field.prev();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
            let field = editor.field;
            if field.kind() == FieldKind::Multiline {
                insert_str(editor.input_mut(field), "\n");
            }
        }
        (_, KeyCode::Enter) => save_rule(state),
        _ => {
            let field = editor.field;
            handle_text_input(editor.input_mut(field), key);
        }
    }
}

fn save_rule(state: &mut AppState) {
    let Some(editor) = state.rule_editor.as_ref() else {
        return;
    };

    let rule = editor.to_rule();
    if rule.name.is_empty() {
        state.set_status("Rule name is required");
        return;
    }

    let original = editor.original_name.clone();
    let renamed = original.as_deref() != Some(rule.name.as_str());
    if renamed && state.config.user_rules.get(&rule.name).is_some() {
        state.set_status(format!("A rule named '{}' already exists", rule.name));
        return;
    }

    let invalid = rule.validate().err();
    let name = rule.name.clone();

    match original {
        Some(original) => {
            state.config.user_rules.update(&original, rule);
            state.set_status(format!("Updated rule '{}'", name));
        }
        None => {
            state.config.user_rules.insert(rule);
            state.set_status(format!("Created rule '{}'", name));
        }
    }
    state.selected_rule = state.config.user_rules.position(&name);

    save_config(state);

    if let Some(e) = invalid {
        state.set_status(format!("Saved, but {}", e));
    }

    state.rule_editor = None;
    state.mode = Mode::Normal;
}

fn handle_format_editor_key(state: &mut AppState, key: KeyEvent) {
    let Some(ref mut input) = state.format_editor else {
        state.mode = Mode::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            state.format_editor = None;
            state.mode = Mode::Normal;
            state.set_status("Cancelled");
        }
        KeyCode::Enter => {
            let format = if input.value.is_empty() {
                datetime::DEFAULT_FORMAT.to_string()
            } else {
                input.value.clone()
            };
            state.config.datetime_format = format;
            save_config(state);
            let sample = datetime::format(&chrono::Local::now(), &state.config.datetime_format);
            state.set_status(format!("Date format set, e.g. {}", sample));
            state.format_editor = None;
            state.mode = Mode::Normal;
        }
        _ => handle_text_input(input, key),
    }
}

fn insert_str(input: &mut TextInput, text: &str) {
    let byte_pos = input.byte_cursor();
    input.value.insert_str(byte_pos, text);
    input.cursor += text.chars().count();
}

fn handle_text_input(input: &mut TextInput, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return;
    }

    match key.code {
        KeyCode::Char(c) => {
            let byte_pos = input.byte_cursor();
            input.value.insert(byte_pos, c);
            input.cursor += 1;
        }
        KeyCode::Backspace => {
            if input.cursor > 0 {
                input.cursor -= 1;
                let byte_pos = input.byte_cursor();
                input.value.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if input.cursor < input.value.chars().count() {
                let byte_pos = input.byte_cursor();
                input.value.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            input.cursor = input.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            if input.cursor < input.value.chars().count() {
                input.cursor += 1;
            }
        }
        KeyCode::Home => {
            input.cursor = 0;
        }
        KeyCode::End => {
            input.cursor = input.value.chars().count();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::RuleField;
    use crate::config::Config;
    use crate::rules::Rule;
    use crate::theme::Theme;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(state, key(KeyCode::Char(c)));
        }
    }

    fn state_with_rules(dir: &tempfile::TempDir) -> AppState {
        let mut config = Config::default();
        config.user_rules.insert(Rule::new("a", "^a", "A", "${date}"));
        config.user_rules.insert(Rule::new("b", "^b", "B", "${date}"));
        config.user_rules.insert(Rule::new("c", "^c", "C", "${date}"));
        AppState::new(config, Some(dir.path().join("data.json")), Theme::default())
    }

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::new("héllo");
        handle_text_input(&mut input, key(KeyCode::Home));
        handle_text_input(&mut input, key(KeyCode::Right));
        handle_text_input(&mut input, key(KeyCode::Delete));
        handle_text_input(&mut input, key(KeyCode::Char('e')));
        assert_eq!(input.value, "hello");
        assert_eq!(input.cursor, 2);

        handle_text_input(&mut input, key(KeyCode::Backspace));
        assert_eq!(input.value, "hllo");
    }

    #[test]
    fn test_add_rule_saves_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);

        handle_key(&mut state, key(KeyCode::Char('n')));
        assert_eq!(state.mode, Mode::AddRule);
        type_text(&mut state, "d");
        handle_key(&mut state, key(KeyCode::Enter));

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.config.user_rules.names(), vec!["a", "b", "c", "d"]);
        assert_eq!(state.selected_rule, Some(3));

        let saved = Config::load(Some(&dir.path().join("data.json"))).unwrap();
        assert_eq!(saved.user_rules.names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_rename_moves_rule_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);
        state.selected_rule = Some(0);

        handle_key(&mut state, key(KeyCode::Char('e')));
        handle_key(&mut state, key(KeyCode::Backspace));
        type_text(&mut state, "z");
        handle_key(&mut state, key(KeyCode::Enter));

        assert_eq!(state.config.user_rules.names(), vec!["b", "c", "z"]);
        assert_eq!(state.selected_rule, Some(2));
    }

    #[test]
    fn test_rename_onto_existing_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);
        state.selected_rule = Some(0);

        handle_key(&mut state, key(KeyCode::Char('e')));
        handle_key(&mut state, key(KeyCode::Backspace));
        type_text(&mut state, "b");
        handle_key(&mut state, key(KeyCode::Enter));

        assert_eq!(state.mode, Mode::EditRule);
        assert_eq!(state.config.user_rules.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_template_newline_with_ctrl_n() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);
        handle_key(&mut state, key(KeyCode::Char('n')));

        let editor = state.rule_editor.as_mut().unwrap();
        editor.field = RuleField::Template;
        handle_key(&mut state, key(KeyCode::Char('x')));
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        handle_key(&mut state, key(KeyCode::Char('y')));

        let editor = state.rule_editor.as_ref().unwrap();
        assert_eq!(editor.input(editor.field).value, "x\ny");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);
        state.selected_rule = Some(2);

        handle_key(&mut state, key(KeyCode::Char('d')));
        assert_eq!(state.mode, Mode::ConfirmDelete);
        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.config.user_rules.len(), 3);

        handle_key(&mut state, key(KeyCode::Char('d')));
        handle_key(&mut state, key(KeyCode::Char('y')));
        assert_eq!(state.config.user_rules.names(), vec!["a", "b"]);
        assert_eq!(state.selected_rule, Some(1));
    }

    #[test]
    fn test_format_editor_empty_restores_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);

        handle_key(&mut state, key(KeyCode::Char('f')));
        assert_eq!(state.mode, Mode::EditFormat);
        handle_key(&mut state, key(KeyCode::Home));
        for _ in 0..datetime::DEFAULT_FORMAT.len() {
            handle_key(&mut state, key(KeyCode::Delete));
        }
        type_text(&mut state, "YYYY");
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.config.datetime_format, "YYYY");

        handle_key(&mut state, key(KeyCode::Char('f')));
        state.format_editor = Some(TextInput::default());
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.config.datetime_format, datetime::DEFAULT_FORMAT);
    }

    #[test]
    fn test_paste_into_line_field_drops_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);
        handle_key(&mut state, key(KeyCode::Char('n')));

        handle_paste(&mut state, "in\nbox".to_string());
        let editor = state.rule_editor.as_ref().unwrap();
        assert_eq!(editor.input(editor.field).value, "inbox");
    }

    #[test]
    fn test_paste_in_normal_mode_previews() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_rules(&dir);

        handle_paste(&mut state, "bravo".to_string());
        assert_eq!(state.mode, Mode::Preview);
        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.mode, Mode::Normal);
    }
}
