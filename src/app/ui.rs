//! UI rendering for the TUI

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::state::{AppState, FieldKind, Mode, PREVIEW_NOTE, PreviewResult, RuleField};
use crate::datetime;
use crate::theme::ThemeColors;

/// Width of the field labels in the rule editor
const LABEL_WIDTH: usize = 13;

/// Columns taken by the focus marker in front of each label
const MARKER_WIDTH: usize = 3;

/// Render the entire UI
pub fn render(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();

    // Set background
    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, state, chunks[0]);
    render_main(frame, state, chunks[1]);
    render_status_bar(frame, state, chunks[2]);

    match state.mode {
        Mode::Help => render_help_popup(frame, state),
        Mode::EditRule | Mode::AddRule => render_rule_editor(frame, state),
        Mode::ConfirmDelete => render_confirm_delete(frame, state),
        Mode::EditFormat => render_format_editor(frame, state),
        Mode::Preview => render_preview(frame, state),
        Mode::Normal => {}
    }
}

fn render_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();
    let format = &state.config.datetime_format;

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" pasteroute ", colors.text_primary().add_modifier(Modifier::BOLD)),
        Span::styled(format!("v{}", crate::VERSION), colors.text_muted()),
        Span::styled("   Date format: ", colors.text_muted()),
        Span::styled(format.as_str(), colors.text()),
        Span::styled(
            format!(" ({})", datetime::format(&Local::now(), format)),
            colors.text_muted(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block()),
    );

    frame.render_widget(header, area);
}

fn render_main(frame: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_rules(frame, state, chunks[0]);
    render_rule_details(frame, state, chunks[1]);
}

fn render_rules(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    if state.config.user_rules.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::styled("  No rules configured", colors.text_muted()),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", colors.text_muted()),
                Span::styled("[n]", colors.key_hint()),
                Span::styled(" to create a new rule", colors.text_muted()),
            ]),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(colors.block())
                .title(" Rules ")
                .title_style(colors.text_primary()),
        );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .config
        .user_rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let is_selected = state.selected_rule == Some(i);
            let base_style = if is_selected {
                colors.selected()
            } else {
                colors.text()
            };

            let (marker, marker_style) = match rule.validate() {
                Ok(()) => (format!(" {:>2}. ", i + 1), colors.text_muted()),
                Err(_) => (" !!  ".to_string(), colors.text_error()),
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(&rule.name, base_style.add_modifier(Modifier::BOLD)),
                Span::styled(format!("  → {}", rule.folder), colors.text_muted()),
            ]))
            .style(base_style)
        })
        .collect();

    let rules_list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(colors.block_focus())
                .title(format!(" Rules ({}) ", state.config.user_rules.len()))
                .title_style(colors.text_primary()),
        )
        .highlight_style(colors.selected());

    frame.render_widget(rules_list, area);
}

fn render_rule_details(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors.block())
        .title(" Details ")
        .title_style(colors.text_primary());

    let Some(rule) = state.current_rule() else {
        frame.render_widget(block, area);
        return;
    };

    let row = |label: &'static str, value: &str, placeholder: &'static str| {
        let (value, style) = if value.is_empty() {
            (placeholder.to_string(), colors.text_muted())
        } else {
            (value.to_string(), colors.text())
        };
        Line::from(vec![
            Span::styled(format!("  {:<width$}", label, width = LABEL_WIDTH), colors.text_muted()),
            Span::styled(value, style),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        row("Name", &rule.name, ""),
        row(
            "Description",
            rule.description.as_deref().unwrap_or_default(),
            RuleField::Description.placeholder(),
        ),
        row("Pattern", &rule.pattern, RuleField::Pattern.placeholder()),
        row("Folder", &rule.folder, RuleField::Folder.placeholder()),
        row("File name", &rule.filename_format, ""),
        Line::from(""),
        Line::styled("  Template", colors.text_muted()),
    ];

    match rule.effective_template() {
        Some(template) => lines.extend(
            template
                .lines()
                .map(|l| Line::styled(format!("    {}", l), colors.text())),
        ),
        None => lines.push(Line::styled(
            format!("    {}", RuleField::Template.placeholder()),
            colors.text_muted(),
        )),
    }

    if let Err(e) = rule.validate() {
        lines.push(Line::from(""));
        lines.push(Line::styled(format!("  {}", e), colors.text_error()));
    }

    let details = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(details, area);
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let content = if let Some(ref msg) = state.status_message {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(msg, colors.text_muted()),
        ]
    } else {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled("n", colors.key_hint()),
            Span::styled(": new  ", colors.text_muted()),
            Span::styled("e", colors.key_hint()),
            Span::styled(": edit  ", colors.text_muted()),
            Span::styled("d", colors.key_hint()),
            Span::styled(": delete  ", colors.text_muted()),
            Span::styled("f", colors.key_hint()),
            Span::styled(": date format  ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_muted()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_muted()),
        ]
    };

    let status = Paragraph::new(Line::from(content)).style(Style::default().bg(colors.bg));
    frame.render_widget(status, area);
}

fn section(colors: &ThemeColors, title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("  {}", title),
        colors.text_primary().add_modifier(Modifier::BOLD),
    )])
}

fn shortcut(colors: &ThemeColors, keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<19}", keys), colors.key_hint()),
        Span::styled(action, colors.text()),
    ])
}

fn render_help_popup(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = popup_rect(frame.area(), 62, 26);

    // Clear the area
    frame.render_widget(Clear, popup_area);

    let help_content = vec![
        Line::from(""),
        section(&colors, "Rules"),
        shortcut(&colors, "j/k or ↑/↓", "Navigate rules"),
        shortcut(&colors, "g/G", "Go to first/last rule"),
        shortcut(&colors, "n", "Create new rule"),
        shortcut(&colors, "e / Enter", "Edit selected rule"),
        shortcut(&colors, "d", "Delete selected rule"),
        shortcut(&colors, "f", "Edit the date format"),
        Line::from(""),
        section(&colors, "Editor"),
        shortcut(&colors, "Tab / Shift+Tab", "Next/previous field"),
        shortcut(&colors, "Ctrl+N", "Newline in the template"),
        shortcut(&colors, "Enter", "Save"),
        shortcut(&colors, "Esc", "Cancel"),
        Line::from(""),
        section(&colors, "Preview"),
        Line::styled(
            "  Paste text here to see which rule would take it",
            colors.text(),
        ),
        Line::styled(
            format!("  and what note it would create from {}", PREVIEW_NOTE),
            colors.text(),
        ),
        Line::from(""),
        shortcut(&colors, "?", "Toggle this help"),
        shortcut(&colors, "q / Ctrl+c", "Quit application"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", colors.text_muted()),
            Span::styled("Esc", colors.key_hint()),
            Span::styled(" or ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(" to close", colors.text_muted()),
        ]),
    ];

    let help = Paragraph::new(help_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(colors.block_focus())
                .style(Style::default().bg(colors.bg))
                .title(" ⌨ Keyboard Shortcuts ")
                .title_style(colors.text_primary()),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, popup_area);
}

/// Centered popup of at most `width` x `height`
fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn render_rule_editor(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();

    let Some(ref editor) = state.rule_editor else {
        return;
    };

    let popup_area = popup_rect(frame.area(), 76, 24);

    // Clear the area
    frame.render_widget(Clear, popup_area);

    let title = match editor.original_name {
        Some(ref name) if state.mode == Mode::EditRule => format!(" ✏ Edit Rule: {} ", name),
        _ => " ✚ New Rule ".to_string(),
    };

    let mut content = vec![Line::from("")];
    let mut cursor_position = None;

    for &field in RuleField::all() {
        let focused = editor.field == field;
        let input = editor.input(field);

        let value_style = if focused {
            colors.selected()
        } else {
            colors.text()
        };
        let label_style = if focused {
            colors.text_primary()
        } else {
            colors.text_muted()
        };

        let label = Span::styled(
            format!(
                " {} {:<width$}",
                if focused { "▸" } else { " " },
                format!("{}:", field.label()),
                width = LABEL_WIDTH
            ),
            label_style,
        );

        if focused {
            let before: String = input.value.chars().take(input.cursor).collect();
            let row = before.matches('\n').count();
            let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count());
            cursor_position = Some((content.len() + row, MARKER_WIDTH + LABEL_WIDTH + col));
        }

        if input.value.is_empty() {
            content.push(Line::from(vec![
                label,
                Span::styled(field.placeholder(), colors.text_muted()),
            ]));
            continue;
        }

        match field.kind() {
            FieldKind::Line => {
                content.push(Line::from(vec![label, Span::styled(input.value.clone(), value_style)]));
            }
            FieldKind::Multiline => {
                let indent = " ".repeat(MARKER_WIDTH + LABEL_WIDTH);
                for (i, line) in input.value.split('\n').enumerate() {
                    let lead = if i == 0 {
                        label.clone()
                    } else {
                        Span::raw(indent.clone())
                    };
                    content.push(Line::from(vec![lead, Span::styled(line.to_string(), value_style)]));
                }
            }
        }
    }

    content.push(Line::from(""));
    content.push(Line::styled(format!("  {}", editor.field.help()), colors.text_muted()));

    let editor_widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block_focus())
            .style(Style::default().bg(colors.bg))
            .title(title)
            .title_style(colors.text_primary().add_modifier(Modifier::BOLD))
            .title_bottom(" Tab: next field │ Enter: save │ Esc: cancel "),
    );

    frame.render_widget(editor_widget, popup_area);

    if let Some((row, col)) = cursor_position {
        let x = popup_area.x + 1 + col as u16;
        let y = popup_area.y + 1 + row as u16;
        if x < popup_area.right().saturating_sub(1) && y < popup_area.bottom().saturating_sub(1) {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn render_confirm_delete(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = popup_rect(frame.area(), 50, 8);

    // Clear area behind popup
    frame.render_widget(Clear, popup_area);

    let name = state.pending_delete.as_deref().unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Delete rule ", colors.text()),
            Span::styled(
                format!("'{}'", name),
                Style::default().fg(colors.warning).add_modifier(Modifier::BOLD),
            ),
            Span::styled("?", colors.text()),
        ]),
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " [Y] ",
                Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Delete"),
            Span::raw("    "),
            Span::styled(" [N/Esc] ", colors.text_muted()),
            Span::raw("Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.warning))
            .style(Style::default().bg(colors.bg))
            .title(" Delete Rule ")
            .title_style(Style::default().fg(colors.warning).add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(paragraph, popup_area);
}

fn render_format_editor(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();

    let Some(ref input) = state.format_editor else {
        return;
    };

    let popup_area = popup_rect(frame.area(), 60, 9);
    frame.render_widget(Clear, popup_area);

    let sample = if input.value.is_empty() {
        datetime::format(&Local::now(), datetime::DEFAULT_FORMAT)
    } else {
        datetime::format(&Local::now(), &input.value)
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Format:  ", colors.text_primary()),
            Span::styled(input.value.clone(), colors.selected()),
        ]),
        Line::from(vec![
            Span::styled("  Example: ", colors.text_muted()),
            Span::styled(sample, colors.text_success()),
        ]),
        Line::from(""),
        Line::styled(
            "  YYYY MM DD HH mm ss SSS, [text] is kept as is",
            colors.text_muted(),
        ),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block_focus())
            .style(Style::default().bg(colors.bg))
            .title(" Date Format ")
            .title_style(colors.text_primary().add_modifier(Modifier::BOLD))
            .title_bottom(" Enter: save │ Esc: cancel "),
    );
    frame.render_widget(widget, popup_area);

    let x = popup_area.x + 1 + 11 + input.cursor as u16;
    let y = popup_area.y + 2;
    if x < popup_area.right().saturating_sub(1) {
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_preview(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();

    let Some(ref preview) = state.preview else {
        return;
    };

    let popup_area = popup_rect(frame.area(), 76, 22);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from("")];

    match &preview.result {
        PreviewResult::Plan(plan) => {
            lines.push(Line::from(vec![
                Span::styled("  Rule:   ", colors.text_muted()),
                Span::styled(plan.rule.clone(), colors.text_success().add_modifier(Modifier::BOLD)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Note:   ", colors.text_muted()),
                Span::styled(plan.file_path(), colors.text()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Embed:  ", colors.text_muted()),
                Span::styled(plan.embed.trim_end().to_string(), colors.text()),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::styled("  Content", colors.text_muted()));
            lines.extend(
                plan.content
                    .lines()
                    .map(|l| Line::styled(format!("    {}", l), colors.text())),
            );
        }
        PreviewResult::NoMatch => {
            lines.push(Line::styled(
                "  No rule matches. The text would be pasted as is.",
                colors.text_warning(),
            ));
            lines.push(Line::from(""));
            lines.extend(
                preview
                    .text
                    .lines()
                    .map(|l| Line::styled(format!("    {}", l), colors.text_muted())),
            );
        }
        PreviewResult::Error(e) => {
            lines.push(Line::styled(format!("  {}", e), colors.text_error()));
        }
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block_focus())
                .style(Style::default().bg(colors.bg))
                .title(format!(" Paste into {} ", PREVIEW_NOTE))
                .title_style(colors.text_primary().add_modifier(Modifier::BOLD))
                .title_bottom(" Esc: close "),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(widget, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::RuleEditorState;
    use crate::config::Config;
    use crate::rules::Rule;
    use crate::theme::Theme;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_rules_in_order() {
        let mut config = Config::default();
        config.user_rules.insert(Rule::new("links", "^https?://", "Links", "${date}"));
        config.user_rules.insert(Rule::new("broken", "(", "Broken", "${date}"));
        let state = AppState::new(config, None, Theme::default());

        let screen = draw(&state);
        let links = screen.find("links").unwrap();
        let broken = screen.find("broken").unwrap();
        assert!(links < broken);
        assert!(screen.contains("!!"));
    }

    #[test]
    fn test_renders_editor_and_preview() {
        let mut state = AppState::new(Config::default(), None, Theme::default());
        state.rule_editor = Some(RuleEditorState::new_rule());
        state.mode = Mode::AddRule;
        assert!(draw(&state).contains("New Rule"));

        state.preview_paste("hello".to_string());
        assert!(draw(&state).contains("No rule matches"));
    }
}
