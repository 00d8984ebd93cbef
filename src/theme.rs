//! Theme configuration and colors for the settings editor.
//!
//! Palettes come from the `ratatui-themes` crate.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// Parse a theme by slug, falling back to the default theme
    pub fn from_name(name: Option<&str>) -> Theme {
        name.and_then(|n| n.parse::<ThemeName>().ok())
            .map(Theme)
            .unwrap_or_default()
    }

    /// Get the display name for the theme.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Get the color palette for this theme
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Colors and styles used by the editor
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub bg: Color,
    pub fg: Color,
    pub fg_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
    pub border_focus: Color,
    pub selection: Color,
}

impl ThemeColors {
    #[must_use]
    pub fn from_palette(p: ThemePalette) -> Self {
        Self {
            bg: p.bg,
            fg: p.fg,
            fg_muted: p.muted,
            primary: p.accent,
            accent: p.secondary,
            success: p.success,
            warning: p.warning,
            error: p.error,
            border: p.muted,
            border_focus: p.accent,
            selection: p.selection,
        }
    }

    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    #[must_use]
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    #[must_use]
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.primary)
    }

    #[must_use]
    pub fn text_success(&self) -> Style {
        Style::default().fg(self.success)
    }

    #[must_use]
    pub fn text_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    #[must_use]
    pub fn text_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Block border style
    #[must_use]
    pub fn block(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Focused block border style
    #[must_use]
    pub fn block_focus(&self) -> Style {
        Style::default().fg(self.border_focus)
    }

    /// Selected item style
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for shortcuts)
    #[must_use]
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::from_name(Some("no-such-theme")), Theme::default());
        assert_eq!(Theme::from_name(None), Theme::default());
    }
}
