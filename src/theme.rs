//! Previewer colours
//! Defaults follow the page's own palette; `[theme]` in the config overrides them.

use ratatui::style::Color;

use crate::config::ThemeConfig;
use crate::page::notify::NotificationKind;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,           // Active borders, buttons, highlights
    pub text: Color,             // Primary text
    pub text_dim: Color,         // Hints, inactive labels
    pub inactive: Color,         // Inactive borders
    pub bg_selected: Color,      // Hovered / active rows
    pub header: Color,           // Box section headers
    pub success: Color,
    pub error: Color,
    pub info: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(102, 126, 234),    // #667eea
            text: Color::Rgb(226, 232, 240),
            text_dim: Color::Rgb(148, 163, 184),
            inactive: Color::Rgb(71, 85, 105),
            bg_selected: Color::Rgb(51, 65, 85),
            header: Color::Rgb(118, 75, 162),     // #764ba2
            success: Color::Rgb(16, 185, 129),    // #10b981
            error: Color::Rgb(239, 68, 68),       // #ef4444
            info: Color::Rgb(59, 130, 246),       // #3b82f6
            warning: Color::Rgb(245, 158, 11),    // #f59e0b
        }
    }
}

impl Theme {
    /// Defaults with any valid overrides from `config` applied.
    /// Unparseable colours are logged and skipped.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = Self::default();
        let overrides = [
            (&config.accent, &mut theme.accent, "accent"),
            (&config.text, &mut theme.text, "text"),
            (&config.success, &mut theme.success, "success"),
            (&config.error, &mut theme.error, "error"),
            (&config.info, &mut theme.info, "info"),
            (&config.warning, &mut theme.warning, "warning"),
        ];

        for (value, slot, name) in overrides {
            let Some(value) = value else { continue };
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid theme color {} = {:?}", name, value),
            }
        }
        theme
    }

    /// Border colour for a toast of `kind`
    pub fn kind_color(&self, kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Error => self.error,
            NotificationKind::Info => self.info,
            NotificationKind::Warning => self.warning,
        }
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    pub fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}
