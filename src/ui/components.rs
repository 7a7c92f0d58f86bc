//! Small building blocks shared by the boxes in mod.rs

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
};

use super::{accent, inactive, text_dim};

/// Bordered box; `active` boxes get the accent colour and a bold title
pub fn titled_block(title: &str, active: bool) -> Block<'static> {
    let border_color = if active { accent() } else { inactive() };
    let title_style = if active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    Block::default()
        .title(Span::styled(format!(" {} ", title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

/// `key label` pair for footers and help text
pub fn key_hint(key: &str, label: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(key.to_string(), Style::default().fg(accent())),
        Span::styled(format!(" {}  ", label), Style::default().fg(text_dim())),
    ]
}

/// Toast slot pinned to the top-right corner of `area`
pub fn toast_area(area: Rect, message_width: u16) -> Rect {
    let width = message_width
        .saturating_add(8)
        .max(24)
        .min(area.width.saturating_sub(2).max(1));
    let height = 3.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1.min(area.height.saturating_sub(height)),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_area_stays_inside_frame() {
        let frame = Rect::new(0, 0, 100, 30);
        let toast = toast_area(frame, 40);
        assert_eq!(toast.width, 48);
        assert_eq!(toast.x + toast.width, 99);
        assert_eq!(toast.y, 1);

        let tiny = Rect::new(0, 0, 20, 2);
        let toast = toast_area(tiny, 200);
        assert!(toast.x + toast.width <= tiny.width);
        assert!(toast.height <= tiny.height);
    }
}
