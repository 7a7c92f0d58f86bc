mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::page::dom::Element;
use crate::page::layout::NAV_SECTIONS;
use crate::page::{modal, nav, Page};
use crate::theme::Theme;

use components::{key_hint, titled_block, toast_area};

// Theme is fixed once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme. Only the first call wins.
pub fn set_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already set");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

fn element<'a>(page: &'a Page, key: &str) -> Option<&'a Element> {
    let dom = page.dom();
    dom.by_key(key).and_then(|id| dom.get(id))
}

fn flag(on: bool, label: &str) -> Span<'static> {
    if on {
        Span::styled(format!("● {}  ", label), Style::default().fg(success()))
    } else {
        Span::styled(format!("○ {}  ", label), Style::default().fg(text_dim()))
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),               // Info line
            Constraint::Length(3),               // Navbar box
            Constraint::Min(8),                  // Blog grid + side panels
            Constraint::Length(3),               // Effects box
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_navbar_box(f, app, chunks[1]);
    draw_body(f, app, chunks[2]);
    draw_effects_box(f, app, chunks[3]);
    draw_footer(f, chunks[4]);

    // Overlays on top, toast last so it stays above the modal
    if modal::modal_open(app.page.dom()) {
        draw_modal(f, app);
    }
    if app.popup == Popup::Help {
        draw_help_popup(f);
    }
    draw_toast(f, app);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(vec![
            Span::styled(status.clone(), Style::default().fg(warning())),
        ])
    } else {
        let viewport = app.page.viewport();
        let max = viewport.clamp(f64::MAX);
        Line::from(vec![
            Span::styled(format!("t={}ms", app.page.now()), Style::default().fg(text_dim())),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(
                format!("scroll {:.0}/{:.0}", viewport.scroll_y, max),
                Style::default().fg(text_dim()),
            ),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(
                format!("{} timers", app.page.pending_tasks()),
                Style::default().fg(text_dim()),
            ),
        ])
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_navbar_box(f: &mut Frame, app: &App, area: Rect) {
    let page = &app.page;
    let navbar = element(page, "navbar");
    let scrolled = navbar.is_some_and(|n| n.has_class("scrolled"));
    let hidden = navbar.is_some_and(|n| n.style("transform") == Some("translateY(-100%)"));

    let mut spans = vec![Span::styled(
        if nav::menu_open(page.dom()) { "☰ open  " } else { "☰  " },
        Style::default().fg(if nav::menu_open(page.dom()) { accent() } else { text_dim() }),
    )];

    for (i, (key, label)) in NAV_SECTIONS.iter().enumerate() {
        let active = element(page, &format!("nav-{}", key)).is_some_and(|l| l.has_class("active"));
        let style = if active {
            Style::default().fg(accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text())
        };
        spans.push(Span::styled(format!("{}", i + 1), Style::default().fg(text_dim())));
        spans.push(Span::styled(format!(" {}   ", label), style));
    }
    spans.push(flag(scrolled, "scrolled"));
    spans.push(flag(hidden, "hidden"));

    let block = titled_block("Blog2025", !hidden);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_body(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),  // Blog grid
            Constraint::Percentage(40),  // Stats and forms
        ])
        .split(area);

    draw_blog_box(f, app, chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(chunks[1]);

    draw_stats_box(f, app, side[0]);
    draw_forms_box(f, app, side[1]);
}

fn draw_blog_box(f: &mut Frame, app: &App, area: Rect) {
    let page = &app.page;
    let dom = page.dom();

    let header = Row::new(vec![
        Span::styled("", Style::default().fg(header())),
        Span::styled("Title", Style::default().fg(header())),
        Span::styled("Category", Style::default().fg(header())),
        Span::styled("State", Style::default().fg(header())),
    ]);

    let cards: Vec<&Element> = dom
        .by_key("blog-grid")
        .map(|grid| dom.children(grid).iter().filter_map(|id| dom.get(*id)).collect())
        .unwrap_or_default();

    let rows: Vec<Row> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let (state, color) = if card.style("opacity") == Some("0") {
                ("loading", warning())
            } else if card.has_class("animate-in") || card.style("opacity") == Some("1") {
                ("shown", success())
            } else {
                ("-", text_dim())
            };
            let hovered = app.hovered_card == Some(i);
            let row_style = if hovered {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default()
            };

            Row::new(vec![
                Span::styled(if hovered { "▸" } else { " " }, Style::default().fg(accent())),
                Span::styled(card.text.clone(), Style::default().fg(text())),
                Span::styled(
                    card.data.get("category").cloned().unwrap_or_else(|| "-".to_string()),
                    Style::default().fg(text_dim()),
                ),
                Span::styled(state, Style::default().fg(color)),
            ])
            .style(row_style)
        })
        .collect();

    let (button_label, button_color) = match element(page, "load-more") {
        Some(b) if b.is_hidden() => ("end of feed".to_string(), text_dim()),
        Some(b) if b.disabled => (b.text.clone(), warning()),
        Some(b) => (format!("(l) {}", b.text), accent()),
        None => (String::new(), text_dim()),
    };

    let widths = vec![
        Constraint::Length(2),
        Constraint::Percentage(60),
        Constraint::Percentage(18),
        Constraint::Percentage(16),
    ];

    let block = titled_block(&format!("Blog · {} posts", cards.len()), true)
        .title_bottom(Line::from(Span::styled(format!(" {} ", button_label), Style::default().fg(button_color))));

    let table = Table::new(rows, widths)
        .header(header.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

fn draw_stats_box(f: &mut Frame, app: &App, area: Rect) {
    let dom = app.page.dom();
    let lines: Vec<Line> = dom
        .query_class("stat")
        .into_iter()
        .filter_map(|id| dom.get(id).map(|stat| (id, stat)))
        .map(|(id, stat)| {
            let number = dom.find_in(id, "stat-number").and_then(|n| dom.get(n));
            let counting = number
                .and_then(|n| n.key.as_deref())
                .is_some_and(|key| app.page.counter_running(key));
            let number = number.map(|n| n.text.clone()).unwrap_or_default();
            let label = stat.data.get("label").cloned().unwrap_or_default();
            let color = if counting {
                warning()
            } else if stat.has_class("animate-in") {
                accent()
            } else {
                text_dim()
            };
            Line::from(vec![
                Span::styled(format!("{:>8} ", number), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(label, Style::default().fg(text_dim())),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(titled_block("About", false)), area);
}

fn draw_forms_box(f: &mut Frame, app: &App, area: Rect) {
    let page = &app.page;
    let field = |key: &str, label: &str| -> Line<'static> {
        let value = element(page, key).map(|e| e.value.clone()).unwrap_or_default();
        Line::from(vec![
            Span::styled(format!("  {:<9}", label), Style::default().fg(text_dim())),
            Span::styled(if value.is_empty() { "…".to_string() } else { value }, Style::default().fg(text())),
        ])
    };
    let submit = |key: &str, hotkey: &str| -> Line<'static> {
        match element(page, key) {
            Some(b) if b.disabled => Line::from(Span::styled(
                format!("  [{}]", b.text),
                Style::default().fg(warning()),
            )),
            Some(b) => Line::from(vec![
                Span::styled(format!("  ({}) ", hotkey), Style::default().fg(accent())),
                Span::styled(format!("[{}]", b.text), Style::default().fg(text())),
            ]),
            None => Line::from(""),
        }
    };

    let lines = vec![
        Line::from(Span::styled("Newsletter", Style::default().fg(header()))),
        field("newsletter-email", "Email"),
        submit("newsletter-submit", "s"),
        Line::from(Span::styled("Contact", Style::default().fg(header()))),
        field("contact-name", "Name"),
        field("contact-email", "Email"),
        field("contact-message", "Message"),
        submit("contact-submit", "c"),
    ];

    f.render_widget(
        Paragraph::new(lines).block(titled_block("Forms", false)).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_effects_box(f: &mut Frame, app: &App, area: Rect) {
    let page = &app.page;
    let dom = page.dom();
    let back_to_top = element(page, "back-to-top").is_some_and(|b| b.has_class("visible"));
    let parallax = dom
        .query_class("hero-image")
        .first()
        .and_then(|id| dom.get(*id))
        .and_then(|e| e.style("transform"))
        .unwrap_or("none")
        .to_string();
    let ripples = dom.query_class("ripple").len();

    let spans = vec![
        Span::raw("  "),
        flag(back_to_top, "back to top (b)"),
        Span::styled(format!("hero {}  ", parallax), Style::default().fg(text_dim())),
        Span::styled(format!("ripples {}  ", ripples), Style::default().fg(text_dim())),
        flag(page.feed_exhausted(), "feed exhausted"),
        Span::styled(format!("errors {}", page.errors_reported()), Style::default().fg(text_dim())),
    ];

    f.render_widget(Paragraph::new(Line::from(spans)).block(titled_block("Effects", false)), area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (key, label) in [
        ("j/k", "scroll"),
        ("1-4", "nav"),
        ("m", "menu"),
        ("Tab", "hover"),
        ("t", "toast"),
        ("x", "close"),
        ("e", "guide"),
        ("?", "help"),
        ("q", "quit"),
    ] {
        spans.extend(key_hint(key, label));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_toast(f: &mut Frame, app: &App) {
    let Some(notification) = app.page.notification() else {
        return;
    };

    let color = theme().kind_color(notification.kind);
    let width = notification.message.chars().count().min(u16::MAX as usize) as u16;
    let area = toast_area(f.area(), width);
    let leaving = app.page.notification_leaving();

    f.render_widget(Clear, area);
    let border = if leaving { inactive() } else { color };
    let toast = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", notification.kind.as_str()), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(notification.message.clone(), Style::default().fg(if leaving { text_dim() } else { text() })),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title_bottom(Line::from(Span::styled(" x ", Style::default().fg(text_dim()))).right_aligned()),
    );
    f.render_widget(toast, area);
}

fn draw_modal(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, popup_area);

    let heading = element(&app.page, modal::MODAL_CONTENT_KEY)
        .map(|e| e.text.clone())
        .unwrap_or_default();

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(heading, Style::default().fg(accent()).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            "Grow a loyal readership by sending new posts straight to subscribers.",
            Style::default().fg(text()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Email Marketing Guide ", Style::default().fg(accent())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(body, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, popup_area);

    let section = |title: &str| {
        Line::from(Span::styled(
            format!("═══ {} ═══", title),
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        ))
    };
    let entry = |key: &str, what: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), Style::default().fg(accent())),
            Span::raw(what.to_string()),
        ])
    };

    let help_text = vec![
        section("Scrolling"),
        entry("j/k ↑/↓", "Scroll the page"),
        entry("PgUp/PgDn", "Scroll one viewport"),
        entry("g/Home", "Jump to top"),
        entry("b", "Back-to-top button"),
        Line::from(""),
        section("Navigation"),
        entry("m", "Toggle mobile menu"),
        entry("1-4", "Follow a nav link"),
        entry("Esc", "Close menu and guide"),
        Line::from(""),
        section("Page"),
        entry("l", "Load more posts"),
        entry("s", "Subscribe to newsletter"),
        entry("c", "Send contact form"),
        entry("e", "Open email marketing guide"),
        entry("Tab", "Hover next blog card"),
        entry("t", "Show a demo notification"),
        entry("x", "Close the notification"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" blogfx Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
