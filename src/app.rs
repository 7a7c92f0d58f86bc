use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

use crate::config::AppConfig;
use crate::page::layout::NAV_SECTIONS;
use crate::page::notify::NotificationKind;
use crate::page::{Page, PageEvent};

/// Scroll step for j/k and the arrow keys, in document pixels
const SCROLL_STEP: f64 = 60.0;

const DEMO_TOASTS: [(&str, NotificationKind); 4] = [
    ("Draft saved", NotificationKind::Success),
    ("Could not reach the server", NotificationKind::Error),
    ("New comments on your post", NotificationKind::Info),
    ("Your session expires soon", NotificationKind::Warning),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub page: Page,
    pub popup: Popup,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Blog card under the virtual pointer
    pub hovered_card: Option<usize>,

    started: Instant,
    demo_index: usize,
    errors_seen: usize,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut page = Page::new(config)?;
        page.handle(PageEvent::Ready);
        if !page.is_ready() {
            anyhow::bail!("Page failed to initialize, see log for details");
        }

        Ok(Self {
            page,
            popup: Popup::None,
            status_message: None,
            status_message_time: None,
            hovered_card: None,
            started: Instant::now(),
            demo_index: 0,
            errors_seen: 0,
        })
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        let scroll_y = self.page.viewport().scroll_y;
        let page_height = self.page.viewport().height;

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll(scroll_y + SCROLL_STEP),
            KeyCode::Char('k') | KeyCode::Up => self.scroll(scroll_y - SCROLL_STEP),
            KeyCode::PageDown => self.scroll(scroll_y + page_height),
            KeyCode::PageUp => self.scroll(scroll_y - page_height),
            KeyCode::Char('g') | KeyCode::Home => self.scroll(0.0),

            KeyCode::Char('m') => self.click("mobile-menu"),
            KeyCode::Char(c @ '1'..='4') => {
                let index = (c as usize) - ('1' as usize);
                if let Some((section, _)) = NAV_SECTIONS.get(index) {
                    self.click(&format!("nav-{}", section));
                }
            }
            KeyCode::Char('b') => self.click("back-to-top"),
            KeyCode::Char('l') => self.click("load-more"),
            KeyCode::Char('s') => {
                self.input("newsletter-email", "reader@example.com");
                self.click("newsletter-submit");
            }
            KeyCode::Char('c') => {
                self.input("contact-name", "Ada Reader");
                self.input("contact-email", "ada@example.com");
                self.input("contact-message", "Loved the post on minimalist design!");
                self.click("contact-submit");
            }
            KeyCode::Char('x') => {
                if self.page.notification().is_some() {
                    self.click("notification-close");
                } else {
                    self.set_status("No notification to close");
                }
            }
            KeyCode::Char('e') => self.click("email-marketing-open"),
            KeyCode::Char('t') => {
                let (message, kind) = DEMO_TOASTS[self.demo_index % DEMO_TOASTS.len()];
                self.demo_index += 1;
                self.page.notify(message, kind);
            }
            KeyCode::Tab => self.move_hover(),
            KeyCode::Esc => self.page.handle(PageEvent::key("Escape")),
            KeyCode::Char('?') => self.popup = Popup::Help,
            _ => {}
        }

        if self.page.errors_reported() > self.errors_seen {
            self.errors_seen = self.page.errors_reported();
            self.set_status("Page error, see log for details");
        }
        Ok(())
    }

    pub fn tick(&mut self) -> Result<()> {
        // Page clock follows wall time since startup
        let elapsed = self.started.elapsed().as_millis() as u64;
        self.page.advance_to(elapsed);

        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        Ok(())
    }

    fn scroll(&mut self, y: f64) {
        self.page.handle(PageEvent::Scroll { y });
    }

    fn click(&mut self, key: &str) {
        self.page.handle(PageEvent::click(key));
    }

    fn input(&mut self, key: &str, value: &str) {
        self.page.handle(PageEvent::Input {
            target: key.to_string(),
            value: value.to_string(),
        });
    }

    /// Move the virtual pointer to the next blog card
    fn move_hover(&mut self) {
        let cards = self.card_keys();
        if cards.is_empty() {
            return;
        }

        if let Some(previous) = self.hovered_card.and_then(|i| cards.get(i)) {
            self.page.handle(PageEvent::MouseLeave {
                target: previous.clone(),
            });
        }

        let next = self.hovered_card.map_or(0, |i| (i + 1) % cards.len());
        self.page.handle(PageEvent::MouseEnter {
            target: cards[next].clone(),
        });
        self.hovered_card = Some(next);
        self.set_status(format!("Hovering {}", cards[next]));
    }

    fn card_keys(&self) -> Vec<String> {
        let dom = self.page.dom();
        dom.by_key("blog-grid")
            .map(|grid| {
                dom.children(grid)
                    .iter()
                    .filter_map(|id| dom.get(*id).and_then(|e| e.key.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
