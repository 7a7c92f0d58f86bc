//! Navbar, mobile menu and scroll position handling

use super::dom::{Dom, Rect};
use super::error::Result;

/// Height of the fixed navbar, subtracted when scrolling to a section
pub const NAVBAR_OFFSET: f64 = 80.0;
const SCROLLED_THRESHOLD: f64 = 50.0;
const HIDE_THRESHOLD: f64 = 200.0;
const ACTIVE_SECTION_OFFSET: f64 = 200.0;
const BACK_TO_TOP_THRESHOLD: f64 = 300.0;

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub last_scroll_y: f64,      // Position seen by the previous navbar update
    pub width: f64,
    pub height: f64,
    pub document_height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, document_height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            last_scroll_y: 0.0,
            width,
            height,
            document_height,
        }
    }

    /// Clamp a requested scroll position to what the document allows
    pub fn clamp(&self, y: f64) -> f64 {
        let max = (self.document_height - self.height).max(0.0);
        y.clamp(0.0, max)
    }

    /// Element box relative to the viewport, like getBoundingClientRect
    pub fn client_rect(&self, rect: &Rect) -> Rect {
        Rect::new(rect.top - self.scroll_y, rect.left, rect.width, rect.height)
    }

    /// Fully inside the visible window
    pub fn contains(&self, rect: &Rect) -> bool {
        let r = self.client_rect(rect);
        r.top >= 0.0 && r.left >= 0.0 && r.bottom() <= self.height && r.right() <= self.width
    }

    /// Fraction of `rect` visible, with the bottom edge pulled in by `bottom_margin`
    pub fn intersection_ratio(&self, rect: &Rect, bottom_margin: f64) -> f64 {
        if rect.height <= 0.0 {
            return 0.0;
        }
        let r = self.client_rect(rect);
        let visible_top = r.top.max(0.0);
        let visible_bottom = r.bottom().min(self.height - bottom_margin);
        ((visible_bottom - visible_top) / rect.height).clamp(0.0, 1.0)
    }
}

/// Open/close the mobile menu. Returns whether it is now open.
pub fn toggle_menu(dom: &mut Dom) -> Result<bool> {
    let toggle = dom.require("mobile-menu")?;
    let menu = dom.require("nav-menu")?;

    dom.element_mut(toggle)?.toggle_class("active");
    let open = dom.element_mut(menu)?.toggle_class("active");
    lock_body_scroll(dom, open)?;
    Ok(open)
}

/// Close the mobile menu. Returns whether it was open.
pub fn close_menu(dom: &mut Dom) -> Result<bool> {
    let toggle = dom.require("mobile-menu")?;
    let menu = dom.require("nav-menu")?;

    let was_open = dom.element(menu)?.has_class("active");
    dom.element_mut(toggle)?.remove_class("active");
    dom.element_mut(menu)?.remove_class("active");
    lock_body_scroll(dom, false)?;
    Ok(was_open)
}

pub fn menu_open(dom: &Dom) -> bool {
    dom.by_key("nav-menu")
        .and_then(|id| dom.get(id))
        .is_some_and(|e| e.has_class("active"))
}

pub fn lock_body_scroll(dom: &mut Dom, locked: bool) -> Result<()> {
    let body = dom.body();
    dom.element_mut(body)?
        .set_style("overflow", if locked { "hidden" } else { "" });
    Ok(())
}

/// Navbar styling and auto-hide for the current scroll position
pub fn update_navbar(dom: &mut Dom, viewport: &mut Viewport) -> Result<()> {
    let navbar = dom.require("navbar")?;
    let y = viewport.scroll_y;
    let el = dom.element_mut(navbar)?;

    if y > SCROLLED_THRESHOLD {
        el.add_class("scrolled");
    } else {
        el.remove_class("scrolled");
    }

    // Hide while scrolling down, show again on any upward scroll
    if y > viewport.last_scroll_y && y > HIDE_THRESHOLD {
        el.set_style("transform", "translateY(-100%)");
    } else {
        el.set_style("transform", "translateY(0)");
    }

    viewport.last_scroll_y = y;
    Ok(())
}

/// Mark the nav link for the section currently under the navbar.
/// Returns the active section key, if any.
pub fn highlight_active_link(dom: &mut Dom, viewport: &Viewport) -> Option<String> {
    let current = dom
        .query_tag("section")
        .into_iter()
        .filter_map(|id| dom.get(id))
        .filter(|s| viewport.scroll_y >= s.rect.top - ACTIVE_SECTION_OFFSET)
        .filter_map(|s| s.key.clone())
        .last();

    let anchor = current.as_ref().map(|c| format!("#{}", c));
    for link in dom.query_class("nav-link") {
        if let Ok(el) = dom.element_mut(link) {
            let matches = anchor.is_some() && el.data.get("href") == anchor.as_ref();
            if matches {
                el.add_class("active");
            } else {
                el.remove_class("active");
            }
        }
    }
    current
}

pub fn update_back_to_top(dom: &mut Dom, viewport: &Viewport) -> Result<()> {
    let button = dom.require("back-to-top")?;
    let el = dom.element_mut(button)?;
    if viewport.scroll_y > BACK_TO_TOP_THRESHOLD {
        el.add_class("visible");
    } else {
        el.remove_class("visible");
    }
    Ok(())
}

/// Scroll position that brings section `key` just under the navbar
pub fn section_scroll_target(dom: &Dom, key: &str) -> Option<f64> {
    let id = dom.by_key(key)?;
    Some(dom.get(id)?.rect.top - NAVBAR_OFFSET)
}
