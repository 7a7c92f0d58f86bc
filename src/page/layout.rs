//! Initial document for the blog page
//!
//! Geometry is a fixed desktop layout; only the parts the handlers read
//! (section offsets, observed blocks, parallax layers, button boxes) are
//! given real boxes.

use crate::config::PageConfig;

use super::dom::{Dom, Element, ElementId, Rect};
use super::error::Result;
use super::modal::{MODAL_CONTENT_KEY, MODAL_KEY};

pub const NAV_SECTIONS: [(&str, &str); 4] = [
    ("home", "Home"),
    ("blog", "Blog"),
    ("about", "About"),
    ("contact", "Contact"),
];

const INITIAL_TITLES: [&str; 6] = [
    "Getting Started with Modern Web Development",
    "The Future of Artificial Intelligence",
    "Remote Work: Building a Productive Home Office",
    "Photography Tips for Beginners",
    "Healthy Habits for Busy Professionals",
    "Traveling on a Budget in 2025",
];

const PAGE_WIDTH: f64 = 1280.0;
const GRID_TOP: f64 = 820.0;
const CARD_WIDTH: f64 = 360.0;
const CARD_HEIGHT: f64 = 420.0;
const CARD_COLUMNS: usize = 3;

/// Box for the `index`th card in the blog grid
pub fn card_rect(index: usize) -> Rect {
    let row = (index / CARD_COLUMNS) as f64;
    let col = (index % CARD_COLUMNS) as f64;
    Rect::new(GRID_TOP + row * (CARD_HEIGHT + 20.0), 40.0 + col * (CARD_WIDTH + 53.0), CARD_WIDTH, CARD_HEIGHT)
}

/// Total document height
pub const DOCUMENT_HEIGHT: f64 = 4200.0;

fn section(key: &str, top: f64, height: f64) -> Element {
    Element::new("section").key(key).at(Rect::new(top, 0.0, PAGE_WIDTH, height))
}

fn button(key: &str, label: &str, rect: Rect) -> Element {
    Element::new("button").key(key).class("btn").text(label).at(rect)
}

fn submit_button(key: &str, label: &str, rect: Rect) -> Element {
    button(key, label, rect).data("type", "submit")
}

/// Build the page into an empty document
pub fn build(dom: &mut Dom, config: &PageConfig) -> Result<()> {
    let body = dom.body();

    // Navigation
    let navbar = dom.append(body, Element::new("nav").key("navbar").at(Rect::new(0.0, 0.0, PAGE_WIDTH, 70.0)))?;
    dom.append(navbar, Element::new("button").key("mobile-menu").class("menu-toggle"))?;
    let menu = dom.append(navbar, Element::new("ul").key("nav-menu").class("nav-menu"))?;
    for (key, label) in NAV_SECTIONS {
        dom.append(
            menu,
            Element::new("a")
                .key(&format!("nav-{}", key))
                .class("nav-link")
                .data("href", format!("#{}", key))
                .text(label),
        )?;
    }

    // Hero
    let hero = dom.append(body, section("home", 0.0, 700.0).class("hero"))?;
    dom.append(hero, Element::new("div").key("hero-content").class("hero-content").at(Rect::new(150.0, 80.0, 520.0, 300.0)))?;
    dom.append(hero, Element::new("div").class("hero-image").at(Rect::new(120.0, 680.0, 500.0, 420.0)))?;
    dom.append(
        hero,
        Element::new("button")
            .key("hero-scroll")
            .class("hero-scroll")
            .at(Rect::new(620.0, 600.0, 80.0, 40.0)),
    )?;

    // Blog grid
    let blog = dom.append(body, section("blog", 700.0, 1500.0))?;
    let grid = dom.append(blog, Element::new("div").key("blog-grid").class("blog-grid"))?;
    for index in 0..config.initial_posts {
        let title = INITIAL_TITLES[index % INITIAL_TITLES.len()];
        dom.append(
            grid,
            Element::new("article")
                .key(&format!("post-{}", index + 1))
                .class("blog-card")
                .text(title)
                .at(card_rect(index)),
        )?;
    }
    dom.append(blog, button("load-more", "Load More Posts", Rect::new(2100.0, 540.0, 200.0, 48.0)))?;

    // About + stats
    let about = dom.append(body, section("about", 2200.0, 800.0))?;
    dom.append(about, Element::new("div").key("about-content").class("about-content").at(Rect::new(2280.0, 40.0, 560.0, 400.0)))?;
    dom.append(about, Element::new("div").class("about-image").at(Rect::new(2280.0, 680.0, 520.0, 400.0)))?;
    let stats = dom.append(about, Element::new("div").class("stats"))?;
    for (i, stat) in config.stats.iter().enumerate() {
        let block = dom.append(
            stats,
            Element::new("div")
                .key(&format!("stat-block-{}", i + 1))
                .class("stat")
                .data("label", stat.label.clone())
                .at(Rect::new(2720.0, 40.0 + i as f64 * 300.0, 260.0, 120.0)),
        )?;
        dom.append(
            block,
            Element::new("span")
                .key(&format!("stat-{}", i + 1))
                .class("stat-number")
                .data("target", stat.target.to_string())
                .text("0"),
        )?;
    }
    dom.append(
        about,
        button("email-marketing-open", "Email Marketing Guide", Rect::new(2860.0, 40.0, 240.0, 48.0)),
    )?;

    // Newsletter
    let newsletter = dom.append(body, section("newsletter", 3000.0, 400.0))?;
    let form = dom.append(newsletter, Element::new("form").key("newsletter-form"))?;
    dom.append(form, Element::new("input").key("newsletter-email").data("type", "email"))?;
    dom.append(form, submit_button("newsletter-submit", "Subscribe", Rect::new(3200.0, 700.0, 160.0, 48.0)))?;

    // Contact
    let contact = dom.append(body, section("contact", 3400.0, 800.0))?;
    for (i, label) in ["Email", "Phone", "Location"].into_iter().enumerate() {
        dom.append(
            contact,
            Element::new("div")
                .key(&format!("contact-item-{}", i + 1))
                .class("contact-item")
                .text(label)
                .at(Rect::new(3480.0 + i as f64 * 140.0, 40.0, 500.0, 120.0)),
        )?;
    }
    let form = dom.append(contact, Element::new("form").key("contact-form"))?;
    dom.append(form, Element::new("input").key("contact-name").data("type", "text"))?;
    dom.append(form, Element::new("input").key("contact-email").data("type", "email"))?;
    dom.append(form, Element::new("textarea").key("contact-message"))?;
    dom.append(form, submit_button("contact-submit", "Send Message", Rect::new(4000.0, 700.0, 200.0, 48.0)))?;

    // Fixed overlays
    dom.append(body, Element::new("button").key("back-to-top").class("back-to-top"))?;
    let modal = dom.append(body, Element::new("div").key(MODAL_KEY).class("modal").styled("display", "none"))?;
    dom.append(modal, Element::new("div").key(MODAL_CONTENT_KEY).class("modal-body"))?;

    Ok(())
}

/// Submit button inside `form`
pub fn submit_button_of(dom: &Dom, form: ElementId) -> Option<ElementId> {
    dom.descendants(form).into_iter().find(|id| {
        dom.get(*id)
            .is_some_and(|e| e.tag == "button" && e.data.get("type").map(String::as_str) == Some("submit"))
    })
}

/// Clear every field in `form`
pub fn reset_form(dom: &mut Dom, form: ElementId) -> Result<()> {
    for id in dom.descendants(form) {
        let el = dom.element_mut(id)?;
        if el.tag == "input" || el.tag == "textarea" {
            el.value.clear();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_structure() {
        let mut dom = Dom::new();
        build(&mut dom, &PageConfig::default()).unwrap();

        let grid = dom.by_key("blog-grid").unwrap();
        assert_eq!(dom.children(grid).len(), 6);
        assert_eq!(dom.query_class("nav-link").len(), 4);
        assert_eq!(dom.query_class("stat-number").len(), 4);

        // Every fade-in block is addressable by key
        let stat = dom.by_key("stat-block-2").unwrap();
        assert_eq!(dom.find_in(stat, "stat-number"), dom.by_key("stat-2"));
        assert!(dom.by_key("contact-item-3").is_some());
        assert!(dom.by_key("about-content").is_some());
        assert!(dom.by_key("hero-content").is_some());

        let form = dom.by_key("contact-form").unwrap();
        assert_eq!(submit_button_of(&dom, form), dom.by_key("contact-submit"));
    }

    #[test]
    fn test_reset_form_clears_fields() {
        let mut dom = Dom::new();
        build(&mut dom, &PageConfig::default()).unwrap();
        let email = dom.by_key("newsletter-email").unwrap();
        dom.element_mut(email).unwrap().value = "reader@example.com".to_string();

        let form = dom.by_key("newsletter-form").unwrap();
        reset_form(&mut dom, form).unwrap();
        assert!(dom.element(email).unwrap().value.is_empty());
        // Button label is not a field
        let submit = dom.by_key("newsletter-submit").unwrap();
        assert_eq!(dom.element(submit).unwrap().text, "Subscribe");
    }
}
