//! Decorative effects: fade-in on scroll, parallax, ripples and card hover

use super::clock::{Millis, Scheduler};
use super::dom::{Dom, Element, ElementId};
use super::error::Result;
use super::nav::Viewport;
use super::Task;

/// Classes watched by the fade-in observer
pub const OBSERVED_CLASSES: [&str; 5] = ["blog-card", "contact-item", "stat", "about-content", "hero-content"];
const PARALLAX_CLASSES: [&str; 2] = ["hero-image", "about-image"];
const PARALLAX_RATE: f64 = -0.5;
const REVEAL_THRESHOLD: f64 = 0.1;
const REVEAL_BOTTOM_MARGIN: f64 = 50.0;

/// Elements to watch, captured once when the page becomes ready
pub fn observed_elements(dom: &Dom) -> Vec<ElementId> {
    let mut ids: Vec<ElementId> = OBSERVED_CLASSES
        .iter()
        .flat_map(|class| dom.query_class(class))
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Observed block containing `element`, or `element` itself
pub fn observed_block(dom: &Dom, element: ElementId) -> Option<ElementId> {
    dom.closest_where(element, |e| OBSERVED_CLASSES.iter().any(|c| e.has_class(c)))
}

/// Add `animate-in` to `element`. Returns the `.stat-number` inside it when
/// the element is a stat, so the caller can start its counter.
pub fn animate_in(dom: &mut Dom, element: ElementId) -> Result<Option<ElementId>> {
    let el = dom.element_mut(element)?;
    el.add_class("animate-in");
    if el.has_class("stat") {
        return Ok(dom.find_in(element, "stat-number"));
    }
    Ok(None)
}

/// Run the observer over `observed`, returning counters to start
pub fn reveal_visible(dom: &mut Dom, viewport: &Viewport, observed: &[ElementId]) -> Result<Vec<ElementId>> {
    let entering: Vec<ElementId> = observed
        .iter()
        .copied()
        .filter(|id| {
            dom.get(*id).is_some_and(|e| {
                viewport.intersection_ratio(&e.rect, REVEAL_BOTTOM_MARGIN) >= REVEAL_THRESHOLD
            })
        })
        .collect();

    let mut counters = Vec::new();
    for id in entering {
        if let Some(number) = animate_in(dom, id)? {
            counters.push(number);
        }
    }
    Ok(counters)
}

/// Shift parallax layers that sit fully inside the viewport
pub fn parallax(dom: &mut Dom, viewport: &Viewport) {
    let offset = viewport.scroll_y * PARALLAX_RATE;
    let offset = if offset == 0.0 { 0.0 } else { offset }; // no "-0px"
    for class in PARALLAX_CLASSES {
        for id in dom.query_class(class) {
            if let Some(el) = dom.get(id) {
                if !viewport.contains(&el.rect) {
                    continue;
                }
            }
            if let Ok(el) = dom.element_mut(id) {
                el.set_style("transform", format!("translateY({}px)", offset));
            }
        }
    }
}

/// Expanding circle from the click point; removed after `lifetime`
pub fn ripple(
    dom: &mut Dom,
    clock: &mut Scheduler<Task>,
    button: ElementId,
    pointer: Option<(f64, f64)>,
    viewport: &Viewport,
    lifetime: Millis,
) -> Result<ElementId> {
    let rect = viewport.client_rect(&dom.element(button)?.rect);
    let size = rect.width.max(rect.height);
    // Without pointer coordinates the ripple starts from the centre
    let (px, py) = pointer.unwrap_or((rect.left + rect.width / 2.0, rect.top + rect.height / 2.0));
    let x = px - rect.left - size / 2.0;
    let y = py - rect.top - size / 2.0;

    let el = dom.element_mut(button)?;
    el.set_style("position", "relative");
    el.set_style("overflow", "hidden");

    let span = dom.append(
        button,
        Element::new("span")
            .class("ripple")
            .styled("width", format!("{}px", size))
            .styled("height", format!("{}px", size))
            .styled("left", format!("{}px", x))
            .styled("top", format!("{}px", y))
            .styled("animation", "ripple 0.6s linear"),
    )?;
    clock.schedule_after(lifetime, Task::RemoveRipple { element: span });
    Ok(span)
}

pub fn hover_card(dom: &mut Dom, card: ElementId, entering: bool) -> Result<()> {
    let transform = if entering {
        "translateY(-8px) scale(1.02)"
    } else {
        "translateY(0) scale(1)"
    };
    dom.element_mut(card)?.set_style("transform", transform);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::dom::Rect;

    #[test]
    fn test_reveal_returns_stat_counters() {
        let mut dom = Dom::new();
        let body = dom.body();
        let stat = dom
            .append(body, Element::new("div").class("stat").at(Rect::new(100.0, 0.0, 200.0, 100.0)))
            .unwrap();
        let number = dom.append(stat, Element::new("span").class("stat-number")).unwrap();
        let far = dom
            .append(body, Element::new("div").class("contact-item").at(Rect::new(3000.0, 0.0, 200.0, 100.0)))
            .unwrap();

        let observed = observed_elements(&dom);
        assert_eq!(observed, vec![stat, far]);

        let vp = Viewport::new(1280.0, 800.0, 4000.0);
        assert_eq!(reveal_visible(&mut dom, &vp, &observed).unwrap(), vec![number]);
        assert!(dom.element(stat).unwrap().has_class("animate-in"));
        assert!(!dom.element(far).unwrap().has_class("animate-in"));
    }

    #[test]
    fn test_reveal_respects_bottom_margin() {
        let mut dom = Dom::new();
        // Top edge 5px above the margin line: ratio 0.05 of a 100px box
        let card = dom
            .append(dom.body(), Element::new("article").class("blog-card").at(Rect::new(745.0, 0.0, 300.0, 100.0)))
            .unwrap();
        let mut vp = Viewport::new(1280.0, 800.0, 4000.0);
        reveal_visible(&mut dom, &vp, &[card]).unwrap();
        assert!(!dom.element(card).unwrap().has_class("animate-in"));

        vp.scroll_y = 10.0;
        reveal_visible(&mut dom, &vp, &[card]).unwrap();
        assert!(dom.element(card).unwrap().has_class("animate-in"));
    }

    #[test]
    fn test_observed_block_walks_up_from_inner_element() {
        let mut dom = Dom::new();
        let stat = dom.append(dom.body(), Element::new("div").class("stat")).unwrap();
        let number = dom.append(stat, Element::new("span").class("stat-number")).unwrap();
        let loose = dom.append(dom.body(), Element::new("p")).unwrap();

        assert_eq!(observed_block(&dom, number), Some(stat));
        assert_eq!(observed_block(&dom, stat), Some(stat));
        assert_eq!(observed_block(&dom, loose), None);
    }

    #[test]
    fn test_reveal_skips_detached_element() {
        let mut dom = Dom::new();
        let card = dom.append(dom.body(), Element::new("article").class("blog-card")).unwrap();
        let vp = Viewport::new(1280.0, 800.0, 4000.0);
        dom.remove(card);

        // Stale ids are filtered before animating, so nothing fails
        assert!(reveal_visible(&mut dom, &vp, &[card]).unwrap().is_empty());
    }

    #[test]
    fn test_parallax_only_moves_visible_layers() {
        let mut dom = Dom::new();
        let hero = dom
            .append(dom.body(), Element::new("div").class("hero-image").at(Rect::new(200.0, 600.0, 500.0, 400.0)))
            .unwrap();
        let about = dom
            .append(dom.body(), Element::new("div").class("about-image").at(Rect::new(2100.0, 0.0, 500.0, 400.0)))
            .unwrap();
        let mut vp = Viewport::new(1280.0, 800.0, 4000.0);
        vp.scroll_y = 100.0;

        parallax(&mut dom, &vp);
        assert_eq!(dom.element(hero).unwrap().style("transform"), Some("translateY(-50px)"));
        assert_eq!(dom.element(about).unwrap().style("transform"), None);
    }

    #[test]
    fn test_ripple_is_centred_and_expires() {
        let mut dom = Dom::new();
        let mut clock = Scheduler::new();
        let button = dom
            .append(dom.body(), Element::new("button").class("btn").at(Rect::new(100.0, 40.0, 120.0, 40.0)))
            .unwrap();
        let vp = Viewport::new(1280.0, 800.0, 4000.0);

        let span = ripple(&mut dom, &mut clock, button, Some((100.0, 120.0)), &vp, 600).unwrap();
        let el = dom.element(span).unwrap();
        assert_eq!(el.style("width"), Some("120px"));
        assert_eq!(el.style("left"), Some("0px"));
        assert_eq!(el.style("top"), Some("-40px"));
        assert!(clock.pop_due(599).is_none());
        assert_eq!(clock.pop_due(600).unwrap().1, Task::RemoveRipple { element: span });
    }
}
