//! Email marketing guide overlay

use super::dom::Dom;
use super::error::Result;
use super::nav::lock_body_scroll;

pub const MODAL_KEY: &str = "email-marketing-modal";
pub const MODAL_CONTENT_KEY: &str = "email-marketing-content";
pub const MODAL_HEADING: &str = "What is Email Advertising for Bloggers?";

pub fn open_modal(dom: &mut Dom) -> Result<()> {
    let modal = dom.require(MODAL_KEY)?;
    let content = dom.require(MODAL_CONTENT_KEY)?;

    dom.element_mut(content)?.text = MODAL_HEADING.to_string();
    dom.element_mut(modal)?.set_style("display", "block");
    lock_body_scroll(dom, true)
}

/// Hide the modal. Returns whether it was showing.
pub fn close_modal(dom: &mut Dom) -> Result<bool> {
    let modal = dom.require(MODAL_KEY)?;
    let el = dom.element_mut(modal)?;
    let was_open = el.style("display") == Some("block");
    el.set_style("display", "none");
    lock_body_scroll(dom, false)?;
    Ok(was_open)
}

pub fn modal_open(dom: &Dom) -> bool {
    dom.by_key(MODAL_KEY)
        .and_then(|id| dom.get(id))
        .is_some_and(|e| e.style("display") == Some("block"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::dom::Element;

    #[test]
    fn test_open_and_close() {
        let mut dom = Dom::new();
        let modal = dom
            .append(dom.body(), Element::new("div").key(MODAL_KEY).styled("display", "none"))
            .unwrap();
        dom.append(modal, Element::new("div").key(MODAL_CONTENT_KEY)).unwrap();

        open_modal(&mut dom).unwrap();
        assert!(modal_open(&dom));
        assert_eq!(dom.element(dom.body()).unwrap().style("overflow"), Some("hidden"));
        let content = dom.by_key(MODAL_CONTENT_KEY).unwrap();
        assert_eq!(dom.element(content).unwrap().text, MODAL_HEADING);

        assert!(close_modal(&mut dom).unwrap());
        assert!(!modal_open(&dom));
        assert!(!close_modal(&mut dom).unwrap());
    }
}
