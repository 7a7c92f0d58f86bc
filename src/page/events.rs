//! Page events and the handler registry
//!
//! Handlers are registered once, at ready time, as `Trigger → Action`
//! bindings. Dispatch looks up the trigger and runs the bound actions in
//! registration order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::dom::ElementId;

/// Events delivered by the host (browser, TUI, replay script)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// Document is ready; handlers are bound
    Ready,
    Click {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
    Submit {
        target: String,
    },
    Input {
        target: String,
        value: String,
    },
    MouseEnter {
        target: String,
    },
    MouseLeave {
        target: String,
    },
    Scroll {
        y: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
    Keydown {
        key: String,
    },
    /// Host visibility signal: the element entered the viewport
    Intersect {
        target: String,
    },
    /// Uncaught error reported by the host
    Error {
        message: String,
    },
}

impl PageEvent {
    pub fn click(target: &str) -> Self {
        PageEvent::Click {
            target: target.to_string(),
            x: None,
            y: None,
        }
    }

    pub fn key(key: &str) -> Self {
        PageEvent::Keydown {
            key: key.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Click(ElementId),
    Submit(ElementId),
    MouseEnter(ElementId),
    MouseLeave(ElementId),
    Scroll,
    Keydown,
}

impl Trigger {
    fn element(&self) -> Option<ElementId> {
        match self {
            Trigger::Click(id)
            | Trigger::Submit(id)
            | Trigger::MouseEnter(id)
            | Trigger::MouseLeave(id) => Some(*id),
            Trigger::Scroll | Trigger::Keydown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleMenu,
    CloseMenu,
    /// Smooth-scroll to the section named by the element's `data-href`
    FollowAnchor,
    ScrollToSection(String),
    ScrollToTop,
    NavbarOnScroll,
    HighlightActiveLink,
    BackToTopVisibility,
    Parallax,
    RevealVisible,
    Subscribe,
    SendContact,
    LoadMore,
    DismissToast { serial: u64 },
    Ripple,
    HoverCard,
    UnhoverCard,
    OpenModal,
    CloseModal,
    /// Escape key: close the menu and any open modal
    CloseOverlays,
}

#[derive(Debug, Default)]
pub struct Bindings {
    handlers: HashMap<Trigger, Vec<Action>>,
}

impl Bindings {
    pub fn bind(&mut self, trigger: Trigger, action: Action) {
        self.handlers.entry(trigger).or_default().push(action);
    }

    /// Drop every binding attached to `element`
    pub fn unbind_element(&mut self, element: ElementId) {
        self.handlers.retain(|t, _| t.element() != Some(element));
    }

    pub fn actions(&self, trigger: Trigger) -> Vec<Action> {
        self.handlers.get(&trigger).cloned().unwrap_or_default()
    }

    pub fn is_bound(&self, trigger: Trigger) -> bool {
        self.handlers.contains_key(&trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_event_json() {
        let events: Vec<PageEvent> = serde_json::from_str(
            r#"[
                {"type": "ready"},
                {"type": "click", "target": "load-more"},
                {"type": "scroll", "y": 420.0},
                {"type": "keydown", "key": "Escape"}
            ]"#,
        )
        .unwrap();

        assert_eq!(events[0], PageEvent::Ready);
        assert_eq!(events[1], PageEvent::click("load-more"));
        assert_eq!(events[2], PageEvent::Scroll { y: 420.0 });
        assert_eq!(events[3], PageEvent::key("Escape"));
    }
}
