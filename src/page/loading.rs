//! Busy state for buttons that trigger a simulated request

use std::collections::HashMap;

use super::clock::{Millis, Scheduler};
use super::dom::{Dom, ElementId};
use super::error::Result;
use super::Task;

/// What to do once the simulated request resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Subscribe { form: ElementId },
    Contact { form: ElementId },
    LoadMore,
}

#[derive(Debug, Clone)]
pub struct LoadingState {
    pub original_label: String,
    pub completion: Completion,
}

#[derive(Debug, Default)]
pub struct LoadingStates {
    in_flight: HashMap<ElementId, LoadingState>,
}

impl LoadingStates {
    /// Put `button` into its busy state and schedule the completion.
    /// Returns false (and changes nothing) if the button is already busy.
    pub fn begin(
        &mut self,
        dom: &mut Dom,
        clock: &mut Scheduler<Task>,
        button: ElementId,
        busy_label: &str,
        delay: Millis,
        completion: Completion,
    ) -> Result<bool> {
        if self.in_flight.contains_key(&button) {
            tracing::debug!("Ignoring repeat trigger on busy button {:?}", button);
            return Ok(false);
        }

        let el = dom.element_mut(button)?;
        let original_label = std::mem::replace(&mut el.text, busy_label.to_string());
        el.disabled = true;

        clock.schedule_after(delay, Task::FinishLoading { button });
        self.in_flight.insert(
            button,
            LoadingState {
                original_label,
                completion,
            },
        );
        Ok(true)
    }

    /// Take the in-flight state once its timer fires
    pub fn take(&mut self, button: ElementId) -> Option<LoadingState> {
        self.in_flight.remove(&button)
    }

    /// Put the label back and re-enable the button
    pub fn restore(dom: &mut Dom, button: ElementId, state: &LoadingState) -> Result<()> {
        let el = dom.element_mut(button)?;
        el.text = state.original_label.clone();
        el.disabled = false;
        Ok(())
    }

    pub fn is_busy(&self, button: ElementId) -> bool {
        self.in_flight.contains_key(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::dom::Element;

    #[test]
    fn test_repeated_cycles_restore_original_label() {
        let mut dom = Dom::new();
        let mut clock = Scheduler::new();
        let mut states = LoadingStates::default();
        let button = dom.append(dom.body(), Element::new("button").text("Subscribe")).unwrap();

        for round in 0..3u64 {
            assert!(states
                .begin(&mut dom, &mut clock, button, "Subscribing...", 1500, Completion::LoadMore)
                .unwrap());
            let el = dom.element(button).unwrap();
            assert_eq!(el.text, "Subscribing...");
            assert!(el.disabled);

            let (_, task) = clock.pop_due((round + 1) * 1500).unwrap();
            assert_eq!(task, Task::FinishLoading { button });
            let state = states.take(button).unwrap();
            LoadingStates::restore(&mut dom, button, &state).unwrap();

            let el = dom.element(button).unwrap();
            assert_eq!(el.text, "Subscribe");
            assert!(!el.disabled);
        }
    }

    #[test]
    fn test_busy_button_ignores_second_trigger() {
        let mut dom = Dom::new();
        let mut clock = Scheduler::new();
        let mut states = LoadingStates::default();
        let button = dom.append(dom.body(), Element::new("button").text("Send")).unwrap();

        assert!(states.begin(&mut dom, &mut clock, button, "Sending...", 2000, Completion::LoadMore).unwrap());
        assert!(!states.begin(&mut dom, &mut clock, button, "Sending...", 2000, Completion::LoadMore).unwrap());
        assert_eq!(clock.pending(), 1);
        assert_eq!(states.take(button).unwrap().original_label, "Send");
    }
}
