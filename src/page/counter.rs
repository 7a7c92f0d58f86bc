//! Count-up animation for the stats block

use std::collections::HashMap;

use super::clock::{Millis, Scheduler, TaskId};
use super::dom::{Dom, ElementId};
use super::error::{PageError, Result};
use super::Task;

/// Marker set on an element once its animation has started
const ANIMATED_ATTR: &str = "animated";
const TARGET_ATTR: &str = "target";

#[derive(Debug, Clone)]
struct Counter {
    target: u64,
    current: f64,
    increment: f64,
    timer: TaskId,
}

#[derive(Debug)]
pub struct CounterAnimator {
    duration: Millis,
    tick: Millis,
    running: HashMap<ElementId, Counter>,
}

impl CounterAnimator {
    pub fn new(duration: Millis, tick: Millis) -> Self {
        Self {
            duration,
            tick: tick.max(1),
            running: HashMap::new(),
        }
    }

    /// Start counting `element` up to its `data-target`.
    /// Returns false if the element was already animated.
    pub fn animate(
        &mut self,
        dom: &mut Dom,
        clock: &mut Scheduler<Task>,
        element: ElementId,
    ) -> Result<bool> {
        let el = dom.element_mut(element)?;
        if el.data.contains_key(ANIMATED_ATTR) {
            return Ok(false);
        }

        let raw = el.data.get(TARGET_ATTR).ok_or(PageError::MissingData {
            element,
            attribute: TARGET_ATTR,
        })?;
        let target: u64 = raw.trim().parse().map_err(|_| PageError::InvalidNumber {
            element,
            attribute: TARGET_ATTR,
            value: raw.clone(),
        })?;

        el.data.insert(ANIMATED_ATTR.to_string(), "true".to_string());

        let steps = self.duration as f64 / self.tick as f64;
        let increment = if steps > 0.0 { target as f64 / steps } else { target as f64 };
        let timer = clock.schedule_every(self.tick, Task::CounterTick { element });

        tracing::debug!("Counter {:?} animating to {}", element, target);
        self.running.insert(
            element,
            Counter {
                target,
                current: 0.0,
                increment,
                timer,
            },
        );
        Ok(true)
    }

    /// One interval tick for `element`
    pub fn tick(&mut self, dom: &mut Dom, clock: &mut Scheduler<Task>, element: ElementId) -> Result<()> {
        let Some(counter) = self.running.get_mut(&element) else {
            return Ok(());
        };

        counter.current += counter.increment;
        let finished = counter.current >= counter.target as f64;
        if finished {
            counter.current = counter.target as f64;
            clock.cancel(counter.timer);
        }
        let shown = counter.current.floor() as u64;

        if finished {
            self.running.remove(&element);
        }

        match dom.element_mut(element) {
            Ok(el) => {
                el.text = format_grouped(shown);
                Ok(())
            }
            Err(e) => {
                // Element vanished mid-animation; stop ticking
                if let Some(counter) = self.running.remove(&element) {
                    clock.cancel(counter.timer);
                }
                Err(e)
            }
        }
    }

    pub fn is_running(&self, element: ElementId) -> bool {
        self.running.contains_key(&element)
    }
}

/// Integer with `,` thousands separators
pub fn format_grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
