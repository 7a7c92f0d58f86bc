//! Single-slot toast notifications
//!
//! A new toast evicts the current one synchronously, so at most one
//! `.notification` element exists at any instant. Dismissal always plays
//! the exit animation first and removes the element only after the exit
//! transition has run.

use serde::{Deserialize, Serialize};

use super::clock::{Millis, Scheduler, TaskId};
use super::dom::{Dom, Element, ElementId};
use super::error::Result;
use super::events::{Action, Bindings, Trigger};
use super::Task;

const ENTER_ANIMATION: &str = "slideInRight 0.3s ease-out";
const EXIT_ANIMATION: &str = "slideOutRight 0.3s ease-out";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "fa-check-circle",
            NotificationKind::Error => "fa-exclamation-circle",
            NotificationKind::Info => "fa-info-circle",
            NotificationKind::Warning => "fa-exclamation-triangle",
        }
    }

    /// Accent colour for the left border
    pub fn color(&self) -> &'static str {
        match self {
            NotificationKind::Success => "#10b981",
            NotificationKind::Error => "#ef4444",
            NotificationKind::Info => "#3b82f6",
            NotificationKind::Warning => "#f59e0b",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Leaving,
}

#[derive(Debug)]
struct ActiveToast {
    serial: u64,
    notification: Notification,
    element: ElementId,
    close_button: ElementId,
    phase: ToastPhase,
    pending: TaskId,             // Auto-dismiss while visible, removal while leaving
}

#[derive(Debug)]
pub struct NotificationController {
    active: Option<ActiveToast>,
    next_serial: u64,
    auto_dismiss: Millis,
    exit_transition: Millis,
}

impl NotificationController {
    pub fn new(auto_dismiss: Millis, exit_transition: Millis) -> Self {
        Self {
            active: None,
            next_serial: 0,
            auto_dismiss,
            exit_transition,
        }
    }

    /// Show a toast, replacing whatever is on screen. Returns its serial.
    pub fn notify(
        &mut self,
        dom: &mut Dom,
        clock: &mut Scheduler<Task>,
        bindings: &mut Bindings,
        message: &str,
        kind: NotificationKind,
    ) -> Result<u64> {
        self.evict(dom, clock, bindings);

        let serial = self.next_serial;
        self.next_serial += 1;

        let element = dom.append(
            dom.body(),
            Element::new("div")
                .class("notification")
                .class(&format!("notification-{}", kind.as_str()))
                .data("serial", serial.to_string())
                .styled("animation", ENTER_ANIMATION)
                .styled("border-left", format!("4px solid {}", kind.color())),
        )?;
        dom.append(element, Element::new("i").class("fas").class(kind.icon()))?;
        dom.append(element, Element::new("span").text(message))?;
        let close_button = dom.append(
            element,
            Element::new("button")
                .key("notification-close")
                .class("notification-close"),
        )?;

        bindings.bind(Trigger::Click(close_button), Action::DismissToast { serial });
        let pending = clock.schedule_after(self.auto_dismiss, Task::DismissToast { serial });

        tracing::debug!("Notification {} ({}): {}", serial, kind.as_str(), message);

        self.active = Some(ActiveToast {
            serial,
            notification: Notification {
                message: message.to_string(),
                kind,
                created_at: clock.now(),
            },
            element,
            close_button,
            phase: ToastPhase::Visible,
            pending,
        });
        Ok(serial)
    }

    /// Start the exit transition for toast `serial`.
    /// Stale serials and toasts already leaving are ignored.
    pub fn dismiss(&mut self, dom: &mut Dom, clock: &mut Scheduler<Task>, serial: u64) -> Result<()> {
        let exit_transition = self.exit_transition;
        let Some(toast) = self.active.as_mut().filter(|t| t.serial == serial) else {
            return Ok(());
        };
        if toast.phase == ToastPhase::Leaving {
            return Ok(());
        }

        clock.cancel(toast.pending);
        dom.element_mut(toast.element)?
            .set_style("animation", EXIT_ANIMATION);
        toast.phase = ToastPhase::Leaving;
        toast.pending = clock.schedule_after(exit_transition, Task::RemoveToast { serial });
        Ok(())
    }

    /// Final removal after the exit transition
    pub fn remove(&mut self, dom: &mut Dom, bindings: &mut Bindings, serial: u64) {
        if self.active.as_ref().is_some_and(|t| t.serial == serial) {
            if let Some(toast) = self.active.take() {
                bindings.unbind_element(toast.close_button);
                dom.remove(toast.element);
            }
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.active.as_ref().map(|t| &t.notification)
    }

    pub fn phase(&self) -> Option<ToastPhase> {
        self.active.as_ref().map(|t| t.phase)
    }

    fn evict(&mut self, dom: &mut Dom, clock: &mut Scheduler<Task>, bindings: &mut Bindings) {
        if let Some(old) = self.active.take() {
            clock.cancel(old.pending);
            bindings.unbind_element(old.close_button);
            dom.remove(old.element);
        }
        // Anything else wearing the class goes too
        for stray in dom.query_class("notification") {
            dom.remove(stray);
        }
    }
}
