//! Page controller
//!
//! `Page` owns the document, the virtual clock and every piece of transient
//! UI state. Hosts feed it [`PageEvent`]s and advance its clock; it reacts
//! by mutating the document and scheduling follow-up [`Task`]s.

pub mod clock;
pub mod counter;
pub mod dom;
pub mod effects;
pub mod error;
pub mod events;
pub mod feed;
pub mod layout;
pub mod loading;
pub mod modal;
pub mod nav;
pub mod notify;

use serde::Serialize;

use crate::config::{AppConfig, Timings};

use clock::{Millis, Scheduler};
use counter::CounterAnimator;
use dom::{Dom, ElementId, NodeSnapshot};
use error::Result;
use events::{Action, Bindings, Trigger};
use feed::{LoadMoreFeed, END_OF_FEED_MESSAGE};
use loading::{Completion, LoadingStates};
use nav::Viewport;
use notify::{Notification, NotificationController, NotificationKind, ToastPhase};

pub use error::PageError;
pub use events::PageEvent;

const SUBSCRIBED_MESSAGE: &str = "Thank you for subscribing! Welcome to Blog2025.";
const CONTACT_SENT_MESSAGE: &str = "Message sent successfully! We'll get back to you soon.";

/// Deferred work queued on the page clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    DismissToast { serial: u64 },
    RemoveToast { serial: u64 },
    CounterTick { element: ElementId },
    FinishLoading { button: ElementId },
    RevealCard { element: ElementId },
    RemoveRipple { element: ElementId },
}

/// What the bound actions get to see about the event that fired them
#[derive(Debug, Clone, Default)]
struct EventContext {
    target: Option<ElementId>,
    pointer: Option<(f64, f64)>,
    key: Option<String>,
}

impl EventContext {
    fn on(target: ElementId) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }

    fn target(&self) -> Result<ElementId> {
        self.target
            .ok_or_else(|| PageError::UnknownKey("<event target>".to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationSnapshot {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Millis,
    pub leaving: bool,
}

/// Serializable state of the whole page
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub time_ms: Millis,
    pub scroll_y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationSnapshot>,
    pub pending_tasks: usize,
    pub errors_reported: usize,
    pub document: NodeSnapshot,
}

pub struct Page {
    timings: Timings,
    dom: Dom,
    clock: Scheduler<Task>,
    bindings: Bindings,
    viewport: Viewport,
    observed: Vec<ElementId>,    // Fade-in targets captured at ready time
    toasts: NotificationController,
    counters: CounterAnimator,
    loading: LoadingStates,
    feed: LoadMoreFeed,
    ready: bool,
    errors_reported: usize,
}

impl Page {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let timings = config.timings.clone();
        let mut dom = Dom::new();
        layout::build(&mut dom, &config.page)?;

        Ok(Self {
            dom,
            clock: Scheduler::new(),
            bindings: Bindings::default(),
            viewport: Viewport::new(
                config.page.viewport_width,
                config.page.viewport_height,
                layout::DOCUMENT_HEIGHT,
            ),
            observed: Vec::new(),
            toasts: NotificationController::new(timings.notification_ms, timings.exit_transition_ms),
            counters: CounterAnimator::new(timings.counter_duration_ms, timings.counter_tick_ms),
            loading: LoadingStates::default(),
            feed: LoadMoreFeed::new(config.page.max_posts, timings.card_stagger_ms),
            ready: false,
            errors_reported: 0,
            timings,
        })
    }

    /// Deliver an event. Failures go to the page-wide error handler and
    /// never reach the caller.
    pub fn handle(&mut self, event: PageEvent) {
        if let Err(e) = self.dispatch(event) {
            self.report(&e);
        }
    }

    /// Deliver an event, returning any handler failure
    pub fn dispatch(&mut self, event: PageEvent) -> Result<()> {
        if let PageEvent::Ready = event {
            return self.on_ready();
        }
        if let PageEvent::Error { message } = &event {
            tracing::error!("Script error: {}", message);
            self.errors_reported += 1;
            return Ok(());
        }
        if !self.ready {
            tracing::debug!("Ignoring {:?} before ready", event);
            return Ok(());
        }

        match event {
            PageEvent::Ready | PageEvent::Error { .. } => Ok(()),
            PageEvent::Click { target, x, y } => {
                let id = self.dom.require(&target)?;
                let pointer = x.zip(y);
                self.click(id, pointer)
            }
            PageEvent::Submit { target } => {
                let form = self.dom.require(&target)?;
                self.submit(form)
            }
            PageEvent::Input { target, value } => {
                let id = self.dom.require(&target)?;
                self.dom.element_mut(id)?.value = value;
                Ok(())
            }
            PageEvent::MouseEnter { target } => {
                let id = self.dom.require(&target)?;
                self.fire(Trigger::MouseEnter(id), EventContext::on(id))
            }
            PageEvent::MouseLeave { target } => {
                let id = self.dom.require(&target)?;
                self.fire(Trigger::MouseLeave(id), EventContext::on(id))
            }
            PageEvent::Scroll { y } => self.scroll_to(y),
            PageEvent::Resize { width, height } => {
                self.viewport.width = width;
                self.viewport.height = height;
                self.viewport.scroll_y = self.viewport.clamp(self.viewport.scroll_y);
                effects::parallax(&mut self.dom, &self.viewport);
                self.reveal_visible()
            }
            PageEvent::Keydown { key } => self.fire(
                Trigger::Keydown,
                EventContext {
                    key: Some(key),
                    ..Default::default()
                },
            ),
            PageEvent::Intersect { target } => {
                let id = self.dom.require(&target)?;
                let block = effects::observed_block(&self.dom, id).unwrap_or(id);
                if let Some(number) = effects::animate_in(&mut self.dom, block)? {
                    self.counters.animate(&mut self.dom, &mut self.clock, number)?;
                }
                Ok(())
            }
        }
    }

    /// Advance virtual time by `ms`, running everything that falls due
    pub fn advance(&mut self, ms: Millis) {
        self.advance_to(self.clock.now().saturating_add(ms));
    }

    /// Advance virtual time to `time`. Going backwards is a no-op.
    pub fn advance_to(&mut self, time: Millis) {
        while let Some((_, task)) = self.clock.pop_due(time) {
            if let Err(e) = self.run_task(task) {
                self.report(&e);
            }
        }
        self.clock.settle(time);
    }

    /// Show a toast, evicting any current one
    pub fn notify(&mut self, message: &str, kind: NotificationKind) -> Option<u64> {
        match self
            .toasts
            .notify(&mut self.dom, &mut self.clock, &mut self.bindings, message, kind)
        {
            Ok(serial) => Some(serial),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.toasts.current()
    }

    pub fn notification_leaving(&self) -> bool {
        self.toasts.phase() == Some(ToastPhase::Leaving)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.dom.by_key(key).is_some_and(|id| self.loading.is_busy(id))
    }

    /// Whether the counter in element `key` is still ticking
    pub fn counter_running(&self, key: &str) -> bool {
        self.dom.by_key(key).is_some_and(|id| self.counters.is_running(id))
    }

    pub fn feed_exhausted(&self) -> bool {
        self.feed.is_exhausted()
    }

    pub fn pending_tasks(&self) -> usize {
        self.clock.pending()
    }

    /// When the next timer fires, if any
    pub fn next_due(&self) -> Option<Millis> {
        self.clock.next_due()
    }

    pub fn errors_reported(&self) -> usize {
        self.errors_reported
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            time_ms: self.clock.now(),
            scroll_y: self.viewport.scroll_y,
            notification: self.toasts.current().map(|n| NotificationSnapshot {
                message: n.message.clone(),
                kind: n.kind,
                created_at: n.created_at,
                leaving: self.notification_leaving(),
            }),
            pending_tasks: self.clock.pending(),
            errors_reported: self.errors_reported,
            document: self.dom.snapshot(),
        }
    }

    /// Page-wide error handler: log and move on
    fn report(&mut self, error: &PageError) {
        tracing::error!("Page error: {}", error);
        self.errors_reported += 1;
    }

    fn on_ready(&mut self) -> Result<()> {
        if self.ready {
            tracing::debug!("Page already initialized");
            return Ok(());
        }

        self.setup_navigation()?;
        self.setup_scroll_effects()?;
        self.setup_animations();
        self.setup_forms()?;
        self.setup_interactive_elements();
        self.setup_load_more()?;
        self.setup_modal()?;

        self.ready = true;
        tracing::info!("Page ready with {} elements", self.dom.len());
        self.reveal_visible()
    }

    fn setup_navigation(&mut self) -> Result<()> {
        let toggle = self.dom.require("mobile-menu")?;
        self.bindings.bind(Trigger::Click(toggle), Action::ToggleMenu);

        for link in self.dom.query_class("nav-link") {
            self.bindings.bind(Trigger::Click(link), Action::CloseMenu);
            self.bindings.bind(Trigger::Click(link), Action::FollowAnchor);
        }

        self.bindings.bind(Trigger::Scroll, Action::NavbarOnScroll);
        self.bindings.bind(Trigger::Scroll, Action::HighlightActiveLink);
        self.bindings.bind(Trigger::Keydown, Action::CloseOverlays);
        Ok(())
    }

    fn setup_scroll_effects(&mut self) -> Result<()> {
        let back_to_top = self.dom.require("back-to-top")?;
        self.bindings.bind(Trigger::Scroll, Action::BackToTopVisibility);
        self.bindings.bind(Trigger::Click(back_to_top), Action::ScrollToTop);

        if let Some(indicator) = self.dom.by_key("hero-scroll") {
            self.bindings
                .bind(Trigger::Click(indicator), Action::ScrollToSection("blog".to_string()));
        }
        Ok(())
    }

    fn setup_animations(&mut self) {
        self.observed = effects::observed_elements(&self.dom);
        self.bindings.bind(Trigger::Scroll, Action::RevealVisible);
        self.bindings.bind(Trigger::Scroll, Action::Parallax);
    }

    fn setup_forms(&mut self) -> Result<()> {
        let newsletter = self.dom.require("newsletter-form")?;
        let contact = self.dom.require("contact-form")?;
        self.bindings.bind(Trigger::Submit(newsletter), Action::Subscribe);
        self.bindings.bind(Trigger::Submit(contact), Action::SendContact);
        Ok(())
    }

    fn setup_interactive_elements(&mut self) {
        for card in self.dom.query_class("blog-card") {
            self.bindings.bind(Trigger::MouseEnter(card), Action::HoverCard);
            self.bindings.bind(Trigger::MouseLeave(card), Action::UnhoverCard);
        }
        for button in self.dom.query_class("btn") {
            self.bindings.bind(Trigger::Click(button), Action::Ripple);
        }
    }

    fn setup_load_more(&mut self) -> Result<()> {
        let button = self.dom.require("load-more")?;
        self.bindings.bind(Trigger::Click(button), Action::LoadMore);
        Ok(())
    }

    fn setup_modal(&mut self) -> Result<()> {
        let open = self.dom.require("email-marketing-open")?;
        let modal = self.dom.require(modal::MODAL_KEY)?;
        self.bindings.bind(Trigger::Click(open), Action::OpenModal);
        self.bindings.bind(Trigger::Click(modal), Action::CloseModal);
        Ok(())
    }

    fn click(&mut self, id: ElementId, pointer: Option<(f64, f64)>) -> Result<()> {
        let el = self.dom.element(id)?;
        if el.disabled || el.is_hidden() {
            tracing::debug!("Click on inactive element {:?} swallowed", id);
            return Ok(());
        }
        let submits_form = el.tag == "button" && el.data.get("type").map(String::as_str) == Some("submit");

        self.fire(
            Trigger::Click(id),
            EventContext {
                target: Some(id),
                pointer,
                key: None,
            },
        )?;

        if submits_form {
            if let Some(form) = self.dom.closest(id, "form") {
                self.submit(form)?;
            }
        }
        Ok(())
    }

    fn submit(&mut self, form: ElementId) -> Result<()> {
        if let Some(button) = layout::submit_button_of(&self.dom, form) {
            if self.dom.element(button)?.disabled {
                tracing::debug!("Submit of {:?} while its button is disabled", form);
                return Ok(());
            }
        }
        self.fire(Trigger::Submit(form), EventContext::on(form))
    }

    fn fire(&mut self, trigger: Trigger, ctx: EventContext) -> Result<()> {
        if !self.bindings.is_bound(trigger) {
            tracing::trace!("No handlers for {:?}", trigger);
            return Ok(());
        }
        for action in self.bindings.actions(trigger) {
            self.run_action(action, &ctx)?;
        }
        Ok(())
    }

    fn run_action(&mut self, action: Action, ctx: &EventContext) -> Result<()> {
        match action {
            Action::ToggleMenu => {
                let open = nav::toggle_menu(&mut self.dom)?;
                tracing::debug!("Mobile menu {}", if open { "opened" } else { "closed" });
            }
            Action::CloseMenu => {
                nav::close_menu(&mut self.dom)?;
            }
            Action::FollowAnchor => {
                let target = ctx.target()?;
                let href = self.dom.element(target)?.data.get("href").cloned();
                if let Some(section) = href.as_deref().and_then(|h| h.strip_prefix('#')) {
                    self.scroll_to_section(section)?;
                }
            }
            Action::ScrollToSection(section) => self.scroll_to_section(&section)?,
            Action::ScrollToTop => self.scroll_to(0.0)?,
            Action::NavbarOnScroll => nav::update_navbar(&mut self.dom, &mut self.viewport)?,
            Action::HighlightActiveLink => {
                nav::highlight_active_link(&mut self.dom, &self.viewport);
            }
            Action::BackToTopVisibility => nav::update_back_to_top(&mut self.dom, &self.viewport)?,
            Action::Parallax => effects::parallax(&mut self.dom, &self.viewport),
            Action::RevealVisible => self.reveal_visible()?,
            Action::Subscribe => {
                let form = ctx.target()?;
                self.begin_loading(form, "Subscribing...", self.timings.subscribe_delay_ms, Completion::Subscribe { form })?;
            }
            Action::SendContact => {
                let form = ctx.target()?;
                self.begin_loading(form, "Sending...", self.timings.contact_delay_ms, Completion::Contact { form })?;
            }
            Action::LoadMore => {
                let button = ctx.target()?;
                self.loading.begin(
                    &mut self.dom,
                    &mut self.clock,
                    button,
                    "Loading...",
                    self.timings.load_more_delay_ms,
                    Completion::LoadMore,
                )?;
            }
            Action::DismissToast { serial } => {
                self.toasts.dismiss(&mut self.dom, &mut self.clock, serial)?;
            }
            Action::Ripple => {
                let button = ctx.target()?;
                effects::ripple(
                    &mut self.dom,
                    &mut self.clock,
                    button,
                    ctx.pointer,
                    &self.viewport,
                    self.timings.ripple_ms,
                )?;
            }
            Action::HoverCard => effects::hover_card(&mut self.dom, ctx.target()?, true)?,
            Action::UnhoverCard => effects::hover_card(&mut self.dom, ctx.target()?, false)?,
            Action::OpenModal => modal::open_modal(&mut self.dom)?,
            Action::CloseModal => {
                // Only a click on the backdrop itself closes it
                if ctx.target == self.dom.by_key(modal::MODAL_KEY) {
                    modal::close_modal(&mut self.dom)?;
                }
            }
            Action::CloseOverlays => {
                if ctx.key.as_deref() == Some("Escape") {
                    if nav::menu_open(&self.dom) {
                        nav::close_menu(&mut self.dom)?;
                    }
                    if modal::modal_open(&self.dom) {
                        modal::close_modal(&mut self.dom)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Busy state on the form's submit button
    fn begin_loading(&mut self, form: ElementId, label: &str, delay: Millis, completion: Completion) -> Result<()> {
        let Some(button) = layout::submit_button_of(&self.dom, form) else {
            return Ok(());
        };
        self.loading
            .begin(&mut self.dom, &mut self.clock, button, label, delay, completion)?;
        Ok(())
    }

    fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::DismissToast { serial } => self.toasts.dismiss(&mut self.dom, &mut self.clock, serial),
            Task::RemoveToast { serial } => {
                self.toasts.remove(&mut self.dom, &mut self.bindings, serial);
                Ok(())
            }
            Task::CounterTick { element } => self.counters.tick(&mut self.dom, &mut self.clock, element),
            Task::FinishLoading { button } => {
                let Some(state) = self.loading.take(button) else {
                    return Ok(());
                };
                let completed = self.complete(state.completion, button);
                LoadingStates::restore(&mut self.dom, button, &state)?;
                completed
            }
            Task::RevealCard { element } => {
                if self.dom.contains(element) {
                    feed::reveal_card(&mut self.dom, element)?;
                }
                Ok(())
            }
            Task::RemoveRipple { element } => {
                self.dom.remove(element);
                Ok(())
            }
        }
    }

    fn complete(&mut self, completion: Completion, button: ElementId) -> Result<()> {
        match completion {
            Completion::Subscribe { form } => {
                self.notify(SUBSCRIBED_MESSAGE, NotificationKind::Success);
                layout::reset_form(&mut self.dom, form)
            }
            Completion::Contact { form } => {
                self.notify(CONTACT_SENT_MESSAGE, NotificationKind::Success);
                layout::reset_form(&mut self.dom, form)
            }
            Completion::LoadMore => {
                let grid = self.dom.require("blog-grid")?;
                let added = self.feed.append_batch(&mut self.dom, &mut self.clock, grid)?;
                for card in added {
                    self.bindings.bind(Trigger::MouseEnter(card), Action::HoverCard);
                    self.bindings.bind(Trigger::MouseLeave(card), Action::UnhoverCard);
                }
                if self.feed.check_exhausted(&mut self.dom, grid, button)? {
                    tracing::info!("Blog feed exhausted");
                    self.notify(END_OF_FEED_MESSAGE, NotificationKind::Info);
                }
                Ok(())
            }
        }
    }

    fn scroll_to_section(&mut self, section: &str) -> Result<()> {
        match nav::section_scroll_target(&self.dom, section) {
            Some(y) => self.scroll_to(y),
            None => Ok(()),
        }
    }

    /// Jump to `y` and run the scroll handlers
    fn scroll_to(&mut self, y: f64) -> Result<()> {
        self.viewport.scroll_y = self.viewport.clamp(y);
        self.fire(Trigger::Scroll, EventContext::default())
    }

    fn reveal_visible(&mut self) -> Result<()> {
        let counters = effects::reveal_visible(&mut self.dom, &self.viewport, &self.observed)?;
        for number in counters {
            self.counters.animate(&mut self.dom, &mut self.clock, number)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_page() -> Page {
        let mut page = Page::new(&AppConfig::default()).unwrap();
        page.handle(PageEvent::Ready);
        page
    }

    fn toast_count(page: &Page) -> usize {
        page.dom().query_class("notification").len()
    }

    fn element<'a>(page: &'a Page, key: &str) -> &'a dom::Element {
        page.dom().element(page.dom().by_key(key).unwrap()).unwrap()
    }

    #[test]
    fn test_events_before_ready_are_ignored() {
        let mut page = Page::new(&AppConfig::default()).unwrap();
        page.handle(PageEvent::click("mobile-menu"));
        assert!(!nav::menu_open(page.dom()));

        page.handle(PageEvent::Ready);
        page.handle(PageEvent::click("mobile-menu"));
        assert!(nav::menu_open(page.dom()));
    }

    #[test]
    fn test_at_most_one_toast_for_any_sequence() {
        let mut page = ready_page();
        for (i, kind) in [
            NotificationKind::Info,
            NotificationKind::Success,
            NotificationKind::Warning,
            NotificationKind::Error,
        ]
        .into_iter()
        .enumerate()
        {
            page.notify(&format!("toast {}", i), kind);
            assert_eq!(toast_count(&page), 1);
            page.advance(2600);
            assert!(toast_count(&page) <= 1);
        }
        page.advance(5300);
        assert_eq!(toast_count(&page), 0);
    }

    #[test]
    fn test_close_button_dismisses_through_bindings() {
        let mut page = ready_page();
        page.notify("Saved", NotificationKind::Success);
        page.advance(1000);

        page.handle(PageEvent::click("notification-close"));
        assert!(page.notification_leaving());
        assert_eq!(toast_count(&page), 1);

        page.advance(299);
        assert_eq!(toast_count(&page), 1);
        page.advance(1);
        assert_eq!(toast_count(&page), 0);
        assert_eq!(page.errors_reported(), 0);
    }

    #[test]
    fn test_newsletter_submit_cycle() {
        let mut page = ready_page();
        page.handle(PageEvent::Input {
            target: "newsletter-email".to_string(),
            value: "reader@example.com".to_string(),
        });
        page.handle(PageEvent::click("newsletter-submit"));

        let button = element(&page, "newsletter-submit");
        assert_eq!(button.text, "Subscribing...");
        assert!(button.disabled);
        assert!(page.is_busy("newsletter-submit"));

        // Double submit while busy changes nothing
        page.handle(PageEvent::Submit {
            target: "newsletter-form".to_string(),
        });
        page.advance(1499);
        assert!(page.notification().is_none());

        page.advance(1);
        let button = element(&page, "newsletter-submit");
        assert_eq!(button.text, "Subscribe");
        assert!(!button.disabled);
        assert_eq!(page.notification().unwrap().message, SUBSCRIBED_MESSAGE);
        assert!(element(&page, "newsletter-email").value.is_empty());
    }

    #[test]
    fn test_label_restored_after_every_cycle() {
        let mut page = ready_page();
        for _ in 0..3 {
            page.handle(PageEvent::click("newsletter-submit"));
            assert!(element(&page, "newsletter-submit").disabled);
            page.advance(1500);

            let button = element(&page, "newsletter-submit");
            assert_eq!(button.text, "Subscribe");
            assert!(!button.disabled);
            assert!(!page.is_busy("newsletter-submit"));
        }
        assert_eq!(toast_count(&page), 1);
    }

    #[test]
    fn test_contact_uses_longer_delay() {
        let mut page = ready_page();
        page.handle(PageEvent::Submit {
            target: "contact-form".to_string(),
        });
        page.advance(1999);
        assert_eq!(element(&page, "contact-submit").text, "Sending...");
        page.advance(1);
        assert_eq!(element(&page, "contact-submit").text, "Send Message");
        assert_eq!(page.notification().unwrap().kind, NotificationKind::Success);
    }

    #[test]
    fn test_load_more_until_exhausted() {
        let mut page = ready_page();
        let grid = page.dom().by_key("blog-grid").unwrap();

        page.handle(PageEvent::click("load-more"));
        page.advance(1500);
        assert_eq!(page.dom().children(grid).len(), 8);
        assert!(!page.feed_exhausted());
        assert!(page.notification().is_none());
        assert_eq!(element(&page, "load-more").text, "Load More Posts");

        page.handle(PageEvent::click("load-more"));
        page.advance(1500);
        assert_eq!(page.dom().children(grid).len(), 10);
        assert!(page.feed_exhausted());
        assert!(element(&page, "load-more").is_hidden());
        assert_eq!(page.notification().unwrap().message, END_OF_FEED_MESSAGE);

        // Hidden trigger swallows further clicks; no second toast
        let shown_at = page.notification().unwrap().created_at;
        page.handle(PageEvent::click("load-more"));
        page.advance(1500);
        assert_eq!(page.dom().children(grid).len(), 10);
        assert_eq!(page.notification().unwrap().created_at, shown_at);
    }

    #[test]
    fn test_new_cards_fade_in() {
        let mut page = ready_page();
        page.handle(PageEvent::click("load-more"));
        page.advance(1500);
        assert_eq!(element(&page, "post-7").style("opacity"), Some("1"));
        assert_eq!(element(&page, "post-8").style("opacity"), Some("0"));
        page.advance(100);
        assert_eq!(element(&page, "post-8").style("opacity"), Some("1"));
    }

    #[test]
    fn test_scroll_into_stats_runs_counters_once() {
        let mut page = ready_page();
        page.handle(PageEvent::Scroll { y: 2300.0 });
        assert!(page.dom().query_class("stat").iter().all(|s| page
            .dom()
            .element(*s)
            .unwrap()
            .has_class("animate-in")));

        page.advance(1000);
        page.handle(PageEvent::Scroll { y: 2310.0 });
        page.advance(1200);
        assert_eq!(element(&page, "stat-2").text, "25,000");
        assert_eq!(element(&page, "stat-4").text, "1,000");

        // Re-entering the viewport does not restart the animation
        page.handle(PageEvent::Scroll { y: 0.0 });
        page.handle(PageEvent::Scroll { y: 2300.0 });
        page.advance(16);
        assert_eq!(element(&page, "stat-4").text, "1,000");
        assert_eq!(page.pending_tasks(), 0);
    }

    #[test]
    fn test_intersect_on_stat_number_starts_its_counter() {
        let mut page = ready_page();
        page.handle(PageEvent::Intersect {
            target: "stat-1".to_string(),
        });
        assert!(element(&page, "stat-block-1").has_class("animate-in"));
        assert!(page.counter_running("stat-1"));
        assert!(!page.counter_running("stat-2"));

        page.handle(PageEvent::Intersect {
            target: "stat-block-4".to_string(),
        });
        page.advance(2200);
        assert_eq!(element(&page, "stat-1").text, "150");
        assert_eq!(element(&page, "stat-4").text, "1,000");
        assert_eq!(element(&page, "stat-2").text, "0");
        assert_eq!(page.errors_reported(), 0);
    }

    #[test]
    fn test_intersect_fades_in_other_blocks() {
        let mut page = ready_page();
        page.handle(PageEvent::Intersect {
            target: "contact-item-2".to_string(),
        });
        assert!(element(&page, "contact-item-2").has_class("animate-in"));
        assert!(!element(&page, "contact-item-1").has_class("animate-in"));
    }

    #[test]
    fn test_resize_reclamps_scroll() {
        let mut page = ready_page();
        page.handle(PageEvent::Scroll { y: 5000.0 });
        assert_eq!(page.viewport().scroll_y, 3400.0);

        page.handle(PageEvent::Resize {
            width: 1280.0,
            height: 1200.0,
        });
        assert_eq!(page.viewport().scroll_y, 3000.0);
        assert_eq!(page.viewport().height, 1200.0);
    }

    #[test]
    fn test_resize_reveals_and_moves_parallax() {
        let mut page = ready_page();
        assert!(element(&page, "hero-content").has_class("animate-in"));
        assert!(!element(&page, "post-1").has_class("animate-in"));

        page.handle(PageEvent::Resize {
            width: 1280.0,
            height: 1200.0,
        });
        assert!(element(&page, "post-1").has_class("animate-in"));
        let hero_image = page.dom().query_class("hero-image")[0];
        assert_eq!(
            page.dom().element(hero_image).unwrap().style("transform"),
            Some("translateY(0px)")
        );
    }

    #[test]
    fn test_hero_scroll_goes_to_blog() {
        let mut page = ready_page();
        page.handle(PageEvent::click("hero-scroll"));

        assert_eq!(page.viewport().scroll_y, 620.0);
        assert!(element(&page, "nav-blog").has_class("active"));
        assert!(element(&page, "navbar").has_class("scrolled"));
        assert!(element(&page, "post-1").has_class("animate-in"));
    }

    #[test]
    fn test_nav_link_closes_menu_and_scrolls() {
        let mut page = ready_page();
        page.handle(PageEvent::click("mobile-menu"));
        page.handle(PageEvent::click("nav-about"));

        assert!(!nav::menu_open(page.dom()));
        assert_eq!(page.viewport().scroll_y, 2120.0);
        assert!(element(&page, "nav-about").has_class("active"));
        assert!(element(&page, "back-to-top").has_class("visible"));

        page.handle(PageEvent::click("back-to-top"));
        assert_eq!(page.viewport().scroll_y, 0.0);
        assert!(!element(&page, "back-to-top").has_class("visible"));
    }

    #[test]
    fn test_escape_closes_menu_and_modal() {
        let mut page = ready_page();
        page.handle(PageEvent::click("mobile-menu"));
        page.handle(PageEvent::click("email-marketing-open"));
        assert!(modal::modal_open(page.dom()));

        page.handle(PageEvent::key("Enter"));
        assert!(nav::menu_open(page.dom()));

        page.handle(PageEvent::key("Escape"));
        assert!(!nav::menu_open(page.dom()));
        assert!(!modal::modal_open(page.dom()));
        assert_eq!(element(&page, "body").style("overflow"), None);
    }

    #[test]
    fn test_ripple_on_buttons_expires() {
        let mut page = ready_page();
        page.handle(PageEvent::Click {
            target: "email-marketing-open".to_string(),
            x: Some(60.0),
            y: Some(20.0),
        });
        assert_eq!(page.dom().query_class("ripple").len(), 1);
        page.advance(600);
        assert!(page.dom().query_class("ripple").is_empty());
    }

    #[test]
    fn test_unknown_target_goes_to_error_handler() {
        let mut page = ready_page();
        page.handle(PageEvent::click("no-such-element"));
        page.handle(PageEvent::Error {
            message: "TypeError: x is undefined".to_string(),
        });
        assert_eq!(page.errors_reported(), 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut page = ready_page();
        page.notify("Hello", NotificationKind::Warning);
        let json = serde_json::to_value(page.snapshot()).unwrap();
        assert_eq!(json["notification"]["kind"], "warning");
        assert_eq!(json["document"]["tag"], "body");
    }
}
