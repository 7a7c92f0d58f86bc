//! Scripted event playback on the page clock
//!
//! A script is a JSON array of steps, each `{ "at": <ms>, "event": {...} }`.
//! Steps run in `at` order (stable for equal times); `at` defaults to 0.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::page::clock::Millis;
use crate::page::{Page, PageEvent};

/// How long past the last step timers may keep running when draining
const DRAIN_LIMIT_MS: Millis = 60_000;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayStep {
    #[serde(default)]
    pub at: Millis,
    pub event: PageEvent,
}

pub fn parse_script(json: &str) -> Result<Vec<ReplayStep>> {
    let mut steps: Vec<ReplayStep> =
        serde_json::from_str(json).context("Replay script must be a JSON array of steps")?;
    steps.sort_by_key(|s| s.at);
    Ok(steps)
}

pub fn load_script(path: &Path) -> Result<Vec<ReplayStep>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_script(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Play `steps` against `page`, then run timers up to `until`.
/// Without `until`, timers are drained until none are left (bounded).
/// With `realtime`, waits between steps follow the script's timing.
pub async fn run(page: &mut Page, steps: &[ReplayStep], until: Option<Millis>, realtime: bool) {
    for step in steps {
        advance(page, step.at, realtime).await;
        tracing::debug!("t={} {:?}", page.now(), step.event);
        page.handle(step.event.clone());
    }

    match until {
        Some(end) => advance(page, end, realtime).await,
        None => {
            let limit = page.now().saturating_add(DRAIN_LIMIT_MS);
            while let Some(next) = page.next_due() {
                if next > limit {
                    tracing::warn!("Timers still pending after {}ms, stopping", DRAIN_LIMIT_MS);
                    break;
                }
                advance(page, next, realtime).await;
            }
        }
    }
    tracing::info!("Replay finished at t={}ms", page.now());
}

async fn advance(page: &mut Page, to: Millis, realtime: bool) {
    if realtime && to > page.now() {
        tokio::time::sleep(Duration::from_millis(to - page.now())).await;
    }
    page.advance_to(to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    const SCRIPT: &str = r#"[
        { "at": 100, "event": { "type": "click", "target": "load-more" } },
        { "event": { "type": "ready" } },
        { "at": 1700, "event": { "type": "click", "target": "load-more" } }
    ]"#;

    #[test]
    fn test_parse_sorts_by_time() {
        let steps = parse_script(SCRIPT).unwrap();
        assert_eq!(steps[0].at, 0);
        assert_eq!(steps[0].event, PageEvent::Ready);
        assert_eq!(steps[2].at, 1700);
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        assert!(parse_script(r#"[{ "event": { "type": "hover" } }]"#).is_err());
    }

    #[tokio::test]
    async fn test_replay_drains_timers() {
        let mut page = Page::new(&AppConfig::default()).unwrap();
        let steps = parse_script(SCRIPT).unwrap();
        run(&mut page, &steps, None, false).await;

        let grid = page.dom().by_key("blog-grid").unwrap();
        assert_eq!(page.dom().children(grid).len(), 10);
        assert!(page.feed_exhausted());
        // End-of-feed toast has come and gone
        assert!(page.notification().is_none());
        assert_eq!(page.next_due(), None);
    }

    #[tokio::test]
    async fn test_replay_until_stops_clock() {
        let mut page = Page::new(&AppConfig::default()).unwrap();
        let steps = parse_script(SCRIPT).unwrap();
        run(&mut page, &steps, Some(1700), false).await;

        assert_eq!(page.now(), 1700);
        assert!(page.is_busy("load-more"));
    }

    #[tokio::test]
    async fn test_replay_step_at_end_of_time() {
        let script = r#"[
            { "event": { "type": "ready" } },
            { "at": 18446744073709551000, "event": { "type": "click", "target": "load-more" } }
        ]"#;
        let mut page = Page::new(&AppConfig::default()).unwrap();
        let steps = parse_script(script).unwrap();
        run(&mut page, &steps, None, false).await;

        // The request completes at the saturated deadline
        let grid = page.dom().by_key("blog-grid").unwrap();
        assert_eq!(page.dom().children(grid).len(), 8);
        assert!(!page.is_busy("load-more"));
        assert_eq!(page.now(), Millis::MAX);
        assert_eq!(page.errors_reported(), 0);
    }
}
