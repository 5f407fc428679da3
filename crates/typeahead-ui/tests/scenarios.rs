//! End-to-end widget scenarios against a scripted provider, on paused time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::{json, Value};
use typeahead_core::{ProviderError, WidgetConfig};
use typeahead_engine::{SearchProvider, SessionOutputs};
use typeahead_ui::{Disposition, Focus, NavKey, Surface, Widget, WidgetEvent};

// =============================================================================
// Fixtures
// =============================================================================

/// Provider with per-term latency and a log of every call.
#[derive(Clone, Default)]
struct ScriptedProvider {
    latency_ms: HashMap<String, u64>,
    failing: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self::default()
    }

    fn latency(mut self, term: &str, ms: u64) -> Self {
        self.latency_ms.insert(term.to_string(), ms);
        self
    }

    fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

impl SearchProvider for ScriptedProvider {
    fn search(&self, term: String) -> BoxFuture<'static, Result<Value, ProviderError>> {
        self.calls.lock().push(term.clone());
        let latency = self.latency_ms.get(&term).copied().unwrap_or(10);
        let failing = self.failing;

        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(latency)).await;
            if failing {
                return Err(ProviderError::Network("connection reset".to_string()));
            }
            let labels: Vec<String> = (1..=3).map(|i| format!("{term} {i}")).collect();
            let links: Vec<String> = (1..=3).map(|i| format!("/wiki/{term}_{i}")).collect();
            Ok(json!([term, labels, ["", "", ""], links]))
        })
    }
}

#[derive(Clone, Default)]
struct RecordingSurface {
    visited: Arc<Mutex<Vec<String>>>,
}

impl Surface for RecordingSurface {
    fn input_width(&self) -> u16 {
        60
    }

    fn navigate(&mut self, link: &str) {
        self.visited.lock().push(link.to_string());
    }
}

struct Harness {
    widget: Widget<RecordingSurface>,
    outputs: SessionOutputs,
    calls: Arc<Mutex<Vec<String>>>,
    visited: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn new(provider: ScriptedProvider) -> Self {
        let calls = provider.calls();
        let surface = RecordingSurface::default();
        let visited = surface.visited.clone();
        let (widget, outputs) = Widget::new(WidgetConfig::default(), Arc::new(provider), surface);
        Self {
            widget,
            outputs,
            calls,
            visited,
        }
    }

    fn open(&mut self) {
        self.widget.handle(WidgetEvent::Open);
    }

    fn type_text(&mut self, text: &str) {
        self.widget.handle(WidgetEvent::InputChanged(text.to_string()));
    }

    fn key(&mut self, key: NavKey) -> Disposition {
        self.widget.handle(WidgetEvent::Key(key))
    }

    /// Apply outputs until none arrive for a second.
    async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(Some(output)) =
            tokio::time::timeout(Duration::from_secs(1), self.outputs.recv()).await
        {
            if self.widget.apply_output(output) {
                applied += 1;
            }
        }
        applied
    }

    fn labels(&self) -> Vec<String> {
        self.widget
            .state()
            .dropdown
            .rows()
            .iter()
            .map(|r| r.row.label.clone())
            .collect()
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_burst_only_queries_last_value() {
    let mut h = Harness::new(ScriptedProvider::new());
    h.open();
    h.type_text("f");
    h.type_text("fo");
    h.type_text("fox");

    assert_eq!(h.settle().await, 1);
    assert_eq!(h.calls(), vec!["fox"]);
    assert_eq!(h.labels(), vec!["fox 1", "fox 2", "fox 3"]);
    assert!(h.widget.state().dropdown.is_visible());
    assert_eq!(h.widget.state().dropdown.width(), 60);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_term_is_not_requeried() {
    let mut h = Harness::new(ScriptedProvider::new());
    h.open();
    h.type_text("cat");
    h.settle().await;

    h.type_text("cat ");
    h.settle().await;
    assert_eq!(h.calls(), vec!["cat"]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_result_superseded_by_newer_term() {
    let mut h = Harness::new(ScriptedProvider::new().latency("cat", 300).latency("dog", 50));
    h.open();
    h.type_text("cat");
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.type_text("dog");

    assert_eq!(h.settle().await, 1);
    assert_eq!(h.calls(), vec!["cat", "dog"]);
    assert_eq!(h.labels(), vec!["dog 1", "dog 2", "dog 3"]);
}

#[tokio::test(start_paused = true)]
async fn test_newer_term_typed_just_before_answer_wins() {
    // cat is requested at 20ms and would render at 120ms; dog is typed at
    // 110ms, before its own throttle window has closed.
    let mut h = Harness::new(ScriptedProvider::new().latency("cat", 100).latency("dog", 10));
    h.open();
    h.type_text("cat");
    tokio::time::sleep(Duration::from_millis(110)).await;
    h.type_text("dog");

    assert_eq!(h.settle().await, 1);
    assert_eq!(h.calls(), vec!["cat", "dog"]);
    assert_eq!(h.labels(), vec!["dog 1", "dog 2", "dog 3"]);
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_shows_placeholder_without_query() {
    let mut h = Harness::new(ScriptedProvider::new());
    h.open();
    h.type_text("   ");

    h.settle().await;
    assert!(h.calls().is_empty());
    assert_eq!(
        h.widget.state().dropdown.placeholder(),
        Some("No results to display...")
    );
    assert_eq!(h.key(NavKey::Down), Disposition::Consumed);
    assert_eq!(h.widget.state().focus, Focus::Input);
}

#[tokio::test(start_paused = true)]
async fn test_arrow_navigation_wraps_and_mirrors_label() {
    let mut h = Harness::new(ScriptedProvider::new());
    h.open();
    h.type_text("fox");
    h.settle().await;

    h.key(NavKey::Down);
    assert_eq!(h.widget.state().focus_index(), Some(0));
    assert_eq!(h.widget.state().input.value, "fox 1");

    h.key(NavKey::Up);
    assert_eq!(h.widget.state().focus_index(), Some(2));
    assert_eq!(h.widget.state().input.value, "fox 3");

    h.key(NavKey::Down);
    assert_eq!(h.widget.state().focus_index(), Some(0));
    assert_eq!(h.widget.state().input.value, "fox 1");

    // Mirroring a label does not issue a query.
    assert_eq!(h.settle().await, 0);
    assert_eq!(h.calls(), vec!["fox"]);
}

#[tokio::test(start_paused = true)]
async fn test_close_mid_query_then_reopen() {
    let mut h = Harness::new(ScriptedProvider::new().latency("cat", 100));
    h.open();
    h.type_text("cat");
    tokio::time::sleep(Duration::from_millis(50)).await;

    h.widget.handle(WidgetEvent::Close);
    assert!(h.widget.state().trigger_visible());
    assert!(!h.widget.state().dropdown.has_content());

    h.open();
    assert_eq!(h.settle().await, 0);
    assert!(!h.widget.state().dropdown.has_content());

    h.type_text("dog");
    assert_eq!(h.settle().await, 1);
    assert_eq!(h.calls(), vec!["cat", "dog"]);
    assert_eq!(h.labels()[0], "dog 1");
}

#[tokio::test(start_paused = true)]
async fn test_enter_navigates_and_closes() {
    let mut h = Harness::new(ScriptedProvider::new());
    h.open();
    h.type_text("fox");
    h.settle().await;

    h.key(NavKey::Down);
    h.key(NavKey::Down);
    assert_eq!(
        h.key(NavKey::Enter),
        Disposition::Navigate("/wiki/fox_2".to_string())
    );

    assert_eq!(*h.visited.lock(), vec!["/wiki/fox_2"]);
    assert!(!h.widget.is_open());
    assert!(h.widget.state().trigger_visible());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_degrade_to_placeholder() {
    let mut h = Harness::new(ScriptedProvider::new().failing());
    h.open();
    h.type_text("cat");

    assert_eq!(h.settle().await, 1);
    assert_eq!(h.calls(), vec!["cat"; 4]);
    assert_eq!(
        h.widget.state().dropdown.placeholder(),
        Some("No results to display...")
    );

    // The session pipeline has stopped; further input is ignored.
    h.type_text("dog");
    assert_eq!(h.settle().await, 0);
    assert_eq!(h.calls().len(), 4);

    // A fresh session searches again.
    h.widget.handle(WidgetEvent::Close);
    h.open();
    h.type_text("dog");
    h.settle().await;
    assert_eq!(h.calls().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_reentrant_open_keeps_session() {
    let mut h = Harness::new(ScriptedProvider::new().latency("cat", 100));
    h.open();
    h.type_text("cat");
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.widget.handle(WidgetEvent::Open), Disposition::Ignored);
    assert_eq!(h.settle().await, 1);
    assert_eq!(h.labels()[0], "cat 1");
}

#[tokio::test(start_paused = true)]
async fn test_blur_hides_and_focus_shows_again() {
    let mut h = Harness::new(ScriptedProvider::new());
    h.open();
    h.type_text("fox");
    h.settle().await;

    h.widget.handle(WidgetEvent::BlurInput { to_row: None });
    let state = h.widget.state();
    assert!(!state.dropdown.is_visible());
    assert!(!state.input.expanded);
    assert_eq!(state.focus, Focus::Outside);
    assert!(state.dropdown.has_content());

    h.widget.handle(WidgetEvent::FocusInput);
    let state = h.widget.state();
    assert!(state.dropdown.is_visible());
    assert!(state.input.expanded);
    assert_eq!(h.labels().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_new_results_reset_row_focus() {
    let mut h = Harness::new(ScriptedProvider::new().latency("cat", 100));
    h.open();
    h.type_text("fox");
    h.settle().await;

    h.type_text("cat");
    tokio::time::sleep(Duration::from_millis(40)).await;
    h.key(NavKey::Down);
    assert_eq!(h.widget.state().focus_index(), Some(0));

    assert_eq!(h.settle().await, 1);
    assert_eq!(h.widget.state().focus, Focus::Input);
    assert_eq!(h.labels()[0], "cat 1");
}
