//! Per-session search pipeline.
//!
//! ```text
//! push_input ─► QuerySource ─► SearchExecutor (per term) ─► LatestWins ─► project ─► outputs
//!                (throttle,      (retry, one spawned          (drop stale
//!                 distinct)       task per request)            results)
//! ```
//!
//! A session owns a cancellation token. Every request token is a child of it,
//! so closing the session disposes of in-flight requests along with the
//! pipeline task itself.
//!
//! An in-flight request is superseded as soon as a raw input with a different
//! trimmed value arrives, not when that input's throttle window closes. A
//! result for a term the user has already typed past is never emitted.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use typeahead_core::{Projection, ResultPayload, SearchError, SearchTerm, WidgetConfig};

use crate::executor::SearchExecutor;
use crate::latest::{LatestWins, Ticket};
use crate::projector::project;
use crate::query_source::QuerySource;

/// What a session pipeline reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// New result set for the dropdown.
    Results(Projection),

    /// Terminal failure. The pipeline has stopped.
    Failed(String),
}

/// A pipeline event tagged with the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutput {
    pub session: Ticket,
    pub event: PipelineEvent,
}

/// Receiving end shared by every session of a widget.
pub type SessionOutputs = mpsc::UnboundedReceiver<SessionOutput>;

type Completion = (Ticket, Result<ResultPayload, SearchError>);

/// Handle to a running session pipeline.
///
/// Dropping the handle tears the session down.
pub struct SessionHandle {
    ticket: Ticket,
    inputs: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Spawn the pipeline for a freshly opened session.
    ///
    /// `cancel` scopes the session; `outputs` receives its events tagged with
    /// `ticket`.
    pub fn spawn(
        ticket: Ticket,
        cancel: CancellationToken,
        config: &WidgetConfig,
        executor: SearchExecutor,
        outputs: mpsc::UnboundedSender<SessionOutput>,
    ) -> Self {
        let (inputs, input_rx) = mpsc::unbounded_channel();

        let pipeline = SessionPipeline {
            ticket,
            cancel: cancel.clone(),
            source: QuerySource::new(config.throttle()),
            requests: LatestWins::scoped(cancel.clone()),
            in_flight: None,
            executor,
            inputs: input_rx,
            outputs,
        };
        let task = tokio::spawn(pipeline.run());
        tracing::info!("Session {} opened", ticket);

        Self {
            ticket,
            inputs,
            cancel,
            task,
        }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Forward a raw input-change event. Returns false once the pipeline has stopped.
    pub fn push_input(&self, raw: impl Into<String>) -> bool {
        self.inputs.send(raw.into()).is_ok()
    }

    /// Whether the pipeline task has ended (closed or failed).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Tear the session down.
    pub fn close(self) {
        tracing::info!("Session {} closing", self.ticket);
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

struct SessionPipeline {
    ticket: Ticket,
    cancel: CancellationToken,
    source: QuerySource,
    requests: LatestWins,
    /// Term of the request `requests` currently tracks.
    in_flight: Option<SearchTerm>,
    executor: SearchExecutor,
    inputs: mpsc::UnboundedReceiver<String>,
    outputs: mpsc::UnboundedSender<SessionOutput>,
}

impl SessionPipeline {
    async fn run(mut self) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

        loop {
            let deadline = self.source.deadline();

            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                Some((ticket, result)) = done_rx.recv() => {
                    if !self.requests.is_current(ticket) {
                        tracing::debug!("Session {}: discarding superseded request {}", self.ticket, ticket);
                        continue;
                    }
                    self.requests.finish(ticket);
                    self.in_flight = None;

                    match result {
                        Ok(payload) => {
                            if !self.emit(PipelineEvent::Results(project(&payload))) {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::error!("Session {} pipeline failed: {}", self.ticket, e);
                            self.emit(PipelineEvent::Failed(e.to_string()));
                            break;
                        }
                    }
                }

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(term) = self.source.poll(Instant::now()) {
                        self.start(term, &done_tx);
                    }
                }

                raw = self.inputs.recv() => match raw {
                    Some(raw) => {
                        self.supersede_if_changed(&raw);
                        self.source.offer(raw, Instant::now());
                    }
                    None => break,
                },
            }
        }

        self.requests.cancel();
        tracing::info!("Session {} pipeline done", self.ticket);
    }

    fn start(&mut self, term: SearchTerm, done_tx: &mpsc::UnboundedSender<Completion>) {
        let (ticket, token) = self.requests.begin();
        tracing::debug!("Session {}: request {} for '{}'", self.ticket, ticket, term);

        let request = self.executor.request(term.clone(), ticket, token);
        self.in_flight = Some(term);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            match request.resolve().await {
                Err(SearchError::Cancelled) => {}
                result => {
                    let _ = done_tx.send((ticket, result));
                }
            }
        });
    }

    /// Drop the in-flight request if `raw` no longer matches its term.
    ///
    /// The abandoned term is forgotten by the query source, so typing back
    /// to it ("cat" -> "ca" -> "cat") queries it again.
    fn supersede_if_changed(&mut self, raw: &str) {
        let Some(in_flight) = &self.in_flight else {
            return;
        };
        if *in_flight == SearchTerm::new(raw) {
            return;
        }

        tracing::debug!(
            "Session {}: input moved past '{}', dropping its request",
            self.ticket,
            in_flight
        );
        self.requests.cancel();
        self.source.forget_last();
        self.in_flight = None;
    }

    fn emit(&self, event: PipelineEvent) -> bool {
        self.outputs
            .send(SessionOutput {
                session: self.ticket,
                event,
            })
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockSearchProvider;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use typeahead_core::{ProviderError, ResultRow};

    fn results_for(label: &str) -> serde_json::Value {
        json!([label, [label], [""], [format!("/{label}")]])
    }

    fn spawn_session(
        mock: MockSearchProvider,
    ) -> (SessionHandle, LatestWins, SessionOutputs) {
        let mut sessions = LatestWins::new();
        let (ticket, cancel) = sessions.begin();
        let (tx, rx) = mpsc::unbounded_channel();
        let executor = SearchExecutor::new(Arc::new(mock), 3);
        let handle = SessionHandle::spawn(ticket, cancel, &WidgetConfig::default(), executor, tx);
        (handle, sessions, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_queries_last_term_only() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .withf(|term: &String| term == "fox")
            .times(1)
            .returning(|term| Box::pin(async move { Ok(results_for(&term)) }));

        let (session, _sessions, mut outputs) = spawn_session(mock);
        assert!(session.push_input("fo"));
        assert!(session.push_input("fox"));

        let output = outputs.recv().await.unwrap();
        assert_eq!(output.session, session.ticket());
        assert_eq!(
            output.event,
            PipelineEvent::Results(Projection::Rows(vec![ResultRow::new("fox", "/fox")]))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_result_is_dropped() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().returning(|term| {
            let latency = if term == "cat" { 50 } else { 200 };
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(latency)).await;
                Ok(results_for(&term))
            })
        });

        let (session, _sessions, mut outputs) = spawn_session(mock);
        session.push_input("cat");
        tokio::time::sleep(Duration::from_millis(30)).await;
        session.push_input("dog");

        let output = outputs.recv().await.unwrap();
        assert_eq!(
            output.event,
            PipelineEvent::Results(Projection::Rows(vec![ResultRow::new("dog", "/dog")]))
        );

        let late = tokio::time::timeout(Duration::from_secs(1), outputs.recv()).await;
        assert!(late.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_past_in_flight_term_drops_it() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().returning(|term| {
            let latency = if term == "cat" { 100 } else { 10 };
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(latency)).await;
                Ok(results_for(&term))
            })
        });

        // cat is requested at 20ms and answers at 120ms; dog is typed at 110ms,
        // inside cat's flight but before dog's own window closes.
        let (session, _sessions, mut outputs) = spawn_session(mock);
        session.push_input("cat");
        tokio::time::sleep(Duration::from_millis(110)).await;
        session.push_input("dog");

        let output = outputs.recv().await.unwrap();
        assert_eq!(
            output.event,
            PipelineEvent::Results(Projection::Rows(vec![ResultRow::new("dog", "/dog")]))
        );

        let late = tokio::time::timeout(Duration::from_secs(1), outputs.recv()).await;
        assert!(late.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retyping_abandoned_term_queries_again() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .withf(|term: &String| term == "cat")
            .times(2)
            .returning(|term| {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(results_for(&term))
                })
            });

        let (session, _sessions, mut outputs) = spawn_session(mock);
        session.push_input("cat");
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.push_input("ca");
        session.push_input("cat");

        let output = outputs.recv().await.unwrap();
        assert_eq!(
            output.event,
            PipelineEvent::Results(Projection::Rows(vec![ResultRow::new("cat", "/cat")]))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_trimmed_input_keeps_request() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(1)
            .returning(|term| {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(results_for(&term))
                })
            });

        let (session, _sessions, mut outputs) = spawn_session(mock);
        session.push_input("cat");
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.push_input("cat ");

        let output = outputs.recv().await.unwrap();
        assert_eq!(
            output.event,
            PipelineEvent::Results(Projection::Rows(vec![ResultRow::new("cat", "/cat")]))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_term_yields_empty_projection() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().never();

        let (session, _sessions, mut outputs) = spawn_session(mock);
        session.push_input("   ");

        // The first term of a session is compared against nothing, so blank
        // input still produces the placeholder.
        let output = outputs.recv().await.unwrap();
        assert_eq!(output.event, PipelineEvent::Results(Projection::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_terminal() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(4)
            .returning(|_| Box::pin(async { Err(ProviderError::HttpStatus(500)) }));

        let (session, _sessions, mut outputs) = spawn_session(mock);
        session.push_input("cat");

        let output = outputs.recv().await.unwrap();
        assert!(matches!(output.event, PipelineEvent::Failed(_)));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(session.is_finished());
        assert!(!session.push_input("dog"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_in_flight_request() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().returning(|term| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(results_for(&term))
            })
        });

        let (session, _sessions, mut outputs) = spawn_session(mock);
        session.push_input("cat");
        tokio::time::sleep(Duration::from_millis(40)).await;
        session.close();

        let late = tokio::time::timeout(Duration::from_secs(1), outputs.recv()).await;
        assert!(matches!(late, Ok(None) | Err(_)));
    }
}
