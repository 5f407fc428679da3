//! Search executor: one term in, one payload (or one error) out.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use typeahead_core::{ResultPayload, SearchError, SearchTerm};

use crate::latest::Ticket;
use crate::provider::SearchProvider;

/// Runs provider queries with a bounded retry policy.
#[derive(Clone)]
pub struct SearchExecutor {
    provider: Arc<dyn SearchProvider>,
    max_retries: u32,
}

impl SearchExecutor {
    /// Create an executor that retries a failed query `max_retries` more times.
    pub fn new(provider: Arc<dyn SearchProvider>, max_retries: u32) -> Self {
        Self {
            provider,
            max_retries,
        }
    }

    /// Resolve `term` to a payload.
    ///
    /// Blank terms resolve to [`ResultPayload::empty`] without touching the
    /// provider. Otherwise the provider is called until it succeeds or
    /// `max_retries + 1` attempts have failed. Retries are immediate.
    pub fn execute(&self, term: SearchTerm) -> BoxFuture<'static, Result<ResultPayload, SearchError>> {
        let provider = self.provider.clone();
        let attempts = self.max_retries.saturating_add(1);

        Box::pin(async move {
            if term.is_empty() {
                return Ok(ResultPayload::empty());
            }

            let mut attempt = 0;
            loop {
                attempt += 1;
                tracing::debug!("Querying '{}' (attempt {}/{})", term, attempt, attempts);

                match provider.search(term.as_str().to_string()).await {
                    Ok(json) => return Ok(ResultPayload::from_json(&json)),
                    Err(e) if attempt < attempts => {
                        tracing::warn!("Query '{}' failed: {} - retrying", term, e);
                    }
                    Err(e) => {
                        return Err(SearchError::RetriesExhausted {
                            term: term.as_str().to_string(),
                            attempts: attempt,
                            last: e,
                        });
                    }
                }
            }
        })
    }

    /// Wrap an execution in a cancellable [`QueryRequest`].
    pub fn request(&self, term: SearchTerm, ticket: Ticket, cancel: CancellationToken) -> QueryRequest {
        QueryRequest {
            ticket,
            future: self.execute(term.clone()),
            term,
            cancel,
        }
    }
}

/// One in-flight search, owned by whoever awaits it.
///
/// The token is the disposal flag: once cancelled, the request never yields
/// a result, even if the provider call completes afterwards.
pub struct QueryRequest {
    ticket: Ticket,
    term: SearchTerm,
    cancel: CancellationToken,
    future: BoxFuture<'static, Result<ResultPayload, SearchError>>,
}

impl QueryRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn term(&self) -> &SearchTerm {
        &self.term
    }

    /// Await the result.
    ///
    /// A disposed request resolves to [`SearchError::Cancelled`], even when
    /// the provider answered after the token was cancelled.
    pub async fn resolve(self) -> Result<ResultPayload, SearchError> {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SearchError::Cancelled),
            result = self.future => result,
        };

        if self.cancel.is_cancelled() {
            tracing::debug!("Request {} for '{}' disposed", self.ticket, self.term);
            return Err(SearchError::Cancelled);
        }
        result
    }
}
