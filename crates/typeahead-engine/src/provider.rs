//! Remote search provider seam.
//!
//! The trait is transport-independent and returns futures, so the pipeline
//! can spawn them however it wants and tests can substitute a mock.

use futures::future::BoxFuture;
use serde_json::Value;
use typeahead_core::ProviderError;

/// A remote search API.
///
/// `search` resolves to the provider's raw JSON. Only the shape described by
/// [`typeahead_core::ResultPayload::from_json`] is interpreted downstream.
#[cfg_attr(test, mockall::automock)]
pub trait SearchProvider: Send + Sync {
    /// Issue one query for a non-empty term.
    fn search(&self, term: String) -> BoxFuture<'static, Result<Value, ProviderError>>;
}
