//! Search pipeline for the typeahead widget.
//!
//! This crate turns raw input-change events into a stream of result sets:
//! - `QuerySource` throttles and de-duplicates input
//! - `SearchExecutor` queries the provider with bounded retries
//! - `LatestWins` drops results of superseded requests and sessions
//! - `project` normalizes payloads into rows
//! - `SessionHandle` runs all of the above for one open session

mod executor;
mod latest;
mod projector;
mod provider;
mod query_source;
mod session;

pub use executor::{QueryRequest, SearchExecutor};
pub use latest::{LatestWins, Ticket};
pub use projector::project;
pub use provider::SearchProvider;
pub use query_source::QuerySource;
pub use session::{PipelineEvent, SessionHandle, SessionOutput, SessionOutputs};
