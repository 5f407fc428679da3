//! Query source: raw input values in, distinct search terms out.
//!
//! Two stages, both driven by explicit timestamps so the state machine stays
//! pure and testable:
//!
//! ```text
//! input   {.'c'.'ca'.'cat'..........'cat '.........'cats'.......
//! window     [-------]                [-------]       [-------]
//! emitted  ..........'cat'......................(dup)..........'cats'
//! ```
//!
//! - The first input after a quiet period opens a window of fixed length.
//!   Inputs inside the window replace the pending value; when the window
//!   closes, the latest value is released and the source goes quiet again.
//! - A released term equal to the previously emitted one is dropped.

use std::time::Duration;

use tokio::time::Instant;
use typeahead_core::SearchTerm;

/// Throttles and de-duplicates input for one session.
#[derive(Debug)]
pub struct QuerySource {
    window: Duration,
    /// Open window: when it closes and the latest raw value seen inside it.
    pending: Option<(Instant, String)>,
    /// Last term released downstream.
    last_emitted: Option<SearchTerm>,
}

impl QuerySource {
    /// Create a source with the given throttle window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: None,
        }
    }

    /// Record an input-change event at `now`.
    ///
    /// Returns the instant at which the current window closes.
    pub fn offer(&mut self, raw: impl Into<String>, now: Instant) -> Instant {
        let raw = raw.into();
        match &mut self.pending {
            Some((deadline, value)) => {
                *value = raw;
                *deadline
            }
            None => {
                let deadline = now + self.window;
                self.pending = Some((deadline, raw));
                deadline
            }
        }
    }

    /// When the open window closes, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Close the window if it has elapsed and release its term.
    ///
    /// Returns `None` while the window is still open, when nothing is pending,
    /// or when the released term repeats the last emitted one.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTerm> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => {}
            _ => return None,
        }
        let (_, raw) = self.pending.take()?;
        let term = SearchTerm::new(&raw);

        if self.last_emitted.as_ref() == Some(&term) {
            tracing::debug!("Suppressing repeated term '{}'", term);
            return None;
        }

        self.last_emitted = Some(term.clone());
        Some(term)
    }

    /// Forget the last emitted term, so the next release of it is not
    /// suppressed. Used when that term's request was abandoned undelivered.
    pub fn forget_last(&mut self) {
        self.last_emitted = None;
    }
}
