//! Latest-wins delivery.
//!
//! Every operation started through [`LatestWins::begin`] gets a [`Ticket`]
//! carrying a monotonically increasing generation plus a cancellation token.
//! Starting a new operation cancels the previous token, and a result is
//! delivered only if its ticket still matches the current generation:
//!
//! ```text
//! begin(A)  -> ticket 1
//! begin(B)  -> ticket 2, A cancelled
//! A resolves with ticket 1 -> 1 != 2, discarded
//! B resolves with ticket 2 -> delivered
//! ```
//!
//! The same type switches between query requests inside a session and
//! between sessions inside a widget.

use std::fmt;

use tokio_util::sync::CancellationToken;

/// Identity of one started operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracks the single operation whose results may still be observed.
#[derive(Debug, Default)]
pub struct LatestWins {
    generation: u64,
    current: Option<(Ticket, CancellationToken)>,
    /// Tokens are children of this one when set.
    parent: Option<CancellationToken>,
}

impl LatestWins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a combinator whose tokens are cancelled along with `parent`.
    pub fn scoped(parent: CancellationToken) -> Self {
        Self {
            generation: 0,
            current: None,
            parent: Some(parent),
        }
    }

    /// Start a new operation, superseding the current one.
    pub fn begin(&mut self) -> (Ticket, CancellationToken) {
        if let Some((ticket, token)) = self.current.take() {
            tracing::debug!("Superseding operation {}", ticket);
            token.cancel();
        }

        self.generation += 1;
        let ticket = Ticket(self.generation);
        let token = match &self.parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        self.current = Some((ticket, token.clone()));
        (ticket, token)
    }

    /// Whether results tagged with `ticket` may be delivered.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        matches!(&self.current, Some((current, token)) if *current == ticket && !token.is_cancelled())
    }

    /// Pass `value` through if `ticket` is current.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }

    /// Mark the current operation as completed. Later deliveries for it are refused.
    pub fn finish(&mut self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.current = None;
        }
    }

    /// Cancel the current operation without starting another.
    pub fn cancel(&mut self) {
        if let Some((ticket, token)) = self.current.take() {
            tracing::debug!("Cancelling operation {}", ticket);
            token.cancel();
        }
    }

    /// Ticket of the operation in flight, if any.
    pub fn current(&self) -> Option<Ticket> {
        self.current.as_ref().map(|(ticket, _)| *ticket)
    }
}
