//! State model for the search widget.
//!
//! These types are front-end independent so the widget can be driven and
//! tested without a terminal.

mod state;

pub use state::{Focus, InputState, WidgetPhase, WidgetState};
