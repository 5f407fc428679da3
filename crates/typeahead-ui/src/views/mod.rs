//! Terminal views for the search widget.
//!
//! Views are pure functions of [`crate::model::WidgetState`]; they never
//! mutate it.

mod widget_view;

pub use widget_view::{draw, INPUT_CHROME};
