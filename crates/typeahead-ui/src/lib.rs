//! Typeahead UI - widget controller and terminal front end.
//!
//! The widget is front-end independent: it owns a [`WidgetState`], talks to
//! its host through the [`Surface`] trait and is driven by [`WidgetEvent`]s
//! plus the session outputs of the search pipeline. `app` wires it to a
//! ratatui terminal.

pub mod app;
pub mod input;
pub mod keymap;
pub mod model;
pub mod navigation;
pub mod render;
pub mod surface;
pub mod views;
pub mod widget;

pub use model::{Focus, InputState, WidgetPhase, WidgetState};
pub use navigation::{handle_key, Disposition, NavKey};
pub use render::{Dropdown, DropdownContent, RenderedRow, RowHandle};
pub use surface::Surface;
pub use widget::{Widget, WidgetEvent};
