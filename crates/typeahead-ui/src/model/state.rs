//! Owned widget state.
//!
//! Every handler receives `&mut WidgetState`; nothing visible to the user
//! lives outside of it. Front ends only read from it.

use typeahead_core::Projection;

use crate::render::{Dropdown, RenderedRow, RowHandle};

// =============================================================================
// Widget Phase State Machine
// =============================================================================

/// Session lifecycle. There is no intermediate state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WidgetPhase {
    /// Only the trigger control is visible.
    #[default]
    Closed,
    /// The input form is visible and a session pipeline is running.
    Open,
}

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// The open trigger.
    #[default]
    Trigger,
    /// The search input.
    Input,
    /// A rendered result row.
    Row(RowHandle),
    /// Somewhere outside the widget (input blurred).
    Outside,
}

// =============================================================================
// Input State
// =============================================================================

/// The search input surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// Current text. Written by the user and by label mirroring.
    pub value: String,

    /// Whether the input advertises an expanded dropdown.
    pub expanded: bool,
}

// =============================================================================
// Widget State
// =============================================================================

#[derive(Debug, Default)]
pub struct WidgetState {
    pub phase: WidgetPhase,
    pub focus: Focus,
    pub input: InputState,
    pub dropdown: Dropdown,
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.phase == WidgetPhase::Open
    }

    pub fn trigger_visible(&self) -> bool {
        self.phase == WidgetPhase::Closed
    }

    pub fn form_visible(&self) -> bool {
        self.phase == WidgetPhase::Open
    }

    pub fn input_focused(&self) -> bool {
        self.focus == Focus::Input
    }

    /// Index of the focused row, if a row of the current render holds focus.
    pub fn focus_index(&self) -> Option<usize> {
        self.focused_row_handle().map(|handle| handle.index())
    }

    /// The focused row, if it belongs to the current render.
    pub fn focused_row(&self) -> Option<&RenderedRow> {
        self.focused_row_handle()
            .and_then(|handle| self.dropdown.row(handle))
    }

    fn focused_row_handle(&self) -> Option<RowHandle> {
        match self.focus {
            Focus::Row(handle) if self.dropdown.row(handle).is_some() => Some(handle),
            _ => None,
        }
    }

    /// Closed → Open: hide the trigger, reveal an empty input and focus it.
    pub(crate) fn open(&mut self) {
        self.phase = WidgetPhase::Open;
        self.input.value.clear();
        self.input.expanded = true;
        self.dropdown.clear();
        self.focus = Focus::Input;
    }

    /// Open → Closed: reverse everything `open` did and drop rendered rows.
    pub(crate) fn close(&mut self) {
        self.phase = WidgetPhase::Closed;
        self.input.value.clear();
        self.input.expanded = false;
        self.dropdown.clear();
        self.focus = Focus::Trigger;
    }

    /// Hand a projection to the render sink.
    ///
    /// A focused row of the previous render is detached by the replace, so
    /// focus falls back to the input.
    pub(crate) fn render(&mut self, projection: Projection, placeholder: &str, width: u16) {
        self.dropdown.render(projection, placeholder, width);
        self.input.expanded = true;
        if matches!(self.focus, Focus::Row(_)) {
            self.focus = Focus::Input;
        }
    }
}
