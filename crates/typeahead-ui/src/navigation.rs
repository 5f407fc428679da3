//! Keyboard navigation over the rendered rows.
//!
//! ```text
//! Input ──Up/Down (rows exist)──► Row(0)
//! Row(i) ──Down──► Row(i+1, wraps to 0)
//! Row(i) ──Up────► Row(i-1, wraps to last)
//! Row(i) ──Enter─► Navigate(link)
//! ```
//!
//! Every move mirrors the new row's label into the input and makes that row
//! the only tab stop.

use crate::model::{Focus, WidgetState};

/// Keys the state machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
    Other,
}

/// Outcome of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Not ours; let it propagate.
    Ignored,
    /// Handled, stop propagation.
    Consumed,
    /// Handled; the caller should navigate to this link.
    Navigate(String),
}

/// Run one key through the navigation state machine.
pub fn handle_key(state: &mut WidgetState, key: NavKey) -> Disposition {
    if !state.is_open() {
        return Disposition::Ignored;
    }

    match state.focus {
        Focus::Input => from_input(state, key),
        Focus::Row(handle) => match state.dropdown.row(handle) {
            Some(_) => from_row(state, handle.index(), key),
            None => {
                // Detached by a newer render.
                tracing::debug!("Dropping stale row focus");
                state.focus = Focus::Input;
                Disposition::Consumed
            }
        },
        Focus::Trigger | Focus::Outside => Disposition::Ignored,
    }
}

fn from_input(state: &mut WidgetState, key: NavKey) -> Disposition {
    match key {
        NavKey::Up | NavKey::Down => {
            if state.dropdown.is_visible() {
                focus_row(state, 0);
            }
            Disposition::Consumed
        }
        NavKey::Enter | NavKey::Other => Disposition::Ignored,
    }
}

fn from_row(state: &mut WidgetState, index: usize, key: NavKey) -> Disposition {
    let len = state.dropdown.rows().len();
    match key {
        NavKey::Down => {
            focus_row(state, (index + 1) % len);
            Disposition::Consumed
        }
        NavKey::Up => {
            focus_row(state, (index + len - 1) % len);
            Disposition::Consumed
        }
        NavKey::Enter => match state.dropdown.rows().get(index) {
            Some(rendered) => Disposition::Navigate(rendered.row.link.clone()),
            None => Disposition::Consumed,
        },
        NavKey::Other => Disposition::Consumed,
    }
}

/// Focus the row at `index` if it exists in the current render.
pub(crate) fn focus_row(state: &mut WidgetState, index: usize) -> bool {
    let Some(handle) = state.dropdown.handle(index) else {
        return false;
    };
    let Some(label) = state.dropdown.row(handle).map(|r| r.row.label.clone()) else {
        return false;
    };

    state.dropdown.set_tab_stop(handle);
    state.input.value = label;
    state.focus = Focus::Row(handle);
    true
}
