//! Terminal key bindings.
//!
//! | Key            | Closed widget | Input focused        | Row focused | Input blurred |
//! |----------------|---------------|----------------------|-------------|---------------|
//! | `/`, Enter     | open          | (typed / nav Enter)  | nav Enter   | -             |
//! | Esc            | -             | close                | close       | close         |
//! | Up, Down       | -             | nav                  | nav         | -             |
//! | Tab            | -             | blur                 | focus input | focus input   |
//! | chars, Bksp    | -             | edit input           | edit input  | -             |
//! | Ctrl+C         | quit          | quit                 | quit        | quit          |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{Focus, WidgetState};
use crate::navigation::NavKey;
use crate::widget::WidgetEvent;

/// What the front end should do with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendAction {
    /// Forward to the widget.
    Widget(WidgetEvent),
    /// Append to the input, then report the change.
    InsertChar(char),
    /// Delete the last grapheme, then report the change.
    Backspace,
    Quit,
    None,
}

/// Map a key event to a front-end action given the current widget state.
pub fn map_key(key: KeyEvent, state: &WidgetState) -> FrontendAction {
    if key.kind != KeyEventKind::Press {
        return FrontendAction::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return FrontendAction::Quit;
    }

    if !state.is_open() {
        return match key.code {
            KeyCode::Char('/') | KeyCode::Enter => FrontendAction::Widget(WidgetEvent::Open),
            _ => FrontendAction::None,
        };
    }

    match (key.code, state.focus) {
        (KeyCode::Esc, _) => FrontendAction::Widget(WidgetEvent::Close),

        (KeyCode::Tab, Focus::Input) => {
            FrontendAction::Widget(WidgetEvent::BlurInput { to_row: None })
        }
        (KeyCode::Tab, _) => FrontendAction::Widget(WidgetEvent::FocusInput),

        (_, Focus::Outside | Focus::Trigger) => FrontendAction::None,

        (KeyCode::Up, _) => FrontendAction::Widget(WidgetEvent::Key(NavKey::Up)),
        (KeyCode::Down, _) => FrontendAction::Widget(WidgetEvent::Key(NavKey::Down)),
        (KeyCode::Enter, _) => FrontendAction::Widget(WidgetEvent::Key(NavKey::Enter)),
        (KeyCode::Backspace, _) => FrontendAction::Backspace,
        (KeyCode::Char(c), _) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            FrontendAction::InsertChar(c)
        }
        _ => FrontendAction::Widget(WidgetEvent::Key(NavKey::Other)),
    }
}
