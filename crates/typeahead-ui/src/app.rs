//! Terminal front end.
//!
//! Crossterm's `event::read` blocks, so it runs on its own OS thread and
//! forwards events over a channel:
//!
//! ```text
//! [reader thread] ---(UiEvent)---> [select! loop] <---(SessionOutput)--- [session tasks]
//!                                        |
//!                                        v
//!                                  Widget -> draw
//! ```

use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyEvent};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use typeahead_core::WidgetConfig;
use typeahead_engine::SearchProvider;

use crate::input;
use crate::keymap::{map_key, FrontendAction};
use crate::surface::Surface;
use crate::views::{self, INPUT_CHROME};
use crate::widget::{Widget, WidgetEvent};

// =============================================================================
// Terminal Surface
// =============================================================================

/// Surface backed by the terminal and the system browser.
#[derive(Debug)]
pub struct TerminalSurface {
    width: u16,
}

impl TerminalSurface {
    /// Surface for a terminal `columns` wide.
    pub fn new(columns: u16) -> Self {
        Self {
            width: columns.saturating_sub(INPUT_CHROME),
        }
    }

    pub fn resize(&mut self, columns: u16) {
        self.width = columns.saturating_sub(INPUT_CHROME);
    }
}

impl Surface for TerminalSurface {
    fn input_width(&self) -> u16 {
        self.width
    }

    fn navigate(&mut self, link: &str) {
        if let Err(e) = open::that(link) {
            tracing::error!("Failed to open {}: {}", link, e);
        }
    }
}

// =============================================================================
// Event Reader
// =============================================================================

#[derive(Debug)]
enum UiEvent {
    Key(KeyEvent),
    Resize(u16),
}

fn spawn_event_reader() -> mpsc::UnboundedReceiver<UiEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || loop {
        let event = match event::read() {
            Ok(Event::Key(key)) => UiEvent::Key(key),
            Ok(Event::Resize(columns, _)) => UiEvent::Resize(columns),
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("Terminal event read failed: {}", e);
                break;
            }
        };
        if tx.send(event).is_err() {
            break;
        }
    });

    rx
}

// =============================================================================
// Main Loop
// =============================================================================

/// Run the widget until the user quits.
pub async fn run(
    terminal: &mut DefaultTerminal,
    config: WidgetConfig,
    provider: Arc<dyn SearchProvider>,
) -> io::Result<()> {
    let columns = terminal.size()?.width;
    let (mut widget, mut outputs) = Widget::new(config, provider, TerminalSurface::new(columns));
    let mut events = spawn_event_reader();

    loop {
        terminal.draw(|frame| views::draw(frame, widget.state()))?;

        tokio::select! {
            event = events.recv() => match event {
                Some(UiEvent::Key(key)) => {
                    let action = map_key(key, widget.state());
                    if dispatch(&mut widget, action).is_break() {
                        break;
                    }
                }
                Some(UiEvent::Resize(columns)) => widget.surface_mut().resize(columns),
                None => break,
            },
            _ = widget.pump(&mut outputs) => {}
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

/// Apply a front-end action to the widget.
pub fn dispatch<S: Surface>(widget: &mut Widget<S>, action: FrontendAction) -> ControlFlow<()> {
    match action {
        FrontendAction::Quit => return ControlFlow::Break(()),
        FrontendAction::Widget(event) => {
            widget.handle(event);
        }
        FrontendAction::InsertChar(c) => {
            let mut value = widget.state().input.value.clone();
            input::insert(&mut value, c);
            widget.handle(WidgetEvent::InputChanged(value));
        }
        FrontendAction::Backspace => {
            let mut value = widget.state().input.value.clone();
            if input::backspace(&mut value) {
                widget.handle(WidgetEvent::InputChanged(value));
            }
        }
        FrontendAction::None => {}
    }
    ControlFlow::Continue(())
}
