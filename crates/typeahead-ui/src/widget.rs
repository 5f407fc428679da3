//! Widget controller.
//!
//! Owns the [`WidgetState`], the session lifecycle and the outer latest-wins
//! switch between sessions. Front ends feed it [`WidgetEvent`]s and the
//! session outputs; it never blocks.

use std::sync::Arc;

use tokio::sync::mpsc;
use typeahead_core::{Projection, WidgetConfig};
use typeahead_engine::{
    LatestWins, PipelineEvent, SearchExecutor, SearchProvider, SessionHandle, SessionOutput,
    SessionOutputs,
};

use crate::model::{Focus, WidgetState};
use crate::navigation::{self, Disposition, NavKey};
use crate::surface::Surface;

/// Discrete UI events the widget reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Open trigger activated.
    Open,
    /// Close trigger activated.
    Close,
    /// The input value changed to this text.
    InputChanged(String),
    /// The input gained focus.
    FocusInput,
    /// The input lost focus, possibly to the row at `to_row`.
    BlurInput { to_row: Option<usize> },
    /// A navigation key was pressed.
    Key(NavKey),
}

pub struct Widget<S: Surface> {
    config: WidgetConfig,
    executor: SearchExecutor,
    surface: S,
    state: WidgetState,
    /// Switches between sessions so a closed one can never deliver.
    sessions: LatestWins,
    session: Option<SessionHandle>,
    outputs: mpsc::UnboundedSender<SessionOutput>,
}

impl<S: Surface> Widget<S> {
    /// Create a closed widget. Session outputs arrive on the returned receiver
    /// and must be fed back through [`Widget::apply_output`] or [`Widget::pump`].
    pub fn new(
        config: WidgetConfig,
        provider: Arc<dyn SearchProvider>,
        surface: S,
    ) -> (Self, SessionOutputs) {
        let (outputs, outputs_rx) = mpsc::unbounded_channel();
        let executor = SearchExecutor::new(provider, config.max_retries);

        let widget = Self {
            config,
            executor,
            surface,
            state: WidgetState::new(),
            sessions: LatestWins::new(),
            session: None,
            outputs,
        };
        (widget, outputs_rx)
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// React to one UI event.
    pub fn handle(&mut self, event: WidgetEvent) -> Disposition {
        match event {
            WidgetEvent::Open => self.open(),
            WidgetEvent::Close => self.close(),
            WidgetEvent::InputChanged(value) => self.input_changed(value),
            WidgetEvent::FocusInput => self.focus_input(),
            WidgetEvent::BlurInput { to_row } => self.blur_input(to_row),
            WidgetEvent::Key(key) => self.key(key),
        }
    }

    /// Apply a session output. Returns false when it belonged to a session
    /// that is no longer current.
    pub fn apply_output(&mut self, output: SessionOutput) -> bool {
        if !self.state.is_open() || !self.sessions.is_current(output.session) {
            tracing::debug!("Discarding output of stale session {}", output.session);
            return false;
        }

        let projection = match output.event {
            PipelineEvent::Results(projection) => projection,
            PipelineEvent::Failed(reason) => {
                tracing::warn!("Search unavailable for this session: {}", reason);
                Projection::Empty
            }
        };
        let width = self.surface.input_width();
        self.state.render(projection, &self.config.placeholder, width);
        true
    }

    /// Wait for the next session output and apply it.
    ///
    /// Returns true if the output changed the widget.
    pub async fn pump(&mut self, outputs: &mut SessionOutputs) -> bool {
        match outputs.recv().await {
            Some(output) => self.apply_output(output),
            None => false,
        }
    }

    fn open(&mut self) -> Disposition {
        if self.state.is_open() {
            tracing::debug!("Open ignored, widget already open");
            return Disposition::Ignored;
        }

        self.state.open();
        let (ticket, cancel) = self.sessions.begin();
        self.session = Some(SessionHandle::spawn(
            ticket,
            cancel,
            &self.config,
            self.executor.clone(),
            self.outputs.clone(),
        ));
        Disposition::Consumed
    }

    fn close(&mut self) -> Disposition {
        if !self.state.is_open() {
            return Disposition::Ignored;
        }

        if let Some(session) = self.session.take() {
            session.close();
        }
        self.sessions.cancel();
        self.state.close();
        Disposition::Consumed
    }

    fn input_changed(&mut self, value: String) -> Disposition {
        if !self.state.is_open() {
            return Disposition::Ignored;
        }

        self.state.input.value = value.clone();
        self.state.focus = Focus::Input;

        match &self.session {
            Some(session) if session.push_input(value) => {}
            Some(session) => {
                tracing::debug!("Session {} has stopped; input ignored", session.ticket());
            }
            None => {}
        }
        Disposition::Consumed
    }

    fn focus_input(&mut self) -> Disposition {
        if !self.state.is_open() {
            return Disposition::Ignored;
        }

        self.state.focus = Focus::Input;
        let width = self.surface.input_width();
        if self.state.dropdown.show(width) {
            self.state.input.expanded = true;
        }
        Disposition::Consumed
    }

    fn blur_input(&mut self, to_row: Option<usize>) -> Disposition {
        if !self.state.is_open() {
            return Disposition::Ignored;
        }

        if let Some(index) = to_row {
            if navigation::focus_row(&mut self.state, index) {
                return Disposition::Consumed;
            }
        }

        self.state.focus = Focus::Outside;
        self.state.dropdown.hide();
        self.state.input.expanded = false;
        Disposition::Consumed
    }

    fn key(&mut self, key: NavKey) -> Disposition {
        match navigation::handle_key(&mut self.state, key) {
            Disposition::Navigate(link) => {
                tracing::info!("Navigating to {}", link);
                self.surface.navigate(&link);
                self.close();
                Disposition::Navigate(link)
            }
            other => other,
        }
    }
}
