//! Render sink for the results dropdown.
//!
//! `Dropdown` is the single writer of the dropdown's children: fields are
//! private and content only changes through [`Dropdown::render`] (atomic
//! replace) or [`Dropdown::clear`]. Every replace bumps a render id, and row
//! handles carry the id they were taken from, so a handle into a previous
//! render can never reach a row of the current one.

use typeahead_core::{Projection, ResultRow};

/// A row as displayed, with its roving tab-stop flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub row: ResultRow,
    /// Only the focused row is a tab stop; all others are demoted.
    pub tab_stop: bool,
}

/// Reference to a row of one specific render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle {
    render_id: u64,
    index: usize,
}

impl RowHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Current children of the dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DropdownContent {
    /// No children.
    #[default]
    Nothing,
    /// Result rows in provider order.
    Rows(Vec<RenderedRow>),
    /// The informational "no results" row.
    Placeholder(String),
}

/// The results dropdown.
#[derive(Debug, Default)]
pub struct Dropdown {
    content: DropdownContent,
    visible: bool,
    width: u16,
    render_id: u64,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole content with `projection` and show the dropdown at `width`.
    pub fn render(&mut self, projection: Projection, placeholder: &str, width: u16) {
        self.render_id += 1;
        self.content = match projection {
            Projection::Rows(rows) => DropdownContent::Rows(
                rows.into_iter()
                    .map(|row| RenderedRow {
                        row,
                        tab_stop: false,
                    })
                    .collect(),
            ),
            Projection::Empty => DropdownContent::Placeholder(placeholder.to_string()),
        };
        self.visible = true;
        self.width = width;
        tracing::debug!(
            "Rendered {} rows (render {})",
            self.rows().len(),
            self.render_id
        );
    }

    /// Remove every child and hide.
    pub fn clear(&mut self) {
        self.render_id += 1;
        self.content = DropdownContent::Nothing;
        self.visible = false;
    }

    /// Show existing content again. Returns false when there is nothing to show.
    pub fn show(&mut self, width: u16) -> bool {
        if !self.has_content() {
            return false;
        }
        self.visible = true;
        self.width = width;
        true
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn content(&self) -> &DropdownContent {
        &self.content
    }

    pub fn has_content(&self) -> bool {
        !matches!(self.content, DropdownContent::Nothing)
    }

    /// Focus-eligible rows. The placeholder is not one of them.
    pub fn rows(&self) -> &[RenderedRow] {
        match &self.content {
            DropdownContent::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Placeholder text, when the placeholder is what's rendered.
    pub fn placeholder(&self) -> Option<&str> {
        match &self.content {
            DropdownContent::Placeholder(text) => Some(text),
            _ => None,
        }
    }

    /// Handle to the row at `index` of the current render.
    pub fn handle(&self, index: usize) -> Option<RowHandle> {
        (index < self.rows().len()).then_some(RowHandle {
            render_id: self.render_id,
            index,
        })
    }

    /// Resolve a handle. Handles from earlier renders resolve to nothing.
    pub fn row(&self, handle: RowHandle) -> Option<&RenderedRow> {
        if handle.render_id != self.render_id {
            return None;
        }
        self.rows().get(handle.index)
    }

    /// Make `handle` the only tab stop.
    pub(crate) fn set_tab_stop(&mut self, handle: RowHandle) {
        if handle.render_id != self.render_id {
            return;
        }
        if let DropdownContent::Rows(rows) = &mut self.content {
            for (i, rendered) in rows.iter_mut().enumerate() {
                rendered.tab_stop = i == handle.index;
            }
        }
    }
}
