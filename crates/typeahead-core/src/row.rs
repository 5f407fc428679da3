//! Payload and row types for search results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw response for one query, reduced to the two lists the widget uses.
///
/// `labels[i]` and `links[i]` describe the same result. Either list may be
/// missing when the provider answered with an unexpected shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
}

impl ResultPayload {
    /// Explicitly empty payload (blank term).
    pub fn empty() -> Self {
        Self {
            labels: Some(Vec::new()),
            links: Some(Vec::new()),
        }
    }

    /// Create a payload from index-aligned lists.
    pub fn new(labels: Vec<String>, links: Vec<String>) -> Self {
        Self {
            labels: Some(labels),
            links: Some(links),
        }
    }

    /// Extract labels (index 1) and links (index 3) from an OpenSearch array.
    ///
    /// Anything that isn't an array of strings at those positions comes back
    /// as a missing list rather than an error.
    pub fn from_json(json: &Value) -> Self {
        Self {
            labels: string_list(json.get(1)),
            links: string_list(json.get(3)),
        }
    }

    /// Labels and links when both are present and the same length.
    pub fn aligned(&self) -> Option<(&[String], &[String])> {
        match (&self.labels, &self.links) {
            (Some(labels), Some(links)) if labels.len() == links.len() => {
                Some((labels.as_slice(), links.as_slice()))
            }
            _ => None,
        }
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// One (label, link) pair ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRow {
    /// Display text, also mirrored into the input during navigation.
    pub label: String,

    /// Navigation target.
    pub link: String,
}

impl ResultRow {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
        }
    }
}

/// What the dropdown should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rows")]
pub enum Projection {
    /// Rows in provider order.
    Rows(Vec<ResultRow>),

    /// Show the "no results" placeholder.
    Empty,
}

impl Projection {
    /// Rows eligible for keyboard focus. The placeholder has none.
    pub fn rows(&self) -> &[ResultRow] {
        match self {
            Projection::Rows(rows) => rows,
            Projection::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Projection::Empty)
    }
}
