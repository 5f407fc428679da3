//! Search terms derived from raw input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed search string.
///
/// Construction always trims, so two terms compare equal exactly when the
/// inputs they came from are equal after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Build a term from raw input text.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    /// Blank terms never reach the provider.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SearchTerm {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SearchTerm {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
