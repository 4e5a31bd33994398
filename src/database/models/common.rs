//! Common shared models.

use serde::{Deserialize, Serialize};

/// A single URL button attached to a filter reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    /// Button label shown to the user
    pub label: String,
    /// URL to open when clicked
    pub url: String,
}

impl InlineButton {
    /// Create a new inline button.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}
