//! Single completion goal tied to task progress.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub text: String,
    /// Set once task progress reaches 100%; reset whenever the goal changes.
    pub achieved: bool,
}

impl Goal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            achieved: false,
        }
    }
}
