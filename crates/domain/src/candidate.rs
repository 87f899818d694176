use serde::{Deserialize, Serialize};

/// A fully-qualified name to put in a question, derived from the caller's
/// hostname and at most one search suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateName {
    /// Dotted form without the trailing root dot.
    pub name: String,

    pub suffix: Option<String>,

    /// Position in the search order.
    pub rank: usize,
}

impl CandidateName {
    pub fn bare(name: impl Into<String>, rank: usize) -> Self {
        Self {
            name: name.into(),
            suffix: None,
            rank,
        }
    }

    pub fn with_suffix(hostname: &str, suffix: &str, rank: usize) -> Self {
        Self {
            name: format!("{}.{}", hostname, suffix),
            suffix: Some(suffix.to_string()),
            rank,
        }
    }

    pub fn is_bare(&self) -> bool {
        self.suffix.is_none()
    }
}
