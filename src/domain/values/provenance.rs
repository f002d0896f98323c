use serde::{Deserialize, Serialize};
use std::fmt;

/// Which path produced an answer: the inference service or the local heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provenance {
    Primary,
    Fallback,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Primary => write!(f, "PRIMARY"),
            Provenance::Fallback => write!(f, "FALLBACK"),
        }
    }
}
