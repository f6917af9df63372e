// ============================================================
// Layer 3 — RawRecord Domain Type
// ============================================================
// One entry of the training split. The text field holds a
// source sentence and a target sentence joined by a literal
// delimiter, e.g.
//
//   "the cat sleeps ###> le chat dort"
//
// Records are produced once by a DatasetSource and never
// mutated afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Source and target sentence joined by the delimiter
    pub text: String,
}

impl RawRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
