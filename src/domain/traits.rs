// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline only ever talks to its collaborators through
// these traits:
//   - JsonlDatasetSource implements DatasetSource
//   - HfTokenizer implements TextTokenizer
// Tests plug in small in-memory implementations instead.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::Result;
use crate::domain::record::RawRecord;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can resolve a dataset name to its raw records.
pub trait DatasetSource {
    /// Load every record of the named dataset.
    /// Fails with `DatasetNotFound` if the name cannot be resolved.
    fn load(&self, name: &str) -> Result<Vec<RawRecord>>;
}

// ─── TextTokenizer ────────────────────────────────────────────────────────────
/// Text → token ids, without any auto-added wrapper tokens.
///
/// Must be `Send + Sync`: the dataset holding it is read from
/// several data-loader workers at once.
pub trait TextTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>>;

    /// Tokenize many texts at once. Implementations may parallelise.
    fn tokenize_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        texts.iter().map(|t| self.tokenize(t)).collect()
    }
}
