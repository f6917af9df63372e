// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Resolves a dataset name to a JSON Lines file on disk and
// reads its records. Each non-blank line looks like:
//
//   {"text": "the cat sleeps ###> le chat dort"}
//
// Extra fields are ignored. Name resolution tries, in order:
//
//   <data_dir>/<name>/<split>.jsonl
//   <data_dir>/<name>.jsonl
//   <name>                       (a literal path)
//
// If none of them exists the load fails with DatasetNotFound.
// Unlike document corpora, a bad line is NOT skipped: one
// unreadable record fails the whole load.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::error::{PipelineError, Result};
use crate::domain::record::RawRecord;
use crate::domain::traits::DatasetSource;

/// Loads datasets stored as `.jsonl` files under a data directory.
pub struct JsonlDatasetSource {
    data_dir: PathBuf,
    split:    String,
}

impl JsonlDatasetSource {
    pub fn new(data_dir: impl Into<PathBuf>, split: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            split:    split.into(),
        }
    }

    /// Every path tried for `name`, in resolution order.
    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        vec![
            self.data_dir.join(name).join(format!("{}.jsonl", self.split)),
            self.data_dir.join(format!("{name}.jsonl")),
            PathBuf::from(name),
        ]
    }
}

impl DatasetSource for JsonlDatasetSource {
    fn load(&self, name: &str) -> Result<Vec<RawRecord>> {
        let candidates = self.candidates(name);

        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            let searched = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(PipelineError::DatasetNotFound {
                name: name.to_string(),
                searched,
            });
        };

        let records = read_jsonl(path)?;
        tracing::info!(
            "Loaded {} records for dataset '{}' from '{}'",
            records.len(),
            name,
            path.display()
        );
        Ok(records)
    }
}

/// Read every non-blank line of `path` as a `RawRecord`.
fn read_jsonl(path: &Path) -> Result<Vec<RawRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RawRecord =
            serde_json::from_str(&line).map_err(|source| PipelineError::MalformedRecord {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
        records.push(record);
    }

    Ok(records)
}
