// ============================================================
// Layer 6 — Pipeline Configuration
// ============================================================
// All settings for a run, serialisable so a run can be
// reproduced from a JSON file:
//
//   {
//     "dataset": "opus-en-fr",
//     "tokenizer": "bert-base-uncased",
//     "enc_max_seq_len": 128,
//     "dec_max_seq_len": 128,
//     "model": { "d_model": 512, ... },
//     ...
//   }
//
// Missing fields fall back to the defaults below.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::domain::framing::{SequenceLengths, DEFAULT_DELIMITER, DELIMITER_SPAN};

/// Transformer hyperparameters, named after the builder arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub d_model:        usize,
    pub heads:          usize,
    pub n_stack:        usize,
    /// Positions covered by the position embedding
    pub max_seq_len:    usize,
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    pub dropout:        f64,
    /// Inner width of the feed-forward blocks
    pub d_fc:           usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            d_model:        512,
            heads:          8,
            n_stack:        6,
            max_seq_len:    512,
            src_vocab_size: 32000,
            tgt_vocab_size: 32000,
            dropout:        0.1,
            d_fc:           2048,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Dataset name, resolved under `data_dir`
    pub dataset:         String,
    /// Tokenizer file, hub identifier, or "word-level"
    pub tokenizer:       String,
    pub data_dir:        String,
    pub split:           String,
    /// Where a built word-level tokenizer is cached
    pub cache_dir:       String,
    pub enc_max_seq_len: usize,
    pub dec_max_seq_len: usize,
    pub delimiter:       String,
    pub delimiter_span:  usize,
    /// Vocabulary cap when building a word-level tokenizer
    pub vocab_size:      usize,
    pub model:           ModelSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset:         "bilingual".to_string(),
            tokenizer:       "word-level".to_string(),
            data_dir:        "data".to_string(),
            split:           "train".to_string(),
            cache_dir:       "cache".to_string(),
            enc_max_seq_len: 128,
            dec_max_seq_len: 128,
            delimiter:       DEFAULT_DELIMITER.to_string(),
            delimiter_span:  DELIMITER_SPAN,
            vocab_size:      32000,
            model:           ModelSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn lengths(&self) -> SequenceLengths {
        SequenceLengths::new(self.enc_max_seq_len, self.dec_max_seq_len)
    }

    /// Reject settings no example could ever be framed with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.enc_max_seq_len >= 2,
            "enc_max_seq_len must leave room for <sos> and <eos> (got {})",
            self.enc_max_seq_len
        );
        ensure!(
            self.dec_max_seq_len >= 1,
            "dec_max_seq_len must leave room for <sos> / <eos> (got {})",
            self.dec_max_seq_len
        );
        ensure!(self.delimiter_span > 0, "delimiter_span must be positive");
        ensure!(!self.delimiter.is_empty(), "delimiter must not be empty");
        Ok(())
    }

    /// Reject model settings that cannot embed the framed sequences.
    /// Only needed when a model is actually built.
    pub fn validate_model(&self) -> Result<()> {
        ensure!(
            self.model.max_seq_len >= self.enc_max_seq_len.max(self.dec_max_seq_len),
            "model.max_seq_len ({}) is shorter than the framed sequences ({} / {})",
            self.model.max_seq_len,
            self.enc_max_seq_len,
            self.dec_max_seq_len
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved config to '{}'", path.display());
        Ok(())
    }
}
