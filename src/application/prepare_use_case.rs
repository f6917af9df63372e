// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Builds the framed dataset from configuration, in order:
//
//   Step 1: Validate the config                 (Layer 6 - infra)
//   Step 2: Load raw records                    (Layer 4 - data)
//   Step 3: Resolve the tokenizer               (Layer 6 - infra)
//   Step 4: Register specials, resolve ids      (Layer 4 - data)
//   Step 5: Tokenize + cache every record       (Layer 4 - data)
//
// and exposes the two read-only views the CLI offers on top of
// it: inspecting one example and checking the whole dataset.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::data::{context::PipelineContext, dataset::BilingualDataset, loader::JsonlDatasetSource};
use crate::domain::example::FramedExample;
use crate::domain::traits::DatasetSource;
use crate::infra::{
    config::PipelineConfig,
    tokenizer_store::{HfTokenizer, TokenizerStore},
};

/// A loaded dataset plus the vocabulary size of its tokenizer.
pub struct PreparedDataset {
    pub dataset:    BilingualDataset,
    pub vocab_size: usize,
}

/// Everything known about one index, for display.
#[derive(Debug)]
pub struct InspectReport {
    pub index:   usize,
    pub text:    String,
    pub source:  Vec<u32>,
    pub target:  Vec<u32>,
    pub example: FramedExample,
}

#[derive(Debug)]
pub struct CheckReport {
    pub total:     usize,
    /// (index, reason) for every example that cannot be framed
    pub oversized: Vec<(usize, String)>,
}

pub struct PrepareUseCase {
    config: PipelineConfig,
}

impl PrepareUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn execute(&self) -> Result<PreparedDataset> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Raw records ───────────────────────────────────────────────
        tracing::info!("Loading dataset '{}' from '{}'", cfg.dataset, cfg.data_dir);
        let source  = JsonlDatasetSource::new(&cfg.data_dir, &cfg.split);
        let records = source.load(&cfg.dataset)?;

        // ── Step 3: Tokenizer ─────────────────────────────────────────────────
        let tokenizer = TokenizerStore::new(&cfg.cache_dir)
            .resolve(&cfg.tokenizer, &records, cfg.vocab_size)
            .with_context(|| format!("Cannot resolve tokenizer '{}'", cfg.tokenizer))?;

        // ── Step 4: Specials + context ────────────────────────────────────────
        // HfTokenizer::new is the single place specials get registered
        let tokenizer  = HfTokenizer::new(tokenizer);
        let vocab_size = tokenizer.vocab_size();
        let ctx = PipelineContext::new(
            Arc::new(tokenizer),
            cfg.lengths(),
            &cfg.delimiter,
            cfg.delimiter_span,
        )?;

        // ── Step 5: Tokenize and cache ────────────────────────────────────────
        let dataset = BilingualDataset::from_records(records, ctx)?;

        Ok(PreparedDataset { dataset, vocab_size })
    }

    /// Split and frame a single index.
    pub fn inspect(&self, index: usize) -> Result<InspectReport> {
        let prepared = self.execute()?;
        inspect_dataset(&prepared.dataset, index)
    }

    /// Frame every index and collect the failures.
    pub fn check(&self) -> Result<CheckReport> {
        let prepared = self.execute()?;
        Ok(check_dataset(&prepared.dataset))
    }
}

fn inspect_dataset(dataset: &BilingualDataset, index: usize) -> Result<InspectReport> {
    let pair    = dataset.segments(index)?;
    let example = dataset.try_get(index)?;
    let text    = dataset
        .record(index)
        .map(|r| r.text.clone())
        .unwrap_or_default();

    Ok(InspectReport {
        index,
        text,
        source: pair.source.to_vec(),
        target: pair.target.to_vec(),
        example,
    })
}

fn check_dataset(dataset: &BilingualDataset) -> CheckReport {
    use burn::data::dataset::Dataset;

    let oversized: Vec<(usize, String)> = dataset
        .oversized()
        .into_iter()
        .map(|(i, e)| (i, e.to_string()))
        .collect();

    if !oversized.is_empty() {
        tracing::warn!("{} of {} examples cannot be framed", oversized.len(), dataset.len());
    }

    CheckReport {
        total: dataset.len(),
        oversized,
    }
}
