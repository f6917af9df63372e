// ============================================================
// Layer 2 — DryRunUseCase
// ============================================================
// Prepares the dataset, builds the transformer from the model
// settings and runs a forward-only pass over a few batches:
//
//   Step 0: Check the model can embed the framed lengths
//   Step 1: Prepare the framed dataset        (PrepareUseCase)
//   Step 2: Refuse datasets with oversized examples
//   Step 3: Build the model                   (Layer 5 - ml)
//   Step 4: Run forward_loss over batches     (Layer 5 - ml)

use anyhow::{bail, Result};

use crate::application::prepare_use_case::PrepareUseCase;
use crate::infra::config::PipelineConfig;
use crate::ml::model::Seq2SeqConfig;
use crate::ml::runner::{dry_run, DryRunReport};

type DryRunBackend = burn::backend::Wgpu;

pub struct DryRunUseCase {
    prepare:     PrepareUseCase,
    batch_size:  usize,
    max_batches: usize,
}

impl DryRunUseCase {
    pub fn new(config: PipelineConfig, batch_size: usize, max_batches: usize) -> Self {
        Self {
            prepare: PrepareUseCase::new(config),
            batch_size,
            max_batches,
        }
    }

    pub fn execute(&self) -> Result<DryRunReport> {
        // ── Step 0: Model lengths ─────────────────────────────────────────────
        self.prepare.config().validate_model()?;

        // ── Step 1: Dataset ───────────────────────────────────────────────────
        let prepared = self.prepare.execute()?;

        // ── Step 2: Every example must frame ──────────────────────────────────
        // The data loader stops at the first example that cannot be framed,
        // so a partial pass would silently look like a short dataset.
        let oversized = prepared.dataset.oversized();
        if let Some((index, err)) = oversized.first() {
            bail!(
                "{} examples cannot be framed (first: index {}: {}). Run `check` for the full list",
                oversized.len(),
                index,
                err
            );
        }

        // ── Step 3: Model ─────────────────────────────────────────────────────
        let model_cfg = model_config(self.prepare.config(), prepared.vocab_size);
        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);
        let model = model_cfg.init::<DryRunBackend>(&device);
        tracing::info!(
            "Model ready: {} layers, d_model={}, vocab={}",
            model_cfg.n_stack,
            model_cfg.d_model,
            model_cfg.tgt_vocab_size
        );

        // ── Step 4: Forward pass ──────────────────────────────────────────────
        dry_run::<DryRunBackend, _>(
            &model,
            prepared.dataset,
            self.batch_size,
            self.max_batches,
            device,
        )
    }
}

/// Model config from the settings, widening the vocabularies if the
/// tokenizer (specials included) turned out larger than configured.
fn model_config(cfg: &PipelineConfig, tokenizer_vocab: usize) -> Seq2SeqConfig {
    let m = &cfg.model;
    if tokenizer_vocab > m.src_vocab_size.min(m.tgt_vocab_size) {
        tracing::warn!(
            "Tokenizer vocabulary ({}) exceeds configured model vocabulary ({} / {}), widening",
            tokenizer_vocab,
            m.src_vocab_size,
            m.tgt_vocab_size
        );
    }
    Seq2SeqConfig::new(
        m.src_vocab_size.max(tokenizer_vocab),
        m.tgt_vocab_size.max(tokenizer_vocab),
        m.max_seq_len,
        m.d_model,
        m.heads,
        m.n_stack,
        m.d_fc,
        m.dropout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_widens_vocab() {
        let mut cfg = PipelineConfig::default();
        cfg.model.src_vocab_size = 10;
        cfg.model.tgt_vocab_size = 100;

        let m = model_config(&cfg, 50);
        assert_eq!(m.src_vocab_size, 50);
        assert_eq!(m.tgt_vocab_size, 100);
        assert_eq!(m.n_stack, cfg.model.n_stack);
    }

    #[test]
    fn test_rejects_model_shorter_than_sequences_before_loading() {
        let cfg = PipelineConfig {
            enc_max_seq_len: 600,
            dataset:         "does-not-exist".to_string(),
            ..Default::default()
        };
        let err = DryRunUseCase::new(cfg, 2, 1).execute().unwrap_err();
        assert!(err.to_string().contains("model.max_seq_len"));
    }
}
