// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands share one set of pipeline flags:
//
//   inspect  — show how one record is split and framed
//   check    — frame every record, list the ones that do not fit
//   dry-run  — push a few batches through the model
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::infra::config::{ModelSettings, PipelineConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the raw text, segments and framed tensors of one record
    Inspect(InspectArgs),

    /// Frame every record and report the ones exceeding the max lengths
    Check(CheckArgs),

    /// Run a forward-only pass over a few batches
    DryRun(DryRunArgs),
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// JSON config file; when given, the flags below are ignored
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dataset name, resolved under --data-dir
    #[arg(long, default_value = "bilingual")]
    pub dataset: String,

    /// Tokenizer file, hub identifier, or "word-level"
    #[arg(long, default_value = "word-level")]
    pub tokenizer: String,

    /// Directory holding <dataset>/<split>.jsonl or <dataset>.jsonl
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Dataset split to read
    #[arg(long, default_value = "train")]
    pub split: String,

    /// Where the word-level tokenizer is cached
    #[arg(long, default_value = "cache")]
    pub cache_dir: String,

    /// Fixed encoder length: <sos> source <eos> + padding
    #[arg(long, default_value_t = 128)]
    pub enc_max_seq_len: usize,

    /// Fixed decoder length: <sos> target + padding
    #[arg(long, default_value_t = 128)]
    pub dec_max_seq_len: usize,

    /// Text separating source and target in each record
    #[arg(long, default_value = "###>")]
    pub delimiter: String,

    /// Token ids skipped after a delimiter match
    #[arg(long, default_value_t = 4)]
    pub delimiter_span: usize,

    /// Vocabulary cap when building the word-level tokenizer
    #[arg(long, default_value_t = 32000)]
    pub vocab_size: usize,
}

impl PipelineArgs {
    /// The config file if one was given, otherwise the flags.
    pub fn into_config(self) -> Result<PipelineConfig> {
        match self.config.clone() {
            Some(path) => PipelineConfig::load(path),
            None => Ok(self.into()),
        }
    }
}

/// Convert CLI flags into the infra-layer config, so the
/// layers below never see clap types.
impl From<PipelineArgs> for PipelineConfig {
    fn from(a: PipelineArgs) -> Self {
        PipelineConfig {
            dataset:         a.dataset,
            tokenizer:       a.tokenizer,
            data_dir:        a.data_dir,
            split:           a.split,
            cache_dir:       a.cache_dir,
            enc_max_seq_len: a.enc_max_seq_len,
            dec_max_seq_len: a.dec_max_seq_len,
            delimiter:       a.delimiter,
            delimiter_span:  a.delimiter_span,
            vocab_size:      a.vocab_size,
            model:           ModelSettings::default(),
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Record index to show
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Print at most this many offending indices
    #[arg(long, default_value_t = 20)]
    pub show: usize,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
pub struct DryRunArgs {
    /// Examples per batch
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Stop after this many batches
    #[arg(long, default_value_t = 4)]
    pub max_batches: usize,

    /// Model width, overriding the default settings (ignored with --config)
    #[arg(long)]
    pub d_model: Option<usize>,

    /// Encoder/decoder layers (ignored with --config)
    #[arg(long)]
    pub n_stack: Option<usize>,

    /// Attention heads; d_model must be divisible by it (ignored with --config)
    #[arg(long)]
    pub heads: Option<usize>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl DryRunArgs {
    /// Pipeline config with the model overrides applied.
    pub fn config(self) -> Result<PipelineConfig> {
        let from_file = self.pipeline.config.is_some();
        let mut cfg = self.pipeline.into_config()?;
        if !from_file {
            let m = &mut cfg.model;
            m.max_seq_len = m.max_seq_len.max(cfg.enc_max_seq_len).max(cfg.dec_max_seq_len);
            if let Some(d) = self.d_model { m.d_model = d; }
            if let Some(n) = self.n_stack { m.n_stack = n; }
            if let Some(h) = self.heads   { m.heads   = h; }
        }
        Ok(cfg)
    }
}
