// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a dataset name to GPU-ready tensor batches.
//
//   dataset name
//       │
//       ▼
//   JsonlDatasetSource → reads raw records ("src ###> tgt")
//       │
//       ▼
//   PipelineContext    → tokenizes, truncates to dec_max_seq_len
//       │
//       ▼
//   BilingualDataset   → caches token sequences, implements
//       │                Burn's Dataset trait; per index:
//       │                  splitter → framer → masks
//       ▼
//   FramedBatcher      → stacks examples into tensor batches
//       │
//       ▼
//   DataLoader         → feeds batches to the model
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Stacks framed examples into tensor batches
pub mod batcher;

/// Injected tokenizer, special ids, delimiter and lengths
pub mod context;

/// Indexed dataset facade implementing Burn's Dataset trait
pub mod dataset;

/// Wraps segments in special tokens and pads them
pub mod framer;

/// Loads JSON Lines datasets from disk
pub mod loader;

/// Padding and causal attention masks
pub mod mask;

/// Splits a token sequence into source and target
pub mod splitter;
