// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model-side Burn code lives here.
//
//   model.rs  — Seq2SeqModel contract (encode / decode /
//               project / forward_loss) and a thin
//               encoder-decoder transformer built from
//               burn's TransformerEncoder / TransformerDecoder
//
//   runner.rs — Dry run: batches through forward_loss with
//               per-batch shape logging
//
// Reference: Burn Book §3 (Building Blocks)
//            Vaswani et al. (2017) Attention Is All You Need

/// Encoder-decoder model contract and transformer
pub mod model;

/// Forward-only pass over the dataset
pub mod runner;
