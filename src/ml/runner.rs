// ============================================================
// Layer 5 — Dry Run
// ============================================================
// Pushes a few batches through the model's forward_loss to
// prove the data pipeline and the model agree on shapes:
//
//   BilingualDataset → DataLoader(FramedBatcher) → forward_loss
//
// Tensor shapes are logged for every batch. No gradients, no
// optimiser step and no checkpoints: the backend used here is
// not autodiff.
//
// Reference: Burn Book §4 (DataLoader)

use anyhow::{ensure, Result};
use burn::{data::dataloader::DataLoaderBuilder, prelude::*};

use crate::data::{batcher::FramedBatcher, dataset::BilingualDataset};
use crate::ml::model::Seq2SeqModel;

#[derive(Debug, Clone, PartialEq)]
pub struct DryRunReport {
    pub batches:   usize,
    pub examples:  usize,
    pub mean_loss: f64,
}

pub fn dry_run<B, M>(
    model:       &M,
    dataset:     BilingualDataset,
    batch_size:  usize,
    max_batches: usize,
    device:      B::Device,
) -> Result<DryRunReport>
where
    B: Backend,
    M: Seq2SeqModel<B>,
{
    ensure!(batch_size > 0, "batch_size must be positive");

    let pad_id = dataset.context().special().pad;
    let loader = DataLoaderBuilder::new(FramedBatcher::<B>::new(device))
        .batch_size(batch_size)
        .num_workers(1)
        .build(dataset);

    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut examples = 0usize;

    for batch in loader.iter().take(max_batches) {
        tracing::info!(
            "batch {}: encoder_input {:?} | decoder_input {:?} | labels {:?} | encoder_mask {:?} | decoder_mask {:?}",
            batches + 1,
            batch.encoder_input.dims(),
            batch.decoder_input.dims(),
            batch.labels.dims(),
            batch.encoder_mask.dims(),
            batch.decoder_mask.dims(),
        );

        examples += batch.encoder_input.dims()[0];
        let loss: f64 = model.forward_loss(batch, pad_id).into_scalar().elem::<f64>();
        tracing::debug!("batch {} loss={:.4}", batches + 1, loss);

        loss_sum += loss;
        batches  += 1;
    }

    let mean_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    Ok(DryRunReport { batches, examples, mean_loss })
}
