// ============================================================
// Layer 4 — Framed Example Batcher
// ============================================================
// Implements Burn's Batcher trait to stack FramedExamples into
// device tensors.
//
//   Input:  Vec of N FramedExamples
//   Output: FramedBatch with
//             encoder_input  [N, enc]         Int
//             decoder_input  [N, dec]         Int
//             labels         [N, dec]         Int
//             encoder_mask   [N, 1, 1, enc]   Bool
//             decoder_mask   [N, 1, dec, dec] Bool
//
// Every example already has the fixed lengths, so stacking is
// just flatten + reshape. Masks keep the pipeline's convention:
// true = may attend.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::domain::example::FramedExample;

#[derive(Debug, Clone)]
pub struct FramedBatch<B: Backend> {
    pub encoder_input: Tensor<B, 2, Int>,
    pub decoder_input: Tensor<B, 2, Int>,
    pub labels:        Tensor<B, 2, Int>,
    pub encoder_mask:  Tensor<B, 4, Bool>,
    pub decoder_mask:  Tensor<B, 4, Bool>,
}

#[derive(Clone, Debug)]
pub struct FramedBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FramedBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn ids(&self, rows: Vec<&[u32]>, len: usize) -> Tensor<B, 2, Int> {
        let batch_size = rows.len();
        // Burn Int tensors are built from i32
        let flat: Vec<i32> = rows
            .into_iter()
            .flat_map(|r| r.iter().map(|&x| x as i32))
            .collect();
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device).reshape([batch_size, len])
    }

    fn mask(&self, rows: Vec<&[bool]>, shape: [usize; 4]) -> Tensor<B, 4, Bool> {
        let flat: Vec<bool> = rows.into_iter().flatten().copied().collect();
        Tensor::<B, 4, Bool>::from_data(TensorData::new(flat, shape), &self.device)
    }
}

impl<B: Backend> Batcher<FramedExample, FramedBatch<B>> for FramedBatcher<B> {
    fn batch(&self, items: Vec<FramedExample>) -> FramedBatch<B> {
        let batch_size = items.len();
        let enc_len    = items.first().map_or(0, |e| e.encoder_input.len());
        let dec_len    = items.first().map_or(0, |e| e.decoder_input.len());

        let encoder_input = self.ids(items.iter().map(|e| e.encoder_input.as_slice()).collect(), enc_len);
        let decoder_input = self.ids(items.iter().map(|e| e.decoder_input.as_slice()).collect(), dec_len);
        let labels        = self.ids(items.iter().map(|e| e.labels.as_slice()).collect(), dec_len);

        let encoder_mask = self.mask(
            items.iter().map(|e| e.encoder_mask.values()).collect(),
            [batch_size, 1, 1, enc_len],
        );
        let decoder_mask = self.mask(
            items.iter().map(|e| e.decoder_mask.values()).collect(),
            [batch_size, 1, dec_len, dec_len],
        );

        FramedBatch {
            encoder_input,
            decoder_input,
            labels,
            encoder_mask,
            decoder_mask,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::data::framer::frame;
    use crate::domain::example::SegmentPair;
    use crate::domain::framing::{SequenceLengths, SpecialTokens};

    type TestBackend = NdArray;

    fn examples() -> Vec<FramedExample> {
        let special = SpecialTokens { sos: 1, eos: 2, unk: 3, pad: 0 };
        let lengths = SequenceLengths::new(8, 6);
        [(&[7u32, 8, 9][..], &[3u32, 4][..]), (&[5][..], &[6, 7, 8][..])]
            .iter()
            .map(|&(source, target)| frame(&SegmentPair { source, target }, &special, &lengths).unwrap())
            .collect()
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = FramedBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(examples());

        assert_eq!(batch.encoder_input.dims(), [2, 8]);
        assert_eq!(batch.decoder_input.dims(), [2, 6]);
        assert_eq!(batch.labels.dims(),        [2, 6]);
        assert_eq!(batch.encoder_mask.dims(),  [2, 1, 1, 8]);
        assert_eq!(batch.decoder_mask.dims(),  [2, 1, 6, 6]);
    }

    #[test]
    fn test_batch_preserves_values() {
        let items   = examples();
        let batcher = FramedBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(items.clone());

        let ids: Vec<i64> = batch
            .encoder_input
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(&ids[..8], &[1, 7, 8, 9, 2, 0, 0, 0]);
        assert_eq!(&ids[8..], &[1, 5, 2, 0, 0, 0, 0, 0]);

        let mask: Vec<bool> = batch.decoder_mask.into_data().to_vec().unwrap();
        let expected: Vec<bool> = items
            .iter()
            .flat_map(|e| e.decoder_mask.values().to_vec())
            .collect();
        assert_eq!(mask, expected);
    }
}
