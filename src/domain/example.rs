// ============================================================
// Layer 3 — Segment Pairs, Masks and Framed Examples
// ============================================================
// SegmentPair borrows from the cached token sequence so the
// split itself never allocates. FramedExample owns everything
// it holds: it is built fresh on every dataset access.
//
// Masks are stored flat in row-major order together with their
// 3-D shape, mirroring the tensors the model consumes:
//   encoder_mask: [1, 1, enc_max_seq_len]
//   decoder_mask: [1, dec_max_seq_len, dec_max_seq_len]
// `true` means "may be attended to".

use serde::{Deserialize, Serialize};

/// Source and target token slices of one record.
/// Either side may be empty; length checks happen at framing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPair<'a> {
    pub source: &'a [u32],
    pub target: &'a [u32],
}

/// A boolean tensor of rank 3, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    shape:  [usize; 3],
    values: Vec<bool>,
}

impl Mask {
    /// Build a mask from its shape and flat values.
    ///
    /// # Panics
    /// Panics if `values.len()` does not match the shape.
    pub fn new(shape: [usize; 3], values: Vec<bool>) -> Self {
        assert_eq!(
            shape.iter().product::<usize>(),
            values.len(),
            "mask shape {:?} does not match {} values",
            shape,
            values.len()
        );
        Self { shape, values }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Value at `[i, j, k]`, `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<bool> {
        let [d0, d1, d2] = self.shape;
        if i >= d0 || j >= d1 || k >= d2 {
            return None;
        }
        self.values.get((i * d1 + j) * d2 + k).copied()
    }

    /// Elementwise AND with broadcasting over size-1 dimensions.
    ///
    /// # Panics
    /// Panics if a dimension differs and neither side is 1.
    pub fn and(&self, other: &Mask) -> Mask {
        let mut shape = [0usize; 3];
        for d in 0..3 {
            let (a, b) = (self.shape[d], other.shape[d]);
            assert!(
                a == b || a == 1 || b == 1,
                "cannot broadcast mask shapes {:?} and {:?}",
                self.shape,
                other.shape
            );
            shape[d] = if a == 1 { b } else { a };
        }

        let mut values = Vec::with_capacity(shape.iter().product());
        for i in 0..shape[0] {
            for j in 0..shape[1] {
                for k in 0..shape[2] {
                    values.push(self.broadcast_get(i, j, k) && other.broadcast_get(i, j, k));
                }
            }
        }
        Mask { shape, values }
    }

    fn broadcast_get(&self, i: usize, j: usize, k: usize) -> bool {
        let [d0, d1, d2] = self.shape;
        let (i, j, k) = (i % d0, j % d1, k % d2);
        self.values[(i * d1 + j) * d2 + k]
    }
}

/// One training example: fixed-length ids and attention masks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramedExample {
    /// `<sos> source <eos> <pad>...`, length enc_max_seq_len
    pub encoder_input: Vec<u32>,
    /// `<sos> target <pad>...`, length dec_max_seq_len
    pub decoder_input: Vec<u32>,
    /// `target <eos> <pad>...`, length dec_max_seq_len
    pub labels:        Vec<u32>,
    /// Shape [1, 1, enc_max_seq_len]
    pub encoder_mask:  Mask,
    /// Shape [1, dec_max_seq_len, dec_max_seq_len]
    pub decoder_mask:  Mask,
}
