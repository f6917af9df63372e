// ============================================================
// Layer 4 — Attention Mask Constructors
// ============================================================
// Two independent boolean constructors, combined with Mask::and:
//
//   padding_mask(ids, pad) → [1, 1, n]   true where id != pad
//   causal_mask(n)         → [1, n, n]   true where row >= col
//
// Example, causal_mask(3):
//   1 0 0
//   1 1 0
//   1 1 1
//
// decoder mask = padding_mask(decoder_input) AND causal_mask(n)
// so entry [0, r, c] is true iff decoder_input[c] != pad and r >= c.
//
// The causal mask is rebuilt for every example rather than cached.

use crate::domain::example::Mask;

/// Lower-triangular mask of shape `[1, size, size]`.
pub fn causal_mask(size: usize) -> Mask {
    let values = (0..size)
        .flat_map(|row| (0..size).map(move |col| row >= col))
        .collect();
    Mask::new([1, size, size], values)
}

/// Padding mask of shape `[1, 1, ids.len()]`.
pub fn padding_mask(ids: &[u32], pad_id: u32) -> Mask {
    let values = ids.iter().map(|&id| id != pad_id).collect();
    Mask::new([1, 1, ids.len()], values)
}

/// Padding mask broadcast against the causal mask: `[1, n, n]`.
pub fn decoder_mask(decoder_input: &[u32], pad_id: u32) -> Mask {
    padding_mask(decoder_input, pad_id).and(&causal_mask(decoder_input.len()))
}
