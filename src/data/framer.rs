// ============================================================
// Layer 4 — Example Framer
// ============================================================
// Wraps a SegmentPair in special tokens and pads it to the
// configured fixed lengths:
//
//   encoder_input = <sos> source <eos> <pad> * (enc - |source| - 2)
//   decoder_input = <sos> target       <pad> * (dec - |target| - 1)
//   labels        =       target <eos> <pad> * (dec - |target| - 1)
//
// A negative pad count is a hard error (SequenceTooLong).
// Nothing is ever truncated here: over-long records have to be
// filtered or re-tokenised upstream.

use crate::data::mask::{decoder_mask, padding_mask};
use crate::domain::error::{PipelineError, Result, Segment};
use crate::domain::example::{FramedExample, SegmentPair};
use crate::domain::framing::{
    SequenceLengths, SpecialTokens, DECODER_FRAMING, ENCODER_FRAMING,
};

/// Build the framed example for one segment pair.
pub fn frame(
    pair:    &SegmentPair<'_>,
    special: &SpecialTokens,
    lengths: &SequenceLengths,
) -> Result<FramedExample> {
    let enc_pad = pad_count(pair.source.len(), ENCODER_FRAMING, lengths.enc_max_seq_len)
        .ok_or(PipelineError::SequenceTooLong {
            segment:  Segment::Source,
            expected: lengths.enc_max_seq_len,
            actual:   pair.source.len(),
            framing:  ENCODER_FRAMING,
        })?;
    let dec_pad = pad_count(pair.target.len(), DECODER_FRAMING, lengths.dec_max_seq_len)
        .ok_or(PipelineError::SequenceTooLong {
            segment:  Segment::Target,
            expected: lengths.dec_max_seq_len,
            actual:   pair.target.len(),
            framing:  DECODER_FRAMING,
        })?;

    let mut encoder_input = Vec::with_capacity(lengths.enc_max_seq_len);
    encoder_input.push(special.sos);
    encoder_input.extend_from_slice(pair.source);
    encoder_input.push(special.eos);
    encoder_input.extend(std::iter::repeat(special.pad).take(enc_pad));

    let mut decoder_input = Vec::with_capacity(lengths.dec_max_seq_len);
    decoder_input.push(special.sos);
    decoder_input.extend_from_slice(pair.target);
    decoder_input.extend(std::iter::repeat(special.pad).take(dec_pad));

    let mut labels = Vec::with_capacity(lengths.dec_max_seq_len);
    labels.extend_from_slice(pair.target);
    labels.push(special.eos);
    labels.extend(std::iter::repeat(special.pad).take(dec_pad));

    let encoder_mask = padding_mask(&encoder_input, special.pad);
    let decoder_mask = decoder_mask(&decoder_input, special.pad);

    Ok(FramedExample {
        encoder_input,
        decoder_input,
        labels,
        encoder_mask,
        decoder_mask,
    })
}

/// `max_len - len - framing`, or `None` if that would be negative.
fn pad_count(len: usize, framing: usize, max_len: usize) -> Option<usize> {
    max_len.checked_sub(len)?.checked_sub(framing)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SPECIAL: SpecialTokens = SpecialTokens { sos: 1, eos: 2, unk: 3, pad: 0 };

    fn pair<'a>(source: &'a [u32], target: &'a [u32]) -> SegmentPair<'a> {
        SegmentPair { source, target }
    }

    #[test]
    fn test_end_to_end_layout() {
        let lengths = SequenceLengths::new(8, 6);
        let ex = frame(&pair(&[7, 8, 9], &[3, 4]), &SPECIAL, &lengths).unwrap();

        assert_eq!(ex.encoder_input, vec![1, 7, 8, 9, 2, 0, 0, 0]);
        assert_eq!(ex.decoder_input, vec![1, 3, 4, 0, 0, 0]);
        assert_eq!(ex.labels,        vec![3, 4, 2, 0, 0, 0]);

        assert_eq!(ex.encoder_mask.shape(), [1, 1, 8]);
        assert_eq!(
            ex.encoder_mask.values(),
            &[true, true, true, true, true, false, false, false]
        );
        assert_eq!(ex.decoder_mask.shape(), [1, 6, 6]);
        assert_eq!(ex.decoder_mask.get(0, 5, 2), Some(true));
        assert_eq!(ex.decoder_mask.get(0, 5, 3), Some(false));
        assert_eq!(ex.decoder_mask.get(0, 1, 2), Some(false));
    }

    #[test]
    fn test_exact_capacity_has_no_padding() {
        let lengths = SequenceLengths::new(5, 4);
        let ex = frame(&pair(&[7, 8, 9], &[3, 4, 5]), &SPECIAL, &lengths).unwrap();
        assert_eq!(ex.encoder_input, vec![1, 7, 8, 9, 2]);
        assert_eq!(ex.decoder_input, vec![1, 3, 4, 5]);
        assert_eq!(ex.labels,        vec![3, 4, 5, 2]);
        assert!(ex.encoder_mask.values().iter().all(|&v| v));
    }

    #[test]
    fn test_source_one_over_capacity_fails() {
        let lengths = SequenceLengths::new(4, 6);
        let err = frame(&pair(&[7, 8, 9], &[3]), &SPECIAL, &lengths).unwrap_err();
        match err {
            PipelineError::SequenceTooLong { segment, expected, actual, framing } => {
                assert_eq!(segment, Segment::Source);
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
                assert_eq!(framing, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_target_over_capacity_fails() {
        let lengths = SequenceLengths::new(8, 2);
        let err = frame(&pair(&[7], &[3, 4]), &SPECIAL, &lengths).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SequenceTooLong {
                segment:  Segment::Target,
                expected: 2,
                actual:   2,
                framing:  1,
            }
        ));
    }

    #[test]
    fn test_empty_segments_frame_to_specials_only() {
        let lengths = SequenceLengths::new(4, 3);
        let ex = frame(&pair(&[], &[]), &SPECIAL, &lengths).unwrap();
        assert_eq!(ex.encoder_input, vec![1, 2, 0, 0]);
        assert_eq!(ex.decoder_input, vec![1, 0, 0]);
        assert_eq!(ex.labels,        vec![2, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_fixed_lengths_and_masks(
            source in proptest::collection::vec(4u32..100, 0..10),
            target in proptest::collection::vec(4u32..100, 0..10),
            enc_extra in 0usize..6,
            dec_extra in 0usize..6,
        ) {
            let lengths = SequenceLengths::new(
                source.len() + 2 + enc_extra,
                target.len() + 1 + dec_extra,
            );
            let ex = frame(&pair(&source, &target), &SPECIAL, &lengths).unwrap();

            prop_assert_eq!(ex.encoder_input.len(), lengths.enc_max_seq_len);
            prop_assert_eq!(ex.decoder_input.len(), lengths.dec_max_seq_len);
            prop_assert_eq!(ex.labels.len(),        lengths.dec_max_seq_len);

            for (i, &id) in ex.encoder_input.iter().enumerate() {
                prop_assert_eq!(ex.encoder_mask.get(0, 0, i), Some(id != SPECIAL.pad));
            }
            let n = lengths.dec_max_seq_len;
            for r in 0..n {
                for c in 0..n {
                    let expected = ex.decoder_input[c] != SPECIAL.pad && r >= c;
                    prop_assert_eq!(ex.decoder_mask.get(0, r, c), Some(expected));
                }
            }
        }

        #[test]
        fn prop_over_capacity_always_fails(
            source in proptest::collection::vec(4u32..100, 1..10),
            short_by in 1usize..3,
        ) {
            let enc = (source.len() + 2).saturating_sub(short_by);
            let lengths = SequenceLengths::new(enc, 4);
            let is_too_long = matches!(
                frame(&pair(&source, &[]), &SPECIAL, &lengths),
                Err(PipelineError::SequenceTooLong { segment: Segment::Source, .. })
            );
            prop_assert!(is_too_long);
        }
    }
}
