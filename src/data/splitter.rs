// ============================================================
// Layer 4 — Segment Splitter
// ============================================================
// Splits one cached token sequence into (source, target).
//
// Two steps, kept separate so each is testable on its own:
//
//   find_delimiter  → position of the first id equal to the
//                     delimiter's FIRST id, if any
//   split           → applies one of two rules:
//
//     match at i:  source = seq[..i]
//                  target = seq[i + span..]   (span = 4)
//     no match:    source = seq[..len / 2]
//                  target = seq[len / 2..]
//
// Only the first delimiter id is compared. If that id also
// occurs inside the source sentence the record is mis-split;
// the half/half fallback is equally blind. Both are accepted
// approximations and never raise an error.
//
// Reference: Rust Book §8 (Slices)

use crate::domain::example::SegmentPair;
use crate::domain::framing::Delimiter;

/// Position of the first token equal to `delimiter_id`.
pub fn find_delimiter(sequence: &[u32], delimiter_id: u32) -> Option<usize> {
    sequence.iter().position(|&id| id == delimiter_id)
}

/// Split `sequence` around `position`, or in half when there is none.
///
/// A match too close to the end yields an empty target.
pub fn split(sequence: &[u32], position: Option<usize>, span: usize) -> SegmentPair<'_> {
    match position {
        Some(i) => SegmentPair {
            source: &sequence[..i.min(sequence.len())],
            target: sequence.get(i.saturating_add(span)..).unwrap_or(&[]),
        },
        None => {
            let (source, target) = sequence.split_at(sequence.len() / 2);
            SegmentPair { source, target }
        }
    }
}

/// Locate the delimiter and split in one go.
pub fn split_segments<'a>(sequence: &'a [u32], delimiter: &Delimiter) -> SegmentPair<'a> {
    let position = find_delimiter(sequence, delimiter.first_id);
    if position.is_none() {
        tracing::debug!(
            "No delimiter in sequence of {} tokens, splitting in half",
            sequence.len()
        );
    }
    split(sequence, position, delimiter.span)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const D0: u32 = 90;
    const D1: u32 = 91;
    const D2: u32 = 92;
    const D3: u32 = 93;

    #[test]
    fn test_split_around_delimiter() {
        let seq  = [7, 8, 9, D0, D1, D2, D3, 3, 4];
        let pair = split_segments(&seq, &Delimiter::new(D0));
        assert_eq!(pair.source, &[7, 8, 9]);
        assert_eq!(pair.target, &[3, 4]);
    }

    #[test]
    fn test_fallback_splits_in_half() {
        let seq  = [1, 2, 3, 4];
        let pair = split_segments(&seq, &Delimiter::new(D0));
        assert_eq!(pair.source, &[1, 2]);
        assert_eq!(pair.target, &[3, 4]);
    }

    #[test]
    fn test_fallback_odd_length_rounds_source_down() {
        let seq  = [1, 2, 3, 4, 5];
        let pair = split(&seq, None, 4);
        assert_eq!(pair.source, &[1, 2]);
        assert_eq!(pair.target, &[3, 4, 5]);
    }

    #[test]
    fn test_only_first_match_counts() {
        // The sentinel id is compared on its own, so the first
        // occurrence wins even if it is not a real delimiter.
        let seq = [5, D0, 6, 7, 8, 9, D0, D1, D2, D3, 1];
        assert_eq!(find_delimiter(&seq, D0), Some(1));
        let pair = split_segments(&seq, &Delimiter::new(D0));
        assert_eq!(pair.source, &[5]);
        assert_eq!(pair.target, &[9, D0, D1, D2, D3, 1]);
    }

    #[test]
    fn test_delimiter_at_end_gives_empty_target() {
        let seq  = [1, 2, D0, D1];
        let pair = split_segments(&seq, &Delimiter::new(D0));
        assert_eq!(pair.source, &[1, 2]);
        assert!(pair.target.is_empty());
    }

    #[test]
    fn test_delimiter_at_start_gives_empty_source() {
        let seq  = [D0, D1, D2, D3, 4];
        let pair = split_segments(&seq, &Delimiter::new(D0));
        assert!(pair.source.is_empty());
        assert_eq!(pair.target, &[4]);
    }

    #[test]
    fn test_empty_sequence() {
        let pair = split_segments(&[], &Delimiter::new(D0));
        assert!(pair.source.is_empty());
        assert!(pair.target.is_empty());
    }
}
