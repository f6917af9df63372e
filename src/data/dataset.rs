use burn::data::dataset::Dataset;

use crate::data::context::PipelineContext;
use crate::data::{framer, splitter};
use crate::domain::error::{PipelineError, Result};
use crate::domain::example::{FramedExample, SegmentPair};
use crate::domain::record::RawRecord;
use crate::domain::traits::DatasetSource;

/// Indexed collection of bilingual training examples.
///
/// Records and their token sequences are computed once at load time
/// and never change; every access frames a fresh example from them.
pub struct BilingualDataset {
    records:   Vec<RawRecord>,
    sequences: Vec<Vec<u32>>,
    ctx:       PipelineContext,
}

impl BilingualDataset {
    /// Load `name` from `source` and tokenize every record.
    pub fn load(source: &dyn DatasetSource, name: &str, ctx: PipelineContext) -> Result<Self> {
        let records = source.load(name)?;
        Self::from_records(records, ctx)
    }

    pub fn from_records(records: Vec<RawRecord>, ctx: PipelineContext) -> Result<Self> {
        let sequences = ctx.tokenize_records(&records)?;
        tracing::info!("Tokenized {} records", sequences.len());
        Ok(Self { records, sequences, ctx })
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Raw text of record `index`.
    pub fn record(&self, index: usize) -> Option<&RawRecord> {
        self.records.get(index)
    }

    /// Cached token sequence of record `index`.
    pub fn sequence(&self, index: usize) -> Option<&[u32]> {
        self.sequences.get(index).map(Vec::as_slice)
    }

    /// Source/target split of record `index`.
    pub fn segments(&self, index: usize) -> Result<SegmentPair<'_>> {
        let sequence = self.sequence(index).ok_or(PipelineError::IndexOutOfRange {
            index,
            len: self.sequences.len(),
        })?;
        Ok(splitter::split_segments(sequence, self.ctx.delimiter()))
    }

    /// Frame record `index`. Fails on out-of-range indices and
    /// segments that do not fit the configured lengths.
    pub fn try_get(&self, index: usize) -> Result<FramedExample> {
        let pair = self.segments(index)?;
        framer::frame(&pair, self.ctx.special(), self.ctx.lengths())
    }

    /// Every index whose example cannot be framed, with the reason.
    pub fn oversized(&self) -> Vec<(usize, PipelineError)> {
        (0..self.sequences.len())
            .filter_map(|i| self.try_get(i).err().map(|e| (i, e)))
            .collect()
    }
}

// The burn trait cannot carry an error, so failures are logged and
// surface as a missing item. Use `try_get` to see the error itself.
impl Dataset<FramedExample> for BilingualDataset {
    fn get(&self, index: usize) -> Option<FramedExample> {
        self.try_get(index)
            .map_err(|e| tracing::error!("Cannot frame example {}: {}", index, e))
            .ok()
    }

    fn len(&self) -> usize {
        self.sequences.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::context::tests::{context, MapTokenizer};

    struct InMemory(Vec<&'static str>);

    impl DatasetSource for InMemory {
        fn load(&self, name: &str) -> Result<Vec<RawRecord>> {
            if name != "mem" {
                return Err(PipelineError::DatasetNotFound {
                    name:     name.to_string(),
                    searched: "memory".to_string(),
                });
            }
            Ok(self.0.iter().map(|t| RawRecord::new(*t)).collect())
        }
    }

    fn dataset(texts: Vec<&'static str>, enc: usize, dec: usize) -> (BilingualDataset, MapTokenizer) {
        let words = ["the", "cat", "sleeps", "le", "chat", "dort", "one", "two", "three", "four"];
        let ids   = MapTokenizer::new(&words);
        let ctx   = context(MapTokenizer::new(&words), enc, dec);
        (BilingualDataset::load(&InMemory(texts), "mem", ctx).unwrap(), ids)
    }

    #[test]
    fn test_frames_delimited_record() {
        // 9 ids before the split: the cat sleeps # # # > le chat
        let (ds, tok) = dataset(vec!["the cat sleeps ###> le chat"], 8, 10);
        assert_eq!(ds.len(), 1);

        let ex = ds.try_get(0).unwrap();
        let (the, cat, sleeps) = (tok.id("the"), tok.id("cat"), tok.id("sleeps"));
        let (le, chat) = (tok.id("le"), tok.id("chat"));
        assert_eq!(ex.encoder_input, vec![1, the, cat, sleeps, 2, 0, 0, 0]);
        assert_eq!(ex.decoder_input, vec![1, le, chat, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ex.labels,        vec![le, chat, 2, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_truncation_happens_before_split() {
        // Cut to 6 ids ("the cat sleeps # # #"), so the target is lost
        let (ds, tok) = dataset(vec!["the cat sleeps ###> le chat"], 8, 6);
        assert_eq!(ds.sequence(0).unwrap().len(), 6);

        let pair = ds.segments(0).unwrap();
        assert_eq!(pair.source, &[tok.id("the"), tok.id("cat"), tok.id("sleeps")]);
        assert!(pair.target.is_empty());

        let ex = ds.try_get(0).unwrap();
        assert_eq!(ex.decoder_input, vec![1, 0, 0, 0, 0, 0]);
        assert_eq!(ex.labels,        vec![2, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_get_is_idempotent() {
        let (ds, _) = dataset(vec!["the cat ###> le chat dort"], 8, 12);
        assert_eq!(ds.try_get(0).unwrap(), ds.try_get(0).unwrap());
        assert_eq!(Dataset::get(&ds, 0), Dataset::get(&ds, 0));
    }

    #[test]
    fn test_undelimited_record_splits_in_half() {
        let (ds, tok) = dataset(vec!["one two three four"], 8, 6);
        let pair = ds.segments(0).unwrap();
        assert_eq!(pair.source, &[tok.id("one"), tok.id("two")]);
        assert_eq!(pair.target, &[tok.id("three"), tok.id("four")]);
    }

    #[test]
    fn test_out_of_range_index() {
        let (ds, _) = dataset(vec!["the ###> le"], 8, 6);
        assert!(matches!(
            ds.try_get(3),
            Err(PipelineError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(Dataset::get(&ds, 3).is_none());
    }

    #[test]
    fn test_too_long_source_is_reported() {
        let (ds, _) = dataset(
            vec!["the cat ###> le", "one two three four the cat ###> le"],
            5,
            12,
        );
        assert!(ds.try_get(0).is_ok());
        assert!(Dataset::get(&ds, 1).is_none());

        let bad = ds.oversized();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].0, 1);
        assert!(matches!(bad[0].1, PipelineError::SequenceTooLong { .. }));
    }

    #[test]
    fn test_unknown_dataset_name() {
        let words = ["the"];
        let ctx   = context(MapTokenizer::new(&words), 8, 6);
        let err   = BilingualDataset::load(&InMemory(vec![]), "other", ctx).err().unwrap();
        assert!(matches!(err, PipelineError::DatasetNotFound { .. }));
    }
}
