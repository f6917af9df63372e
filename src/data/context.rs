// ============================================================
// Layer 4 — Pipeline Context
// ============================================================
// Everything the pipeline needs from the outside world, built
// once and passed in explicitly:
//
//   tokenizer  → text → ids capability (specials already registered)
//   special    → ids of <sos>, <eos>, <unk>, <pad>
//   delimiter  → first id of the "###>" delimiter + skip span
//   lengths    → enc_max_seq_len / dec_max_seq_len
//
// Special ids are resolved by tokenising each special string
// and requiring exactly one id back. The tokenizer must never
// add wrapper tokens here, so that id is the "interior" one.

use std::sync::Arc;

use crate::domain::error::{PipelineError, Result};
use crate::domain::framing::{
    Delimiter, SequenceLengths, SpecialTokens, EOS_TOKEN, PAD_TOKEN, SOS_TOKEN, UNK_TOKEN,
};
use crate::domain::record::RawRecord;
use crate::domain::traits::TextTokenizer;

#[derive(Clone)]
pub struct PipelineContext {
    tokenizer: Arc<dyn TextTokenizer>,
    special:   SpecialTokens,
    delimiter: Delimiter,
    lengths:   SequenceLengths,
}

impl PipelineContext {
    /// Resolve special ids and the delimiter sentinel through `tokenizer`.
    ///
    /// Fails if a special token does not map to a single id or the
    /// delimiter text tokenizes to nothing.
    pub fn new(
        tokenizer:      Arc<dyn TextTokenizer>,
        lengths:        SequenceLengths,
        delimiter_text: &str,
        delimiter_span: usize,
    ) -> Result<Self> {
        let special = SpecialTokens {
            sos: single_id(tokenizer.as_ref(), SOS_TOKEN)?,
            eos: single_id(tokenizer.as_ref(), EOS_TOKEN)?,
            unk: single_id(tokenizer.as_ref(), UNK_TOKEN)?,
            pad: single_id(tokenizer.as_ref(), PAD_TOKEN)?,
        };

        let delimiter_ids = tokenizer.tokenize(delimiter_text)?;
        let first_id = *delimiter_ids.first().ok_or_else(|| {
            PipelineError::Tokenizer(format!("delimiter '{delimiter_text}' tokenized to nothing"))
        })?;
        if delimiter_ids.len() != delimiter_span {
            tracing::warn!(
                "Delimiter '{}' tokenizes to {} ids but {} are skipped after a match",
                delimiter_text,
                delimiter_ids.len(),
                delimiter_span
            );
        }

        tracing::debug!("Resolved special tokens: {:?}", special);

        let ctx = Self {
            tokenizer,
            special,
            delimiter: Delimiter { first_id, span: delimiter_span },
            lengths,
        };
        if ctx.delimiter_is_unknown() {
            tracing::warn!(
                "Delimiter '{}' starts with <unk> (id {}); every unknown token will be taken as a split point",
                delimiter_text,
                first_id
            );
        }
        Ok(ctx)
    }

    /// True when the delimiter's first id is the `<unk>` id, e.g. when
    /// its characters were cut from a small vocabulary.
    pub fn delimiter_is_unknown(&self) -> bool {
        self.delimiter.first_id == self.special.unk
    }

    pub fn special(&self) -> &SpecialTokens {
        &self.special
    }

    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    pub fn lengths(&self) -> &SequenceLengths {
        &self.lengths
    }

    /// Tokenize every record in one batch, truncating each
    /// sequence to `dec_max_seq_len`.
    pub fn tokenize_records(&self, records: &[RawRecord]) -> Result<Vec<Vec<u32>>> {
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let mut sequences = self.tokenizer.tokenize_batch(&texts)?;

        let max_len = self.lengths.dec_max_seq_len;
        let mut truncated = 0usize;
        for seq in &mut sequences {
            if seq.len() > max_len {
                seq.truncate(max_len);
                truncated += 1;
            }
        }
        if truncated > 0 {
            tracing::debug!("Truncated {} of {} sequences to {} tokens", truncated, sequences.len(), max_len);
        }

        Ok(sequences)
    }
}

fn single_id(tokenizer: &dyn TextTokenizer, token: &str) -> Result<u32> {
    match tokenizer.tokenize(token)?.as_slice() {
        [id] => Ok(*id),
        ids => Err(PipelineError::SpecialToken {
            token: token.to_string(),
            ids:   ids.to_vec(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Whitespace tokenizer with a fixed vocabulary; `#` and `>`
    /// are split off per character so "###>" yields four ids.
    pub(crate) struct MapTokenizer {
        vocab: HashMap<String, u32>,
    }

    impl MapTokenizer {
        pub(crate) fn new(words: &[&str]) -> Self {
            let mut vocab: HashMap<String, u32> = [PAD_TOKEN, SOS_TOKEN, EOS_TOKEN, UNK_TOKEN]
                .iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), i as u32))
                .collect();
            for w in ["#", ">"].iter().chain(words) {
                let next = vocab.len() as u32;
                vocab.entry(w.to_string()).or_insert(next);
            }
            Self { vocab }
        }

        pub(crate) fn id(&self, word: &str) -> u32 {
            self.vocab[word]
        }
    }

    impl TextTokenizer for MapTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
            let mut ids = Vec::new();
            for word in text.split_whitespace() {
                if let Some(&id) = self.vocab.get(word) {
                    ids.push(id);
                } else if word.chars().all(|c| c == '#' || c == '>') {
                    ids.extend(word.chars().map(|c| self.vocab[&c.to_string()]));
                } else {
                    ids.push(self.vocab[UNK_TOKEN]);
                }
            }
            Ok(ids)
        }
    }

    pub(crate) fn context(tok: MapTokenizer, enc: usize, dec: usize) -> PipelineContext {
        PipelineContext::new(Arc::new(tok), SequenceLengths::new(enc, dec), "###>", 4).unwrap()
    }

    #[test]
    fn test_resolves_special_ids() {
        let ctx = context(MapTokenizer::new(&[]), 8, 6);
        assert_eq!(
            *ctx.special(),
            SpecialTokens { sos: 1, eos: 2, unk: 3, pad: 0 }
        );
    }

    #[test]
    fn test_delimiter_first_id_is_hash() {
        let tok  = MapTokenizer::new(&[]);
        let hash = tok.id("#");
        let ctx  = context(tok, 8, 6);
        assert_eq!(ctx.delimiter().first_id, hash);
        assert_eq!(ctx.delimiter().span, 4);
    }

    #[test]
    fn test_unknown_delimiter_is_flagged() {
        let ok = context(MapTokenizer::new(&[]), 8, 6);
        assert!(!ok.delimiter_is_unknown());

        let ctx = PipelineContext::new(
            Arc::new(MapTokenizer::new(&["a"])),
            SequenceLengths::new(8, 6),
            "@@@",
            1,
        )
        .unwrap();
        assert!(ctx.delimiter_is_unknown());
        assert_eq!(ctx.delimiter().first_id, ctx.special().unk);
    }

    #[test]
    fn test_multi_id_special_token_is_rejected() {
        struct Splitting;
        impl TextTokenizer for Splitting {
            fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
                Ok(text.bytes().map(u32::from).collect())
            }
        }
        let err = PipelineContext::new(Arc::new(Splitting), SequenceLengths::new(8, 6), "###>", 4)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::SpecialToken { ref token, .. } if token == SOS_TOKEN));
    }

    #[test]
    fn test_tokenize_records_truncates_to_decoder_length() {
        let ctx = context(MapTokenizer::new(&["a", "b", "c"]), 8, 3);
        let seqs = ctx
            .tokenize_records(&[RawRecord::new("a b c a b"), RawRecord::new("a")])
            .unwrap();
        assert_eq!(seqs[0].len(), 3);
        assert_eq!(seqs[1].len(), 1);
    }
}
