// ============================================================
// Layer 3 — Framing Vocabulary
// ============================================================
// The fixed pieces every framed example is built from:
//
//   SpecialTokens   → ids of <sos>, <eos>, <unk>, <pad>
//   Delimiter       → the sentinel separating source and target
//   SequenceLengths → fixed encoder / decoder sequence lengths
//
// Framed layout (S = source, T = target):
//   encoder_input: <sos> S... <eos> <pad>...   (enc_max_seq_len)
//   decoder_input: <sos> T... <pad>...         (dec_max_seq_len)
//   labels:        T... <eos> <pad>...         (dec_max_seq_len)

use serde::{Deserialize, Serialize};

pub const SOS_TOKEN: &str = "<sos>";
pub const EOS_TOKEN: &str = "<eos>";
pub const UNK_TOKEN: &str = "<unk>";
pub const PAD_TOKEN: &str = "<pad>";

/// Registration order used when adding the specials to a tokenizer.
pub const SPECIAL_TOKENS: [&str; 4] = [SOS_TOKEN, EOS_TOKEN, UNK_TOKEN, PAD_TOKEN];

/// Literal text joining source and target in a raw record.
pub const DEFAULT_DELIMITER: &str = "###>";

/// Number of token ids skipped after a delimiter match.
pub const DELIMITER_SPAN: usize = 4;

/// Framing tokens added around the source in the encoder input.
pub const ENCODER_FRAMING: usize = 2;

/// Framing tokens added to the target in decoder input and labels.
pub const DECODER_FRAMING: usize = 1;

/// Resolved ids of the four special tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    pub sos: u32,
    pub eos: u32,
    pub unk: u32,
    pub pad: u32,
}

/// Delimiter sentinel: only the first id is matched, then `span` ids are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiter {
    pub first_id: u32,
    pub span: usize,
}

impl Delimiter {
    pub fn new(first_id: u32) -> Self {
        Self {
            first_id,
            span: DELIMITER_SPAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceLengths {
    pub enc_max_seq_len: usize,
    pub dec_max_seq_len: usize,
}

impl SequenceLengths {
    pub fn new(enc_max_seq_len: usize, dec_max_seq_len: usize) -> Self {
        Self {
            enc_max_seq_len,
            dec_max_seq_len,
        }
    }

    /// Longest source segment that still fits the encoder input.
    pub fn source_capacity(&self) -> usize {
        self.enc_max_seq_len.saturating_sub(ENCODER_FRAMING)
    }

    /// Longest target segment that still fits decoder input and labels.
    pub fn target_capacity(&self) -> usize {
        self.dec_max_seq_len.saturating_sub(DECODER_FRAMING)
    }
}
