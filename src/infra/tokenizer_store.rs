// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Resolves the configured tokenizer identifier and adapts it to
// the pipeline's TextTokenizer trait.
//
// Identifier resolution:
//   existing file  → Tokenizer::from_file
//   "word-level"   → <cache_dir>/tokenizer.json, built from the
//                    corpus on first use
//   anything else  → Tokenizer::from_pretrained (hub download)
//
// The word-level tokenizer is written as HuggingFace JSON and
// loaded back, so it goes through exactly the same code path as
// a downloaded one. Words are counted with the same pre-tokenizer
// that gets serialised into that JSON.
//
// Reference: HuggingFace tokenizers documentation

use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tokenizers::pre_tokenizers::{
    punctuation::Punctuation, sequence::Sequence, whitespace::WhitespaceSplit, PreTokenizerWrapper,
};
use tokenizers::{
    AddedToken, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer,
    SplitDelimiterBehavior, Tokenizer,
};

use crate::domain::error::{self, PipelineError};
use crate::domain::framing::{EOS_TOKEN, PAD_TOKEN, SOS_TOKEN, SPECIAL_TOKENS, UNK_TOKEN};
use crate::domain::record::RawRecord;
use crate::domain::traits::TextTokenizer;

/// Identifier that selects the locally built word-level tokenizer.
pub const WORD_LEVEL: &str = "word-level";

const TOKENIZER_FILE: &str = "tokenizer.json";

// ─── HfTokenizer ──────────────────────────────────────────────────────────────
/// A `tokenizers::Tokenizer` with the four framing specials registered.
///
/// Registration happens in `new` and nowhere else, so each wrapped
/// tokenizer gets its vocabulary extended exactly once.
pub struct HfTokenizer {
    inner: Tokenizer,
}

impl HfTokenizer {
    pub fn new(mut inner: Tokenizer) -> Self {
        let specials: Vec<AddedToken> = SPECIAL_TOKENS
            .iter()
            .map(|t| AddedToken::from(*t, true))
            .collect();
        let added = inner.add_special_tokens(&specials);
        tracing::info!(
            "Registered special tokens ({} new), vocab size {}",
            added,
            inner.get_vocab_size(true)
        );
        Self { inner }
    }

    /// Vocabulary size including added tokens.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }
}

impl TextTokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> error::Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| PipelineError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn tokenize_batch(&self, texts: &[&str]) -> error::Result<Vec<Vec<u32>>> {
        let encodings = self
            .inner
            .encode_batch(texts.to_vec(), false)
            .map_err(|e| PipelineError::Tokenizer(e.to_string()))?;
        Ok(encodings.iter().map(|e| e.get_ids().to_vec()).collect())
    }
}

// ─── TokenizerStore ───────────────────────────────────────────────────────────
pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Turn a tokenizer identifier into a loaded tokenizer.
    pub fn resolve(
        &self,
        identifier: &str,
        corpus:     &[RawRecord],
        vocab_size: usize,
    ) -> Result<Tokenizer> {
        if Path::new(identifier).is_file() {
            tracing::info!("Loading tokenizer from file '{}'", identifier);
            return Tokenizer::from_file(identifier)
                .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", identifier, e));
        }

        if identifier == WORD_LEVEL {
            let texts: Vec<&str> = corpus.iter().map(|r| r.text.as_str()).collect();
            return self.load_or_build(&texts, vocab_size);
        }

        tracing::info!("Fetching pretrained tokenizer '{}'", identifier);
        Tokenizer::from_pretrained(identifier, None)
            .map_err(|e| anyhow::anyhow!("Cannot fetch tokenizer '{}': {}", identifier, e))
    }

    /// Load the cached word-level tokenizer or build one from `texts`.
    pub fn load_or_build(&self, texts: &[&str], vocab_size: usize) -> Result<Tokenizer> {
        if self.path().exists() {
            tracing::info!("Loading existing tokenizer from disk");
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))
    }

    fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Count words, keep the most frequent, and write a WordLevel
    /// tokenizer JSON whose pre-tokenizer splits the same way.
    fn build_and_save(&self, texts: &[&str], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // ── Step 1: Word frequencies ──────────────────────────────────────────
        let splitter = word_splitter();
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in pre_tokenize(&splitter, text)? {
                *freq.entry(word).or_insert(0) += 1;
            }
        }

        // Descending frequency, then alphabetical so builds are reproducible
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(SPECIAL_TOKENS.len()));

        // ── Step 2: Vocab with fixed special ids ──────────────────────────────
        let mut vocab = serde_json::Map::new();
        for (id, token) in [PAD_TOKEN, SOS_TOKEN, EOS_TOKEN, UNK_TOKEN].iter().enumerate() {
            vocab.insert(token.to_string(), serde_json::json!(id));
        }
        let mut next_id = vocab.len();
        for (word, _) in &words {
            if !vocab.contains_key(word) {
                vocab.insert(word.clone(), serde_json::json!(next_id));
                next_id += 1;
            }
        }

        // ── Step 3: HuggingFace tokenizer JSON ────────────────────────────────
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": serde_json::to_value(&splitter)?,
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK_TOKEN
            }
        });

        let path = self.path();
        std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", path.display()))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            next_id,
            path.display()
        );

        self.load()
    }
}

/// Whitespace split, then every Unicode punctuation char on its own.
fn word_splitter() -> Sequence {
    Sequence::new(vec![
        PreTokenizerWrapper::from(WhitespaceSplit),
        PreTokenizerWrapper::from(Punctuation::new(SplitDelimiterBehavior::Isolated)),
    ])
}

fn pre_tokenize(splitter: &Sequence, text: &str) -> Result<Vec<String>> {
    let mut pretokenized = PreTokenizedString::from(text);
    splitter
        .pre_tokenize(&mut pretokenized)
        .map_err(|e| anyhow::anyhow!("Cannot pre-tokenize '{}': {}", text, e))?;
    Ok(pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(word, _, _)| word.to_string())
        .collect())
}
