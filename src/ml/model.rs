use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        transformer::{
            TransformerDecoder, TransformerDecoderConfig, TransformerDecoderInput,
            TransformerEncoder, TransformerEncoderConfig, TransformerEncoderInput,
        },
        Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::log_softmax,
};

use crate::data::batcher::FramedBatch;

/// What the training side needs from an encoder-decoder model.
///
/// Masks use the pipeline convention: `true` = may attend.
pub trait Seq2SeqModel<B: Backend> {
    /// `[batch, enc]` ids, `[batch, 1, 1, enc]` mask → `[batch, enc, d_model]`
    fn encode(&self, encoder_input: Tensor<B, 2, Int>, encoder_mask: Tensor<B, 4, Bool>) -> Tensor<B, 3>;

    /// `[batch, dec]` ids attending to the encoder output → `[batch, dec, d_model]`
    fn decode(
        &self,
        decoder_input:  Tensor<B, 2, Int>,
        encoder_output: Tensor<B, 3>,
        encoder_mask:   Tensor<B, 4, Bool>,
        decoder_mask:   Tensor<B, 4, Bool>,
    ) -> Tensor<B, 3>;

    /// `[batch, dec, d_model]` → log-probabilities `[batch, dec, vocab]`
    fn project(&self, decoder_output: Tensor<B, 3>) -> Tensor<B, 3>;

    /// Mean token cross-entropy against `labels`, pad labels ignored.
    fn forward_loss(&self, batch: FramedBatch<B>, pad_id: u32) -> Tensor<B, 1> {
        let encoder_output = self.encode(batch.encoder_input, batch.encoder_mask.clone());
        let decoder_output = self.decode(
            batch.decoder_input,
            encoder_output,
            batch.encoder_mask,
            batch.decoder_mask,
        );
        // log_softmax is idempotent, so feeding log-probs to CE is exact
        let log_probs = self.project(decoder_output);
        let [batch_size, seq_len, vocab] = log_probs.dims();

        let ce = CrossEntropyLossConfig::new()
            .with_pad_tokens(Some(vec![pad_id as usize]))
            .init(&log_probs.device());
        ce.forward(
            log_probs.reshape([batch_size * seq_len, vocab]),
            batch.labels.reshape([batch_size * seq_len]),
        )
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    pub max_seq_len:    usize,
    pub d_model:        usize,
    pub heads:          usize,
    pub n_stack:        usize,
    pub d_fc:           usize,
    pub dropout:        f64,
}

impl Seq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2SeqTransformer<B> {
        let encoder = TransformerEncoderConfig::new(self.d_model, self.d_fc, self.heads, self.n_stack)
            .with_dropout(self.dropout)
            .init(device);
        let decoder = TransformerDecoderConfig::new(self.d_model, self.d_fc, self.heads, self.n_stack)
            .with_dropout(self.dropout)
            .init(device);

        Seq2SeqTransformer {
            src_embedding:      EmbeddingConfig::new(self.src_vocab_size, self.d_model).init(device),
            tgt_embedding:      EmbeddingConfig::new(self.tgt_vocab_size, self.d_model).init(device),
            position_embedding: EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device),
            encoder,
            decoder,
            projection:         LinearConfig::new(self.d_model, self.tgt_vocab_size).init(device),
            dropout:            DropoutConfig::new(self.dropout).init(),
        }
    }
}

/// Encoder-decoder transformer delegating to burn's transformer blocks.
#[derive(Module, Debug)]
pub struct Seq2SeqTransformer<B: Backend> {
    pub src_embedding:      Embedding<B>,
    pub tgt_embedding:      Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub encoder:            TransformerEncoder<B>,
    pub decoder:            TransformerDecoder<B>,
    pub projection:         Linear<B>,
    pub dropout:            Dropout,
}

impl<B: Backend> Seq2SeqTransformer<B> {
    fn embed(&self, embedding: &Embedding<B>, ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = ids.dims();
        let tok_emb = embedding.forward(ids);

        // Attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        self.dropout.forward(tok_emb + pos_emb)
    }
}

impl<B: Backend> Seq2SeqModel<B> for Seq2SeqTransformer<B> {
    fn encode(&self, encoder_input: Tensor<B, 2, Int>, encoder_mask: Tensor<B, 4, Bool>) -> Tensor<B, 3> {
        let x = self.embed(&self.src_embedding, encoder_input);
        let input = TransformerEncoderInput::new(x).mask_pad(blocked_positions(encoder_mask));
        self.encoder.forward(input)
    }

    fn decode(
        &self,
        decoder_input:  Tensor<B, 2, Int>,
        encoder_output: Tensor<B, 3>,
        encoder_mask:   Tensor<B, 4, Bool>,
        decoder_mask:   Tensor<B, 4, Bool>,
    ) -> Tensor<B, 3> {
        let x = self.embed(&self.tgt_embedding, decoder_input);
        let [batch_size, _, rows, cols] = decoder_mask.dims();
        // burn marks blocked positions with true, the pipeline marks visible ones
        let target_mask_attn = decoder_mask.reshape([batch_size, rows, cols]).bool_not();

        let input = TransformerDecoderInput::new(x, encoder_output)
            .memory_mask_pad(blocked_positions(encoder_mask))
            .target_mask_attn(target_mask_attn);
        self.decoder.forward(input)
    }

    fn project(&self, decoder_output: Tensor<B, 3>) -> Tensor<B, 3> {
        log_softmax(self.projection.forward(decoder_output), 2)
    }
}

/// `[batch, 1, 1, len]` visible-mask → `[batch, len]` blocked-mask.
fn blocked_positions<B: Backend>(mask: Tensor<B, 4, Bool>) -> Tensor<B, 2, Bool> {
    let [batch_size, _, _, len] = mask.dims();
    mask.reshape([batch_size, len]).bool_not()
}
