// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits that name the concepts of the
// framing pipeline:
//
//   RawRecord  → one dataset line ("source ###> target")
//   SegmentPair → the (source, target) token slices after splitting
//   FramedExample → fixed-length ids + masks ready for the model
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Typed errors raised by the pipeline
pub mod error;

/// Framed examples, segment pairs and boolean masks
pub mod example;

/// Special tokens, delimiter and max-length configuration
pub mod framing;

/// A raw dataset record before tokenisation
pub mod record;

/// Core abstractions (dataset source, tokenizer capability)
pub mod traits;
