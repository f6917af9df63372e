// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the other layers:
//
//   config.rs          — PipelineConfig / ModelSettings,
//                        defaults, validation and JSON
//                        load/save so a run can be repeated.
//
//   tokenizer_store.rs — Tokenizer resolution
//                        Loads a tokenizer file, downloads a
//                        pretrained one, or builds a word-level
//                        vocabulary from the corpus; wraps it
//                        with the framing specials registered.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Run configuration and JSON persistence
pub mod config;

/// Tokenizer loading, building and special-token registration
pub mod tokenizer_store;
