// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user-facing goal.
//
// Rules for this layer:
//   - No framing logic or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Building, inspecting and checking the framed dataset
pub mod prepare_use_case;

// Forward-only pass through the model
pub mod dry_run_use_case;
