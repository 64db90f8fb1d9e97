//! Platform layer
//!
//! Handles browser/native differences for:
//! - Keyboard mapping (shared, testable natively)
//! - DOM lookups that tolerate missing elements (WASM only)

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod keys;

pub use keys::action_for_key;
