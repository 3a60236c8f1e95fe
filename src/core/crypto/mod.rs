//! Cryptographic primitives and implementations

pub mod ggh;
pub mod matrix;
pub mod sampling;
pub mod serialization;
pub mod types;

// Re-export commonly used types
pub use ggh::{Ggh, GghKeys, GghParams, DecodingOutcome, Decryption};
pub use matrix::{IntMatrix, RealMatrix};
pub use sampling::EngineRng;
pub use serialization::{encode_state, decode_state, state_fingerprint};
pub use types::{GghState, GaussState, SessionState};
