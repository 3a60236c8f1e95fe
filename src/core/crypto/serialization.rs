//! Serialization utilities for session state
//! Handles conversion between the in-memory state and its persisted JSON form

use sha3::{Digest, Sha3_256};

use crate::{
    core::crypto::types::SessionState,
    utils::error::{EngineError, Result},
};

/// Maximum accepted size of an encoded state blob
const MAX_STATE_SIZE: usize = 1 << 20;

/// Serialize session state to its flat JSON mapping
pub fn encode_state(state: &SessionState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Serialize session state to a JSON value
pub fn state_to_value(state: &SessionState) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(state)?)
}

/// Deserialize and validate session state
pub fn decode_state(text: &str) -> Result<SessionState> {
    if text.len() > MAX_STATE_SIZE {
        return Err(EngineError::CorruptSnapshot("State blob too large".into()));
    }
    let state: SessionState = serde_json::from_str(text)
        .map_err(|e| EngineError::CorruptSnapshot(e.to_string()))?;
    state.validate()?;
    Ok(state)
}

/// Deserialize and validate session state from an already parsed value
pub fn state_from_value(value: serde_json::Value) -> Result<SessionState> {
    let state: SessionState = serde_json::from_value(value)
        .map_err(|e| EngineError::CorruptSnapshot(e.to_string()))?;
    state.validate()?;
    Ok(state)
}

/// SHA3-256 of the canonical encoding, hex encoded
pub fn state_fingerprint(state: &SessionState) -> Result<String> {
    let encoded = encode_state(state)?;
    let mut hasher = Sha3_256::new();
    hasher.update(encoded.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
