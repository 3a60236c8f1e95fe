// src/api/types.rs
use serde::{Deserialize, Serialize};

use crate::core::{
    crypto::types::SessionState,
    registry::{Family, Unsupported},
    steps::phases::PhaseTable,
};

#[derive(Debug, Deserialize)]
pub struct InitializeRequest {
    pub algorithm: String,
    pub dimension: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub status: String,
    pub state: SessionState,
    pub fingerprint: String,
    pub max_steps: usize,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: usize,
    pub state: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct PhasesResponse {
    pub algorithm: String,
    pub max_steps: usize,
    pub phases: PhaseTable,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnsupportedResponse {
    pub status: String,
    pub algorithm: String,
    pub family: Option<Family>,
}

impl From<Unsupported> for UnsupportedResponse {
    fn from(unsupported: Unsupported) -> Self {
        Self {
            status: "unsupported".to_string(),
            algorithm: unsupported.name,
            family: unsupported.family,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
