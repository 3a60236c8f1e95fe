//! Goldreich-Goldwasser-Halevi encryption over small integer lattices
//!
//! The public key is the change of basis `U = B' · B⁻¹` from a random poor
//! basis `B` to a random good basis `B'`. Encryption is `m · U + e`, and
//! decryption multiplies back by `U⁻¹` and removes the error contribution
//! with Babai rounding in its known-error form.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    core::crypto::{
        matrix::{self, IntMatrix, RealMatrix},
        sampling::{sample_error, sample_full_rank, sample_plaintext, sample_scale, EngineRng},
        types::GghState,
    },
    utils::error::{EngineError, Result},
};

pub const GGH_MIN_DIMENSION: usize = 2;

/// Sampling parameters for one GGH run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GghParams {
    pub max_dimension: usize,
    /// Basis entries are drawn from `[-r, r]` with `r` in `[1, max_scale]`
    pub max_scale: i64,
    pub plaintext_range: i64,
    pub error_bound: i64,
}

impl Default for GghParams {
    fn default() -> Self {
        Self {
            max_dimension: 16,
            max_scale: 20,
            plaintext_range: 20,
            error_bound: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GghKeys {
    /// `None` when the bases were supplied rather than sampled
    pub scale: Option<i64>,
    pub basis: IntMatrix,
    pub good_basis: IntMatrix,
    pub public_key: RealMatrix,
    pub public_key_inverse: RealMatrix,
}

/// Whether Babai rounding landed back on the original plaintext
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodingOutcome {
    Recovered,
    Mismatch {
        expected: Vec<i64>,
        recovered: Vec<i64>,
    },
}

impl DecodingOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, DecodingOutcome::Recovered)
    }
}

/// Every intermediate value of the decryption pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Decryption {
    /// `ciphertext · U⁻¹`
    pub decrypted: Vec<f64>,
    /// `correction · U⁻¹`
    pub error_term: Vec<f64>,
    /// `decrypted − error_term`
    pub rounded: Vec<f64>,
    /// `rounded · U⁻¹`
    pub temp: Vec<f64>,
    /// `round(temp · U)`
    pub recovered: Vec<i64>,
    pub outcome: DecodingOutcome,
}

pub fn validate_dimension(dimension: usize, max_dimension: usize) -> Result<()> {
    if dimension < GGH_MIN_DIMENSION || dimension > max_dimension {
        return Err(EngineError::InvalidInput(format!(
            "Dimension must be within {}..={}, got {}",
            GGH_MIN_DIMENSION, max_dimension, dimension
        )));
    }
    Ok(())
}

/// Sample `B` and `B'` until both are full rank, then derive `U` and `U⁻¹`
pub fn generate_keys(params: &GghParams, dimension: usize, rng: &mut EngineRng) -> Result<GghKeys> {
    validate_dimension(dimension, params.max_dimension)?;

    let scale = sample_scale(rng, params.max_scale)?;
    debug!(scale, "Chosen basis scale");

    let basis = sample_full_rank(rng, dimension, scale)?;
    let good_basis = sample_full_rank(rng, dimension, scale)?;

    let mut keys = keys_from_bases(basis, good_basis)?;
    keys.scale = Some(scale);
    Ok(keys)
}

/// Derive the public transform from fixed bases
pub fn keys_from_bases(basis: IntMatrix, good_basis: IntMatrix) -> Result<GghKeys> {
    if basis.nrows() != good_basis.nrows() {
        return Err(EngineError::DimensionMismatch {
            expected: basis.nrows(),
            found: good_basis.nrows(),
        });
    }
    if !basis.is_full_rank() || !good_basis.is_full_rank() {
        return Err(EngineError::InvalidInput("Both bases must be square and full rank".into()));
    }

    let public_key = good_basis.to_real().mul(&basis.to_real().inverse()?)?;
    let public_key_inverse = public_key.inverse()?;
    debug!(?public_key, "Public key U");

    Ok(GghKeys {
        scale: None,
        basis,
        good_basis,
        public_key,
        public_key_inverse,
    })
}

/// `plaintext · U + error`
pub fn encrypt(public_key: &RealMatrix, plaintext: &[i64], error: &[i64]) -> Result<Vec<f64>> {
    let product = matrix::vec_mat(&matrix::to_real(plaintext), public_key)?;
    matrix::add(&product, &matrix::to_real(error))
}

/// `ciphertext · U⁻¹`, before any rounding
pub fn decrypt(public_key_inverse: &RealMatrix, ciphertext: &[f64]) -> Result<Vec<f64>> {
    matrix::vec_mat(ciphertext, public_key_inverse)
}

/// Remove the error contribution: `approx − error · U⁻¹`
pub fn babai_round(approx: &[f64], error: &[i64], public_key_inverse: &RealMatrix) -> Result<Vec<f64>> {
    let error_term = matrix::vec_mat(&matrix::to_real(error), public_key_inverse)?;
    matrix::sub(approx, &error_term)
}

/// `round((rounded · U⁻¹) · U)`
pub fn recover(rounded: &[f64], public_key: &RealMatrix) -> Result<Vec<i64>> {
    recover_with_trace(rounded, public_key).map(|(_, recovered)| recovered)
}

/// Same as [`recover`], also returning the intermediate `rounded · U⁻¹`
pub fn recover_with_trace(rounded: &[f64], public_key: &RealMatrix) -> Result<(Vec<f64>, Vec<i64>)> {
    let temp = matrix::vec_mat(rounded, &public_key.inverse()?)?;
    let back = matrix::vec_mat(&temp, public_key)?;
    Ok((temp, matrix::round_vector(&back)))
}

pub fn check_decoding(plaintext: &[i64], recovered: &[i64]) -> DecodingOutcome {
    if plaintext == recovered {
        DecodingOutcome::Recovered
    } else {
        DecodingOutcome::Mismatch {
            expected: plaintext.to_vec(),
            recovered: recovered.to_vec(),
        }
    }
}

/// GGH engine: key generation, sampling and the decryption pipeline
#[derive(Debug, Clone, Default)]
pub struct Ggh {
    params: GghParams,
}

impl Ggh {
    pub fn new(params: GghParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GghParams {
        &self.params
    }

    /// Keys, plaintext, error, ciphertext and decryption in one pass
    pub fn initialize(&self, dimension: usize, rng: &mut EngineRng) -> Result<GghState> {
        let keys = generate_keys(&self.params, dimension, rng)?;
        let error = sample_error(rng, dimension, self.params.error_bound)?;
        let plaintext = sample_plaintext(rng, dimension, self.params.plaintext_range)?;

        let state = Self::initialize_with(keys, plaintext, error)?;
        info!(dimension, "Initialized GGH session state");
        Ok(state)
    }

    /// Build the state from fixed keys and vectors
    pub fn initialize_with(keys: GghKeys, plaintext: Vec<i64>, error: Vec<i64>) -> Result<GghState> {
        let ciphertext = encrypt(&keys.public_key, &plaintext, &error)?;
        let decrypted = decrypt(&keys.public_key_inverse, &ciphertext)?;
        debug!(?plaintext, ?error, ?ciphertext, ?decrypted, "Encrypted and decrypted");

        Ok(GghState {
            dimension: keys.basis.nrows(),
            basis: keys.basis,
            good_basis: keys.good_basis,
            public_key: keys.public_key,
            public_key_inverse: keys.public_key_inverse,
            plaintext,
            error,
            ciphertext,
            decrypted,
        })
    }

    /// Run Babai rounding and recovery with the true error vector
    pub fn decode(state: &GghState) -> Result<Decryption> {
        Self::decode_with_correction(state, &state.error)
    }

    /// Run Babai rounding with a caller-supplied error estimate.
    ///
    /// A wrong estimate leaves `(error − correction) · U⁻¹` in the rounded
    /// vector; if that exceeds one half anywhere the result is a mismatch.
    pub fn decode_with_correction(state: &GghState, correction: &[i64]) -> Result<Decryption> {
        let decrypted = state.decrypted.clone();
        let error_term = matrix::vec_mat(&matrix::to_real(correction), &state.public_key_inverse)?;
        let rounded = matrix::sub(&decrypted, &error_term)?;
        let (temp, recovered) = recover_with_trace(&rounded, &state.public_key)?;

        let outcome = check_decoding(&state.plaintext, &recovered);
        if let DecodingOutcome::Mismatch { expected, recovered } = &outcome {
            warn!(?expected, ?recovered, "Decoding did not recover the plaintext");
        }

        Ok(Decryption {
            decrypted,
            error_term,
            rounded,
            temp,
            recovered,
            outcome,
        })
    }
}
