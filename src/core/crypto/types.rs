// src/core/crypto/types.rs
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        crypto::matrix::{self, IntMatrix, Matrix, RealMatrix},
        reduction::gauss::GaussIteration,
    },
    utils::error::{EngineError, Result},
};

/// Relative slack when re-deriving stored values from each other
const CONSISTENCY_TOLERANCE: f64 = 1e-6;

/// Everything one GGH run produced. Field names are the persisted keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GghState {
    pub dimension: usize,
    #[serde(rename = "B")]
    pub basis: IntMatrix,
    #[serde(rename = "B_prime")]
    pub good_basis: IntMatrix,
    #[serde(rename = "U")]
    pub public_key: Matrix<f64>,
    pub public_key_inverse: Matrix<f64>,
    pub plaintext: Vec<i64>,
    pub error: Vec<i64>,
    pub ciphertext: Vec<f64>,
    #[serde(rename = "decrypt")]
    pub decrypted: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussState {
    pub dimension: usize,
    pub basis: IntMatrix,
    pub iterations: Vec<GaussIteration>,
    pub reduced: IntMatrix,
}

/// The blob a caller keeps between steps, tagged by `algorithm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum SessionState {
    #[serde(rename = "GGH")]
    Ggh(GghState),
    #[serde(rename = "Gauss Reduction")]
    GaussReduction(GaussState),
}

impl SessionState {
    pub fn algorithm(&self) -> &'static str {
        match self {
            SessionState::Ggh(_) => "GGH",
            SessionState::GaussReduction(_) => "Gauss Reduction",
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            SessionState::Ggh(state) => state.dimension,
            SessionState::GaussReduction(state) => state.dimension,
        }
    }

    /// Shape check for state that crossed a serialization boundary
    pub fn validate(&self) -> Result<()> {
        match self {
            SessionState::Ggh(state) => state.validate(),
            SessionState::GaussReduction(state) => state.validate(),
        }
    }
}

impl GghState {
    pub fn validate(&self) -> Result<()> {
        let n = self.dimension;
        if n < 2 {
            return Err(corrupt(format!("dimension {} is below 2", n)));
        }
        check_square("B", &self.basis, n)?;
        check_square("B_prime", &self.good_basis, n)?;
        check_square("U", &self.public_key, n)?;
        check_square("public_key_inverse", &self.public_key_inverse, n)?;
        check_len("plaintext", self.plaintext.len(), n)?;
        check_len("error", self.error.len(), n)?;
        check_len("ciphertext", self.ciphertext.len(), n)?;
        check_len("decrypt", self.decrypted.len(), n)?;

        let finite = self
            .public_key
            .rows()
            .iter()
            .chain(self.public_key_inverse.rows())
            .flatten()
            .chain(&self.ciphertext)
            .chain(&self.decrypted)
            .all(|x| x.is_finite());
        if !finite {
            return Err(corrupt("non-finite value in state".into()));
        }

        self.check_consistency()
    }

    /// Re-derive `U`, `U⁻¹`, the ciphertext and the decryption from the
    /// stored inputs; any disagreement means the blob was altered
    fn check_consistency(&self) -> Result<()> {
        let n = self.dimension as f64;
        if !self.basis.is_full_rank() || !self.good_basis.is_full_rank() {
            return Err(corrupt("B and B_prime must be full rank".into()));
        }

        let u = &self.public_key;
        let u_inv = &self.public_key_inverse;
        let u_max = max_entry(u);
        let u_inv_max = max_entry(u_inv);

        let basis_inverse = self
            .basis
            .to_real()
            .inverse()
            .map_err(|e| corrupt(format!("B: {}", e)))?;
        let derived = self.good_basis.to_real().mul(&basis_inverse)?;
        check_close("U", derived.max_abs_diff(u)?, max_entry(&derived))?;

        let identity = u.mul(u_inv)?;
        check_close(
            "public_key_inverse",
            identity.max_abs_diff(&RealMatrix::identity(self.dimension))?,
            n * u_max * u_inv_max,
        )?;

        let plaintext = matrix::to_real(&self.plaintext);
        let ciphertext = matrix::add(&matrix::vec_mat(&plaintext, u)?, &matrix::to_real(&self.error))?;
        check_close(
            "ciphertext",
            matrix::max_abs_diff(&ciphertext, &self.ciphertext)?,
            n * max_abs(&plaintext) * u_max + max_abs(&self.ciphertext),
        )?;

        let decrypted = matrix::vec_mat(&self.ciphertext, u_inv)?;
        check_close(
            "decrypt",
            matrix::max_abs_diff(&decrypted, &self.decrypted)?,
            n * max_abs(&self.ciphertext) * u_inv_max,
        )?;

        Ok(())
    }
}

impl GaussState {
    pub fn validate(&self) -> Result<()> {
        if self.dimension != 2 {
            return Err(corrupt(format!(
                "Gauss reduction is two-dimensional, got dimension {}",
                self.dimension
            )));
        }
        check_square("basis", &self.basis, 2)?;
        check_square("reduced", &self.reduced, 2)?;
        for (i, iteration) in self.iterations.iter().enumerate() {
            if iteration.v1.len() != 2 || iteration.v2.len() != 2 {
                return Err(corrupt(format!("iteration {} has malformed vectors", i + 1)));
            }
        }
        Ok(())
    }
}

fn check_square<T: Copy>(name: &str, m: &Matrix<T>, n: usize) -> Result<()> {
    m.check_shape()
        .map_err(|e| corrupt(format!("{}: {}", name, e)))?;
    if m.nrows() != n || m.ncols() != n {
        return Err(corrupt(format!(
            "{} is {}x{}, expected {}x{}",
            name,
            m.nrows(),
            m.ncols(),
            n,
            n
        )));
    }
    Ok(())
}

fn check_len(name: &str, len: usize, n: usize) -> Result<()> {
    if len != n {
        return Err(corrupt(format!("{} has length {}, expected {}", name, len, n)));
    }
    Ok(())
}

fn check_close(name: &str, diff: f64, scale: f64) -> Result<()> {
    // written so a NaN difference is rejected too
    if !(diff <= CONSISTENCY_TOLERANCE * (1.0 + scale)) {
        return Err(corrupt(format!(
            "{} disagrees with the values it is derived from (off by {:e})",
            name, diff
        )));
    }
    Ok(())
}

fn max_entry(m: &RealMatrix) -> f64 {
    m.rows().iter().map(|row| max_abs(row)).fold(0.0, f64::max)
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

fn corrupt(message: String) -> EngineError {
    EngineError::CorruptSnapshot(message)
}
