//! Sampling functions for GGH
//! Uniform integer bases, plaintexts and small error vectors

use crate::{
    core::crypto::matrix::IntMatrix,
    utils::error::{Result, EngineError},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, warn};

/// Attempts between warnings while rejection-sampling a full-rank basis
const RANK_WARN_INTERVAL: u64 = 10_000;

/// ChaCha20 stream owned by a single initialization.
pub struct EngineRng {
    inner: ChaCha20Rng,
}

impl EngineRng {
    /// Seed from the operating system's CSPRNG
    pub fn from_system() -> Result<Self> {
        let mut seed = [0u8; 32];
        SystemRandom::new()
            .fill(&mut seed)
            .map_err(|_| EngineError::Entropy("Failed to generate random seed".into()))?;
        Ok(Self {
            inner: ChaCha20Rng::from_seed(seed),
        })
    }

    /// Deterministic stream for tests and reproducible demos
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[low, high]`
    pub fn uniform(&mut self, low: i64, high: i64) -> i64 {
        self.inner.gen_range(low..=high)
    }
}

/// Pick the basis scale `r` in `[1, max_scale]`
pub fn sample_scale(rng: &mut EngineRng, max_scale: i64) -> Result<i64> {
    if max_scale < 1 {
        return Err(EngineError::InvalidInput(format!(
            "max_scale must be positive, got {}",
            max_scale
        )));
    }
    Ok(rng.uniform(1, max_scale))
}

/// n×n matrix with entries uniform in `[-r, r]`
pub fn sample_matrix(rng: &mut EngineRng, n: usize, r: i64) -> Result<IntMatrix> {
    if n == 0 {
        return Err(EngineError::InvalidInput("Dimension must be positive".into()));
    }
    if r < 0 {
        return Err(EngineError::InvalidInput(format!("Scale must not be negative, got {}", r)));
    }
    let rows = (0..n)
        .map(|_| (0..n).map(|_| rng.uniform(-r, r)).collect())
        .collect();
    IntMatrix::from_rows(rows)
}

/// Rejection-sample until the matrix has rank n.
///
/// The loop has no attempt limit. `r == 0` can never succeed and is rejected.
pub fn sample_full_rank(rng: &mut EngineRng, n: usize, r: i64) -> Result<IntMatrix> {
    if r < 1 {
        return Err(EngineError::InvalidInput(format!(
            "Scale must be at least 1 to reach full rank, got {}",
            r
        )));
    }

    let mut attempts: u64 = 0;
    loop {
        attempts += 1;
        let candidate = sample_matrix(rng, n, r)?;
        if candidate.is_full_rank() {
            debug!(dimension = n, scale = r, attempts, "Sampled full-rank basis");
            return Ok(candidate);
        }
        if attempts % RANK_WARN_INTERVAL == 0 {
            warn!(dimension = n, scale = r, attempts, "Full-rank sampling is taking unusually long");
        }
    }
}

/// Plaintext with components in `[-(range/2), range - range/2)`
pub fn sample_plaintext(rng: &mut EngineRng, dimension: usize, range: i64) -> Result<Vec<i64>> {
    if dimension == 0 {
        return Err(EngineError::InvalidInput("Dimension must be positive".into()));
    }
    if range < 1 {
        return Err(EngineError::InvalidInput(format!(
            "Plaintext range must be positive, got {}",
            range
        )));
    }
    let low = -(range / 2);
    let high = range - range / 2 - 1;
    Ok((0..dimension).map(|_| rng.uniform(low, high)).collect())
}

/// Error vector with components in `[-bound, bound]`
pub fn sample_error(rng: &mut EngineRng, dimension: usize, bound: i64) -> Result<Vec<i64>> {
    if dimension == 0 {
        return Err(EngineError::InvalidInput("Dimension must be positive".into()));
    }
    if bound < 0 {
        return Err(EngineError::InvalidInput(format!(
            "Error bound must not be negative, got {}",
            bound
        )));
    }
    Ok((0..dimension).map(|_| rng.uniform(-bound, bound)).collect())
}
