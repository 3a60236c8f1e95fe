//! Gauss (Lagrange) reduction of a two-dimensional lattice basis

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    core::crypto::{
        matrix::IntMatrix,
        sampling::{sample_full_rank, sample_scale, EngineRng},
        types::GaussState,
    },
    utils::error::{EngineError, Result},
};

pub const GAUSS_DIMENSION: usize = 2;

/// Guard against runaway input; real bases finish in a handful of rounds
const MAX_ITERATIONS: usize = 10_000;

/// One round: the pair after ordering by length, and the multiplier applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaussIteration {
    pub v1: Vec<i64>,
    pub v2: Vec<i64>,
    pub m: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaussTrace {
    pub iterations: Vec<GaussIteration>,
    pub reduced: IntMatrix,
}

fn dot(a: &[i64; 2], b: &[i64; 2]) -> Result<i128> {
    (a[0] as i128 * b[0] as i128)
        .checked_add(a[1] as i128 * b[1] as i128)
        .ok_or_else(overflow)
}

/// `num / den` rounded to nearest, ties to even; `den > 0`
fn div_round_even(num: i128, den: i128) -> i128 {
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    // 0 <= r < den, so comparing r with den - r cannot overflow
    match r.cmp(&(den - r)) {
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q & 1),
        std::cmp::Ordering::Less => q,
    }
}

fn as_pair(v: &[i64]) -> Result<[i64; 2]> {
    match v {
        [x, y] => Ok([*x, *y]),
        _ => Err(EngineError::DimensionMismatch {
            expected: GAUSS_DIMENSION,
            found: v.len(),
        }),
    }
}

/// Reduce `(v1, v2)` until the multiplier rounds to zero
pub fn gauss_reduce(v1: &[i64], v2: &[i64]) -> Result<GaussTrace> {
    let mut a = as_pair(v1)?;
    let mut b = as_pair(v2)?;

    let det = (a[0] as i128 * b[1] as i128)
        .checked_sub(a[1] as i128 * b[0] as i128)
        .ok_or_else(overflow)?;
    if det == 0 {
        return Err(EngineError::InvalidInput(
            "Basis vectors must be linearly independent".into(),
        ));
    }

    let mut iterations = Vec::new();
    for _ in 0..MAX_ITERATIONS {
        if dot(&b, &b)? < dot(&a, &a)? {
            std::mem::swap(&mut a, &mut b);
        }

        let m = div_round_even(dot(&a, &b)?, dot(&a, &a)?);
        let m = i64::try_from(m)
            .map_err(|_| EngineError::InvalidInput("Reduction multiplier overflowed".into()))?;
        iterations.push(GaussIteration {
            v1: a.to_vec(),
            v2: b.to_vec(),
            m,
        });

        if m == 0 {
            debug!(iterations = iterations.len(), "Gauss reduction converged");
            return Ok(GaussTrace {
                iterations,
                reduced: IntMatrix::from_rows(vec![a.to_vec(), b.to_vec()])?,
            });
        }

        for k in 0..GAUSS_DIMENSION {
            b[k] = b[k]
                .checked_sub(m.checked_mul(a[k]).ok_or_else(overflow)?)
                .ok_or_else(overflow)?;
        }
    }

    Err(EngineError::InvalidInput(format!(
        "Gauss reduction did not converge within {} iterations",
        MAX_ITERATIONS
    )))
}

fn overflow() -> EngineError {
    EngineError::InvalidInput("Basis entries overflowed during reduction".into())
}

/// Two-dimensional reduction demo: sample a good basis, shear it into a poor
/// one, and record how Gauss reduction walks back
#[derive(Debug, Clone)]
pub struct GaussReduction {
    max_scale: i64,
}

impl Default for GaussReduction {
    fn default() -> Self {
        Self { max_scale: 20 }
    }
}

impl GaussReduction {
    pub fn new(max_scale: i64) -> Self {
        Self { max_scale }
    }

    pub fn initialize(&self, dimension: usize, rng: &mut EngineRng) -> Result<GaussState> {
        if dimension != GAUSS_DIMENSION {
            return Err(EngineError::InvalidInput(format!(
                "Gauss reduction requires dimension {}, got {}",
                GAUSS_DIMENSION, dimension
            )));
        }

        let scale = sample_scale(rng, self.max_scale)?;
        let good = sample_full_rank(rng, GAUSS_DIMENSION, scale)?;

        // Two unimodular shears keep the lattice and ruin the basis
        let mut shear = || {
            let k = rng.uniform(2, 9);
            if rng.uniform(0, 1) == 0 { k } else { -k }
        };
        let (k, j) = (shear(), shear());
        let r1 = good.row(0);
        let r2: Vec<i64> = good.row(1).iter().zip(r1).map(|(y, x)| y + k * x).collect();
        let r1: Vec<i64> = r1.iter().zip(&r2).map(|(x, y)| x + j * y).collect();

        let state = Self::from_basis(IntMatrix::from_rows(vec![r1, r2])?)?;
        info!(iterations = state.iterations.len(), "Initialized Gauss reduction state");
        Ok(state)
    }

    pub fn from_basis(basis: IntMatrix) -> Result<GaussState> {
        if basis.nrows() != GAUSS_DIMENSION || basis.ncols() != GAUSS_DIMENSION {
            return Err(EngineError::DimensionMismatch {
                expected: GAUSS_DIMENSION,
                found: basis.nrows(),
            });
        }
        let trace = gauss_reduce(basis.row(0), basis.row(1))?;
        Ok(GaussState {
            dimension: GAUSS_DIMENSION,
            basis,
            iterations: trace.iterations,
            reduced: trace.reduced,
        })
    }
}
