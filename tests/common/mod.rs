// tests/common/mod.rs
use lattice_steps::core::{
    crypto::{
        ggh::{keys_from_bases, Ggh, GghKeys},
        matrix::IntMatrix,
        sampling::EngineRng,
        types::GghState,
    },
    registry::Registry,
};

pub struct TestContext {
    pub registry: Registry,
    pub rng: EngineRng,
}

impl TestContext {
    pub fn new(seed: u64) -> Self {
        Self {
            registry: Registry::default(),
            rng: EngineRng::from_seed(seed),
        }
    }
}

/// B = [[3, 1], [1, 2]], B' = [[5, 2], [1, 1]]
pub fn fixed_keys() -> GghKeys {
    keys_from_bases(
        IntMatrix::from_rows(vec![vec![3, 1], vec![1, 2]]).unwrap(),
        IntMatrix::from_rows(vec![vec![5, 2], vec![1, 1]]).unwrap(),
    )
    .unwrap()
}

/// Fixed keys with p = [3, -7] and e = [1, -1]
pub fn fixed_state() -> GghState {
    Ggh::initialize_with(fixed_keys(), vec![3, -7], vec![1, -1]).unwrap()
}

pub fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}
