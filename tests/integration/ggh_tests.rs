// tests/integration/ggh_tests.rs
use lattice_steps::core::crypto::{
    ggh::{self, DecodingOutcome, Ggh, GghParams},
    matrix::{self, RealMatrix},
    sampling::EngineRng,
};

use crate::common::{fixed_keys, fixed_state, max_abs};

#[test_log::test]
fn test_keys_full_rank_across_dimensions() {
    let params = GghParams::default();
    for n in 2..=6 {
        let mut rng = EngineRng::from_seed(n as u64);
        for _ in 0..20 {
            let keys = ggh::generate_keys(&params, n, &mut rng).unwrap();
            assert_eq!(keys.basis.rank(), n);
            assert_eq!(keys.good_basis.rank(), n);
            assert!(keys.public_key.determinant().unwrap().abs() > 0.0);

            let scale = keys.scale.unwrap();
            assert!((1..=params.max_scale).contains(&scale));
            assert!(keys.basis.rows().iter().flatten().all(|x| x.abs() <= scale));
        }
    }
}

#[test_log::test]
fn test_decrypt_removes_plaintext_component() {
    let ggh = Ggh::default();
    let mut rng = EngineRng::from_seed(42);

    for n in 2..=5 {
        for _ in 0..25 {
            let state = ggh.initialize(n, &mut rng).unwrap();
            let u_inv = &state.public_key_inverse;

            // decrypt(c) − p·U·U⁻¹ == e·U⁻¹
            let p_u = matrix::vec_mat(&matrix::to_real(&state.plaintext), &state.public_key).unwrap();
            let p_u_uinv = matrix::vec_mat(&p_u, u_inv).unwrap();
            let lhs = matrix::sub(&state.decrypted, &p_u_uinv).unwrap();
            let rhs = matrix::vec_mat(&matrix::to_real(&state.error), u_inv).unwrap();

            let scale = 1.0 + max_abs(&state.decrypted).max(max_abs(&rhs));
            assert!(matrix::max_abs_diff(&lhs, &rhs).unwrap() < 1e-9 * scale);
        }
    }
}

fn success_rate(dimension: usize, seed: u64, trials: usize) -> f64 {
    let ggh = Ggh::default();
    let mut rng = EngineRng::from_seed(seed);
    let recovered = (0..trials)
        .filter(|_| {
            let state = ggh.initialize(dimension, &mut rng).unwrap();
            Ggh::decode(&state).unwrap().outcome.is_recovered()
        })
        .count();
    recovered as f64 / trials as f64
}

#[test]
fn test_babai_success_rate_dimension_two() {
    assert!(success_rate(2, 7, 1000) >= 0.9);
}

#[test]
fn test_babai_success_rate_dimension_three() {
    assert!(success_rate(3, 8, 1000) >= 0.9);
}

#[test]
fn test_fixed_scenario() {
    let keys = fixed_keys();
    let expected = RealMatrix::from_rows(vec![vec![1.6, 0.2], vec![0.2, 0.4]]).unwrap();
    assert!(keys.public_key.max_abs_diff(&expected).unwrap() < 1e-12);

    let state = fixed_state();
    assert!(matrix::max_abs_diff(&state.ciphertext, &[4.4, -3.2]).unwrap() < 1e-12);

    let decryption = Ggh::decode(&state).unwrap();
    assert_eq!(decryption.recovered, vec![3, -7]);
    assert_eq!(decryption.outcome, DecodingOutcome::Recovered);
}

#[test_log::test]
fn test_adversarial_error_estimate_is_a_mismatch() {
    let state = fixed_state();

    // flipping the estimate doubles the residual error instead of cancelling it
    let decryption = Ggh::decode_with_correction(&state, &[-1, 1]).unwrap();
    match decryption.outcome {
        DecodingOutcome::Mismatch { expected, recovered } => {
            assert_eq!(expected, vec![3, -7]);
            assert_ne!(recovered, expected);
        }
        DecodingOutcome::Recovered => panic!("wrong correction should not recover the plaintext"),
    }
}

#[test]
fn test_sampled_vectors_within_bounds() {
    let params = GghParams {
        error_bound: 2,
        ..GghParams::default()
    };
    let ggh = Ggh::new(params);
    let mut rng = EngineRng::from_seed(77);

    for _ in 0..100 {
        let state = ggh.initialize(4, &mut rng).unwrap();
        assert!(state.plaintext.iter().all(|p| (-10..=9).contains(p)));
        assert!(state.error.iter().all(|e| (-2..=2).contains(e)));
    }
}
