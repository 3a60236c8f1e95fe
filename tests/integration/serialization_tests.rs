// tests/integration/serialization_tests.rs
use lattice_steps::{
    core::crypto::{
        serialization::{decode_state, encode_state, state_fingerprint, state_from_value, state_to_value},
        types::SessionState,
    },
    utils::error::EngineError,
};

use crate::common::{fixed_state, TestContext};

#[test]
fn test_round_trip_is_lossless_for_every_engine() {
    let mut ctx = TestContext::new(31);
    for (name, dimension) in [("GGH", 2), ("GGH", 5), ("Gauss Reduction", 2)] {
        let state = ctx.registry.initialize(name, dimension, &mut ctx.rng).unwrap().ready().unwrap();
        let decoded = decode_state(&encode_state(&state).unwrap()).unwrap();

        assert_eq!(decoded, state);
        assert_eq!(state_fingerprint(&decoded).unwrap(), state_fingerprint(&state).unwrap());
    }
}

#[test]
fn test_steps_render_identically_after_round_trip() {
    let ctx = TestContext::new(32);
    let state = SessionState::Ggh(fixed_state());
    let decoded = decode_state(&encode_state(&state).unwrap()).unwrap();

    for step in 0..=10 {
        assert_eq!(
            ctx.registry.advance(step, &state).unwrap(),
            ctx.registry.advance(step, &decoded).unwrap()
        );
    }
}

#[test]
fn test_gauss_blob_is_tagged() {
    let mut ctx = TestContext::new(33);
    let state = ctx.registry.initialize("Gauss Reduction", 2, &mut ctx.rng).unwrap().ready().unwrap();
    let value = state_to_value(&state).unwrap();

    assert_eq!(value["algorithm"], "Gauss Reduction");
    assert!(value["iterations"].as_array().map_or(false, |its| !its.is_empty()));
}

#[test]
fn test_tampered_blobs_are_corrupt() {
    let value = state_to_value(&SessionState::Ggh(fixed_state())).unwrap();

    let mut wrong_dimension = value.clone();
    wrong_dimension["dimension"] = serde_json::json!(3);
    assert!(matches!(state_from_value(wrong_dimension), Err(EngineError::CorruptSnapshot(_))));

    let mut ragged = value.clone();
    ragged["U"] = serde_json::json!([[1.6, 0.2], [0.2]]);
    assert!(matches!(state_from_value(ragged), Err(EngineError::CorruptSnapshot(_))));

    let mut unknown = value;
    unknown["algorithm"] = serde_json::json!("NTRU");
    assert!(matches!(state_from_value(unknown), Err(EngineError::CorruptSnapshot(_))));
}

#[test]
fn test_inconsistent_values_are_corrupt() {
    let ctx = TestContext::new(34);
    let value = state_to_value(&SessionState::Ggh(fixed_state())).unwrap();

    // well-shaped but no longer the inverse of U
    let mut identity_inverse = value.clone();
    identity_inverse["public_key_inverse"] = serde_json::json!([[1.0, 0.0], [0.0, 1.0]]);
    assert!(matches!(state_from_value(identity_inverse), Err(EngineError::CorruptSnapshot(_))));

    let mut singular_key = value.clone();
    singular_key["U"] = serde_json::json!([[1.0, 2.0], [2.0, 4.0]]);
    let err = state_from_value(singular_key).unwrap_err();
    assert!(matches!(err, EngineError::CorruptSnapshot(_)));
    assert!(err.is_client_error());

    let mut singular_basis = value.clone();
    singular_basis["B"] = serde_json::json!([[2, 4], [1, 2]]);
    assert!(matches!(state_from_value(singular_basis), Err(EngineError::CorruptSnapshot(_))));

    let mut shifted_ciphertext = value.clone();
    shifted_ciphertext["ciphertext"] = serde_json::json!([4.4, -2.2]);
    assert!(matches!(state_from_value(shifted_ciphertext), Err(EngineError::CorruptSnapshot(_))));

    let mut shifted_decrypt = value.clone();
    shifted_decrypt["decrypt"] = serde_json::json!([3.0, -9.0]);
    assert!(matches!(state_from_value(shifted_decrypt), Err(EngineError::CorruptSnapshot(_))));

    // the untouched blob still renders its recovered outcome
    let state = state_from_value(value).unwrap();
    assert!(ctx.registry.advance(10, &state).unwrap().outcome.unwrap().is_recovered());
}
