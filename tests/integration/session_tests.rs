// tests/integration/session_tests.rs
use lattice_steps::{
    core::{
        crypto::types::SessionState,
        registry::Availability,
        session::Session,
        steps::{ggh::process_step, RenderPayload},
    },
    utils::error::EngineError,
};

use crate::common::{fixed_state, TestContext};

#[test]
fn test_process_step_is_idempotent() {
    let state = fixed_state();
    for step in 0..=10 {
        assert_eq!(process_step(step, &state).unwrap(), process_step(step, &state).unwrap());
    }
}

#[test]
fn test_reveals_accumulate_within_each_phase() {
    let mut ctx = TestContext::new(21);
    let state = match ctx.registry.initialize("GGH", 3, &mut ctx.rng).unwrap() {
        Availability::Ready(SessionState::Ggh(state)) => state,
        other => panic!("expected a GGH state, got {:?}", other),
    };

    for step in 1..10 {
        let current = process_step(step, &state).unwrap();
        let next = process_step(step + 1, &state).unwrap();
        if current.phase == next.phase {
            assert!(current.revealed.iter().all(|key| next.revealed.contains(key)));
            assert_eq!(next.revealed.len(), current.revealed.len() + 1);
            assert!(next.payload.len() > current.payload.len());
        } else {
            assert_eq!(next.revealed.len(), 1);
        }
    }
}

#[test]
fn test_every_step_in_range_renders() {
    let mut ctx = TestContext::new(22);
    for name in ["GGH", "Gauss Reduction"] {
        let state = ctx.registry.initialize(name, 2, &mut ctx.rng).unwrap().ready().unwrap();
        let max_step = ctx.registry.max_steps(name).ready().unwrap();

        let empty = ctx.registry.advance(0, &state).unwrap();
        assert!(empty.payload.is_empty() && empty.phase.is_none());

        for step in 1..=max_step {
            let view = ctx.registry.advance(step, &state).unwrap();
            assert!(matches!(view.payload, RenderPayload::Vectors(_)));
            assert!(!view.narrative.is_empty());
        }
        assert!(matches!(
            ctx.registry.advance(max_step + 1, &state),
            Err(EngineError::InvalidStep { .. })
        ));
    }
}

#[test_log::test]
fn test_reset_then_fresh_session() {
    let mut ctx = TestContext::new(23);
    let mut session = Session::start(&ctx.registry, "GGH", 2, &mut ctx.rng)
        .unwrap()
        .ready()
        .unwrap();
    for _ in 0..3 {
        session.advance(&ctx.registry).unwrap();
    }
    let first_id = session.id();
    session.reset();
    assert!(matches!(session.advance(&ctx.registry), Err(EngineError::NoSession)));

    let fresh = Session::start(&ctx.registry, "GGH", 2, &mut ctx.rng)
        .unwrap()
        .ready()
        .unwrap();
    assert_ne!(fresh.id(), first_id);
    assert_eq!(fresh.step(), 0);
    assert_eq!(fresh.max_step(), session.max_step());
    assert_eq!(
        ctx.registry.step_phases("GGH"),
        ctx.registry.step_phases(fresh.algorithm())
    );
}

#[test]
fn test_unsupported_schemes_are_values() {
    let mut ctx = TestContext::new(24);
    for name in ["LWE", "Alkaline", "LLL", "BKZ", "made up"] {
        assert!(!ctx.registry.initialize(name, 2, &mut ctx.rng).unwrap().is_ready());
        assert!(!ctx.registry.max_steps(name).is_ready());
    }
}
