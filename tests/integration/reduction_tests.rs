// tests/integration/reduction_tests.rs
use lattice_steps::core::{
    crypto::{matrix::IntMatrix, sampling::EngineRng},
    reduction::{gauss_reduce, GaussReduction},
    steps::gauss::process_step,
};

fn det(m: &IntMatrix) -> i128 {
    m.get(0, 0) as i128 * m.get(1, 1) as i128 - m.get(0, 1) as i128 * m.get(1, 0) as i128
}

fn norm2(v: &[i64]) -> i128 {
    v.iter().map(|&x| x as i128 * x as i128).sum()
}

#[test]
fn test_reduced_basis_is_lagrange_reduced() {
    let reduction = GaussReduction::default();
    let mut rng = EngineRng::from_seed(41);

    for _ in 0..200 {
        let state = reduction.initialize(2, &mut rng).unwrap();
        let (v1, v2) = (state.reduced.row(0), state.reduced.row(1));

        assert_eq!(det(&state.basis).abs(), det(&state.reduced).abs());
        assert!(norm2(v1) <= norm2(v2));
        // |⟨v1, v2⟩| ≤ ‖v1‖² / 2
        let inner: i128 = v1.iter().zip(v2).map(|(a, b)| *a as i128 * *b as i128).sum();
        assert!(2 * inner.abs() <= norm2(v1));
    }
}

#[test]
fn test_textbook_basis_walkthrough() {
    let basis = IntMatrix::from_rows(vec![vec![66586820, 65354729], vec![6513996, 6393464]]).unwrap();
    let state = GaussReduction::from_basis(basis).unwrap();

    let view = process_step(2, &state).unwrap();
    assert_eq!(view.narrative.len(), 6);
    assert_eq!(view.narrative[0].value, "m = 10");

    let view = process_step(3, &state).unwrap();
    assert_eq!(view.narrative[0].value, "[[2280, -1001], [-1324, -2376]]");
}

#[test]
fn test_already_reduced_basis_stops_immediately() {
    let trace = gauss_reduce(&[1, 0], &[0, 1]).unwrap();
    assert_eq!(trace.iterations.len(), 1);
    assert_eq!(trace.iterations[0].m, 0);
    assert_eq!(trace.reduced.rows(), &[vec![1, 0], vec![0, 1]]);
}
