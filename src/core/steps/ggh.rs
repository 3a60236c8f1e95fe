//! Step-by-step disclosure of a GGH run
//!
//! Each phase reveals its artifacts one per step, cumulatively: step k shows
//! every artifact of the current phase introduced at or before k. The view is
//! recomputed from the step number and the immutable state on every call.

use crate::{
    core::{
        crypto::{
            ggh::{Decryption, Ggh},
            matrix,
            types::GghState,
        },
        steps::{
            format,
            phases::PhaseTable,
            render::{Canvas, Color, LineStyle, NarrativeItem, StepView},
        },
    },
    utils::error::{EngineError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Artifact {
    Basis,
    GoodBasis,
    PublicKey,
    Plaintext,
    Error,
    Ciphertext,
    PublicKeyInverse,
    Decrypted,
    Rounded,
    Recovered,
}

impl Artifact {
    fn key(self) -> &'static str {
        match self {
            Artifact::Basis => "B",
            Artifact::GoodBasis => "B_prime",
            Artifact::PublicKey => "U",
            Artifact::Plaintext => "plaintext",
            Artifact::Error => "error",
            Artifact::Ciphertext => "ciphertext",
            Artifact::PublicKeyInverse => "public_key_inverse",
            Artifact::Decrypted => "decrypt",
            Artifact::Rounded => "rounded",
            Artifact::Recovered => "recovered",
        }
    }
}

const PHASES: &[(&str, &[Artifact])] = &[
    ("keygen", &[Artifact::Basis, Artifact::GoodBasis, Artifact::PublicKey]),
    ("encrypt", &[Artifact::Plaintext, Artifact::Error, Artifact::Ciphertext]),
    (
        "decrypt",
        &[
            Artifact::PublicKeyInverse,
            Artifact::Decrypted,
            Artifact::Rounded,
            Artifact::Recovered,
        ],
    ),
];

/// keygen 1..=3, encrypt 4..=6, decrypt 7..=10
pub fn phase_table() -> PhaseTable {
    let lengths: Vec<(&str, usize)> = PHASES.iter().map(|(name, a)| (*name, a.len())).collect();
    PhaseTable::sequential(&lengths)
}

pub fn max_steps() -> usize {
    phase_table().max_step()
}

pub fn process_step(step: usize, state: &GghState) -> Result<StepView> {
    let table = phase_table();
    table.check_step(step)?;
    state.validate()?;

    let mut canvas = Canvas::for_dimension(state.dimension);
    let mut view = StepView {
        algorithm: "GGH".to_string(),
        step,
        max_step: table.max_step(),
        phase: None,
        revealed: Vec::new(),
        payload: Canvas::for_dimension(state.dimension).finish(),
        narrative: Vec::new(),
        outcome: None,
    };

    let position = match table.phase_for_step(step) {
        Some(position) => position,
        None => return Ok(view),
    };
    let artifacts = &PHASES[position.index].1[..position.offset];

    let decryption = if position.phase.name == "decrypt" {
        let decryption = Ggh::decode(state)?;
        if canvas.is_geometric() {
            canvas.vector("Ciphertext", &state.ciphertext, Color::Yellow, LineStyle::Solid);
        }
        Some(decryption)
    } else {
        None
    };

    for &artifact in artifacts {
        let item = reveal(artifact, state, decryption.as_ref(), &mut canvas)?;
        view.narrative.push(item);
        view.revealed.push(artifact.key().to_string());
        if artifact == Artifact::Recovered {
            view.outcome = decryption.as_ref().map(|d| d.outcome.clone());
        }
    }

    view.phase = Some(position.phase.name.clone());
    view.payload = canvas.finish();
    Ok(view)
}

fn reveal(
    artifact: Artifact,
    state: &GghState,
    decryption: Option<&Decryption>,
    canvas: &mut Canvas,
) -> Result<NarrativeItem> {
    let u = state.public_key.rows();
    let u_inv = state.public_key_inverse.rows();

    let item = match artifact {
        Artifact::Basis => {
            canvas.matrix("Poor basis", state.basis.to_real().rows(), Color::Gray, LineStyle::Solid);
            NarrativeItem::new("Random basis B", "B", format::int_rows(state.basis.rows()))
        }
        Artifact::GoodBasis => {
            canvas.matrix("Good basis", state.good_basis.to_real().rows(), Color::Blue, LineStyle::Solid);
            NarrativeItem::new("Private basis B'", "B'", format::int_rows(state.good_basis.rows()))
        }
        Artifact::PublicKey => {
            let basis_inverse = state.basis.to_real().inverse()?;
            canvas.matrix("Public key", u, Color::Red, LineStyle::Solid);
            NarrativeItem::new(
                "Public key U = B' × B⁻¹",
                format!(
                    "U = B' × B⁻¹ = {} × {}",
                    format::int_rows(state.good_basis.rows()),
                    format::real_rows(basis_inverse.rows())
                ),
                format::real_rows(u),
            )
        }
        Artifact::Plaintext => {
            if canvas.is_geometric() {
                let image = matrix::vec_mat(&matrix::to_real(&state.plaintext), &state.public_key)?;
                canvas.vector("plaintext × U", &image, Color::Green, LineStyle::Solid);
            } else {
                canvas.vector("plaintext", &matrix::to_real(&state.plaintext), Color::Green, LineStyle::Solid);
            }
            NarrativeItem::new("Secret message", "plaintext", format::ints(&state.plaintext))
        }
        Artifact::Error => {
            canvas.vector("Error", &matrix::to_real(&state.error), Color::Orange, LineStyle::Solid);
            NarrativeItem::new("Small error", "error", format::ints(&state.error))
        }
        Artifact::Ciphertext => {
            canvas.vector("Ciphertext", &state.ciphertext, Color::Yellow, LineStyle::Solid);
            NarrativeItem::new(
                "Ciphertext",
                format!(
                    "ciphertext = plaintext × U + error = {} × {} + {}",
                    format::ints(&state.plaintext),
                    format::real_rows(u),
                    format::ints(&state.error)
                ),
                format::reals(&state.ciphertext),
            )
        }
        Artifact::PublicKeyInverse => {
            canvas.matrix("Public key inverse", u_inv, Color::Cyan, LineStyle::Solid);
            NarrativeItem::new(
                "Public key inverse U⁻¹",
                format!("U⁻¹ = inverse({})", format::real_rows(u)),
                format::real_rows(u_inv),
            )
        }
        Artifact::Decrypted => {
            let d = expect_decryption(decryption)?;
            canvas.vector("Decrypted", &d.decrypted, Color::Purple, LineStyle::Solid);
            NarrativeItem::new(
                "Decrypted before rounding",
                format!(
                    "ciphertext × U⁻¹ = {} × {}",
                    format::reals(&state.ciphertext),
                    format::real_rows(u_inv)
                ),
                format::reals(&d.decrypted),
            )
        }
        Artifact::Rounded => {
            let d = expect_decryption(decryption)?;
            canvas.vector("Rounded", &d.rounded, Color::Blue, LineStyle::Solid);
            NarrativeItem::new(
                "Babai rounding (error removal)",
                format!(
                    "decrypted − error × U⁻¹ = {} − {} × {} = {} − {}",
                    format::reals(&d.decrypted),
                    format::ints(&state.error),
                    format::real_rows(u_inv),
                    format::reals(&d.decrypted),
                    format::reals(&d.error_term)
                ),
                format::reals(&d.rounded),
            )
        }
        Artifact::Recovered => {
            let d = expect_decryption(decryption)?;
            canvas.vector("Recovered", &matrix::to_real(&d.recovered), Color::Green, LineStyle::Solid);
            canvas.vector("Original", &matrix::to_real(&state.plaintext), Color::Red, LineStyle::Dash);
            NarrativeItem::new(
                "Recovered plaintext",
                format!(
                    "round((rounded × U⁻¹) × U) = round({} × {})",
                    format::reals(&d.temp),
                    format::real_rows(u)
                ),
                format::ints(&d.recovered),
            )
        }
    };

    Ok(item)
}

fn expect_decryption(decryption: Option<&Decryption>) -> Result<&Decryption> {
    decryption.ok_or_else(|| EngineError::InvalidInput("Decryption values requested outside the decrypt phase".into()))
}
