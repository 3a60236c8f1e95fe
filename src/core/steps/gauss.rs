// src/core/steps/gauss.rs
use crate::{
    core::{
        crypto::{matrix, types::GaussState},
        steps::{
            format,
            phases::PhaseTable,
            render::{Canvas, Color, LineStyle, NarrativeItem, StepView},
        },
    },
    utils::error::Result,
};

pub fn phase_table() -> PhaseTable {
    PhaseTable::sequential(&[("input", 1), ("reduce", 1), ("result", 1)])
}

pub fn max_steps() -> usize {
    phase_table().max_step()
}

pub fn process_step(step: usize, state: &GaussState) -> Result<StepView> {
    let table = phase_table();
    table.check_step(step)?;
    state.validate()?;

    let mut canvas = Canvas::for_dimension(state.dimension);
    let mut view = StepView {
        algorithm: "Gauss Reduction".to_string(),
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

    let basis = state.basis.to_real();
    match position.phase.name.as_str() {
        "input" => {
            canvas.matrix("Input basis", basis.rows(), Color::Gray, LineStyle::Solid);
            view.narrative.push(NarrativeItem::new(
                "Input basis",
                "(v1, v2)",
                format::int_rows(state.basis.rows()),
            ));
            view.revealed.push("basis".to_string());
        }
        "reduce" => {
            canvas.matrix("Input basis", basis.rows(), Color::Gray, LineStyle::Dash);
            for (i, iteration) in state.iterations.iter().enumerate() {
                let label = format!("Iteration {}", i + 1);
                canvas.vector(&label, &matrix::to_real(&iteration.v2), Color::Orange, LineStyle::Dot);
                view.narrative.push(NarrativeItem::new(
                    label,
                    format!(
                        "m = round(⟨{0}, {1}⟩ / ⟨{0}, {0}⟩)",
                        format::ints(&iteration.v1),
                        format::ints(&iteration.v2)
                    ),
                    format!("m = {}", iteration.m),
                ));
            }
            view.revealed.push("iterations".to_string());
        }
        _ => {
            canvas.matrix("Input basis", basis.rows(), Color::Gray, LineStyle::Dash);
            canvas.matrix("Reduced basis", state.reduced.to_real().rows(), Color::Blue, LineStyle::Solid);
            view.narrative.push(NarrativeItem::new(
                "Reduced basis",
                format!("reduced after {} iterations", state.iterations.len()),
                format::int_rows(state.reduced.rows()),
            ));
            view.revealed.push("reduced".to_string());
        }
    }

    view.phase = Some(position.phase.name.clone());
    view.payload = canvas.finish();
    Ok(view)
}
