//! Progress calculation.
//!
//! Static steps read a hand-tuned table whose values increase along the
//! natural step order. Iterative steps interpolate inside their phase band
//! so progress moves on every loop turn instead of once per phase.

use crate::domain::foundation::Percentage;

use super::phase::SurveyPhase;
use super::state::IterationState;
use super::step_id::StepId;

const STEP_PROGRESS: &[(&str, u8)] = &[
    (StepId::INTRO, 5),
    (StepId::GREETING_AGENCY, 10),
    (StepId::DEPARTMENT, 15),
    (StepId::ROLE, 20),
    (StepId::JOB_LEVEL, 25),
    (StepId::WORK_TYPE_DISTRIBUTION, 30),
    (StepId::PRIMARY_FOCUS, 35),
    (StepId::PHASE_OVERVIEW_INTRO, 36),
    (StepId::PHASE_SELECTION, 40),
    (StepId::PHASE_TIME_ALLOCATION, 45),
    (StepId::DEEP_DIVE_START, 55),
    (StepId::COLLECT_TOOLS, 65),
    (StepId::MAP_TOOLS_START, 70),
    (StepId::AI_INTEGRATION, 72),
    (StepId::AI_TOOLS_DETAILS, 74),
    (StepId::TIME_WASTERS, 80),
    (StepId::COLLABORATION_FRICTION, 84),
    (StepId::AUTOMATION_IDENTIFICATION, 87),
    (StepId::MAGIC_WAND_AUTOMATION, 90),
    (StepId::QUICK_RECAP, 95),
    (StepId::COMPLETE, 100),
];

const ITERATIVE_STEPS: &[&str] = &[StepId::DEEP_DIVE_START, StepId::MAP_TOOLS_START];

fn table_value(step_id: &str) -> Option<u8> {
    STEP_PROGRESS
        .iter()
        .find(|(id, _)| *id == step_id)
        .map(|(_, value)| *value)
}

/// Computes overall survey progress for the step about to be shown.
pub fn progress(phase: SurveyPhase, step_id: &str, iteration: Option<&IterationState>) -> Percentage {
    if step_id == StepId::COMPLETE {
        return Percentage::HUNDRED;
    }

    let is_iterative = ITERATIVE_STEPS.contains(&step_id);
    if !is_iterative {
        if let Some(value) = table_value(step_id) {
            return Percentage::new(value);
        }
    }

    let Some((start, end)) = phase.band() else {
        return Percentage::ZERO;
    };
    let (start, end) = (f64::from(start), f64::from(end));

    match iteration {
        Some(it) if is_iterative && it.total_phases > 0 => {
            let position = (it.current_index + 1).min(it.total_phases) as f64;
            let fraction = position / it.total_phases as f64;
            Percentage::from_rounded(start + fraction * (end - start))
        }
        _ => Percentage::from_rounded((start + end) / 2.0),
    }
}
