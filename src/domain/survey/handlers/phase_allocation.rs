//! Phase time allocation: a percentage table over the selected phases.

use serde_json::Value;

use crate::domain::survey::catalog;
use crate::domain::survey::component::{number_of, PercentageItem, UiComponent};
use crate::domain::survey::errors::EngineError;
use crate::domain::survey::result::{Continuation, StepResult};
use crate::domain::survey::state::ConversationState;
use crate::domain::survey::step_id::StepId;

use super::HandlerContext;

const PROMPT: &str = "Perfect! Now, thinking about a typical week, what percentage of your time \
goes to each of these phases?\n\n(Should add up to 100%)";

pub(super) fn handle(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    let phases = state.selected_phases();
    if phases.is_empty() {
        return Ok(Continuation::redirect(ctx.successor()?, state.clone()));
    }

    let table = allocation_table(&phases);
    let step_id = ctx.step_id();

    let Some(answer) = answer else {
        return Ok(Continuation::Answer(StepResult::ask(
            step_id,
            PROMPT,
            Some(table),
            state.clone(),
        )));
    };

    let mut next_state = state.clone();
    if let Err(error) = table.validate_answer(answer) {
        next_state.log_validation(step_id, Err(&error));
        let result = StepResult::ask(step_id, PROMPT, Some(table), next_state);
        return Ok(Continuation::Answer(result.with_validation_error(&error)));
    }

    next_state.log_validation(step_id, Ok(()));
    next_state.record(step_id.as_str(), answer.clone());
    Ok(Continuation::redirect(ctx.successor()?, next_state))
}

fn allocation_table(phases: &[String]) -> UiComponent {
    let items = phases
        .iter()
        .map(|key| match catalog::phase_by_value(key) {
            Some(phase) => PercentageItem {
                label: phase.label.to_string(),
                key: phase.value.to_string(),
                description: Some(phase.description.to_string()),
            },
            None => PercentageItem {
                label: key.clone(),
                key: key.clone(),
                description: None,
            },
        })
        .collect();
    UiComponent::percentage_table(items)
}

/// Share of time the respondent gave `phase_key` in the allocation answer.
///
/// Array answers are keyed by phase label (or key); object answers by key.
pub(crate) fn allocated_share(state: &ConversationState, phase_key: &str) -> f64 {
    let label = catalog::phase_label(phase_key);
    let matches = |name: &str| name == phase_key || name == label;

    match state.collected(StepId::PHASE_TIME_ALLOCATION) {
        Some(Value::Array(items)) => items
            .iter()
            .find(|item| {
                ["phase", "key", "label"]
                    .iter()
                    .filter_map(|field| item.get(*field).and_then(Value::as_str))
                    .any(|name| matches(name))
            })
            .and_then(|item| item.get("percentage"))
            .and_then(number_of)
            .unwrap_or(0.0),
        Some(Value::Object(map)) => map
            .iter()
            .find(|(name, _)| matches(name.as_str()))
            .and_then(|(_, value)| number_of(value))
            .unwrap_or(0.0),
        _ => 0.0,
    }
}
