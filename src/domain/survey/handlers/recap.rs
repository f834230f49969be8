//! Recap: summarize the interview and close it.
//!
//! "adjust" has no edit flow of its own; it completes the survey exactly
//! like "confirmed", and the chosen value is kept in `recap_confirmation`.

use serde_json::Value;

use crate::domain::survey::catalog;
use crate::domain::survey::component::{require_present, ChoiceOption, UiComponent};
use crate::domain::survey::errors::EngineError;
use crate::domain::survey::result::{Continuation, StepResult};
use crate::domain::survey::state::ConversationState;
use crate::domain::survey::step_id::StepId;

use super::HandlerContext;

const ANSWER_KEY: &str = "recap_confirmation";
const NOT_SPECIFIED: &str = "not specified";

const MAX_PHASES: usize = 3;
const MAX_TOOLS: usize = 5;
const MAX_PAIN_POINTS: usize = 3;

pub(super) fn handle(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    let Some(answer) = answer else {
        return Ok(Continuation::Answer(StepResult::ask(
            ctx.step_id(),
            summary(state),
            Some(confirmation()),
            state.clone(),
        )));
    };

    let mut next_state = state.clone();
    if let Err(error) = require_present(answer) {
        next_state.log_validation(ctx.step_id(), Err(&error));
        let result = StepResult::ask(ctx.step_id(), summary(state), Some(confirmation()), next_state);
        return Ok(Continuation::Answer(result.with_validation_error(&error)));
    }

    next_state.log_validation(ctx.step_id(), Ok(()));
    next_state.record(ANSWER_KEY, answer.clone());
    Ok(Continuation::redirect(&StepId::complete(), next_state))
}

fn confirmation() -> UiComponent {
    UiComponent::buttons(
        vec![
            ChoiceOption::new("Yes, that's correct", "confirmed"),
            ChoiceOption::new("Need to adjust something", "adjust"),
        ],
        2,
    )
}

fn first(items: Vec<String>, limit: usize) -> String {
    if items.is_empty() {
        return NOT_SPECIFIED.to_string();
    }
    items.into_iter().take(limit).collect::<Vec<_>>().join(", ")
}

fn summary(state: &ConversationState) -> String {
    let agency = state
        .display_value(StepId::GREETING_AGENCY)
        .unwrap_or_else(|| "your agency".to_string());
    let department = state
        .display_value(StepId::DEPARTMENT)
        .unwrap_or_else(|| "your department".to_string());
    let role = state
        .display_value(StepId::ROLE)
        .unwrap_or_else(|| "your role".to_string());

    let phases = state
        .selected_phases()
        .iter()
        .map(|key| catalog::phase_label(key).to_string())
        .collect();

    format!(
        "Perfect! Let me quickly recap to make sure I captured everything correctly:\n\n\
         • **Agency:** {}\n\
         • **Department:** {}\n\
         • **Role:** {}\n\
         • **Main Phases:** {}\n\
         • **Top Tools:** {}\n\
         • **Key Pain Points:** {}\n\n\
         Does that sound right?",
        agency,
        department,
        role,
        first(phases, MAX_PHASES),
        first(state.string_list(StepId::COLLECT_TOOLS), MAX_TOOLS),
        first(state.string_list(StepId::TIME_WASTERS), MAX_PAIN_POINTS),
    )
}
