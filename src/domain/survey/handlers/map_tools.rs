//! Tool mapping: which of the collected tools are used in each selected phase.

use serde_json::Value;

use crate::domain::survey::catalog;
use crate::domain::survey::component::{ChoiceOption, UiComponent};
use crate::domain::survey::errors::EngineError;
use crate::domain::survey::result::{Continuation, StepResult};
use crate::domain::survey::state::{ConversationState, IterationKind, IterationState};
use crate::domain::survey::step_id::StepId;

use super::{exit_loop, own_iteration, HandlerContext};

const ANSWER_KEY: &str = "tool_phase_mapping";

pub(super) fn handle(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    let phases = state.selected_phases();
    let tools = state.string_list(StepId::COLLECT_TOOLS);
    if phases.is_empty() || tools.is_empty() {
        return exit_loop(ctx, state.clone());
    }

    let component = UiComponent::multi_select(
        tools.into_iter().map(ChoiceOption::plain).collect(),
        Some(0),
        None,
    );

    let Some(iteration) = own_iteration(state, IterationKind::MapTools) else {
        let mut next_state = state.clone();
        next_state.iteration_state = Some(IterationState::start(phases.len(), IterationKind::MapTools));
        let message = format!(
            "Great list! Now let me understand which tools you use for which phases.\n\n\
             For **{}**, which of these tools do you use?",
            catalog::phase_label(&phases[0])
        );
        return Ok(Continuation::Answer(StepResult::ask(
            ctx.step_id(),
            message,
            Some(component),
            next_state,
        )));
    };

    let index = iteration.current_index;
    let Some(phase_key) = phases.get(index).filter(|_| iteration.is_valid()) else {
        return exit_loop(ctx, state.clone());
    };

    let Some(answer) = answer else {
        return Ok(Continuation::Answer(StepResult::ask(
            ctx.step_id(),
            phase_question(phase_key),
            Some(component),
            state.clone(),
        )));
    };

    let mut next_state = state.clone();
    if let Err(error) = component.validate_answer(answer) {
        next_state.log_validation(ctx.step_id(), Err(&error));
        let result = StepResult::ask(ctx.step_id(), phase_question(phase_key), Some(component), next_state);
        return Ok(Continuation::Answer(result.with_validation_error(&error)));
    }

    next_state.log_validation(ctx.step_id(), Ok(()));
    next_state.record_nested(ANSWER_KEY, phase_key, answer.clone());

    let next_index = index + 1;
    if next_index >= phases.len() {
        return exit_loop(ctx, next_state);
    }

    next_state.iteration_state = Some(IterationState {
        current_index: next_index,
        total_phases: phases.len(),
        iteration_type: Some(IterationKind::MapTools),
    });
    Ok(Continuation::Answer(StepResult::ask(
        ctx.step_id(),
        phase_question(&phases[next_index]),
        Some(component),
        next_state,
    )))
}

fn phase_question(phase_key: &str) -> String {
    format!(
        "Great! Now for **{}**, which of these tools do you use?",
        catalog::phase_label(phase_key)
    )
}
