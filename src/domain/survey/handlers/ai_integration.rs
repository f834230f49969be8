//! AI usage question. The only step whose successor depends on the answer.

use serde_json::Value;

use crate::domain::survey::errors::{ConfigurationError, EngineError};
use crate::domain::survey::result::{Continuation, StepResult};
use crate::domain::survey::state::ConversationState;
use crate::domain::survey::step_id::StepId;

use super::HandlerContext;

pub(super) const ROUTES: &[&str] = &[StepId::AI_TOOLS_DETAILS, StepId::TIME_WASTERS];

/// Answers that send the respondent to the AI tools follow-up.
const USES_AI: &[&str] = &["active", "experimental"];

pub(super) fn handle(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    let definition = ctx.definition;
    let (Some(prompt), Some(component)) = (&definition.prompt, &definition.ui_component) else {
        return Err(ConfigurationError::IncompleteStep(definition.id.to_string()).into());
    };

    let Some(answer) = answer else {
        return Ok(Continuation::Answer(StepResult::ask(
            ctx.step_id(),
            prompt.as_str(),
            Some(component.clone()),
            state.clone(),
        )));
    };

    let mut next_state = state.clone();
    if let Err(error) = component.validate_answer(answer) {
        next_state.log_validation(ctx.step_id(), Err(&error));
        let result = StepResult::ask(ctx.step_id(), prompt.as_str(), Some(component.clone()), next_state);
        return Ok(Continuation::Answer(result.with_validation_error(&error)));
    }

    next_state.log_validation(ctx.step_id(), Ok(()));
    next_state.record(ctx.step_id().as_str(), answer.clone());

    let next = if uses_ai(answer) {
        StepId::AI_TOOLS_DETAILS
    } else {
        StepId::TIME_WASTERS
    };
    Ok(Continuation::redirect(&StepId::new(next), next_state))
}

fn uses_ai(answer: &Value) -> bool {
    let value = match answer {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("value").and_then(Value::as_str),
        _ => None,
    };
    value.map(|v| USES_AI.contains(&v)).unwrap_or(false)
}
