//! Deep dive: one activity-breakdown question per selected phase.
//!
//! Answers land in `phase_activities[phase_key]`. The loop runs exactly once
//! per selected phase and then falls through to the step after it.

use serde_json::Value;

use crate::domain::survey::catalog;
use crate::domain::survey::component::{InputProps, InputType, PercentageItem, UiComponent};
use crate::domain::survey::errors::EngineError;
use crate::domain::survey::result::{Continuation, StepResult};
use crate::domain::survey::state::{ConversationState, IterationKind, IterationState};

use super::phase_allocation::allocated_share;
use super::{exit_loop, own_iteration, HandlerContext};

const ANSWER_KEY: &str = "phase_activities";

pub(super) fn handle(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    let phases = state.selected_phases();
    if phases.is_empty() {
        return exit_loop(ctx, state.clone());
    }

    let iteration = match own_iteration(state, IterationKind::DeepDive) {
        Some(it) => it,
        None => {
            let mut next_state = state.clone();
            next_state.iteration_state = Some(IterationState::start(phases.len(), IterationKind::DeepDive));
            return Ok(ask(ctx, &phases, 0, None, next_state));
        }
    };

    let index = iteration.current_index;
    let Some(phase_key) = phases.get(index).filter(|_| iteration.is_valid()) else {
        return exit_loop(ctx, state.clone());
    };

    let Some(answer) = answer else {
        return Ok(ask(ctx, &phases, index, None, state.clone()));
    };

    let mut next_state = state.clone();
    if let Err(error) = question_for(phase_key).validate_answer(answer) {
        next_state.log_validation(ctx.step_id(), Err(&error));
        let result = question(ctx, &phases, index, None, next_state).with_validation_error(&error);
        return Ok(Continuation::Answer(result));
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
        iteration_type: Some(IterationKind::DeepDive),
    });
    Ok(ask(ctx, &phases, next_index, Some(phase_key.as_str()), next_state))
}

fn ask(
    ctx: &HandlerContext<'_>,
    phases: &[String],
    index: usize,
    finished: Option<&str>,
    state: ConversationState,
) -> Continuation {
    Continuation::Answer(question(ctx, phases, index, finished, state))
}

fn question(
    ctx: &HandlerContext<'_>,
    phases: &[String],
    index: usize,
    finished: Option<&str>,
    state: ConversationState,
) -> StepResult {
    let phase_key = phases[index].as_str();
    let name = catalog::phase_label(phase_key);
    let share = allocated_share(&state, phase_key);

    let message = match finished {
        Some(previous) => format!(
            "Great! That covers {}.\n\nNow let's dive into **{}** (you spend {}% of your time here).\n\n\
             What percentage of time within {} goes to each of these activities?",
            catalog::phase_label(previous),
            name,
            share,
            name
        ),
        None => format!(
            "Let's dive into **{}** now (you said {}% of your time).\n\n\
             Within {}, what percentage of time goes to each of these activities?",
            name, share, name
        ),
    };

    StepResult::ask(ctx.step_id(), message, Some(question_for(phase_key)), state)
}

/// Activity table for a phase. Phases without catalog activities get a
/// free-text question instead of an empty table.
fn question_for(phase_key: &str) -> UiComponent {
    let activities = catalog::activities_for(phase_key);
    if activities.is_empty() {
        return UiComponent::Input(InputProps {
            placeholder: Some("Describe the main activities in this phase".to_string()),
            input_type: InputType::Text,
            multiline: true,
        });
    }

    UiComponent::percentage_table(
        activities
            .iter()
            .map(|a| PercentageItem {
                label: a.name.to_string(),
                key: catalog::activity_key(a.name),
                description: None,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockContentGenerator;
    use crate::domain::survey::handlers::test_support::*;
    use crate::domain::survey::registry::StepRegistry;
    use proptest::prelude::*;
    use serde_json::json;

    fn full_breakdown(phase_key: &str) -> Value {
        let activities = catalog::activities_for(phase_key);
        let mut map = serde_json::Map::new();
        for (i, activity) in activities.iter().enumerate() {
            let value = if i == 0 { 100 } else { 0 };
            map.insert(catalog::activity_key(activity.name), json!(value));
        }
        Value::Object(map)
    }

    fn selected(phases: &[&str]) -> ConversationState {
        let mut state = ConversationState::new();
        state.record("phase_selection", json!(phases));
        state
    }

    #[test]
    fn first_call_starts_the_loop() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new();
        let ctx = context("deep_dive_start", &registry, &generator);
        let mut state = selected(&["delivery", "governance"]);
        state.record(
            "phase_time_allocation",
            json!([{"phase": "DELIVERY & EXECUTION", "percentage": 60}]),
        );

        let result = answer_of(handle(&ctx, None, &state).unwrap());

        let it = result.updated_state.iteration_state.unwrap();
        assert_eq!((it.current_index, it.total_phases), (0, 2));
        assert_eq!(it.iteration_type, Some(IterationKind::DeepDive));
        assert!(result.assistant_message.contains("DELIVERY & EXECUTION"));
        assert!(result.assistant_message.contains("60%"));
        assert!(matches!(result.ui_component, Some(UiComponent::PercentageTable(_))));
    }

    #[test]
    fn empty_selection_falls_through_immediately() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new();
        let ctx = context("deep_dive_start", &registry, &generator);

        let (next, state) = redirect_of(handle(&ctx, None, &ConversationState::new()).unwrap());

        assert_eq!(next, "collect_tools");
        assert!(state.iteration_state.is_none());
    }

    #[test]
    fn answer_is_stored_per_phase_and_loop_advances() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new();
        let ctx = context("deep_dive_start", &registry, &generator);
        let state = selected(&["delivery", "governance"]);

        let first = answer_of(handle(&ctx, None, &state).unwrap()).updated_state;
        let answer = full_breakdown("delivery");
        let second = answer_of(handle(&ctx, Some(&answer), &first).unwrap());

        assert_eq!(second.updated_state.iteration_state.unwrap().current_index, 1);
        assert_eq!(
            second.updated_state.collected("phase_activities").unwrap()["delivery"],
            answer
        );
        assert!(second.assistant_message.starts_with("Great! That covers DELIVERY & EXECUTION."));
    }

    #[test]
    fn invalid_breakdown_repeats_the_same_phase() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new();
        let ctx = context("deep_dive_start", &registry, &generator);
        let state = selected(&["delivery"]);

        let first = answer_of(handle(&ctx, None, &state).unwrap()).updated_state;
        let result = answer_of(handle(&ctx, Some(&json!({"testing_qa": 50})), &first).unwrap());

        assert!(result.validation_error.is_some());
        assert_eq!(result.updated_state.iteration_state.unwrap().current_index, 0);
        assert!(result.updated_state.collected("phase_activities").is_none());
    }

    #[test]
    fn foreign_loop_state_restarts_the_deep_dive() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new();
        let ctx = context("deep_dive_start", &registry, &generator);
        let mut state = selected(&["delivery", "closure"]);
        state.iteration_state = Some(IterationState {
            current_index: 1,
            total_phases: 2,
            iteration_type: Some(IterationKind::MapTools),
        });

        let result = answer_of(handle(&ctx, Some(&json!("stale")), &state).unwrap());

        let it = result.updated_state.iteration_state.unwrap();
        assert_eq!(it.current_index, 0);
        assert_eq!(it.iteration_type, Some(IterationKind::DeepDive));
    }

    #[test]
    fn exhausted_index_leaves_the_loop() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new();
        let ctx = context("deep_dive_start", &registry, &generator);
        let mut state = selected(&["delivery", "closure"]);
        state.iteration_state = Some(IterationState {
            current_index: 2,
            total_phases: 2,
            iteration_type: None,
        });

        let (next, done) = redirect_of(handle(&ctx, Some(&json!({})), &state).unwrap());

        assert_eq!(next, "collect_tools");
        assert!(done.iteration_state.is_none());
        assert!(done.collected("phase_activities").is_none());
    }

    #[test]
    fn phase_without_catalog_activities_asks_free_text() {
        assert!(matches!(question_for("custom_phase"), UiComponent::Input(_)));
    }

    proptest! {
        #[test]
        fn loop_ends_after_exactly_one_answer_per_phase(count in 1usize..=5) {
            let registry = StepRegistry::shared();
            let generator = MockContentGenerator::new();
            let ctx = context("deep_dive_start", &registry, &generator);
            let phases: Vec<&str> = catalog::WORKFLOW_PHASES.iter().take(count).map(|p| p.value).collect();

            let mut state = answer_of(handle(&ctx, None, &selected(&phases)).unwrap()).updated_state;
            for (turn, phase) in phases.iter().enumerate() {
                let answer = full_breakdown(phase);
                match handle(&ctx, Some(&answer), &state).unwrap() {
                    Continuation::Answer(result) => {
                        prop_assert!(turn + 1 < count, "loop kept asking after {} answers", turn + 1);
                        prop_assert!(result.validation_error.is_none());
                        state = result.updated_state;
                    }
                    Continuation::Redirect { next, state: exit } => {
                        prop_assert_eq!(turn + 1, count);
                        prop_assert_eq!(next.as_str(), "collect_tools");
                        prop_assert!(exit.iteration_state.is_none());
                        let recorded = exit.collected("phase_activities").unwrap().as_object().unwrap().len();
                        prop_assert_eq!(recorded, count);
                        return Ok(());
                    }
                }
            }
            prop_assert!(false, "loop never exited");
        }
    }
}
