//! Step Processor - resolves one survey turn.
//!
//! A turn starts at the step the client echoed back, optionally with an
//! answer. Static steps are handled here; dynamic and iterative steps go to
//! their handler. Whatever runs returns a [`Continuation`]: either the
//! result to show, or a redirect to another step which this loop resolves
//! within the same turn (with no answer). Redirects are bounded so a cycle
//! in the graph surfaces as a configuration error instead of spinning.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::ports::ContentGenerator;

use super::definition::{StepDefinition, StepKind};
use super::errors::{ConfigurationError, EngineError, ValidationError};
use super::handlers::{dispatch, HandlerContext, HandlerKind};
use super::phase::SurveyPhase;
use super::progress::progress;
use super::registry::StepRegistry;
use super::result::{Continuation, StepResult};
use super::state::{answer_of, ConversationState};
use super::step_id::StepId;

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(45);

/// Upper bound on fall-throughs within one turn. The longest legitimate
/// chain in the standard graph is three.
pub const DEFAULT_MAX_REDIRECTS: usize = 8;

/// How the processor reached a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// The client submitted a turn for this step.
    Turn,
    /// Another step fell through to this one.
    Redirect,
}

pub struct StepProcessor {
    registry: Arc<StepRegistry>,
    generator: Arc<dyn ContentGenerator>,
    generation_timeout: Duration,
    max_redirects: usize,
}

impl StepProcessor {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            registry: StepRegistry::shared(),
            generator,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    pub fn with_registry(mut self, registry: Arc<StepRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Shows the first step of a fresh interview.
    pub async fn start(&self) -> Result<StepResult, EngineError> {
        self.run(StepId::intro(), None, ConversationState::new(), Entry::Redirect)
            .await
    }

    /// Processes one turn.
    ///
    /// `user_response` of `None`, `null` or the auto-continue sentinel means
    /// the client has no answer for `step_id`. The caller's state is never
    /// modified; on error it is still the valid state for a retry.
    pub async fn process(
        &self,
        step_id: &str,
        user_response: Option<&Value>,
        state: &ConversationState,
    ) -> Result<StepResult, EngineError> {
        let answer = answer_of(user_response).cloned();
        self.run(StepId::new(step_id), answer, state.clone(), Entry::Turn)
            .await
    }

    async fn run(
        &self,
        mut step_id: StepId,
        mut answer: Option<Value>,
        mut state: ConversationState,
        mut entry: Entry,
    ) -> Result<StepResult, EngineError> {
        let mut redirects = 0;

        loop {
            let definition = self.registry.lookup(step_id.as_str())?;
            let continuation = self
                .run_step(definition, answer.as_ref(), &state, entry)
                .await?;

            match continuation {
                Continuation::Answer(result) => {
                    let result = self.finish(result);
                    info!(
                        from = %definition.id,
                        next_step = %result.next_step_id,
                        progress = %result.progress,
                        redirects,
                        rejected = result.validation_error.is_some(),
                        "Survey turn processed"
                    );
                    return Ok(result);
                }
                Continuation::Redirect { next, state: next_state } => {
                    if !self.registry.contains(next.as_str()) {
                        return Err(ConfigurationError::MissingTransition {
                            from: step_id.to_string(),
                            to: next.to_string(),
                        }
                        .into());
                    }

                    redirects += 1;
                    if redirects > self.max_redirects {
                        return Err(ConfigurationError::RedirectLimitExceeded {
                            step_id: next.to_string(),
                            limit: self.max_redirects,
                        }
                        .into());
                    }

                    debug!(from = %step_id, to = %next, "Falling through to next step");
                    step_id = next;
                    answer = None;
                    state = next_state;
                    entry = Entry::Redirect;
                }
            }
        }
    }

    async fn run_step(
        &self,
        definition: &StepDefinition,
        answer: Option<&Value>,
        state: &ConversationState,
        entry: Entry,
    ) -> Result<Continuation, EngineError> {
        match definition.kind {
            StepKind::Static => static_step(definition, answer, state, entry),
            StepKind::Dynamic | StepKind::Iterative => {
                let name = definition
                    .handler_name
                    .as_deref()
                    .ok_or_else(|| ConfigurationError::MissingHandler(definition.id.to_string()))?;
                let kind = HandlerKind::from_name(name).ok_or_else(|| ConfigurationError::UnknownHandler {
                    step_id: definition.id.to_string(),
                    handler: name.to_string(),
                })?;

                let ctx = HandlerContext::new(
                    definition,
                    &self.registry,
                    self.generator.as_ref(),
                    self.generation_timeout,
                );
                dispatch(kind, &ctx, answer, state).await
            }
        }
    }

    /// Final touches on a result about to be shown: backfill content from a
    /// static target, sync phase and step, attach progress.
    fn finish(&self, mut result: StepResult) -> StepResult {
        if result.ui_component.is_none() {
            if let Ok(target) = self.registry.lookup(result.next_step_id.as_str()) {
                if target.is_static() {
                    result.ui_component = target.ui_component.clone();
                    if result.assistant_message.trim().is_empty() {
                        result.assistant_message = target.prompt.clone().unwrap_or_default();
                    }
                }
            }
        }

        let step = result.next_step_id.clone();
        let phase = SurveyPhase::phase_of(step.as_str());
        result.updated_state.current_step = step.clone();
        result.updated_state.current_phase = Some(phase);
        result.is_complete = step.is_complete();
        result.progress = progress(phase, step.as_str(), result.updated_state.iteration_state.as_ref());
        result
    }
}

/// Static steps show their fixed content, and on a client turn validate and
/// record the answer before moving to the successor.
fn static_step(
    definition: &StepDefinition,
    answer: Option<&Value>,
    state: &ConversationState,
    entry: Entry,
) -> Result<Continuation, EngineError> {
    let (Some(prompt), Some(component)) = (&definition.prompt, &definition.ui_component) else {
        return Err(ConfigurationError::IncompleteStep(definition.id.to_string()).into());
    };
    let show = |state: ConversationState| {
        StepResult::ask(&definition.id, prompt.as_str(), Some(component.clone()), state)
    };

    if entry == Entry::Redirect || definition.is_terminal() {
        return Ok(Continuation::Answer(show(state.clone())));
    }

    let successor = definition
        .next_step
        .as_ref()
        .ok_or_else(|| ConfigurationError::MissingSuccessor(definition.id.to_string()))?;

    let mut next_state = state.clone();
    let outcome = match answer {
        // Nothing to record; informational steps just need to be passed.
        None if component.is_informational() => return Ok(Continuation::redirect(successor, next_state)),
        None => Err(ValidationError::Required),
        Some(answer) => component.validate_answer(answer).map(|()| answer),
    };

    match outcome {
        Ok(answer) => {
            next_state.log_validation(&definition.id, Ok(()));
            next_state.record(definition.id.as_str(), answer.clone());
            Ok(Continuation::redirect(successor, next_state))
        }
        Err(error) => {
            debug!(step_id = %definition.id, %error, "Rejected answer");
            next_state.log_validation(&definition.id, Err(&error));
            Ok(Continuation::Answer(show(next_state).with_validation_error(&error)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockContentGenerator, MockError};
    use crate::domain::survey::catalog;
    use crate::domain::survey::errors::GenerationError;
    use crate::domain::survey::registry::RegistryOptions;
    use crate::domain::survey::state::IterationState;
    use crate::domain::survey::UiComponent;
    use serde_json::json;

    fn generated(message: &str) -> Value {
        json!({
            "assistantMessage": message,
            "component": {"type": "input", "props": {"placeholder": "Type here"}}
        })
    }

    fn processor(generator: MockContentGenerator) -> (StepProcessor, Arc<MockContentGenerator>) {
        let generator = Arc::new(generator);
        (StepProcessor::new(generator.clone()), generator)
    }

    fn at(step: &str) -> ConversationState {
        let mut state = ConversationState::new();
        state.current_step = StepId::new(step);
        state
    }

    #[tokio::test]
    async fn start_shows_intro() {
        let (processor, _) = processor(MockContentGenerator::new());

        let result = processor.start().await.unwrap();

        assert_eq!(result.next_step_id, "intro");
        assert!(matches!(result.ui_component, Some(UiComponent::InfoMessage(_))));
        assert_eq!(result.updated_state.current_phase, Some(SurveyPhase::Intro));
        assert_eq!(result.progress.value(), 5);
        assert!(!result.is_complete);
    }

    #[tokio::test]
    async fn acknowledging_intro_shows_agency_question() {
        let (processor, _) = processor(MockContentGenerator::new());

        let result = processor
            .process("intro", Some(&json!("_auto_continue_")), &ConversationState::new())
            .await
            .unwrap();

        assert_eq!(result.next_step_id, "greeting_agency");
        assert_eq!(result.assistant_message, "Which agency do you work for?");
        assert_eq!(result.updated_state.current_phase, Some(SurveyPhase::Introduction));
        assert!(result.updated_state.collected_data.is_empty());
    }

    #[tokio::test]
    async fn static_answer_chains_into_generated_question() {
        let (processor, generator) =
            processor(MockContentGenerator::new().with_json(generated("Which role fits you best?")));

        let result = processor
            .process("department", Some(&json!("Engineering")), &at("department"))
            .await
            .unwrap();

        assert_eq!(result.next_step_id, "role");
        assert_eq!(result.assistant_message, "Which role fits you best?");
        assert_eq!(result.updated_state.collected("department"), Some(&json!("Engineering")));
        assert_eq!(result.progress.value(), 20);
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.get_calls()[0].step_id, "role");
    }

    #[tokio::test]
    async fn static_answer_before_static_step_shows_it_directly() {
        let (processor, generator) = processor(MockContentGenerator::new());
        let answer = json!({"billable": 50, "business_dev": 20, "internal_ops": 30});

        let result = processor
            .process("work_type_distribution", Some(&answer), &at("work_type_distribution"))
            .await
            .unwrap();

        assert_eq!(result.next_step_id, "primary_focus");
        assert_eq!(result.assistant_message, "Would you describe your work as primarily:");
        assert_eq!(result.updated_state.collected("work_type_distribution"), Some(&answer));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_static_answer_repeats_step() {
        let (processor, _) = processor(MockContentGenerator::new());
        let state = at("phase_selection");

        let result = processor
            .process("phase_selection", Some(&json!([])), &state)
            .await
            .unwrap();

        assert_eq!(result.next_step_id, "phase_selection");
        assert!(result.validation_error.is_some());
        assert_eq!(result.updated_state.collected_data, state.collected_data);
        let last = result.updated_state.validation_history.last().unwrap();
        assert!(!last.validated);
    }

    #[tokio::test]
    async fn missing_answer_on_question_step_is_required() {
        let (processor, _) = processor(MockContentGenerator::new());

        let result = processor
            .process("job_level", None, &at("job_level"))
            .await
            .unwrap();

        assert_eq!(result.next_step_id, "job_level");
        assert_eq!(result.validation_error.as_deref(), Some("Please provide an answer"));
    }

    #[tokio::test]
    async fn ai_usage_routes_on_answer() {
        let (processor, generator) =
            processor(MockContentGenerator::new().with_json(generated("What wastes your time?")));

        let active = processor
            .process("ai_integration", Some(&json!("active")), &at("ai_integration"))
            .await
            .unwrap();
        assert_eq!(active.next_step_id, "ai_tools_details");
        assert!(matches!(active.ui_component, Some(UiComponent::SmartMultiSelect(_))));
        assert_eq!(generator.call_count(), 0);

        let no = processor
            .process("ai_integration", Some(&json!("no")), &at("ai_integration"))
            .await
            .unwrap();
        assert_eq!(no.next_step_id, "time_wasters");
        assert_eq!(no.assistant_message, "What wastes your time?");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn generation_failure_leaves_state_untouched() {
        let (processor, _) = processor(MockContentGenerator::new().with_error(MockError::Unavailable {
            message: "upstream down".into(),
        }));
        let mut state = at("department");
        state.record("greeting_agency", json!("MSQ"));
        let before = state.clone();

        let err = processor
            .process("department", Some(&json!("Engineering")), &state)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Generation(GenerationError::Unavailable(_))));
        assert!(err.is_retryable());
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn unknown_step_is_a_configuration_error() {
        let (processor, _) = processor(MockContentGenerator::new());

        let err = processor
            .process("nope", None, &ConversationState::new())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::Configuration(ConfigurationError::UnknownStep("nope".into()))
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn redirect_chain_is_bounded() {
        let (processor, _) = processor(MockContentGenerator::new());
        let processor = processor.with_max_redirects(1);

        // No phases selected: allocation -> deep dive -> collect_tools.
        let err = processor
            .process("phase_time_allocation", None, &at("phase_time_allocation"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Configuration(ConfigurationError::RedirectLimitExceeded { limit: 1, .. })
        ));
    }

    #[tokio::test]
    async fn replayed_turn_records_the_same_value() {
        let (processor, _) = processor(MockContentGenerator::new());
        let state = at("job_level");

        let first = processor
            .process("job_level", Some(&json!("Senior")), &state)
            .await
            .unwrap();
        let second = processor
            .process("job_level", Some(&json!("Senior")), &state)
            .await
            .unwrap();

        assert_eq!(
            first.updated_state.collected_data,
            second.updated_state.collected_data
        );
    }

    #[tokio::test]
    async fn recap_confirmation_completes_the_survey() {
        let (processor, _) = processor(MockContentGenerator::new());

        let result = processor
            .process("quick_recap", Some(&json!("confirmed")), &at("quick_recap"))
            .await
            .unwrap();

        assert!(result.is_complete);
        assert!(result.updated_state.is_complete());
        assert_eq!(result.progress.value(), 100);
        assert_eq!(result.updated_state.current_phase, Some(SurveyPhase::Validation));

        let again = processor
            .process("complete", Some(&json!("anything")), &result.updated_state)
            .await
            .unwrap();
        assert!(again.is_complete);
        assert_eq!(again.updated_state.collected_data, result.updated_state.collected_data);
    }

    #[tokio::test]
    async fn tool_mapping_loop_runs_when_enabled() {
        let generator = Arc::new(MockContentGenerator::new());
        let processor = StepProcessor::new(generator.clone()).with_registry(Arc::new(
            StepRegistry::standard(RegistryOptions {
                tool_phase_mapping: true,
            }),
        ));
        let mut state = at("collect_tools");
        state.record("phase_selection", json!(["delivery"]));

        let result = processor
            .process("collect_tools", Some(&json!(["Figma", "Jira"])), &state)
            .await
            .unwrap();

        assert_eq!(result.next_step_id, "map_tools_start");
        assert!(matches!(result.ui_component, Some(UiComponent::MultiSelect(_))));
        assert!(result.updated_state.iteration_state.is_some());
    }

    fn breakdown(phase_key: &str) -> Value {
        let mut map = serde_json::Map::new();
        for (i, activity) in catalog::activities_for(phase_key).iter().enumerate() {
            map.insert(catalog::activity_key(activity.name), json!(if i == 0 { 100 } else { 0 }));
        }
        Value::Object(map)
    }

    #[tokio::test]
    async fn deep_dive_advances_with_untyped_iteration_state() {
        let (processor, _) =
            processor(MockContentGenerator::new().with_json(generated("Which tools do you use?")));
        let phases = ["delivery", "governance", "closure"];
        let mut state = at("deep_dive_start");
        state.record("phase_selection", json!(phases));
        state.iteration_state = Some(IterationState {
            current_index: 0,
            total_phases: phases.len(),
            iteration_type: None,
        });

        for (turn, phase) in phases.iter().enumerate() {
            let result = processor
                .process("deep_dive_start", Some(&breakdown(phase)), &state)
                .await
                .unwrap();
            assert!(result.validation_error.is_none());
            state = result.updated_state;
            assert_eq!(
                state.collected("phase_activities").unwrap()[*phase],
                breakdown(phase)
            );

            if turn + 1 < phases.len() {
                assert_eq!(result.next_step_id, "deep_dive_start");
                let mut it = state.iteration_state.take().unwrap();
                assert_eq!(it.current_index, turn + 1);
                it.iteration_type = None;
                state.iteration_state = Some(it);
            } else {
                assert_eq!(result.next_step_id, "collect_tools");
                assert!(state.iteration_state.is_none());
            }
        }
    }
}
