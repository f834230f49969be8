//! Step handlers for dynamic and iterative steps.
//!
//! Every handler follows the same two-phase pattern:
//!
//! - **ask**: no answer yet, so build (or generate) the question and return
//!   it as `Continuation::Answer` with the handler's own step id, so the
//!   client's reply comes back here.
//! - **record**: validate and store the answer, then either show the next
//!   question or `Continuation::Redirect` to the successor step.
//!
//! Handlers never see each other. Falling through to another step is the
//! processor's job, driven by the returned continuation.

mod ai_integration;
mod automation;
mod deep_dive;
mod map_tools;
mod pain_points;
mod phase_allocation;
mod recap;
mod role;
mod tools;

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::ports::{ContentGenerator, GeneratedContent, GenerationRequest};

use super::component::require_present;
use super::definition::StepDefinition;
use super::errors::{ConfigurationError, EngineError, GenerationError};
use super::registry::StepRegistry;
use super::result::{Continuation, StepResult};
use super::state::{ConversationState, IterationKind, IterationState};
use super::step_id::StepId;

/// Closed table of handler implementations, keyed by registry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Role,
    PhaseAllocation,
    DeepDive,
    Tools,
    MapTools,
    AiIntegration,
    PainPoints,
    Automation,
    Recap,
}

impl HandlerKind {
    pub const ALL: [HandlerKind; 9] = [
        Self::Role,
        Self::PhaseAllocation,
        Self::DeepDive,
        Self::Tools,
        Self::MapTools,
        Self::AiIntegration,
        Self::PainPoints,
        Self::Automation,
        Self::Recap,
    ];

    /// Name used in step definitions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Role => "role-handler",
            Self::PhaseAllocation => "phase-allocation-handler",
            Self::DeepDive => "deep-dive-handler",
            Self::Tools => "tools-handler",
            Self::MapTools => "map-tools-handler",
            Self::AiIntegration => "ai-integration-handler",
            Self::PainPoints => "pain-points-handler",
            Self::Automation => "automation-handler",
            Self::Recap => "recap-handler",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Steps this handler routes to regardless of the definition's
    /// default successor.
    pub fn fixed_targets(&self) -> &'static [&'static str] {
        match self {
            Self::AiIntegration => ai_integration::ROUTES,
            Self::Recap => &[StepId::COMPLETE],
            _ => &[],
        }
    }
}

/// Everything a handler may touch besides the state.
pub struct HandlerContext<'a> {
    pub definition: &'a StepDefinition,
    pub registry: &'a StepRegistry,
    generator: &'a dyn ContentGenerator,
    generation_timeout: Duration,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        definition: &'a StepDefinition,
        registry: &'a StepRegistry,
        generator: &'a dyn ContentGenerator,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            definition,
            registry,
            generator,
            generation_timeout,
        }
    }

    pub fn step_id(&self) -> &StepId {
        &self.definition.id
    }

    /// The definition's default successor.
    pub fn successor(&self) -> Result<&StepId, ConfigurationError> {
        self.definition
            .next_step
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingSuccessor(self.definition.id.to_string()))
    }

    /// Calls the content generator under the configured timeout.
    pub async fn generate(
        &self,
        system_prompt: String,
        user_prompt: String,
    ) -> Result<GeneratedContent, GenerationError> {
        let request = GenerationRequest::new(self.step_id().as_str(), system_prompt, user_prompt);
        debug!(step_id = %self.step_id(), "Requesting generated content");

        match tokio::time::timeout(self.generation_timeout, self.generator.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.generation_timeout.as_secs())),
        }
    }
}

/// Runs the handler for one step.
pub async fn dispatch(
    kind: HandlerKind,
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    debug!(
        handler = kind.name(),
        step_id = %ctx.step_id(),
        answered = answer.is_some(),
        "Dispatching step handler"
    );

    match kind {
        HandlerKind::Role => role::handle(ctx, answer, state).await,
        HandlerKind::Tools => tools::handle(ctx, answer, state).await,
        HandlerKind::PainPoints => pain_points::handle(ctx, answer, state).await,
        HandlerKind::Automation => automation::handle(ctx, answer, state).await,
        HandlerKind::PhaseAllocation => phase_allocation::handle(ctx, answer, state),
        HandlerKind::AiIntegration => ai_integration::handle(ctx, answer, state),
        HandlerKind::DeepDive => deep_dive::handle(ctx, answer, state),
        HandlerKind::MapTools => map_tools::handle(ctx, answer, state),
        HandlerKind::Recap => recap::handle(ctx, answer, state),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Generated steps
// ════════════════════════════════════════════════════════════════════════════════

/// Prompts for a step whose question comes from the content generator.
pub(crate) struct GeneratedPrompt {
    pub system: String,
    pub user: String,
}

/// Ask/record cycle shared by every generator-backed step. Answers are stored
/// under the step id.
pub(crate) async fn generated_step(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
    prompt: impl FnOnce(&ConversationState) -> GeneratedPrompt,
) -> Result<Continuation, EngineError> {
    let step_id = ctx.step_id();

    let Some(answer) = answer else {
        return Ok(Continuation::Answer(ask_generated(ctx, state, prompt).await?));
    };

    let mut next_state = state.clone();
    if let Err(error) = require_present(answer) {
        next_state.log_validation(step_id, Err(&error));
        let result = ask_generated(ctx, &next_state, prompt).await?;
        return Ok(Continuation::Answer(result.with_validation_error(&error)));
    }

    next_state.log_validation(step_id, Ok(()));
    next_state.record(step_id.as_str(), answer.clone());
    Ok(Continuation::redirect(ctx.successor()?, next_state))
}

async fn ask_generated(
    ctx: &HandlerContext<'_>,
    state: &ConversationState,
    prompt: impl FnOnce(&ConversationState) -> GeneratedPrompt,
) -> Result<StepResult, EngineError> {
    let GeneratedPrompt { system, user } = prompt(state);
    let content = ctx.generate(system, user).await?;

    let component = content
        .component
        .ok_or_else(|| GenerationError::MissingField("component".to_string()))?;

    if let Some(suggested) = content.next_step.as_deref() {
        let expected = ctx.definition.next_step.as_ref().map(StepId::as_str);
        if Some(suggested) != expected && !ctx.registry.contains(suggested) {
            warn!(
                step_id = %ctx.step_id(),
                suggested,
                "Ignoring unknown generated nextStep"
            );
        }
    }

    Ok(StepResult::ask(
        ctx.step_id(),
        content.assistant_message,
        Some(component),
        state.clone(),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Iterative steps
// ════════════════════════════════════════════════════════════════════════════════

/// Iteration state if it belongs to `kind`. State left behind by another
/// loop means this call is a fresh entry.
pub(crate) fn own_iteration(state: &ConversationState, kind: IterationKind) -> Option<IterationState> {
    state
        .iteration_state
        .filter(|it| it.belongs_to(kind))
}

/// Leaves the loop: clears iteration state and falls through to the
/// step after the loop.
pub(crate) fn exit_loop(
    ctx: &HandlerContext<'_>,
    mut state: ConversationState,
) -> Result<Continuation, EngineError> {
    state.iteration_state = None;
    Ok(Continuation::redirect(ctx.successor()?, state))
}
