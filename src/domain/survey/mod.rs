//! Survey step orchestration.
//!
//! # Module Organization
//!
//! - `catalog` - Static option lists (agencies, phases, activities, ...)
//! - `registry` - The step graph and its validation
//! - `phase` - Step to phase classification
//! - `progress` - Progress percentage per step
//! - `component` - UI component union and answer validation
//! - `state` - Client-held conversation state
//! - `handlers` - Dynamic and iterative step handlers
//! - `processor` - Resolves one turn into a `StepResult`

pub mod catalog;
mod component;
mod definition;
mod errors;
pub mod handlers;
mod phase;
mod processor;
mod progress;
mod registry;
mod result;
mod state;
mod step_id;

pub use component::{
    percentage_entries, require_present, ButtonGroupProps, ChoiceOption, DocumentProps,
    GuidedInputProps, InfoMessageProps, InputProps, InputType, MultiSelectProps, PercentageItem,
    PercentageTableProps, SmartMultiSelectProps, UiComponent, PERCENTAGE_TOLERANCE,
};
pub use definition::{StepDefinition, StepKind};
pub use errors::{ConfigurationError, EngineError, GenerationError, ValidationError};
pub use phase::SurveyPhase;
pub use processor::{StepProcessor, DEFAULT_GENERATION_TIMEOUT, DEFAULT_MAX_REDIRECTS};
pub use progress::progress;
pub use registry::{RegistryOptions, StepRegistry};
pub use result::{Continuation, StepResult};
pub use state::{
    answer_of, ConversationState, IterationKind, IterationState, ValidationRecord, AUTO_CONTINUE,
};
pub use step_id::StepId;
