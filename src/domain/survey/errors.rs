//! Error types for the survey engine.

/// The step graph is broken. Never retried.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    #[error("Unknown handler '{handler}' for step {step_id}")]
    UnknownHandler { step_id: String, handler: String },

    #[error("Step {0} has no handler")]
    MissingHandler(String),

    #[error("Step {from} transitions to missing step {to}")]
    MissingTransition { from: String, to: String },

    #[error("Step {0} has no successor")]
    MissingSuccessor(String),

    #[error("Step {0} has no prompt or component")]
    IncompleteStep(String),

    #[error("Iterative step {0} has no iteration source")]
    MissingIterationSource(String),

    #[error("Duplicate step: {0}")]
    DuplicateStep(String),

    #[error("Redirect limit of {limit} exceeded at step {step_id}")]
    RedirectLimitExceeded { step_id: String, limit: usize },
}

/// The content generator failed or produced something unusable.
/// The client may resubmit the same turn.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Content generator unavailable: {0}")]
    Unavailable(String),

    #[error("Content generation timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed generator response: {0}")]
    Malformed(String),

    #[error("Generator response missing required field: {0}")]
    MissingField(String),

    #[error("Generator returned an invalid component: {0}")]
    InvalidComponent(String),
}

/// A user answer that does not satisfy its component's constraints.
///
/// Messages are shown inline under the re-asked question.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Please provide an answer")]
    Required,

    #[error("{}", selection_message(.min, .max, .actual))]
    SelectionCount {
        min: usize,
        max: Option<usize>,
        actual: usize,
    },

    #[error("Percentages must add up to {expected} (currently {actual})")]
    PercentageSum { expected: f64, actual: f64 },

    #[error("Percentage for {key} must be between 0 and 100 (got {value})")]
    PercentageOutOfRange { key: String, value: f64 },

    #[error("Expected {0}")]
    InvalidType(&'static str),
}

fn selection_message(min: &usize, max: &Option<usize>, actual: &usize) -> String {
    match *max {
        Some(max) if *min == max => format!("Please select exactly {} (selected {})", min, actual),
        Some(max) => format!(
            "Please select between {} and {} options (selected {})",
            min, max, actual
        ),
        None => format!("Please select at least {} (selected {})", min, actual),
    }
}

/// Errors that abort a turn.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl EngineError {
    /// Whether resubmitting the identical turn may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Generation(_))
    }
}
