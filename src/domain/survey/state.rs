//! Conversation state.
//!
//! The client owns the state and sends it back on every turn. The engine
//! never mutates the state it was given: every turn works on its own copy,
//! so a failed turn leaves the caller's value untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::errors::ValidationError;
use super::phase::SurveyPhase;
use super::step_id::StepId;

/// Response value meaning "no answer yet, just show the step".
pub const AUTO_CONTINUE: &str = "_auto_continue_";

/// Normalizes a raw user response: `null`, absent and the auto-continue
/// sentinel all mean "no answer".
pub fn answer_of(response: Option<&Value>) -> Option<&Value> {
    match response {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s == AUTO_CONTINUE => None,
        Some(value) => Some(value),
    }
}

/// Which iterative step owns the loop counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationKind {
    DeepDive,
    MapTools,
}

/// Loop position inside an iterative step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationState {
    pub current_index: usize,
    pub total_phases: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_type: Option<IterationKind>,
}

impl IterationState {
    pub fn start(total: usize, kind: IterationKind) -> Self {
        Self {
            current_index: 0,
            total_phases: total,
            iteration_type: Some(kind),
        }
    }

    /// Holds `current_index < total_phases`.
    pub fn is_valid(&self) -> bool {
        self.current_index < self.total_phases
    }

    /// Untyped state belongs to whichever loop is running; only a
    /// different tag marks it as left behind by another loop.
    pub fn belongs_to(&self, kind: IterationKind) -> bool {
        !matches!(self.iteration_type, Some(owner) if owner != kind)
    }
}

/// One entry of the validation audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    pub step_id: StepId,
    pub validated: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything the engine knows about one respondent's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<SurveyPhase>,
    pub current_step: StepId,
    #[serde(default)]
    pub collected_data: BTreeMap<String, Value>,
    #[serde(default)]
    pub validation_history: Vec<ValidationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_state: Option<IterationState>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Fresh state positioned at the intro step.
    pub fn new() -> Self {
        Self {
            current_phase: Some(SurveyPhase::Intro),
            current_step: StepId::intro(),
            collected_data: BTreeMap::new(),
            validation_history: Vec::new(),
            iteration_state: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_step.is_complete()
    }

    pub fn collected(&self, key: &str) -> Option<&Value> {
        self.collected_data.get(key)
    }

    /// Stores an answer, overwriting any previous value for the key.
    pub fn record(&mut self, key: impl Into<String>, answer: Value) {
        self.collected_data.insert(key.into(), answer);
    }

    /// Stores an answer under `collected_data[key][item]`.
    pub fn record_nested(&mut self, key: &str, item: &str, answer: Value) {
        let entry = self
            .collected_data
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        if !entry.is_object() {
            *entry = Value::Object(Default::default());
        }
        if let Value::Object(map) = entry {
            map.insert(item.to_string(), answer);
        }
    }

    /// Appends an audit entry for a validation outcome.
    pub fn log_validation(&mut self, step_id: &StepId, outcome: Result<(), &ValidationError>) {
        self.validation_history.push(ValidationRecord {
            step_id: step_id.clone(),
            validated: outcome.is_ok(),
            timestamp: Utc::now(),
            error: outcome.err().map(ToString::to_string),
        });
    }

    /// Reads a collected list as display strings.
    ///
    /// Strings are taken as-is, objects contribute their `value` or `label`,
    /// and a single scalar becomes a one-element list.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.collected(key) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// The phases the respondent selected, in selection order.
    pub fn selected_phases(&self) -> Vec<String> {
        let primary = self.string_list("selected_phases");
        if primary.is_empty() {
            self.string_list("phase_selection")
        } else {
            primary
        }
    }

    /// Human-readable rendering of a collected answer.
    pub fn display_value(&self, key: &str) -> Option<String> {
        let value = self.collected(key)?;
        let text = match value {
            Value::Array(_) => self.string_list(key).join(", "),
            other => scalar_text(other)?,
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => ["value", "label"]
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}
