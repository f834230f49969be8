//! UI component descriptors.
//!
//! The client renders whatever `UiComponent` the engine returns. The set of
//! component types is closed: generator output is coerced into this union at
//! the boundary, and anything that does not fit is rejected there.
//!
//! On the wire a component is `{ "type": "<kebab-case>", "props": { ... } }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ValidationError;

/// Allowed drift between a percentage table's sum and its target.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

fn default_target_sum() -> f64 {
    100.0
}

fn default_columns() -> u8 {
    1
}

/// A renderable input control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props", rename_all = "kebab-case")]
pub enum UiComponent {
    ButtonGroup(ButtonGroupProps),
    MultiSelect(MultiSelectProps),
    SmartMultiSelect(SmartMultiSelectProps),
    Input(InputProps),
    PercentageTable(PercentageTableProps),
    GuidedInput(GuidedInputProps),
    InfoMessage(InfoMessageProps),
    Document(DocumentProps),
}

/// A selectable option.
///
/// Deserializes from either a bare string (used as both label and value)
/// or an object with `label` and optional `value`/`description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawChoice")]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChoice {
    Plain(String),
    Labelled {
        label: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<RawChoice> for ChoiceOption {
    fn from(raw: RawChoice) -> Self {
        match raw {
            RawChoice::Plain(text) => Self {
                label: text.clone(),
                value: text,
                description: None,
            },
            RawChoice::Labelled {
                label,
                value,
                description,
            } => Self {
                value: value.unwrap_or_else(|| label.clone()),
                label,
                description,
            },
        }
    }
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }

    /// Option whose label doubles as its value.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonGroupProps {
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default = "default_columns")]
    pub columns: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSelectProps {
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMultiSelectProps {
    #[serde(alias = "options")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    #[serde(default = "allow_custom_default")]
    pub allow_custom_input: bool,
}

fn allow_custom_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Number,
    Email,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "type", default)]
    pub input_type: InputType,
    #[serde(default)]
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageItem {
    pub label: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageTableProps {
    pub items: Vec<PercentageItem>,
    #[serde(default = "default_target_sum")]
    pub target_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidedInputProps {
    pub guided_questions: Vec<String>,
    #[serde(default)]
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoMessageProps {
    pub message: String,
    #[serde(default)]
    pub requires_acknowledgement: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentProps {
    pub content: String,
    #[serde(default)]
    pub downloadable: bool,
}

impl UiComponent {
    /// Single-choice button group.
    pub fn buttons(options: Vec<ChoiceOption>, columns: u8) -> Self {
        Self::ButtonGroup(ButtonGroupProps {
            options,
            multiple: false,
            columns,
        })
    }

    pub fn multi_select(options: Vec<ChoiceOption>, min: Option<usize>, max: Option<usize>) -> Self {
        Self::MultiSelect(MultiSelectProps { options, min, max })
    }

    /// Percentage table that must sum to 100.
    pub fn percentage_table(items: Vec<PercentageItem>) -> Self {
        Self::PercentageTable(PercentageTableProps {
            items,
            target_sum: default_target_sum(),
        })
    }

    pub fn info(message: impl Into<String>, requires_acknowledgement: bool) -> Self {
        Self::InfoMessage(InfoMessageProps {
            message: message.into(),
            requires_acknowledgement,
        })
    }

    /// Wire name of the component type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ButtonGroup(_) => "button-group",
            Self::MultiSelect(_) => "multi-select",
            Self::SmartMultiSelect(_) => "smart-multi-select",
            Self::Input(_) => "input",
            Self::PercentageTable(_) => "percentage-table",
            Self::GuidedInput(_) => "guided-input",
            Self::InfoMessage(_) => "info-message",
            Self::Document(_) => "document",
        }
    }

    /// Components that are acknowledged rather than answered.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::InfoMessage(_) | Self::Document(_))
    }

    /// Checks that the props carry enough data to render without another
    /// round trip.
    pub fn check_renderable(&self) -> Result<(), String> {
        match self {
            Self::ButtonGroup(p) if p.options.is_empty() => {
                Err(format!("{} has no options", self.type_name()))
            }
            Self::MultiSelect(p) if p.options.is_empty() => {
                Err(format!("{} has no options", self.type_name()))
            }
            Self::MultiSelect(MultiSelectProps {
                min: Some(min),
                max: Some(max),
                ..
            }) if min > max => Err(format!("{} min {} exceeds max {}", self.type_name(), min, max)),
            Self::PercentageTable(p) if p.items.is_empty() => {
                Err(format!("{} has no items", self.type_name()))
            }
            Self::PercentageTable(p) if p.target_sum <= 0.0 => {
                Err(format!("{} target must be positive", self.type_name()))
            }
            Self::GuidedInput(p) if p.guided_questions.is_empty() => {
                Err(format!("{} has no questions", self.type_name()))
            }
            _ => Ok(()),
        }
    }

    /// Validates a user answer against this component's constraints.
    pub fn validate_answer(&self, answer: &Value) -> Result<(), ValidationError> {
        match self {
            Self::ButtonGroup(p) if p.multiple => {
                let selected = as_selection(answer)?;
                check_count(selected, 1, None)
            }
            Self::ButtonGroup(_) => require_scalar(answer),
            Self::MultiSelect(p) => {
                let selected = as_selection(answer)?;
                check_count(selected, p.min.unwrap_or(1), p.max)
            }
            Self::SmartMultiSelect(p) => {
                let selected = as_selection(answer)?;
                check_count(selected, p.min.unwrap_or(1), p.max)
            }
            Self::Input(p) => validate_input(p, answer),
            Self::PercentageTable(p) => validate_percentages(p, answer),
            Self::GuidedInput(_) => require_present(answer),
            Self::InfoMessage(_) | Self::Document(_) => Ok(()),
        }
    }
}

/// Rejects answers that carry no content: null, blank strings, empty
/// lists and objects whose values are all blank.
pub fn require_present(answer: &Value) -> Result<(), ValidationError> {
    let present = match answer {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => items.iter().any(|item| require_present(item).is_ok()),
        Value::Object(map) => map.values().any(|v| require_present(v).is_ok()),
        Value::Bool(_) | Value::Number(_) => true,
    };
    if present {
        Ok(())
    } else {
        Err(ValidationError::Required)
    }
}

fn require_scalar(answer: &Value) -> Result<(), ValidationError> {
    match answer {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => require_present(answer),
        Value::Object(map) if map.contains_key("value") => require_present(answer),
        Value::Null => Err(ValidationError::Required),
        _ => Err(ValidationError::InvalidType("a single choice")),
    }
}

fn as_selection(answer: &Value) -> Result<usize, ValidationError> {
    match answer {
        Value::Array(items) => Ok(items.len()),
        Value::Null => Err(ValidationError::Required),
        _ => Err(ValidationError::InvalidType("a list of selections")),
    }
}

fn check_count(actual: usize, min: usize, max: Option<usize>) -> Result<(), ValidationError> {
    let too_many = max.map(|max| actual > max).unwrap_or(false);
    if actual < min || too_many {
        return Err(ValidationError::SelectionCount { min, max, actual });
    }
    Ok(())
}

fn validate_input(props: &InputProps, answer: &Value) -> Result<(), ValidationError> {
    require_present(answer)?;
    match props.input_type {
        InputType::Text => match answer {
            Value::String(_) | Value::Number(_) => Ok(()),
            _ => Err(ValidationError::InvalidType("text")),
        },
        InputType::Number => match answer {
            Value::Number(_) => Ok(()),
            Value::String(s) if s.trim().parse::<f64>().is_ok() => Ok(()),
            _ => Err(ValidationError::InvalidType("a number")),
        },
        InputType::Email => match answer {
            Value::String(s) if looks_like_email(s.trim()) => Ok(()),
            _ => Err(ValidationError::InvalidType("an email address")),
        },
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

fn validate_percentages(props: &PercentageTableProps, answer: &Value) -> Result<(), ValidationError> {
    let entries = percentage_entries(answer)?;
    if entries.is_empty() {
        return Err(ValidationError::Required);
    }

    let mut sum = 0.0;
    for (key, value) in &entries {
        if !(0.0..=100.0).contains(value) {
            return Err(ValidationError::PercentageOutOfRange {
                key: key.clone(),
                value: *value,
            });
        }
        sum += value;
    }

    if (sum - props.target_sum).abs() > PERCENTAGE_TOLERANCE {
        return Err(ValidationError::PercentageSum {
            expected: props.target_sum,
            actual: sum,
        });
    }
    Ok(())
}

/// Reads a percentage answer into `(key, value)` pairs.
///
/// Accepts an array of `{phase|key|label, percentage}` objects or an object
/// mapping keys to numbers. Numeric strings are accepted as numbers.
pub fn percentage_entries(answer: &Value) -> Result<Vec<(String, f64)>, ValidationError> {
    const SHAPE: &str = "percentages per item";

    match answer {
        Value::Null => Err(ValidationError::Required),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                number_of(value)
                    .map(|n| (key.clone(), n))
                    .ok_or(ValidationError::InvalidType(SHAPE))
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let key = ["phase", "key", "label"]
                    .iter()
                    .find_map(|field| item.get(*field).and_then(Value::as_str))
                    .ok_or(ValidationError::InvalidType(SHAPE))?;
                let value = item
                    .get("percentage")
                    .and_then(number_of)
                    .ok_or(ValidationError::InvalidType(SHAPE))?;
                Ok((key.to_string(), value))
            })
            .collect(),
        _ => Err(ValidationError::InvalidType(SHAPE)),
    }
}

/// Reads a number, accepting numeric strings.
pub(crate) fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phase_table() -> UiComponent {
        UiComponent::percentage_table(vec![
            PercentageItem {
                label: "DELIVERY & EXECUTION".into(),
                key: "delivery".into(),
                description: None,
            },
            PercentageItem {
                label: "CLIENT DELIVERY & GOVERNANCE".into(),
                key: "governance".into(),
                description: None,
            },
        ])
    }

    mod wire_format {
        use super::*;

        #[test]
        fn serializes_as_type_and_props() {
            let component = UiComponent::buttons(vec![ChoiceOption::plain("MSQ")], 2);
            let json = serde_json::to_value(&component).unwrap();

            assert_eq!(json["type"], "button-group");
            assert_eq!(json["props"]["options"][0]["label"], "MSQ");
            assert_eq!(json["props"]["columns"], 2);
        }

        #[test]
        fn accepts_string_options() {
            let component: UiComponent = serde_json::from_value(json!({
                "type": "multi-select",
                "props": { "options": ["Figma", {"label": "VS Code", "value": "vscode"}], "min": 1 }
            }))
            .unwrap();

            let UiComponent::MultiSelect(props) = component else {
                panic!("expected multi-select");
            };
            assert_eq!(props.options[0].value, "Figma");
            assert_eq!(props.options[1].value, "vscode");
            assert_eq!(props.min, Some(1));
        }

        #[test]
        fn smart_multi_select_accepts_options_alias() {
            let component: UiComponent = serde_json::from_value(json!({
                "type": "smart-multi-select",
                "props": {
                    "options": ["Unclear briefs", "Other / Add your own"],
                    "min": 1,
                    "max": 5,
                    "smartSuggestions": true
                }
            }))
            .unwrap();

            let UiComponent::SmartMultiSelect(props) = component else {
                panic!("expected smart-multi-select");
            };
            assert_eq!(props.suggestions.len(), 2);
            assert!(props.allow_custom_input);
        }

        #[test]
        fn percentage_table_target_defaults_to_100() {
            let component: UiComponent = serde_json::from_value(json!({
                "type": "percentage-table",
                "props": { "items": [{"label": "A", "key": "a"}] }
            }))
            .unwrap();

            let UiComponent::PercentageTable(props) = component else {
                panic!("expected percentage-table");
            };
            assert_eq!(props.target_sum, 100.0);
        }

        #[test]
        fn input_type_uses_type_key() {
            let json = serde_json::to_value(UiComponent::Input(InputProps {
                placeholder: None,
                input_type: InputType::Number,
                multiline: false,
            }))
            .unwrap();
            assert_eq!(json["props"]["type"], "number");
        }

        #[test]
        fn rejects_unknown_component_type() {
            let result: Result<UiComponent, _> = serde_json::from_value(json!({
                "type": "slider",
                "props": { "min": 0, "max": 10 }
            }));
            assert!(result.is_err());
        }
    }

    mod renderable {
        use super::*;

        #[test]
        fn empty_option_lists_are_rejected() {
            assert!(UiComponent::buttons(vec![], 1).check_renderable().is_err());
            assert!(UiComponent::multi_select(vec![], None, None)
                .check_renderable()
                .is_err());
            assert!(UiComponent::percentage_table(vec![]).check_renderable().is_err());
        }

        #[test]
        fn inverted_bounds_are_rejected() {
            let component = UiComponent::multi_select(vec![ChoiceOption::plain("a")], Some(3), Some(1));
            assert_eq!(
                component.check_renderable(),
                Err("multi-select min 3 exceeds max 1".to_string())
            );
        }

        #[test]
        fn empty_table_error_names_the_wire_type() {
            let err = UiComponent::percentage_table(vec![]).check_renderable().unwrap_err();
            assert_eq!(err, "percentage-table has no items");
        }

        #[test]
        fn info_messages_always_render() {
            assert!(UiComponent::info("hi", true).check_renderable().is_ok());
        }
    }

    mod answers {
        use super::*;

        #[test]
        fn single_choice_requires_a_value() {
            let component = UiComponent::buttons(vec![ChoiceOption::plain("MSQ")], 2);
            assert!(component.validate_answer(&json!("MSQ")).is_ok());
            assert_eq!(
                component.validate_answer(&json!("  ")),
                Err(ValidationError::Required)
            );
            assert!(component.validate_answer(&json!(["MSQ"])).is_err());
        }

        #[test]
        fn multi_select_enforces_bounds() {
            let component = UiComponent::multi_select(vec![ChoiceOption::plain("a")], Some(1), Some(3));

            assert!(component.validate_answer(&json!(["a"])).is_ok());
            assert_eq!(
                component.validate_answer(&json!([])),
                Err(ValidationError::SelectionCount {
                    min: 1,
                    max: Some(3),
                    actual: 0
                })
            );
            assert!(component.validate_answer(&json!(["a", "b", "c", "d"])).is_err());
        }

        #[test]
        fn multi_select_with_zero_minimum_accepts_empty_list() {
            let component = UiComponent::multi_select(vec![ChoiceOption::plain("a")], Some(0), None);
            assert!(component.validate_answer(&json!([])).is_ok());
        }

        #[test]
        fn percentage_array_must_sum_to_target() {
            let table = phase_table();
            let ok = json!([
                {"phase": "DELIVERY & EXECUTION", "percentage": 60},
                {"phase": "CLIENT DELIVERY & GOVERNANCE", "percentage": 40}
            ]);
            let short = json!([
                {"phase": "DELIVERY & EXECUTION", "percentage": 60},
                {"phase": "CLIENT DELIVERY & GOVERNANCE", "percentage": 30}
            ]);

            assert!(table.validate_answer(&ok).is_ok());
            assert_eq!(
                table.validate_answer(&short),
                Err(ValidationError::PercentageSum {
                    expected: 100.0,
                    actual: 90.0
                })
            );
        }

        #[test]
        fn percentage_object_form_is_accepted() {
            let answer = json!({"billable": 40, "business_dev": "20", "internal_ops": 40.0});
            assert!(phase_table().validate_answer(&answer).is_ok());
        }

        #[test]
        fn percentage_sum_tolerates_rounding() {
            let answer = json!({"a": 33.333, "b": 33.333, "c": 33.334});
            assert!(phase_table().validate_answer(&answer).is_ok());
        }

        #[test]
        fn percentage_values_must_be_in_range() {
            let answer = json!({"a": 120, "b": -20});
            assert!(matches!(
                phase_table().validate_answer(&answer),
                Err(ValidationError::PercentageOutOfRange { .. })
            ));
        }

        #[test]
        fn number_input_rejects_text() {
            let component = UiComponent::Input(InputProps {
                placeholder: None,
                input_type: InputType::Number,
                multiline: false,
            });
            assert!(component.validate_answer(&json!("12")).is_ok());
            assert_eq!(
                component.validate_answer(&json!("twelve")),
                Err(ValidationError::InvalidType("a number"))
            );
        }

        #[test]
        fn info_message_accepts_anything() {
            assert!(UiComponent::info("hi", true).validate_answer(&json!(true)).is_ok());
        }

        #[test]
        fn guided_input_needs_one_filled_answer() {
            let component = UiComponent::GuidedInput(GuidedInputProps {
                guided_questions: vec!["Which tasks repeat?".into()],
                multiline: true,
            });
            assert!(component.validate_answer(&json!({"q1": "Timesheets", "q2": ""})).is_ok());
            assert!(component.validate_answer(&json!({"q1": " "})).is_err());
        }
    }
}
