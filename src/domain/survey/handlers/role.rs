//! Role step: department-specific job titles from the generator.

use serde_json::Value;

use crate::domain::survey::errors::EngineError;
use crate::domain::survey::result::Continuation;
use crate::domain::survey::state::ConversationState;

use super::{generated_step, GeneratedPrompt, HandlerContext};

pub(super) async fn handle(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    generated_step(ctx, answer, state, prompt).await
}

fn prompt(state: &ConversationState) -> GeneratedPrompt {
    let department = state
        .display_value("department")
        .unwrap_or_else(|| "General".to_string());

    let system = format!(
        r#"You are a workflow interviewer for marketing agencies.

User is in department: "{department}"

TASK: Suggest 5-7 SPECIFIC job roles/titles common in this department.

EXAMPLES by department:
- Engineering: ["Frontend Developer", "Backend Developer", "Full Stack Developer", "Technical Lead", "DevOps Engineer", "QA Engineer", "Other"]
- Experience Design: ["UX Designer", "UI Designer", "Product Designer", "UX Researcher", "Design Lead", "Other"]
- Client Services: ["Account Manager", "Account Director", "Client Partner", "Account Executive", "Other"]
- Service Delivery: ["Project Manager", "Scrum Master", "Delivery Manager", "Program Manager", "Other"]

IMPORTANT:
- ALWAYS include "Other" as the last option
- Make roles specific to the department
- Keep it to 5-7 options

RETURN EXACTLY this JSON structure:
{{
  "assistantMessage": "And what's your specific role or job title?",
  "component": {{
    "type": "button-group",
    "props": {{
      "options": [
        {{"label": "Role 1", "value": "role_1"}},
        {{"label": "Other", "value": "other"}}
      ],
      "multiple": false,
      "columns": 2
    }}
  }},
  "nextStep": "job_level"
}}"#
    );

    GeneratedPrompt {
        system,
        user: format!("Department: {department}. Suggest relevant roles."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockContentGenerator;
    use crate::domain::survey::handlers::test_support::*;
    use crate::domain::survey::registry::StepRegistry;
    use crate::domain::survey::UiComponent;
    use serde_json::json;

    fn role_reply() -> Value {
        json!({
            "assistantMessage": "And what's your specific role or job title?",
            "component": {
                "type": "button-group",
                "props": {
                    "options": [
                        {"label": "Backend Developer", "value": "Backend Developer"},
                        {"label": "Other", "value": "other"}
                    ],
                    "columns": 2
                }
            },
            "nextStep": "job_level"
        })
    }

    #[tokio::test]
    async fn ask_uses_department_in_prompt() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new().with_json(role_reply());
        let ctx = context("role", &registry, &generator);
        let mut state = ConversationState::new();
        state.record("department", json!("Engineering"));

        let result = answer_of(handle(&ctx, None, &state).await.unwrap());

        assert_eq!(result.next_step_id, "role");
        assert_eq!(result.updated_state.current_step, "role");
        assert!(matches!(result.ui_component, Some(UiComponent::ButtonGroup(_))));
        let calls = generator.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].system_prompt.contains("\"Engineering\""));
        assert_eq!(calls[0].step_id, "role");
    }

    #[tokio::test]
    async fn record_skips_the_generator() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new();
        let ctx = context("role", &registry, &generator);

        let answer = json!("Backend Developer");
        let (next, state) = redirect_of(
            handle(&ctx, Some(&answer), &ConversationState::new())
                .await
                .unwrap(),
        );

        assert_eq!(next, "job_level");
        assert_eq!(state.collected("role"), Some(&answer));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_answer_is_re_asked_with_error() {
        let registry = StepRegistry::shared();
        let generator = MockContentGenerator::new().with_json(role_reply());
        let ctx = context("role", &registry, &generator);

        let result = answer_of(
            handle(&ctx, Some(&json!("   ")), &ConversationState::new())
                .await
                .unwrap(),
        );

        assert_eq!(result.validation_error.as_deref(), Some("Please provide an answer"));
        assert!(result.updated_state.collected("role").is_none());
        assert!(!result.updated_state.validation_history[0].validated);
    }
}
