//! Time-waster step: role-specific pain points from the generator.

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
    let role = state
        .display_value("role")
        .unwrap_or_else(|| "Unknown".to_string());
    let department = state
        .display_value("department")
        .unwrap_or_else(|| "Unknown".to_string());

    let system = format!(
        r#"You are a workflow interviewer for marketing agencies.

USER CONTEXT:
- Role: "{role}"
- Department: "{department}"

TASK: Suggest 6-8 SPECIFIC time wasters / pain points this person commonly faces.

EXAMPLES by role:
- Designer: ["Too many design revisions", "Waiting for feedback/approvals", "File version control issues", "Last-minute changes", "Other"]
- Developer: ["Unclear requirements", "Last-minute scope changes", "Manual deployment", "Code review delays", "Other"]
- Account Manager: ["Status reporting", "Client communication overhead", "Budget tracking", "Internal coordination", "Other"]
- Project Manager: ["Resource planning", "Status update meetings", "Timeline estimation", "Cross-team dependencies", "Other"]

BE SPECIFIC:
- Choose pain points relevant to this role
- Focus on operational/workflow issues
- Always include "Other / Add your own" as last option

RETURN EXACTLY this JSON structure:
{{
  "assistantMessage": "Thanks! Quick one: where do you see the biggest time wasters in your work?",
  "component": {{
    "type": "smart-multi-select",
    "props": {{
      "question": "Where do you see the biggest time wasters?",
      "options": ["Pain point 1", "Pain point 2", "Other / Add your own"],
      "min": 1,
      "max": 5,
      "allowCustomInput": true
    }}
  }},
  "nextStep": "collaboration_friction"
}}"#
    );

    GeneratedPrompt {
        system,
        user: format!("Role: {role}, Department: {department}. Suggest pain points they likely face."),
    }
}
