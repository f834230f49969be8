//! Tools step: role-specific software suggestions from the generator.

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
    let field = |key: &str| {
        state
            .display_value(key)
            .unwrap_or_else(|| "Unknown".to_string())
    };
    let role = field("role");
    let department = field("department");
    let job_level = field("job_level");

    let system = format!(
        r#"You are a workflow interviewer for marketing agencies.

USER CONTEXT:
- Role: "{role}"
- Department: "{department}"
- Job Level: "{job_level}"

TASK: Suggest 10-15 SPECIFIC tools/software this person ACTUALLY uses in their daily work.

EXAMPLES by role:
- UX/UI Designer: Figma, Sketch, Adobe XD, Miro, FigJam, Photoshop, Illustrator, Notion
- Frontend Developer: VS Code, GitHub, Figma, Chrome DevTools, Postman, Docker, Vercel, Slack
- Backend Developer: VS Code, GitHub, Docker, Postman, AWS, PostgreSQL, Redis, Jira, Slack
- Account Manager: Salesforce, HubSpot, Slack, Zoom, Gmail, Google Sheets, Notion, Teams
- Project Manager: Jira, Asana, Notion, Slack, Zoom, Google Sheets, Miro, Confluence

BE SPECIFIC:
- Choose tools that match the role
- Include both primary tools and collaboration tools
- Always include "Other" as last option

RETURN EXACTLY this JSON structure:
{{
  "assistantMessage": "Thanks! Now let's talk about tools.\n\nWhich tools/software do you use regularly in your work?",
  "component": {{
    "type": "multi-select",
    "props": {{
      "options": [
        {{"label": "Tool 1", "value": "tool_1"}},
        {{"label": "Other", "value": "other"}}
      ],
      "min": 1
    }}
  }},
  "nextStep": "ai_integration"
}}"#
    );

    GeneratedPrompt {
        system,
        user: format!(
            "Role: {role}, Department: {department}. Suggest relevant tools they use daily."
        ),
    }
}
