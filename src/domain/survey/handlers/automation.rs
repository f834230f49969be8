//! Automation step: guided questions about repetitive work.

use serde_json::Value;

use crate::domain::survey::errors::EngineError;
use crate::domain::survey::result::Continuation;
use crate::domain::survey::state::ConversationState;

use super::{generated_step, GeneratedPrompt, HandlerContext};

const SYSTEM_PROMPT: &str = r#"You are a workflow interviewer for marketing agencies.

TASK: Present 4 specific questions to identify automation opportunities.

RETURN EXACTLY this JSON structure:
{
  "assistantMessage": "Let's identify tasks that could be automated. Please answer these questions:",
  "component": {
    "type": "guided-input",
    "props": {
      "guidedQuestions": [
        "Which tasks do you find most repetitive or time-consuming?",
        "What activities feel like they take you away from your core work?",
        "Where do you spend time on manual data entry, copying/pasting, or reformatting?",
        "Which tasks require little judgment or creativity to complete?"
      ],
      "multiline": true
    }
  },
  "nextStep": "magic_wand_automation"
}"#;

pub(super) async fn handle(
    ctx: &HandlerContext<'_>,
    answer: Option<&Value>,
    state: &ConversationState,
) -> Result<Continuation, EngineError> {
    generated_step(ctx, answer, state, prompt).await
}

fn prompt(state: &ConversationState) -> GeneratedPrompt {
    let role = state.display_value("role");

    GeneratedPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user: match role {
            Some(role) => format!("Present automation identification questions for a {role}."),
            None => "Present automation identification questions.".to_string(),
        },
    }
}
