//! End-to-end survey flow through the application handlers.
//!
//! Walks one respondent from the intro to completion the way the client
//! does: every turn echoes back the returned state and `nextStepId`.

use serde_json::{json, Value};
use std::sync::Arc;

use workflow_survey::adapters::ai::MockContentGenerator;
use workflow_survey::adapters::storage::InMemorySurveyStore;
use workflow_survey::application::handlers::survey::{
    ProcessTurnCommand, ProcessTurnHandler, StartSurveyHandler,
};
use workflow_survey::domain::foundation::SessionId;
use workflow_survey::domain::survey::catalog;
use workflow_survey::domain::survey::{
    RegistryOptions, StepProcessor, StepRegistry, StepResult, SurveyPhase, UiComponent,
};
use workflow_survey::ports::SurveyStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn generated(message: &str, component: Value) -> Value {
    json!({ "assistantMessage": message, "component": component })
}

fn role_reply() -> Value {
    generated(
        "And what's your specific role or job title?",
        json!({
            "type": "button-group",
            "props": {
                "options": [
                    {"label": "Backend Developer", "value": "Backend Developer"},
                    {"label": "Technical Lead", "value": "Technical Lead"},
                    {"label": "Other", "value": "other"}
                ],
                "columns": 2
            }
        }),
    )
}

fn tools_reply() -> Value {
    generated(
        "Which tools/software do you use regularly in your work?",
        json!({
            "type": "multi-select",
            "props": {
                "options": [
                    {"label": "Jira", "value": "Jira"},
                    {"label": "Slack", "value": "Slack"},
                    {"label": "GitHub", "value": "GitHub"},
                    {"label": "Other", "value": "other"}
                ],
                "min": 1
            }
        }),
    )
}

fn pain_points_reply() -> Value {
    generated(
        "Where do you see the biggest time wasters in your work?",
        json!({
            "type": "multi-select",
            "props": {
                "options": [
                    {"label": "Status reporting", "value": "Status reporting"},
                    {"label": "Code review delays", "value": "Code review delays"}
                ],
                "min": 1,
                "max": 3
            }
        }),
    )
}

fn automation_reply() -> Value {
    generated(
        "Let's identify tasks that could be automated.",
        json!({
            "type": "guided-input",
            "props": {
                "guidedQuestions": ["Which tasks do you find most repetitive?"],
                "multiline": true
            }
        }),
    )
}

/// All generated steps of the default graph, in the order they are reached.
fn scripted_generator() -> MockContentGenerator {
    MockContentGenerator::new()
        .with_json(role_reply())
        .with_json(tools_reply())
        .with_json(pain_points_reply())
        .with_json(automation_reply())
}

/// Activity breakdown giving the whole phase to its first activity.
fn breakdown(phase_key: &str) -> Value {
    let mut map = serde_json::Map::new();
    for (i, activity) in catalog::activities_for(phase_key).iter().enumerate() {
        let share = if i == 0 { 100 } else { 0 };
        map.insert(catalog::activity_key(activity.name), json!(share));
    }
    Value::Object(map)
}

/// A respondent driving the handlers like the HTTP client would.
struct Respondent {
    handler: ProcessTurnHandler,
    session_id: SessionId,
    last: StepResult,
    progress_seen: Vec<u8>,
}

impl Respondent {
    async fn start(processor: Arc<StepProcessor>, store: Arc<InMemorySurveyStore>) -> Self {
        let started = StartSurveyHandler::new(processor.clone(), store.clone())
            .handle()
            .await
            .unwrap();
        Self {
            handler: ProcessTurnHandler::new(processor, store),
            session_id: started.session_id,
            progress_seen: vec![started.step.progress.value()],
            last: started.step,
        }
    }

    async fn answer(&mut self, response: Value) -> &StepResult {
        let cmd = ProcessTurnCommand {
            session_id: self.session_id,
            step_id: Some(self.last.next_step_id.to_string()),
            user_response: Some(response),
            state: self.last.updated_state.clone(),
        };
        self.last = self.handler.handle(cmd).await.unwrap();
        self.progress_seen.push(self.last.progress.value());
        &self.last
    }

    fn at(&self) -> &str {
        self.last.next_step_id.as_str()
    }
}

fn setup(generator: MockContentGenerator) -> (Arc<StepProcessor>, Arc<MockContentGenerator>, Arc<InMemorySurveyStore>) {
    let generator = Arc::new(generator);
    let processor = Arc::new(StepProcessor::new(generator.clone()));
    (processor, generator, Arc::new(InMemorySurveyStore::new()))
}

// =============================================================================
// Full interview
// =============================================================================

#[tokio::test]
async fn respondent_completes_survey_from_intro_to_complete() {
    let (processor, generator, store) = setup(scripted_generator());
    let mut r = Respondent::start(processor, store.clone()).await;
    assert_eq!(r.at(), "intro");
    assert_eq!(r.last.updated_state.current_phase, Some(SurveyPhase::Intro));

    r.answer(json!("_auto_continue_")).await;
    assert_eq!(r.at(), "greeting_agency");

    r.answer(json!("MSQ")).await;
    assert_eq!(r.at(), "department");

    let result = r.answer(json!("Engineering")).await;
    assert_eq!(result.next_step_id, "role");
    assert_eq!(result.assistant_message, "And what's your specific role or job title?");

    r.answer(json!("Backend Developer")).await;
    assert_eq!(r.at(), "job_level");

    r.answer(json!("Senior (6-10 years)")).await;
    assert_eq!(r.at(), "work_type_distribution");

    r.answer(json!({"billable": 60, "business_dev": 10, "internal_ops": 30}))
        .await;
    assert_eq!(r.at(), "primary_focus");

    r.answer(json!("Individual contributor (hands-on execution)")).await;
    assert_eq!(r.at(), "phase_overview_intro");

    r.answer(Value::Null).await;
    assert_eq!(r.at(), "phase_selection");

    let result = r.answer(json!(["delivery", "governance"])).await;
    assert_eq!(result.next_step_id, "phase_time_allocation");
    match &result.ui_component {
        Some(UiComponent::PercentageTable(props)) => {
            let keys: Vec<&str> = props.items.iter().map(|i| i.key.as_str()).collect();
            assert_eq!(keys, vec!["delivery", "governance"]);
        }
        other => panic!("expected a percentage table, got {:?}", other),
    }

    // Allocation keyed by phase label, as the table renders it.
    let result = r
        .answer(json!([
            {"phase": "DELIVERY & EXECUTION", "percentage": 60},
            {"phase": "CLIENT DELIVERY & GOVERNANCE", "percentage": 40}
        ]))
        .await;
    assert_eq!(result.next_step_id, "deep_dive_start");
    assert!(result.assistant_message.contains("DELIVERY & EXECUTION"));
    assert!(result.assistant_message.contains("60%"));

    let result = r.answer(breakdown("delivery")).await;
    assert_eq!(result.next_step_id, "deep_dive_start");
    assert!(result.assistant_message.contains("CLIENT DELIVERY & GOVERNANCE"));
    assert!(result.assistant_message.contains("40%"));

    // Second and last phase: the loop exits into the tools question.
    let result = r.answer(breakdown("governance")).await;
    assert_eq!(result.next_step_id, "collect_tools");
    assert_eq!(result.updated_state.iteration_state, None);

    r.answer(json!(["Jira", "Slack"])).await;
    assert_eq!(r.at(), "ai_integration");

    r.answer(json!("no")).await;
    assert_eq!(r.at(), "time_wasters");

    r.answer(json!(["Status reporting"])).await;
    assert_eq!(r.at(), "collaboration_friction");

    r.answer(json!("communication")).await;
    assert_eq!(r.at(), "automation_identification");

    r.answer(json!({"q1": "Timesheets and weekly status reports"}))
        .await;
    assert_eq!(r.at(), "magic_wand_automation");

    let result = r.answer(json!(["reporting", "status_updates"])).await;
    assert_eq!(result.next_step_id, "quick_recap");
    assert!(result.assistant_message.contains("MSQ"));
    assert!(result.assistant_message.contains("Backend Developer"));

    let result = r.answer(json!("confirmed")).await.clone();
    assert_eq!(result.next_step_id, "complete");
    assert!(result.is_complete);
    assert_eq!(result.progress.value(), 100);
    assert_eq!(result.updated_state.current_phase, Some(SurveyPhase::Validation));

    // Every generated step was asked exactly once.
    let asked: Vec<String> = generator.get_calls().into_iter().map(|c| c.step_id).collect();
    assert_eq!(asked, vec!["role", "collect_tools", "time_wasters", "automation_identification"]);

    // The deep dive stored one breakdown per selected phase.
    let data = &result.updated_state.collected_data;
    let activities = data["phase_activities"].as_object().unwrap();
    assert_eq!(activities.len(), 2);
    assert!(activities.contains_key("delivery"));
    assert!(activities.contains_key("governance"));

    // The final result is stored once, with everything collected.
    let stored = store.find_result(r.session_id).await.unwrap().unwrap();
    assert_eq!(stored.collected_data, *data);
    assert_eq!(store.result_count().await, 1);
}

#[tokio::test]
async fn progress_never_decreases_along_the_interview() {
    let (processor, _, store) = setup(scripted_generator());
    let mut r = Respondent::start(processor, store).await;

    let answers = vec![
        json!("_auto_continue_"),
        json!("UDG"),
        json!("Experience Design"),
        json!("UX Designer"),
        json!("Mid-level (3-5 years)"),
        json!({"billable": 80, "business_dev": 0, "internal_ops": 20}),
        json!("Cross-functional/strategic"),
        Value::Null,
        json!(["discovery"]),
        json!({"discovery": 100}),
        breakdown("discovery"),
        json!(["Figma"]),
        json!("active"),
        json!(["Claude", "Midjourney"]),
        json!(["Too many design revisions"]),
        json!("none"),
        json!("Resizing assets"),
        json!(["design_handoff"]),
        json!("adjust"),
    ];
    for answer in answers {
        r.answer(answer).await;
    }

    assert!(r.last.is_complete, "stopped at {}", r.at());
    assert!(
        r.progress_seen.windows(2).all(|w| w[0] <= w[1]),
        "progress went backwards: {:?}",
        r.progress_seen
    );
    assert_eq!(r.progress_seen.first(), Some(&5));
    assert_eq!(r.progress_seen.last(), Some(&100));
    assert!(r.last.updated_state.collected("ai_tools_details").is_some());
}

#[tokio::test]
async fn rejected_answer_keeps_respondent_on_the_step() {
    let (processor, _, store) = setup(scripted_generator());
    let mut r = Respondent::start(processor, store).await;
    r.answer(json!("_auto_continue_")).await;
    r.answer(json!("MSQ")).await;
    r.answer(json!("Engineering")).await;
    r.answer(json!("Backend Developer")).await;
    r.answer(json!("Senior (6-10 years)")).await;

    let result = r
        .answer(json!({"billable": 50, "business_dev": 10, "internal_ops": 10}))
        .await;

    assert_eq!(result.next_step_id, "work_type_distribution");
    assert!(result.validation_error.as_deref().unwrap().contains("100"));
    assert!(result.updated_state.collected("work_type_distribution").is_none());
    let last = result.updated_state.validation_history.last().unwrap();
    assert!(!last.validated);

    r.answer(json!({"billable": 50, "business_dev": 10, "internal_ops": 40}))
        .await;
    assert_eq!(r.at(), "primary_focus");
}

#[tokio::test]
async fn tool_mapping_loop_runs_when_enabled() {
    let generator = Arc::new(scripted_generator());
    let registry = Arc::new(StepRegistry::standard(RegistryOptions {
        tool_phase_mapping: true,
    }));
    let processor = Arc::new(StepProcessor::new(generator).with_registry(registry));
    let mut r = Respondent::start(processor, Arc::new(InMemorySurveyStore::new())).await;

    for answer in [
        json!("_auto_continue_"),
        json!("MSQ"),
        json!("Engineering"),
        json!("Backend Developer"),
        json!("Senior (6-10 years)"),
        json!({"billable": 100, "business_dev": 0, "internal_ops": 0}),
        json!("Other"),
        Value::Null,
        json!(["delivery"]),
        json!({"delivery": 100}),
        breakdown("delivery"),
    ] {
        r.answer(answer).await;
    }
    assert_eq!(r.at(), "collect_tools");

    let result = r.answer(json!(["Jira", "GitHub"])).await;
    assert_eq!(result.next_step_id, "map_tools_start");

    let result = r.answer(json!(["GitHub"])).await;
    assert_eq!(result.next_step_id, "ai_integration");
    assert_eq!(result.updated_state.iteration_state, None);
}
