//! Step registry - the hand-authored interview graph.
//!
//! The registry is read-only once built. Every transition target, including
//! the terminal `complete` step, must resolve to a definition; `validate`
//! checks the whole table so a broken graph is caught at startup instead of
//! mid-interview.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use super::catalog::{self, CatalogOption};
use super::component::{ChoiceOption, PercentageItem, SmartMultiSelectProps, UiComponent};
use super::definition::{StepDefinition, StepKind};
use super::errors::ConfigurationError;
use super::handlers::HandlerKind;
use super::step_id::StepId;

/// Switches that change the shape of the standard graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Wire the per-phase tool mapping loop between `collect_tools` and
    /// `ai_integration`.
    pub tool_phase_mapping: bool,
}

static DEFAULT_REGISTRY: Lazy<Arc<StepRegistry>> =
    Lazy::new(|| Arc::new(StepRegistry::standard(RegistryOptions::default())));

#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: HashMap<StepId, StepDefinition>,
    order: Vec<StepId>,
}

impl StepRegistry {
    /// Shared registry built with default options.
    pub fn shared() -> Arc<StepRegistry> {
        Arc::clone(&DEFAULT_REGISTRY)
    }

    /// Builds a registry from definitions, rejecting duplicates and
    /// dangling transitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = StepDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut steps = HashMap::new();
        let mut order = Vec::new();

        for definition in definitions {
            let id = definition.id.clone();
            if steps.insert(id.clone(), definition).is_some() {
                return Err(ConfigurationError::DuplicateStep(id.to_string()));
            }
            order.push(id);
        }

        let registry = Self { steps, order };
        registry.validate()?;
        Ok(registry)
    }

    /// The canonical survey graph.
    pub fn standard(options: RegistryOptions) -> Self {
        let definitions = standard_definitions(options);
        let order = definitions.iter().map(|d| d.id.clone()).collect();
        let steps = definitions.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self { steps, order }
    }

    /// Resolves a step id. Unknown ids are a broken graph, never defaulted.
    pub fn lookup(&self, step_id: &str) -> Result<&StepDefinition, ConfigurationError> {
        self.steps
            .get(step_id)
            .ok_or_else(|| ConfigurationError::UnknownStep(step_id.to_string()))
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }

    /// Definitions in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.order.iter().filter_map(|id| self.steps.get(id))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Checks the whole table: successors resolve, exactly the terminal
    /// step lacks one, handlers exist, and static steps can render.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.contains(StepId::INTRO) {
            return Err(ConfigurationError::UnknownStep(StepId::INTRO.to_string()));
        }
        let terminal = self.lookup(StepId::COMPLETE)?;
        if !terminal.is_terminal() {
            return Err(ConfigurationError::IncompleteStep(StepId::COMPLETE.to_string()));
        }

        for def in self.iter() {
            match &def.next_step {
                Some(next) if !self.contains(next.as_str()) => {
                    return Err(ConfigurationError::MissingTransition {
                        from: def.id.to_string(),
                        to: next.to_string(),
                    });
                }
                None if !def.id.is_complete() => {
                    return Err(ConfigurationError::MissingSuccessor(def.id.to_string()));
                }
                _ => {}
            }

            match def.kind {
                StepKind::Static => {
                    if def.prompt.is_none() || def.ui_component.is_none() {
                        return Err(ConfigurationError::IncompleteStep(def.id.to_string()));
                    }
                }
                StepKind::Dynamic | StepKind::Iterative => {
                    let name = def
                        .handler_name
                        .as_deref()
                        .ok_or_else(|| ConfigurationError::MissingHandler(def.id.to_string()))?;
                    let handler = HandlerKind::from_name(name).ok_or_else(|| {
                        ConfigurationError::UnknownHandler {
                            step_id: def.id.to_string(),
                            handler: name.to_string(),
                        }
                    })?;
                    for target in handler.fixed_targets() {
                        if !self.contains(target) {
                            return Err(ConfigurationError::MissingTransition {
                                from: def.id.to_string(),
                                to: target.to_string(),
                            });
                        }
                    }
                }
            }

            if def.kind == StepKind::Iterative && def.iterate_over_key.is_none() {
                return Err(ConfigurationError::MissingIterationSource(def.id.to_string()));
            }

            if let Some(component) = &def.ui_component {
                component
                    .check_renderable()
                    .map_err(|_| ConfigurationError::IncompleteStep(def.id.to_string()))?;
            }
        }
        Ok(())
    }
}

const INTRO_MESSAGE: &str = "**Welcome to the Workflow Survey**\n\n\
Thank you for taking 10-15 minutes to help us work smarter across our agencies.\n\n\
**Our Objective**\n\n\
We're mapping workflows across all agencies to identify where AI and automation can remove \
repetitive tasks, freeing up time for the strategic and creative work that drives real value \
for our clients.\n\n\
**What We're Looking For**\n\n\
• Which tasks take up most of your time\n\
• Where you face bottlenecks or repetitive processes\n\
• What administrative work pulls you away from higher-value activities\n\n\
**Important to Know**\n\n\
• This is about understanding workflows, not individual performance\n\
• Your responses will directly shape how we introduce AI tools to support your work\n\
• The survey adapts its questions to your role";

const PHASE_OVERVIEW_MESSAGE: &str = "We've already mapped out typical workflows with focus \
groups from your agency teams. Now we want to hear from you directly: which phases are you \
involved in, and where does your time actually go?\n\n\
Later, we'll ask about the tools you use, so we can focus on solutions that genuinely make \
your work easier.";

fn options_of(values: &[&str]) -> Vec<ChoiceOption> {
    values.iter().map(|v| ChoiceOption::plain(*v)).collect()
}

fn choices_of(options: &[CatalogOption]) -> Vec<ChoiceOption> {
    options
        .iter()
        .map(|o| ChoiceOption::new(o.label, o.value))
        .collect()
}

fn standard_definitions(options: RegistryOptions) -> Vec<StepDefinition> {
    let mut departments = options_of(catalog::DEPARTMENTS);
    departments.push(ChoiceOption::new("Other", "other"));

    let billability = catalog::BILLABILITY_CATEGORIES
        .iter()
        .map(|c| PercentageItem {
            label: c.label.to_string(),
            key: c.key.to_string(),
            description: Some(c.description.to_string()),
        })
        .collect();

    let phases = catalog::WORKFLOW_PHASES
        .iter()
        .map(|p| ChoiceOption::new(p.label, p.value).with_description(p.description))
        .collect();

    let after_tools = if options.tool_phase_mapping {
        StepId::MAP_TOOLS_START
    } else {
        StepId::AI_INTEGRATION
    };

    vec![
        StepDefinition::fixed(
            StepId::INTRO,
            "Welcome! Before we start, here's what this survey is all about:",
            UiComponent::info(INTRO_MESSAGE, true),
            StepId::GREETING_AGENCY,
        ),
        StepDefinition::fixed(
            StepId::GREETING_AGENCY,
            "Which agency do you work for?",
            UiComponent::buttons(options_of(catalog::AGENCIES), 2),
            StepId::DEPARTMENT,
        ),
        StepDefinition::fixed(
            StepId::DEPARTMENT,
            "Great! Which team/department are you in?",
            UiComponent::buttons(departments, 2),
            StepId::ROLE,
        ),
        StepDefinition::dynamic(StepId::ROLE, HandlerKind::Role.name(), StepId::JOB_LEVEL),
        StepDefinition::fixed(
            StepId::JOB_LEVEL,
            "What's your current job level?",
            UiComponent::buttons(options_of(catalog::JOB_LEVELS), 1),
            StepId::WORK_TYPE_DISTRIBUTION,
        ),
        StepDefinition::fixed(
            StepId::WORK_TYPE_DISTRIBUTION,
            "Can you estimate what percentage of your time is spent on these categories?",
            UiComponent::percentage_table(billability),
            StepId::PRIMARY_FOCUS,
        ),
        StepDefinition::fixed(
            StepId::PRIMARY_FOCUS,
            "Would you describe your work as primarily:",
            UiComponent::buttons(options_of(catalog::WORK_FOCUS), 1),
            StepId::PHASE_OVERVIEW_INTRO,
        ),
        StepDefinition::fixed(
            StepId::PHASE_OVERVIEW_INTRO,
            "Now let's talk about your workflow phases:",
            UiComponent::info(PHASE_OVERVIEW_MESSAGE, true),
            StepId::PHASE_SELECTION,
        ),
        StepDefinition::fixed(
            StepId::PHASE_SELECTION,
            "Which of these project phases are you actively involved in?\n\n(Select all that apply)",
            UiComponent::multi_select(phases, Some(1), None),
            StepId::PHASE_TIME_ALLOCATION,
        ),
        StepDefinition::dynamic(
            StepId::PHASE_TIME_ALLOCATION,
            HandlerKind::PhaseAllocation.name(),
            StepId::DEEP_DIVE_START,
        ),
        StepDefinition::iterative(
            StepId::DEEP_DIVE_START,
            HandlerKind::DeepDive.name(),
            StepId::PHASE_SELECTION,
            StepId::COLLECT_TOOLS,
        ),
        StepDefinition::dynamic(StepId::COLLECT_TOOLS, HandlerKind::Tools.name(), after_tools),
        StepDefinition::iterative(
            StepId::MAP_TOOLS_START,
            HandlerKind::MapTools.name(),
            StepId::PHASE_SELECTION,
            StepId::AI_INTEGRATION,
        ),
        StepDefinition::dynamic(
            StepId::AI_INTEGRATION,
            HandlerKind::AiIntegration.name(),
            StepId::AI_TOOLS_DETAILS,
        )
        .with_content(
            "Do you use AI tools in your work?",
            UiComponent::buttons(choices_of(catalog::AI_USAGE_OPTIONS), 1),
        ),
        StepDefinition::fixed(
            StepId::AI_TOOLS_DETAILS,
            "Which AI tools do you currently use?\n\n(Select from suggestions or add your own)",
            UiComponent::SmartMultiSelect(SmartMultiSelectProps {
                suggestions: catalog::AI_TOOL_SUGGESTIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                question: None,
                placeholder: Some("Type an AI tool name...".to_string()),
                min: Some(1),
                max: None,
                allow_custom_input: true,
            }),
            StepId::TIME_WASTERS,
        ),
        StepDefinition::dynamic(
            StepId::TIME_WASTERS,
            HandlerKind::PainPoints.name(),
            StepId::COLLABORATION_FRICTION,
        ),
        StepDefinition::fixed(
            StepId::COLLABORATION_FRICTION,
            "Which of these collaboration frictions do you experience?",
            UiComponent::buttons(choices_of(catalog::COLLABORATION_FRICTIONS), 1),
            StepId::AUTOMATION_IDENTIFICATION,
        ),
        StepDefinition::dynamic(
            StepId::AUTOMATION_IDENTIFICATION,
            HandlerKind::Automation.name(),
            StepId::MAGIC_WAND_AUTOMATION,
        ),
        StepDefinition::fixed(
            StepId::MAGIC_WAND_AUTOMATION,
            "If you could wave a magic wand and automate any three things in your role, what would they be?\n\n(Pick up to 3)",
            UiComponent::multi_select(choices_of(catalog::AUTOMATION_WISHES), Some(1), Some(3)),
            StepId::QUICK_RECAP,
        ),
        StepDefinition::dynamic(StepId::QUICK_RECAP, HandlerKind::Recap.name(), StepId::COMPLETE),
        StepDefinition::terminal(
            StepId::COMPLETE,
            "Thank you so much for completing this workflow interview! Your insights are incredibly valuable.\n\nYour answers have been saved. Have a great day!",
            UiComponent::info("Survey complete! Thank you for your time.", false),
        ),
    ]
}
