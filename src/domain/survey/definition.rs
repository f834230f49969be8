//! Step definitions - static description of one point in the interview.

use super::component::UiComponent;
use super::step_id::StepId;

/// How a step produces its question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Fixed prompt and component.
    Static,
    /// Question produced at runtime by a handler.
    Dynamic,
    /// Handler loops over a collected list, one question per item.
    Iterative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub id: StepId,
    pub kind: StepKind,
    pub prompt: Option<String>,
    pub ui_component: Option<UiComponent>,
    pub handler_name: Option<String>,
    /// Default successor. `None` only for the terminal step.
    pub next_step: Option<StepId>,
    /// Collected-data key holding the list an iterative step walks.
    pub iterate_over_key: Option<String>,
}

impl StepDefinition {
    pub fn fixed(
        id: &str,
        prompt: impl Into<String>,
        component: UiComponent,
        next_step: &str,
    ) -> Self {
        Self {
            id: StepId::new(id),
            kind: StepKind::Static,
            prompt: Some(prompt.into()),
            ui_component: Some(component),
            handler_name: None,
            next_step: Some(StepId::new(next_step)),
            iterate_over_key: None,
        }
    }

    pub fn dynamic(id: &str, handler: &str, next_step: &str) -> Self {
        Self {
            id: StepId::new(id),
            kind: StepKind::Dynamic,
            prompt: None,
            ui_component: None,
            handler_name: Some(handler.to_string()),
            next_step: Some(StepId::new(next_step)),
            iterate_over_key: None,
        }
    }

    pub fn iterative(id: &str, handler: &str, iterate_over: &str, next_step: &str) -> Self {
        Self {
            kind: StepKind::Iterative,
            iterate_over_key: Some(iterate_over.to_string()),
            ..Self::dynamic(id, handler, next_step)
        }
    }

    /// Static step with no successor.
    pub fn terminal(id: &str, prompt: impl Into<String>, component: UiComponent) -> Self {
        Self {
            next_step: None,
            ..Self::fixed(id, prompt, component, id)
        }
    }

    /// Attaches a fixed prompt and component to a dynamic step.
    pub fn with_content(mut self, prompt: impl Into<String>, component: UiComponent) -> Self {
        self.prompt = Some(prompt.into());
        self.ui_component = Some(component);
        self
    }

    pub fn is_static(&self) -> bool {
        self.kind == StepKind::Static
    }

    pub fn is_terminal(&self) -> bool {
        self.next_step.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterative_keeps_handler_and_successor() {
        let def = StepDefinition::iterative("deep_dive_start", "deep-dive-handler", "phase_selection", "collect_tools");
        assert_eq!(def.kind, StepKind::Iterative);
        assert_eq!(def.handler_name.as_deref(), Some("deep-dive-handler"));
        assert_eq!(def.iterate_over_key.as_deref(), Some("phase_selection"));
        assert_eq!(def.next_step, Some(StepId::new("collect_tools")));
    }

    #[test]
    fn terminal_has_no_successor() {
        let def = StepDefinition::terminal("complete", "Thanks!", UiComponent::info("Done", false));
        assert!(def.is_static());
        assert!(def.is_terminal());
    }
}
