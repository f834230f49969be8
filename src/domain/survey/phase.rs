//! Survey phases.
//!
//! A phase is a coarse grouping of steps used for progress display and for
//! grouping history. Branching never depends on it.

use serde::{Deserialize, Serialize};

use super::step_id::StepId;

/// Coarse position of a step in the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyPhase {
    Intro,
    Introduction,
    PhaseOverview,
    DeepDive,
    ToolMapping,
    Inefficiencies,
    Validation,
    /// Steps the classifier does not know about yet.
    #[serde(other)]
    Unknown,
}

impl SurveyPhase {
    /// Classifies a step id. Total: unrecognized ids land in `Unknown`.
    pub fn phase_of(step_id: &str) -> Self {
        match step_id {
            StepId::INTRO => Self::Intro,
            StepId::GREETING_AGENCY
            | StepId::DEPARTMENT
            | StepId::ROLE
            | StepId::JOB_LEVEL
            | StepId::WORK_TYPE_DISTRIBUTION
            | StepId::PRIMARY_FOCUS => Self::Introduction,
            StepId::PHASE_OVERVIEW_INTRO | StepId::PHASE_SELECTION | StepId::PHASE_TIME_ALLOCATION => {
                Self::PhaseOverview
            }
            StepId::DEEP_DIVE_START => Self::DeepDive,
            StepId::COLLECT_TOOLS
            | StepId::MAP_TOOLS_START
            | StepId::AI_INTEGRATION
            | StepId::AI_TOOLS_DETAILS => Self::ToolMapping,
            StepId::TIME_WASTERS
            | StepId::COLLABORATION_FRICTION
            | StepId::AUTOMATION_IDENTIFICATION
            | StepId::MAGIC_WAND_AUTOMATION => Self::Inefficiencies,
            StepId::QUICK_RECAP | StepId::COMPLETE => Self::Validation,
            _ => Self::Unknown,
        }
    }

    /// Machine label, as serialized.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Introduction => "introduction",
            Self::PhaseOverview => "phase_overview",
            Self::DeepDive => "deep_dive",
            Self::ToolMapping => "tool_mapping",
            Self::Inefficiencies => "inefficiencies",
            Self::Validation => "validation",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable name for progress headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Intro => "Welcome",
            Self::Introduction => "Introduction & Demographics",
            Self::PhaseOverview => "Phase Overview",
            Self::DeepDive => "Deep Dive",
            Self::ToolMapping => "Tool Mapping",
            Self::Inefficiencies => "Inefficiencies & Improvements",
            Self::Validation => "Validation & Review",
            Self::Unknown => "Unknown Phase",
        }
    }

    /// Inclusive progress band `(start, end)` covered by this phase.
    pub fn band(&self) -> Option<(u8, u8)> {
        match self {
            Self::Intro => Some((0, 5)),
            Self::Introduction => Some((6, 35)),
            Self::PhaseOverview => Some((36, 45)),
            Self::DeepDive => Some((46, 60)),
            Self::ToolMapping => Some((61, 75)),
            Self::Inefficiencies => Some((76, 90)),
            Self::Validation => Some((91, 100)),
            Self::Unknown => None,
        }
    }
}
