//! Step identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of one point in the interview graph.
///
/// Step ids travel through the client unchanged, so any string is accepted
/// here; resolving an id against the registry is where unknown ids fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub const INTRO: &'static str = "intro";
    pub const GREETING_AGENCY: &'static str = "greeting_agency";
    pub const DEPARTMENT: &'static str = "department";
    pub const ROLE: &'static str = "role";
    pub const JOB_LEVEL: &'static str = "job_level";
    pub const WORK_TYPE_DISTRIBUTION: &'static str = "work_type_distribution";
    pub const PRIMARY_FOCUS: &'static str = "primary_focus";
    pub const PHASE_OVERVIEW_INTRO: &'static str = "phase_overview_intro";
    pub const PHASE_SELECTION: &'static str = "phase_selection";
    pub const PHASE_TIME_ALLOCATION: &'static str = "phase_time_allocation";
    pub const DEEP_DIVE_START: &'static str = "deep_dive_start";
    pub const COLLECT_TOOLS: &'static str = "collect_tools";
    pub const MAP_TOOLS_START: &'static str = "map_tools_start";
    pub const AI_INTEGRATION: &'static str = "ai_integration";
    pub const AI_TOOLS_DETAILS: &'static str = "ai_tools_details";
    pub const TIME_WASTERS: &'static str = "time_wasters";
    pub const COLLABORATION_FRICTION: &'static str = "collaboration_friction";
    pub const AUTOMATION_IDENTIFICATION: &'static str = "automation_identification";
    pub const MAGIC_WAND_AUTOMATION: &'static str = "magic_wand_automation";
    pub const QUICK_RECAP: &'static str = "quick_recap";
    pub const COMPLETE: &'static str = "complete";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The first step of every survey.
    pub fn intro() -> Self {
        Self::new(Self::INTRO)
    }

    /// The terminal step.
    pub fn complete() -> Self {
        Self::new(Self::COMPLETE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_complete(&self) -> bool {
        self.0 == Self::COMPLETE
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StepId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StepId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_against_plain_strings() {
        let id = StepId::new("role");
        assert_eq!(id, "role");
        assert_eq!(id, StepId::ROLE);
    }

    #[test]
    fn only_complete_is_terminal() {
        assert!(StepId::complete().is_complete());
        assert!(!StepId::intro().is_complete());
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&StepId::new("job_level")).unwrap();
        assert_eq!(json, "\"job_level\"");
    }
}
