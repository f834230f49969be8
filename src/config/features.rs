//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for optional survey steps
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Insert the tool-to-phase mapping step after tool selection
    #[serde(default)]
    pub tool_phase_mapping: bool,
}
