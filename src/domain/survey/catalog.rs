//! Survey catalog - the fixed option lists the interview draws from.
//!
//! Both the step registry (static components) and the handlers (generated
//! per-phase questions) read from here, so an option list is only ever
//! declared once.

/// A labelled choice with a stable machine value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// An item of a percentage allocation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    pub label: &'static str,
    pub key: &'static str,
    pub description: &'static str,
}

/// One of the project phases a respondent can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowPhase {
    pub label: &'static str,
    pub value: &'static str,
    pub description: &'static str,
}

/// An activity that typically happens inside a workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub name: &'static str,
    pub typical_roles: &'static [&'static str],
}

pub const AGENCIES: &[&str] = &[
    "MSQ",
    "UDG",
    "MMT",
    "26PMX",
    "Miri",
    "Walk-in-Media",
    "The Gate",
    "The Gate US",
    "Elmwood",
    "Sport+Ents",
    "Stein",
    "SPCSHP",
    "M3 Labs",
    "Wooshii Assist",
    "Smarts Global",
    "The Forge",
    "Freemavens",
    "Precious Media",
];

pub const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Consulting",
    "Finance",
    "Client Services",
    "Service Delivery",
    "Experience Design",
    "Exec Team",
    "People",
    "Growth",
    "Operations",
    "IT",
];

pub const JOB_LEVELS: &[&str] = &[
    "Early career (Less than 3 years)",
    "Mid-level (3-5 years)",
    "Senior (6-10 years)",
    "Expert/Executive (More than 10 years)",
];

pub const WORK_FOCUS: &[&str] = &[
    "Individual contributor (hands-on execution)",
    "Team management + some execution",
    "Primarily management/oversight",
    "Client-facing/relationship management",
    "Cross-functional/strategic",
    "Other",
];

pub const BILLABILITY_CATEGORIES: &[CatalogItem] = &[
    CatalogItem {
        label: "Client billable",
        key: "billable",
        description: "Work that can be invoiced to clients: project delivery, client meetings, revisions.",
    },
    CatalogItem {
        label: "New business",
        key: "business_dev",
        description: "Pursuing new clients or opportunities: pitches, proposals, networking.",
    },
    CatalogItem {
        label: "Internal operations/admin",
        key: "internal_ops",
        description: "Running the agency itself: internal meetings, training, HR, finance, systems.",
    },
];

pub const WORKFLOW_PHASES: &[WorkflowPhase] = &[
    WorkflowPhase {
        label: "PROJECT INITIATION & SETUP",
        value: "initiation",
        description: "Scoping, pricing, contracts, project setup",
    },
    WorkflowPhase {
        label: "DISCOVERY & PLANNING",
        value: "discovery",
        description: "Requirements, strategy, design discovery",
    },
    WorkflowPhase {
        label: "DELIVERY & EXECUTION",
        value: "delivery",
        description: "Development, design, testing, infrastructure",
    },
    WorkflowPhase {
        label: "CLIENT DELIVERY & GOVERNANCE",
        value: "governance",
        description: "Sprint demos, status updates, client comms",
    },
    WorkflowPhase {
        label: "PROJECT CLOSURE",
        value: "closure",
        description: "Final delivery, handover, retrospectives",
    },
];

pub const AI_USAGE_OPTIONS: &[CatalogOption] = &[
    CatalogOption {
        label: "Yes, actively using AI tools",
        value: "active",
    },
    CatalogOption {
        label: "Sometimes/experimenting",
        value: "experimental",
    },
    CatalogOption {
        label: "No, not using AI",
        value: "no",
    },
];

pub const AI_TOOL_SUGGESTIONS: &[&str] = &[
    "ChatGPT",
    "Claude",
    "Midjourney",
    "Dall-E",
    "GitHub Copilot",
    "Cursor",
    "Notion AI",
    "Grammarly",
    "Jasper",
    "Copy.ai",
    "Runway",
    "ElevenLabs",
    "Synthesia",
    "Other - Add your own",
];

pub const COLLABORATION_FRICTIONS: &[CatalogOption] = &[
    CatalogOption {
        label: "Different tools across teams",
        value: "tool_differences",
    },
    CatalogOption {
        label: "Communication gaps",
        value: "communication",
    },
    CatalogOption {
        label: "Process misalignment",
        value: "process",
    },
    CatalogOption {
        label: "No major friction",
        value: "none",
    },
];

pub const AUTOMATION_WISHES: &[CatalogOption] = &[
    CatalogOption {
        label: "Reporting & documentation",
        value: "reporting",
    },
    CatalogOption {
        label: "Data entry & migration",
        value: "data_entry",
    },
    CatalogOption {
        label: "Status updates & communication",
        value: "status_updates",
    },
    CatalogOption {
        label: "Design handoffs",
        value: "design_handoff",
    },
    CatalogOption {
        label: "Testing & QA",
        value: "testing",
    },
    CatalogOption {
        label: "Client feedback collection",
        value: "feedback",
    },
    CatalogOption {
        label: "Resource planning",
        value: "resource_planning",
    },
    CatalogOption {
        label: "Other",
        value: "other",
    },
];

const INITIATION_ACTIVITIES: &[Activity] = &[
    Activity {
        name: "Initial client brief review",
        typical_roles: &["Account Manager", "Project Manager"],
    },
    Activity {
        name: "Scope definition & requirements gathering",
        typical_roles: &["Project Manager", "Technical Lead"],
    },
    Activity {
        name: "Pricing & estimation",
        typical_roles: &["Project Manager", "Finance"],
    },
    Activity {
        name: "Contract negotiation & setup",
        typical_roles: &["Account Manager", "Legal"],
    },
    Activity {
        name: "Project kickoff & team allocation",
        typical_roles: &["Project Manager", "Resource Manager"],
    },
    Activity {
        name: "Financial setup & budget planning",
        typical_roles: &["Finance", "Project Manager"],
    },
];

const DISCOVERY_ACTIVITIES: &[Activity] = &[
    Activity {
        name: "Requirements workshops & stakeholder interviews",
        typical_roles: &["UX Designer", "Business Analyst"],
    },
    Activity {
        name: "User research & testing",
        typical_roles: &["UX Researcher", "UX Designer"],
    },
    Activity {
        name: "Design discovery & conceptual design",
        typical_roles: &["UX Designer", "UI Designer"],
    },
    Activity {
        name: "Technical discovery & architecture planning",
        typical_roles: &["Technical Lead", "Architect"],
    },
    Activity {
        name: "Strategy definition & roadmap planning",
        typical_roles: &["Strategist", "Product Owner"],
    },
    Activity {
        name: "Content strategy & IA planning",
        typical_roles: &["Content Strategist", "Information Architect"],
    },
];

const DELIVERY_ACTIVITIES: &[Activity] = &[
    Activity {
        name: "Visual design & design system creation",
        typical_roles: &["UI Designer", "Design Lead"],
    },
    Activity {
        name: "Frontend development",
        typical_roles: &["Frontend Developer", "Full Stack Developer"],
    },
    Activity {
        name: "Backend development & API integration",
        typical_roles: &["Backend Developer", "Full Stack Developer"],
    },
    Activity {
        name: "Content creation & migration",
        typical_roles: &["Content Manager", "Copywriter"],
    },
    Activity {
        name: "Testing & QA",
        typical_roles: &["QA Tester", "Developer"],
    },
    Activity {
        name: "Infrastructure setup & DevOps",
        typical_roles: &["DevOps Engineer", "Technical Lead"],
    },
    Activity {
        name: "Backlog management & sprint planning",
        typical_roles: &["Project Manager", "Scrum Master"],
    },
];

const GOVERNANCE_ACTIVITIES: &[Activity] = &[
    Activity {
        name: "Sprint demos & client presentations",
        typical_roles: &["Project Manager", "Technical Lead"],
    },
    Activity {
        name: "Status reporting & documentation",
        typical_roles: &["Project Manager", "Account Manager"],
    },
    Activity {
        name: "Client communication & relationship management",
        typical_roles: &["Account Manager", "Project Manager"],
    },
    Activity {
        name: "Financial reporting & budget tracking",
        typical_roles: &["Finance", "Project Manager"],
    },
    Activity {
        name: "Risk & issue management",
        typical_roles: &["Project Manager", "Technical Lead"],
    },
    Activity {
        name: "Change request management",
        typical_roles: &["Project Manager", "Account Manager"],
    },
];

const CLOSURE_ACTIVITIES: &[Activity] = &[
    Activity {
        name: "Final delivery & sign-off",
        typical_roles: &["Project Manager", "Account Manager"],
    },
    Activity {
        name: "Documentation & handover",
        typical_roles: &["Developer", "Project Manager"],
    },
    Activity {
        name: "Retrospectives & lessons learned",
        typical_roles: &["Project Manager", "Team"],
    },
    Activity {
        name: "Case study creation",
        typical_roles: &["Marketing", "Account Manager"],
    },
    Activity {
        name: "Account planning & upsell opportunities",
        typical_roles: &["Account Manager", "Business Development"],
    },
];

/// Looks up a workflow phase by its machine value.
pub fn phase_by_value(value: &str) -> Option<&'static WorkflowPhase> {
    WORKFLOW_PHASES.iter().find(|p| p.value == value)
}

/// Looks up a workflow phase by its display label.
pub fn phase_by_label(label: &str) -> Option<&'static WorkflowPhase> {
    WORKFLOW_PHASES.iter().find(|p| p.label == label)
}

/// Display label for a phase key, falling back to the key itself.
pub fn phase_label(value: &str) -> &str {
    phase_by_value(value).map(|p| p.label).unwrap_or(value)
}

/// Activities within a phase. Unknown phases have none.
pub fn activities_for(phase_value: &str) -> &'static [Activity] {
    match phase_value {
        "initiation" => INITIATION_ACTIVITIES,
        "discovery" => DISCOVERY_ACTIVITIES,
        "delivery" => DELIVERY_ACTIVITIES,
        "governance" => GOVERNANCE_ACTIVITIES,
        "closure" => CLOSURE_ACTIVITIES,
        _ => &[],
    }
}

/// Turns an activity name into a stable answer key,
/// e.g. `"Testing & QA"` becomes `"testing_qa"`.
pub fn activity_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if pending_separator && !key.is_empty() {
        key.push('_');
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phase_has_activities() {
        for phase in WORKFLOW_PHASES {
            assert!(
                !activities_for(phase.value).is_empty(),
                "phase {} has no activities",
                phase.value
            );
        }
    }

    #[test]
    fn unknown_phase_has_no_activities() {
        assert!(activities_for("marketing").is_empty());
    }

    #[test]
    fn phase_lookup_by_label_and_value_agree() {
        let by_label = phase_by_label("DELIVERY & EXECUTION").unwrap();
        let by_value = phase_by_value("delivery").unwrap();
        assert_eq!(by_label, by_value);
    }

    #[test]
    fn phase_label_falls_back_to_key() {
        assert_eq!(phase_label("governance"), "CLIENT DELIVERY & GOVERNANCE");
        assert_eq!(phase_label("custom_phase"), "custom_phase");
    }

    #[test]
    fn activity_key_collapses_punctuation_runs() {
        assert_eq!(activity_key("Testing & QA"), "testing_qa");
        assert_eq!(activity_key("Scope definition & requirements gathering"), "scope_definition_requirements_gathering");
        assert_eq!(activity_key("Content strategy & IA planning"), "content_strategy_ia_planning");
    }

    #[test]
    fn activity_keys_are_unique_within_a_phase() {
        for phase in WORKFLOW_PHASES {
            let mut keys: Vec<String> = activities_for(phase.value)
                .iter()
                .map(|a| activity_key(a.name))
                .collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), total, "duplicate activity key in {}", phase.value);
        }
    }

    #[test]
    fn ai_usage_values_match_routing_vocabulary() {
        let values: Vec<&str> = AI_USAGE_OPTIONS.iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["active", "experimental", "no"]);
    }
}
