//! Connectors whose credential check is a local format rule.
//!
//! These services have no verification endpoint in DevHub. Connecting checks
//! the key shape only, and tool calls return an acknowledgement describing
//! the validated request instead of contacting the service.

use super::catalog::{self, ToolParam, ToolSpec};
use super::session::SessionSlot;
use crate::service_registry::domain::{
    API_KEY_FIELD, CredentialSet, ServiceKind, ToolCallError, ToolDefinition,
};
use crate::service_registry::ports::{Connector, ConnectorError, ConnectorResult};
use async_trait::async_trait;
use serde_json::{Map, Value, json};

/// Local credential rule.
#[derive(Debug, Clone, Copy)]
enum FormatRule {
    MinLength(usize),
    WithField(&'static str),
}

#[derive(Debug)]
struct OfflineProfile {
    kind: ServiceKind,
    rule: FormatRule,
    tools: &'static [ToolSpec],
}

const URL: ToolParam = ToolParam::required("url");
const PROJECT_ID: ToolParam = ToolParam::required("project_id");
const PROJECT_SLUG: ToolParam = ToolParam::required("project_slug");
const FILE_ID: ToolParam = ToolParam::required("file_id");

const AUTH: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Auth,
    rule: FormatRule::MinLength(10),
    tools: &[
        ToolSpec::new("list_providers", "List configured OAuth providers", &[]),
        ToolSpec::new(
            "validate_token",
            "Check an access token",
            &[ToolParam::required("token")],
        ),
        ToolSpec::new(
            "revoke_token",
            "Revoke an access token",
            &[ToolParam::required("token")],
        ),
    ],
};

const SEQUENTIAL_THINKING: OfflineProfile = OfflineProfile {
    kind: ServiceKind::SequentialThinking,
    rule: FormatRule::MinLength(10),
    tools: &[
        ToolSpec::new(
            "solve_with_reasoning",
            "Break a problem into reasoning steps",
            &[ToolParam::required("problem")],
        ),
        ToolSpec::new(
            "revise_step",
            "Replace one step of a reasoning chain",
            &[
                ToolParam::required("chain_id"),
                ToolParam::required("step_number").integer(),
                ToolParam::required("new_reasoning"),
            ],
        ),
        ToolSpec::new(
            "analyze_alternative",
            "Reason about a problem with a given approach",
            &[ToolParam::required("problem"), ToolParam::required("approach")],
        ),
    ],
};

const BROWSER: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Browser,
    rule: FormatRule::MinLength(5),
    tools: &[
        ToolSpec::new("navigate_to_url", "Open a page", &[URL]),
        ToolSpec::new("capture_console_logs", "Collect console output of a page", &[URL]),
        ToolSpec::new("take_screenshot", "Capture a page screenshot", &[URL]),
        ToolSpec::new(
            "capture_network_requests",
            "Collect network requests of a page",
            &[URL],
        ),
        ToolSpec::new("get_page_source", "Fetch the HTML source of a page", &[URL]),
        ToolSpec::new(
            "inspect_element",
            "Inspect an element by CSS selector",
            &[URL, ToolParam::required("selector")],
        ),
    ],
};

const FIGMA: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Figma,
    rule: FormatRule::MinLength(10),
    tools: &[
        ToolSpec::new("list_figma_files", "List design files", &[]),
        ToolSpec::new("get_file_frames", "List frames of a file", &[FILE_ID]),
        ToolSpec::new(
            "get_frame_elements",
            "List elements of a frame",
            &[FILE_ID, ToolParam::required("frame_id")],
        ),
        ToolSpec::new("list_components", "List components of a file", &[FILE_ID]),
        ToolSpec::new("get_design_specs", "Extract design tokens of a file", &[FILE_ID]),
        ToolSpec::new(
            "generate_component_code",
            "Generate code for a component",
            &[
                FILE_ID,
                ToolParam::required("component_id"),
                ToolParam::optional("framework"),
            ],
        ),
    ],
};

const SUPABASE: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Supabase,
    rule: FormatRule::WithField("projectUrl"),
    tools: &[
        ToolSpec::new("list_tables", "List database tables", &[]),
        ToolSpec::new(
            "get_table_schema",
            "Describe the columns of a table",
            &[ToolParam::required("table_name")],
        ),
        ToolSpec::new("get_auth_config", "Report auth settings", &[]),
        ToolSpec::new("list_functions", "List edge functions", &[]),
        ToolSpec::new("get_database_stats", "Report database statistics", &[]),
    ],
};

const VERCEL: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Vercel,
    rule: FormatRule::MinLength(10),
    tools: &[
        ToolSpec::new("list_projects", "List projects", &[]),
        ToolSpec::new("get_project_details", "Describe a project", &[PROJECT_ID]),
        ToolSpec::new("list_deployments", "List deployments of a project", &[PROJECT_ID]),
        ToolSpec::new(
            "get_environment_variables",
            "List environment variables of a project",
            &[PROJECT_ID],
        ),
        ToolSpec::new(
            "deploy_project",
            "Trigger a deployment",
            &[PROJECT_ID, ToolParam::optional("git_commit")],
        ),
    ],
};

const SENTRY: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Sentry,
    rule: FormatRule::WithField("organizationSlug"),
    tools: &[
        ToolSpec::new("list_projects", "List projects of the organization", &[]),
        ToolSpec::new("list_issues", "List issues of a project", &[PROJECT_SLUG]),
        ToolSpec::new(
            "get_issue_details",
            "Describe an issue",
            &[PROJECT_SLUG, ToolParam::required("issue_id")],
        ),
        ToolSpec::new(
            "resolve_issue",
            "Mark an issue resolved",
            &[PROJECT_SLUG, ToolParam::required("issue_id")],
        ),
        ToolSpec::new("list_releases", "List releases of a project", &[PROJECT_SLUG]),
    ],
};

const TASKMASTER: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Taskmaster,
    rule: FormatRule::MinLength(5),
    tools: &[
        ToolSpec::new("list_projects", "List projects", &[]),
        ToolSpec::new("list_tasks", "List tasks of a project", &[PROJECT_ID]),
        ToolSpec::new(
            "create_task",
            "Create a task",
            &[
                PROJECT_ID,
                ToolParam::required("title"),
                ToolParam::optional("description"),
            ],
        ),
        ToolSpec::new(
            "complete_task",
            "Mark a task complete",
            &[ToolParam::required("task_id")],
        ),
        ToolSpec::new("list_sprints", "List sprints of a project", &[PROJECT_ID]),
        ToolSpec::new("get_project_stats", "Summarize project progress", &[PROJECT_ID]),
    ],
};

const DESKTOP_COMMANDER: OfflineProfile = OfflineProfile {
    kind: ServiceKind::DesktopCommander,
    rule: FormatRule::MinLength(5),
    tools: &[
        ToolSpec::new(
            "execute_command",
            "Run a shell command",
            &[ToolParam::required("command")],
        ),
        ToolSpec::new("list_processes", "List running processes", &[]),
        ToolSpec::new("get_system_stats", "Report CPU and memory usage", &[]),
        ToolSpec::new(
            "kill_process",
            "Terminate a process",
            &[ToolParam::required("pid").integer()],
        ),
    ],
};

const DEV21: OfflineProfile = OfflineProfile {
    kind: ServiceKind::Dev21,
    rule: FormatRule::MinLength(5),
    tools: &[
        ToolSpec::new(
            "generate_code",
            "Generate a component from a description",
            &[
                ToolParam::required("description"),
                ToolParam::optional("framework"),
            ],
        ),
        ToolSpec::new(
            "generate_project_scaffold",
            "Generate a project skeleton",
            &[
                ToolParam::required("project_name"),
                ToolParam::required("framework"),
            ],
        ),
        ToolSpec::new(
            "generate_readme",
            "Generate a README",
            &[
                ToolParam::required("project_name"),
                ToolParam::required("description"),
            ],
        ),
    ],
};

/// Connector validating credentials locally.
#[derive(Debug)]
pub struct OfflineConnector {
    profile: &'static OfflineProfile,
    session: SessionSlot<()>,
}

impl OfflineConnector {
    /// Builds the connector for `kind`, or `None` when `kind` needs a
    /// network check.
    #[must_use]
    pub fn for_kind(kind: ServiceKind) -> Option<Self> {
        let profile = match kind {
            ServiceKind::Auth => &AUTH,
            ServiceKind::SequentialThinking => &SEQUENTIAL_THINKING,
            ServiceKind::Browser => &BROWSER,
            ServiceKind::Figma => &FIGMA,
            ServiceKind::Supabase => &SUPABASE,
            ServiceKind::Vercel => &VERCEL,
            ServiceKind::Sentry => &SENTRY,
            ServiceKind::Taskmaster => &TASKMASTER,
            ServiceKind::DesktopCommander => &DESKTOP_COMMANDER,
            ServiceKind::Dev21 => &DEV21,
            _ => return None,
        };
        Some(Self {
            profile,
            session: SessionSlot::default(),
        })
    }

    fn check(&self, credentials: &CredentialSet) -> Result<(), String> {
        let key = credentials
            .get(API_KEY_FIELD)
            .ok_or_else(|| "API key is required".to_owned())?;
        match self.profile.rule {
            FormatRule::MinLength(minimum) if key.chars().count() < minimum => Err(format!(
                "API key must be at least {minimum} characters"
            )),
            FormatRule::WithField(field) if credentials.get(field).is_none() => {
                Err(format!("{field} is required"))
            }
            FormatRule::MinLength(_) | FormatRule::WithField(_) => Ok(()),
        }
    }
}

#[async_trait]
impl Connector for OfflineConnector {
    fn kind(&self) -> ServiceKind {
        self.profile.kind
    }

    async fn connect(&self, credentials: &CredentialSet) -> ConnectorResult<()> {
        self.session.clear();
        self.check(credentials)
            .map_err(|reason| ConnectorError::invalid_credentials(self.profile.kind, reason))?;
        self.session.set(());
        Ok(())
    }

    async fn disconnect(&self) {
        self.session.clear();
    }

    fn is_connected(&self) -> bool {
        self.session.is_set()
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        catalog::definitions(self.profile.tools)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolCallError> {
        let spec = catalog::find(self.profile.tools, name)?;
        if !self.session.is_set() {
            return Err(ToolCallError::NotConnected(self.profile.kind));
        }
        let accepted = spec.accept(arguments)?;
        Ok(json!({
            "service": self.profile.kind.as_str(),
            "tool": spec.name,
            "arguments": accepted,
            "mode": "offline",
        }))
    }
}
