//! MCP server implementation for Pathwise
//!
//! Exposes the navigator to AI assistants over the Model Context Protocol.
//! The assistant doubles as the roadmap generator: it can pass its own
//! roadmap JSON to `generate_roadmap` and `rebalance`, which sanitize it and
//! fall back to the built-in generator when it is unusable.

use std::future::Future;

use anyhow::Result;
use log::{debug, error, info};
use pathwise_core::{
    params::{
        EvaluateRebalance, GenerateRoadmap, ListTasks, RebalanceRoadmap, SaveUser, SetWeek,
        UpdateTask, UpdateUser, UserId,
    },
    Navigator,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

use handlers::{McpHandlers, McpResult};

/// MCP server for Pathwise
#[derive(Clone)]
pub struct PathwiseMcpServer {
    navigator: Navigator,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PathwiseMcpServer {
    pub fn new(navigator: Navigator) -> Self {
        Self {
            navigator,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> McpHandlers {
        McpHandlers::new(self.navigator.clone())
    }

    #[tool(
        name = "save_user",
        description = "Create or replace a learner profile. Requires user_id, name, target_role and weekly_hours (3-40). Optional: email, skill_level (beginner/intermediate/advanced), deadline ('flexible', '3 months', '6 months', '1 year' or 'N weeks'), financial_constraint (free_only/mixed/paid_allowed), situation (student/working_professional/career_break/transitioning) and background."
    )]
    async fn save_user(&self, params: Parameters<SaveUser>) -> McpResult {
        self.handlers().save_user(params).await
    }

    #[tool(
        name = "show_user",
        description = "Show a learner profile: target role, weekly hours, deadline, situation and the active roadmap id."
    )]
    async fn show_user(&self, params: Parameters<UserId>) -> McpResult {
        self.handlers().show_user(params).await
    }

    #[tool(
        name = "update_user",
        description = "Edit a learner profile. Only the fields given change. The response lists the changes and, when a roadmap exists, whether they call for a rebalance."
    )]
    async fn update_user(&self, params: Parameters<UpdateUser>) -> McpResult {
        self.handlers().update_user(params).await
    }

    #[tool(
        name = "generate_roadmap",
        description = "Create the first roadmap for a user who has none. Optionally pass 'roadmap': a JSON object with total_weeks and phases (phase_name, phase_description, weeks with week_number, focus_skill, tasks, milestone, success_metric, resources). Malformed or missing fields are repaired; if nothing usable remains the built-in generator is used."
    )]
    async fn generate_roadmap(&self, params: Parameters<GenerateRoadmap>) -> McpResult {
        self.handlers().generate_roadmap(params).await
    }

    #[tool(
        name = "show_roadmap",
        description = "Show the user's active roadmap with every phase and week, marking the current week."
    )]
    async fn show_roadmap(&self, params: Parameters<UserId>) -> McpResult {
        self.handlers().show_roadmap(params).await
    }

    #[tool(
        name = "roadmap_history",
        description = "List every roadmap version of a user, most recent first, with the reason each rebalance happened."
    )]
    async fn roadmap_history(&self, params: Parameters<UserId>) -> McpResult {
        self.handlers().roadmap_history(params).await
    }

    #[tool(
        name = "current_week",
        description = "Show the current week of the active roadmap: focus skill, milestone, resources and the week's tasks with their ids and status."
    )]
    async fn current_week(&self, params: Parameters<UserId>) -> McpResult {
        self.handlers().current_week(params).await
    }

    #[tool(
        name = "set_current_week",
        description = "Move the active roadmap to a given week. Values outside the roadmap are clamped to the first or last week."
    )]
    async fn set_current_week(&self, params: Parameters<SetWeek>) -> McpResult {
        self.handlers().set_current_week(params).await
    }

    #[tool(
        name = "list_tasks",
        description = "List tasks of the active roadmap with ids and status, optionally for a single week."
    )]
    async fn list_tasks(&self, params: Parameters<ListTasks>) -> McpResult {
        self.handlers().list_tasks(params).await
    }

    #[tool(
        name = "update_task",
        description = "Mark a pending task as 'completed' or 'skipped'. Completed and skipped tasks cannot change again. Progress is recomputed afterwards."
    )]
    async fn update_task(&self, params: Parameters<UpdateTask>) -> McpResult {
        self.handlers().update_task(params).await
    }

    #[tool(
        name = "show_progress",
        description = "Show completion against the expected pace for the current week, including the share of tasks skipped in the last two weeks."
    )]
    async fn show_progress(&self, params: Parameters<UserId>) -> McpResult {
        self.handlers().show_progress(params).await
    }

    #[tool(
        name = "evaluate_rebalance",
        description = "Run the rebalance rules for a user. Pass previous_weekly_hours, previous_deadline or previous_situation to check a recent profile edit. Returns whether to rebalance, the trigger, severity and suggested actions. Does not change anything."
    )]
    async fn evaluate_rebalance(&self, params: Parameters<EvaluateRebalance>) -> McpResult {
        self.handlers().evaluate_rebalance(params).await
    }

    #[tool(
        name = "rebalance",
        description = "Replace the active roadmap with a rebalanced version. Optional: reason, weekly_hours, deadline, timeline_change_weeks (negative compresses), life_event (see list_life_events; excludes weekly_hours), trigger, and 'roadmap' holding your own rebalanced roadmap JSON with an optional rebalance_summary. Earlier versions stay in the history."
    )]
    async fn rebalance(&self, params: Parameters<RebalanceRoadmap>) -> McpResult {
        self.handlers().rebalance(params).await
    }

    #[tool(
        name = "list_life_events",
        description = "List the life events accepted by rebalance and how each changes weekly hours."
    )]
    async fn list_life_events(&self) -> McpResult {
        self.handlers().list_life_events()
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PathwiseMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pathwise".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Pathwise keeps a versioned, week-by-week learning roadmap towards a target job role and adapts it as the learner's progress and life change.

## Core Concepts
- **Profile**: target role, weekly hours (3-40), deadline, budget and situation
- **Roadmap version**: phases of numbered weeks; exactly one version per user is active and older versions are kept as history
- **Tasks**: one per task line of a week; each moves once from pending to completed or skipped
- **Progress**: completion compared with the share of weeks elapsed

## Workflow
1. `save_user`, then `generate_roadmap` (optionally with your own roadmap JSON)
2. `current_week` and `list_tasks` to see what is due; `update_task` as work is done or skipped
3. `set_current_week` when the learner moves on
4. `show_progress` and `evaluate_rebalance` to check pace
5. `rebalance` when recommended, when hours or the deadline change, or for a life event

## Generating roadmaps
When you pass roadmap JSON, use `total_weeks` and `phases`, each phase with `phase_name` and `weeks`; each week has `week_number`, `focus_skill`, `tasks`, `milestone`, `success_metric` and `resources`. Week numbers are renumbered to run 1..N across phases."#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: PathwiseMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!(
        "Starting Pathwise MCP server on stdio ({} store)",
        server.navigator.backend()
    );
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pathwise_core::NavigatorBuilder;

    use super::*;

    #[tokio::test]
    async fn test_server_registers_every_tool() {
        let navigator = NavigatorBuilder::new().in_memory().build().await.unwrap();
        let server = PathwiseMcpServer::new(navigator);

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "current_week",
                "evaluate_rebalance",
                "generate_roadmap",
                "list_life_events",
                "list_tasks",
                "rebalance",
                "roadmap_history",
                "save_user",
                "set_current_week",
                "show_progress",
                "show_roadmap",
                "show_user",
                "update_task",
                "update_user",
            ]
        );
    }

    #[tokio::test]
    async fn test_server_info_advertises_tools() {
        let navigator = NavigatorBuilder::new().in_memory().build().await.unwrap();
        let info = PathwiseMcpServer::new(navigator).get_info();
        assert_eq!(info.server_info.name, "pathwise");
        assert!(info.capabilities.tools.is_some());
    }
}
