//! MCP tool handler implementations
//!
//! Each handler takes the core parameter type directly: with the `schema`
//! feature enabled, `pathwise-core` params derive `JsonSchema` and can be
//! used as `Parameters<T>` without a wrapper.

use log::debug;
use pathwise_core::{
    display::{CreateResult, LifeEvents, OperationStatus, RoadmapHistory},
    params::{
        EvaluateRebalance, GenerateRoadmap, ListTasks, RebalanceRoadmap, SaveUser, SetWeek,
        UpdateTask, UpdateUser, UserId,
    },
    Navigator, PathwiseError,
};
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};

use super::errors::to_mcp_error;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(output: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(output.to_string())]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    navigator: Navigator,
}

impl McpHandlers {
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }

    pub async fn save_user(&self, Parameters(params): Parameters<SaveUser>) -> McpResult {
        debug!("save_user: {params:?}");

        let user = self
            .navigator
            .create_user(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to save user", &e))?;
        text(CreateResult::new(user))
    }

    pub async fn show_user(&self, Parameters(params): Parameters<UserId>) -> McpResult {
        debug!("show_user: {params:?}");

        let user = self
            .navigator
            .show_user(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get user", &e))?;
        text(user)
    }

    /// Applies the edit, then reports whether the change calls for a
    /// rebalance.
    pub async fn update_user(&self, Parameters(params): Parameters<UpdateUser>) -> McpResult {
        debug!("update_user: {params:?}");

        let update = self
            .navigator
            .update_user(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to update user", &e))?;

        let mut output = update.to_string();
        match self
            .navigator
            .evaluate_against(&params.user_id, Some(&update.previous))
            .await
        {
            Ok(recommendation) if recommendation.should_rebalance => {
                output.push('\n');
                output.push_str(&recommendation.to_string());
                output.push_str("\nCall `rebalance` to apply it.\n");
            }
            Ok(_) | Err(PathwiseError::NoActiveRoadmap { .. }) => {}
            Err(e) => return Err(to_mcp_error("Failed to evaluate rebalance", &e)),
        }
        text(output)
    }

    pub async fn generate_roadmap(
        &self,
        Parameters(params): Parameters<GenerateRoadmap>,
    ) -> McpResult {
        debug!(
            "generate_roadmap: user_id={} roadmap={} bytes",
            params.user_id,
            params.roadmap.as_ref().map_or(0, String::len)
        );

        let created = self
            .navigator
            .generate_roadmap(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to generate roadmap", &e))?;
        text(created)
    }

    pub async fn show_roadmap(&self, Parameters(params): Parameters<UserId>) -> McpResult {
        debug!("show_roadmap: {params:?}");

        let roadmap = self
            .navigator
            .active_roadmap(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get roadmap", &e))?;
        text(roadmap)
    }

    pub async fn roadmap_history(&self, Parameters(params): Parameters<UserId>) -> McpResult {
        debug!("roadmap_history: {params:?}");

        let history = self
            .navigator
            .roadmap_history(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get roadmap history", &e))?;
        text(format!(
            "# Roadmap history for {}\n\n{}",
            params.user_id,
            RoadmapHistory(history)
        ))
    }

    pub async fn current_week(&self, Parameters(params): Parameters<UserId>) -> McpResult {
        debug!("current_week: {params:?}");

        let view = self
            .navigator
            .current_week(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get current week", &e))?;
        text(view)
    }

    pub async fn set_current_week(&self, Parameters(params): Parameters<SetWeek>) -> McpResult {
        debug!("set_current_week: {params:?}");

        let moved = self
            .navigator
            .set_current_week(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to set current week", &e))?;
        if !moved {
            return text(OperationStatus::failure(format!(
                "User '{}' has no active roadmap. Call `generate_roadmap` first.",
                params.user_id
            )));
        }

        let view = self
            .navigator
            .current_week(&UserId {
                user_id: params.user_id.clone(),
            })
            .await
            .map_err(|e| to_mcp_error("Failed to get current week", &e))?;
        text(format!(
            "{}\n{view}",
            OperationStatus::success(format!(
                "Moved to week {} of {}",
                view.week.week_number, view.total_weeks
            ))
        ))
    }

    pub async fn list_tasks(&self, Parameters(params): Parameters<ListTasks>) -> McpResult {
        debug!("list_tasks: {params:?}");

        let tasks = self
            .navigator
            .list_tasks(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to list tasks", &e))?;
        text(tasks)
    }

    pub async fn update_task(&self, Parameters(params): Parameters<UpdateTask>) -> McpResult {
        debug!("update_task: {params:?}");

        let task = self
            .navigator
            .update_task(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to update task", &e))?;
        text(format!(
            "{}\n{task}",
            OperationStatus::success(format!("Marked task {} as {}", task.id, task.status))
        ))
    }

    pub async fn show_progress(&self, Parameters(params): Parameters<UserId>) -> McpResult {
        debug!("show_progress: {params:?}");

        let report = self
            .navigator
            .progress(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to compute progress", &e))?;
        text(report)
    }

    pub async fn evaluate_rebalance(
        &self,
        Parameters(params): Parameters<EvaluateRebalance>,
    ) -> McpResult {
        debug!("evaluate_rebalance: {params:?}");

        let recommendation = self
            .navigator
            .evaluate(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to evaluate rebalance", &e))?;
        text(recommendation)
    }

    pub async fn rebalance(&self, Parameters(params): Parameters<RebalanceRoadmap>) -> McpResult {
        debug!(
            "rebalance: user_id={} trigger={:?} life_event={:?} roadmap={} bytes",
            params.user_id,
            params.trigger,
            params.life_event,
            params.roadmap.as_ref().map_or(0, String::len)
        );

        let update = self
            .navigator
            .rebalance_roadmap(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to rebalance roadmap", &e))?;
        text(update)
    }

    pub fn list_life_events(&self) -> McpResult {
        debug!("list_life_events");
        text(format!("# Life events\n\n{}", LifeEvents))
    }
}
