//! Error handling utilities for MCP server

use pathwise_core::PathwiseError;
use rmcp::ErrorData;

/// Converts a navigator error into an MCP error. Caller mistakes become
/// `invalid_params` so the agent can correct its request.
pub fn to_mcp_error(message: &str, error: &PathwiseError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        PathwiseError::InvalidInput { .. }
        | PathwiseError::InvalidTransition { .. }
        | PathwiseError::UserNotFound { .. }
        | PathwiseError::RoadmapNotFound { .. }
        | PathwiseError::NoActiveRoadmap { .. }
        | PathwiseError::TaskNotFound { .. } => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}
