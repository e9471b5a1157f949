//! Generator backed by an already captured model response.

use super::{GenerationContext, RoadmapGenerator};
use crate::error::Result;
use crate::sanitize::{parse_generator_output, RawRoadmap};

/// Replays response text produced outside the engine, e.g. by an LLM agent
/// talking to the MCP server or a response saved to a file by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseGenerator {
    text: String,
}

impl ResponseGenerator {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl RoadmapGenerator for ResponseGenerator {
    fn name(&self) -> &str {
        "response"
    }

    fn generate(&self, _context: &GenerationContext) -> Result<RawRoadmap> {
        parse_generator_output(&self.text)
    }
}
