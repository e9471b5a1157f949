//! Pulls a JSON roadmap out of free-form generator text.

use serde_json::Value;

use super::RawRoadmap;
use crate::error::{PathwiseError, Result};

/// Parses generator text into a [`RawRoadmap`].
///
/// Markdown code fences around the payload are stripped. If the remaining
/// text is not valid JSON, the outermost `{...}` span and then the outermost
/// `[...]` span are tried.
pub fn parse_generator_output(text: &str) -> Result<RawRoadmap> {
    let clean = strip_code_fence(text.trim());
    if clean.is_empty() {
        return Err(PathwiseError::generation("generator returned an empty response"));
    }

    let value = serde_json::from_str::<Value>(clean)
        .ok()
        .or_else(|| outermost_span(clean, '{', '}'))
        .or_else(|| outermost_span(clean, '[', ']'))
        .ok_or_else(|| PathwiseError::generation("generator response contains no JSON roadmap"))?;

    Ok(RawRoadmap::from_value(value)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the opening fence line, including any language tag.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn outermost_span(text: &str, open: char, close: char) -> Option<Value> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}
