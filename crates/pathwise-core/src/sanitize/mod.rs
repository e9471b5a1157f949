//! Normalization of untrusted roadmap bodies.
//!
//! Generators (an LLM agent or the deterministic fallback) hand back JSON of
//! uncertain shape. It is first read into the loose [`RawRoadmap`] form, in
//! which every field is optional and numbers may arrive as strings, and then
//! [`sanitize`] turns it into a strict [`RoadmapBody`]:
//!
//! - phases without a name become `"Unnamed Phase"`
//! - weeks missing a field receive the documented defaults
//! - phase and week lists may be `null`, a single entry or hold stray values
//! - `total_weeks` follows the week count; a declared value is only kept for
//!   a body without weeks
//! - week numbers are rewritten to `1..=N` across all phases in order
//!
//! Sanitation is total: it never fails, and running it over its own output
//! changes nothing.
//!
//! ```rust
//! use pathwise_core::sanitize::{parse_generator_output, sanitize};
//!
//! let raw = parse_generator_output(
//!     r#"{"phases": [{"weeks": [{"week_number": 5}, {"week_number": 5}]},
//!                    {"weeks": [{"week_number": 1}]}]}"#,
//! )
//! .unwrap();
//! let body = sanitize(raw);
//!
//! let numbers: Vec<u32> = body.weeks().map(|w| w.week_number).collect();
//! assert_eq!(numbers, vec![1, 2, 3]);
//! assert_eq!(body.total_weeks, 3);
//! assert_eq!(body.phases[0].name, "Unnamed Phase");
//! ```

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::{Phase, Resource, RoadmapBody, Week};

mod extract;


pub use extract::parse_generator_output;

pub const DEFAULT_PHASE_NAME: &str = "Unnamed Phase";
pub const DEFAULT_WEEK_NUMBER: u32 = 1;
pub const DEFAULT_FOCUS_SKILL: &str = "General Learning";
pub const DEFAULT_MILESTONE: &str = "Complete weekly tasks";
pub const DEFAULT_SUCCESS_METRIC: &str = "All tasks completed";

/// A roadmap as a generator produced it, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRoadmap {
    #[serde(default)]
    pub total_weeks: Option<Loose>,
    #[serde(default, deserialize_with = "loose_phases")]
    pub phases: Vec<RawPhase>,
    /// Change report a generator may attach to a rebalanced roadmap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebalance_summary: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPhase {
    #[serde(default)]
    pub phase_name: Option<Loose>,
    #[serde(default)]
    pub phase_description: Option<Loose>,
    #[serde(default, deserialize_with = "loose_weeks")]
    pub weeks: Vec<RawWeek>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWeek {
    #[serde(default)]
    pub week_number: Option<Loose>,
    #[serde(default)]
    pub focus_skill: Option<Loose>,
    #[serde(default)]
    pub tasks: Option<OneOrMany<RawEntry>>,
    #[serde(default)]
    pub milestone: Option<Loose>,
    #[serde(default)]
    pub success_metric: Option<Loose>,
    #[serde(default)]
    pub resources: Option<OneOrMany<RawEntry>>,
}

/// A scalar of unknown type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl Loose {
    /// Reads the value as a positive whole count.
    pub fn as_count(&self) -> Option<u32> {
        let count = match self {
            Loose::Int(n) => u32::try_from(*n).ok(),
            Loose::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f <= f64::from(u32::MAX) => {
                Some(*f as u32)
            }
            Loose::Text(s) => s.trim().parse().ok(),
            _ => None,
        };
        count.filter(|n| *n > 0)
    }

    /// Reads the value as non-blank text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Loose::Text(s) => non_blank(s),
            Loose::Int(n) => Some(n.to_string()),
            Loose::Float(f) => Some(f.to_string()),
            Loose::Other(_) => None,
        }
    }
}

/// Accepts either a list or a single bare item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// A task or resource entry: plain text or a labelled object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Text(String),
    Labeled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Other(Value),
}

impl RawEntry {
    fn label(&self) -> Option<String> {
        match self {
            RawEntry::Text(text) => non_blank(text),
            RawEntry::Labeled {
                title, task, name, ..
            } => [title, task, name]
                .into_iter()
                .flatten()
                .find_map(|candidate| non_blank(candidate)),
            RawEntry::Other(_) => None,
        }
    }

    fn into_task(self) -> Option<String> {
        self.label()
    }

    fn into_resource(self) -> Option<Resource> {
        let url = match &self {
            RawEntry::Labeled { url, .. } => url.as_deref().and_then(non_blank),
            _ => None,
        };
        match (self.label(), url) {
            (Some(title), url) => Some(Resource { title, url }),
            (None, Some(url)) => Some(Resource {
                title: url.clone(),
                url: Some(url),
            }),
            (None, None) => None,
        }
    }
}

impl RawRoadmap {
    /// Reads a loose roadmap from arbitrary JSON.
    ///
    /// A bare array is taken as the phase list.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        match value {
            Value::Array(_) => Ok(RawRoadmap {
                phases: phase_entries(Some(value)),
                ..RawRoadmap::default()
            }),
            other => serde_json::from_value(other),
        }
    }
}

impl RawPhase {
    /// Reads one entry of a phase list. Anything but an object is dropped.
    fn from_entry(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }
}

impl RawWeek {
    /// Reads one entry of a week list. A bare string names the focus skill.
    fn from_entry(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            Value::String(skill) => Some(RawWeek {
                focus_skill: Some(Loose::Text(skill)),
                ..RawWeek::default()
            }),
            _ => None,
        }
    }
}

/// Splits a list field into entries: `null` is empty, a lone value is one.
fn entries(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}

fn phase_entries(value: Option<Value>) -> Vec<RawPhase> {
    entries(value)
        .into_iter()
        .filter_map(RawPhase::from_entry)
        .collect()
}

fn loose_phases<'de, D>(deserializer: D) -> Result<Vec<RawPhase>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer).map(phase_entries)
}

fn loose_weeks<'de, D>(deserializer: D) -> Result<Vec<RawWeek>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(entries(value)
        .into_iter()
        .filter_map(RawWeek::from_entry)
        .collect())
}

/// Backfills missing fields and renumbers weeks into a strict body.
pub fn sanitize(raw: RawRoadmap) -> RoadmapBody {
    let mut phases: Vec<Phase> = raw.phases.into_iter().map(sanitize_phase).collect();
    ensure_week_continuity(&mut phases);

    let week_count = phases.iter().map(|phase| phase.weeks.len()).sum::<usize>() as u32;
    let declared = raw.total_weeks.as_ref().and_then(Loose::as_count);
    let total_weeks = match declared {
        Some(declared) if week_count == 0 => declared,
        Some(declared) if declared != week_count => {
            warn!("Roadmap declares {declared} weeks but has {week_count}; using {week_count}");
            week_count
        }
        _ => week_count,
    };

    RoadmapBody {
        total_weeks,
        phases,
    }
}

/// Rewrites week numbers to a counter starting at 1, in phase then week order.
pub fn ensure_week_continuity(phases: &mut [Phase]) {
    let weeks = phases.iter_mut().flat_map(|phase| phase.weeks.iter_mut());
    for (week, number) in weeks.zip(1..) {
        week.week_number = number;
    }
}

fn sanitize_phase(raw: RawPhase) -> Phase {
    Phase {
        name: raw
            .phase_name
            .as_ref()
            .and_then(Loose::as_text)
            .unwrap_or_else(|| DEFAULT_PHASE_NAME.to_string()),
        description: raw.phase_description.as_ref().and_then(Loose::as_text),
        weeks: raw.weeks.into_iter().map(sanitize_week).collect(),
    }
}

fn sanitize_week(raw: RawWeek) -> Week {
    Week {
        week_number: raw
            .week_number
            .as_ref()
            .and_then(Loose::as_count)
            .unwrap_or(DEFAULT_WEEK_NUMBER),
        focus_skill: text_or(raw.focus_skill, DEFAULT_FOCUS_SKILL),
        tasks: raw
            .tasks
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawEntry::into_task)
            .collect(),
        milestone: text_or(raw.milestone, DEFAULT_MILESTONE),
        success_metric: text_or(raw.success_metric, DEFAULT_SUCCESS_METRIC),
        resources: raw
            .resources
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawEntry::into_resource)
            .collect(),
    }
}

fn text_or(value: Option<Loose>, default: &str) -> String {
    value
        .as_ref()
        .and_then(Loose::as_text)
        .unwrap_or_else(|| default.to_string())
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<RoadmapBody> for RawRoadmap {
    fn from(body: RoadmapBody) -> Self {
        RawRoadmap {
            total_weeks: Some(Loose::Int(i64::from(body.total_weeks))),
            phases: body.phases.into_iter().map(RawPhase::from).collect(),
            rebalance_summary: None,
        }
    }
}

impl From<Phase> for RawPhase {
    fn from(phase: Phase) -> Self {
        RawPhase {
            phase_name: Some(Loose::Text(phase.name)),
            phase_description: phase.description.map(Loose::Text),
            weeks: phase.weeks.into_iter().map(RawWeek::from).collect(),
        }
    }
}

impl From<Week> for RawWeek {
    fn from(week: Week) -> Self {
        RawWeek {
            week_number: Some(Loose::Int(i64::from(week.week_number))),
            focus_skill: Some(Loose::Text(week.focus_skill)),
            tasks: Some(OneOrMany::Many(
                week.tasks.into_iter().map(RawEntry::Text).collect(),
            )),
            milestone: Some(Loose::Text(week.milestone)),
            success_metric: Some(Loose::Text(week.success_metric)),
            resources: Some(OneOrMany::Many(
                week.resources
                    .into_iter()
                    .map(|resource| RawEntry::Labeled {
                        title: Some(resource.title),
                        task: None,
                        name: None,
                        url: resource.url,
                    })
                    .collect(),
            )),
        }
    }
}
