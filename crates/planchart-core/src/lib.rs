//! # planchart-core
//!
//! Plan data model and date-inference engine for planchart.
//!
//! This crate provides:
//! - Input types: `ProjectPlan`, `TaskEstimate`, `TaskAssignment`, `Milestone`
//! - The date expression parser and effort-to-duration estimator (`dates`)
//! - The schedule reconciler and fallback builder (`schedule`)
//! - Error types
//!
//! The input plan is read-only: inference never mutates tasks or assignments,
//! it derives a separate set of [`ScheduleRow`]s on every call.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use planchart_core::{build_schedule, ProjectPlan, TaskAssignment, TaskEstimate};
//!
//! let plan = ProjectPlan {
//!     tasks: vec![TaskEstimate::new("Write launch post").hours(20.0)],
//!     assignments: vec![
//!         TaskAssignment::new("Write launch post", "Alice").starting("Week 2 (Day 1)"),
//!     ],
//!     ..ProjectPlan::default()
//! };
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let rows = build_schedule(&plan, start);
//! assert_eq!(rows.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod dates;
pub mod schedule;

pub use dates::{effort_days, effort_days_or_default, parse_absolute, parse_date_expr, HOURS_PER_DAY};
pub use schedule::{build_schedule, fallback_rows, resolve_assignment, tasks_by_name};

// ============================================================================
// Plan Input Model
// ============================================================================

/// A raw project plan as produced by the upstream agent pipeline.
///
/// All fields tolerate being absent or ragged; the scheduling core treats
/// missing information as "no information", never as an error.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectPlan {
    /// Content production tasks with effort estimates
    #[serde(default)]
    pub tasks: Vec<TaskEstimate>,
    /// Person-to-task assignments with optional dates
    #[serde(default)]
    pub assignments: Vec<TaskAssignment>,
    /// High-level milestones (pass-through, not consumed by scheduling)
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Free-text calendar summary (pass-through)
    #[serde(default)]
    pub content_calendar: Option<String>,
}

impl ProjectPlan {
    /// Deserialize a plan from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a plan from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// A single task with an effort estimate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskEstimate {
    /// Task name; not guaranteed unique
    #[serde(default)]
    pub task_name: String,
    /// Content format (blog, video, email, ...), descriptive only
    #[serde(default)]
    pub format: String,
    /// Estimated effort in hours. Tolerates numeric strings; anything
    /// non-numeric deserializes to `None`.
    #[serde(default, deserialize_with = "de_hours")]
    pub estimated_time_hours: Option<f64>,
    /// Resources needed; heterogeneous upstream output (string, list, map)
    #[serde(default)]
    pub required_resources: Option<ResourceField>,
    /// Planned publish date as free text
    #[serde(default)]
    pub target_publish_date: Option<String>,
    /// Names of dependent tasks (pass-through)
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl TaskEstimate {
    /// Create a task with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            task_name: name.into(),
            ..Self::default()
        }
    }

    /// Set the estimated effort in hours
    pub fn hours(mut self, hours: f64) -> Self {
        self.estimated_time_hours = Some(hours);
        self
    }

    /// Set the target publish date expression
    pub fn due(mut self, expr: impl Into<String>) -> Self {
        self.target_publish_date = Some(expr.into());
        self
    }

    /// Set the required resources field
    pub fn resources(mut self, resources: ResourceField) -> Self {
        self.required_resources = Some(resources);
        self
    }
}

/// A claim that a named person will perform a named task.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskAssignment {
    /// Name of the task; looked up against [`TaskEstimate::task_name`] by
    /// exact trimmed match
    #[serde(default)]
    pub task_name: String,
    /// Person label used for grouping and coloring
    #[serde(default)]
    pub assigned_to: String,
    /// Role of the assignee (writer, editor, ...)
    #[serde(default)]
    pub role: String,
    /// Planned start date as free text (absolute or "Week W (Day D)")
    #[serde(default)]
    pub start_date: Option<String>,
    /// Planned end date as free text
    #[serde(default)]
    pub end_date: Option<String>,
    /// Reason for the assignment (pass-through)
    #[serde(default)]
    pub justification: Option<String>,
}

impl TaskAssignment {
    /// Create an assignment of `task` to `person`
    pub fn new(task: impl Into<String>, person: impl Into<String>) -> Self {
        Self {
            task_name: task.into(),
            assigned_to: person.into(),
            ..Self::default()
        }
    }

    /// Set the start date expression
    pub fn starting(mut self, expr: impl Into<String>) -> Self {
        self.start_date = Some(expr.into());
        self
    }

    /// Set the end date expression
    pub fn ending(mut self, expr: impl Into<String>) -> Self {
        self.end_date = Some(expr.into());
        self
    }
}

/// A high-level milestone grouping task names. Carried through to reporting
/// untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub milestone_name: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

/// The heterogeneous `required_resources` field.
///
/// Upstream emits this as a plain string, a list, or a mapping depending on
/// the model's mood. The variants are tried in order; anything else lands in
/// `Other` so deserialization of the surrounding task never fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceField {
    Text(String),
    List(Vec<ResourceField>),
    Record(BTreeMap<String, serde_json::Value>),
    Other(serde_json::Value),
}

impl ResourceField {
    /// Extract a display person name.
    ///
    /// Strings split on `,`/`/`/`;`/`|`/newline and yield the first
    /// non-empty trimmed token; lists recurse on their first element;
    /// records yield a `name` or `assigned_to` string value. Everything
    /// else is `"Unassigned"`.
    pub fn first_person(&self) -> String {
        match self {
            Self::Text(s) => s
                .split([',', '/', ';', '|', '\n'])
                .map(str::trim)
                .find(|t| !t.is_empty())
                .unwrap_or("Unassigned")
                .to_string(),
            Self::List(items) => items
                .first()
                .map(ResourceField::first_person)
                .unwrap_or_else(|| "Unassigned".to_string()),
            Self::Record(map) => map
                .get("name")
                .or_else(|| map.get("assigned_to"))
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Unassigned")
                .to_string(),
            Self::Other(_) => "Unassigned".to_string(),
        }
    }
}

/// Tolerant deserializer for effort hours: accepts JSON numbers and numeric
/// strings, maps everything else to `None`.
fn de_hours<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

// ============================================================================
// Derived Schedule
// ============================================================================

/// A resolved (person, task, start, end) interval.
///
/// Derived, never persisted; recomputed from the plan on every invocation.
/// Invariant: `end >= start` (the reconciler swaps when violated).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub person: String,
    pub task: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ScheduleRow {
    /// Inclusive duration in days (a same-day row lasts 1 day)
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error loading a plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
