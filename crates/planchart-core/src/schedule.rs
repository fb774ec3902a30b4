//! Schedule reconciliation and the fallback schedule builder.
//!
//! The reconciler derives a concrete (start, end) pair per assignment from
//! whatever partial signals exist: explicit dates, relative week/day
//! expressions, the linked task's target publish date, and its effort
//! estimate. When no assignment resolves at all, a whole schedule is
//! synthesized from the task list alone.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::dates::{effort_days_or_default, parse_absolute, parse_date_expr};
use crate::{ProjectPlan, ScheduleRow, TaskAssignment, TaskEstimate};

/// Index tasks by trimmed name for assignment lookup.
///
/// Duplicate names keep the last task in input order.
pub fn tasks_by_name(tasks: &[TaskEstimate]) -> HashMap<&str, &TaskEstimate> {
    tasks.iter().map(|t| (t.task_name.trim(), t)).collect()
}

/// Derive a concrete (start, end) pair for one assignment.
///
/// Precedence, first success wins per field:
/// 1. `start_date`/`end_date` as absolute dates
/// 2. the same fields as relative week/day expressions
/// 3. both missing: the linked task's `target_publish_date` as a
///    zero-duration milestone
/// 4. start only: end from the linked task's effort estimate (8h default)
/// 5. end only: `start = end` (no back-projection)
///
/// A reversed pair is swapped. Returns both dates or `None`; never a
/// partial result.
pub fn resolve_assignment(
    assignment: &TaskAssignment,
    tasks: &HashMap<&str, &TaskEstimate>,
    start_base: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let linked = tasks.get(assignment.task_name.trim()).copied();

    let start = assignment
        .start_date
        .as_deref()
        .and_then(|s| parse_date_expr(s, start_base));
    let mut end = assignment
        .end_date
        .as_deref()
        .and_then(|s| parse_date_expr(s, start_base));

    if start.is_none() && end.is_none() {
        let publish = linked
            .and_then(|t| t.target_publish_date.as_deref())
            .and_then(parse_absolute);
        return publish.map(|d| (d, d));
    }

    if let (Some(s), None) = (start, end) {
        let days = effort_days_or_default(linked.and_then(|t| t.estimated_time_hours));
        end = Some(s + Duration::days(days - 1));
    }

    let start = start.or(end);

    match (start, end) {
        (Some(s), Some(e)) if e < s => Some((e, s)),
        (Some(s), Some(e)) => Some((s, e)),
        _ => None,
    }
}

/// Synthesize a schedule from the task list alone.
///
/// Used only when no assignment yields a usable date pair. Tasks with a
/// parseable target publish date anchor backward from it (start clamped to
/// `start_base`, end never moved); undated tasks chain sequentially on a
/// cursor starting at `start_base`. The person label comes from
/// `required_resources`.
pub fn fallback_rows(tasks: &[TaskEstimate], start_base: NaiveDate) -> Vec<ScheduleRow> {
    let mut rows = Vec::with_capacity(tasks.len());
    let mut cursor = start_base;

    for task in tasks {
        let days = effort_days_or_default(task.estimated_time_hours);

        let (start, end) = match task
            .target_publish_date
            .as_deref()
            .and_then(parse_absolute)
        {
            Some(publish) => {
                let start = publish - Duration::days(days - 1);
                (start.max(start_base), publish)
            }
            None => {
                let start = cursor;
                let end = start + Duration::days(days - 1);
                cursor = end + Duration::days(1);
                (start, end)
            }
        };

        let person = task
            .required_resources
            .as_ref()
            .map(|r| r.first_person())
            .unwrap_or_else(|| "Unassigned".to_string());

        rows.push(ScheduleRow {
            person,
            task: display_or(&task.task_name, "Task"),
            start,
            end,
        });
    }

    rows
}

/// Run the full reconciliation pipeline over a plan.
///
/// Resolves every assignment, drops the unresolvable ones, and falls back
/// to the task-derived schedule when nothing resolved. An empty plan yields
/// an empty vector, which is a valid terminal state.
pub fn build_schedule(plan: &ProjectPlan, start_base: NaiveDate) -> Vec<ScheduleRow> {
    let index = tasks_by_name(&plan.tasks);

    let mut rows: Vec<ScheduleRow> = plan
        .assignments
        .iter()
        .filter_map(|a| {
            resolve_assignment(a, &index, start_base).map(|(start, end)| ScheduleRow {
                person: display_or(&a.assigned_to, "Unassigned"),
                task: display_or(&a.task_name, "Task"),
                start,
                end,
            })
        })
        .collect();

    if rows.is_empty() {
        rows = fallback_rows(&plan.tasks, start_base);
    }

    rows
}

fn display_or(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
