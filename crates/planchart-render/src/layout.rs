//! Chart layout: pagination, shared time axes, and person colors.
//!
//! Resolved schedule rows are sorted by (person, start), split into pages of
//! bounded size, and each page gets a padded time axis plus a deterministic
//! person-to-color mapping. Everything here is geometry and labels; actual
//! drawing lives in the SVG renderer.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use planchart_core::ScheduleRow;
use serde::{Deserialize, Serialize};

/// Fixed 20-hue palette (matplotlib tab20 hex values).
pub const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Maximum person label length on the chart axis.
pub const PERSON_LABEL_MAX: usize = 18;

/// Maximum task label length inside a bar.
pub const TASK_LABEL_MAX: usize = 35;

/// Layout configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Maximum rows per chart page
    pub max_rows_per_chart: usize,
    /// Assign colors from each page's own distinct-person set instead of a
    /// single global map. Legacy behavior: the same person may get a
    /// different color on different pages.
    pub page_local_colors: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            max_rows_per_chart: 25,
            page_local_colors: false,
        }
    }
}

impl ChartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.max_rows_per_chart = rows.max(1);
        self
    }

    /// Use per-page color assignment
    pub fn page_local_colors(mut self, enabled: bool) -> Self {
        self.page_local_colors = enabled;
        self
    }
}

/// One row laid out on a chart page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRow {
    pub person: String,
    pub task: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Inclusive duration in days
    pub duration_days: i64,
    /// Person truncated for axis display
    pub person_label: String,
    /// Task truncated for in-bar display
    pub task_label: String,
    /// Bar fill color (hex)
    pub color: String,
}

/// A bounded group of rows sharing one time axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPage {
    pub rows: Vec<ChartRow>,
    /// Left edge of the axis (min start minus padding)
    pub axis_start: NaiveDate,
    /// Right edge of the axis (exclusive max end plus padding)
    pub axis_end: NaiveDate,
    /// Person-to-color mapping valid for this page
    pub colors: BTreeMap<String, String>,
}

impl ChartPage {
    /// Axis span in days
    pub fn axis_days(&self) -> i64 {
        (self.axis_end - self.axis_start).num_days()
    }
}

/// Partition resolved rows into renderable chart pages.
///
/// Rows are stably sorted by (person, start) and split into consecutive
/// pages of at most `max_rows_per_chart`; a person's rows may span a page
/// boundary. Empty input yields an empty page list.
pub fn paginate(rows: &[ScheduleRow], options: &ChartOptions) -> Vec<ChartPage> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&ScheduleRow> = rows.iter().collect();
    sorted.sort_by(|a, b| (&a.person, a.start).cmp(&(&b.person, b.start)));

    let global_colors = if options.page_local_colors {
        None
    } else {
        Some(color_map(sorted.iter().map(|r| r.person.as_str())))
    };

    sorted
        .chunks(options.max_rows_per_chart.max(1))
        .map(|chunk| build_page(chunk, global_colors.as_ref()))
        .collect()
}

fn build_page(chunk: &[&ScheduleRow], global_colors: Option<&BTreeMap<String, String>>) -> ChartPage {
    let local;
    let palette_map = match global_colors {
        Some(map) => map,
        None => {
            local = color_map(chunk.iter().map(|r| r.person.as_str()));
            &local
        }
    };

    let min_start = chunk.iter().map(|r| r.start).min().expect("non-empty page");
    // Exclusive right edge: the end of the last bar, not its start day.
    let max_end_exclusive = chunk
        .iter()
        .map(|r| r.end + Duration::days(1))
        .max()
        .expect("non-empty page");

    let span = (max_end_exclusive - min_start).num_days();
    let pad = ((span as f64 * 0.05).round() as i64).max(1);

    let rows = chunk
        .iter()
        .map(|r| ChartRow {
            person: r.person.clone(),
            task: r.task.clone(),
            start: r.start,
            end: r.end,
            duration_days: r.duration_days(),
            person_label: truncate_label(&r.person, PERSON_LABEL_MAX),
            task_label: truncate_label(&r.task, TASK_LABEL_MAX),
            color: palette_map
                .get(&r.person)
                .cloned()
                .unwrap_or_else(|| PALETTE[0].to_string()),
        })
        .collect();

    let colors = chunk
        .iter()
        .map(|r| {
            let color = palette_map
                .get(&r.person)
                .cloned()
                .unwrap_or_else(|| PALETTE[0].to_string());
            (r.person.clone(), color)
        })
        .collect();

    ChartPage {
        rows,
        axis_start: min_start - Duration::days(pad),
        axis_end: max_end_exclusive + Duration::days(pad),
        colors,
    }
}

/// Map distinct persons, sorted lexicographically, onto the palette by
/// index modulo palette size.
fn color_map<'a>(persons: impl Iterator<Item = &'a str>) -> BTreeMap<String, String> {
    let distinct: BTreeSet<&str> = persons.collect();
    distinct
        .into_iter()
        .enumerate()
        .map(|(i, person)| (person.to_string(), PALETTE[i % PALETTE.len()].to_string()))
        .collect()
}

/// Truncate a label to `max` characters with an ellipsis marker.
///
/// Display-only; sorting, colors, and dates all use the full strings.
pub fn truncate_label(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn row(person: &str, task: &str, start: NaiveDate, end: NaiveDate) -> ScheduleRow {
        ScheduleRow {
            person: person.into(),
            task: task.into(),
            start,
            end,
        }
    }

    fn day_row(person: &str, n: i64) -> ScheduleRow {
        let d = date(2024, 1, 1) + Duration::days(n);
        row(person, &format!("task {n}"), d, d)
    }

    #[test]
    fn thirty_rows_split_into_25_and_5() {
        let rows: Vec<ScheduleRow> = (0..30).map(|n| day_row("Alice", n)).collect();
        let pages = paginate(&rows, &ChartOptions::default());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows.len(), 25);
        assert_eq!(pages[1].rows.len(), 5);
    }

    #[test]
    fn rows_sorted_by_person_then_start() {
        let rows = vec![
            row("Bob", "b1", date(2024, 1, 5), date(2024, 1, 6)),
            row("Alice", "a2", date(2024, 1, 9), date(2024, 1, 9)),
            row("Alice", "a1", date(2024, 1, 2), date(2024, 1, 3)),
        ];
        let pages = paginate(&rows, &ChartOptions::default());
        let order: Vec<&str> = pages[0].rows.iter().map(|r| r.task.as_str()).collect();
        assert_eq!(order, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn sort_ties_keep_input_order() {
        let rows = vec![
            row("Alice", "first", date(2024, 1, 2), date(2024, 1, 2)),
            row("Alice", "second", date(2024, 1, 2), date(2024, 1, 2)),
        ];
        let pages = paginate(&rows, &ChartOptions::default());
        assert_eq!(pages[0].rows[0].task, "first");
        assert_eq!(pages[0].rows[1].task, "second");
    }

    #[test]
    fn axis_pads_five_percent_min_one_day() {
        // 40-day span: pad = round(0.05 * 40) = 2
        let rows = vec![row("A", "t", date(2024, 1, 1), date(2024, 2, 9))];
        let page = &paginate(&rows, &ChartOptions::default())[0];
        assert_eq!(page.axis_start, date(2023, 12, 30));
        assert_eq!(page.axis_end, date(2024, 2, 12));

        // Single-day span: pad floors at 1
        let rows = vec![row("A", "t", date(2024, 1, 5), date(2024, 1, 5))];
        let page = &paginate(&rows, &ChartOptions::default())[0];
        assert_eq!(page.axis_start, date(2024, 1, 4));
        assert_eq!(page.axis_end, date(2024, 1, 7));
    }

    #[test]
    fn global_colors_stable_across_pages() {
        // One Alice row plus 25 Bob rows: Bob's last row spills onto page 2
        // where he is the only person present.
        let mut rows = vec![day_row("Alice", 0)];
        rows.extend((0..25).map(|n| day_row("Bob", n)));
        let pages = paginate(&rows, &ChartOptions::default());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].rows.len(), 1);
        assert_eq!(pages[1].rows[0].person, "Bob");

        // Bob keeps his global slot even when alone on a page.
        assert_eq!(pages[0].colors["Bob"], PALETTE[1]);
        assert_eq!(pages[1].colors["Bob"], PALETTE[1]);
        assert_eq!(pages[0].colors["Alice"], PALETTE[0]);
    }

    #[test]
    fn page_local_colors_reassign_per_page() {
        let mut rows = vec![day_row("Alice", 0)];
        rows.extend((0..25).map(|n| day_row("Bob", n)));
        let options = ChartOptions::new().page_local_colors(true);
        let pages = paginate(&rows, &options);

        // Legacy mode: each page starts its own palette at slot 0, so Bob
        // switches color between pages.
        assert_eq!(pages[0].colors["Bob"], PALETTE[1]);
        assert_eq!(pages[1].colors["Bob"], PALETTE[0]);
    }

    #[test]
    fn colors_deterministic_and_person_keyed() {
        let rows = vec![
            row("Carol", "t1", date(2024, 1, 1), date(2024, 1, 2)),
            row("Alice", "t2", date(2024, 1, 1), date(2024, 1, 2)),
            row("Bob", "t3", date(2024, 1, 1), date(2024, 1, 2)),
            row("Alice", "t4", date(2024, 1, 3), date(2024, 1, 4)),
        ];
        let page = &paginate(&rows, &ChartOptions::default())[0];
        assert_eq!(page.colors["Alice"], PALETTE[0]);
        assert_eq!(page.colors["Bob"], PALETTE[1]);
        assert_eq!(page.colors["Carol"], PALETTE[2]);

        // Both Alice rows share her color.
        let alice: Vec<&ChartRow> =
            page.rows.iter().filter(|r| r.person == "Alice").collect();
        assert_eq!(alice[0].color, alice[1].color);
    }

    #[test]
    fn palette_wraps_past_twenty_persons() {
        let rows: Vec<ScheduleRow> = (0..22)
            .map(|n| row(&format!("p{n:02}"), "t", date(2024, 1, 1), date(2024, 1, 1)))
            .collect();
        let options = ChartOptions::new().max_rows(30);
        let page = &paginate(&rows, &options)[0];
        assert_eq!(page.colors["p00"], PALETTE[0]);
        assert_eq!(page.colors["p20"], PALETTE[0]);
        assert_eq!(page.colors["p21"], PALETTE[1]);
    }

    #[test]
    fn labels_truncate_with_ellipsis() {
        assert_eq!(truncate_label("short", 18), "short");
        assert_eq!(
            truncate_label("A very long person name indeed", PERSON_LABEL_MAX),
            "A very long perso…"
        );
        assert_eq!(truncate_label("A very long person name indeed", PERSON_LABEL_MAX).chars().count(), 18);
    }

    #[test]
    fn truncation_is_display_only() {
        let long = "An extremely verbose person label well over the limit";
        let rows = vec![
            row(long, "t1", date(2024, 1, 1), date(2024, 1, 1)),
            row(long, "t2", date(2024, 1, 2), date(2024, 1, 2)),
        ];
        let page = &paginate(&rows, &ChartOptions::default())[0];
        // Color map keyed by the full person string
        assert!(page.colors.contains_key(long));
        assert!(page.rows[0].person_label.chars().count() <= PERSON_LABEL_MAX);
        assert_eq!(page.rows[0].person, long);
    }

    #[test]
    fn empty_rows_yield_no_pages() {
        assert!(paginate(&[], &ChartOptions::default()).is_empty());
    }

    #[test]
    fn pagination_is_idempotent() {
        let rows: Vec<ScheduleRow> = (0..30).map(|n| day_row(&format!("p{}", n % 3), n)).collect();
        let options = ChartOptions::default();
        assert_eq!(paginate(&rows, &options), paginate(&rows, &options));
    }

    #[test]
    fn duration_days_on_chart_rows() {
        let rows = vec![row("A", "t", date(2024, 1, 1), date(2024, 1, 3))];
        let page = &paginate(&rows, &ChartOptions::default())[0];
        assert_eq!(page.rows[0].duration_days, 3);
        assert_eq!(page.axis_days(), 5); // 3-day exclusive span + 1-day pad each side
    }
}
