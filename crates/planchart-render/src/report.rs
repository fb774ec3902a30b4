//! HTML plan report: task/assignment/milestone listings plus the Gantt
//! charts inlined one per page.

use std::fmt::Write as _;

use chrono::NaiveDate;
use planchart_core::ProjectPlan;

use crate::{ChartPage, RenderError, SvgGanttRenderer};

/// Renders a complete plan report as a standalone HTML document.
#[derive(Clone, Debug)]
pub struct HtmlReportRenderer {
    pub title: String,
    pub svg: SvgGanttRenderer,
}

impl Default for HtmlReportRenderer {
    fn default() -> Self {
        Self {
            title: "Content Project Plan".into(),
            svg: SvgGanttRenderer::default(),
        }
    }
}

impl HtmlReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the report.
    ///
    /// `pages` is the already-laid-out chart set; an empty set renders an
    /// explicit "no schedulable items" notice instead of failing.
    pub fn render(
        &self,
        plan: &ProjectPlan,
        start_base: NaiveDate,
        pages: &[ChartPage],
    ) -> Result<String, RenderError> {
        let mut html = String::new();

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n",
            escape(&self.title)
        );
        html.push_str(
            "<style>\n\
             body { font-family: system-ui, sans-serif; margin: 2rem; color: #2c3e50; }\n\
             h2 { border-bottom: 1px solid #ecf0f1; padding-bottom: 0.3rem; }\n\
             li { margin: 0.2rem 0; }\n\
             .meta { color: #7f8c8d; font-size: 0.9rem; }\n\
             .chart { margin: 1rem 0; }\n\
             </style>\n</head>\n<body>\n",
        );

        let _ = write!(html, "<h1>{}</h1>\n", escape(&self.title));
        let _ = write!(
            html,
            "<p class=\"meta\">Project start date: {}</p>\n",
            start_base.format("%Y-%m-%d")
        );

        self.render_tasks(&mut html, plan);
        self.render_assignments(&mut html, plan);
        self.render_milestones(&mut html, plan);

        if let Some(calendar) = plan.content_calendar.as_deref().filter(|c| !c.trim().is_empty()) {
            html.push_str("<h2>Content Calendar Notes</h2>\n");
            let _ = write!(html, "<p>{}</p>\n", escape(calendar));
        }

        html.push_str("<h2>Content Calendar (Gantt)</h2>\n");
        if pages.is_empty() {
            html.push_str("<p>No schedulable items (missing/invalid dates).</p>\n");
        } else {
            for page in pages {
                let chart = self.svg.render_page(page)?;
                let _ = write!(html, "<div class=\"chart\">\n{chart}\n</div>\n");
            }
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    fn render_tasks(&self, html: &mut String, plan: &ProjectPlan) {
        html.push_str("<h2>Tasks</h2>\n");
        if plan.tasks.is_empty() {
            html.push_str("<p><em>No tasks available.</em></p>\n");
            return;
        }
        html.push_str("<ul>\n");
        for task in &plan.tasks {
            let eta = task
                .estimated_time_hours
                .map(|h| format!("{h}h"))
                .unwrap_or_else(|| "?".into());
            let due = task.target_publish_date.as_deref().unwrap_or("TBD");
            let _ = write!(
                html,
                "<li><b>{}</b> ({}) &mdash; ETA: {} &mdash; Due: {}</li>\n",
                escape(&task.task_name),
                escape(&task.format),
                escape(&eta),
                escape(due)
            );
        }
        html.push_str("</ul>\n");
    }

    fn render_assignments(&self, html: &mut String, plan: &ProjectPlan) {
        html.push_str("<h2>Assignments</h2>\n");
        if plan.assignments.is_empty() {
            html.push_str("<p><em>No assignments available.</em></p>\n");
            return;
        }
        html.push_str("<ul>\n");
        for a in &plan.assignments {
            let _ = write!(
                html,
                "<li>{} &rarr; <b>{}</b> ({}) [{} &rarr; {}]</li>\n",
                escape(&a.task_name),
                escape(&a.assigned_to),
                escape(&a.role),
                escape(a.start_date.as_deref().unwrap_or("")),
                escape(a.end_date.as_deref().unwrap_or("\u{2013}"))
            );
        }
        html.push_str("</ul>\n");
    }

    fn render_milestones(&self, html: &mut String, plan: &ProjectPlan) {
        if plan.milestones.is_empty() {
            return;
        }
        html.push_str("<h2>Milestones</h2>\n<ul>\n");
        for m in &plan.milestones {
            let _ = write!(
                html,
                "<li><b>{}</b>: {}</li>\n",
                escape(&m.milestone_name),
                escape(&m.tasks.join(", "))
            );
        }
        html.push_str("</ul>\n");
    }
}

/// Escape text for embedding in HTML
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
