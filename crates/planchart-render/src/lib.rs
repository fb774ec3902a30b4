//! # planchart-render
//!
//! Rendering backends for planchart schedules.
//!
//! This crate provides:
//! - The chart layout engine: pagination, shared time axes, person colors
//! - SVG Gantt chart rendering (one document per page)
//! - An HTML report that embeds the charts alongside the plan listings
//!
//! ## Example
//!
//! ```rust,ignore
//! use planchart_core::build_schedule;
//! use planchart_render::{paginate, ChartOptions, SvgGanttRenderer};
//!
//! let rows = build_schedule(&plan, start_base);
//! let pages = paginate(&rows, &ChartOptions::default());
//! let renderer = SvgGanttRenderer::new();
//! for page in &pages {
//!     let svg = renderer.render_page(page)?;
//! }
//! ```

pub mod layout;
pub mod report;

pub use layout::{paginate, ChartOptions, ChartPage, ChartRow, PALETTE};
pub use report::HtmlReportRenderer;

use chrono::NaiveDate;
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;
use thiserror::Error;

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// SVG Gantt chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgGanttRenderer {
    /// Width of the chart area (excluding labels) in pixels
    pub chart_width: u32,
    /// Height per schedule row in pixels
    pub row_height: u32,
    /// Width of the person-label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Chart title
    pub title: String,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Bar outline color
    pub bar_edge_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgGanttRenderer {
    fn default() -> Self {
        Self {
            chart_width: 800,
            row_height: 28,
            label_width: 160,
            header_height: 50,
            padding: 20,
            title: "Content Calendar — Gantt (by person)".into(),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            bar_edge_color: "#000000".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgGanttRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure chart width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Configure row height
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Configure the chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render every page to its own SVG document
    pub fn render(&self, pages: &[ChartPage]) -> Result<Vec<String>, RenderError> {
        pages.iter().map(|page| self.render_page(page)).collect()
    }

    /// Render one chart page to an SVG document
    pub fn render_page(&self, page: &ChartPage) -> Result<String, RenderError> {
        if page.rows.is_empty() {
            return Err(RenderError::InvalidData("no rows to render".into()));
        }

        let px_per_day = self.pixels_per_day(page);
        let width = self.total_width();
        let height = self.total_height(page.rows.len());

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        let title = Text::new(self.title.as_str())
            .set("x", self.padding)
            .set("y", self.padding + 15)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 4)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str());
        document = document.add(title);

        document = document.add(self.render_grid(page, px_per_day));
        document = document.add(self.render_header(page, px_per_day));

        for (row_index, row) in page.rows.iter().enumerate() {
            document = document.add(self.render_row(row, row_index, page.axis_start, px_per_day));
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("failed to write SVG: {e}")))?;
        String::from_utf8(output).map_err(|e| RenderError::Format(format!("invalid UTF-8: {e}")))
    }

    fn total_width(&self) -> u32 {
        self.padding * 2 + self.label_width + self.chart_width
    }

    fn total_height(&self, row_count: usize) -> u32 {
        self.padding * 2 + self.header_height + (row_count as u32 * self.row_height)
    }

    fn pixels_per_day(&self, page: &ChartPage) -> f64 {
        let days = page.axis_days().max(1) as f64;
        self.chart_width as f64 / days
    }

    fn date_to_x(&self, date: NaiveDate, axis_start: NaiveDate, px_per_day: f64) -> f64 {
        let days = (date - axis_start).num_days() as f64;
        self.padding as f64 + self.label_width as f64 + (days * px_per_day)
    }

    /// Header with date tick labels at an interval adapted to the axis span
    fn render_header(&self, page: &ChartPage, px_per_day: f64) -> Group {
        let mut group = Group::new().set("class", "header");

        let header_bg = Rectangle::new()
            .set("x", self.padding)
            .set("y", self.padding)
            .set("width", self.label_width + self.chart_width)
            .set("height", self.header_height)
            .set("fill", "#f8f9fa");
        group = group.add(header_bg);

        let total_days = page.axis_days();
        let interval_days = if total_days <= 14 {
            1
        } else if total_days <= 60 {
            7
        } else if total_days <= 180 {
            14
        } else {
            30
        };

        let mut current = page.axis_start;
        while current <= page.axis_end {
            let x = self.date_to_x(current, page.axis_start, px_per_day);

            let tick = Line::new()
                .set("x1", x)
                .set("y1", self.padding + self.header_height - 10)
                .set("x2", x)
                .set("y2", self.padding + self.header_height)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(tick);

            let label = if interval_days == 1 {
                current.format("%b %d").to_string()
            } else {
                current.format("%Y-%m-%d").to_string()
            };
            let text = Text::new(label)
                .set("x", x)
                .set("y", self.padding + self.header_height - 15)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 2)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle");
            group = group.add(text);

            current += chrono::Duration::days(interval_days);
        }

        group
    }

    fn render_grid(&self, page: &ChartPage, px_per_day: f64) -> Group {
        let mut group = Group::new().set("class", "grid");

        let chart_top = self.padding + self.header_height;
        let chart_bottom = chart_top + (page.rows.len() as u32 * self.row_height);

        for i in 0..=page.rows.len() {
            let y = chart_top + (i as u32 * self.row_height);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", self.padding + self.label_width + self.chart_width)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        let total_days = page.axis_days();
        let interval = if total_days <= 30 { 1 } else { 7 };

        let mut current = page.axis_start;
        while current <= page.axis_end {
            let x = self.date_to_x(current, page.axis_start, px_per_day);
            let line = Line::new()
                .set("x1", x)
                .set("y1", chart_top)
                .set("x2", x)
                .set("y2", chart_bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1)
                .set("stroke-dasharray", "3,3");
            group = group.add(line);
            current += chrono::Duration::days(interval);
        }

        group
    }

    /// One schedule row: person label in the left column, colored bar with
    /// the task name centered inside it
    fn render_row(
        &self,
        row: &ChartRow,
        row_index: usize,
        axis_start: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "row");

        let y = self.padding + self.header_height + (row_index as u32 * self.row_height);
        let bar_height = (self.row_height as f64 * 0.6) as u32;
        let bar_y = y + (self.row_height - bar_height) / 2;

        let label = Text::new(row.person_label.as_str())
            .set("x", self.padding + self.label_width - 8)
            .set("y", y + self.row_height / 2 + 4)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str())
            .set("text-anchor", "end");
        group = group.add(label);

        let x_start = self.date_to_x(row.start, axis_start, px_per_day);
        let bar_width = (row.duration_days as f64 * px_per_day).max(4.0);

        let bar = Rectangle::new()
            .set("x", x_start)
            .set("y", bar_y)
            .set("width", bar_width)
            .set("height", bar_height)
            .set("rx", 3)
            .set("ry", 3)
            .set("fill", row.color.as_str())
            .set("stroke", self.bar_edge_color.as_str())
            .set("stroke-width", 0.3);
        group = group.add(bar);

        let task_text = Text::new(row.task_label.as_str())
            .set("x", x_start + bar_width / 2.0)
            .set("y", y + self.row_height / 2 + 3)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size - 4)
            .set("fill", self.text_color.as_str())
            .set("text-anchor", "middle");
        group = group.add(task_text);

        group
    }
}
