//! planchart CLI - Plan-to-Gantt Schedule Inference
//!
//! Command-line interface for loading plan JSON, inferring schedules, and
//! rendering Gantt charts and reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use planchart_core::{build_schedule, ProjectPlan, ScheduleRow};
use planchart_render::{paginate, ChartOptions, HtmlReportRenderer, SvgGanttRenderer};

#[derive(Parser)]
#[command(name = "planchart")]
#[command(author, version, about = "Plan-to-Gantt schedule inference", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a plan file
    Check {
        /// Plan JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Infer and print the resolved schedule
    Schedule {
        /// Plan JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Project start date (anchor for Week/Day expressions), default today
        #[arg(short, long)]
        start_date: Option<NaiveDate>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render Gantt chart pages as SVG files
    Gantt {
        /// Plan JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Project start date (anchor for Week/Day expressions), default today
        #[arg(short, long)]
        start_date: Option<NaiveDate>,

        /// Output directory for gantt-NN.svg files
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum rows per chart page
        #[arg(long, default_value_t = 25)]
        max_rows: usize,

        /// Assign colors per page instead of globally (legacy behavior)
        #[arg(long)]
        page_colors: bool,
    },

    /// Render the full HTML report
    Report {
        /// Plan JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Project start date (anchor for Week/Day expressions), default today
        #[arg(short, long)]
        start_date: Option<NaiveDate>,

        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Schedule {
            file,
            start_date,
            json,
        } => schedule(&file, anchor(start_date), json),
        Commands::Gantt {
            file,
            start_date,
            output,
            max_rows,
            page_colors,
        } => gantt(&file, anchor(start_date), &output, max_rows, page_colors),
        Commands::Report {
            file,
            start_date,
            output,
        } => report(&file, anchor(start_date), &output),
    }
}

/// Default the anchor date to today when the caller supplies none.
fn anchor(start_date: Option<NaiveDate>) -> NaiveDate {
    start_date.unwrap_or_else(|| Local::now().date_naive())
}

fn load_plan(file: &Path) -> Result<ProjectPlan> {
    ProjectPlan::from_path(file).with_context(|| format!("failed to load plan: {}", file.display()))
}

fn check(file: &Path) -> Result<()> {
    let plan = load_plan(file)?;
    println!(
        "OK: {} tasks, {} assignments, {} milestones",
        plan.tasks.len(),
        plan.assignments.len(),
        plan.milestones.len()
    );
    Ok(())
}

fn schedule(file: &Path, start_base: NaiveDate, json: bool) -> Result<()> {
    let plan = load_plan(file)?;
    let rows = build_schedule(&plan, start_base);
    tracing::info!(rows = rows.len(), %start_base, "schedule resolved");

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No schedulable items (missing/invalid dates).");
        return Ok(());
    }

    print_table(&rows);
    Ok(())
}

fn print_table(rows: &[ScheduleRow]) {
    println!(
        "{:<20} {:<37} {:>10} {:>10} {:>5}",
        "Person", "Task", "Start", "End", "Days"
    );
    for row in rows {
        println!(
            "{:<20} {:<37} {:>10} {:>10} {:>5}",
            clip(&row.person, 18),
            clip(&row.task, 35),
            row.start.format("%Y-%m-%d"),
            row.end.format("%Y-%m-%d"),
            row.duration_days()
        );
    }
}

fn clip(s: &str, max: usize) -> String {
    planchart_render::layout::truncate_label(s, max)
}

fn gantt(
    file: &Path,
    start_base: NaiveDate,
    output: &Path,
    max_rows: usize,
    page_colors: bool,
) -> Result<()> {
    let plan = load_plan(file)?;
    let rows = build_schedule(&plan, start_base);
    let options = ChartOptions::new()
        .max_rows(max_rows)
        .page_local_colors(page_colors);
    let pages = paginate(&rows, &options);

    if pages.is_empty() {
        println!("No schedulable items (missing/invalid dates).");
        return Ok(());
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    let renderer = SvgGanttRenderer::new();
    for (index, page) in pages.iter().enumerate() {
        let path = output.join(format!("gantt-{:02}.svg", index + 1));
        let svg = renderer.render_page(page)?;
        std::fs::write(&path, svg)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(rows = page.rows.len(), path = %path.display(), "chart page written");
        println!("{}", path.display());
    }

    Ok(())
}

fn report(file: &Path, start_base: NaiveDate, output: &Path) -> Result<()> {
    let plan = load_plan(file)?;
    let rows = build_schedule(&plan, start_base);
    let pages = paginate(&rows, &ChartOptions::default());
    tracing::info!(rows = rows.len(), pages = pages.len(), "report assembled");

    let html = HtmlReportRenderer::new().render(&plan, start_base, &pages)?;
    std::fs::write(output, html)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("{}", output.display());
    Ok(())
}
