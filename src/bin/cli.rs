use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wechselplan::{
    ClassPlan, Period, PlanOverview, RotationGrid, export_overview_to_csv, format_average,
    load_plan_from_json,
};

/// Wechselplan - rotation schedules and grade averages for a class plan
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Class plan snapshot (JSON)
    #[arg(short, long, env = "WECHSELPLAN_PLAN", value_name = "FILE")]
    plan: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the morning and afternoon rotation grids
    Overview,
    /// List the turns with their date windows
    Turns {
        /// Count remaining weeks and mark the current turn as of this date (YYYY-MM-DD)
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    /// Show which teachers one group meets in every turn
    Group { id: u32 },
    /// Show semester averages per student
    Averages,
    /// Write the rotation grid as CSV
    Export { output: PathBuf },
    /// Check the plan snapshot without printing tables
    Validate,
}

fn render_text_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if ci < widths.len() && len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_line = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, width) in widths.iter().enumerate() {
            let cell = cells.get(ci).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_line(headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_grid(overview: &PlanOverview, grid: &RotationGrid) -> String {
    let mut headers = vec!["Teacher".to_string(), "Subject".to_string()];
    headers.extend(overview.turns.iter().map(|turn| turn.key.clone()));
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.assignment.teacher_name.clone(),
                row.assignment.subject.clone().unwrap_or_default(),
            ];
            cells.extend(row.groups.iter().map(|group| match group {
                Some(id) => format!("Gruppe {id}"),
                None => String::new(),
            }));
            cells
        })
        .collect();
    render_text_table(&headers, &rows)
}

fn print_overview(plan: &ClassPlan) {
    let overview = plan.overview();
    println!("{}", overview.to_cli_summary());
    for period in Period::ALL {
        let grid = overview.grid(period);
        println!("\n{period}:");
        if grid.is_empty() {
            println!("(no assignments)");
            continue;
        }
        print!("{}", render_grid(&overview, grid));
    }
}

fn print_turns(plan: &ClassPlan, on: Option<NaiveDate>) {
    let current = on.and_then(|date| plan.current_turn(date)).map(|turn| turn.key);
    let mut headers = vec![
        "#".to_string(),
        "Turn".to_string(),
        "Window".to_string(),
        "Weeks".to_string(),
    ];
    if on.is_some() {
        headers.push("Remaining".to_string());
    }
    let rows: Vec<Vec<String>> = plan
        .ordered_turns()
        .into_iter()
        .map(|turn| {
            let marker = if current.as_deref() == Some(turn.key.as_str()) {
                " *"
            } else {
                ""
            };
            let mut cells = vec![
                (turn.index + 1).to_string(),
                format!("{}{marker}", turn.key),
                turn.window.label(),
                turn.window.week_count.to_string(),
            ];
            if let Some(date) = on {
                cells.push(turn.window.remaining_weeks(date).to_string());
            }
            cells
        })
        .collect();
    print!("{}", render_text_table(&headers, &rows));
}

fn print_group(plan: &ClassPlan, group_id: u32) {
    let Some(group) = plan.find_group(group_id) else {
        println!("Group {group_id} not found.");
        return;
    };
    println!("{} ({} students)", group.label(), group.len());
    let headers = vec![
        "Turn".to_string(),
        "Window".to_string(),
        "AM".to_string(),
        "PM".to_string(),
    ];
    let rows: Vec<Vec<String>> = plan
        .schedule_for_group(group_id)
        .into_iter()
        .map(|entry| {
            vec![
                entry.turn.key.clone(),
                entry.turn.window.label(),
                entry
                    .morning
                    .map(|a| a.teacher_name)
                    .unwrap_or_else(|| "-".to_string()),
                entry
                    .afternoon
                    .map(|a| a.teacher_name)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print!("{}", render_text_table(&headers, &rows));
}

fn print_averages(plan: &ClassPlan) {
    let headers = vec![
        "Student".to_string(),
        "1st".to_string(),
        "2nd".to_string(),
    ];
    let rows: Vec<Vec<String>> = plan
        .roster()
        .zip(plan.student_averages())
        .map(|(student, avg)| {
            vec![
                student.display_name(),
                format_average(avg.first),
                format_average(avg.second),
            ]
        })
        .collect();
    print!("{}", render_text_table(&headers, &rows));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let plan = match load_plan_from_json(&cli.plan) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("Failed to load plan {}: {err}", cli.plan.display());
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Overview => print_overview(&plan),
        Command::Turns { on } => print_turns(&plan, on),
        Command::Group { id } => print_group(&plan, id),
        Command::Averages => print_averages(&plan),
        Command::Export { output } => {
            export_overview_to_csv(&plan.overview(), &output)?;
            info!(path = %output.display(), "exported rotation grid");
            println!("Rotation grid written to {}", output.display());
        }
        Command::Validate => {
            println!(
                "Plan for class '{}' is valid ({} groups, {} turns).",
                plan.metadata.class_name,
                plan.groups.len(),
                plan.turn_count()
            );
        }
    }
    Ok(())
}
