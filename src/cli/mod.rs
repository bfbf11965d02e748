//! Anacomus CLI Module
//!
//! Command-line interface for running the contamination sweeps and
//! inspecting the request tables.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::analysis::{AnomalySweep, ContaminationOutcome, Scenario, ScenarioKind, SweepReport};
use crate::config::AnalysisConfig;
use crate::data::load_table;
use crate::plot::describe_contamination;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn alert(s: &str) -> ColoredString  { s.truecolor(235, 100, 100) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str, detail: &str) {
    println!("  {} {} {}", ok("✓"), msg, dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn indented(block: &str) {
    for line in block.lines() {
        println!("  {}", line);
    }
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "anacomus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Isolation-forest anomaly detection over network request tables")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub sweep: SweepArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one scenario
    Run {
        /// Scenario name (scatter-labeled, boxplot-labeled, boxplot-unlabeled)
        #[arg(short, long)]
        scenario: ScenarioKind,
    },

    /// Run all three scenarios in order
    All,

    /// Print a scenario's request table
    Show {
        /// Scenario name (scatter-labeled, boxplot-labeled, boxplot-unlabeled)
        #[arg(short, long)]
        scenario: ScenarioKind,
    },
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct SweepArgs {
    /// Expected anomaly share; repeat to test several values
    #[arg(short, long = "contamination", global = true)]
    pub contamination: Vec<f64>,

    /// Random seed for the forest
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Number of isolation trees
    #[arg(long, global = true)]
    pub n_estimators: Option<usize>,

    /// Directory the SVG figures are written to
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Skip writing figures
    #[arg(long, global = true)]
    pub no_plot: bool,

    /// JSON configuration file; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request table to use instead of the built-in one (CSV or JSON)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Print the sweep report as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl SweepArgs {
    /// Resolve the configuration: defaults, then the config file, then flags
    pub fn to_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if !self.contamination.is_empty() {
            config = config.with_contamination_values(self.contamination.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_random_state(seed);
        }
        if let Some(n) = self.n_estimators {
            config = config.with_n_estimators(n);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        if self.no_plot {
            config = config.with_plots(false);
        }

        config.validate()?;
        Ok(config)
    }

    fn scenario(&self, kind: ScenarioKind) -> anyhow::Result<Scenario> {
        match &self.data {
            Some(path) => Ok(Scenario::with_table(kind, load_table(path)?)),
            None => Ok(Scenario::builtin(kind)),
        }
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(kind: ScenarioKind, args: &SweepArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    let report = run_scenario(kind, args, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

pub fn cmd_all(args: &SweepArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;

    if !args.json {
        println!();
        line_box_top();
        line_box_center(&"anacomus".white().bold().to_string());
        line_box_center(&muted("isolation forest contamination sweep").to_string());
        line_box_bottom();
    }

    let reports = ScenarioKind::ALL
        .iter()
        .map(|&kind| run_scenario(kind, args, config.clone()))
        .collect::<anyhow::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

pub fn cmd_show(kind: ScenarioKind, args: &SweepArgs) -> anyhow::Result<()> {
    let scenario = args.scenario(kind)?;
    let df = scenario.table().to_dataframe()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(scenario.table())?);
        return Ok(());
    }

    section(&format!("Scenario {}", kind));
    println!("  {}", kv("rows", &df.height().to_string()));
    println!("  {}", kv("ground truth", &scenario.has_ground_truth().to_string()));
    println!();
    indented(&df.to_string());
    println!();
    Ok(())
}

fn run_scenario(
    kind: ScenarioKind,
    args: &SweepArgs,
    config: AnalysisConfig,
) -> anyhow::Result<SweepReport> {
    let scenario = args.scenario(kind)?;
    let sweep = AnomalySweep::new(config);

    if !args.json {
        section(&format!("Scenario {}", kind));
        println!(
            "  {}    {}",
            kv("rows", &scenario.table().len().to_string()),
            kv("trees", &sweep.config().n_estimators.to_string())
        );
        // Sweep logs go to stderr; keep them after the heading
        std::io::stdout().flush()?;
    }

    let start = Instant::now();
    let report = sweep.run(&scenario)?;

    if !args.json {
        step_ok(
            "Sweep finished",
            &format!("{} contamination values in {:?}", report.outcomes.len(), start.elapsed()),
        );
        for outcome in &report.outcomes {
            print_outcome(kind, outcome)?;
        }
    }

    Ok(report)
}

fn print_outcome(kind: ScenarioKind, outcome: &ContaminationOutcome) -> anyhow::Result<()> {
    println!();
    println!(
        "  {} {}",
        accent("▸"),
        format!("Contamination {}", describe_contamination(outcome.contamination)).white().bold()
    );

    if let Some(report) = &outcome.report {
        println!();
        println!("  {}", muted("Classification report"));
        indented(&report.to_string());
    }

    println!();
    if outcome.flagged.is_empty() {
        println!("  {}", muted("No requests flagged"));
    } else {
        println!("  {}", alert(&format!("{} request(s) flagged", outcome.n_flagged())));
        indented(&outcome.flagged_frame(kind.shows_true_label())?.to_string());
    }

    if let Some(path) = &outcome.plot_path {
        println!("  {}", kv("plot", &path.display().to_string()));
    }
    Ok(())
}
