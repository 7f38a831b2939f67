use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod config;
mod diagnostics;
mod error;
mod models;
mod parse;
mod report;
mod workbook;

use crate::config::{OutputFormat, ReportConfig};
use crate::diagnostics::TracingSink;
use crate::models::Component;

#[derive(Parser)]
#[command(name = "gradebook-report")]
#[command(
    about = "Check gradebook subtotals and report class averages, branch averages and toppers",
    long_about = None
)]
struct Cli {
    /// Workbook to read (.xlsx, .xls, .xlsb, .ods or .csv)
    path: PathBuf,

    /// Cohort year that campus ids must start with for branch averages
    #[arg(long, env = "GRADEBOOK_COHORT_YEAR", default_value = config::DEFAULT_COHORT_YEAR)]
    cohort_year: String,

    /// Substring a branch code must contain for branch averages
    #[arg(long, env = "GRADEBOOK_BRANCH_MARKER", default_value = config::DEFAULT_BRANCH_MARKER)]
    branch_marker: String,

    /// Number of students listed per component
    #[arg(
        long,
        default_value_t = config::DEFAULT_TOP,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    top: usize,

    /// Rank only these components (repeatable); all of them by default
    #[arg(long = "component", value_name = "COMPONENT")]
    components: Vec<Component>,

    /// Report layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

impl Cli {
    fn report_config(&self) -> ReportConfig {
        ReportConfig {
            cohort_year: self.cohort_year.clone(),
            branch_marker: self.branch_marker.clone(),
            components: if self.components.is_empty() {
                Component::ALL.to_vec()
            } else {
                self.components.clone()
            },
            top: self.top,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.report_config();

    let rows = workbook::read_data_rows(&cli.path)
        .with_context(|| format!("failed to load gradebook {}", cli.path.display()))?;
    let (records, summary) = parse::ingest(&rows, &mut TracingSink);

    let class_report = report::build_report(&records, summary, &config);
    let rendered = report::render(&class_report, cli.format)?;

    match &cli.out {
        Some(out) => {
            std::fs::write(out, rendered)
                .with_context(|| format!("failed to write report to {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
