use std::fmt::Write;

use crate::aggregate;
use crate::config::{OutputFormat, ReportConfig};
use crate::models::{ClassReport, IngestSummary, StudentRecord};

pub fn build_report(
    records: &[StudentRecord],
    summary: IngestSummary,
    config: &ReportConfig,
) -> ClassReport {
    ClassReport {
        summary,
        top: config.top,
        averages: aggregate::component_averages(records),
        branch_averages: aggregate::branch_averages(records, config),
        rankings: aggregate::rankings(records, &config.components, config.top),
    }
}

pub fn render(report: &ClassReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            json
        }
    })
}

pub fn render_text(report: &ClassReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "--- Average Scores ---");
    match &report.averages {
        Some(averages) => {
            for mean in &averages.means {
                let _ = writeln!(output, "{}: {:.2}", mean.component, mean.mean);
            }
        }
        None => {
            let _ = writeln!(output, "No records to average.");
        }
    }

    let branches = &report.branch_averages;
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "--- Branch-wise Averages ({} Batch) ---",
        branches.cohort_year
    );
    for (branch, average) in &branches.branches {
        let _ = writeln!(output, "Branch {}: {:.2}", branch, average);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "--- Top {} Students Per Component ---", report.top);
    for ranking in &report.rankings {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}:", ranking.component);
        for (index, record) in ranking.top.iter().enumerate() {
            let _ = writeln!(
                output,
                "Rank:{}. {} - {:.2}",
                index + 1,
                record.employee_id,
                ranking.component.score(record)
            );
        }
    }

    output
}

pub fn render_markdown(report: &ClassReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let _ = writeln!(output, "# Gradebook Report");
    let _ = writeln!(
        output,
        "{} rows read, {} records accepted, {} skipped, {} subtotal mismatches",
        summary.rows, summary.records, summary.skipped, summary.mismatches
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Average Scores");

    match &report.averages {
        Some(averages) => {
            for mean in &averages.means {
                let _ = writeln!(output, "- {}: {:.2}", mean.component, mean.mean);
            }
        }
        None => {
            let _ = writeln!(output, "No records to average.");
        }
    }

    let branches = &report.branch_averages;
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Branch Averages ({} cohort, branches containing \"{}\")",
        branches.cohort_year, branches.branch_marker
    );

    if branches.branches.is_empty() {
        let _ = writeln!(output, "No records matched this cohort.");
    } else {
        for (branch, average) in &branches.branches {
            let _ = writeln!(output, "- {}: {:.2}", branch, average);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Students");

    for ranking in &report.rankings {
        let _ = writeln!(output);
        let _ = writeln!(output, "### {}", ranking.component);
        if ranking.top.is_empty() {
            let _ = writeln!(output, "No records ranked.");
        }
        for (index, record) in ranking.top.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} ({}) {:.2}",
                index + 1,
                record.employee_id,
                record.campus_id,
                ranking.component.score(record)
            );
        }
    }

    output
}
