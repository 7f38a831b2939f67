use std::collections::BTreeMap;

use crate::config::ReportConfig;
use crate::models::{
    BranchAverages, Component, ComponentAverages, ComponentMean, ComponentRanking, StudentRecord,
};

/// Class-wide mean of every component, or `None` when there is nothing to average.
pub fn component_averages(records: &[StudentRecord]) -> Option<ComponentAverages> {
    if records.is_empty() {
        return None;
    }

    let count = records.len() as f64;
    let means = Component::ALL
        .iter()
        .map(|&component| {
            let sum: f64 = records.iter().map(|r| component.score(r)).sum();
            ComponentMean {
                component,
                mean: sum / count,
            }
        })
        .collect();

    Some(ComponentAverages {
        record_count: records.len(),
        means,
    })
}

/// Mean total per branch for the configured cohort.
pub fn branch_averages(records: &[StudentRecord], config: &ReportConfig) -> BranchAverages {
    let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for record in records {
        let (Some(year), Some(branch)) = (record.cohort_year(), record.branch_code()) else {
            continue;
        };
        if year != config.cohort_year || !branch.contains(config.branch_marker.as_str()) {
            continue;
        }

        let entry = totals.entry(branch.to_string()).or_insert((0.0, 0));
        entry.0 += record.total;
        entry.1 += 1;
    }

    BranchAverages {
        cohort_year: config.cohort_year.clone(),
        branch_marker: config.branch_marker.clone(),
        branches: totals
            .into_iter()
            .map(|(branch, (total, count))| (branch, total / count as f64))
            .collect(),
    }
}

/// Highest `top` records for one component.
///
/// Sorts a copy; equal scores keep their input order.
pub fn top_by(records: &[StudentRecord], component: Component, top: usize) -> Vec<StudentRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| component.score(b).total_cmp(&component.score(a)));
    sorted.truncate(top);
    sorted
}

pub fn rankings(
    records: &[StudentRecord],
    components: &[Component],
    top: usize,
) -> Vec<ComponentRanking> {
    components
        .iter()
        .map(|&component| ComponentRanking {
            component,
            top: top_by(records, component, top),
        })
        .collect()
}
