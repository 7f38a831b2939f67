use clap::ValueEnum;

use crate::models::Component;

pub const DEFAULT_COHORT_YEAR: &str = "2024";
pub const DEFAULT_BRANCH_MARKER: &str = "A";
pub const DEFAULT_TOP: usize = 3;

/// Knobs for the aggregation passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Campus ids must start with this year to count toward branch averages.
    pub cohort_year: String,
    /// Branch codes must contain this substring to count toward branch averages.
    pub branch_marker: String,
    /// Components to rank, in output order.
    pub components: Vec<Component>,
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            cohort_year: DEFAULT_COHORT_YEAR.to_string(),
            branch_marker: DEFAULT_BRANCH_MARKER.to_string(),
            components: Component::ALL.to_vec(),
            top: DEFAULT_TOP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}
