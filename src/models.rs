use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::UnknownComponent;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub serial: i64,
    pub class_number: i64,
    pub employee_id: String,
    pub campus_id: String,
    pub quiz: f64,
    pub mid_sem: f64,
    pub lab_test: f64,
    pub weekly_labs: f64,
    pub pre_compre: f64,
    pub compre: f64,
    pub total: f64,
}

impl StudentRecord {
    pub fn computed_pre_compre(&self) -> f64 {
        self.quiz + self.mid_sem + self.lab_test + self.weekly_labs
    }

    pub fn computed_total(&self) -> f64 {
        self.quiz + self.mid_sem + self.lab_test + self.weekly_labs + self.compre
    }

    /// Bytes 0..4 of the campus id. `None` when too short or when byte 4
    /// falls inside a multi-byte character.
    pub fn cohort_year(&self) -> Option<&str> {
        self.campus_id.get(0..4)
    }

    /// Bytes 4..6 of the campus id, under the same rule as [`Self::cohort_year`].
    pub fn branch_code(&self) -> Option<&str> {
        self.campus_id.get(4..6)
    }
}

/// A scored column of the gradebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Component {
    Quiz,
    MidSem,
    LabTest,
    WeeklyLabs,
    PreCompre,
    Compre,
    Total,
}

type ScoreFn = fn(&StudentRecord) -> f64;

const SCORE_TABLE: [(Component, &str, ScoreFn); 7] = [
    (Component::Quiz, "Quiz", |r| r.quiz),
    (Component::MidSem, "MidSem", |r| r.mid_sem),
    (Component::LabTest, "LabTest", |r| r.lab_test),
    (Component::WeeklyLabs, "WeeklyLabs", |r| r.weekly_labs),
    (Component::PreCompre, "PreCompre", |r| r.pre_compre),
    (Component::Compre, "Compre", |r| r.compre),
    (Component::Total, "Total", |r| r.total),
];

impl Component {
    pub const ALL: [Component; 7] = [
        Component::Quiz,
        Component::MidSem,
        Component::LabTest,
        Component::WeeklyLabs,
        Component::PreCompre,
        Component::Compre,
        Component::Total,
    ];

    fn entry(self) -> &'static (Component, &'static str, ScoreFn) {
        &SCORE_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn score(self, record: &StudentRecord) -> f64 {
        (self.entry().2)(record)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SCORE_TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|(component, _, _)| *component)
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMean {
    pub component: Component,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentAverages {
    pub record_count: usize,
    pub means: Vec<ComponentMean>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BranchAverages {
    pub cohort_year: String,
    pub branch_marker: String,
    pub branches: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRanking {
    pub component: Component,
    pub top: Vec<StudentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub rows: usize,
    pub records: usize,
    pub skipped: usize,
    pub mismatches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassReport {
    pub summary: IngestSummary,
    pub top: usize,
    pub averages: Option<ComponentAverages>,
    pub branch_averages: BranchAverages,
    pub rankings: Vec<ComponentRanking>,
}
