// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One entry of the attendance roster.
///
/// All the fields except the id are optional: the roster is assembled by
/// hand by the camp staff and is frequently incomplete.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RosterRecord {
    pub id: String,
    pub name: Option<String>,
    pub korean_name: Option<String>,
    pub english_name: Option<String>,
    pub church_name: Option<String>,
    pub student_group: Option<String>,
    pub team: Option<String>,
    pub attended: Option<bool>,
}

/// The stamp sheet of one student.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct StampRecord {
    pub student_id: String,
    /// Negative values are accepted and clamped to zero.
    pub stamp_count: Option<i64>,
    pub korean_pin_complete: Option<bool>,
    pub english_pin_complete: Option<bool>,
    pub student_group: Option<String>,
    pub team: Option<String>,
    /// ISO-8601 timestamp, used to pick the most recent sheet.
    pub updated_at: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct LevelTestRecord {
    pub student_id: String,
    pub total_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub test_date: Option<String>,
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct LevelTestScore {
    pub total: f64,
    pub max: f64,
    pub percentage: f64,
    pub test_date: Option<String>,
}

/// The joined view of a student, built fresh for every report.
///
/// `group` and `team` are kept as they were received. Whether they designate
/// a valid cell is decided against a [Topology].
#[derive(PartialEq, Debug, Clone)]
pub struct StudentPerformance {
    pub id: String,
    pub display_name: String,
    pub english_name: String,
    pub church_name: String,
    pub group: Option<String>,
    pub team: Option<String>,
    pub attended: bool,
    pub stamp_count: u64,
    pub korean_pin_complete: bool,
    pub english_pin_complete: bool,
    pub level_test: Option<LevelTestScore>,
}

/// A (group, team) position in the matrix. The group is the 1-based ordinal
/// of the label in the topology.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CellId {
    pub group: usize,
    pub team: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TeamAggregate {
    pub cell: CellId,
    pub member_count: usize,
    /// Members with at least one stamp.
    pub scored_member_count: usize,
    pub stamp_sum: u64,
    /// Stamp sum over the scored members only, 0 when nobody scored.
    pub average: f64,
    /// The members, in input order.
    pub members: Vec<StudentPerformance>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RankingEntry {
    pub student: StudentPerformance,
    pub rank: u32,
    pub is_mvp: bool,
}

/// A ranked pool of students.
#[derive(PartialEq, Debug, Clone)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
    pub mvp_cutoff: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AwardTier {
    Gold,
    Silver,
    Bronze,
}

impl Display for AwardTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwardTier::Gold => write!(f, "Gold"),
            AwardTier::Silver => write!(f, "Silver"),
            AwardTier::Bronze => write!(f, "Bronze"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct TeamRankingEntry {
    pub team: TeamAggregate,
    pub group_rank: u32,
    pub award: Option<AwardTier>,
}

/// The populated teams of one group, best first.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupRanking {
    pub group: usize,
    pub teams: Vec<TeamRankingEntry>,
    /// The highest stamp count in the top team.
    pub top_student: Option<StudentPerformance>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct AwardTally {
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
}

/// Pin completion counts for one population.
///
/// The counts are not a partition: a student with both pins is counted in
/// `korean`, `english` and `both`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct PinTally {
    pub total: usize,
    pub korean: usize,
    pub english: usize,
    pub both: usize,
    pub neither: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PinSummary {
    pub overall: PinTally,
    /// One tally per group of the topology, in group order.
    pub by_group: Vec<(usize, PinTally)>,
    /// Students without a valid group.
    pub unassigned: PinTally,
}

/// Everything computed for one snapshot, before it is laid out in sheets.
#[derive(PartialEq, Debug, Clone)]
pub struct CampStandings {
    pub students: Vec<StudentPerformance>,
    pub overall: Ranking,
    /// One aggregate per cell of the matrix, in group then team order.
    pub teams: Vec<TeamAggregate>,
    pub group_rankings: Vec<GroupRanking>,
    pub award_tally: AwardTally,
    pub unassigned: Ranking,
    pub pins: PinSummary,
}

#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
}

/// A logical table of the report: a header row and data rows.
#[derive(PartialEq, Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// The output of the engine. Formatting is left to the exporter.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ReportModel {
    pub sheets: Vec<Sheet>,
}

impl ReportModel {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Errors that prevent the engine from running.
///
/// Data problems in a snapshot are never errors, only an inconsistent
/// topology is. The [crate::builder::Builder] also rejects records that
/// cannot be joined to a student.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportErrors {
    NoGroups,
    NoTeams,
    DuplicateGroup(String),
    InvalidMvpPercent(u32),
    MissingStudentId,
}

impl Error for ReportErrors {}

impl Display for ReportErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportErrors::NoGroups => write!(f, "the topology does not define any group"),
            ReportErrors::NoTeams => write!(f, "the topology does not define any team per group"),
            ReportErrors::DuplicateGroup(g) => write!(f, "group label {:?} is defined twice", g),
            ReportErrors::InvalidMvpPercent(p) => {
                write!(f, "MVP percentage must be at most 100, got {}", p)
            }
            ReportErrors::MissingStudentId => write!(f, "the record does not have a student id"),
        }
    }
}

// ********* Configuration **********

/// The shape of the camp and the award rules.
///
/// The camp always runs with [Topology::CAMP]. Other values are useful to
/// test the engine with a smaller matrix.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Topology {
    /// Group labels, in ordinal order.
    pub groups: &'static [&'static str],
    pub teams_per_group: u32,
    /// Share of the overall pool, in percent, that receives the MVP mark.
    pub mvp_percent: u32,
    pub gold_awards: usize,
    pub silver_awards: usize,
    pub bronze_awards: usize,
}

impl Topology {
    pub const CAMP: Topology = Topology {
        groups: &["Red", "Orange", "Yellow", "Green", "Blue", "Navy", "Purple"],
        teams_per_group: 5,
        mvp_percent: 10,
        gold_awards: 1,
        silver_awards: 1,
        bronze_awards: 3,
    };

    pub fn validate(&self) -> Result<(), ReportErrors> {
        if self.groups.is_empty() {
            return Err(ReportErrors::NoGroups);
        }
        if self.teams_per_group == 0 {
            return Err(ReportErrors::NoTeams);
        }
        if self.mvp_percent > 100 {
            return Err(ReportErrors::InvalidMvpPercent(self.mvp_percent));
        }
        for (idx, label) in self.groups.iter().enumerate() {
            if self.groups[..idx]
                .iter()
                .any(|other| other.eq_ignore_ascii_case(label))
            {
                return Err(ReportErrors::DuplicateGroup(label.to_string()));
            }
        }
        Ok(())
    }

    /// The 1-based ordinal of a group label. Matching ignores case and
    /// surrounding whitespace.
    pub fn group_ordinal(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.groups
            .iter()
            .position(|g| g.eq_ignore_ascii_case(label))
            .map(|idx| idx + 1)
    }

    pub fn group_label(&self, ordinal: usize) -> &'static str {
        ordinal
            .checked_sub(1)
            .and_then(|idx| self.groups.get(idx))
            .copied()
            .unwrap_or("")
    }

    /// Coerces a team value: `"3"`, `" 3 "` and `"3.0"` are all team 3.
    pub fn team_number(&self, raw: &str) -> Option<u32> {
        let raw = raw.trim();
        let team = match raw.parse::<u32>() {
            Ok(t) => t,
            Err(_) => match raw.parse::<f64>() {
                Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => f as u32,
                _ => return None,
            },
        };
        if team >= 1 && team <= self.teams_per_group {
            Some(team)
        } else {
            None
        }
    }

    /// The cell of a student, if both the group and the team are valid.
    pub fn cell_of(&self, student: &StudentPerformance) -> Option<CellId> {
        let group = self.group_ordinal(student.group.as_deref()?)?;
        let team = self.team_number(student.team.as_deref()?)?;
        Some(CellId { group, team })
    }

    /// All the cells of the matrix, group then team order.
    pub fn cells(&self) -> Vec<CellId> {
        let mut res = Vec::new();
        for group in 1..=self.groups.len() {
            for team in 1..=self.teams_per_group {
                res.push(CellId { group, team });
            }
        }
        res
    }
}
