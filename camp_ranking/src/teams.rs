use log::{debug, info};

use crate::config::*;

/// The full matrix of team aggregates and the students left outside of it.
#[derive(PartialEq, Debug, Clone)]
pub struct TeamMatrix {
    /// One aggregate per cell, in group then team order. Empty cells are
    /// present and zero-filled.
    pub aggregates: Vec<TeamAggregate>,
    /// Students without a valid (group, team), in input order.
    pub unassigned: Vec<StudentPerformance>,
}

impl TeamAggregate {
    fn empty(cell: CellId) -> TeamAggregate {
        TeamAggregate {
            cell,
            member_count: 0,
            scored_member_count: 0,
            stamp_sum: 0,
            average: 0.0,
            members: Vec::new(),
        }
    }

    fn add(&mut self, student: &StudentPerformance) {
        self.member_count += 1;
        if student.stamp_count > 0 {
            self.scored_member_count += 1;
        }
        self.stamp_sum = self.stamp_sum.saturating_add(student.stamp_count);
        self.members.push(student.clone());
    }
}

/// Sorts every student into its cell of the matrix.
pub fn aggregate_teams(students: &[StudentPerformance], topology: &Topology) -> TeamMatrix {
    let mut aggregates: Vec<TeamAggregate> = topology
        .cells()
        .into_iter()
        .map(TeamAggregate::empty)
        .collect();
    let mut unassigned: Vec<StudentPerformance> = Vec::new();

    for s in students.iter() {
        match topology.cell_of(s) {
            Some(cell) => {
                let idx = (cell.group - 1) * topology.teams_per_group as usize
                    + (cell.team - 1) as usize;
                aggregates[idx].add(s);
            }
            None => {
                debug!(
                    "aggregate_teams: student {:?} does not map to a team (group {:?}, team {:?})",
                    s.id, s.group, s.team
                );
                unassigned.push(s.clone());
            }
        }
    }

    for agg in aggregates.iter_mut() {
        agg.average = if agg.scored_member_count == 0 {
            0.0
        } else {
            agg.stamp_sum as f64 / agg.scored_member_count as f64
        };
    }

    info!(
        "aggregate_teams: {} students in {} populated teams, {} unassigned",
        students.len() - unassigned.len(),
        aggregates.iter().filter(|a| a.member_count > 0).count(),
        unassigned.len()
    );
    TeamMatrix {
        aggregates,
        unassigned,
    }
}

/// Ranks the populated teams of every group by average, and hands out the
/// awards.
///
/// Equal averages are broken by team number, the lower number first. Empty
/// teams are not ranked. A team with members but no stamps is ranked with
/// an average of 0.
pub fn rank_teams(aggregates: &[TeamAggregate], topology: &Topology) -> Vec<GroupRanking> {
    let mut res: Vec<GroupRanking> = Vec::new();
    for group in 1..=topology.groups.len() {
        let mut populated: Vec<&TeamAggregate> = aggregates
            .iter()
            .filter(|a| a.cell.group == group && a.member_count > 0)
            .collect();
        populated.sort_by(|a, b| {
            b.average
                .total_cmp(&a.average)
                .then(a.cell.team.cmp(&b.cell.team))
        });

        let teams: Vec<TeamRankingEntry> = populated
            .into_iter()
            .enumerate()
            .map(|(idx, agg)| {
                let group_rank = (idx + 1) as u32;
                TeamRankingEntry {
                    team: agg.clone(),
                    group_rank,
                    award: award_for_rank(group_rank, topology),
                }
            })
            .collect();

        let top_student = teams.first().and_then(|t| top_member(&t.team));
        debug!(
            "rank_teams: group {} ({}): {:?}",
            group,
            topology.group_label(group),
            teams
                .iter()
                .map(|t| (t.team.cell.team, t.team.average, t.award))
                .collect::<Vec<_>>()
        );
        res.push(GroupRanking {
            group,
            teams,
            top_student,
        });
    }
    res
}

/// The award for a rank within a group, if any.
pub fn award_for_rank(group_rank: u32, topology: &Topology) -> Option<AwardTier> {
    let r = group_rank as usize;
    let silver_start = topology.gold_awards;
    let bronze_start = silver_start + topology.silver_awards;
    let bronze_end = bronze_start + topology.bronze_awards;
    match r {
        0 => None,
        r if r <= silver_start => Some(AwardTier::Gold),
        r if r <= bronze_start => Some(AwardTier::Silver),
        r if r <= bronze_end => Some(AwardTier::Bronze),
        _ => None,
    }
}

/// Counts the awards over all the groups.
pub fn tally_awards(rankings: &[GroupRanking]) -> AwardTally {
    let mut tally = AwardTally::default();
    for entry in rankings.iter().flat_map(|g| g.teams.iter()) {
        match entry.award {
            Some(AwardTier::Gold) => tally.gold += 1,
            Some(AwardTier::Silver) => tally.silver += 1,
            Some(AwardTier::Bronze) => tally.bronze += 1,
            None => {}
        }
    }
    tally
}

// The first member with the highest stamp count.
fn top_member(team: &TeamAggregate) -> Option<StudentPerformance> {
    let mut best: Option<&StudentPerformance> = None;
    for m in team.members.iter() {
        match best {
            Some(b) if b.stamp_count >= m.stamp_count => {}
            _ => best = Some(m),
        }
    }
    best.cloned()
}
