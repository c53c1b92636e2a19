mod config;
use log::info;

pub mod builder;
pub mod manual;
pub mod pins;
pub mod ranking;
pub mod report;
pub mod roster;
pub mod teams;

pub use crate::config::*;

/// Computes every ranking and tally for one snapshot of the camp data.
///
/// Arguments:
/// * `roster` the attendance roster, already reconciled between sources
/// * `stamps` the stamp sheets, joined to the roster by student id
/// * `level_tests` the level test results, joined to the roster by student id
/// * `topology` the groups, teams and award rules. The camp runs with
/// [Topology::CAMP].
///
/// Malformed records never make this function fail: they are defaulted or
/// moved to the unassigned bucket. It only fails on an invalid topology.
pub fn compute_standings(
    roster: &[RosterRecord],
    stamps: &[StampRecord],
    level_tests: &[LevelTestRecord],
    topology: &Topology,
) -> Result<CampStandings, ReportErrors> {
    topology.validate()?;
    info!(
        "Processing {} roster entries, {} stamp sheets, {} level tests",
        roster.len(),
        stamps.len(),
        level_tests.len()
    );

    let students = roster::join_roster(roster, stamps, level_tests);
    let overall = ranking::rank_students(&students, topology.mvp_percent);
    info!(
        "{} students, mvp cutoff: {}",
        students.len(),
        overall.mvp_cutoff
    );

    let matrix = teams::aggregate_teams(&students, topology);
    let group_rankings = teams::rank_teams(&matrix.aggregates, topology);
    let award_tally = teams::tally_awards(&group_rankings);
    info!(
        "Awards: {} gold, {} silver, {} bronze",
        award_tally.gold, award_tally.silver, award_tally.bronze
    );
    let unassigned = ranking::rank_unassigned(&matrix.unassigned, &overall);
    let pins = pins::classify_pins(&students, topology);

    Ok(CampStandings {
        students,
        overall,
        teams: matrix.aggregates,
        group_rankings,
        award_tally,
        unassigned,
        pins,
    })
}

/// Runs the whole engine and returns the report, ready for an exporter.
pub fn run_camp_report(
    roster: &[RosterRecord],
    stamps: &[StampRecord],
    level_tests: &[LevelTestRecord],
    topology: &Topology,
) -> Result<ReportModel, ReportErrors> {
    let standings = compute_standings(roster, stamps, level_tests, topology)?;
    Ok(report::assemble_report(&standings, topology))
}
