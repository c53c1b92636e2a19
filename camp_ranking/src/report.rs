use log::info;

use crate::config::*;
use crate::ranking::rank_within;

pub const AWARD_SUMMARY_SHEET: &str = "award-summary";
pub const TEAM_RANKING_SHEET: &str = "team-ranking";
pub const PIN_SUMMARY_SHEET: &str = "pin-completion-summary";
pub const OVERALL_SHEET: &str = "overall";
pub const UNASSIGNED_SHEET: &str = "unassigned";

/// Lays out the standings as sheets.
///
/// The order is fixed: the summaries, the overall ranking, one sheet per
/// populated team (group then team order), and the unassigned students.
pub fn assemble_report(standings: &CampStandings, topology: &Topology) -> ReportModel {
    let mut sheets: Vec<Sheet> = vec![
        award_summary_sheet(standings, topology),
        team_ranking_sheet(standings, topology),
        pin_summary_sheet(&standings.pins, topology),
        overall_sheet(&standings.overall),
    ];
    for agg in standings.teams.iter().filter(|a| a.member_count > 0) {
        sheets.push(team_sheet(agg, &standings.overall, topology));
    }
    sheets.push(unassigned_sheet(&standings.unassigned, &standings.overall));

    info!("assemble_report: {} sheets", sheets.len());
    ReportModel { sheets }
}

/// The name of the sheet of a team, such as `Red Team 1`.
pub fn team_sheet_name(cell: CellId, topology: &Topology) -> String {
    format!("{} Team {}", topology.group_label(cell.group), cell.team)
}

fn award_summary_sheet(standings: &CampStandings, topology: &Topology) -> Sheet {
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let mut populated_total = 0;
    for g in standings.group_rankings.iter() {
        populated_total += g.teams.len();
        let teams_with = |tier: AwardTier| -> String {
            g.teams
                .iter()
                .filter(|t| t.award == Some(tier))
                .map(|t| format!("Team {}", t.team.cell.team))
                .collect::<Vec<String>>()
                .join(", ")
        };
        let (top_name, top_church, top_stamps) = match &g.top_student {
            Some(s) => (
                text(&s.display_name),
                text(&s.church_name),
                int(s.stamp_count),
            ),
            None => (text(""), text(""), text("")),
        };
        rows.push(vec![
            text(topology.group_label(g.group)),
            int(g.teams.len() as u64),
            text(&teams_with(AwardTier::Gold)),
            text(&teams_with(AwardTier::Silver)),
            text(&teams_with(AwardTier::Bronze)),
            top_name,
            top_church,
            top_stamps,
        ]);
    }
    let tally = standings.award_tally;
    rows.push(vec![
        text("Total"),
        int(populated_total as u64),
        int(tally.gold as u64),
        int(tally.silver as u64),
        int(tally.bronze as u64),
        text(""),
        text(""),
        text(""),
    ]);
    Sheet {
        name: AWARD_SUMMARY_SHEET.to_string(),
        header: header(&[
            "Group",
            "Teams",
            "Gold",
            "Silver",
            "Bronze",
            "Top Student",
            "Top Student Church",
            "Top Student Stamps",
        ]),
        rows,
    }
}

fn team_ranking_sheet(standings: &CampStandings, topology: &Topology) -> Sheet {
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for g in standings.group_rankings.iter() {
        for t in g.teams.iter() {
            rows.push(vec![
                text(topology.group_label(g.group)),
                int(t.group_rank as u64),
                int(t.team.cell.team as u64),
                int(t.team.member_count as u64),
                int(t.team.scored_member_count as u64),
                int(t.team.stamp_sum),
                CellValue::Float((t.team.average * 100.0).round() / 100.0),
                text(&t.award.map(|a| a.to_string()).unwrap_or_default()),
            ]);
        }
    }
    Sheet {
        name: TEAM_RANKING_SHEET.to_string(),
        header: header(&[
            "Group",
            "Rank",
            "Team",
            "Members",
            "Scored Members",
            "Stamp Total",
            "Average",
            "Award",
        ]),
        rows,
    }
}

fn pin_summary_sheet(pins: &PinSummary, topology: &Topology) -> Sheet {
    let pin_row = |label: &str, t: &PinTally| -> Vec<CellValue> {
        vec![
            text(label),
            int(t.total as u64),
            int(t.korean as u64),
            CellValue::Float(t.percent(t.korean)),
            int(t.english as u64),
            CellValue::Float(t.percent(t.english)),
            int(t.both as u64),
            CellValue::Float(t.percent(t.both)),
            int(t.neither as u64),
            CellValue::Float(t.percent(t.neither)),
        ]
    };
    let mut rows: Vec<Vec<CellValue>> = pins
        .by_group
        .iter()
        .map(|(g, t)| pin_row(topology.group_label(*g), t))
        .collect();
    rows.push(pin_row("Unassigned", &pins.unassigned));
    rows.push(pin_row("Total", &pins.overall));
    Sheet {
        name: PIN_SUMMARY_SHEET.to_string(),
        header: header(&[
            "Group",
            "Students",
            "Korean Pin",
            "Korean Pin %",
            "English Pin",
            "English Pin %",
            "Both Pins",
            "Both Pins %",
            "No Pin",
            "No Pin %",
        ]),
        rows,
    }
}

fn overall_sheet(overall: &Ranking) -> Sheet {
    let rows = overall
        .entries
        .iter()
        .map(|e| {
            let s = &e.student;
            let (score, pct) = match &s.level_test {
                Some(lt) => (
                    text(&format!("{}/{}", lt.total, lt.max)),
                    CellValue::Float(lt.percentage),
                ),
                None => (text(""), text("")),
            };
            vec![
                int(e.rank as u64),
                text(&s.display_name),
                text(&s.english_name),
                text(&s.church_name),
                text(s.group.as_deref().unwrap_or("")),
                text(s.team.as_deref().unwrap_or("")),
                int(s.stamp_count),
                mark(e.is_mvp, "MVP"),
                mark(s.korean_pin_complete, "Yes"),
                mark(s.english_pin_complete, "Yes"),
                mark(s.attended, "Yes"),
                score,
                pct,
            ]
        })
        .collect();
    Sheet {
        name: OVERALL_SHEET.to_string(),
        header: header(&[
            "Rank",
            "Name",
            "English Name",
            "Church",
            "Group",
            "Team",
            "Stamps",
            "MVP",
            "Korean Pin",
            "English Pin",
            "Attended",
            "Level Test",
            "Level Test %",
        ]),
        rows,
    }
}

fn team_sheet(agg: &TeamAggregate, overall: &Ranking, topology: &Topology) -> Sheet {
    let ranked = rank_within(&agg.members, overall);
    let rows = ranked
        .entries
        .iter()
        .map(|e| {
            let s = &e.student;
            vec![
                int(e.rank as u64),
                overall_rank(overall, &s.id),
                text(&s.display_name),
                text(&s.english_name),
                text(&s.church_name),
                int(s.stamp_count),
                mark(e.is_mvp, "MVP"),
                mark(s.korean_pin_complete, "Yes"),
                mark(s.english_pin_complete, "Yes"),
            ]
        })
        .collect();
    Sheet {
        name: team_sheet_name(agg.cell, topology),
        header: header(&[
            "Team Rank",
            "Overall Rank",
            "Name",
            "English Name",
            "Church",
            "Stamps",
            "MVP",
            "Korean Pin",
            "English Pin",
        ]),
        rows,
    }
}

fn unassigned_sheet(unassigned: &Ranking, overall: &Ranking) -> Sheet {
    let rows = unassigned
        .entries
        .iter()
        .map(|e| {
            let s = &e.student;
            vec![
                int(e.rank as u64),
                overall_rank(overall, &s.id),
                text(&s.display_name),
                text(&s.english_name),
                text(&s.church_name),
                text(s.group.as_deref().unwrap_or("")),
                text(s.team.as_deref().unwrap_or("")),
                int(s.stamp_count),
                mark(e.is_mvp, "MVP"),
            ]
        })
        .collect();
    Sheet {
        name: UNASSIGNED_SHEET.to_string(),
        header: header(&[
            "Rank",
            "Overall Rank",
            "Name",
            "English Name",
            "Church",
            "Group",
            "Team",
            "Stamps",
            "MVP",
        ]),
        rows,
    }
}

fn overall_rank(overall: &Ranking, student_id: &str) -> CellValue {
    overall
        .rank_of(student_id)
        .map(|o| int(o.rank as u64))
        .unwrap_or_else(|| text(""))
}

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

// Counts above i64::MAX are shown as i64::MAX.
fn int(n: u64) -> CellValue {
    CellValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn mark(flag: bool, label: &str) -> CellValue {
    if flag {
        text(label)
    } else {
        text("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_standings;

    fn roster(id: &str, group: &str, team: &str) -> RosterRecord {
        RosterRecord {
            id: id.to_string(),
            name: Some(format!("name-{}", id)),
            church_name: Some("Grace".to_string()),
            student_group: Some(group.to_string()),
            team: Some(team.to_string()),
            attended: Some(true),
            ..Default::default()
        }
    }

    fn stamps(id: &str, count: i64, korean: bool, english: bool) -> StampRecord {
        StampRecord {
            student_id: id.to_string(),
            stamp_count: Some(count),
            korean_pin_complete: Some(korean),
            english_pin_complete: Some(english),
            ..Default::default()
        }
    }

    fn sample_report() -> ReportModel {
        let r = vec![
            roster("1", "Red", "1"),
            roster("2", "Red", "1"),
            roster("3", "Red", "2"),
            roster("4", "Purple", "5"),
            roster("5", "Red", "6"),
        ];
        let s = vec![
            stamps("1", 8, true, true),
            stamps("2", 2, true, false),
            stamps("3", 4, false, false),
            stamps("4", 1, false, true),
            stamps("5", 9, false, false),
        ];
        let standings = compute_standings(&r, &s, &[], &Topology::CAMP).unwrap();
        assemble_report(&standings, &Topology::CAMP)
    }

    #[test]
    fn sheets_come_in_a_fixed_order() {
        let report = sample_report();
        let names: Vec<&str> = report.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                AWARD_SUMMARY_SHEET,
                TEAM_RANKING_SHEET,
                PIN_SUMMARY_SHEET,
                OVERALL_SHEET,
                "Red Team 1",
                "Red Team 2",
                "Purple Team 5",
                UNASSIGNED_SHEET
            ]
        );
        for sheet in report.sheets.iter() {
            for row in sheet.rows.iter() {
                assert_eq!(row.len(), sheet.header.len(), "sheet {}", sheet.name);
            }
        }
    }

    #[test]
    fn award_summary_lists_winners_and_totals() {
        let report = sample_report();
        let sheet = report.sheet(AWARD_SUMMARY_SHEET).unwrap();
        assert_eq!(sheet.rows.len(), 8);
        // Red: team 1 averages 5, team 2 averages 4.
        assert_eq!(
            sheet.rows[0],
            vec![
                text("Red"),
                int(2),
                text("Team 1"),
                text("Team 2"),
                text(""),
                text("name-1"),
                text("Grace"),
                int(8)
            ]
        );
        assert_eq!(sheet.rows[1][1], int(0));
        assert_eq!(sheet.rows[1][5], text(""));
        assert_eq!(
            sheet.rows[7],
            vec![
                text("Total"),
                int(3),
                int(2),
                int(1),
                int(0),
                text(""),
                text(""),
                text("")
            ]
        );
    }

    #[test]
    fn overall_and_unassigned_sheets() {
        let report = sample_report();
        let overall = report.sheet(OVERALL_SHEET).unwrap();
        assert_eq!(overall.rows.len(), 5);
        // The unassigned student has the most stamps and is the only MVP.
        assert_eq!(overall.rows[0][0], int(1));
        assert_eq!(overall.rows[0][1], text("name-5"));
        assert_eq!(overall.rows[0][7], text("MVP"));
        assert_eq!(overall.rows[1][7], text(""));
        assert_eq!(overall.rows[0][11], text(""));

        let unassigned = report.sheet(UNASSIGNED_SHEET).unwrap();
        assert_eq!(
            unassigned.rows,
            vec![vec![
                int(1),
                int(1),
                text("name-5"),
                text(""),
                text("Grace"),
                text("Red"),
                text("6"),
                int(9),
                text("MVP")
            ]]
        );
    }

    #[test]
    fn team_sheet_ranks_members_within_the_team() {
        let report = sample_report();
        let red1 = report.sheet("Red Team 1").unwrap();
        let firsts: Vec<(CellValue, CellValue, CellValue)> = red1
            .rows
            .iter()
            .map(|r| (r[0].clone(), r[1].clone(), r[2].clone()))
            .collect();
        assert_eq!(
            firsts,
            vec![
                (int(1), int(2), text("name-1")),
                (int(2), int(4), text("name-2"))
            ]
        );
    }

    #[test]
    fn pin_summary_has_group_unassigned_and_total_rows() {
        let report = sample_report();
        let sheet = report.sheet(PIN_SUMMARY_SHEET).unwrap();
        assert_eq!(sheet.rows.len(), 9);
        assert_eq!(sheet.rows[7][0], text("Unassigned"));
        // Student 5 has a valid group, so it is counted with Red.
        assert_eq!(sheet.rows[7][1], int(0));
        assert_eq!(sheet.rows[7][3], CellValue::Float(0.0));
        let total = &sheet.rows[8];
        assert_eq!(total[0], text("Total"));
        assert_eq!(total[1], int(5));
        assert_eq!(total[2], int(2));
        assert_eq!(total[3], CellValue::Float(40.0));
        assert_eq!(total[6], int(1));
        assert_eq!(total[8], int(2));
    }

    #[test]
    fn empty_snapshot_still_has_summaries() {
        let standings = compute_standings(&[], &[], &[], &Topology::CAMP).unwrap();
        let report = assemble_report(&standings, &Topology::CAMP);
        let names: Vec<&str> = report.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                AWARD_SUMMARY_SHEET,
                TEAM_RANKING_SHEET,
                PIN_SUMMARY_SHEET,
                OVERALL_SHEET,
                UNASSIGNED_SHEET
            ]
        );
        let pins = report.sheet(PIN_SUMMARY_SHEET).unwrap();
        for row in pins.rows.iter() {
            assert_eq!(row[3], CellValue::Float(0.0));
            assert_eq!(row[9], CellValue::Float(0.0));
        }
    }
}
