use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use crate::config::*;

/// Joins the roster with the stamp sheets and the level tests.
///
/// The roster drives the output: one student per roster id, in roster order.
/// A student without a stamp sheet or a level test gets the default values.
pub fn join_roster(
    roster: &[RosterRecord],
    stamps: &[StampRecord],
    level_tests: &[LevelTestRecord],
) -> Vec<StudentPerformance> {
    let latest_stamps = latest_by_student(stamps, |s| s.student_id.as_str(), |s| s.updated_at.as_deref());
    let latest_tests = latest_by_student(level_tests, |t| t.student_id.as_str(), |t| t.test_date.as_deref());
    debug!(
        "join_roster: {} roster entries, {} stamp sheets, {} level tests",
        roster.len(),
        latest_stamps.len(),
        latest_tests.len()
    );

    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<StudentPerformance> = Vec::new();
    for r in roster.iter() {
        let id = r.id.trim();
        if id.is_empty() {
            warn!("join_roster: skipping roster entry without id: {:?}", r);
            continue;
        }
        if !seen.insert(id) {
            warn!("join_roster: duplicate roster id {:?}, keeping the first one", id);
            continue;
        }
        let stamp: Option<&StampRecord> = latest_stamps.get(id).copied();
        let test: Option<&LevelTestRecord> = latest_tests.get(id).copied();

        let display_name = non_blank(&r.name)
            .or_else(|| non_blank(&r.korean_name))
            .unwrap_or("");
        let group = non_blank(&r.student_group).or_else(|| stamp.and_then(|s| non_blank(&s.student_group)));
        let team = non_blank(&r.team).or_else(|| stamp.and_then(|s| non_blank(&s.team)));

        res.push(StudentPerformance {
            id: id.to_string(),
            display_name: display_name.to_string(),
            english_name: non_blank(&r.english_name).unwrap_or("").to_string(),
            church_name: non_blank(&r.church_name).unwrap_or("").to_string(),
            group: group.map(|s| s.to_string()),
            team: team.map(|s| s.to_string()),
            attended: r.attended.unwrap_or(false),
            stamp_count: stamp
                .and_then(|s| s.stamp_count)
                .map(|c| c.max(0) as u64)
                .unwrap_or(0),
            korean_pin_complete: stamp.and_then(|s| s.korean_pin_complete).unwrap_or(false),
            english_pin_complete: stamp.and_then(|s| s.english_pin_complete).unwrap_or(false),
            level_test: test.map(|t| LevelTestScore {
                total: t.total_score,
                max: t.max_score,
                percentage: t.percentage,
                test_date: t.test_date.clone(),
            }),
        });
    }

    for id in latest_stamps.keys().chain(latest_tests.keys()) {
        if !seen.contains(id) {
            debug!("join_roster: record for unknown student {:?} ignored", id);
        }
    }
    res
}

// Keeps one record per student id: the one with the greatest timestamp.
// Equal or missing timestamps resolve to the later record.
fn latest_by_student<'a, T>(
    records: &'a [T],
    id: impl Fn(&'a T) -> &'a str,
    timestamp: impl Fn(&'a T) -> Option<&'a str>,
) -> HashMap<&'a str, &'a T> {
    let mut res: HashMap<&'a str, &'a T> = HashMap::new();
    for rec in records.iter() {
        let key = id(rec).trim();
        if key.is_empty() {
            warn!("latest_by_student: skipping record without student id");
            continue;
        }
        let newer = match res.get(key) {
            Some(cur) => match (timestamp(rec), timestamp(*cur)) {
                (Some(a), Some(b)) => a >= b,
                _ => true,
            },
            None => true,
        };
        if newer {
            res.insert(key, rec);
        }
    }
    res
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(|x| x.trim()).filter(|x| !x.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str) -> RosterRecord {
        RosterRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn stamps(id: &str, count: i64, updated_at: Option<&str>) -> StampRecord {
        StampRecord {
            student_id: id.to_string(),
            stamp_count: Some(count),
            updated_at: updated_at.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_auxiliary_data_uses_defaults() {
        let res = join_roster(&[student("s1", "Minji")], &[], &[]);
        assert_eq!(res.len(), 1);
        let s = &res[0];
        assert_eq!(s.display_name, "Minji");
        assert_eq!(s.stamp_count, 0);
        assert!(!s.korean_pin_complete);
        assert!(!s.english_pin_complete);
        assert!(!s.attended);
        assert_eq!(s.level_test, None);
        assert_eq!(s.english_name, "");
        assert_eq!(s.church_name, "");
    }

    #[test]
    fn display_name_falls_back_to_korean_name() {
        let roster = vec![
            RosterRecord {
                id: "s1".to_string(),
                name: Some("  ".to_string()),
                korean_name: Some("김민지".to_string()),
                ..Default::default()
            },
            RosterRecord {
                id: "s2".to_string(),
                ..Default::default()
            },
        ];
        let res = join_roster(&roster, &[], &[]);
        assert_eq!(res[0].display_name, "김민지");
        assert_eq!(res[1].display_name, "");
    }

    #[test]
    fn most_recent_stamp_sheet_wins() {
        let sheets = vec![
            stamps("s1", 4, Some("2024-07-02T10:00:00Z")),
            stamps("s1", 9, Some("2024-07-03T10:00:00Z")),
            stamps("s1", 6, Some("2024-07-01T10:00:00Z")),
            stamps("s2", 1, None),
            stamps("s2", 2, None),
            stamps("s3", 5, Some("2024-07-03T10:00:00Z")),
            stamps("s3", 7, None),
        ];
        let roster = vec![student("s1", "A"), student("s2", "B"), student("s3", "C")];
        let res = join_roster(&roster, &sheets, &[]);
        assert_eq!(res[0].stamp_count, 9);
        assert_eq!(res[1].stamp_count, 2);
        assert_eq!(res[2].stamp_count, 7);
    }

    #[test]
    fn negative_stamps_are_clamped() {
        let res = join_roster(&[student("s1", "A")], &[stamps("s1", -3, None)], &[]);
        assert_eq!(res[0].stamp_count, 0);
    }

    #[test]
    fn stamp_sheet_fills_missing_group_and_team() {
        let roster = vec![RosterRecord {
            id: "s1".to_string(),
            student_group: Some("Blue".to_string()),
            ..Default::default()
        }];
        let sheet = StampRecord {
            student_id: " s1 ".to_string(),
            stamp_count: Some(3),
            student_group: Some("Red".to_string()),
            team: Some("2".to_string()),
            korean_pin_complete: Some(true),
            ..Default::default()
        };
        let res = join_roster(&roster, &[sheet], &[]);
        assert_eq!(res[0].group.as_deref(), Some("Blue"));
        assert_eq!(res[0].team.as_deref(), Some("2"));
        assert!(res[0].korean_pin_complete);
        assert_eq!(res[0].stamp_count, 3);
    }

    #[test]
    fn duplicate_and_empty_ids_are_dropped() {
        let roster = vec![student("s1", "first"), student("", "nobody"), student("s1", "second")];
        let res = join_roster(&roster, &[], &[]);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].display_name, "first");
    }

    #[test]
    fn level_tests_are_joined_by_student_id() {
        let tests = vec![
            LevelTestRecord {
                student_id: "s2".to_string(),
                total_score: 40.0,
                max_score: 50.0,
                percentage: 80.0,
                test_date: Some("2024-07-01".to_string()),
            },
            LevelTestRecord {
                student_id: "s2".to_string(),
                total_score: 45.0,
                max_score: 50.0,
                percentage: 90.0,
                test_date: Some("2024-07-04".to_string()),
            },
            LevelTestRecord {
                student_id: "ghost".to_string(),
                ..Default::default()
            },
        ];
        let res = join_roster(&[student("s1", "A"), student("s2", "B")], &[], &tests);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].level_test, None);
        let lt = res[1].level_test.clone().unwrap();
        assert_eq!(lt.total, 45.0);
        assert_eq!(lt.percentage, 90.0);
        assert_eq!(lt.test_date.as_deref(), Some("2024-07-04"));
    }
}
