use log::debug;

use crate::config::*;

// slice::sort_by is stable, so equal counts keep their input order.
fn sorted_by_stamps(students: &[StudentPerformance]) -> Vec<&StudentPerformance> {
    let mut sorted: Vec<&StudentPerformance> = students.iter().collect();
    sorted.sort_by(|a, b| b.stamp_count.cmp(&a.stamp_count));
    sorted
}

/// Ranks a pool of students by stamp count, highest first.
///
/// The sort is stable: students with the same stamp count keep their input
/// order. Ranks follow the sorted position, so tied students still get
/// distinct, consecutive ranks (`[5, 5, 3]` ranks as `[1, 2, 3]`).
pub fn rank_students(students: &[StudentPerformance], mvp_percent: u32) -> Ranking {
    let mvp_cutoff = mvp_cutoff(students.len(), mvp_percent);
    debug!(
        "rank_students: {} students, mvp cutoff {}",
        students.len(),
        mvp_cutoff
    );

    let entries = sorted_by_stamps(students)
        .into_iter()
        .enumerate()
        .map(|(idx, student)| {
            let rank = (idx + 1) as u32;
            RankingEntry {
                student: student.clone(),
                rank,
                is_mvp: mvp_cutoff > 0 && (rank as usize) <= mvp_cutoff,
            }
        })
        .collect();
    Ranking {
        entries,
        mvp_cutoff,
    }
}

/// `ceil(count * percent / 100)`, in integer arithmetic.
pub fn mvp_cutoff(count: usize, percent: u32) -> usize {
    (count * percent as usize + 99) / 100
}

/// Ranks a subset of the students among themselves.
///
/// The ranks are local to the subset. The MVP marks and the cutoff are the
/// ones of `overall`: being an MVP is decided over the whole camp.
pub fn rank_within(pool: &[StudentPerformance], overall: &Ranking) -> Ranking {
    let entries = sorted_by_stamps(pool)
        .into_iter()
        .enumerate()
        .map(|(idx, student)| RankingEntry {
            student: student.clone(),
            rank: (idx + 1) as u32,
            is_mvp: overall
                .rank_of(&student.id)
                .map(|e| e.is_mvp)
                .unwrap_or(false),
        })
        .collect();
    Ranking {
        entries,
        mvp_cutoff: overall.mvp_cutoff,
    }
}

/// Ranks the students that do not fit in the matrix among themselves, so
/// that they still appear with a rank in the report.
pub fn rank_unassigned(unassigned: &[StudentPerformance], overall: &Ranking) -> Ranking {
    for s in unassigned.iter() {
        debug!(
            "rank_unassigned: {:?} has group {:?} team {:?}",
            s.id, s.group, s.team
        );
    }
    rank_within(unassigned, overall)
}

impl Ranking {
    /// The entry of a student in this pool.
    pub fn rank_of(&self, student_id: &str) -> Option<&RankingEntry> {
        self.entries.iter().find(|e| e.student.id == student_id)
    }
}
