use log::debug;

use crate::config::*;

impl PinTally {
    fn add(&mut self, student: &StudentPerformance) {
        self.total += 1;
        let k = student.korean_pin_complete;
        let e = student.english_pin_complete;
        if k {
            self.korean += 1;
        }
        if e {
            self.english += 1;
        }
        if k && e {
            self.both += 1;
        }
        if !k && !e {
            self.neither += 1;
        }
    }

    /// `count / total * 100`, rounded to one decimal. An empty population
    /// gives 0.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pct = count as f64 / self.total as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

/// Counts pin completion over all the students and per group.
///
/// Only the group is looked at: a student in a valid group with an invalid
/// team still counts for that group.
pub fn classify_pins(students: &[StudentPerformance], topology: &Topology) -> PinSummary {
    let mut summary = PinSummary {
        overall: PinTally::default(),
        by_group: (1..=topology.groups.len())
            .map(|g| (g, PinTally::default()))
            .collect(),
        unassigned: PinTally::default(),
    };
    for s in students.iter() {
        summary.overall.add(s);
        match s.group.as_deref().and_then(|g| topology.group_ordinal(g)) {
            Some(g) => summary.by_group[g - 1].1.add(s),
            None => summary.unassigned.add(s),
        }
    }
    debug!("classify_pins: overall {:?}", summary.overall);
    summary
}
