pub use crate::config::*;

/// A builder for assembling a snapshot of the camp data in code.
///
/// The command line reads its snapshot from files. The builder is the
/// simplest way to drive the engine from another program or a test.
///
/// ```
/// pub use camp_ranking::builder::Builder;
/// pub use camp_ranking::Topology;
/// # use camp_ranking::ReportErrors;
///
/// let mut builder = Builder::new(&Topology::CAMP)?;
///
/// builder.add_student_simple("s1", "Minji", "Red", 1)?;
/// builder.add_student_simple("s2", "Joon", "Red", 1)?;
/// builder.add_stamps_simple("s1", 12, true, false)?;
///
/// let report = builder.report()?;
/// assert_eq!(report.sheets.len(), 6);
///
/// # Ok::<(), ReportErrors>(())
/// ```
pub struct Builder {
    pub(crate) _topology: Topology,
    pub(crate) _roster: Vec<RosterRecord>,
    pub(crate) _stamps: Vec<StampRecord>,
    pub(crate) _level_tests: Vec<LevelTestRecord>,
}

impl Builder {
    pub fn new(topology: &Topology) -> Result<Builder, ReportErrors> {
        topology.validate()?;
        Ok(Builder {
            _topology: topology.clone(),
            _roster: Vec::new(),
            _stamps: Vec::new(),
            _level_tests: Vec::new(),
        })
    }

    /// Adds a student to the roster with the most common fields.
    pub fn add_student_simple(
        &mut self,
        id: &str,
        name: &str,
        group: &str,
        team: u32,
    ) -> Result<(), ReportErrors> {
        self.add_student(&RosterRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            student_group: Some(group.to_string()),
            team: Some(team.to_string()),
            attended: Some(true),
            ..Default::default()
        })
    }

    /// Fails if the record has a blank id.
    pub fn add_student(&mut self, record: &RosterRecord) -> Result<(), ReportErrors> {
        check_id(&record.id)?;
        self._roster.push(record.clone());
        Ok(())
    }

    /// Records the stamp sheet of a student.
    ///
    /// A later sheet for the same student replaces the earlier one.
    pub fn add_stamps_simple(
        &mut self,
        id: &str,
        stamp_count: i64,
        korean_pin_complete: bool,
        english_pin_complete: bool,
    ) -> Result<(), ReportErrors> {
        self.add_stamps(&StampRecord {
            student_id: id.to_string(),
            stamp_count: Some(stamp_count),
            korean_pin_complete: Some(korean_pin_complete),
            english_pin_complete: Some(english_pin_complete),
            ..Default::default()
        })
    }

    pub fn add_stamps(&mut self, record: &StampRecord) -> Result<(), ReportErrors> {
        check_id(&record.student_id)?;
        self._stamps.push(record.clone());
        Ok(())
    }

    pub fn add_level_test(&mut self, record: &LevelTestRecord) -> Result<(), ReportErrors> {
        check_id(&record.student_id)?;
        self._level_tests.push(record.clone());
        Ok(())
    }

    pub fn standings(&self) -> Result<CampStandings, ReportErrors> {
        crate::compute_standings(
            &self._roster,
            &self._stamps,
            &self._level_tests,
            &self._topology,
        )
    }

    pub fn report(&self) -> Result<ReportModel, ReportErrors> {
        let standings = self.standings()?;
        Ok(crate::report::assemble_report(&standings, &self._topology))
    }
}

fn check_id(id: &str) -> Result<(), ReportErrors> {
    if id.trim().is_empty() {
        Err(ReportErrors::MissingStudentId)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        let mut builder = Builder::new(&Topology::CAMP).unwrap();
        assert_eq!(
            builder.add_student_simple("  ", "Nobody", "Red", 1),
            Err(ReportErrors::MissingStudentId)
        );
        assert_eq!(
            builder.add_stamps_simple("", 3, false, false),
            Err(ReportErrors::MissingStudentId)
        );
        assert_eq!(
            builder.add_level_test(&LevelTestRecord::default()),
            Err(ReportErrors::MissingStudentId)
        );
        assert!(builder.standings().unwrap().students.is_empty());
    }

    #[test]
    fn standings_and_report_agree() {
        let mut builder = Builder::new(&Topology::CAMP).unwrap();
        builder.add_student_simple("s1", "Minji", "Red", 1).unwrap();
        builder.add_student_simple("s2", "Joon", "Blue", 9).unwrap();
        builder.add_stamps_simple("s1", 12, true, false).unwrap();
        builder
            .add_level_test(&LevelTestRecord {
                student_id: "s1".to_string(),
                total_score: 45.0,
                max_score: 50.0,
                percentage: 90.0,
                test_date: None,
            })
            .unwrap();

        let standings = builder.standings().unwrap();
        assert_eq!(standings.overall.entries[0].student.id, "s1");
        assert_eq!(standings.unassigned.entries.len(), 1);
        let report = builder.report().unwrap();
        assert_eq!(
            report,
            crate::report::assemble_report(&standings, &Topology::CAMP)
        );
    }
}
