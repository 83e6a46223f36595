//! Assignment views.
//!
//! A [`StartAssignment`] places a course in a room from its first period.
//! A [`PresentAssignment`] is one period-slice of that occupancy. Present
//! assignments are always derived from a start assignment, never stored,
//! so the two views cannot drift apart.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::error::ScheduleError;
use crate::models::{ClassPeriod, Course, Room, TimeBlock};

/// A course placed in a room, anchored at its starting period.
///
/// The run `[start, start + period_length)` always fits inside the
/// starting period's block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StartAssignment {
    period: ClassPeriod,
    room: Arc<Room>,
    course: Arc<Course>,
}

impl StartAssignment {
    /// Creates a start assignment.
    ///
    /// # Errors
    /// - [`ScheduleError::EmptyRun`] if the course occupies no periods.
    /// - [`ScheduleError::PeriodOutOfBlock`] if the run would cross the
    ///   end of the block.
    pub fn new(
        period: ClassPeriod,
        room: Arc<Room>,
        course: Arc<Course>,
    ) -> Result<Self, ScheduleError> {
        let length = course.period_length;
        if length == 0 {
            return Err(ScheduleError::EmptyRun {
                course: course.id.clone(),
            });
        }
        let available = period.remaining_in_block();
        if length > available {
            return Err(ScheduleError::PeriodOutOfBlock {
                course: course.id.clone(),
                period: period.id().to_string(),
                block: period.block().id.clone(),
                length,
                available,
            });
        }
        Ok(Self {
            period,
            room,
            course,
        })
    }

    /// Starting period.
    pub fn period(&self) -> &ClassPeriod {
        &self.period
    }

    /// Assigned room.
    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Assigned course.
    pub fn course(&self) -> &Arc<Course> {
        &self.course
    }

    /// Block containing the whole run.
    pub fn block(&self) -> &Arc<TimeBlock> {
        self.period.block()
    }

    /// Index of the first occupied period.
    #[inline]
    pub fn start_index(&self) -> usize {
        self.period.index()
    }

    /// Index one past the last occupied period.
    #[inline]
    pub fn end_index(&self) -> usize {
        self.period.index() + self.course.period_length
    }

    /// Occupied period indices, half-open.
    pub fn period_range(&self) -> Range<usize> {
        self.start_index()..self.end_index()
    }

    /// Last occupied period.
    pub fn last_period(&self) -> ClassPeriod {
        ClassPeriod::new_unchecked(Arc::clone(self.block()), self.end_index() - 1)
    }

    /// Every occupied period, in order.
    pub fn present_periods(&self) -> impl Iterator<Item = ClassPeriod> + '_ {
        self.period_range()
            .map(|index| ClassPeriod::new_unchecked(Arc::clone(self.block()), index))
    }

    /// One present assignment per occupied period.
    pub fn present_assignments(&self) -> impl Iterator<Item = PresentAssignment> + '_ {
        self.present_periods().map(|period| PresentAssignment {
            period,
            room: Arc::clone(&self.room),
            course: Arc::clone(&self.course),
        })
    }

    /// Whether the run occupies `period`.
    pub fn covers(&self, period: &ClassPeriod) -> bool {
        period.block() == self.block() && self.period_range().contains(&period.index())
    }

    /// Whether two runs share a period. Runs in different blocks never
    /// overlap, whatever their indices. Rooms are not compared.
    pub fn overlaps(&self, other: &StartAssignment) -> bool {
        self.block() == other.block()
            && self.start_index() < other.end_index()
            && other.start_index() < self.end_index()
    }

    /// Whether two runs share a room and a period.
    pub fn conflicts_with(&self, other: &StartAssignment) -> bool {
        self.room == other.room && self.overlaps(other)
    }
}

impl fmt::Display for StartAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} from {} ({})",
            self.course,
            self.room,
            self.period,
            self.block()
        )
    }
}

/// A course occupying a room during one specific period.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresentAssignment {
    period: ClassPeriod,
    room: Arc<Room>,
    course: Arc<Course>,
}

impl PresentAssignment {
    /// Occupied period.
    pub fn period(&self) -> &ClassPeriod {
        &self.period
    }

    /// Occupied room.
    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Course being taught.
    pub fn course(&self) -> &Arc<Course> {
        &self.course
    }
}

impl fmt::Display for PresentAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} at {}", self.course, self.room, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_program, start};

    #[test]
    fn test_present_expansion() {
        let program = sample_program();
        let origami = start(&program, "10AM", "Harper142", "OrigamiCourse");

        let presents: Vec<PresentAssignment> = origami.present_assignments().collect();
        assert_eq!(presents.len(), 2);
        assert_eq!(presents[0].period().id(), "10AM");
        assert_eq!(presents[1].period().id(), "11AM");
        assert!(presents.iter().all(|p| p.room().id == "Harper142"));
        assert_eq!(origami.last_period().id(), "11AM");
        assert_eq!(origami.period_range(), 1..3);
    }

    #[test]
    fn test_run_must_fit_block() {
        let program = sample_program();
        let history = program.course("HistoryCourse").unwrap();
        let room = program.room("Harper142").unwrap();

        // Three periods from 11AM would spill into the afternoon.
        let err = StartAssignment::new(
            program.period("11AM").unwrap().clone(),
            Arc::clone(room),
            Arc::clone(history),
        )
        .unwrap_err();
        match err {
            ScheduleError::PeriodOutOfBlock {
                length, available, ..
            } => {
                assert_eq!(length, 3);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(StartAssignment::new(
            program.period("10AM").unwrap().clone(),
            Arc::clone(room),
            Arc::clone(history),
        )
        .is_ok());
    }

    #[test]
    fn test_empty_run_rejected() {
        let program = sample_program();
        let mut hollow = (**program.course("MathCourse").unwrap()).clone();
        hollow.period_length = 0;
        let err = StartAssignment::new(
            program.period("9AM").unwrap().clone(),
            Arc::clone(program.room("Harper142").unwrap()),
            Arc::new(hollow),
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::EmptyRun { .. }));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let program = sample_program();
        let origami = start(&program, "10AM", "Harper142", "OrigamiCourse");
        let math = start(&program, "11AM", "Harper142", "MathCourse");
        let chem = start(&program, "12PM", "Harper142", "ChemistryCourse");

        assert!(origami.overlaps(&math));
        assert!(math.overlaps(&origami));
        assert!(!origami.overlaps(&chem));
        assert!(!chem.overlaps(&origami));
    }

    #[test]
    fn test_different_blocks_never_overlap() {
        let program = sample_program();
        // Both start at index 0 of their block.
        let morning = start(&program, "9AM", "Harper142", "MathCourse");
        let afternoon = start(&program, "1PM", "Harper142", "ChemistryCourse");
        assert_eq!(morning.start_index(), afternoon.start_index());
        assert!(!morning.overlaps(&afternoon));
    }

    #[test]
    fn test_conflict_requires_same_room() {
        let program = sample_program();
        let origami = start(&program, "10AM", "Harper142", "OrigamiCourse");
        let math_here = start(&program, "11AM", "Harper142", "MathCourse");
        let math_there = start(&program, "11AM", "Cobb110", "MathCourse");
        assert!(origami.conflicts_with(&math_here));
        assert!(!origami.conflicts_with(&math_there));
        assert!(origami.overlaps(&math_there));
    }

    #[test]
    fn test_covers() {
        let program = sample_program();
        let origami = start(&program, "10AM", "Harper142", "OrigamiCourse");
        assert!(origami.covers(program.period("11AM").unwrap()));
        assert!(!origami.covers(program.period("9AM").unwrap()));
        assert!(!origami.covers(program.period("2PM").unwrap()));
    }

    #[test]
    fn test_display() {
        let program = sample_program();
        let origami = start(&program, "10AM", "Harper142", "OrigamiCourse");
        assert_eq!(
            origami.to_string(),
            "OrigamiCourse in Harper142 from 10AM (Morning)"
        );
        let first = origami.present_assignments().next().unwrap();
        assert_eq!(first.to_string(), "OrigamiCourse in Harper142 at 10AM");
    }
}
