//! The program: a frozen reference graph.
//!
//! A [`Program`] owns every teacher, course, room and time block of one
//! scheduling run, together with the compatibility relations derived from
//! them (which periods a course or room may use, which teachers teach
//! which courses). It is read-only once built and is shared by reference
//! across every schedule explored for it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use super::{ClassPeriod, Course, Room, Teacher, TimeBlock};
use crate::assignment::StartAssignment;
use crate::error::ScheduleError;
use crate::validation::validate_program;

static NO_PERIODS: BTreeSet<ClassPeriod> = BTreeSet::new();

/// Identity of a program. Entities from different programs never compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(String);

impl ProgramId {
    /// Creates a program identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated, read-only reference graph.
///
/// Built with [`ProgramBuilder`].
#[derive(Debug)]
pub struct Program {
    id: ProgramId,
    time_blocks: Vec<Arc<TimeBlock>>,
    period_list: Vec<ClassPeriod>,
    periods: HashMap<String, ClassPeriod>,
    rooms: HashMap<String, Arc<Room>>,
    teachers: HashMap<String, Arc<Teacher>>,
    courses: HashMap<String, Arc<Course>>,
    course_periods: HashMap<String, BTreeSet<ClassPeriod>>,
    room_periods: HashMap<String, BTreeSet<ClassPeriod>>,
    teacher_courses: HashMap<String, Vec<Arc<Course>>>,
}

impl Program {
    /// Program identity.
    pub fn id(&self) -> &ProgramId {
        &self.id
    }

    /// Time blocks in declaration order.
    pub fn time_blocks(&self) -> &[Arc<TimeBlock>] {
        &self.time_blocks
    }

    /// Looks up a time block by ID.
    pub fn time_block(&self, id: &str) -> Option<&Arc<TimeBlock>> {
        self.time_blocks.iter().find(|b| b.id == id)
    }

    /// Every period, block by block, in chronological order within a block.
    pub fn periods(&self) -> &[ClassPeriod] {
        &self.period_list
    }

    /// Looks up a period by ID.
    pub fn period(&self, id: &str) -> Option<&ClassPeriod> {
        self.periods.get(id)
    }

    /// Looks up a room by ID.
    pub fn room(&self, id: &str) -> Option<&Arc<Room>> {
        self.rooms.get(id)
    }

    /// All rooms (arbitrary order).
    pub fn rooms(&self) -> impl Iterator<Item = &Arc<Room>> + '_ {
        self.rooms.values()
    }

    /// Looks up a teacher by ID.
    pub fn teacher(&self, id: &str) -> Option<&Arc<Teacher>> {
        self.teachers.get(id)
    }

    /// All teachers (arbitrary order).
    pub fn teachers(&self) -> impl Iterator<Item = &Arc<Teacher>> + '_ {
        self.teachers.values()
    }

    /// Looks up a course by ID.
    pub fn course(&self, id: &str) -> Option<&Arc<Course>> {
        self.courses.get(id)
    }

    /// All courses (arbitrary order).
    pub fn courses(&self) -> impl Iterator<Item = &Arc<Course>> + '_ {
        self.courses.values()
    }

    /// Periods during which the course and all of its teachers are available.
    ///
    /// Empty for courses from another program.
    pub fn compatible_periods_for_course(&self, course: &Course) -> &BTreeSet<ClassPeriod> {
        if course.program != self.id {
            return &NO_PERIODS;
        }
        self.course_periods.get(&course.id).unwrap_or(&NO_PERIODS)
    }

    /// Periods during which the room is available.
    ///
    /// Empty for rooms from another program.
    pub fn compatible_periods_for_room(&self, room: &Room) -> &BTreeSet<ClassPeriod> {
        if room.program != self.id {
            return &NO_PERIODS;
        }
        self.room_periods.get(&room.id).unwrap_or(&NO_PERIODS)
    }

    /// Blocks containing at least one compatible period for the course.
    pub fn compatible_time_blocks_for_course(&self, course: &Course) -> BTreeSet<Arc<TimeBlock>> {
        blocks_of(self.compatible_periods_for_course(course))
    }

    /// Blocks containing at least one period during which the room is available.
    pub fn compatible_time_blocks_for_room(&self, room: &Room) -> BTreeSet<Arc<TimeBlock>> {
        blocks_of(self.compatible_periods_for_room(room))
    }

    /// Teachers of a course.
    pub fn teachers_for_course<'a>(
        &'a self,
        course: &'a Course,
    ) -> impl Iterator<Item = &'a Arc<Teacher>> + 'a {
        let same_program = course.program == self.id;
        course
            .teachers
            .iter()
            .filter(move |_| same_program)
            .filter_map(|id| self.teachers.get(id))
    }

    /// Courses taught by a teacher.
    pub fn courses_for_teacher(&self, teacher: &Teacher) -> &[Arc<Course>] {
        if teacher.program != self.id {
            return &[];
        }
        self.teacher_courses
            .get(&teacher.id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `teacher` teaches `course`.
    pub fn teaches(&self, teacher: &Teacher, course: &Course) -> bool {
        teacher.program == self.id && course.program == self.id && course.is_taught_by(&teacher.id)
    }

    /// Resolves IDs and builds a start assignment.
    ///
    /// # Errors
    /// [`ScheduleError::UnknownEntity`] for unresolvable IDs, or any
    /// precondition failure of [`StartAssignment::new`].
    pub fn start_assignment(
        &self,
        period_id: &str,
        room_id: &str,
        course_id: &str,
    ) -> Result<StartAssignment, ScheduleError> {
        let period = self
            .period(period_id)
            .ok_or_else(|| ScheduleError::unknown("period", period_id))?;
        let room = self
            .room(room_id)
            .ok_or_else(|| ScheduleError::unknown("room", room_id))?;
        let course = self
            .course(course_id)
            .ok_or_else(|| ScheduleError::unknown("course", course_id))?;
        StartAssignment::new(period.clone(), Arc::clone(room), Arc::clone(course))
    }
}

fn blocks_of(periods: &BTreeSet<ClassPeriod>) -> BTreeSet<Arc<TimeBlock>> {
    periods.iter().map(|p| Arc::clone(p.block())).collect()
}

/// Collects entities and freezes them into a [`Program`].
///
/// # Example
/// ```
/// use u_timetable::models::{Course, ProgramBuilder, Room, Teacher, TimeBlock};
///
/// let program = ProgramBuilder::new("spring")
///     .with_time_block(TimeBlock::new("Morning", ["10AM", "11AM"]))
///     .with_room(Room::new("Harper142", 30))
///     .with_teacher(Teacher::new("lowasser"))
///     .with_course(
///         Course::new("OrigamiCourse")
///             .with_class_size(12, 15)
///             .with_period_length(2)
///             .with_teacher("lowasser"),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(program.periods().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    id: ProgramId,
    time_blocks: Vec<TimeBlock>,
    rooms: Vec<Room>,
    teachers: Vec<Teacher>,
    courses: Vec<Course>,
}

impl ProgramBuilder {
    /// Starts an empty program.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ProgramId::new(id),
            time_blocks: Vec::new(),
            rooms: Vec::new(),
            teachers: Vec::new(),
            courses: Vec::new(),
        }
    }

    /// Adds a time block.
    pub fn with_time_block(mut self, block: TimeBlock) -> Self {
        self.time_blocks.push(block);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Validates the graph and freezes it.
    ///
    /// Every entity is stamped with this builder's program ID.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidProgram`] listing every structural problem.
    pub fn build(self) -> Result<Program, ScheduleError> {
        let ProgramBuilder {
            id,
            mut time_blocks,
            mut rooms,
            mut teachers,
            mut courses,
        } = self;

        time_blocks.iter_mut().for_each(|b| b.program = id.clone());
        rooms.iter_mut().for_each(|r| r.program = id.clone());
        teachers.iter_mut().for_each(|t| t.program = id.clone());
        courses.iter_mut().for_each(|c| c.program = id.clone());

        validate_program(&time_blocks, &rooms, &teachers, &courses)
            .map_err(ScheduleError::InvalidProgram)?;

        let time_blocks: Vec<Arc<TimeBlock>> = time_blocks.into_iter().map(Arc::new).collect();
        let period_list: Vec<ClassPeriod> = time_blocks
            .iter()
            .flat_map(|b| (0..b.len()).map(move |i| ClassPeriod::new_unchecked(Arc::clone(b), i)))
            .collect();
        let periods = period_list
            .iter()
            .map(|p| (p.id().to_string(), p.clone()))
            .collect();

        let teachers: HashMap<String, Arc<Teacher>> = teachers
            .into_iter()
            .map(|t| (t.id.clone(), Arc::new(t)))
            .collect();

        let room_periods = rooms
            .iter()
            .map(|r| {
                let available = period_list
                    .iter()
                    .filter(|p| r.is_available(p.id()))
                    .cloned()
                    .collect();
                (r.id.clone(), available)
            })
            .collect();

        let course_periods = courses
            .iter()
            .map(|c| {
                let available = period_list
                    .iter()
                    .filter(|p| {
                        c.is_available(p.id())
                            && c.teachers
                                .iter()
                                .filter_map(|t| teachers.get(t))
                                .all(|t| t.is_available(p.id()))
                    })
                    .cloned()
                    .collect();
                (c.id.clone(), available)
            })
            .collect();

        let courses: HashMap<String, Arc<Course>> = courses
            .into_iter()
            .map(|c| (c.id.clone(), Arc::new(c)))
            .collect();

        let mut teacher_courses: HashMap<String, Vec<Arc<Course>>> = HashMap::new();
        for course in courses.values() {
            for teacher_id in &course.teachers {
                teacher_courses
                    .entry(teacher_id.clone())
                    .or_default()
                    .push(Arc::clone(course));
            }
        }
        for list in teacher_courses.values_mut() {
            list.sort();
        }

        Ok(Program {
            id,
            time_blocks,
            period_list,
            periods,
            rooms: rooms
                .into_iter()
                .map(|r| (r.id.clone(), Arc::new(r)))
                .collect(),
            teachers,
            courses,
            course_periods,
            room_periods,
            teacher_courses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_program;

    #[test]
    fn test_entities_are_stamped() {
        let program = sample_program();
        let spring = ProgramId::new("spring");
        assert_eq!(program.id(), &spring);
        assert_eq!(program.course("MathCourse").unwrap().program, spring);
        assert_eq!(program.room("Harper142").unwrap().program, spring);
        assert_eq!(program.time_block("Morning").unwrap().program, spring);
    }

    #[test]
    fn test_period_lookup() {
        let program = sample_program();
        let eleven = program.period("11AM").unwrap();
        assert_eq!(eleven.block().id, "Morning");
        assert_eq!(eleven.index(), 2);
        assert!(program.period("midnight").is_none());
        assert_eq!(program.periods().len(), 7);
        assert_eq!(program.periods()[0].id(), "9AM");
    }

    #[test]
    fn test_course_periods_intersect_teacher_availability() {
        let program = sample_program();
        // bob is away at 1PM; HistoryCourse is taught by bob.
        let history = program.course("HistoryCourse").unwrap();
        let periods = program.compatible_periods_for_course(history);
        assert!(!periods.contains(program.period("1PM").unwrap()));
        assert!(periods.contains(program.period("2PM").unwrap()));
        assert_eq!(periods.len(), 6);
    }

    #[test]
    fn test_room_periods() {
        let program = sample_program();
        let closet = program.room("Closet").unwrap();
        let periods = program.compatible_periods_for_room(closet);
        assert_eq!(periods.len(), 4);
        assert!(periods.iter().all(|p| p.block().id == "Morning"));

        let blocks = program.compatible_time_blocks_for_room(closet);
        assert_eq!(blocks.len(), 1);
        let harper = program.room("Harper142").unwrap();
        assert_eq!(program.compatible_time_blocks_for_room(harper).len(), 2);
    }

    #[test]
    fn test_course_time_blocks() {
        let program = sample_program();
        let origami = program.course("OrigamiCourse").unwrap();
        let blocks = program.compatible_time_blocks_for_course(origami);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_teacher_course_relation() {
        let program = sample_program();
        let lowasser = program.teacher("lowasser").unwrap();
        let taught: Vec<&str> = program
            .courses_for_teacher(lowasser)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(taught, vec!["ChemistryCourse", "OrigamiCourse"]);

        let origami = program.course("OrigamiCourse").unwrap();
        let teachers: Vec<&str> = program
            .teachers_for_course(origami)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(teachers, vec!["lowasser"]);
        assert!(program.teaches(lowasser, origami));
        assert!(!program.teaches(lowasser, program.course("MathCourse").unwrap()));
    }

    #[test]
    fn test_foreign_entities_have_no_relations() {
        let program = sample_program();
        let mut stranger = (**program.course("MathCourse").unwrap()).clone();
        stranger.program = ProgramId::new("fall");
        assert!(program.compatible_periods_for_course(&stranger).is_empty());
        assert_eq!(program.teachers_for_course(&stranger).count(), 0);
    }

    #[test]
    fn test_start_assignment_resolution() {
        let program = sample_program();
        let start = program
            .start_assignment("10AM", "Harper142", "OrigamiCourse")
            .unwrap();
        assert_eq!(start.period().id(), "10AM");

        let err = program
            .start_assignment("10AM", "Nowhere", "OrigamiCourse")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownEntity { kind: "room", .. }));

        // Origami needs two periods; 12PM is the last of the morning.
        let err = program
            .start_assignment("12PM", "Harper142", "OrigamiCourse")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::PeriodOutOfBlock { .. }));
    }

    #[test]
    fn test_build_rejects_invalid_graph() {
        let err = ProgramBuilder::new("broken")
            .with_time_block(TimeBlock::new("Empty", Vec::<String>::new()))
            .with_course(Course::new("Orphan").with_class_size(1, 1))
            .build()
            .unwrap_err();
        match err {
            ScheduleError::InvalidProgram(errors) => assert!(errors.len() >= 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
