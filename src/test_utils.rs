//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::assignment::StartAssignment;
use crate::config::LogicConfig;
use crate::models::{Course, Program, ProgramBuilder, Room, Teacher, TimeBlock};
use crate::schedule::ScheduleFactory;

/// A small program.
///
/// - Morning: 9AM, 10AM, 11AM, 12PM. Afternoon: 1PM, 2PM, 3PM.
/// - Harper142 and Cobb110 seat 30; Closet seats 5 and only opens in the morning.
/// - lowasser teaches Origami (2 periods) and Chemistry; alice teaches Math;
///   bob teaches History (3 periods) and is away at 1PM.
pub(crate) fn sample_program() -> Arc<Program> {
    let program = ProgramBuilder::new("spring")
        .with_time_block(TimeBlock::new("Morning", ["9AM", "10AM", "11AM", "12PM"]))
        .with_time_block(TimeBlock::new("Afternoon", ["1PM", "2PM", "3PM"]))
        .with_room(Room::new("Harper142", 30))
        .with_room(Room::new("Cobb110", 30))
        .with_room(Room::new("Closet", 5).with_available_periods(["9AM", "10AM", "11AM", "12PM"]))
        .with_teacher(Teacher::new("lowasser"))
        .with_teacher(Teacher::new("alice"))
        .with_teacher(Teacher::new("bob").with_available_periods([
            "9AM", "10AM", "11AM", "12PM", "2PM", "3PM",
        ]))
        .with_course(
            Course::new("OrigamiCourse")
                .with_class_size(20, 25)
                .with_period_length(2)
                .with_teacher("lowasser"),
        )
        .with_course(
            Course::new("ChemistryCourse")
                .with_class_size(20, 25)
                .with_teacher("lowasser"),
        )
        .with_course(
            Course::new("MathCourse")
                .with_class_size(20, 25)
                .with_teacher("alice"),
        )
        .with_course(
            Course::new("HistoryCourse")
                .with_class_size(15, 30)
                .with_period_length(3)
                .with_teacher("bob"),
        )
        .build()
        .expect("sample program is valid");
    Arc::new(program)
}

/// A program where alice teaches three courses and shares Seminar with bob.
///
/// - Morning: 9AM, 10AM, 11AM. Afternoon: 1PM, 2PM.
/// - Harper142, Cobb110 and Baker201 seat 30.
/// - alice: Algebra, Geometry (2 periods), Seminar. bob: Poetry, Seminar.
pub(crate) fn crowded_program() -> Arc<Program> {
    let course = |id: &str| Course::new(id).with_class_size(20, 25);
    let program = ProgramBuilder::new("summer")
        .with_time_block(TimeBlock::new("Morning", ["9AM", "10AM", "11AM"]))
        .with_time_block(TimeBlock::new("Afternoon", ["1PM", "2PM"]))
        .with_room(Room::new("Harper142", 30))
        .with_room(Room::new("Cobb110", 30))
        .with_room(Room::new("Baker201", 30))
        .with_teacher(Teacher::new("alice"))
        .with_teacher(Teacher::new("bob"))
        .with_course(course("Seminar").with_teacher("alice").with_teacher("bob"))
        .with_course(course("Algebra").with_teacher("alice"))
        .with_course(course("Geometry").with_period_length(2).with_teacher("alice"))
        .with_course(course("Poetry").with_teacher("bob"))
        .build()
        .expect("crowded program is valid");
    Arc::new(program)
}

/// Factory over [`sample_program`] with the default rule chain.
pub(crate) fn sample_factory() -> ScheduleFactory {
    ScheduleFactory::from_config(sample_program(), &LogicConfig::default())
        .expect("default config is valid")
}

/// Resolves a start assignment by IDs, panicking on bad input.
pub(crate) fn start(program: &Program, period: &str, room: &str, course: &str) -> StartAssignment {
    program
        .start_assignment(period, room, course)
        .expect("fixture assignment is well formed")
}
