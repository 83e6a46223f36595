//! Built-in schedule rules.
//!
//! # Scopes
//!
//! - **local**: program identity, period availability, class-size ratios
//! - **roomconflicts**: one class per room at a time
//! - **teacherconflicts**: one course per teacher per block
//! - **duplicatecourses**: each course placed once
//!
//! Pairwise rules only look at the schedule the proposal is checked
//! against, never at the proposal itself, so a conflicting pair is
//! reported by whichever member arrives second. Teacher conflicts are a
//! property of a whole block, so in batch mode they are grouped per
//! teacher and block instead.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::ScheduleRule;
use crate::assignment::{PresentAssignment, StartAssignment};
use crate::condition::{Condition, Failure};
use crate::config::LogicConfig;
use crate::models::{Program, TimeBlock};
use crate::schedule::Schedule;

// ======================== Local rules ========================

/// Checks a placement against the reference graph alone.
///
/// Ratios are `estimated_class_size / capacity` and
/// `max_class_size / capacity`. A zero-capacity room yields an infinite or
/// undefined ratio and always fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalConflictRule {
    /// Lower bound of the estimated-size ratio, inclusive.
    pub min_estimated_ratio: f64,
    /// Upper bound of the estimated-size ratio, inclusive.
    pub max_estimated_ratio: f64,
    /// Ceiling of the max-size ratio, inclusive.
    pub max_cap_ratio: f64,
}

impl LocalConflictRule {
    /// Creates the rule with explicit thresholds.
    pub fn new(min_estimated_ratio: f64, max_estimated_ratio: f64, max_cap_ratio: f64) -> Self {
        Self {
            min_estimated_ratio,
            max_estimated_ratio,
            max_cap_ratio,
        }
    }

    /// Takes the thresholds from `config`.
    pub fn from_config(config: &LogicConfig) -> Self {
        Self::new(
            config.min_estimated_class_size_ratio,
            config.max_estimated_class_size_ratio,
            config.max_class_cap_ratio,
        )
    }
}

impl Default for LocalConflictRule {
    fn default() -> Self {
        Self::from_config(&LogicConfig::default())
    }
}

impl ScheduleRule for LocalConflictRule {
    fn name(&self) -> &'static str {
        "local"
    }

    fn check_local(&self, program: &Program, assignment: &PresentAssignment, cond: &mut Condition) {
        let period = assignment.period();
        let course = assignment.course();
        let room = assignment.room();

        cond.verify(
            program.compatible_periods_for_course(course).contains(period),
            || {
                Failure::new(format!(
                    "Course {course} or one of its teachers is not available at {period}"
                ))
                .with_subject(course)
                .with_subject(period)
            },
        );
        cond.verify(
            program.compatible_periods_for_room(room).contains(period),
            || {
                Failure::new(format!("Room {room} is not available at {period}"))
                    .with_subject(room)
                    .with_subject(period)
            },
        );
    }

    fn check_start(&self, program: &Program, assignment: &StartAssignment, cond: &mut Condition) {
        let block = assignment.block();
        let course = assignment.course();
        let room = assignment.room();

        cond.verify(&block.program == program.id(), || {
            Failure::new(format!(
                "Block {block} belongs to program {}, not {}",
                block.program,
                program.id()
            ))
            .with_subject(block)
        });
        cond.verify(course.program == block.program, || {
            Failure::new(format!(
                "Course {course} belongs to program {}, block {block} to {}",
                course.program, block.program
            ))
            .with_subject(course)
            .with_subject(block)
        });
        cond.verify(room.program == block.program, || {
            Failure::new(format!(
                "Room {room} belongs to program {}, block {block} to {}",
                room.program, block.program
            ))
            .with_subject(room)
            .with_subject(block)
        });

        let capacity = f64::from(room.capacity);
        let estimated = f64::from(course.estimated_class_size) / capacity;
        cond.verify(
            estimated >= self.min_estimated_ratio && estimated <= self.max_estimated_ratio,
            || {
                Failure::new(format!(
                    "Estimated size ratio {estimated:.2} of {course} in {room} is outside [{}, {}]",
                    self.min_estimated_ratio, self.max_estimated_ratio
                ))
                .with_subject(course)
                .with_subject(room)
            },
        );
        let cap = f64::from(course.max_class_size) / capacity;
        cond.verify(cap <= self.max_cap_ratio, || {
            Failure::new(format!(
                "Max size ratio {cap:.2} of {course} in {room} exceeds {}",
                self.max_cap_ratio
            ))
            .with_subject(course)
            .with_subject(room)
        });
    }
}

// ======================== Global rules ========================

/// No two classes share a room at the same time.
///
/// In a table without room overlaps, the only earlier start that can
/// reach the proposal is the latest one before its first period; later
/// starts can only collide by starting inside the proposal's run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomConflictRule;

impl RoomConflictRule {
    fn conflicts<'a>(
        schedule: &'a Schedule,
        proposal: &StartAssignment,
    ) -> Vec<&'a StartAssignment> {
        let room = proposal.room();
        let earlier = schedule
            .starting_before(room, proposal.period())
            .filter(|start| start.overlaps(proposal));
        earlier
            .into_iter()
            .chain(
                proposal
                    .present_periods()
                    .filter_map(|period| schedule.starting_at(&period, room)),
            )
            .collect()
    }
}

impl ScheduleRule for RoomConflictRule {
    fn name(&self) -> &'static str {
        "roomconflicts"
    }

    fn check_global(
        &self,
        schedule: &Schedule,
        assignment: &StartAssignment,
        cond: &mut Condition,
    ) {
        let conflicts = Self::conflicts(schedule, assignment);
        cond.verify(conflicts.is_empty(), || {
            conflicts.iter().fold(
                Failure::new("classes may not use the same room at the same time")
                    .with_subject(assignment),
                |failure, other| failure.with_subject(other),
            )
        });
    }
}

/// A teacher teaches at most one course per time block.
///
/// Incrementally, one failure per teacher of the proposed course who
/// already teaches another course in the block. In batch mode, one
/// failure per teacher and block naming every course involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherConflictRule;

impl TeacherConflictRule {
    fn failure(teacher: &str, block: &TimeBlock, courses: &BTreeSet<&str>) -> Failure {
        let listed = courses.iter().copied().collect::<Vec<_>>().join(", ");
        courses.iter().fold(
            Failure::new(format!(
                "Teacher {teacher} has conflicts between {} classes in block {block}: {listed}",
                courses.len()
            ))
            .with_subject(teacher),
            |failure, course| failure.with_subject(course),
        )
    }
}

impl ScheduleRule for TeacherConflictRule {
    fn name(&self) -> &'static str {
        "teacherconflicts"
    }

    fn check_global(
        &self,
        schedule: &Schedule,
        assignment: &StartAssignment,
        cond: &mut Condition,
    ) {
        let program = schedule.program();
        let course = assignment.course();
        let block = assignment.block();

        for teacher in program.teachers_for_course(course) {
            let mut courses: BTreeSet<&str> = schedule
                .starts_in_block(block)
                .map(|start| start.course())
                .filter(|other| *other != course && program.teaches(teacher, other))
                .map(|other| other.id.as_str())
                .collect();
            let clear = courses.is_empty();
            courses.insert(course.id.as_str());
            cond.verify(clear, || Self::failure(&teacher.id, block, &courses));
        }
    }

    fn check_schedule(&self, schedule: &Schedule, cond: &mut Condition) {
        let program = schedule.program();
        for block in schedule.time_blocks() {
            let mut by_teacher: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
            for start in schedule.starts_in_block(block) {
                let course = start.course();
                for teacher in program.teachers_for_course(course) {
                    by_teacher
                        .entry(teacher.id.as_str())
                        .or_default()
                        .insert(course.id.as_str());
                }
            }
            for (teacher, courses) in &by_teacher {
                cond.verify(courses.len() < 2, || Self::failure(teacher, block, courses));
            }
        }
    }
}

/// Each course is placed at most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateCourseRule;

impl ScheduleRule for DuplicateCourseRule {
    fn name(&self) -> &'static str {
        "duplicatecourses"
    }

    fn check_global(
        &self,
        schedule: &Schedule,
        assignment: &StartAssignment,
        cond: &mut Condition,
    ) {
        let previous = schedule.find_course(assignment.course());
        cond.verify(previous.is_none(), || {
            let previous = previous.map(ToString::to_string).unwrap_or_default();
            Failure::new(format!(
                "Course {} is scheduled twice: {assignment} and {previous}",
                assignment.course()
            ))
            .with_subject(assignment)
            .with_subject(previous)
        });
    }
}

/// The built-in rules enabled by `config`, in chain order: local, room
/// conflicts, teacher conflicts, duplicate courses.
pub fn builtin(config: &LogicConfig) -> Vec<Arc<dyn ScheduleRule>> {
    let mut rules: Vec<Arc<dyn ScheduleRule>> = Vec::new();
    if config.local_schedule_check {
        rules.push(Arc::new(LocalConflictRule::from_config(config)));
    }
    if config.room_conflict_check {
        rules.push(Arc::new(RoomConflictRule));
    }
    if config.teacher_conflict_check {
        rules.push(Arc::new(TeacherConflictRule));
    }
    if config.doubly_scheduled_courses_check {
        rules.push(Arc::new(DuplicateCourseRule));
    }
    rules
}
