//! Input validation for reference graphs.
//!
//! Checks structural integrity of time blocks, rooms, teachers and
//! courses before they are frozen into a [`Program`](crate::models::Program).
//! Detects:
//! - Duplicate IDs (per entity kind; period IDs across all blocks)
//! - Empty time blocks
//! - Rooms without seats
//! - Courses without teachers, or with a zero or oversized period length
//! - References to unknown teachers or periods

use crate::models::{Course, Room, Teacher, TimeBlock};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A time block has no periods.
    EmptyTimeBlock,
    /// A room has zero capacity.
    InvalidCapacity,
    /// A course lists no teachers.
    NoTeachers,
    /// A course occupies zero periods, or more than any block holds.
    InvalidPeriodLength,
    /// A course references a teacher that doesn't exist.
    InvalidTeacherReference,
    /// An availability set references a period that doesn't exist.
    InvalidPeriodReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a reference graph.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_program(
    time_blocks: &[TimeBlock],
    rooms: &[Room],
    teachers: &[Teacher],
    courses: &[Course],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut block_ids = HashSet::new();
    let mut period_ids = HashSet::new();
    let mut longest_block = 0;
    for block in time_blocks {
        if !block_ids.insert(block.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate time block ID: {}", block.id),
            ));
        }
        if block.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyTimeBlock,
                format!("Time block '{}' has no periods", block.id),
            ));
        }
        longest_block = longest_block.max(block.len());
        for period in &block.periods {
            if !period_ids.insert(period.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate period ID: {period}"),
                ));
            }
        }
    }

    let mut room_ids = HashSet::new();
    for room in rooms {
        if !room_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Room '{}' has no capacity", room.id),
            ));
        }
        check_periods("Room", &room.id, &room.available_periods, &period_ids, &mut errors);
    }

    let mut teacher_ids = HashSet::new();
    for teacher in teachers {
        if !teacher_ids.insert(teacher.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", teacher.id),
            ));
        }
        check_periods(
            "Teacher",
            &teacher.id,
            &teacher.available_periods,
            &period_ids,
            &mut errors,
        );
    }

    let mut course_ids = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }

        if course.teachers.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoTeachers,
                format!("Course '{}' has no teachers", course.id),
            ));
        }
        for teacher in &course.teachers {
            if !teacher_ids.contains(teacher.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTeacherReference,
                    format!(
                        "Course '{}' references unknown teacher '{}'",
                        course.id, teacher
                    ),
                ));
            }
        }

        if course.period_length == 0 || course.period_length > longest_block {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriodLength,
                format!(
                    "Course '{}' needs {} periods but the longest block has {}",
                    course.id, course.period_length, longest_block
                ),
            ));
        }
        check_periods(
            "Course",
            &course.id,
            &course.available_periods,
            &period_ids,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_periods(
    kind: &str,
    id: &str,
    available: &Option<BTreeSet<String>>,
    period_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    let Some(available) = available else {
        return;
    };
    for period in available {
        if !period_ids.contains(period.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriodReference,
                format!("{kind} '{id}' references unknown period '{period}'"),
            ));
        }
    }
}
