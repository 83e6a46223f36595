//! Course (section) model.
//!
//! A course is one class section to be placed in the timetable. It runs
//! for `period_length` consecutive periods of a single time block and is
//! taught by one or more teachers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::ProgramId;

/// A course section to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub name: String,
    /// Owning program. Stamped by [`ProgramBuilder`](super::ProgramBuilder).
    #[serde(default)]
    pub program: ProgramId,
    /// Expected enrollment.
    pub estimated_class_size: u32,
    /// Enrollment cap.
    pub max_class_size: u32,
    /// Number of consecutive periods the course occupies (default: 1).
    #[serde(default = "default_period_length")]
    pub period_length: usize,
    /// Identifiers of the teachers of this course.
    pub teachers: Vec<String>,
    /// Periods the course itself is restricted to, on top of its
    /// teachers' availability. `None` = no extra restriction.
    #[serde(default)]
    pub available_periods: Option<BTreeSet<String>>,
}

fn default_period_length() -> usize {
    1
}

impl Course {
    /// Creates a one-period course with no teachers yet.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            program: ProgramId::default(),
            estimated_class_size: 0,
            max_class_size: 0,
            period_length: 1,
            teachers: Vec::new(),
            available_periods: None,
        }
    }

    /// Sets the course title.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets expected enrollment and enrollment cap.
    pub fn with_class_size(mut self, estimated: u32, max: u32) -> Self {
        self.estimated_class_size = estimated;
        self.max_class_size = max;
        self
    }

    /// Sets the number of consecutive periods.
    pub fn with_period_length(mut self, periods: usize) -> Self {
        self.period_length = periods;
        self
    }

    /// Adds a teacher by ID.
    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teachers.push(teacher_id.into());
        self
    }

    /// Restricts the course to the given periods.
    pub fn with_available_periods<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_periods = Some(periods.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the course's own restriction admits a period.
    /// Teacher availability is applied by the [`Program`](super::Program).
    pub fn is_available(&self, period_id: &str) -> bool {
        match &self.available_periods {
            None => true,
            Some(periods) => periods.contains(period_id),
        }
    }

    /// Whether the given teacher is listed for this course.
    pub fn is_taught_by(&self, teacher_id: &str) -> bool {
        self.teachers.iter().any(|t| t == teacher_id)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program && self.id == other.id
    }
}

impl Eq for Course {}

impl Hash for Course {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.program.hash(state);
        self.id.hash(state);
    }
}

impl PartialOrd for Course {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Course {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.program, &self.id).cmp(&(&other.program, &other.id))
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
