//! Teacher model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::ProgramId;

/// A teacher. Which courses a teacher teaches is owned by the
/// [`Program`](super::Program), through each course's teacher list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Owning program. Stamped by [`ProgramBuilder`](super::ProgramBuilder).
    #[serde(default)]
    pub program: ProgramId,
    /// Period identifiers during which the teacher is available.
    /// `None` = always available.
    #[serde(default)]
    pub available_periods: Option<BTreeSet<String>>,
}

impl Teacher {
    /// Creates a teacher available at all times.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            program: ProgramId::default(),
            available_periods: None,
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restricts availability to the given periods.
    pub fn with_available_periods<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_periods = Some(periods.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the teacher can teach during a period.
    pub fn is_available(&self, period_id: &str) -> bool {
        match &self.available_periods {
            None => true,
            Some(periods) => periods.contains(period_id),
        }
    }
}

impl PartialEq for Teacher {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program && self.id == other.id
    }
}

impl Eq for Teacher {}

impl Hash for Teacher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.program.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_availability() {
        let t = Teacher::new("lowasser").with_available_periods(["10AM"]);
        assert!(t.is_available("10AM"));
        assert!(!t.is_available("11AM"));
        assert!(Teacher::new("alice").is_available("11AM"));
    }
}
