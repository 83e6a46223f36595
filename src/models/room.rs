//! Room model.
//!
//! Rooms host class sections. Each room has a seating capacity and an
//! optional set of periods during which it may be used.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::ProgramId;

/// A room that courses can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Owning program. Stamped by [`ProgramBuilder`](super::ProgramBuilder).
    #[serde(default)]
    pub program: ProgramId,
    /// Number of seats.
    pub capacity: u32,
    /// Period identifiers during which the room is available.
    /// `None` = available during every period of the program.
    #[serde(default)]
    pub available_periods: Option<BTreeSet<String>>,
}

impl Room {
    /// Creates a room with the given capacity, available at all times.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            program: ProgramId::default(),
            capacity,
            available_periods: None,
        }
    }

    /// Sets the room name.
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

    /// Whether the room can be used during a period.
    pub fn is_available(&self, period_id: &str) -> bool {
        match &self.available_periods {
            None => true,
            Some(periods) => periods.contains(period_id),
        }
    }
}

impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program && self.id == other.id
    }
}

impl Eq for Room {}

impl Hash for Room {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.program.hash(state);
        self.id.hash(state);
    }
}

impl PartialOrd for Room {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Room {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.program, &self.id).cmp(&(&other.program, &other.id))
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
