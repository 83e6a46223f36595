//! Constraint-checked school timetables.
//!
//! Places courses into (period, room) cells over a read-only reference
//! graph of time blocks, rooms, teachers and courses, and checks every
//! placement against a configurable chain of rules. Schedules are
//! persistent values: each mutation returns a new schedule and leaves the
//! old one intact, so a search layer can branch freely.
//!
//! # Modules
//!
//! - **`models`**: Reference graph: `TimeBlock`, `ClassPeriod`, `Room`,
//!   `Teacher`, `Course`, `Program`
//! - **`validation`**: Input integrity checks (duplicate IDs, empty blocks,
//!   dangling references)
//! - **`assignment`**: `StartAssignment` placements and their per-period
//!   `PresentAssignment` slices
//! - **`schedule`**: Persistent `Schedule` with incremental and forced
//!   mutation plus full re-verification
//! - **`logic`**: `ScheduleRule` trait, `ScheduleLogic` chain, built-in rules
//! - **`condition`**: Hierarchical `Condition` diagnostics
//! - **`config`**: Rule thresholds and toggles, loadable from TOML
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_timetable::config::LogicConfig;
//! use u_timetable::models::{Course, ProgramBuilder, Room, Teacher, TimeBlock};
//! use u_timetable::schedule::ScheduleFactory;
//!
//! let program = ProgramBuilder::new("spring")
//!     .with_time_block(TimeBlock::new("Morning", ["10AM", "11AM", "12PM"]))
//!     .with_room(Room::new("Harper142", 30))
//!     .with_teacher(Teacher::new("lowasser"))
//!     .with_teacher(Teacher::new("alice"))
//!     .with_course(
//!         Course::new("OrigamiCourse")
//!             .with_class_size(20, 25)
//!             .with_period_length(2)
//!             .with_teacher("lowasser"),
//!     )
//!     .with_course(Course::new("MathCourse").with_class_size(20, 25).with_teacher("alice"))
//!     .build()
//!     .unwrap();
//! let program = Arc::new(program);
//!
//! let config = LogicConfig::default();
//! let factory = ScheduleFactory::from_config(Arc::clone(&program), &config).unwrap();
//! let origami = program.start_assignment("10AM", "Harper142", "OrigamiCourse").unwrap();
//! let state = factory.create().assign_start(origami);
//! assert!(state.condition().is_valid());
//!
//! // Math at 11AM would share Harper142 with Origami.
//! let math = program.start_assignment("11AM", "Harper142", "MathCourse").unwrap();
//! let rejected = state.new_state().assign_start(math);
//! assert!(!rejected.condition().is_valid());
//! assert_eq!(rejected.new_state().len(), 1);
//! ```

pub mod assignment;
pub mod condition;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod schedule;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use assignment::{PresentAssignment, StartAssignment};
pub use condition::{Condition, Failure};
pub use config::{ConfigError, LogicConfig};
pub use error::ScheduleError;
pub use logic::{ScheduleLogic, ScheduleRule};
pub use schedule::{ModifiedState, Schedule, ScheduleFactory};
