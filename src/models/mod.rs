//! Reference graph models.
//!
//! Provides the read-only description of one scheduling program:
//! time blocks made of ordered periods, rooms, teachers and courses,
//! plus the compatibility relations between them.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | Conference | Clinic |
//! |-------------|--------|------------|--------|
//! | Course | Class section | Talk | Appointment series |
//! | Room | Classroom | Hall | Exam room |
//! | Teacher | Instructor | Speaker | Practitioner |
//! | TimeBlock | Half day | Track slot | Shift |

mod course;
mod period;
mod program;
mod room;
mod teacher;

pub use course::Course;
pub use period::{ClassPeriod, TimeBlock};
pub use program::{Program, ProgramBuilder, ProgramId};
pub use room::Room;
pub use teacher::Teacher;
