//! Schedule rules and the rule chain.
//!
//! Each rule is a value implementing [`ScheduleRule`]; a [`ScheduleLogic`]
//! is an ordered list of rules assembled at runtime, by hand or from a
//! [`LogicConfig`](crate::config::LogicConfig). Every rule runs on every
//! call and records its outcomes in its own diagnostic scope.
//!
//! # Usage
//!
//! ```
//! use u_timetable::logic::{rules, ScheduleLogic};
//!
//! let logic = ScheduleLogic::new()
//!     .with_rule(rules::RoomConflictRule)
//!     .with_rule(rules::DuplicateCourseRule);
//!
//! assert_eq!(logic.rule_names(), vec!["roomconflicts", "duplicatecourses"]);
//! ```

mod chain;
pub mod rules;

pub use chain::ScheduleLogic;

use crate::assignment::{PresentAssignment, StartAssignment};
use crate::condition::Condition;
use crate::models::Program;
use crate::schedule::Schedule;
use std::fmt::Debug;

/// A pluggable constraint.
///
/// Local checks depend only on the assignment and the reference graph.
/// They come in two granularities: [`check_local`](Self::check_local) runs
/// once per occupied period, [`check_start`](Self::check_start) once per
/// placement. [`check_global`](Self::check_global) compares the placement
/// against a schedule that does not contain it.
/// [`check_schedule`](Self::check_schedule) checks a whole table at once.
///
/// All methods except `check_schedule` default to recording nothing.
pub trait ScheduleRule: Send + Sync + Debug {
    /// Rule name, used as the diagnostic scope (e.g. `"roomconflicts"`).
    fn name(&self) -> &'static str;

    /// Checks one period-slice of a placement.
    fn check_local(
        &self,
        _program: &Program,
        _assignment: &PresentAssignment,
        _cond: &mut Condition,
    ) {
    }

    /// Checks a whole placement without looking at other placements.
    fn check_start(
        &self,
        _program: &Program,
        _assignment: &StartAssignment,
        _cond: &mut Condition,
    ) {
    }

    /// Checks a placement against the placements already in `schedule`.
    fn check_global(
        &self,
        _schedule: &Schedule,
        _assignment: &StartAssignment,
        _cond: &mut Condition,
    ) {
    }

    /// Checks every placement of `schedule`.
    ///
    /// The default replays the table in canonical order onto an empty
    /// schedule and runs the per-placement checks on each start against
    /// the replay prefix. Rules whose violations are properties of a group
    /// rather than of a pair override this to report each group once.
    fn check_schedule(&self, schedule: &Schedule, cond: &mut Condition) {
        let program = schedule.program();
        let mut replay = schedule.cleared();
        for start in schedule.start_assignments() {
            for present in start.present_assignments() {
                self.check_local(program, &present, cond);
            }
            self.check_start(program, start, cond);
            self.check_global(&replay, start, cond);
            replay = replay.with_start(start.clone());
        }
    }
}
