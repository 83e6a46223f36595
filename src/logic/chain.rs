//! Ordered rule chain.
//!
//! Runs every rule against a proposal (incremental mode) or against a
//! whole table (batch mode). In batch mode each rule checks the table
//! through [`ScheduleRule::check_schedule`]: pairwise rules replay the
//! table in canonical order and report each offending placement once,
//! grouping rules report each offending group once (teacher conflicts,
//! one failure per teacher and block). Either way the verdict depends
//! only on the table, never on the mutations that produced it.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{rules, ScheduleRule};
use crate::assignment::StartAssignment;
use crate::condition::Condition;
use crate::config::{ConfigError, LogicConfig};
use crate::schedule::Schedule;

/// A composable chain of schedule rules.
///
/// # Example
/// ```
/// use u_timetable::config::LogicConfig;
/// use u_timetable::logic::ScheduleLogic;
///
/// let config = LogicConfig::new().with_teacher_conflict_check(false);
/// let logic = ScheduleLogic::from_config(&config).unwrap();
/// assert_eq!(logic.rule_names(), vec!["local", "roomconflicts", "duplicatecourses"]);
/// ```
#[derive(Clone, Default)]
pub struct ScheduleLogic {
    rules: Vec<Arc<dyn ScheduleRule>>,
}

impl ScheduleLogic {
    /// Creates an empty chain. An empty chain accepts everything.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Builds the built-in chain selected by `config`.
    ///
    /// Order: local, room conflicts, teacher conflicts, duplicate courses.
    ///
    /// # Errors
    /// Any error from [`LogicConfig::validate`].
    pub fn from_config(config: &LogicConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rules: rules::builtin(config),
        })
    }

    /// Appends a rule.
    pub fn with_rule<R: ScheduleRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Appends a rule shared with other chains.
    pub fn with_shared_rule(mut self, rule: Arc<dyn ScheduleRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in chain order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Checks `proposal` against `schedule`, which must not already hold it.
    pub fn validate(&self, schedule: &Schedule, proposal: &StartAssignment) -> Condition {
        let mut root = Condition::new("assignment");
        self.check_into(&mut root, schedule, proposal);
        trace!(
            proposal = %proposal,
            valid = root.is_valid(),
            failures = root.failure_count(),
            "validated proposal"
        );
        root
    }

    /// Re-verifies every placement of `schedule` from scratch.
    pub fn verify(&self, schedule: &Schedule) -> Condition {
        let mut root = Condition::new("schedule");
        for rule in &self.rules {
            rule.check_schedule(schedule, root.child(rule.name()));
        }

        debug!(
            placements = schedule.len(),
            checks = root.check_count(),
            failures = root.failure_count(),
            "verified schedule"
        );
        root
    }

    fn check_into(&self, root: &mut Condition, schedule: &Schedule, proposal: &StartAssignment) {
        let program = schedule.program();
        for rule in &self.rules {
            let scope = root.child(rule.name());
            for present in proposal.present_assignments() {
                rule.check_local(program, &present, scope);
            }
            rule.check_start(program, proposal, scope);
            rule.check_global(schedule, proposal, scope);
        }
    }
}

impl fmt::Debug for ScheduleLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleLogic")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::PresentAssignment;
    use crate::condition::Failure;
    use crate::logic::rules::RoomConflictRule;
    use crate::models::Program;
    use crate::schedule::ScheduleFactory;
    use crate::test_utils::{sample_program, start};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Forbids the 9AM period and counts how often it was consulted.
    #[derive(Debug, Default)]
    struct NoEarlyClasses {
        calls: AtomicUsize,
    }

    impl ScheduleRule for NoEarlyClasses {
        fn name(&self) -> &'static str {
            "noearly"
        }

        fn check_local(
            &self,
            _program: &Program,
            assignment: &PresentAssignment,
            cond: &mut Condition,
        ) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            cond.verify(assignment.period().id() != "9AM", || {
                Failure::new(format!("{assignment} is too early"))
                    .with_subject(assignment.course())
            });
        }
    }

    #[test]
    fn test_default_chain_order() {
        let logic = ScheduleLogic::from_config(&LogicConfig::default()).unwrap();
        assert_eq!(
            logic.rule_names(),
            vec!["local", "roomconflicts", "teacherconflicts", "duplicatecourses"]
        );
        assert_eq!(logic.len(), 4);
    }

    #[test]
    fn test_all_rules_disabled() {
        let config = LogicConfig::new()
            .with_local_schedule_check(false)
            .with_room_conflict_check(false)
            .with_teacher_conflict_check(false)
            .with_doubly_scheduled_courses_check(false);
        let logic = ScheduleLogic::from_config(&config).unwrap();
        assert!(logic.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LogicConfig::new().with_estimated_class_size_ratio(0.9, 0.1);
        assert!(ScheduleLogic::from_config(&config).is_err());
    }

    #[test]
    fn test_custom_rule_runs_per_period() {
        let program = sample_program();
        let rule = Arc::new(NoEarlyClasses::default());
        let logic = ScheduleLogic::new().with_shared_rule(rule.clone());
        let factory = ScheduleFactory::new(Arc::clone(&program), logic);

        let state = factory
            .create()
            .assign_start(start(&program, "9AM", "Harper142", "OrigamiCourse"));
        assert!(!state.condition().is_valid());
        assert_eq!(rule.calls.load(Ordering::Relaxed), 2);
        let scope = state.condition().find_child("noearly").unwrap();
        assert_eq!(scope.check_count(), 2);
        assert_eq!(scope.failure_count(), 1);
    }

    #[test]
    fn test_no_short_circuit() {
        // Closet is too small and Math at 9AM is too early: both rules report.
        let program = sample_program();
        let logic = ScheduleLogic::from_config(&LogicConfig::default())
            .unwrap()
            .with_rule(NoEarlyClasses::default());
        let factory = ScheduleFactory::new(Arc::clone(&program), logic);

        let state = factory
            .create()
            .assign_start(start(&program, "9AM", "Closet", "MathCourse"));
        let condition = state.condition();
        assert!(!condition.find_child("local").unwrap().is_valid());
        assert!(!condition.find_child("noearly").unwrap().is_valid());
        assert!(condition.find_child("roomconflicts").unwrap().is_valid());
        assert!(state.new_state().is_empty());
    }

    #[test]
    fn test_verify_scopes_exist_for_empty_schedule() {
        let program = sample_program();
        let logic = ScheduleLogic::from_config(&LogicConfig::default()).unwrap();
        let factory = ScheduleFactory::new(program, logic);
        let condition = factory.create().is_valid();
        assert_eq!(condition.name(), "schedule");
        assert_eq!(condition.children().len(), 4);
        assert!(condition.is_valid());
    }

    #[test]
    fn test_custom_rule_replayed_in_batch() {
        let program = sample_program();
        let rule = Arc::new(NoEarlyClasses::default());
        let logic = ScheduleLogic::new().with_shared_rule(rule.clone());
        let factory = ScheduleFactory::new(Arc::clone(&program), logic);

        let schedule = factory
            .create()
            .force_assign_start(start(&program, "9AM", "Harper142", "OrigamiCourse"))
            .new_state()
            .force_assign_start(start(&program, "2PM", "Cobb110", "MathCourse"))
            .new_state()
            .clone();
        rule.calls.store(0, Ordering::Relaxed);

        let verdict = schedule.is_valid();
        // Origami covers 9AM and 10AM, Math covers 2PM.
        assert_eq!(rule.calls.load(Ordering::Relaxed), 3);
        let scope = verdict.find_child("noearly").unwrap();
        assert_eq!(scope.check_count(), 3);
        assert_eq!(scope.failure_count(), 1);
    }

    #[test]
    fn test_empty_chain_accepts_everything() {
        let program = sample_program();
        let factory = ScheduleFactory::new(Arc::clone(&program), ScheduleLogic::new());
        let first = factory
            .create()
            .assign_start(start(&program, "10AM", "Harper142", "OrigamiCourse"));
        let second = first
            .new_state()
            .assign_start(start(&program, "11AM", "Harper142", "MathCourse"));
        assert!(second.condition().is_valid());
        assert_eq!(second.new_state().len(), 2);
    }

    #[test]
    fn test_debug_lists_rules() {
        let logic = ScheduleLogic::new().with_rule(RoomConflictRule);
        assert_eq!(
            format!("{logic:?}"),
            "ScheduleLogic { rules: [\"roomconflicts\"] }"
        );
    }
}
