//! Precondition failures.
//!
//! These signal malformed input from the caller: a run that leaves its
//! block, an unknown ID, an invalid graph or configuration. Constraint
//! violations are never errors; they are reported through
//! [`Condition`](crate::condition::Condition).

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Errors raised while constructing programs, assignments or schedule factories.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(
        "course '{course}' needs {length} periods from '{period}' but block '{block}' has {available} left"
    )]
    PeriodOutOfBlock {
        course: String,
        period: String,
        block: String,
        length: usize,
        available: usize,
    },

    #[error("course '{course}' occupies no periods")]
    EmptyRun { course: String },

    #[error("unknown {kind} '{id}'")]
    UnknownEntity { kind: &'static str, id: String },

    #[error("invalid program: {}", format_problems(.0))]
    InvalidProgram(Vec<ValidationError>),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ScheduleError {
    pub(crate) fn unknown(kind: &'static str, id: &str) -> Self {
        Self::UnknownEntity {
            kind,
            id: id.to_string(),
        }
    }
}

fn format_problems(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
