//! Hierarchical validation diagnostics.
//!
//! A [`Condition`] is a tree of named scopes. Each scope counts the checks
//! run in it and keeps a [`Failure`] for every check that did not hold.
//! A scope is valid iff neither it nor any descendant holds a failure.
//!
//! Conditions are plain values: one is created per validation call and
//! handed to the caller, so they can be compared, printed or serialized
//! after the fact.

use serde::Serialize;
use std::fmt;
use tracing::trace;

/// A failed check: explanation plus the entities involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Human-readable explanation.
    pub message: String,
    /// Labels of the offending entities (courses, rooms, teachers, cells).
    pub subjects: Vec<String>,
}

impl Failure {
    /// Creates a failure with no subjects.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            subjects: Vec::new(),
        }
    }

    /// Adds an offending entity.
    pub fn with_subject(mut self, subject: impl fmt::Display) -> Self {
        self.subjects.push(subject.to_string());
        self
    }

    /// Whether any subject label equals `label`.
    pub fn names(&self, label: &str) -> bool {
        self.subjects.iter().any(|s| s == label)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.subjects.is_empty() {
            write!(f, " [{}]", self.subjects.join(", "))?;
        }
        Ok(())
    }
}

/// A named scope of validation outcomes with child scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Condition {
    name: String,
    checks: usize,
    failures: Vec<Failure>,
    children: Vec<Condition>,
}

impl Condition {
    /// Creates an empty scope.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Scope name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The child scope called `name`, created on first use.
    pub fn child(&mut self, name: &str) -> &mut Condition {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.children.push(Condition::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Looks up a direct child scope.
    pub fn find_child(&self, name: &str) -> Option<&Condition> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct child scopes in creation order.
    pub fn children(&self) -> &[Condition] {
        &self.children
    }

    /// Records one check. `failure` is only built when `ok` is false.
    ///
    /// Returns `ok`.
    pub fn verify<F>(&mut self, ok: bool, failure: F) -> bool
    where
        F: FnOnce() -> Failure,
    {
        self.checks += 1;
        if !ok {
            let failure = failure();
            trace!(scope = %self.name, failure = %failure, "check failed");
            self.failures.push(failure);
        }
        ok
    }

    /// Whether this scope and all descendants are free of failures.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty() && self.children.iter().all(Condition::is_valid)
    }

    /// Failures recorded directly in this scope.
    pub fn local_failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Checks run in this scope and all descendants.
    pub fn check_count(&self) -> usize {
        self.checks + self.children.iter().map(Condition::check_count).sum::<usize>()
    }

    /// Failures in this scope and all descendants.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
            + self
                .children
                .iter()
                .map(Condition::failure_count)
                .sum::<usize>()
    }

    /// Every failure in the tree, depth first, paired with its scope path
    /// (e.g. `"assignment/roomconflicts"`).
    pub fn failures(&self) -> Vec<(String, &Failure)> {
        let mut out = Vec::new();
        self.collect_failures(&self.name, &mut out);
        out
    }

    fn collect_failures<'a>(&'a self, path: &str, out: &mut Vec<(String, &'a Failure)>) {
        out.extend(self.failures.iter().map(|f| (path.to_string(), f)));
        for child in &self.children {
            child.collect_failures(&format!("{path}/{}", child.name), out);
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let verdict = if self.is_valid() { "valid" } else { "INVALID" };
        writeln!(f, "{indent}{}: {verdict} ({} checks)", self.name, self.checks)?;
        for failure in &self.failures {
            writeln!(f, "{indent}  - {failure}")?;
        }
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
