//! Time blocks and class periods.
//!
//! A time block is a contiguous span of the scheduling day, divided into
//! ordered periods. Period indices are local to their block: index 2 of
//! the morning block has nothing to do with index 2 of the afternoon block.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::ProgramId;

/// An ordered run of class periods belonging to one program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Unique block identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Owning program. Stamped by [`ProgramBuilder`](super::ProgramBuilder).
    #[serde(default)]
    pub program: ProgramId,
    /// Period identifiers in chronological order (e.g. `"10AM"`).
    pub periods: Vec<String>,
}

impl TimeBlock {
    /// Creates a block from its ordered period identifiers.
    pub fn new<I, S>(id: impl Into<String>, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: String::new(),
            program: ProgramId::default(),
            periods: periods.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of periods in the block.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the block has no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Position of a period identifier within this block.
    pub fn index_of(&self, period_id: &str) -> Option<usize> {
        self.periods.iter().position(|p| p == period_id)
    }
}

impl PartialEq for TimeBlock {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program && self.id == other.id
    }
}

impl Eq for TimeBlock {}

impl Hash for TimeBlock {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.program.hash(state);
        self.id.hash(state);
    }
}

impl PartialOrd for TimeBlock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeBlock {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.program, &self.id).cmp(&(&other.program, &other.id))
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// One period of a time block.
///
/// Ordered by block, then by position within the block.
#[derive(Debug, Clone)]
pub struct ClassPeriod {
    block: Arc<TimeBlock>,
    index: usize,
}

impl ClassPeriod {
    /// Period at `index` of `block`, if the block is that long.
    pub fn in_block(block: &Arc<TimeBlock>, index: usize) -> Option<Self> {
        (index < block.len()).then(|| Self {
            block: Arc::clone(block),
            index,
        })
    }

    /// Caller guarantees `index < block.len()`.
    pub(crate) fn new_unchecked(block: Arc<TimeBlock>, index: usize) -> Self {
        debug_assert!(index < block.len());
        Self { block, index }
    }

    /// The block containing this period.
    pub fn block(&self) -> &Arc<TimeBlock> {
        &self.block
    }

    /// Position within the block.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Period identifier.
    pub fn id(&self) -> &str {
        &self.block.periods[self.index]
    }

    /// Number of periods from this one (inclusive) to the end of the block.
    pub fn remaining_in_block(&self) -> usize {
        self.block.len() - self.index
    }

    /// The period `delta` steps later in the same block.
    pub fn offset(&self, delta: usize) -> Option<Self> {
        Self::in_block(&self.block, self.index.checked_add(delta)?)
    }
}

impl PartialEq for ClassPeriod {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.block == other.block
    }
}

impl Eq for ClassPeriod {}

impl Hash for ClassPeriod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.block.hash(state);
        self.index.hash(state);
    }
}

impl PartialOrd for ClassPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassPeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        self.block
            .cmp(&other.block)
            .then(self.index.cmp(&other.index))
    }
}

impl fmt::Display for ClassPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn morning() -> Arc<TimeBlock> {
        Arc::new(TimeBlock::new("Morning", ["9AM", "10AM", "11AM"]))
    }

    #[test]
    fn test_block_basics() {
        let block = TimeBlock::new("Morning", ["9AM", "10AM"]).with_name("Morning block");
        assert_eq!(block.len(), 2);
        assert!(!block.is_empty());
        assert_eq!(block.index_of("10AM"), Some(1));
        assert_eq!(block.index_of("1PM"), None);
        assert_eq!(block.name, "Morning block");
    }

    #[test]
    fn test_period_in_block() {
        let block = morning();
        let ten = ClassPeriod::in_block(&block, 1).unwrap();
        assert_eq!(ten.id(), "10AM");
        assert_eq!(ten.remaining_in_block(), 2);
        assert!(ClassPeriod::in_block(&block, 3).is_none());
    }

    #[test]
    fn test_period_offset_stays_in_block() {
        let block = morning();
        let nine = ClassPeriod::in_block(&block, 0).unwrap();
        assert_eq!(nine.offset(2).unwrap().id(), "11AM");
        assert!(nine.offset(3).is_none());
    }

    #[test]
    fn test_period_ordering() {
        let am = morning();
        let pm = Arc::new(TimeBlock::new("Afternoon", ["1PM", "2PM"]));
        let nine = ClassPeriod::in_block(&am, 0).unwrap();
        let eleven = ClassPeriod::in_block(&am, 2).unwrap();
        let one = ClassPeriod::in_block(&pm, 0).unwrap();

        assert!(nine < eleven);
        // "Afternoon" sorts before "Morning"
        assert!(one < nine);
        assert_ne!(nine, one);
    }

    #[test]
    fn test_same_index_different_block() {
        let am = morning();
        let pm = Arc::new(TimeBlock::new("Afternoon", ["1PM", "2PM"]));
        assert_ne!(
            ClassPeriod::in_block(&am, 0).unwrap(),
            ClassPeriod::in_block(&pm, 0).unwrap()
        );
    }
}
