//! Persistent schedules.
//!
//! A [`Schedule`] is an immutable table of committed start assignments,
//! keyed by time block, then room, then starting index. Every mutation
//! returns a new value; the predecessor is left untouched and keeps
//! answering queries, so search branches can hold many schedules at once
//! without coordination.
//!
//! # Storage
//!
//! Two nested levels of `Arc<BTreeMap>` with copy-on-write through
//! [`Arc::make_mut`]. Committing one placement copies the block index, the
//! touched block's room index and the touched room's lane; every other
//! lane is shared with the predecessor.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::assignment::{PresentAssignment, StartAssignment};
use crate::condition::Condition;
use crate::config::LogicConfig;
use crate::error::ScheduleError;
use crate::logic::ScheduleLogic;
use crate::models::{ClassPeriod, Course, Program, Room, TimeBlock};

/// Start assignments of one room in one block, by starting index.
type Lane = BTreeMap<usize, StartAssignment>;
type RoomLanes = BTreeMap<Arc<Room>, Arc<Lane>>;
type BlockTable = BTreeMap<Arc<TimeBlock>, Arc<RoomLanes>>;

/// Creates empty schedules bound to one program and one rule chain.
#[derive(Debug, Clone)]
pub struct ScheduleFactory {
    program: Arc<Program>,
    logic: Arc<ScheduleLogic>,
}

impl ScheduleFactory {
    /// Binds a program to a rule chain.
    pub fn new(program: Arc<Program>, logic: ScheduleLogic) -> Self {
        Self {
            program,
            logic: Arc::new(logic),
        }
    }

    /// Binds a program to the chain described by `config`.
    ///
    /// # Errors
    /// [`ScheduleError::Config`] if the configuration is invalid.
    pub fn from_config(
        program: Arc<Program>,
        config: &LogicConfig,
    ) -> Result<Self, ScheduleError> {
        Ok(Self::new(program, ScheduleLogic::from_config(config)?))
    }

    /// A new empty schedule.
    pub fn create(&self) -> Schedule {
        Schedule {
            program: Arc::clone(&self.program),
            logic: Arc::clone(&self.logic),
            table: Arc::default(),
            len: 0,
        }
    }

    /// The bound program.
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// The bound rule chain.
    pub fn logic(&self) -> &Arc<ScheduleLogic> {
        &self.logic
    }
}

/// The outcome of one mutation attempt: the diagnostic and the resulting schedule.
#[derive(Debug, Clone)]
pub struct ModifiedState {
    condition: Condition,
    schedule: Schedule,
}

impl ModifiedState {
    /// Diagnostic produced by the rule chain.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Resulting schedule (unchanged when a non-forced proposal is rejected).
    pub fn new_state(&self) -> &Schedule {
        &self.schedule
    }

    /// Splits into diagnostic and schedule.
    pub fn into_parts(self) -> (Condition, Schedule) {
        (self.condition, self.schedule)
    }
}

/// An immutable timetable.
#[derive(Debug, Clone)]
pub struct Schedule {
    program: Arc<Program>,
    logic: Arc<ScheduleLogic>,
    table: Arc<BlockTable>,
    len: usize,
}

impl Schedule {
    /// The program this schedule is built over.
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// The rule chain used by mutations and [`is_valid`](Self::is_valid).
    pub fn logic(&self) -> &Arc<ScheduleLogic> {
        &self.logic
    }

    /// Number of committed start assignments.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is committed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether both values share the same table storage.
    pub fn ptr_eq(&self, other: &Schedule) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }

    fn lane(&self, block: &TimeBlock, room: &Room) -> Option<&Lane> {
        self.table.get(block)?.get(room).map(|lane| &**lane)
    }

    /// The assignment starting exactly at `period` in `room`.
    pub fn starting_at(&self, period: &ClassPeriod, room: &Room) -> Option<&StartAssignment> {
        self.lane(period.block(), room)?.get(&period.index())
    }

    /// The latest assignment in `room` starting strictly before `period`,
    /// within the same block.
    ///
    /// In a table without room overlaps this is the only earlier start
    /// that can reach into `period`.
    pub fn starting_before(&self, room: &Room, period: &ClassPeriod) -> Option<&StartAssignment> {
        self.lane(period.block(), room)?
            .range(..period.index())
            .next_back()
            .map(|(_, start)| start)
    }

    /// The assignment whose run covers `period` in `room`.
    pub fn occupant(&self, period: &ClassPeriod, room: &Room) -> Option<&StartAssignment> {
        self.lane(period.block(), room)?
            .range(..=period.index())
            .next_back()
            .map(|(_, start)| start)
            .filter(|start| start.covers(period))
    }

    /// Every committed start assignment, ordered by block, room, then start.
    pub fn start_assignments(&self) -> impl Iterator<Item = &StartAssignment> + '_ {
        self.table
            .values()
            .flat_map(|rooms| rooms.values())
            .flat_map(|lane| lane.values())
    }

    /// Every occupied (period, room) cell, derived from the start assignments.
    pub fn present_assignments(&self) -> impl Iterator<Item = PresentAssignment> + '_ {
        self.start_assignments()
            .flat_map(|start| start.present_assignments())
    }

    /// Blocks holding at least one start assignment, in table order.
    pub fn time_blocks(&self) -> impl Iterator<Item = &Arc<TimeBlock>> + '_ {
        self.table.keys()
    }

    /// Start assignments in one block, across all rooms.
    pub fn starts_in_block<'a>(
        &'a self,
        block: &TimeBlock,
    ) -> impl Iterator<Item = &'a StartAssignment> + 'a {
        self.table
            .get(block)
            .into_iter()
            .flat_map(|rooms| rooms.values())
            .flat_map(|lane| lane.values())
    }

    /// The first placement of `course`, if any.
    pub fn find_course(&self, course: &Course) -> Option<&StartAssignment> {
        self.start_assignments()
            .find(|start| &**start.course() == course)
    }

    /// Committed assignments that `proposal` would structurally displace:
    /// same room, same block, overlapping run.
    pub fn overlapping(&self, proposal: &StartAssignment) -> Vec<StartAssignment> {
        self.lane(proposal.block(), proposal.room())
            .map(|lane| {
                lane.range(..proposal.end_index())
                    .map(|(_, start)| start)
                    .filter(|start| start.conflicts_with(proposal))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validates `proposal` against this schedule and commits it if valid.
    ///
    /// A rejected proposal returns this very schedule (see [`ptr_eq`](Self::ptr_eq)).
    pub fn assign_start(&self, proposal: StartAssignment) -> ModifiedState {
        let condition = self.logic.validate(self, &proposal);
        let schedule = if condition.is_valid() {
            self.with_start(proposal)
        } else {
            self.clone()
        };
        ModifiedState {
            condition,
            schedule,
        }
    }

    /// Removes whatever `proposal` overlaps in its room, then commits it
    /// unconditionally.
    ///
    /// The returned diagnostic reports the proposal's constraint state
    /// against the schedule with the displaced assignments removed.
    pub fn force_assign_start(&self, proposal: StartAssignment) -> ModifiedState {
        let displaced = self.overlapping(&proposal);
        if !displaced.is_empty() {
            debug!(
                proposal = %proposal,
                displaced = displaced.len(),
                "forced assignment displaces prior placements"
            );
        }
        let cleared = self.without(&displaced);
        let condition = self.logic.validate(&cleared, &proposal);
        ModifiedState {
            condition,
            schedule: cleared.with_start(proposal),
        }
    }

    /// Re-verifies the whole table from scratch.
    pub fn is_valid(&self) -> Condition {
        self.logic.verify(self)
    }

    /// An empty schedule over the same program and rule chain.
    pub(crate) fn cleared(&self) -> Schedule {
        Schedule {
            program: Arc::clone(&self.program),
            logic: Arc::clone(&self.logic),
            table: Arc::default(),
            len: 0,
        }
    }

    /// Copy with `start` committed, replacing any assignment starting in
    /// the same cell.
    pub(crate) fn with_start(&self, start: StartAssignment) -> Schedule {
        let mut table = Arc::clone(&self.table);
        let rooms = Arc::make_mut(&mut table)
            .entry(Arc::clone(start.block()))
            .or_default();
        let lane = Arc::make_mut(rooms)
            .entry(Arc::clone(start.room()))
            .or_default();
        let replaced = Arc::make_mut(lane).insert(start.start_index(), start);
        Schedule {
            program: Arc::clone(&self.program),
            logic: Arc::clone(&self.logic),
            table,
            len: self.len + usize::from(replaced.is_none()),
        }
    }

    fn without(&self, displaced: &[StartAssignment]) -> Schedule {
        if displaced.is_empty() {
            return self.clone();
        }
        let mut table = Arc::clone(&self.table);
        let mut len = self.len;
        for start in displaced {
            let blocks = Arc::make_mut(&mut table);
            let Some(rooms) = blocks.get_mut(start.block()) else {
                continue;
            };
            let rooms = Arc::make_mut(rooms);
            let Some(lane) = rooms.get_mut(start.room()) else {
                continue;
            };
            let lane = Arc::make_mut(lane);
            if lane.remove(&start.start_index()).is_some() {
                len -= 1;
            }
            if lane.is_empty() {
                rooms.remove(start.room());
            }
            if rooms.is_empty() {
                blocks.remove(start.block());
            }
        }
        Schedule {
            program: Arc::clone(&self.program),
            logic: Arc::clone(&self.logic),
            table,
            len,
        }
    }
}
