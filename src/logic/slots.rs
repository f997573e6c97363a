//! Slot assignment: greedy placement of fixtures into time slots and courts.
//!
//! Each slot is filled by one pass over the encounter groups, in the order the
//! encounters were generated. A group places at most its first pending fixture
//! per slot, so the matches of one encounter spread over consecutive slots.
//!
//! Constraints for placing a fixture in the open slot:
//! 1. None of its players is already playing in this slot.
//! 2. A court is still free.
//! 3. None of its players played in the previous slot. This one is waived while
//!    the slot is still empty, so every slot places at least one fixture.

use crate::logic::encounters::EncounterKey;
use crate::models::{Fixture, PlayerId, ScheduleError, ScheduledFixture};
use std::collections::{HashMap, HashSet, VecDeque};

/// Slots per round.
pub const SLOTS_PER_ROUND: u32 = 3;

/// Fixtures of one team pair still waiting for a slot, in generation order.
#[derive(Debug)]
struct EncounterGroup {
    key: EncounterKey,
    pending: VecDeque<Fixture>,
}

/// Group fixtures by team pair. Groups keep first-appearance order.
fn group_by_encounter(fixtures: Vec<Fixture>) -> VecDeque<EncounterGroup> {
    let mut index: HashMap<EncounterKey, usize> = HashMap::new();
    let mut groups: Vec<EncounterGroup> = Vec::new();
    for fixture in fixtures {
        let key = EncounterKey::from(&fixture);
        let idx = *index.entry(key).or_insert_with(|| {
            groups.push(EncounterGroup {
                key,
                pending: VecDeque::new(),
            });
            groups.len() - 1
        });
        groups[idx].pending.push_back(fixture);
    }
    groups.into()
}

/// The slot currently being filled.
#[derive(Debug)]
struct OpenSlot {
    index: u32,
    players: HashSet<PlayerId>,
    courts_used: u32,
}

impl OpenSlot {
    fn new(index: u32) -> Self {
        Self {
            index,
            players: HashSet::new(),
            courts_used: 0,
        }
    }
}

/// Result of one assignment run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    /// Ordered by (time slot, court).
    pub fixtures: Vec<ScheduledFixture>,
    pub total_time_slots: u32,
    /// Number of team pairs with at least one fixture.
    pub total_rounds: u32,
}

/// Greedy slot/court assigner for a fixed court capacity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotAssigner {
    courts: u32,
}

impl SlotAssigner {
    pub fn new(courts: u32) -> Self {
        Self { courts }
    }

    pub fn courts(&self) -> u32 {
        self.courts
    }

    /// Most slots a run may open for `pending` fixtures.
    ///
    /// With at least one court every slot places a fixture, so a run never needs
    /// more slots than fixtures; twice that is only reached when nothing can be placed.
    pub fn slot_limit(pending: usize) -> u32 {
        u32::try_from(pending)
            .unwrap_or(u32::MAX)
            .saturating_mul(2)
            .max(1)
    }

    /// Place every fixture. Fails when the slot limit is reached first.
    pub fn assign(&self, fixtures: Vec<Fixture>) -> Result<Assignment, ScheduleError> {
        let limit = Self::slot_limit(fixtures.len());
        let mut placed = Vec::with_capacity(fixtures.len());
        let mut groups = group_by_encounter(fixtures);
        let total_rounds = groups.len() as u32;
        let mut last_slot: HashMap<PlayerId, u32> = HashMap::new();
        let mut index = 0u32;

        while !groups.is_empty() {
            if index >= limit {
                let unscheduled = groups.iter().map(|g| g.pending.len()).sum();
                log::warn!(
                    "Slot limit of {} reached with {} fixture(s) unplaced ({} court(s))",
                    limit,
                    unscheduled,
                    self.courts
                );
                return Err(ScheduleError::SlotLimitExceeded { limit, unscheduled });
            }

            let mut slot = OpenSlot::new(index);
            let mut remaining = VecDeque::with_capacity(groups.len());
            while let Some(mut group) = groups.pop_front() {
                let fits = group
                    .pending
                    .front()
                    .is_some_and(|f| self.fits(&slot, f, &last_slot));
                if fits {
                    if let Some(fixture) = group.pending.pop_front() {
                        placed.push(self.place(&mut slot, fixture, &mut last_slot));
                    }
                }
                if group.pending.is_empty() {
                    log::trace!("Encounter {:?} fully scheduled", group.key.teams());
                } else {
                    remaining.push_back(group);
                }
            }
            log::debug!("Slot {}: {} match(es) placed", slot.index, slot.courts_used);
            groups = remaining;
            index += 1;
        }

        let total_time_slots = placed
            .iter()
            .map(|s: &ScheduledFixture| s.time_slot + 1)
            .max()
            .unwrap_or(0);
        Ok(Assignment {
            fixtures: placed,
            total_time_slots,
            total_rounds,
        })
    }

    fn fits(&self, slot: &OpenSlot, fixture: &Fixture, last_slot: &HashMap<PlayerId, u32>) -> bool {
        if slot.courts_used >= self.courts {
            return false;
        }
        if fixture.players().any(|p| slot.players.contains(&p)) {
            return false;
        }
        if slot.courts_used == 0 {
            return true;
        }
        let Some(previous) = slot.index.checked_sub(1) else {
            return true;
        };
        !fixture
            .players()
            .any(|p| last_slot.get(&p) == Some(&previous))
    }

    fn place(
        &self,
        slot: &mut OpenSlot,
        fixture: Fixture,
        last_slot: &mut HashMap<PlayerId, u32>,
    ) -> ScheduledFixture {
        for p in fixture.players() {
            slot.players.insert(p);
            last_slot.insert(p, slot.index);
        }
        slot.courts_used += 1;
        ScheduledFixture {
            fixture,
            time_slot: slot.index,
            court: slot.courts_used,
            round: slot.index / SLOTS_PER_ROUND + 1,
        }
    }
}
