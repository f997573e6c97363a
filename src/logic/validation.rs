//! Schedule validation: read-only conflict checks over a finished schedule.
//!
//! Detects:
//! - a player appearing in more than one match of the same time slot
//! - more than one match on the same court in the same time slot
//!
//! Diagnostics are plain messages; rejecting the schedule is up to the caller.

use crate::models::{PlayerId, ScheduledFixture};
use std::collections::{HashMap, HashSet};

/// A (time slot, court) cell of the timetable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CourtKey {
    pub time_slot: u32,
    pub court: u32,
}

impl From<&ScheduledFixture> for CourtKey {
    fn from(s: &ScheduledFixture) -> Self {
        Self {
            time_slot: s.time_slot,
            court: s.court,
        }
    }
}

/// Check a schedule for player and court conflicts.
///
/// Returns one message per conflicting occurrence, player conflicts first, in
/// list order. An empty result means the schedule is valid.
pub fn validate_schedule<'a, I>(fixtures: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ScheduledFixture>,
{
    let fixtures: Vec<&ScheduledFixture> = fixtures.into_iter().collect();
    let mut errors = player_conflicts(&fixtures);
    errors.extend(court_conflicts(&fixtures));
    errors
}

fn player_conflicts(fixtures: &[&ScheduledFixture]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen: HashMap<u32, HashSet<PlayerId>> = HashMap::new();
    for s in fixtures {
        let in_slot = seen.entry(s.time_slot).or_default();
        for player in s.players() {
            if !in_slot.insert(player) {
                errors.push(format!(
                    "Player {} is scheduled more than once in time slot {}",
                    player, s.time_slot
                ));
            }
        }
    }
    errors
}

fn court_conflicts(fixtures: &[&ScheduledFixture]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut occupied: HashSet<CourtKey> = HashSet::new();
    for s in fixtures {
        let key = CourtKey::from(*s);
        if !occupied.insert(key) {
            errors.push(format!(
                "Time slot {} court {} is assigned to more than one match",
                key.time_slot, key.court
            ));
        }
    }
    errors
}
