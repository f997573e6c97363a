//! Encounter generation: one fixture per team pair and per discipline both sides field.

use crate::models::{Discipline, Fixture, Lineup, Team, TeamId};
use std::collections::HashMap;

/// Unordered team pair. The smaller id is always stored first, so
/// `EncounterKey::new(a, b) == EncounterKey::new(b, a)`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EncounterKey {
    low: TeamId,
    high: TeamId,
}

impl EncounterKey {
    pub fn new(a: TeamId, b: TeamId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn teams(&self) -> (TeamId, TeamId) {
        (self.low, self.high)
    }
}

impl From<&Fixture> for EncounterKey {
    fn from(f: &Fixture) -> Self {
        EncounterKey::new(f.team_a, f.team_b)
    }
}

fn lineup_for(lineups: &[Lineup], discipline: Discipline) -> Option<&Lineup> {
    lineups.iter().find(|l| l.discipline == discipline)
}

/// Build the pending fixtures of a single round robin.
///
/// Pairs follow the order of `teams` (first with second, first with third, ...,
/// second with third, ...). Within a pair, disciplines follow [`Discipline::ALL`].
/// A discipline is skipped for a pair when either team has no lineup for it.
pub fn generate_fixtures(teams: &[Team], lineups: &HashMap<TeamId, Vec<Lineup>>) -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    for (i, team_a) in teams.iter().enumerate() {
        for team_b in &teams[i + 1..] {
            let lineups_a = lineups.get(&team_a.id).map(Vec::as_slice).unwrap_or_default();
            let lineups_b = lineups.get(&team_b.id).map(Vec::as_slice).unwrap_or_default();
            for discipline in Discipline::ALL {
                let (Some(a), Some(b)) = (
                    lineup_for(lineups_a, discipline),
                    lineup_for(lineups_b, discipline),
                ) else {
                    continue;
                };
                fixtures.push(Fixture {
                    discipline,
                    team_a: team_a.id,
                    team_b: team_b.id,
                    team_a_players: a.players,
                    team_b_players: b.players,
                });
            }
        }
    }
    fixtures
}
