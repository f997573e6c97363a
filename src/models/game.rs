//! Fixtures (pending matches), their slot placements, and stored matches.

use crate::models::lineup::Discipline;
use crate::models::player::{PlayerId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored match.
pub type MatchId = Uuid;

/// One doubles match between two teams, not yet placed on the timetable.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub discipline: Discipline,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub team_a_players: [PlayerId; 2],
    pub team_b_players: [PlayerId; 2],
}

impl Fixture {
    /// All four participants, team A first.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_a_players
            .iter()
            .chain(self.team_b_players.iter())
            .copied()
    }

    pub fn involves_team(&self, team: TeamId) -> bool {
        self.team_a == team || self.team_b == team
    }
}

/// A fixture with its time slot, court and round filled in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduledFixture {
    #[serde(flatten)]
    pub fixture: Fixture,
    /// 0-based.
    pub time_slot: u32,
    /// 1-based, never above the court capacity.
    pub court: u32,
    /// Three slots make one round; 1-based.
    pub round: u32,
}

impl ScheduledFixture {
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.fixture.players()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Ongoing,
    Finished,
}

/// Points for one set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub set: u32,
    pub team_a_score: u32,
    pub team_b_score: u32,
}

/// A scheduled match as stored by the tournament: id, placement, and result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    #[serde(flatten)]
    pub scheduled: ScheduledFixture,
    pub status: MatchStatus,
    pub scores: Vec<SetScore>,
    /// None until finished.
    pub winner: Option<TeamId>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn new(scheduled: ScheduledFixture) -> Self {
        Self {
            id: Uuid::new_v4(),
            scheduled,
            status: MatchStatus::Pending,
            scores: Vec::new(),
            winner: None,
            created_at: Utc::now(),
        }
    }

    pub fn fixture(&self) -> &Fixture {
        &self.scheduled.fixture
    }

    pub fn time_slot(&self) -> u32 {
        self.scheduled.time_slot
    }

    pub fn court(&self) -> u32 {
        self.scheduled.court
    }

    /// The losing team, if the match is decided.
    pub fn loser(&self) -> Option<TeamId> {
        let f = self.fixture();
        self.winner
            .map(|w| if w == f.team_a { f.team_b } else { f.team_a })
    }

    /// Player pair of the given side, if the team takes part.
    pub fn players_of(&self, team: TeamId) -> Option<&[PlayerId; 2]> {
        let f = self.fixture();
        if team == f.team_a {
            Some(&f.team_a_players)
        } else if team == f.team_b {
            Some(&f.team_b_players)
        } else {
            None
        }
    }
}
