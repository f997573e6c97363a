//! Disciplines and per-team doubles lineups.

use crate::models::player::{PlayerId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a lineup.
pub type LineupId = Uuid;

/// The three fixed doubles categories every encounter is played over.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Discipline {
    #[serde(rename = "MD1")]
    Md1,
    #[serde(rename = "MD2")]
    Md2,
    #[serde(rename = "XD1")]
    Xd1,
}

impl Discipline {
    /// Canonical order; fixes the order of matches within an encounter.
    pub const ALL: [Discipline; 3] = [Discipline::Md1, Discipline::Md2, Discipline::Xd1];

    pub fn as_str(self) -> &'static str {
        match self {
            Discipline::Md1 => "MD1",
            Discipline::Md2 => "MD2",
            Discipline::Xd1 => "XD1",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team's fixed pairing for one discipline.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub id: LineupId,
    pub team_id: TeamId,
    pub discipline: Discipline,
    pub players: [PlayerId; 2],
    pub created_at: DateTime<Utc>,
}

impl Lineup {
    pub fn new(team_id: TeamId, discipline: Discipline, players: [PlayerId; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            discipline,
            players,
            created_at: Utc::now(),
        }
    }
}
