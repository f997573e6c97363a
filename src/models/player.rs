//! Team and Player data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a player (used in lineups and matches).
pub type PlayerId = Uuid;

/// A team entered in the round robin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// A player on a team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
    pub gender: Gender,
    /// 1 is the strongest player on the team.
    pub skill_rank: u32,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player on `team_id`.
    pub fn new(team_id: TeamId, name: impl Into<String>, gender: Gender, skill_rank: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            name: name.into(),
            gender,
            skill_rank,
            created_at: Utc::now(),
        }
    }
}
