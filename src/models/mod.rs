//! Data structures for the team tournament: teams, players, lineups, matches, schedule.

mod game;
mod lineup;
mod player;
mod schedule;
mod tournament;

pub use game::{Fixture, Match, MatchId, MatchStatus, ScheduledFixture, SetScore};
pub use lineup::{Discipline, Lineup, LineupId};
pub use player::{Gender, Player, PlayerId, Team, TeamId};
pub use schedule::{ScheduleError, ScheduleSummary};
pub use tournament::{PlayerUpdate, Tournament, TournamentError, DEFAULT_COURTS};
