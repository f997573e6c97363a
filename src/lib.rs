//! Team doubles tournament: library with models, the round-robin scheduler, and results logic.

pub mod logic;
pub mod models;

pub use logic::{
    build_reports, export_matches_csv, fill_random_results, generate_fixtures, generate_schedule,
    record_match_score, validate_schedule, EncounterKey, GeneratedSchedule, Reports,
    ScheduleGenerator, SlotAssigner,
};
pub use models::{
    Discipline, Fixture, Gender, Lineup, LineupId, Match, MatchId, MatchStatus, Player, PlayerId,
    PlayerUpdate, ScheduleError, ScheduleSummary, ScheduledFixture, SetScore, Team, TeamId,
    Tournament, TournamentError, DEFAULT_COURTS,
};
