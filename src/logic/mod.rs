//! Tournament business logic: encounter generation, slot assignment, validation, results.

mod encounters;
mod export;
mod reports;
mod results;
mod schedule;
mod slots;
mod validation;

pub use encounters::{generate_fixtures, EncounterKey};
pub use export::export_matches_csv;
pub use reports::{
    back_to_back, build_reports, inactive_players, pair_win_rates, player_win_rates,
    team_standings, BackToBack, InactivePlayer, PairRecord, PlayerRecord, Reports, TeamStanding,
};
pub use results::{fill_random_results, record_match_score};
pub use schedule::{generate_schedule, GeneratedSchedule, ScheduleGenerator};
pub use slots::{Assignment, SlotAssigner, SLOTS_PER_ROUND};
pub use validation::{validate_schedule, CourtKey};
