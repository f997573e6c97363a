//! Schedule generation: fixtures, slot assignment, validation, and replacing the stored schedule.

use crate::logic::encounters::generate_fixtures;
use crate::logic::slots::SlotAssigner;
use crate::logic::validation::validate_schedule;
use crate::models::{
    Lineup, Match, ScheduleError, ScheduleSummary, ScheduledFixture, Team, TeamId, Tournament,
    TournamentError, DEFAULT_COURTS,
};
use chrono::Utc;
use std::collections::HashMap;

/// Output of one generation run, before match ids are assigned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedSchedule {
    /// Ordered by (time slot, court).
    pub fixtures: Vec<ScheduledFixture>,
    pub total_rounds: u32,
    pub total_time_slots: u32,
    pub courts: u32,
}

/// Round-robin schedule generator for a fixed court capacity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScheduleGenerator {
    assigner: SlotAssigner,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_COURTS)
    }
}

impl ScheduleGenerator {
    pub fn new(courts: u32) -> Self {
        Self {
            assigner: SlotAssigner::new(courts),
        }
    }

    pub fn courts(&self) -> u32 {
        self.assigner.courts()
    }

    /// Generate and place every fixture of the round robin. Deterministic for a
    /// given team order, lineup map and court capacity.
    pub fn generate(
        &self,
        teams: &[Team],
        lineups: &HashMap<TeamId, Vec<Lineup>>,
    ) -> Result<GeneratedSchedule, ScheduleError> {
        let fixtures = generate_fixtures(teams, lineups);
        let pending = fixtures.len();
        let assignment = self.assigner.assign(fixtures)?;
        log::info!(
            "Scheduled {} match(es) for {} encounter(s) in {} time slot(s) on {} court(s)",
            pending,
            assignment.total_rounds,
            assignment.total_time_slots,
            self.courts()
        );
        Ok(GeneratedSchedule {
            fixtures: assignment.fixtures,
            total_rounds: assignment.total_rounds,
            total_time_slots: assignment.total_time_slots,
            courts: self.courts(),
        })
    }

    /// Conflict diagnostics for a generated schedule; empty when valid.
    pub fn validate(&self, schedule: &GeneratedSchedule) -> Vec<String> {
        validate_schedule(&schedule.fixtures)
    }
}

/// Generate a new schedule for the tournament and replace the stored one.
///
/// 1. Require at least 2 teams, each with at least one lineup.
/// 2. Generate and place fixtures with the tournament's court capacity.
/// 3. Validate; any diagnostic rejects the whole schedule.
/// 4. Assign match ids and replace matches and summary together.
///
/// On any error the tournament is left unchanged.
pub fn generate_schedule(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams);
    }
    let lineups = tournament.lineups_by_team();
    if let Some(team) = tournament
        .teams
        .iter()
        .find(|t| lineups.get(&t.id).map_or(true, Vec::is_empty))
    {
        return Err(TournamentError::MissingLineups(team.id));
    }

    let generator = ScheduleGenerator::new(tournament.courts);
    let generated = generator.generate(&tournament.teams, &lineups)?;
    let diagnostics = generator.validate(&generated);
    if !diagnostics.is_empty() {
        log::error!("Rejected schedule with {} conflict(s)", diagnostics.len());
        return Err(TournamentError::InvalidSchedule(diagnostics));
    }

    let matches: Vec<Match> = generated.fixtures.into_iter().map(Match::new).collect();
    let summary = ScheduleSummary {
        total_rounds: generated.total_rounds,
        total_time_slots: generated.total_time_slots,
        courts_used: generated.courts,
        match_ids: matches.iter().map(|m| m.id).collect(),
        created_at: Utc::now(),
    };
    tournament.replace_schedule(matches, summary);
    Ok(())
}
