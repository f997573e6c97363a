//! CSV export of the current schedule.

use crate::models::{Match, MatchStatus, PlayerId, TeamId, Tournament};
use csv::WriterBuilder;
use serde::Serialize;

/// One CSV line per match.
#[derive(Debug, Serialize)]
struct MatchRow {
    round: u32,
    time_slot: u32,
    court: u32,
    discipline: &'static str,
    team_a: String,
    team_b: String,
    team_a_players: String,
    team_b_players: String,
    status: &'static str,
    scores: String,
    winner: String,
}

fn team_name(tournament: &Tournament, id: TeamId) -> String {
    tournament
        .team(id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn player_names(tournament: &Tournament, ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|&id| {
            tournament
                .player(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

fn status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Pending => "pending",
        MatchStatus::Ongoing => "ongoing",
        MatchStatus::Finished => "finished",
    }
}

fn row(tournament: &Tournament, m: &Match) -> MatchRow {
    let f = m.fixture();
    MatchRow {
        round: m.scheduled.round,
        time_slot: m.time_slot(),
        court: m.court(),
        discipline: f.discipline.as_str(),
        team_a: team_name(tournament, f.team_a),
        team_b: team_name(tournament, f.team_b),
        team_a_players: player_names(tournament, &f.team_a_players),
        team_b_players: player_names(tournament, &f.team_b_players),
        status: status_label(m.status),
        scores: m
            .scores
            .iter()
            .map(|s| format!("{}-{}", s.team_a_score, s.team_b_score))
            .collect::<Vec<_>>()
            .join(" "),
        winner: m
            .winner
            .map(|w| team_name(tournament, w))
            .unwrap_or_default(),
    }
}

/// Export the matches as CSV with a header line, ordered by (time slot, court).
pub fn export_matches_csv(tournament: &Tournament) -> Result<String, Box<dyn std::error::Error>> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for m in tournament.matches_sorted() {
        wtr.serialize(row(tournament, m))?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
