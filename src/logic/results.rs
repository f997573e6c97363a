//! Score entry and simulated results.

use crate::models::{MatchId, MatchStatus, SetScore, TeamId, Tournament, TournamentError};
use rand::Rng;

/// Points needed to win a simulated set.
const WINNING_SCORE: u32 = 21;

/// Record set scores for a match.
///
/// With a winner the match becomes `Finished`; without one it is `Ongoing`.
/// The winner must be one of the two teams in the match.
pub fn record_match_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    scores: Vec<SetScore>,
    winner: Option<TeamId>,
) -> Result<(), TournamentError> {
    let m = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if let Some(w) = winner {
        if !m.fixture().involves_team(w) {
            return Err(TournamentError::InvalidWinner(w));
        }
    }
    m.scores = scores;
    m.winner = winner;
    m.status = if winner.is_some() {
        MatchStatus::Finished
    } else {
        MatchStatus::Ongoing
    };
    Ok(())
}

/// Finish every unfinished match with a single random set (21 to 2..=20).
/// Returns how many matches were filled in.
pub fn fill_random_results<R: Rng>(tournament: &mut Tournament, rng: &mut R) -> usize {
    let mut filled = 0;
    for m in tournament
        .matches
        .iter_mut()
        .filter(|m| m.status != MatchStatus::Finished)
    {
        let loser_score = rng.gen_range(2..WINNING_SCORE);
        let a_wins = rng.gen_bool(0.5);
        let (team_a_score, team_b_score, winner) = if a_wins {
            (WINNING_SCORE, loser_score, m.fixture().team_a)
        } else {
            (loser_score, WINNING_SCORE, m.fixture().team_b)
        };
        m.scores = vec![SetScore {
            set: 1,
            team_a_score,
            team_b_score,
        }];
        m.winner = Some(winner);
        m.status = MatchStatus::Finished;
        filled += 1;
    }
    filled
}
