//! Reports over the current matches: standings, win rates, back-to-back slots, inactivity.

use crate::models::{Match, MatchStatus, PlayerId, TeamId, Tournament};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub played: u32,
    pub win_rate: f64,
}

/// Record of a doubles pair; the two ids are sorted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairRecord {
    pub players: [PlayerId; 2],
    pub names: [String; 2],
    pub wins: u32,
    pub played: u32,
    pub win_rate: f64,
}

/// A player who plays in two adjacent time slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BackToBack {
    pub player_id: PlayerId,
    pub name: String,
    pub first_slot: u32,
    pub second_slot: u32,
}

/// A player who has sat out the last stretch of the schedule, or never played.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct InactivePlayer {
    pub player_id: PlayerId,
    pub name: String,
    /// None if the player is in no match.
    pub last_slot: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reports {
    pub standings: Vec<TeamStanding>,
    pub players: Vec<PlayerRecord>,
    pub pairs: Vec<PairRecord>,
    pub back_to_back: Vec<BackToBack>,
    pub inactive: Vec<InactivePlayer>,
}

fn rate(wins: u32, played: u32) -> f64 {
    if played == 0 {
        0.0
    } else {
        f64::from(wins) / f64::from(played)
    }
}

/// Highest win rate first, then most wins.
fn by_rate_then_wins(a: (f64, u32), b: (f64, u32)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then(b.1.cmp(&a.1))
}

fn player_name(tournament: &Tournament, id: PlayerId) -> String {
    tournament
        .player(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn finished(tournament: &Tournament) -> impl Iterator<Item = (&Match, TeamId)> {
    tournament
        .matches
        .iter()
        .filter(|m| m.status == MatchStatus::Finished)
        .filter_map(|m| m.winner.map(|w| (m, w)))
}

/// Wins and losses per team over finished matches. Teams without results are
/// listed with zero; ties keep registration order.
pub fn team_standings(tournament: &Tournament) -> Vec<TeamStanding> {
    let mut tally: HashMap<TeamId, (u32, u32)> = HashMap::new();
    for (m, winner) in finished(tournament) {
        tally.entry(winner).or_default().0 += 1;
        if let Some(loser) = m.loser() {
            tally.entry(loser).or_default().1 += 1;
        }
    }
    let mut standings: Vec<TeamStanding> = tournament
        .teams
        .iter()
        .map(|t| {
            let (wins, losses) = tally.get(&t.id).copied().unwrap_or_default();
            TeamStanding {
                team_id: t.id,
                name: t.name.clone(),
                wins,
                losses,
                win_rate: rate(wins, wins + losses),
            }
        })
        .collect();
    standings.sort_by(|a, b| by_rate_then_wins((a.win_rate, a.wins), (b.win_rate, b.wins)));
    standings
}

/// Win rate per player over finished matches.
pub fn player_win_rates(tournament: &Tournament) -> Vec<PlayerRecord> {
    let mut order: Vec<PlayerId> = Vec::new();
    let mut tally: HashMap<PlayerId, (u32, u32)> = HashMap::new();
    for (m, winner) in finished(tournament) {
        let winners = m.players_of(winner);
        for p in m.fixture().players() {
            let entry = tally.entry(p).or_insert_with(|| {
                order.push(p);
                (0, 0)
            });
            entry.1 += 1;
            if winners.is_some_and(|w| w.contains(&p)) {
                entry.0 += 1;
            }
        }
    }
    let mut records: Vec<PlayerRecord> = order
        .into_iter()
        .map(|id| {
            let (wins, played) = tally[&id];
            PlayerRecord {
                player_id: id,
                name: player_name(tournament, id),
                wins,
                played,
                win_rate: rate(wins, played),
            }
        })
        .collect();
    records.sort_by(|a, b| by_rate_then_wins((a.win_rate, a.wins), (b.win_rate, b.wins)));
    records
}

fn sorted_pair(pair: &[PlayerId; 2]) -> [PlayerId; 2] {
    let mut p = *pair;
    p.sort();
    p
}

/// Win rate per doubles pair over finished matches.
pub fn pair_win_rates(tournament: &Tournament) -> Vec<PairRecord> {
    let mut order: Vec<[PlayerId; 2]> = Vec::new();
    let mut tally: HashMap<[PlayerId; 2], (u32, u32)> = HashMap::new();
    for (m, winner) in finished(tournament) {
        let f = m.fixture();
        for (team, pair) in [(f.team_a, &f.team_a_players), (f.team_b, &f.team_b_players)] {
            let key = sorted_pair(pair);
            let entry = tally.entry(key).or_insert_with(|| {
                order.push(key);
                (0, 0)
            });
            entry.1 += 1;
            if team == winner {
                entry.0 += 1;
            }
        }
    }
    let mut records: Vec<PairRecord> = order
        .into_iter()
        .map(|key| {
            let (wins, played) = tally[&key];
            PairRecord {
                players: key,
                names: key.map(|id| player_name(tournament, id)),
                wins,
                played,
                win_rate: rate(wins, played),
            }
        })
        .collect();
    records.sort_by(|a, b| by_rate_then_wins((a.win_rate, a.wins), (b.win_rate, b.wins)));
    records
}

/// Players scheduled in two adjacent time slots, ordered by slot.
pub fn back_to_back(tournament: &Tournament) -> Vec<BackToBack> {
    let mut slots: BTreeMap<u32, Vec<PlayerId>> = BTreeMap::new();
    for m in tournament.matches_sorted() {
        slots.entry(m.time_slot()).or_default().extend(m.fixture().players());
    }
    let mut result = Vec::new();
    let used: Vec<(&u32, &Vec<PlayerId>)> = slots.iter().collect();
    for pair in used.windows(2) {
        let (&first, first_players) = pair[0];
        let (&second, second_players) = pair[1];
        if second != first + 1 {
            continue;
        }
        for &p in first_players {
            if second_players.contains(&p) {
                result.push(BackToBack {
                    player_id: p,
                    name: player_name(tournament, p),
                    first_slot: first,
                    second_slot: second,
                });
            }
        }
    }
    result
}

/// Used slots after a player's last match before they count as inactive.
const INACTIVE_AFTER_SLOTS: usize = 2;

/// Players whose last match is followed by at least two more used time slots,
/// plus players in no match at all. Registered players come first in
/// registration order, then players only known from matches.
pub fn inactive_players(tournament: &Tournament) -> Vec<InactivePlayer> {
    let mut used: Vec<u32> = tournament.matches.iter().map(|m| m.time_slot()).collect();
    used.sort_unstable();
    used.dedup();

    let mut last: HashMap<PlayerId, u32> = HashMap::new();
    let mut order: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
    for m in tournament.matches_sorted() {
        for p in m.fixture().players() {
            if last.insert(p, m.time_slot()).is_none() && tournament.player(p).is_none() {
                order.push(p);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            let last_slot = last.get(&id).copied();
            let inactive = match last_slot {
                None => true,
                Some(slot) => {
                    let later = used.iter().filter(|&&s| s > slot).count();
                    later >= INACTIVE_AFTER_SLOTS
                }
            };
            inactive.then(|| InactivePlayer {
                player_id: id,
                name: player_name(tournament, id),
                last_slot,
            })
        })
        .collect()
}

/// All reports at once.
pub fn build_reports(tournament: &Tournament) -> Reports {
    Reports {
        standings: team_standings(tournament),
        players: player_win_rates(tournament),
        pairs: pair_win_rates(tournament),
        back_to_back: back_to_back(tournament),
        inactive: inactive_players(tournament),
    }
}
