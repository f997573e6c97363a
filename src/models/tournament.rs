//! Tournament: teams, players, lineups, and the current schedule.

use crate::logic::validate_schedule;
use crate::models::game::{Match, MatchId};
use crate::models::lineup::{Discipline, Lineup, LineupId};
use crate::models::player::{Gender, Player, PlayerId, Team, TeamId};
use crate::models::schedule::{ScheduleError, ScheduleSummary};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default number of courts when none is configured.
pub const DEFAULT_COURTS: u32 = 4;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    TeamNotFound(TeamId),
    PlayerNotFound(PlayerId),
    MatchNotFound(MatchId),
    LineupNotFound { team: TeamId, discipline: Discipline },
    /// Team and player names must not be blank.
    EmptyName,
    /// A team with this name already exists (case-insensitive).
    DuplicateTeamName,
    /// Need at least 2 teams to generate a schedule.
    NotEnoughTeams,
    /// A team has no lineup for any discipline.
    MissingLineups(TeamId),
    /// Lineup must name two different players.
    InvalidLineup,
    /// Player is not on the team the lineup is for.
    PlayerNotOnTeam(PlayerId),
    /// The given winner did not play in the match.
    InvalidWinner(TeamId),
    Scheduling(ScheduleError),
    /// Generated schedule failed validation; nothing was stored.
    InvalidSchedule(Vec<String>),
    /// Imported state is inconsistent; nothing was stored.
    InvalidImport(String),
}

impl TournamentError {
    /// True for lookups of ids that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TeamNotFound(_)
                | TournamentError::PlayerNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::LineupNotFound { .. }
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::LineupNotFound { discipline, .. } => {
                write!(f, "Team has no {} lineup", discipline)
            }
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            TournamentError::NotEnoughTeams => write!(f, "Need at least 2 teams to generate a schedule"),
            TournamentError::MissingLineups(_) => write!(f, "Every team needs at least one lineup"),
            TournamentError::InvalidLineup => write!(f, "A lineup needs two different players"),
            TournamentError::PlayerNotOnTeam(_) => write!(f, "Player is not on this team"),
            TournamentError::InvalidWinner(_) => write!(f, "Winner must be one of the two teams"),
            TournamentError::Scheduling(e) => write!(f, "{}", e),
            TournamentError::InvalidSchedule(errors) => {
                write!(f, "Generated schedule has conflicts: {}", errors.join("; "))
            }
            TournamentError::InvalidImport(reason) => write!(f, "Invalid tournament data: {}", reason),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<ScheduleError> for TournamentError {
    fn from(e: ScheduleError) -> Self {
        TournamentError::Scheduling(e)
    }
}

/// Partial update for a player; `None` fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub skill_rank: Option<u32>,
}

/// Full tournament state. One per process; the web server keeps it behind a lock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    /// In registration order; this order fixes the pairing order of the schedule.
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub lineups: Vec<Lineup>,
    /// Matches of the current schedule, in (time slot, court) order.
    pub matches: Vec<Match>,
    pub schedule: Option<ScheduleSummary>,
    /// Court capacity used for the next generation.
    pub courts: u32,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new(DEFAULT_COURTS)
    }
}

fn clean_name(name: &str) -> Result<&str, TournamentError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    Ok(trimmed)
}

impl Tournament {
    /// Create an empty tournament with the given court capacity.
    pub fn new(courts: u32) -> Self {
        Self {
            teams: Vec::new(),
            players: Vec::new(),
            lineups: Vec::new(),
            matches: Vec::new(),
            schedule: None,
            courts,
        }
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Add a team. Names are trimmed and must be unique (case-insensitive).
    pub fn add_team(&mut self, name: &str) -> Result<TeamId, TournamentError> {
        let name = clean_name(name)?;
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeamName);
        }
        let team = Team::new(name);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    pub fn rename_team(&mut self, id: TeamId, name: &str) -> Result<(), TournamentError> {
        let name = clean_name(name)?;
        if self
            .teams
            .iter()
            .any(|t| t.id != id && t.name.eq_ignore_ascii_case(name))
        {
            return Err(TournamentError::DuplicateTeamName);
        }
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TournamentError::TeamNotFound(id))?;
        team.name = name.to_string();
        Ok(())
    }

    /// Remove a team together with its players and lineups.
    /// If the team plays in the current schedule, the schedule is dropped too.
    pub fn remove_team(&mut self, id: TeamId) -> Result<(), TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or(TournamentError::TeamNotFound(id))?;
        self.teams.remove(idx);
        self.players.retain(|p| p.team_id != id);
        self.lineups.retain(|l| l.team_id != id);
        if self.matches.iter().any(|m| m.fixture().involves_team(id)) {
            log::info!("Team {} removed, dropping the current schedule", id);
            self.clear_schedule();
        }
        Ok(())
    }

    pub fn add_player(
        &mut self,
        team_id: TeamId,
        name: &str,
        gender: Gender,
        skill_rank: u32,
    ) -> Result<PlayerId, TournamentError> {
        let name = clean_name(name)?;
        if self.team(team_id).is_none() {
            return Err(TournamentError::TeamNotFound(team_id));
        }
        let player = Player::new(team_id, name, gender, skill_rank);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    pub fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> Result<(), TournamentError> {
        let name = update.name.as_deref().map(clean_name).transpose()?.map(str::to_string);
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        if let Some(name) = name {
            player.name = name;
        }
        if let Some(gender) = update.gender {
            player.gender = gender;
        }
        if let Some(rank) = update.skill_rank {
            player.skill_rank = rank;
        }
        Ok(())
    }

    /// Remove a player and every lineup they are part of.
    /// If the player is in the current schedule, the schedule is dropped too.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        self.players.remove(idx);
        self.lineups.retain(|l| !l.players.contains(&id));
        if self.matches.iter().any(|m| m.fixture().players().any(|p| p == id)) {
            log::info!("Player {} removed, dropping the current schedule", id);
            self.clear_schedule();
        }
        Ok(())
    }

    /// Players of a team, strongest first.
    pub fn team_players(&self, team_id: TeamId) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().filter(|p| p.team_id == team_id).collect();
        players.sort_by_key(|p| p.skill_rank);
        players
    }

    /// Set the team's lineup for a discipline, replacing any previous one.
    pub fn set_lineup(
        &mut self,
        team_id: TeamId,
        discipline: Discipline,
        players: [PlayerId; 2],
    ) -> Result<LineupId, TournamentError> {
        if self.team(team_id).is_none() {
            return Err(TournamentError::TeamNotFound(team_id));
        }
        if players[0] == players[1] {
            return Err(TournamentError::InvalidLineup);
        }
        for &pid in &players {
            let player = self.player(pid).ok_or(TournamentError::PlayerNotFound(pid))?;
            if player.team_id != team_id {
                return Err(TournamentError::PlayerNotOnTeam(pid));
            }
        }
        self.lineups
            .retain(|l| !(l.team_id == team_id && l.discipline == discipline));
        let lineup = Lineup::new(team_id, discipline, players);
        let id = lineup.id;
        self.lineups.push(lineup);
        Ok(id)
    }

    pub fn remove_lineup(&mut self, team_id: TeamId, discipline: Discipline) -> Result<(), TournamentError> {
        let idx = self
            .lineups
            .iter()
            .position(|l| l.team_id == team_id && l.discipline == discipline)
            .ok_or(TournamentError::LineupNotFound {
                team: team_id,
                discipline,
            })?;
        self.lineups.remove(idx);
        Ok(())
    }

    /// Lineups of a team in discipline order.
    pub fn team_lineups(&self, team_id: TeamId) -> Vec<&Lineup> {
        let mut lineups: Vec<&Lineup> = self.lineups.iter().filter(|l| l.team_id == team_id).collect();
        lineups.sort_by_key(|l| l.discipline);
        lineups
    }

    /// Snapshot of all lineups keyed by team, as consumed by the scheduler.
    pub fn lineups_by_team(&self) -> HashMap<TeamId, Vec<Lineup>> {
        let mut map: HashMap<TeamId, Vec<Lineup>> = HashMap::new();
        for lineup in &self.lineups {
            map.entry(lineup.team_id).or_default().push(lineup.clone());
        }
        map
    }

    /// Change the court capacity for the next generation. 0 is accepted but
    /// makes generation fail.
    pub fn set_courts(&mut self, courts: u32) {
        self.courts = courts;
    }

    /// Matches ordered by (time slot, court).
    pub fn matches_sorted(&self) -> Vec<&Match> {
        let mut matches: Vec<&Match> = self.matches.iter().collect();
        matches.sort_by_key(|m| (m.time_slot(), m.court()));
        matches
    }

    /// Replace the stored schedule in one step.
    pub fn replace_schedule(&mut self, matches: Vec<Match>, summary: ScheduleSummary) {
        self.matches = matches;
        self.schedule = Some(summary);
    }

    /// Drop the matches and the schedule summary.
    pub fn clear_schedule(&mut self) {
        self.matches.clear();
        self.schedule = None;
    }

    /// Drop everything except the court capacity.
    pub fn clear(&mut self) {
        *self = Self::new(self.courts);
    }

    /// Replace the whole state with `snapshot` after checking it is consistent.
    ///
    /// Checks, in order:
    /// 1. team names are non-blank and unique (case-insensitive)
    /// 2. every player belongs to an existing team
    /// 3. every lineup names two different players of its own team, at most
    ///    one lineup per team and discipline
    /// 4. every match is between existing teams and its winner played in it
    /// 5. the matches have no player or court conflicts
    ///
    /// On any failure the current state is left untouched.
    pub fn import(&mut self, snapshot: Tournament) -> Result<(), TournamentError> {
        let invalid = |reason: String| -> Result<(), TournamentError> {
            Err(TournamentError::InvalidImport(reason))
        };

        let mut names = HashSet::new();
        for team in &snapshot.teams {
            if team.name.trim().is_empty() {
                return Err(TournamentError::EmptyName);
            }
            if !names.insert(team.name.trim().to_lowercase()) {
                return Err(TournamentError::DuplicateTeamName);
            }
        }

        for player in &snapshot.players {
            if snapshot.team(player.team_id).is_none() {
                return invalid(format!("player {} references unknown team {}", player.id, player.team_id));
            }
        }

        let mut seen = HashSet::new();
        for lineup in &snapshot.lineups {
            if snapshot.team(lineup.team_id).is_none() {
                return invalid(format!("lineup {} references unknown team {}", lineup.id, lineup.team_id));
            }
            if lineup.players[0] == lineup.players[1] {
                return Err(TournamentError::InvalidLineup);
            }
            for &pid in &lineup.players {
                let player = snapshot.player(pid).ok_or(TournamentError::PlayerNotFound(pid))?;
                if player.team_id != lineup.team_id {
                    return Err(TournamentError::PlayerNotOnTeam(pid));
                }
            }
            if !seen.insert((lineup.team_id, lineup.discipline)) {
                return invalid(format!(
                    "team {} has more than one {} lineup",
                    lineup.team_id, lineup.discipline
                ));
            }
        }

        for m in &snapshot.matches {
            let f = m.fixture();
            for team in [f.team_a, f.team_b] {
                if snapshot.team(team).is_none() {
                    return invalid(format!("match {} references unknown team {}", m.id, team));
                }
            }
            if let Some(w) = m.winner {
                if !f.involves_team(w) {
                    return Err(TournamentError::InvalidWinner(w));
                }
            }
        }

        let conflicts = validate_schedule(snapshot.matches.iter().map(|m| &m.scheduled));
        if !conflicts.is_empty() {
            return Err(TournamentError::InvalidSchedule(conflicts));
        }

        log::info!(
            "Imported tournament with {} teams, {} players, {} matches",
            snapshot.teams.len(),
            snapshot.players.len(),
            snapshot.matches.len()
        );
        *self = snapshot;
        Ok(())
    }
}
