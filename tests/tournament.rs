//! Integration tests for the tournament service: CRUD, schedule replacement, results, reports.

use doubles_tournament_web::logic::{
    back_to_back, inactive_players, pair_win_rates, player_win_rates, team_standings,
};
use doubles_tournament_web::{
    export_matches_csv, fill_random_results, generate_schedule, record_match_score, Discipline,
    Gender, MatchStatus, PlayerId, PlayerUpdate, ScheduleError, SetScore, TeamId, Tournament,
    TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Add a team with five players and a lineup for every given discipline.
fn add_team(t: &mut Tournament, name: &str, disciplines: &[Discipline]) -> (TeamId, Vec<PlayerId>) {
    let team = t.add_team(name).unwrap();
    let players: Vec<PlayerId> = (0..5)
        .map(|i| {
            let gender = if i == 4 { Gender::Female } else { Gender::Male };
            t.add_player(team, &format!("{name} P{i}"), gender, i + 1).unwrap()
        })
        .collect();
    for &d in disciplines {
        let pair = match d {
            Discipline::Md1 => [players[0], players[1]],
            Discipline::Md2 => [players[2], players[3]],
            Discipline::Xd1 => [players[0], players[4]],
        };
        t.set_lineup(team, d, pair).unwrap();
    }
    (team, players)
}

/// Finish the match of the given discipline with `winner`.
fn win(t: &mut Tournament, discipline: Discipline, winner: TeamId) {
    let id = t
        .matches
        .iter()
        .find(|m| m.fixture().discipline == discipline)
        .unwrap()
        .id;
    record_match_score(t, id, vec![], Some(winner)).unwrap();
}

fn tournament_with_teams(n: usize, courts: u32) -> Tournament {
    let mut t = Tournament::new(courts);
    for i in 0..n {
        add_team(&mut t, &format!("Team {i}"), &Discipline::ALL);
    }
    t
}

#[test]
fn team_names_are_trimmed_and_unique() {
    let mut t = Tournament::default();
    let id = t.add_team("  Smashers ").unwrap();
    assert_eq!(t.team(id).unwrap().name, "Smashers");
    assert_eq!(t.add_team("smashers"), Err(TournamentError::DuplicateTeamName));
    assert_eq!(t.add_team("   "), Err(TournamentError::EmptyName));
    let other = t.add_team("Drop Shots").unwrap();
    assert_eq!(t.rename_team(other, "SMASHERS"), Err(TournamentError::DuplicateTeamName));
    t.rename_team(other, "Net Kings").unwrap();
    assert_eq!(t.team(other).unwrap().name, "Net Kings");
}

#[test]
fn setting_a_lineup_twice_keeps_only_the_latest() {
    let mut t = Tournament::default();
    let (team, p) = add_team(&mut t, "A", &[Discipline::Md1]);
    t.set_lineup(team, Discipline::Md1, [p[2], p[3]]).unwrap();
    let lineups = t.team_lineups(team);
    assert_eq!(lineups.len(), 1);
    assert_eq!(lineups[0].players, [p[2], p[3]]);
}

#[test]
fn lineup_rules_are_enforced() {
    let mut t = Tournament::default();
    let (a, pa) = add_team(&mut t, "A", &[]);
    let (_, pb) = add_team(&mut t, "B", &[]);
    assert_eq!(
        t.set_lineup(a, Discipline::Md1, [pa[0], pa[0]]),
        Err(TournamentError::InvalidLineup)
    );
    assert_eq!(
        t.set_lineup(a, Discipline::Md1, [pa[0], pb[0]]),
        Err(TournamentError::PlayerNotOnTeam(pb[0]))
    );
    assert!(matches!(
        t.remove_lineup(a, Discipline::Xd1),
        Err(TournamentError::LineupNotFound { .. })
    ));
}

#[test]
fn removing_team_or_player_cascades() {
    let mut t = Tournament::default();
    let (a, pa) = add_team(&mut t, "A", &Discipline::ALL);
    let (b, _) = add_team(&mut t, "B", &Discipline::ALL);

    t.remove_player(pa[0]).unwrap();
    let remaining: Vec<Discipline> = t.team_lineups(a).iter().map(|l| l.discipline).collect();
    assert_eq!(remaining, vec![Discipline::Md2]);

    t.remove_team(b).unwrap();
    assert!(t.team(b).is_none());
    assert!(t.players.iter().all(|p| p.team_id != b));
    assert!(t.lineups.iter().all(|l| l.team_id != b));
    assert_eq!(t.remove_team(b), Err(TournamentError::TeamNotFound(b)));
}

#[test]
fn removing_a_scheduled_team_or_player_drops_the_schedule() {
    let mut t = Tournament::default();
    let (a, pa) = add_team(&mut t, "A", &Discipline::ALL);
    add_team(&mut t, "B", &Discipline::ALL);
    add_team(&mut t, "C", &Discipline::ALL);
    let bench = t.add_player(a, "Bench", Gender::Male, 9).unwrap();
    generate_schedule(&mut t).unwrap();

    // Not in any match: schedule stays.
    t.remove_player(bench).unwrap();
    assert_eq!(t.matches.len(), 9);
    assert!(t.schedule.is_some());

    t.remove_player(pa[1]).unwrap();
    assert!(t.matches.is_empty());
    assert!(t.schedule.is_none());

    generate_schedule(&mut t).unwrap();
    assert!(!t.matches.is_empty());
    t.remove_team(a).unwrap();
    assert!(t.matches.is_empty());
    assert!(t.schedule.is_none());
}

#[test]
fn update_player_changes_only_given_fields() {
    let mut t = Tournament::default();
    let (a, p) = add_team(&mut t, "A", &[]);
    t.update_player(
        p[1],
        PlayerUpdate {
            skill_rank: Some(9),
            ..Default::default()
        },
    )
    .unwrap();
    let player = t.player(p[1]).unwrap();
    assert_eq!(player.skill_rank, 9);
    assert_eq!(player.name, "A P1");
    assert_eq!(t.team_players(a).last().unwrap().id, p[1]);
}

#[test]
fn generate_requires_two_teams_with_lineups() {
    let mut t = Tournament::default();
    add_team(&mut t, "A", &Discipline::ALL);
    assert_eq!(generate_schedule(&mut t), Err(TournamentError::NotEnoughTeams));

    let (b, _) = add_team(&mut t, "B", &[]);
    assert_eq!(generate_schedule(&mut t), Err(TournamentError::MissingLineups(b)));
    assert!(t.matches.is_empty());
    assert!(t.schedule.is_none());
}

#[test]
fn generate_stores_matches_and_summary() {
    let mut t = tournament_with_teams(4, 2);
    generate_schedule(&mut t).unwrap();
    let summary = t.schedule.clone().unwrap();
    assert_eq!(t.matches.len(), 18);
    assert_eq!(summary.total_rounds, 6);
    assert_eq!(summary.courts_used, 2);
    let ids: Vec<_> = t.matches_sorted().iter().map(|m| m.id).collect();
    assert_eq!(summary.match_ids, ids);
    let max_slot = t.matches.iter().map(|m| m.time_slot()).max().unwrap();
    assert_eq!(summary.total_time_slots, max_slot + 1);
    assert!(t.matches.iter().all(|m| m.status == MatchStatus::Pending));
}

#[test]
fn failed_generation_keeps_previous_schedule() {
    let mut t = tournament_with_teams(3, 4);
    generate_schedule(&mut t).unwrap();
    let before_matches = t.matches.clone();
    let before_summary = t.schedule.clone();

    t.set_courts(0);
    let err = generate_schedule(&mut t).unwrap_err();
    assert!(matches!(
        err,
        TournamentError::Scheduling(ScheduleError::SlotLimitExceeded { .. })
    ));
    assert_eq!(t.matches, before_matches);
    assert_eq!(t.schedule, before_summary);
}

#[test]
fn regenerating_replaces_all_matches() {
    let mut t = tournament_with_teams(3, 4);
    generate_schedule(&mut t).unwrap();
    let old_ids: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    generate_schedule(&mut t).unwrap();
    assert_eq!(t.matches.len(), old_ids.len());
    assert!(t.matches.iter().all(|m| !old_ids.contains(&m.id)));
}

#[test]
fn recording_scores_sets_status() {
    let mut t = tournament_with_teams(2, 4);
    generate_schedule(&mut t).unwrap();
    let m = t.matches[0].clone();
    let set = SetScore {
        set: 1,
        team_a_score: 21,
        team_b_score: 17,
    };

    record_match_score(&mut t, m.id, vec![set], None).unwrap();
    assert_eq!(t.get_match(m.id).unwrap().status, MatchStatus::Ongoing);

    let team_a = m.fixture().team_a;
    record_match_score(&mut t, m.id, vec![set], Some(team_a)).unwrap();
    let stored = t.get_match(m.id).unwrap();
    assert_eq!(stored.status, MatchStatus::Finished);
    assert_eq!(stored.winner, Some(team_a));

    let outsider = uuid::Uuid::new_v4();
    assert_eq!(
        record_match_score(&mut t, m.id, vec![], Some(outsider)),
        Err(TournamentError::InvalidWinner(outsider))
    );
    let missing = uuid::Uuid::new_v4();
    let err = record_match_score(&mut t, missing, vec![], None).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn random_results_finish_every_match() {
    let mut t = tournament_with_teams(3, 4);
    generate_schedule(&mut t).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(fill_random_results(&mut t, &mut rng), 9);
    for m in &t.matches {
        assert_eq!(m.status, MatchStatus::Finished);
        let set = m.scores[0];
        let (winning, losing) = if m.winner == Some(m.fixture().team_a) {
            (set.team_a_score, set.team_b_score)
        } else {
            (set.team_b_score, set.team_a_score)
        };
        assert_eq!(winning, 21);
        assert!((2..=20).contains(&losing));
    }
    assert_eq!(fill_random_results(&mut t, &mut rng), 0);
}

#[test]
fn standings_rank_by_win_rate() {
    let mut t = tournament_with_teams(2, 4);
    generate_schedule(&mut t).unwrap();
    let (a, b) = (t.teams[0].id, t.teams[1].id);
    let ids: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    record_match_score(&mut t, ids[0], vec![], Some(b)).unwrap();
    record_match_score(&mut t, ids[1], vec![], Some(b)).unwrap();
    record_match_score(&mut t, ids[2], vec![], Some(a)).unwrap();

    let standings = team_standings(&t);
    assert_eq!(standings[0].team_id, b);
    assert_eq!((standings[0].wins, standings[0].losses), (2, 1));
    assert_eq!(standings[1].team_id, a);
    assert!((standings[1].win_rate - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn back_to_back_lists_players_in_adjacent_slots() {
    // B has no XD1, so only MD1 is played at first; then player 0 of A joins MD2 too.
    let mut t = Tournament::new(1);
    let (a, pa) = add_team(&mut t, "A", &[Discipline::Md1, Discipline::Xd1]);
    add_team(&mut t, "B", &[Discipline::Md1, Discipline::Md2]);
    generate_schedule(&mut t).unwrap();
    assert_eq!(t.matches.len(), 1);
    assert!(back_to_back(&t).is_empty());

    t.set_lineup(a, Discipline::Md2, [pa[0], pa[2]]).unwrap();
    generate_schedule(&mut t).unwrap();
    let repeats = back_to_back(&t);
    assert_eq!(repeats.len(), 1);
    assert_eq!(repeats[0].player_id, pa[0]);
    assert_eq!((repeats[0].first_slot, repeats[0].second_slot), (0, 1));
}

#[test]
fn csv_export_has_header_and_one_row_per_match() {
    let mut t = tournament_with_teams(3, 2);
    generate_schedule(&mut t).unwrap();
    let csv = export_matches_csv(&t).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 1 + 9);
    assert!(lines[0].starts_with("round,time_slot,court,discipline,team_a,team_b"));
    assert!(lines[1].starts_with("1,0,1,MD1,Team 0,Team 1"));
}

#[test]
fn player_and_pair_win_rates_credit_the_winning_side() {
    let mut t = Tournament::new(4);
    let (a, pa) = add_team(&mut t, "A", &[Discipline::Md1, Discipline::Md2]);
    let (b, pb) = add_team(&mut t, "B", &[Discipline::Md1, Discipline::Md2]);
    generate_schedule(&mut t).unwrap();
    win(&mut t, Discipline::Md1, a);
    win(&mut t, Discipline::Md2, b);

    let players = player_win_rates(&t);
    assert_eq!(players.len(), 8);
    assert!(players.iter().all(|r| r.played == 1));
    let winners: Vec<PlayerId> = players[..4].iter().map(|r| r.player_id).collect();
    for p in [pa[0], pa[1], pb[2], pb[3]] {
        assert!(winners.contains(&p));
    }
    assert!(players[..4].iter().all(|r| r.wins == 1 && r.win_rate == 1.0));
    assert!(players[4..].iter().all(|r| r.wins == 0 && r.win_rate == 0.0));
    let a0 = players.iter().find(|r| r.player_id == pa[0]).unwrap();
    assert_eq!(a0.name, "A P0");

    let pairs = pair_win_rates(&t);
    assert_eq!(pairs.len(), 4);
    let sorted = |mut p: [PlayerId; 2]| {
        p.sort();
        p
    };
    let top: Vec<[PlayerId; 2]> = pairs[..2].iter().map(|r| r.players).collect();
    assert!(top.contains(&sorted([pa[0], pa[1]])));
    assert!(top.contains(&sorted([pb[2], pb[3]])));
    assert!(pairs.iter().all(|r| r.players[0] < r.players[1]));
    assert!(pairs[2..].iter().all(|r| r.wins == 0 && r.played == 1));
}

#[test]
fn win_rate_ties_are_broken_by_wins() {
    // A0 plays MD1 and XD1 for A; both are won, so A0 has 2/2 and leads A1 and A4 at 1/1.
    let mut t = tournament_with_teams(2, 4);
    let (a, b) = (t.teams[0].id, t.teams[1].id);
    let a0 = t.team_players(a)[0].id;
    generate_schedule(&mut t).unwrap();
    win(&mut t, Discipline::Md1, a);
    win(&mut t, Discipline::Xd1, a);
    win(&mut t, Discipline::Md2, b);

    let players = player_win_rates(&t);
    assert_eq!(players[0].player_id, a0);
    assert_eq!((players[0].wins, players[0].played), (2, 2));
    assert!(players[1..5].iter().all(|r| r.wins == 1 && r.win_rate == 1.0));
    assert!(players[5..].iter().all(|r| r.wins == 0));
    assert!(players
        .windows(2)
        .all(|w| w[0].win_rate > w[1].win_rate
            || (w[0].win_rate == w[1].win_rate && w[0].wins >= w[1].wins)));
}

#[test]
fn inactive_players_sat_out_two_used_slots() {
    // Two full teams play MD1, MD2, XD1 in slots 0, 1, 2.
    let mut t = tournament_with_teams(2, 4);
    let a = t.teams[0].id;
    let bench = t.add_player(a, "Bench", Gender::Female, 9).unwrap();
    assert_eq!(inactive_players(&t).len(), 11);

    generate_schedule(&mut t).unwrap();
    let inactive = inactive_players(&t);
    // P1 of each team only plays MD1 in slot 0; slots 1 and 2 follow.
    let names: Vec<&str> = inactive.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Team 0 P1", "Team 1 P1", "Bench"]);
    assert_eq!(inactive[0].last_slot, Some(0));
    assert_eq!(inactive[2].player_id, bench);
    assert_eq!(inactive[2].last_slot, None);
}

#[test]
fn import_replaces_state_with_a_consistent_snapshot() {
    let mut source = tournament_with_teams(3, 2);
    generate_schedule(&mut source).unwrap();
    let json = serde_json::to_string(&source).unwrap();
    let snapshot: Tournament = serde_json::from_str(&json).unwrap();

    let mut t = tournament_with_teams(1, 4);
    t.import(snapshot).unwrap();
    assert_eq!(t.teams, source.teams);
    assert_eq!(t.players, source.players);
    assert_eq!(t.lineups, source.lineups);
    assert_eq!(t.matches, source.matches);
    assert_eq!(t.schedule, source.schedule);
    assert_eq!(t.courts, 2);
}

#[test]
fn import_rejects_inconsistent_snapshots_and_keeps_state() {
    let mut source = tournament_with_teams(2, 4);
    generate_schedule(&mut source).unwrap();
    let mut t = tournament_with_teams(3, 4);
    let before = serde_json::to_value(&t).unwrap();

    // Lineup with a player from the other team.
    let mut foreign = source.clone();
    let other = foreign.players.iter().find(|p| p.team_id == foreign.teams[1].id).unwrap().id;
    foreign.lineups[0].players[1] = other;
    assert_eq!(t.import(foreign), Err(TournamentError::PlayerNotOnTeam(other)));

    // Player of a team that is not in the snapshot.
    let mut orphan = source.clone();
    orphan.players[0].team_id = uuid::Uuid::new_v4();
    assert!(matches!(t.import(orphan), Err(TournamentError::InvalidImport(_))));

    // Two lineups for the same team and discipline.
    let mut doubled = source.clone();
    let copy = doubled.lineups[0].clone();
    doubled.lineups.push(copy);
    assert!(matches!(t.import(doubled), Err(TournamentError::InvalidImport(_))));

    // Two matches on the same court in the same slot.
    let mut clash = source.clone();
    let (slot, court) = (clash.matches[0].time_slot(), clash.matches[0].court());
    clash.matches[1].scheduled.time_slot = slot;
    clash.matches[1].scheduled.court = court;
    match t.import(clash) {
        Err(TournamentError::InvalidSchedule(conflicts)) => {
            assert_eq!(
                conflicts,
                vec![format!("Time slot {slot} court {court} is assigned to more than one match")]
            );
        }
        other => panic!("expected a schedule conflict, got {other:?}"),
    }

    assert_eq!(serde_json::to_value(&t).unwrap(), before);
}
