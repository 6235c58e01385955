//! Integration tests for pairing: first round, win/loss brackets and elimination seeding.

mod common;

use common::team;
use debate_tab::logic::{elimination_pairs, first_round_pairs, pairs_for_stage, win_loss_pairs};
use debate_tab::{Stage, Team, TeamId, TeamStatus, TournamentError};
use std::collections::HashSet;

fn plain_teams(n: u32) -> Vec<Team> {
    (1..=n).map(|i| team(i, 0, 0.0, TeamStatus::NotPlayed)).collect()
}

fn assert_each_team_once(pairs: &[(TeamId, TeamId)], teams: &[Team]) {
    let mut seen = HashSet::new();
    for &(a, b) in pairs {
        assert_ne!(a, b);
        assert!(seen.insert(a), "team {a} paired twice");
        assert!(seen.insert(b), "team {b} paired twice");
    }
    let all: HashSet<TeamId> = teams.iter().map(|t| t.id).collect();
    assert_eq!(seen, all);
}

#[test]
fn first_round_pairs_in_input_order() {
    for n in [2, 4, 6, 10, 32] {
        let teams = plain_teams(n);
        let pairs = first_round_pairs(&teams).unwrap();
        assert_eq!(pairs.len(), n as usize / 2);
        assert_each_team_once(&pairs, &teams);
    }
    let pairs = first_round_pairs(&plain_teams(4)).unwrap();
    assert_eq!(pairs, vec![(1, 2), (3, 4)]);
}

#[test]
fn first_round_rejects_odd_and_empty() {
    let err = first_round_pairs(&plain_teams(5)).unwrap_err();
    assert_eq!(err, TournamentError::OddTeamCount(5));
    assert!(err.is_validation());
    assert_eq!(
        first_round_pairs(&[]),
        Err(TournamentError::OddTeamCount(0))
    );
}

#[test]
fn win_loss_sorts_winners_by_score_desc_and_losers_by_score_asc() {
    let teams = vec![
        team(1, 1, 50.0, TeamStatus::Win),
        team(2, 0, 40.0, TeamStatus::Lose),
        team(3, 1, 70.0, TeamStatus::Win),
        team(4, 0, 30.0, TeamStatus::Lose),
        team(5, 1, 60.0, TeamStatus::Win),
        team(6, 0, 45.0, TeamStatus::Lose),
        team(7, 1, 80.0, TeamStatus::Win),
        team(8, 0, 35.0, TeamStatus::Lose),
    ];
    let pairs = win_loss_pairs(&teams).unwrap();
    // winners: 7(80) 3(70) 5(60) 1(50); losers: 4(30) 8(35) 2(40) 6(45)
    assert_eq!(pairs, vec![(7, 3), (5, 1), (4, 8), (2, 6)]);
}

#[test]
fn win_loss_ranks_by_wins_before_score() {
    let teams = vec![
        team(1, 1, 90.0, TeamStatus::Win),
        team(2, 2, 10.0, TeamStatus::Win),
        team(3, 0, 5.0, TeamStatus::Lose),
        team(4, 1, 50.0, TeamStatus::Lose),
    ];
    let pairs = win_loss_pairs(&teams).unwrap();
    assert_eq!(pairs, vec![(2, 1), (4, 3)]);
}

#[test]
fn win_loss_moves_lowest_winner_when_both_groups_are_odd() {
    let teams = vec![
        team(1, 1, 60.0, TeamStatus::Win),
        team(2, 1, 50.0, TeamStatus::Win),
        team(3, 1, 40.0, TeamStatus::Win),
        team(4, 0, 30.0, TeamStatus::Lose),
        team(5, 0, 20.0, TeamStatus::Lose),
        team(6, 0, 10.0, TeamStatus::Lose),
    ];
    let pairs = win_loss_pairs(&teams).unwrap();
    // team 3 is the lowest winner; it is appended after the sorted losers 6, 5, 4
    assert_eq!(pairs, vec![(1, 2), (6, 5), (4, 3)]);
    assert_each_team_once(&pairs, &teams);
}

#[test]
fn win_loss_pairs_every_team_exactly_once() {
    for n in [2u32, 4, 6, 8, 10, 12, 16] {
        let teams: Vec<Team> = (1..=n)
            .map(|i| {
                let status = if i % 2 == 0 { TeamStatus::Win } else { TeamStatus::Lose };
                team(i, i % 3, f64::from(i * 7 % 11), status)
            })
            .collect();
        let pairs = win_loss_pairs(&teams).unwrap();
        assert_eq!(pairs.len(), n as usize / 2);
        assert_each_team_once(&pairs, &teams);
    }
}

#[test]
fn win_loss_rejects_mismatched_groups() {
    let teams = vec![
        team(1, 1, 0.0, TeamStatus::Win),
        team(2, 1, 0.0, TeamStatus::Win),
        team(3, 1, 0.0, TeamStatus::Win),
        team(4, 1, 0.0, TeamStatus::Win),
        team(5, 0, 0.0, TeamStatus::Lose),
        team(6, 0, 0.0, TeamStatus::Lose),
    ];
    assert_eq!(
        win_loss_pairs(&teams),
        Err(TournamentError::UnbalancedBrackets {
            winners: 4,
            losers: 2
        })
    );
}

#[test]
fn win_loss_rejects_teams_that_have_not_played() {
    let teams = vec![
        team(1, 1, 0.0, TeamStatus::Win),
        team(2, 0, 0.0, TeamStatus::Lose),
        team(3, 0, 0.0, TeamStatus::NotPlayed),
        team(4, 0, 0.0, TeamStatus::NotPlayed),
    ];
    assert_eq!(
        win_loss_pairs(&teams),
        Err(TournamentError::TeamsNotPlayed(vec![3, 4]))
    );
    assert!(win_loss_pairs(&[]).is_err());
}

#[test]
fn elimination_pairs_highest_seed_with_lowest() {
    let pairs = elimination_pairs(&plain_teams(8)).unwrap();
    assert_eq!(pairs, vec![(1, 8), (2, 7), (3, 6), (4, 5)]);
    assert_eq!(elimination_pairs(&plain_teams(2)).unwrap(), vec![(1, 2)]);
    assert_eq!(
        elimination_pairs(&plain_teams(7)),
        Err(TournamentError::OddTeamCount(7))
    );
}

#[test]
fn stage_selects_its_pairing_rule() {
    let teams = plain_teams(4);
    assert_eq!(
        pairs_for_stage(Stage::Preliminary1, &teams).unwrap(),
        vec![(1, 2), (3, 4)]
    );
    assert!(matches!(
        pairs_for_stage(Stage::Preliminary2, &teams),
        Err(TournamentError::TeamsNotPlayed(_))
    ));
    assert_eq!(
        pairs_for_stage(Stage::SemiFinal, &teams).unwrap(),
        vec![(1, 4), (2, 3)]
    );
}
