//! Integration tests for team and debater rankings.

mod common;

use common::team;
use debate_tab::{rank_teams, top_debaters, top_teams, TeamStatus};

#[test]
fn top_teams_orders_by_wins_then_score() {
    let a = team(1, 2, 10.0, TeamStatus::Win);
    let b = team(2, 2, 20.0, TeamStatus::Win);
    let c = team(3, 1, 100.0, TeamStatus::Lose);
    let top = top_teams(&[a, b, c], 2);
    let ids: Vec<u32> = top.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn top_teams_returns_everyone_when_fewer_than_n() {
    let teams = vec![
        team(1, 0, 5.0, TeamStatus::Lose),
        team(2, 1, 1.0, TeamStatus::Win),
    ];
    let ids: Vec<u32> = top_teams(&teams, 16).iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(top_teams(&teams, 0).is_empty());
}

#[test]
fn exact_ties_keep_input_order_and_repeat_identically() {
    let teams: Vec<_> = (1..=6)
        .map(|i| team(i, 1, 50.0, TeamStatus::Win))
        .collect();
    let first = rank_teams(&teams);
    let second = rank_teams(&teams);
    assert_eq!(first, second);
    let ids: Vec<u32> = first.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn top_debaters_flattens_all_teams() {
    let mut a = team(1, 0, 0.0, TeamStatus::NotPlayed);
    let mut b = team(2, 0, 0.0, TeamStatus::NotPlayed);
    a.debaters[0].add_score(60);
    a.debaters[2].add_score(90);
    b.debaters[1].add_score(75);
    b.debaters[2].add_score(90);

    let top = top_debaters(&[a, b], 3);
    let who: Vec<(u32, u32)> = top.iter().map(|s| (s.team_id, s.debater.id)).collect();
    // 90 (team 1), 90 (team 2) in input order, then 75
    assert_eq!(who, vec![(1, 3), (2, 3), (2, 2)]);
    assert_eq!(top[0].team_name, "Team 1");

    let everyone = top_debaters(&[team(3, 0, 0.0, TeamStatus::NotPlayed)], 5);
    assert_eq!(everyone.len(), 3);
}
