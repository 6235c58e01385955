//! Shared builders for the integration tests.
#![allow(dead_code)]

use debate_tab::{Debater, Team, TeamId, TeamStatus, Tournament};

pub fn roster(prefix: &str) -> Vec<(String, String)> {
    (1..=3)
        .map(|i| (format!("{prefix}-{i}"), "Law".to_string()))
        .collect()
}

/// A team with the given record, outside any tournament.
pub fn team(id: TeamId, wins: u32, score: f64, status: TeamStatus) -> Team {
    let debaters = (1..=3)
        .map(|i| Debater::new(i, format!("T{id}-{i}"), "Law"))
        .collect();
    let mut t = Team::new(id, format!("Team {id}"), debaters).unwrap();
    t.wins = wins;
    t.score = score;
    t.status = status;
    t
}

/// A tournament with `n` teams named "Team 1".."Team n" (ids 1..=n).
pub fn tournament_with_teams(n: usize) -> Tournament {
    let mut t = Tournament::new("Debate Society", "Open", 2024);
    for i in 1..=n {
        t.add_team(&format!("Team {i}"), roster(&format!("T{i}")))
            .unwrap();
    }
    t
}
