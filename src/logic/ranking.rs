//! Ranking of teams and debaters. All sorts are stable: exact ties keep their input order.

use crate::models::{Debater, Team, TeamId};
use serde::{Deserialize, Serialize};

/// A debater together with the team they speak for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebaterStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub debater: Debater,
}

/// All teams ordered by wins (desc), then team score (desc).
pub fn rank_teams(teams: &[Team]) -> Vec<Team> {
    let mut sorted = teams.to_vec();
    sorted.sort_by(|a, b| b.wins.cmp(&a.wins).then(b.score.total_cmp(&a.score)));
    sorted
}

/// The first `n` of [`rank_teams`], or all of them if there are fewer.
pub fn top_teams(teams: &[Team], n: usize) -> Vec<Team> {
    let mut sorted = rank_teams(teams);
    sorted.truncate(n);
    sorted
}

/// All debaters of all teams ordered by individual score (desc).
pub fn rank_debaters(teams: &[Team]) -> Vec<DebaterStanding> {
    let mut all: Vec<DebaterStanding> = teams
        .iter()
        .flat_map(|t| {
            t.debaters.iter().map(move |d| DebaterStanding {
                team_id: t.id,
                team_name: t.name.clone(),
                debater: d.clone(),
            })
        })
        .collect();
    all.sort_by(|a, b| b.debater.individual_score.total_cmp(&a.debater.individual_score));
    all
}

pub fn top_debaters(teams: &[Team], n: usize) -> Vec<DebaterStanding> {
    let mut sorted = rank_debaters(teams);
    sorted.truncate(n);
    sorted
}
