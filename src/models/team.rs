//! Team (three debaters) and its per-stage status.

use crate::models::debater::{Debater, DebaterId};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Identifier of a team, unique within a tournament.
pub type TeamId = u32;

/// Number of debaters on every team.
pub const TEAM_SIZE: usize = 3;

/// Outcome of the team's most recent match in the current stage.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    #[default]
    NotPlayed,
    Win,
    Lose,
}

impl TeamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStatus::NotPlayed => "not_played",
            TeamStatus::Win => "win",
            TeamStatus::Lose => "lose",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_played" => Some(TeamStatus::NotPlayed),
            "win" => Some(TeamStatus::Win),
            "lose" => Some(TeamStatus::Lose),
            _ => None,
        }
    }
}

/// A debate team. The roster is a fixed-size array, so a team can never hold other than three debaters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub debaters: [Debater; TEAM_SIZE],
    /// Sum of match totals (speeches + rebuttal) in the current scoring phase.
    pub score: f64,
    pub wins: u32,
    pub losses: u32,
    pub status: TeamStatus,
}

impl Team {
    /// Build a team from its roster. Fails unless exactly three debaters are given.
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        debaters: Vec<Debater>,
    ) -> Result<Self, TournamentError> {
        let got = debaters.len();
        let debaters: [Debater; TEAM_SIZE] = debaters
            .try_into()
            .map_err(|_| TournamentError::WrongTeamSize { got })?;
        Ok(Self {
            id,
            name: name.into(),
            debaters,
            score: 0.0,
            wins: 0,
            losses: 0,
            status: TeamStatus::NotPlayed,
        })
    }

    pub fn add_score(&mut self, total: u32) {
        self.score += f64::from(total);
    }

    /// Only called together with `record_loss` on the opponent.
    pub fn record_win(&mut self) {
        self.status = TeamStatus::Win;
        self.wins += 1;
    }

    /// Only called together with `record_win` on the opponent.
    pub fn record_loss(&mut self) {
        self.status = TeamStatus::Lose;
        self.losses += 1;
    }

    /// Zero team and debater statistics (start of the elimination phase).
    pub fn reset_stats(&mut self) {
        self.score = 0.0;
        self.wins = 0;
        self.losses = 0;
        self.status = TeamStatus::NotPlayed;
        for d in &mut self.debaters {
            d.reset_score();
        }
    }

    pub fn debater(&self, id: DebaterId) -> Option<&Debater> {
        self.debaters.iter().find(|d| d.id == id)
    }

    pub fn debater_mut(&mut self, id: DebaterId) -> Option<&mut Debater> {
        self.debaters.iter_mut().find(|d| d.id == id)
    }
}
