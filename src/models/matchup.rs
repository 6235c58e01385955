//! Debate match between two teams, with its score sheets once played.

use crate::models::team::{TeamId, TEAM_SIZE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of a match (team A or team B).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// Scores submitted for one team: speeches in roster order, then the rebuttal.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub speeches: Vec<u32>,
    pub rebuttal: u32,
}

impl ScoreSheet {
    pub fn new(speeches: impl Into<Vec<u32>>, rebuttal: u32) -> Self {
        Self {
            speeches: speeches.into(),
            rebuttal,
        }
    }
}

/// Validated scores for one side of a completed match. Their total fits in a `u32`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SideScores {
    pub speeches: [u32; TEAM_SIZE],
    pub rebuttal: u32,
}

impl SideScores {
    /// Match total: sum of speeches plus rebuttal.
    pub fn total(&self) -> u32 {
        self.speeches.iter().sum::<u32>() + self.rebuttal
    }
}

/// Result of a completed match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub team_a: SideScores,
    pub team_b: SideScores,
    pub winner: Side,
    /// True when the totals were equal and the winner came from an explicit decision.
    pub decided_by_tie_break: bool,
}

/// A match of the current stage. It is completed exactly when `result` is set, and a result is never replaced.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DebateMatch {
    pub id: MatchId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    result: Option<MatchResult>,
}

impl DebateMatch {
    pub fn new(team_a: TeamId, team_b: TeamId) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            result: None,
        }
    }

    /// Rebuild a match from storage.
    pub fn restore(id: MatchId, team_a: TeamId, team_b: TeamId, result: Option<MatchResult>) -> Self {
        Self {
            id,
            team_a,
            team_b,
            result,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::A => self.team_a,
            Side::B => self.team_b,
        }
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.result.map(|r| self.team(r.winner))
    }

    /// Mark the match completed. Returns false (and changes nothing) if it already was.
    pub(crate) fn complete(&mut self, result: MatchResult) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(result);
        true
    }
}
