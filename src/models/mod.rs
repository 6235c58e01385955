//! Data structures for the debate tournament: debaters, teams, matches, stages, tournament.

mod debater;
mod matchup;
mod stage;
mod team;
mod tournament;

pub use debater::{Debater, DebaterId};
pub use matchup::{DebateMatch, MatchId, MatchResult, ScoreSheet, Side, SideScores};
pub use stage::{PairingRule, Stage};
pub use team::{Team, TeamId, TeamStatus, TEAM_SIZE};
pub use tournament::{MatchupState, Tournament, TournamentError, TournamentKey};
