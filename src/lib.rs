//! Debate tournament tab system: library with models, business logic and persistence.

pub mod config;
pub mod logic;
pub mod models;
pub mod storage;

pub use config::AppConfig;
pub use logic::{
    advance_stage, generate_matchups, rank_debaters, rank_teams, show_top_performers,
    submit_match_result, top_debaters, top_teams, Change, Changes, DebaterStanding,
    ResultInputProvider, StageAdvance, TopPerformers,
};
pub use models::{
    DebateMatch, Debater, DebaterId, MatchId, MatchResult, MatchupState, ScoreSheet, Side, Stage,
    Team, TeamId, TeamStatus, Tournament, TournamentError, TournamentKey,
};
pub use storage::{persist_changes, CsvStore, StorageConfig, StorageError, TournamentStore};
