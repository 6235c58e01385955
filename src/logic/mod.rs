//! Tournament business logic: pairing, scoring, ranking and stage progression.

mod changes;
mod pairing;
mod ranking;
mod scoring;
mod stages;

pub use changes::{Change, Changes};
pub use pairing::{elimination_pairs, first_round_pairs, pairs_for_stage, win_loss_pairs, Pairing};
pub use ranking::{rank_debaters, rank_teams, top_debaters, top_teams, DebaterStanding};
pub use scoring::{reset_scores, submit_match_result, ResultInputProvider};
pub use stages::{
    advance_stage, generate_matchups, show_top_performers, StageAdvance, TopPerformers,
    DEFAULT_TOP_DEBATERS, DEFAULT_TOP_TEAMS,
};
