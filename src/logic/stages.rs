//! Stage controller: generate matchups, report top performers, cut the field and advance.

use crate::logic::changes::{Change, Changes};
use crate::logic::pairing::pairs_for_stage;
use crate::logic::ranking::{rank_debaters, rank_teams, DebaterStanding};
use crate::logic::scoring::reset_scores;
use crate::models::{
    DebateMatch, MatchupState, PairingRule, Stage, Team, Tournament, TournamentError,
};
use serde::Serialize;

/// Teams shown by default when reporting top performers.
pub const DEFAULT_TOP_TEAMS: usize = 3;
/// Debaters shown by default when reporting top performers.
pub const DEFAULT_TOP_DEBATERS: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopPerformers {
    pub teams: Vec<Team>,
    pub debaters: Vec<DebaterStanding>,
}

/// What happened when advancing a stage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageAdvance {
    pub from: Stage,
    pub to: Stage,
    /// The tournament was already at the final; nothing moved.
    pub already_final: bool,
    pub top_performers: Option<TopPerformers>,
    /// Teams removed by the cut, in ranking order.
    pub eliminated: Vec<Team>,
}

/// Top `teams_n` teams and `debaters_n` debaters. The full rankings are emitted for export.
pub fn show_top_performers(
    tournament: &Tournament,
    teams_n: usize,
    debaters_n: usize,
) -> (TopPerformers, Changes) {
    let teams = rank_teams(tournament.teams());
    let debaters = rank_debaters(tournament.teams());
    let top = TopPerformers {
        teams: teams.iter().take(teams_n).cloned().collect(),
        debaters: debaters.iter().take(debaters_n).cloned().collect(),
    };
    let changes = Changes::none()
        .with(Change::TopTeams {
            stage: tournament.stage,
            teams,
        })
        .with(Change::TopDebaters {
            stage: tournament.stage,
            debaters,
        });
    (top, changes)
}

/// Generate the matches of the current stage.
///
/// Only generates when the stage has no matches yet. A stage with open matches keeps them
/// untouched; a stage whose matches are all completed fails with `StageComplete` so the
/// caller advances explicitly instead of replaying the stage.
pub fn generate_matchups(tournament: &mut Tournament) -> Result<Changes, TournamentError> {
    let stage = tournament.stage;
    match tournament.matchup_state() {
        MatchupState::Completed => return Err(TournamentError::StageComplete(stage)),
        MatchupState::InProgress { remaining } => {
            log::debug!("{} already has {} open match(es)", stage, remaining);
            return Ok(Changes::none());
        }
        MatchupState::NotGenerated => {}
    }

    let pairs = pairs_for_stage(stage, tournament.teams())?;
    let mut changes = Changes::none();
    if stage.pairing_rule() == PairingRule::Elimination {
        reset_scores(&mut tournament.teams);
        changes.push(Change::Tournament);
    }
    tournament.matches = pairs
        .into_iter()
        .map(|(a, b)| DebateMatch::new(a, b))
        .collect();
    changes.push(Change::Matches);

    log::info!(
        "Generated {} matchup(s) for {} ({})",
        tournament.matches.len(),
        tournament.key(),
        stage
    );
    Ok(changes)
}

/// Move the tournament to the next stage, cutting the field where the stage requires it.
///
/// At the final this reports top performers and leaves the stage unchanged.
pub fn advance_stage(
    tournament: &mut Tournament,
    teams_n: usize,
    debaters_n: usize,
) -> (StageAdvance, Changes) {
    let from = tournament.stage;
    let mut changes = Changes::none();

    let top_performers = if from.reports_top_performers() {
        let (top, exports) = show_top_performers(tournament, teams_n, debaters_n);
        changes.extend(exports);
        Some(top)
    } else {
        None
    };

    let Some(to) = from.next() else {
        log::info!("{} has already reached the final", tournament.key());
        changes.push(Change::Tournament);
        let advance = StageAdvance {
            from,
            to: from,
            already_final: true,
            top_performers,
            eliminated: Vec::new(),
        };
        return (advance, changes);
    };

    if let MatchupState::InProgress { remaining } = tournament.matchup_state() {
        log::warn!(
            "Advancing {} from {} with {} incomplete match(es)",
            tournament.key(),
            from,
            remaining
        );
    }

    let mut eliminated = Vec::new();
    if let Some(keep) = from.cut_on_exit() {
        let mut ranked = rank_teams(tournament.teams());
        if ranked.len() > keep {
            eliminated = ranked.split_off(keep);
        }
        tournament.teams = ranked;
    }
    tournament.stage = to;
    tournament.matches.clear();
    changes.push(Change::Tournament);
    changes.push(Change::Matches);

    log::info!(
        "{} advanced from {} to {} ({} team(s) cut)",
        tournament.key(),
        from,
        to,
        eliminated.len()
    );
    let advance = StageAdvance {
        from,
        to,
        already_final: false,
        top_performers,
        eliminated,
    };
    (advance, changes)
}
