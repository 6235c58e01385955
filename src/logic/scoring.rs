//! Scoring: apply a submitted match result to the teams and debaters.

use crate::logic::changes::{Change, Changes};
use crate::models::{
    MatchId, MatchResult, ScoreSheet, Side, SideScores, Team, Tournament, TournamentError,
    TEAM_SIZE,
};

/// Supplies the decisions the engine cannot make on its own.
pub trait ResultInputProvider {
    /// Pick the winner of a match whose totals are equal. `None` leaves the match incomplete.
    fn decide_tie(&mut self, team_a: &Team, team_b: &Team, total: u32) -> Option<Side>;
}

/// A decision fixed in advance (e.g. sent along with the scores).
impl ResultInputProvider for Option<Side> {
    fn decide_tie(&mut self, _team_a: &Team, _team_b: &Team, _total: u32) -> Option<Side> {
        *self
    }
}

fn validate_sheet(sheet: &ScoreSheet, side: &'static str) -> Result<SideScores, TournamentError> {
    let speeches: [u32; TEAM_SIZE] = sheet.speeches.as_slice().try_into().map_err(|_| {
        TournamentError::WrongScoreCount {
            side,
            got: sheet.speeches.len(),
        }
    })?;
    speeches
        .iter()
        .try_fold(sheet.rebuttal, |acc, &s| acc.checked_add(s))
        .ok_or(TournamentError::ScoreOutOfRange { side })?;
    Ok(SideScores {
        speeches,
        rebuttal: sheet.rebuttal,
    })
}

fn apply_side(team: &mut Team, scores: &SideScores, won: bool) {
    // Speech i belongs to the debater at roster position i.
    for (debater, &score) in team.debaters.iter_mut().zip(scores.speeches.iter()) {
        debater.add_score(score);
    }
    team.add_score(scores.total());
    if won {
        team.record_win();
    } else {
        team.record_loss();
    }
}

/// Submit the scores of a match in the current stage.
///
/// Nothing is changed unless the whole submission succeeds: both sheets must hold three speech
/// scores, the match must be open, and an exact tie needs a decision from `input`.
pub fn submit_match_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    team_a: &ScoreSheet,
    team_b: &ScoreSheet,
    input: &mut dyn ResultInputProvider,
) -> Result<Changes, TournamentError> {
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.is_completed() {
        return Err(TournamentError::MatchAlreadyCompleted(match_id));
    }
    let (a_id, b_id) = (m.team_a, m.team_b);

    let a_scores = validate_sheet(team_a, "A")?;
    let b_scores = validate_sheet(team_b, "B")?;
    let a_team = tournament.team(a_id).ok_or(TournamentError::TeamNotFound(a_id))?;
    let b_team = tournament.team(b_id).ok_or(TournamentError::TeamNotFound(b_id))?;

    let (a_total, b_total) = (a_scores.total(), b_scores.total());
    let (winner, decided_by_tie_break) = if a_total > b_total {
        (Side::A, false)
    } else if b_total > a_total {
        (Side::B, false)
    } else {
        let side = input
            .decide_tie(a_team, b_team, a_total)
            .ok_or(TournamentError::TieUnresolved(match_id))?;
        (side, true)
    };

    if let Some(team) = tournament.team_mut(a_id) {
        apply_side(team, &a_scores, winner == Side::A);
    }
    if let Some(team) = tournament.team_mut(b_id) {
        apply_side(team, &b_scores, winner == Side::B);
    }
    if let Some(m) = tournament.matches.iter_mut().find(|m| m.id == match_id) {
        m.complete(MatchResult {
            team_a: a_scores,
            team_b: b_scores,
            winner,
            decided_by_tie_break,
        });
    }

    log::info!(
        "Result for {} ({}): {} {} - {} {}{}",
        tournament.key(),
        tournament.stage,
        a_id,
        a_total,
        b_total,
        b_id,
        if decided_by_tie_break { " (tie decided)" } else { "" }
    );
    Ok(Changes::none()
        .with(Change::Matches)
        .with(Change::Tournament))
}

/// Zero every team's score, wins, losses and status, and every debater's score.
pub fn reset_scores(teams: &mut [Team]) {
    for team in teams {
        team.reset_stats();
    }
}
