//! Pairing: which teams debate each other in a stage.
//!
//! Every function returns pairs of team ids in which each input team appears exactly once,
//! or an error. No function drops a team to make the numbers work.

use crate::models::{PairingRule, Stage, Team, TeamId, TeamStatus, TournamentError};
use std::cmp::Ordering;

/// A scheduled pairing: (team A, team B).
pub type Pairing = (TeamId, TeamId);

fn require_even(teams: &[Team]) -> Result<(), TournamentError> {
    if teams.is_empty() || teams.len() % 2 != 0 {
        return Err(TournamentError::OddTeamCount(teams.len()));
    }
    Ok(())
}

fn consecutive_pairs(teams: &[&Team]) -> Vec<Pairing> {
    teams.chunks_exact(2).map(|c| (c[0].id, c[1].id)).collect()
}

/// First preliminary round: pair teams in input order, (0,1), (2,3), ...
pub fn first_round_pairs(teams: &[Team]) -> Result<Vec<Pairing>, TournamentError> {
    require_even(teams)?;
    let refs: Vec<&Team> = teams.iter().collect();
    Ok(consecutive_pairs(&refs))
}

fn winner_order(a: &&Team, b: &&Team) -> Ordering {
    b.wins.cmp(&a.wins).then(b.score.total_cmp(&a.score))
}

/// Among losers with equal wins, the lowest score comes first.
fn loser_order(a: &&Team, b: &&Team) -> Ordering {
    b.wins.cmp(&a.wins).then(a.score.total_cmp(&b.score))
}

/// Second and third preliminary rounds: winners of the last round debate winners, losers debate losers.
///
/// Winners are ranked by (wins desc, score desc), losers by (wins desc, score asc). When both
/// groups are odd, the lowest-ranked winner joins the end of the losers. Winner pairs come first.
pub fn win_loss_pairs(teams: &[Team]) -> Result<Vec<Pairing>, TournamentError> {
    let not_played: Vec<TeamId> = teams
        .iter()
        .filter(|t| t.status == TeamStatus::NotPlayed)
        .map(|t| t.id)
        .collect();
    if !not_played.is_empty() {
        return Err(TournamentError::TeamsNotPlayed(not_played));
    }

    let mut winners: Vec<&Team> = teams.iter().filter(|t| t.status == TeamStatus::Win).collect();
    let mut losers: Vec<&Team> = teams.iter().filter(|t| t.status == TeamStatus::Lose).collect();
    winners.sort_by(winner_order);
    losers.sort_by(loser_order);

    if winners.is_empty() || winners.len() != losers.len() {
        return Err(TournamentError::UnbalancedBrackets {
            winners: winners.len(),
            losers: losers.len(),
        });
    }

    if winners.len() % 2 != 0 && losers.len() % 2 != 0 {
        if let Some(last) = winners.pop() {
            losers.push(last);
        }
    }
    if winners.len() % 2 != 0 || losers.len() % 2 != 0 {
        return Err(TournamentError::UnbalancedBrackets {
            winners: winners.len(),
            losers: losers.len(),
        });
    }

    let mut pairs = consecutive_pairs(&winners);
    pairs.extend(consecutive_pairs(&losers));
    Ok(pairs)
}

/// Elimination rounds: teams are in seed order; seed 1 meets seed n, seed 2 meets seed n-1, ...
pub fn elimination_pairs(teams: &[Team]) -> Result<Vec<Pairing>, TournamentError> {
    require_even(teams)?;
    let n = teams.len();
    Ok((0..n / 2).map(|i| (teams[i].id, teams[n - 1 - i].id)).collect())
}

/// Pair `teams` with the rule of `stage`.
pub fn pairs_for_stage(stage: Stage, teams: &[Team]) -> Result<Vec<Pairing>, TournamentError> {
    match stage.pairing_rule() {
        PairingRule::FirstRound => first_round_pairs(teams),
        PairingRule::WinLoss => win_loss_pairs(teams),
        PairingRule::Elimination => elimination_pairs(teams),
    }
}
