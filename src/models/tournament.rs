//! Tournament, its key and errors.

use crate::models::debater::{Debater, DebaterId};
use crate::models::matchup::{DebateMatch, MatchId};
use crate::models::stage::Stage;
use crate::models::team::{Team, TeamId, TEAM_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A team must have exactly three debaters.
    WrongTeamSize { got: usize },
    /// Pairing needs an even, non-zero number of teams.
    OddTeamCount(usize),
    /// Winners and losers of the last round cannot be split into pairs.
    UnbalancedBrackets { winners: usize, losers: usize },
    /// Teams that have not played cannot be placed in a win/loss bracket.
    TeamsNotPlayed(Vec<TeamId>),
    /// A score sheet must hold exactly one speech score per debater.
    WrongScoreCount { side: &'static str, got: usize },
    /// The match total of a score sheet does not fit in a `u32`.
    ScoreOutOfRange { side: &'static str },
    /// Team names must be non-empty.
    EmptyName,
    /// A team with this name already exists (case-insensitive).
    DuplicateTeamName(String),
    TeamNotFound(TeamId),
    TeamNameNotFound(String),
    DebaterNotFound { team: TeamId, debater: DebaterId },
    MatchNotFound(MatchId),
    /// Results cannot be re-submitted.
    MatchAlreadyCompleted(MatchId),
    /// Totals are equal and no tie decision was supplied.
    TieUnresolved(MatchId),
    /// Every match of the stage is completed; advance the stage instead.
    StageComplete(Stage),
}

impl TournamentError {
    /// Validation errors: bad input that the caller must correct.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TournamentError::WrongTeamSize { .. }
                | TournamentError::OddTeamCount(_)
                | TournamentError::UnbalancedBrackets { .. }
                | TournamentError::TeamsNotPlayed(_)
                | TournamentError::WrongScoreCount { .. }
                | TournamentError::ScoreOutOfRange { .. }
                | TournamentError::EmptyName
                | TournamentError::DuplicateTeamName(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TeamNotFound(_)
                | TournamentError::TeamNameNotFound(_)
                | TournamentError::DebaterNotFound { .. }
                | TournamentError::MatchNotFound(_)
        )
    }
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentError::WrongTeamSize { got } => {
                write!(f, "A debate team must have exactly {} debaters (got {})", TEAM_SIZE, got)
            }
            TournamentError::OddTeamCount(n) => {
                write!(f, "Number of teams must be even and non-zero for pairing (got {})", n)
            }
            TournamentError::UnbalancedBrackets { winners, losers } => write!(
                f,
                "Winning and losing teams cannot be paired ({} winners, {} losers)",
                winners, losers
            ),
            TournamentError::TeamsNotPlayed(ids) => {
                write!(f, "{} team(s) have not played the previous round", ids.len())
            }
            TournamentError::WrongScoreCount { side, got } => write!(
                f,
                "Team {} must have exactly {} debater scores (got {})",
                side, TEAM_SIZE, got
            ),
            TournamentError::ScoreOutOfRange { side } => {
                write!(f, "Team {} scores are too large to add up", side)
            }
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::DuplicateTeamName(name) => {
                write!(f, "A team named '{}' already exists", name)
            }
            TournamentError::TeamNotFound(id) => write!(f, "Team {} not found", id),
            TournamentError::TeamNameNotFound(name) => write!(f, "Team '{}' not found", name),
            TournamentError::DebaterNotFound { team, debater } => {
                write!(f, "Debater {} not found in team {}", debater, team)
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::MatchAlreadyCompleted(_) => {
                write!(f, "Match result has already been submitted")
            }
            TournamentError::TieUnresolved(_) => {
                write!(f, "The scores are tied; a winner must be chosen")
            }
            TournamentError::StageComplete(stage) => write!(
                f,
                "All match results for {} have been submitted; advance to the next stage",
                stage
            ),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Tournaments are identified by name and year.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TournamentKey {
    pub name: String,
    pub year: u16,
}

impl fmt::Display for TournamentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.year)
    }
}

/// Where the current stage stands with respect to its matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum MatchupState {
    NotGenerated,
    InProgress { remaining: usize },
    Completed,
}

/// Full tournament state: metadata, stage, teams and the current stage's matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub club_name: String,
    pub name: String,
    pub year: u16,
    pub stage: Stage,
    pub(crate) teams: Vec<Team>,
    /// Matches of `stage` only; cleared whenever the stage changes.
    pub(crate) matches: Vec<DebateMatch>,
}

impl Tournament {
    /// Create a tournament at the first preliminary round with no teams.
    pub fn new(club_name: impl Into<String>, name: impl Into<String>, year: u16) -> Self {
        Self {
            club_name: club_name.into(),
            name: name.into(),
            year,
            stage: Stage::default(),
            teams: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Rebuild a tournament from a stored snapshot (matches are attached separately).
    pub fn restore(
        club_name: impl Into<String>,
        name: impl Into<String>,
        year: u16,
        stage: Stage,
        teams: Vec<Team>,
    ) -> Self {
        Self {
            stage,
            teams,
            ..Self::new(club_name, name, year)
        }
    }

    pub fn key(&self) -> TournamentKey {
        TournamentKey {
            name: self.name.clone(),
            year: self.year,
        }
    }

    /// Teams in current order (seed order after a cut).
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn matches(&self) -> &[DebateMatch] {
        &self.matches
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn find_match(&self, id: MatchId) -> Option<&DebateMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Replace the current matches with ones reloaded from storage.
    pub fn attach_matches(&mut self, matches: Vec<DebateMatch>) {
        self.matches = matches;
    }

    pub fn matchup_state(&self) -> MatchupState {
        if self.matches.is_empty() {
            return MatchupState::NotGenerated;
        }
        let remaining = self.matches.iter().filter(|m| !m.is_completed()).count();
        if remaining == 0 {
            MatchupState::Completed
        } else {
            MatchupState::InProgress { remaining }
        }
    }

    fn next_team_id(&self) -> TeamId {
        self.teams.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Add a team. `members` are (name, department) in speaking order; debaters get ids 1..=3.
    pub fn add_team(
        &mut self,
        name: &str,
        members: Vec<(String, String)>,
    ) -> Result<TeamId, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeamName(name.to_string()));
        }
        let debaters: Vec<Debater> = members
            .into_iter()
            .zip(1..)
            .map(|((n, dept), id)| Debater::new(id, n.trim(), dept.trim()))
            .collect();
        let id = self.next_team_id();
        let team = Team::new(id, name, debaters)?;
        self.teams.push(team);
        log::info!("Added team {} '{}' to {}", id, name, self.key());
        Ok(id)
    }

    /// Remove a team by name (case-insensitive).
    pub fn remove_team(&mut self, name: &str) -> Result<Team, TournamentError> {
        let name = name.trim();
        let idx = self
            .teams
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TournamentError::TeamNameNotFound(name.to_string()))?;
        let team = self.teams.remove(idx);
        log::info!("Removed team {} '{}' from {}", team.id, team.name, self.key());
        Ok(team)
    }

    /// Change a debater's name and/or department.
    pub fn update_debater(
        &mut self,
        team_id: TeamId,
        debater_id: DebaterId,
        name: Option<&str>,
        department: Option<&str>,
    ) -> Result<(), TournamentError> {
        let name = name.map(str::trim);
        if name.is_some_and(str::is_empty) {
            return Err(TournamentError::EmptyName);
        }
        let debater = self
            .team_mut(team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?
            .debater_mut(debater_id)
            .ok_or(TournamentError::DebaterNotFound {
                team: team_id,
                debater: debater_id,
            })?;
        if let Some(name) = name {
            debater.rename(name);
        }
        if let Some(department) = department {
            debater.set_department(department.trim());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(prefix: &str) -> Vec<(String, String)> {
        (1..=3)
            .map(|i| (format!("{prefix} speaker {i}"), "Law".to_string()))
            .collect()
    }

    #[test]
    fn new_tournament_starts_at_first_preliminary() {
        let t = Tournament::new("Debate Club", "Open", 2024);
        assert_eq!(t.stage, Stage::Preliminary1);
        assert!(t.teams().is_empty());
        assert_eq!(t.matchup_state(), MatchupState::NotGenerated);
    }

    #[test]
    fn add_team_rejects_wrong_roster_size() {
        let mut t = Tournament::new("Club", "Open", 2024);
        let mut two = members("A");
        two.pop();
        assert_eq!(
            t.add_team("A", two),
            Err(TournamentError::WrongTeamSize { got: 2 })
        );
        assert!(t.teams().is_empty());
    }

    #[test]
    fn team_ids_are_not_reused_after_removal() {
        let mut t = Tournament::new("Club", "Open", 2024);
        let a = t.add_team("A", members("A")).unwrap();
        let b = t.add_team("B", members("B")).unwrap();
        t.remove_team("a").unwrap();
        let c = t.add_team("C", members("C")).unwrap();
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn duplicate_and_missing_names() {
        let mut t = Tournament::new("Club", "Open", 2024);
        t.add_team("Owls", members("O")).unwrap();
        assert!(matches!(
            t.add_team(" owls ", members("X")),
            Err(TournamentError::DuplicateTeamName(_))
        ));
        let err = t.remove_team("Hawks").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(t.teams().len(), 1);
    }

    #[test]
    fn update_debater_renames_in_place() {
        let mut t = Tournament::new("Club", "Open", 2024);
        let id = t.add_team("Owls", members("O")).unwrap();
        t.update_debater(id, 2, Some("Ada"), Some("Maths")).unwrap();
        let d = t.team(id).unwrap().debater(2).unwrap();
        assert_eq!((d.name.as_str(), d.department.as_str()), ("Ada", "Maths"));
        assert_eq!(
            t.update_debater(id, 4, Some("X"), None),
            Err(TournamentError::DebaterNotFound { team: id, debater: 4 })
        );
        assert_eq!(
            t.update_debater(id, 1, Some("  "), None),
            Err(TournamentError::EmptyName)
        );
    }
}
