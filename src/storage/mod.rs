//! Persistence of tournament snapshots, matchups and ranking exports.
//!
//! The core never calls storage itself. Operations return [`Changes`] and the caller hands
//! them to [`persist_changes`] once the operation has completed.

mod csv_store;

pub use csv_store::CsvStore;

use crate::logic::{Change, Changes, DebaterStanding};
use crate::models::{DebateMatch, Stage, Team, TeamId, Tournament};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A file exists but does not hold a valid snapshot.
    #[error("Corrupt snapshot {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// A stored match refers to a team the tournament does not have.
    #[error("Stored match refers to unknown team {team_id}")]
    UnknownTeam { team_id: TeamId },
}

/// Where snapshots live on disk.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Tournament snapshots (one file per tournament).
    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }

    /// Matchups and ranking exports.
    pub fn docs_dir(&self) -> PathBuf {
        self.data_dir.join("docs")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("./data")
    }
}

/// The persistence collaborator of the core.
pub trait TournamentStore {
    /// Every stored tournament that can be read; unreadable snapshots are skipped.
    fn load_all_tournaments(&self) -> Vec<Tournament>;

    /// Write the full snapshot, replacing any earlier one with the same name and year.
    fn persist_tournament(&self, tournament: &Tournament) -> Result<(), StorageError>;

    /// Write the match list of the tournament's current stage.
    fn persist_matches(
        &self,
        matches: &[DebateMatch],
        tournament: &Tournament,
    ) -> Result<(), StorageError>;

    fn persist_top_teams(
        &self,
        teams: &[Team],
        stage: Stage,
        tournament: &Tournament,
    ) -> Result<(), StorageError>;

    fn persist_top_debaters(
        &self,
        debaters: &[DebaterStanding],
        stage: Stage,
        tournament: &Tournament,
    ) -> Result<(), StorageError>;

    /// Matches stored for the tournament's current stage; empty if none were stored.
    fn load_matches(&self, tournament: &Tournament) -> Result<Vec<DebateMatch>, StorageError>;
}

/// Write out everything an operation reported as changed.
pub fn persist_changes(
    store: &dyn TournamentStore,
    tournament: &Tournament,
    changes: &Changes,
) -> Result<(), StorageError> {
    for change in changes.iter() {
        match change {
            Change::Tournament => store.persist_tournament(tournament)?,
            Change::Matches => store.persist_matches(tournament.matches(), tournament)?,
            Change::TopTeams { stage, teams } => {
                store.persist_top_teams(teams, *stage, tournament)?
            }
            Change::TopDebaters { stage, debaters } => {
                store.persist_top_debaters(debaters, *stage, tournament)?
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_config_paths() {
        let config = StorageConfig::new("/data");
        assert_eq!(config.records_dir(), PathBuf::from("/data/records"));
        assert_eq!(config.docs_dir(), PathBuf::from("/data/docs"));
        assert_eq!(StorageConfig::default().data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn storage_errors_convert_and_keep_their_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(err.to_string(), "IO error: gone");
        assert!(err.source().is_some());

        let err = StorageError::Corrupt {
            path: PathBuf::from("records/x.csv"),
            reason: "empty snapshot".to_string(),
        };
        assert_eq!(err.to_string(), "Corrupt snapshot records/x.csv: empty snapshot");
        assert!(err.source().is_none());
        assert_eq!(
            StorageError::UnknownTeam { team_id: 7 }.to_string(),
            "Stored match refers to unknown team 7"
        );
    }
}
