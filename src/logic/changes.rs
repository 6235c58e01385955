//! What a completed core operation changed, for the persistence collaborator to write out.

use crate::logic::ranking::DebaterStanding;
use crate::models::{Stage, Team};

/// One thing that needs persisting after an operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    /// Metadata, stage or any team/debater statistic changed.
    Tournament,
    /// The current stage's match list changed.
    Matches,
    /// Full ranked team list to export, as ranked during `stage`.
    TopTeams { stage: Stage, teams: Vec<Team> },
    /// Full ranked debater list to export, as ranked during `stage`.
    TopDebaters {
        stage: Stage,
        debaters: Vec<DebaterStanding>,
    },
}

/// Ordered set of changes emitted by a single operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changes(Vec<Change>);

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    /// Record a change; `Tournament` and `Matches` are recorded at most once.
    pub fn push(&mut self, change: Change) {
        let seen = match change {
            Change::Tournament | Change::Matches => self.0.contains(&change),
            _ => false,
        };
        if !seen {
            self.0.push(change);
        }
    }

    pub fn with(mut self, change: Change) -> Self {
        self.push(change);
        self
    }

    pub fn extend(&mut self, other: Changes) {
        for change in other.0 {
            self.push(change);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, change: &Change) -> bool {
        self.0.contains(change)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.0.iter()
    }
}
