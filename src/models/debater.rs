//! Debater: one member of a three-person team.

use serde::{Deserialize, Serialize};

/// Identifier of a debater, unique within its team (1, 2, 3 in roster order).
pub type DebaterId = u32;

/// A debater and their running individual score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Debater {
    pub id: DebaterId,
    pub name: String,
    pub department: String,
    /// Sum of speech scores across the current scoring phase.
    pub individual_score: f64,
}

impl Debater {
    pub fn new(id: DebaterId, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            department: department.into(),
            individual_score: 0.0,
        }
    }

    /// Add one speech score.
    pub fn add_score(&mut self, score: u32) {
        self.individual_score += f64::from(score);
    }

    pub fn reset_score(&mut self) {
        self.individual_score = 0.0;
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_department(&mut self, department: impl Into<String>) {
        self.department = department.into();
    }
}
