//! Tournament stages as an explicit ordered table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the tournament, from the first preliminary round to the final.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    #[serde(rename = "preliminary_1")]
    Preliminary1,
    #[serde(rename = "preliminary_2")]
    Preliminary2,
    #[serde(rename = "preliminary_3")]
    Preliminary3,
    OctaFinal,
    QuarterFinal,
    SemiFinal,
    Final,
}

/// How matches are paired within a stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairingRule {
    /// Input order: (0,1), (2,3), ...
    FirstRound,
    /// Winners against winners, losers against losers.
    WinLoss,
    /// Highest seed against lowest seed; scores reset first.
    Elimination,
}

struct StageRow {
    stage: Stage,
    name: &'static str,
    next: Option<Stage>,
    pairing: PairingRule,
    /// Teams kept when leaving this stage.
    cut_on_exit: Option<usize>,
    /// Whether leaving this stage reports top performers first.
    reports_top_performers: bool,
}

const STAGES: [StageRow; 7] = [
    StageRow {
        stage: Stage::Preliminary1,
        name: "preliminary_1",
        next: Some(Stage::Preliminary2),
        pairing: PairingRule::FirstRound,
        cut_on_exit: None,
        reports_top_performers: false,
    },
    StageRow {
        stage: Stage::Preliminary2,
        name: "preliminary_2",
        next: Some(Stage::Preliminary3),
        pairing: PairingRule::WinLoss,
        cut_on_exit: None,
        reports_top_performers: false,
    },
    StageRow {
        stage: Stage::Preliminary3,
        name: "preliminary_3",
        next: Some(Stage::OctaFinal),
        pairing: PairingRule::WinLoss,
        cut_on_exit: Some(16),
        reports_top_performers: true,
    },
    StageRow {
        stage: Stage::OctaFinal,
        name: "octa_final",
        next: Some(Stage::QuarterFinal),
        pairing: PairingRule::Elimination,
        cut_on_exit: Some(8),
        reports_top_performers: true,
    },
    StageRow {
        stage: Stage::QuarterFinal,
        name: "quarter_final",
        next: Some(Stage::SemiFinal),
        pairing: PairingRule::Elimination,
        cut_on_exit: Some(4),
        reports_top_performers: true,
    },
    StageRow {
        stage: Stage::SemiFinal,
        name: "semi_final",
        next: Some(Stage::Final),
        pairing: PairingRule::Elimination,
        cut_on_exit: Some(2),
        reports_top_performers: true,
    },
    StageRow {
        stage: Stage::Final,
        name: "final",
        next: None,
        pairing: PairingRule::Elimination,
        cut_on_exit: None,
        reports_top_performers: true,
    },
];

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Preliminary1,
        Stage::Preliminary2,
        Stage::Preliminary3,
        Stage::OctaFinal,
        Stage::QuarterFinal,
        Stage::SemiFinal,
        Stage::Final,
    ];

    fn row(self) -> &'static StageRow {
        &STAGES[self as usize]
    }

    /// Successor stage, or `None` at the final.
    pub fn next(self) -> Option<Stage> {
        self.row().next
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    pub fn pairing_rule(self) -> PairingRule {
        self.row().pairing
    }

    /// Number of teams that survive leaving this stage, if it eliminates.
    pub fn cut_on_exit(self) -> Option<usize> {
        self.row().cut_on_exit
    }

    pub fn reports_top_performers(self) -> bool {
        self.row().reports_top_performers
    }

    pub fn as_str(self) -> &'static str {
        self.row().name
    }

    pub fn parse(s: &str) -> Option<Stage> {
        STAGES.iter().find(|r| r.name == s).map(|r| r.stage)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
