//! CSV files as the snapshot format.
//!
//! A tournament snapshot is a headerless file of tagged rows: one `meta` row, then for each
//! team a `team` row followed by its three `debater` rows. Matchups and ranking exports are
//! ordinary CSV tables with a header row.

use super::{StorageConfig, StorageError, TournamentStore};
use crate::logic::DebaterStanding;
use crate::models::{
    DebateMatch, Debater, MatchResult, Side, SideScores, Stage, Team, TeamId, TeamStatus,
    Tournament, TEAM_SIZE,
};
use chrono::Utc;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

const META: &str = "meta";
const TEAM: &str = "team";
const DEBATER: &str = "debater";

/// Stores every file under a [`StorageConfig`] data directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    config: StorageConfig,
}

impl CsvStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn snapshot_path(&self, tournament: &Tournament) -> PathBuf {
        self.config.records_dir().join(format!(
            "{}_{}.csv",
            file_component(&tournament.name),
            tournament.year
        ))
    }

    fn docs_path(&self, prefix: &str, tournament: &Tournament, stage: Stage) -> PathBuf {
        self.config.docs_dir().join(format!(
            "{}_{}_{}_{}.csv",
            prefix,
            file_component(&tournament.name),
            tournament.year,
            stage
        ))
    }

    /// Matchups file for the tournament's current stage.
    pub fn matchups_path(&self, tournament: &Tournament) -> PathBuf {
        self.docs_path("matchups", tournament, tournament.stage)
    }

    pub fn top_teams_path(&self, tournament: &Tournament, stage: Stage) -> PathBuf {
        self.docs_path("top_teams", tournament, stage)
    }

    pub fn top_debaters_path(&self, tournament: &Tournament, stage: Stage) -> PathBuf {
        self.docs_path("top_debaters", tournament, stage)
    }

    /// Read one snapshot file (without its matches).
    pub fn load_snapshot(&self, path: &Path) -> Result<Tournament, StorageError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        let records = reader
            .records()
            .collect::<Result<Vec<StringRecord>, _>>()?;
        parse_snapshot(&records).map_err(|reason| StorageError::Corrupt {
            path: path.to_path_buf(),
            reason,
        })
    }
}

/// Percent-encode everything outside [A-Za-z0-9-], so distinct names never share a file.
fn file_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn field(record: &StringRecord, i: usize) -> Result<&str, String> {
    record
        .get(i)
        .ok_or_else(|| format!("missing column {} in {:?}", i, record))
}

fn parse<T: FromStr>(record: &StringRecord, i: usize, what: &str) -> Result<T, String> {
    let raw = field(record, i)?;
    raw.parse()
        .map_err(|_| format!("invalid {} '{}'", what, raw))
}

fn expect_kind(record: &StringRecord, kind: &str) -> Result<(), String> {
    let got = field(record, 0)?;
    if got != kind {
        return Err(format!("expected '{}' row, found '{}'", kind, got));
    }
    Ok(())
}

fn parse_snapshot(records: &[StringRecord]) -> Result<Tournament, String> {
    let mut rows = records.iter();
    let meta = rows.next().ok_or("empty snapshot")?;
    expect_kind(meta, META)?;
    let club = field(meta, 1)?;
    let name = field(meta, 2)?;
    let year: u16 = parse(meta, 3, "year")?;
    let stage_raw = field(meta, 4)?;
    let stage = Stage::parse(stage_raw).ok_or_else(|| format!("unknown stage '{}'", stage_raw))?;

    let mut teams = Vec::new();
    let mut ids = HashSet::new();
    while let Some(row) = rows.next() {
        expect_kind(row, TEAM)?;
        let mut debaters = Vec::with_capacity(TEAM_SIZE);
        for _ in 0..TEAM_SIZE {
            let d = rows.next().ok_or("team row without three debater rows")?;
            expect_kind(d, DEBATER)?;
            let mut debater = Debater::new(parse(d, 1, "debater id")?, field(d, 2)?, field(d, 3)?);
            debater.individual_score = parse(d, 4, "individual score")?;
            debaters.push(debater);
        }
        let id: TeamId = parse(row, 1, "team id")?;
        if !ids.insert(id) {
            return Err(format!("duplicate team id {}", id));
        }
        let mut team = Team::new(id, field(row, 2)?, debaters).map_err(|e| e.to_string())?;
        team.score = parse(row, 3, "team score")?;
        team.wins = parse(row, 4, "wins")?;
        team.losses = parse(row, 5, "losses")?;
        let status_raw = field(row, 6)?;
        team.status = TeamStatus::parse(status_raw)
            .ok_or_else(|| format!("unknown team status '{}'", status_raw))?;
        teams.push(team);
    }
    Ok(Tournament::restore(club, name, year, stage, teams))
}

#[derive(Debug, Serialize, Deserialize)]
struct MatchRow {
    match_id: Uuid,
    team_a_id: TeamId,
    team_a_name: String,
    team_b_id: TeamId,
    team_b_name: String,
    completed: bool,
    a_speech_1: Option<u32>,
    a_speech_2: Option<u32>,
    a_speech_3: Option<u32>,
    a_rebuttal: Option<u32>,
    b_speech_1: Option<u32>,
    b_speech_2: Option<u32>,
    b_speech_3: Option<u32>,
    b_rebuttal: Option<u32>,
    winner: Option<Side>,
    tie_break: Option<bool>,
}

impl MatchRow {
    fn from_match(m: &DebateMatch, tournament: &Tournament) -> Self {
        let name = |id: TeamId| tournament.team(id).map(|t| t.name.clone()).unwrap_or_default();
        let r = m.result();
        let a = r.map(|r| r.team_a);
        let b = r.map(|r| r.team_b);
        Self {
            match_id: m.id,
            team_a_id: m.team_a,
            team_a_name: name(m.team_a),
            team_b_id: m.team_b,
            team_b_name: name(m.team_b),
            completed: m.is_completed(),
            a_speech_1: a.map(|s| s.speeches[0]),
            a_speech_2: a.map(|s| s.speeches[1]),
            a_speech_3: a.map(|s| s.speeches[2]),
            a_rebuttal: a.map(|s| s.rebuttal),
            b_speech_1: b.map(|s| s.speeches[0]),
            b_speech_2: b.map(|s| s.speeches[1]),
            b_speech_3: b.map(|s| s.speeches[2]),
            b_rebuttal: b.map(|s| s.rebuttal),
            winner: r.map(|r| r.winner),
            tie_break: r.map(|r| r.decided_by_tie_break),
        }
    }

    fn side_scores(speeches: [Option<u32>; TEAM_SIZE], rebuttal: Option<u32>) -> Option<SideScores> {
        let [s1, s2, s3] = speeches;
        Some(SideScores {
            speeches: [s1?, s2?, s3?],
            rebuttal: rebuttal?,
        })
    }

    fn into_match(self, tournament: &Tournament, path: &Path) -> Result<DebateMatch, StorageError> {
        for team_id in [self.team_a_id, self.team_b_id] {
            if tournament.team(team_id).is_none() {
                return Err(StorageError::UnknownTeam { team_id });
            }
        }
        let result = if self.completed {
            let team_a = Self::side_scores(
                [self.a_speech_1, self.a_speech_2, self.a_speech_3],
                self.a_rebuttal,
            );
            let team_b = Self::side_scores(
                [self.b_speech_1, self.b_speech_2, self.b_speech_3],
                self.b_rebuttal,
            );
            match (team_a, team_b, self.winner) {
                (Some(team_a), Some(team_b), Some(winner)) => Some(MatchResult {
                    team_a,
                    team_b,
                    winner,
                    decided_by_tie_break: self.tie_break.unwrap_or(false),
                }),
                _ => {
                    return Err(StorageError::Corrupt {
                        path: path.to_path_buf(),
                        reason: format!("completed match {} without full scores", self.match_id),
                    })
                }
            }
        } else {
            None
        };
        Ok(DebateMatch::restore(
            self.match_id,
            self.team_a_id,
            self.team_b_id,
            result,
        ))
    }
}

#[derive(Debug, Serialize)]
struct TopTeamRow<'a> {
    rank: usize,
    team_id: TeamId,
    team_name: &'a str,
    wins: u32,
    losses: u32,
    score: f64,
}

#[derive(Debug, Serialize)]
struct TopDebaterRow<'a> {
    rank: usize,
    team_id: TeamId,
    team_name: &'a str,
    debater_id: u32,
    debater_name: &'a str,
    department: &'a str,
    score: f64,
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<(), StorageError> {
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new().from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl TournamentStore for CsvStore {
    fn load_all_tournaments(&self) -> Vec<Tournament> {
        let dir = self.config.records_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("No tournament records in {}: {}", dir.display(), e);
                return Vec::new();
            }
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        paths.sort();

        let mut tournaments = Vec::new();
        for path in paths {
            match self.load_snapshot(&path) {
                Ok(mut tournament) => {
                    match self.load_matches(&tournament) {
                        Ok(matches) => tournament.attach_matches(matches),
                        Err(e) => log::warn!(
                            "Could not restore matches of {}: {}",
                            tournament.key(),
                            e
                        ),
                    }
                    tournaments.push(tournament);
                }
                Err(e) => log::warn!("Skipping unreadable snapshot: {}", e),
            }
        }
        log::info!(
            "Loaded {} tournament(s) from {}",
            tournaments.len(),
            dir.display()
        );
        tournaments
    }

    fn persist_tournament(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let path = self.snapshot_path(tournament);
        ensure_parent(&path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        writer.write_record(&[
            META.to_string(),
            tournament.club_name.clone(),
            tournament.name.clone(),
            tournament.year.to_string(),
            tournament.stage.to_string(),
            Utc::now().to_rfc3339(),
        ])?;
        for team in tournament.teams() {
            writer.write_record(&[
                TEAM.to_string(),
                team.id.to_string(),
                team.name.clone(),
                team.score.to_string(),
                team.wins.to_string(),
                team.losses.to_string(),
                team.status.as_str().to_string(),
            ])?;
            for d in &team.debaters {
                writer.write_record(&[
                    DEBATER.to_string(),
                    d.id.to_string(),
                    d.name.clone(),
                    d.department.clone(),
                    d.individual_score.to_string(),
                ])?;
            }
        }
        writer.flush()?;
        log::debug!("Saved {} to {}", tournament.key(), path.display());
        Ok(())
    }

    fn persist_matches(
        &self,
        matches: &[DebateMatch],
        tournament: &Tournament,
    ) -> Result<(), StorageError> {
        let path = self.matchups_path(tournament);
        write_rows(&path, matches.iter().map(|m| MatchRow::from_match(m, tournament)))?;
        log::debug!("Saved {} matchup(s) to {}", matches.len(), path.display());
        Ok(())
    }

    fn persist_top_teams(
        &self,
        teams: &[Team],
        stage: Stage,
        tournament: &Tournament,
    ) -> Result<(), StorageError> {
        let rows = teams.iter().enumerate().map(|(i, t)| TopTeamRow {
            rank: i + 1,
            team_id: t.id,
            team_name: &t.name,
            wins: t.wins,
            losses: t.losses,
            score: t.score,
        });
        write_rows(&self.top_teams_path(tournament, stage), rows)
    }

    fn persist_top_debaters(
        &self,
        debaters: &[DebaterStanding],
        stage: Stage,
        tournament: &Tournament,
    ) -> Result<(), StorageError> {
        let rows = debaters.iter().enumerate().map(|(i, s)| TopDebaterRow {
            rank: i + 1,
            team_id: s.team_id,
            team_name: &s.team_name,
            debater_id: s.debater.id,
            debater_name: &s.debater.name,
            department: &s.debater.department,
            score: s.debater.individual_score,
        });
        write_rows(&self.top_debaters_path(tournament, stage), rows)
    }

    fn load_matches(&self, tournament: &Tournament) -> Result<Vec<DebateMatch>, StorageError> {
        let path = self.matchups_path(tournament);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new().from_path(&path)?;
        let mut matches = Vec::new();
        for row in reader.deserialize::<MatchRow>() {
            matches.push(row?.into_match(tournament, &path)?);
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_components_are_encoded_reversibly() {
        assert_eq!(file_component("Inter-Club Open 2/3"), "Inter-Club%20Open%202%2F3");
        assert_eq!(file_component("ok_name"), "ok%5Fname");
        assert_eq!(file_component("Zoë"), "Zo%C3%AB");
        assert_ne!(file_component("Spring Open"), file_component("Spring_Open"));
    }
}
