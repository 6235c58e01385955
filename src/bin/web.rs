//! Single binary web server: JSON API over the debate tournament core.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DEBATE_TAB_DATA_DIR,
//! DEBATE_TAB_TOP_TEAMS, DEBATE_TAB_TOP_DEBATERS.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use debate_tab::{
    advance_stage, generate_matchups, persist_changes, show_top_performers, submit_match_result,
    AppConfig, Change, Changes, CsvStore, DebaterId, MatchId, ScoreSheet, Side, Stage, TeamId, Tournament,
    TournamentError, TournamentKey, TournamentStore,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// One lock per tournament: every operation on it runs start to finish under this lock.
type SharedTournament = Arc<Mutex<Tournament>>;

struct AppState {
    config: AppConfig,
    store: CsvStore,
    tournaments: RwLock<HashMap<TournamentKey, SharedTournament>>,
}

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct TournamentSummary {
    club_name: String,
    name: String,
    year: u16,
    stage: Stage,
    teams: usize,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    club_name: String,
    name: String,
    year: u16,
}

#[derive(Deserialize)]
struct DebaterBody {
    name: String,
    #[serde(default)]
    department: String,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    debaters: Vec<DebaterBody>,
}

#[derive(Deserialize)]
struct UpdateDebaterBody {
    name: Option<String>,
    department: Option<String>,
}

#[derive(Deserialize)]
struct SubmitResultBody {
    team_a: ScoreSheet,
    team_b: ScoreSheet,
    /// Winner to declare if the totals are tied.
    tie_winner: Option<Side>,
}

#[derive(Deserialize)]
struct TopQuery {
    teams: Option<usize>,
    debaters: Option<usize>,
}

/// Path segments: tournament name and year (e.g. /api/tournaments/{name}/{year})
#[derive(Deserialize)]
struct TournamentPath {
    name: String,
    year: u16,
}

impl TournamentPath {
    fn key(&self) -> TournamentKey {
        TournamentKey {
            name: self.name.clone(),
            year: self.year,
        }
    }
}

#[derive(Deserialize)]
struct TeamNamePath {
    name: String,
    year: u16,
    team_name: String,
}

#[derive(Deserialize)]
struct DebaterPath {
    name: String,
    year: u16,
    team_id: TeamId,
    debater_id: DebaterId,
}

#[derive(Deserialize)]
struct MatchPath {
    name: String,
    year: u16,
    match_id: MatchId,
}

fn find(state: &State, key: &TournamentKey) -> Result<SharedTournament, HttpResponse> {
    let g = state
        .tournaments
        .read()
        .map_err(|_| HttpResponse::InternalServerError().body("lock error"))?;
    g.get(key).cloned().ok_or_else(|| {
        HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
    })
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else if matches!(
        e,
        TournamentError::TieUnresolved(_)
            | TournamentError::StageComplete(_)
            | TournamentError::MatchAlreadyCompleted(_)
    ) {
        HttpResponse::Conflict().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

/// Write out what the operation changed; the in-memory state is already updated either way.
fn persist(state: &State, t: &Tournament, changes: &Changes) -> Result<(), HttpResponse> {
    persist_changes(&state.store, t, changes).map_err(|e| {
        log::error!("Failed to save {}: {}", t.key(), e);
        HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "debate-tab",
    })
}

/// List every tournament (loaded from disk at startup or created since).
#[get("/api/tournaments")]
async fn api_list_tournaments(state: State) -> HttpResponse {
    let entries: Vec<SharedTournament> = match state.tournaments.read() {
        Ok(g) => g.values().cloned().collect(),
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let t = entry.lock().await;
        out.push(TournamentSummary {
            club_name: t.club_name.clone(),
            name: t.name.clone(),
            year: t.year,
            stage: t.stage,
            teams: t.teams().len(),
        });
    }
    out.sort_by(|a, b| (a.year, &a.name).cmp(&(b.year, &b.name)));
    HttpResponse::Ok().json(out)
}

/// Create a tournament (409 if one with the same name and year exists).
#[post("/api/tournaments")]
async fn api_create_tournament(state: State, body: Json<CreateTournamentBody>) -> HttpResponse {
    let name = body.name.trim();
    if name.is_empty() {
        return error_response(&TournamentError::EmptyName);
    }
    let tournament = Tournament::new(body.club_name.trim(), name, body.year);
    let key = tournament.key();
    {
        let mut g = match state.tournaments.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        if g.contains_key(&key) {
            return HttpResponse::Conflict()
                .json(serde_json::json!({ "error": "Tournament already exists" }));
        }
        // Only list the tournament once its snapshot is on disk.
        if let Err(resp) = persist(&state, &tournament, &Changes::none().with(Change::Tournament)) {
            return resp;
        }
        g.insert(key.clone(), Arc::new(Mutex::new(tournament.clone())));
    }
    log::info!("Created tournament {}", key);
    HttpResponse::Ok().json(&tournament)
}

#[get("/api/tournaments/{name}/{year}")]
async fn api_get_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let entry = match find(&state, &path.key()) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let t = entry.lock().await;
    HttpResponse::Ok().json(&*t)
}

/// Add a team of three debaters.
#[post("/api/tournaments/{name}/{year}/teams")]
async fn api_add_team(state: State, path: Path<TournamentPath>, body: Json<AddTeamBody>) -> HttpResponse {
    let entry = match find(&state, &path.key()) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut t = entry.lock().await;
    let body = body.into_inner();
    let members = body
        .debaters
        .into_iter()
        .map(|d| (d.name, d.department))
        .collect();
    if let Err(e) = t.add_team(&body.name, members) {
        return error_response(&e);
    }
    let changes = Changes::none().with(Change::Tournament);
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(resp) => resp,
    }
}

/// Remove a team by name (case-insensitive).
#[delete("/api/tournaments/{name}/{year}/teams/{team_name}")]
async fn api_remove_team(state: State, path: Path<TeamNamePath>) -> HttpResponse {
    let key = TournamentKey {
        name: path.name.clone(),
        year: path.year,
    };
    let entry = match find(&state, &key) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut t = entry.lock().await;
    if let Err(e) = t.remove_team(&path.team_name) {
        return error_response(&e);
    }
    let changes = Changes::none().with(Change::Tournament);
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(resp) => resp,
    }
}

/// Rename a debater or change their department.
#[put("/api/tournaments/{name}/{year}/teams/{team_id}/debaters/{debater_id}")]
async fn api_update_debater(
    state: State,
    path: Path<DebaterPath>,
    body: Json<UpdateDebaterBody>,
) -> HttpResponse {
    let key = TournamentKey {
        name: path.name.clone(),
        year: path.year,
    };
    let entry = match find(&state, &key) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut t = entry.lock().await;
    if let Err(e) = t.update_debater(
        path.team_id,
        path.debater_id,
        body.name.as_deref(),
        body.department.as_deref(),
    ) {
        return error_response(&e);
    }
    let changes = Changes::none().with(Change::Tournament);
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(resp) => resp,
    }
}

/// Current stage's matches and whether they are all played.
#[get("/api/tournaments/{name}/{year}/matches")]
async fn api_list_matches(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let entry = match find(&state, &path.key()) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let t = entry.lock().await;
    HttpResponse::Ok().json(serde_json::json!({
        "stage": t.stage,
        "state": t.matchup_state(),
        "matches": t.matches(),
    }))
}

/// Generate the current stage's matchups (409 once every match is played: advance instead).
#[post("/api/tournaments/{name}/{year}/matches/generate")]
async fn api_generate_matches(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let entry = match find(&state, &path.key()) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut t = entry.lock().await;
    let changes = match generate_matchups(&mut t) {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(resp) => resp,
    }
}

/// Submit the scores of one match. A tie without `tie_winner` is rejected and the match stays open.
#[post("/api/tournaments/{name}/{year}/matches/{match_id}/result")]
async fn api_submit_result(
    state: State,
    path: Path<MatchPath>,
    body: Json<SubmitResultBody>,
) -> HttpResponse {
    let key = TournamentKey {
        name: path.name.clone(),
        year: path.year,
    };
    let entry = match find(&state, &key) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut t = entry.lock().await;
    let mut decision = body.tie_winner;
    let changes = match submit_match_result(
        &mut t,
        path.match_id,
        &body.team_a,
        &body.team_b,
        &mut decision,
    ) {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(resp) => resp,
    }
}

/// Save the tournament and its current matchups.
#[post("/api/tournaments/{name}/{year}/export")]
async fn api_export(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let entry = match find(&state, &path.key()) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let t = entry.lock().await;
    let changes = Changes::none()
        .with(Change::Tournament)
        .with(Change::Matches);
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(resp) => resp,
    }
}

/// Advance to the next stage, cutting the field where required.
#[post("/api/tournaments/{name}/{year}/advance")]
async fn api_advance(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let entry = match find(&state, &path.key()) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut t = entry.lock().await;
    let (advance, changes) =
        advance_stage(&mut t, state.config.top_teams, state.config.top_debaters);
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(advance),
        Err(resp) => resp,
    }
}

/// Top teams and debaters; the full rankings are exported as a side effect.
#[get("/api/tournaments/{name}/{year}/top")]
async fn api_top(state: State, path: Path<TournamentPath>, query: Query<TopQuery>) -> HttpResponse {
    let entry = match find(&state, &path.key()) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let t = entry.lock().await;
    let (top, changes) = show_top_performers(
        &t,
        query.teams.unwrap_or(state.config.top_teams),
        query.debaters.unwrap_or(state.config.top_debaters),
    );
    match persist(&state, &t, &changes) {
        Ok(()) => HttpResponse::Ok().json(top),
        Err(resp) => resp,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let store = CsvStore::new(config.storage());
    let tournaments: HashMap<TournamentKey, SharedTournament> = store
        .load_all_tournaments()
        .into_iter()
        .map(|t| (t.key(), Arc::new(Mutex::new(t))))
        .collect();

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppState {
        config,
        store,
        tournaments: RwLock::new(tournaments),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_update_debater)
            .service(api_list_matches)
            .service(api_generate_matches)
            .service(api_submit_result)
            .service(api_export)
            .service(api_advance)
            .service(api_top)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use debate_tab::StorageConfig;

    fn state_at(data_dir: std::path::PathBuf) -> State {
        Data::new(AppState {
            config: AppConfig::default(),
            store: CsvStore::new(StorageConfig::new(data_dir)),
            tournaments: RwLock::new(HashMap::new()),
        })
    }

    #[actix_web::test]
    async fn failed_save_does_not_list_the_tournament() {
        // A plain file where the data directory should be makes every save fail.
        let file = tempfile::NamedTempFile::new().unwrap();
        let state = state_at(file.path().to_path_buf());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api_create_tournament)
                .service(api_list_tournaments),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "club_name": "Club", "name": "Open", "year": 2024 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.tournaments.read().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn created_tournament_is_saved_then_listed() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = state_at(dir.path().to_path_buf());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api_create_tournament),
        )
        .await;

        let body = serde_json::json!({ "club_name": "Club", "name": "Open", "year": 2024 });
        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(&body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(state.tournaments.read().unwrap().len(), 1);
        assert_eq!(state.store.load_all_tournaments().len(), 1);

        let again = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(&body)
            .to_request();
        assert_eq!(test::call_service(&app, again).await.status(), StatusCode::CONFLICT);
    }
}
