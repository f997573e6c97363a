//! Single binary web server: JSON API for teams, lineups, schedule generation and scores.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, COURTS (initial court capacity), STATIC_DIR (frontend build to serve at /).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use doubles_tournament_web::{
    build_reports, export_matches_csv, fill_random_results, generate_schedule, record_match_score,
    Discipline, Gender, MatchId, PlayerId, PlayerUpdate, SetScore, TeamId, Tournament,
    TournamentError, DEFAULT_COURTS,
};
use serde::Deserialize;
use std::sync::RwLock;

/// The one tournament this process manages. Writers (including schedule
/// generation) hold the write lock, so only one generation runs at a time.
type AppState = Data<RwLock<Tournament>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CourtsBody {
    courts: u32,
}

#[derive(Deserialize)]
struct TeamBody {
    name: String,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    gender: Gender,
    #[serde(default = "default_skill_rank")]
    skill_rank: u32,
}

fn default_skill_rank() -> u32 {
    1
}

#[derive(Deserialize)]
struct LineupBody {
    discipline: Discipline,
    player_ids: [PlayerId; 2],
}

#[derive(Deserialize)]
struct ScoreBody {
    #[serde(default)]
    scores: Vec<SetScore>,
    winner: Option<TeamId>,
}

#[derive(Deserialize)]
struct TeamPath {
    team_id: TeamId,
}

#[derive(Deserialize)]
struct LineupPath {
    team_id: TeamId,
    discipline: Discipline,
}

#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn error_response(e: TournamentError) -> HttpResponse {
    let message = e.to_string();
    if e.is_not_found() {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": message }));
    }
    match e {
        TournamentError::InvalidSchedule(conflicts) => HttpResponse::UnprocessableEntity()
            .json(serde_json::json!({ "error": message, "conflicts": conflicts })),
        _ => HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-tournament-web",
    })
}

#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Full tournament state.
#[get("/api/tournament")]
async fn api_get_tournament(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(t) => HttpResponse::Ok().json(&*t),
        Err(_) => lock_error(),
    }
}

/// Reset teams, players, lineups and schedule. Court capacity is kept.
#[delete("/api/tournament")]
async fn api_clear_tournament(state: AppState) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    t.clear();
    log::info!("Tournament data cleared");
    HttpResponse::Ok().json(&*t)
}

/// Replace the whole state with an exported snapshot. Rejected as a whole if inconsistent.
#[put("/api/tournament")]
async fn api_import_tournament(state: AppState, body: Json<Tournament>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.import(body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => {
            log::warn!("Import rejected: {}", e);
            error_response(e)
        }
    }
}

/// Set the court capacity used by the next generation.
#[put("/api/courts")]
async fn api_set_courts(state: AppState, body: Json<CourtsBody>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    t.set_courts(body.courts);
    HttpResponse::Ok().json(&*t)
}

#[post("/api/teams")]
async fn api_add_team(state: AppState, body: Json<TeamBody>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.add_team(&body.name) {
        Ok(_) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

#[put("/api/teams/{team_id}")]
async fn api_rename_team(state: AppState, path: Path<TeamPath>, body: Json<TeamBody>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.rename_team(path.team_id, &body.name) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

/// Remove a team along with its players and lineups.
#[delete("/api/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.remove_team(path.team_id) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

#[post("/api/teams/{team_id}/players")]
async fn api_add_player(state: AppState, path: Path<TeamPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.add_player(path.team_id, &body.name, body.gender, body.skill_rank) {
        Ok(_) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

#[put("/api/players/{player_id}")]
async fn api_update_player(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<PlayerUpdate>,
) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.update_player(path.player_id, body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

/// Remove a player; lineups they were part of are dropped too.
#[delete("/api/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.remove_player(path.player_id) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

/// Set (or replace) a team's lineup for one discipline.
#[put("/api/teams/{team_id}/lineups")]
async fn api_set_lineup(state: AppState, path: Path<TeamPath>, body: Json<LineupBody>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.set_lineup(path.team_id, body.discipline, body.player_ids) {
        Ok(_) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

#[delete("/api/teams/{team_id}/lineups/{discipline}")]
async fn api_remove_lineup(state: AppState, path: Path<LineupPath>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match t.remove_lineup(path.team_id, path.discipline) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    }
}

/// Generate a new schedule. Replaces the previous one only on success.
#[post("/api/schedule/generate")]
async fn api_generate_schedule(state: AppState) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match generate_schedule(&mut t) {
        Ok(()) => {
            log::info!("Generated schedule with {} match(es)", t.matches.len());
            HttpResponse::Ok().json(&*t)
        }
        Err(e) => {
            log::warn!("Schedule generation failed: {}", e);
            error_response(e)
        }
    }
}

/// Matches in (time slot, court) order.
#[get("/api/matches")]
async fn api_list_matches(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(t) => HttpResponse::Ok().json(t.matches_sorted()),
        Err(_) => lock_error(),
    }
}

#[put("/api/matches/{match_id}/score")]
async fn api_record_score(state: AppState, path: Path<MatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let ScoreBody { scores, winner } = body.into_inner();
    match record_match_score(&mut t, path.match_id, scores, winner) {
        Ok(()) => HttpResponse::Ok().json(t.get_match(path.match_id)),
        Err(e) => error_response(e),
    }
}

/// Fill every unfinished match with a random result (for trying out reports).
#[post("/api/matches/simulate")]
async fn api_simulate_results(state: AppState) -> HttpResponse {
    let mut t = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let filled = fill_random_results(&mut t, &mut rand::thread_rng());
    log::info!("Simulated results for {} match(es)", filled);
    HttpResponse::Ok().json(t.matches_sorted())
}

#[get("/api/matches/export.csv")]
async fn api_export_csv(state: AppState) -> HttpResponse {
    let t = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match export_matches_csv(&t) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"schedule.csv\""))
            .body(csv),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[get("/api/reports")]
async fn api_reports(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(t) => HttpResponse::Ok().json(build_reports(&t)),
        Err(_) => lock_error(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_courts() -> u32 {
    DEFAULT_COURTS
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let courts: u32 = std::env::var("COURTS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(default_courts);
    let static_dir = std::env::var("STATIC_DIR").ok().filter(|d| !d.is_empty());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{} ({} courts)", bind.0, bind.1, courts);
    if let Some(dir) = &static_dir {
        log::info!("Serving static files from {}", dir);
    }

    let state = Data::new(RwLock::new(Tournament::new(courts)));

    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_get_tournament)
            .service(api_clear_tournament)
            .service(api_import_tournament)
            .service(api_set_courts)
            .service(api_add_team)
            .service(api_rename_team)
            .service(api_remove_team)
            .service(api_add_player)
            .service(api_update_player)
            .service(api_remove_player)
            .service(api_set_lineup)
            .service(api_remove_lineup)
            .service(api_generate_schedule)
            .service(api_export_csv)
            .service(api_list_matches)
            .service(api_record_score)
            .service(api_simulate_results)
            .service(api_reports)
            .configure(move |cfg| {
                if let Some(dir) = static_dir {
                    cfg.service(Files::new("/", dir).index_file("index.html"));
                }
            })
    })
    .bind(bind)?
    .run()
    .await
}
