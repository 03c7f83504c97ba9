// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use marksheet_api::{
    AcademicYearsResponse, ApiError, ClassRosterResponse, ListPendingResultsResponse,
    ListResultsResponse, LoginRequest, LoginResponse, ResultInfo, ReviewResultRequest,
    ReviewResultResponse, StudentResultsResponse, UpsertResultRequest, UpsertResultResponse,
    WhoAmIResponse, approve_result, ensure_admin_account, get_class_roster, get_my_report,
    get_my_years, get_result, get_student_results, list_pending_results, list_results, login,
    logout, reject_result, upsert_result, whoami,
};
use marksheet_domain::StudentReport;
use marksheet_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionActor;

/// Marksheet Server - HTTP server for the result lifecycle engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Login name of the admin account created when none exists
    #[arg(long, requires = "admin_password")]
    admin_login: Option<String>,

    /// Password of the admin account created when none exists
    #[arg(long, requires = "admin_login")]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single storage handle, serialized behind a mutex.
    pub persistence: Arc<Mutex<Persistence>>,
}

/// The body of every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    const fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        })
    }

    const fn ok_with_message(data: T, message: String) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message),
        })
    }
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error message.
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<Envelope<()>> = Json(Envelope {
            success: false,
            data: None,
            error: Some(self.message),
            message: None,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

fn bad_request(field: &str, message: String) -> HttpError {
    HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid input for field '{field}': {message}"),
    }
}

/// Parses a numeric path segment.
fn parse_path_id(field: &str, raw: &str) -> Result<i64, HttpError> {
    raw.parse::<i64>()
        .map_err(|_| bad_request(field, format!("'{raw}' is not an integer id")))
}

/// Parses a JSON body, treating an empty body as the default value.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_required_body(body)
}

fn parse_required_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, HttpError> {
    serde_json::from_slice(body).map_err(|e| bad_request("body", e.to_string()))
}

/// Handler for POST and PUT `/results`.
///
/// Responds 201 when a row was created and 200 when one was replaced.
async fn handle_upsert_result(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<UpsertResultResponse>>), HttpError> {
    let request: UpsertResultRequest = parse_required_body(&body)?;
    info!(
        account_id = session.actor.account_id,
        student_id = request.student_id,
        subject_id = request.subject_id,
        academic_year = %request.academic_year,
        "Handling upsert_result request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: UpsertResultResponse =
        upsert_result(&mut persistence, &request, &session.actor)?;
    drop(persistence);

    let status: StatusCode = if response.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let message: String = response.message.clone();
    Ok((status, Envelope::ok_with_message(response, message)))
}

/// Handler for GET `/results`.
async fn handle_list_results(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
) -> Result<Json<Envelope<ListResultsResponse>>, HttpError> {
    info!(account_id = session.actor.account_id, "Handling list_results request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListResultsResponse = list_results(&mut persistence, &session.actor)?;
    Ok(Envelope::ok(response))
}

/// Handler for GET `/results/approvals/pending`.
async fn handle_list_pending_results(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
) -> Result<Json<Envelope<ListPendingResultsResponse>>, HttpError> {
    info!(
        account_id = session.actor.account_id,
        "Handling list_pending_results request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ListPendingResultsResponse =
        list_pending_results(&mut persistence, &session.actor)?;
    Ok(Envelope::ok(response))
}

/// Handler for PUT `/results/approve/{result_id}`.
async fn handle_approve_result(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
    Path(result_id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<ReviewResultResponse>>, HttpError> {
    let result_id: i64 = parse_path_id("result_id", &result_id)?;
    let request: ReviewResultRequest = parse_body(&body)?;
    info!(
        account_id = session.actor.account_id,
        result_id, "Handling approve_result request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ReviewResultResponse =
        approve_result(&mut persistence, result_id, &request, &session.actor)?;
    let message: String = response.message.clone();
    Ok(Envelope::ok_with_message(response, message))
}

/// Handler for PUT `/results/reject/{result_id}`.
async fn handle_reject_result(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
    Path(result_id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<ReviewResultResponse>>, HttpError> {
    let result_id: i64 = parse_path_id("result_id", &result_id)?;
    let request: ReviewResultRequest = parse_body(&body)?;
    info!(
        account_id = session.actor.account_id,
        result_id, "Handling reject_result request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ReviewResultResponse =
        reject_result(&mut persistence, result_id, &request, &session.actor)?;
    let message: String = response.message.clone();
    Ok(Envelope::ok_with_message(response, message))
}

/// Handler for GET `/results/student/{student_id}/{academic_year}`.
async fn handle_get_student_results(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
    Path((student_id, academic_year)): Path<(String, String)>,
) -> Result<Json<Envelope<StudentResultsResponse>>, HttpError> {
    let student_id: i64 = parse_path_id("student_id", &student_id)?;
    info!(
        account_id = session.actor.account_id,
        student_id,
        academic_year = %academic_year,
        "Handling get_student_results request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: StudentResultsResponse =
        get_student_results(&mut persistence, student_id, &academic_year, &session.actor)?;
    Ok(Envelope::ok(response))
}

/// Handler for GET `/results/class/{class_id}/subject/{subject_id}/{academic_year}`.
async fn handle_get_class_roster(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
    Path((class_id, subject_id, academic_year)): Path<(String, String, String)>,
) -> Result<Json<Envelope<ClassRosterResponse>>, HttpError> {
    let class_id: i64 = parse_path_id("class_id", &class_id)?;
    let subject_id: i64 = parse_path_id("subject_id", &subject_id)?;
    info!(
        account_id = session.actor.account_id,
        class_id,
        subject_id,
        academic_year = %academic_year,
        "Handling get_class_roster request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ClassRosterResponse = get_class_roster(
        &mut persistence,
        class_id,
        subject_id,
        &academic_year,
        &session.actor,
    )?;
    Ok(Envelope::ok(response))
}

async fn my_report(
    app_state: &AppState,
    session: &SessionActor,
    academic_year: Option<&str>,
) -> Result<Json<Envelope<StudentReport>>, HttpError> {
    info!(
        account_id = session.actor.account_id,
        academic_year = academic_year.unwrap_or("<latest>"),
        "Handling get_my_report request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let report: StudentReport = get_my_report(&mut persistence, academic_year, &session.actor)?;
    Ok(Envelope::ok(report))
}

/// Handler for GET `/results/student/me`.
async fn handle_get_my_latest_report(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
) -> Result<Json<Envelope<StudentReport>>, HttpError> {
    my_report(&app_state, &session, None).await
}

/// Handler for GET `/results/student/me/{academic_year}`.
async fn handle_get_my_report(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
    Path(academic_year): Path<String>,
) -> Result<Json<Envelope<StudentReport>>, HttpError> {
    my_report(&app_state, &session, Some(&academic_year)).await
}

/// Handler for GET `/results/student/me/years`.
async fn handle_get_my_years(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
) -> Result<Json<Envelope<AcademicYearsResponse>>, HttpError> {
    info!(account_id = session.actor.account_id, "Handling get_my_years request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AcademicYearsResponse = get_my_years(&mut persistence, &session.actor)?;
    Ok(Envelope::ok(response))
}

/// Handler for GET `/results/{result_id}`.
async fn handle_get_result(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
    Path(result_id): Path<String>,
) -> Result<Json<Envelope<ResultInfo>>, HttpError> {
    let result_id: i64 = parse_path_id("result_id", &result_id)?;
    info!(
        account_id = session.actor.account_id,
        result_id, "Handling get_result request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ResultInfo = get_result(&mut persistence, result_id, &session.actor)?;
    Ok(Envelope::ok(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    body: Bytes,
) -> Result<Json<Envelope<LoginResponse>>, HttpError> {
    let request: LoginRequest = parse_required_body(&body)?;
    info!(login_name = %request.login_name, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &request)?;
    Ok(Envelope::ok(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    session: SessionActor,
) -> Result<Json<Envelope<()>>, HttpError> {
    info!(account_id = session.actor.account_id, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &session.token)?;
    Ok(Envelope::ok_with_message((), String::from("Logged out")))
}

/// Handler for GET `/auth/me`.
async fn handle_whoami(session: SessionActor) -> Json<Envelope<WhoAmIResponse>> {
    Envelope::ok(whoami(&session.actor, &session.account))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route(
            "/results",
            post(handle_upsert_result)
                .put(handle_upsert_result)
                .get(handle_list_results),
        )
        .route("/results/approvals/pending", get(handle_list_pending_results))
        .route("/results/approve/{result_id}", put(handle_approve_result))
        .route("/results/reject/{result_id}", put(handle_reject_result))
        .route("/results/student/me", get(handle_get_my_latest_report))
        .route("/results/student/me/years", get(handle_get_my_years))
        .route(
            "/results/student/me/{academic_year}",
            get(handle_get_my_report),
        )
        .route(
            "/results/student/{student_id}/{academic_year}",
            get(handle_get_student_results),
        )
        .route(
            "/results/class/{class_id}/subject/{subject_id}/{academic_year}",
            get(handle_get_class_roster),
        )
        .route("/results/{result_id}", get(handle_get_result))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Marksheet Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let removed: usize = persistence.delete_expired_sessions()?;
    if removed > 0 {
        info!(removed, "Removed expired sessions");
    }

    if let (Some(login_name), Some(password)) = (&args.admin_login, &args.admin_password) {
        ensure_admin_account(&mut persistence, login_name, password)?;
    } else if persistence.count_active_admin_accounts()? == 0 {
        warn!("No admin account exists; start with --admin-login and --admin-password to create one");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
