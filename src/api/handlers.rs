//! HTTP request handlers

use super::types::{
    interest_names, CreateSessionResponse, ErrorResponse, FieldRange, OptionsResponse,
    SessionResponse, StyleOption, TripResponse,
};
use super::AppState;
use crate::export::DOWNLOAD_NAME;
use crate::planner::{PlanError, TripView};
use crate::session::{SessionError, SessionId};
use crate::trip::{
    TripRequest, DAYS_RANGE, DEFAULT_BUDGET, DEFAULT_DAYS, DEFAULT_PEOPLE, MIN_BUDGET,
    PEOPLE_RANGE,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Form metadata
        .route("/api/options", get(get_options))
        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        // Plan generation
        .route("/api/sessions/:id/trips", post(generate_trip))
        // History
        .route("/api/sessions/:id/history/:index/select", post(select_trip))
        // Selected trip display and export
        .route(
            "/api/sessions/:id/selected",
            get(get_selected).delete(clear_selected),
        )
        .route("/api/sessions/:id/selected/export", get(export_selected))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Form Metadata
// ============================================================

async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        styles: StyleOption::all(),
        interests: interest_names(),
        days: FieldRange {
            min: DAYS_RANGE.0,
            max: Some(DAYS_RANGE.1),
            default: DEFAULT_DAYS,
        },
        people: FieldRange {
            min: PEOPLE_RANGE.0,
            max: Some(PEOPLE_RANGE.1),
            default: DEFAULT_PEOPLE,
        },
        budget: FieldRange {
            min: MIN_BUDGET,
            max: None,
            default: DEFAULT_BUDGET,
        },
        model: state.planner.model_id().map(str::to_string),
    })
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.planner.sessions().create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = state
        .planner
        .sessions()
        .read(id, |s| SessionResponse::new(id, s))
        .await?;
    Ok(Json(response))
}

// ============================================================
// Plan Generation
// ============================================================

async fn generate_trip(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<TripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let record = state.planner.generate(id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(TripResponse {
            trip: (*record).clone(),
        }),
    ))
}

// ============================================================
// History
// ============================================================

async fn select_trip(
    State(state): State<AppState>,
    Path((id, index)): Path<(SessionId, usize)>,
) -> Result<Json<TripResponse>, AppError> {
    let record = state.planner.select(id, index).await?;
    Ok(Json(TripResponse {
        trip: (*record).clone(),
    }))
}

// ============================================================
// Selected Trip
// ============================================================

async fn get_selected(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<TripView>, AppError> {
    let trip = state.planner.selected(id).await?;
    Ok(Json(state.planner.view(&trip).await))
}

async fn clear_selected(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, AppError> {
    state.planner.clear_selection(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_selected(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Response, AppError> {
    let exported = state.planner.export_selected(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
            ),
        ],
        exported.bytes,
    )
        .into_response())
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("planova ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::NotFound(e.to_string())
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Invalid(_) => AppError::BadRequest(e.to_string()),
            PlanError::Session(e) => e.into(),
            PlanError::LlmUnavailable => AppError::ServiceUnavailable(e.to_string()),
            PlanError::Llm(_) => AppError::BadGateway(e.to_string()),
            PlanError::Export(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
