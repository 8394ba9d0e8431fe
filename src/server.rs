use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::aggregate::LongRow;
use crate::chart::Figure;
use crate::dashboard::page::render_page;
use crate::dashboard::{CallbackOutput, Dashboard, DispatchError};
use crate::data::CandidateCount;

#[derive(Clone)]
struct ApiState {
    dashboard: Dashboard,
    base_path: String,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(value: DispatchError) -> Self {
        Self::bad_request(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct SelectionQuery {
    candidat: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpdateRequest {
    input: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct CandidatesResponse {
    default: Option<String>,
    candidates: Vec<CandidateCount>,
}

#[derive(Debug, Serialize)]
struct SeriesResponse {
    candidat: Option<String>,
    total: u64,
    rows: Vec<LongRow>,
}

pub fn build_router(dashboard: Dashboard, base_path: &str) -> Router {
    let state = ApiState {
        dashboard,
        base_path: base_path.to_string(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(index))
        .route("/api/candidates", get(candidates))
        .route("/api/figure", get(figure))
        .route("/api/series", get(series))
        .route("/api/update", post(update))
        .with_state(state);

    let app = Router::new().route("/health", get(health));
    let app = if base_path == "/" {
        app.merge(pages)
    } else {
        app.nest(base_path, pages)
    };
    app.layer(cors).layer(TraceLayer::new_for_http())
}

pub async fn run_server(dashboard: Dashboard, bind: SocketAddr, base_path: &str) -> Result<()> {
    let app = build_router(dashboard, base_path);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("dashboard listening on http://{bind}{base_path}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn index(State(state): State<ApiState>) -> std::result::Result<Html<String>, ApiError> {
    render_page(&state.dashboard, &state.base_path)
        .map(Html)
        .map_err(ApiError::internal)
}

async fn candidates(State(state): State<ApiState>) -> ApiResult<CandidatesResponse> {
    let dashboard = &state.dashboard;
    Ok(ok(CandidatesResponse {
        default: dashboard.default_selection().map(str::to_string),
        candidates: dashboard.candidates().to_vec(),
    }))
}

async fn figure(
    State(state): State<ApiState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult<Figure> {
    let dashboard = &state.dashboard;
    let selection = dashboard.resolve_selection(query.candidat.as_deref());
    debug!("figure requested for {selection:?}");
    Ok(ok(dashboard.update_graph(selection.unwrap_or_default())))
}

async fn series(
    State(state): State<ApiState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult<SeriesResponse> {
    let dashboard = &state.dashboard;
    let selection = dashboard.resolve_selection(query.candidat.as_deref());
    let daily = dashboard.series(selection.unwrap_or_default());
    Ok(ok(SeriesResponse {
        candidat: selection.map(str::to_string),
        total: daily.total(),
        rows: daily.to_long_format(),
    }))
}

async fn update(
    State(state): State<ApiState>,
    Json(request): Json<UpdateRequest>,
) -> ApiResult<CallbackOutput> {
    debug!("callback {} <- {}", request.input, request.value);
    let output = state.dashboard.dispatch(&request.input, &request.value)?;
    Ok(ok(output))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
