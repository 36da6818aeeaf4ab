use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ayat_lib::provider::{DEFAULT_BASE_URL, DEFAULT_PRIMARY_EDITION, DEFAULT_TRANSLATION_EDITION};
use ayat_lib::{
    fetch_hijri_today, get_data_dir, AppState, ChapterMeta, ContentProvider, EditionPair, FormattedResult,
    ParsedRange, ProviderConfig, QuranError,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Runtime settings, read from `AYAT_*` environment variables
struct ApiConfig {
    bind: String,
    data_dir: PathBuf,
    provider: ProviderConfig,
}

impl ApiConfig {
    fn from_env() -> Self {
        let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.to_string());

        Self {
            bind: var("AYAT_BIND", DEFAULT_BIND),
            data_dir: std::env::var("AYAT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| get_data_dir()),
            provider: ProviderConfig {
                base_url: var("AYAT_API_BASE", DEFAULT_BASE_URL),
                editions: EditionPair {
                    primary: var("AYAT_PRIMARY_EDITION", DEFAULT_PRIMARY_EDITION),
                    translation: var("AYAT_TRANSLATION_EDITION", DEFAULT_TRANSLATION_EDITION),
                },
                ..ProviderConfig::default()
            },
        }
    }
}

// === Request/Response types ===

#[derive(Deserialize)]
struct VerseQuery {
    q: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    chapters_loaded: bool,
    cached_editions: usize,
}

#[derive(Serialize)]
struct DateResponse {
    hijri: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(error: &QuranError) -> StatusCode {
    match error {
        QuranError::Parse(_) | QuranError::Validation(_) => StatusCode::BAD_REQUEST,
        QuranError::Provider(_) | QuranError::Alignment(_) | QuranError::EmptyResult(_) => StatusCode::BAD_GATEWAY,
        QuranError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(error: QuranError) -> ApiError {
    (status_for(&error), Json(ErrorResponse { error: error.to_string() }))
}

// === Handlers ===

async fn health<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        chapters_loaded: state.verses.directory().is_loaded(),
        cached_editions: state.verses.edition_cache().stats().0,
    })
}

async fn list_chapters<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<Json<Vec<ChapterMeta>>, ApiError> {
    state.verses.chapters()
        .await
        .map(|chapters| Json(chapters.to_vec()))
        .map_err(api_error)
}

async fn parse_reference<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<VerseQuery>,
) -> Result<Json<ParsedRange>, ApiError> {
    state.verses.parse(&params.q).await.map(Json).map_err(api_error)
}

async fn get_verses<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<VerseQuery>,
) -> Result<Json<FormattedResult>, ApiError> {
    let result = state.verses.lookup(&params.q).await.map_err(api_error)?;

    // History is a convenience; a storage failure must not fail the lookup
    if let Err(e) = state.history.add(params.q.trim()) {
        tracing::warn!("Failed to save history: {}", e);
    }

    Ok(Json(result))
}

async fn get_history<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<Json<Vec<String>>, ApiError> {
    state.history.get().map(Json).map_err(api_error)
}

async fn clear_history<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<StatusCode, ApiError> {
    state.history.clear().map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_date<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<DateResponse> {
    Json(DateResponse {
        hijri: fetch_hijri_today(&state.http).await,
    })
}

fn app<P: ContentProvider + 'static>(state: Arc<AppState<P>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::<P>))
        .route("/chapters", get(list_chapters::<P>))
        .route("/parse", get(parse_reference::<P>))
        .route("/verses", get(get_verses::<P>))
        .route("/history", get(get_history::<P>).delete(clear_history::<P>))
        .route("/date", get(get_date::<P>))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ApiConfig::from_env();
    tracing::info!(data_dir = ?config.data_dir, base_url = %config.provider.base_url, "starting");

    let state = Arc::new(AppState::new(config.data_dir, &config.provider)?);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("Listening on http://{}", config.bind);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
