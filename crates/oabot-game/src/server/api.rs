//! The `/api` endpoint.
//!
//! One GET route dispatching on the `action` query parameter:
//! - `desc` (default): game description
//! - `tiles`: a batch of freshly generated tiles
//! - `log_action`: record a player's decision
//!
//! Any action may be wrapped as JSONP with `callback=<name>`.

use std::sync::{Arc, LazyLock};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use futures::TryStreamExt;
use regex::Regex;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::{self, DisseminClient, WikidataClient};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::log::DecisionLog;
use crate::models::{Description, Tile, TilesResponse};
use crate::tiles::build_tiles;

/// JavaScript identifier path, e.g. `cb` or `jQuery123.handlers._0`.
static CALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("valid callback regex")
});

/// Shared state for HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub log: DecisionLog,
}

impl AppState {
    /// State whose decision log lives at `config.log_path`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let log = DecisionLog::new(config.log_path.clone());
        Self { config: Arc::new(config), log }
    }
}

/// Query parameters of `/api`. All optional; each action checks what it needs.
#[derive(Debug, Default)]
pub struct ApiQuery {
    pub action: Option<String>,
    pub num: Option<String>,
    pub lang: Option<String>,
    pub user: Option<String>,
    pub tile: Option<String>,
    pub decision: Option<String>,
    pub callback: Option<String>,
}

impl ApiQuery {
    /// Collect known parameters. A repeated parameter keeps its first value.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "action" => &mut query.action,
                "num" => &mut query.num,
                "lang" => &mut query.lang,
                "user" => &mut query.user,
                "tile" => &mut query.tile,
                "decision" => &mut query.decision,
                "callback" => &mut query.callback,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// JSONP callback; an empty `callback=` means plain JSON.
    #[must_use]
    pub fn callback(&self) -> Option<&str> {
        self.callback.as_deref().filter(|c| !c.is_empty())
    }
}

/// Create the HTTP router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handle_api))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "oabot-game",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn handle_api(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    match dispatch(&state, ApiQuery::from_pairs(pairs)).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn dispatch(state: &AppState, query: ApiQuery) -> ApiResult<Response> {
    if let Some(callback) = query.callback() {
        if !CALLBACK_RE.is_match(callback) {
            return Err(ApiError::InvalidCallback(callback.to_string()));
        }
    }

    let action = query.action.as_deref().unwrap_or("desc");
    tracing::debug!(action, "Handling API request");

    let payload = match action {
        "desc" => Some(serde_json::to_value(Description::default())?),
        "tiles" => Some(serde_json::to_value(handle_tiles(state, &query).await?)?),
        "log_action" => {
            handle_log_action(state, &query).await?;
            None
        }
        other => return Err(ApiError::UnknownAction(other.to_string())),
    };

    Ok(render(payload, query.callback()))
}

async fn handle_tiles(state: &AppState, query: &ApiQuery) -> ApiResult<TilesResponse> {
    let limit = match query.num.as_deref() {
        None => state.config.default_tiles,
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request(format!("invalid num '{raw}'")))?,
    };
    // Accepted for API compatibility; tiles are English-only.
    let lang = query.lang.as_deref().unwrap_or("en");

    tracing::info!(limit, lang, "Generating tiles");
    let tiles = generate_tiles(&state.config, limit).await?;

    Ok(TilesResponse { tiles })
}

/// Run one tile-generation call on its own HTTP session.
async fn generate_tiles(config: &Config, limit: usize) -> ApiResult<Vec<Tile>> {
    let http = client::http_client(config)
        .map_err(|e| ApiError::internal(format!("HTTP client setup failed: {e}")))?;

    let source = WikidataClient::with_client(http.clone(), config);
    let resolver = DisseminClient::with_client(http, config);

    let tiles = build_tiles(source, resolver, limit).try_collect().await?;
    Ok(tiles)
}

async fn handle_log_action(state: &AppState, query: &ApiQuery) -> ApiResult<()> {
    let (Some(user), Some(tile), Some(decision)) =
        (query.user.as_deref(), query.tile.as_deref(), query.decision.as_deref())
    else {
        let missing: Vec<&str> = [
            ("user", query.user.is_none()),
            ("tile", query.tile.is_none()),
            ("decision", query.decision.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        return Err(ApiError::bad_request(format!(
            "missing parameter(s): {}",
            missing.join(", ")
        )));
    };

    state.log.append(user, tile, decision).await?;
    Ok(())
}

/// Render a payload as JSON, or as JSONP when a callback is given.
///
/// An absent payload is an empty 200, or `callback()` under JSONP.
fn render(payload: Option<Value>, callback: Option<&str>) -> Response {
    match (payload, callback) {
        (Some(value), None) => Json(value).into_response(),
        (None, None) => StatusCode::OK.into_response(),
        (payload, Some(callback)) => {
            let body = payload.map(|v| v.to_string()).unwrap_or_default();
            (
                [(header::CONTENT_TYPE, "application/javascript")],
                format!("{callback}({body})"),
            )
                .into_response()
        }
    }
}
