// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Web front end for a triage session
//!
//! Serves a status page with keyboard shortcuts and a JSON command API.
//! Every request takes the session lock for the whole command, so commands
//! run strictly one after another. No CORS headers are sent: only the page
//! served from the same origin may drive the API.

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{SessionConfig, BUCKET_COUNT};
use crate::history::HistoryEntry;
use crate::session::{SessionController, SessionState, Snapshot};
use crate::sorter::SortKey;
use crate::TriageError;

/// Shared application state
pub struct AppState {
    session: Mutex<SessionController>,
    config_path: PathBuf,
}

impl AppState {
    pub fn new(session: SessionController, config_path: PathBuf) -> Self {
        Self {
            session: Mutex::new(session),
            config_path,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionController> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(index_page))
        // API endpoints
        .route("/api/state", get(api_state))
        .route("/api/classify/:bucket", post(api_classify))
        .route("/api/skip", post(api_skip))
        .route("/api/back", post(api_back))
        .route("/api/undo", post(api_undo))
        .route("/api/next", post(api_next))
        .route("/api/previous", post(api_previous))
        .route("/api/reload", post(api_reload))
        .route("/api/config", get(api_get_config).put(api_put_config))
        .route("/api/history", get(api_history))
        .route("/api/current/file", get(api_current_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Errors ===

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    actionable: bool,
}

/// A session error rendered as JSON with a matching status code
pub struct ApiError(TriageError);

impl From<TriageError> for ApiError {
    fn from(e: TriageError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TriageError::InvalidBucket(_) | TriageError::Config(_) => StatusCode::BAD_REQUEST,
            TriageError::DestinationUnset { .. } | TriageError::InsufficientDestinations { .. } => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
            actionable: self.0.is_actionable(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

// === Page Handlers ===

async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let session = state.lock();
    Html(render_index(&session.snapshot(), session.config()))
}

// === API Handlers ===

async fn api_state(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.lock().snapshot())
}

async fn api_classify(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<usize>,
) -> ApiResult<Snapshot> {
    Ok(Json(state.lock().classify(bucket)?))
}

async fn api_skip(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.lock().skip())
}

async fn api_back(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.lock().go_back())
}

async fn api_undo(State(state): State<Arc<AppState>>) -> ApiResult<Snapshot> {
    Ok(Json(state.lock().undo()?))
}

async fn api_next(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.lock().advance())
}

async fn api_previous(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.lock().retreat())
}

async fn api_reload(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.lock().reload())
}

async fn api_get_config(State(state): State<Arc<AppState>>) -> Json<SessionConfig> {
    Json(state.lock().config().clone())
}

/// Partial update; omitted fields keep their value
#[derive(Debug, Default, Deserialize)]
pub struct ConfigPatch {
    pub input_folder: Option<String>,
    pub include_subfolders: Option<bool>,
    pub sort_method: Option<SortKey>,
    pub reverse_sort: Option<bool>,
    pub copy_mode: Option<bool>,
    pub output_folders: Option<[String; BUCKET_COUNT]>,
}

impl ConfigPatch {
    pub fn apply(self, config: &mut SessionConfig) {
        if let Some(v) = self.input_folder { config.input_folder = v; }
        if let Some(v) = self.include_subfolders { config.include_subfolders = v; }
        if let Some(v) = self.sort_method { config.sort_method = v; }
        if let Some(v) = self.reverse_sort { config.reverse_sort = v; }
        if let Some(v) = self.copy_mode { config.copy_mode = v; }
        if let Some(v) = self.output_folders { config.output_folders = v; }
    }
}

async fn api_put_config(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ConfigPatch>,
) -> Json<Snapshot> {
    let mut session = state.lock();
    let mut config = session.config().clone();
    patch.apply(&mut config);
    let snapshot = session.configure(config);
    session.config().persist(&state.config_path);
    Json(snapshot)
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

async fn api_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<HistoryEntry>> {
    let limit = query.limit.unwrap_or(50);
    let session = state.lock();
    Json(session.history().recent(limit).into_iter().cloned().collect())
}

async fn api_current_file(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let path = match state.lock().current() {
        Some(item) => item.path.clone(),
        None => return (StatusCode::NOT_FOUND, "Queue is empty").into_response(),
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(never) => match never {},
    }
}

// === Template Rendering ===

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn base_template(title: &str, content: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Triage</title>
    <style>
        :root {{
            --bg-primary: #1a1a2e;
            --bg-secondary: #16213e;
            --bg-card: #0f3460;
            --text-primary: #e8e8e8;
            --text-secondary: #a0a0a0;
            --accent: #e94560;
            --border: #2a2a4a;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }}
        .container {{ max-width: 1400px; margin: 0 auto; padding: 20px; }}
        .viewer {{
            background: var(--bg-card);
            border-radius: 12px;
            min-height: 60vh;
            display: flex;
            align-items: center;
            justify-content: center;
            margin-bottom: 20px;
        }}
        .viewer img {{ max-width: 100%; max-height: 75vh; }}
        .notice {{ color: var(--accent); font-size: 1.3em; }}
        .buckets {{ display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; }}
        .bucket {{
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 8px;
            padding: 10px;
        }}
        .bucket .key {{ color: var(--accent); font-weight: bold; }}
        .status {{ color: var(--text-secondary); margin-top: 15px; }}
    </style>
</head>
<body>
    <main class="container">
        {}
    </main>
    <div id="error" class="notice"></div>
    <script>
        const keys = {{ a: "/api/classify/1", s: "/api/classify/2", d: "/api/classify/3",
                        w: "/api/skip", x: "/api/back" }};
        document.addEventListener("keydown", async (e) => {{
            const route = (e.ctrlKey && e.key === "z") ? "/api/undo" : (!e.ctrlKey && keys[e.key]);
            if (!route) return;
            e.preventDefault();
            const res = await fetch(route, {{ method: "POST" }});
            if (!res.ok) {{
                const body = await res.json();
                alert(body.error);
            }}
            location.reload();
        }});
    </script>
</body>
</html>"#, title, content)
}

fn render_viewer(snapshot: &Snapshot) -> String {
    if snapshot.state != SessionState::Ready {
        let message = snapshot.state.message(&snapshot.input).unwrap_or_default();
        return format!(r#"<div class="notice">{}</div>"#, escape_html(&message));
    }

    match &snapshot.current {
        Some(item) if item.kind.is_still() => {
            format!(r#"<img src="/api/current/file" alt="{}">"#, escape_html(&item.file_name()))
        }
        Some(item) => format!(
            r#"<div>{:?} file: {} <a href="/api/current/file">open</a></div>"#,
            item.kind,
            escape_html(&item.file_name())
        ),
        None => String::new(),
    }
}

fn render_index(snapshot: &Snapshot, config: &SessionConfig) -> String {
    let keys = ["A", "S", "D"];
    let buckets: String = (1..=BUCKET_COUNT)
        .map(|b| {
            let folder = config
                .destination(b)
                .map(|p| escape_html(&p.display().to_string()))
                .unwrap_or_else(|| "(unset)".to_string());
            format!(
                r#"<div class="bucket"><span class="key">{}</span> {}</div>"#,
                keys[b - 1],
                folder
            )
        })
        .collect();

    let content = format!(r#"
        <div class="viewer">{}</div>
        <div class="buckets">{}</div>
        <div class="status">{} &middot; mode: {} &middot; skipped: {} &middot; undo: {}
            &middot; W skip, X recall, Ctrl+Z undo</div>
    "#,
        render_viewer(snapshot),
        buckets,
        escape_html(&snapshot.to_string()),
        snapshot.mode,
        snapshot.skipped,
        snapshot.history,
    );

    base_template("Session", &content)
}

/// Start the web server for a session
pub async fn start_server(
    session: SessionController,
    config_path: PathBuf,
    host: &str,
    port: u16,
) -> crate::Result<()> {
    let state = Arc::new(AppState::new(session, config_path));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Web UI available at http://{}", addr);

    let router = create_router(state);
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&"#), "&lt;a href=&quot;x&quot;&gt;&amp;");
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        let mut config = SessionConfig::default();
        config.input_folder = "/in".to_string();
        let patch: ConfigPatch = serde_json::from_str(r#"{"sort_method": "size"}"#).unwrap();
        patch.apply(&mut config);
        assert_eq!(config.input_folder, "/in");
        assert_eq!(config.sort_method, SortKey::Size);
    }
}
