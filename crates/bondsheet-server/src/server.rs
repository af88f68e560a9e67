//! Preview server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Request, State,
    },
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use crate::livereload::{reload_client_script, ReloadHub, ReloadMessage};
use crate::watcher::{FileWatcher, WatchEvent};

/// Largest HTML body the reload-script injection will buffer.
const MAX_INJECT_BYTES: usize = 4 * 1024 * 1024;

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Directory containing the built site
    pub site_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Watch the site directory and push reloads
    pub watch: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("dist"),
            port: 4000,
            host: "127.0.0.1".to_string(),
            open: true,
            watch: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Site directory not found: {0}")]
    MissingSiteDir(String),
}

/// Shared server state.
#[derive(Clone)]
struct ServerState {
    hub: ReloadHub,
}

/// Preview server for the built site.
pub struct PreviewServer {
    config: PreviewConfig,
}

impl PreviewServer {
    /// Create a new preview server.
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Start the preview server.
    pub async fn start(self) -> Result<(), ServerError> {
        if !self.config.site_dir.is_dir() {
            return Err(ServerError::MissingSiteDir(
                self.config.site_dir.display().to_string(),
            ));
        }

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .expect("Invalid address");

        let state = ServerState {
            hub: ReloadHub::new(),
        };

        if self.config.watch {
            let (watcher, mut rx) = FileWatcher::new(&[self.config.site_dir.clone()])
                .map_err(|e| ServerError::WatchError(e.to_string()))?;

            let hub = state.hub.clone();
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    push_reload(&hub, event);
                }
                // Keep watcher alive
                drop(watcher);
            });
        }

        let mut app = Router::new()
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(reload_script_handler))
            .fallback_service(ServeDir::new(&self.config.site_dir));

        if self.config.watch {
            app = app.layer(middleware::from_fn(inject_reload_script));
        }
        let app = app.with_state(state);

        tracing::info!(
            "Previewing {} at http://{}",
            self.config.site_dir.display(),
            addr
        );

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Map a watch event to what connected browsers need to do.
fn push_reload(hub: &ReloadHub, event: WatchEvent) {
    match event {
        WatchEvent::StyleChanged(path) => {
            tracing::info!("Stylesheet changed: {}", path.display());
            hub.send(ReloadMessage::RefreshStyles);
        }
        WatchEvent::PageChanged(path) => {
            tracing::info!("Page changed: {}", path.display());
            hub.send(ReloadMessage::Reload);
        }
        WatchEvent::DataChanged(path) => {
            tracing::info!("Dataset changed: {}", path.display());
            hub.send(ReloadMessage::Reload);
        }
        WatchEvent::Created(_) | WatchEvent::Deleted(_) | WatchEvent::Modified(_) => {
            hub.send(ReloadMessage::Reload);
        }
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: ServerState) {
    let mut rx = state.hub.subscribe();

    let msg = serde_json::to_string(&ReloadMessage::Connected).unwrap();
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    while let Ok(reload) = rx.recv().await {
        let json = serde_json::to_string(&reload).unwrap();
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    let script = reload_client_script("/__reload");
    ([("content-type", "application/javascript")], script)
}

/// Tag served HTML pages with the reload client script. Non-HTML responses
/// and oversized bodies pass through untouched.
async fn inject_reload_script(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("text/html"))
        .unwrap_or(false);
    let small_enough = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok())
        .map(|length| length <= MAX_INJECT_BYTES)
        .unwrap_or(true);
    if !is_html || !small_enough {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_INJECT_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to buffer page").into_response()
        }
    };

    let injected = inject_script_tag(&String::from_utf8_lossy(&bytes));
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(injected))
}

/// Insert the script tag before `</body>`, or append it when the page has
/// no closing body tag.
fn inject_script_tag(html: &str) -> String {
    const TAG: &str = r#"<script src="/__reload.js"></script>"#;
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}\n{}", &html[..pos], TAG, &html[pos..]),
        None => format!("{html}\n{TAG}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_server_with_default_config() {
        let server = PreviewServer::new(PreviewConfig::default());
        assert_eq!(server.config.port, 4000);
        assert_eq!(server.config.site_dir, PathBuf::from("dist"));
        assert!(server.config.watch);
    }

    #[test]
    fn script_tag_lands_before_the_closing_body_tag() {
        let html = "<html><body><h1>Bonds</h1></body></html>";

        let injected = inject_script_tag(html);

        let tag_pos = injected.find("/__reload.js").unwrap();
        let body_pos = injected.find("</body>").unwrap();
        assert!(tag_pos < body_pos);
        assert!(injected.contains("<h1>Bonds</h1>"));
    }

    #[test]
    fn pages_without_a_body_tag_get_the_script_appended() {
        let injected = inject_script_tag("<h1>partial</h1>");

        assert!(injected.ends_with(r#"<script src="/__reload.js"></script>"#));
    }

    #[test]
    fn style_changes_swap_without_a_full_reload() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        push_reload(&hub, WatchEvent::StyleChanged(PathBuf::from("style.css")));
        push_reload(&hub, WatchEvent::DataChanged(PathBuf::from("holdings.csv")));

        assert!(matches!(rx.try_recv(), Ok(ReloadMessage::RefreshStyles)));
        assert!(matches!(rx.try_recv(), Ok(ReloadMessage::Reload)));
    }

    #[tokio::test]
    async fn missing_site_dir_fails_to_start() {
        let config = PreviewConfig {
            site_dir: PathBuf::from("/nonexistent/bondsheet-dist"),
            open: false,
            ..PreviewConfig::default()
        };

        let result = PreviewServer::new(config).start().await;

        assert!(matches!(result, Err(ServerError::MissingSiteDir(_))));
    }
}
