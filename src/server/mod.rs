//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::commands::generate::watch_with;
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: blog.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let blog = blog.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(blog, reload_tx) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch for file changes, rebuild, and tell connected pages to reload
fn watch_and_reload(blog: Blog, reload_tx: broadcast::Sender<()>) -> Result<()> {
    watch_with(&blog, || {
        let _ = reload_tx.send(());
    })
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serves files, falling back to `404.html`, and injects the reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let file_path = resolve_request_path(&state.public_dir, request.uri().path());

    let Some(file_path) = file_path else {
        return not_found(&state).await;
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => not_found(&state).await,
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

async fn not_found(state: &ServerState) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("404.html")).await {
        Ok(content) => {
            let content = if state.live_reload {
                inject_live_reload(&content)
            } else {
                content
            };
            (StatusCode::NOT_FOUND, Html(content)).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Map a request path to a file under the public directory
fn resolve_request_path(public_dir: &Path, path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let clean_path = decoded.trim_start_matches('/');
    if clean_path
        .split(['/', '\\'])
        .any(|segment| segment == "..")
    {
        return None;
    }

    let candidate = public_dir.join(clean_path);
    if candidate.is_dir() {
        let index = candidate.join("index.html");
        return index.is_file().then_some(index);
    }
    if candidate.is_file() {
        return Some(candidate);
    }

    let with_html = public_dir.join(format!("{}.html", clean_path.trim_end_matches('/')));
    with_html.is_file().then_some(with_html)
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}
