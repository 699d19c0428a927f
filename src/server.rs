//! HTTP server for the dashboard.
//!
//! A plain hyper http1 server: one task per connection, every request routed
//! by [`respond`]. Peers outside the allow-list get `403` on every route.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use conduit_console::{server, Dashboard, FileSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = Arc::new(FileSource::new("/var/log/conduit.log", 200));
//!     let dashboard = Arc::new(Dashboard::builder(source).build());
//!     server::serve(dashboard, "127.0.0.1:8080".parse()?).await
//! }
//! ```

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::actions::Action;
use crate::app::Dashboard;
use crate::ui::{fragments, page};

/// Title of the dashboard page.
pub const PAGE_TITLE: &str = "KhajunBridge";

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";
const JSON: &str = "application/json";

/// Bind `addr` and serve the dashboard until the listener fails.
pub async fn serve(dashboard: Arc<Dashboard>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        "Dashboard listening on http://{} (logs from {})",
        addr,
        dashboard.source_description()
    );

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Accept error: {}", e);
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let dashboard = dashboard.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let dashboard = dashboard.clone();
                async move {
                    Ok::<_, Infallible>(
                        respond(&dashboard, req.method(), req.uri().path(), peer.ip()).await,
                    )
                }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

/// Route a single request.
pub async fn respond(
    dashboard: &Dashboard,
    method: &Method,
    path: &str,
    peer: IpAddr,
) -> Response<Full<Bytes>> {
    if !dashboard.access().allows(peer) {
        warn!("Denied {} {} from {}", method, path, peer);
        return reply(StatusCode::FORBIDDEN, TEXT, "Forbidden");
    }

    if let Some(action) = Action::from_route(path) {
        if *method != Method::POST {
            let mut response = reply(StatusCode::METHOD_NOT_ALLOWED, TEXT, "Method Not Allowed");
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("POST"));
            return response;
        }
        info!("{} requested by {}", action.label(), peer);
        let result = dashboard.run_action(action).await;
        return reply(
            StatusCode::OK,
            HTML,
            fragments::render_log_text(&result.output),
        );
    }

    if *method != Method::GET && *method != Method::HEAD {
        return not_found();
    }

    match path {
        "/" => reply(StatusCode::OK, HTML, page::render_page(PAGE_TITLE)),
        "/status" => reply(
            StatusCode::OK,
            HTML,
            fragments::render_status(dashboard.service_state().await),
        ),
        "/overview" => reply(
            StatusCode::OK,
            HTML,
            fragments::render_overview(&dashboard.overview().await),
        ),
        "/logs" => reply(
            StatusCode::OK,
            HTML,
            fragments::render_log_text(&dashboard.logs_text().await),
        ),
        "/api/telemetry" => match serde_json::to_string(&dashboard.telemetry().await) {
            Ok(body) => reply(StatusCode::OK, JSON, body),
            Err(e) => {
                warn!("Failed to encode telemetry: {}", e);
                reply(StatusCode::INTERNAL_SERVER_ERROR, TEXT, "Internal Server Error")
            }
        },
        "/health" | "/healthz" => reply(StatusCode::OK, TEXT, "OK"),
        _ => not_found(),
    }
}

fn not_found() -> Response<Full<Bytes>> {
    reply(StatusCode::NOT_FOUND, TEXT, "Not Found")
}

fn reply(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
