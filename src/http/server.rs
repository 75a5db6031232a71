//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the CMS handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Hand each request under the serving path to the content core through
//!   one container request/response pair and one `HttpCmsResponse`
//! - Record per-response metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cms::{HttpCmsResponse, ResponseKind, Site};
use crate::config::CmsConfig;
use crate::http::request::{x_request_id, RequestIdExt};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::servlet::{ContainerRequest, ContainerResponse, ServletRequest};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
    pub serving_path: Arc<str>,
    pub buffer_size: usize,
}

/// HTTP server for the CMS.
pub struct CmsServer {
    router: Router,
    config: CmsConfig,
}

impl CmsServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: CmsConfig) -> Self {
        let site = Site::from_config(&config.site);
        tracing::info!(
            serving_path = %config.site.serving_path,
            pages = site.page_count(),
            "Site loaded"
        );

        let state = AppState {
            site: Arc::new(site),
            serving_path: Arc::from(config.site.serving_path.as_str()),
            buffer_size: config.response.buffer_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &CmsConfig, state: AppState) -> Router {
        Router::new()
            .fallback(cms_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(x_request_id()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(x_request_id(), MakeRequestUuid))
    }

    /// The router, for serving on a custom transport or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            serving_path = %self.config.site.serving_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CmsConfig {
        &self.config
    }
}

/// Serve one request through the content core.
async fn cms_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, _body) = request.into_parts();
    let request_id = parts.headers.request_id().to_string();

    let Some(req) = ContainerRequest::from_parts(&parts, &state.serving_path) else {
        tracing::debug!(
            request_id = %request_id,
            path = %parts.uri.path(),
            "Outside serving path"
        );
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    let mut res = ContainerResponse::for_request(&req, state.buffer_size);
    let result = {
        let mut cms = HttpCmsResponse::new(&req, &mut res);
        state.site.serve(req.method(), req.path_info(), &mut cms)
    };

    match result {
        Ok(outcome) => {
            let status = res.status().as_u16();
            tracing::debug!(
                request_id = %request_id,
                method = %req.method(),
                path = %req.path_info(),
                outcome = outcome.as_str(),
                status,
                "Served"
            );
            metrics::record_response(ResponseKind::Http, outcome, status, start);
            res.into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                path = %req.path_info(),
                error = %e,
                "Transport failure"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
