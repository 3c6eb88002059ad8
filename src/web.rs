//! HTTP surface: the map page, the static documents and a health probe

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::PoiMapSettings;
use crate::loader::{ConfigLoader, DirectorySource, DocumentSource, HttpSource, resolve_identifier};
use crate::presenter::page::WidgetParams;
use crate::presenter::{MapPresenter, PresenterOptions, render_notice, render_page};
use crate::PoiMapError;

#[derive(Clone)]
pub struct AppState {
    pub loader: ConfigLoader,
    pub settings: Arc<PoiMapSettings>,
    pub api_key: Arc<str>,
}

impl AppState {
    /// Fails with [`PoiMapError::MissingCredential`] when no map API key is configured.
    pub fn from_settings(settings: PoiMapSettings) -> crate::Result<Self> {
        let api_key: Arc<str> = Arc::from(settings.require_api_key()?);
        let loader = ConfigLoader::new(document_source(&settings)?);
        Ok(Self {
            loader,
            settings: Arc::new(settings),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub config: Option<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

/// Remote source when `documents.remote_base_url` is set, the local directory otherwise
pub fn document_source(settings: &PoiMapSettings) -> crate::Result<Arc<dyn DocumentSource>> {
    let documents = &settings.documents;
    let source: Arc<dyn DocumentSource> = match &documents.remote_base_url {
        Some(base_url) => Arc::new(HttpSource::new(
            base_url,
            u64::from(documents.timeout_seconds),
        )?),
        None => Arc::new(DirectorySource::new(&documents.dir)),
    };
    Ok(source)
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let documents = ServeDir::new(&state.settings.documents.dir);

    Router::new()
        .route("/", get(map_page))
        .route("/health", get(health))
        .nest_service("/configs", documents)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn status_for(err: &PoiMapError) -> StatusCode {
    match err {
        PoiMapError::MissingParameter { .. }
        | PoiMapError::InvalidParameter { .. }
        | PoiMapError::MalformedQuery { .. } => StatusCode::BAD_REQUEST,
        PoiMapError::NotFound { .. } => StatusCode::NOT_FOUND,
        PoiMapError::Fetch { .. } => StatusCode::BAD_GATEWAY,
        PoiMapError::Parse { .. } | PoiMapError::Validation { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PoiMapError::MissingCredential { .. }
        | PoiMapError::Settings { .. }
        | PoiMapError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn notice_response(err: &PoiMapError) -> Response {
    (status_for(err), Html(render_notice(err))).into_response()
}

async fn map_page(
    State(state): State<AppState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!("Rejected map page query: {}", rejection.body_text());
            return notice_response(&PoiMapError::MalformedQuery {
                message: rejection.body_text(),
            });
        }
    };

    let identifier = match resolve_identifier(query.config.as_deref()) {
        Ok(identifier) => identifier,
        Err(e) => {
            tracing::warn!("Map page requested without a usable document name: {}", e);
            return notice_response(&e);
        }
    };

    let mut presenter = MapPresenter::new(PresenterOptions::from(&state.settings.maps));
    if let Err(e) = presenter.load(state.loader.load_identifier(&identifier).await) {
        return notice_response(&e);
    }

    // deep link to an open panel; later clicks are handled in the page
    if let Some(name) = query.selected.as_deref() {
        presenter.click(name);
    }

    match presenter.view() {
        Some(view) => {
            let widget = WidgetParams {
                api_key: &state.api_key,
                map_id: &state.settings.maps.map_id,
            };
            Html(render_page(&view, &identifier, widget)).into_response()
        }
        None => notice_response(&PoiMapError::NotFound { identifier }),
    }
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

/// Serve until ctrl-c or SIGTERM.
pub async fn run(state: AppState) -> Result<()> {
    let addr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Received shutdown signal, stopping web server");
}
