//! Wiring - assembles engine, registry and handlers from concrete adapters.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::adapters::http::{api_router, IntakeHandlers};
use crate::adapters::StaticCatalogProvider;
use crate::application::handlers::intake::{
    ExpireIdleSessionsCommand, ExpireIdleSessionsHandler, GetProgressHandler, StartIntakeHandler,
    SubmitAnswerHandler,
};
use crate::application::{CommitAdapter, ConversationEngine, SessionRegistry};
use crate::config::ServerConfig;
use crate::domain::foundation::Timestamp;
use crate::domain::intake::{CatalogOption, CatalogQuery};
use crate::ports::{CatalogProvider, RecordSink, TranscriptSink};

/// Everything the outer surfaces need, built once at startup.
#[derive(Clone)]
pub struct IntakeServices {
    pub engine: Arc<ConversationEngine>,
    pub registry: Arc<SessionRegistry>,
    pub transcript_sink: Arc<dyn TranscriptSink>,
    pub start_handler: Arc<StartIntakeHandler>,
    pub submit_handler: Arc<SubmitAnswerHandler>,
    pub progress_handler: Arc<GetProgressHandler>,
    pub expire_handler: Arc<ExpireIdleSessionsHandler>,
}

impl IntakeServices {
    pub fn new(
        catalog_provider: Arc<dyn CatalogProvider>,
        record_sink: Arc<dyn RecordSink>,
        transcript_sink: Arc<dyn TranscriptSink>,
        idle_timeout_secs: u64,
    ) -> Self {
        let engine = Arc::new(ConversationEngine::new(
            catalog_provider,
            CommitAdapter::new(record_sink),
        ));
        let registry = Arc::new(SessionRegistry::new());

        Self {
            start_handler: Arc::new(StartIntakeHandler::new(engine.clone(), registry.clone())),
            submit_handler: Arc::new(SubmitAnswerHandler::new(
                engine.clone(),
                registry.clone(),
                transcript_sink.clone(),
            )),
            progress_handler: Arc::new(GetProgressHandler::new(registry.clone())),
            expire_handler: Arc::new(ExpireIdleSessionsHandler::new(
                engine.clone(),
                registry.clone(),
                transcript_sink.clone(),
                idle_timeout_secs,
            )),
            engine,
            registry,
            transcript_sink,
        }
    }

    pub fn http_handlers(&self) -> IntakeHandlers {
        IntakeHandlers::new(
            self.start_handler.clone(),
            self.submit_handler.clone(),
            self.progress_handler.clone(),
        )
    }
}

/// API router with tracing, request timeout and CORS applied.
pub fn build_router(services: &IntakeServices, server: &ServerConfig) -> Router {
    api_router(services.http_handlers())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

/// Runs the idle-session sweep every `interval` until the task is aborted.
pub fn spawn_idle_sweep(
    handler: Arc<ExpireIdleSessionsHandler>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let result = handler
                .handle(ExpireIdleSessionsCommand {
                    now: Timestamp::now(),
                })
                .await;
            if result.expired.is_empty() && result.evicted.is_empty() {
                debug!("Idle sweep found nothing to do");
            } else {
                info!(
                    expired = result.expired.len(),
                    evicted = result.evicted.len(),
                    "Idle sweep finished"
                );
            }
        }
    })
}

/// Catalog served when no database is configured, so the risk intake's
/// lookup steps have something to choose from.
pub fn sample_catalog() -> StaticCatalogProvider {
    StaticCatalogProvider::new()
        .with_options(
            CatalogQuery::RiskCategories,
            vec![
                CatalogOption::new(1, "Compliance"),
                CatalogOption::new(2, "Cybersecurity"),
                CatalogOption::new(3, "Financial"),
                CatalogOption::new(4, "Operational"),
                CatalogOption::new(5, "Strategic"),
            ],
        )
        .with_options(
            CatalogQuery::InformationAssets,
            vec![
                CatalogOption::new(1, "Customer Database"),
                CatalogOption::new(2, "Email Server"),
                CatalogOption::new(3, "HR Records"),
            ],
        )
}
