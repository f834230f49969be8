//! Workflow survey server.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use workflow_survey::adapters::ai::{MockContentGenerator, OpenAIConfig, OpenAIContentGenerator};
use workflow_survey::adapters::http::{app_router, SurveyHandlers};
use workflow_survey::adapters::postgres::PostgresSurveyStore;
use workflow_survey::adapters::storage::{FileSurveyStore, InMemorySurveyStore};
use workflow_survey::application::handlers::survey::{
    GetResultHandler, ListResultsHandler, ProcessTurnHandler, StartSurveyHandler,
};
use workflow_survey::config::{AiConfig, AppConfig, GeneratorKind, StorageBackend, StorageConfig};
use workflow_survey::domain::survey::{RegistryOptions, StepProcessor, StepRegistry};
use workflow_survey::ports::{ContentGenerator, SurveyStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let registry = StepRegistry::standard(RegistryOptions {
        tool_phase_mapping: config.features.tool_phase_mapping,
    });
    registry.validate()?;
    info!(steps = registry.len(), "Step registry loaded");

    let processor = Arc::new(
        StepProcessor::new(build_generator(&config.ai)?)
            .with_registry(Arc::new(registry))
            .with_generation_timeout(config.ai.generation_timeout()),
    );
    let store = build_store(&config.storage).await?;

    let handlers = SurveyHandlers::new(
        Arc::new(StartSurveyHandler::new(processor.clone(), store.clone())),
        Arc::new(ProcessTurnHandler::new(processor, store.clone())),
        Arc::new(ListResultsHandler::new(store.clone())),
        Arc::new(GetResultHandler::new(store)),
    );
    let app = app_router(handlers, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Survey server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Survey server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

fn build_generator(config: &AiConfig) -> Result<Arc<dyn ContentGenerator>, BoxError> {
    match (config.generator, config.openai_api_key.as_deref()) {
        (GeneratorKind::OpenAI, Some(key)) => {
            let openai = OpenAIConfig::new(key)
                .with_model(config.model.as_str())
                .with_base_url(config.base_url.as_str())
                .with_timeout(config.generation_timeout());
            info!(model = %config.model, "Using OpenAI content generator");
            Ok(Arc::new(OpenAIContentGenerator::new(openai)?))
        }
        _ => {
            warn!("Using mock content generator; generated steps will return canned questions");
            Ok(Arc::new(MockContentGenerator::new()))
        }
    }
}

async fn build_store(config: &StorageConfig) -> Result<Arc<dyn SurveyStore>, BoxError> {
    match config.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory survey store; results are lost on restart");
            Ok(Arc::new(InMemorySurveyStore::new()))
        }
        StorageBackend::File => {
            info!(data_dir = %config.data_dir.display(), "Using file survey store");
            Ok(Arc::new(FileSurveyStore::new(&config.data_dir)))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or("SURVEY__STORAGE__DATABASE_URL is required for the postgres backend")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .acquire_timeout(config.acquire_timeout())
                .connect(url)
                .await?;
            let store = PostgresSurveyStore::new(pool);
            if config.run_migrations {
                store.migrate().await?;
                info!("Database migrations applied");
            }
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
    }
}
