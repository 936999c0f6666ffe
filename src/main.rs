//! `guest-seating <request.json>`
//!
//! Runs one seating request against in-memory collaborators seeded from the
//! request file, optionally persisting to PostgreSQL, and prints the result
//! JSON on stdout. Logs go to stderr.

use serde::Deserialize;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use guest_seating::adapters::ai::{
    AnthropicConfig, AnthropicProvider, LlmGroupingAdvisor, OpenAIConfig, OpenAIProvider,
};
use guest_seating::adapters::memory::{
    InMemoryDistributionRepository, InMemoryRosterProvider, InMemoryVenueProvider,
};
use guest_seating::adapters::postgres::PostgresDistributionRepository;
use guest_seating::application::{
    GenerateDistributionCommand, GenerateDistributionHandler, GenerateDistributionResult,
    RestaurantRequest,
};
use guest_seating::config::{AiConfig, AiProvider, AppConfig, DatabaseConfig};
use guest_seating::domain::foundation::{DomainError, ErrorCode, EventId};
use guest_seating::domain::seating::{RawGuestRecord, Restaurant, SeatingEngine};
use guest_seating::ports::{AIError, AIProvider, DistributionRepository, GroupingAdvisor};

/// The request file: the invocation fields plus the data the booking and
/// venue collaborators would otherwise supply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestFile {
    event_id: String,
    #[serde(default)]
    group_size: Option<u32>,
    #[serde(default, alias = "useAI")]
    use_ai: bool,
    #[serde(default = "default_allow_relaxation")]
    allow_constraint_relaxation: bool,
    #[serde(default)]
    clear_existing: bool,
    #[serde(default)]
    restaurants: Vec<RestaurantRequest>,
    #[serde(default)]
    guests: Vec<RawGuestRecord>,
    /// Restaurants known to the venue collaborator, booked for the event.
    #[serde(default)]
    venues: Vec<Restaurant>,
}

fn default_allow_relaxation() -> bool {
    true
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(output) => {
                println!("{}", output);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode result: {}", e),
            )),
        },
        Err(e) => fail(&e),
    }
}

fn fail(error: &DomainError) -> ExitCode {
    let body = json!({
        "error": {
            "code": error.code.to_string(),
            "message": error.message,
            "details": error.details,
        }
    });
    println!("{}", body);
    ExitCode::FAILURE
}

async fn run() -> Result<GenerateDistributionResult, DomainError> {
    let config = AppConfig::load()
        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
    init_tracing(config.features.json_logs);
    config
        .validate()
        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

    let path = std::env::args().nth(1).ok_or_else(|| {
        DomainError::validation("request", "usage: guest-seating <request.json>")
    })?;
    let request = read_request(&path).await?;
    let event_id = EventId::new(request.event_id.as_str())?;

    let rosters = InMemoryRosterProvider::new();
    rosters.insert(event_id.clone(), request.guests).await;
    let venues = InMemoryVenueProvider::new();
    let booked = request.venues.iter().map(|v| v.id.clone()).collect();
    for venue in request.venues {
        venues.add(venue).await;
    }
    venues.book(event_id.clone(), booked).await;

    let repository: Arc<dyn DistributionRepository> = match &config.database {
        Some(database) => Arc::new(connect(database).await?),
        None => Arc::new(InMemoryDistributionRepository::new()),
    };

    let engine = SeatingEngine::new(config.seating.policy())?;
    let mut handler = GenerateDistributionHandler::new(
        Arc::new(rosters),
        Arc::new(venues),
        repository,
        engine,
    )
    .with_default_group_size(config.seating.default_group_size);

    if config.features.enable_ai_refinement {
        match build_advisor(&config.ai) {
            Ok(advisor) => {
                info!(advisor = advisor.name(), "AI refinement enabled");
                handler = handler.with_advisor(advisor, config.seating.ai_timeout());
            }
            Err(e) => warn!(error = %e, "AI refinement unavailable, using heuristic grouping"),
        }
    }

    handler
        .handle(GenerateDistributionCommand {
            event_id,
            group_size: request.group_size,
            use_ai: request.use_ai,
            allow_constraint_relaxation: request.allow_constraint_relaxation,
            clear_existing: request.clear_existing,
            restaurants: request.restaurants,
        })
        .await
}

fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn read_request(path: &str) -> Result<RequestFile, DomainError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::validation("request", format!("Cannot read {}: {}", path, e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        DomainError::validation("request", format!("Invalid request file {}: {}", path, e))
    })
}

async fn connect(database: &DatabaseConfig) -> Result<PostgresDistributionRepository, DomainError> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(Some(database.idle_timeout()))
        .max_lifetime(Some(database.max_lifetime()))
        .connect(&database.url)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to connect to database: {}", e),
            )
        })?;
    info!("Connected to database");

    let repository = PostgresDistributionRepository::new(pool);
    if database.run_migrations {
        repository.migrate().await?;
        info!("Database migrations applied");
    }
    Ok(repository)
}

fn build_advisor(ai: &AiConfig) -> Result<Arc<dyn GroupingAdvisor>, AIError> {
    let key = ai.api_key().ok_or(AIError::AuthenticationFailed)?;
    let provider: Arc<dyn AIProvider> = match ai.provider {
        AiProvider::Anthropic => {
            let mut config = AnthropicConfig::new(key)
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = &ai.model {
                config = config.with_model(model);
            }
            if let Some(url) = &ai.base_url {
                config = config.with_base_url(url);
            }
            Arc::new(AnthropicProvider::new(config)?)
        }
        AiProvider::OpenAI => {
            let mut config = OpenAIConfig::new(key)
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = &ai.model {
                config = config.with_model(model);
            }
            if let Some(url) = &ai.base_url {
                config = config.with_base_url(url);
            }
            Arc::new(OpenAIProvider::new(config)?)
        }
    };
    Ok(Arc::new(LlmGroupingAdvisor::new(provider)))
}
