//! CLI command definitions and dispatch.

pub mod audit;
pub mod demo;
pub mod migrate;
pub mod records;

use clap::{Parser, Subcommand};
use tracing::info;

use openwatch_core::config::{AppConfig, DatabaseBackend};
use openwatch_core::result::AppResult;
use openwatch_database::Stores;
use openwatch_integrity::build_anchor;
use openwatch_service::{AuditService, DemoActors, RecordService, ServiceSettings, seed_demo_records};

/// OpenWatch: accountable public records with an append-only audit trail
#[derive(Debug, Parser)]
#[command(name = "openwatch", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load from config/{env}.toml
    /// (falls back to OPENWATCH_ENV, then "development")
    #[arg(long, global = true)]
    pub env: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a create, update and delete lifecycle as the demo users
    Demo,
    /// Inspect and verify records
    Records(records::RecordsArgs),
    /// Inspect the audit trail
    Audit(audit::AuditArgs),
    /// Apply PostgreSQL schema migrations
    Migrate,
}

impl Cli {
    /// The configuration environment name.
    pub fn environment(&self) -> String {
        self.env
            .clone()
            .or_else(|| std::env::var("OPENWATCH_ENV").ok())
            .unwrap_or_else(|| "development".to_string())
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Demo => {
                let app = App::bootstrap(config).await?;
                let result = demo::execute(&app).await;
                app.stores.close().await;
                result
            }
            Commands::Records(args) => {
                let app = App::bootstrap(config).await?;
                let result = records::execute(args, &app).await;
                app.stores.close().await;
                result
            }
            Commands::Audit(args) => {
                let app = App::bootstrap(config).await?;
                let result = audit::execute(args, &app).await;
                app.stores.close().await;
                result
            }
        }
    }
}

/// Wired services for one CLI invocation.
pub struct App {
    pub config: AppConfig,
    pub stores: Stores,
    pub records: RecordService,
    pub audit: AuditService,
    pub actors: DemoActors,
}

impl App {
    /// Open the backend and build the services.
    ///
    /// The memory backend starts empty on every run, so it is seeded with
    /// the demo records first.
    pub async fn bootstrap(config: AppConfig) -> AppResult<Self> {
        let stores = Stores::open(&config.database).await?;
        let anchor = build_anchor(&config.anchor);
        let records = RecordService::new(
            stores.records.clone(),
            stores.audit.clone(),
            anchor,
            ServiceSettings::from_config(&config),
        );
        let audit = AuditService::new(stores.audit.clone(), config.audit.default_page_size);
        let app = Self {
            config,
            stores,
            records,
            audit,
            actors: DemoActors::new(),
        };

        if app.is_ephemeral() {
            let seeded = seed_demo_records(&app.records, &app.actors).await?;
            info!(records = seeded.len(), "Seeded in-memory demo records");
        }
        Ok(app)
    }

    /// Whether state disappears when the process exits.
    pub fn is_ephemeral(&self) -> bool {
        self.config.database.backend == DatabaseBackend::Memory
    }
}
