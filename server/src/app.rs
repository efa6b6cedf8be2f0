//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::files::FilesystemStorage;
use crate::data::postgres::PostgresService;
use crate::domain::{BookService, UserService};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<PostgresService>,
    pub users: UserService,
    pub books: BookService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;

        match command {
            Some(Commands::InitDb) => Self::init_db(&config).await,
            Some(Commands::Start) | None => {
                let app = Self::init(config).await?;
                Self::start_server(app).await
            }
        }
    }

    /// Create the schema and exit
    async fn init_db(config: &AppConfig) -> Result<()> {
        let database = PostgresService::init(&config.database)
            .await
            .context("Failed to initialize database")?;
        database.close().await;
        tracing::info!("Database schema is up to date");
        Ok(())
    }

    async fn init(config: AppConfig) -> Result<Self> {
        let database = Arc::new(
            PostgresService::init(&config.database)
                .await
                .context("Failed to initialize database")?,
        );
        let assets = Arc::new(
            FilesystemStorage::init(config.files.path.clone())
                .await
                .with_context(|| {
                    format!(
                        "Failed to initialize asset directory: {}",
                        config.files.path.display()
                    )
                })?,
        );

        let users = UserService::new(
            database.clone(),
            database.clone(),
            config.auth.password_cost,
        );
        let books = BookService::new(database.clone(), database.clone(), assets);

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            database,
            users,
            books,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            files = %app.config.files.path.display(),
            "{} starting",
            APP_NAME
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;

        app.shutdown.shutdown().await;
        app.database.close().await;
        tracing::debug!("Shutdown complete");

        Ok(())
    }

    async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_health_check_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
