use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DATABASE_URL, ENV_FILES_PATH, ENV_HOST, ENV_PASSWORD_COST, ENV_PORT,
};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(version, about = "Books platform backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection URL
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Directory for book covers and files
    #[arg(long, global = true, env = ENV_FILES_PATH)]
    pub files_path: Option<PathBuf>,

    /// bcrypt cost for new password hashes (4-31)
    #[arg(long, global = true, env = ENV_PASSWORD_COST)]
    pub password_cost: Option<u32>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Create the database schema and exit
    InitDb,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
    pub files_path: Option<PathBuf>,
    pub password_cost: Option<u32>,
}

impl Cli {
    /// Split parsed arguments into config overrides and the subcommand
    pub fn into_parts(self) -> (CliConfig, Option<Commands>) {
        let config = CliConfig {
            host: self.host,
            port: self.port,
            config: self.config,
            database_url: self.database_url,
            files_path: self.files_path,
            password_cost: self.password_cost,
        };
        (config, self.command)
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    Cli::parse().into_parts()
}
