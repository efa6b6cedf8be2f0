use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_FILES_PATH, DEFAULT_HOST, DEFAULT_PORT,
    ENV_DATABASE_URL, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
};

/// Accepted bcrypt cost range
const PASSWORD_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// PostgreSQL connection URL (or use BOOKSHELF_DATABASE_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 2)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds, 0 to disable (default: 60)
    pub statement_timeout_secs: Option<u64>,
}

/// Asset storage section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilesFileConfig {
    pub path: Option<String>,
}

/// Authentication section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub password_cost: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub files: Option<FilesFileConfig>,
    pub auth: Option<AuthFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Overwrite `target` when `value` is set
fn merge_field<T: std::fmt::Debug>(target: &mut Option<T>, value: Option<T>, name: &str) {
    if value.is_some() {
        tracing::trace!(field = name, value = ?value, "Merging config field");
        *target = value;
    }
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            merge_field(&mut current.host, server.host, "server.host");
            merge_field(&mut current.port, server.port, "server.port");
        }

        if let Some(database) = other.database {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default);
            if database.url.is_some() {
                tracing::trace!(url = "***", "Merging database.url");
                current.url = database.url;
            }
            merge_field(
                &mut current.max_connections,
                database.max_connections,
                "database.max_connections",
            );
            merge_field(
                &mut current.min_connections,
                database.min_connections,
                "database.min_connections",
            );
            merge_field(
                &mut current.acquire_timeout_secs,
                database.acquire_timeout_secs,
                "database.acquire_timeout_secs",
            );
            merge_field(
                &mut current.idle_timeout_secs,
                database.idle_timeout_secs,
                "database.idle_timeout_secs",
            );
            merge_field(
                &mut current.max_lifetime_secs,
                database.max_lifetime_secs,
                "database.max_lifetime_secs",
            );
            merge_field(
                &mut current.statement_timeout_secs,
                database.statement_timeout_secs,
                "database.statement_timeout_secs",
            );
        }

        if let Some(files) = other.files {
            let current = self.files.get_or_insert_with(FilesFileConfig::default);
            merge_field(&mut current.path, files.path, "files.path");
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            merge_field(
                &mut current.password_cost,
                auth.password_cost,
                "auth.password_cost",
            );
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Max connection lifetime in seconds
    pub max_lifetime_secs: u64,
    /// Statement timeout in seconds (0 = disabled)
    pub statement_timeout_secs: u64,
}

/// Asset storage configuration
#[derive(Debug, Clone)]
pub struct FilesConfig {
    /// Root directory for covers and book files (`~` already expanded)
    pub path: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// bcrypt cost used for new password hashes
    pub password_cost: u32,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub files: FilesConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.bookshelf/bookshelf.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_sources(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            max_connections = config.database.max_connections,
            files_path = %config.files.path.display(),
            password_cost = config.auth.password_cost,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer defaults, merged file config and CLI/env overrides
    fn from_sources(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_files = file_config.files.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let database = DatabaseConfig {
            url: cli
                .database_url
                .clone()
                .or(file_database.url)
                .unwrap_or_default(),
            max_connections: file_database
                .max_connections
                .unwrap_or(POSTGRES_DEFAULT_MAX_CONNECTIONS),
            min_connections: file_database
                .min_connections
                .unwrap_or(POSTGRES_DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_secs: file_database
                .acquire_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout_secs: file_database
                .idle_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime_secs: file_database
                .max_lifetime_secs
                .unwrap_or(POSTGRES_DEFAULT_MAX_LIFETIME_SECS),
            statement_timeout_secs: file_database
                .statement_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
        };

        let files_path = match cli.files_path {
            Some(ref path) => expand_path(&path.to_string_lossy()),
            None => expand_path(file_files.path.as_deref().unwrap_or(DEFAULT_FILES_PATH)),
        };

        let password_cost = cli
            .password_cost
            .or(file_auth.password_cost)
            .unwrap_or(bcrypt::DEFAULT_COST);

        Self {
            server: ServerConfig { host, port },
            database,
            files: FilesConfig { path: files_path },
            auth: AuthConfig { password_cost },
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!(
                "Configuration error: database.url is required. \
                 Set via {} env var or database.url in config file.",
                ENV_DATABASE_URL
            );
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Configuration error: database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if !PASSWORD_COST_RANGE.contains(&self.auth.password_cost) {
            anyhow::bail!(
                "Configuration error: auth.password_cost must be between {} and {} (got {})",
                PASSWORD_COST_RANGE.start(),
                PASSWORD_COST_RANGE.end(),
                self.auth.password_cost
            );
        }

        if self.auth.password_cost < bcrypt::DEFAULT_COST {
            tracing::warn!(
                password_cost = self.auth.password_cost,
                "auth.password_cost is below the bcrypt default, hashes are cheaper to crack"
            );
        }

        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Binding to all network interfaces. The API has no authentication layer."
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.bookshelf/bookshelf.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_with_db() -> CliConfig {
        CliConfig {
            database_url: Some("postgres://localhost/bookshelf".to_string()),
            ..Default::default()
        }
    }

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file.write_all(json.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "database": { "url": "postgres://db/books", "max_connections": 5 },
            "files": { "path": "/srv/books" },
            "auth": { "password_cost": 10 }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url.as_deref(), Some("postgres://db/books"));
        assert_eq!(database.max_connections, Some(5));
        assert!(database.min_connections.is_none());
        assert_eq!(config.files.unwrap().path.as_deref(), Some("/srv/books"));
        assert_eq!(config.auth.unwrap().password_cost, Some(10));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.database.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "base.host", "port": 1000 },
                "database": { "url": "postgres://base", "max_connections": 4 }
            }"#,
        )
        .unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{
                "server": { "port": 2000 },
                "database": { "min_connections": 1 },
                "auth": { "password_cost": 8 }
            }"#,
        )
        .unwrap();

        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("base.host"));
        assert_eq!(server.port, Some(2000));
        let database = base.database.unwrap();
        assert_eq!(database.url.as_deref(), Some("postgres://base"));
        assert_eq!(database.max_connections, Some(4));
        assert_eq!(database.min_connections, Some(1));
        assert_eq!(base.auth.unwrap().password_cost, Some(8));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_sources(&cli_with_db(), FileConfig::default());
        config.validate().unwrap();

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(
            config.database.max_connections,
            POSTGRES_DEFAULT_MAX_CONNECTIONS
        );
        assert_eq!(
            config.database.statement_timeout_secs,
            POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS
        );
        assert_eq!(config.files.path, expand_path(DEFAULT_FILES_PATH));
        assert_eq!(config.auth.password_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_app_config_cli_overrides_file() {
        let file_config: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "file.host", "port": 1000 },
                "database": { "url": "postgres://file" },
                "auth": { "password_cost": 8 }
            }"#,
        )
        .unwrap();
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            database_url: Some("postgres://cli".to_string()),
            files_path: Some(PathBuf::from("/tmp/assets")),
            password_cost: Some(6),
            ..Default::default()
        };

        let config = AppConfig::from_sources(&cli, file_config);
        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 1000);
        assert_eq!(config.database.url, "postgres://cli");
        assert_eq!(config.files.path, PathBuf::from("/tmp/assets"));
        assert_eq!(config.auth.password_cost, 6);
    }

    #[test]
    fn test_app_config_load_from_cli_path() {
        let temp_file = write_config(
            r#"{
                "server": { "port": 9001 },
                "database": { "url": "postgres://from-file/books" }
            }"#,
        );
        let cli = CliConfig {
            config: Some(temp_file.path().to_path_buf()),
            ..Default::default()
        };

        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.database.url, "postgres://from-file/books");
    }

    #[test]
    fn test_app_config_missing_config_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/bookshelf.json")),
            ..cli_with_db()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_app_config_invalid_json() {
        let temp_file = write_config("{ not json");
        let cli = CliConfig {
            config: Some(temp_file.path().to_path_buf()),
            ..cli_with_db()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_app_config_validation_database_url_required() {
        let config = AppConfig::from_sources(&CliConfig::default(), FileConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.url is required"));
    }

    #[test]
    fn test_app_config_validation_empty_host() {
        let cli = CliConfig {
            host: Some(String::new()),
            ..cli_with_db()
        };
        let err = AppConfig::from_sources(&cli, FileConfig::default())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("server.host must not be empty"));
    }

    #[test]
    fn test_app_config_validation_server_port_zero() {
        let cli = CliConfig {
            port: Some(0),
            ..cli_with_db()
        };
        let err = AppConfig::from_sources(&cli, FileConfig::default())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("server.port must be greater than 0"));
    }

    #[test]
    fn test_app_config_validation_password_cost() {
        for cost in [3, 32] {
            let cli = CliConfig {
                password_cost: Some(cost),
                ..cli_with_db()
            };
            let err = AppConfig::from_sources(&cli, FileConfig::default())
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("auth.password_cost"));
        }

        let cli = CliConfig {
            password_cost: Some(4),
            ..cli_with_db()
        };
        assert!(
            AppConfig::from_sources(&cli, FileConfig::default())
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_app_config_validation_pool_bounds() {
        let file_config: FileConfig = serde_json::from_str(
            r#"{ "database": { "max_connections": 2, "min_connections": 5 } }"#,
        )
        .unwrap();
        let err = AppConfig::from_sources(&cli_with_db(), file_config)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("min_connections"));
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));

        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
        assert!(!is_all_interfaces("::1"));
    }
}
