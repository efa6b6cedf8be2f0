// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Bookshelf";

/// Application name in lowercase (for paths, identifiers and log filters)
pub const APP_NAME_LOWER: &str = "bookshelf";

/// Unix-style dotfile folder name holding the profile config
pub const APP_DOT_FOLDER: &str = ".bookshelf";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "bookshelf.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "BOOKSHELF_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "BOOKSHELF_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "BOOKSHELF_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "BOOKSHELF_LOG";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable for PostgreSQL connection URL
pub const ENV_DATABASE_URL: &str = "BOOKSHELF_DATABASE_URL";

/// Environment variable for the asset directory
pub const ENV_FILES_PATH: &str = "BOOKSHELF_FILES_PATH";

/// Environment variable for the bcrypt cost
pub const ENV_PASSWORD_COST: &str = "BOOKSHELF_PASSWORD_COST";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5388;

/// Default body limit for general API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for cover and book file uploads (50 MB)
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

// =============================================================================
// Files
// =============================================================================

/// Default asset directory, relative to the working directory
pub const DEFAULT_FILES_PATH: &str = "./files";

// =============================================================================
// PostgreSQL Database
// =============================================================================

/// PostgreSQL default max connections
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL default min connections (keep warm for low latency)
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// PostgreSQL default connection acquire timeout in seconds
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// PostgreSQL idle connection timeout in seconds
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// PostgreSQL max connection lifetime in seconds
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// PostgreSQL statement timeout in seconds (0 = disabled)
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between pool health checks
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 30;

// =============================================================================
// Shutdown
// =============================================================================

/// Upper bound on waiting for background tasks after the server stops
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
