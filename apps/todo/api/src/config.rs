use core_config::{
    AppInfo, FromEnv, app_info, env_list, env_or_default, server::ServerConfig,
    session::SessionConfig,
};
use database::postgres::PostgresConfig;
use std::path::PathBuf;

pub use core_config::Environment;

/// Usernames granted the admin role when `ADMIN_USERS` is unset.
pub const DEFAULT_ADMIN_USERS: &str = "Jane";

/// Directory served to browsers when `STATIC_DIR` is unset.
pub const DEFAULT_STATIC_DIR: &str = "dist";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub environment: Environment,
    /// Usernames that sign in with the admin role
    pub admin_users: Vec<String>,
    /// Built client served for non-API paths
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Defaults: HOST=0.0.0.0, PORT=3002
        let session = SessionConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            session,
            environment,
            admin_users: env_list("ADMIN_USERS", DEFAULT_ADMIN_USERS),
            static_dir: PathBuf::from(env_or_default("STATIC_DIR", DEFAULT_STATIC_DIR)),
        })
    }
}
