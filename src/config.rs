use std::env;
use std::path::PathBuf;

/// AppConfig
///
/// Holds the console's entire configuration state. The struct is immutable once
/// loaded, so every component (gateway, session store, guard) sees the same
/// values for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the tournament backend, including the API prefix
    // (e.g. http://localhost:8000/api/v1).
    pub api_base_url: String,
    // Path of the durable session file holding the credential/user entries.
    pub session_file: PathBuf,
    // Runtime environment marker. Controls log formatting.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, switching between development conveniences
/// (pretty logs, localhost defaults) and production behavior (JSON logs,
/// mandatory explicit configuration).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup, without requiring any environment variables.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            session_file: PathBuf::from(".console-session.json"),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the configuration at startup.
    /// Reads all parameters from environment variables and implements the
    /// fail-fast principle.
    ///
    /// # Panics
    /// Panics if a variable required for the current runtime environment is
    /// missing, preventing the console from starting half-configured.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            // Production demands an explicit backend address.
            Env::Production => {
                env::var("API_BASE_URL").expect("FATAL: API_BASE_URL required in production")
            }
            // Local falls back to the dockerized backend's default address.
            Env::Local => env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/v1".to_string()),
        };

        let session_file = env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".console-session.json"));

        Self {
            api_base_url,
            session_file,
            env,
        }
    }
}
