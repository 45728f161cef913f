//! Configuration for the Taskdesk HTTP service.

use std::env;
use std::path::PathBuf;

use board::DEFAULT_MAX_PROOF_BYTES;

/// Server configuration, resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Directory holding the JSON stores and the proof blobs.
    pub data_dir: PathBuf,
    /// Header the fronting gateway uses to inject the caller principal.
    pub principal_header: String,
    /// Maximum accepted proof upload size in bytes.
    pub max_proof_bytes: u64,
    /// Allowed CORS origin. Unset means permissive (development).
    pub cors_origin: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: env::var("TASKDESK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("TASKDESK_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            data_dir: env::var("TASKDESK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            principal_header: env::var("TASKDESK_PRINCIPAL_HEADER")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "x-auth-principal".to_string()),
            max_proof_bytes: env::var("TASKDESK_MAX_PROOF_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_PROOF_BYTES),
            cors_origin: env::var("TASKDESK_CORS_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty()),
            request_timeout_secs: env::var("TASKDESK_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Config {
    /// The address the server binds, as `host:port`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "TASKDESK_HOST",
        "TASKDESK_PORT",
        "TASKDESK_DATA_DIR",
        "TASKDESK_PRINCIPAL_HEADER",
        "TASKDESK_MAX_PROOF_BYTES",
        "TASKDESK_CORS_ORIGIN",
        "TASKDESK_REQUEST_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.principal_header, "x-auth-principal");
        assert_eq!(config.max_proof_bytes, DEFAULT_MAX_PROOF_BYTES);
        assert!(config.cors_origin.is_none());
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("TASKDESK_HOST", "127.0.0.1");
        env::set_var("TASKDESK_PORT", "9090");
        env::set_var("TASKDESK_DATA_DIR", "/var/lib/taskdesk");
        env::set_var("TASKDESK_PRINCIPAL_HEADER", "x-forwarded-user");
        env::set_var("TASKDESK_MAX_PROOF_BYTES", "1048576");
        env::set_var("TASKDESK_CORS_ORIGIN", "https://board.example.com");

        let config = Config::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/taskdesk"));
        assert_eq!(config.principal_header, "x-forwarded-user");
        assert_eq!(config.max_proof_bytes, 1_048_576);
        assert_eq!(
            config.cors_origin.as_deref(),
            Some("https://board.example.com")
        );

        clear_env();
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("TASKDESK_PORT", "not-a-port");
        env::set_var("TASKDESK_MAX_PROOF_BYTES", "lots");

        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_proof_bytes, DEFAULT_MAX_PROOF_BYTES);

        clear_env();
    }
}
