use std::{env, fmt::Display, path::PathBuf, str::FromStr};

/// Runtime configuration, loaded once at startup from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Shared admin password checked on login.
    pub admin_password: String,
    /// Admin session lifetime in hours.
    pub session_ttl_hours: i64,
    /// Directory uploaded images are written to.
    pub upload_dir: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        // SANDBOXED deployments (ephemeral filesystems) get the database under
        // /tmp; everything else uses a ./data directory next to the binary.
        let database_path = if env::var("SANDBOXED").is_ok() {
            PathBuf::from("/tmp/clinic.db")
        } else {
            PathBuf::from("./data/clinic.db")
        };

        Self {
            database_path,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: try_load("PORT", "3000"),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            session_ttl_hours: try_load("SESSION_TTL_HOURS", "8"),
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load()
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e| tracing::warn!("Invalid {} value: {}; using default", key, e))
        .unwrap_or_else(|_| default.parse().map_err(|_| ()).expect("default must parse"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_has_sane_defaults() {
        let config = Config::load();
        assert!(config.port > 0);
        assert!(config.session_ttl_hours > 0);
        assert!(!config.admin_password.is_empty());
        assert!(config.database_path.to_string_lossy().ends_with("clinic.db"));
    }
}
