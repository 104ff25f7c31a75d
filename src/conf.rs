use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

const DEFAULT_ALLOWED_ORIGINS: [&str; 8] = [
    "http://54.166.206.245:7771",
    "http://54.166.206.245:7772",
    "http://54.166.206.245:7773",
    "http://54.166.206.245:3221",
    "http://localhost:7771",
    "http://localhost:7772",
    "http://localhost:7773",
    "http://127.0.0.1:5500",
];

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    //db
    pub pg_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_ssl: bool,
    pub database_pool_max_connections: u32,
    /// `development` exposes error details in 5xx bodies.
    pub app_env: String,
    pub uploads_dir: PathBuf,
    /// Comma separated; replaces the built-in allow-list when set.
    pub allowed_origins: Option<String>,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: 3221,
            pg_host: "postgres".into(),
            db_port: 5432,
            db_user: "postgres".into(),
            db_password: "admin123".into(),
            db_name: "new_employee_db".into(),
            db_ssl: false,
            database_pool_max_connections: 10,
            app_env: "production".into(),
            uploads_dir: PathBuf::from("uploads"),
            allowed_origins: None,
            rate_limit_max: 100,
            rate_limit_window_secs: 15 * 60,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .add_source(Environment::default())
            .build()?;
        conf.try_deserialize()
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    pub fn origins(&self) -> Vec<String> {
        match self.allowed_origins.as_deref() {
            Some(list) if !list.trim().is_empty() => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            _ => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn pg_connect_options(&self) -> PgConnectOptions {
        // DB_SSL=true encrypts without verifying the server certificate
        let ssl_mode = if self.db_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        };
        PgConnectOptions::new()
            .host(&self.pg_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .ssl_mode(ssl_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_service() {
        let s = Settings::default();
        assert_eq!(s.port, 3221);
        assert_eq!(s.rate_limit_max, 100);
        assert_eq!(s.rate_limit_window(), Duration::from_secs(900));
        assert!(!s.is_development());
        assert_eq!(s.origins().len(), 8);
        assert!(s.origins().contains(&"http://127.0.0.1:5500".to_string()));
    }

    #[test]
    fn allowed_origins_override_replaces_builtin_list() {
        let s = Settings {
            allowed_origins: Some(" https://hr.example.com, ,https://admin.example.com ".into()),
            ..Settings::default()
        };
        assert_eq!(
            s.origins(),
            vec!["https://hr.example.com", "https://admin.example.com"]
        );
    }

    #[test]
    fn development_mode_is_case_insensitive() {
        let s = Settings {
            app_env: "Development".into(),
            ..Settings::default()
        };
        assert!(s.is_development());
    }
}
