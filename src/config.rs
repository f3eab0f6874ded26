//! Runtime configuration from environment variables (optionally via `.env`).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5555";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;
const DATABASE_FILE: &str = "app.db";

/// How much a rejected write tells the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Every write failure is `{"errors": ["validation errors"]}`.
    #[default]
    Generic,
    /// The `errors` array carries the specific cause.
    Detailed,
}

impl std::str::FromStr for ErrorDetail {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" => Ok(ErrorDetail::Generic),
            "detailed" => Ok(ErrorDetail::Detailed),
            _ => Err(ConfigError::Invalid {
                key: "PLANT_API_ERROR_DETAIL",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
    pub error_detail: ErrorDetail,
}

impl Config {
    /// Read from the process environment. The default database lives next to the executable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let exe = std::env::current_exe()?;
        let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Self::from_lookup(|key| std::env::var(key).ok(), exe_dir)
    }

    /// Build from an arbitrary key lookup; `base_dir` anchors the default database file.
    pub fn from_lookup<F>(lookup: F, base_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| format!("sqlite://{}", base_dir.join(DATABASE_FILE).display()));
        let bind_addr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", Some(DEFAULT_MAX_CONNECTIONS))?;
        let body_limit_bytes = parse_or(&lookup, "BODY_LIMIT_BYTES", Some(DEFAULT_BODY_LIMIT_BYTES))?;
        let error_detail = match lookup("PLANT_API_ERROR_DETAIL") {
            Some(v) => v.parse()?,
            None => ErrorDetail::default(),
        };
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        Ok(Config {
            database_url,
            bind_addr,
            max_connections,
            body_limit_bytes,
            error_detail,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw.clone() }),
        None => default.ok_or(ConfigError::Invalid {
            key,
            value: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_point_at_app_db_beside_base_dir() {
        let cfg = Config::from_lookup(lookup(&[]), Path::new("/srv/plants")).unwrap();
        assert_eq!(cfg.database_url, "sqlite:///srv/plants/app.db");
        assert_eq!(cfg.bind_addr.port(), 5555);
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert_eq!(cfg.error_detail, ErrorDetail::Generic);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = Config::from_lookup(
            lookup(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("BIND_ADDR", "0.0.0.0:8080"),
                ("DB_MAX_CONNECTIONS", "2"),
                ("BODY_LIMIT_BYTES", "4096"),
                ("PLANT_API_ERROR_DETAIL", "Detailed"),
            ]),
            Path::new("."),
        )
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.max_connections, 2);
        assert_eq!(cfg.body_limit_bytes, 4096);
        assert_eq!(cfg.error_detail, ErrorDetail::Detailed);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")]), Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BIND_ADDR", .. }));

        let err = Config::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")]), Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. }));

        let err = Config::from_lookup(lookup(&[("PLANT_API_ERROR_DETAIL", "loud")]), Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PLANT_API_ERROR_DETAIL", .. }));
    }
}
