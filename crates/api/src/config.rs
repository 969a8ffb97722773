//! Process configuration for the catalog binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use catalog_infra::config::{ConfigError, DatabaseConfig, parse_or};

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Read `BIND_ADDR`, `PORT` and the database settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let database = DatabaseConfig::from_lookup(&lookup)?;

        Ok(Self {
            bind_addr,
            port,
            database,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let cfg =
            AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/catalog")])).unwrap();
        assert_eq!(cfg.socket_addr(), "0.0.0.0:3001".parse().unwrap());
        assert_eq!(cfg.database.url, "postgres://db/catalog");
    }

    #[test]
    fn port_and_address_can_be_overridden() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/catalog"),
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(cfg.socket_addr(), "127.0.0.1:8080".parse().unwrap());
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/catalog"),
            ("PORT", "70000"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn database_url_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }
}
