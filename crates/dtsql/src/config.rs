//! Connection configuration.
//!
//! The compiler itself needs no configuration beyond a [`TableEndpoint`](crate::TableEndpoint);
//! this module only helps callers obtain a ready [`TableStore`](crate::TableStore).
//!
//! # Example
//!
//! ```ignore
//! let options: dtsql::ConnectOptions = serde_json::from_str(r#"{
//!     "host": "localhost",
//!     "username": "app",
//!     "password": "secret",
//!     "database_name": "shop"
//! }"#)?;
//! let client = options.connect().await?;
//! ```

use crate::error::{DtError, DtResult};
use serde::Deserialize;
use tokio_postgres::NoTls;

/// Database connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Directory holding the server's Unix socket. Takes precedence over `host`.
    pub unix_socket: String,
    pub database_name: String,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            host: String::new(),
            port: 5432,
            unix_socket: String::new(),
            database_name: String::new(),
        }
    }
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn unix_socket(mut self, dir: impl Into<String>) -> Self {
        self.unix_socket = dir.into();
        self
    }

    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Build the driver configuration. A host or a socket directory is required.
    pub fn to_pg_config(&self) -> DtResult<tokio_postgres::Config> {
        if self.host.is_empty() && self.unix_socket.is_empty() {
            return Err(DtError::validation("database host needed"));
        }

        let mut config = tokio_postgres::Config::new();
        if self.unix_socket.is_empty() {
            config.host(self.host.as_str());
        } else {
            // tokio-postgres treats a host starting with '/' as a socket directory.
            if !self.unix_socket.starts_with('/') {
                return Err(DtError::validation(format!(
                    "unix socket directory must be absolute, got '{}'",
                    self.unix_socket
                )));
            }
            config.host(self.unix_socket.as_str());
        }
        config.port(self.port);
        if !self.username.is_empty() {
            config.user(self.username.as_str());
        }
        if !self.password.is_empty() {
            config.password(self.password.as_str());
        }
        if !self.database_name.is_empty() {
            config.dbname(self.database_name.as_str());
        }
        Ok(config)
    }

    /// Connect, spawn the connection task on the current Tokio runtime, and ping.
    pub async fn connect(&self) -> DtResult<tokio_postgres::Client> {
        let config = self.to_pg_config()?;
        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|e| DtError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::error!(target: "dtsql", error = %e, "postgres connection closed with error");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
            }
        });

        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| DtError::Connection(e.to_string()))?;
        Ok(client)
    }

    /// Create a connection pool (no TLS) with at most `max_size` connections.
    #[cfg(feature = "pool")]
    pub fn create_pool(&self, max_size: usize) -> DtResult<deadpool_postgres::Pool> {
        use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = Manager::from_config(self.to_pg_config()?, NoTls, manager_config);
        Pool::builder(mgr)
            .max_size(max_size)
            .build()
            .map_err(|e| DtError::Pool(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_required() {
        let err = ConnectOptions::new().database_name("shop").to_pg_config().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: database host needed");
    }

    #[test]
    fn tcp_config() {
        let config = ConnectOptions::new()
            .host("db.internal")
            .port(6543)
            .username("app")
            .password("pw")
            .database_name("shop")
            .to_pg_config()
            .unwrap();
        assert_eq!(config.get_ports(), &[6543]);
        assert_eq!(config.get_user(), Some("app"));
        assert_eq!(config.get_dbname(), Some("shop"));
        assert_eq!(config.get_password(), Some(&b"pw"[..]));
    }

    #[test]
    fn socket_takes_precedence() {
        let config = ConnectOptions::new()
            .host("ignored")
            .unix_socket("/var/run/postgresql")
            .to_pg_config()
            .unwrap();
        assert_eq!(config.get_hosts().len(), 1);
        assert!(!matches!(config.get_hosts()[0], tokio_postgres::config::Host::Tcp(_)));

        assert!(
            ConnectOptions::new()
                .unix_socket("relative/dir")
                .to_pg_config()
                .is_err()
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let options: ConnectOptions =
            serde_json::from_str(r#"{"host": "localhost", "database_name": "shop"}"#).unwrap();
        assert_eq!(options.port, 5432);
        assert_eq!(options.host, "localhost");
        assert!(options.username.is_empty());
    }

    #[cfg(feature = "pool")]
    #[test]
    fn pool_builds_without_connecting() {
        let pool = ConnectOptions::new().host("localhost").create_pool(4).unwrap();
        assert_eq!(pool.status().max_size, 4);
    }
}
