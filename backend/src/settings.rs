//! Server configuration loaded via OrthoConfig.
//!
//! Values layer CLI arguments over `HELPDESK_*` environment variables over an
//! optional configuration file.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
/// Pool size used when none is configured.
pub const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Conventional variable consulted when `HELPDESK_DATABASE_URL` is unset.
const DATABASE_URL_FALLBACK_VAR: &str = "DATABASE_URL";

/// Settings controlling the HTTP server and its database.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HELPDESK")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum number of pooled connections.
    pub pool_max_size: Option<u32>,
    /// Insert the default technician roster at startup. Defaults to on.
    pub seed_technicians: Option<bool>,
    /// Apply pending migrations at startup. Defaults to on.
    pub run_migrations: Option<bool>,
}

impl ServerSettings {
    /// Parsed listen address, falling back to [`DEFAULT_BIND_ADDR`].
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Configured database URL, or `DATABASE_URL` from the environment.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var(DATABASE_URL_FALLBACK_VAR).ok())
            .filter(|url| !url.trim().is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether the default roster is seeded; on unless disabled.
    pub fn seed_technicians(&self) -> bool {
        self.seed_technicians.unwrap_or(true)
    }

    /// Whether pending migrations run at startup; on unless disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("helpdesk")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("HELPDESK_BIND_ADDR", None::<String>),
            ("HELPDESK_DATABASE_URL", None::<String>),
            ("HELPDESK_POOL_MAX_SIZE", None::<String>),
            ("HELPDESK_SEED_TECHNICIANS", None::<String>),
            ("HELPDESK_RUN_MIGRATIONS", None::<String>),
            ("DATABASE_URL", None::<String>),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            "0.0.0.0:5001".parse::<SocketAddr>().expect("literal parses")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(settings.seed_technicians, None);
        assert!(settings.seed_technicians());
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HELPDESK_BIND_ADDR", Some("127.0.0.1:8080".to_owned())),
            (
                "HELPDESK_DATABASE_URL",
                Some("postgres://helpdesk@db/helpdesk".to_owned()),
            ),
            ("HELPDESK_POOL_MAX_SIZE", Some("4".to_owned())),
            ("HELPDESK_SEED_TECHNICIANS", Some("false".to_owned())),
            ("HELPDESK_RUN_MIGRATIONS", Some("false".to_owned())),
            ("DATABASE_URL", Some("postgres://ignored/db".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address parses").port(),
            8080
        );
        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://helpdesk@db/helpdesk")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert!(!settings.seed_technicians());
        assert!(!settings.run_migrations());
    }

    #[rstest]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    #[case(None, true)]
    fn startup_toggles_default_to_enabled(#[case] raw: Option<&str>, #[case] expected: bool) {
        let _guard = lock_env([
            ("HELPDESK_SEED_TECHNICIANS", raw.map(str::to_owned)),
            ("HELPDESK_RUN_MIGRATIONS", raw.map(str::to_owned)),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.seed_technicians(), expected);
        assert_eq!(settings.run_migrations(), expected);
    }

    #[rstest]
    fn database_url_falls_back_to_the_conventional_variable() {
        let _guard = lock_env([
            ("HELPDESK_DATABASE_URL", None::<String>),
            ("DATABASE_URL", Some("postgres://localhost/helpdesk".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://localhost/helpdesk")
        );
    }

    #[rstest]
    fn invalid_bind_address_is_reported() {
        let _guard = lock_env([("HELPDESK_BIND_ADDR", Some("not-an-address".to_owned()))]);

        let settings = load_from_empty_args();

        assert!(settings.bind_addr().is_err());
    }
}
