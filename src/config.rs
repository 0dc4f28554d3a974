//! # Application configuration
//!
//! Read from the `busline` table of Rocket's figment, so it can be set in
//! `Rocket.toml` or through `ROCKET_BUSLINE`:
//!
//! ```toml
//! [default.busline]
//! store = "mongo"        # or "memory"
//! database = "busline"
//! seed_on_launch = false
//! ```

use rocket::figment::{self, Figment};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(crate = "rocket::serde", default)]
pub struct AppConfig {
    pub store: StoreKind,
    /// MongoDB database holding the `busroute`, `trip` and `booking` collections.
    pub database: String,
    pub seed_on_launch: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Mongo,
            database: "busline".to_string(),
            seed_on_launch: false,
        }
    }
}

impl AppConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        figment.focus("busline").extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::providers::{Format, Toml};

    #[test]
    fn test_defaults_when_section_missing() {
        let config = AppConfig::from_figment(&Figment::new()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_reads_busline_section() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [busline]
            store = "memory"
            seed_on_launch = true
            "#,
        ));

        let config = AppConfig::from_figment(&figment).unwrap();
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.database, "busline");
        assert!(config.seed_on_launch);
    }

    #[test]
    fn test_rejects_unknown_store() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [busline]
            store = "postgres"
            "#,
        ));

        assert!(AppConfig::from_figment(&figment).is_err());
    }
}
