//! Settings for the billing tool. Values come from an optional TOML file
//! (default `config/billing.toml`) and `BILLING_*` environment variables.

use fare_engine::{TollRoute, TollTable};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_SETTINGS_PATH: &str = "config/billing.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the tool and the engine.
    pub level: String,
    pub currency_symbol: String,
    /// Replaces the built-in toll master list when present.
    pub tolls: Option<Vec<TollRoute>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            currency_symbol: "$".to_string(),
            tolls: None,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or(DEFAULT_SETTINGS_PATH);
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("BILLING"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn toll_table(&self) -> TollTable {
        match &self.tolls {
            Some(routes) => TollTable::new(routes.clone()),
            None => TollTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    fn from_toml(raw: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.level, "info");
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.toll_table(), TollTable::default());
    }

    #[test]
    fn toll_routes_replace_builtin_table() {
        let settings = from_toml(
            r#"
            level = "debug"

            [[tolls]]
            origen = "Pilar"
            destino = "Tigre"
            monto = 450.0
            "#,
        );
        assert_eq!(settings.level, "debug");
        assert_eq!(
            settings.toll_table().routes(),
            &[TollRoute::new("Pilar", "Tigre", 450.0)]
        );
    }
}
