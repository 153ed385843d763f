use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read, parsed, or validated.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration by layering built-in defaults, a sibling JSON file,
    /// the TOML file at `path`, and `PULSE_` environment variables.
    ///
    /// Missing files are skipped. Nested keys use `__` in env vars,
    /// e.g. `PULSE_ANALYSIS__LAG=2`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read, parsed, or validated.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();

        let config: AppConfig = Self::figment(path)
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Json::file(path.with_extension("json")))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PULSE_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use figment::Jail;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load_from("does/not/exist.toml")
                .map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                r#"
                [data]
                events_path = "fixtures/events.csv"

                [analysis]
                lag = 2
                window_start = "2024-12-05"
                "#,
            )?;

            let config = ConfigLoader::load_from("Config.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.data.events_path, "fixtures/events.csv");
            assert_eq!(config.data.prices_path, AppConfig::default().data.prices_path);
            assert_eq!(config.analysis.lag, 2);
            assert_eq!(
                config.analysis.window_start,
                NaiveDate::from_ymd_opt(2024, 12, 5).unwrap()
            );
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("Config.toml", "[analysis]\ntop_n = 5\n")?;
            jail.set_env("PULSE_ANALYSIS__TOP_N", "3");

            let config = ConfigLoader::load_from("Config.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.analysis.top_n, 3);
            Ok(())
        });
    }

    #[test]
    fn invalid_bands_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                "[analysis]\nsignificant_threshold = 0.9\nhigh_threshold = 0.5\n",
            )?;

            assert!(ConfigLoader::load_from("Config.toml").is_err());
            Ok(())
        });
    }
}
