use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Classified submissions CSV (`labeled_submission`, `created_utc`, `comment_score`, `Sentiment`)
    pub events_path: String,
    /// Daily prices CSV (`date` plus one `<LABEL>_price` column per coin)
    pub prices_path: String,
    /// Read ambiguous `01/12/2024` style dates as day-first
    pub day_first: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Gradient offset in days for the lead/lag correlations
    pub lag: usize,
    /// Number of labels shown by the trending table
    pub top_n: usize,
    /// Lower bound of the "significant predictive chance" band
    pub significant_threshold: f64,
    /// Lower bound of the "high predictive chance" band
    pub high_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("analysis window starts {start} after it ends {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },

    #[error("band thresholds must satisfy 0 <= significant ({significant}) <= high ({high})")]
    UnorderedBands { significant: f64, high: f64 },
}

impl AppConfig {
    /// Checks cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if the default window is inverted or the band
    /// thresholds are out of order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;

        if analysis.window_start > analysis.window_end {
            return Err(ConfigError::InvertedWindow {
                start: analysis.window_start,
                end: analysis.window_end,
            });
        }

        let ordered = 0.0 <= analysis.significant_threshold
            && analysis.significant_threshold <= analysis.high_threshold;
        if !ordered {
            return Err(ConfigError::UnorderedBands {
                significant: analysis.significant_threshold,
                high: analysis.high_threshold,
            });
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                events_path: "data/r_CryptoCurrency_classified.csv".to_string(),
                prices_path: "data/daily_prices.csv".to_string(),
                day_first: true,
            },
            analysis: AnalysisConfig {
                window_start: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or_default(),
                window_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
                lag: 1,
                top_n: 10,
                significant_threshold: 0.25,
                high_threshold: 0.75,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.lag, 1);
        assert_eq!(
            config.analysis.window_start,
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let mut config = AppConfig::default();
        config.analysis.window_start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn validate_rejects_unordered_bands() {
        let mut config = AppConfig::default();
        config.analysis.significant_threshold = 0.8;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnorderedBands { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("\"window_start\":\"2024-12-01\""));
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
