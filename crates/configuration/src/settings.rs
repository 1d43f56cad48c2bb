use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// Seven days of one-second bars. The trade simulator ignores every
/// observation at or below this index unless configured otherwise.
pub const ONE_WEEK_OF_SECOND_BARS: usize = 7 * 24 * 60 * 60;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub detector: DetectorParams,
    pub simulator: SimulatorParams,
    pub logging: LoggingSettings,
    pub progress: ProgressSettings,
}

impl Config {
    /// Checks every section for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        self.simulator.validate()?;
        self.progress.validate()?;
        Ok(())
    }
}

/// Where the series files live and which spot/future pair to load.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory of the per-instrument `processed_{name}-aggTrades-YYYY-MM.csv` spot files.
    pub spot_dir: PathBuf,
    /// Directory of the per-instrument future files.
    pub future_dir: PathBuf,
    /// Directory of the merged `{spot}-{future}-YYYY-MM.csv` files.
    pub merged_dir: PathBuf,
    /// Directory of the `spreads_{spot}_{future}.csv` files.
    pub spread_dir: PathBuf,
    /// Directory receiving `signal_durations_{window}.csv`.
    pub output_dir: PathBuf,
    pub spot: String,
    pub future: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            spot_dir: PathBuf::from("data/spot"),
            future_dir: PathBuf::from("data/future"),
            merged_dir: PathBuf::from("data/merged"),
            spread_dir: PathBuf::from("data/spreads"),
            output_dir: PathBuf::from("output"),
            spot: "BTCUSDT".to_string(),
            future: "BTCUSDT_PERP".to_string(),
        }
    }
}

/// How a signal interval is closed once the spread has left the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum CloseMode {
    /// Close on every observation after the opening one, reopening at once
    /// when that observation is itself outside the band.
    #[default]
    EveryStep,
    /// Close only when the spread is back inside the band.
    BackInside,
}

/// Which moving average acts as the band centre for signal detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum BaselineRule {
    /// Mean of the `window` most recent spreads, the current one included.
    #[default]
    Rolling,
    /// Mean of the `window` spreads preceding the current one.
    Trailing,
}

/// Parameters for the signal-interval detector.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    pub rolling_mean_window: usize,
    /// Half-width of the band around the baseline, in spread units.
    pub threshold: f64,
    pub close_mode: CloseMode,
    pub baseline: BaselineRule,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            rolling_mean_window: 60,
            threshold: 0.0005,
            close_mode: CloseMode::EveryStep,
            baseline: BaselineRule::Rolling,
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolling_mean_window == 0 {
            return Err(ConfigError::ValidationError(
                "detector.rolling_mean_window must be at least 1".to_string(),
            ));
        }
        validate_threshold("detector.threshold", self.threshold)
    }
}

/// Parameters for the long/short trade simulator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorParams {
    /// Number of spreads preceding the current one that form the baseline.
    pub mean_n: usize,
    pub threshold: f64,
    /// Reported alongside the metrics; the simulator's baseline uses `mean_n`.
    pub rolling_mean_window: usize,
    /// Observations with index `<= warmup_ticks` are skipped.
    /// The unit is bars, so the default assumes one-second sampling.
    pub warmup_ticks: usize,
}

impl Default for SimulatorParams {
    fn default() -> Self {
        Self {
            mean_n: 180,
            threshold: 0.0005,
            rolling_mean_window: 180,
            warmup_ticks: ONE_WEEK_OF_SECOND_BARS,
        }
    }
}

impl SimulatorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mean_n == 0 {
            return Err(ConfigError::ValidationError(
                "simulator.mean_n must be at least 1".to_string(),
            ));
        }
        validate_threshold("simulator.threshold", self.threshold)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Progress callbacks fire once per this many processed records.
    pub report_every: usize,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            report_every: 10_000,
        }
    }
}

impl ProgressSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_every == 0 {
            return Err(ConfigError::ValidationError(
                "progress.report_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_threshold(name: &str, threshold: f64) -> Result<(), ConfigError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be a finite, non-negative number (got {threshold})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulator.warmup_ticks, 604_800);
        assert_eq!(config.detector.close_mode, CloseMode::EveryStep);
        assert_eq!(config.detector.baseline, BaselineRule::Rolling);
    }

    #[test]
    fn zero_window_is_rejected() {
        let params = DetectorParams {
            rolling_mean_window: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let params = SimulatorParams {
            threshold: -0.1,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = SimulatorParams {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_mean_n_is_rejected() {
        let params = SimulatorParams {
            mean_n: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
