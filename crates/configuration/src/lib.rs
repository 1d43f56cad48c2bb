use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    BaselineRule, CloseMode, Config, DataSettings, DetectorParams, LoggingSettings,
    ONE_WEEK_OF_SECOND_BARS, ProgressSettings, SimulatorParams,
};

/// Prefix for environment overrides, e.g. `SPREADLAB_DETECTOR__THRESHOLD=0.001`.
const ENV_PREFIX: &str = "SPREADLAB";

/// Loads the application configuration from `path` (TOML) and the environment.
///
/// A missing file is not an error: every section has defaults. The merged
/// result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.detector.rolling_mean_window, 60);
        assert_eq!(config.progress.report_every, 10_000);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[detector]
rolling_mean_window = 120
threshold = 0.002
close_mode = "back_inside"
baseline = "trailing"

[simulator]
mean_n = 30
warmup_ticks = 0

[data]
spot = "ETHUSDT"
"#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.detector.rolling_mean_window, 120);
        assert_eq!(config.detector.close_mode, CloseMode::BackInside);
        assert_eq!(config.detector.baseline, BaselineRule::Trailing);
        assert_eq!(config.simulator.mean_n, 30);
        assert_eq!(config.simulator.warmup_ticks, 0);
        assert_eq!(config.simulator.threshold, 0.0005);
        assert_eq!(config.data.spot, "ETHUSDT");
        assert_eq!(config.data.future, "BTCUSDT_PERP");
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[detector]\nrolling_mean_window = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
