use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Invalid run parameters: {0}")]
    Config(#[from] configuration::error::ConfigError),

    #[error("Baseline calculation error: {0}")]
    Indicator(#[from] indicators::IndicatorError),

    #[error("Strategy setup error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Analytics calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}
