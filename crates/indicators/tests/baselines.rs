use approx::assert_relative_eq;
use indicators::{IndicatorError, rolling_mean, trailing_mean};

#[test]
fn trailing_baseline_ignores_the_current_spike() {
    let spreads = [0.0, 0.0, 0.0, 6.0, 6.0, 0.0, 0.0];

    let trailing = trailing_mean(&spreads, 3).unwrap();
    assert_eq!(trailing[..3], [None, None, None]);
    assert_relative_eq!(trailing[3].unwrap(), 0.0);
    assert_relative_eq!(trailing[4].unwrap(), 2.0);

    let rolling = rolling_mean(&spreads, 3).unwrap();
    assert_eq!(rolling[..2], [None, None]);
    assert_relative_eq!(rolling[3].unwrap(), 2.0);
    assert_relative_eq!(rolling[4].unwrap(), 4.0);
}

#[test]
fn zero_window_is_an_error() {
    assert!(matches!(rolling_mean(&[1.0], 0), Err(IndicatorError::InvalidWindow(0))));
    assert!(matches!(trailing_mean(&[1.0], 0), Err(IndicatorError::InvalidWindow(0))));
}
