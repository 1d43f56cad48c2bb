use crate::error::IndicatorError;
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

fn new_sma(window: usize) -> Result<Sma, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidWindow(window));
    }
    Sma::new(window).map_err(|e| IndicatorError::Initialization(format!("{e:?}")))
}

/// Mean of `spreads[i + 1 - window ..= i]` for every `i >= window - 1`.
///
/// Entries `0..window - 1` are `None`. A window longer than the series yields
/// all `None`.
pub fn rolling_mean(spreads: &[f64], window: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut sma = new_sma(window)?;
    let mut baseline = Vec::with_capacity(spreads.len());

    for (i, &spread) in spreads.iter().enumerate() {
        let mean = sma.next(spread);
        baseline.push((i + 1 >= window).then_some(mean));
    }

    tracing::trace!(window, len = baseline.len(), "rolling mean computed");
    Ok(baseline)
}

/// Mean of `spreads[i - window .. i]` for every `i >= window`, excluding `spreads[i]`.
///
/// Entries `0..window` are `None`.
pub fn trailing_mean(spreads: &[f64], window: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut sma = new_sma(window)?;
    let mut baseline = Vec::with_capacity(spreads.len());
    let mut preceding: Option<f64> = None;

    for (i, &spread) in spreads.iter().enumerate() {
        // `preceding` holds the mean of the window ending at i - 1.
        baseline.push(preceding.filter(|_| i >= window));
        preceding = Some(sma.next(spread));
    }

    tracing::trace!(window, len = baseline.len(), "trailing mean computed");
    Ok(baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn brute_force_mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn rolling_mean_marks_warmup_undefined() {
        let baseline = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(baseline.len(), 5);
        assert_eq!(baseline[0], None);
        assert_eq!(baseline[1], None);
        assert_abs_diff_eq!(baseline[2].unwrap(), 2.0);
        assert_abs_diff_eq!(baseline[3].unwrap(), 3.0);
        assert_abs_diff_eq!(baseline[4].unwrap(), 4.0);
    }

    #[test]
    fn rolling_mean_window_of_one_is_the_series() {
        let spreads = [0.5, -0.25, 1.5];
        let baseline = rolling_mean(&spreads, 1).unwrap();
        let values: Vec<f64> = baseline.into_iter().map(Option::unwrap).collect();
        assert_eq!(values, spreads.to_vec());
    }

    #[test]
    fn trailing_mean_excludes_current_value() {
        let baseline = trailing_mean(&[0.0, 0.0, 0.0, 6.0, 6.0, 0.0, 0.0], 3).unwrap();
        assert_eq!(&baseline[..3], &[None, None, None]);
        assert_abs_diff_eq!(baseline[3].unwrap(), 0.0);
        assert_abs_diff_eq!(baseline[4].unwrap(), 2.0);
        assert_abs_diff_eq!(baseline[5].unwrap(), 4.0);
        assert_abs_diff_eq!(baseline[6].unwrap(), 4.0);
    }

    #[test]
    fn window_longer_than_series_is_all_undefined() {
        assert!(rolling_mean(&[1.0, 2.0], 3).unwrap().iter().all(Option::is_none));
        assert!(trailing_mean(&[1.0, 2.0, 3.0], 3).unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn zero_window_is_an_error() {
        assert_eq!(rolling_mean(&[1.0], 0), Err(IndicatorError::InvalidWindow(0)));
        assert_eq!(trailing_mean(&[1.0], 0), Err(IndicatorError::InvalidWindow(0)));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(rolling_mean(&[], 5).unwrap().is_empty());
        assert!(trailing_mean(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn incremental_sum_matches_slice_mean() {
        let spreads: Vec<f64> = (0..200).map(|i| ((i * 37) % 11) as f64 * 1e-4 - 5e-4).collect();
        let window = 7;
        let rolling = rolling_mean(&spreads, window).unwrap();
        let trailing = trailing_mean(&spreads, window).unwrap();

        for i in window - 1..spreads.len() {
            let expected = brute_force_mean(&spreads[i + 1 - window..=i]);
            assert_abs_diff_eq!(rolling[i].unwrap(), expected, epsilon = 1e-12);
        }
        for i in window..spreads.len() {
            let expected = brute_force_mean(&spreads[i - window..i]);
            assert_abs_diff_eq!(trailing[i].unwrap(), expected, epsilon = 1e-12);
        }
    }
}
