//! Pure helpers that turn snapshot values into display-ready shapes.

use crate::error::TelemetryError;

/// Maps `value` to a named band given strictly ascending breakpoints.
///
/// `labels[i]` covers `[thresholds[i - 1], thresholds[i])`; a value exactly on
/// a breakpoint lands in the higher band. NaN sorts below every breakpoint
/// and so maps to the lowest band.
pub fn classify<'a, L>(value: f64, thresholds: &[f64], labels: &'a [L]) -> Result<&'a L, TelemetryError> {
    check_bands(thresholds, labels.len())?;
    Ok(&labels[band_index(value, thresholds)])
}

fn band_index(value: f64, thresholds: &[f64]) -> usize {
    thresholds.iter().take_while(|&&t| value >= t).count()
}

fn check_bands(thresholds: &[f64], labels: usize) -> Result<(), TelemetryError> {
    if let Some(bad) = thresholds.iter().find(|t| !t.is_finite()) {
        return Err(TelemetryError::invalid(format!("non-finite threshold {bad}")));
    }

    if let Some(w) = thresholds.windows(2).find(|w| w[0] >= w[1]) {
        return Err(TelemetryError::invalid(format!(
            "thresholds must be strictly ascending, got {} then {}",
            w[0], w[1]
        )));
    }

    if labels != thresholds.len() + 1 {
        return Err(TelemetryError::invalid(format!(
            "{} thresholds need {} labels, got {labels}",
            thresholds.len(),
            thresholds.len() + 1
        )));
    }

    Ok(())
}

/// Validated threshold/label table for repeated classification.
#[derive(Clone, Debug, PartialEq)]
pub struct Bands<L> {
    thresholds: Vec<f64>,
    labels: Vec<L>,
}

impl<L> Bands<L> {
    pub fn new(thresholds: Vec<f64>, labels: Vec<L>) -> Result<Self, TelemetryError> {
        check_bands(&thresholds, labels.len())?;
        Ok(Self { thresholds, labels })
    }

    pub fn classify(&self, value: f64) -> &L {
        &self.labels[band_index(value, &self.thresholds)]
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }
}

/// Trailing simple moving average.
///
/// Point `i` is the mean of `series[i + 1 - window ..= i]`; the first
/// `window - 1` points average whatever is available.
pub fn smooth(series: &[f64], window: usize) -> Result<Vec<f64>, TelemetryError> {
    if window < 1 {
        return Err(TelemetryError::invalid("smoothing window must be at least 1"));
    }

    // Each point sums its own window, so a NaN or a huge value only touches
    // the windows that contain it.
    let out = (0..series.len())
        .map(|i| {
            let slice = &series[i.saturating_sub(window - 1)..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect();

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOOD: [&str; 3] = ["Stressed", "Neutral", "Positive"];

    #[test]
    fn classify_breakpoints_belong_to_higher_band() {
        let t = [40.0, 70.0];
        assert_eq!(*classify(39.0, &t, &MOOD).unwrap(), "Stressed");
        assert_eq!(*classify(40.0, &t, &MOOD).unwrap(), "Neutral");
        assert_eq!(*classify(69.999, &t, &MOOD).unwrap(), "Neutral");
        assert_eq!(*classify(70.0, &t, &MOOD).unwrap(), "Positive");
        assert_eq!(*classify(100.0, &t, &MOOD).unwrap(), "Positive");
    }

    #[test]
    fn classify_rejects_unsorted_or_duplicate_thresholds() {
        assert!(matches!(
            classify(50.0, &[70.0, 40.0], &MOOD),
            Err(TelemetryError::InvalidArgument(_))
        ));
        assert!(classify(50.0, &[40.0, 40.0], &MOOD).is_err());
        assert!(classify(50.0, &[f64::NAN, 40.0], &MOOD).is_err());
    }

    #[test]
    fn classify_rejects_label_count_mismatch() {
        assert!(classify(50.0, &[40.0], &MOOD).is_err());
    }

    #[test]
    fn classify_without_thresholds_is_single_band() {
        assert_eq!(*classify(-1e9, &[], &["all"]).unwrap(), "all");
    }

    #[test]
    fn bands_reuse_validation() {
        let bands = Bands::new(vec![40.0, 70.0], MOOD.to_vec()).unwrap();
        assert_eq!(*bands.classify(55.0), "Neutral");
        assert_eq!(*bands.classify(f64::NAN), "Stressed");
        assert!(Bands::new(vec![70.0, 40.0], MOOD.to_vec()).is_err());
    }

    #[test]
    fn smooth_partial_windows_at_start() {
        assert_eq!(smooth(&[10.0, 20.0, 30.0], 2).unwrap(), vec![10.0, 15.0, 25.0]);
    }

    #[test]
    fn smooth_window_one_is_identity() {
        let s = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(smooth(&s, 1).unwrap(), s.to_vec());
    }

    #[test]
    fn smooth_window_wider_than_series() {
        assert_eq!(smooth(&[2.0, 4.0, 6.0], 10).unwrap(), vec![2.0, 3.0, 4.0]);
        assert_eq!(smooth(&[], 3).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn smooth_window_one_keeps_large_magnitudes() {
        assert_eq!(smooth(&[1e16, 1.0], 1).unwrap(), vec![1e16, 1.0]);
        assert_eq!(smooth(&[1e16, 1.0, 2.0], 2).unwrap()[2], 1.5);
    }

    #[test]
    fn smooth_nan_only_affects_its_windows() {
        let out = smooth(&[f64::NAN, 1.0, 2.0, 3.0], 2).unwrap();

        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_eq!(out[2], 1.5);
        assert_eq!(out[3], 2.5);
    }

    #[test]
    fn smooth_rejects_zero_window() {
        assert!(matches!(
            smooth(&[1.0], 0),
            Err(TelemetryError::InvalidArgument(_))
        ));
    }
}
