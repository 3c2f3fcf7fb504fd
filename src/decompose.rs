use crate::models::Decomposition;

/// Monthly data with a yearly cycle.
pub const DEFAULT_PERIOD: usize = 12;

/// Classical additive seasonal decomposition: observed = trend + seasonal +
/// residual. Trend is a centered moving average, the seasonal effects are
/// the de-meaned per-position averages of the detrended series, and the
/// residual is whatever remains. Trend and residual are undefined for the
/// `period / 2` buckets at each edge of the series.
pub fn decompose(values: &[f64], period: usize) -> anyhow::Result<Decomposition> {
    anyhow::ensure!(period >= 2, "decomposition period must be at least 2");
    anyhow::ensure!(
        values.len() >= 2 * period,
        "need at least {} observations for period {}, got {}",
        2 * period,
        period,
        values.len()
    );

    let trend = centered_moving_average(values, period);
    let seasonal = seasonal_effects(values, &trend, period);
    let residual = values
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter())
        .map(|((value, trend), seasonal)| trend.map(|t| value - t - seasonal))
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
    })
}

/// Centered moving average of length `period`. For an even period the
/// window spans `period + 1` points with half weight on the two ends, so
/// the average stays centered on the bucket.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let half = period / 2;
    let mut trend = vec![None; values.len()];

    if period % 2 == 0 {
        for i in half..values.len().saturating_sub(half) {
            let window = &values[i - half..=i + half];
            let inner: f64 = window[1..window.len() - 1].iter().sum();
            let sum = inner + 0.5 * (window[0] + window[window.len() - 1]);
            trend[i] = Some(sum / period as f64);
        }
    } else {
        for i in half..values.len().saturating_sub(half) {
            let sum: f64 = values[i - half..=i + half].iter().sum();
            trend[i] = Some(sum / period as f64);
        }
    }

    trend
}

/// Average the detrended series per cycle position, then de-mean so the
/// seasonal effects sum to zero across one period. The result is tiled over
/// the whole series, so it is defined for every bucket.
fn seasonal_effects(values: &[f64], trend: &[Option<f64>], period: usize) -> Vec<f64> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];

    for (i, t) in trend.iter().enumerate() {
        if let Some(t) = t {
            sums[i % period] += values[i] - t;
            counts[i % period] += 1;
        }
    }

    let averages: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();
    let mean = averages.iter().sum::<f64>() / period as f64;

    (0..values.len())
        .map(|i| averages[i % period] - mean)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYCLE: [f64; 12] = [
        10.0, -5.0, 3.0, 0.0, -8.0, 4.0, 6.0, -10.0, 2.0, 7.0, -9.0, 0.0,
    ];

    /// Linear trend plus a zero-mean yearly cycle, no noise.
    fn synthetic_series(months: usize) -> Vec<f64> {
        (0..months)
            .map(|i| 100.0 + 2.0 * i as f64 + CYCLE[i % 12])
            .collect()
    }

    #[test]
    fn rejects_short_series() {
        let result = decompose(&[1.0; 23], 12);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least 24"));
    }

    #[test]
    fn trend_and_residual_undefined_at_edges() {
        let decomp = decompose(&synthetic_series(36), 12).unwrap();
        for i in 0..6 {
            assert!(decomp.trend[i].is_none());
            assert!(decomp.residual[i].is_none());
            assert!(decomp.trend[35 - i].is_none());
            assert!(decomp.residual[35 - i].is_none());
        }
        assert!(decomp.trend[6].is_some());
        assert!(decomp.trend[29].is_some());
    }

    #[test]
    fn recovers_linear_trend_exactly() {
        let decomp = decompose(&synthetic_series(48), 12).unwrap();
        for i in 6..42 {
            let trend = decomp.trend[i].unwrap();
            assert!(
                (trend - (100.0 + 2.0 * i as f64)).abs() < 1e-9,
                "trend at {i} was {trend}"
            );
        }
    }

    #[test]
    fn recovers_seasonal_cycle() {
        let decomp = decompose(&synthetic_series(48), 12).unwrap();
        for (i, seasonal) in decomp.seasonal.iter().enumerate() {
            assert!(
                (seasonal - CYCLE[i % 12]).abs() < 1e-9,
                "seasonal at {i} was {seasonal}"
            );
        }
    }

    #[test]
    fn seasonal_effects_sum_to_zero_over_one_period() {
        let decomp = decompose(&synthetic_series(36), 12).unwrap();
        let sum: f64 = decomp.seasonal[..12].iter().sum();
        assert!(sum.abs() < 1e-9);
    }

    #[test]
    fn residual_is_zero_for_noiseless_series() {
        let decomp = decompose(&synthetic_series(48), 12).unwrap();
        for residual in decomp.residual.iter().flatten() {
            assert!(residual.abs() < 1e-9);
        }
    }

    #[test]
    fn odd_period_uses_simple_centered_window() {
        let values: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let trend = centered_moving_average(&values, 3);
        assert!(trend[0].is_none());
        assert_eq!(trend[1], Some(1.0));
        assert_eq!(trend[4], Some(4.0));
        assert!(trend[8].is_none());
    }
}
