//! Risk-over-time sweeps
//!
//! Sampling follows the charts of the original assessment tool: an evenly
//! spaced grid from 0 to the end of the window that always includes the end
//! point, with `floor(end / resolution) + 1` samples.

use crate::config::ModelConfig;
use crate::core_types::{ExposureScenario, PostDeparture, RiskResult, TimePoint, TimeSeries};
use crate::error::ModelError;
use crate::model::wells_riley;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on samples per sweep, guards against absurd resolutions
pub const MAX_SAMPLES: usize = 1_000_000;

/// Evenly spaced sampling window `[0, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    end: f64,
    resolution: f64,
}

impl TimeRange {
    /// Create a sampling window from 0 to `end` with nominal spacing `resolution`
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidTimeRange`] if `end` is negative or not finite,
    /// if `resolution` is not a positive finite number, or if the window would
    /// need more than [`MAX_SAMPLES`] samples.
    pub fn new(end: f64, resolution: f64) -> Result<Self, ModelError> {
        if !end.is_finite() || end < 0.0 {
            return Err(ModelError::InvalidTimeRange {
                reason: format!("end must be finite and non-negative, got {end}"),
            });
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(ModelError::InvalidTimeRange {
                reason: format!("resolution must be finite and positive, got {resolution}"),
            });
        }
        if end / resolution >= MAX_SAMPLES as f64 {
            return Err(ModelError::InvalidTimeRange {
                reason: format!(
                    "{end} / {resolution} exceeds the maximum of {MAX_SAMPLES} samples"
                ),
            });
        }
        Ok(TimeRange { end, resolution })
    }

    /// Wells-Riley window: three times the exposure at five-minute steps (hours)
    ///
    /// # Errors
    /// See [`TimeRange::new`].
    pub fn wells_riley(exposure_hours: f64, config: &ModelConfig) -> Result<Self, ModelError> {
        Self::new(
            exposure_hours * config.wells_riley_horizon_factor,
            config.wells_riley_resolution_hours,
        )
    }

    /// Residual window in minutes: presence plus remain duration, or presence plus
    /// the indefinite lookahead
    ///
    /// # Errors
    /// See [`TimeRange::new`].
    pub fn residual(
        presence_minutes: f64,
        post_departure: PostDeparture,
        config: &ModelConfig,
    ) -> Result<Self, ModelError> {
        let after = post_departure
            .duration()
            .unwrap_or(config.indefinite_lookahead_minutes);
        Self::new(presence_minutes + after, config.residual_resolution_minutes)
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Number of samples, end point included
    pub fn len(&self) -> usize {
        (self.end / self.resolution) as usize + 1
    }

    /// Always false: a window has at least the sample at 0
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sample times in ascending order
    ///
    /// The actual spacing is `end / (len - 1)`, which can differ slightly from
    /// `resolution` so that the last sample lands exactly on `end`.
    pub fn points(&self) -> impl Iterator<Item = f64> {
        let count = self.len();
        let end = self.end;
        let step = if count > 1 {
            end / (count - 1) as f64
        } else {
            0.0
        };
        (0..count).map(move |i| {
            if i + 1 == count && count > 1 {
                end
            } else {
                i as f64 * step
            }
        })
    }
}

/// Wells-Riley probability at every sample time, other parameters fixed
///
/// # Example
/// ```
/// use iara_core::model::{sweep_wells_riley, TimeRange};
///
/// let range = TimeRange::new(1.0, 0.25).unwrap();
/// let series = sweep_wells_riley(1, 0.465, 2.7, 50.0, &range);
/// assert_eq!(series.len(), 5);
/// assert_eq!(series.points[0].risk, 0.0);
/// ```
pub fn sweep_wells_riley(
    infector_count: u32,
    breathing_rate: f64,
    quanta_emission_rate: f64,
    ventilation_rate: f64,
    range: &TimeRange,
) -> TimeSeries {
    debug!(
        samples = range.len(),
        end = range.end(),
        "Wells-Riley sweep"
    );
    range
        .points()
        .map(|time| TimePoint {
            time,
            risk: wells_riley(
                infector_count,
                breathing_rate,
                quanta_emission_rate,
                time,
                ventilation_rate,
            ),
        })
        .collect()
}

/// Wells-Riley sweep with the quanta emission rate scaled by `multiplier`
///
/// Illustrates how sensitive the risk curve is to the emission estimate.
pub fn sensitivity_sweep(
    scenario: &ExposureScenario,
    multiplier: f64,
    range: &TimeRange,
) -> TimeSeries {
    let scaled = scenario.with_scaled_emission(multiplier);
    sweep_wells_riley(
        scaled.infector_count,
        scaled.breathing_rate,
        scaled.quanta_emission_rate,
        scaled.ventilation_rate,
        range,
    )
}

/// Residual-model risk curve across both phases
///
/// Samples up to and including `T` use the presence risk with `T := τ`. Later
/// samples use the post-departure risk with presence fixed at `T` and remain
/// duration `τ - T`, so the curve shows the risk accrued since the infectors
/// left and restarts near zero right after `T`.
pub fn sweep_residual_risk(
    scenario: &ExposureScenario,
    post_departure: PostDeparture,
    range: &TimeRange,
) -> TimeSeries {
    debug!(
        samples = range.len(),
        end = range.end(),
        indefinite = post_departure.is_indefinite(),
        "Residual risk sweep"
    );
    piecewise_sweep(scenario, range, |result| result.after_departure)
}

/// Cumulative residual-model risk curve
///
/// Same sampling as [`sweep_residual_risk`] but after `T` each sample is the
/// combined risk over both phases, which continues smoothly from the presence
/// risk at `τ = T` and approaches the indefinite risk.
pub fn sweep_cumulative_risk(
    scenario: &ExposureScenario,
    post_departure: PostDeparture,
    range: &TimeRange,
) -> TimeSeries {
    debug!(
        samples = range.len(),
        end = range.end(),
        indefinite = post_departure.is_indefinite(),
        "Cumulative risk sweep"
    );
    piecewise_sweep(scenario, range, |result| result.combined)
}

fn piecewise_sweep(
    scenario: &ExposureScenario,
    range: &TimeRange,
    after: impl Fn(&RiskResult) -> Option<f64>,
) -> TimeSeries {
    let presence = scenario.presence_duration;

    range
        .points()
        .map(|time| {
            let risk = if time <= presence {
                scenario
                    .with_presence_duration(time)
                    .residual_risk(PostDeparture::Indefinite)
                    .during_presence
            } else {
                let result = scenario.residual_risk(PostDeparture::FixedDuration(time - presence));
                // FixedDuration always populates both optional fields
                after(&result).unwrap_or(0.0)
            };
            TimePoint { time, risk }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> ExposureScenario {
        ExposureScenario {
            infector_count: 2,
            breathing_rate: 0.00775,
            quanta_emission_rate: 0.05,
            ventilation_rate: 1.0,
            room_volume: 50.0,
            presence_duration: 60.0,
        }
    }

    #[test]
    fn test_range_includes_end_point() {
        let range = TimeRange::new(3.0, 5.0 / 60.0).unwrap();
        let points: Vec<f64> = range.points().collect();
        assert_eq!(points.len(), range.len());
        assert_eq!(points[0], 0.0);
        assert_eq!(*points.last().unwrap(), 3.0);
        assert!(points.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_range_shorter_than_resolution() {
        let range = TimeRange::new(0.04, 5.0 / 60.0).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.points().collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn test_range_rejects_bad_bounds() {
        assert!(TimeRange::new(-1.0, 1.0).is_err());
        assert!(TimeRange::new(f64::INFINITY, 1.0).is_err());
        assert!(TimeRange::new(10.0, 0.0).is_err());
        assert!(TimeRange::new(1.0e9, 1.0e-3).is_err());
    }

    #[test]
    fn test_residual_range_windows() {
        let config = ModelConfig::default();
        let fixed = TimeRange::residual(60.0, PostDeparture::FixedDuration(30.0), &config).unwrap();
        assert_eq!(fixed.end(), 90.0);
        assert_eq!(fixed.len(), 19);

        let indefinite = TimeRange::residual(60.0, PostDeparture::Indefinite, &config).unwrap();
        assert_eq!(indefinite.end(), 180.0);
        assert_eq!(indefinite.len(), 37);
    }

    #[test]
    fn test_wells_riley_range_is_three_times_exposure() {
        let range = TimeRange::wells_riley(2.0, &ModelConfig::default()).unwrap();
        assert_eq!(range.end(), 6.0);
    }

    #[test]
    fn test_sensitivity_curve_dominates_baseline() {
        let s = scenario();
        let range = TimeRange::new(120.0, 5.0).unwrap();
        let base = sweep_wells_riley(
            s.infector_count,
            s.breathing_rate,
            s.quanta_emission_rate,
            s.ventilation_rate,
            &range,
        );
        let scaled = sensitivity_sweep(&s, 100.0, &range);
        for (b, x) in base.iter().zip(scaled.iter()) {
            assert!(x.risk >= b.risk);
        }
        assert!(scaled.peak_risk() > base.peak_risk());
    }

    #[test]
    fn test_residual_sweep_is_piecewise() {
        let s = scenario();
        let post = PostDeparture::FixedDuration(30.0);
        let range =
            TimeRange::residual(s.presence_duration, post, &ModelConfig::default()).unwrap();
        let series = sweep_residual_risk(&s, post, &range);

        for point in &series {
            let expected = if point.time <= s.presence_duration {
                s.with_presence_duration(point.time)
                    .residual_risk(PostDeparture::Indefinite)
                    .during_presence
            } else {
                s.residual_risk(PostDeparture::FixedDuration(point.time - s.presence_duration))
                    .after_departure
                    .unwrap()
            };
            assert_relative_eq!(point.risk, expected, epsilon = 1e-15);
        }

        let last = series.last().unwrap();
        assert_eq!(last.time, 90.0);
        assert_relative_eq!(
            last.risk,
            s.residual_risk(post).after_departure.unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_cumulative_sweep_is_continuous_at_departure() {
        let s = scenario();
        let at_departure = s.residual_risk(PostDeparture::Indefinite).during_presence;
        let just_after = s
            .residual_risk(PostDeparture::FixedDuration(1e-9))
            .combined
            .unwrap();
        assert_relative_eq!(at_departure, just_after, epsilon = 1e-9);

        let range =
            TimeRange::residual(60.0, PostDeparture::Indefinite, &ModelConfig::default()).unwrap();
        let series = sweep_cumulative_risk(&s, PostDeparture::Indefinite, &range);
        let risks: Vec<f64> = series.risks().collect();
        assert!(risks.windows(2).all(|w| w[1] >= w[0]));
    }
}
