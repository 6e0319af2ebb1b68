//! Traditional vs. enhanced estimates and derived outputs

use crate::core_types::{ExposureScenario, PostDeparture, RiskResult};
use serde::{Deserialize, Serialize};

/// Classical Wells-Riley estimate next to the residual model's estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// Wells-Riley with exposure time `T` (constant concentration, no residual risk)
    pub traditional: f64,
    /// Combined risk for a fixed remain duration, indefinite risk otherwise
    pub enhanced: f64,
    /// Full residual-model result the enhanced estimate was taken from
    pub residual: RiskResult,
}

impl ModelComparison {
    /// Enhanced minus traditional estimate
    pub fn difference(&self) -> f64 {
        self.enhanced - self.traditional
    }
}

/// Evaluate both models on the same scenario
///
/// # Example
/// ```
/// use iara_core::model::compare_models;
/// use iara_core::{ExposureScenario, PostDeparture};
///
/// let scenario = ExposureScenario {
///     infector_count: 1,
///     breathing_rate: 0.00775,
///     quanta_emission_rate: 0.045,
///     ventilation_rate: 5.0,
///     room_volume: 50.0,
///     presence_duration: 60.0,
/// };
/// let comparison = compare_models(&scenario, PostDeparture::Indefinite);
/// assert_eq!(comparison.enhanced, comparison.residual.indefinite);
/// ```
pub fn compare_models(
    scenario: &ExposureScenario,
    post_departure: PostDeparture,
) -> ModelComparison {
    let residual = scenario.residual_risk(post_departure);
    let enhanced = residual.combined.unwrap_or(residual.indefinite);

    ModelComparison {
        traditional: scenario.wells_riley(),
        enhanced,
        residual,
    }
}

/// Expected number of new infections among `susceptibles`
///
/// Rounded up: a fractional expected case still means one more person at risk.
/// Never negative and never more than the susceptible population.
pub fn expected_new_infections(susceptibles: u32, probability: f64) -> u32 {
    if !probability.is_finite() || probability <= 0.0 {
        return 0;
    }
    let population = f64::from(susceptibles);
    (population * probability).ceil().min(population) as u32
}

/// Shares of the combined risk attributed to each phase, in percent
///
/// Shares are `P1 / P_comb` and `P2 / P_comb`; they do not add up to 100
/// because risks combine through survival probabilities rather than by sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub presence_percent: f64,
    pub departure_percent: f64,
}

impl RiskBreakdown {
    /// Breakdown of a fixed-duration result, `None` in indefinite mode or when
    /// the combined risk is zero
    pub fn from_result(result: &RiskResult) -> Option<Self> {
        let combined = result.combined?;
        let after = result.after_departure?;
        if combined <= 0.0 {
            return None;
        }
        Some(RiskBreakdown {
            presence_percent: result.during_presence / combined * 100.0,
            departure_percent: after / combined * 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_enhanced_uses_combined_for_fixed_duration() {
        let comparison = compare_models(&scenario(), PostDeparture::FixedDuration(30.0));
        assert_eq!(Some(comparison.enhanced), comparison.residual.combined);
    }

    #[test]
    fn test_enhanced_uses_indefinite_otherwise() {
        let comparison = compare_models(&scenario(), PostDeparture::Indefinite);
        assert_eq!(comparison.enhanced, comparison.residual.indefinite);
        // Traditional assumes instant steady state, so it exceeds presence-only risk
        assert!(comparison.traditional > comparison.residual.during_presence);
    }

    #[test]
    fn test_zero_ventilation_comparison() {
        let mut s = scenario();
        s.ventilation_rate = 0.0;
        let comparison = compare_models(&s, PostDeparture::FixedDuration(30.0));
        assert_eq!(comparison.traditional, 0.0);
        assert_eq!(comparison.enhanced, 0.0);
    }

    #[test]
    fn test_new_infections_rounds_up() {
        assert_eq!(expected_new_infections(10, 0.0), 0);
        assert_eq!(expected_new_infections(10, 0.01), 1);
        assert_eq!(expected_new_infections(10, 0.25), 3);
        assert_eq!(expected_new_infections(10, 1.0), 10);
        assert_eq!(expected_new_infections(0, 0.5), 0);
    }

    #[test]
    fn test_new_infections_guards_invalid_probability() {
        assert_eq!(expected_new_infections(10, -0.2), 0);
        assert_eq!(expected_new_infections(10, f64::NAN), 0);
        assert_eq!(expected_new_infections(10, 1.5), 10);
    }

    #[test]
    fn test_breakdown() {
        let result = scenario().residual_risk(PostDeparture::FixedDuration(30.0));
        let breakdown = RiskBreakdown::from_result(&result).unwrap();
        assert!(breakdown.presence_percent > 0.0 && breakdown.presence_percent <= 100.0);
        assert!(breakdown.departure_percent > 0.0 && breakdown.departure_percent <= 100.0);

        let indefinite = scenario().residual_risk(PostDeparture::Indefinite);
        assert!(RiskBreakdown::from_result(&indefinite).is_none());
    }
}
