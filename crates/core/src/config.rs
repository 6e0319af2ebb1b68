//! Tunable constants for sweeps, sensitivity curves and caching

use serde::{Deserialize, Serialize};

/// Configuration shared by the evaluators and the time-series helpers
///
/// Defaults reproduce the published IARA charts: five-minute sampling, a
/// Wells-Riley horizon of three times the exposure, a two-hour lookahead when
/// susceptibles stay indefinitely and a 100× quanta sensitivity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Sample spacing of the Wells-Riley sweep, in hours
    pub wells_riley_resolution_hours: f64,
    /// Sweep end as a multiple of the base exposure time
    pub wells_riley_horizon_factor: f64,
    /// Sample spacing of the residual sweep, in minutes
    pub residual_resolution_minutes: f64,
    /// Post-departure window plotted in indefinite mode, in minutes
    pub indefinite_lookahead_minutes: f64,
    /// Quanta emission multiplier for the sensitivity curve
    pub sensitivity_multiplier: f64,
    /// Maximum number of memoized results kept per operation
    pub cache_capacity: usize,
}

impl ModelConfig {
    pub const DEFAULT: ModelConfig = ModelConfig {
        wells_riley_resolution_hours: 5.0 / 60.0,
        wells_riley_horizon_factor: 3.0,
        residual_resolution_minutes: 5.0,
        indefinite_lookahead_minutes: 120.0,
        sensitivity_multiplier: 100.0,
        cache_capacity: 256,
    };
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
