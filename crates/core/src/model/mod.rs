//! Closed-form airborne infection risk models
//!
//! Every function here is a pure mapping from inputs to probabilities. Degenerate
//! inputs (a vanishing ventilation rate or room volume) yield zero risk; use the
//! `try_*` variants to observe them as [`ModelError`](crate::ModelError).

pub mod comparison;
pub mod residual_risk;
pub mod time_series;
pub mod wells_riley;

pub use comparison::{compare_models, expected_new_infections, ModelComparison, RiskBreakdown};
pub use residual_risk::{residual_risk, try_residual_risk};
pub use time_series::{
    sensitivity_sweep, sweep_cumulative_risk, sweep_residual_risk, sweep_wells_riley, TimeRange,
};
pub use wells_riley::{try_wells_riley, wells_riley};
