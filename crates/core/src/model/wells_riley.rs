//! Wells-Riley Airborne Infection Model (1978)
//!
//! Classical steady-state estimate of the probability that one susceptible is
//! infected after sharing a well-mixed room with infectious individuals.
//!
//! # References
//! - Riley, E.C., Murphy, G., Riley, R.L. (1978). "Airborne spread of measles in a
//!   suburban elementary school." American Journal of Epidemiology, 107(5), 421-432.

use crate::core_types::ExposureScenario;
use crate::error::ModelError;
use tracing::debug;

/// Calculate the Wells-Riley infection probability
///
/// # Formula
/// ```text
/// P = 1 - exp(-(I × p × q × t) / Q)
/// ```
///
/// Where:
/// - **I** = Number of infectors
/// - **p** = Pulmonary breathing rate of a susceptible (volume/time)
/// - **q** = Quanta emission rate per infector (quanta/time)
/// - **t** = Exposure time
/// - **Q** = Room ventilation rate (volume/time)
///
/// All rates and `t` must share one time base.
///
/// # Returns
/// Probability of infection in `[0, 1)`, or 0 when `Q = 0`
///
/// # Example
/// ```
/// use iara_core::model::wells_riley;
///
/// // One infector resting with COVID-19, one hour in a 6 ACH room of 8.65 m³ (per-hour units)
/// let risk = wells_riley(1, 0.465, 0.55, 1.0, 6.0 * 8.65);
/// assert!(risk > 0.0 && risk < 0.05);
///
/// // Unset ventilation falls back to zero instead of dividing by zero
/// assert_eq!(wells_riley(1, 1.0, 1.0, 1.0, 0.0), 0.0);
/// ```
pub fn wells_riley(
    infector_count: u32,
    breathing_rate: f64,
    quanta_emission_rate: f64,
    exposure_time: f64,
    ventilation_rate: f64,
) -> f64 {
    match try_wells_riley(
        infector_count,
        breathing_rate,
        quanta_emission_rate,
        exposure_time,
        ventilation_rate,
    ) {
        Ok(probability) => probability,
        Err(e) => {
            debug!(ventilation_rate, "Wells-Riley fallback to zero risk: {e}");
            0.0
        }
    }
}

/// Wells-Riley probability that reports degenerate input instead of falling back
///
/// # Errors
/// Returns [`ModelError::ZeroDivision`] when `ventilation_rate` is exactly zero.
pub fn try_wells_riley(
    infector_count: u32,
    breathing_rate: f64,
    quanta_emission_rate: f64,
    exposure_time: f64,
    ventilation_rate: f64,
) -> Result<f64, ModelError> {
    if ventilation_rate == 0.0 {
        return Err(ModelError::ZeroDivision {
            quantity: "ventilation_rate",
        });
    }

    let inhaled_quanta =
        f64::from(infector_count) * breathing_rate * quanta_emission_rate * exposure_time
            / ventilation_rate;

    // 1 - exp(-x) without cancellation for small doses
    Ok(-(-inhaled_quanta).exp_m1())
}

impl ExposureScenario {
    /// Wells-Riley probability with the presence duration as exposure time
    pub fn wells_riley(&self) -> f64 {
        wells_riley(
            self.infector_count,
            self.breathing_rate,
            self.quanta_emission_rate,
            self.presence_duration,
            self.ventilation_rate,
        )
    }
}
