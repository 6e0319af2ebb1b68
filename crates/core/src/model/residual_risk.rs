//! Residual Risk Model (Edwards et al., 2024)
//!
//! Extends Wells-Riley with the transient behaviour of the quanta concentration.
//! While infectors are present the concentration builds up towards its steady
//! state; once they leave it decays with rate `Q/v` and susceptibles who stay
//! keep inhaling the remaining quanta.
//!
//! Concentration in a well-mixed room of volume `v` ventilated at rate `Q`:
//! ```text
//! presence:  C(τ) = (I·q/Q) · (1 - exp(-(Q/v)·τ))                 0 ≤ τ ≤ T
//! departure: C(τ) = C(T) · exp(-(Q/v)·(τ - T))                     τ > T
//! ```
//! Integrating the inhaled dose `p·C` over each phase gives the four
//! closed-form risks implemented here.
//!
//! # References
//! - Edwards, A.J., King, M.-F., Noakes, C.J., Peckham, D., López-García, M. (2024).
//!   "The Wells-Riley model revisited: Randomness, heterogeneity, and transient
//!   behaviours." Risk Analysis, 44(9), 2125-2147. Equations 9, 11, 13 and 14.

use crate::core_types::{ExposureScenario, PostDeparture, RiskResult};
use crate::error::ModelError;
use tracing::debug;

/// Exponent terms shared by the four residual-risk equations
///
/// Each `*_exponent` method returns `x` such that the risk is `1 - exp(x)`.
#[derive(Debug, Clone, Copy)]
struct DecayTerms {
    /// p·q·I
    emission: f64,
    /// Q
    ventilation: f64,
    /// Q²
    ventilation_squared: f64,
    /// v
    volume: f64,
    /// Q/v
    decay: f64,
}

impl DecayTerms {
    fn new(
        infector_count: u32,
        breathing_rate: f64,
        quanta_emission_rate: f64,
        ventilation_rate: f64,
        room_volume: f64,
    ) -> Result<Self, ModelError> {
        // Q² underflows to zero for tiny but nonzero Q
        let ventilation_squared = ventilation_rate.powi(2);
        if ventilation_squared == 0.0 {
            return Err(ModelError::ZeroDivision {
                quantity: "ventilation_rate",
            });
        }
        if room_volume == 0.0 {
            return Err(ModelError::ZeroDivision {
                quantity: "room_volume",
            });
        }

        Ok(DecayTerms {
            emission: breathing_rate * quanta_emission_rate * f64::from(infector_count),
            ventilation: ventilation_rate,
            ventilation_squared,
            volume: room_volume,
            decay: ventilation_rate / room_volume,
        })
    }

    /// 1 - exp(-(Q/v)·τ): fraction of steady-state concentration reached after τ
    #[inline]
    fn build_up(&self, duration: f64) -> f64 {
        -(-self.decay * duration).exp_m1()
    }

    /// Equation 9: (p·q·I / Q²) · (v·(1 - exp(-(Q/v)·T)) - Q·T)
    fn presence_exponent(&self, presence: f64) -> f64 {
        (self.emission / self.ventilation_squared)
            * (self.volume * self.build_up(presence) - self.ventilation * presence)
    }

    /// Equation 14: -(p·q·I / Q) · T
    fn indefinite_exponent(&self, presence: f64) -> f64 {
        -(self.emission / self.ventilation) * presence
    }

    /// Equation 11: -(p·q·v·I / Q²) · (1 - exp(-(Q/v)·T)) · (1 - exp(-(Q/v)·t))
    fn post_departure_exponent(&self, presence: f64, remain: f64) -> f64 {
        -(self.emission * self.volume / self.ventilation_squared)
            * self.build_up(presence)
            * self.build_up(remain)
    }

    /// Equation 13: (p·q·v·I / Q²) · (exp(-(Q/v)·t)·(1 - exp(-(Q/v)·T)) - (Q/v)·T)
    fn combined_exponent(&self, presence: f64, remain: f64) -> f64 {
        (self.emission * self.volume / self.ventilation_squared)
            * ((-self.decay * remain).exp() * self.build_up(presence) - self.decay * presence)
    }
}

/// Risk from an exponent `x`: 1 - exp(x)
#[inline]
fn risk_from_exponent(exponent: f64) -> f64 {
    -exponent.exp_m1()
}

/// Calculate the residual-risk probabilities for a two-phase exposure
///
/// # Arguments
/// * `infector_count` - Number of infectors (I)
/// * `presence_duration` - Time infectors are present (T)
/// * `breathing_rate` - Breathing rate of a susceptible (p)
/// * `quanta_emission_rate` - Quanta emission rate per infector (q)
/// * `ventilation_rate` - Room ventilation rate (Q)
/// * `room_volume` - Room volume (v)
/// * `post_departure` - How long susceptibles stay after departure (t)
///
/// # Returns
/// `(P1, None, None, P_inf)` in indefinite mode, `(P1, P2, P_comb, P_inf)` for a
/// fixed remain duration. All four collapse to 0 when `Q = 0` or `v = 0`.
///
/// # Example
/// ```
/// use iara_core::model::residual_risk;
/// use iara_core::PostDeparture;
///
/// let result = residual_risk(2, 60.0, 0.00775, 0.05, 1.0, 50.0, PostDeparture::FixedDuration(30.0));
/// assert!(result.after_departure.is_some());
/// assert!(result.indefinite >= result.during_presence);
/// ```
pub fn residual_risk(
    infector_count: u32,
    presence_duration: f64,
    breathing_rate: f64,
    quanta_emission_rate: f64,
    ventilation_rate: f64,
    room_volume: f64,
    post_departure: PostDeparture,
) -> RiskResult {
    match try_residual_risk(
        infector_count,
        presence_duration,
        breathing_rate,
        quanta_emission_rate,
        ventilation_rate,
        room_volume,
        post_departure,
    ) {
        Ok(result) => result,
        Err(e) => {
            debug!(
                ventilation_rate,
                room_volume, "Residual risk fallback to zero risk: {e}"
            );
            RiskResult::zero(post_departure)
        }
    }
}

/// Residual-risk probabilities that report degenerate input instead of falling back
///
/// # Errors
/// Returns [`ModelError::ZeroDivision`] when `room_volume` is zero or
/// `ventilation_rate` is so small that its square is zero.
pub fn try_residual_risk(
    infector_count: u32,
    presence_duration: f64,
    breathing_rate: f64,
    quanta_emission_rate: f64,
    ventilation_rate: f64,
    room_volume: f64,
    post_departure: PostDeparture,
) -> Result<RiskResult, ModelError> {
    let terms = DecayTerms::new(
        infector_count,
        breathing_rate,
        quanta_emission_rate,
        ventilation_rate,
        room_volume,
    )?;

    let during_presence = risk_from_exponent(terms.presence_exponent(presence_duration));
    let indefinite = risk_from_exponent(terms.indefinite_exponent(presence_duration));

    let (after_departure, combined) = match post_departure {
        PostDeparture::Indefinite => (None, None),
        PostDeparture::FixedDuration(remain) => (
            Some(risk_from_exponent(
                terms.post_departure_exponent(presence_duration, remain),
            )),
            Some(risk_from_exponent(
                terms.combined_exponent(presence_duration, remain),
            )),
        ),
    };

    Ok(RiskResult {
        during_presence,
        after_departure,
        combined,
        indefinite,
    })
}

impl ExposureScenario {
    /// Residual-risk probabilities for this scenario
    pub fn residual_risk(&self, post_departure: PostDeparture) -> RiskResult {
        residual_risk(
            self.infector_count,
            self.presence_duration,
            self.breathing_rate,
            self.quanta_emission_rate,
            self.ventilation_rate,
            self.room_volume,
            post_departure,
        )
    }

    /// Residual-risk probabilities, reporting degenerate parameters as an error
    ///
    /// # Errors
    /// See [`try_residual_risk`].
    pub fn try_residual_risk(
        &self,
        post_departure: PostDeparture,
    ) -> Result<RiskResult, ModelError> {
        try_residual_risk(
            self.infector_count,
            self.presence_duration,
            self.breathing_rate,
            self.quanta_emission_rate,
            self.ventilation_rate,
            self.room_volume,
            post_departure,
        )
    }
}
