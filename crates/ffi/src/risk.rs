use iara_core::model::{try_residual_risk, try_wells_riley};
use iara_core::{ExposureScenario, PostDeparture, RiskResult};

use crate::error::{DefaultIaraError, IaraErrorCode};
use crate::helpers::{clear_last_error, track_error, track_model_error};
use crate::scenario::{IaraPostDeparture, IaraRiskResult, IaraScenario};

#[no_mangle]
/// Evaluate the Wells-Riley infection probability.
///
/// All rates and `exposure_time` must share one time base.
///
/// Returns
/// - `IaraErrorCode::Ok` (0) on success with the probability in `out_probability`
/// - `IaraErrorCode::NullPointer` if `out_probability` is null
/// - `IaraErrorCode::DegenerateParameters` if `ventilation_rate` is zero;
///   `out_probability` is set to 0
///
/// # Safety
///
/// - `out_probability` must be a valid, non-null pointer to a `double` that this function will write to.
///
/// # Example Usage (C)
/// ```c
/// double risk = 0.0;
/// IaraErrorCode err = iara_wells_riley(1, 0.465, 2.7, 1.0, 51.9, &risk);
/// ```
pub unsafe extern "C" fn iara_wells_riley(
    infector_count: u32,
    breathing_rate: f64,
    quanta_emission_rate: f64,
    exposure_time: f64,
    ventilation_rate: f64,
    out_probability: *mut f64,
) -> IaraErrorCode {
    let Some(out) = (unsafe { out_probability.as_mut() }) else {
        return track_error(&DefaultIaraError::null_pointer("out_probability"));
    };

    match try_wells_riley(
        infector_count,
        breathing_rate,
        quanta_emission_rate,
        exposure_time,
        ventilation_rate,
    ) {
        Ok(probability) => {
            *out = probability;
            clear_last_error()
        }
        Err(e) => {
            *out = 0.0;
            track_model_error(&e)
        }
    }
}

#[no_mangle]
/// Evaluate the residual-risk model for one scenario.
///
/// With `post_departure.indefinite` set, only the presence and indefinite risks
/// are computed and both `has_*` flags of the result are cleared.
///
/// Returns
/// - `IaraErrorCode::Ok` (0) on success with the result in `out_result`
/// - `IaraErrorCode::NullPointer` if `scenario` or `out_result` is null
/// - `IaraErrorCode::DegenerateParameters` if the ventilation rate or room volume
///   is zero; `out_result` holds the all-zero fallback
///
/// # Safety
///
/// - `scenario` must be a valid pointer to an `IaraScenario` or null.
/// - `out_result` must be a valid, non-null pointer to an `IaraRiskResult` that this function will write to.
pub unsafe extern "C" fn iara_residual_risk(
    scenario: *const IaraScenario,
    post_departure: IaraPostDeparture,
    out_result: *mut IaraRiskResult,
) -> IaraErrorCode {
    let Some(scenario) = (unsafe { scenario.as_ref() }) else {
        return track_error(&DefaultIaraError::null_pointer("scenario"));
    };
    let Some(out) = (unsafe { out_result.as_mut() }) else {
        return track_error(&DefaultIaraError::null_pointer("out_result"));
    };

    let s = ExposureScenario::from(scenario);
    let post = PostDeparture::from(post_departure);
    match try_residual_risk(
        s.infector_count,
        s.presence_duration,
        s.breathing_rate,
        s.quanta_emission_rate,
        s.ventilation_rate,
        s.room_volume,
        post,
    ) {
        Ok(result) => {
            *out = result.into();
            clear_last_error()
        }
        Err(e) => {
            *out = RiskResult::zero(post).into();
            track_model_error(&e)
        }
    }
}
