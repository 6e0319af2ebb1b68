use iara_core::model::{
    sweep_cumulative_risk, sweep_residual_risk, sweep_wells_riley, try_wells_riley, TimeRange,
};
use iara_core::{ExposureScenario, ModelError, PostDeparture, TimeSeries};
use std::slice;

use crate::error::{DefaultIaraError, IaraErrorCode};
use crate::helpers::{clear_last_error, track_error, track_model_error};
use crate::scenario::{IaraPostDeparture, IaraScenario, IaraSeries, IaraTimeRange};

#[no_mangle]
/// Number of samples a sweep over `range` produces.
///
/// Use this to size the buffers passed to the `iara_sweep_*` functions.
///
/// Returns
/// - `IaraErrorCode::Ok` (0) on success with the count in `out_len`
/// - `IaraErrorCode::NullPointer` if `out_len` is null
/// - `IaraErrorCode::InvalidParameter` if `end` is negative or `resolution` is not positive
///
/// # Safety
///
/// - `out_len` must be a valid, non-null pointer to a `usize` that this function will write to.
pub unsafe extern "C" fn iara_sweep_len(
    range: IaraTimeRange,
    out_len: *mut usize,
) -> IaraErrorCode {
    let Some(out) = (unsafe { out_len.as_mut() }) else {
        return track_error(&DefaultIaraError::null_pointer("out_len"));
    };
    match TimeRange::new(range.end, range.resolution) {
        Ok(range) => {
            *out = range.len();
            clear_last_error()
        }
        Err(e) => track_model_error(&e),
    }
}

#[no_mangle]
/// Wells-Riley risk at every sample of `range`, using the scenario's
/// breathing, emission and ventilation rates.
///
/// Returns
/// - `IaraErrorCode::Ok` (0) on success with `out_series.len` samples written
/// - `IaraErrorCode::NullPointer` if `scenario`, `out_series` or its buffers are null
/// - `IaraErrorCode::InvalidParameter` if `range` is invalid
/// - `IaraErrorCode::BufferTooSmall` if `out_series.capacity` is too small;
///   `out_series.len` is set to the required capacity and nothing is written
/// - `IaraErrorCode::DegenerateParameters` if the ventilation rate is zero;
///   the zero-risk series is still written
///
/// # Safety
///
/// - `scenario` must be a valid pointer to an `IaraScenario` or null.
/// - `out_series` must be a valid pointer to an `IaraSeries` or null; its `times`
///   and `risks` must point to non-overlapping buffers of `capacity` doubles.
pub unsafe extern "C" fn iara_sweep_wells_riley(
    scenario: *const IaraScenario,
    range: IaraTimeRange,
    out_series: *mut IaraSeries,
) -> IaraErrorCode {
    let Some(scenario) = (unsafe { scenario.as_ref() }) else {
        return track_error(&DefaultIaraError::null_pointer("scenario"));
    };
    let s = ExposureScenario::from(scenario);
    let degenerate = try_wells_riley(
        s.infector_count,
        s.breathing_rate,
        s.quanta_emission_rate,
        range.end,
        s.ventilation_rate,
    )
    .err();

    unsafe {
        fill_series(range, out_series, degenerate, |range| {
            sweep_wells_riley(
                s.infector_count,
                s.breathing_rate,
                s.quanta_emission_rate,
                s.ventilation_rate,
                range,
            )
        })
    }
}

#[no_mangle]
/// Residual-model risk curve: presence risk up to `T`, then the risk accrued
/// after the infectors left.
///
/// Return codes match `iara_sweep_wells_riley`; degenerate parameters are a zero
/// ventilation rate or room volume.
///
/// # Safety
///
/// Same requirements as `iara_sweep_wells_riley`.
pub unsafe extern "C" fn iara_sweep_residual_risk(
    scenario: *const IaraScenario,
    post_departure: IaraPostDeparture,
    range: IaraTimeRange,
    out_series: *mut IaraSeries,
) -> IaraErrorCode {
    unsafe {
        residual_sweep(
            scenario,
            post_departure,
            range,
            out_series,
            sweep_residual_risk,
        )
    }
}

#[no_mangle]
/// Cumulative residual-model risk curve: presence risk up to `T`, then the
/// combined risk over both phases.
///
/// Return codes match `iara_sweep_wells_riley`.
///
/// # Safety
///
/// Same requirements as `iara_sweep_wells_riley`.
pub unsafe extern "C" fn iara_sweep_cumulative_risk(
    scenario: *const IaraScenario,
    post_departure: IaraPostDeparture,
    range: IaraTimeRange,
    out_series: *mut IaraSeries,
) -> IaraErrorCode {
    unsafe {
        residual_sweep(
            scenario,
            post_departure,
            range,
            out_series,
            sweep_cumulative_risk,
        )
    }
}

unsafe fn residual_sweep(
    scenario: *const IaraScenario,
    post_departure: IaraPostDeparture,
    range: IaraTimeRange,
    out_series: *mut IaraSeries,
    sweep: fn(&ExposureScenario, PostDeparture, &TimeRange) -> TimeSeries,
) -> IaraErrorCode {
    let Some(scenario) = (unsafe { scenario.as_ref() }) else {
        return track_error(&DefaultIaraError::null_pointer("scenario"));
    };
    let s = ExposureScenario::from(scenario);
    let post = PostDeparture::from(post_departure);
    let degenerate = s.try_residual_risk(post).err();

    let run = |range: &TimeRange| sweep(&s, post, range);
    unsafe { fill_series(range, out_series, degenerate, run) }
}

/// Validate the output buffers, run `sweep` and copy its samples out.
unsafe fn fill_series(
    range: IaraTimeRange,
    out_series: *mut IaraSeries,
    degenerate: Option<ModelError>,
    sweep: impl FnOnce(&TimeRange) -> TimeSeries,
) -> IaraErrorCode {
    let Some(out) = (unsafe { out_series.as_mut() }) else {
        return track_error(&DefaultIaraError::null_pointer("out_series"));
    };
    if out.times.is_null() {
        return track_error(&DefaultIaraError::null_pointer("out_series.times"));
    }
    if out.risks.is_null() {
        return track_error(&DefaultIaraError::null_pointer("out_series.risks"));
    }

    let range = match TimeRange::new(range.end, range.resolution) {
        Ok(range) => range,
        Err(e) => return track_model_error(&e),
    };
    let required = range.len();
    if required > out.capacity {
        out.len = required;
        return track_error(&DefaultIaraError::buffer_too_small(required, out.capacity));
    }

    let series = sweep(&range);
    let times = unsafe { slice::from_raw_parts_mut(out.times, out.capacity) };
    let risks = unsafe { slice::from_raw_parts_mut(out.risks, out.capacity) };
    for ((time, risk), point) in times.iter_mut().zip(risks.iter_mut()).zip(series.iter()) {
        *time = point.time;
        *risk = point.risk;
    }
    out.len = series.len();

    match degenerate {
        Some(e) => track_model_error(&e),
        None => clear_last_error(),
    }
}
