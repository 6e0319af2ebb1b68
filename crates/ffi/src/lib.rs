//! C ABI for the IARA risk models
//!
//! Every function returns an [`IaraErrorCode`] and writes its results through
//! caller-provided pointers. Sweeps write into caller-owned buffers sized with
//! [`iara_sweep_len`]. Details of the last failure on the calling thread are
//! available through [`iara_get_last_error`].

mod error;
mod helpers;
mod risk;
mod scenario;
mod sweeps;

pub use error::{iara_get_last_error, iara_get_last_error_code, IaraErrorCode};
pub use risk::{iara_residual_risk, iara_wells_riley};
pub use scenario::{IaraPostDeparture, IaraRiskResult, IaraScenario, IaraSeries, IaraTimeRange};
pub use sweeps::{
    iara_sweep_cumulative_risk, iara_sweep_len, iara_sweep_residual_risk, iara_sweep_wells_riley,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn scenario() -> IaraScenario {
        IaraScenario {
            infector_count: 2,
            breathing_rate: 0.00775,
            quanta_emission_rate: 0.05,
            ventilation_rate: 1.0,
            room_volume: 50.0,
            presence_duration: 60.0,
        }
    }

    const FIXED: IaraPostDeparture = IaraPostDeparture {
        indefinite: false,
        remain_duration: 30.0,
    };

    const RANGE: IaraTimeRange = IaraTimeRange {
        end: 90.0,
        resolution: 5.0,
    };

    fn last_error() -> String {
        let msg = iara_get_last_error();
        assert!(!msg.is_null());
        unsafe { CStr::from_ptr(msg) }
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_wells_riley_matches_core() {
        let mut risk = -1.0;
        let code = unsafe { iara_wells_riley(1, 0.465, 2.7, 1.0, 51.9, &mut risk) };
        assert_eq!(code, IaraErrorCode::Ok);
        assert_eq!(
            risk,
            iara_core::model::wells_riley(1, 0.465, 2.7, 1.0, 51.9)
        );
        assert!(iara_get_last_error().is_null());
    }

    #[test]
    fn test_wells_riley_degenerate_writes_zero() {
        let mut risk = -1.0;
        let code = unsafe { iara_wells_riley(1, 1.0, 1.0, 1.0, 0.0, &mut risk) };
        assert_eq!(code, IaraErrorCode::DegenerateParameters);
        assert_eq!(risk, 0.0);
        assert_eq!(
            iara_get_last_error_code(),
            IaraErrorCode::DegenerateParameters
        );
        assert!(last_error().contains("ventilation_rate"));
    }

    #[test]
    fn test_null_pointers_rejected() {
        let code = unsafe { iara_wells_riley(1, 1.0, 1.0, 1.0, 1.0, ptr::null_mut()) };
        assert_eq!(code, IaraErrorCode::NullPointer);
        assert_eq!(last_error(), "Parameter 'out_probability' cannot be null");

        let mut result = IaraRiskResult::default();
        let code = unsafe { iara_residual_risk(ptr::null(), FIXED, &mut result) };
        assert_eq!(code, IaraErrorCode::NullPointer);
    }

    #[test]
    fn test_residual_flags() {
        let s = scenario();
        let mut result = IaraRiskResult::default();

        let code = unsafe { iara_residual_risk(&s, FIXED, &mut result) };
        assert_eq!(code, IaraErrorCode::Ok);
        assert!(result.has_after_departure && result.has_combined);
        assert!(result.combined >= result.during_presence);

        let indefinite = IaraPostDeparture {
            indefinite: true,
            remain_duration: 0.0,
        };
        let code = unsafe { iara_residual_risk(&s, indefinite, &mut result) };
        assert_eq!(code, IaraErrorCode::Ok);
        assert!(!result.has_after_departure && !result.has_combined);
        assert!(result.indefinite >= result.during_presence);
    }

    #[test]
    fn test_sweep_len_and_invalid_range() {
        let mut len = 0;
        assert_eq!(
            unsafe { iara_sweep_len(RANGE, &mut len) },
            IaraErrorCode::Ok
        );
        assert_eq!(len, 19);

        let bad = IaraTimeRange {
            end: 10.0,
            resolution: 0.0,
        };
        assert_eq!(
            unsafe { iara_sweep_len(bad, &mut len) },
            IaraErrorCode::InvalidParameter
        );
    }

    #[test]
    fn test_sweep_into_buffers() {
        let s = scenario();
        let mut times = vec![0.0; 19];
        let mut risks = vec![0.0; 19];
        let mut series = IaraSeries {
            times: times.as_mut_ptr(),
            risks: risks.as_mut_ptr(),
            capacity: times.len(),
            len: 0,
        };

        let code = unsafe { iara_sweep_residual_risk(&s, FIXED, RANGE, &mut series) };
        assert_eq!(code, IaraErrorCode::Ok);
        assert_eq!(series.len, 19);

        let expected = iara_core::model::sweep_residual_risk(
            &(&s).into(),
            iara_core::PostDeparture::FixedDuration(30.0),
            &iara_core::model::TimeRange::new(90.0, 5.0).unwrap(),
        );
        assert_eq!(times, expected.times().collect::<Vec<_>>());
        assert_eq!(risks, expected.risks().collect::<Vec<_>>());

        let code = unsafe { iara_sweep_wells_riley(&s, RANGE, &mut series) };
        assert_eq!(code, IaraErrorCode::Ok);
        assert_eq!(risks[0], 0.0);
        assert!(risks.windows(2).all(|w| w[1] >= w[0]));

        let code = unsafe { iara_sweep_cumulative_risk(&s, FIXED, RANGE, &mut series) };
        assert_eq!(code, IaraErrorCode::Ok);
        assert!(risks.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_sweep_buffer_too_small_reports_required_len() {
        let s = scenario();
        let mut times = vec![0.0; 4];
        let mut risks = vec![0.0; 4];
        let mut series = IaraSeries {
            times: times.as_mut_ptr(),
            risks: risks.as_mut_ptr(),
            capacity: 4,
            len: 0,
        };

        let code = unsafe { iara_sweep_wells_riley(&s, RANGE, &mut series) };
        assert_eq!(code, IaraErrorCode::BufferTooSmall);
        assert_eq!(series.len, 19);
        assert!(times.iter().all(|&t| t == 0.0));
        assert!(risks.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_degenerate_sweep_still_fills_buffer() {
        let mut s = scenario();
        s.room_volume = 0.0;
        let mut times = vec![0.0; 19];
        let mut risks = vec![1.0; 19];
        let mut series = IaraSeries {
            times: times.as_mut_ptr(),
            risks: risks.as_mut_ptr(),
            capacity: 19,
            len: 0,
        };

        let code = unsafe { iara_sweep_residual_risk(&s, FIXED, RANGE, &mut series) };
        assert_eq!(code, IaraErrorCode::DegenerateParameters);
        assert_eq!(series.len, 19);
        assert!(risks.iter().all(|&r| r == 0.0));
        assert_eq!(times[18], 90.0);
    }
}
