use crate::error::{with_last_error_mut, DefaultIaraError, IaraError, IaraErrorCode};
use iara_core::ModelError;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
pub(crate) fn set_last_error(error: &impl IaraError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl IaraError) -> IaraErrorCode {
    set_last_error(error);
    error.code()
}

/// Track a model error, mapping it onto the matching FFI code.
pub(crate) fn track_model_error(error: &ModelError) -> IaraErrorCode {
    tracing::debug!("FFI call failed: {error}");
    track_error(&DefaultIaraError::from(error))
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() -> IaraErrorCode {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = IaraErrorCode::Ok;
    });
    IaraErrorCode::Ok
}
