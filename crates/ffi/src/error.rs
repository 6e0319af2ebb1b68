use iara_core::ModelError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait IaraError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> IaraErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `IaraError` for common FFI error scenarios.
///
/// This struct wraps an `IaraErrorCode` and provides convenient constructors
/// for each error type (except Ok, which represents success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultIaraError {
    code: IaraErrorCode,
    msg: String,
}

impl DefaultIaraError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"scenario"`, `"out_result"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: IaraErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a caller-provided buffer that cannot hold the output.
    ///
    /// # Arguments
    /// * `required` - Number of elements the output needs
    /// * `capacity` - Number of elements the caller provided
    pub fn buffer_too_small(required: usize, capacity: usize) -> Self {
        Self {
            code: IaraErrorCode::BufferTooSmall,
            msg: format!("Output buffer holds {capacity} samples but {required} are required"),
        }
    }
}

impl From<&ModelError> for DefaultIaraError {
    fn from(error: &ModelError) -> Self {
        let code = match error {
            ModelError::ZeroDivision { .. } => IaraErrorCode::DegenerateParameters,
            ModelError::InvalidTimeRange { .. } | ModelError::UnknownPreset { .. } => {
                IaraErrorCode::InvalidParameter
            }
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl IaraError for DefaultIaraError {
    fn code(&self) -> IaraErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by risk model functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IaraErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Caller-provided output buffer is smaller than the result.
    BufferTooSmall = 2,

    /// Invalid parameter passed to function (e.g. a non-positive sweep resolution).
    InvalidParameter = 3,

    /// Ventilation rate or room volume is zero. The outputs were still written
    /// with the zero-risk fallback.
    DegenerateParameters = 4,
}

impl From<DefaultIaraError> for IaraErrorCode {
    fn from(error: DefaultIaraError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, IaraErrorCode)> = const { RefCell::new((None, IaraErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, IaraErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, IaraErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// double risk = 0.0;
/// if (iara_wells_riley(1, 0.465, 2.7, 1.0, 0.0, &risk) != IaraErrorCode::Ok) {
///     const char* error = iara_get_last_error();
///     if (error) {
///         printf("Risk evaluation: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn iara_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `IaraErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn iara_get_last_error_code() -> IaraErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
