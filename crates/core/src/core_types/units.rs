//! Semantic unit types for the quantities users enter
//!
//! The model equations are unit-agnostic: they only need every rate, volume and
//! duration expressed against the same time base. Users however enter breathing
//! rates in L/min, ventilation in L/s or ACH and durations in hours or minutes.
//! These newtypes keep those inputs apart until they are converted explicitly.
//!
//! # Design Philosophy
//! - All quantities are f64; probabilities built from them go through `exp`
//! - Total ordering via `Ord` (NaN ordered after all values)
//! - Explicit conversion methods between related types
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use iara_core::core_types::units::{CubicMetersPerHour, LitresPerSecond, Hours};
//!
//! let supply = LitresPerSecond::new(10.0);
//! let rate: CubicMetersPerHour = supply.into();
//! assert!((*rate - 36.0).abs() < 1e-9);
//!
//! let per_minute = rate.per_minute();
//! assert!((per_minute - 0.6).abs() < 1e-9);
//! assert_eq!(*Hours::new(1.5).to_minutes(), 90.0);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Mul};

/// Minutes in an hour
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// L/min to m³/h (1 L/min = 0.06 m³/h)
const LITRES_PER_MINUTE_TO_M3H: f64 = 0.06;

/// L/s to m³/h (1 L/s = 3.6 m³/h)
const LITRES_PER_SECOND_TO_M3H: f64 = 3.6;

/// Generates a transparent f64 newtype with total ordering, `Deref`, `Display`
/// (value followed by `suffix`) and the basic arithmetic the models need.
macro_rules! unit_newtype {
    ($(#[$meta:meta])* $name:ident, $suffix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Wrap a raw value
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                $name(value)
            }

            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if let Some(precision) = f.precision() {
                    write!(f, "{:.*}{}", precision, self.0, $suffix)
                } else {
                    write!(f, "{}{}", self.0, $suffix)
                }
            }
        }
    };
}

// ============================================================================
// DURATIONS
// ============================================================================

unit_newtype!(
    /// Duration in hours
    Hours,
    " h"
);

unit_newtype!(
    /// Duration in minutes
    Minutes,
    " min"
);

impl Hours {
    /// Convert to minutes
    #[inline]
    #[must_use]
    pub fn to_minutes(self) -> Minutes {
        Minutes(self.0 * MINUTES_PER_HOUR)
    }
}

impl Minutes {
    /// Convert to hours
    #[inline]
    #[must_use]
    pub fn to_hours(self) -> Hours {
        Hours(self.0 / MINUTES_PER_HOUR)
    }
}

impl From<Hours> for Minutes {
    fn from(h: Hours) -> Minutes {
        h.to_minutes()
    }
}

impl From<Minutes> for Hours {
    fn from(m: Minutes) -> Hours {
        m.to_hours()
    }
}

// ============================================================================
// AIR FLOW
// ============================================================================

unit_newtype!(
    /// Volumetric flow in m³/h, the base unit for breathing and ventilation rates
    CubicMetersPerHour,
    " m³/h"
);

unit_newtype!(
    /// Volumetric flow in L/min (breathing rates are often quoted this way)
    LitresPerMinute,
    " L/min"
);

unit_newtype!(
    /// Volumetric flow in L/s (mechanical ventilation supply)
    LitresPerSecond,
    " L/s"
);

unit_newtype!(
    /// Ventilation expressed as air changes per hour
    AirChangesPerHour,
    " ACH"
);

unit_newtype!(
    /// Volume in m³
    CubicMeters,
    " m³"
);

impl CubicMetersPerHour {
    /// Same flow expressed per minute (m³/min), the time base of the residual model
    #[inline]
    #[must_use]
    pub fn per_minute(self) -> f64 {
        self.0 / MINUTES_PER_HOUR
    }
}

impl From<LitresPerMinute> for CubicMetersPerHour {
    fn from(v: LitresPerMinute) -> CubicMetersPerHour {
        CubicMetersPerHour(v.0 * LITRES_PER_MINUTE_TO_M3H)
    }
}

impl From<LitresPerSecond> for CubicMetersPerHour {
    fn from(v: LitresPerSecond) -> CubicMetersPerHour {
        CubicMetersPerHour(v.0 * LITRES_PER_SECOND_TO_M3H)
    }
}

impl AirChangesPerHour {
    /// Ventilation rate of a room of `volume` at this air change rate
    ///
    /// Q = ACH × V
    #[inline]
    #[must_use]
    pub fn ventilation_rate(self, volume: CubicMeters) -> CubicMetersPerHour {
        CubicMetersPerHour(self.0 * volume.0)
    }
}

impl CubicMeters {
    /// Volume of a FIAT 500, used as an intuitive room-size yardstick (m³)
    pub const SMALL_CAR: CubicMeters = CubicMeters(8.65);

    /// Box volume from room dimensions in metres
    #[inline]
    #[must_use]
    pub fn from_dimensions(length: f64, width: f64, height: f64) -> Self {
        CubicMeters(length * width * height)
    }

    /// Room volume estimated from the number of small cars that would fit inside,
    /// rounded to two decimals as shown to users
    #[must_use]
    pub fn from_small_cars(count: u32) -> Self {
        let raw = Self::SMALL_CAR.0 * f64::from(count);
        CubicMeters((raw * 100.0).round() / 100.0)
    }
}

// ============================================================================
// EMISSION
// ============================================================================

unit_newtype!(
    /// Quanta emission rate in quanta per hour
    QuantaPerHour,
    " quanta/h"
);

impl QuantaPerHour {
    /// Same rate expressed per minute
    #[inline]
    #[must_use]
    pub fn per_minute(self) -> f64 {
        self.0 / MINUTES_PER_HOUR
    }
}
