//! Indoor Airborne Risk Assessment Core Library
//!
//! Closed-form airborne infection risk models for shared indoor spaces.
//! Implements the classical Wells-Riley equation (steady-state quanta
//! concentration) and the Edwards residual-risk model, which follows the build-up
//! and decay of quanta in a well-mixed room and the risk to susceptibles who stay
//! after the infectors leave.
//!
//! ## Models
//!
//! - Wells-Riley infection probability and its risk-over-time sweep
//! - Residual risk: presence, post-departure, combined and indefinite exposure
//! - Derived outputs: expected new infections, risk breakdown, model comparison
//!
//! ## Inputs
//!
//! Unit newtypes convert user-facing units (L/min, L/s, ACH, hours) into the
//! single time base the equations need. Preset tables supply breathing rates,
//! quanta emission rates, mask efficiencies and ventilation rates.

// Core types and utilities
pub mod config;
pub mod core_types;
pub mod error;

// Risk models
pub mod model;

// Input layer support
pub mod presets;
pub mod validation;

// Memoization
pub mod cache;

// Re-export core types
pub use core_types::{ExposureScenario, PostDeparture, RiskResult, TimePoint, TimeSeries};

pub use cache::{CacheStats, ModelCache};
pub use config::ModelConfig;
pub use error::ModelError;
