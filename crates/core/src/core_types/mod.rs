//! Core types and utilities

pub mod scenario;
pub mod units;

pub use scenario::*;
pub use units::*;
