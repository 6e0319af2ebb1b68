//! Non-blocking input checks
//!
//! The evaluators accept any finite input and fall back to zero risk when the
//! equations are undefined. Front ends still want to tell users when the
//! numbers they typed cannot describe a real exposure; these checks produce
//! those messages without ever stopping an evaluation.

use crate::core_types::units::MINUTES_PER_HOUR;
use crate::core_types::{ExposureScenario, PostDeparture};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Fewest people a shared-air assessment makes sense for
pub const MIN_OCCUPANTS: u32 = 2;

/// Shortest accepted presence entered in hours (a quarter hour)
pub const MIN_DURATION_HOURS: f64 = 0.25;

/// Shortest accepted presence entered in minutes
pub const MIN_DURATION_MINUTES: f64 = 1.0;

/// Longest accepted presence, in hours
pub const MAX_DURATION_HOURS: f64 = 24.0;

/// Time base of the durations stored in a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    #[default]
    Hours,
    Minutes,
}

impl TimeUnit {
    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
        }
    }

    pub fn minimum_duration(self) -> f64 {
        match self {
            TimeUnit::Hours => MIN_DURATION_HOURS,
            TimeUnit::Minutes => MIN_DURATION_MINUTES,
        }
    }

    pub fn maximum_duration(self) -> f64 {
        match self {
            TimeUnit::Hours => MAX_DURATION_HOURS,
            TimeUnit::Minutes => MAX_DURATION_HOURS * MINUTES_PER_HOUR,
        }
    }
}

/// Something about a scenario that makes its risk estimate meaningless
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScenarioWarning {
    NoInfectors,
    TooFewOccupants { occupants: u32 },
    InfectorsNotBelowOccupants { infectors: u32, occupants: u32 },
    NonPositiveBreathingRate,
    NonPositiveQuantaEmission,
    NonPositiveVentilation,
    NonPositiveVolume,
    PresenceTooShort { minimum: f64, unit: TimeUnit },
    PresenceTooLong { maximum: f64, unit: TimeUnit },
    RemainTooShort { minimum: f64, unit: TimeUnit },
}

impl fmt::Display for ScenarioWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioWarning::NoInfectors => write!(
                f,
                "There must be at least one infector for a valid risk assessment."
            ),
            ScenarioWarning::TooFewOccupants { occupants } => write!(
                f,
                "At least {MIN_OCCUPANTS} individuals must be present for a valid risk assessment (got {occupants})."
            ),
            ScenarioWarning::InfectorsNotBelowOccupants { .. } => write!(
                f,
                "The number of infectors must be less than the total number of individuals for a valid risk assessment."
            ),
            ScenarioWarning::NonPositiveBreathingRate => write!(
                f,
                "The Pulmonary Breathing Rate must be greater than 0 for a valid risk assessment."
            ),
            ScenarioWarning::NonPositiveQuantaEmission => write!(
                f,
                "The quanta emission rate must be greater than 0 for a valid risk assessment."
            ),
            ScenarioWarning::NonPositiveVentilation => write!(
                f,
                "The room ventilation rate must be greater than 0 for a valid risk assessment."
            ),
            ScenarioWarning::NonPositiveVolume => write!(
                f,
                "The room volume must be greater than 0 for a valid risk assessment."
            ),
            ScenarioWarning::PresenceTooShort { minimum, unit } => write!(
                f,
                "The infectors must be present for at least {minimum} {} for a valid risk assessment.",
                unit.label()
            ),
            ScenarioWarning::PresenceTooLong { maximum, unit } => write!(
                f,
                "The infectors can be present for at most {maximum} {} for a valid risk assessment.",
                unit.label()
            ),
            ScenarioWarning::RemainTooShort { minimum, unit } => write!(
                f,
                "The susceptibles must remain for at least {minimum} {} after the infectors leave.",
                unit.label()
            ),
        }
    }
}

/// False for zero, negatives and NaN
fn is_positive(value: f64) -> bool {
    value > 0.0
}

/// False for values below `minimum` and NaN
fn at_least(value: f64, minimum: f64) -> bool {
    value >= minimum
}

/// Checks shared by both models
fn check_common(
    total_occupants: u32,
    scenario: &ExposureScenario,
    unit: TimeUnit,
    warnings: &mut Vec<ScenarioWarning>,
) {
    if scenario.infector_count == 0 {
        warnings.push(ScenarioWarning::NoInfectors);
    }
    if total_occupants < MIN_OCCUPANTS {
        warnings.push(ScenarioWarning::TooFewOccupants {
            occupants: total_occupants,
        });
    }
    if scenario.infector_count >= total_occupants {
        warnings.push(ScenarioWarning::InfectorsNotBelowOccupants {
            infectors: scenario.infector_count,
            occupants: total_occupants,
        });
    }
    if !is_positive(scenario.breathing_rate) {
        warnings.push(ScenarioWarning::NonPositiveBreathingRate);
    }
    if !is_positive(scenario.quanta_emission_rate) {
        warnings.push(ScenarioWarning::NonPositiveQuantaEmission);
    }
    if !is_positive(scenario.ventilation_rate) {
        warnings.push(ScenarioWarning::NonPositiveVentilation);
    }

    let minimum = unit.minimum_duration();
    let maximum = unit.maximum_duration();
    if !at_least(scenario.presence_duration, minimum) {
        warnings.push(ScenarioWarning::PresenceTooShort { minimum, unit });
    } else if scenario.presence_duration > maximum {
        warnings.push(ScenarioWarning::PresenceTooLong { maximum, unit });
    }
}

/// Check a residual-risk scenario
///
/// `unit` is the time base of `presence_duration` and of the remain duration.
///
/// # Example
/// ```
/// use iara_core::validation::{check_scenario, ScenarioWarning, TimeUnit};
/// use iara_core::{ExposureScenario, PostDeparture};
///
/// let scenario = ExposureScenario {
///     infector_count: 3,
///     breathing_rate: 0.00775,
///     quanta_emission_rate: 0.045,
///     ventilation_rate: 5.0,
///     room_volume: 50.0,
///     presence_duration: 60.0,
/// };
/// let warnings = check_scenario(3, &scenario, PostDeparture::Indefinite, TimeUnit::Minutes);
/// assert!(matches!(warnings[..], [ScenarioWarning::InfectorsNotBelowOccupants { .. }]));
/// ```
pub fn check_scenario(
    total_occupants: u32,
    scenario: &ExposureScenario,
    post_departure: PostDeparture,
    unit: TimeUnit,
) -> Vec<ScenarioWarning> {
    let mut warnings = Vec::new();
    check_common(total_occupants, scenario, unit, &mut warnings);

    if !is_positive(scenario.room_volume) {
        warnings.push(ScenarioWarning::NonPositiveVolume);
    }
    if let Some(remain) = post_departure.duration() {
        let minimum = unit.minimum_duration();
        if !at_least(remain, minimum) {
            warnings.push(ScenarioWarning::RemainTooShort { minimum, unit });
        }
    }

    if !warnings.is_empty() {
        debug!(count = warnings.len(), "Residual scenario has warnings");
    }
    warnings
}

/// Check a Wells-Riley scenario
///
/// Room volume and remain duration play no part in the Wells-Riley equation and
/// are ignored.
pub fn check_wells_riley(
    total_occupants: u32,
    scenario: &ExposureScenario,
    unit: TimeUnit,
) -> Vec<ScenarioWarning> {
    let mut warnings = Vec::new();
    check_common(total_occupants, scenario, unit, &mut warnings);

    if !warnings.is_empty() {
        debug!(count = warnings.len(), "Wells-Riley scenario has warnings");
    }
    warnings
}
