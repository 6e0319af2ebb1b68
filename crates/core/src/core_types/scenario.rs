//! Value types exchanged with the model layer
//!
//! Scenarios are built once by the input-collection layer, handed to the
//! evaluators and discarded. Results are produced fresh by every evaluation.
//! All quantities share one time base chosen by the caller (the Wells-Riley
//! view works per hour, the residual-risk view per minute).

use serde::{Deserialize, Serialize};

/// Physical and epidemiological parameters of one exposure
///
/// The model only requires `infector_count >= 1`; keeping infectors below the
/// total occupancy is the caller's responsibility (see
/// [`check_scenario`](crate::validation::check_scenario)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureScenario {
    /// Number of infectious individuals present (I)
    pub infector_count: u32,
    /// Pulmonary breathing rate of a susceptible (p, volume/time)
    pub breathing_rate: f64,
    /// Quanta emission rate per infector (q, quanta/time)
    pub quanta_emission_rate: f64,
    /// Room ventilation rate (Q, volume/time)
    pub ventilation_rate: f64,
    /// Room volume (v)
    pub room_volume: f64,
    /// Time the infectors are present (T)
    pub presence_duration: f64,
}

impl ExposureScenario {
    /// Copy of this scenario with the quanta emission rate scaled by `factor`
    ///
    /// Used for the sensitivity curve.
    pub fn with_scaled_emission(&self, factor: f64) -> Self {
        ExposureScenario {
            quanta_emission_rate: self.quanta_emission_rate * factor,
            ..*self
        }
    }

    /// Copy of this scenario with a different presence duration
    pub fn with_presence_duration(&self, presence_duration: f64) -> Self {
        ExposureScenario {
            presence_duration,
            ..*self
        }
    }

    /// Number of susceptibles for a given total occupancy, never negative
    pub fn susceptible_count(&self, total_occupants: u32) -> u32 {
        total_occupants.saturating_sub(self.infector_count)
    }
}

/// How long susceptibles stay after the infectors leave
///
/// `Indefinite` evaluates only the presence and indefinite-exposure risks;
/// `FixedDuration` evaluates all four residual-risk quantities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PostDeparture {
    /// Susceptibles remain for the given time after departure (t)
    FixedDuration(f64),
    /// Susceptibles remain forever
    #[default]
    Indefinite,
}

impl PostDeparture {
    /// Remain duration, `None` when indefinite
    pub fn duration(&self) -> Option<f64> {
        match self {
            PostDeparture::FixedDuration(t) => Some(*t),
            PostDeparture::Indefinite => None,
        }
    }

    /// Whether this is the `Indefinite` mode
    pub fn is_indefinite(&self) -> bool {
        matches!(self, PostDeparture::Indefinite)
    }
}

impl From<Option<f64>> for PostDeparture {
    fn from(value: Option<f64>) -> Self {
        value.map_or(PostDeparture::Indefinite, PostDeparture::FixedDuration)
    }
}

/// Infection probabilities for a two-phase exposure
///
/// `after_departure` and `combined` are present exactly when the evaluation
/// used [`PostDeparture::FixedDuration`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskResult {
    /// Risk accumulated while infectors are present (P1)
    pub during_presence: f64,
    /// Risk accumulated after departure from lingering quanta (P2)
    pub after_departure: Option<f64>,
    /// Total risk across both phases (`P_comb`)
    pub combined: Option<f64>,
    /// Risk if susceptibles stay forever (`P_inf`)
    pub indefinite: f64,
}

impl RiskResult {
    /// Result reported when the equations are undefined
    pub const fn zero(post_departure: PostDeparture) -> Self {
        let extra = match post_departure {
            PostDeparture::FixedDuration(_) => Some(0.0),
            PostDeparture::Indefinite => None,
        };
        RiskResult {
            during_presence: 0.0,
            after_departure: extra,
            combined: extra,
            indefinite: 0.0,
        }
    }
}

/// One sample of a risk curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Offset from the start of the exposure
    pub time: f64,
    /// Infection probability at that offset
    pub risk: f64,
}

/// Ordered risk curve produced by a sweep
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimePoint> {
        self.points.iter()
    }

    /// Time offsets in order
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.time)
    }

    /// Risk values in order
    pub fn risks(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.risk)
    }

    /// Last sample, if any
    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    /// Highest risk on the curve (0 for an empty series)
    pub fn peak_risk(&self) -> f64 {
        self.risks().fold(0.0, f64::max)
    }
}

impl FromIterator<TimePoint> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = TimePoint>>(iter: I) -> Self {
        TimeSeries {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a TimePoint;
    type IntoIter = std::slice::Iter<'a, TimePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
