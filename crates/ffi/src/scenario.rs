use iara_core::{ExposureScenario, PostDeparture, RiskResult};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
/// FFI-friendly exposure scenario.
/// All rates and durations must share one time base (per hour or per minute).
/// Keep this layout stable for C/C++/C# consumers.
pub struct IaraScenario {
    /// Number of infectious individuals present.
    pub infector_count: u32,

    /// Pulmonary breathing rate of a susceptible (volume/time).
    pub breathing_rate: f64,

    /// Quanta emission rate per infector (quanta/time).
    pub quanta_emission_rate: f64,

    /// Room ventilation rate (volume/time).
    pub ventilation_rate: f64,

    /// Room volume. Unused by the Wells-Riley functions.
    pub room_volume: f64,

    /// Time the infectors are present (also the Wells-Riley exposure time).
    pub presence_duration: f64,
}

impl From<&IaraScenario> for ExposureScenario {
    fn from(s: &IaraScenario) -> Self {
        ExposureScenario {
            infector_count: s.infector_count,
            breathing_rate: s.breathing_rate,
            quanta_emission_rate: s.quanta_emission_rate,
            ventilation_rate: s.ventilation_rate,
            room_volume: s.room_volume,
            presence_duration: s.presence_duration,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
/// How long susceptibles stay after the infectors leave.
pub struct IaraPostDeparture {
    /// Susceptibles stay forever; `remain_duration` is ignored.
    pub indefinite: bool,

    /// Time susceptibles remain after departure, same time base as the scenario.
    pub remain_duration: f64,
}

impl From<IaraPostDeparture> for PostDeparture {
    fn from(post: IaraPostDeparture) -> Self {
        if post.indefinite {
            PostDeparture::Indefinite
        } else {
            PostDeparture::FixedDuration(post.remain_duration)
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// FFI-friendly residual-risk result.
/// `after_departure` and `combined` are only meaningful when their flags are set.
pub struct IaraRiskResult {
    /// Risk while the infectors are present.
    pub during_presence: f64,

    /// Whether `after_departure` holds a value.
    pub has_after_departure: bool,

    /// Risk from lingering quanta after the infectors leave.
    pub after_departure: f64,

    /// Whether `combined` holds a value.
    pub has_combined: bool,

    /// Total risk across both phases.
    pub combined: f64,

    /// Risk if susceptibles stay forever.
    pub indefinite: f64,
}

impl From<RiskResult> for IaraRiskResult {
    fn from(result: RiskResult) -> Self {
        Self {
            during_presence: result.during_presence,
            has_after_departure: result.after_departure.is_some(),
            after_departure: result.after_departure.unwrap_or(0.0),
            has_combined: result.combined.is_some(),
            combined: result.combined.unwrap_or(0.0),
            indefinite: result.indefinite,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
/// Sampling window `[0, end]` with nominal spacing `resolution`.
pub struct IaraTimeRange {
    pub end: f64,
    pub resolution: f64,
}

#[repr(C)]
#[derive(Debug)]
/// Caller-owned output buffers for a sweep.
///
/// `times` and `risks` must each point to at least `capacity` writable `f64`s.
/// On success `len` holds the number of samples written.
pub struct IaraSeries {
    pub times: *mut f64,
    pub risks: *mut f64,
    pub capacity: usize,
    pub len: usize,
}
