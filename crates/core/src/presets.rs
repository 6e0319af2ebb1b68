//! Default parameter tables
//!
//! Static lookup data used by the input layer to fill in breathing rates,
//! quanta emission rates, mask multipliers and ventilation rates when users do
//! not enter their own values. No logic beyond table lookup lives here.
//!
//! # References
//! - ICRP (2002). "Guide for the Practical Application of the ICRP Human Respiratory
//!   Tract Model." ICRP Supporting Guidance 3, Annals of the ICRP 32(1-2).
//! - Mikszewski, A., Stabile, L., Buonanno, G., Morawska, L. (2022). "The airborne
//!   contagiousness of respiratory viruses: A comparative analysis and implications
//!   for mitigation." Geoscience Frontiers, 13(6).
//! - Shah, Y., Kurelek, J.W., Peterson, S.D., Yarusevych, S. (2021). "Experimental
//!   investigation of indoor aerosol dispersion and accumulation in the context of
//!   COVID-19: Effects of masks and ventilation." Physics of Fluids, 33(7).
//! - Recommended air changes per hour by setting (AXAIR, December 2021).

use crate::core_types::units::{AirChangesPerHour, CubicMetersPerHour, QuantaPerHour};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Breathing rate of an adult at rest, used when nothing else is chosen
pub const DEFAULT_BREATHING_RATE: CubicMetersPerHour = CubicMetersPerHour::new(0.465);

/// Lowercase alphanumeric form used for forgiving name matching
fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the entry of `all` whose display name or alias matches `input`
fn lookup<T: Copy>(
    table: &'static str,
    input: &str,
    all: &[T],
    names: impl Fn(T) -> &'static [&'static str],
) -> Result<T, ModelError> {
    let wanted = normalize(input);
    all.iter()
        .copied()
        .find(|&item| names(item).iter().any(|n| normalize(n) == wanted))
        .ok_or_else(|| ModelError::unknown_preset(table, input))
}

// ============================================================================
// BREATHING RATE
// ============================================================================

/// Age group of the susceptible population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Adult,
    FifteenYearsOld,
    TenYearsOld,
    FiveYearsOld,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Adult,
        AgeGroup::FifteenYearsOld,
        AgeGroup::TenYearsOld,
        AgeGroup::FiveYearsOld,
    ];

    fn names(self) -> &'static [&'static str] {
        match self {
            AgeGroup::Adult => &["Adult"],
            AgeGroup::FifteenYearsOld => &["15 Years Old", "15"],
            AgeGroup::TenYearsOld => &["10 Years Old", "10"],
            AgeGroup::FiveYearsOld => &["5 Years Old", "5"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }
}

/// What the susceptible population is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreathingActivity {
    Sleep,
    Resting,
    LightActivity,
    HeavyActivity,
}

impl BreathingActivity {
    pub const ALL: [BreathingActivity; 4] = [
        BreathingActivity::Sleep,
        BreathingActivity::Resting,
        BreathingActivity::LightActivity,
        BreathingActivity::HeavyActivity,
    ];

    fn names(self) -> &'static [&'static str] {
        match self {
            BreathingActivity::Sleep => &["Sleep"],
            BreathingActivity::Resting => &["Sitting/Resting", "resting", "sitting"],
            BreathingActivity::LightActivity => &[
                "Light activity (Standing/Walking)",
                "light",
                "standing",
                "walking",
            ],
            BreathingActivity::HeavyActivity => &[
                "Heavy activity (Exercise/Sports)",
                "heavy",
                "exercise",
                "sports",
            ],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }
}

/// Pulmonary breathing rate for an age group and activity (m³/h)
///
/// Returns `None` for heavy activity in five-year-olds, which the source data
/// does not cover.
///
/// # Example
/// ```
/// use iara_core::presets::{breathing_rate, AgeGroup, BreathingActivity, DEFAULT_BREATHING_RATE};
///
/// assert_eq!(breathing_rate(AgeGroup::Adult, BreathingActivity::Resting), Some(DEFAULT_BREATHING_RATE));
/// assert_eq!(breathing_rate(AgeGroup::FiveYearsOld, BreathingActivity::HeavyActivity), None);
/// ```
pub fn breathing_rate(age: AgeGroup, activity: BreathingActivity) -> Option<CubicMetersPerHour> {
    BREATHING_RATES[age as usize][activity as usize].map(CubicMetersPerHour::new)
}

/// Rows follow [`AgeGroup::ALL`], columns follow [`BreathingActivity::ALL`]
const BREATHING_RATES: [[Option<f64>; 4]; 4] = [
    [Some(0.385), Some(0.465), Some(1.375), Some(2.85)],
    [Some(0.385), Some(0.44), Some(1.34), Some(2.745)],
    [Some(0.31), Some(0.38), Some(1.12), Some(2.03)],
    [Some(0.24), Some(0.32), Some(0.57), None],
];

// ============================================================================
// QUANTA EMISSION
// ============================================================================

/// Disease being modelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disease {
    Covid19,
    Influenza,
    TuberculosisTreated,
    TuberculosisUntreated,
}

impl Disease {
    pub const ALL: [Disease; 4] = [
        Disease::Covid19,
        Disease::Influenza,
        Disease::TuberculosisTreated,
        Disease::TuberculosisUntreated,
    ];

    fn names(self) -> &'static [&'static str] {
        match self {
            Disease::Covid19 => &["SARS-CoV-2/COVID-19", "covid", "covid19", "sarscov2"],
            Disease::Influenza => &["Influenza", "flu"],
            Disease::TuberculosisTreated => &["TB (On Treatment)", "tb-treated"],
            Disease::TuberculosisUntreated => &["TB (Untreated)", "tb-untreated", "tb"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }
}

/// What the infectors are doing; drives how many quanta they emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmitterActivity {
    OralBreathing,
    Speaking,
    LoudSpeaking,
}

impl EmitterActivity {
    pub const ALL: [EmitterActivity; 3] = [
        EmitterActivity::OralBreathing,
        EmitterActivity::Speaking,
        EmitterActivity::LoudSpeaking,
    ];

    fn names(self) -> &'static [&'static str] {
        match self {
            EmitterActivity::OralBreathing => &["Resting/Oral Breathing", "resting", "breathing"],
            EmitterActivity::Speaking => &["Standing/Speaking", "speaking", "standing"],
            EmitterActivity::LoudSpeaking => &[
                "Light Activity/Speaking Loudly",
                "loud",
                "light",
                "shouting",
            ],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }
}

/// Quanta emission rate of one unmasked infector (quanta/h)
pub fn quanta_emission(disease: Disease, activity: EmitterActivity) -> QuantaPerHour {
    QuantaPerHour::new(QUANTA_EMISSION_RATES[disease as usize][activity as usize])
}

/// Rows follow [`Disease::ALL`], columns follow [`EmitterActivity::ALL`]
const QUANTA_EMISSION_RATES: [[f64; 3]; 4] = [
    [0.55, 2.7, 46.0],
    [0.035, 0.17, 3.0],
    [0.020, 0.098, 1.7],
    [0.62, 3.1, 52.0],
];

/// Face covering worn by the infectors
///
/// Efficiencies were measured for SARS-CoV-2 and are assumed to carry over to
/// other airborne diseases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mask {
    Kn95,
    R95,
    Surgical,
    Cloth,
    #[default]
    NoMask,
}

impl Mask {
    pub const ALL: [Mask; 5] = [
        Mask::Kn95,
        Mask::R95,
        Mask::Surgical,
        Mask::Cloth,
        Mask::NoMask,
    ];

    fn names(self) -> &'static [&'static str] {
        match self {
            Mask::Kn95 => &["KN95"],
            Mask::R95 => &["R95"],
            Mask::Surgical => &["Blue surgical mask", "surgical"],
            Mask::Cloth => &["Cloth mask", "cloth"],
            Mask::NoMask => &["No mask", "none"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    /// Fraction of emitted quanta that still escapes the mask
    pub fn emission_multiplier(self) -> f64 {
        match self {
            Mask::Kn95 => 0.05,
            Mask::R95 => 0.04,
            Mask::Surgical => 0.53,
            Mask::Cloth => 0.6,
            Mask::NoMask => 1.0,
        }
    }

    /// Filtration efficiency in percent
    pub fn efficiency_percent(self) -> f64 {
        (1.0 - self.emission_multiplier()) * 100.0
    }
}

/// Quanta emission rate of one infector wearing `mask` (quanta/h)
///
/// # Example
/// ```
/// use iara_core::presets::{masked_emission, Disease, EmitterActivity, Mask};
///
/// let q = masked_emission(Disease::Covid19, EmitterActivity::Speaking, Mask::Surgical);
/// assert!((*q - 2.7 * 0.53).abs() < 1e-12);
/// ```
pub fn masked_emission(disease: Disease, activity: EmitterActivity, mask: Mask) -> QuantaPerHour {
    quanta_emission(disease, activity) * mask.emission_multiplier()
}

// ============================================================================
// VENTILATION
// ============================================================================

/// Broad category of indoor setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingCategory {
    Education,
    Healthcare,
    Hospitality,
    Commercial,
    Recreational,
    IndustrialTechnical,
}

impl SettingCategory {
    pub const ALL: [SettingCategory; 6] = [
        SettingCategory::Education,
        SettingCategory::Healthcare,
        SettingCategory::Hospitality,
        SettingCategory::Commercial,
        SettingCategory::Recreational,
        SettingCategory::IndustrialTechnical,
    ];

    fn names(self) -> &'static [&'static str] {
        match self {
            SettingCategory::Education => &["Education"],
            SettingCategory::Healthcare => &["Healthcare"],
            SettingCategory::Hospitality => &["Hospitality"],
            SettingCategory::Commercial => &["Commercial"],
            SettingCategory::Recreational => &["Recreational"],
            SettingCategory::IndustrialTechnical => &["Industrial/Technical", "industrial"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    /// Settings belonging to this category, in table order
    pub fn settings(self) -> impl Iterator<Item = &'static VentilationSetting> {
        VENTILATION_SETTINGS
            .iter()
            .filter(move |setting| setting.category == self)
    }
}

/// Minimum recommended air change rate for one kind of room
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VentilationSetting {
    pub category: SettingCategory,
    pub name: &'static str,
    pub ach: AirChangesPerHour,
}

use SettingCategory::{
    Commercial, Education, Healthcare, Hospitality, IndustrialTechnical, Recreational,
};

const fn setting(category: SettingCategory, name: &'static str, ach: f64) -> VentilationSetting {
    VentilationSetting {
        category,
        name,
        ach: AirChangesPerHour::new(ach),
    }
}

/// Recommended minimum ACH by setting
pub const VENTILATION_SETTINGS: &[VentilationSetting] = &[
    setting(Education, "Assembly Halls", 4.0),
    setting(Education, "Classrooms", 6.0),
    setting(Education, "Computer Rooms", 15.0),
    setting(Healthcare, "Dental Centres", 8.0),
    setting(Healthcare, "Pharmacies", 6.0),
    setting(Healthcare, "Hospital Rooms (Sterilising)", 15.0),
    setting(Healthcare, "Hospital Rooms (Wards)", 6.0),
    setting(Healthcare, "Hospital Rooms (X-Ray)", 10.0),
    setting(Healthcare, "Medical Centres", 8.0),
    setting(Healthcare, "Medical Clinics", 8.0),
    setting(Healthcare, "Medical Offices", 8.0),
    setting(Hospitality, "Bars", 20.0),
    setting(Hospitality, "Cafeterias", 12.0),
    setting(Hospitality, "Cocktail Lounges", 20.0),
    setting(Hospitality, "Lunch Rooms", 12.0),
    setting(Hospitality, "Nightclubs", 20.0),
    setting(Hospitality, "Restaurants (Dining Area)", 8.0),
    setting(Hospitality, "Restaurants (Food Staging)", 10.0),
    setting(Hospitality, "Restaurants (Kitchens)", 30.0),
    setting(Hospitality, "Restaurants (Bars)", 15.0),
    setting(Hospitality, "Tavern", 20.0),
    setting(Commercial, "Banks", 4.0),
    setting(Commercial, "Court Houses", 4.0),
    setting(Commercial, "Conference Rooms", 8.0),
    setting(Commercial, "Fire Stations", 4.0),
    setting(Commercial, "Offices (Public)", 3.0),
    setting(Commercial, "Offices (Business)", 6.0),
    setting(Commercial, "Office Lunch Rooms", 7.0),
    setting(Commercial, "Police Stations", 4.0),
    setting(Commercial, "Post Offices", 4.0),
    setting(Commercial, "Retail", 6.0),
    setting(Commercial, "Shopping Centres", 6.0),
    setting(Commercial, "Supermarkets", 4.0),
    setting(Recreational, "Auditoriums", 12.0),
    setting(Recreational, "Bowling Alleys", 10.0),
    setting(Recreational, "Clubhouses", 20.0),
    setting(Recreational, "Dance Halls", 6.0),
    setting(Recreational, "Gyms", 6.0),
    setting(Recreational, "Museums", 12.0),
    setting(Recreational, "Swimming Pools", 20.0),
    setting(Recreational, "Theatres", 8.0),
    setting(IndustrialTechnical, "Factory Buildings", 2.0),
    setting(
        IndustrialTechnical,
        "Factory Buildings with Fumes/Moisture",
        10.0,
    ),
    setting(IndustrialTechnical, "Laboratories", 6.0),
    setting(IndustrialTechnical, "Pig Houses", 6.0),
    setting(IndustrialTechnical, "Poultry Houses", 6.0),
    setting(IndustrialTechnical, "Warehouses", 6.0),
];

/// Look up a ventilation setting by name (case and punctuation insensitive)
///
/// # Errors
/// Returns [`ModelError::UnknownPreset`] if no setting matches.
///
/// # Example
/// ```
/// use iara_core::presets::ventilation_setting;
///
/// let classroom = ventilation_setting("classrooms").unwrap();
/// assert_eq!(*classroom.ach, 6.0);
/// assert!(ventilation_setting("spaceship").is_err());
/// ```
pub fn ventilation_setting(name: &str) -> Result<&'static VentilationSetting, ModelError> {
    let wanted = normalize(name);
    VENTILATION_SETTINGS
        .iter()
        .find(|s| normalize(s.name) == wanted)
        .ok_or_else(|| ModelError::unknown_preset("ventilation setting", name))
}

// ============================================================================
// NAME PARSING
// ============================================================================

macro_rules! preset_from_str {
    ($ty:ident, $table:literal) => {
        impl FromStr for $ty {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                lookup($table, s, &$ty::ALL, $ty::names)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

preset_from_str!(AgeGroup, "age group");
preset_from_str!(BreathingActivity, "breathing activity");
preset_from_str!(Disease, "disease");
preset_from_str!(EmitterActivity, "emitter activity");
preset_from_str!(Mask, "mask");
preset_from_str!(SettingCategory, "setting category");
