//! Property tests for the Wells-Riley and residual-risk models
//!
//! Random scenarios come from a seeded `StdRng`, so failures reproduce.
use approx::assert_relative_eq;
use iara_core::model::{
    compare_models, residual_risk, sweep_cumulative_risk, sweep_residual_risk, try_residual_risk,
    try_wells_riley, wells_riley, TimeRange,
};
use iara_core::{ExposureScenario, ModelConfig, ModelError, PostDeparture};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const SAMPLES: usize = 500;
const TOLERANCE: f64 = 1e-12;

/// Plausible per-minute scenario: a few infectors in a room of a few hundred m³
fn random_scenario(rng: &mut StdRng) -> ExposureScenario {
    ExposureScenario {
        infector_count: rng.random_range(1..10),
        breathing_rate: rng.random_range(0.001..0.05),
        quanta_emission_rate: rng.random_range(0.0005..1.0),
        ventilation_rate: rng.random_range(0.05..50.0),
        room_volume: rng.random_range(5.0..500.0),
        presence_duration: rng.random_range(1.0..600.0),
    }
}

fn in_unit_interval(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

#[test]
fn test_probabilities_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..SAMPLES {
        let s = random_scenario(&mut rng);
        let remain = rng.random_range(0.0..600.0);

        assert!(in_unit_interval(s.wells_riley()), "{s:?}");

        let result = s.residual_risk(PostDeparture::FixedDuration(remain));
        assert!(in_unit_interval(result.during_presence), "{s:?}");
        assert!(in_unit_interval(result.indefinite), "{s:?}");
        assert!(
            result.after_departure.is_some_and(in_unit_interval),
            "{s:?}"
        );
        assert!(result.combined.is_some_and(in_unit_interval), "{s:?}");
    }
}

#[test]
fn test_wells_riley_zero_exposure_is_zero_risk() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..SAMPLES {
        let s = random_scenario(&mut rng);
        let risk = wells_riley(
            s.infector_count,
            s.breathing_rate,
            s.quanta_emission_rate,
            0.0,
            s.ventilation_rate,
        );
        assert_eq!(risk, 0.0);
    }
}

#[test]
fn test_wells_riley_monotonicity() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..SAMPLES {
        let s = random_scenario(&mut rng);
        let base = s
            .with_presence_duration(s.presence_duration / 60.0)
            .wells_riley();
        let bump = rng.random_range(1.0..3.0);

        let mut more = s.with_presence_duration(s.presence_duration / 60.0);
        more.presence_duration *= bump;
        assert!(more.wells_riley() >= base, "longer exposure: {s:?}");

        let mut more = s.with_presence_duration(s.presence_duration / 60.0);
        more.infector_count += 1;
        assert!(more.wells_riley() >= base, "more infectors: {s:?}");

        let mut more = s.with_presence_duration(s.presence_duration / 60.0);
        more.breathing_rate *= bump;
        assert!(more.wells_riley() >= base, "faster breathing: {s:?}");

        let more = s
            .with_presence_duration(s.presence_duration / 60.0)
            .with_scaled_emission(bump);
        assert!(more.wells_riley() >= base, "higher emission: {s:?}");

        let mut less = s.with_presence_duration(s.presence_duration / 60.0);
        less.ventilation_rate *= bump;
        assert!(less.wells_riley() <= base, "more ventilation: {s:?}");
    }
}

#[test]
fn test_residual_result_shape() {
    let indefinite = residual_risk(2, 60.0, 0.00775, 0.05, 1.0, 50.0, PostDeparture::Indefinite);
    assert!(indefinite.after_departure.is_none());
    assert!(indefinite.combined.is_none());

    let fixed = residual_risk(
        2,
        60.0,
        0.00775,
        0.05,
        1.0,
        50.0,
        PostDeparture::FixedDuration(5.0),
    );
    assert!(fixed.after_departure.is_some());
    assert!(fixed.combined.is_some());
}

#[test]
fn test_indefinite_risk_dominates_presence_risk() {
    let s = ExposureScenario {
        infector_count: 2,
        breathing_rate: 0.00775,
        quanta_emission_rate: 0.05,
        ventilation_rate: 1.0,
        room_volume: 50.0,
        presence_duration: 60.0,
    };
    let result = s.residual_risk(PostDeparture::Indefinite);
    assert!(result.indefinite >= result.during_presence);

    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..SAMPLES {
        let s = random_scenario(&mut rng);
        let result = s.residual_risk(PostDeparture::Indefinite);
        assert!(
            result.indefinite >= result.during_presence - TOLERANCE,
            "{s:?}"
        );
    }
}

#[test]
fn test_survival_multiplies_across_phases() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..SAMPLES {
        let s = random_scenario(&mut rng);
        let remain = rng.random_range(0.0..600.0);
        let result = s.residual_risk(PostDeparture::FixedDuration(remain));
        let after = result.after_departure.unwrap();
        let combined = result.combined.unwrap();

        assert_relative_eq!(
            1.0 - combined,
            (1.0 - result.during_presence) * (1.0 - after),
            epsilon = 1e-9
        );
        assert!(combined >= result.during_presence - TOLERANCE);
        assert!(combined <= result.indefinite + TOLERANCE);
    }
}

#[test]
fn test_long_stay_limits() {
    let s = ExposureScenario {
        infector_count: 2,
        breathing_rate: 0.00775,
        quanta_emission_rate: 0.05,
        ventilation_rate: 5.0,
        room_volume: 50.0,
        presence_duration: 60.0,
    };
    // 10 days at r = Q/v = 0.1 per minute: every decay term has vanished
    let long = s.residual_risk(PostDeparture::FixedDuration(14_400.0));
    let longer = s.residual_risk(PostDeparture::FixedDuration(28_800.0));

    assert_relative_eq!(
        long.after_departure.unwrap(),
        longer.after_departure.unwrap(),
        epsilon = 1e-15
    );
    assert_relative_eq!(long.combined.unwrap(), long.indefinite, epsilon = 1e-12);
}

#[test]
fn test_combined_starts_at_presence_risk() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..SAMPLES {
        let s = random_scenario(&mut rng);
        let result = s.residual_risk(PostDeparture::FixedDuration(0.0));
        assert_relative_eq!(result.after_departure.unwrap(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(
            result.combined.unwrap(),
            result.during_presence,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_zero_division_fallback() {
    assert_eq!(wells_riley(1, 1.0, 1.0, 1.0, 0.0), 0.0);

    let result = residual_risk(
        1,
        1.0,
        1.0,
        1.0,
        0.0,
        1.0,
        PostDeparture::FixedDuration(1.0),
    );
    assert_eq!(result.during_presence, 0.0);
    assert_eq!(result.after_departure, Some(0.0));
    assert_eq!(result.combined, Some(0.0));
    assert_eq!(result.indefinite, 0.0);

    assert!(matches!(
        try_wells_riley(1, 1.0, 1.0, 1.0, 0.0),
        Err(ModelError::ZeroDivision { .. })
    ));
    assert!(matches!(
        try_residual_risk(1, 1.0, 1.0, 1.0, 1.0, 0.0, PostDeparture::Indefinite),
        Err(ModelError::ZeroDivision { .. })
    ));
}

#[test]
fn test_low_quanta_classroom_risk_is_small() {
    // Resting COVID-19 infector, one hour in 6 ACH for one small car of volume (per minute)
    let risk = wells_riley(1, 0.465 / 60.0, 0.55 / 60.0, 1.0, (6.0 * 8.65) / 60.0);
    assert!(risk > 0.0 && risk < 0.05, "risk = {risk}");
}

#[test]
fn test_residual_sweep_matches_point_evaluations() {
    let config = ModelConfig::default();
    let s = ExposureScenario {
        infector_count: 2,
        breathing_rate: 0.00775,
        quanta_emission_rate: 0.05,
        ventilation_rate: 1.0,
        room_volume: 50.0,
        presence_duration: 60.0,
    };
    let post = PostDeparture::FixedDuration(60.0);
    let range = TimeRange::residual(s.presence_duration, post, &config).unwrap();

    let series = sweep_residual_risk(&s, post, &range);
    let cumulative = sweep_cumulative_risk(&s, post, &range);
    assert_eq!(series.len(), 25);
    assert_eq!(cumulative.len(), 25);

    // Both curves agree during presence and end on the point results
    let at_departure = series.iter().position(|p| p.time == 60.0).unwrap();
    for i in 0..=at_departure {
        assert_eq!(series.points[i], cumulative.points[i]);
    }
    let full = s.residual_risk(post);
    assert_relative_eq!(
        series.last().unwrap().risk,
        full.after_departure.unwrap(),
        epsilon = 1e-15
    );
    assert_relative_eq!(
        cumulative.last().unwrap().risk,
        full.combined.unwrap(),
        epsilon = 1e-15
    );
}

#[test]
fn test_comparison_traditional_is_wells_riley() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..50 {
        let s = random_scenario(&mut rng);
        let comparison = compare_models(&s, PostDeparture::Indefinite);
        assert_eq!(comparison.traditional, s.wells_riley());
        // Indefinite exposure at constant emission is the Wells-Riley risk over T
        assert_relative_eq!(comparison.enhanced, comparison.traditional, epsilon = 1e-12);
    }
}
