use clap::{Args, Parser, Subcommand};
use iara_core::core_types::units::{
    AirChangesPerHour, CubicMeters, CubicMetersPerHour, Hours, LitresPerMinute, LitresPerSecond,
    Minutes, QuantaPerHour,
};
use iara_core::model::{
    compare_models, expected_new_infections, sensitivity_sweep, sweep_cumulative_risk,
    sweep_residual_risk, sweep_wells_riley, RiskBreakdown, TimeRange,
};
use iara_core::presets::{
    breathing_rate, masked_emission, ventilation_setting, AgeGroup, BreathingActivity, Disease,
    EmitterActivity, Mask, SettingCategory, DEFAULT_BREATHING_RATE,
};
use iara_core::validation::{check_scenario, check_wells_riley, ScenarioWarning, TimeUnit};
use iara_core::{ExposureScenario, ModelConfig, ModelError, PostDeparture, TimeSeries};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Indoor airborne infection risk assessment
#[derive(Parser, Debug)]
#[command(name = "iara")]
#[command(about = "Indoor airborne infection risk assessment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classical Wells-Riley estimate (steady-state concentration)
    WellsRiley {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Also print the curve with quanta emission scaled by the sensitivity multiplier
        #[arg(long)]
        sensitivity: bool,
    },
    /// Residual-risk model: build-up, decay and risk after the infectors leave
    Residual {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// How long susceptibles remain after the infectors leave (indefinitely if omitted)
        #[arg(long)]
        remain: Option<f64>,

        /// Plot the combined risk after departure instead of the post-departure risk
        #[arg(long)]
        cumulative: bool,
    },
    /// Print the preset tables
    Presets,
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Total number of people in the room
    #[arg(long, default_value_t = 10)]
    occupants: u32,

    /// Number of infectious people
    #[arg(short, long, default_value_t = 1)]
    infectors: u32,

    /// Age group of the susceptibles (adult, 15, 10, 5)
    #[arg(long, default_value = "adult")]
    age: AgeGroup,

    /// Susceptible activity (sleep, resting, light, heavy)
    #[arg(long, default_value = "resting")]
    activity: BreathingActivity,

    /// Custom breathing rate in L/min (overrides age and activity)
    #[arg(long)]
    breathing_lpm: Option<f64>,

    /// Disease (covid, flu, tb-treated, tb-untreated)
    #[arg(short, long, default_value = "covid")]
    disease: Disease,

    /// Infector activity (breathing, speaking, loud)
    #[arg(long, default_value = "speaking")]
    emitter: EmitterActivity,

    /// Custom quanta emission rate per infector in quanta/h (overrides disease, emitter and mask)
    #[arg(long)]
    quanta: Option<f64>,

    /// Mask worn by the infectors (kn95, r95, surgical, cloth, none)
    #[arg(long, default_value = "none")]
    mask: Mask,

    /// Ventilation preset setting, e.g. "Classrooms"
    #[arg(long, default_value = "Classrooms")]
    setting: String,

    /// Custom air changes per hour (overrides the setting)
    #[arg(long)]
    ach: Option<f64>,

    /// Custom ventilation rate in L/s (overrides ACH and setting)
    #[arg(long)]
    litres_per_second: Option<f64>,

    /// Custom ventilation rate in m³/h (overrides every other ventilation input)
    #[arg(long)]
    ventilation: Option<f64>,

    /// Room volume in m³
    #[arg(long)]
    volume: Option<f64>,

    /// Room volume as a number of small cars (8.65 m³ each), used when --volume is absent
    #[arg(long, default_value_t = 10)]
    small_cars: u32,

    /// Time the infectors are present
    #[arg(short = 't', long, default_value_t = 1.0)]
    duration: f64,

    /// Durations are given in minutes instead of hours
    #[arg(long)]
    minutes: bool,

    /// Print every n-th sample of the risk-over-time table
    #[arg(long, default_value_t = 6)]
    every: usize,
}

/// Scenario inputs resolved to per-hour SI units
struct ResolvedInputs {
    breathing_rate: CubicMetersPerHour,
    quanta_emission_rate: QuantaPerHour,
    ventilation_rate: CubicMetersPerHour,
    room_volume: CubicMeters,
    presence: Hours,
}

impl ScenarioArgs {
    fn unit(&self) -> TimeUnit {
        if self.minutes {
            TimeUnit::Minutes
        } else {
            TimeUnit::Hours
        }
    }

    fn to_hours(&self, value: f64) -> Hours {
        if self.minutes {
            Minutes::new(value).to_hours()
        } else {
            Hours::new(value)
        }
    }

    fn resolve(&self) -> Result<ResolvedInputs, ModelError> {
        let breathing_rate: CubicMetersPerHour = match self.breathing_lpm {
            Some(lpm) => LitresPerMinute::new(lpm).into(),
            None => breathing_rate(self.age, self.activity).unwrap_or_else(|| {
                warn!(
                    "No breathing rate for {} during {}, using {}",
                    self.age, self.activity, DEFAULT_BREATHING_RATE
                );
                DEFAULT_BREATHING_RATE
            }),
        };

        let quanta_emission_rate = match self.quanta {
            Some(q) => QuantaPerHour::new(q),
            None => masked_emission(self.disease, self.emitter, self.mask),
        };

        let room_volume = self
            .volume
            .map_or_else(
                || CubicMeters::from_small_cars(self.small_cars),
                CubicMeters::new,
            );

        let ventilation_rate = if let Some(m3h) = self.ventilation {
            CubicMetersPerHour::new(m3h)
        } else if let Some(lps) = self.litres_per_second {
            LitresPerSecond::new(lps).into()
        } else if let Some(ach) = self.ach {
            AirChangesPerHour::new(ach).ventilation_rate(room_volume)
        } else {
            ventilation_setting(&self.setting)?
                .ach
                .ventilation_rate(room_volume)
        };

        Ok(ResolvedInputs {
            breathing_rate,
            quanta_emission_rate,
            ventilation_rate,
            room_volume,
            presence: self.to_hours(self.duration),
        })
    }
}

fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

fn print_inputs(args: &ScenarioArgs, inputs: &ResolvedInputs) {
    println!(
        "Occupants: {}, infectors: {}",
        args.occupants, args.infectors
    );
    println!("Breathing rate: {:.3}", inputs.breathing_rate);
    println!(
        "Quanta emission: {:.3} ({}, mask: {})",
        inputs.quanta_emission_rate, args.disease, args.mask
    );
    println!("Ventilation: {:.1}", inputs.ventilation_rate);
    println!("Room volume: {:.2}", inputs.room_volume);
    println!("Presence: {:.2}\n", inputs.presence);
}

fn print_warnings(warnings: &[ScenarioWarning]) {
    for warning in warnings {
        println!("WARNING: {warning}");
    }
    if !warnings.is_empty() {
        println!();
    }
}

fn print_series(title: &str, time_label: &str, series: &TimeSeries, every: usize) {
    println!("{title}");
    println!("  {:>10}  {:>10}", time_label, "risk");
    let every = every.max(1);
    let last = series.len().saturating_sub(1);
    for (i, point) in series.iter().enumerate() {
        if i % every == 0 || i == last {
            println!("  {:>10.2}  {:>10}", point.time, percent(point.risk));
        }
    }
    println!();
}

fn run_wells_riley(
    args: &ScenarioArgs,
    sensitivity: bool,
    config: &ModelConfig,
) -> Result<(), ModelError> {
    let inputs = args.resolve()?;
    println!("=== Wells-Riley Risk Assessment ===\n");
    print_inputs(args, &inputs);

    let scenario = ExposureScenario {
        infector_count: args.infectors,
        breathing_rate: *inputs.breathing_rate,
        quanta_emission_rate: *inputs.quanta_emission_rate,
        ventilation_rate: *inputs.ventilation_rate,
        room_volume: *inputs.room_volume,
        presence_duration: *inputs.presence,
    };
    // Duration bounds are checked in the unit the user typed
    let entered = scenario.with_presence_duration(args.duration);
    print_warnings(&check_wells_riley(args.occupants, &entered, args.unit()));

    let probability = scenario.wells_riley();
    let susceptibles = scenario.susceptible_count(args.occupants);
    info!(probability, susceptibles, "Wells-Riley evaluated");

    println!("Probability of infection: {}", percent(probability));
    println!(
        "Expected new infections: {} of {} susceptible",
        expected_new_infections(susceptibles, probability),
        susceptibles
    );
    println!();

    let range = TimeRange::wells_riley(*inputs.presence, config)?;
    let series = sweep_wells_riley(
        scenario.infector_count,
        scenario.breathing_rate,
        scenario.quanta_emission_rate,
        scenario.ventilation_rate,
        &range,
    );
    print_series("Risk over time", "hours", &series, args.every);

    if sensitivity {
        let scaled = sensitivity_sweep(&scenario, config.sensitivity_multiplier, &range);
        print_series(
            &format!(
                "Sensitivity: quanta emission x{}",
                config.sensitivity_multiplier
            ),
            "hours",
            &scaled,
            args.every,
        );
    }
    Ok(())
}

fn run_residual(
    args: &ScenarioArgs,
    remain: Option<f64>,
    cumulative: bool,
    config: &ModelConfig,
) -> Result<(), ModelError> {
    let inputs = args.resolve()?;
    println!("=== Residual Risk Assessment ===\n");
    print_inputs(args, &inputs);

    // The residual equations run per minute
    let presence = inputs.presence.to_minutes();
    let post_departure = PostDeparture::from(remain.map(|t| *args.to_hours(t).to_minutes()));
    let scenario = ExposureScenario {
        infector_count: args.infectors,
        breathing_rate: inputs.breathing_rate.per_minute(),
        quanta_emission_rate: inputs.quanta_emission_rate.per_minute(),
        ventilation_rate: inputs.ventilation_rate.per_minute(),
        room_volume: *inputs.room_volume,
        presence_duration: *presence,
    };

    let entered = scenario.with_presence_duration(args.duration);
    let entered_post = PostDeparture::from(remain);
    print_warnings(&check_scenario(
        args.occupants,
        &entered,
        entered_post,
        args.unit(),
    ));

    let comparison = compare_models(&scenario, post_departure);
    let result = comparison.residual;
    info!(?result, "Residual risk evaluated");

    println!(
        "Risk whilst infectors present: {}",
        percent(result.during_presence)
    );
    if let Some(after) = result.after_departure {
        println!("Risk after infectors depart:   {}", percent(after));
    }
    if let Some(combined) = result.combined {
        println!("Total combined risk:           {}", percent(combined));
    }
    println!(
        "Risk when staying indefinitely: {}",
        percent(result.indefinite)
    );
    println!();

    if let Some(breakdown) = RiskBreakdown::from_result(&result) {
        println!(
            "Breakdown of combined risk: {:.1}% whilst present, {:.1}% after departure\n",
            breakdown.presence_percent, breakdown.departure_percent
        );
    }

    let susceptibles = scenario.susceptible_count(args.occupants);
    println!(
        "Traditional Wells-Riley: {}",
        percent(comparison.traditional)
    );
    println!("Residual model:          {}", percent(comparison.enhanced));
    println!(
        "Difference:              {}",
        percent(comparison.difference())
    );
    println!(
        "Expected new infections: {} (Wells-Riley) vs {} (residual) of {} susceptible\n",
        expected_new_infections(susceptibles, comparison.traditional),
        expected_new_infections(susceptibles, comparison.enhanced),
        susceptibles
    );

    let range = TimeRange::residual(*presence, post_departure, config)?;
    let series = if cumulative {
        sweep_cumulative_risk(&scenario, post_departure, &range)
    } else {
        sweep_residual_risk(&scenario, post_departure, &range)
    };
    print_series("Risk over time", "minutes", &series, args.every);
    Ok(())
}

fn print_presets() {
    println!("=== Breathing Rates (m³/h) ===");
    for age in AgeGroup::ALL {
        println!("{age}");
        for activity in BreathingActivity::ALL {
            match breathing_rate(age, activity) {
                Some(rate) => println!("  {:<36} {}", activity.name(), rate),
                None => println!("  {:<36} n/a", activity.name()),
            }
        }
    }

    println!("\n=== Quanta Emission Rates (quanta/h) ===");
    for disease in Disease::ALL {
        println!("{disease}");
        for activity in EmitterActivity::ALL {
            println!(
                "  {:<36} {}",
                activity.name(),
                masked_emission(disease, activity, Mask::NoMask)
            );
        }
    }

    println!("\n=== Masks ===");
    for mask in Mask::ALL {
        println!(
            "  {:<36} {:.0}% efficient",
            mask.name(),
            mask.efficiency_percent()
        );
    }

    println!("\n=== Recommended Ventilation (ACH) ===");
    for category in SettingCategory::ALL {
        println!("{category}");
        for setting in category.settings() {
            println!("  {:<40} {}", setting.name, setting.ach);
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ModelConfig::default();

    let outcome = match &cli.command {
        Command::WellsRiley {
            scenario,
            sensitivity,
        } => run_wells_riley(scenario, *sensitivity, &config),
        Command::Residual {
            scenario,
            remain,
            cumulative,
        } => run_residual(scenario, *remain, *cumulative, &config),
        Command::Presets => {
            print_presets();
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
