// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Optical bus command-line front end
//!
//! Evaluates squeezed-light operating points and prints the results as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Full report for the configured operating point
//! optical-bus simulate
//!
//! # 200 mW pump, squeezing along p, 2 dB loss
//! optical-bus simulate --power-mw 200 --phase-rad 1.5708 --loss-db 2
//!
//! # Calibration and noise-variance sweep up to 500 mW
//! optical-bus sweep --max-power-mw 500 --points 26
//!
//! # Three independent time bins
//! optical-bus bus --powers 50,100,200 --phases 0,0.8,1.6
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quantum_optical_bus::{
    bus::QuantumBus,
    calibration::{linspace_powers, CalibrationMapping},
    config::Config,
    gaussian::ChannelSpec,
    metrics::{noise_variance_curve, GridSpec},
    report::{run_single_mode, OperatingPoint, ReportOptions},
    validation::validate_grid_points,
    Result, VERSION,
};

/// Quantum optical bus simulator
#[derive(Parser)]
#[command(name = "optical-bus")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Gaussian-state model of a squeezed-light optical bus")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "OPTICAL_BUS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one operating point and print the full report
    Simulate {
        /// Pump power in mW
        #[arg(long)]
        power_mw: Option<f64>,

        /// Squeezing angle in radians
        #[arg(long, allow_hyphen_values = true)]
        phase_rad: Option<f64>,

        /// Total propagation loss in dB (defaults to the configured waveguide)
        #[arg(long)]
        loss_db: Option<f64>,

        /// Photon-number cutoff
        #[arg(long)]
        n_max: Option<usize>,

        /// Skip the Wigner grid
        #[arg(long)]
        no_wigner: bool,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Map pump powers to squeezing parameters
    Calibrate {
        /// Pump powers in mW
        #[arg(required = true, value_delimiter = ',')]
        powers_mw: Vec<f64>,
    },

    /// Sweep pump power and report calibration and noise variances
    Sweep {
        /// Highest pump power in mW
        #[arg(long, default_value_t = 500.0)]
        max_power_mw: f64,

        /// Number of sweep points
        #[arg(long, default_value_t = 26)]
        points: usize,

        /// Total propagation loss in dB (defaults to the configured waveguide)
        #[arg(long)]
        loss_db: Option<f64>,
    },

    /// Run independent time bins through the bus
    Bus {
        /// Pump power per bin in mW
        #[arg(long, required = true, value_delimiter = ',')]
        powers: Vec<f64>,

        /// Squeezing angle per bin in radians
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        phases: Vec<f64>,

        /// Total propagation loss in dB (defaults to the configured waveguide)
        #[arg(long)]
        loss_db: Option<f64>,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

/// Wigner grid overrides.
#[derive(Args)]
struct GridArgs {
    /// Half-width of the phase-space window
    #[arg(long)]
    grid_limit: Option<f64>,

    /// Samples per axis
    #[arg(long)]
    grid_points: Option<usize>,
}

impl GridArgs {
    fn resolve(&self, config: &Config) -> Result<GridSpec> {
        let points = self.grid_points.unwrap_or(config.wigner.grid_points);
        validate_grid_points(points, &config.validation.limits)?;
        GridSpec::new(self.grid_limit.unwrap_or(config.wigner.grid_limit), points)
    }
}

#[derive(Serialize)]
struct SweepOutput {
    loss_db: f64,
    calibration: Vec<quantum_optical_bus::CalibrationResult>,
    noise_variance: Vec<quantum_optical_bus::metrics::NoiseVariancePoint>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(config.logging.level.as_str());
    init_logging(level, &config.logging.format);

    match cli.command {
        Commands::Simulate {
            power_mw,
            phase_rad,
            loss_db,
            n_max,
            no_wigner,
            grid,
        } => {
            config.validate()?;
            let mapping = CalibrationMapping::new(config.calibration.coupling_efficiency)?;

            let mut point = OperatingPoint::from_config(&config);
            if let Some(p) = power_mw {
                point.power_mw = p;
            }
            if let Some(theta) = phase_rad {
                point.phase_rad = theta;
            }
            if let Some(loss) = loss_db {
                point.loss_db = loss;
            }

            let mut options = ReportOptions::from_config(&config);
            if let Some(n) = n_max {
                options.n_max = n;
            }
            options.grid = if no_wigner {
                None
            } else {
                Some(grid.resolve(&config)?)
            };

            let report = run_single_mode(&mapping, &point, &options)?;
            print_json(&report)?;
        }

        Commands::Calibrate { powers_mw } => {
            let mapping = CalibrationMapping::new(config.calibration.coupling_efficiency)?;
            print_json(&mapping.curve(&powers_mw)?)?;
        }

        Commands::Sweep {
            max_power_mw,
            points,
            loss_db,
        } => {
            config.validate()?;
            let mapping = CalibrationMapping::new(config.calibration.coupling_efficiency)?;
            let channel = resolve_channel(loss_db, &config)?;
            let loss_db = channel.loss_db();
            let powers = linspace_powers(max_power_mw, points)?;

            info!(max_power_mw, points, loss_db, "Running power sweep");
            let output = SweepOutput {
                loss_db,
                calibration: mapping.curve(&powers)?,
                noise_variance: noise_variance_curve(&mapping, &channel, &powers)?,
            };
            print_json(&output)?;
        }

        Commands::Bus {
            powers,
            phases,
            loss_db,
            grid,
        } => {
            config.validate()?;
            let mapping = CalibrationMapping::new(config.calibration.coupling_efficiency)?;
            let bus = QuantumBus::new(powers.len(), mapping, &config.validation.limits)?;
            let channel = resolve_channel(loss_db, &config)?;
            let bins = bus.run(&powers, &phases, &channel, &grid.resolve(&config)?)?;
            print_json(&bins)?;
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Explicit loss in dB, or the configured waveguide.
fn resolve_channel(loss_db: Option<f64>, config: &Config) -> Result<ChannelSpec> {
    match loss_db {
        Some(db) => ChannelSpec::from_loss_db(db),
        None => config.channel.channel(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging with tracing. Logs go to stderr so stdout stays JSON.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
