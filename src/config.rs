// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the optical bus.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. optical-bus.yaml file
//! 3. Environment variables (OPTICAL_BUS_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::calibration::DEFAULT_COUPLING_EFFICIENCY;
use crate::error::{Error, Result};
use crate::gaussian::types::{propagation_loss_db, ChannelSpec};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pump-to-squeezing calibration
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Propagation loss of the waveguide
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Default pump setting
    #[serde(default)]
    pub operating_point: OperatingPointConfig,

    /// Wigner-function grid
    #[serde(default)]
    pub wigner: WignerConfig,

    /// Photon-number distribution
    #[serde(default)]
    pub photon: PhotonConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &[
                "optical-bus.yaml",
                "optical-bus.yml",
                "/etc/optical-bus/config.yaml",
            ] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(val) = env_f64("OPTICAL_BUS_COUPLING_EFFICIENCY") {
            self.calibration.coupling_efficiency = val;
        }
        if let Some(val) = env_f64("OPTICAL_BUS_LOSS_DB_PER_CM") {
            self.channel.loss_db_per_cm = val;
        }
        if let Some(val) = env_f64("OPTICAL_BUS_WAVEGUIDE_LENGTH_MM") {
            self.channel.waveguide_length_mm = val;
        }
        if let Some(val) = env_f64("OPTICAL_BUS_POWER_MW") {
            self.operating_point.power_mw = val;
        }
        if let Some(val) = env_f64("OPTICAL_BUS_PHASE_RAD") {
            self.operating_point.phase_rad = val;
        }
        if let Ok(val) = env::var("OPTICAL_BUS_GRID_POINTS") {
            if let Ok(points) = val.parse() {
                self.wigner.grid_points = points;
            }
        }
        if let Ok(val) = env::var("OPTICAL_BUS_PHOTON_N_MAX") {
            if let Ok(n_max) = val.parse() {
                self.photon.n_max = n_max;
            }
        }
        if let Ok(val) = env::var("OPTICAL_BUS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("OPTICAL_BUS_LOG_FORMAT") {
            self.logging.format = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        let eta = self.calibration.coupling_efficiency;
        if !eta.is_finite() || eta <= 0.0 {
            return Err(Error::Config(format!(
                "coupling_efficiency must be finite and > 0, got {eta}"
            )));
        }
        if !self.channel.loss_db_per_cm.is_finite() || self.channel.loss_db_per_cm < 0.0 {
            return Err(Error::Config(format!(
                "loss_db_per_cm must be finite and >= 0, got {}",
                self.channel.loss_db_per_cm
            )));
        }
        if !self.channel.waveguide_length_mm.is_finite() || self.channel.waveguide_length_mm < 0.0
        {
            return Err(Error::Config(format!(
                "waveguide_length_mm must be finite and >= 0, got {}",
                self.channel.waveguide_length_mm
            )));
        }
        if !self.operating_point.power_mw.is_finite() || self.operating_point.power_mw < 0.0 {
            return Err(Error::Config(format!(
                "power_mw must be finite and >= 0, got {}",
                self.operating_point.power_mw
            )));
        }
        if !self.operating_point.phase_rad.is_finite() {
            return Err(Error::Config("phase_rad must be finite".into()));
        }
        if !self.wigner.grid_limit.is_finite() || self.wigner.grid_limit <= 0.0 {
            return Err(Error::Config(format!(
                "wigner grid_limit must be finite and > 0, got {}",
                self.wigner.grid_limit
            )));
        }
        let limits = &self.validation.limits;
        if limits.max_grid_points < 2 {
            return Err(Error::Config(format!(
                "max_grid_points must be at least 2, got {}",
                limits.max_grid_points
            )));
        }
        if limits.max_photon_number == 0 {
            return Err(Error::Config("max_photon_number must be > 0".into()));
        }
        if limits.max_time_bins == 0 {
            return Err(Error::Config("max_time_bins must be > 0".into()));
        }
        if self.wigner.grid_points < 2 || self.wigner.grid_points > limits.max_grid_points {
            return Err(Error::Config(format!(
                "wigner grid_points must be in [2, {}], got {}",
                limits.max_grid_points, self.wigner.grid_points
            )));
        }
        if self.photon.n_max == 0 || self.photon.n_max > limits.max_photon_number {
            return Err(Error::Config(format!(
                "photon n_max must be in [1, {}], got {}",
                limits.max_photon_number, self.photon.n_max
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(Error::Config(format!(
                "logging format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        if self.channel.total_loss_db() > 30.0 {
            tracing::warn!(
                total_loss_db = self.channel.total_loss_db(),
                "Channel loss above 30 dB; observed squeezing will be indistinguishable from vacuum"
            );
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|val| val.trim().parse().ok())
}

/// Calibration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Coupling efficiency η in r = η·sqrt(P / mW)
    #[serde(default = "default_coupling_efficiency")]
    pub coupling_efficiency: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            coupling_efficiency: default_coupling_efficiency(),
        }
    }
}

fn default_coupling_efficiency() -> f64 {
    DEFAULT_COUPLING_EFFICIENCY
}

/// Waveguide loss configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Propagation loss in dB/cm
    #[serde(default = "default_loss_db_per_cm")]
    pub loss_db_per_cm: f64,

    /// Waveguide length in millimetres
    #[serde(default = "default_waveguide_length_mm")]
    pub waveguide_length_mm: f64,
}

impl ChannelConfig {
    /// Total loss in dB over the waveguide length.
    pub fn total_loss_db(&self) -> f64 {
        propagation_loss_db(self.loss_db_per_cm, self.waveguide_length_mm)
    }

    /// Pure-loss channel of the configured waveguide.
    pub fn channel(&self) -> Result<ChannelSpec> {
        ChannelSpec::from_propagation(self.loss_db_per_cm, self.waveguide_length_mm)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            loss_db_per_cm: default_loss_db_per_cm(),
            waveguide_length_mm: default_waveguide_length_mm(),
        }
    }
}

fn default_loss_db_per_cm() -> f64 {
    0.1
}

fn default_waveguide_length_mm() -> f64 {
    5.0
}

/// Default pump setting used when the CLI does not override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingPointConfig {
    /// Pump power in mW
    #[serde(default = "default_power_mw")]
    pub power_mw: f64,

    /// Squeezing angle in radians
    #[serde(default)]
    pub phase_rad: f64,
}

impl Default for OperatingPointConfig {
    fn default() -> Self {
        Self {
            power_mw: default_power_mw(),
            phase_rad: 0.0,
        }
    }
}

fn default_power_mw() -> f64 {
    100.0
}

/// Wigner grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WignerConfig {
    /// Half-width of the square phase-space window
    #[serde(default = "default_grid_limit")]
    pub grid_limit: f64,

    /// Samples per axis
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,
}

impl Default for WignerConfig {
    fn default() -> Self {
        Self {
            grid_limit: default_grid_limit(),
            grid_points: default_grid_points(),
        }
    }
}

fn default_grid_limit() -> f64 {
    4.0
}

fn default_grid_points() -> usize {
    120
}

/// Photon-number distribution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotonConfig {
    /// Largest photon number reported
    #[serde(default = "default_n_max")]
    pub n_max: usize,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            n_max: default_n_max(),
        }
    }
}

fn default_n_max() -> usize {
    20
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Validation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Resource limits
    #[serde(default)]
    pub limits: ResourceLimits,
}

/// Resource limits bounding caller-controlled work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum Wigner samples per axis
    #[serde(default = "default_max_grid_points")]
    pub max_grid_points: usize,

    /// Maximum photon-number cutoff
    #[serde(default = "default_max_photon_number")]
    pub max_photon_number: usize,

    /// Maximum time bins per bus run
    #[serde(default = "default_max_time_bins")]
    pub max_time_bins: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_grid_points: default_max_grid_points(),
            max_photon_number: default_max_photon_number(),
            max_time_bins: default_max_time_bins(),
        }
    }
}

fn default_max_grid_points() -> usize {
    2000
}

fn default_max_photon_number() -> usize {
    500
}

fn default_max_time_bins() -> usize {
    64
}
