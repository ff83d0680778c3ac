// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pump-power to squeezing-parameter calibration.
//!
//! Parametric down-conversion in a χ⁽²⁾ waveguide gives a squeezing
//! parameter that scales with the pump field amplitude:
//!
//!   r = η · sqrt(P / mW)
//!
//! The coupling efficiency η stands in for the mode-overlap integral and
//! material nonlinearity; its default is a phenomenological placeholder
//! chosen so that 100 mW gives r ≈ 1. The intrinsic (pre-loss) squeezing is
//!
//!   S = −10·log10(e^{−2r}) = 20·r / ln 10   dB.

use serde::Serialize;
use std::f64::consts::LN_10;

use crate::error::{Error, Result};
use crate::gaussian::types::{squeezed_variance, squeezing_db};
use crate::validation::{validate_finite, validate_non_negative};

/// Placeholder coupling efficiency (100 mW → r = 1.0).
pub const DEFAULT_COUPLING_EFFICIENCY: f64 = 0.1;

/// Squeezing derived from pump power alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationResult {
    /// Pump power that produced this result, in mW.
    pub power_mw: f64,
    /// Squeezing parameter r ≥ 0.
    pub squeezing_parameter: f64,
    /// Pre-loss squeezing level in dB (≥ 0).
    pub intrinsic_squeezing_db: f64,
}

/// Maps pump power to a squeezing parameter for a fixed coupling efficiency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationMapping {
    coupling_efficiency: f64,
}

impl Default for CalibrationMapping {
    fn default() -> Self {
        Self {
            coupling_efficiency: DEFAULT_COUPLING_EFFICIENCY,
        }
    }
}

impl CalibrationMapping {
    /// Create a mapping with an explicit coupling efficiency η > 0.
    pub fn new(coupling_efficiency: f64) -> Result<Self> {
        validate_finite("coupling_efficiency", coupling_efficiency)?;
        if coupling_efficiency <= 0.0 {
            return Err(Error::invalid(
                "coupling_efficiency",
                format!("must be > 0, got {coupling_efficiency}"),
            ));
        }
        Ok(Self {
            coupling_efficiency,
        })
    }

    /// Coupling efficiency η.
    pub fn coupling_efficiency(&self) -> f64 {
        self.coupling_efficiency
    }

    /// Convert pump power (mW) to squeezing parameter and intrinsic squeezing.
    ///
    /// # Errors
    /// `InvalidParameter` if `power_mw` is negative or not finite.
    pub fn calibrate(&self, power_mw: f64) -> Result<CalibrationResult> {
        validate_non_negative("power_mw", power_mw)?;
        let r = self.coupling_efficiency * power_mw.sqrt();
        Ok(CalibrationResult {
            power_mw,
            squeezing_parameter: r,
            intrinsic_squeezing_db: intrinsic_squeezing_db(r),
        })
    }

    /// Calibration curve over a set of pump powers.
    pub fn curve(&self, powers_mw: &[f64]) -> Result<Vec<CalibrationResult>> {
        powers_mw.iter().map(|&p| self.calibrate(p)).collect()
    }
}

/// Calibrate with the default coupling efficiency.
pub fn calibrate(power_mw: f64) -> Result<CalibrationResult> {
    CalibrationMapping::default().calibrate(power_mw)
}

/// Squeezing level in dB for squeezing parameter `r`, before any loss.
///
/// Evaluated on ½·e^{−2r} with the same arithmetic as the observed level, so
/// a lossless state reports exactly this value. Falls back to 20·r / ln 10
/// once e^{−2r} underflows.
pub fn intrinsic_squeezing_db(r: f64) -> f64 {
    let variance = squeezed_variance(r);
    if variance > 0.0 {
        squeezing_db(variance)
    } else {
        20.0 * r / LN_10
    }
}

/// `points` evenly spaced pump powers from 0 to `max_power_mw` inclusive.
pub fn linspace_powers(max_power_mw: f64, points: usize) -> Result<Vec<f64>> {
    validate_non_negative("max_power_mw", max_power_mw)?;
    if points < 2 {
        return Err(Error::invalid(
            "points",
            format!("sweep needs at least 2 points, got {points}"),
        ));
    }
    let step = max_power_mw / (points - 1) as f64;
    Ok((0..points).map(|i| i as f64 * step).collect())
}
