// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for core parameters and caller-sized workloads.

use std::f64::consts::TAU;

use ndarray::Array2;

use crate::config::ResourceLimits;
use crate::error::{Error, Result, ValidationError};

/// Relative tolerance for covariance symmetry checks.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Reject NaN and infinite values.
pub fn validate_finite(parameter: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(Error::invalid(parameter, "must not be NaN"));
    }
    if value.is_infinite() {
        return Err(Error::invalid(parameter, format!("must be finite, got {value}")));
    }
    Ok(())
}

/// Reject non-finite and negative values.
pub fn validate_non_negative(parameter: &str, value: f64) -> Result<()> {
    validate_finite(parameter, value)?;
    if value < 0.0 {
        return Err(Error::invalid(parameter, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

/// Transmissivity must lie in [0, 1].
pub fn validate_transmissivity(transmissivity: f64) -> Result<()> {
    validate_finite("transmissivity", transmissivity)?;
    if !(0.0..=1.0).contains(&transmissivity) {
        return Err(Error::invalid(
            "transmissivity",
            format!("must be in [0, 1], got {transmissivity}"),
        ));
    }
    Ok(())
}

/// Wrap a finite phase into [0, 2π).
pub fn normalize_phase(theta: f64) -> Result<f64> {
    validate_finite("phase_rad", theta)?;
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    Ok(if wrapped >= TAU { 0.0 } else { wrapped })
}

/// Validate a Wigner grid resolution against the resource limits.
pub fn validate_grid_points(points: usize, limits: &ResourceLimits) -> Result<()> {
    if points < 2 {
        return Err(ValidationError::Field {
            field: "grid_points".into(),
            message: format!("must be at least 2, got {points}"),
        }
        .into());
    }
    if points > limits.max_grid_points {
        return Err(ValidationError::ResourceLimit {
            resource: "grid_points".into(),
            limit: limits.max_grid_points as u64,
            requested: points as u64,
        }
        .into());
    }
    Ok(())
}

/// Validate a photon-number cutoff against the resource limits.
pub fn validate_photon_cutoff(n_max: usize, limits: &ResourceLimits) -> Result<()> {
    if n_max == 0 {
        return Err(ValidationError::Field {
            field: "n_max".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }
    if n_max > limits.max_photon_number {
        return Err(ValidationError::ResourceLimit {
            resource: "n_max".into(),
            limit: limits.max_photon_number as u64,
            requested: n_max as u64,
        }
        .into());
    }
    Ok(())
}

/// Validate the number of time bins in a bus run.
pub fn validate_time_bins(count: usize, limits: &ResourceLimits) -> Result<()> {
    if count == 0 {
        return Err(ValidationError::Field {
            field: "num_bins".into(),
            message: "bus must have at least one time bin".into(),
        }
        .into());
    }
    if count > limits.max_time_bins {
        return Err(ValidationError::ResourceLimit {
            resource: "num_bins".into(),
            limit: limits.max_time_bins as u64,
            requested: count as u64,
        }
        .into());
    }
    Ok(())
}

/// Check that a matrix is a valid single-mode covariance: 2×2, finite,
/// symmetric and positive semi-definite.
pub fn validate_covariance(covariance: &Array2<f64>) -> Result<()> {
    if covariance.dim() != (2, 2) {
        return Err(ValidationError::Field {
            field: "covariance".into(),
            message: format!(
                "must be 2 × 2, got {} × {}",
                covariance.nrows(),
                covariance.ncols()
            ),
        }
        .into());
    }

    for ((i, j), val) in covariance.indexed_iter() {
        if !val.is_finite() {
            return Err(ValidationError::Field {
                field: "covariance".into(),
                message: format!("non-finite entry {val} at [{i}, {j}]"),
            }
            .into());
        }
    }

    let (a, b, c, d) = (
        covariance[[0, 0]],
        covariance[[0, 1]],
        covariance[[1, 0]],
        covariance[[1, 1]],
    );
    let scale = a.abs().max(d.abs()).max(1.0);
    if (b - c).abs() > SYMMETRY_TOLERANCE * scale {
        return Err(ValidationError::PhysicsConstraint(format!(
            "covariance is not symmetric: [0,1]={b}, [1,0]={c}"
        ))
        .into());
    }

    // A symmetric 2×2 matrix is PSD iff both diagonal entries and the
    // determinant are non-negative.
    let det = a * d - b * c;
    if a < 0.0 || d < 0.0 || det < -SYMMETRY_TOLERANCE * scale * scale {
        return Err(ValidationError::PhysicsConstraint(format!(
            "covariance is not positive semi-definite (diag = ({a}, {d}), det = {det})"
        ))
        .into());
    }

    Ok(())
}
