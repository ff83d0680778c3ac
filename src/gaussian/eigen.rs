// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Closed-form eigen-decomposition of real symmetric 2×2 matrices.
//!
//! For Σ = [[a, b], [b, d]]:
//!
//!   λ± = (a + d)/2 ± sqrt(((a − d)/2)² + b²)
//!
//! The small eigenvalue is taken as det Σ / λ₊ rather than λ₋ so that it
//! keeps its relative precision when λ₊ ≫ λ₋ (strong squeezing).

use std::f64::consts::{FRAC_PI_2, PI};

use ndarray::{array, Array2};

use super::types::Spectrum;
use crate::error::{Result, ValidationError};

/// Rotation matrix R(θ) = [[cos θ, −sin θ], [sin θ, cos θ]].
pub fn rotation(theta: f64) -> Array2<f64> {
    let (s, c) = theta.sin_cos();
    array![[c, -s], [s, c]]
}

/// Eigenvalues and squeezed-axis angle of a symmetric 2×2 matrix.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> Result<Spectrum> {
    if matrix.dim() != (2, 2) {
        return Err(ValidationError::Field {
            field: "covariance".into(),
            message: format!("must be 2 × 2, got {} × {}", matrix.nrows(), matrix.ncols()),
        }
        .into());
    }

    let a = matrix[[0, 0]];
    let d = matrix[[1, 1]];
    // Average the off-diagonal in case of round-off asymmetry
    let b = 0.5 * (matrix[[0, 1]] + matrix[[1, 0]]);

    let half_trace = 0.5 * (a + d);
    let radius = (0.5 * (a - d)).hypot(b);
    let max_variance = half_trace + radius;
    let det = a * d - b * b;
    let min_variance = if max_variance > 0.0 {
        (det / max_variance).clamp(0.0, max_variance)
    } else {
        0.0
    };

    // Major axis at ½·atan2(2b, a − d); the squeezed axis is orthogonal to it.
    let major = 0.5 * (2.0 * b).atan2(a - d);
    let angle = wrap_half_turn(major + FRAC_PI_2);

    Ok(Spectrum {
        min_variance,
        max_variance,
        angle,
    })
}

/// Rebuild Σ = R(angle)·diag(min, max)·R(angle)ᵀ from its spectrum.
pub fn compose(spectrum: &Spectrum) -> Array2<f64> {
    let lo = spectrum.min_variance;
    let hi = spectrum.max_variance;
    if lo == hi {
        // Rotation-invariant; skip sin²+cos² round-off
        return array![[lo, 0.0], [0.0, hi]];
    }
    let (s, c) = spectrum.angle.sin_cos();
    let off = (lo - hi) * c * s;
    array![
        [lo * c * c + hi * s * s, off],
        [off, lo * s * s + hi * c * c]
    ]
}

/// Map an axis direction into [0, π).
pub fn wrap_half_turn(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(PI);
    if wrapped >= PI {
        0.0
    } else {
        wrapped
    }
}
