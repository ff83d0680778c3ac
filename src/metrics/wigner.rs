// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Wigner function of a single-mode Gaussian state.
//!
//!   W(v) = exp(−½ (v − μ)ᵀ Σ⁻¹ (v − μ)) / (2π·sqrt(det Σ))
//!
//! The quadratic form is evaluated in the principal-axis frame of Σ, so the
//! inverse is just the reciprocal eigenvalues.

use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::gaussian::{QuantumState, DEGENERACY_EPSILON};
use crate::validation::validate_finite;

/// Square phase-space window [−limit, limit]² sampled with `points` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSpec {
    /// Half-width of the window in quadrature units.
    pub limit: f64,
    /// Samples per axis, at least 2.
    pub points: usize,
}

impl GridSpec {
    /// Create a grid, checking that it describes a non-empty window.
    pub fn new(limit: f64, points: usize) -> Result<Self> {
        validate_finite("grid_limit", limit)?;
        if limit <= 0.0 {
            return Err(Error::invalid("grid_limit", format!("must be > 0, got {limit}")));
        }
        if points < 2 {
            return Err(Error::invalid(
                "grid_points",
                format!("must be at least 2, got {points}"),
            ));
        }
        Ok(Self { limit, points })
    }

    /// Sample coordinates along one axis.
    pub fn axis(&self) -> Array1<f64> {
        Array1::linspace(-self.limit, self.limit, self.points)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            limit: 4.0,
            points: 120,
        }
    }
}

/// Wigner function sampled on a rectangular grid.
///
/// `values[[i, j]] = W(xvec[j], pvec[i])`: rows follow p, columns follow x.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WignerGrid {
    pub xvec: Array1<f64>,
    pub pvec: Array1<f64>,
    pub values: Array2<f64>,
}

impl WignerGrid {
    /// Largest sampled value.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Riemann-sum estimate of ∫∫ W dx dp over the sampled window.
    pub fn integral(&self) -> f64 {
        let dx = axis_step(&self.xvec);
        let dp = axis_step(&self.pvec);
        self.values.sum() * dx * dp
    }
}

fn axis_step(axis: &Array1<f64>) -> f64 {
    if axis.len() < 2 {
        return 0.0;
    }
    (axis[axis.len() - 1] - axis[0]) / (axis.len() - 1) as f64
}

/// Precomputed quadratic form and normalization for one state.
struct PhaseSpaceGaussian {
    mean_x: f64,
    mean_p: f64,
    cos: f64,
    sin: f64,
    inv_min: f64,
    inv_max: f64,
    norm: f64,
}

impl PhaseSpaceGaussian {
    fn new(state: &QuantumState) -> Self {
        let spectrum = match state.spectrum().inverse_variances() {
            Ok(_) => *state.spectrum(),
            Err(e) => {
                warn!(error = %e, "Regularizing near-singular covariance for Wigner evaluation");
                state.spectrum().regularized(DEGENERACY_EPSILON)
            }
        };
        let (sin, cos) = spectrum.angle.sin_cos();
        Self {
            mean_x: state.mean()[0],
            mean_p: state.mean()[1],
            cos,
            sin,
            inv_min: 1.0 / spectrum.min_variance,
            inv_max: 1.0 / spectrum.max_variance,
            norm: 1.0 / (2.0 * PI * spectrum.determinant().sqrt()),
        }
    }

    #[inline]
    fn eval(&self, x: f64, p: f64) -> f64 {
        let dx = x - self.mean_x;
        let dp = p - self.mean_p;
        // Coordinates along the squeezed and anti-squeezed axes
        let u = self.cos * dx + self.sin * dp;
        let w = -self.sin * dx + self.cos * dp;
        let q = u * u * self.inv_min + w * w * self.inv_max;
        self.norm * (-0.5 * q).exp()
    }
}

/// Wigner function of `state` at the phase-space point (x, p).
pub fn wigner(state: &QuantumState, x: f64, p: f64) -> f64 {
    PhaseSpaceGaussian::new(state).eval(x, p)
}

/// Wigner function on caller-supplied axes; rows follow `pvec`.
pub fn wigner_on(state: &QuantumState, xvec: &Array1<f64>, pvec: &Array1<f64>) -> Array2<f64> {
    let gaussian = PhaseSpaceGaussian::new(state);
    Array2::from_shape_fn((pvec.len(), xvec.len()), |(i, j)| {
        gaussian.eval(xvec[j], pvec[i])
    })
}

/// Wigner function on a square grid.
pub fn wigner_grid(state: &QuantumState, grid: &GridSpec) -> Result<WignerGrid> {
    let grid = GridSpec::new(grid.limit, grid.points)?;
    let axis = grid.axis();
    let values = wigner_on(state, &axis, &axis);
    Ok(WignerGrid {
        xvec: axis.clone(),
        pvec: axis,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian::{build_state, squeezed_vacuum};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;
    use std::f64::consts::FRAC_1_PI;

    #[test]
    fn test_vacuum_peak_is_one_over_pi() {
        let vac = QuantumState::vacuum();
        assert_relative_eq!(wigner(&vac, 0.0, 0.0), FRAC_1_PI, epsilon = 1e-14);
        // W(x, 0) = exp(−x²) / π for the vacuum
        assert_relative_eq!(wigner(&vac, 1.0, 0.0), (-1.0f64).exp() / PI, epsilon = 1e-14);
    }

    #[test]
    fn test_pure_states_share_peak_value() {
        for &r in &[0.3, 1.0, 2.0] {
            let state = squeezed_vacuum(r, 0.9).unwrap();
            assert_relative_eq!(wigner(&state, 0.0, 0.0), FRAC_1_PI, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_matches_direct_matrix_inverse() {
        let state = build_state(0.7, 0.4, 1.0).unwrap();
        let cov = state.covariance();
        let det = cov[[0, 0]] * cov[[1, 1]] - cov[[0, 1]] * cov[[1, 0]];
        let inv = array![[cov[[1, 1]], -cov[[0, 1]]], [-cov[[1, 0]], cov[[0, 0]]]] / det;
        for &(x, p) in &[(0.3, -0.2), (1.1, 0.8), (-2.0, 0.5)] {
            let v = array![x, p];
            let q = v.dot(&inv.dot(&v));
            let expected = (-0.5 * q).exp() / (2.0 * PI * det.sqrt());
            assert_relative_eq!(wigner(&state, x, p), expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_vacuum_grid_is_point_symmetric() {
        let grid = wigner_grid(&QuantumState::vacuum(), &GridSpec::new(4.0, 50).unwrap()).unwrap();
        let w = &grid.values;
        let n = w.nrows();
        for i in 0..n {
            for j in 0..n {
                assert_abs_diff_eq!(w[[i, j]], w[[n - 1 - i, n - 1 - j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_squeezed_grid_differs_from_vacuum() {
        let grid = GridSpec::new(4.0, 50).unwrap();
        let vac = wigner_grid(&QuantumState::vacuum(), &grid).unwrap();
        let sq = wigner_grid(&squeezed_vacuum(1.0, 0.0).unwrap(), &grid).unwrap();
        let max_diff = vac
            .values
            .iter()
            .zip(sq.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(max_diff > 1e-3);
    }

    #[test]
    fn test_grid_orientation_rows_follow_p() {
        // Squeezed in x (θ = 0): narrow along x, wide along p
        let state = squeezed_vacuum(1.0, 0.0).unwrap();
        let grid = wigner_grid(&state, &GridSpec::new(3.0, 61).unwrap()).unwrap();
        let centre = 30;
        // Moving 1.0 along p (rows) loses less than moving 1.0 along x (columns)
        let along_p = grid.values[[centre + 10, centre]];
        let along_x = grid.values[[centre, centre + 10]];
        assert!(along_p > along_x);
        assert_relative_eq!(grid.xvec[centre], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_integrates_to_one() {
        for state in [
            QuantumState::vacuum(),
            build_state(0.5, 1.2, 0.0).unwrap(),
            build_state(0.8, 0.3, 3.0).unwrap(),
        ] {
            let grid = wigner_grid(&state, &GridSpec::new(8.0, 321).unwrap()).unwrap();
            assert_relative_eq!(grid.integral(), 1.0, epsilon = 1e-6);
            assert!(grid.max_value() <= FRAC_1_PI + 1e-12);
        }
    }

    #[test]
    fn test_displaced_state_peaks_at_mean() {
        let state =
            QuantumState::from_parts(array![1.5, -0.5], array![[0.5, 0.0], [0.0, 0.5]]).unwrap();
        assert_relative_eq!(wigner(&state, 1.5, -0.5), FRAC_1_PI, epsilon = 1e-14);
        assert!(wigner(&state, 0.0, 0.0) < wigner(&state, 1.5, -0.5));
    }

    #[test]
    fn test_singular_covariance_is_regularized() {
        let state =
            QuantumState::from_parts(array![0.0, 0.0], array![[0.0, 0.0], [0.0, 1.0]]).unwrap();
        let grid = wigner_grid(&state, &GridSpec::new(2.0, 21).unwrap()).unwrap();
        assert!(grid.values.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(wigner(&state, 0.3, 0.3).is_finite());
    }

    #[test]
    fn test_far_field_underflows_to_zero() {
        let state = build_state(1.0, 0.0, 0.0).unwrap();
        assert_eq!(wigner(&state, 1e6, 1e6), 0.0);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let vac = QuantumState::vacuum();
        assert!(wigner_grid(&vac, &GridSpec { limit: 4.0, points: 1 }).is_err());
        assert!(wigner_grid(&vac, &GridSpec { limit: -1.0, points: 10 }).is_err());
        assert!(GridSpec::new(f64::NAN, 10).is_err());
    }

    #[test]
    fn test_wigner_on_custom_axes() {
        let vac = QuantumState::vacuum();
        let xvec = Array1::linspace(-1.0, 1.0, 5);
        let pvec = Array1::linspace(0.0, 2.0, 3);
        let values = wigner_on(&vac, &xvec, &pvec);
        assert_eq!(values.dim(), (3, 5));
        assert_relative_eq!(values[[0, 2]], FRAC_1_PI, epsilon = 1e-14);
    }
}
