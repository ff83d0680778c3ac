// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-mode Gaussian state types.
//!
//! Units: ħ = 1, so the vacuum has quadrature variance ½ in both x and p.

use ndarray::{Array1, Array2};
use serde::Serialize;

use super::eigen::{compose, symmetric_eigen};
use crate::error::{Error, Result, ValidationError};
use crate::validation::{
    validate_covariance, validate_finite, validate_non_negative, validate_transmissivity,
};

/// Quadrature variance of the vacuum (shot-noise limit).
pub const VACUUM_VARIANCE: f64 = 0.5;

/// Smallest principal variance accepted for strict inversion.
pub const DEGENERACY_EPSILON: f64 = 1e-12;

/// Principal-axis decomposition of a 2×2 covariance matrix.
///
/// Σ = R(angle) · diag(min_variance, max_variance) · R(angle)ᵀ
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spectrum {
    /// Variance along the squeezed axis.
    pub min_variance: f64,
    /// Variance along the anti-squeezed axis.
    pub max_variance: f64,
    /// Direction of the squeezed axis in phase space, in [0, π).
    pub angle: f64,
}

impl Spectrum {
    /// Isotropic spectrum with variance `v` on both axes.
    pub fn isotropic(v: f64) -> Self {
        Self {
            min_variance: v,
            max_variance: v,
            angle: 0.0,
        }
    }

    /// det Σ = λ_min · λ_max.
    pub fn determinant(&self) -> f64 {
        self.min_variance * self.max_variance
    }

    /// tr Σ = λ_min + λ_max.
    pub fn trace(&self) -> f64 {
        self.min_variance + self.max_variance
    }

    /// Reciprocal principal variances `(1/λ_min, 1/λ_max)`.
    ///
    /// # Errors
    /// `NumericalDegeneracy` when λ_min is below [`DEGENERACY_EPSILON`].
    pub fn inverse_variances(&self) -> Result<(f64, f64)> {
        if self.min_variance < DEGENERACY_EPSILON {
            return Err(Error::NumericalDegeneracy(format!(
                "smallest covariance eigenvalue {:.3e} is below {:.0e}",
                self.min_variance, DEGENERACY_EPSILON
            )));
        }
        Ok((1.0 / self.min_variance, 1.0 / self.max_variance))
    }

    /// Copy with both eigenvalues raised to at least `floor`.
    pub fn regularized(&self, floor: f64) -> Self {
        Self {
            min_variance: self.min_variance.max(floor),
            max_variance: self.max_variance.max(floor),
            angle: self.angle,
        }
    }
}

/// Single-mode Gaussian quantum state.
///
/// Immutable once constructed: every transform returns a new state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantumState {
    mean: Array1<f64>,
    covariance: Array2<f64>,
    spectrum: Spectrum,
}

impl QuantumState {
    /// The vacuum: zero mean, covariance diag(½, ½).
    pub fn vacuum() -> Self {
        Self::from_spectrum(Array1::zeros(2), Spectrum::isotropic(VACUUM_VARIANCE))
    }

    /// Build a state from an externally supplied mean and covariance.
    ///
    /// # Errors
    /// Validation errors if the mean is not a finite 2-vector or the
    /// covariance is not a symmetric PSD 2×2 matrix.
    pub fn from_parts(mean: Array1<f64>, covariance: Array2<f64>) -> Result<Self> {
        if mean.len() != 2 {
            return Err(ValidationError::Field {
                field: "mean".into(),
                message: format!("must have 2 entries (x, p), got {}", mean.len()),
            }
            .into());
        }
        for (i, val) in mean.iter().enumerate() {
            validate_finite(if i == 0 { "mean.x" } else { "mean.p" }, *val)?;
        }
        validate_covariance(&covariance)?;

        let spectrum = symmetric_eigen(&covariance)?;
        Ok(Self {
            mean,
            covariance,
            spectrum,
        })
    }

    /// Build a state whose covariance is defined by its spectrum.
    pub(crate) fn from_spectrum(mean: Array1<f64>, spectrum: Spectrum) -> Self {
        Self {
            mean,
            covariance: compose(&spectrum),
            spectrum,
        }
    }

    /// Build a state from a covariance already known together with its spectrum.
    pub(crate) fn from_raw(mean: Array1<f64>, covariance: Array2<f64>, spectrum: Spectrum) -> Self {
        Self {
            mean,
            covariance,
            spectrum,
        }
    }

    /// Quadrature means (x, p).
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// 2×2 quadrature covariance matrix.
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Principal-axis decomposition of the covariance.
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Variance of the x quadrature.
    pub fn var_x(&self) -> f64 {
        self.covariance[[0, 0]]
    }

    /// Variance of the p quadrature.
    pub fn var_p(&self) -> f64 {
        self.covariance[[1, 1]]
    }

    /// Determinant of the covariance.
    pub fn determinant(&self) -> f64 {
        self.spectrum.determinant()
    }

    /// Purity Tr(ρ²) = 1 / (2·sqrt(det Σ)); 1 for pure states.
    pub fn purity(&self) -> f64 {
        let det = self.determinant();
        if det <= 0.0 {
            return 1.0;
        }
        (1.0 / (2.0 * det.sqrt())).min(1.0)
    }

    /// Mean photon number ⟨n̂⟩ = (tr Σ + |μ|² − 1) / 2.
    ///
    /// Equals sinh²r for a lossless squeezed vacuum.
    pub fn mean_photon_number(&self) -> f64 {
        let displacement = self.mean.dot(&self.mean);
        ((self.spectrum.trace() + displacement - 2.0 * VACUUM_VARIANCE) / 2.0).max(0.0)
    }
}

/// Pure-loss channel, described by its transmissivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelSpec {
    transmissivity: f64,
}

impl ChannelSpec {
    /// T = 1.
    pub fn lossless() -> Self {
        Self { transmissivity: 1.0 }
    }

    /// Channel with the given transmissivity T ∈ [0, 1].
    pub fn from_transmissivity(transmissivity: f64) -> Result<Self> {
        validate_transmissivity(transmissivity)?;
        Ok(Self { transmissivity })
    }

    /// Channel from loss in dB: T = 10^(−loss_dB / 10).
    ///
    /// # Errors
    /// `InvalidParameter` if `loss_db` is negative or not finite.
    pub fn from_loss_db(loss_db: f64) -> Result<Self> {
        validate_non_negative("loss_db", loss_db)?;
        Ok(Self {
            transmissivity: 10f64.powf(-loss_db / 10.0),
        })
    }

    /// Channel from a propagation loss (dB/cm) over a waveguide length (mm).
    pub fn from_propagation(loss_db_per_cm: f64, length_mm: f64) -> Result<Self> {
        validate_non_negative("loss_db_per_cm", loss_db_per_cm)?;
        validate_non_negative("length_mm", length_mm)?;
        Self::from_loss_db(propagation_loss_db(loss_db_per_cm, length_mm))
    }

    /// Transmissivity T.
    pub fn transmissivity(&self) -> f64 {
        self.transmissivity
    }

    /// Loss in dB; infinite for T = 0.
    pub fn loss_db(&self) -> f64 {
        -10.0 * self.transmissivity.log10()
    }

    /// Whether the channel leaves states unchanged.
    pub fn is_lossless(&self) -> bool {
        self.transmissivity == 1.0
    }
}

impl Default for ChannelSpec {
    fn default() -> Self {
        Self::lossless()
    }
}

/// Eigenvalue summary of a covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EigenReport {
    /// Squeezed-quadrature variance (smaller eigenvalue).
    pub min_variance: f64,
    /// Anti-squeezed-quadrature variance (larger eigenvalue).
    pub max_variance: f64,
    /// −10·log10(min / ½), floored at 0 dB.
    pub observed_squeezing_db: f64,
    /// 10·log10(max / ½), floored at 0 dB.
    pub observed_antisqueezing_db: f64,
    /// Direction of the squeezed quadrature, in [0, π).
    pub squeezed_axis_angle: f64,
}

impl EigenReport {
    /// Summarize a spectrum relative to the vacuum.
    pub fn from_spectrum(spectrum: &Spectrum) -> Self {
        Self {
            min_variance: spectrum.min_variance,
            max_variance: spectrum.max_variance,
            observed_squeezing_db: squeezing_db(spectrum.min_variance),
            observed_antisqueezing_db: antisqueezing_db(spectrum.max_variance),
            squeezed_axis_angle: spectrum.angle,
        }
    }
}

/// Noise reduction below vacuum in dB; 0 when `variance` is not below ½.
pub fn squeezing_db(variance: f64) -> f64 {
    let ratio = variance / VACUUM_VARIANCE;
    if variance <= 0.0 || ratio >= 1.0 {
        return 0.0;
    }
    -10.0 * ratio.log10()
}

/// Noise excess above vacuum in dB; 0 when `variance` is not above ½.
pub fn antisqueezing_db(variance: f64) -> f64 {
    let ratio = variance / VACUUM_VARIANCE;
    if ratio <= 1.0 {
        return 0.0;
    }
    10.0 * ratio.log10()
}

/// Squeezed-quadrature variance ½·e^{−2r} of a lossless squeezed vacuum.
pub fn squeezed_variance(r: f64) -> f64 {
    VACUUM_VARIANCE * (-2.0 * r).exp()
}

/// Propagation loss in dB over a waveguide: dB/cm × length in cm.
pub fn propagation_loss_db(loss_db_per_cm: f64, length_mm: f64) -> f64 {
    loss_db_per_cm * (length_mm / 10.0)
}
