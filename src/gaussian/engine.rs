// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Squeezing, rotation and pure-loss transforms on a single-mode covariance.
//!
//! Squeezed vacuum at angle θ:
//!
//!   Σ(r, θ) = R(θ) · diag(e^{−2r}, e^{2r}) · R(θ)ᵀ · ½
//!
//! Pure loss (beamsplitter of transmissivity T mixing in vacuum):
//!
//!   Σ_out = T·Σ_in + (1 − T)·½·I,   μ_out = sqrt(T)·μ_in
//!
//! Ref: Weedbrook et al. (2012), "Gaussian quantum information",
//!   Rev. Mod. Phys. 84, 621. DOI: 10.1103/RevModPhys.84.621

use ndarray::{Array1, Array2};
use tracing::{debug, warn};

use super::eigen::wrap_half_turn;
use super::types::{
    squeezed_variance, ChannelSpec, EigenReport, QuantumState, Spectrum, VACUUM_VARIANCE,
};
use crate::error::Result;
use crate::validation::{normalize_phase, validate_non_negative};

/// Squeezing parameters above this are clipped; e^{2r} stays far from overflow.
pub const MAX_SQUEEZING_PARAMETER: f64 = 10.0;

/// Single-mode squeezed vacuum with squeezing `r` along angle `theta`.
///
/// `theta` is wrapped into [0, 2π).
///
/// # Errors
/// `InvalidParameter` if `r` is negative or either input is not finite.
pub fn squeezed_vacuum(r: f64, theta: f64) -> Result<QuantumState> {
    validate_non_negative("squeezing_parameter", r)?;
    let theta = normalize_phase(theta)?;

    let r = if r > MAX_SQUEEZING_PARAMETER {
        warn!(
            requested = r,
            clipped = MAX_SQUEEZING_PARAMETER,
            "Squeezing parameter above operating range, clipping"
        );
        MAX_SQUEEZING_PARAMETER
    } else {
        r
    };

    let spectrum = if r == 0.0 {
        Spectrum::isotropic(VACUUM_VARIANCE)
    } else {
        Spectrum {
            min_variance: squeezed_variance(r),
            max_variance: VACUUM_VARIANCE * (2.0 * r).exp(),
            angle: wrap_half_turn(theta),
        }
    };

    Ok(QuantumState::from_spectrum(Array1::zeros(2), spectrum))
}

/// Send a state through a pure-loss channel.
///
/// Exact for every T ∈ [0, 1]; T = 1 returns the input unchanged and
/// T = 0 returns the vacuum.
pub fn apply_loss(state: &QuantumState, channel: &ChannelSpec) -> QuantumState {
    let t = channel.transmissivity();
    if channel.is_lossless() {
        return state.clone();
    }

    let noise = (1.0 - t) * VACUUM_VARIANCE;
    let covariance = state.covariance() * t + &(Array2::<f64>::eye(2) * noise);
    let mean = state.mean() * t.sqrt();

    // Adding a multiple of the identity keeps the eigenvectors.
    let spectrum = state.spectrum();
    let spectrum = Spectrum {
        min_variance: mix_with_vacuum(spectrum.min_variance, t),
        max_variance: mix_with_vacuum(spectrum.max_variance, t),
        angle: if t == 0.0 { 0.0 } else { spectrum.angle },
    };

    QuantumState::from_raw(mean, covariance, spectrum)
}

/// T·λ + (1 − T)·½, kept between λ and ½ under round-off.
fn mix_with_vacuum(variance: f64, t: f64) -> f64 {
    let mixed = t * variance + (1.0 - t) * VACUUM_VARIANCE;
    mixed.clamp(variance.min(VACUUM_VARIANCE), variance.max(VACUUM_VARIANCE))
}

/// Build the output state for squeezing `r`, angle `theta` and `loss_db` of
/// propagation loss.
///
/// # Errors
/// `InvalidParameter` for negative `r`, negative `loss_db`, or non-finite
/// inputs.
pub fn build_state(r: f64, theta: f64, loss_db: f64) -> Result<QuantumState> {
    let channel = ChannelSpec::from_loss_db(loss_db)?;
    build_state_with_channel(r, theta, &channel)
}

/// Same as [`build_state`] with an explicit channel.
pub fn build_state_with_channel(r: f64, theta: f64, channel: &ChannelSpec) -> Result<QuantumState> {
    let squeezed = squeezed_vacuum(r, theta)?;
    let state = apply_loss(&squeezed, channel);
    debug!(
        r,
        theta,
        transmissivity = channel.transmissivity(),
        min_variance = state.spectrum().min_variance,
        max_variance = state.spectrum().max_variance,
        "Built Gaussian state"
    );
    Ok(state)
}

/// Eigenvalues of the state's covariance relative to the vacuum floor.
pub fn eigen_report(state: &QuantumState) -> EigenReport {
    EigenReport::from_spectrum(state.spectrum())
}

/// Invert `min_variance = ½·e^{−2r}` to recover the squeezing parameter of
/// a lossless squeezed vacuum.
pub fn recover_squeezing_parameter(report: &EigenReport) -> f64 {
    if report.min_variance <= 0.0 {
        return MAX_SQUEEZING_PARAMETER;
    }
    (-0.5 * (report.min_variance / VACUUM_VARIANCE).ln()).max(0.0)
}
