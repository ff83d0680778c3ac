// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Observables derived from a Gaussian state.
//!
//! - [`wigner`]: phase-space quasi-probability on a grid
//! - [`photon`]: photon-number distribution of a squeezed vacuum
//! - [`variance`]: squeezed / anti-squeezed variances against shot noise

pub mod photon;
pub mod variance;
pub mod wigner;

pub use photon::{normalized, photon_number_pmf};
pub use variance::{noise_variance_curve, NoiseVariancePoint, QuadratureVariances};
pub use wigner::{wigner, wigner_grid, wigner_on, GridSpec, WignerGrid};
