// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-mode Gaussian state engine.
//!
//! A Gaussian state of one optical mode is fully described by its quadrature
//! mean μ = (⟨x⟩, ⟨p⟩) and 2×2 covariance Σ. This module provides:
//! - Squeezed-vacuum construction at squeezing parameter r and angle θ
//! - The pure-loss channel Σ → T·Σ + (1 − T)·½·I
//! - Closed-form eigen-decomposition and squeezing levels in dB
//!
//! # Example
//!
//! ```
//! use quantum_optical_bus::gaussian::{build_state, eigen_report};
//!
//! // r = 1, θ = 0, 2 dB of propagation loss
//! let state = build_state(1.0, 0.0, 2.0).unwrap();
//! let report = eigen_report(&state);
//! assert!(report.observed_squeezing_db > 0.0);
//! assert!(report.observed_squeezing_db < 8.69);
//! ```
//!
//! # References
//!
//! - Weedbrook, C. et al. (2012). Rev. Mod. Phys. 84, 621.
//!   DOI: 10.1103/RevModPhys.84.621
//! - Serafini, A. (2017). "Quantum Continuous Variables." CRC Press.

pub mod eigen;
pub mod engine;
pub mod types;

pub use eigen::symmetric_eigen;
pub use engine::{
    apply_loss, build_state, build_state_with_channel, eigen_report, recover_squeezing_parameter,
    squeezed_vacuum, MAX_SQUEEZING_PARAMETER,
};
pub use types::{
    ChannelSpec, EigenReport, QuantumState, Spectrum, DEGENERACY_EPSILON, VACUUM_VARIANCE,
};
