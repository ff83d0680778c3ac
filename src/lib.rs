// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum Optical Bus core
//!
//! This crate maps pump power, squeezing angle and propagation loss to the
//! Gaussian state of a single squeezed optical mode, and derives the
//! observables used to inspect it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        optical-bus CLI / report          │
//! ├─────────────────────────────────────────┤
//! │   bus (independent time bins)            │
//! ├──────────────────┬──────────────────────┤
//! │   calibration    │   metrics            │
//! │   P → r          │   Wigner / pmf / var │
//! ├──────────────────┴──────────────────────┤
//! │   gaussian (squeeze, loss, eigen)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Conventions: ħ = 1, vacuum quadrature variance ½, quadrature order (x, p).
//!
//! # Modules
//!
//! - [`calibration`]: Pump power to squeezing parameter
//! - [`gaussian`]: Gaussian states, loss channel and eigen-analysis
//! - [`metrics`]: Wigner function, photon statistics, quadrature variances
//! - [`bus`]: Independent time-bin runs
//! - [`report`]: One-call evaluation of an operating point
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod bus;
pub mod calibration;
pub mod config;
pub mod error;
pub mod gaussian;
pub mod metrics;
pub mod report;
pub mod validation;

pub use calibration::{CalibrationMapping, CalibrationResult};
pub use config::Config;
pub use error::{Error, Result};
pub use gaussian::{ChannelSpec, EigenReport, QuantumState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
