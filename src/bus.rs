// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Time-multiplexed optical bus.
//!
//! A [`QuantumBus`] drives `num_bins` time bins, each with its own pump power
//! and squeezing angle. Bins are independent single-mode computations: there
//! is no coupling or entanglement between them.

use serde::Serialize;
use tracing::{debug, info};

use crate::calibration::CalibrationMapping;
use crate::config::ResourceLimits;
use crate::error::{Result, ValidationError};
use crate::gaussian::{build_state_with_channel, eigen_report, ChannelSpec, EigenReport};
use crate::metrics::wigner::{wigner_grid, GridSpec, WignerGrid};
use crate::validation::{normalize_phase, validate_grid_points, validate_time_bins};

/// Result for one time bin.
#[derive(Debug, Clone, Serialize)]
pub struct TimeBin {
    /// Position of the bin within the run.
    pub index: usize,
    pub power_mw: f64,
    /// Squeezing parameter from calibration.
    pub squeezing_parameter: f64,
    /// Squeezing angle normalized into [0, 2π).
    pub theta: f64,
    pub eigen: EigenReport,
    pub wigner: WignerGrid,
}

/// A set of independent time bins sharing one calibration.
///
/// Only constructed through [`QuantumBus::new`], so the bin count is always
/// within the resource limits it carries.
#[derive(Debug, Clone)]
pub struct QuantumBus {
    num_bins: usize,
    mapping: CalibrationMapping,
    limits: ResourceLimits,
}

impl QuantumBus {
    /// Create a bus, checking the bin count against the resource limits.
    pub fn new(
        num_bins: usize,
        mapping: CalibrationMapping,
        limits: &ResourceLimits,
    ) -> Result<Self> {
        validate_time_bins(num_bins, limits)?;
        Ok(Self {
            num_bins,
            mapping,
            limits: limits.clone(),
        })
    }

    /// Number of time bins per run.
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Calibration shared by every bin.
    pub fn mapping(&self) -> &CalibrationMapping {
        &self.mapping
    }

    /// Compute every bin for one set of pump settings.
    ///
    /// # Errors
    ///
    /// - `powers_mw` or `phases_rad` length differs from `num_bins`
    /// - Any power is negative or any value is not finite
    /// - The grid is invalid or exceeds the resource limits
    pub fn run(
        &self,
        powers_mw: &[f64],
        phases_rad: &[f64],
        channel: &ChannelSpec,
        grid: &GridSpec,
    ) -> Result<Vec<TimeBin>> {
        check_len("powers_mw", powers_mw.len(), self.num_bins)?;
        check_len("phases_rad", phases_rad.len(), self.num_bins)?;
        validate_grid_points(grid.points, &self.limits)?;

        info!(
            num_bins = self.num_bins,
            transmissivity = channel.transmissivity(),
            grid_points = grid.points,
            "Running optical bus"
        );

        powers_mw
            .iter()
            .zip(phases_rad)
            .enumerate()
            .map(|(index, (&power_mw, &phase))| {
                let calibration = self.mapping.calibrate(power_mw)?;
                let theta = normalize_phase(phase)?;
                let state =
                    build_state_with_channel(calibration.squeezing_parameter, theta, channel)?;
                let eigen = eigen_report(&state);
                debug!(
                    index,
                    r = calibration.squeezing_parameter,
                    theta,
                    observed_db = eigen.observed_squeezing_db,
                    "Computed time bin"
                );
                Ok(TimeBin {
                    index,
                    power_mw,
                    squeezing_parameter: calibration.squeezing_parameter,
                    theta,
                    eigen,
                    wigner: wigner_grid(&state, grid)?,
                })
            })
            .collect()
    }
}

fn check_len(field: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(ValidationError::Field {
            field: field.into(),
            message: format!("expected {expected} entries (one per time bin), got {actual}"),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gaussian::build_state;
    use crate::metrics::wigner::wigner;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn bus(num_bins: usize) -> QuantumBus {
        QuantumBus::new(num_bins, CalibrationMapping::default(), &ResourceLimits::default())
            .unwrap()
    }

    fn small_grid() -> GridSpec {
        GridSpec::new(3.0, 21).unwrap()
    }

    #[test]
    fn test_bins_follow_their_own_settings() {
        let bins = bus(3)
            .run(
                &[0.0, 100.0, 400.0],
                &[0.0, FRAC_PI_2, PI],
                &ChannelSpec::lossless(),
                &small_grid(),
            )
            .unwrap();

        assert_eq!(bins.len(), 3);
        assert_relative_eq!(bins[0].squeezing_parameter, 0.0);
        assert_relative_eq!(bins[1].squeezing_parameter, 1.0, epsilon = 1e-12);
        assert_relative_eq!(bins[2].squeezing_parameter, 2.0, epsilon = 1e-12);
        assert_relative_eq!(bins[1].theta, FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(bins[0].eigen.observed_squeezing_db, 0.0);
        assert!(bins[2].eigen.observed_squeezing_db > bins[1].eigen.observed_squeezing_db);
        for (i, bin) in bins.iter().enumerate() {
            assert_eq!(bin.index, i);
            assert_eq!(bin.wigner.values.dim(), (21, 21));
        }
    }

    #[test]
    fn test_bins_are_independent() {
        let channel = ChannelSpec::from_loss_db(1.0).unwrap();
        let alone = bus(1).run(&[100.0], &[0.4], &channel, &small_grid()).unwrap();
        let crowded = bus(3)
            .run(&[500.0, 100.0, 20.0], &[2.0, 0.4, 1.0], &channel, &small_grid())
            .unwrap();
        assert_eq!(alone[0].eigen, crowded[1].eigen);
        assert_eq!(alone[0].wigner, crowded[1].wigner);
    }

    #[test]
    fn test_bin_matches_direct_state() {
        let bins = bus(1)
            .run(&[100.0], &[0.3], &ChannelSpec::lossless(), &small_grid())
            .unwrap();
        let state = build_state(1.0, 0.3, 0.0).unwrap();
        let grid = &bins[0].wigner;
        assert_relative_eq!(
            grid.values[[4, 7]],
            wigner(&state, grid.xvec[7], grid.pvec[4]),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_negative_phase_is_normalized() {
        let bins = bus(1)
            .run(&[50.0], &[-FRAC_PI_2], &ChannelSpec::lossless(), &small_grid())
            .unwrap();
        assert_relative_eq!(bins[0].theta, 1.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = bus(2)
            .run(&[10.0], &[0.0, 0.0], &ChannelSpec::lossless(), &small_grid())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Field { ref field, .. }) if field == "powers_mw"
        ));

        let err = bus(2)
            .run(&[10.0, 20.0], &[0.0], &ChannelSpec::lossless(), &small_grid())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Field { ref field, .. }) if field == "phases_rad"
        ));
    }

    #[test]
    fn test_invalid_bin_input_fails_run() {
        assert!(bus(2)
            .run(&[10.0, -5.0], &[0.0, 0.0], &ChannelSpec::lossless(), &small_grid())
            .is_err());
        assert!(bus(1)
            .run(&[10.0], &[f64::NAN], &ChannelSpec::lossless(), &small_grid())
            .is_err());
    }

    #[test]
    fn test_grid_above_limit_rejected() {
        let limits = ResourceLimits {
            max_grid_points: 50,
            ..ResourceLimits::default()
        };
        let bus = QuantumBus::new(1, CalibrationMapping::default(), &limits).unwrap();
        let err = bus
            .run(
                &[10.0],
                &[0.0],
                &ChannelSpec::lossless(),
                &GridSpec::new(4.0, 51).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ResourceLimit { limit: 50, requested: 51, .. })
        ));
        assert!(bus
            .run(&[10.0], &[0.0], &ChannelSpec::lossless(), &GridSpec::new(4.0, 50).unwrap())
            .is_ok());
    }

    #[test]
    fn test_accessors() {
        let mapping = CalibrationMapping::new(0.2).unwrap();
        let bus = QuantumBus::new(4, mapping, &ResourceLimits::default()).unwrap();
        assert_eq!(bus.num_bins(), 4);
        assert_eq!(bus.mapping(), &mapping);
    }

    #[test]
    fn test_bin_count_limits() {
        let limits = ResourceLimits::default();
        let mapping = CalibrationMapping::default();
        assert!(QuantumBus::new(0, mapping, &limits).is_err());
        assert!(QuantumBus::new(limits.max_time_bins + 1, mapping, &limits).is_err());
        assert!(QuantumBus::new(limits.max_time_bins, mapping, &limits).is_ok());
    }
}
