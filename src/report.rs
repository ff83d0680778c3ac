// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end evaluation of one operating point.
//!
//! Chains calibration, state construction, loss and the derived metrics into
//! a single serializable [`SingleModeReport`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calibration::{CalibrationMapping, CalibrationResult};
use crate::config::{Config, ResourceLimits};
use crate::error::Result;
use crate::gaussian::{
    build_state_with_channel, eigen_report, ChannelSpec, EigenReport, QuantumState,
};
use crate::metrics::photon::photon_number_pmf;
use crate::metrics::variance::QuadratureVariances;
use crate::metrics::wigner::{wigner_grid, GridSpec, WignerGrid};
use crate::validation::{normalize_phase, validate_grid_points, validate_photon_cutoff};

/// Pump power, squeezing angle and propagation loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Pump power in mW.
    pub power_mw: f64,
    /// Squeezing angle θ in radians; any finite value, wrapped into [0, 2π).
    pub phase_rad: f64,
    /// Total channel loss in dB.
    pub loss_db: f64,
}

impl OperatingPoint {
    /// Operating point from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        Self {
            power_mw: config.operating_point.power_mw,
            phase_rad: config.operating_point.phase_rad,
            loss_db: config.channel.total_loss_db(),
        }
    }
}

/// Which derived metrics to compute.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Wigner grid; `None` skips the Wigner function.
    pub grid: Option<GridSpec>,
    /// Photon-number cutoff.
    pub n_max: usize,
    pub limits: ResourceLimits,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            grid: Some(GridSpec::default()),
            n_max: 20,
            limits: ResourceLimits::default(),
        }
    }
}

impl ReportOptions {
    /// Grid, photon cutoff and resource limits from the config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            grid: Some(GridSpec {
                limit: config.wigner.grid_limit,
                points: config.wigner.grid_points,
            }),
            n_max: config.photon.n_max,
            limits: config.validation.limits.clone(),
        }
    }
}

/// Everything known about one operating point.
#[derive(Debug, Clone, Serialize)]
pub struct SingleModeReport {
    pub calibration: CalibrationResult,
    pub transmissivity: f64,
    pub state: QuantumState,
    pub eigen: EigenReport,
    pub variances: QuadratureVariances,
    pub var_x: f64,
    pub var_p: f64,
    pub mean_photon: f64,
    pub purity: f64,
    /// Photon-number pmf of the pre-loss squeezed vacuum.
    pub photon_distribution: Vec<(usize, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wigner: Option<WignerGrid>,
}

/// Evaluate one operating point.
///
/// # Errors
///
/// - Negative power or loss, or any non-finite input
/// - Grid or photon cutoff outside the resource limits
pub fn run_single_mode(
    mapping: &CalibrationMapping,
    point: &OperatingPoint,
    options: &ReportOptions,
) -> Result<SingleModeReport> {
    validate_photon_cutoff(options.n_max, &options.limits)?;
    if let Some(grid) = &options.grid {
        validate_grid_points(grid.points, &options.limits)?;
    }

    let calibration = mapping.calibrate(point.power_mw)?;
    let theta = normalize_phase(point.phase_rad)?;
    let channel = ChannelSpec::from_loss_db(point.loss_db)?;
    let state = build_state_with_channel(calibration.squeezing_parameter, theta, &channel)?;
    let eigen = eigen_report(&state);

    info!(
        power_mw = point.power_mw,
        r = calibration.squeezing_parameter,
        loss_db = point.loss_db,
        intrinsic_db = calibration.intrinsic_squeezing_db,
        observed_db = eigen.observed_squeezing_db,
        "Evaluated operating point"
    );

    let photon_distribution = photon_number_pmf(calibration.squeezing_parameter, options.n_max)?;
    let wigner = match &options.grid {
        Some(grid) => Some(wigner_grid(&state, grid)?),
        None => None,
    };
    debug!(has_wigner = wigner.is_some(), n_max = options.n_max, "Derived metrics ready");

    Ok(SingleModeReport {
        calibration,
        transmissivity: channel.transmissivity(),
        variances: QuadratureVariances::from_report(&eigen),
        var_x: state.var_x(),
        var_p: state.var_p(),
        mean_photon: state.mean_photon_number(),
        purity: state.purity(),
        eigen,
        state,
        photon_distribution,
        wigner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};
    use approx::assert_relative_eq;

    fn point(power_mw: f64, loss_db: f64) -> OperatingPoint {
        OperatingPoint {
            power_mw,
            phase_rad: 0.0,
            loss_db,
        }
    }

    #[test]
    fn test_vacuum_operating_point() {
        let report = run_single_mode(
            &CalibrationMapping::default(),
            &point(0.0, 0.0),
            &ReportOptions::default(),
        )
        .unwrap();
        assert_eq!(report.calibration.squeezing_parameter, 0.0);
        assert_eq!(report.eigen.observed_squeezing_db, 0.0);
        assert_relative_eq!(report.var_x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(report.var_p, 0.5, epsilon = 1e-12);
        assert_relative_eq!(report.mean_photon, 0.0, epsilon = 1e-12);
        assert_eq!(report.photon_distribution[0], (0, 1.0));
        assert_eq!(report.photon_distribution.len(), 21);
        let grid = report.wigner.unwrap();
        assert_eq!(grid.values.dim(), (120, 120));
    }

    #[test]
    fn test_lossless_report_is_consistent() {
        let report = run_single_mode(
            &CalibrationMapping::default(),
            &point(100.0, 0.0),
            &ReportOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(report.calibration.intrinsic_squeezing_db, 8.685889638, epsilon = 1e-6);
        assert_relative_eq!(
            report.eigen.observed_squeezing_db,
            report.calibration.intrinsic_squeezing_db,
            epsilon = 1e-9
        );
        assert_relative_eq!(report.mean_photon, 1.0f64.sinh().powi(2), epsilon = 1e-9);
        assert_relative_eq!(report.purity, 1.0, epsilon = 1e-9);
        assert_eq!(report.transmissivity, 1.0);
        assert!(report.variances.below_shot_noise());
    }

    #[test]
    fn test_lossy_report() {
        let report = run_single_mode(
            &CalibrationMapping::default(),
            &point(100.0, 2.0),
            &ReportOptions::default(),
        )
        .unwrap();
        assert!(report.eigen.observed_squeezing_db > 0.0);
        assert!(report.eigen.observed_squeezing_db < report.calibration.intrinsic_squeezing_db);
        assert!(report.purity < 1.0);
        assert_relative_eq!(report.transmissivity, 10f64.powf(-0.2), epsilon = 1e-12);
        // Photon statistics are reported before the channel
        let lossless = photon_number_pmf(1.0, 20).unwrap();
        assert_eq!(report.photon_distribution, lossless);
    }

    #[test]
    fn test_wigner_can_be_skipped() {
        let options = ReportOptions {
            grid: None,
            ..ReportOptions::default()
        };
        let report =
            run_single_mode(&CalibrationMapping::default(), &point(50.0, 1.0), &options).unwrap();
        assert!(report.wigner.is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("wigner").is_none());
        assert!(json.get("eigen").is_some());
    }

    #[test]
    fn test_resource_limits_enforced() {
        let options = ReportOptions {
            n_max: 10_000,
            ..ReportOptions::default()
        };
        let err = run_single_mode(&CalibrationMapping::default(), &point(10.0, 0.0), &options)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ResourceLimit { .. })
        ));

        let options = ReportOptions {
            grid: Some(GridSpec {
                limit: 4.0,
                points: 100_000,
            }),
            ..ReportOptions::default()
        };
        let err = run_single_mode(&CalibrationMapping::default(), &point(10.0, 0.0), &options)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ResourceLimit { .. })
        ));
    }

    #[test]
    fn test_invalid_operating_point() {
        let mapping = CalibrationMapping::default();
        let options = ReportOptions::default();
        assert!(run_single_mode(&mapping, &point(-1.0, 0.0), &options).is_err());
        assert!(run_single_mode(&mapping, &point(10.0, -0.5), &options).is_err());
        let bad_phase = OperatingPoint {
            phase_rad: f64::INFINITY,
            ..point(10.0, 0.0)
        };
        assert!(run_single_mode(&mapping, &bad_phase, &options).is_err());
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.wigner.grid_points = 40;
        config.photon.n_max = 8;
        let options = ReportOptions::from_config(&config);
        assert_eq!(options.grid.map(|g| g.points), Some(40));
        assert_eq!(options.n_max, 8);

        let point = OperatingPoint::from_config(&config);
        assert_eq!(point.power_mw, 100.0);
        assert_relative_eq!(point.loss_db, 0.05, epsilon = 1e-12);
    }
}
