// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quadrature noise variances relative to the shot-noise limit.

use serde::Serialize;

use crate::calibration::CalibrationMapping;
use crate::error::Result;
use crate::gaussian::{
    build_state_with_channel, eigen_report, ChannelSpec, EigenReport, VACUUM_VARIANCE,
};

/// Squeezed and anti-squeezed variances next to the vacuum reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadratureVariances {
    /// Variance along the squeezed axis (smallest eigenvalue of Σ).
    pub squeezed: f64,
    /// Variance along the anti-squeezed axis (largest eigenvalue of Σ).
    pub anti_squeezed: f64,
    /// Vacuum quadrature variance, ½.
    pub shot_noise_limit: f64,
}

impl QuadratureVariances {
    /// Principal variances of an eigen report, against the vacuum level.
    pub fn from_report(report: &EigenReport) -> Self {
        Self {
            squeezed: report.min_variance,
            anti_squeezed: report.max_variance,
            shot_noise_limit: VACUUM_VARIANCE,
        }
    }

    /// 10·log10(squeezed / ½). Negative when the quadrature is below shot noise.
    pub fn squeezed_db_vs_vacuum(&self) -> f64 {
        db_ratio(self.squeezed, self.shot_noise_limit)
    }

    /// 10·log10(anti_squeezed / ½).
    pub fn anti_squeezed_db_vs_vacuum(&self) -> f64 {
        db_ratio(self.anti_squeezed, self.shot_noise_limit)
    }

    pub fn below_shot_noise(&self) -> bool {
        self.squeezed < self.shot_noise_limit
    }

    /// Product of principal variances; at least ¼ for any physical state.
    pub fn uncertainty_product(&self) -> f64 {
        self.squeezed * self.anti_squeezed
    }
}

fn db_ratio(variance: f64, reference: f64) -> f64 {
    if variance <= 0.0 {
        return f64::NEG_INFINITY;
    }
    10.0 * (variance / reference).log10()
}

/// One point of a noise-variance sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseVariancePoint {
    pub power_mw: f64,
    pub squeezed: f64,
    pub anti_squeezed: f64,
}

/// Squeezed and anti-squeezed variance versus pump power through a fixed
/// channel, with θ = 0.
pub fn noise_variance_curve(
    mapping: &CalibrationMapping,
    channel: &ChannelSpec,
    powers_mw: &[f64],
) -> Result<Vec<NoiseVariancePoint>> {
    powers_mw
        .iter()
        .map(|&power_mw| {
            let calibration = mapping.calibrate(power_mw)?;
            let state = build_state_with_channel(calibration.squeezing_parameter, 0.0, channel)?;
            let variances = QuadratureVariances::from_report(&eigen_report(&state));
            Ok(NoiseVariancePoint {
                power_mw,
                squeezed: variances.squeezed,
                anti_squeezed: variances.anti_squeezed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::linspace_powers;
    use crate::gaussian::{build_state, QuantumState};
    use approx::assert_relative_eq;

    #[test]
    fn test_vacuum_sits_on_shot_noise() {
        let v = QuadratureVariances::from_report(&eigen_report(&QuantumState::vacuum()));
        assert_eq!(v.squeezed, 0.5);
        assert_eq!(v.anti_squeezed, 0.5);
        assert_eq!(v.shot_noise_limit, 0.5);
        assert_eq!(v.squeezed_db_vs_vacuum(), 0.0);
        assert!(!v.below_shot_noise());
    }

    #[test]
    fn test_signed_db_for_lossless_squeezing() {
        let r = 1.0;
        let v = QuadratureVariances::from_report(&eigen_report(&build_state(r, 0.0, 0.0).unwrap()));
        let intrinsic = 20.0 * r / std::f64::consts::LN_10;
        assert_relative_eq!(v.squeezed_db_vs_vacuum(), -intrinsic, epsilon = 1e-9);
        assert_relative_eq!(v.anti_squeezed_db_vs_vacuum(), intrinsic, epsilon = 1e-9);
        assert!(v.below_shot_noise());
        assert_relative_eq!(v.uncertainty_product(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_loss_raises_uncertainty_product() {
        let state = build_state(1.0, 0.0, 3.0).unwrap();
        let v = QuadratureVariances::from_report(&eigen_report(&state));
        assert!(v.uncertainty_product() > 0.25);
    }

    #[test]
    fn test_zero_variance_is_negative_infinity_db() {
        let v = QuadratureVariances {
            squeezed: 0.0,
            anti_squeezed: 1.0,
            shot_noise_limit: 0.5,
        };
        assert_eq!(v.squeezed_db_vs_vacuum(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_noise_variance_curve_shape() {
        let mapping = CalibrationMapping::default();
        let channel = ChannelSpec::from_loss_db(1.0).unwrap();
        let powers = linspace_powers(500.0, 11).unwrap();
        let curve = noise_variance_curve(&mapping, &channel, &powers).unwrap();

        assert_eq!(curve.len(), 11);
        assert_relative_eq!(curve[0].squeezed, 0.5, epsilon = 1e-12);
        assert_relative_eq!(curve[0].anti_squeezed, 0.5, epsilon = 1e-12);
        for pair in curve.windows(2) {
            assert!(pair[1].squeezed <= pair[0].squeezed);
            assert!(pair[1].anti_squeezed >= pair[0].anti_squeezed);
        }
        // Loss bounds the squeezed variance below by (1 − T)·½
        let t = channel.transmissivity();
        assert!(curve.iter().all(|p| p.squeezed > (1.0 - t) * 0.5));
    }

    #[test]
    fn test_noise_variance_curve_rejects_negative_power() {
        let err = noise_variance_curve(
            &CalibrationMapping::default(),
            &ChannelSpec::lossless(),
            &[10.0, -1.0],
        );
        assert!(err.is_err());
    }
}
