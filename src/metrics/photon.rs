// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Photon-number distribution of a single-mode squeezed vacuum.
//!
//! Only even Fock states are populated:
//!
//!   P(2k) = (2k)! / (2^{2k} (k!)²) · tanh^{2k}(r) / cosh(r)
//!
//! The combinatorial prefactor is built by the recurrence
//! c_k = c_{k−1}·(2k − 1)/(2k), which stays finite for any cutoff.

use crate::error::{Error, Result};
use crate::validation::validate_non_negative;

/// Photon-number pmf as `(n, P(n))` pairs for n = 0..=n_max.
///
/// The list is truncated, not renormalized; its sum approaches 1 as
/// `n_max` grows. Odd entries are exactly zero.
///
/// # Errors
/// `InvalidParameter` if `r` is negative or not finite, or `n_max` is zero.
pub fn photon_number_pmf(r: f64, n_max: usize) -> Result<Vec<(usize, f64)>> {
    validate_non_negative("squeezing_parameter", r)?;
    if n_max == 0 {
        return Err(Error::invalid("n_max", "photon cutoff must be at least 1"));
    }

    let t2 = r.tanh().powi(2);
    let mut even_term = 1.0 / r.cosh();
    let mut pmf = Vec::with_capacity(n_max + 1);
    for n in 0..=n_max {
        let probability = if n % 2 == 1 {
            0.0
        } else {
            if n > 0 {
                let k = (n / 2) as f64;
                even_term *= (2.0 * k - 1.0) / (2.0 * k) * t2;
            }
            even_term
        };
        pmf.push((n, probability));
    }
    Ok(pmf)
}

/// Total probability captured by a truncated pmf.
pub fn total_probability(pmf: &[(usize, f64)]) -> f64 {
    pmf.iter().map(|&(_, p)| p).sum()
}

/// ⟨n⟩ of a truncated pmf.
pub fn pmf_mean(pmf: &[(usize, f64)]) -> f64 {
    pmf.iter().map(|&(n, p)| n as f64 * p).sum()
}

/// Rescale a truncated pmf so it sums to 1. Returned unchanged if empty
/// or all zero.
pub fn normalized(pmf: &[(usize, f64)]) -> Vec<(usize, f64)> {
    let total = total_probability(pmf);
    if total <= 0.0 {
        return pmf.to_vec();
    }
    pmf.iter().map(|&(n, p)| (n, p / total)).collect()
}
