// crates/peertrust-engine/src/convergence.rs
//
// Convergence detection: decide whether two successive trust vectors are
// close enough to stop iterating.

use serde::{Deserialize, Serialize};

use peertrust_core::{Result, TrustError};

/// Default convergence threshold.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// Norm used to measure the change between successive trust vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Sum of absolute differences.
    L1,
    /// Euclidean distance. The default, matched to [`DEFAULT_EPSILON`].
    #[default]
    L2,
}

/// Outcome of one convergence check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceStatus {
    /// True when `delta < epsilon`.
    pub converged: bool,
    /// Magnitude of the change between the two vectors.
    pub delta: f64,
}

/// Check whether iteration has stabilized between `previous` and `current`.
///
/// Fails with `InvalidParameter` if the vectors differ in length; that is
/// a programming error in the caller, not a numeric condition.
pub fn check_convergence(
    previous: &[f64],
    current: &[f64],
    epsilon: f64,
    norm: Norm,
) -> Result<ConvergenceStatus> {
    if previous.len() != current.len() {
        return Err(TrustError::InvalidParameter {
            name: "vector_len",
            value: current.len() as f64,
        });
    }

    let delta = match norm {
        Norm::L1 => previous
            .iter()
            .zip(current)
            .map(|(a, b)| (b - a).abs())
            .sum(),
        Norm::L2 => previous
            .iter()
            .zip(current)
            .map(|(a, b)| (b - a) * (b - a))
            .sum::<f64>()
            .sqrt(),
    };

    Ok(ConvergenceStatus {
        converged: delta < epsilon,
        delta,
    })
}
