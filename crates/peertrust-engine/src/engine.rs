// crates/peertrust-engine/src/engine.rs
//
// Damped power iteration over a column-stochastic trust matrix:
//
//     t_k = (1 - alpha) * C^T * t_{k-1} + alpha * p
//
// (Kamvar et al. 2003, with PageRank-style damping). Iterates until the
// change between successive vectors drops below epsilon or the iteration
// budget runs out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use peertrust_core::{Result, TrustError};

use crate::convergence::{check_convergence, Norm, DEFAULT_EPSILON};
use crate::matrix::TrustMatrix;
use crate::normalize::COLUMN_SUM_TOLERANCE;
use crate::pretrust::PreTrust;

/// Default damping factor. Prevents convergence to a degenerate
/// distribution when the trust graph has disconnected components.
pub const DEFAULT_ALPHA: f64 = 0.15;

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for one power-iteration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Iteration budget. Exhausting it is a reported `Convergence` error.
    pub max_iterations: u32,
    /// Convergence threshold.
    pub epsilon: f64,
    /// Damping factor in [0, 1]. 0 is pure EigenTrust; 1 pins the result
    /// to the pre-trust vector.
    pub alpha: f64,
    /// Norm for the convergence check.
    pub norm: Norm,
    /// When true, a per-iteration snapshot trace is captured; otherwise
    /// only the current and previous vector are held in memory.
    pub capture_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            epsilon: DEFAULT_EPSILON,
            alpha: DEFAULT_ALPHA,
            norm: Norm::default(),
            capture_history: false,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(TrustError::InvalidParameter {
                name: "max_iterations",
                value: 0.0,
            });
        }
        if !(self.epsilon > 0.0) {
            return Err(TrustError::InvalidParameter {
                name: "epsilon",
                value: self.epsilon,
            });
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(TrustError::InvalidParameter {
                name: "alpha",
                value: self.alpha,
            });
        }
        Ok(())
    }
}

/// Converged global trust scores, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceResult {
    /// Final trust vector, in peer-index order. Non-negative, sums to 1.
    pub trust: Vec<f64>,
    /// Iterations executed to reach convergence.
    pub iterations: u32,
    /// Always true on the success path; budget exhaustion is an error.
    pub converged: bool,
    /// Delta of the final iteration.
    pub final_delta: f64,
    /// Epsilon the run was checked against.
    pub epsilon: f64,
}

/// One entry of the optional iteration history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSnapshot {
    /// Iteration index; 0 is the initial pre-trust state.
    pub iteration: u32,
    /// Trust vector after this iteration. Owned copy, never aliased by
    /// later iterations.
    pub scores: Vec<f64>,
    /// Delta against the previous iteration (1.0 for the initial state).
    pub delta: f64,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only iteration trace.
pub type HistoryTrace = Vec<ConvergenceSnapshot>;

/// Result of a run plus its optional history trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRun {
    pub result: ConvergenceResult,
    /// Present only when the run was configured with `capture_history`.
    pub history: Option<HistoryTrace>,
}

/// Run damped power iteration until convergence.
///
/// `matrix` must be column-stochastic (see
/// [`crate::normalize::normalize_columns`]); column sums are re-checked
/// here so a drifted or unnormalized matrix surfaces as
/// `MatrixNormalization` instead of a silently wrong fixpoint.
///
/// Deterministic: identical inputs produce bit-identical output.
///
/// # Errors
/// * `InsufficientPeers` for a matrix smaller than 2x2.
/// * `InvalidParameter` for an out-of-range config or a pre-trust vector
///   whose length does not match the matrix.
/// * `MatrixNormalization` if any column does not sum to 1.
/// * `Convergence` if the budget runs out before reaching epsilon; the
///   caller decides whether to retry with relaxed parameters.
pub fn compute_global_trust(
    matrix: &TrustMatrix,
    pre_trust: &PreTrust,
    config: &EngineConfig,
) -> Result<EngineRun> {
    config.validate()?;

    let n = matrix.len();
    if n < 2 {
        return Err(TrustError::InsufficientPeers { peer_count: n });
    }
    if pre_trust.len() != n {
        return Err(TrustError::InvalidParameter {
            name: "pre_trust_len",
            value: pre_trust.len() as f64,
        });
    }

    let column_sums = matrix.column_sums();
    for (j, &sum) in column_sums.iter().enumerate() {
        if (sum - 1.0).abs() > COLUMN_SUM_TOLERANCE {
            return Err(TrustError::MatrixNormalization {
                column: j,
                sum,
                column_sums,
            });
        }
    }

    let p = pre_trust.as_slice();
    let mut current: Vec<f64> = p.to_vec();
    let mut history = config.capture_history.then(Vec::new);

    if let Some(trace) = history.as_mut() {
        trace.push(ConvergenceSnapshot {
            iteration: 0,
            scores: current.clone(),
            delta: 1.0,
            timestamp: Utc::now(),
        });
    }

    let mut last_delta = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let raw = matrix.transpose_mul(&current);
        let mut next: Vec<f64> = raw
            .iter()
            .zip(p)
            .map(|(r, pre)| (1.0 - config.alpha) * r + config.alpha * pre)
            .collect();

        // Renormalize to guard against floating-point drift.
        let total: f64 = next.iter().sum();
        if total > 0.0 {
            for value in &mut next {
                *value /= total;
            }
        }

        let status = check_convergence(&current, &next, config.epsilon, config.norm)?;
        last_delta = status.delta;
        tracing::debug!(iteration, delta = status.delta, "power iteration step");

        if let Some(trace) = history.as_mut() {
            trace.push(ConvergenceSnapshot {
                iteration,
                scores: next.clone(),
                delta: status.delta,
                timestamp: Utc::now(),
            });
        }

        if status.converged {
            tracing::info!(
                iterations = iteration,
                delta = status.delta,
                peers = n,
                "trust computation converged"
            );
            return Ok(EngineRun {
                result: ConvergenceResult {
                    trust: next,
                    iterations: iteration,
                    converged: true,
                    final_delta: status.delta,
                    epsilon: config.epsilon,
                },
                history,
            });
        }

        current = next;
    }

    tracing::warn!(
        iterations = config.max_iterations,
        delta = last_delta,
        epsilon = config.epsilon,
        "iteration budget exhausted without convergence"
    );
    Err(TrustError::Convergence {
        iterations: config.max_iterations,
        final_delta: last_delta,
        epsilon: config.epsilon,
    })
}
