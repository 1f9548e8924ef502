// crates/peertrust-core/src/error.rs

use thiserror::Error;

/// Errors produced by trust computation.
///
/// Every variant carries the numeric state at the point of failure so a
/// caller can diagnose (or decide to retry) without re-running the
/// computation. None of these are used for ordinary control flow.
#[derive(Debug, Clone, Error)]
pub enum TrustError {
    /// Malformed interaction record: self-loop or a peer unknown to the
    /// current run. Rejected before any matrix construction.
    #[error("invalid interaction from {source} to {target}: {reason}")]
    InvalidInteraction {
        r#source: String,
        target: String,
        reason: String,
    },

    /// A negative trust value reached the normalizer. Indicates a defect
    /// in whatever built the matrix; fatal to the run.
    #[error("invalid trust value {value} at ({truster}, {trustee})")]
    InvalidTrustValue {
        value: f64,
        truster: usize,
        trustee: usize,
    },

    /// Fewer than 2 peers; rejected before any computation.
    #[error("at least 2 peers required, got {peer_count}")]
    InsufficientPeers { peer_count: usize },

    /// Iteration budget exhausted without reaching epsilon. Recoverable:
    /// the caller may retry with a relaxed epsilon or a larger budget.
    #[error(
        "failed to converge after {iterations} iterations (final delta {final_delta}, epsilon {epsilon})"
    )]
    Convergence {
        iterations: u32,
        final_delta: f64,
        epsilon: f64,
    },

    /// Post-condition violation: a column did not sum to 1 after
    /// normalization. Internal bug; always fatal, never suppressed.
    #[error("normalization failed: column {column} sums to {sum}, expected 1.0")]
    MatrixNormalization {
        column: usize,
        sum: f64,
        column_sums: Vec<f64>,
    },

    /// Out-of-range engine parameter (alpha outside [0, 1], non-positive
    /// epsilon, zero iteration budget, mismatched vector lengths).
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TrustError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergence_error_reports_diagnostic_context() {
        let err = TrustError::Convergence {
            iterations: 5,
            final_delta: 0.04,
            epsilon: 0.001,
        };
        let msg = err.to_string();
        assert!(msg.contains("5 iterations"));
        assert!(msg.contains("0.04"));
        assert!(msg.contains("0.001"));
    }

    #[test]
    fn normalization_error_carries_column_sums() {
        let err = TrustError::MatrixNormalization {
            column: 1,
            sum: 0.9,
            column_sums: vec![1.0, 0.9, 1.0],
        };
        match err {
            TrustError::MatrixNormalization { column_sums, .. } => {
                assert_eq!(column_sums.len(), 3);
            }
            _ => panic!("wrong variant"),
        }
    }
}
