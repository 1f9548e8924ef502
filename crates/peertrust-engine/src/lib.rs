// crates/peertrust-engine/src/lib.rs
//
// peertrust-engine: Trust matrix construction, column normalization, and
// damped power iteration for the PeerTrust engine.
//
// Data flows: interaction records -> TrustMatrixBuilder -> raw matrix ->
// normalize_columns -> stochastic matrix -> compute_global_trust ->
// converged trust scores (plus an optional iteration history).
//
// Each run is a pure function of its inputs: no shared state, no internal
// randomness, bit-for-bit reproducible. Independent runs may execute on
// parallel threads without coordination.

pub mod convergence;
pub mod engine;
pub mod matrix;
pub mod normalize;
pub mod pretrust;

// Re-export the public surface for ergonomic access.
// Usage: `use peertrust_engine::TrustMatrixBuilder;`

pub use convergence::{check_convergence, ConvergenceStatus, Norm, DEFAULT_EPSILON};
pub use engine::{
    compute_global_trust, ConvergenceResult, ConvergenceSnapshot, EngineConfig, EngineRun,
    HistoryTrace, DEFAULT_ALPHA, DEFAULT_MAX_ITERATIONS,
};
pub use matrix::{TrustMatrix, TrustMatrixBuilder, BASELINE_TRUST, TRUST_STEP};
pub use normalize::{normalize_columns, COLUMN_SUM_TOLERANCE, EPSILON_ZERO};
pub use pretrust::PreTrust;
