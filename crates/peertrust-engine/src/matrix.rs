// crates/peertrust-engine/src/matrix.rs
//
// Local-trust matrix: T(i, j) = trust peer i has extended to peer j,
// folded from the interaction log.
//
// Cell values live in [0, 1]. The diagonal is always 0 (no self-trust)
// and pairs that never interacted stay at 0 (no edge).

use serde::{Deserialize, Serialize};

use peertrust_core::{Interaction, PeerId, PeerIndex, Result, TrustError};

/// Neutral starting trust for an ordered pair on its first interaction.
pub const BASELINE_TRUST: f64 = 0.5;

/// Trust adjustment per interaction outcome (+ on success, - on failure).
pub const TRUST_STEP: f64 = 0.1;

/// Dense N×N matrix of pairwise trust values, row-major.
///
/// Row i holds the trust peer i assigns; column j holds the trust peer j
/// receives. `normalized` is true only for matrices produced by
/// [`crate::normalize::normalize_columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustMatrix {
    n: usize,
    cells: Vec<f64>,
    normalized: bool,
}

impl TrustMatrix {
    /// All-zero matrix for `n` peers.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            cells: vec![0.0; n * n],
            normalized: false,
        }
    }

    /// Build a matrix from explicit rows. Intended for tests and for
    /// callers that already hold a raw matrix from elsewhere.
    ///
    /// Fails with `InvalidParameter` if the rows are not square.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(TrustError::InvalidParameter {
                    name: "matrix_row_len",
                    value: row.len() as f64,
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self {
            n,
            cells,
            normalized: false,
        })
    }

    /// Number of peers (matrix dimension).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether this matrix has been column-normalized.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn get(&self, truster: usize, trustee: usize) -> f64 {
        self.cells[truster * self.n + trustee]
    }

    pub(crate) fn set(&mut self, truster: usize, trustee: usize, value: f64) {
        self.cells[truster * self.n + trustee] = value;
        self.normalized = false;
    }

    pub(crate) fn set_normalized(&mut self, normalized: bool) {
        self.normalized = normalized;
    }

    /// Sum of column `j` (total trust received by peer j).
    pub fn column_sum(&self, j: usize) -> f64 {
        (0..self.n).map(|i| self.get(i, j)).sum()
    }

    /// All column sums, in index order.
    pub fn column_sums(&self) -> Vec<f64> {
        (0..self.n).map(|j| self.column_sum(j)).collect()
    }

    /// Compute `transpose(self) · v`, the trust-propagation step of power
    /// iteration: entry j of the result is the trust flowing into peer j.
    pub fn transpose_mul(&self, v: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.n];
        for (j, slot) in out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (i, &t) in v.iter().enumerate() {
                acc += self.get(i, j) * t;
            }
            *slot = acc;
        }
        out
    }
}

/// Folds interaction records into a raw local-trust matrix.
///
/// The first interaction for an ordered pair initializes the cell to the
/// neutral baseline before the outcome step is applied; every step is
/// clamped to [0, 1]. Interactions are applied in strict timestamp order
/// so clamping saturation is reproducible regardless of input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustMatrixBuilder {
    baseline: f64,
    step: f64,
}

impl Default for TrustMatrixBuilder {
    fn default() -> Self {
        Self {
            baseline: BASELINE_TRUST,
            step: TRUST_STEP,
        }
    }
}

impl TrustMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `interactions` into an N×N raw trust matrix over `peers`.
    ///
    /// Fails with `InsufficientPeers` for fewer than 2 peers and with
    /// `InvalidInteraction` on a self-loop or a record referencing a peer
    /// outside the run. Input records are never mutated.
    pub fn build(&self, peers: &PeerIndex, interactions: &[Interaction]) -> Result<TrustMatrix> {
        let n = peers.len();
        if n < 2 {
            return Err(TrustError::InsufficientPeers { peer_count: n });
        }

        // Strict temporal order; record id breaks timestamp ties so a
        // batch with equal timestamps still folds deterministically.
        let mut ordered: Vec<&Interaction> = interactions.iter().collect();
        ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

        let mut matrix = TrustMatrix::zeros(n);
        let mut touched = vec![false; n * n];

        for rec in ordered {
            if rec.source == rec.target {
                return Err(TrustError::InvalidInteraction {
                    source: rec.source.to_string(),
                    target: rec.target.to_string(),
                    reason: "source and target must be different peers".to_string(),
                });
            }
            let i = peers.position(&rec.source).ok_or_else(|| unknown_peer(rec, &rec.source))?;
            let j = peers.position(&rec.target).ok_or_else(|| unknown_peer(rec, &rec.target))?;

            let cell = i * n + j;
            if !touched[cell] {
                matrix.set(i, j, self.baseline);
                touched[cell] = true;
            }

            let delta = if rec.is_success() { self.step } else { -self.step };
            let updated = (matrix.get(i, j) + delta).clamp(0.0, 1.0);
            matrix.set(i, j, updated);
        }

        Ok(matrix)
    }
}

fn unknown_peer(rec: &Interaction, id: &PeerId) -> TrustError {
    TrustError::InvalidInteraction {
        source: rec.source.to_string(),
        target: rec.target.to_string(),
        reason: format!("peer {id} is not part of this run"),
    }
}
