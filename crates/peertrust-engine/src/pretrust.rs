// crates/peertrust-engine/src/pretrust.rs
//
// Pre-trust vector: the prior distribution over peers that seeds power
// iteration and anchors the damping term.

use serde::{Deserialize, Serialize};

use peertrust_core::{Interaction, PeerIndex, Result, TrustError};

/// Non-negative distribution over peers, always summing to 1.
///
/// Construction renormalizes, so the sum invariant holds by construction
/// rather than by caller discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreTrust {
    weights: Vec<f64>,
}

impl PreTrust {
    /// Uniform prior: 1/N for each of `n` peers. The default.
    pub fn uniform(n: usize) -> Result<Self> {
        if n < 2 {
            return Err(TrustError::InsufficientPeers { peer_count: n });
        }
        Ok(Self {
            weights: vec![1.0 / n as f64; n],
        })
    }

    /// Prior from externally supplied quality weights, renormalized to
    /// sum to 1.
    ///
    /// Fails with `InvalidParameter` on a negative weight, an all-zero
    /// vector, or fewer than 2 entries.
    pub fn from_weights(weights: &[f64]) -> Result<Self> {
        if weights.len() < 2 {
            return Err(TrustError::InsufficientPeers {
                peer_count: weights.len(),
            });
        }
        if let Some(&bad) = weights.iter().find(|w| **w < 0.0) {
            return Err(TrustError::InvalidParameter {
                name: "pre_trust_weight",
                value: bad,
            });
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(TrustError::InvalidParameter {
                name: "pre_trust_sum",
                value: total,
            });
        }
        Ok(Self {
            weights: weights.iter().map(|w| w / total).collect(),
        })
    }

    /// Quality prior derived from raw interaction success rates.
    ///
    /// Each peer's weight is its success fraction as an interaction
    /// target. Peers never observed as a target get the neutral 0.5
    /// weight instead of zero, so a cold peer is not written out of the
    /// prior entirely.
    pub fn from_success_rates(peers: &PeerIndex, interactions: &[Interaction]) -> Result<Self> {
        let n = peers.len();
        if n < 2 {
            return Err(TrustError::InsufficientPeers { peer_count: n });
        }

        let mut successes = vec![0u64; n];
        let mut totals = vec![0u64; n];
        for rec in interactions {
            let Some(j) = peers.position(&rec.target) else {
                return Err(TrustError::InvalidInteraction {
                    source: rec.source.to_string(),
                    target: rec.target.to_string(),
                    reason: format!("peer {} is not part of this run", rec.target),
                });
            };
            totals[j] += 1;
            if rec.is_success() {
                successes[j] += 1;
            }
        }

        let weights: Vec<f64> = (0..n)
            .map(|j| {
                if totals[j] == 0 {
                    0.5
                } else {
                    successes[j] as f64 / totals[j] as f64
                }
            })
            .collect();

        // An all-failure history zeroes every observed weight; fall back
        // to uniform rather than failing the run.
        if weights.iter().sum::<f64>() <= 0.0 {
            return Self::uniform(n);
        }
        Self::from_weights(&weights)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use peertrust_core::{InteractionOutcome, PeerId};

    #[test]
    fn uniform_sums_to_one() {
        let p = PreTrust::uniform(7).unwrap();
        assert_eq!(p.len(), 7);
        assert!((p.as_slice().iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((p.as_slice()[3] - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn weights_are_renormalized() {
        let p = PreTrust::from_weights(&[2.0, 1.0, 1.0]).unwrap();
        assert!((p.as_slice()[0] - 0.5).abs() < 1e-12);
        assert!((p.as_slice().iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = PreTrust::from_weights(&[0.5, -0.1]).unwrap_err();
        assert!(matches!(err, TrustError::InvalidParameter { name: "pre_trust_weight", .. }));
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let err = PreTrust::from_weights(&[0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, TrustError::InvalidParameter { name: "pre_trust_sum", .. }));
    }

    #[test]
    fn success_rates_weight_reliable_targets_higher() {
        let ids: Vec<PeerId> = (0..3).map(|_| PeerId::new()).collect();
        let index = PeerIndex::new(&ids).unwrap();
        let at = |s: i64| Utc.timestamp_opt(s, 0).unwrap();
        // Peer 1: 2/2 successes as target. Peer 2: 0/2. Peer 0: unobserved.
        let recs = vec![
            Interaction::at(ids[0], ids[1], InteractionOutcome::Success, at(0)).unwrap(),
            Interaction::at(ids[2], ids[1], InteractionOutcome::Success, at(1)).unwrap(),
            Interaction::at(ids[0], ids[2], InteractionOutcome::Failure, at(2)).unwrap(),
            Interaction::at(ids[1], ids[2], InteractionOutcome::Failure, at(3)).unwrap(),
        ];
        let p = PreTrust::from_success_rates(&index, &recs).unwrap();
        let w = p.as_slice();
        assert!(w[1] > w[0], "perfect target should outrank unobserved peer");
        assert!(w[0] > w[2], "unobserved peer should outrank all-failure target");
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_failure_history_falls_back_to_uniform() {
        let ids: Vec<PeerId> = (0..2).map(|_| PeerId::new()).collect();
        let index = PeerIndex::new(&ids).unwrap();
        let at = |s: i64| Utc.timestamp_opt(s, 0).unwrap();
        let recs = vec![
            Interaction::at(ids[0], ids[1], InteractionOutcome::Failure, at(0)).unwrap(),
            Interaction::at(ids[1], ids[0], InteractionOutcome::Failure, at(1)).unwrap(),
        ];
        let p = PreTrust::from_success_rates(&index, &recs).unwrap();
        assert_eq!(p.as_slice(), &[0.5, 0.5]);
    }
}
