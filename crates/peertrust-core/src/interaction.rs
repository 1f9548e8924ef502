// crates/peertrust-core/src/interaction.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TrustError};
use crate::peer::PeerId;

/// Outcome of a single peer-to-peer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionOutcome {
    Success,
    Failure,
}

/// Immutable record of one interaction between two distinct peers.
///
/// The source requested a service; the target provided it. The engine
/// treats these records as an append-only input log and never mutates
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Unique id for this record.
    pub id: Uuid,
    /// Peer that requested the service.
    pub source: PeerId,
    /// Peer that provided the service.
    pub target: PeerId,
    /// How the interaction went.
    pub outcome: InteractionOutcome,
    /// When the interaction occurred. Records are applied to the trust
    /// matrix in strict timestamp order to keep runs reproducible.
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    /// Record a new interaction, stamped with the current time.
    ///
    /// Fails with `InvalidInteraction` if source and target are the same
    /// peer (self-trust is never recorded).
    pub fn new(source: PeerId, target: PeerId, outcome: InteractionOutcome) -> Result<Self> {
        Self::at(source, target, outcome, Utc::now())
    }

    /// Record an interaction with an explicit timestamp.
    pub fn at(
        source: PeerId,
        target: PeerId,
        outcome: InteractionOutcome,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if source == target {
            return Err(TrustError::InvalidInteraction {
                source: source.to_string(),
                target: target.to_string(),
                reason: "source and target must be different peers".to_string(),
            });
        }
        Ok(Self {
            id: Uuid::now_v7(),
            source,
            target,
            outcome,
            timestamp,
        })
    }

    pub fn is_success(&self) -> bool {
        self.outcome == InteractionOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_loop_is_rejected() {
        let a = PeerId::new();
        let err = Interaction::new(a, a, InteractionOutcome::Success).unwrap_err();
        assert!(matches!(err, TrustError::InvalidInteraction { .. }));
    }

    #[test]
    fn distinct_peers_are_accepted() {
        let a = PeerId::new();
        let b = PeerId::new();
        let rec = Interaction::new(a, b, InteractionOutcome::Failure).unwrap();
        assert_eq!(rec.source, a);
        assert_eq!(rec.target, b);
        assert!(!rec.is_success());
    }

    #[test]
    fn outcome_serializes_lowercase() {
        let json = serde_json::to_string(&InteractionOutcome::Success).unwrap();
        assert_eq!(json, "\"success\"");
        let back: InteractionOutcome = serde_json::from_str("\"failure\"").unwrap();
        assert_eq!(back, InteractionOutcome::Failure);
    }
}
