// crates/peertrust-core/src/peer.rs

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TrustError};

/// Unique identity of a peer within one computation run.
///
/// Backed by a UUIDv7 so freshly minted ids sort by creation time, which
/// keeps generated fixtures stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub Uuid);

impl PeerId {
    /// Mint a new time-ordered peer id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for PeerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Stable mapping from peer ids to dense matrix indices.
///
/// Built once per run from the caller's ordered peer set; the index order
/// is exactly the order the caller supplied, so matrix row/column i always
/// refers to the same peer for the lifetime of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerIndex {
    ids: Vec<PeerId>,
    positions: HashMap<PeerId, usize>,
}

impl PeerIndex {
    /// Build an index from an ordered peer set.
    ///
    /// Fails with `InsufficientPeers` for fewer than 2 peers and
    /// `InvalidInteraction` if the same id appears twice.
    pub fn new(ids: &[PeerId]) -> Result<Self> {
        if ids.len() < 2 {
            return Err(TrustError::InsufficientPeers {
                peer_count: ids.len(),
            });
        }
        let mut positions = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if positions.insert(*id, i).is_some() {
                return Err(TrustError::InvalidInteraction {
                    source: id.to_string(),
                    target: id.to_string(),
                    reason: "duplicate peer id in peer set".to_string(),
                });
            }
        }
        Ok(Self {
            ids: ids.to_vec(),
            positions,
        })
    }

    /// Number of peers in the run.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Matrix index for a peer id, if the peer belongs to this run.
    pub fn position(&self, id: &PeerId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Peer id at a matrix index.
    pub fn id_at(&self, index: usize) -> Option<&PeerId> {
        self.ids.get(index)
    }

    /// Ordered peer ids, matching matrix row/column order.
    pub fn ids(&self) -> &[PeerId] {
        &self.ids
    }
}
