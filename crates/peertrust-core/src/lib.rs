// crates/peertrust-core/src/lib.rs
//
// peertrust-core: Core domain types and errors for the PeerTrust engine.
//
// This is the leaf crate the engine crate depends on. It defines peer
// identities, interaction records, and the error taxonomy shared across
// the workspace.

pub mod error;
pub mod interaction;
pub mod peer;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use peertrust_core::PeerId;`

pub use error::{Result, TrustError};
pub use interaction::{Interaction, InteractionOutcome};
pub use peer::{PeerId, PeerIndex};
