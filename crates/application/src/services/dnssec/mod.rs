pub mod chain;
pub mod trust_anchor;

pub use chain::{unix_now, unsupported_zone, ChainValidator, PendingDelegation, TrustPhase, TrustState};
pub use trust_anchor::{TrustAnchor, TrustAnchorStore};
