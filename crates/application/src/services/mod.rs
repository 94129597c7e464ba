pub mod delegation;
pub mod dnssec;
pub mod extraction;
pub mod referral;

pub use delegation::{Referral, ResolutionState, Step, WalkerState};
pub use referral::{glue_servers, resolve_glue, AddressLookup};
