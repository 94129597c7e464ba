#![allow(dead_code)]

mod builders;
mod mock_transport;
mod zone_signer;

pub use builders::*;
pub use mock_transport::{MockTransport, SentQuery};
pub use zone_signer::{TestVerifier, ZoneSigner};
