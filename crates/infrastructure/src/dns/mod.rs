pub mod codec;
pub mod dnssec;
pub mod transport;

pub use codec::{MessageBuilder, RecordTypeMapper, ResponseParser};
pub use dnssec::SignatureVerifier;
pub use transport::UdpTransport;
