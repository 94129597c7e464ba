pub mod crypto;

pub use crypto::{signed_data, SignatureVerifier};
