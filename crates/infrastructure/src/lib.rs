//! Wire codec and UDP transport for the iterdig resolver.
pub mod dns;
