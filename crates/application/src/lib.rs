//! Iterative resolution and chain-of-trust validation.
pub mod ports;
pub mod services;
pub mod use_cases;
