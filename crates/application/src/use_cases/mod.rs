pub mod resolve;

pub use resolve::{Resolver, ResolverSettings};
