//! iterdig domain layer
pub mod config;
pub mod dns_message;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod name;

pub use config::{
    CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig, RootTrustPolicy,
    ServerSelection,
};
pub use dns_message::{DnsMessage, Question, ResponseCode};
pub use dns_query::DnsQuery;
pub use dns_record::{
    DnskeyRecord, DsRecord, RecordData, RecordType, ResourceRecord, RrsigRecord, SoaData,
};
pub use errors::DomainError;
pub use name::DomainName;
