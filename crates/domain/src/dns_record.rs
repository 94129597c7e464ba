mod dnssec;
mod record;
mod record_type;
pub mod type_bitmap;

pub use dnssec::{DnskeyRecord, DsRecord, RrsigRecord};
pub use record::{RecordData, ResourceRecord, SoaData};
pub use record_type::RecordType;
