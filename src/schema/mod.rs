pub mod types;
pub mod write;

pub use types::{Block, Payload, RegionPeriod};
pub use write::{to_json_string, write_payload};
