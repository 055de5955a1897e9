pub mod client;
pub mod commit;
pub mod fleet;
pub mod orchestrator;
pub mod query;
pub mod report;
pub mod retry;
pub mod tag;

#[cfg(test)]
pub(crate) mod mock;

pub use crate::domain::model::{Device, DeviceResult, FleetReport, TagOutcome, TagSet};
pub use crate::domain::ports::DeviceApi;
pub use crate::utils::error::Result;
