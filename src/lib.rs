pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::{
    client::PanClient, fleet::FleetDispatcher, orchestrator::DeviceOrchestrator,
    retry::RetryPolicy,
};
pub use config::settings::Settings;
pub use domain::model::{CommitStatus, Credential, Device, DeviceResult, FleetReport, TagSet};
pub use utils::error::{Result, TaggerError};
