use crate::domain::model::{ApiResponse, Device};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One request against one device's management API.
///
/// `Err` means the exchange never completed (DNS, TCP, TLS, timeout) and is
/// always a `TaggerError::TransportError`. Any received response, including
/// non-200 statuses, is `Ok`.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    async fn invoke(&self, device: &Device, query: &str) -> Result<ApiResponse>;
}
