use crate::core::query::commit_query;
use crate::domain::model::Device;
use crate::domain::ports::DeviceApi;
use std::sync::Arc;

/// Activates staged changes on a device. Never retried.
pub struct Committer<A: DeviceApi> {
    api: Arc<A>,
    query: String,
}

impl<A: DeviceApi> Committer<A> {
    pub fn new(api: Arc<A>, description: &str) -> Self {
        Self {
            api,
            query: commit_query(description),
        }
    }

    pub async fn commit(&self, device: &Device) -> bool {
        tracing::info!("[{}] Committing changes", device);

        match self.api.invoke(device, &self.query).await {
            Ok(response) if response.is_success() => {
                tracing::info!("[{}] ✅ Commit accepted", device);
                tracing::debug!("[{}] Response: {}", device, response.body);
                true
            }
            Ok(response) => {
                tracing::error!(
                    "[{}] ❌ Commit rejected with status {}",
                    device,
                    response.status
                );
                tracing::debug!("[{}] Response: {}", device, response.body);
                false
            }
            Err(e) => {
                tracing::error!("[{}] ❌ Commit failed: {}", device, e);
                false
            }
        }
    }
}
