use crate::config::settings::Settings;
use crate::core::client::PanClient;
use crate::core::commit::Committer;
use crate::core::orchestrator::{CommitGate, DeviceOrchestrator};
use crate::core::tag::TagCreator;
use crate::domain::model::{Credential, Device, DeviceResult, FleetReport, TagSet};
use crate::domain::ports::DeviceApi;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Runs one orchestrator task per device and waits for all of them.
pub struct FleetDispatcher<A: DeviceApi> {
    orchestrator: Arc<DeviceOrchestrator<A>>,
}

impl FleetDispatcher<PanClient> {
    /// Wires the HTTP client and operations from the loaded settings.
    pub fn connect(credential: Credential, tags: TagSet, settings: &Settings) -> Result<Self> {
        let api = Arc::new(PanClient::new(Arc::new(credential), &settings.transport)?);
        let gate = if settings.commit.require_verified {
            CommitGate::VerifiedOnly
        } else {
            CommitGate::AnyHandled
        };

        Ok(Self::new(DeviceOrchestrator::new(
            TagCreator::new(
                Arc::clone(&api),
                settings.retry.policy(),
                settings.tags.xpath.clone(),
            ),
            Committer::new(api, &settings.commit.description),
            Arc::new(tags),
            gate,
        )))
    }
}

impl<A: DeviceApi + 'static> FleetDispatcher<A> {
    pub fn new(orchestrator: DeviceOrchestrator<A>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Results come back in the same order as `devices`.
    pub async fn run(&self, devices: &[Device]) -> FleetReport {
        tracing::info!("🚀 Dispatching {} devices", devices.len());

        let mut tasks = JoinSet::new();
        for (index, device) in devices.iter().cloned().enumerate() {
            let orchestrator = Arc::clone(&self.orchestrator);
            tasks.spawn(async move { (index, orchestrator.run(device).await) });
        }

        let mut slots: Vec<Option<DeviceResult>> = vec![None; devices.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(result);
                    }
                }
                Err(e) => tracing::error!("❌ Device task aborted: {}", e),
            }
        }

        // 任務 panic 時沒有結果，視為無法連線
        let results = slots
            .into_iter()
            .zip(devices)
            .map(|(slot, device)| {
                slot.unwrap_or_else(|| {
                    let mut result = DeviceResult::new(device.clone());
                    result.unreachable = true;
                    result
                })
            })
            .collect();

        let report = FleetReport { devices: results };
        tracing::info!(
            "Fleet finished: {} tags handled, {}/{} devices committed, {} unreachable",
            report.total_created(),
            report.committed_devices(),
            report.devices.len(),
            report.unreachable_devices()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{Reply, ScriptedApi};
    use crate::core::retry::RetryPolicy;
    use crate::domain::model::CommitStatus;

    fn dispatcher(api: &Arc<ScriptedApi>, tags: &[&str]) -> FleetDispatcher<ScriptedApi> {
        FleetDispatcher::new(DeviceOrchestrator::new(
            TagCreator::new(Arc::clone(api), RetryPolicy::default(), "/config/shared/tag"),
            Committer::new(Arc::clone(api), "test commit"),
            Arc::new(tags.iter().copied().collect()),
            CommitGate::AnyHandled,
        ))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failing_device_does_not_affect_healthy_one() {
        let down = Device::new("fw-down");
        let up = Device::new("fw-up");
        let down_for_script = down.clone();
        let api = Arc::new(ScriptedApi::new(move |device, _| {
            if *device == down_for_script {
                Reply::Transport
            } else {
                Reply::Status(200)
            }
        }));

        let report = dispatcher(&api, &["prod", "staging"])
            .run(&[down.clone(), up.clone()])
            .await;

        assert_eq!(report.devices.len(), 2);
        assert_eq!(report.devices[0].device, down);
        assert!(report.devices[0].unreachable);
        assert_eq!(report.devices[0].commit, CommitStatus::NotAttempted);
        assert_eq!(api.tag_calls_for(&down), 3);
        assert_eq!(api.commit_calls_for(&down), 0);

        assert_eq!(report.devices[1].device, up);
        assert_eq!(report.devices[1].created, 2);
        assert!(report.devices[1].committed());
        assert_eq!(api.tag_calls_for(&up), 2);
        assert_eq!(api.commit_calls_for(&up), 1);
    }

    #[tokio::test]
    async fn test_each_device_attempts_full_tag_set_and_commits_once() {
        let api = Arc::new(ScriptedApi::always(Reply::Status(200)));
        let devices: Vec<Device> = (1..=4).map(|i| Device::new(format!("fw{:02}", i))).collect();

        let report = dispatcher(&api, &["prod", "staging", "dev"]).run(&devices).await;

        assert_eq!(report.committed_devices(), 4);
        for device in &devices {
            assert_eq!(api.tag_calls_for(device), 3);
            assert_eq!(api.commit_calls_for(device), 1);
        }
    }

    #[tokio::test]
    async fn test_tags_are_attempted_in_order_per_device() {
        let api = Arc::new(ScriptedApi::always(Reply::Status(200)));
        let device = Device::new("fw01");

        dispatcher(&api, &["alpha", "beta", "gamma"])
            .run(std::slice::from_ref(&device))
            .await;

        let calls = api.calls_for(&device);
        assert!(calls[0].contains("%27alpha%27"));
        assert!(calls[1].contains("%27beta%27"));
        assert!(calls[2].contains("%27gamma%27"));
        assert!(calls[3].starts_with("type=commit"));
    }

    #[tokio::test]
    async fn test_empty_fleet() {
        let api = Arc::new(ScriptedApi::always(Reply::Status(200)));
        let report = dispatcher(&api, &["prod"]).run(&[]).await;
        assert!(report.devices.is_empty());
        assert!(!report.all_unreachable());
    }
}
