use crate::core::query::set_tag_query;
use crate::core::retry::RetryPolicy;
use crate::domain::model::{Device, TagOutcome};
use crate::domain::ports::DeviceApi;
use std::sync::Arc;

/// Creates one tag on one device, retrying transport failures per policy.
pub struct TagCreator<A: DeviceApi> {
    api: Arc<A>,
    policy: RetryPolicy,
    xpath: String,
}

impl<A: DeviceApi> TagCreator<A> {
    pub fn new(api: Arc<A>, policy: RetryPolicy, xpath: impl Into<String>) -> Self {
        Self {
            api,
            policy,
            xpath: xpath.into(),
        }
    }

    pub async fn create_tag(&self, device: &Device, tag: &str) -> TagOutcome {
        let query = set_tag_query(&self.xpath, tag);
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::info!(
                "[{}] Creating tag '{}' (attempt {}/{})",
                device,
                tag,
                attempt,
                max_attempts
            );

            match self.api.invoke(device, &query).await {
                Ok(response) if response.is_success() => {
                    tracing::info!("[{}] ✅ Tag '{}' created", device, tag);
                    tracing::debug!("[{}] Response: {}", device, response.body);
                    return TagOutcome::Created;
                }
                Ok(response) => {
                    // 設備可連線但拒絕此 tag，不影響其他 tag
                    tracing::warn!(
                        "[{}] ⚠️ Tag '{}' rejected with status {}",
                        device,
                        tag,
                        response.status
                    );
                    tracing::debug!("[{}] Response: {}", device, response.body);
                    return TagOutcome::RejectedByServer(response.status);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!("[{}] {}, retrying", device, e);
                    let delay = self.policy.delay_before_retry(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "[{}] ❌ Giving up on tag '{}' after {} attempts: {}",
                        device,
                        tag,
                        attempt,
                        e
                    );
                    return TagOutcome::Unreachable;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{Reply, ScriptedApi};
    use crate::core::retry::Backoff;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn creator(api: &Arc<ScriptedApi>) -> TagCreator<ScriptedApi> {
        TagCreator::new(Arc::clone(api), RetryPolicy::default(), "/config/shared/tag")
    }

    #[tokio::test]
    async fn test_created_on_200() {
        let api = Arc::new(ScriptedApi::always(Reply::Status(200)));
        let device = Device::new("fw01");

        let outcome = creator(&api).create_tag(&device, "prod").await;

        assert_eq!(outcome, TagOutcome::Created);
        assert_eq!(api.tag_calls_for(&device), 1);
    }

    #[tokio::test]
    async fn test_rejection_is_handled_without_retry() {
        let api = Arc::new(ScriptedApi::always(Reply::Status(500)));
        let device = Device::new("fw01");

        let outcome = creator(&api).create_tag(&device, "prod").await;

        assert_eq!(outcome, TagOutcome::RejectedByServer(500));
        assert!(outcome.is_handled());
        assert_eq!(api.tag_calls_for(&device), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_exhausts_exactly_three_attempts() {
        let api = Arc::new(ScriptedApi::always(Reply::Transport));
        let device = Device::new("fw01");

        let outcome = creator(&api).create_tag(&device, "prod").await;

        assert_eq!(outcome, TagOutcome::Unreachable);
        assert_eq!(api.tag_calls_for(&device), 3);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let failures = AtomicU32::new(0);
        let api = Arc::new(ScriptedApi::new(move |_, _| {
            if failures.fetch_add(1, Ordering::SeqCst) < 2 {
                Reply::Transport
            } else {
                Reply::Status(200)
            }
        }));
        let device = Device::new("fw01");

        let outcome = creator(&api).create_tag(&device, "prod").await;

        assert_eq!(outcome, TagOutcome::Created);
        assert_eq!(api.tag_calls_for(&device), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_backoff_waits_between_attempts() {
        let api = Arc::new(ScriptedApi::always(Reply::Transport));
        let device = Device::new("fw01");
        let creator = TagCreator::new(
            Arc::clone(&api),
            RetryPolicy::new(2, Backoff::Fixed(Duration::from_secs(5))),
            "/config/shared/tag",
        );

        let started = tokio::time::Instant::now();
        let outcome = creator.create_tag(&device, "prod").await;

        assert_eq!(outcome, TagOutcome::Unreachable);
        assert_eq!(api.tag_calls_for(&device), 2);
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_ampersand_tag_is_escaped_in_query() {
        let api = Arc::new(ScriptedApi::always(Reply::Status(200)));
        let device = Device::new("fw01");

        creator(&api).create_tag(&device, "R&D").await;

        let calls = api.calls_for(&device);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].matches("%26amp;").count(), 1);
    }
}
