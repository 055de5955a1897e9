use crate::core::commit::Committer;
use crate::core::tag::TagCreator;
use crate::domain::model::{CommitStatus, Device, DeviceResult, TagOutcome, TagSet};
use crate::domain::ports::DeviceApi;
use std::sync::Arc;

/// When a device has earned a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitGate {
    /// Any tag the device handled, rejections included.
    #[default]
    AnyHandled,
    /// Only tags the device accepted with status 200.
    VerifiedOnly,
}

impl CommitGate {
    fn allows(self, result: &DeviceResult) -> bool {
        match self {
            CommitGate::AnyHandled => result.created > 0,
            CommitGate::VerifiedOnly => result.verified() > 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceState {
    Idle,
    CreatingTags,
    Committing,
    Done,
}

/// Runs the full tag list against one device, then commits if warranted.
pub struct DeviceOrchestrator<A: DeviceApi> {
    creator: TagCreator<A>,
    committer: Committer<A>,
    tags: Arc<TagSet>,
    gate: CommitGate,
}

impl<A: DeviceApi> DeviceOrchestrator<A> {
    pub fn new(
        creator: TagCreator<A>,
        committer: Committer<A>,
        tags: Arc<TagSet>,
        gate: CommitGate,
    ) -> Self {
        Self {
            creator,
            committer,
            tags,
            gate,
        }
    }

    pub async fn run(&self, device: Device) -> DeviceResult {
        let mut result = DeviceResult::new(device.clone());
        let mut state = DeviceState::Idle;

        transition(&device, &mut state, DeviceState::CreatingTags);
        for tag in self.tags.iter() {
            result.tags_attempted += 1;
            let outcome = self.creator.create_tag(&device, tag).await;
            if !outcome.is_handled() {
                result.unreachable = true;
                break;
            }
            result.created += 1;
            if let TagOutcome::RejectedByServer(_) = outcome {
                result.rejected += 1;
            }
        }

        if result.unreachable {
            tracing::warn!(
                "[{}] Device unreachable, skipped {} remaining tags",
                device,
                self.tags.len() - result.tags_attempted
            );
        } else if self.gate.allows(&result) {
            transition(&device, &mut state, DeviceState::Committing);
            result.commit = if self.committer.commit(&device).await {
                CommitStatus::Succeeded
            } else {
                CommitStatus::Failed
            };
        } else {
            tracing::info!("[{}] No tags applied, skipping commit", device);
        }

        transition(&device, &mut state, DeviceState::Done);
        tracing::info!(
            "[{}] Finished: {}/{} tags handled ({} rejected), commit {:?}",
            device,
            result.created,
            self.tags.len(),
            result.rejected,
            result.commit
        );
        result
    }
}

fn transition(device: &Device, state: &mut DeviceState, next: DeviceState) {
    tracing::debug!("[{}] {:?} -> {:?}", device, state, next);
    *state = next;
}
