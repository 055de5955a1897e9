use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::fmt;

/// PAN-OS API key. Loaded once and shared read-only for the whole run.
pub struct Credential {
    api_key: SecretString,
}

impl Credential {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Management address of one firewall, `host` or `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Device(String);

impl Device {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn address(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered tag names; every device attempts them in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new(tags: Vec<String>) -> Self {
        Self { tags }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// HTTP exchange that completed, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Result of creating one tag on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Created,
    /// 設備有回應但狀態碼不是 200，不重試
    RejectedByServer(u16),
    /// 重試次數用完仍連不上設備
    Unreachable,
}

impl TagOutcome {
    /// A reachable device handled the request, whether or not it accepted it.
    pub fn is_handled(self) -> bool {
        !matches!(self, TagOutcome::Unreachable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStatus {
    NotAttempted,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceResult {
    pub device: Device,
    pub tags_attempted: usize,
    /// Tags the device handled, including application-level rejections.
    pub created: usize,
    pub rejected: usize,
    pub unreachable: bool,
    pub commit: CommitStatus,
}

impl DeviceResult {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            tags_attempted: 0,
            created: 0,
            rejected: 0,
            unreachable: false,
            commit: CommitStatus::NotAttempted,
        }
    }

    pub fn committed(&self) -> bool {
        self.commit == CommitStatus::Succeeded
    }

    /// Tags the device accepted with status 200.
    pub fn verified(&self) -> usize {
        self.created - self.rejected
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FleetReport {
    pub devices: Vec<DeviceResult>,
}

impl FleetReport {
    pub fn total_created(&self) -> usize {
        self.devices.iter().map(|d| d.created).sum()
    }

    pub fn committed_devices(&self) -> usize {
        self.devices.iter().filter(|d| d.committed()).count()
    }

    pub fn unreachable_devices(&self) -> usize {
        self.devices.iter().filter(|d| d.unreachable).count()
    }

    pub fn all_unreachable(&self) -> bool {
        !self.devices.is_empty() && self.unreachable_devices() == self.devices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("LUFRPT1secret");
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("LUFRPT1secret"));
        assert_eq!(credential.api_key(), "LUFRPT1secret");
    }

    #[test]
    fn test_tag_outcome_handled() {
        assert!(TagOutcome::Created.is_handled());
        assert!(TagOutcome::RejectedByServer(500).is_handled());
        assert!(!TagOutcome::Unreachable.is_handled());
    }

    #[test]
    fn test_fleet_report_totals() {
        let mut a = DeviceResult::new(Device::new("fw01"));
        a.created = 2;
        a.commit = CommitStatus::Succeeded;
        let mut b = DeviceResult::new(Device::new("fw02"));
        b.unreachable = true;

        let report = FleetReport {
            devices: vec![a, b],
        };
        assert_eq!(report.total_created(), 2);
        assert_eq!(report.committed_devices(), 1);
        assert_eq!(report.unreachable_devices(), 1);
        assert!(!report.all_unreachable());
    }
}
