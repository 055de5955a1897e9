use crate::domain::model::{CommitStatus, DeviceResult, FleetReport};
use crate::utils::error::Result;
use std::path::Path;

pub fn summary_line(result: &DeviceResult) -> String {
    let status = if result.unreachable {
        "❌ unreachable".to_string()
    } else {
        match result.commit {
            CommitStatus::Succeeded => "✅ committed".to_string(),
            CommitStatus::Failed => "⚠️ commit failed".to_string(),
            CommitStatus::NotAttempted => "⏭️ nothing to commit".to_string(),
        }
    };

    format!(
        "{}: {} tags handled ({} rejected) - {}",
        result.device, result.created, result.rejected, status
    )
}

pub fn write_json(path: &Path, report: &FleetReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json_data = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json_data)?;
    tracing::debug!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Device;
    use tempfile::TempDir;

    fn committed() -> DeviceResult {
        let mut result = DeviceResult::new(Device::new("fw01"));
        result.tags_attempted = 2;
        result.created = 2;
        result.commit = CommitStatus::Succeeded;
        result
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(&committed()),
            "fw01: 2 tags handled (0 rejected) - ✅ committed"
        );

        let mut down = DeviceResult::new(Device::new("fw02"));
        down.unreachable = true;
        assert!(summary_line(&down).contains("unreachable"));
    }

    #[test]
    fn test_write_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("run.json");
        let report = FleetReport {
            devices: vec![committed()],
        };

        write_json(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["devices"][0]["device"], "fw01");
        assert_eq!(value["devices"][0]["created"], 2);
        assert_eq!(value["devices"][0]["commit"], "succeeded");
    }
}
