//! Scripted `DeviceApi` used by the core unit tests.

use crate::domain::model::{ApiResponse, Device};
use crate::domain::ports::DeviceApi;
use crate::utils::error::{Result, TaggerError};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    Transport,
}

type Script = Box<dyn Fn(&Device, &str) -> Reply + Send + Sync>;

pub struct ScriptedApi {
    script: Script,
    calls: Mutex<Vec<(Device, String)>>,
}

impl ScriptedApi {
    pub fn new(script: impl Fn(&Device, &str) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: Reply) -> Self {
        Self::new(move |_, _| reply)
    }

    pub fn calls_for(&self, device: &Device) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| d == device)
            .map(|(_, q)| q.clone())
            .collect()
    }

    pub fn tag_calls_for(&self, device: &Device) -> usize {
        self.calls_for(device)
            .iter()
            .filter(|q| q.starts_with("type=config"))
            .count()
    }

    pub fn commit_calls_for(&self, device: &Device) -> usize {
        self.calls_for(device)
            .iter()
            .filter(|q| q.starts_with("type=commit"))
            .count()
    }
}

#[async_trait]
impl DeviceApi for ScriptedApi {
    async fn invoke(&self, device: &Device, query: &str) -> Result<ApiResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((device.clone(), query.to_string()));

        match (self.script)(device, query) {
            Reply::Status(status) => Ok(ApiResponse {
                status,
                body: String::new(),
            }),
            Reply::Transport => Err(TaggerError::TransportError {
                device: device.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}
