use crate::config::settings::TransportSettings;
use crate::domain::model::{ApiResponse, Credential, Device};
use crate::domain::ports::DeviceApi;
use crate::utils::error::{Result, TaggerError};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

/// HTTP client for the PAN-OS XML API.
///
/// A single instance is shared by every device task; `reqwest::Client` pools
/// connections internally and carries no per-request state.
pub struct PanClient {
    client: Client,
    credential: Arc<Credential>,
    scheme: String,
}

impl PanClient {
    pub fn new(credential: Arc<Credential>, transport: &TransportSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(transport.timeout())
            .danger_accept_invalid_certs(transport.accept_invalid_certs)
            .user_agent(concat!("panos-tagger/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if transport.accept_invalid_certs {
            tracing::debug!("TLS certificate verification disabled");
        }

        Ok(Self {
            client,
            credential,
            scheme: transport.scheme.clone(),
        })
    }

    fn request_url(&self, device: &Device, query: &str) -> String {
        format!(
            "{}://{}/api/?key={}&{}",
            self.scheme,
            device.address(),
            self.credential.api_key(),
            query
        )
    }
}

// reqwest 的錯誤訊息會帶完整 URL（含 API key），一律先去掉
fn describe_transport_error(err: reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    let err = err.without_url();
    match std::error::Error::source(&err) {
        Some(source) => format!("{}: {}", kind, source),
        None => format!("{}: {}", kind, err),
    }
}

#[async_trait]
impl DeviceApi for PanClient {
    async fn invoke(&self, device: &Device, query: &str) -> Result<ApiResponse> {
        let url = self.request_url(device, query);

        let response = self.client.get(&url).send().await.map_err(|e| {
            TaggerError::TransportError {
                device: device.to_string(),
                message: describe_transport_error(e),
            }
        })?;

        let status = response.status().as_u16();
        tracing::debug!("[{}] API response status: {}", device, status);

        // 回應內容只用於除錯，讀取失敗不影響結果
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(
                    "[{}] Failed to read response body: {}",
                    device,
                    e.without_url()
                );
                String::new()
            }
        };

        Ok(ApiResponse { status, body })
    }
}
