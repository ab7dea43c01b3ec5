//! Engine backed by an out-of-process pipeline host.
//!
//! The host owns the actual diffusion pipeline (text encoder, sampler,
//! vocoder) and speaks JSON over HTTP:
//!
//! - `POST {endpoint}/load` `{"model_id", "device"}` → `{"device"}`
//! - `POST {endpoint}/generate` [`PipelineCall`] → [`PipelineOutput`]

use crate::engine_trait::SfxEngine;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sfxgen_core::{DeviceKind, EngineError, PipelineCall, PipelineOutput};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct LoadRequest<'a> {
    model_id: &'a str,
    device: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    device: DeviceKind,
}

pub struct RemoteEngine {
    client: Option<reqwest::Client>,
    endpoint: Option<String>,
    model_id: Option<String>,
    device: DeviceKind,
}

impl RemoteEngine {
    pub fn new() -> Self {
        Self {
            client: None,
            endpoint: None,
            model_id: None,
            device: DeviceKind::Cpu,
        }
    }

    fn connection(&self) -> Result<(&reqwest::Client, &str), EngineError> {
        match (self.client.as_ref(), self.endpoint.as_deref()) {
            (Some(client), Some(endpoint)) => Ok((client, endpoint)),
            _ => Err(EngineError::InferenceFailed("not initialized".to_string())),
        }
    }
}

impl Default for RemoteEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, EngineError> {
    let mut builder = reqwest::Client::builder()
        .no_proxy()
        .user_agent(format!("sfxgen/{}", env!("CARGO_PKG_VERSION")));

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| {
        EngineError::InitializationFailed(format!("failed to build HTTP client: {e}"))
    })
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => format!("{status}: {}", body.trim()),
        _ => status.to_string(),
    }
}

#[async_trait]
impl SfxEngine for RemoteEngine {
    fn name(&self) -> &str {
        "remote"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), EngineError> {
        let endpoint = config
            .get("endpoint")
            .and_then(|v| v.as_str())
            .map(|s| s.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                EngineError::InitializationFailed(
                    "missing 'endpoint' in remote engine config".to_string(),
                )
            })?;
        let model_id = config
            .get("model_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::InitializationFailed("missing 'model_id' in engine config".to_string())
            })?
            .to_string();
        let device = config
            .get("device")
            .and_then(|v| v.as_str())
            .unwrap_or("auto")
            .to_string();
        let timeout = config
            .get("timeout_secs")
            .and_then(|v| v.as_integer())
            .and_then(|secs| u64::try_from(secs).ok())
            .map(Duration::from_secs);

        let client = build_client(timeout)?;

        tracing::info!(
            endpoint = %endpoint,
            model_id = %model_id,
            device = %device,
            "loading pipeline on remote host"
        );

        let response = client
            .post(format!("{endpoint}/load"))
            .json(&LoadRequest {
                model_id: &model_id,
                device: &device,
            })
            .send()
            .await
            .map_err(|e| {
                EngineError::InitializationFailed(format!("pipeline host unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(EngineError::InitializationFailed(format!(
                "failed to load '{model_id}': {}",
                error_body(response).await
            )));
        }

        let loaded: LoadResponse = response.json().await.map_err(|e| {
            EngineError::InitializationFailed(format!("malformed load response: {e}"))
        })?;

        tracing::info!(device = %loaded.device, "pipeline loaded");

        self.device = loaded.device;
        self.client = Some(client);
        self.endpoint = Some(endpoint);
        self.model_id = Some(model_id);
        Ok(())
    }

    fn device(&self) -> DeviceKind {
        self.device
    }

    async fn run(&self, call: &PipelineCall) -> Result<PipelineOutput, EngineError> {
        let (client, endpoint) = self.connection()?;

        let response = client
            .post(format!("{endpoint}/generate"))
            .json(call)
            .send()
            .await
            .map_err(|e| EngineError::InferenceFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::InferenceFailed(error_body(response).await));
        }

        response
            .json::<PipelineOutput>()
            .await
            .map_err(|e| EngineError::InferenceFailed(format!("malformed pipeline output: {e}")))
    }

    async fn shutdown(&self) -> Result<(), EngineError> {
        tracing::debug!(model_id = ?self.model_id, "releasing remote pipeline handle");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(entries: &[(&str, toml::Value)]) -> toml::Value {
        let mut table = toml::map::Map::new();
        for (k, v) in entries {
            table.insert(k.to_string(), v.clone());
        }
        toml::Value::Table(table)
    }

    #[test]
    fn test_remote_engine_name() {
        let engine = RemoteEngine::new();
        assert_eq!(engine.name(), "remote");
    }

    #[tokio::test]
    async fn test_remote_engine_initialize_missing_endpoint_fails() {
        let mut engine = RemoteEngine::new();
        let config = config_with(&[(
            "model_id",
            toml::Value::String("cvssp/audioldm-s-full-v2".into()),
        )]);
        match engine.initialize(config).await {
            Err(EngineError::InitializationFailed(msg)) => assert!(msg.contains("endpoint")),
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[tokio::test]
    async fn test_remote_engine_initialize_missing_model_id_fails() {
        let mut engine = RemoteEngine::new();
        let config = config_with(&[(
            "endpoint",
            toml::Value::String("http://127.0.0.1:9".into()),
        )]);
        match engine.initialize(config).await {
            Err(EngineError::InitializationFailed(msg)) => assert!(msg.contains("model_id")),
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[tokio::test]
    async fn test_remote_engine_run_before_initialize_fails() {
        let engine = RemoteEngine::new();
        let call = PipelineCall {
            prompt: "x".into(),
            num_inference_steps: 20,
            audio_length_in_s: 1.0,
            guidance_scale: 0.0,
            num_waveforms_per_prompt: 1,
        };
        match engine.run(&call).await {
            Err(EngineError::InferenceFailed(msg)) => assert!(msg.contains("not initialized")),
            _ => panic!("expected InferenceFailed"),
        }
    }

    #[test]
    fn test_load_request_json_shape() {
        let body = serde_json::to_value(LoadRequest {
            model_id: "cvssp/audioldm-s-full-v2",
            device: "auto",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model_id": "cvssp/audioldm-s-full-v2", "device": "auto"})
        );
    }

    #[test]
    fn test_load_response_parses_device() {
        let parsed: LoadResponse = serde_json::from_str(r#"{"device": "cuda"}"#).unwrap();
        assert_eq!(parsed.device, DeviceKind::Cuda);
    }

    #[test]
    fn test_remote_engine_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RemoteEngine>();
    }
}
