//! The inference adapter: one resident pipeline, one operation.
//!
//! [`InferenceAdapter`] owns the initialized engine for the lifetime of the
//! process. Requests are validated, the prompt is augmented, and the engine
//! is invoked under a lock so that concurrent sessions are served one at a
//! time on the device.

use crate::engine_trait::SfxEngine;
use crate::registry::EngineRegistry;
use async_trait::async_trait;
use sfxgen_core::config::{DEFAULT_INFERENCE_STEPS, DEFAULT_SAMPLE_RATE};
use sfxgen_core::{
    augment_prompt, AppConfig, DeviceKind, EngineError, GenerateError, GeneratedAudio,
    GenerationRequest, PipelineCall, QUALITY_SUFFIX,
};
use std::time::Instant;
use tokio::sync::Mutex;

/// Anything that can turn a request into audio.
///
/// The front end only sees this trait, so tests can swap in a stub.
#[async_trait]
pub trait SoundGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAudio, GenerateError>;

    /// Registry name of the engine serving requests.
    fn engine_name(&self) -> &str;

    fn device(&self) -> DeviceKind;
}

/// Fixed, non-user-facing generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterSettings {
    pub num_inference_steps: u32,
    pub sample_rate: u32,
    pub quality_suffix: String,
    pub max_prompt_chars: Option<usize>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            num_inference_steps: DEFAULT_INFERENCE_STEPS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            quality_suffix: QUALITY_SUFFIX.to_string(),
            max_prompt_chars: None,
        }
    }
}

impl AdapterSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            num_inference_steps: config.model.num_inference_steps,
            sample_rate: config.model.sample_rate,
            quality_suffix: config.model.quality_suffix.clone(),
            max_prompt_chars: config.limits.max_prompt_chars,
        }
    }
}

pub struct InferenceAdapter {
    engine: Mutex<Box<dyn SfxEngine>>,
    engine_name: String,
    device: DeviceKind,
    settings: AdapterSettings,
}

impl InferenceAdapter {
    /// Wrap an engine that has already been initialized.
    pub fn new(engine: Box<dyn SfxEngine>, settings: AdapterSettings) -> Self {
        let engine_name = engine.name().to_string();
        let device = engine.device();
        Self {
            engine: Mutex::new(engine),
            engine_name,
            device,
            settings,
        }
    }

    /// Create the named engine and load its pipeline. Any failure here is
    /// a startup failure.
    pub async fn load(
        registry: &EngineRegistry,
        engine_name: &str,
        engine_config: toml::Value,
        settings: AdapterSettings,
    ) -> Result<Self, EngineError> {
        let mut engine = registry.create(engine_name)?;
        engine.initialize(engine_config).await?;
        tracing::info!(
            engine = %engine_name,
            device = %engine.device(),
            steps = settings.num_inference_steps,
            "inference adapter ready"
        );
        Ok(Self::new(engine, settings))
    }

    /// Translate a request into the exact pipeline arguments.
    pub fn pipeline_call(&self, request: &GenerationRequest) -> PipelineCall {
        PipelineCall {
            prompt: augment_prompt(&request.prompt, &self.settings.quality_suffix),
            num_inference_steps: self.settings.num_inference_steps,
            audio_length_in_s: request.duration_secs,
            guidance_scale: request.guidance_scale,
            num_waveforms_per_prompt: request.candidate_count,
        }
    }

    pub async fn shutdown(&self) {
        let engine = self.engine.lock().await;
        if let Err(e) = engine.shutdown().await {
            tracing::warn!(engine = %self.engine_name, "engine shutdown error: {e}");
        }
    }
}

#[async_trait]
impl SoundGenerator for InferenceAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAudio, GenerateError> {
        request.validate(self.settings.max_prompt_chars)?;
        let call = self.pipeline_call(request);

        let started = Instant::now();
        let output = {
            let engine = self.engine.lock().await;
            engine.run(&call).await
        };
        let output = match output {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(
                    engine = %self.engine_name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "generation failed: {e}"
                );
                return Err(e.into());
            }
        };

        if output.sample_rate != self.settings.sample_rate {
            return Err(EngineError::SampleRateMismatch {
                expected: self.settings.sample_rate,
                actual: output.sample_rate,
            }
            .into());
        }

        let candidates = output.audios.len();
        let samples = output
            .audios
            .into_iter()
            .next()
            .ok_or(EngineError::EmptyOutput)?;
        if candidates > 1 {
            tracing::debug!(candidates, "surfacing first candidate only");
        }

        tracing::info!(
            duration_secs = request.duration_secs,
            guidance_scale = request.guidance_scale,
            samples = samples.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generated audio"
        );

        Ok(GeneratedAudio {
            sample_rate: self.settings.sample_rate,
            samples,
        })
    }

    fn engine_name(&self) -> &str {
        &self.engine_name
    }

    fn device(&self) -> DeviceKind {
        self.device
    }
}
