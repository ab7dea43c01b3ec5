use crate::engine_trait::SfxEngine;
use async_trait::async_trait;
use sfxgen_core::config::DEFAULT_SAMPLE_RATE;
use sfxgen_core::{DeviceKind, EngineError, PipelineCall, PipelineOutput};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const TONE_HZ: f64 = 440.0;
const TONE_AMPLITUDE: f32 = 0.1;

/// Engine that synthesizes a quiet sine tone instead of running a model.
///
/// Every call it receives is kept, so callers can inspect exactly what a real
/// pipeline would have been asked to do.
pub struct NullEngine {
    sample_rate: u32,
    run_count: AtomicUsize,
    calls: Mutex<Vec<PipelineCall>>,
}

impl NullEngine {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            run_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::Relaxed)
    }

    pub fn calls(&self) -> Vec<PipelineCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn synthesize(&self, length_secs: f32) -> Vec<f32> {
        let len = (length_secs as f64 * self.sample_rate as f64).round() as usize;
        let step = std::f64::consts::TAU * TONE_HZ / self.sample_rate as f64;
        (0..len)
            .map(|i| (i as f64 * step).sin() as f32 * TONE_AMPLITUDE)
            .collect()
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SfxEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), EngineError> {
        if let Some(rate) = config.get("sample_rate").and_then(|v| v.as_integer()) {
            self.sample_rate = u32::try_from(rate)
                .ok()
                .filter(|r| *r > 0)
                .ok_or_else(|| {
                    EngineError::InitializationFailed(format!("invalid sample_rate {rate}"))
                })?;
        }
        tracing::info!(
            model_id = ?config.get("model_id").and_then(|v| v.as_str()),
            sample_rate = self.sample_rate,
            "NullEngine initialized (no model loaded)"
        );
        Ok(())
    }

    fn device(&self) -> DeviceKind {
        DeviceKind::Cpu
    }

    async fn run(&self, call: &PipelineCall) -> Result<PipelineOutput, EngineError> {
        let count = self.run_count.fetch_add(1, Ordering::Relaxed) + 1;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.clone());
        }

        let audios = (0..call.num_waveforms_per_prompt)
            .map(|_| self.synthesize(call.audio_length_in_s))
            .collect();
        tracing::trace!("NullEngine run #{count}: {:?}", call.prompt);

        Ok(PipelineOutput {
            sample_rate: self.sample_rate,
            audios,
        })
    }

    async fn shutdown(&self) -> Result<(), EngineError> {
        Ok(())
    }
}
