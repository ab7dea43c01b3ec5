use crate::controls::{CANDIDATE_COUNT, DURATION_CONTROL, GUIDANCE_CONTROL};
use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One submit from the front end. Built fresh per action.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub duration_secs: f32,
    pub guidance_scale: f32,
    pub candidate_count: u32,
}

impl GenerationRequest {
    /// Request with the hidden candidate count fixed at 1.
    pub fn new(prompt: impl Into<String>, duration_secs: f32, guidance_scale: f32) -> Self {
        Self {
            prompt: prompt.into(),
            duration_secs,
            guidance_scale,
            candidate_count: CANDIDATE_COUNT,
        }
    }

    pub fn validate(&self, max_prompt_chars: Option<usize>) -> Result<(), RequestError> {
        if !DURATION_CONTROL.contains(self.duration_secs) {
            return Err(RequestError::DurationOutOfRange(
                self.duration_secs,
                DURATION_CONTROL.min,
                DURATION_CONTROL.max,
            ));
        }
        if !GUIDANCE_CONTROL.contains(self.guidance_scale) {
            return Err(RequestError::GuidanceOutOfRange(
                self.guidance_scale,
                GUIDANCE_CONTROL.min,
                GUIDANCE_CONTROL.max,
            ));
        }
        if self.candidate_count == 0 {
            return Err(RequestError::InvalidCandidateCount(self.candidate_count));
        }
        if let Some(limit) = max_prompt_chars {
            let len = self.prompt.chars().count();
            if len > limit {
                return Err(RequestError::PromptTooLong(len, limit));
            }
        }
        Ok(())
    }
}

/// The waveform surfaced to the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAudio {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl GeneratedAudio {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Exact arguments handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineCall {
    pub prompt: String,
    pub num_inference_steps: u32,
    pub audio_length_in_s: f32,
    pub guidance_scale: f32,
    pub num_waveforms_per_prompt: u32,
}

/// Everything the pipeline returned for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub sample_rate: u32,
    pub audios: Vec<Vec<f32>>,
}

/// Configured device choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cuda,
    Cpu,
}

impl DevicePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevicePreference::Auto => "auto",
            DevicePreference::Cuda => "cuda",
            DevicePreference::Cpu => "cpu",
        }
    }
}

/// Device the pipeline ended up bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Cuda,
    #[default]
    Cpu,
}

impl DeviceKind {
    pub fn is_cpu(&self) -> bool {
        matches!(self, DeviceKind::Cpu)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Cuda => write!(f, "cuda"),
            DeviceKind::Cpu => write!(f, "cpu"),
        }
    }
}
