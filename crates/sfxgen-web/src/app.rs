use sfxgen_core::controls::{example_prompt, SliderSpec};
use sfxgen_core::{GenerationRequest, DURATION_CONTROL, GUIDANCE_CONTROL};

use crate::wav::AudioClip;

/// Current values of the input controls.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub prompt: String,
    pub duration: f32,
    pub guidance: f32,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            duration: DURATION_CONTROL.default,
            guidance: GUIDANCE_CONTROL.default,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    None,
    Generate(GenerationRequest),
}

impl FormState {
    /// Build a form from raw field values, falling back to the control
    /// defaults for anything missing or unparseable.
    pub fn prefill(prompt: Option<&str>, duration: Option<&str>, guidance: Option<&str>) -> Self {
        Self {
            prompt: prompt.unwrap_or_default().to_string(),
            duration: parse_control(duration, &DURATION_CONTROL).unwrap_or(DURATION_CONTROL.default),
            guidance: parse_control(guidance, &GUIDANCE_CONTROL).unwrap_or(GUIDANCE_CONTROL.default),
        }
    }

    /// Replace the prompt with a preset. Slider values are kept and nothing
    /// is generated. Unknown indices leave the form untouched.
    pub fn select_example(&mut self, index: usize) -> PageAction {
        if let Some(example) = example_prompt(index) {
            self.prompt = example.to_string();
        }
        PageAction::None
    }

    /// The request a submit produces. The candidate count is always the
    /// fixed hidden value, whatever the client sent.
    pub fn submit(&self) -> PageAction {
        PageAction::Generate(GenerationRequest::new(
            self.prompt.clone(),
            self.duration,
            self.guidance,
        ))
    }
}

/// Parse one numeric field. Empty or missing means the control default.
pub fn parse_control(raw: Option<&str>, spec: &SliderSpec) -> Result<f32, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(spec.default),
        Some(text) => text
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("{} must be a number, got {text:?}", spec.name)),
    }
}

/// Everything one page render needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub form: FormState,
    pub output: Option<AudioClip>,
    pub error: Option<String>,
}

impl PageState {
    pub fn new(form: FormState) -> Self {
        Self {
            form,
            output: None,
            error: None,
        }
    }

    /// Bind the outcome of a generation. A failure clears any prior output.
    pub fn finish(&mut self, outcome: Result<AudioClip, String>) {
        match outcome {
            Ok(clip) => {
                self.output = Some(clip);
                self.error = None;
            }
            Err(message) => {
                self.output = None;
                self.error = Some(message);
            }
        }
    }
}
