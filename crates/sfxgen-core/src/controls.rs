//! Front-end control definitions.
//!
//! These are the single source of truth for slider ranges: the page renders
//! them and the adapter validates against them.

use serde::Serialize;

/// A numeric slider with an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl SliderSpec {
    /// `false` for NaN and anything outside `[min, max]`.
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const DURATION_CONTROL: SliderSpec = SliderSpec {
    name: "duration",
    label: "Duration (seconds)",
    min: 1.0,
    max: 10.0,
    step: 0.5,
    default: 5.0,
};

pub const GUIDANCE_CONTROL: SliderSpec = SliderSpec {
    name: "guidance",
    label: "Prompt adherence (guidance scale)",
    min: 0.0,
    max: 5.0,
    step: 0.5,
    default: 2.5,
};

/// Number of candidates requested per prompt. Hidden from the user.
pub const CANDIDATE_COUNT: u32 = 1;

pub const PROMPT_PLACEHOLDER: &str = "e.g. Laser gun shot, heavy sci-fi weapon";

pub const EXAMPLE_PROMPTS: [&str; 5] = [
    "Laser gun shot, sci-fi, pew pew sound",
    "Heavy stone door opening in a dungeon",
    "Collecting a gold coin, retro game style",
    "Footsteps on gravel, slow walking",
    "Magic spell casting, sparkles, chime",
];

pub fn example_prompt(index: usize) -> Option<&'static str> {
    EXAMPLE_PROMPTS.get(index).copied()
}

/// Everything a client needs to draw the controls.
#[derive(Debug, Clone, Serialize)]
pub struct ControlsDescription {
    pub prompt_placeholder: &'static str,
    pub duration: SliderSpec,
    pub guidance: SliderSpec,
    pub candidate_count: u32,
    pub examples: &'static [&'static str],
}

pub fn describe_controls() -> ControlsDescription {
    ControlsDescription {
        prompt_placeholder: PROMPT_PLACEHOLDER,
        duration: DURATION_CONTROL,
        guidance: GUIDANCE_CONTROL,
        candidate_count: CANDIDATE_COUNT,
        examples: &EXAMPLE_PROMPTS,
    }
}
