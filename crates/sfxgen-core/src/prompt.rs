/// Appended to every user prompt to bias the model towards clean output.
pub const QUALITY_SUFFIX: &str = "high quality, high fidelity, clear sound";

/// Build the prompt the pipeline actually sees.
///
/// An empty suffix leaves the prompt untouched.
pub fn augment_prompt(prompt: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return prompt.to_string();
    }
    format!("{prompt}, {suffix}")
}
