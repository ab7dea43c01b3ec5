use std::fmt::Write;

use sfxgen_core::controls::{SliderSpec, CANDIDATE_COUNT, PROMPT_PLACEHOLDER};
use sfxgen_core::{DURATION_CONTROL, EXAMPLE_PROMPTS, GUIDANCE_CONTROL};

use crate::app::PageState;

const TITLE: &str = "Game SFX Generator";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; background: #14161a; color: #e6e6e6; }
h1 { margin-bottom: 0.25rem; }
.columns { display: flex; gap: 2rem; flex-wrap: wrap; }
.column { flex: 1 1 380px; }
label { display: block; margin: 1rem 0 0.25rem; }
textarea { width: 100%; min-height: 4rem; }
input[type=range] { width: 100%; }
button.primary { margin-top: 1.25rem; padding: 0.6rem 1.2rem; font-size: 1rem; }
button:disabled { opacity: 0.6; cursor: progress; }
.examples a { display: block; margin: 0.25rem 0; color: #9cc4ff; }
.error { background: #5a1d1d; padding: 0.75rem; border-radius: 4px; }
audio { width: 100%; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('a.example').forEach(function (link) {
  link.addEventListener('click', function (event) {
    event.preventDefault();
    document.getElementById('prompt').value = link.dataset.prompt;
  });
});
document.getElementById('sfx-form').addEventListener('submit', function (event) {
  var button = event.submitter;
  if (button && button.id === 'generate') {
    button.disabled = true;
    button.textContent = 'Generating…';
  }
});
"#;

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn slider(out: &mut String, spec: &SliderSpec, value: f32) {
    let _ = write!(
        out,
        r#"<label for="{name}">{label}: <output id="{name}-value">{value}</output></label>
<input type="range" id="{name}" name="{name}" min="{min}" max="{max}" step="{step}" value="{value}" oninput="document.getElementById('{name}-value').value = this.value">
"#,
        name = spec.name,
        label = escape_html(spec.label),
        min = spec.min,
        max = spec.max,
        step = spec.step,
        value = value,
    );
}

fn output_panel(out: &mut String, page: &PageState) {
    out.push_str("<h2>Generated sound</h2>\n");
    if let Some(ref message) = page.error {
        let _ = writeln!(
            out,
            r#"<p class="error" role="alert">Generation failed: {}</p>"#,
            escape_html(message)
        );
    }
    match page.output {
        Some(ref clip) => {
            let _ = write!(
                out,
                r#"<audio controls autoplay src="{uri}"></audio>
<p>{duration:.1} s at {rate} Hz &middot; <a href="{uri}" download="sfx.wav">Download WAV</a></p>
"#,
                uri = clip.data_uri,
                duration = clip.duration_secs,
                rate = clip.sample_rate,
            );
        }
        None => out.push_str("<p class=\"empty\">Nothing generated yet.</p>\n"),
    }
}

/// Render the whole page for one request.
pub fn render_page(page: &PageState) -> String {
    let mut out = String::with_capacity(4096);
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{TITLE}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{TITLE}</h1>
<p>Describe a sound in English and generate a game-ready effect.</p>
<div class="columns">
<div class="column">
<form id="sfx-form" method="post" action="/generate">
<label for="prompt">Prompt</label>
<textarea id="prompt" name="prompt" placeholder="{placeholder}">{prompt}</textarea>
"#,
        placeholder = escape_html(PROMPT_PLACEHOLDER),
        prompt = escape_html(&page.form.prompt),
    );

    slider(&mut out, &DURATION_CONTROL, page.form.duration);
    slider(&mut out, &GUIDANCE_CONTROL, page.form.guidance);

    let _ = writeln!(
        out,
        r#"<input type="hidden" name="candidates" value="{CANDIDATE_COUNT}">
<button type="submit" id="generate" class="primary">Generate</button>
<div class="examples">
<h3>Examples</h3>"#
    );
    for (index, example) in EXAMPLE_PROMPTS.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"<a class="example" href="/?example={index}" data-prompt="{text}">{text}</a>"#,
            text = escape_html(example)
        );
    }
    out.push_str("</div>\n</form>\n</div>\n<div class=\"column\">\n");

    output_panel(&mut out, page);

    let _ = write!(
        out,
        "</div>\n</div>\n<script>{SCRIPT}</script>\n</body>\n</html>\n"
    );
    out
}
