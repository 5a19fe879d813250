use regex::Regex;
use std::sync::LazyLock;

use crate::errors::PlannerError;
use crate::wire::LessonPlan;

static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+-]*[^\S\n]*\n?(.*?)\s*```\z").expect("valid regex")
});

static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A```[A-Za-z0-9_+-]*[^\S\n]*\n?").expect("valid regex"));

/// Remove a markdown code fence wrapping the model output, tolerating
/// surrounding whitespace, any language tag and a missing closing fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(c) = FENCED.captures(trimmed) {
        if let Some(body) = c.get(1) {
            return body.as_str().trim();
        }
    }
    let body = match OPEN_FENCE.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse model output into a lesson plan. Falls back to the balanced `{...}`
/// objects in the stripped text, in order, when it carries stray prose.
pub fn parse_lesson_plan(text: &str) -> Result<LessonPlan, PlannerError> {
    let body = strip_code_fence(text);
    let first = match serde_json::from_str::<LessonPlan>(body) {
        Ok(plan) => return Ok(plan),
        Err(e) => e,
    };

    let mut from = 0;
    while let Some(offset) = body[from..].find('{') {
        let start = from + offset;
        match balanced_object(&body[start..]) {
            Some(obj) => {
                if obj.len() != body.len() {
                    if let Ok(plan) = serde_json::from_str::<LessonPlan>(obj) {
                        return Ok(plan);
                    }
                }
                // Nested objects of a rejected candidate are never tried.
                from = start + obj.len();
            }
            None => from = start + 1,
        }
    }
    Err(first.into())
}

/// The `{...}` object opening at the start of `s`, skipping braces inside
/// string literals. `None` when it never closes.
fn balanced_object(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
