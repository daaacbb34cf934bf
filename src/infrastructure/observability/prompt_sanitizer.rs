use std::sync::LazyLock;

use regex::Regex;

const MAX_VISIBLE_CHARS: usize = 100;

static CREDENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<key>bearer |(?:api_key|password|secret|token)=)[^\s&"']+"#).unwrap()
});

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+").unwrap());

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{7,}\d").unwrap());

/// Shortens prompt text for the logs and masks credentials and contact details.
///
/// Redaction runs before shortening so a secret cut in half is still masked.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let redacted = CREDENTIAL.replace_all(trimmed, "${key}[REDACTED]");
    let redacted = EMAIL.replace_all(&redacted, "[EMAIL]");
    let redacted = PHONE.replace_all(&redacted, "[PHONE]");

    let total_chars = redacted.chars().count();
    if total_chars > MAX_VISIBLE_CHARS {
        let visible: String = redacted.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", visible, total_chars)
    } else {
        redacted.into_owned()
    }
}
