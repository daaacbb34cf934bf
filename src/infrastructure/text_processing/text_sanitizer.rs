use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

/// Normalizes parser and OCR output before it is used as prompt context.
///
/// Ligatures and compatibility forms are folded (NFKC), zero-width and
/// control characters are dropped (a form feed counts as a line break),
/// words split across a hyphenated line break are re-joined, runs of blank
/// lines collapse to one paragraph break and runs of spaces to one space.
/// Tabs inside a line are kept and absorb the spaces around them.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().filter_map(clean_char).collect();
    let de_hyphenated = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    let mut result = String::with_capacity(de_hyphenated.len());
    let mut pending_break: Option<&str> = None;

    for line in de_hyphenated.lines().map(str::trim) {
        if line.is_empty() {
            if !result.is_empty() {
                pending_break = Some("\n\n");
            }
            continue;
        }

        if !result.is_empty() {
            result.push_str(pending_break.unwrap_or("\n"));
        }
        pending_break = None;
        push_collapsed(line, &mut result);
    }

    result
}

fn clean_char(ch: char) -> Option<char> {
    match ch {
        '\u{000C}' | '\u{000B}' | '\u{2028}' | '\u{2029}' => Some('\n'),
        '\n' | '\t' => Some(ch),
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}' => None,
        c if c.is_control() => None,
        c => Some(c),
    }
}

fn push_collapsed(line: &str, out: &mut String) {
    let mut prev_was_space = false;

    for ch in line.chars() {
        if ch == '\t' {
            if prev_was_space && out.ends_with(' ') {
                out.pop();
            }
            out.push('\t');
            prev_was_space = true;
        } else if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}

/// Joins every whitespace-separated item of `raw` with a single space.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
