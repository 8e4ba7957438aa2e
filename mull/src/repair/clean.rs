//! Text repair for model output that is almost, but not quite, JSON.
//!
//! The pass is lossy by design (escaped whitespace collapses to spaces) and
//! heuristic at the end: the closing-delimiter suffix restores brace/bracket
//! balance for truncated output but cannot guarantee structural correctness.

use std::sync::OnceLock;

use regex::Regex;

fn escaped_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\[ntr]").expect("static regex"))
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("static regex"))
}

fn escape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\u[0-9a-fA-F]{4}|\\.").expect("static regex"))
}

/// Repairs raw text for a JSON parse attempt, in order: strip code fences,
/// collapse literal `\n`/`\t`/`\r` escape sequences to spaces, drop trailing
/// commas, strip control characters and the BOM, re-escape invalid backslash
/// escapes, and append the closing delimiters needed to balance the text.
pub fn repair_json_text(raw: &str) -> String {
    let mut text = strip_fences(raw.trim()).trim().to_string();
    text = escaped_ws_re().replace_all(&text, " ").into_owned();
    text = trailing_comma_re().replace_all(&text, "$1").into_owned();
    text.retain(|c| !('\u{0}'..='\u{1f}').contains(&c) && c != '\u{feff}');
    text = fix_escapes(&text);
    let suffix = closing_suffix(&text);
    text.push_str(&suffix);
    text
}

fn strip_fences(s: &str) -> &str {
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```yaml"))
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    s.strip_suffix("```").unwrap_or(s).trim()
}

/// Keeps valid JSON escapes (`\"`, `\\`, `\/`, `\b`, `\f`, `\n`, `\r`, `\t`,
/// `\uXXXX`) and doubles the backslash of anything else.
fn fix_escapes(s: &str) -> String {
    escape_re()
        .replace_all(s, |caps: &regex::Captures| {
            let m = &caps[0];
            if m.len() == 6 {
                return m.to_string(); // \uXXXX
            }
            let c = m.chars().nth(1).unwrap_or('\\');
            if matches!(c, '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') {
                m.to_string()
            } else {
                format!("\\\\{c}")
            }
        })
        .into_owned()
}

/// Computes the suffix that balances `{`/`}` and `[`/`]` counts, emitting
/// closers in reverse nesting order (string-aware) so truncated output like
/// `{"planning":[` closes to `{"planning":[]}`. An unterminated string is
/// closed first.
pub fn closing_suffix(s: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in s.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }
    let mut suffix = String::new();
    if in_string {
        suffix.push('"');
    }
    while let Some(c) = stack.pop() {
        suffix.push(c);
    }
    suffix
}

/// Interior of the first fenced code block, with any `json`/`yaml` language
/// tag removed.
pub fn extract_fenced(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let rest = &text[start + 3..];
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("yaml"))
        .unwrap_or(rest);
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim().to_string())
}

/// The first balanced top-level `{...}` group, if any.
pub fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    balanced_at(text, start)
}

/// Every syntactically balanced `{...}` group, scanning from each opening
/// brace in order. Outer groups come before the groups nested inside them.
pub fn balanced_objects(text: &str) -> Vec<&str> {
    text.char_indices()
        .filter(|(_, c)| *c == '{')
        .filter_map(|(i, _)| balanced_at(text, i))
        .collect()
}

fn balanced_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
