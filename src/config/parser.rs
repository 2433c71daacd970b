//! INI-style configuration parser.

use super::Config;

/// Parses configuration text into a `Config`.
pub fn parse(content: &str) -> Config {
    let mut config = Config::new();
    let mut section: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line);
            continue;
        }

        let Some(name) = section.as_deref() else {
            continue;
        };

        if let Some((key, value)) = parse_key_value(line) {
            config.set(name, &key, &value);
        }
    }

    config
}

/// Parses `[section]`. Malformed headers and headers with a quoted
/// subsection give `None`, so the keys below them are skipped.
fn parse_section_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() || inner.contains('"') {
        return None;
    }
    Some(inner.to_string())
}

/// Parses `key = value`; a key without `=` is not a pair.
fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), parse_value(value)))
}

/// Strips inline comments and surrounding quotes, then unescapes.
fn parse_value(s: &str) -> String {
    let s = remove_inline_comment(s.trim());

    if let Some(quoted) = s.strip_prefix('"') {
        if let Some(end) = quoted.find('"') {
            return unescape(&quoted[..end]);
        }
    }

    unescape(s)
}

/// Cuts the value at the first `#` or `;` outside quotes.
fn remove_inline_comment(s: &str) -> &str {
    let mut in_quotes = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' => escape_next = true,
            '"' => in_quotes = !in_quotes,
            '#' | ';' if !in_quotes => return s[..i].trim_end(),
            _ => {}
        }
    }

    s
}

fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            _ => {
                result.push(c);
                continue;
            }
        }
        chars.next();
    }

    result
}
