//! vCard content-line primitives shared by import and export.
//!
//! # Responsibility
//! - Unfold physical lines into logical content lines (RFC 2425 folding and
//!   vCard 2.1 quoted-printable soft breaks).
//! - Split a content line into group, name, parameters and value.
//! - Escape/unescape vCard 3.0 text values.

/// One logical `[group.]NAME[;params]:value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Upper-cased property name without group prefix.
    pub name: String,
    /// Upper-cased `TYPE` values, including vCard 2.1 bare parameters.
    pub types: Vec<String>,
    /// Whether the value is `ENCODING=QUOTED-PRINTABLE`.
    pub quoted_printable: bool,
    /// Raw value, still escaped.
    pub value: String,
}

impl ContentLine {
    /// Decoded value for single-text properties.
    pub fn text_value(&self) -> String {
        unescape_text(&self.decoded_value())
    }

    /// Decoded components for structured properties (`N`, `ADR`).
    pub fn structured_value(&self) -> Vec<String> {
        split_structured(&self.decoded_value())
    }

    pub fn has_type(&self, wanted: &str) -> bool {
        self.types.iter().any(|value| value == wanted)
    }

    fn decoded_value(&self) -> String {
        if self.quoted_printable {
            decode_quoted_printable(&self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Joins folded physical lines into logical lines.
///
/// - CRLF and lone CR are treated as LF.
/// - A line starting with a space or tab continues the previous line.
/// - A quoted-printable line ending in `=` continues on the next line.
pub fn unfold_lines(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut out: Vec<String> = Vec::new();
    let mut qp_continues = false;

    for line in normalized.split('\n') {
        if qp_continues {
            if let Some(last) = out.last_mut() {
                last.pop();
                last.push_str(line.trim_start());
                qp_continues = is_qp_soft_break(last);
                continue;
            }
        }

        if line.starts_with([' ', '\t']) && !line.trim().is_empty() {
            if let Some(last) = out.last_mut() {
                last.push_str(&line[1..]);
                qp_continues = is_qp_soft_break(last);
                continue;
            }
        }

        out.push(line.to_string());
        qp_continues = is_qp_soft_break(line);
    }

    out
}

fn is_qp_soft_break(line: &str) -> bool {
    let Some(colon) = find_value_separator(line) else {
        return false;
    };
    line.ends_with('=') && line[..colon].to_ascii_uppercase().contains("QUOTED-PRINTABLE")
}

/// Parses one logical line; returns `None` when there is no `:` separator or
/// the property name is empty.
pub fn parse_content_line(line: &str) -> Option<ContentLine> {
    let colon = find_value_separator(line)?;
    let (left, value) = (&line[..colon], &line[colon + 1..]);

    let mut segments = left.split(';');
    let qualified = segments.next()?.trim();
    let name = qualified
        .rsplit_once('.')
        .map_or(qualified, |(_, name)| name)
        .trim()
        .to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }

    let mut types = Vec::new();
    let mut quoted_printable = false;
    for segment in segments {
        let segment = segment.trim();
        match segment.split_once('=') {
            Some((key, values)) => {
                let key = key.trim().to_ascii_uppercase();
                let values = values.trim().trim_matches('"');
                match key.as_str() {
                    "TYPE" => types.extend(
                        values
                            .split(',')
                            .map(|value| value.trim().to_ascii_uppercase())
                            .filter(|value| !value.is_empty()),
                    ),
                    "ENCODING" => {
                        quoted_printable = values.eq_ignore_ascii_case("QUOTED-PRINTABLE");
                    }
                    _ => {}
                }
            }
            None if segment.eq_ignore_ascii_case("QUOTED-PRINTABLE") => quoted_printable = true,
            None if !segment.is_empty() => types.push(segment.to_ascii_uppercase()),
            None => {}
        }
    }

    Some(ContentLine {
        name,
        types,
        quoted_printable,
        value: value.to_string(),
    })
}

fn find_value_separator(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(index),
            _ => {}
        }
    }
    None
}

/// Escapes a text value for vCard 3.0 output.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape_text`]; unknown escapes keep the escaped character.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Splits a structured value on unescaped `;` and unescapes each component.
pub fn split_structured(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for ch in value.chars() {
        if escaped {
            current.push('\\');
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == ';' {
            parts.push(unescape_text(&current));
            current.clear();
        } else {
            current.push(ch);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(unescape_text(&current));
    parts
}

/// Decodes a quoted-printable value as UTF-8, replacing invalid sequences.
pub fn decode_quoted_printable(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'=' {
            if let Some(decoded) = bytes.get(index + 1..index + 3).and_then(decode_hex_pair) {
                out.push(decoded);
                index += 3;
                continue;
            }
        }
        out.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let text = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(text, 16).ok()
}
