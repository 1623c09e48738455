//! MIME multipart splitting for attachment downloads.
//!
//! `exportFileAttachments` with inline content answers with a
//! `multipart/related` (MTOM/SwA) body: a SOAP root part followed by the
//! binary file parts. Parts are sliced out of the original [`Bytes`] without
//! copying.

use bytes::Bytes;

use crate::error::{BigMachinesError, Result};

/// A single part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers in order of appearance.
    pub headers: Vec<(String, String)>,
    /// Part content.
    pub body: Bytes,
}

impl Part {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Content type of this part, if declared.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Whether this part is the SOAP envelope rather than file content.
    pub fn is_soap_envelope(&self) -> bool {
        self.content_type().is_some_and(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.starts_with("text/xml")
                || ct.starts_with("application/xop+xml")
                || ct.starts_with("application/soap+xml")
        })
    }
}

/// Extract a parameter (e.g. `boundary`, `filename`) from a header value.
///
/// Separators inside quoted strings are ignored and `\"` escapes are
/// resolved.
pub fn header_param(value: &str, param: &str) -> Option<String> {
    param_segments(value).into_iter().skip(1).find_map(|segment| {
        let (key, val) = segment.split_once('=')?;
        if key.trim().eq_ignore_ascii_case(param) {
            Some(unquote(val))
        } else {
            None
        }
    })
}

/// Split a header value on `;` outside quoted strings.
fn param_segments(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                segments.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&value[start..]);
    segments
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            other => out.push(other),
        }
    }
    out
}

/// Boundary declared by a multipart content type.
pub fn boundary(content_type: &str) -> Option<String> {
    header_param(content_type, "boundary").filter(|b| !b.is_empty())
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn is_lwsp(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Position after the line break ending a delimiter line, skipping padding.
fn skip_line_break(data: &[u8], mut pos: usize) -> usize {
    while data.get(pos).copied().is_some_and(is_lwsp) {
        pos += 1;
    }
    if data.get(pos) == Some(&b'\r') {
        pos += 1;
    }
    if data.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    pos
}

/// A delimiter is followed by `--`, or by optional padding and a line break.
fn ends_delimiter(data: &[u8], pos: usize) -> bool {
    let rest = &data[pos..];
    if rest.starts_with(b"--") {
        return true;
    }
    let padding = rest.iter().take_while(|b| is_lwsp(**b)).count();
    let rest = &rest[padding..];
    rest.is_empty() || rest.starts_with(b"\r\n") || rest.starts_with(b"\n")
}

/// Next delimiter line at or after `from`.
///
/// Returns the delimiter's offset and the offset just past it. Occurrences
/// that do not start a line, or that run on into other text, are content.
fn next_delimiter(data: &[u8], delimiter: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut search = from;
    loop {
        let at = find(data, delimiter, search)?;
        let after = at + delimiter.len();
        if (at == 0 || data[at - 1] == b'\n') && ends_delimiter(data, after) {
            return Some((at, after));
        }
        search = at + 1;
    }
}

/// Split a multipart body into its parts.
///
/// Delimiters count only at the start of a line; the line break before a
/// delimiter belongs to it, not to the preceding part.
///
/// # Errors
///
/// Returns [`BigMachinesError::Multipart`] if the opening boundary is
/// missing.
pub fn split(body: &Bytes, boundary: &str) -> Result<Vec<Part>> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let (_, mut pos) = next_delimiter(body, delimiter, 0).ok_or_else(|| {
        BigMachinesError::Multipart(format!("boundary {boundary:?} not found in body"))
    })?;

    let mut parts = Vec::new();
    loop {
        if body[pos..].starts_with(b"--") {
            break;
        }
        let start = skip_line_break(body, pos);
        let Some((next, after)) = next_delimiter(body, delimiter, start) else {
            // Unterminated final part: take the rest.
            parts.push(parse_part(body.slice(start..)));
            break;
        };

        let mut end = next;
        if end > start && body[end - 1] == b'\n' {
            end -= 1;
        }
        if end > start && body[end - 1] == b'\r' {
            end -= 1;
        }
        parts.push(parse_part(body.slice(start..end)));
        pos = after;
    }
    Ok(parts)
}

fn parse_part(raw: Bytes) -> Part {
    // No headers: the part opens with the blank separator line.
    for blank in [&b"\r\n"[..], &b"\n"[..]] {
        if raw.starts_with(blank) {
            return Part {
                headers: Vec::new(),
                body: raw.slice(blank.len()..),
            };
        }
    }

    let (header_end, body_start) = match find(&raw, b"\r\n\r\n", 0) {
        Some(idx) => (idx, idx + 4),
        None => match find(&raw, b"\n\n", 0) {
            Some(idx) => (idx, idx + 2),
            None => return Part { headers: Vec::new(), body: raw },
        },
    };

    let headers = String::from_utf8_lossy(&raw[..header_end])
        .lines()
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    Part {
        headers,
        body: raw.slice(body_start..),
    }
}
