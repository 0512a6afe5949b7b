//! Parser for the INI credentials blob stored in a secret.
//!
//! The accepted format is the shared AWS credentials file:
//!
//! ```ini
//! [default]
//! aws_access_key_id = AKIA...
//! aws_secret_access_key = ...
//! aws_session_token = ...
//! ```
//!
//! Section and key names are case-sensitive. `#` and `;` start a comment at
//! the beginning of a line, or mid-line when preceded by whitespace. Keys
//! before the first section header belong to no section. Later duplicate
//! keys win.

use std::collections::HashMap;

use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::CredentialMaterialError;

pub const DEFAULT_SECTION: &str = "default";
pub const ACCESS_KEY_ID: &str = "aws_access_key_id";
pub const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
pub const SESSION_TOKEN: &str = "aws_session_token";

/// Provider name recorded on credentials read from a secret.
pub const SECRET_PROVIDER_NAME: &str = "Secret";

type Section = HashMap<String, String>;

/// Parse a credentials blob and extract the `[default]` profile.
///
/// Missing keys inside `[default]` become empty strings. The result never
/// expires.
pub fn parse_credentials_file(data: &[u8]) -> Result<Credentials, CredentialMaterialError> {
    let text = std::str::from_utf8(data).map_err(|e| CredentialMaterialError::Malformed {
        line: line_of_offset(data, e.valid_up_to()),
        reason: "not valid UTF-8".to_string(),
    })?;

    let sections = parse_sections(text)?;
    let default = sections
        .get(DEFAULT_SECTION)
        .ok_or(CredentialMaterialError::MissingDefaultSection)?;
    let get = |key: &str| default.get(key).map(String::as_str).unwrap_or_default();

    Ok(Credentials::new(
        get(ACCESS_KEY_ID),
        get(SECRET_ACCESS_KEY),
        get(SESSION_TOKEN),
        None,
        SECRET_PROVIDER_NAME,
    ))
}

fn parse_sections(text: &str) -> Result<HashMap<String, Section>, CredentialMaterialError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut current: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = parse_section_header(header, line_no)?;
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let (key, value) = parse_property(line, line_no)?;
        // Properties before any header have no section and are dropped.
        if let Some(name) = &current {
            sections
                .entry(name.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
    }

    Ok(sections)
}

fn parse_section_header(header: &str, line: usize) -> Result<String, CredentialMaterialError> {
    let Some((name, rest)) = header.split_once(']') else {
        return Err(malformed(line, "section header is missing ']'"));
    };
    let rest = rest.trim();
    if !rest.is_empty() && !is_comment(rest) {
        return Err(malformed(line, "unexpected text after section header"));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed(line, "empty section name"));
    }
    Ok(name.to_string())
}

fn parse_property(line: &str, line_no: usize) -> Result<(&str, &str), CredentialMaterialError> {
    // Whichever delimiter comes first splits; values may contain the other.
    let Some((key, value)) = line.split_once(['=', ':']) else {
        return Err(malformed(line_no, "expected 'key = value'"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(malformed(line_no, "empty key"));
    }
    Ok((key, unquote(strip_inline_comment(value).trim())))
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

fn strip_inline_comment(value: &str) -> &str {
    let mut prev_ws = false;
    for (idx, c) in value.char_indices() {
        if prev_ws && (c == '#' || c == ';') {
            return &value[..idx];
        }
        prev_ws = c.is_whitespace();
    }
    value
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn line_of_offset(data: &[u8], offset: usize) -> usize {
    data[..offset].iter().filter(|b| **b == b'\n').count() + 1
}

fn malformed(line: usize, reason: &str) -> CredentialMaterialError {
    CredentialMaterialError::Malformed {
        line,
        reason: reason.to_string(),
    }
}
