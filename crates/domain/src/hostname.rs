//! Syntactic checks on host names before they are allowed near the wire.

use crate::DomainError;
use std::net::IpAddr;

/// Longest dotted name (without the root dot) that still fits the 255
/// octet wire-format limit.
pub const MAX_NAME_LENGTH: usize = 253;

pub const MAX_LABEL_LENGTH: usize = 63;

pub fn is_fully_qualified(hostname: &str) -> bool {
    hostname.ends_with('.')
}

pub fn count_dots(hostname: &str) -> usize {
    hostname.bytes().filter(|b| *b == b'.').count()
}

pub fn is_ip_literal(hostname: &str) -> bool {
    let bare = hostname
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(hostname);
    bare.parse::<IpAddr>().is_ok()
}

/// Returns true when `name` (dotted, no root dot) can be encoded as a
/// wire-format domain name.
pub fn fits_wire_format(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name
            .split('.')
            .all(|label| !label.is_empty() && label.len() <= MAX_LABEL_LENGTH)
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

pub fn validate_hostname(hostname: &str) -> Result<(), DomainError> {
    if hostname.is_empty() {
        return Err(DomainError::InvalidHostname("hostname cannot be empty".into()));
    }
    if is_ip_literal(hostname) {
        return Err(DomainError::IpLiteralHostname(hostname.to_string()));
    }

    let bare = hostname.strip_suffix('.').unwrap_or(hostname);
    if bare.is_empty() {
        return Err(DomainError::InvalidHostname(
            "the root name is not a hostname".into(),
        ));
    }
    if let Some(c) = bare.chars().find(|c| *c != '.' && !is_label_char(*c)) {
        return Err(DomainError::InvalidHostname(format!(
            "'{}' contains invalid character {:?}",
            hostname, c
        )));
    }
    if !fits_wire_format(bare) {
        return Err(DomainError::InvalidHostname(format!(
            "'{}' has an empty or oversized label or exceeds {} characters",
            hostname, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Normalises a search suffix: strips surrounding dots. Returns `None`
/// for suffixes that are empty or not valid names.
pub fn normalize_suffix(suffix: &str) -> Option<String> {
    let trimmed = suffix.trim().trim_matches('.');
    if trimmed.is_empty() || trimmed.contains(|c: char| c != '.' && !is_label_char(c)) {
        return None;
    }
    fits_wire_format(trimmed).then(|| trimmed.to_ascii_lowercase())
}
