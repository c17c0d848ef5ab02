//! Text normalization rules applied to loosely structured input before display.
//!
//! Each rule is a small pure function so it can be tested on its own.

/// Fragments shorter than this (in characters, after trimming) are dropped.
const MIN_DETAIL_CHARS: usize = 3;

/// Removes a trailing standalone `Link` token (any case) from a title.
///
/// `"E-commerce App Link"` becomes `"E-commerce App"`; `"Backlink"` is left alone.
pub fn strip_link_suffix(title: &str) -> &str {
    let trimmed = title.trim_end();
    let Some(split) = trimmed.len().checked_sub(4) else {
        return trimmed;
    };
    if !trimmed.is_char_boundary(split) {
        return trimmed;
    }
    let (head, tail) = trimmed.split_at(split);
    if !tail.eq_ignore_ascii_case("link") {
        return trimmed;
    }
    if head.is_empty() || head.ends_with(char::is_whitespace) {
        head.trim_end()
    } else {
        trimmed
    }
}

/// Splits `"<name> - <details>"` or `"<name>: <details>"` into heading and detail.
///
/// The first `" - "` wins over `": "` when both are present. A separator at the
/// very start does not count.
pub fn split_heading(entry: &str) -> (&str, Option<&str>) {
    let at = match entry.find(" - ").filter(|&i| i > 0) {
        Some(i) => Some((i, 3)),
        None => entry.find(": ").filter(|&i| i > 0).map(|i| (i, 2)),
    };
    match at {
        Some((i, width)) => (entry[..i].trim(), Some(entry[i + width..].trim())),
        None => (entry.trim(), None),
    }
}

/// Breaks detail text into display lines.
///
/// Sentence boundaries (`.`) are the primary delimiter; commas split only when
/// the text has no `.` at all. Fragments shorter than three characters after
/// trimming are discarded.
pub fn detail_lines(detail: &str) -> Vec<String> {
    let delimiter = if detail.contains('.') { '.' } else { ',' };
    detail
        .split(delimiter)
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_DETAIL_CHARS)
        .map(str::to_string)
        .collect()
}

/// A bare `projects` heading is a copy-paste artifact, not content.
pub fn is_noise_heading(heading: &str) -> bool {
    let heading = heading.trim();
    heading.is_empty() || heading.eq_ignore_ascii_case("projects")
}

/// A free-text entry after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub heading: String,
    pub details: Vec<String>,
}

/// Full pipeline for a free-text entry: split, strip the link suffix, drop noise.
pub fn normalize_entry(entry: &str) -> Option<NormalizedEntry> {
    let (heading, detail) = split_heading(entry);
    let heading = strip_link_suffix(heading).trim();
    if is_noise_heading(heading) {
        return None;
    }
    Some(NormalizedEntry {
        heading: heading.to_string(),
        details: detail.map(detail_lines).unwrap_or_default(),
    })
}

/// `http://` or `https://` prefix, any case.
pub fn is_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Basic `local@domain.tld` shape: no whitespace, exactly one `@`, a non-empty
/// local part, and a dot in the domain with text on both sides.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}
