//! Small string helpers for post and comment content.

use std::cmp::Ordering;

use sha2::{Digest, Sha256};

use crate::emoticons::shortcode_for_code_point;

/// Replace characters outside the Basic Multilingual Plane.
///
/// Each supplementary-plane scalar becomes its smiley shortcode when it has
/// one, and a `&#x..;` character reference otherwise. BMP characters are
/// copied unchanged.
#[must_use]
pub fn replace_surrogate_pairs_with_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let code_point = u32::from(c);
        if code_point > 0xFFFF {
            push_code_point_replacement(&mut out, code_point);
        } else {
            out.push(c);
        }
    }
    out
}

/// Same as [`replace_surrogate_pairs_with_entities`], over raw UTF-16.
///
/// An unpaired surrogate is emitted as a character reference to the lone
/// code unit.
#[must_use]
pub fn replace_surrogate_pairs_in_utf16(units: &[u16]) -> String {
    let mut out = String::with_capacity(units.len());
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) if u32::from(c) > 0xFFFF => push_code_point_replacement(&mut out, u32::from(c)),
            Ok(c) => out.push(c),
            Err(err) => push_code_point_replacement(&mut out, u32::from(err.unpaired_surrogate())),
        }
    }
    out
}

fn push_code_point_replacement(out: &mut String, code_point: u32) {
    match shortcode_for_code_point(code_point) {
        Some(shortcode) => out.push_str(shortcode),
        None => out.push_str(&format!("&#x{code_point:x};")),
    }
}

/// Escape text for inclusion in HTML.
///
/// Markup characters become named entities, anything outside printable
/// ASCII becomes a decimal reference, and runs of spaces keep their width
/// through `&nbsp;`.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            ' ' => {
                while chars.next_if_eq(&' ').is_some() {
                    out.push_str("&nbsp;");
                }
                out.push(' ');
            }
            c if c > '\u{7E}' || c < ' ' => {
                out.push_str(&format!("&#{};", u32::from(c)));
            }
            c => out.push(c),
        }
    }

    out
}

/// Drop characters that XML 1.0 does not allow.
#[must_use]
pub fn strip_non_valid_xml_characters(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(
                u32::from(c),
                0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
            )
        })
        .collect()
}

/// Wrap blank-line separated blocks in `<p>` and turn single newlines into
/// `<br>`.
#[must_use]
pub fn add_p_tags(source: &str) -> String {
    let mut wrapped = String::with_capacity(source.len() + 16);
    for block in source.split("\n\n") {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            continue;
        }
        let body = trimmed
            .replace("<br />", "<br>")
            .replace("<br/>", "<br>")
            .replace("<br>\n", "<br>")
            .replace('\n', "<br>");
        wrapped.push_str("<p>");
        wrapped.push_str(&body);
        wrapped.push_str("</p>");
    }
    wrapped
}

/// Swap presentational tags for the semantic ones the server expects.
#[must_use]
pub fn convert_html_tags_for_upload(source: &str) -> String {
    source
        .replace("<b>", "<strong>")
        .replace("</b>", "</strong>")
        .replace("<i>", "<em>")
        .replace("</i>", "</em>")
}

/// Swap semantic tags back to the presentational ones the editor shows.
#[must_use]
pub fn convert_html_tags_for_display(source: &str) -> String {
    source
        .replace("<strong>", "<b>")
        .replace("</strong>", "</b>")
        .replace("<em>", "<i>")
        .replace("</em>", "</i>")
}

/// Remove one trailing `/`.
#[must_use]
pub fn remove_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

/// Upper-case the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase hex MD5 digest, always 32 characters.
#[must_use]
pub fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Lowercase hex SHA-256 digest, always 64 characters.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Parse an `i32`, falling back to `default` on `None` or bad input.
#[must_use]
pub fn parse_int_or(s: Option<&str>, default: i32) -> i32 {
    s.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Parse an `i64`, falling back to `default` on `None` or bad input.
#[must_use]
pub fn parse_long_or(s: Option<&str>, default: i64) -> i64 {
    s.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// The string, or `""` for `None`.
#[must_use]
pub fn not_null_str(s: Option<&str>) -> &str {
    s.unwrap_or("")
}

/// Lexicographic comparison where `None` sorts first.
#[must_use]
pub fn compare_optional(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.cmp(&b)
}

/// Case-insensitive comparison where `None` sorts first.
#[must_use]
pub fn compare_ignore_case_optional(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase)),
    }
}

/// Concatenate two lists; an empty side yields the other unchanged.
#[must_use]
pub fn merge_string_lists(first: &[String], second: &[String]) -> Vec<String> {
    if first.is_empty() {
        return second.to_vec();
    }
    if second.is_empty() {
        return first.to_vec();
    }
    first.iter().chain(second).cloned().collect()
}
