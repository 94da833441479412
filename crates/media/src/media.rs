//! Media type detection from file names, URLs and MIME types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Image extensions the editor can display inline.
pub const RECOGNIZED_IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif"];
/// Video extensions.
pub const RECOGNIZED_VIDEO_EXTENSIONS: &[&str] = &[
    ".ogv", ".mp4", ".m4v", ".mov", ".wmv", ".avi", ".mpg", ".3gp", ".3g2",
];
/// Document extensions.
pub const RECOGNIZED_DOCUMENT_EXTENSIONS: &[&str] = &[".doc", ".docx", ".odt", ".pdf"];
/// Presentation extensions.
pub const RECOGNIZED_PRESENTATION_EXTENSIONS: &[&str] = &[".ppt", ".pptx", ".pps", ".ppsx", ".key"];
/// Spreadsheet extensions.
pub const RECOGNIZED_SPREADSHEET_EXTENSIONS: &[&str] = &[".xls", ".xlsx"];

/// Extension to MIME type. Where several extensions share a type, the first
/// one listed is the preferred extension for that type.
const MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("bmp", "image/bmp"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("wmv", "video/x-ms-wmv"),
    ("avi", "video/x-msvideo"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("3g2", "video/3gpp2"),
    ("ogv", "video/ogg"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("wav", "audio/x-wav"),
    ("ogg", "audio/ogg"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("pps", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    (
        "ppsx",
        "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
    ),
    ("key", "application/vnd.apple.keynote"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

/// Broad media category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video.
    Video,
    /// Text document.
    Document,
    /// Slides.
    Presentation,
    /// Spreadsheet.
    Spreadsheet,
}

/// Whether `url` ends with one of `extensions`.
#[must_use]
pub fn is_recognized(url: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| url.ends_with(ext))
}

/// Whether `url` has a recognized image extension.
#[must_use]
pub fn is_valid_image(url: &str) -> bool {
    is_recognized(url, RECOGNIZED_IMAGE_EXTENSIONS)
}

/// Whether `url` has a recognized video extension.
#[must_use]
pub fn is_video(url: &str) -> bool {
    is_recognized(url, RECOGNIZED_VIDEO_EXTENSIONS)
}

/// Classify `url` by extension. Matching is case-sensitive.
#[must_use]
pub fn media_kind(url: &str) -> Option<MediaKind> {
    if is_valid_image(url) {
        Some(MediaKind::Image)
    } else if is_recognized(url, RECOGNIZED_DOCUMENT_EXTENSIONS) {
        Some(MediaKind::Document)
    } else if is_recognized(url, RECOGNIZED_PRESENTATION_EXTENSIONS) {
        Some(MediaKind::Presentation)
    } else if is_recognized(url, RECOGNIZED_SPREADSHEET_EXTENSIONS) {
        Some(MediaKind::Spreadsheet)
    } else if is_video(url) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Extension of the last path segment, without the dot.
fn file_extension(name: &str) -> Option<&str> {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let (_, ext) = file.rsplit_once('.')?;
    (!ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

/// Preferred file extension for a MIME type, lowercased.
///
/// Unknown types fall back to the subtype (`application/x-foo` gives
/// `x-foo`); empty input gives `""`.
#[must_use]
pub fn extension_for_mime_type(mime_type: &str) -> String {
    let mime_type = mime_type.trim();
    if mime_type.is_empty() {
        return String::new();
    }
    let lower = mime_type.to_ascii_lowercase();

    if let Some((ext, _)) = MIME_TYPES.iter().find(|(_, mime)| *mime == lower) {
        return (*ext).to_string();
    }

    lower
        .split_once('/')
        .map_or(lower.as_str(), |(_, subtype)| subtype)
        .to_string()
}

/// MIME type implied by a file name's extension.
#[must_use]
pub fn mime_type_for_file_name(name: &str) -> Option<&'static str> {
    let ext = file_extension(name)?.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Canonical form of a MIME type reported by a decoder.
#[must_use]
pub fn normalize_mime_type(mime_type: &str) -> String {
    // RFC 3016 elementary streams are plain MP4 for our purposes.
    if mime_type.eq_ignore_ascii_case("video/mp4v-es") {
        "video/mp4".to_string()
    } else {
        mime_type.to_string()
    }
}

/// Lowercased file name, with an extension derived from `mime_type` when the
/// name has none.
#[must_use]
pub fn media_file_name(name: &str, mime_type: Option<&str>) -> String {
    let mut file_name = name.to_lowercase();
    if file_extension(&file_name).is_some() {
        return file_name;
    }

    match mime_type.filter(|m| !m.trim().is_empty()) {
        Some(mime) => {
            let ext = extension_for_mime_type(mime);
            if !ext.is_empty() {
                file_name.push('.');
                file_name.push_str(&ext);
            }
        }
        None => warn!(name = %name, "no mime type and no extension"),
    }

    file_name
}
