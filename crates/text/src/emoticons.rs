//! Legacy smiley images and emoji shortcodes.
//!
//! Old posts embed smileys as `<img>` tags pointing at files such as
//! `icon_smile.gif`. These helpers swap them for emoji, and map emoji code
//! points back to the textual smiley codes the server understands.

use std::collections::HashMap;

use tracing::debug;

use crate::html;
use crate::rich_text::{Color, EmbeddedImages, RichText};

/// Accent color applied to emoji that replaced a smiley image.
pub const EMOTICON_COLOR: Color = Color(0xFF21_759B);

/// Substring every legacy smiley filename contains.
const LEGACY_ICON_MARKER: &str = "icon_";

static LEGACY_ICONS: std::sync::LazyLock<HashMap<&'static str, &'static str>> =
    std::sync::LazyLock::new(|| {
        HashMap::from([
            ("icon_mrgreen.gif", "\u{1F600}"),
            ("icon_neutral.gif", "\u{1F614}"),
            ("icon_twisted.gif", "\u{1F616}"),
            ("icon_arrow.gif", "\u{27A1}"),
            ("icon_eek.gif", "\u{1F632}"),
            ("icon_smile.gif", "\u{1F60A}"),
            ("icon_confused.gif", "\u{1F615}"),
            ("icon_cool.gif", "\u{1F60A}"),
            ("icon_evil.gif", "\u{1F621}"),
            ("icon_biggrin.gif", "\u{1F603}"),
            ("icon_idea.gif", "\u{1F4A1}"),
            ("icon_redface.gif", "\u{1F633}"),
            ("icon_razz.gif", "\u{1F61D}"),
            ("icon_rolleyes.gif", "\u{1F60F}"),
            ("icon_wink.gif", "\u{1F609}"),
            ("icon_cry.gif", "\u{1F622}"),
            ("icon_surprised.gif", "\u{1F632}"),
            ("icon_lol.gif", "\u{1F603}"),
            ("icon_mad.gif", "\u{1F621}"),
            ("icon_sad.gif", "\u{1F61E}"),
            ("icon_exclaim.gif", "\u{2757}"),
            ("icon_question.gif", "\u{2753}"),
        ])
    });

static CODE_POINT_SHORTCODES: std::sync::LazyLock<HashMap<u32, &'static str>> =
    std::sync::LazyLock::new(|| {
        HashMap::from([
            (10145, ":arrow:"),
            (128_161, ":idea:"),
            (128_512, ":mrgreen:"),
            (128_515, ":D"),
            (128_522, ":)"),
            (128_521, ";)"),
            (128_532, ":|"),
            (128_533, ":?"),
            (128_534, ":twisted:"),
            (128_542, ":("),
            (128_545, ":evil:"),
            (128_546, ":'("),
            (128_562, ":o"),
            (128_563, ":oops:"),
            (128_527, ":roll:"),
            (10071, ":!:"),
            (10067, ":?:"),
        ])
    });

/// Emoji for a legacy smiley filename, matched exactly.
#[must_use]
pub fn emoji_for_legacy_icon(file_name: &str) -> Option<&'static str> {
    LEGACY_ICONS.get(file_name).copied()
}

/// Smiley shortcode for a Unicode scalar value.
#[must_use]
pub fn shortcode_for_code_point(code_point: u32) -> Option<&'static str> {
    CODE_POINT_SHORTCODES.get(&code_point).copied()
}

/// Iterate over every `(filename, emoji)` pair.
pub fn legacy_icons() -> impl Iterator<Item = (&'static str, &'static str)> {
    LEGACY_ICONS.iter().map(|(k, v)| (*k, *v))
}

/// Look up the emoji for the image at `url`.
///
/// Only the last path segment is compared, exactly and case-sensitively.
/// Returns `fallback` when `url` is `None` or the file is not a known smiley.
#[must_use]
pub fn lookup_emoji_for_legacy_icon_file(url: Option<&str>, fallback: &str) -> String {
    let Some(url) = url else {
        return fallback.to_string();
    };
    let file = url.rsplit('/').next().unwrap_or(url);
    emoji_for_legacy_icon(file).map_or_else(|| fallback.to_string(), str::to_string)
}

/// [`lookup_emoji_for_legacy_icon_file`] with an empty fallback.
#[must_use]
pub fn lookup_emoji(url: Option<&str>) -> String {
    lookup_emoji_for_legacy_icon_file(url, "")
}

/// Replace every embedded smiley image with its emoji in the accent color.
///
/// Images that are not known smileys are left alone.
pub fn replace_legacy_icons_in_rich_text<D: EmbeddedImages + ?Sized>(doc: &mut D) -> &mut D {
    // Back to front, so earlier offsets are still valid after each edit.
    for run in doc.image_runs().iter().rev() {
        let emoji = lookup_emoji(Some(run.source.as_str()));
        if emoji.is_empty() {
            continue;
        }
        debug!(source = %run.source, "replacing legacy smiley image");
        doc.replace_run_with_styled_text(run, &emoji, EMOTICON_COLOR);
    }
    doc
}

/// Replace smiley `<img>` tags in an HTML string with emoji.
///
/// Input without `icon_` anywhere is returned as is, without parsing. When a
/// replacement happens the whole document goes through the HTML parser and
/// serializer, which may reshape unrelated markup and whitespace.
#[must_use]
pub fn replace_legacy_icons_in_html(html: Option<&str>) -> Option<String> {
    let html = html?;
    if !html.contains(LEGACY_ICON_MARKER) {
        return Some(html.to_string());
    }

    let mut doc: RichText = html::from_html(html);
    replace_legacy_icons_in_rich_text(&mut doc);
    Some(html::to_html(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich_text::{Span, SpanKind};

    #[test]
    fn test_table_sizes() {
        assert_eq!(LEGACY_ICONS.len(), 22);
        assert_eq!(CODE_POINT_SHORTCODES.len(), 17);
    }

    #[test]
    fn test_lookup_known_icon() {
        let url = "https://s0.wp.com/wp-includes/images/smilies/icon_smile.gif";
        assert_eq!(lookup_emoji(Some(url)), "\u{1F60A}");
        assert_eq!(lookup_emoji(Some("icon_arrow.gif")), "\u{27A1}");
    }

    #[test]
    fn test_lookup_every_icon_after_any_prefix() {
        for (file, emoji) in legacy_icons() {
            let url = format!("anything/{file}");
            assert_eq!(lookup_emoji(Some(url.as_str())), emoji, "{file}");
        }
    }

    #[test]
    fn test_lookup_unknown_uses_fallback() {
        assert_eq!(lookup_emoji(Some("https://example.com/photo.gif")), "");
        assert_eq!(
            lookup_emoji_for_legacy_icon_file(Some("a/icon_unknown.gif"), "?"),
            "?"
        );
        assert_eq!(lookup_emoji_for_legacy_icon_file(None, "none"), "none");
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(lookup_emoji(Some("a/ICON_SMILE.GIF")), "");
        assert_eq!(lookup_emoji(Some("a/icon_smile")), "");
        assert_eq!(lookup_emoji(Some("a/icon_smile.gif?v=2")), "");
        assert_eq!(lookup_emoji(Some("a/xicon_smile.gif")), "");
    }

    #[test]
    fn test_shortcode_lookup() {
        assert_eq!(shortcode_for_code_point(128_515), Some(":D"));
        assert_eq!(shortcode_for_code_point(10145), Some(":arrow:"));
        assert_eq!(shortcode_for_code_point(0x1F9E0), None);
    }

    #[test]
    fn test_rich_text_replaces_only_smileys() {
        let mut doc = RichText::new("a");
        doc.push_image("https://example.com/images/icon_wink.gif");
        doc.push_str("b");
        doc.push_image("https://example.com/photo.jpg");
        let photo_start = doc.len() - '\u{FFFC}'.len_utf8();

        replace_legacy_icons_in_rich_text(&mut doc);

        let wink = '\u{1F609}'.len_utf8();
        assert_eq!(doc.text(), "a\u{1F609}b\u{FFFC}");
        assert!(
            doc.spans()
                .contains(&Span::new(SpanKind::ForegroundColor(EMOTICON_COLOR), 1, 1 + wink))
        );
        let shift = wink - '\u{FFFC}'.len_utf8();
        assert!(doc.spans().contains(&Span::new(
            SpanKind::Image {
                source: "https://example.com/photo.jpg".to_string()
            },
            photo_start + shift,
            photo_start + shift + '\u{FFFC}'.len_utf8()
        )));
        assert_eq!(doc.spans().len(), 2);
    }

    #[test]
    fn test_html_without_marker_is_untouched() {
        let input = "<p>  spacing   <b>kept</b></p><img src=\"a.gif\">";
        assert_eq!(replace_legacy_icons_in_html(Some(input)).as_deref(), Some(input));
        assert_eq!(replace_legacy_icons_in_html(None), None);
        assert_eq!(replace_legacy_icons_in_html(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn test_html_smiley_replaced() {
        let input = r#"<p>Hi <img src="https://s.wp.com/smilies/icon_smile.gif"> there</p>"#;
        let output = replace_legacy_icons_in_html(Some(input));
        assert_eq!(
            output.as_deref(),
            Some("<p>Hi <span style=\"color:#21759b;\">\u{1F60A}</span> there</p>")
        );
    }

    #[test]
    fn test_html_marker_without_smiley_keeps_images() {
        let input = r#"<img src="https://example.com/icon_custom.png">"#;
        let output = replace_legacy_icons_in_html(Some(input));
        assert_eq!(
            output.as_deref(),
            Some(r#"<img src="https://example.com/icon_custom.png">"#)
        );
    }
}
