//! Text transformations for post and comment content.
//!
//! # Features
//!
//! - **Rich text**: a buffer with styled spans and embedded images via [`RichText`]
//! - **HTML**: parse into rich text with [`from_html`] and serialize with [`to_html`]
//! - **Emoticons**: swap legacy smiley images for emoji via
//!   [`replace_legacy_icons_in_html`] and [`lookup_emoji_for_legacy_icon_file`]
//! - **Entities**: turn supplementary-plane characters into shortcodes or
//!   character references via [`replace_surrogate_pairs_with_entities`]
//! - **Strings**: escaping, paragraph wrapping, hashing and parsing helpers in [`strings`]
//!
//! # Example
//!
//! ```
//! use wputils_text::{replace_legacy_icons_in_html, replace_surrogate_pairs_with_entities};
//!
//! let html = replace_legacy_icons_in_html(Some("<img src=\"/smilies/icon_wink.gif\">"));
//! assert!(html.unwrap().contains('\u{1F609}'));
//! assert_eq!(replace_surrogate_pairs_with_entities("\u{1F603}"), ":D");
//! ```

#![allow(clippy::missing_const_for_fn)]

pub mod emoticons;
mod html;
mod rich_text;
pub mod strings;

pub use emoticons::{
    EMOTICON_COLOR, lookup_emoji, lookup_emoji_for_legacy_icon_file,
    replace_legacy_icons_in_html, replace_legacy_icons_in_rich_text,
};
pub use html::{decode_entities, from_html, to_html};
pub use rich_text::{Color, EmbeddedImages, ImageRun, OBJECT_REPLACEMENT, RichText, Span, SpanKind};
pub use strings::{replace_surrogate_pairs_in_utf16, replace_surrogate_pairs_with_entities};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_html_round_trip_keeps_basic_markup() {
        let html = "<p>Hello <b>bold</b> and <i>italic</i></p>";
        assert_eq!(to_html(&from_html(html)), html);
    }

    #[test]
    fn test_rich_text_serializes_to_json() {
        let mut doc = RichText::new("x");
        doc.push_image("icon_smile.gif");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["spans"][0]["type"], "image");
        assert_eq!(json["spans"][0]["props"]["source"], "icon_smile.gif");
        assert_eq!(json["spans"][0]["start"], 1);
    }

    #[test]
    fn test_icons_then_entities() {
        let html = replace_legacy_icons_in_html(Some(
            "<p><img src=\"https://s.wp.com/smilies/icon_biggrin.gif\"></p>",
        ))
        .unwrap();
        let plain = replace_surrogate_pairs_with_entities(&html);
        assert_eq!(plain, "<p><span style=\"color:#21759b;\">:D</span></p>");
    }
}
