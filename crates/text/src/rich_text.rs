//! In-memory rich text: a plain buffer plus styled spans over it.

use serde::{Deserialize, Serialize};

/// Character that stands in for an embedded object (U+FFFC).
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// Build an opaque color from a `0xRRGGBB` value.
    #[must_use]
    pub const fn opaque(rgb: u32) -> Self {
        Self(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    /// The `#rrggbb` form, ignoring alpha.
    #[must_use]
    pub fn to_hex_rgb(self) -> String {
        format!("#{:06x}", self.0 & 0x00FF_FFFF)
    }
}

/// What a span does to the text it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props", rename_all = "camelCase")]
pub enum SpanKind {
    /// Embedded image covering a single [`OBJECT_REPLACEMENT`] character.
    Image { source: String },

    /// Foreground color.
    ForegroundColor(Color),

    /// Bold text.
    Bold,

    /// Italic text.
    Italic,

    /// Hyperlink.
    Link { href: String },

    /// Paragraph block.
    Paragraph,
}

/// A span over a byte range of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// The kind of span.
    #[serde(flatten)]
    pub kind: SpanKind,
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// An embedded image found in a rich-text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRun {
    /// Start byte offset of the image placeholder.
    pub start: usize,
    /// End byte offset of the image placeholder.
    pub end: usize,
    /// Image source URL.
    pub source: String,
}

/// A rich-text document that can enumerate and replace its embedded images.
///
/// The emoticon substitution is written against this trait only, so any
/// document model that can offer these two operations can reuse it.
pub trait EmbeddedImages {
    /// All embedded images, ordered by start offset.
    fn image_runs(&self) -> Vec<ImageRun>;

    /// Replace the range of `run` with `text` colored with `color`, and drop
    /// the image embed.
    fn replace_run_with_styled_text(&mut self, run: &ImageRun, text: &str, color: Color);
}

/// Plain text with styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    text: String,
    spans: Vec<Span>,
}

impl RichText {
    /// Create a document holding `text` with no spans.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// The underlying buffer.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All spans, in insertion order.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append text, returning the byte range it occupies.
    pub fn push_str(&mut self, s: &str) -> (usize, usize) {
        let start = self.text.len();
        self.text.push_str(s);
        (start, self.text.len())
    }

    /// Append an embedded image placeholder carrying `source`.
    pub fn push_image(&mut self, source: impl Into<String>) {
        let start = self.text.len();
        self.text.push(OBJECT_REPLACEMENT);
        let end = self.text.len();
        self.spans.push(Span::new(
            SpanKind::Image {
                source: source.into(),
            },
            start,
            end,
        ));
    }

    /// Attach a span. Ranges outside the buffer or off a char boundary are
    /// ignored.
    pub fn set_span(&mut self, kind: SpanKind, start: usize, end: usize) {
        if start > end
            || end > self.text.len()
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
        {
            return;
        }
        self.spans.push(Span::new(kind, start, end));
    }

    /// Remove the first span equal to `span`. Returns whether one was removed.
    pub fn remove_span(&mut self, span: &Span) -> bool {
        if let Some(idx) = self.spans.iter().position(|s| s == span) {
            self.spans.remove(idx);
            true
        } else {
            false
        }
    }

    /// Replace `start..end` of the buffer with `replacement`, shifting spans.
    ///
    /// Positions before the range stay put, positions after it move by the
    /// length difference, and positions inside it collapse onto the edges of
    /// the inserted text. Invalid ranges leave the document untouched.
    pub fn replace(&mut self, start: usize, end: usize, replacement: &str) {
        if start > end
            || end > self.text.len()
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
        {
            return;
        }

        self.text.replace_range(start..end, replacement);

        let new_end = start + replacement.len();
        let shift = |pos: usize, is_end: bool| -> usize {
            if pos <= start {
                pos
            } else if pos >= end {
                pos - end + new_end
            } else if is_end {
                new_end
            } else {
                start
            }
        };

        for span in &mut self.spans {
            span.start = shift(span.start, false);
            span.end = shift(span.end, true);
        }
    }
}

impl EmbeddedImages for RichText {
    fn image_runs(&self) -> Vec<ImageRun> {
        let mut runs: Vec<ImageRun> = self
            .spans
            .iter()
            .filter_map(|s| match &s.kind {
                SpanKind::Image { source } => Some(ImageRun {
                    start: s.start,
                    end: s.end,
                    source: source.clone(),
                }),
                _ => None,
            })
            .collect();
        runs.sort_by_key(|r| r.start);
        runs
    }

    fn replace_run_with_styled_text(&mut self, run: &ImageRun, text: &str, color: Color) {
        let image = Span::new(
            SpanKind::Image {
                source: run.source.clone(),
            },
            run.start,
            run.end,
        );
        if !self.remove_span(&image) {
            return;
        }
        self.replace(run.start, run.end, text);
        self.set_span(
            SpanKind::ForegroundColor(color),
            run.start,
            run.start + text.len(),
        );
    }
}
