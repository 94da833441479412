//! HTML to rich text and back.
//!
//! Only the inline subset that blog content and comments use is understood:
//! paragraphs, line breaks, bold, italic, links, colored spans and images.
//! Other block elements (lists, headings, quotes, table cells) end the line
//! they are on. Anything else is dropped while its text is kept, so a round
//! trip is lossy for unrelated markup and whitespace.

use regex::Regex;

use crate::rich_text::{Color, RichText, Span, SpanKind};

// Regex patterns - these are valid static patterns that cannot fail
#[allow(clippy::unwrap_used)]
static COMMENT_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

#[allow(clippy::unwrap_used)]
static TAG_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});

#[allow(clippy::unwrap_used)]
static ATTR_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .unwrap()
});

#[allow(clippy::unwrap_used)]
static WHITESPACE_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[allow(clippy::unwrap_used)]
static CSS_COLOR_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*color\s*:\s*#([0-9a-f]{6}|[0-9a-f]{3})\b").unwrap()
});

/// Block elements, other than paragraphs, that start and end a line.
const LINE_BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "dl", "dt", "figcaption", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "pre", "section",
    "table", "td", "th", "tr", "ul",
];

/// Elements that never have a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "col", "embed", "hr", "input", "link", "meta", "source", "wbr",
];

/// An element that is open while parsing.
struct OpenElement {
    tag: String,
    kind: Option<SpanKind>,
    start: usize,
}

/// Parse state while walking the tag stream.
#[derive(Default)]
struct Builder {
    doc: RichText,
    open: Vec<OpenElement>,
    /// A block boundary was crossed and no content has followed it yet.
    pending_break: bool,
    /// End offset of the most recently closed paragraph.
    paragraph_end: Option<usize>,
}

impl Builder {
    /// Emit the line break owed to a block boundary, unless the buffer is
    /// empty or already separated.
    fn flush_break(&mut self) {
        if !std::mem::take(&mut self.pending_break) {
            return;
        }
        let len = self.doc.len();
        if len == 0 || self.doc.text().ends_with('\n') || self.paragraph_end == Some(len) {
            return;
        }
        self.doc.push_str("\n");
    }

    /// Append decoded, whitespace-collapsed text.
    fn push_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let collapsed = WHITESPACE_RE.replace_all(raw, " ");
        let decoded = decode_entities(&collapsed);
        let mut text = decoded.as_str();
        if self.pending_break || self.doc.is_empty() || self.doc.text().ends_with([' ', '\n']) {
            text = text.trim_start_matches(' ');
        }
        if text.is_empty() {
            return;
        }
        self.flush_break();
        self.doc.push_str(text);
    }

    fn line_break(&mut self) {
        self.flush_break();
        self.doc.push_str("\n");
    }

    fn image(&mut self, source: String) {
        self.flush_break();
        self.doc.push_image(source);
    }

    fn open_element(&mut self, tag: String, attrs: &str) {
        let kind = span_kind_for(&tag, attrs);
        match kind {
            // The paragraph's own boundary separates it from what came before.
            Some(SpanKind::Paragraph) => self.pending_break = false,
            Some(_) => self.flush_break(),
            None if is_line_block(&tag) => self.pending_break = true,
            None => {}
        }

        let self_closing = attrs.trim_end().ends_with('/');
        if self_closing || VOID_TAGS.contains(&tag.as_str()) {
            return;
        }
        self.open.push(OpenElement {
            tag,
            kind,
            start: self.doc.len(),
        });
    }

    /// Close the innermost open element named `tag`, along with anything
    /// opened after it. Stray closing tags only count as block boundaries.
    fn close_element(&mut self, tag: &str) {
        if is_line_block(tag) {
            self.pending_break = true;
        }
        let Some(idx) = self.open.iter().rposition(|e| e.tag == tag) else {
            return;
        };
        while self.open.len() > idx {
            if let Some(element) = self.open.pop() {
                self.finish_element(element);
            }
        }
    }

    fn finish_element(&mut self, element: OpenElement) {
        let end = self.doc.len();
        if let Some(kind) = element.kind {
            if end > element.start {
                if kind == SpanKind::Paragraph {
                    self.paragraph_end = Some(end);
                }
                self.doc.set_span(kind, element.start, end);
            }
        }
    }

    fn finish(mut self) -> RichText {
        while let Some(element) = self.open.pop() {
            self.finish_element(element);
        }
        self.doc
    }
}

fn is_line_block(tag: &str) -> bool {
    LINE_BLOCK_TAGS.contains(&tag)
}

/// Parse HTML into rich text.
#[must_use]
pub fn from_html(html: &str) -> RichText {
    let html = COMMENT_RE.replace_all(html, "");
    let mut builder = Builder::default();
    let mut pos = 0;

    for cap in TAG_RE.captures_iter(&html) {
        let Some(whole) = cap.get(0) else { continue };
        builder.push_text(&html[pos..whole.start()]);
        pos = whole.end();

        let closing = cap.get(1).is_some_and(|m| !m.as_str().is_empty());
        let tag = cap
            .get(2)
            .map_or_else(String::new, |m| m.as_str().to_ascii_lowercase());
        let attrs = cap.get(3).map_or("", |m| m.as_str());

        if closing {
            builder.close_element(&tag);
            continue;
        }

        match tag.as_str() {
            "br" => builder.line_break(),
            "img" => {
                if let Some(src) = attribute(attrs, "src") {
                    builder.image(src);
                }
            }
            _ => builder.open_element(tag, attrs),
        }
    }
    builder.push_text(&html[pos..]);

    builder.finish()
}

/// Map an opening tag to the span it produces, if any.
fn span_kind_for(tag: &str, attrs: &str) -> Option<SpanKind> {
    match tag {
        "p" | "div" => Some(SpanKind::Paragraph),
        "b" | "strong" => Some(SpanKind::Bold),
        "i" | "em" | "cite" | "dfn" => Some(SpanKind::Italic),
        "a" => attribute(attrs, "href").map(|href| SpanKind::Link { href }),
        "font" => attribute(attrs, "color")
            .as_deref()
            .and_then(parse_hex_color)
            .map(SpanKind::ForegroundColor),
        "span" => attribute(attrs, "style")
            .and_then(|style| {
                CSS_COLOR_RE
                    .captures(&style)
                    .and_then(|c| c.get(1).map(|m| format!("#{}", m.as_str())))
            })
            .as_deref()
            .and_then(parse_hex_color)
            .map(SpanKind::ForegroundColor),
        _ => None,
    }
}

/// Look up an attribute value by (case-insensitive) name, entity-decoded.
fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(attrs).find_map(|cap| {
        let key = cap.get(1)?.as_str();
        if !key.eq_ignore_ascii_case(name) {
            return None;
        }
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map_or("", |m| m.as_str());
        Some(decode_entities(value))
    })
}

/// Parse `#rgb` or `#rrggbb`.
fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    let rgb = match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok()?,
        3 => {
            let short = u32::from_str_radix(hex, 16).ok()?;
            let r = (short >> 8) & 0xF;
            let g = (short >> 4) & 0xF;
            let b = short & 0xF;
            (r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)
        }
        _ => return None,
    };
    Some(Color::opaque(rgb))
}

/// Decode named (the full HTML entity set) and numeric character references.
/// Unknown names are left as written.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

/// Serialize rich text back to HTML.
#[must_use]
pub fn to_html(doc: &RichText) -> String {
    let text = doc.text();
    let images: Vec<&Span> = doc
        .spans()
        .iter()
        .filter(|s| matches!(s.kind, SpanKind::Image { .. }))
        .collect();

    // Styling spans, outermost first at equal starts.
    let mut styles: Vec<&Span> = doc
        .spans()
        .iter()
        .filter(|s| !matches!(s.kind, SpanKind::Image { .. }) && !s.is_empty())
        .collect();
    styles.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.end.cmp(&a.end))
            .then(kind_rank(&a.kind).cmp(&kind_rank(&b.kind)))
    });

    let mut boundaries: Vec<usize> = doc
        .spans()
        .iter()
        .flat_map(|s| [s.start, s.end])
        .chain([0, text.len()])
        .filter(|&p| p <= text.len())
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut out = String::with_capacity(text.len() + 16);
    let mut stack: Vec<&Span> = Vec::new();
    let mut next_style = 0;

    for (i, &pos) in boundaries.iter().enumerate() {
        // Close everything ending here, reopening anything that was only
        // closed to keep the nesting well formed.
        if let Some(lowest) = stack.iter().position(|s| s.end <= pos) {
            let popped: Vec<&Span> = stack.drain(lowest..).collect();
            for span in popped.iter().rev() {
                out.push_str(&close_tag(&span.kind));
            }
            for span in popped.into_iter().filter(|s| s.end > pos) {
                out.push_str(&open_tag(&span.kind));
                stack.push(span);
            }
        }

        while next_style < styles.len() && styles[next_style].start == pos {
            let span = styles[next_style];
            out.push_str(&open_tag(&span.kind));
            stack.push(span);
            next_style += 1;
        }

        let Some(&next) = boundaries.get(i + 1) else {
            break;
        };

        if let Some(image) = images.iter().find(|s| s.start == pos) {
            if let SpanKind::Image { source } = &image.kind {
                out.push_str(&format!(
                    "<img src=\"{}\">",
                    html_escape::encode_double_quoted_attribute(source)
                ));
            }
        }

        let covered = images.iter().any(|s| s.start <= pos && s.end >= next);
        if !covered {
            if let Some(segment) = text.get(pos..next) {
                out.push_str(&html_escape::encode_text(segment).replace('\n', "<br>"));
            }
        }
    }

    for span in stack.iter().rev() {
        out.push_str(&close_tag(&span.kind));
    }

    out
}

const fn kind_rank(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Paragraph => 0,
        SpanKind::Link { .. } => 1,
        SpanKind::Bold => 2,
        SpanKind::Italic => 3,
        SpanKind::ForegroundColor(_) => 4,
        SpanKind::Image { .. } => 5,
    }
}

fn open_tag(kind: &SpanKind) -> String {
    match kind {
        SpanKind::Paragraph => "<p>".to_string(),
        SpanKind::Bold => "<b>".to_string(),
        SpanKind::Italic => "<i>".to_string(),
        SpanKind::Link { href } => format!(
            "<a href=\"{}\">",
            html_escape::encode_double_quoted_attribute(href)
        ),
        SpanKind::ForegroundColor(color) => {
            format!("<span style=\"color:{};\">", color.to_hex_rgb())
        }
        SpanKind::Image { .. } => String::new(),
    }
}

fn close_tag(kind: &SpanKind) -> String {
    match kind {
        SpanKind::Paragraph => "</p>",
        SpanKind::Bold => "</b>",
        SpanKind::Italic => "</i>",
        SpanKind::Link { .. } => "</a>",
        SpanKind::ForegroundColor(_) => "</span>",
        SpanKind::Image { .. } => "",
    }
    .to_string()
}
