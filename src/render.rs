//! Markup rendering of annotated text.
//!
//! One pass over a span list: plain text is escaped and copied, entity
//! spans are escaped and then wrapped in an inline `<span>` carrying their
//! role and entity attributes. While writing, the renderer records where every
//! source character landed, so editing overlays can map a caret in the
//! markup back to the source without re-parsing it.
//!
//! ```text
//! markup   <span …>Alice</span> met <span …>Bob</span>
//! source   ╰─ 0 ─╯ 0..5 ╰─ 5 ─╯5..10╰─ 10 ─╯10..13╰ 13 ─╯
//! ```

use crate::config::RenderConfig;
use crate::{EntityIndex, Result};
use rapport_core::{check_coverage, Span, SpanKind};
use std::fmt;

/// Rendered markup plus the offset map back into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    markup: String,
    /// (rendered offset, source offset), non-decreasing in both.
    checkpoints: Vec<(usize, usize)>,
}

impl Rendered {
    /// The markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    /// Take the markup, dropping the offset map.
    #[must_use]
    pub fn into_string(self) -> String {
        self.markup
    }

    /// Map a byte offset in the markup to a byte offset in the source.
    ///
    /// Offsets inside a tag map to the edge of the entity it opens or
    /// closes; offsets inside an escape sequence map to the escaped
    /// character. Offsets past the end map to the source length.
    #[must_use]
    pub fn map_rendered_offset_to_source(&self, offset: usize) -> usize {
        let i = self.checkpoints.partition_point(|&(r, _)| r <= offset);
        // The first checkpoint is always at rendered offset 0.
        self.checkpoints.get(i.wrapping_sub(1)).map_or(0, |&(_, s)| s)
    }

    /// Map a byte offset in the source to a byte offset in the markup.
    ///
    /// A source offset at an entity's start maps inside its element, one
    /// at an entity's end maps past the closing tag.
    #[must_use]
    pub fn source_to_rendered(&self, offset: usize) -> usize {
        let i = self.checkpoints.partition_point(|&(_, s)| s <= offset);
        self.checkpoints.get(i.wrapping_sub(1)).map_or(0, |&(r, _)| r)
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup)
    }
}

impl AsRef<str> for Rendered {
    fn as_ref(&self) -> &str {
        &self.markup
    }
}

/// Serializes spans into HTML.
#[derive(Debug, Clone, Default)]
pub struct MarkupRenderer<'a> {
    config: RenderConfig,
    index: Option<&'a EntityIndex>,
}

impl<'a> MarkupRenderer<'a> {
    /// Renderer with default styling and no roster colors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer with custom styling.
    #[must_use]
    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            index: None,
        }
    }

    /// Take known-entity colors from a roster snapshot.
    #[must_use]
    pub fn with_index(mut self, index: &'a EntityIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Render spans that gaplessly cover `text`.
    ///
    /// # Panics
    ///
    /// Panics if `spans` is not a gapless covering of `text`. The annotator
    /// never produces such a list, so this indicates a bug in the caller;
    /// use [`MarkupRenderer::try_render`] for spans of unknown origin.
    #[must_use]
    pub fn render(&self, spans: &[Span], text: &str) -> Rendered {
        match self.try_render(spans, text) {
            Ok(rendered) => rendered,
            Err(e) => panic!("render called with spans that do not cover the text: {}", e),
        }
    }

    /// Render, reporting an invalid span list as
    /// [`rapport_core::Error::InvalidSpans`] wrapped in [`crate::Error::Core`].
    pub fn try_render(&self, spans: &[Span], text: &str) -> Result<Rendered> {
        check_coverage(spans, text)?;

        let mut out = Writer::with_capacity(text.len() * 2);
        for span in spans {
            let slice = &text[span.start..span.end];
            match &span.kind {
                SpanKind::Plain => out.text(slice, span.start),
                kind => {
                    out.checkpoint(span.start);
                    self.open_tag(&mut out.markup, kind, slice);
                    out.text(slice, span.start);
                    out.checkpoint(span.end);
                    out.markup.push_str("</span>");
                }
            }
        }
        out.checkpoint(text.len());

        Ok(Rendered {
            markup: out.markup,
            checkpoints: out.checkpoints,
        })
    }

    fn open_tag(&self, out: &mut String, kind: &SpanKind, name: &str) {
        let prefix = &self.config.class_prefix;
        let role = kind.role();
        let color = match kind {
            SpanKind::Known(id) => self
                .index
                .and_then(|idx| idx.get(id))
                .and_then(|e| e.color.as_deref())
                .and_then(css_color)
                .unwrap_or(self.config.default_known_color.as_str()),
            _ => self.config.candidate_color.as_str(),
        };

        out.push_str("<span class=\"");
        escape_into(prefix, out);
        out.push_str("-entity ");
        escape_into(prefix, out);
        out.push('-');
        out.push_str(role);
        out.push_str("\" data-role=\"");
        out.push_str(role);
        out.push('"');
        if let SpanKind::Known(id) = kind {
            out.push_str(" data-entity-id=\"");
            escape_into(&id.to_string(), out);
            out.push('"');
        }
        out.push_str(" data-name=\"");
        escape_into(name, out);
        out.push_str("\" style=\"background-color: ");
        escape_into(&tint(color), out);
        out.push_str("; border-bottom: 2px solid ");
        escape_into(color, out);
        out.push_str("\">");
    }
}

struct Writer {
    markup: String,
    checkpoints: Vec<(usize, usize)>,
}

impl Writer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            markup: String::with_capacity(capacity),
            checkpoints: Vec::new(),
        }
    }

    fn checkpoint(&mut self, source: usize) {
        let rendered = self.markup.len();
        if self.checkpoints.last() != Some(&(rendered, source)) {
            self.checkpoints.push((rendered, source));
        }
    }

    /// Escape `slice` (which starts at `source_start`) into the markup.
    fn text(&mut self, slice: &str, source_start: usize) {
        for (i, c) in slice.char_indices() {
            self.checkpoint(source_start + i);
            push_escaped(c, &mut self.markup);
        }
    }
}

fn push_escaped(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        c => out.push(c),
    }
}

fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        push_escaped(c, out);
    }
}

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(s, &mut out);
    out
}

/// Accept only characters that can appear in a CSS color value.
pub(crate) fn css_color(color: &str) -> Option<&str> {
    let color = color.trim();
    let ok = !color.is_empty()
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '));
    ok.then_some(color)
}

/// Translucent background for a hex color; other colors are used as-is.
fn tint(color: &str) -> String {
    let hex = color.strip_prefix('#').filter(|h| h.is_ascii()).unwrap_or("");
    let channels = match hex.len() {
        3 => hex
            .chars()
            .map(|c| u8::from_str_radix(&format!("{c}{c}"), 16).ok())
            .collect::<Option<Vec<u8>>>(),
        6 => (0..3)
            .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok())
            .collect::<Option<Vec<u8>>>(),
        _ => None,
    };
    match channels.as_deref() {
        Some([r, g, b]) => format!("rgba({}, {}, {}, 0.2)", r, g, b),
        _ => color.to_string(),
    }
}

/// Remove wrapper elements and decode escapes, recovering the source text.
///
/// This is the inverse of rendering for markup produced by this module.
#[must_use]
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(i) = rest.find(['<', '&']) {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        if rest.starts_with('<') {
            match rest.find('>') {
                Some(end) => rest = &rest[end + 1..],
                None => {
                    rest = "";
                }
            }
            continue;
        }
        let decoded = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#39;", '\''),
        ]
        .into_iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match decoded {
            Some((entity, c)) => {
                out.push(c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render spans with default styling.
///
/// This function has no roster, so every known entity gets the default
/// known color regardless of its stored color. Use [`render_with_index`] (or
/// a [`MarkupRenderer`] built with [`MarkupRenderer::with_index`]) to color
/// known entities from the roster.
///
/// # Panics
///
/// Panics if `spans` is not a gapless covering of `text`.
#[must_use]
pub fn render(spans: &[Span], text: &str) -> String {
    MarkupRenderer::new().render(spans, text).into_string()
}

/// Render spans, coloring known entities with their stored roster color.
///
/// Entities without a usable color fall back to the default known color.
///
/// # Panics
///
/// Panics if `spans` is not a gapless covering of `text`.
#[must_use]
pub fn render_with_index(spans: &[Span], text: &str, index: &EntityIndex) -> String {
    MarkupRenderer::new()
        .with_index(index)
        .render(spans, text)
        .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotate, Error};
    use rapport_core::Entity;

    fn roster() -> EntityIndex {
        EntityIndex::from_entities(vec![Entity::new(1, "Alice").with_color("#ff0000")])
    }

    #[test]
    fn test_render_known_and_candidate() {
        let text = "Alice met Bob";
        let idx = roster();
        let a = annotate(text, &idx);
        let html = MarkupRenderer::new().with_index(&idx).render(&a.spans, text);
        let html = html.as_str();

        assert!(html.starts_with("<span class=\"rapport-entity rapport-known\" data-role=\"known\" data-entity-id=\"1\""));
        assert!(html.contains("rgba(255, 0, 0, 0.2)"));
        assert!(html.contains("border-bottom: 2px solid #ff0000"));
        assert!(html.contains(">Alice</span> met <span"));
        assert!(html.contains("data-role=\"candidate\" data-name=\"Bob\""));
        assert!(html.contains("#f0ad4e"));
        assert!(html.ends_with(">Bob</span>"));
    }

    #[test]
    fn test_free_render_uses_default_known_color() {
        let text = "Alice met Bob";
        let idx = roster();
        let a = annotate(text, &idx);

        let plain = render(&a.spans, text);
        assert!(plain.contains("border-bottom: 2px solid #5bc0de"));
        assert!(!plain.contains("#ff0000"));

        let colored = render_with_index(&a.spans, text, &idx);
        assert!(colored.contains("border-bottom: 2px solid #ff0000"));
        assert!(!colored.contains("#5bc0de"));
        assert_eq!(
            colored,
            MarkupRenderer::new().with_index(&idx).render(&a.spans, text).as_str()
        );
    }

    #[test]
    fn test_plain_text_escaped_once() {
        let text = "a < b && \"c\" > 'd'";
        let spans = vec![Span::plain(0, text.len())];
        assert_eq!(
            render(&spans, text),
            "a &lt; b &amp;&amp; &quot;c&quot; &gt; &#39;d&#39;"
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
        assert_eq!(strip_markup(&html_escape("O'Brien & \"Zoë\"")), "O'Brien & \"Zoë\"");
    }

    #[test]
    fn test_entity_text_escaped_before_wrapping() {
        let text = "Tom&Jerry";
        let idx = EntityIndex::from_entities(vec![Entity::new(7, "Tom&Jerry")]);
        let a = annotate(text, &idx);
        let html = render(&a.spans, text);
        assert!(html.contains(">Tom&amp;Jerry</span>"));
        assert!(html.contains("data-name=\"Tom&amp;Jerry\""));
        assert!(!html.contains("&amp;amp;"));
    }

    #[test]
    fn test_hostile_color_falls_back() {
        let text = "Eve";
        let idx = EntityIndex::from_entities(vec![
            Entity::new(1, "Eve").with_color("red\"><script>alert(1)</script>"),
        ]);
        let a = annotate(text, &idx);
        let html = MarkupRenderer::new().with_index(&idx).render(&a.spans, text);
        assert!(!html.as_str().contains("<script>"));
        assert!(html.as_str().contains("#5bc0de"));
    }

    #[test]
    fn test_named_color_kept() {
        assert_eq!(tint("teal"), "teal");
        assert_eq!(tint("#0f0"), "rgba(0, 255, 0, 0.2)");
        assert_eq!(tint("#zzzzzz"), "#zzzzzz");
        assert_eq!(css_color(" rgb(1, 2, 3) "), Some("rgb(1, 2, 3)"));
        assert_eq!(css_color("red;x"), None);
    }

    #[test]
    fn test_strip_markup_roundtrip() {
        let text = "Alice & <Bob> said \"hi\" to O'Brien";
        let idx = roster();
        let a = annotate(text, &idx);
        let html = render(&a.spans, text);
        assert_eq!(strip_markup(&html), text);
    }

    #[test]
    fn test_strip_markup_leaves_unknown_entities() {
        assert_eq!(strip_markup("a &nbsp; b"), "a &nbsp; b");
        assert_eq!(strip_markup("x<span a=\"1\">y</span>z"), "xyz");
    }

    #[test]
    fn test_offset_map() {
        let text = "Alice met Bob";
        let idx = roster();
        let a = annotate(text, &idx);
        let r = MarkupRenderer::new().render(&a.spans, text);
        let html = r.as_str();

        // Inside the opening tag: start of the entity.
        assert_eq!(r.map_rendered_offset_to_source(3), 0);
        let alice_at = html.find(">Alice").unwrap() + 1;
        assert_eq!(r.map_rendered_offset_to_source(alice_at), 0);
        assert_eq!(r.map_rendered_offset_to_source(alice_at + 2), 2);
        // Inside "</span>": end of the entity.
        let close = html.find("</span>").unwrap();
        assert_eq!(r.map_rendered_offset_to_source(close + 3), 5);
        let met = html.find(" met ").unwrap();
        assert_eq!(r.map_rendered_offset_to_source(met + 1), 6);
        assert_eq!(r.map_rendered_offset_to_source(html.len()), text.len());
        assert_eq!(r.map_rendered_offset_to_source(html.len() + 50), text.len());

        assert_eq!(r.source_to_rendered(0), alice_at);
        assert_eq!(r.source_to_rendered(6), met + 1);
    }

    #[test]
    fn test_offset_map_inside_escape() {
        let text = "a&b";
        let r = MarkupRenderer::new().render(&[Span::plain(0, 3)], text);
        assert_eq!(r.as_str(), "a&amp;b");
        assert_eq!(r.map_rendered_offset_to_source(1), 1);
        assert_eq!(r.map_rendered_offset_to_source(3), 1);
        assert_eq!(r.map_rendered_offset_to_source(6), 2);
        assert_eq!(r.source_to_rendered(2), 6);
    }

    #[test]
    fn test_empty_text() {
        let r = MarkupRenderer::new().render(&[], "");
        assert_eq!(r.as_str(), "");
        assert_eq!(r.map_rendered_offset_to_source(0), 0);
    }

    #[test]
    fn test_try_render_rejects_gaps() {
        let text = "abcdef";
        let err = MarkupRenderer::new()
            .try_render(&[Span::plain(0, 2), Span::plain(3, 6)], text)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Core(rapport_core::Error::InvalidSpans(_))
        ));
        assert!(err.to_string().contains("starts at 3"), "{}", err);
    }

    #[test]
    #[should_panic(expected = "do not cover")]
    fn test_render_panics_on_invalid_spans() {
        let _ = render(&[Span::plain(0, 2)], "abcdef");
    }

    #[test]
    fn test_custom_class_prefix() {
        let text = "Bob";
        let a = annotate(text, &EntityIndex::new());
        let config = RenderConfig {
            class_prefix: "jr".into(),
            ..RenderConfig::default()
        };
        let html = MarkupRenderer::with_config(config).render(&a.spans, text);
        assert!(html.as_str().starts_with("<span class=\"jr-entity jr-candidate\""));
    }
}
