// @zen-component: RELAY-TextProcessor
//
//! Reply text post-processing.
//!
//! Two passes in fixed order:
//!
//! 1. `:shortcode:` tokens become emoji glyphs (gemoji table).
//! 2. `$$…$$` block math, then `$…$` inline math, is rendered to MathML.
//!
//! Block spans are located first and inline spans are only searched for in
//! the text between them, so `$$` is never read as two inline delimiters.
//! A failed render emits the raw expression instead.
//!
//! Unless disabled, every piece of text that is not renderer output is
//! HTML-escaped, since the reply comes from a remote party. Renderer output
//! carries remote characters too, so the text of its MathML leaf elements is
//! escaped as well.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z0-9_+\-]+):").expect("shortcode pattern"));
static BLOCK_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").expect("block math pattern"));
static INLINE_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([^$]+)\$").expect("inline math pattern"));
// Token elements never nest, so the first closing token tag ends the element.
static MATHML_LEAF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(<(?:mi|mn|mo|ms|mtext)(?:\s[^>]*)?>)(.*?)(</(?:mi|mn|mo|ms|mtext)>)")
        .expect("mathml leaf pattern")
});

/// `latex2mathml` reports some parse failures inline instead of as `Err`.
const MATHML_PARSE_ERROR: &str = "[PARSE ERROR";

/// How an expression is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// Standalone, centered (`$$…$$`).
    Display,
    /// Within a line of text (`$…$`).
    Inline,
}

#[derive(Debug, Error)]
#[error("math render failed: {0}")]
pub struct RenderError(pub String);

/// Renders a TeX-style expression to HTML-embeddable markup.
pub trait MathRenderer: Send + Sync {
    fn render(&self, expr: &str, mode: MathMode) -> Result<String, RenderError>;
}

/// Renders to MathML via `latex2mathml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMlRenderer;

impl MathRenderer for MathMlRenderer {
    fn render(&self, expr: &str, mode: MathMode) -> Result<String, RenderError> {
        let style = match mode {
            MathMode::Display => latex2mathml::DisplayStyle::Block,
            MathMode::Inline => latex2mathml::DisplayStyle::Inline,
        };
        let markup =
            latex2mathml::latex_to_mathml(expr, style).map_err(|e| RenderError(e.to_string()))?;
        if markup.contains(MATHML_PARSE_ERROR) {
            return Err(RenderError(format!("unsupported expression: {expr}")));
        }
        Ok(markup)
    }
}

/// Turns raw reply text into a display fragment.
pub struct TextProcessor {
    renderer: Box<dyn MathRenderer>,
    escape_html: bool,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(MathMlRenderer)
    }
}

impl TextProcessor {
    /// Processor using `renderer`, with HTML escaping on.
    pub fn new(renderer: impl MathRenderer + 'static) -> Self {
        Self {
            renderer: Box::new(renderer),
            escape_html: true,
        }
    }

    /// Turns HTML escaping of non-markup text on or off.
    pub fn with_escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }

    pub fn escapes_html(&self) -> bool {
        self.escape_html
    }

    /// Applies emoji substitution, then math rendering.
    pub fn process(&self, raw: &str) -> String {
        let text = emojify(raw);
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for m in BLOCK_MATH.find_iter(&text) {
            self.push_inline_segment(&text[last..m.start()], &mut out);
            let whole = m.as_str();
            self.push_math(&whole[2..whole.len() - 2], MathMode::Display, &mut out);
            last = m.end();
        }
        self.push_inline_segment(&text[last..], &mut out);

        out
    }

    fn push_inline_segment(&self, segment: &str, out: &mut String) {
        let mut last = 0;
        for m in INLINE_MATH.find_iter(segment) {
            self.push_text(&segment[last..m.start()], out);
            let whole = m.as_str();
            self.push_math(&whole[1..whole.len() - 1], MathMode::Inline, out);
            last = m.end();
        }
        self.push_text(&segment[last..], out);
    }

    fn push_math(&self, expr: &str, mode: MathMode, out: &mut String) {
        match self.renderer.render(expr, mode) {
            Ok(markup) if self.escape_html => out.push_str(&escape_mathml_leaves(&markup)),
            Ok(markup) => out.push_str(&markup),
            Err(e) => {
                debug!(error = %e, ?mode, "emitting raw expression");
                self.push_text(expr, out);
            }
        }
    }

    fn push_text(&self, text: &str, out: &mut String) {
        if self.escape_html {
            out.push_str(&html_escape::encode_text(text));
        } else {
            out.push_str(text);
        }
    }
}

/// Escapes the text of MathML token elements, leaving the tags intact.
///
/// Existing entities are decoded first so they are not double-escaped.
pub fn escape_mathml_leaves(markup: &str) -> Cow<'_, str> {
    MATHML_LEAF.replace_all(markup, |caps: &Captures<'_>| {
        let text = html_escape::decode_html_entities(&caps[2]);
        format!("{}{}{}", &caps[1], html_escape::encode_text(&text), &caps[3])
    })
}

/// Replaces known `:shortcode:` tokens with their emoji glyph.
pub fn emojify(text: &str) -> Cow<'_, str> {
    SHORTCODE.replace_all(text, |caps: &Captures<'_>| {
        match emojis::get_by_shortcode(&caps[1]) {
            Some(emoji) => emoji.as_str().to_string(),
            None => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every call and wraps the expression in `<m>` tags.
    #[derive(Clone, Default)]
    struct RecordingRenderer {
        calls: Arc<Mutex<Vec<(String, MathMode)>>>,
    }

    impl MathRenderer for RecordingRenderer {
        fn render(&self, expr: &str, mode: MathMode) -> Result<String, RenderError> {
            self.calls.lock().unwrap().push((expr.to_string(), mode));
            Ok(format!("<m>{expr}</m>"))
        }
    }

    struct FailingRenderer;

    impl MathRenderer for FailingRenderer {
        fn render(&self, expr: &str, _mode: MathMode) -> Result<String, RenderError> {
            Err(RenderError(format!("cannot parse {expr}")))
        }
    }

    #[test]
    fn known_shortcodes_become_glyphs() {
        assert_eq!(emojify("Hello :smile:"), "Hello \u{1F604}");
        assert_eq!(emojify(":wave::rocket:"), "\u{1F44B}\u{1F680}");
    }

    #[test]
    fn unknown_shortcodes_pass_through() {
        assert_eq!(emojify("at 10:30:45 :not_a_real_emoji:"), "at 10:30:45 :not_a_real_emoji:");
    }

    #[test]
    fn plain_text_is_idempotent() {
        let p = TextProcessor::default();
        let input = "Nothing special here, just words.";
        let once = p.process(input);
        assert_eq!(once, input);
        assert_eq!(p.process(&once), once);
    }

    #[test]
    fn lone_dollar_is_left_alone() {
        let p = TextProcessor::default();
        assert_eq!(p.process("it costs $5 today"), "it costs $5 today");
    }

    #[test]
    fn block_is_rendered_before_inline() {
        let renderer = RecordingRenderer::default();
        let p = TextProcessor::new(renderer.clone());
        let out = p.process("$$a+b$$ and $c$");
        assert_eq!(out, "<m>a+b</m> and <m>c</m>");
        assert_eq!(
            *renderer.calls.lock().unwrap(),
            vec![
                ("a+b".to_string(), MathMode::Display),
                ("c".to_string(), MathMode::Inline),
            ]
        );
    }

    #[test]
    fn block_math_spans_lines_non_greedily() {
        let renderer = RecordingRenderer::default();
        let p = TextProcessor::new(renderer.clone());
        p.process("$$\nx = 1\n$$ then $$y$$");
        let calls = renderer.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("\nx = 1\n".to_string(), MathMode::Display));
        assert_eq!(calls[1], ("y".to_string(), MathMode::Display));
    }

    #[test]
    fn failed_render_falls_back_to_raw_expression() {
        let p = TextProcessor::new(FailingRenderer);
        let out = p.process(r"see $\frac{1}{$ and $$x^{2$$");
        assert_eq!(out, r"see \frac{1}{ and x^{2");
    }

    #[test]
    fn prose_and_fallback_are_escaped() {
        let p = TextProcessor::new(FailingRenderer);
        assert_eq!(p.process("<b>1</b> $a<b$"), "&lt;b&gt;1&lt;/b&gt; a&lt;b");
    }

    #[test]
    fn renderer_markup_is_not_escaped() {
        let p = TextProcessor::new(RecordingRenderer::default());
        assert_eq!(p.process("x & $y$"), "x &amp; <m>y</m>");
    }

    #[test]
    fn escaping_can_be_disabled() {
        let p = TextProcessor::new(FailingRenderer).with_escape_html(false);
        assert!(!p.escapes_html());
        assert_eq!(p.process("<i>hi</i> $a<b$"), "<i>hi</i> a<b");
    }

    #[test]
    fn emoji_then_inline_math_with_mathml() {
        let p = TextProcessor::default();
        let out = p.process("Hello :smile: $x^2$");
        assert!(out.starts_with("Hello \u{1F604} "), "got: {out}");
        assert!(out.contains("<math"), "got: {out}");
        assert!(out.contains("<msup>"), "got: {out}");
        assert!(!out.contains('$'), "got: {out}");
    }

    #[test]
    fn unsupported_command_falls_back_with_mathml() {
        let p = TextProcessor::default();
        let out = p.process(r"see $\notacommand{y}$");
        assert_eq!(out, r"see \notacommand{y}");
        assert!(MathMlRenderer.render(r"\notacommand{y}", MathMode::Inline).is_err());
    }

    #[test]
    fn unbalanced_braces_fall_back_with_mathml() {
        let p = TextProcessor::default();
        assert_eq!(p.process(r"$\frac{1}{$"), r"\frac{1}{");
    }

    #[test]
    fn mathml_operators_are_escaped() {
        let p = TextProcessor::default();
        let out = p.process("$a<b$");
        assert!(out.contains("<mo>&lt;</mo>"), "got: {out}");
        assert!(!out.contains("<mo><</mo>"), "got: {out}");
    }

    #[test]
    fn markup_in_math_text_never_reaches_the_page() {
        let p = TextProcessor::default();
        let out = p.process(r"$$\text{</div><script>alert(1)</script>}$$");
        assert!(!out.contains("<script"), "got: {out}");
        assert!(!out.contains("</div>"), "got: {out}");
    }

    #[test]
    fn leaf_escaping_keeps_tags_and_entities() {
        let markup = r#"<math><mi mathvariant="normal">x</mi><mo>></mo><mo>&lt;</mo><mtext>a & b</mtext></math>"#;
        assert_eq!(
            escape_mathml_leaves(markup),
            r#"<math><mi mathvariant="normal">x</mi><mo>&gt;</mo><mo>&lt;</mo><mtext>a &amp; b</mtext></math>"#
        );
    }

    #[test]
    fn mathml_display_mode_is_block() {
        let out = MathMlRenderer
            .render("a+b", MathMode::Display)
            .expect("render");
        assert!(out.contains(r#"display="block""#), "got: {out}");
    }
}
