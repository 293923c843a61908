//! Syntax highlighting for the editor panel and for code blocks in reviews.
//!
//! Highlighting runs over the whole buffer, so results are cached per source
//! revision and only recomputed after an edit or a language change.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use revivr_core::Language;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Highlighted lines for one source revision.
#[derive(Debug, Default)]
pub struct HighlightCache {
    revision: Option<u64>,
    lines: Vec<Line<'static>>,
}

impl HighlightCache {
    /// Returns highlighted lines for `text`, recomputing only when `revision` moved.
    pub fn lines(&mut self, revision: u64, text: &str, language: Language) -> &[Line<'static>] {
        if self.revision != Some(revision) {
            self.lines = highlight_source(text, language);
            self.revision = Some(revision);
        }
        &self.lines
    }
}

/// The syntect syntax for `language`.
///
/// The bundled syntax set has no JSX or TypeScript grammar; both fall back to
/// JavaScript, anything else unknown to plain text.
fn syntax_for(language: Language) -> &'static SyntaxReference {
    PS.find_syntax_by_extension(language.extension())
        .or_else(|| match language {
            Language::Jsx | Language::TypeScript => PS.find_syntax_by_extension("js"),
            _ => None,
        })
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Highlights `text` into one `Line` per source line.
///
/// A trailing newline (or empty text) yields a final empty line so the cursor
/// always has a row to sit on.
pub fn highlight_source(text: &str, language: Language) -> Vec<Line<'static>> {
    let mut out = highlight_with(syntax_for(language), text);
    if text.is_empty() || text.ends_with('\n') {
        out.push(Line::default());
    }
    out
}

/// Highlights a fenced code block from a review.
///
/// `info` is the fence info string (`py`, `typescript`, `rust ignore`, ...).
/// The five editor languages resolve as in the editor; other tokens go
/// through syntect's own lookup, and unknown ones render as plain text.
pub fn highlight_snippet(code: &str, info: &str) -> Vec<Line<'static>> {
    highlight_with(syntax_for_fence(info), code)
}

fn syntax_for_fence(info: &str) -> &'static SyntaxReference {
    let token = info
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if let Ok(language) = token.parse::<Language>() {
        return syntax_for(language);
    }
    match token.as_str() {
        "js" => syntax_for(Language::JavaScript),
        "ts" | "tsx" => syntax_for(Language::TypeScript),
        "" => PS.find_syntax_plain_text(),
        other => PS
            .find_syntax_by_token(other)
            .unwrap_or_else(|| PS.find_syntax_plain_text()),
    }
}

fn highlight_with(syntax: &SyntaxReference, text: &str) -> Vec<Line<'static>> {
    let theme = TS
        .themes
        .get("base16-ocean.dark")
        .or_else(|| TS.themes.values().next());

    match theme {
        Some(theme) => {
            let mut h = HighlightLines::new(syntax, theme);
            LinesWithEndings::from(text)
                .map(|line| Line::from(build_syntect_spans(line, &mut h)))
                .collect()
        }
        None => text.lines().map(|l| Line::raw(l.to_owned())).collect(),
    }
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Only the foreground and font style are carried over; the editor panel keeps
/// the terminal background.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::FontStyle;
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Highlights one newline-terminated line; falls back to a plain span on error.
fn build_syntect_spans(line: &str, h: &mut HighlightLines) -> Vec<Span<'static>> {
    let code = line.trim_end_matches(['\r', '\n']);
    let Ok(ranges) = h.highlight_line(line, &PS) else {
        return vec![Span::raw(code.to_owned())];
    };
    ranges
        .into_iter()
        .map(|(style, piece)| (style, piece.trim_end_matches(['\r', '\n'])))
        .filter(|(_, piece)| !piece.is_empty())
        .map(|(style, piece)| syntect_to_span(style, piece))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn one_line_per_source_line_plus_trailing_row() {
        let lines = highlight_source("let a = 1;\nlet b = 2;\n", Language::JavaScript);
        assert_eq!(lines.len(), 3);
        assert_eq!(plain(&lines[0]), "let a = 1;");
        assert_eq!(plain(&lines[1]), "let b = 2;");
        assert_eq!(plain(&lines[2]), "");
    }

    #[test]
    fn empty_text_has_one_row() {
        assert_eq!(highlight_source("", Language::Python).len(), 1);
    }

    #[test]
    fn every_language_highlights_without_losing_text() {
        let src = "class A:\n    pass";
        for lang in Language::ALL {
            let lines = highlight_source(src, lang);
            let joined: Vec<String> = lines.iter().map(plain).collect();
            assert_eq!(joined, vec!["class A:", "    pass"], "{lang}");
        }
    }

    #[test]
    fn fenced_snippets_resolve_language_tokens() {
        let python = highlight_snippet("def f():\n    return 1\n", "py");
        let text: Vec<String> = python.iter().map(plain).collect();
        assert_eq!(text, vec!["def f():", "    return 1"]);
        assert!(python[0].spans.len() > 1, "tokens are styled separately");
        assert_eq!(highlight_snippet("def f():\n", "").first().map(|l| l.spans.len()), Some(1));

        assert_eq!(syntax_for_fence("ts").name, syntax_for(Language::JavaScript).name);
        assert_eq!(syntax_for_fence("Java extra").name, syntax_for(Language::Java).name);
        assert_eq!(syntax_for_fence("").name, PS.find_syntax_plain_text().name);
        assert_eq!(syntax_for_fence("no-such-lang").name, PS.find_syntax_plain_text().name);
    }

    #[test]
    fn cache_recomputes_only_on_new_revision() {
        let mut cache = HighlightCache::default();
        assert_eq!(cache.lines(1, "a", Language::Java).len(), 1);
        // Same revision: stale text is not re-read.
        assert_eq!(plain(&cache.lines(1, "a\nb", Language::Java)[0]), "a");
        assert_eq!(cache.lines(2, "a\nb", Language::Java).len(), 2);
    }
}
