//! Markdown rendering for the review panel.
//!
//! Reviews arrive as markdown. pulldown-cmark events are folded into ratatui
//! lines: headings, emphasis, lists, block quotes, inline code, and fenced code
//! blocks highlighted the same way as the editor.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::highlight::highlight_snippet;
use crate::theme::Theme;

const QUOTE_BAR: &str = "│ ";
const CODE_INDENT: &str = "  ";
const RULE_WIDTH: usize = 24;

/// Rendered review lines, rebuilt only when the review text changes.
#[derive(Debug, Default)]
pub struct MarkdownCache {
    source: Option<String>,
    lines: Vec<Line<'static>>,
}

impl MarkdownCache {
    pub fn lines(&mut self, text: &str, theme: &Theme) -> &[Line<'static>] {
        if self.source.as_deref() != Some(text) {
            self.lines = render_markdown(text, theme);
            self.source = Some(text.to_owned());
        }
        &self.lines
    }
}

pub fn render_markdown(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut md = MarkdownState::new(theme);
    for event in Parser::new_ext(text, options) {
        match event {
            Event::Start(tag) => md.start_tag(tag),
            Event::End(tag) => md.end_tag(tag),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => md.text(&text),
            Event::Code(code) => md.inline_code(&code),
            Event::SoftBreak => md.text(" "),
            Event::HardBreak => md.flush(),
            Event::Rule => md.rule(),
            Event::TaskListMarker(checked) => md.task_marker(checked),
            _ => {}
        }
    }
    md.finish()
}

struct CodeBlock {
    info: String,
    body: String,
}

struct MarkdownState<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    bold: bool,
    italic: bool,
    strike: bool,
    link: bool,
    heading: Option<HeadingLevel>,
    /// One entry per open list: the next number, or `None` for bullets.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    code_block: Option<CodeBlock>,
}

impl<'t> MarkdownState<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            bold: false,
            italic: false,
            strike: false,
            link: false,
            heading: None,
            lists: Vec::new(),
            quote_depth: 0,
            code_block: None,
        }
    }

    fn style(&self) -> Style {
        let mut style = Style::default().fg(self.theme.review_text);
        if let Some(level) = self.heading {
            style = style
                .fg(self.theme.review_heading)
                .add_modifier(Modifier::BOLD);
            if level == HeadingLevel::H1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strike {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if self.link {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    fn marker_style(&self) -> Style {
        Style::default().fg(self.theme.review_heading)
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.gap();
                self.heading = Some(level);
            }
            Tag::Strong => self.bold = true,
            Tag::Emphasis => self.italic = true,
            Tag::Strikethrough => self.strike = true,
            Tag::Link { .. } => self.link = true,
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                let style = self.marker_style();
                self.spans.push(Span::styled(marker, style));
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_block = Some(CodeBlock {
                    info,
                    body: String::new(),
                });
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() && self.quote_depth == 0 {
                    self.gap();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.heading = None;
                self.gap();
            }
            TagEnd::Strong => self.bold = false,
            TagEnd::Emphasis => self.italic = false,
            TagEnd::Strikethrough => self.strike = false,
            TagEnd::Link => self.link = false,
            TagEnd::Item => self.flush(),
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.gap();
                }
            }
            TagEnd::CodeBlock => {
                if let Some(block) = self.code_block.take() {
                    for line in highlight_snippet(&block.body, &block.info) {
                        let mut spans = vec![Span::raw(CODE_INDENT)];
                        spans.extend(line.spans);
                        self.push_line(spans);
                    }
                }
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(block) = self.code_block.as_mut() {
            block.body.push_str(text);
            return;
        }
        let style = self.style();
        self.spans.push(Span::styled(text.to_owned(), style));
    }

    fn inline_code(&mut self, code: &str) {
        let style = Style::default().fg(self.theme.review_code);
        self.spans.push(Span::styled(code.to_owned(), style));
    }

    fn task_marker(&mut self, checked: bool) {
        let marker = if checked { "[x] " } else { "[ ] " };
        let style = self.marker_style();
        self.spans.push(Span::styled(marker, style));
    }

    fn rule(&mut self) {
        self.flush();
        let style = Style::default().fg(self.theme.placeholder);
        self.push_line(vec![Span::styled("─".repeat(RULE_WIDTH), style)]);
        self.gap();
    }

    /// Ends the line being built, if any.
    fn flush(&mut self) {
        if !self.spans.is_empty() {
            let spans = std::mem::take(&mut self.spans);
            self.push_line(spans);
        }
    }

    fn push_line(&mut self, mut spans: Vec<Span<'static>>) {
        if self.quote_depth > 0 {
            let bar = Span::styled(
                QUOTE_BAR.repeat(self.quote_depth),
                Style::default().fg(self.theme.placeholder),
            );
            spans.insert(0, bar);
        }
        self.lines.push(Line::from(spans));
    }

    /// One blank line between blocks; never leading, never doubled.
    fn gap(&mut self) {
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn render(text: &str) -> Vec<String> {
        render_markdown(text, &Theme::dark()).iter().map(plain).collect()
    }

    #[test]
    fn headings_drop_hashes_and_stand_out() {
        let theme = Theme::dark();
        let lines = render_markdown("# Summary\n\nLooks good.\n\n## Details", &theme);
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(text, vec!["Summary", "", "Looks good.", "", "Details"]);

        let style = lines[0].spans[0].style;
        assert_eq!(style.fg, Some(theme.review_heading));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(lines[2].spans[0].style.fg, Some(theme.review_text));
    }

    #[test]
    fn emphasis_and_inline_code_are_styled_spans() {
        let theme = Theme::dark();
        let lines = render_markdown("Use **care**, *thought* and `unwrap()`.", &theme);
        assert_eq!(lines.len(), 1);
        let spans = &lines[0].spans;

        let find = |content: &str| {
            spans
                .iter()
                .find(|s| s.content == content)
                .map(|s| s.style)
                .unwrap_or_else(|| panic!("no span {content:?} in {spans:?}"))
        };
        assert!(find("care").add_modifier.contains(Modifier::BOLD));
        assert!(find("thought").add_modifier.contains(Modifier::ITALIC));
        assert_eq!(find("unwrap()").fg, Some(theme.review_code));
        assert_eq!(plain(&lines[0]), "Use care, thought and unwrap().");
    }

    #[test]
    fn lists_get_markers_and_nesting() {
        assert_eq!(
            render("- one\n- two\n  - nested\n\n3. third\n4. fourth\n\nAfter."),
            vec!["• one", "• two", "  • nested", "", "3. third", "4. fourth", "", "After."]
        );
    }

    #[test]
    fn task_items_show_their_state() {
        assert_eq!(render("- [x] done\n- [ ] todo"), vec!["• [x] done", "• [ ] todo"]);
    }

    #[test]
    fn fenced_code_is_indented_and_highlighted() {
        let theme = Theme::dark();
        let lines = render_markdown(
            "Try this:\n\n```python\ndef f():\n    return 1\n```\n\nDone.",
            &theme,
        );
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            vec!["Try this:", "", "  def f():", "      return 1", "", "Done."]
        );
        assert!(lines[2].spans.len() > 2, "code tokens are highlighted separately");
    }

    #[test]
    fn quotes_rules_and_soft_breaks() {
        let rule = "─".repeat(RULE_WIDTH);
        assert_eq!(
            render("> mind the\n> edge case\n\n---\n\nend"),
            vec!["│ mind the edge case", "", rule.as_str(), "", "end"]
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render("Server error: 500"), vec!["Server error: 500"]);
        assert!(render("").is_empty());
    }

    #[test]
    fn cache_rerenders_only_on_new_text() {
        let theme = Theme::dark();
        let mut cache = MarkdownCache::default();
        assert_eq!(cache.lines("# A", &theme).len(), 1);
        assert_eq!(cache.lines("# A", &theme).len(), 1);
        assert_eq!(cache.lines("a\n\nb", &theme).len(), 3);
    }
}
