//! Markdown to styled terminal lines for assistant replies.
//!
//! The renderer is width-agnostic: it emits logical lines and leaves wrapping
//! to the `Paragraph` widget. Every block ends with a blank separator line and
//! the trailing separator is trimmed so callers control spacing between
//! messages.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::ui::theme::Theme;

#[derive(Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct LineBuilder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    quote_depth: usize,
    quote_style: Style,
}

impl LineBuilder {
    fn push(&mut self, content: impl Into<String>, style: Style) {
        let content = content.into();
        if content.is_empty() {
            return;
        }
        if self.current.is_empty() && self.quote_depth > 0 {
            self.current
                .push(Span::styled("│ ".repeat(self.quote_depth), self.quote_style));
        }
        self.current.push(Span::styled(content, style));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| !is_blank(line)) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(is_blank) {
            self.lines.pop();
        }
        self.lines
    }
}

pub fn render_markdown(content: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(content, options);

    let base = theme.assistant_text_style;
    let mut out = LineBuilder {
        lines: Vec::new(),
        current: Vec::new(),
        quote_depth: 0,
        quote_style: theme.blockquote_style,
    };
    let mut style_stack: Vec<Style> = vec![base];
    let mut list_stack: Vec<ListKind> = Vec::new();
    let mut link_stack: Vec<String> = Vec::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {}
                Tag::Heading { .. } => {
                    out.flush();
                    style_stack.push(theme.heading_style);
                }
                Tag::BlockQuote(_) => {
                    out.flush();
                    out.quote_depth += 1;
                    style_stack.push(theme.blockquote_style);
                }
                Tag::List(start) => {
                    out.flush();
                    list_stack.push(match start {
                        Some(n) => ListKind::Ordered(n),
                        None => ListKind::Unordered,
                    });
                }
                Tag::Item => {
                    out.flush();
                    let indent = "  ".repeat(list_stack.len().saturating_sub(1));
                    let marker = match list_stack.last_mut() {
                        Some(ListKind::Ordered(n)) => {
                            let cur = *n;
                            *n += 1;
                            format!("{indent}{cur}. ")
                        }
                        _ => format!("{indent}- "),
                    };
                    out.push(marker, theme.list_marker_style);
                }
                Tag::CodeBlock(kind) => {
                    out.blank();
                    if let CodeBlockKind::Fenced(lang) = kind {
                        if !lang.is_empty() {
                            out.push(lang.to_string(), theme.list_marker_style);
                            out.flush();
                        }
                    }
                    in_code_block = true;
                }
                Tag::Emphasis => push_modifier(&mut style_stack, Modifier::ITALIC),
                Tag::Strong => push_modifier(&mut style_stack, Modifier::BOLD),
                Tag::Strikethrough => push_modifier(&mut style_stack, Modifier::CROSSED_OUT),
                Tag::Link { dest_url, .. } => {
                    link_stack.push(dest_url.to_string());
                    style_stack.push(theme.link_style);
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph => {
                    if list_stack.is_empty() {
                        out.blank();
                    } else {
                        out.flush();
                    }
                }
                TagEnd::Heading(_) => {
                    out.blank();
                    style_stack.pop();
                }
                TagEnd::BlockQuote(_) => {
                    out.flush();
                    out.quote_depth = out.quote_depth.saturating_sub(1);
                    style_stack.pop();
                    out.blank();
                }
                TagEnd::List(_) => {
                    list_stack.pop();
                    if list_stack.is_empty() {
                        out.blank();
                    } else {
                        out.flush();
                    }
                }
                TagEnd::Item => out.flush(),
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    out.blank();
                }
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                    style_stack.pop();
                }
                TagEnd::Link => {
                    style_stack.pop();
                    if let Some(url) = link_stack.pop() {
                        let shown = out
                            .current
                            .last()
                            .is_some_and(|span| span.content == url.as_str());
                        if !shown && !url.is_empty() {
                            out.push(format!(" ({url})"), theme.placeholder_style);
                        }
                    }
                }
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    for line in text.lines() {
                        out.push(format!("  {}", detab(line)), theme.code_block_style);
                        out.flush();
                    }
                } else {
                    let style = style_stack.last().copied().unwrap_or(base);
                    out.push(detab(&text), style);
                }
            }
            Event::Code(code) => out.push(code.to_string(), theme.inline_code_style),
            Event::SoftBreak => {
                let style = style_stack.last().copied().unwrap_or(base);
                out.push(" ", style);
            }
            Event::HardBreak => out.flush(),
            Event::Rule => {
                out.flush();
                out.push("───", theme.list_marker_style);
                out.blank();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                out.push(marker, theme.list_marker_style);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = style_stack.last().copied().unwrap_or(base);
                for (i, line) in html.lines().enumerate() {
                    if i > 0 {
                        out.flush();
                    }
                    out.push(line.to_string(), style);
                }
            }
            _ => {}
        }
    }

    out.finish()
}

pub fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|span| span.content.is_empty())
}

fn push_modifier(stack: &mut Vec<Style>, modifier: Modifier) {
    let style = stack.last().copied().unwrap_or_default().add_modifier(modifier);
    stack.push(style);
}

fn detab(s: &str) -> String {
    s.replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[Line<'static>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let theme = Theme::light();
        let lines = render_markdown("First paragraph.\n\nSecond one.", &theme);
        assert_eq!(text_of(&lines), vec!["First paragraph.", "", "Second one."]);
    }

    #[test]
    fn soft_breaks_join_into_one_line() {
        let theme = Theme::light();
        let lines = render_markdown("one\ntwo", &theme);
        assert_eq!(text_of(&lines), vec!["one two"]);
    }

    #[test]
    fn lists_get_markers_and_numbers() {
        let theme = Theme::dark();
        let lines = render_markdown("- apples\n- pears\n\n3. three\n4. four", &theme);
        assert_eq!(
            text_of(&lines),
            vec!["- apples", "- pears", "", "3. three", "4. four"]
        );
    }

    #[test]
    fn strong_and_emphasis_add_modifiers() {
        let theme = Theme::dark();
        let lines = render_markdown("a **bold** and *soft* word", &theme);
        let spans = &lines[0].spans;
        let bold = spans.iter().find(|s| s.content == "bold").unwrap();
        let soft = spans.iter().find(|s| s.content == "soft").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        assert!(soft.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn inline_code_uses_code_style() {
        let theme = Theme::dark();
        let lines = render_markdown("run `cargo fmt` now", &theme);
        let code = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "cargo fmt")
            .unwrap();
        assert_eq!(code.style, theme.inline_code_style);
    }

    #[test]
    fn code_blocks_keep_their_lines() {
        let theme = Theme::light();
        let lines = render_markdown("```rust\nfn main() {}\nlet x = 1;\n```", &theme);
        assert_eq!(
            text_of(&lines),
            vec!["rust", "  fn main() {}", "  let x = 1;"]
        );
    }

    #[test]
    fn links_show_their_destination() {
        let theme = Theme::light();
        let lines = render_markdown("see [docs](https://docs.rs)", &theme);
        assert_eq!(text_of(&lines), vec!["see docs (https://docs.rs)"]);

        let autolink = render_markdown("<https://docs.rs>", &theme);
        assert_eq!(text_of(&autolink), vec!["https://docs.rs"]);
    }

    #[test]
    fn headings_are_styled_and_separated() {
        let theme = Theme::dark();
        let lines = render_markdown("# Title\nbody", &theme);
        assert_eq!(text_of(&lines), vec!["Title", "", "body"]);
        assert_eq!(lines[0].spans[0].style, theme.heading_style);
    }

    #[test]
    fn blockquotes_are_prefixed() {
        let theme = Theme::dark();
        let lines = render_markdown("> quoted", &theme);
        assert_eq!(text_of(&lines), vec!["│ quoted"]);
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render_markdown("", &Theme::light()).is_empty());
    }
}
