use std::time::Duration;

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::markdown::{is_blank, render_markdown};
use super::theme::Theme;
use crate::core::message::{Message, Source};
use crate::core::session::SessionState;

const USER_PREFIX: &str = "You: ";
const USER_CONTINUATION: &str = "     ";
pub const PLACEHOLDER_TEXT: &str = "Thinking…";

/// Result of a layout pass over the transcript.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// Lay out every message oldest-first, followed by the typing placeholder
    /// while a reply is awaited. `pulse` drives the placeholder glyph.
    pub fn layout_session(state: &SessionState, theme: &Theme, pulse: Duration) -> Layout {
        let mut lines = Vec::new();

        for msg in &state.messages {
            lines.extend(Self::message_lines(msg, theme));
            lines.push(Line::default());
        }

        if state.awaiting_reply() {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", pulse_glyph(pulse)), theme.indicator_style),
                Span::styled(PLACEHOLDER_TEXT, theme.placeholder_style),
            ]));
        }

        Layout { lines }
    }

    pub fn message_lines(msg: &Message, theme: &Theme) -> Vec<Line<'static>> {
        if msg.is_user() {
            return user_lines(&msg.text, theme);
        }
        let mut lines = render_markdown(&msg.text, theme);
        if msg.has_sources() {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(source_lines(&msg.sources, theme));
        }
        lines
    }
}

fn user_lines(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 {
                Span::styled(USER_PREFIX, theme.user_prefix_style)
            } else {
                Span::raw(USER_CONTINUATION)
            };
            Line::from(vec![
                prefix,
                Span::styled(line.to_string(), theme.user_text_style),
            ])
        })
        .collect()
}

fn source_lines(sources: &[Source], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Sources",
        theme.sources_heading_style,
    ))];
    for (i, source) in sources.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}. ", i + 1), theme.list_marker_style),
            Span::styled(source.title.clone(), theme.source_title_style),
            Span::styled(" — ", theme.list_marker_style),
            Span::styled(source.uri.clone(), theme.source_link_style),
        ]));
    }
    lines
}

/// Pulse over one second: ○ → ◐ → ● → ◐ → ○.
pub fn pulse_glyph(elapsed: Duration) -> &'static str {
    let elapsed = elapsed.as_millis() as f32 / 1000.0;
    let pulse_phase = (elapsed * 2.0) % 2.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    if pulse_intensity < 0.33 {
        "○"
    } else if pulse_intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

/// Calculate how many rows `lines` occupy once word-wrapped to `width`,
/// matching `Paragraph` with `Wrap { trim: true }`.
pub fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    lines.iter().fold(0u16, |total, line| {
        total.saturating_add(wrapped_rows(line, width))
    })
}

fn wrapped_rows(line: &Line, width: u16) -> u16 {
    if is_blank(line) || width == 0 {
        return 1;
    }
    let text = line.to_string();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 1;
    }

    let width = width as usize;
    let mut rows = 1u16;
    let mut current = 0usize;
    for word in trimmed.split_whitespace() {
        let word_width = word.width();
        if current > 0 && current + 1 + word_width > width {
            rows = rows.saturating_add(1);
            current = 0;
        }
        if word_width > width {
            // Long words are broken across rows.
            let extra = (word_width.saturating_sub(1) / width) as u16;
            rows = rows.saturating_add(extra);
            current = word_width % width;
            if current == 0 {
                current = width;
            }
            continue;
        }
        if current > 0 {
            current += 1;
        }
        current += word_width;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::ThemeMode;

    fn text_of(lines: &[Line<'static>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    fn state_with(messages: Vec<Message>, is_loading: bool) -> SessionState {
        let mut state = SessionState::new(ThemeMode::Light);
        state.messages = messages;
        state.is_loading = is_loading;
        state
    }

    #[test]
    fn user_messages_are_prefixed() {
        let theme = Theme::light();
        let lines = LayoutEngine::message_lines(&Message::user("hi\nthere"), &theme);
        assert_eq!(text_of(&lines), vec!["You: hi", "     there"]);
        assert_eq!(lines[0].spans[0].style, theme.user_prefix_style);
    }

    #[test]
    fn assistant_sources_are_numbered() {
        let theme = Theme::dark();
        let msg = Message::assistant(
            "Answer.",
            vec![
                Source {
                    uri: "https://a.com".into(),
                    title: "A".into(),
                },
                Source {
                    uri: "https://b.com".into(),
                    title: "B".into(),
                },
            ],
        );
        let lines = LayoutEngine::message_lines(&msg, &theme);
        assert_eq!(
            text_of(&lines),
            vec![
                "Answer.",
                "",
                "Sources",
                "1. A — https://a.com",
                "2. B — https://b.com"
            ]
        );
    }

    #[test]
    fn assistant_without_sources_has_no_sources_block() {
        let theme = Theme::dark();
        let lines = LayoutEngine::message_lines(&Message::assistant("plain", Vec::new()), &theme);
        assert_eq!(text_of(&lines), vec!["plain"]);
    }

    #[test]
    fn placeholder_follows_unanswered_user_message() {
        let theme = Theme::light();
        let state = state_with(vec![Message::user("question")], true);
        let layout = LayoutEngine::layout_session(&state, &theme, Duration::ZERO);
        let last = layout.lines.last().unwrap().to_string();
        assert_eq!(last, format!("○ {PLACEHOLDER_TEXT}"));
    }

    #[test]
    fn no_placeholder_when_idle() {
        let theme = Theme::light();
        let state = state_with(
            vec![Message::user("q"), Message::assistant("a", Vec::new())],
            false,
        );
        let layout = LayoutEngine::layout_session(&state, &theme, Duration::ZERO);
        assert!(!text_of(&layout.lines)
            .iter()
            .any(|line| line.contains(PLACEHOLDER_TEXT)));
        assert_eq!(text_of(&layout.lines), vec!["You: q", "", "a", ""]);
    }

    #[test]
    fn pulse_cycles_through_glyphs() {
        assert_eq!(pulse_glyph(Duration::from_millis(0)), "○");
        assert_eq!(pulse_glyph(Duration::from_millis(250)), "◐");
        assert_eq!(pulse_glyph(Duration::from_millis(450)), "●");
        assert_eq!(pulse_glyph(Duration::from_millis(1000)), "○");
    }

    #[test]
    fn wrapped_count_matches_word_wrapping() {
        let lines = vec![
            Line::from("aaa bbb ccc"),
            Line::default(),
            Line::from("abcdefghij"),
        ];
        assert_eq!(wrapped_line_count(&lines, 7), 2 + 1 + 2);
        assert_eq!(wrapped_line_count(&lines, 80), 3);
    }

    #[test]
    fn wide_characters_count_double() {
        let lines = vec![Line::from("日本語 日本語")];
        assert_eq!(wrapped_line_count(&lines, 6), 2);
    }
}
