//! Terminal-side application state wrapped around the orchestrator.
//!
//! `App` owns the [`RequestOrchestrator`] and the purely visual state the
//! orchestrator has no business knowing about: the input box, the scroll
//! position, the active palette and a transient status line.

use std::time::Instant;

use ratatui::style::Style;
use tui_textarea::TextArea;

use crate::core::orchestrator::{PendingRequest, RequestOrchestrator};
use crate::core::session::{SessionState, ThemeMode};
use crate::ui::layout::{wrapped_line_count, LayoutEngine};
use crate::ui::theme::Theme;

pub struct App {
    pub orchestrator: RequestOrchestrator,
    pub theme: Theme,
    theme_mode: ThemeMode,
    pub textarea: TextArea<'static>,
    pub status: Option<String>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub exit_requested: bool,
    pub pulse_start: Instant,
}

impl App {
    pub fn new(orchestrator: RequestOrchestrator) -> Self {
        let theme_mode = orchestrator.state().theme;
        let mut app = Self {
            orchestrator,
            theme: Theme::from_mode(theme_mode),
            theme_mode,
            textarea: TextArea::default(),
            status: None,
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
            pulse_start: Instant::now(),
        };
        app.configure_textarea();
        app
    }

    pub fn state(&self) -> &SessionState {
        self.orchestrator.state()
    }

    fn configure_textarea(&mut self) {
        let textarea_style = self
            .theme
            .input_text_style
            .patch(Style::default().bg(self.theme.background_color));
        self.textarea.set_style(textarea_style);
        self.textarea.set_cursor_line_style(Style::default());
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
        self.configure_textarea();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Start a send through the orchestrator. Returns the request to run, or
    /// `None` when the orchestrator ignored the input.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingRequest> {
        let pending = self.orchestrator.begin_send(text)?;
        self.status = None;
        self.auto_scroll = true;
        self.pulse_start = Instant::now();
        Some(pending)
    }

    pub fn clear_chat(&mut self) {
        self.orchestrator.clear_session();
        self.scroll_offset = 0;
        self.auto_scroll = true;
        self.set_status("Chat cleared");
    }

    pub fn toggle_theme(&mut self) {
        let next = self.state().theme.toggled();
        self.set_theme(next);
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        match self.orchestrator.set_theme(mode) {
            Ok(()) => self.set_status(format!("Theme set to {mode}")),
            Err(_) => self.set_status(format!("Theme set to {mode} (could not be saved)")),
        }
        self.sync_theme();
    }

    /// Rebuild the palette if the session theme changed since the last frame.
    pub fn sync_theme(&mut self) {
        let mode = self.state().theme;
        if mode != self.theme_mode {
            self.theme_mode = mode;
            self.theme = Theme::from_mode(mode);
            self.configure_textarea();
        }
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn transcript_height(&self, width: u16) -> u16 {
        let layout =
            LayoutEngine::layout_session(self.state(), &self.theme, self.pulse_start.elapsed());
        wrapped_line_count(&layout.lines, width)
    }

    pub fn max_scroll_offset(&self, width: u16, available_height: u16) -> u16 {
        self.transcript_height(width)
            .saturating_sub(available_height)
    }

    /// Keep the bottom of the transcript in view while auto-scroll is on.
    pub fn update_scroll_position(&mut self, available_height: u16, width: u16) {
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll_offset(width, available_height);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, lines: u16, available_height: u16, width: u16) {
        let max_offset = self.max_scroll_offset(width, available_height);
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_offset);
        self.auto_scroll = self.scroll_offset >= max_offset;
    }

    /// Input rows to reserve, excluding borders.
    pub fn input_area_height(&self) -> u16 {
        (self.textarea.lines().len() as u16).clamp(1, 6)
    }
}
