use crate::core::app::App;
use crate::ui::layout::LayoutEngine;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const DEFAULT_INPUT_TITLE: &str =
    "Ask anything (Alt+Enter for new line, /help for help, Esc to quit)";

pub fn ui(f: &mut Frame, app: &mut App) {
    app.sync_theme();

    let banner_height = u16::from(app.state().last_error.is_some());
    let input_area_height = app.input_area_height();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(banner_height),
            Constraint::Length(input_area_height + 2), // +2 for borders
        ])
        .split(f.area());

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        f.area(),
    );

    render_header(f, app, chunks[0]);
    render_messages(f, app, chunks[1]);
    if banner_height > 0 {
        render_banner(f, app, chunks[2]);
    }
    render_input(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "groundchat v{} • {} • {} theme",
        env!("CARGO_PKG_VERSION"),
        app.orchestrator.model(),
        app.state().theme
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(title, app.theme.title_style))),
        area,
    );
}

fn render_messages(f: &mut Frame, app: &mut App, area: Rect) {
    app.update_scroll_position(area.height, area.width);
    let scroll_offset = app
        .scroll_offset
        .min(app.max_scroll_offset(area.width, area.height));

    let layout =
        LayoutEngine::layout_session(app.state(), &app.theme, app.pulse_start.elapsed());
    let messages_paragraph = Paragraph::new(layout.lines)
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));

    f.render_widget(messages_paragraph, area);
}

fn render_banner(f: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = app.state().last_error.as_deref() {
        let banner = Paragraph::new(Line::from(Span::styled(
            format!("⚠ {error}"),
            app.theme.error_banner_style,
        )));
        f.render_widget(banner, area);
    }
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let title = app
        .status
        .clone()
        .unwrap_or_else(|| DEFAULT_INPUT_TITLE.to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.input_border_style)
        .title(Span::styled(title, app.theme.input_title_style));
    app.textarea.set_block(block);
    f.render_widget(&app.textarea, area);
}
