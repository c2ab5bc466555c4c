//! Event polling, request dispatch and frame rendering for the chat screen.
//!
//! The loop is the single owner of [`App`] and therefore of the orchestrator.
//! Terminal input arrives from a reader task over one channel; each send runs
//! on its own task and reports back over a second channel, tagged with the
//! request id the orchestrator handed out.

mod keybindings;
mod lifecycle;

use std::{
    error::Error,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::client::{ApiError, ModelReply};
use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::orchestrator::PendingRequest;
use crate::ui::renderer::ui;

use self::keybindings::{handle_key, KeyAction};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

pub type RequestResult = (u64, Result<ModelReply, ApiError>);

const MAX_FPS: u64 = 60;

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run `pending` on its own task. A panic inside the call surfaces as a
/// failed outcome so the loading flag is always released.
pub(crate) fn spawn_request(pending: PendingRequest, results: mpsc::UnboundedSender<RequestResult>) {
    let request_id = pending.id();
    tokio::spawn(async move {
        let outcome = match tokio::spawn(pending.execute()).await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(ApiError::TaskFailed(join_error.to_string())),
        };
        if results.send((request_id, outcome)).is_err() {
            debug!(request_id, "chat loop gone before request finished");
        }
    });
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

/// Handle Enter: slash commands run in place, anything else starts a send.
/// Input rejected by the orchestrator stays in the box.
pub(crate) fn submit_input(app: &mut App, results: &mpsc::UnboundedSender<RequestResult>) {
    let input = app.input_text();
    match process_input(app, &input) {
        CommandResult::Continue => app.clear_input(),
        CommandResult::Exit => {}
        CommandResult::ProcessAsMessage(text) => {
            if text.trim().is_empty() {
                app.clear_input();
                return;
            }
            match app.begin_send(&text) {
                Some(pending) => {
                    app.clear_input();
                    spawn_request(pending, results.clone());
                }
                None => app.set_status("Still waiting for the previous reply"),
            }
        }
    }
}

fn process_ui_events(
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    results: &mpsc::UnboundedSender<RequestResult>,
    term_size: Size,
) -> bool {
    let mut events_processed = false;

    while let Ok(ev) = event_rx.try_recv() {
        events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match handle_key(app, key, term_size) {
                    KeyAction::Exit => {
                        app.request_exit();
                        break;
                    }
                    KeyAction::Submit => submit_input(app, results),
                    KeyAction::Handled | KeyAction::Ignored => {}
                }
                if app.exit_requested {
                    break;
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                let sanitized = sanitize_pasted_text(&text);
                if !sanitized.is_empty() {
                    app.textarea.insert_str(sanitized);
                }
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    events_processed
}

/// Apply finished requests. Results for requests that were cleared away are
/// dropped by the orchestrator.
pub(crate) fn drain_request_results(
    app: &mut App,
    result_rx: &mut mpsc::UnboundedReceiver<RequestResult>,
) -> bool {
    let mut received_any = false;
    while let Ok((request_id, outcome)) = result_rx.try_recv() {
        received_any = true;
        let applied = app.orchestrator.complete(request_id, outcome);
        debug!(request_id, ?applied, "request result applied");
    }
    received_any
}

fn try_draw_frame(
    app: &mut App,
    terminal: &mut ChatTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> std::io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    terminal.draw(|f| ui(f, app))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<RequestResult>();

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.exit_requested {
            break Ok(());
        }

        if let Err(err) = try_draw_frame(
            &mut app,
            &mut terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        ) {
            break Err(err.into());
        }

        let term_size = terminal.size().unwrap_or_default();
        let events_processed = process_ui_events(&mut app, &mut event_rx, &result_tx, term_size);
        if events_processed {
            request_redraw = true;
        }

        let received_any = drain_request_results(&mut app, &mut result_rx);
        if received_any {
            request_redraw = true;
        }

        // The typing placeholder animates while a reply is pending.
        if app.state().awaiting_reply() {
            request_redraw = true;
        }

        if !events_processed && !received_any && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        } else {
            tokio::task::yield_now().await;
        }
    };

    event_reader_handle.abort();
    if let Err(err) = restore_terminal(&mut terminal) {
        warn!(error = %err, "failed to restore terminal");
        if result.is_ok() {
            return Err(err);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::Citation;
    use crate::core::constants::REQUEST_FAILURE_MESSAGE;
    use crate::core::message::Sender;
    use crate::utils::test_utils::{create_test_app, orchestrator_with, reply, ScriptedClient};
    use std::sync::Arc;

    fn app_with(client: ScriptedClient) -> App {
        App::new(orchestrator_with(Arc::new(client)))
    }

    #[test]
    fn pasted_text_is_sanitized() {
        assert_eq!(sanitize_pasted_text("a\r\nb\rc\td\u{7}"), "a\nb\nc    d");
    }

    #[tokio::test]
    async fn submitted_message_round_trips_through_spawned_task() {
        let mut app = app_with(ScriptedClient::new(vec![Ok(reply(
            "grounded answer",
            vec![Citation {
                uri: Some("https://a.com".into()),
                title: Some("A".into()),
            }],
        ))]));
        let (tx, mut rx) = mpsc::unbounded_channel();

        app.textarea.insert_str("what happened today?");
        submit_input(&mut app, &tx);
        assert_eq!(app.input_text(), "");
        assert!(app.state().awaiting_reply());

        let (id, outcome) = rx.recv().await.expect("result");
        app.orchestrator.complete(id, outcome);

        let messages = &app.state().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(messages[1].text, "grounded answer");
        assert_eq!(messages[1].sources.len(), 1);
        assert!(!app.state().is_loading);
    }

    #[tokio::test]
    async fn submit_while_loading_keeps_the_input() {
        let mut app = app_with(ScriptedClient::pending());
        let (tx, _rx) = mpsc::unbounded_channel();

        app.textarea.insert_str("first");
        submit_input(&mut app, &tx);
        app.textarea.insert_str("second");
        submit_input(&mut app, &tx);

        assert_eq!(app.input_text(), "second");
        assert_eq!(app.state().messages.len(), 1);
    }

    #[test]
    fn slash_commands_do_not_reach_the_model() {
        let mut app = create_test_app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        app.textarea.insert_str("/theme dark");
        submit_input(&mut app, &tx);
        assert!(app.state().messages.is_empty());
        assert_eq!(app.input_text(), "");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stale_results_are_dropped_after_clear() {
        let mut app = create_test_app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pending = app.begin_send("hello").unwrap();
        app.clear_chat();
        tx.send((pending.id(), Ok(reply("late", Vec::new()))))
            .unwrap();

        assert!(drain_request_results(&mut app, &mut rx));
        assert!(app.state().messages.is_empty());
        assert!(!app.state().is_loading);
    }

    #[tokio::test]
    async fn failed_request_appends_the_fixed_message() {
        let mut app = create_test_app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        app.textarea.insert_str("hello");
        submit_input(&mut app, &tx);

        let result = rx.recv().await.expect("result");
        tx.send(result).unwrap();
        drain_request_results(&mut app, &mut rx);

        let last = app.state().last_message().unwrap();
        assert_eq!(last.text, REQUEST_FAILURE_MESSAGE);
        assert_eq!(
            app.state().last_error.as_deref(),
            Some(REQUEST_FAILURE_MESSAGE)
        );
    }
}
