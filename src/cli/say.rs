//! TUI-less "say" command

use std::error::Error;

use crate::core::constants::INIT_FAILURE_MESSAGE;
use crate::core::message::Message;
use crate::core::orchestrator::{RequestOrchestrator, SendOutcome};

pub async fn run_say(
    prompt: Vec<String>,
    mut orchestrator: RequestOrchestrator,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: groundchat say <prompt>".into());
    }
    if !orchestrator.is_initialized() {
        return Err(INIT_FAILURE_MESSAGE.into());
    }

    match orchestrator.send_message(&prompt).await {
        SendOutcome::Replied => {
            if let Some(reply) = orchestrator.state().last_message() {
                println!("{}", format_reply(reply));
            }
            Ok(())
        }
        SendOutcome::Failed => Err(orchestrator
            .state()
            .last_error
            .clone()
            .unwrap_or_default()
            .into()),
        SendOutcome::Ignored => Err("Request was not sent".into()),
    }
}

/// Plain-text rendering of a reply and its numbered sources.
pub fn format_reply(message: &Message) -> String {
    let mut out = message.text.trim_end().to_string();
    if message.has_sources() {
        out.push_str("\n\nSources:");
        for (i, source) in message.sources.iter().enumerate() {
            out.push_str(&format!("\n{}. {} — {}", i + 1, source.title, source.uri));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{ApiError, Citation};
    use crate::core::constants::REQUEST_FAILURE_MESSAGE;
    use crate::core::message::Source;
    use crate::core::preferences::MemoryPreferenceStore;
    use crate::utils::test_utils::{orchestrator_with, reply, ScriptedClient};
    use std::sync::Arc;

    #[test]
    fn reply_without_sources_is_just_text() {
        let msg = Message::assistant("Answer.\n", Vec::new());
        assert_eq!(format_reply(&msg), "Answer.");
    }

    #[test]
    fn sources_are_numbered() {
        let msg = Message::assistant(
            "Answer.",
            vec![Source {
                uri: "https://a.com".into(),
                title: "A".into(),
            }],
        );
        assert_eq!(
            format_reply(&msg),
            "Answer.\n\nSources:\n1. A — https://a.com"
        );
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let orchestrator = orchestrator_with(Arc::new(ScriptedClient::new(Vec::new())));
        let err = run_say(vec!["  ".into()], orchestrator).await.unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[tokio::test]
    async fn uninitialized_client_reports_init_failure() {
        let orchestrator = RequestOrchestrator::new(
            Err(ApiError::MissingApiKey),
            "test-model",
            Box::new(MemoryPreferenceStore::default()),
        );
        let err = run_say(vec!["hi".into()], orchestrator).await.unwrap_err();
        assert_eq!(err.to_string(), INIT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn failed_call_returns_the_fixed_message() {
        let orchestrator = orchestrator_with(Arc::new(ScriptedClient::new(vec![Err(
            ApiError::MalformedResponse("boom".into()),
        )])));
        let err = run_say(vec!["hi".into()], orchestrator).await.unwrap_err();
        assert_eq!(err.to_string(), REQUEST_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn words_are_joined_into_one_prompt() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(reply(
            "ok",
            vec![Citation::default()],
        ))]));
        let orchestrator = orchestrator_with(client.clone());
        run_say(vec!["hello".into(), "world".into()], orchestrator)
            .await
            .unwrap();
        assert_eq!(client.requests()[0].history[0].text(), "hello world");
    }
}
