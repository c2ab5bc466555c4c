use serde::{Deserialize, Serialize};

use crate::api::client::Citation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_assistant(self) -> bool {
        self == Sender::Assistant
    }
}

/// A web page the model cited while grounding a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// One entry of the transcript. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            sources,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.sender.is_assistant()
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Map grounding citations to sources, dropping any citation without a uri.
/// Relative order is preserved. A missing or blank title falls back to the uri.
pub fn sources_from_citations(citations: &[Citation]) -> Vec<Source> {
    citations
        .iter()
        .filter_map(|citation| {
            let uri = citation.uri.as_deref().map(str::trim).unwrap_or_default();
            if uri.is_empty() {
                return None;
            }
            let title = citation
                .title
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .unwrap_or(uri);
            Some(Source {
                uri: uri.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(uri: Option<&str>, title: Option<&str>) -> Citation {
        Citation {
            uri: uri.map(str::to_string),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn citations_without_uri_are_dropped() {
        let sources = sources_from_citations(&[
            citation(Some("https://a.com"), Some("A")),
            citation(None, None),
        ]);
        assert_eq!(
            sources,
            vec![Source {
                uri: "https://a.com".to_string(),
                title: "A".to_string(),
            }]
        );
    }

    #[test]
    fn blank_uris_are_treated_as_missing() {
        let sources = sources_from_citations(&[
            citation(Some("   "), Some("Blank")),
            citation(Some(""), Some("Empty")),
        ]);
        assert!(sources.is_empty());
    }

    #[test]
    fn order_is_preserved_and_titles_fall_back_to_uri() {
        let sources = sources_from_citations(&[
            citation(Some("https://b.com"), None),
            citation(None, Some("orphan")),
            citation(Some("https://a.com"), Some("A")),
        ]);
        let uris: Vec<&str> = sources.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, vec!["https://b.com", "https://a.com"]);
        assert_eq!(sources[0].title, "https://b.com");
    }

    #[test]
    fn assistant_constructor_keeps_sources() {
        let msg = Message::assistant(
            "hi",
            vec![Source {
                uri: "https://x.org".into(),
                title: "X".into(),
            }],
        );
        assert!(msg.is_assistant());
        assert!(msg.has_sources());
        assert!(!Message::user("hello").has_sources());
    }
}
