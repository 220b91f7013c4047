//! HTTP side of the popup process: pulls state on open, then optionally follows broadcasts.

use eventsource_stream::{EventStreamError, Eventsource};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Talks to a running background process.
#[derive(Clone)]
pub struct PopupClient {
    client: Client,
    base_url: String,
}

impl PopupClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends `GET_LAST_KNOWN_STATE`. `Ok(None)` when the background gave no answer.
    pub async fn last_known_state(&self) -> Result<Option<Value>, reqwest::Error> {
        let response = self
            .client
            .post(format!("{}/api/v1/messages", self.base_url))
            .json(&json!({"type": "GET_LAST_KNOWN_STATE"}))
            .send()
            .await?
            .error_for_status()?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        // A body that isn't JSON is still "a response"; the renderer deals with it.
        Ok(Some(
            serde_json::from_str(&body).unwrap_or(Value::String(body)),
        ))
    }

    /// Streams broadcasts to `on_state` until the background closes the stream.
    pub async fn follow<F>(&self, mut on_state: F) -> Result<(), FollowError>
    where
        F: FnMut(Value),
    {
        let response = self
            .client
            .get(format!("{}/api/v1/events", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        let mut events = Box::pin(state_events(response.bytes_stream()));
        while let Some(state) = events.next().await {
            on_state(state?);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum FollowError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("broadcast stream broke: {0}")]
    Stream(#[from] EventStreamError<reqwest::Error>),
}

/// Decodes a server-sent-events byte stream into the broadcast states it carries.
/// Event data that isn't JSON is passed through as a string for the renderer.
pub fn state_events<S, B, E>(bytes: S) -> impl Stream<Item = Result<Value, EventStreamError<E>>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    bytes
        .eventsource()
        .filter(|event| !matches!(event, Ok(event) if event.data.is_empty()))
        .map(|event| {
            event.map(|event| {
                debug!("Broadcast received: {}", event.data);
                serde_json::from_str(&event.data).unwrap_or(Value::String(event.data))
            })
        })
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn decode(chunks: &[&'static [u8]]) -> Vec<Value> {
        let bytes = tokio_stream::iter(chunks.iter().map(|c| Ok::<_, Infallible>(*c)));
        state_events(bytes)
            .collect::<Result<Vec<_>, _>>()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_event() {
        assert_eq!(
            decode(&[b"data: {\"type\":\"SHOW_LOADING\"}\n\n"]).await,
            vec![json!({"type": "SHOW_LOADING"})]
        );
    }

    #[tokio::test]
    async fn test_event_split_across_chunks_with_crlf() {
        assert_eq!(
            decode(&[b"data: {\"ty", b"pe\":1}\r\n", b"\r\n"]).await,
            vec![json!({"type": 1})]
        );
    }

    #[tokio::test]
    async fn test_cr_only_line_endings() {
        let states = decode(&[b"data: {\"type\":\"SHOW_LOADING\"}\r\rdata: 2\r\r"]).await;
        assert_eq!(states[0], json!({"type": "SHOW_LOADING"}));
    }

    #[tokio::test]
    async fn test_utf8_split_across_chunks() {
        let event: &'static [u8] = "data: résumé\n\n".as_bytes();
        // Split inside the two-byte 'é'.
        assert_eq!(
            decode(&[&event[..8], &event[8..]]).await,
            vec![Value::String("résumé".to_string())]
        );
    }

    #[tokio::test]
    async fn test_keep_alive_ignored_and_multiline_joined() {
        assert_eq!(
            decode(&[b":\n\ndata: {\"type\":\ndata: 1}\n\nevent: x\ndata: 3\n\n"]).await,
            vec![json!({"type": 1}), json!(3)]
        );
    }

    #[tokio::test]
    async fn test_last_known_state_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/messages"))
            .and(body_json(json!({"type": "GET_LAST_KNOWN_STATE"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"type": "SHOW_LOADING", "message": "x"})),
            )
            .mount(&server)
            .await;

        let state = PopupClient::new(server.uri())
            .last_known_state()
            .await
            .unwrap();
        assert_eq!(state, Some(json!({"type": "SHOW_LOADING", "message": "x"})));
    }

    #[tokio::test]
    async fn test_no_content_means_no_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let state = PopupClient::new(server.uri())
            .last_known_state()
            .await
            .unwrap();
        assert_eq!(state, None);
    }

    #[tokio::test]
    async fn test_server_error_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(PopupClient::new(server.uri())
            .last_known_state()
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_follow_delivers_each_event() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/events"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"type\":\"SHOW_LOADING\",\"message\":\"m\"}\n\n\
                 data: {\"type\":\"SHOW_RESULTS_ERROR\",\"message\":\"e\"}\n\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let mut seen = Vec::new();
        PopupClient::new(server.uri())
            .follow(|state| seen.push(state))
            .await
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0]["type"], "SHOW_LOADING");
        assert_eq!(seen[1]["message"], "e");
    }
}
