//! One request/response exchange, published as a sequence of transcript
//! snapshots.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;

use crate::client::{ByteStream, ChatRequest, Transport};
use crate::core::conversation::{Conversation, Message};
use crate::core::decoder::Utf8Decoder;
use crate::core::error::TurnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    AwaitingFirstChunk,
    Streaming,
    Settled(Outcome),
}

pub struct StreamingRequestController {
    transport: Arc<dyn Transport>,
    user_id: Option<String>,
}

impl StreamingRequestController {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            user_id: None,
        }
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Starts the exchange for `user_message` on top of `before`.
    ///
    /// Nothing is sent until the returned stream is first polled. Every
    /// snapshot is `before ++ [user_message, assistant]`, where the assistant
    /// message is rebuilt from all text received so far.
    #[must_use]
    pub fn run(self, before: &Conversation, user_message: Message) -> SnapshotStream {
        let history = before.appended(user_message.clone());
        let request = ChatRequest::new(&user_message, &history).with_user_id(self.user_id);
        let (state_tx, state_rx) = watch::channel(StreamState::Idle);

        let exchange = Exchange {
            transport: self.transport,
            request,
            transcript: history.appended(Message::assistant(String::new())),
            state: state_tx,
        };

        SnapshotStream {
            inner: stream::unfold(Phase::Connect(exchange), Phase::advance)
                .fuse()
                .boxed(),
            state: state_rx,
        }
    }
}

/// Finite, non-restartable sequence of snapshots for one turn.
pub struct SnapshotStream {
    inner: BoxStream<'static, Conversation>,
    state: watch::Receiver<StreamState>,
}

impl SnapshotStream {
    #[must_use]
    pub fn state(&self) -> StreamState {
        *self.state.borrow()
    }

    /// Receiver notified on every state transition. It closes once the
    /// stream has finished.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<StreamState> {
        self.state.clone()
    }
}

impl Stream for SnapshotStream {
    type Item = Conversation;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for SnapshotStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStream")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

enum Phase {
    Connect(Exchange),
    Receive(Box<Receiving>),
    Done,
}

impl Phase {
    async fn advance(self) -> Option<(Conversation, Self)> {
        match self {
            Self::Connect(exchange) => exchange.connect().await,
            Self::Receive(receiving) => receiving.next_snapshot().await,
            Self::Done => None,
        }
    }
}

struct Exchange {
    transport: Arc<dyn Transport>,
    request: ChatRequest,
    transcript: Conversation,
    state: watch::Sender<StreamState>,
}

impl Exchange {
    async fn connect(self) -> Option<(Conversation, Phase)> {
        let Self {
            transport,
            request,
            transcript,
            state,
        } = self;

        state.send_replace(StreamState::AwaitingFirstChunk);
        tracing::info!(
            endpoint = transport.endpoint(),
            history_len = request.history.len(),
            "Starting chat turn"
        );

        match transport.send(&request).await {
            Ok(body) => {
                state.send_replace(StreamState::Streaming);
                let receiving = Receiving {
                    body,
                    decoder: Utf8Decoder::new(),
                    accumulated: String::new(),
                    transcript,
                    chunks: 0,
                    state,
                };
                Box::new(receiving).next_snapshot().await
            }
            Err(err) => {
                let err = TurnError::from(err);
                tracing::error!(kind = err.kind(), error = %err, "Chat request failed");
                Some(settle_with_error(&transcript, "", &err, &state))
            }
        }
    }
}

struct Receiving {
    body: ByteStream,
    decoder: Utf8Decoder,
    accumulated: String,
    transcript: Conversation,
    chunks: usize,
    state: watch::Sender<StreamState>,
}

impl Receiving {
    async fn next_snapshot(mut self: Box<Self>) -> Option<(Conversation, Phase)> {
        match self.body.next().await {
            Some(Ok(bytes)) => {
                self.chunks += 1;
                let text = self.decoder.feed(&bytes);
                self.accumulated.push_str(&text);
                self.transcript = self
                    .transcript
                    .replacing_last(Message::assistant(self.accumulated.clone()));
                Some((self.transcript.clone(), Phase::Receive(self)))
            }
            Some(Err(err)) => {
                let err = TurnError::from(err);
                tracing::error!(
                    kind = err.kind(),
                    error = %err,
                    chunks = self.chunks,
                    "Response stream failed"
                );
                Some(settle_with_error(
                    &self.transcript,
                    &self.accumulated,
                    &err,
                    &self.state,
                ))
            }
            None => self.complete(),
        }
    }

    fn complete(mut self: Box<Self>) -> Option<(Conversation, Phase)> {
        match self.decoder.finish() {
            Ok(_) => {
                self.state.send_replace(StreamState::Settled(Outcome::Success));
                tracing::info!(
                    chunks = self.chunks,
                    chars = self.accumulated.chars().count(),
                    "Chat turn settled"
                );
                // Chunks already produced the final snapshot; an empty body
                // still owes one.
                (self.chunks == 0).then(|| (self.transcript.clone(), Phase::Done))
            }
            Err(err) => {
                let err = TurnError::from(err);
                tracing::warn!(error = %err, chunks = self.chunks, "Response ended mid-character");
                Some(settle_with_error(
                    &self.transcript,
                    &self.accumulated,
                    &err,
                    &self.state,
                ))
            }
        }
    }
}

fn settle_with_error(
    transcript: &Conversation,
    accumulated: &str,
    err: &TurnError,
    state: &watch::Sender<StreamState>,
) -> (Conversation, Phase) {
    let content = if accumulated.is_empty() {
        err.notice()
    } else {
        format!("{accumulated}\n\n{}", err.notice())
    };

    state.send_replace(StreamState::Settled(Outcome::Error));
    (
        transcript.replacing_last(Message::assistant(content)),
        Phase::Done,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, MockReply, MockTransport};
    use bytes::Bytes;

    fn controller(mock: &MockTransport) -> StreamingRequestController {
        StreamingRequestController::new(Arc::new(mock.clone()))
    }

    fn contents(snapshots: &[Conversation]) -> Vec<String> {
        snapshots
            .iter()
            .map(|c| c.last().map(|m| m.content.clone()).unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn chunks_replace_the_assistant_message() {
        let mock = MockTransport::new().with_reply(MockReply::text_chunks(["Hel", "lo wor", "ld!"]));
        let mut stream = controller(&mock).run(&Conversation::new(), Message::user("Say hi"));

        let mut snapshots = Vec::new();
        while let Some(snapshot) = stream.next().await {
            snapshots.push(snapshot);
        }

        assert_eq!(contents(&snapshots), ["Hel", "Hello wor", "Hello world!"]);
        assert!(snapshots.iter().all(|s| s.len() == 2));
        assert!(snapshots.iter().all(|s| s.messages()[1].is_assistant()));
        assert_eq!(stream.state(), StreamState::Settled(Outcome::Success));
    }

    #[tokio::test]
    async fn empty_body_yields_empty_assistant_message() {
        let mock = MockTransport::new().with_reply(MockReply::text_chunks(Vec::<&str>::new()));
        let mut stream = controller(&mock).run(&Conversation::new(), Message::user("q"));

        let snapshots: Vec<_> = stream.by_ref().collect().await;

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].messages(), [Message::user("q"), Message::assistant("")]);
        assert_eq!(stream.state(), StreamState::Settled(Outcome::Success));
    }

    #[tokio::test]
    async fn transport_failure_adds_one_error_message() {
        let before = Conversation::from(vec![Message::user("Hi"), Message::assistant("Hey there!")]);
        let mock = MockTransport::new().with_reply(MockReply::connection_refused());
        let mut stream = controller(&mock).run(&before, Message::user("Explain recursion"));

        let snapshots: Vec<_> = stream.by_ref().collect().await;

        assert_eq!(snapshots.len(), 1);
        let last = &snapshots[0];
        assert_eq!(last.len(), 4);
        assert_eq!(last.messages()[2], Message::user("Explain recursion"));
        assert_eq!(
            last.messages()[3],
            Message::assistant("Error: Connection failed: connection refused")
        );
        assert_eq!(last.iter().filter(|m| m.is_assistant()).count(), 2);
        assert_eq!(stream.state(), StreamState::Settled(Outcome::Error));
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let mock = MockTransport::new().with_reply(MockReply::status(500));
        let snapshots: Vec<_> = controller(&mock)
            .run(&Conversation::new(), Message::user("q"))
            .collect()
            .await;

        assert_eq!(contents(&snapshots), ["Error: HTTP error! Status: 500"]);
    }

    #[tokio::test]
    async fn mid_stream_failure_keeps_partial_text() {
        let mock = MockTransport::new().with_reply(MockReply::Body(vec![
            Ok(Bytes::from("Par")),
            Err(ClientError::Stream("connection reset".into())),
        ]));
        let mut stream = controller(&mock).run(&Conversation::new(), Message::user("q"));

        let snapshots: Vec<_> = stream.by_ref().collect().await;

        assert_eq!(
            contents(&snapshots),
            ["Par", "Par\n\nError: Stream error: connection reset"]
        );
        assert!(snapshots.iter().all(|s| s.len() == 2));
        assert_eq!(stream.state(), StreamState::Settled(Outcome::Error));
    }

    #[tokio::test]
    async fn truncated_character_settles_with_decode_error() {
        let crab = "🦀".as_bytes();
        let mock = MockTransport::new().with_reply(MockReply::byte_chunks([
            b"ok ".to_vec(),
            crab[..2].to_vec(),
        ]));
        let mut stream = controller(&mock).run(&Conversation::new(), Message::user("q"));

        let snapshots: Vec<_> = stream.by_ref().collect().await;

        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[1].last().map(|m| m.content.as_str()), Some("ok "));
        let last = snapshots[2].last().map(|m| m.content.clone()).unwrap_or_default();
        assert!(last.starts_with("ok \n\nError: response ended in the middle of a character"));
        assert_eq!(stream.state(), StreamState::Settled(Outcome::Error));
    }

    #[tokio::test]
    async fn split_characters_are_reassembled() {
        let text = "Ünïcödé ✓ 🦀";
        let bytes = text.as_bytes();
        let pieces: Vec<Vec<u8>> = bytes.chunks(3).map(<[u8]>::to_vec).collect();
        let mock = MockTransport::new().with_reply(MockReply::byte_chunks(pieces));

        let snapshots: Vec<_> = controller(&mock)
            .run(&Conversation::new(), Message::user("q"))
            .collect()
            .await;

        assert_eq!(contents(&snapshots).last().map(String::as_str), Some(text));
    }

    #[tokio::test]
    async fn request_carries_full_history() {
        let before = Conversation::from(vec![
            Message::user("Algebra"),
            Message::assistant("What is x in 2x + 3 = 7?"),
        ]);
        let mock = MockTransport::new().with_reply(MockReply::text_chunks(["ok"]));

        let _: Vec<_> = controller(&mock)
            .with_user_id(Some("student-7".into()))
            .run(&before, Message::user("B"))
            .collect()
            .await;

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "B");
        assert_eq!(
            requests[0].history,
            vec![
                Message::user("Algebra"),
                Message::assistant("What is x in 2x + 3 = 7?"),
                Message::user("B"),
            ]
        );
        assert_eq!(requests[0].user_id.as_deref(), Some("student-7"));
    }

    #[tokio::test]
    async fn state_tracks_the_exchange() {
        let (reply, tx) = MockReply::gated();
        let mock = MockTransport::new().with_reply(reply);
        let mut stream = controller(&mock).run(&Conversation::new(), Message::user("q"));
        let mut states = stream.subscribe_state();

        assert_eq!(stream.state(), StreamState::Idle);
        assert_eq!(mock.request_count(), 0);

        tx.send(Ok(Bytes::from("a"))).expect("send");
        assert!(stream.next().await.is_some());
        assert_eq!(stream.state(), StreamState::Streaming);

        drop(tx);
        assert!(stream.next().await.is_none());
        assert_eq!(stream.state(), StreamState::Settled(Outcome::Success));
        assert!(stream.next().await.is_none());

        while states.changed().await.is_ok() {}
        assert_eq!(*states.borrow(), StreamState::Settled(Outcome::Success));
    }
}
