#![allow(clippy::expect_used)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::{ByteStream, ChatRequest, ClientError, Transport};

/// One scripted exchange.
#[derive(Debug)]
pub enum MockReply {
    /// Success status followed by these body items.
    Body(Vec<Result<Bytes, ClientError>>),
    /// The exchange itself fails.
    Fail(ClientError),
    /// Success status; body items are pushed by the test through the sender.
    Gated(mpsc::UnboundedReceiver<Result<Bytes, ClientError>>),
}

impl MockReply {
    #[must_use]
    pub fn text_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::byte_chunks(chunks.into_iter().map(|c| c.as_ref().as_bytes().to_vec()))
    }

    #[must_use]
    pub fn byte_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self::Body(chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect())
    }

    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::Fail(ClientError::status(status))
    }

    #[must_use]
    pub fn connection_refused() -> Self {
        Self::Fail(ClientError::Connection("connection refused".into()))
    }

    /// Returns the reply plus the handle that feeds its body. Dropping the
    /// handle ends the body.
    #[must_use]
    pub fn gated() -> (Self, mpsc::UnboundedSender<Result<Bytes, ClientError>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::Gated(rx), tx)
    }
}

#[derive(Clone)]
pub struct MockTransport {
    endpoint: String,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: "mock://tutor".to_string(),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.push_reply(reply);
        self
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.replies.lock().push_back(reply);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &ChatRequest) -> Result<ByteStream, ClientError> {
        self.requests.lock().push(request.clone());

        let reply = self
            .replies
            .lock()
            .pop_front()
            .ok_or_else(|| ClientError::Connection("MockTransport: no replies queued".into()))?;

        match reply {
            MockReply::Body(items) => Ok(stream::iter(items).boxed()),
            MockReply::Fail(err) => Err(err),
            MockReply::Gated(rx) => Ok(UnboundedReceiverStream::new(rx).boxed()),
        }
    }
}
