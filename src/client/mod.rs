pub mod error;
pub mod http;
pub mod mock;

pub use error::ClientError;
pub use http::{HttpConfig, HttpTransport};
pub use mock::{MockReply, MockTransport};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::core::conversation::{Conversation, Message};

/// Raw response body, one item per network chunk, in wire order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ClientError>> + Send>>;

/// Outbound body for one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ChatRequest {
    /// `history` must already end with `user_message`.
    #[must_use]
    pub fn new(user_message: &Message, history: &Conversation) -> Self {
        Self {
            message: user_message.content.clone(),
            history: history.messages().to_vec(),
            user_id: None,
        }
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// The completion service as seen by the controller.
#[async_trait]
pub trait Transport: Send + Sync {
    fn endpoint(&self) -> &str;

    /// Issues the request and hands back the body once a success status
    /// has been received.
    async fn send(&self, request: &ChatRequest) -> Result<ByteStream, ClientError>;
}
