//! Owner of the conversation of record.
//!
//! The coordinator is the only writer of the transcript. Submissions are
//! serialized: while a turn is in flight every further `submit` is refused,
//! so at most one [`StreamingRequestController`] exists at a time and its
//! snapshots can be installed without locking.

use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::Transport;
use crate::core::controller::{Outcome, StreamState, StreamingRequestController};
use crate::core::conversation::{Conversation, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorStatus {
    Idle,
    Submitting,
    Streaming,
}

impl CoordinatorStatus {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// Input was empty after trimming; nothing happened.
    Empty,
    /// A previous turn has not settled yet; nothing happened.
    Busy,
}

pub struct SubmissionCoordinator {
    transport: Arc<dyn Transport>,
    user_id: Option<String>,
    conversation: Arc<watch::Sender<Conversation>>,
    status: Arc<watch::Sender<CoordinatorStatus>>,
    last_outcome: Arc<Mutex<Option<Outcome>>>,
    pending_input: String,
    in_flight: Option<JoinHandle<()>>,
}

impl SubmissionCoordinator {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (conversation, _) = watch::channel(Conversation::new());
        let (status, _) = watch::channel(CoordinatorStatus::Idle);

        Self {
            transport,
            user_id: None,
            conversation: Arc::new(conversation),
            status: Arc::new(status),
            last_outcome: Arc::new(Mutex::new(None)),
            pending_input: String::new(),
            in_flight: None,
        }
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Current transcript.
    #[must_use]
    pub fn snapshot(&self) -> Conversation {
        self.conversation.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Conversation> {
        self.conversation.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> CoordinatorStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<CoordinatorStatus> {
        self.status.subscribe()
    }

    /// How the most recent turn settled, if any has.
    #[must_use]
    pub fn last_outcome(&self) -> Option<Outcome> {
        *self.last_outcome.lock()
    }

    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Submits whatever is in the pending input buffer.
    pub fn submit_pending(&mut self) -> SubmitOutcome {
        let text = self.pending_input.clone();
        self.submit(&text)
    }

    /// Appends a user turn and starts streaming the reply.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, raw_text: &str) -> SubmitOutcome {
        if raw_text.trim().is_empty() {
            return SubmitOutcome::Empty;
        }

        if !self.status().is_idle() {
            tracing::debug!("Submission refused, previous turn still in flight");
            return SubmitOutcome::Busy;
        }

        let before = self.snapshot();
        let user_message = Message::user(raw_text);

        self.status.send_replace(CoordinatorStatus::Submitting);
        self.conversation
            .send_replace(before.appended(user_message.clone()));
        self.pending_input.clear();

        let mut snapshots = StreamingRequestController::new(self.transport.clone())
            .with_user_id(self.user_id.clone())
            .run(&before, user_message);

        let conversation = Arc::clone(&self.conversation);
        let status = Arc::clone(&self.status);
        let last_outcome = Arc::clone(&self.last_outcome);

        let mut stream_state = snapshots.subscribe_state();

        self.in_flight = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    Ok(()) = stream_state.changed() => {
                        // Streaming starts once the request is accepted, not
                        // when the first chunk arrives.
                        if *stream_state.borrow_and_update() == StreamState::Streaming {
                            status.send_replace(CoordinatorStatus::Streaming);
                        }
                    }
                    next = snapshots.next() => {
                        let Some(snapshot) = next else { break };
                        conversation.send_replace(snapshot);
                    }
                }
            }

            if let StreamState::Settled(outcome) = snapshots.state() {
                *last_outcome.lock() = Some(outcome);
            }
            status.send_replace(CoordinatorStatus::Idle);
        }));

        SubmitOutcome::Accepted
    }

    /// Resolves once no turn is in flight.
    pub async fn wait_until_idle(&self) {
        let mut status = self.status.subscribe();
        let _ = status.wait_for(|s| s.is_idle()).await;
    }
}

impl Drop for SubmissionCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for SubmissionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionCoordinator")
            .field("endpoint", &self.endpoint())
            .field("status", &self.status())
            .field("messages", &self.conversation.borrow().len())
            .finish_non_exhaustive()
    }
}
