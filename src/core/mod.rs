pub mod controller;
pub mod conversation;
pub mod coordinator;
pub mod decoder;
pub mod error;

pub use controller::{Outcome, SnapshotStream, StreamState, StreamingRequestController};
pub use conversation::{Conversation, Message, Role};
pub use coordinator::{CoordinatorStatus, SubmissionCoordinator, SubmitOutcome};
pub use decoder::{DecodeError, Utf8Decoder};
pub use error::{AppError, Result, TurnError};
