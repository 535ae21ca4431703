pub mod chat;
pub mod input;

pub use chat::{ChatWidget, FollowScroll};
pub use input::{InputAction, InputWidget};
