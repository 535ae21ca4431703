/// What the app should do after a key or paste reached the input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Continue,
    /// The user asked to send this text. The box keeps it until the
    /// submission is accepted.
    Submit(String),
    Clear,
}
