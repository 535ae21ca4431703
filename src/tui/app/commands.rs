pub const HELP_TEXT: &str = "/help show this · /exit quit · Enter send · Shift+Enter newline · \
Ctrl+U clear · PgUp/PgDn scroll · Ctrl+C quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Exit,
    Unknown(String),
}

impl SlashCommand {
    /// `None` when the input is an ordinary message.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if !trimmed.starts_with('/') || trimmed.contains('\n') {
            return None;
        }

        let cmd = trimmed.split_whitespace().next().unwrap_or(trimmed);
        Some(match cmd {
            "/help" => Self::Help,
            "/exit" | "/quit" => Self::Exit,
            _ => Self::Unknown(cmd.to_string()),
        })
    }
}
