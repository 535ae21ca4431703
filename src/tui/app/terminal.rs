use crossterm::ExecutableCommand;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    stdout.execute(EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Best effort; safe to call more than once.
pub fn restore_terminal(terminal: &mut Tui) {
    let backend = terminal.backend_mut();
    let _ = backend.execute(DisableMouseCapture);
    let _ = backend.execute(DisableBracketedPaste);
    let _ = disable_raw_mode();
    let _ = backend.execute(LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}
