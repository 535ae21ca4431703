mod commands;
mod render;
mod terminal;

use crate::core::error::Result;
use crate::core::{SubmissionCoordinator, SubmitOutcome};
use crate::tui::events::{
    AppEvent, forward_coordinator_updates, terminal_event_loop, tick_loop,
};
use crate::tui::layout::calculate_layout;
use crate::tui::state::{AppState, NoticeLevel};
use crate::tui::widgets::{ChatWidget, InputAction, InputWidget};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use commands::{HELP_TEXT, SlashCommand};
use render::{render_header, render_status};
use terminal::{Tui, restore_terminal, setup_terminal};

const PAGE_SCROLL: usize = 10;

pub struct TuiApp {
    coordinator: SubmissionCoordinator,
    state: AppState,
    input_widget: InputWidget<'static>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    terminal: Tui,
}

impl TuiApp {
    pub fn new(coordinator: SubmissionCoordinator) -> Result<Self> {
        let terminal = setup_terminal()?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let state = AppState::new(coordinator.snapshot());

        Ok(Self {
            coordinator,
            state,
            input_widget: InputWidget::new(),
            event_rx,
            event_tx,
            terminal,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let terminal_tx = self.event_tx.clone();
        let tick_tx = self.event_tx.clone();
        let updates_tx = self.event_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = terminal_event_loop(terminal_tx).await {
                tracing::error!(error = %e, "Terminal event loop failed");
            }
        });

        tokio::spawn(tick_loop(tick_tx));

        tokio::spawn(forward_coordinator_updates(
            self.coordinator.subscribe(),
            self.coordinator.subscribe_status(),
            updates_tx,
        ));

        while !self.state.should_quit {
            self.draw()?;

            if let Some(event) = self.event_rx.recv().await {
                self.handle_event(event);
            }
        }

        restore_terminal(&mut self.terminal);

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal.draw(|f| {
            let layout = calculate_layout(f.area(), self.input_widget.line_count());

            render_header(f, layout.header, self.coordinator.endpoint());

            let in_flight = self.state.is_in_flight();
            ChatWidget::new(&self.state.conversation, in_flight, &mut self.state.scroll)
                .render(layout.chat, f.buffer_mut());

            self.input_widget.render(layout.input, f);

            render_status(f, layout.status, &self.state);
        })?;

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(key) => self.handle_key_input(key),
            AppEvent::Paste(text) => {
                let action = self.input_widget.handle_paste(&text);
                self.handle_input_action(action);
            }
            AppEvent::Resize(..) => {}
            AppEvent::MouseScroll(delta) => {
                if delta < 0 {
                    self.state.scroll.scroll_up(delta.unsigned_abs() as usize);
                } else {
                    self.state.scroll.scroll_down(delta.unsigned_abs() as usize);
                }
            }
            AppEvent::Tick => self.state.tick(),
            AppEvent::ConversationUpdated(conversation) => {
                self.state.apply_snapshot(conversation);
            }
            AppEvent::StatusChanged(status) => self.state.apply_status(status),
        }
    }

    fn handle_key_input(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    if self.input_widget.is_empty() {
                        self.state.quit();
                    } else {
                        self.input_widget.clear();
                    }
                    return;
                }
                KeyCode::Char('d') => {
                    if self.input_widget.is_empty() {
                        self.state.quit();
                    }
                    return;
                }
                KeyCode::Home => {
                    self.state.scroll.scroll_up(usize::MAX);
                    return;
                }
                KeyCode::End => {
                    self.state.scroll.follow();
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::PageUp => self.state.scroll.scroll_up(PAGE_SCROLL),
            KeyCode::PageDown => self.state.scroll.scroll_down(PAGE_SCROLL),
            _ => {
                let action = self.input_widget.handle_key(key);
                self.handle_input_action(action);
            }
        }
    }

    fn handle_input_action(&mut self, action: InputAction) {
        match action {
            InputAction::Continue | InputAction::Clear => {}
            InputAction::Submit(text) => {
                if let Some(command) = SlashCommand::parse(&text) {
                    self.input_widget.clear();
                    self.handle_slash_command(command);
                } else {
                    self.submit(text);
                }
            }
        }
    }

    fn submit(&mut self, text: String) {
        self.coordinator.set_pending_input(text);

        match self.coordinator.submit_pending() {
            SubmitOutcome::Accepted => {
                self.input_widget.clear();
                self.state.scroll.follow();
            }
            SubmitOutcome::Empty => {}
            SubmitOutcome::Busy => {
                self.state.show_notice(
                    "Still answering; your message is kept",
                    NoticeLevel::Warning,
                );
            }
        }
    }

    fn handle_slash_command(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::Help => self.state.show_notice(HELP_TEXT, NoticeLevel::Info),
            SlashCommand::Exit => self.state.quit(),
            SlashCommand::Unknown(cmd) => self.state.show_notice(
                format!("Unknown command: {cmd}. Type /help for available commands."),
                NoticeLevel::Warning,
            ),
        }
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        restore_terminal(&mut self.terminal);
    }
}
