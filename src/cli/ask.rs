//! Headless single-turn mode.

use std::io::{self, Write};

use crate::core::{AppError, Conversation, Outcome, Result, SubmissionCoordinator, SubmitOutcome};

/// Writes only the part of the assistant reply that has not been written yet.
#[derive(Debug)]
struct DeltaPrinter {
    assistant_index: usize,
    printed: usize,
}

impl DeltaPrinter {
    const fn new(assistant_index: usize) -> Self {
        Self {
            assistant_index,
            printed: 0,
        }
    }

    fn print(&mut self, snapshot: &Conversation, out: &mut impl Write) -> io::Result<()> {
        let Some(message) = snapshot.messages().get(self.assistant_index) else {
            return Ok(());
        };

        if let Some(delta) = message.content.get(self.printed..)
            && !delta.is_empty()
        {
            out.write_all(delta.as_bytes())?;
            out.flush()?;
            self.printed = message.content.len();
        }

        Ok(())
    }

    const fn printed_anything(&self) -> bool {
        self.printed > 0
    }
}

pub async fn run_ask(mut coordinator: SubmissionCoordinator, text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    run_ask_with(&mut coordinator, text, &mut stdout).await
}

async fn run_ask_with(
    coordinator: &mut SubmissionCoordinator,
    text: &str,
    out: &mut impl Write,
) -> Result<()> {
    let mut updates = coordinator.subscribe();
    let mut status = coordinator.subscribe_status();

    match coordinator.submit(text) {
        SubmitOutcome::Accepted => {}
        SubmitOutcome::Empty => {
            tracing::debug!("Nothing to ask");
            return Ok(());
        }
        SubmitOutcome::Busy => {
            return Err(AppError::TurnFailed("a previous turn is still running".into()));
        }
    }

    let mut printer = DeltaPrinter::new(coordinator.snapshot().len());

    loop {
        tokio::select! {
            biased;
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                printer.print(&snapshot, out)?;
            }
            _ = status.wait_for(|s| s.is_idle()) => break,
        }
    }

    // The final snapshot may land together with the idle transition.
    printer.print(&coordinator.snapshot(), out)?;
    if printer.printed_anything() {
        writeln!(out)?;
    }

    match coordinator.last_outcome() {
        Some(Outcome::Success) => Ok(()),
        Some(Outcome::Error) => {
            let notice = coordinator
                .snapshot()
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            let reason = notice
                .rsplit_once("Error: ")
                .map_or(notice.as_str(), |(_, reason)| reason)
                .to_string();
            Err(AppError::TurnFailed(reason))
        }
        None => Err(AppError::TurnFailed("turn ended without settling".into())),
    }
}
