use super::{AppEvent, POLL_TIMEOUT, SCROLL_DELTA, TICK_INTERVAL};
use crate::core::error::Result;
use crate::core::{Conversation, CoordinatorStatus};
use crossterm::event::{self, Event as CrosstermEvent, MouseEventKind};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;

pub async fn terminal_event_loop(tx: UnboundedSender<AppEvent>) -> Result<()> {
    while !tx.is_closed() {
        if event::poll(POLL_TIMEOUT)? {
            let app_event = match event::read()? {
                CrosstermEvent::Key(key) => Some(AppEvent::Input(key)),
                CrosstermEvent::Paste(text) => Some(AppEvent::Paste(text)),
                CrosstermEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
                CrosstermEvent::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => Some(AppEvent::MouseScroll(-SCROLL_DELTA)),
                    MouseEventKind::ScrollDown => Some(AppEvent::MouseScroll(SCROLL_DELTA)),
                    _ => None,
                },
                _ => None,
            };

            if let Some(event) = app_event
                && tx.send(event).is_err()
            {
                break;
            }
        }
    }
    Ok(())
}

pub async fn tick_loop(tx: UnboundedSender<AppEvent>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if tx.send(AppEvent::Tick).is_err() {
            break;
        }
    }
}

/// Bridges the coordinator's watch channels into the app event queue.
///
/// Ends when either side goes away.
pub async fn forward_coordinator_updates(
    mut conversation: watch::Receiver<Conversation>,
    mut status: watch::Receiver<CoordinatorStatus>,
    tx: UnboundedSender<AppEvent>,
) {
    loop {
        let event = tokio::select! {
            changed = conversation.changed() => {
                if changed.is_err() {
                    break;
                }
                AppEvent::ConversationUpdated(conversation.borrow_and_update().clone())
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                AppEvent::StatusChanged(*status.borrow_and_update())
            }
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Message;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn forwards_latest_snapshot_and_status() {
        let (conv_tx, conv_rx) = watch::channel(Conversation::new());
        let (status_tx, status_rx) = watch::channel(CoordinatorStatus::Idle);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let forwarder = tokio::spawn(forward_coordinator_updates(conv_rx, status_rx, tx));

        status_tx.send_replace(CoordinatorStatus::Streaming);
        let event = rx.recv().await.expect("status event");
        assert!(matches!(event, AppEvent::StatusChanged(CoordinatorStatus::Streaming)));

        conv_tx.send_replace(Conversation::from(vec![Message::user("hi")]));
        let event = rx.recv().await.expect("conversation event");
        assert!(matches!(event, AppEvent::ConversationUpdated(c) if c.len() == 1));

        drop(conv_tx);
        forwarder.await.expect("forwarder exits");
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let (conv_tx, conv_rx) = watch::channel(Conversation::new());
        let (_status_tx, status_rx) = watch::channel(CoordinatorStatus::Idle);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let forwarder = tokio::spawn(forward_coordinator_updates(conv_rx, status_rx, tx));
        conv_tx.send_replace(Conversation::from(vec![Message::user("hi")]));

        forwarder.await.expect("forwarder exits");
    }
}
