mod notice;

pub use notice::{Notice, NoticeLevel};

use crate::core::{Conversation, CoordinatorStatus};
use crate::tui::widgets::FollowScroll;
use std::time::{Duration, Instant};

/// View-side mirror of the coordinator plus purely visual state. The
/// transcript here is only ever replaced wholesale by published snapshots.
pub struct AppState {
    pub should_quit: bool,
    pub frame: usize,
    pub spinner_frame: usize,
    pub conversation: Conversation,
    pub status: CoordinatorStatus,
    pub scroll: FollowScroll,
    pub notice: Option<Notice>,

    spinner_last_update: Option<Instant>,
    turn_start: Option<Instant>,
}

impl AppState {
    #[must_use]
    pub fn new(conversation: Conversation) -> Self {
        Self {
            should_quit: false,
            frame: 0,
            spinner_frame: 0,
            conversation,
            status: CoordinatorStatus::Idle,
            scroll: FollowScroll::new(),
            notice: None,
            spinner_last_update: None,
            turn_start: None,
        }
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.update_spinner();

        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(Instant::now()))
        {
            self.notice = None;
        }
    }

    fn update_spinner(&mut self) {
        const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

        let now = Instant::now();
        match self.spinner_last_update {
            Some(last) if now.duration_since(last) >= SPINNER_INTERVAL => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                self.spinner_last_update = Some(now);
            }
            None => {
                self.spinner_last_update = Some(now);
            }
            _ => {}
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn apply_snapshot(&mut self, conversation: Conversation) {
        self.conversation = conversation;
    }

    pub fn apply_status(&mut self, status: CoordinatorStatus) {
        match (self.status.is_idle(), status.is_idle()) {
            (true, false) => self.turn_start = Some(Instant::now()),
            (false, true) => self.turn_start = None,
            _ => {}
        }
        self.status = status;
    }

    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        !self.status.is_idle()
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.turn_start.map(|start| start.elapsed())
    }

    pub fn show_notice(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.notice = Some(Notice::new(text, level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Message;

    #[test]
    fn new_state_is_idle() {
        let state = AppState::new(Conversation::new());
        assert!(!state.should_quit);
        assert!(!state.is_in_flight());
        assert!(state.elapsed().is_none());
    }

    #[test]
    fn status_transitions_track_elapsed_time() {
        let mut state = AppState::new(Conversation::new());

        state.apply_status(CoordinatorStatus::Submitting);
        assert!(state.is_in_flight());
        assert!(state.elapsed().is_some());

        state.apply_status(CoordinatorStatus::Streaming);
        assert!(state.elapsed().is_some());

        state.apply_status(CoordinatorStatus::Idle);
        assert!(state.elapsed().is_none());
    }

    #[test]
    fn snapshot_replaces_transcript() {
        let mut state = AppState::new(Conversation::from(vec![Message::user("old")]));
        let next = Conversation::from(vec![Message::user("q"), Message::assistant("a")]);

        state.apply_snapshot(next.clone());
        assert_eq!(state.conversation, next);
    }

    #[test]
    fn tick_advances_frame() {
        let mut state = AppState::new(Conversation::new());
        state.tick();
        state.tick();
        assert_eq!(state.frame, 2);
    }
}
