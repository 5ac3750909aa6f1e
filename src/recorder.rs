use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::store::{SessionId, SessionStore};
use crate::system::sample::SystemSample;

/// Recording lifecycle, surfaced to the UI so start/stop controls can be
/// gated on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Drives recording sessions: opens a session on start, tags every tick's
/// sample with it, closes it on stop. Holds only the open session's id as
/// transient state, never a copy of the row.
#[derive(Debug, Default)]
pub struct Recorder {
    current: Option<SessionId>,
    elapsed_secs: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecorderState {
        if self.current.is_some() {
            RecorderState::Recording
        } else {
            RecorderState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.current
    }

    /// Seconds spent in the current recording, one per tick. Presentation
    /// value only; never persisted.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Opens a new session and transitions to `Recording`. A re-entrant
    /// start is rejected instead of silently opening a second session.
    pub fn start(&mut self, store: &SessionStore) -> Result<SessionId> {
        if self.current.is_some() {
            warn!("start requested while already recording");
            return Err(Error::InvalidState("already recording"));
        }
        let id = store.open_session()?;
        self.current = Some(id);
        self.elapsed_secs = 0;
        debug!(session_id = id, "recording started");
        Ok(id)
    }

    /// Persists one sample under the open session. No-op while idle. A
    /// failed insert propagates; the sample is not counted as recorded.
    pub fn tick(&mut self, store: &SessionStore, sample: &SystemSample) -> Result<()> {
        let Some(id) = self.current else {
            return Ok(());
        };
        store.insert_sample(id, sample)?;
        self.elapsed_secs += 1;
        Ok(())
    }

    /// Closes the open session and returns to `Idle`. The session id is
    /// cleared only after the close commits, so a storage failure leaves
    /// the recorder visibly still recording.
    pub fn stop(&mut self, store: &SessionStore) -> Result<SessionId> {
        let Some(id) = self.current else {
            return Err(Error::InvalidState("not recording"));
        };
        store.close_session(id)?;
        self.current = None;
        debug!(session_id = id, elapsed_secs = self.elapsed_secs, "recording stopped");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SystemSample {
        SystemSample {
            cpu_percent: 12.5,
            ram_free: 4_000_000,
            ram_total: 16_000_000,
            swap_free: 1_000_000,
            swap_total: 2_000_000,
        }
    }

    #[test]
    fn starts_idle() {
        let recorder = Recorder::new();
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(recorder.current_session(), None);
    }

    #[test]
    fn start_opens_a_session_and_resets_elapsed() {
        let store = SessionStore::in_memory().unwrap();
        let mut recorder = Recorder::new();

        recorder.tick(&store, &sample()).unwrap(); // idle tick, no-op
        let id = recorder.start(&store).unwrap();

        assert_eq!(recorder.state(), RecorderState::Recording);
        assert_eq!(recorder.current_session(), Some(id));
        assert_eq!(recorder.elapsed_secs(), 0);
        assert!(store.session(id).unwrap().unwrap().end_time.is_none());
    }

    #[test]
    fn reentrant_start_is_rejected() {
        let store = SessionStore::in_memory().unwrap();
        let mut recorder = Recorder::new();
        recorder.start(&store).unwrap();

        match recorder.start(&store) {
            Err(Error::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
        // Still exactly one session open.
        assert_eq!(store.sessions().unwrap().len(), 1);
    }

    #[test]
    fn tick_writes_one_row_while_recording() {
        let store = SessionStore::in_memory().unwrap();
        let mut recorder = Recorder::new();
        let id = recorder.start(&store).unwrap();

        recorder.tick(&store, &sample()).unwrap();
        assert_eq!(store.samples(id).unwrap().len(), 1);
        assert_eq!(recorder.elapsed_secs(), 1);

        recorder.tick(&store, &sample()).unwrap();
        assert_eq!(store.samples(id).unwrap().len(), 2);
        assert_eq!(recorder.elapsed_secs(), 2);
    }

    #[test]
    fn idle_tick_writes_nothing() {
        let store = SessionStore::in_memory().unwrap();
        let mut recorder = Recorder::new();

        let id = recorder.start(&store).unwrap();
        recorder.stop(&store).unwrap();

        recorder.tick(&store, &sample()).unwrap();
        assert!(store.samples(id).unwrap().is_empty());
    }

    #[test]
    fn stop_closes_the_session() {
        let store = SessionStore::in_memory().unwrap();
        let mut recorder = Recorder::new();
        let id = recorder.start(&store).unwrap();

        let closed = recorder.stop(&store).unwrap();
        assert_eq!(closed, id);
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert!(store.session(id).unwrap().unwrap().end_time.is_some());
    }

    #[test]
    fn stop_without_start_is_rejected() {
        let store = SessionStore::in_memory().unwrap();
        let mut recorder = Recorder::new();
        match recorder.stop(&store) {
            Err(Error::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn restarting_assigns_a_distinct_session() {
        let store = SessionStore::in_memory().unwrap();
        let mut recorder = Recorder::new();

        let first = recorder.start(&store).unwrap();
        recorder.tick(&store, &sample()).unwrap();
        recorder.stop(&store).unwrap();

        let second = recorder.start(&store).unwrap();
        assert_ne!(first, second);
        assert_eq!(recorder.elapsed_secs(), 0);
        recorder.stop(&store).unwrap();
    }
}
