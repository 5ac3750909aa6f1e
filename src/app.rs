use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::error::Error;
use crate::format::Unit;
use crate::history::{self, FormattedSample, SessionSummary};
use crate::recorder::{Recorder, RecorderState};
use crate::store::SessionStore;
use crate::system::sample::SystemSample;
use crate::system::sampler::Sampler;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Live,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub record: KeyCode,
    pub history: KeyCode,
    pub cycle_unit: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            record: parse_key(&kb.record).unwrap_or(KeyCode::Char('r')),
            history: parse_key(&kb.history).unwrap_or(KeyCode::Char('h')),
            cycle_unit: parse_key(&kb.cycle_unit).unwrap_or(KeyCode::Char('u')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for the help overlay.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.record), "Start/stop recording"),
            (key_label(self.history), "Toggle history view"),
            (key_label(self.cycle_unit), "Cycle display unit"),
            (key_label(self.help), "Toggle help"),
            ("↑↓".to_string(), "Select session"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    pub sampler: Sampler,
    pub store: SessionStore,
    pub recorder: Recorder,
    pub unit: Unit,
    pub live: Option<SystemSample>,
    pub cpu_history: VecDeque<u64>,
    cpu_history_capacity: usize,
    pub view: View,
    pub input_mode: InputMode,
    pub sessions: Vec<SessionSummary>,
    pub selected_session: usize,
    pub samples: Vec<FormattedSample>,
    pub status_message: Option<(String, Instant)>,
    pub keybinds: ResolvedKeybinds,
    pub theme: Theme,
}

impl App {
    pub fn new(config: &Config, store: SessionStore) -> Self {
        let sparkline_length = config.general.sparkline_length;
        App {
            running: true,
            sampler: Sampler::new(),
            store,
            recorder: Recorder::new(),
            unit: Unit::resolve(&config.general.default_unit),
            live: None,
            cpu_history: VecDeque::with_capacity(sparkline_length),
            cpu_history_capacity: sparkline_length,
            view: View::Live,
            input_mode: InputMode::Normal,
            sessions: Vec::new(),
            selected_session: 0,
            samples: Vec::new(),
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            theme: Theme::default(),
        }
    }

    /// One sampling period: read host state, update the live view, and if
    /// recording, persist the sample. A sampling failure skips the tick; a
    /// storage failure is reported without pretending the write happened.
    pub fn on_tick(&mut self) {
        match self.sampler.sample() {
            Ok(sample) => {
                if self.cpu_history.len() == self.cpu_history_capacity {
                    self.cpu_history.pop_front();
                }
                self.cpu_history.push_back(sample.cpu_percent as u64);
                self.live = Some(sample);

                if let Err(err) = self.recorder.tick(&self.store, &sample) {
                    self.set_status(format!("Recording write failed: {err}"));
                }
            }
            Err(Error::SamplingUnavailable) => {
                self.set_status("Host metrics unavailable, skipping tick".to_string());
            }
            Err(err) => {
                self.set_status(format!("Sampling failed: {err}"));
            }
        }

        // Clear expired status messages (older than 3 seconds)
        if let Some((_, created)) = &self.status_message
            && created.elapsed().as_secs() >= 3
        {
            self.status_message = None;
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        if code == KeyCode::Up {
            return Action::Navigate(Direction::Up);
        }
        if code == KeyCode::Down {
            return Action::Navigate(Direction::Down);
        }
        if code == KeyCode::Esc && self.view == View::History {
            return Action::ToggleHistory;
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.record {
            // One key toggles; the recorder re-validates the transition.
            return match self.recorder.state() {
                RecorderState::Idle => Action::StartRecording,
                RecorderState::Recording => Action::StopRecording,
            };
        }
        if code == kb.history {
            return Action::ToggleHistory;
        }
        if code == kb.cycle_unit {
            return Action::CycleUnit;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        // In help mode, only the help key and Esc dismiss
        if key.code == self.keybinds.help || key.code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::StartRecording => self.start_recording(),
            Action::StopRecording => self.stop_recording(),
            Action::ToggleHistory => self.toggle_history(),
            Action::CycleUnit => self.cycle_unit(),
            Action::Navigate(dir) => self.navigate(dir),
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::None => {}
        }
    }

    fn start_recording(&mut self) {
        match self.recorder.start(&self.store) {
            Ok(id) => self.set_status(format!("Recording session {id}")),
            Err(err) => self.set_status(format!("Cannot start recording: {err}")),
        }
    }

    fn stop_recording(&mut self) {
        match self.recorder.stop(&self.store) {
            Ok(id) => {
                self.set_status(format!("Saved session {id}"));
                if self.view == View::History {
                    self.reload_history();
                }
            }
            Err(err) => self.set_status(format!("Cannot stop recording: {err}")),
        }
    }

    fn toggle_history(&mut self) {
        match self.view {
            View::Live => {
                self.view = View::History;
                self.reload_history();
            }
            View::History => {
                self.view = View::Live;
                self.samples.clear();
            }
        }
    }

    fn cycle_unit(&mut self) {
        self.unit = self.unit.next();
        // History rows are derived from stored raw bytes, so a unit change
        // means a re-query, never a reformat of formatted strings.
        if self.view == View::History {
            self.reload_samples();
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if self.view != View::History || self.sessions.is_empty() {
            return;
        }
        let last = self.sessions.len() - 1;
        let next = match direction {
            Direction::Up => self.selected_session.saturating_sub(1),
            Direction::Down => (self.selected_session + 1).min(last),
        };
        if next != self.selected_session {
            self.selected_session = next;
            self.reload_samples();
        }
    }

    fn reload_history(&mut self) {
        match history::session_summaries(&self.store) {
            Ok(sessions) => {
                self.sessions = sessions;
                if self.selected_session >= self.sessions.len() {
                    self.selected_session = self.sessions.len().saturating_sub(1);
                }
                self.reload_samples();
            }
            Err(err) => self.set_status(format!("History unavailable: {err}")),
        }
    }

    fn reload_samples(&mut self) {
        let Some(session) = self.sessions.get(self.selected_session) else {
            self.samples.clear();
            return;
        };
        match history::formatted_samples(&self.store, session.id, self.unit) {
            Ok(samples) => self.samples = samples,
            Err(err) => self.set_status(format!("History unavailable: {err}")),
        }
    }

    pub fn selected_summary(&self) -> Option<&SessionSummary> {
        self.sessions.get(self.selected_session)
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::sample::SystemSample;

    fn make_test_app() -> App {
        let store = SessionStore::in_memory().unwrap();
        App::new(&Config::default(), store)
    }

    fn sample(ram_free: u64) -> SystemSample {
        SystemSample {
            cpu_percent: 25.0,
            ram_free,
            ram_total: 8_000_000,
            swap_free: 500_000,
            swap_total: 2_000_000,
        }
    }

    #[test]
    fn record_key_toggles_start_and_stop() {
        let mut app = make_test_app();
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);

        assert_eq!(app.map_key(key), Action::StartRecording);
        app.dispatch(Action::StartRecording);
        assert!(app.recorder.is_recording());

        assert_eq!(app.map_key(key), Action::StopRecording);
        app.dispatch(Action::StopRecording);
        assert!(!app.recorder.is_recording());
    }

    #[test]
    fn default_keybinds_map_to_actions() {
        let app = make_test_app();

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHistory);

        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::CycleUnit);

        // Ctrl+C always quits
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let mut app = make_test_app();
        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);
    }

    #[test]
    fn history_view_loads_sessions_and_samples() {
        let mut app = make_test_app();

        app.dispatch(Action::StartRecording);
        let id = app.recorder.current_session().unwrap();
        app.store.insert_sample(id, &sample(1_048_576)).unwrap();
        app.dispatch(Action::StopRecording);

        app.dispatch(Action::ToggleHistory);
        assert_eq!(app.view, View::History);
        assert_eq!(app.sessions.len(), 1);
        assert_eq!(app.samples.len(), 1);
        assert_eq!(app.samples[0].ram_free, "0.01 GB");
    }

    #[test]
    fn cycling_unit_requeries_history_rows() {
        let mut app = make_test_app();
        app.unit = Unit::MB;

        app.dispatch(Action::StartRecording);
        let id = app.recorder.current_session().unwrap();
        app.store.insert_sample(id, &sample(1_048_576)).unwrap();
        app.dispatch(Action::StopRecording);
        app.dispatch(Action::ToggleHistory);

        assert_eq!(app.samples[0].ram_free, "1.00 MB");
        app.dispatch(Action::CycleUnit);
        assert_eq!(app.unit, Unit::GB);
        assert_eq!(app.samples[0].ram_free, "0.01 GB");
    }

    #[test]
    fn navigation_switches_sessions() {
        let mut app = make_test_app();

        for ram_free in [1_048_576u64, 2_097_152] {
            app.dispatch(Action::StartRecording);
            let id = app.recorder.current_session().unwrap();
            app.store.insert_sample(id, &sample(ram_free)).unwrap();
            app.dispatch(Action::StopRecording);
        }

        app.unit = Unit::MB;
        app.dispatch(Action::ToggleHistory);
        assert_eq!(app.sessions.len(), 2);
        assert_eq!(app.selected_session, 0);
        assert_eq!(app.samples[0].ram_free, "1.00 MB");

        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_session, 1);
        assert_eq!(app.samples[0].ram_free, "2.00 MB");

        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_session, 1);

        app.dispatch(Action::Navigate(Direction::Up));
        assert_eq!(app.selected_session, 0);
    }

    #[test]
    fn esc_leaves_history_view() {
        let mut app = make_test_app();
        app.dispatch(Action::ToggleHistory);
        assert_eq!(app.view, View::History);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHistory);
        app.dispatch(Action::ToggleHistory);
        assert_eq!(app.view, View::Live);
    }

    #[test]
    fn stop_while_idle_reports_instead_of_crashing() {
        let mut app = make_test_app();
        app.dispatch(Action::StopRecording);
        assert!(!app.recorder.is_recording());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("Cannot stop"));
    }
}
