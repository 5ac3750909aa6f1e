pub mod header;
pub mod help;
pub mod history;
pub mod live;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, View};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        app.recorder.state(),
        app.recorder.elapsed_secs(),
        app.unit,
        &app.theme,
    );

    match app.view {
        View::Live => live::render(
            frame,
            chunks[1],
            app.live.as_ref(),
            &app.cpu_history,
            app.unit,
            &app.theme,
        ),
        View::History => history::render(
            frame,
            chunks[1],
            &app.sessions,
            app.selected_session,
            &app.samples,
            &app.theme,
        ),
    }

    statusbar::render(
        frame,
        chunks[2],
        app.view,
        app.recorder.state(),
        app.status_message.as_ref(),
        &app.theme,
    );

    if app.show_help() {
        let entries = app.help_entries();
        let area = frame.area();
        help::render(frame, area, &entries, &app.theme);
    }
}
