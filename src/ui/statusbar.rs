use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::View;
use crate::recorder::RecorderState;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: View,
    state: RecorderState,
    status_message: Option<&(String, std::time::Instant)>,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some((msg, _)) = status_message {
        let color = if msg.starts_with("Recording session") || msg.starts_with("Saved") {
            theme.status_ok
        } else {
            theme.status_err
        };
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let mut spans = Vec::new();
    spans.extend(pill_spans("q", "Quit", theme));
    match state {
        RecorderState::Idle => spans.extend(pill_spans("r", "Record", theme)),
        RecorderState::Recording => spans.extend(pill_spans("r", "Stop", theme)),
    }
    spans.extend(pill_spans("u", "Unit", theme));
    match view {
        View::Live => spans.extend(pill_spans("h", "History", theme)),
        View::History => {
            spans.extend(pill_spans("Esc", "Back", theme));
            spans.extend(pill_spans("\u{2191}\u{2193}", "Session", theme));
        }
    }
    spans.extend(pill_spans("?", "Help", theme));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
