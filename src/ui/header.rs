use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::{Unit, format_elapsed};
use crate::recorder::RecorderState;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    state: RecorderState,
    elapsed_secs: u64,
    unit: Unit,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![Span::styled(
        " sysrec ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    )];

    match state {
        RecorderState::Recording => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("\u{25cf} REC {}", format_elapsed(elapsed_secs)),
                Style::default()
                    .fg(theme.recording_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        RecorderState::Idle => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                "Idle",
                Style::default().fg(theme.text_secondary),
            ));
        }
    }

    spans.extend([
        Span::raw("  "),
        Span::styled(
            format!("Unit: {}", unit.label()),
            Style::default().fg(theme.text_secondary),
        ),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}
