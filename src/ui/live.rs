use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Sparkline};

use crate::format::{Unit, format_bytes};
use crate::system::sample::SystemSample;
use crate::ui::theme::Theme;

/// Live view: CPU gauge + sparkline on top, RAM and swap readouts below.
/// Byte labels go through the formatter with the active unit, so a unit
/// change shows up on the next draw.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    sample: Option<&SystemSample>,
    cpu_history: &VecDeque<u64>,
    unit: Unit,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let Some(sample) = sample else {
        let block = bordered_block(" CPU ", theme);
        frame.render_widget(
            Paragraph::new("waiting for first sample\u{2026}")
                .style(Style::default().fg(theme.text_secondary))
                .block(block),
            chunks[0],
        );
        return;
    };

    render_cpu(frame, chunks[0], sample, cpu_history, theme);
    render_memory(frame, chunks[1], sample, unit, theme);
}

fn render_cpu(
    frame: &mut Frame,
    area: Rect,
    sample: &SystemSample,
    cpu_history: &VecDeque<u64>,
    theme: &Theme,
) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let ratio = f64::from(sample.cpu_percent.clamp(0.0, 100.0)) / 100.0;
    let gauge = Gauge::default()
        .block(bordered_block(" CPU ", theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!("{:.1}%", sample.cpu_percent));
    frame.render_widget(gauge, halves[0]);

    let data: Vec<u64> = cpu_history.iter().copied().collect();
    let sparkline = Sparkline::default()
        .block(bordered_block(" CPU history ", theme))
        .data(&data)
        .max(100)
        .style(Style::default().fg(theme.sparkline_color));
    frame.render_widget(sparkline, halves[1]);
}

fn render_memory(
    frame: &mut Frame,
    area: Rect,
    sample: &SystemSample,
    unit: Unit,
    theme: &Theme,
) {
    let block = bordered_block(" Memory ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        metric_line(
            "RAM",
            sample.ram_free,
            sample.ram_total,
            unit,
            theme,
        ),
        metric_line(
            "Swap",
            sample.swap_free,
            sample.swap_total,
            unit,
            theme,
        ),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn metric_line<'a>(
    name: &'a str,
    free: u64,
    total: u64,
    unit: Unit,
    theme: &Theme,
) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{name:>5}: "),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} free", format_bytes(free as f64, unit)),
            Style::default().fg(theme.text_primary),
        ),
        Span::styled(
            format!("  (Total: {})", format_bytes(total as f64, unit)),
            Style::default().fg(theme.text_secondary),
        ),
    ])
}

fn bordered_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))
}
