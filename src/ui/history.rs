use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, List, ListItem, ListState, Row, Table};

use crate::format::truncate_unicode;
use crate::history::{FormattedSample, SessionSummary};
use crate::ui::theme::Theme;

/// History view: session list on the left, the selected session's samples
/// on the right. Rows come pre-formatted from the history service.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    sessions: &[SessionSummary],
    selected: usize,
    samples: &[FormattedSample],
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(40)])
        .split(area);

    render_session_list(frame, chunks[0], sessions, selected, theme);
    render_sample_table(frame, chunks[1], samples, theme);
}

fn render_session_list(
    frame: &mut Frame,
    area: Rect,
    sessions: &[SessionSummary],
    selected: usize,
    theme: &Theme,
) {
    let block = bordered_block(" Sessions ", theme);
    let width = block.inner(area).width.saturating_sub(1) as usize;

    let items: Vec<ListItem> = sessions
        .iter()
        .map(|session| ListItem::new(truncate_unicode(&session.label(), width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(theme.text_primary))
        .highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !sessions.is_empty() {
        state.select(Some(selected.min(sessions.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_sample_table(
    frame: &mut Frame,
    area: Rect,
    samples: &[FormattedSample],
    theme: &Theme,
) {
    let header = Row::new(
        ["Timestamp", "CPU (%)", "RAM Free", "RAM Total", "Swap Free", "Swap Total"]
            .into_iter()
            .map(Cell::from),
    )
    .style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = samples
        .iter()
        .map(|sample| {
            Row::new([
                Cell::from(sample.timestamp.clone()),
                Cell::from(sample.cpu.clone()),
                Cell::from(sample.ram_free.clone()),
                Cell::from(sample.ram_total.clone()),
                Cell::from(sample.swap_free.clone()),
                Cell::from(sample.swap_total.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(bordered_block(" Samples ", theme))
    .style(Style::default().fg(theme.text_primary));

    frame.render_widget(table, area);
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
