use std::borrow::Cow;

use super::state::{AppState, ViewState};
use crate::activity::{LogKind, SystemStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw(f: &mut Frame, state: &AppState, view: &mut ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, state, view, chunks[0]);
    draw_schedule(f, state, chunks[1]);
    draw_logs(f, state, view, chunks[2]);
    draw_footer(f, state, chunks[3]);
}

fn status_color(status: SystemStatus) -> Color {
    match status {
        SystemStatus::Active => Color::Green,
        SystemStatus::Error => Color::Red,
        SystemStatus::Inactive => Color::Yellow,
    }
}

fn draw_header(f: &mut Frame, state: &AppState, view: &ViewState, area: Rect) {
    let status = Span::styled(
        format!("System {}", state.status.title()),
        Style::default()
            .fg(status_color(state.status))
            .add_modifier(Modifier::BOLD),
    );

    let activity = if state.busy {
        let ch = SPINNER_FRAMES[(view.spinner_frame as usize) % SPINNER_FRAMES.len()];
        Span::styled(format!(" {} TESTING", ch), Style::default().fg(Color::Cyan))
    } else {
        Span::styled(" IDLE", Style::default().fg(Color::DarkGray))
    };

    let env = if state.env_loaded {
        Span::styled("Environment variables loaded", Style::default().fg(Color::Green))
    } else {
        Span::styled("Please configure your .env file", Style::default().fg(Color::Red))
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(" "),
            status,
            activity,
            Span::styled(
                format!("  | up {}", state.uptime()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::raw(" "),
            Span::raw(state.status.description()),
            Span::raw("  "),
            env,
        ]),
    ];

    let block = Block::default()
        .title(" LinkedIn Auto-Post ")
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_schedule(f: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = vec![Span::raw(" Posts at ")];
    for time in &state.schedule.times {
        spans.push(Span::styled(
            format!("[{}]", time),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        format!("daily ({})", state.schedule.timezone),
        Style::default().fg(Color::DarkGray),
    ));

    let block = Block::default()
        .title(" Posting Schedule ")
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_logs(f: &mut Frame, state: &AppState, view: &mut ViewState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize; // borders
    let visible_lines = area.height.saturating_sub(2) as usize;
    let total = state.logs.len();
    view.clamp_scroll(total.saturating_sub(visible_lines));

    if total == 0 {
        let hint = Line::from(Span::styled(
            " No logs yet. Press [m] to run the mock pipeline.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        let block = Block::default()
            .title(" Activity Log ")
            .borders(Borders::ALL);
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    // Newest entry at the bottom; the offset scrolls back in time.
    let offset = view.log_scroll_offset;
    let end = total - offset;
    let start = end.saturating_sub(visible_lines);

    let lines: Vec<Line> = state.logs.list()[start..end]
        .iter()
        .map(|entry| {
            let color = match entry.kind {
                LogKind::Error => Color::Red,
                LogKind::Success => Color::Green,
                LogKind::Info => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", entry.timestamp, entry.kind.label());
            let msg_max = max_width.saturating_sub(prefix.chars().count());
            let msg = truncate_with_ellipsis(&entry.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let title = format!(" Activity Log [{}-{}/{}] ", start + 1, end, total);
    let block = Block::default().title(title).borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let action_style = if state.busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let key_style = Style::default().fg(Color::Yellow);

    let line = Line::from(vec![
        Span::styled("  [m]", action_style),
        Span::raw("ock run  "),
        Span::styled("[r]", action_style),
        Span::raw("eal APIs  "),
        Span::styled("[e]", key_style),
        Span::raw("nv status  "),
        Span::styled("[c]", key_style),
        Span::raw("lear  "),
        Span::styled("[j/k]", key_style),
        Span::raw(" scroll  "),
        Span::styled("[g/G]", key_style),
        Span::raw(" top/bottom  "),
        Span::styled("[q]", key_style),
        Span::raw("uit"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
