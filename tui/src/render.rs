//! Frame rendering: output log, input bar, status line.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use pagemark_core::console::OutputLog;

use crate::input::InputLine;
use crate::theme::{line_style, to_ratatui, Theme};


/// Snapshot of everything a frame needs, borrowed from the app so that
/// `terminal.draw()` can run without touching the app itself.
pub struct FrameState<'a> {
    pub log: &'a OutputLog,
    pub input: &'a InputLine,
    pub theme: &'a Theme,
    pub page_url: &'a str,
    pub identity: Option<&'a str>,
}


/// Render one frame: output box on top, input bar, one-line status.
pub fn draw(frame: &mut Frame, state: &FrameState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // output log
            Constraint::Length(3), // input bar
            Constraint::Length(1), // status line
        ])
        .split(frame.area());

    render_output(frame, chunks[0], state);
    render_input(frame, chunks[1], state);
    render_status(frame, chunks[2], state);
}


fn render_output(frame: &mut Frame, area: Rect, state: &FrameState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" pagemark ")
        .border_style(Style::default().fg(to_ratatui(state.theme.border)));

    let inner_height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_range(state.log.len(), inner_height, state.log.scroll_back());

    let lines: Vec<Line> = state.log.lines()[start..end]
        .iter()
        .map(|l| Line::styled(l.text.clone(), line_style(l.color, state.theme)))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}


fn render_input(frame: &mut Frame, area: Rect, state: &FrameState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(to_ratatui(state.theme.border)));

    let line = Line::from(vec![
        Span::styled("$ ", Style::default().fg(to_ratatui(state.theme.marker))),
        Span::styled(
            state.input.text(),
            Style::default().fg(to_ratatui(state.theme.text)),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    // Cursor sits inside the border, after the "$ " marker.
    let cursor_x = area.x + 1 + 2 + state.input.cursor() as u16;
    let cursor_y = area.y + 1;
    if cursor_x < area.x + area.width.saturating_sub(1) {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}


fn render_status(frame: &mut Frame, area: Rect, state: &FrameState) {
    let text = status_text(state.page_url, state.identity);
    let style = Style::default().fg(to_ratatui(state.theme.status));
    frame.render_widget(Paragraph::new(text).style(style), area);
}


/// The `[start, end)` slice of log lines visible in a window of the given
/// height, honoring the scroll-back offset from the end.
fn visible_range(total: usize, height: usize, scroll_back: usize) -> (usize, usize) {
    let end = total - scroll_back.min(total);
    let start = end.saturating_sub(height);
    (start, end)
}


/// The status line: page URL plus identity state.
fn status_text(page_url: &str, identity: Option<&str>) -> String {
    match identity {
        Some(id) => {
            let short: String = id.chars().take(8).collect();
            format!(" {}  ·  id {}", page_url, short)
        }
        None => format!(" {}  ·  anonymous", page_url),
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
