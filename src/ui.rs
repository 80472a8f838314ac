use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::App;

/// Pure projection from view state to widgets. No side effects; the commit
/// composer replaces the whole frame while a message is being edited.
pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    if app.is_editing_commit() {
        render_commit_view(f, app, size);
        return;
    }

    let footer_height = if app.last_error().is_some() { 2 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(footer_height),
        ])
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_header(f, app, chunks[0]);
    render_file_list(f, app, body[0]);
    render_diff_view(f, app, body[1]);
    render_footer(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let count = app.entries().len();
    let suffix = if app.is_loading() { "  (loading…)" } else { "" };
    let text = format!(" {count} changed file(s){suffix}");
    let paragraph =
        Paragraph::new(text).style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(paragraph, area);
}

fn render_file_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", entry.code.label()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(entry.path.clone()),
            ]);
            if index == app.selected() {
                ListItem::new(line.style(
                    Style::default()
                        .fg(Color::Yellow)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Changes")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    f.render_widget(list, area);
}

fn render_diff_view(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Diff")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    if !app.diff_visible() {
        let paragraph = Paragraph::new("tab: toggle diff")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let Some(diff) = app.diff_text() else {
        let paragraph = Paragraph::new("…").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let max_lines = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = diff
        .lines()
        .take(max_lines)
        .map(|line| {
            let style = if line.starts_with('+') {
                Style::default().fg(Color::Green)
            } else if line.starts_with('-') {
                Style::default().fg(Color::Red)
            } else if line.starts_with(' ') {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(line.to_string(), style))
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        app.keymap().help_line(),
        Style::default().add_modifier(Modifier::DIM),
    ))];
    if let Some(err) = app.last_error() {
        lines.push(Line::from(Span::styled(
            format!("error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_commit_view(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new("Commit").style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(title, chunks[0]);

    let input = Paragraph::new(format!("{}█", app.commit_input()))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(input, chunks[1]);

    let hint = Paragraph::new("Commit message. Enter to commit. Esc to cancel.")
        .style(Style::default().add_modifier(Modifier::DIM));
    f.render_widget(hint, chunks[2]);
}
