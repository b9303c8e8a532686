//! Rendering

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use citekit_core::{CitationStyle, ClipboardWriter, HistoryStorage};

use crate::app::{history_copy_key, App};
use crate::focus::Focus;

const HELP_LINES: &[(&str, &str)] = &[
    ("Enter", "Look up the DOI in the input"),
    ("Esc", "Clear the form (input focused)"),
    ("/", "Focus the DOI input"),
    ("Tab", "Next panel"),
    ("Ctrl+C", "Copy selected format (outside input)"),
    ("h / l", "Previous / next format"),
    ("j / k", "Move in history"),
    ("c / Enter", "Copy history entry (history focused)"),
    ("X", "Clear history"),
    ("q", "Quit (outside input)"),
    ("?", "Toggle help"),
];

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

/// Render the application
pub fn render<S: HistoryStorage, C: ClipboardWriter>(app: &App<S, C>, frame: &mut Frame) {
    let now = Instant::now();
    let size = frame.area();

    // Status bar, input, content, message line
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    render_status_bar(app, frame, chunks[0]);
    render_input(app, frame, chunks[1]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    render_result(app, frame, content[0], now);
    render_history(app, frame, content[1], now);
    render_message_line(app, frame, chunks[3]);

    if app.show_help {
        render_help_overlay(frame, size);
    }
}

fn render_status_bar<S: HistoryStorage, C: ClipboardWriter>(
    app: &App<S, C>,
    frame: &mut Frame,
    area: Rect,
) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.focus),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" citekit "),
        Span::styled(
            format!("format: {} ", app.selected_format),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("history: {}/{}", app.history.len(), app.history.max_items()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input<S: HistoryStorage, C: ClipboardWriter>(
    app: &App<S, C>,
    frame: &mut Frame,
    area: Rect,
) {
    let focused = app.focus == Focus::Input;
    let text = if app.input.is_empty() && !focused {
        Span::styled(
            "Press / and paste a DOI, e.g. 10.1038/nature12373",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(app.input.as_str())
    };
    frame.render_widget(
        Paragraph::new(Line::from(text)).block(panel_block(" DOI ", focused)),
        area,
    );

    if focused {
        let x = area.x + 1 + app.input.chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn format_line(style: CitationStyle, text: &str, selected: bool, copied: bool) -> Vec<Line<'_>> {
    let label_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut header = vec![Span::styled(style.label(), label_style)];
    if copied {
        header.push(Span::styled("  ✓ Copied", Style::default().fg(Color::Green)));
    }
    vec![Line::from(header), Line::from(text), Line::from("")]
}

fn render_result<S: HistoryStorage, C: ClipboardWriter>(
    app: &App<S, C>,
    frame: &mut Frame,
    area: Rect,
    now: Instant,
) {
    let block = panel_block(" Citation ", app.focus == Focus::Result);

    let lines: Vec<Line> = if app.fetch.is_loading() {
        vec![Line::from("Fetching...")]
    } else if let Some(error) = app.fetch.error() {
        vec![Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red),
        ))]
    } else if let Some(result) = app.fetch.result() {
        let view = &result.view;
        let mut lines = vec![
            Line::from(Span::styled(
                view.plain_title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(view.authors.as_str()),
            Line::from(Span::styled(
                format!("{} · {}", view.journal, view.date),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];
        for (style, text) in result.citations.iter() {
            let copied = app.is_copied(&format!("shortcut-{}", style.as_str()), now);
            lines.extend(format_line(style, text, style == app.selected_format, copied));
        }
        lines
    } else {
        vec![Line::from(Span::styled(
            "No citation yet",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_history<S: HistoryStorage, C: ClipboardWriter>(
    app: &App<S, C>,
    frame: &mut Frame,
    area: Rect,
    now: Instant,
) {
    let focused = app.focus == Focus::History;
    let items: Vec<ListItem> = app
        .history
        .entries()
        .iter()
        .map(|entry| {
            let key = history_copy_key(&entry.id, app.selected_format);
            let mut title = vec![Span::raw(entry.title.as_str())];
            if app.is_copied(&key, now) {
                title.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
            }
            ListItem::new(vec![
                Line::from(title),
                Line::from(Span::styled(
                    format!("  {} · {}", entry.authors, entry.doi),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(panel_block(" History ", focused))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.history.is_empty() {
        state.select(Some(app.selected_history));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_message_line<S: HistoryStorage, C: ClipboardWriter>(
    app: &App<S, C>,
    frame: &mut Frame,
    area: Rect,
) {
    let content = match &app.status_message {
        Some(msg) => Span::raw(msg.as_str()),
        None => Span::styled("? for help", Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(Line::from(content)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 56.min(area.width);
    let height = (HELP_LINES.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:>10}  ", key), Style::default().fg(Color::Yellow)),
                Span::raw(*desc),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(" Help ").borders(Borders::ALL)),
        popup,
    );
}
