use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Focus, InputMode, StatusKind};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("PARKLOG · VISITOR REGISTER")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(65),
        ])
        .split(main_chunks[1]);

    draw_attractions(f, app, content_chunks[0]);
    draw_draft(f, app, content_chunks[1]);
    draw_status(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Normal => "j/k: Move | Tab: Focus | Enter: Select | a: Add count | d: Remove | s: Save | x: Clear | q: Quit",
        InputMode::Counting => "Enter: Add | Esc: Cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn focus_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_attractions(f: &mut Frame, app: &mut App, area: Rect) {
    let active = app.recorder.attraction().map(|a| a.to_string());
    let items: Vec<ListItem> = app
        .attractions
        .iter()
        .map(|name| {
            if active.as_deref() == Some(name.as_str()) {
                ListItem::new(Line::from(vec![
                    Span::styled("● ", Style::default().fg(Color::Green)),
                    Span::styled(name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]))
            } else {
                ListItem::new(Line::from(format!("  {}", name)))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Attractions ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(focus_style(app, Focus::Attractions)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut app.attraction_state);
}

fn draw_draft(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary
            Constraint::Min(3),    // Timeslots
            Constraint::Length(3), // Input
        ])
        .split(area);

    let attraction = app.recorder.attraction().unwrap_or("None selected").to_string();
    let summary = vec![
        Line::from(vec![
            Span::styled("Attraction: ", Style::default().fg(Color::Blue)),
            Span::styled(attraction, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Draft total: ", Style::default().fg(Color::Blue)),
            Span::styled(
                app.recorder.running_total().to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Saved today: ", Style::default().fg(Color::Blue)),
            Span::raw(app.committed_today.to_string()),
        ]),
    ];
    let summary_block = Paragraph::new(summary)
        .block(Block::default().title(" Draft ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(summary_block, chunks[0]);

    let rows: Vec<Row> = app
        .timeslots()
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            Row::new(vec![
                Span::styled(format!("{}", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(slot.start_time.clone()),
                Span::raw(slot.end_time.clone()),
                Span::styled(slot.count.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),  // #
            Constraint::Length(7),  // Start
            Constraint::Length(7),  // End
            Constraint::Min(8),     // Visitors
        ],
    )
    .header(Row::new(vec!["#", "Start", "End", "Visitors"]).style(Style::default().fg(Color::Yellow)))
    .block(
        Block::default()
            .title(" Timeslots ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(focus_style(app, Focus::Timeslots)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.slot_state);

    let (input_style, title) = match app.input_mode {
        InputMode::Normal => (Style::default().fg(Color::DarkGray), " Visitors (press a) "),
        InputMode::Counting => (Style::default().fg(Color::Yellow), " Visitors "),
    };
    let input = Paragraph::new(app.input.as_str())
        .style(input_style)
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(input, chunks[2]);

    if let InputMode::Counting = app.input_mode {
        let byte_index: usize = app.input.chars().take(app.cursor_position).map(|c| c.len_utf8()).sum();
        let offset = app.input[..byte_index].width() as u16;
        f.set_cursor_position(Position::new(chunks[2].x + 1 + offset, chunks[2].y + 1));
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some((StatusKind::Info, msg)) => Span::styled(msg.as_str(), Style::default().fg(Color::Green)),
        Some((StatusKind::Error, msg)) => Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
        None => Span::raw(""),
    };
    f.render_widget(Paragraph::new(Line::from(line)).alignment(Alignment::Center), area);
}
