use std::{io, time::Duration};
use anyhow::Result;
use chrono::{Datelike, Months, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Padding, Paragraph},
};
use parklog_core::{AggregationEngine, RecordStore};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    bar: Color,
    peak: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    bar: Color::Green,
    peak: Color::Yellow,
};

pub struct ChartApp<'a, S: RecordStore> {
    engine: AggregationEngine<'a, S>,
    pub attraction: String,
    pub month_start: NaiveDate,
    pub series: Vec<(String, u64)>,
}

impl<'a, S: RecordStore> ChartApp<'a, S> {
    pub fn new(store: &'a S, attraction: String, month: &str) -> Result<Self> {
        let month_start = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")?;
        let mut app = Self {
            engine: AggregationEngine::new(store),
            attraction,
            month_start,
            series: Vec::new(),
        };
        app.reload()?;
        Ok(app)
    }

    pub fn month_key(&self) -> String {
        self.month_start.format("%Y-%m").to_string()
    }

    fn reload(&mut self) -> Result<()> {
        self.series = self.engine.query_daily_series(&self.attraction, &self.month_key())?;
        Ok(())
    }

    pub fn next_month(&mut self) -> Result<()> {
        if let Some(next) = self.month_start.checked_add_months(Months::new(1)) {
            self.month_start = next;
            self.reload()?;
        }
        Ok(())
    }

    pub fn previous_month(&mut self) -> Result<()> {
        if let Some(prev) = self.month_start.checked_sub_months(Months::new(1)) {
            self.month_start = prev;
            self.reload()?;
        }
        Ok(())
    }

    pub fn total(&self) -> u64 {
        self.series.iter().map(|(_, n)| n).sum()
    }
}

pub fn run<S: RecordStore>(store: &S, attraction: String, month: &str) -> Result<()> {
    let mut app = ChartApp::new(store, attraction, month)?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn event_loop<S: RecordStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChartApp<'_, S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Left | KeyCode::Char('h') => app.previous_month()?,
                        KeyCode::Right | KeyCode::Char('l') => app.next_month()?,
                        _ => {}
                    }
                }
            }
        }
    }
}

fn ui<S: RecordStore>(frame: &mut Frame, app: &ChartApp<'_, S>) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + sidebar
            Constraint::Length(1), // Footer
        ])
        .split(size);

    // --- Header ---
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(30),
        ])
        .split(main_layout[0]);

    let title = Paragraph::new(Span::styled(
        app.attraction.to_uppercase(),
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(title, header_layout[0]);

    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(
            format!(" {} ", app.month_start.format("%B %Y")),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" > ", Style::default().fg(THEME.text)),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[1]);

    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(75),
            Constraint::Length(1),
            Constraint::Percentage(25),
        ])
        .split(main_layout[1]);

    if app.series.is_empty() {
        frame.render_widget(
            Paragraph::new("No visitors recorded this month")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
            content_chunks[0],
        );
    } else {
        draw_chart(frame, app, content_chunks[0]);
    }
    draw_info_panel(frame, app, content_chunks[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("MONTH: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

fn draw_chart<S: RecordStore>(frame: &mut Frame, app: &ChartApp<'_, S>, area: Rect) {
    let peak = app.series.iter().map(|(_, n)| *n).max().unwrap_or(0);

    let bar_items: Vec<Bar> = app
        .series
        .iter()
        .map(|(date, visitors)| {
            // Label with the day of month only
            let label = date.rsplit('-').next().unwrap_or(date.as_str()).to_string();
            let color = if *visitors == peak { THEME.peak } else { THEME.bar };
            Bar::default()
                .label(label)
                .value(*visitors)
                .style(Style::default().fg(color))
                .text_value(visitors.to_string())
        })
        .collect();

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" Visitors per day ");

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(4)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items));

    frame.render_widget(chart, area);
}

fn draw_info_panel<S: RecordStore>(frame: &mut Frame, app: &ChartApp<'_, S>, area: Rect) {
    let total = app.total();
    let open_days = app.series.len() as u64;
    let average = if open_days > 0 { total as f64 / open_days as f64 } else { 0.0 };
    let best = app
        .series
        .iter()
        .max_by_key(|(_, n)| *n)
        .map(|(d, n)| format!("{} ({})", d, n))
        .unwrap_or_else(|| "-".to_string());
    let days_in_month = app
        .month_start
        .checked_add_months(Months::new(1))
        .map(|next| (next - app.month_start).num_days())
        .unwrap_or(30);

    let info_text = vec![
        Line::from(Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Total:    ", Style::default().fg(THEME.muted)),
            Span::styled(total.to_string(), Style::default().fg(THEME.bar).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Days:     ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{}/{}", open_days, days_in_month),
                Style::default().fg(THEME.text),
            ),
        ]),
        Line::from(vec![
            Span::styled("Average:  ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{:.1}", average), Style::default().fg(THEME.text)),
        ]),
        Line::from(vec![
            Span::styled("Best:     ", Style::default().fg(THEME.muted)),
            Span::styled(best, Style::default().fg(THEME.peak)),
        ]),
        Line::from(vec![
            Span::styled("Year:     ", Style::default().fg(THEME.muted)),
            Span::styled(app.month_start.year().to_string(), Style::default().fg(THEME.text)),
        ]),
    ];

    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(info_block, area);
}
