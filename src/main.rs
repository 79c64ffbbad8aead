use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use scout_terminal::config::Config;
use scout_terminal::http_client;
use scout_terminal::provider::{self, Source};
use scout_terminal::query::UiState;
use scout_terminal::render::{MatchClass, RenderedTable};
use scout_terminal::results_export;
use scout_terminal::state::{AppState, Delta, FormFocus, ProviderCommand, apply_delta, role_label};

struct App {
    state: AppState,
    config: Config,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(config: Config, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::with_top_k(config.top_k),
            config,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => self.state.focus_next(),
            KeyCode::BackTab => self.state.focus_prev(),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Right | KeyCode::Char('+') => {
                self.state.select_next()
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Left | KeyCode::Char('-') => {
                self.state.select_prev()
            }
            KeyCode::Enter => {
                if let Some(cmd) = self.state.submit() {
                    self.send(cmd, "Recommend");
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_clubs(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.request_export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_clubs(&mut self) {
        let cmd = self.state.request_clubs();
        self.send(cmd, "Club list");
    }

    fn request_export(&mut self) {
        let table = self.state.query.table();
        let path = results_export::export_path(&self.config.export_dir, table, chrono::Utc::now());
        match self.state.export_command(path) {
            Some(cmd) => self.send(cmd, "Export"),
            None if self.state.query.state() != UiState::Results => {
                self.state.push_log("[INFO] Nothing to export yet")
            }
            None => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} unavailable"));
            return;
        };
        let Err(mpsc::SendError(cmd)) = tx.send(cmd) else {
            return;
        };
        self.state.push_log(format!("[WARN] {what} request failed"));
        // A dead worker must not leave the form stuck in a pending state.
        match cmd {
            ProviderCommand::LoadClubs => self.state.clubs_loading = false,
            ProviderCommand::Recommend(pending) => apply_delta(
                &mut self.state,
                Delta::RecommendFailed {
                    generation: pending.generation,
                    error: "provider offline".to_string(),
                },
            ),
            ProviderCommand::ExportResults { .. } => self.state.export.active = false,
        }
    }
}

fn main() -> io::Result<()> {
    let config = Config::load();
    let client_init = http_client::init_http_client(config.http_timeout);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(Source::from_config(&config), tx, cmd_rx);

    let mut app = App::new(config, Some(cmd_tx));
    if let Err(err) = client_init {
        app.state.push_log(format!("[WARN] {err:#}"));
    }
    app.request_clubs();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(chunks[1]);

    render_form(frame, body[0], &app.state);
    render_view(frame, body[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "Tab Field | j/k/↑/↓ Change | Enter Scout | e Export | r Reload clubs | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let source = if app.config.demo {
        "offline demo".to_string()
    } else {
        app.config.api_base.clone()
    };
    let line1 = format!("  (o)  SCOUT TERMINAL | {}", view_label(app.state.query.state()));
    let line2 = format!(" /|_|\\ {source}");
    format!("{line1}\n{line2}")
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Scout").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let focus_style = Style::default().fg(Color::Black).bg(Color::Cyan);
    let label_style = Style::default().fg(Color::DarkGray);
    let field_style = |focus: FormFocus| {
        if state.focus == focus {
            focus_style
        } else {
            Style::default()
        }
    };

    let club_hint = if state.clubs_loading {
        "loading..."
    } else if state.clubs.club_count() == 0 {
        "no clubs (r to retry)"
    } else {
        ""
    };
    let club_text = if state.clubs.selected_value().is_some() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let subrole = state.selected_subrole();
    let lines = vec![
        Line::styled("Club", label_style),
        Line::from(Span::styled(
            format!("< {} >", state.clubs.selected_label()),
            field_style(FormFocus::Club).patch(club_text),
        )),
        Line::styled(club_hint.to_string(), label_style),
        Line::styled("Role", label_style),
        Line::from(Span::styled(
            format!("< {subrole} >"),
            field_style(FormFocus::Role),
        )),
        Line::styled(role_label(subrole).to_string(), label_style),
        Line::styled("Results", label_style),
        Line::from(Span::styled(
            format!("< {} >", state.top_k),
            field_style(FormFocus::TopK),
        )),
        Line::raw(""),
        Line::styled("Enter to scout", label_style),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_view(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.query.state() {
        UiState::Idle => {
            let text = [
                "Moneyball transfer scout",
                "",
                "Pick a club and a role, then press Enter.",
                "Players from other squads are ranked by how closely",
                "they fit the selected squad's profile for that role.",
            ]
            .join("\n");
            let welcome = Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(Block::default().title("Welcome").borders(Borders::ALL));
            frame.render_widget(welcome, area);
        }
        UiState::Loading => {
            let loading = Paragraph::new(format!(
                "Scouting... (request #{})",
                state.query.generation()
            ))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Loading").borders(Borders::ALL));
            frame.render_widget(loading, area);
        }
        UiState::Results => render_results(frame, area, state.query.table()),
        UiState::Error => {
            let message = state.query.error_message().unwrap_or_default().to_string();
            let error = Paragraph::new(message)
                .wrap(Wrap { trim: false })
                .style(Style::default().fg(Color::Red))
                .block(Block::default().title("Error").borders(Borders::ALL));
            frame.render_widget(error, area);
        }
    }
}

fn render_results(frame: &mut Frame, area: Rect, table: &RenderedTable) {
    let title = match &table.caption {
        Some(caption) => format!("Results | {} | {}", caption.club, caption.role),
        None => "Results".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(table.header.iter().map(|label| Cell::from(label.clone())))
        .style(header_style)
        .bottom_margin(1);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::from(row.rank.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(Text::from(vec![
                    Line::styled(
                        row.player_name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Line::styled(row.player_meta.clone(), Style::default().fg(Color::DarkGray)),
                ])),
                Cell::from(row.squad.clone()),
                Cell::from(row.similarity.text.clone())
                    .style(match_style(row.similarity.class)),
                Cell::from(Text::from(vec![
                    Line::styled(
                        row.key_stat.value.clone(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Line::styled(
                        row.key_stat.caption.clone(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])),
            ];
            cells.extend(row.stats.iter().map(|value| Cell::from(value.clone())));
            Row::new(cells).height(2)
        })
        .collect();

    if rows.is_empty() {
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(block.inner(area));
        frame.render_widget(block, area);
        frame.render_widget(
            Table::new(Vec::<Row>::new(), column_widths(table)).header(header),
            sections[0],
        );
        let empty = Paragraph::new("No recommendations returned")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
        return;
    }

    let widget = Table::new(rows, column_widths(table))
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(widget, area);
}

fn column_widths(table: &RenderedTable) -> Vec<Constraint> {
    let mut widths = vec![
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let extra = table.column_count().saturating_sub(widths.len());
    widths.extend(std::iter::repeat_n(Constraint::Length(9), extra));
    widths
}

fn match_style(class: MatchClass) -> Style {
    match class {
        MatchClass::High => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        MatchClass::Mid => Style::default().fg(Color::Black).bg(Color::Yellow),
    }
}

fn view_label(view: UiState) -> &'static str {
    match view {
        UiState::Idle => "READY",
        UiState::Loading => "LOADING",
        UiState::Results => "RESULTS",
        UiState::Error => "ERROR",
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scout Terminal - Help",
        "",
        "Form:",
        "  Tab / Shift-Tab   Next / previous field",
        "  j/k or ↑/↓        Change club, role or result count",
        "  Enter             Scout players",
        "",
        "Results:",
        "  e                 Export table to .xlsx",
        "  r                 Reload club list",
        "",
        "  ?                 Toggle help",
        "  q                 Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
