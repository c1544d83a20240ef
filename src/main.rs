use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::ThreadRng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tui_textarea::TextArea;

use room_escape::config::GameConfig;
use room_escape::game::{Game, ItemFinder, Outcome, Rejection};
use room_escape::logging;
use room_escape::puzzle::{builtin_catalog, load_catalog, Catalog, Puzzle, PuzzleKind};

const TICK_RATE: Duration = Duration::from_secs(1);

enum Screen {
    TitleScreen,
    Playing,
    GameOver,
}

enum MenuOption {
    NewGame,
    Quit,
}

impl MenuOption {
    fn next(&self) -> Self {
        match self {
            MenuOption::NewGame => MenuOption::Quit,
            MenuOption::Quit => MenuOption::NewGame,
        }
    }
}

struct App<'a> {
    catalog: Catalog,
    game: Game,
    finder: ItemFinder<ThreadRng>,
    screen: Screen,
    menu_selection: MenuOption,
    answer: TextArea<'a>,
    selected_puzzle: usize,
    selected_item: Option<usize>,
    message: String,
    message_style: Style,
    command_mode: bool,
    command_buffer: String,
}

fn answer_box<'a>() -> TextArea<'a> {
    let mut answer = TextArea::default();
    answer.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Answer [ENTER: Solve] "),
    );
    answer.set_placeholder_text("Enter your answer");
    answer.set_cursor_line_style(Style::default());
    answer
}

impl<'a> App<'a> {
    fn new(catalog: Catalog, game: Game, finder: ItemFinder<ThreadRng>) -> Self {
        App {
            catalog,
            game,
            finder,
            screen: Screen::TitleScreen,
            menu_selection: MenuOption::NewGame,
            answer: answer_box(),
            selected_puzzle: 0,
            selected_item: None,
            message: String::new(),
            message_style: Style::default().fg(Color::Yellow),
            command_mode: false,
            command_buffer: String::new(),
        }
    }

    fn say(&mut self, message: impl Into<String>, color: Color) {
        self.message = message.into();
        self.message_style = Style::default().fg(color);
    }

    fn start_game(&mut self) {
        self.game.reset();
        self.game.start();
        self.screen = Screen::Playing;
        self.answer = answer_box();
        self.selected_puzzle = 0;
        self.selected_item = None;
        self.say(
            "Solve every puzzle to open the way forward. F2 searches the room for items.",
            Color::Yellow,
        );
    }

    fn puzzles(&self) -> &[Puzzle] {
        self.game
            .state()
            .current_room()
            .map(|room| room.puzzles.as_slice())
            .unwrap_or_default()
    }

    fn selected(&self) -> Option<&Puzzle> {
        self.puzzles().get(self.selected_puzzle)
    }

    fn move_selection(&mut self, down: bool) {
        let count = self.puzzles().len();
        if count == 0 {
            return;
        }
        self.selected_puzzle = if down {
            (self.selected_puzzle + 1) % count
        } else {
            (self.selected_puzzle + count - 1) % count
        };
    }

    fn cycle_item(&mut self) {
        let held = self.game.state().inventory.len();
        self.selected_item = match self.selected_item {
            _ if held == 0 => None,
            None => Some(0),
            Some(i) if i + 1 < held => Some(i + 1),
            Some(_) => None,
        };
        if let Some(item) = self
            .selected_item
            .and_then(|i| self.game.state().inventory.get(i))
        {
            let text = format!("{}: {} Select a puzzle and press ENTER to use it.", item.name, item.description);
            self.say(text, Color::Cyan);
        }
    }

    fn submit(&mut self) {
        let Some(puzzle) = self.selected().cloned() else {
            return;
        };
        let room_id = self.game.state().current_room.clone();

        if puzzle.kind == PuzzleKind::Item {
            let Some(item_id) = self
                .selected_item
                .and_then(|i| self.game.state().inventory.get(i))
                .map(|item| item.id.clone())
            else {
                self.say(Rejection::NeedsItem.message(), Color::DarkGray);
                return;
            };
            match self.game.use_item(&item_id, &puzzle.id) {
                Outcome::Applied => {
                    self.selected_item = None;
                    self.say("*** Click. It worked! ***", Color::Green);
                }
                Outcome::Rejected(reason) => self.say(reason.message(), Color::DarkGray),
                _ => self.say(Rejection::WrongItem.message(), Color::DarkGray),
            }
        } else {
            let answer = self.answer.lines().join(" ");
            if self.game.solve_puzzle(&room_id, &puzzle.id, &answer) {
                self.answer = answer_box();
                self.say("*** PUZZLE SOLVED! ***", Color::Green);
            } else if puzzle.solved {
                self.say(Rejection::AlreadySolved.message(), Color::DarkGray);
            } else {
                self.say(Rejection::WrongAnswer.message(), Color::Red);
            }
        }

        if self.game.state().is_room_complete(&room_id) && !self.game.state().over {
            self.say(
                "Every puzzle here is solved. Press F3 to continue to the next room.",
                Color::Green,
            );
        }
        self.check_game_over();
    }

    fn show_hint(&mut self) {
        match self.game.use_hint() {
            Some(hint) => self.say(format!("HINT: {}", hint), Color::Cyan),
            None if self.game.state().hints_remaining() == 0 => {
                self.say(Rejection::NoHintsLeft.message(), Color::DarkGray)
            }
            None => self.say(Rejection::RoomComplete.message(), Color::DarkGray),
        }
    }

    fn search_room(&mut self) {
        match self.finder.search(&self.catalog, self.game.state()) {
            Some(item) => {
                let text = format!(
                    "Item Found! {} - {} Added to your inventory.",
                    item.name, item.description
                );
                if self.game.collect_item(item) == Outcome::Applied {
                    self.say(text, Color::Cyan);
                }
            }
            None => self.say("You search the room but find nothing.", Color::DarkGray),
        }
    }

    fn next_room(&mut self) {
        let next = self
            .game
            .state()
            .current_room()
            .and_then(|room| room.next_room.clone());
        match next {
            Some(next) if self.game.state().is_reachable(&next) => {
                self.game.change_room(&next);
                self.selected_puzzle = 0;
                self.answer = answer_box();
                let name = self
                    .game
                    .state()
                    .current_room()
                    .map(|room| room.name.clone())
                    .unwrap_or_default();
                self.say(format!("You step into {}.", name), Color::Yellow);
            }
            Some(_) => self.say("The way forward is still locked.", Color::DarkGray),
            None => self.say("This is the final room.", Color::DarkGray),
        }
    }

    fn tick(&mut self) {
        if matches!(self.screen, Screen::Playing) && self.game.state().is_running() {
            self.game.tick_timer();
            self.check_game_over();
        }
    }

    fn check_game_over(&mut self) {
        let state = self.game.state();
        if state.over {
            info!(won = state.won, score = ?self.game.score(), "game over");
            self.screen = Screen::GameOver;
        }
    }
}

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = GameConfig::resolve(config_path.as_deref())?;
    logging::init(config.log_file.as_deref(), &config.log_level)?;

    let catalog = match &config.content_dir {
        Some(dir) => load_catalog(dir)?,
        None => builtin_catalog()?,
    };
    let game = Game::new(&catalog, &config)?;
    let finder = ItemFinder::new(rand::thread_rng(), config.discovery_chance);
    let mut app = App::new(catalog, game, finder);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result?;

    let state = app.game.state();
    if state.over && state.won {
        println!(
            "\nCongratulations! You escaped with a score of {}.\n",
            app.game.score().unwrap_or(0)
        );
    } else if state.over {
        println!("\nTime's up. You couldn't escape in time.\n");
    }

    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }
    }
}

/// Returns `false` when the player quits.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.screen {
        Screen::TitleScreen => {
            match key.code {
                KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                    app.menu_selection = app.menu_selection.next();
                }
                KeyCode::Enter => match app.menu_selection {
                    MenuOption::NewGame => app.start_game(),
                    MenuOption::Quit => return false,
                },
                KeyCode::Char('q') => return false,
                _ => {}
            }
            return true;
        }
        Screen::GameOver => {
            match key.code {
                KeyCode::Enter => app.screen = Screen::TitleScreen,
                KeyCode::Char('q') | KeyCode::Esc => return false,
                _ => {}
            }
            return true;
        }
        Screen::Playing => {}
    }

    // Command mode handling (vim-style :q)
    if app.command_mode {
        match key.code {
            KeyCode::Esc => {
                app.command_mode = false;
                app.command_buffer.clear();
            }
            KeyCode::Enter => {
                let command = std::mem::take(&mut app.command_buffer);
                app.command_mode = false;
                match command.as_str() {
                    "q" | "quit" => return false,
                    "hint" => app.show_hint(),
                    "search" => app.search_room(),
                    "next" => app.next_room(),
                    "help" => app.say(
                        "Commands: :q (quit), :hint, :search, :next",
                        Color::Cyan,
                    ),
                    "" => {}
                    other => app.say(format!("Unknown command: {}", other), Color::Red),
                }
            }
            KeyCode::Backspace => {
                app.command_buffer.pop();
                if app.command_buffer.is_empty() {
                    app.command_mode = false;
                }
            }
            KeyCode::Char(c) => app.command_buffer.push(c),
            _ => {}
        }
        return true;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char(':'), KeyModifiers::NONE) if answer_is_blank(&app.answer) => {
            app.command_mode = true;
            app.command_buffer.clear();
        }
        (KeyCode::Esc, _) => {
            app.selected_item = None;
            app.say("Type :q to quit", Color::DarkGray);
        }
        (KeyCode::Up, _) => app.move_selection(false),
        (KeyCode::Down, _) => app.move_selection(true),
        (KeyCode::Tab, _) => app.cycle_item(),
        (KeyCode::Enter, _) => app.submit(),
        (KeyCode::F(1), _) => app.show_hint(),
        (KeyCode::F(2), _) => app.search_room(),
        (KeyCode::F(3), _) => app.next_room(),
        _ => {
            app.answer.input(key);
        }
    }
    true
}

/// `:` only opens a command while nothing is typed, so answers may contain it.
fn answer_is_blank(answer: &TextArea) -> bool {
    answer.lines().iter().all(|line| line.is_empty())
}

fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn time_color(seconds: u32) -> Color {
    if seconds <= 60 {
        Color::Red
    } else if seconds <= 300 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::TitleScreen => return draw_title_screen(f, app),
        Screen::GameOver => return draw_game_over(f, app),
        Screen::Playing => {}
    }

    let state = app.game.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(5),
        ])
        .split(f.area());

    // Status bar
    let room_name = state
        .current_room()
        .map(|room| room.name.as_str())
        .unwrap_or_default();
    let status = Line::from(vec![
        Span::styled(
            " ROOM ESCAPE ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", room_name),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", format_time(state.time_remaining)),
            Style::default()
                .fg(time_color(state.time_remaining))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Hints: {} ", state.hints_remaining()),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Inventory: {} ", state.inventory.len()),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    let status_block = Paragraph::new(status).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(status_block, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    // Room description and puzzles
    let mut lines = Vec::new();
    if let Some(room) = state.current_room() {
        lines.push(Line::from(Span::styled(
            format!("{} theme", room.theme.label()),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(room.description.as_str()));
        lines.push(Line::from(""));
        for (i, puzzle) in room.puzzles.iter().enumerate() {
            let marker = if puzzle.solved { "[x]" } else { "[ ]" };
            let label = if puzzle.kind == PuzzleKind::Item {
                "Locked Object"
            } else {
                "Puzzle"
            };
            let style = if i == app.selected_puzzle {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if puzzle.solved {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!("{} {}: {}", marker, label, puzzle.description),
                style,
            )));
        }
    }
    let room_view = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Room [Up/Down: Select | F3: Next Room] "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(room_view, main_chunks[0]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(main_chunks[1]);

    // Inventory
    let items: Vec<Line> = if state.inventory.is_empty() {
        vec![Line::from(Span::styled(
            "Your inventory is empty.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .inventory
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if app.selected_item == Some(i) {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(format!(" {} ", item.name), style))
            })
            .collect()
    };
    let inventory = Paragraph::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Inventory [Tab: Select | F2: Search] "),
    );
    f.render_widget(inventory, side_chunks[0]);
    f.render_widget(&app.answer, side_chunks[1]);

    // Message area
    let (message_content, message_style, message_title) = if app.command_mode {
        (
            format!(":{}", app.command_buffer),
            Style::default().fg(Color::White).bg(Color::DarkGray),
            " Command ",
        )
    } else {
        (app.message.clone(), app.message_style, " [F1: Hint | :q Quit] ")
    };
    let message = Paragraph::new(message_content)
        .block(Block::default().borders(Borders::ALL).title(message_title))
        .wrap(Wrap { trim: false })
        .style(message_style);
    f.render_widget(message, chunks[2]);
}

fn draw_game_over(f: &mut Frame, app: &App) {
    let state = app.game.state();
    let (headline, color) = if state.won {
        ("YOU ESCAPED!", Color::Green)
    } else {
        ("TIME'S UP!", Color::Red)
    };

    let mut text = vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Time remaining: {}",
            format_time(state.time_remaining)
        )),
        Line::from(format!(
            "Hints used: {} of {}",
            state.hints_used, state.max_hints
        )),
    ];
    if let Some(score) = app.game.score() {
        text.push(Line::from(Span::styled(
            format!("Final score: {}", score),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
    } else {
        text.push(Line::from("You couldn't escape in time."));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "ENTER to return to the title  •  q to quit",
        Style::default().fg(Color::DarkGray),
    )));

    let summary = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" GAME OVER "))
        .alignment(Alignment::Center);
    f.render_widget(summary, f.area());
}

fn menu_entry(label: &str, selected: bool) -> Paragraph<'_> {
    let style = if selected {
        Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Paragraph::new(format!("  {}  ", label))
        .style(style)
        .alignment(Alignment::Center)
}

fn draw_title_screen(f: &mut Frame, app: &App) {
    let banner = vec![
        Line::from(""),
        Line::from(Span::styled(
            "E S C A P E   T H E   R O O M S",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            app.game
                .state()
                .room_order()
                .iter()
                .map(|room| room.name.as_str())
                .collect::<Vec<_>>()
                .join("  ›  "),
        ),
        Line::from(""),
        Line::from(format!(
            "{} to solve every puzzle  •  {} hints",
            format_time(app.game.state().time_remaining),
            app.game.state().max_hints
        )),
    ];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(banner)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center),
        chunks[0],
    );
    let new_game = matches!(app.menu_selection, MenuOption::NewGame);
    f.render_widget(menu_entry("NEW GAME", new_game), chunks[1]);
    f.render_widget(menu_entry("QUIT", !new_game), chunks[2]);
    f.render_widget(
        Paragraph::new("↑/↓ to select  •  ENTER to confirm  •  q to quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[3],
    );
}
