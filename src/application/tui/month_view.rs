use super::theme::Theme;
use crate::application::{ApiRequest, EditorState, JournalController, StatusKind, ThreadDispatcher};
use crate::domain::{CalendarRenderer, GridCell, MonthGrid, Mood, today};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use std::io::{self, Stdout, stdout};
use std::time::Instant;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Renders a month grid as a ratatui table.
pub struct CalendarTable<'t> {
    theme: &'t Theme,
}

impl<'t> CalendarTable<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self { theme }
    }

    fn cell(&self, cell: &GridCell, weekend: bool) -> Cell<'static> {
        let palette = &self.theme.palette;
        let GridCell::Day(day) = cell else {
            return Cell::from("");
        };

        let marker = match (day.glyph, day.has_entry) {
            (Some(glyph), _) => glyph,
            (None, true) => " •",
            (None, false) => "",
        };
        let content = format!("{:>2}{}", day.day, marker);

        let style = if day.selected {
            palette.selected.emphasized(Modifier::BOLD)
        } else if day.today {
            palette.today.emphasized(Modifier::BOLD)
        } else if day.has_entry {
            palette.has_entry.style()
        } else if weekend {
            palette.weekend.style()
        } else {
            palette.day.style()
        };

        Cell::from(content).style(style)
    }
}

impl CalendarRenderer for CalendarTable<'_> {
    type Output = Table<'static>;

    fn render(&self, grid: &MonthGrid) -> Table<'static> {
        let palette = &self.theme.palette;

        let header = Row::new(WEEKDAYS.iter().enumerate().map(|(i, name)| {
            let style = if i == 0 || i == 6 {
                palette.weekend.style()
            } else {
                palette.heading.style()
            };
            Cell::from(*name).style(style)
        }))
        .height(1);

        let rows: Vec<Row> = grid
            .weeks()
            .iter()
            .map(|week| {
                let cells: Vec<Cell> = week
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| self.cell(cell, i == 0 || i == 6))
                    .collect();
                Row::new(cells)
            })
            .collect();

        Table::new(rows, [Constraint::Length(5); 7])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.frame.style())
                    .title(grid.cursor.title())
                    .title_style(palette.heading.emphasized(Modifier::BOLD))
                    .title_alignment(Alignment::Center),
            )
            .column_spacing(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Calendar,
    Editing,
}

/// Everything the month view reacts to, without the terminal.
pub struct MonthViewState {
    pub controller: JournalController,
    pub mode: InputMode,
    pub show_help: bool,
    pub should_exit: bool,
}

impl MonthViewState {
    pub fn new(controller: JournalController) -> Self {
        Self {
            controller,
            mode: InputMode::Calendar,
            show_help: false,
            should_exit: false,
        }
    }

    /// Handle keyboard input, returning the backend calls it triggers
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Vec<ApiRequest> {
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            self.should_exit = true;
            return Vec::new();
        }

        if let (KeyCode::Char('s'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            self.mode = InputMode::Calendar;
            return self.controller.save(now).into_iter().collect();
        }

        if self.controller.editor().is_confirming_delete() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.controller.confirm_delete(now).into_iter().collect()
                }
                _ => {
                    self.controller.cancel_delete();
                    Vec::new()
                }
            };
        }

        match self.mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Calendar => self.handle_calendar_key(key, now),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Vec<ApiRequest> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.mode = InputMode::Calendar,
            (KeyCode::Enter, _) => {
                self.controller.insert_char('\n');
            }
            (KeyCode::Backspace, _) => {
                self.controller.backspace();
            }
            // Ctrl and Alt chords are commands, not text
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.controller.insert_char(c);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_calendar_key(&mut self, key: KeyEvent, now: Instant) -> Vec<ApiRequest> {
        let requests: Option<ApiRequest> = match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                self.should_exit = true;
                None
            }
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.should_exit = true;
                None
            }

            // Selection
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => self.controller.step_selection(-1),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => self.controller.step_selection(1),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.controller.step_selection(-7),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.controller.step_selection(7),
            (KeyCode::Char('t'), _) => {
                let today = self.controller.today();
                self.controller.select_date(today)
            }

            // Month navigation
            (KeyCode::PageUp, _) | (KeyCode::Char('<'), _) | (KeyCode::Char('p'), _) => {
                self.controller.prev_month();
                None
            }
            (KeyCode::PageDown, _) | (KeyCode::Char('>'), _) | (KeyCode::Char('n'), _) => {
                self.controller.next_month();
                None
            }

            // Editing
            (KeyCode::Enter, _) | (KeyCode::Char('i'), _) | (KeyCode::Char('e'), _) => {
                if self.controller.editor().controls().editable {
                    self.mode = InputMode::Editing;
                }
                None
            }
            (KeyCode::Char('0'), _) => {
                self.controller.select_mood(None);
                None
            }
            (KeyCode::Char(c @ '1'..='9'), _) => {
                if let Some(mood) = c.to_digit(10).and_then(|d| Mood::from_index(d as usize)) {
                    self.controller.select_mood(Some(mood));
                }
                None
            }
            (KeyCode::Char('s'), _) => self.controller.save(now),
            (KeyCode::Char('d'), _) => {
                self.controller.request_delete(now);
                None
            }
            (KeyCode::Char('r'), _) => Some(self.controller.refresh()),

            (KeyCode::Char('?'), _) => {
                self.show_help = !self.show_help;
                None
            }

            _ => None,
        };

        requests.into_iter().collect()
    }
}

pub struct MonthView {
    state: MonthViewState,
    dispatcher: ThreadDispatcher,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    cleaned_up: bool,
}

impl MonthView {
    pub fn new(
        controller: JournalController,
        initial_requests: Vec<ApiRequest>,
        dispatcher: ThreadDispatcher,
        theme: Theme,
    ) -> io::Result<Self> {
        // First check if we're in a proper terminal
        if !IsTty::is_tty(&std::io::stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode()
            .map_err(|e| io::Error::other(format!("Failed to enable raw mode: {}", e)))?;

        stdout().execute(EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode(); // Clean up on failure
            io::Error::other(format!("Failed to enter alternate screen: {}", e))
        })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::other(format!("Failed to create terminal: {}", e))
        })?;

        let mut view = Self {
            state: MonthViewState::new(controller),
            dispatcher,
            terminal,
            theme,
            cleaned_up: false,
        };
        view.dispatcher.dispatch_all(initial_requests);
        Ok(view)
    }

    /// Run the month view TUI loop
    pub fn run(&mut self) -> io::Result<()> {
        while !self.state.should_exit {
            let now = Instant::now();

            for response in self.dispatcher.drain() {
                let follow_ups = self.state.controller.apply(response, now);
                self.dispatcher.dispatch_all(follow_ups);
            }
            self.state.controller.set_today(today());

            let state = &self.state;
            let theme = &self.theme;
            let busy = self.dispatcher.in_flight() > 0;
            self.terminal
                .draw(|frame| draw(frame, state, theme, busy, now))?;

            // Handle events with timeout so responses are picked up promptly
            if poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let requests = self.state.handle_key_event(key, Instant::now());
                        self.dispatcher.dispatch_all(requests);
                    }
                }
            }
        }

        self.cleanup()
    }

    /// Restores the terminal; later calls are no-ops once it succeeded.
    fn cleanup(&mut self) -> io::Result<()> {
        let terminal = &mut self.terminal;
        restore_once(&mut self.cleaned_up, || {
            disable_raw_mode()?;
            terminal.backend_mut().execute(LeaveAlternateScreen)?;
            Ok(())
        })
    }
}

fn restore_once(done: &mut bool, restore: impl FnOnce() -> io::Result<()>) -> io::Result<()> {
    if *done {
        return Ok(());
    }
    restore()?;
    *done = true;
    Ok(())
}

impl Drop for MonthView {
    fn drop(&mut self) {
        // Only does anything if run() didn't get to restore the terminal
        let _ = self.cleanup();
    }
}

fn draw(frame: &mut Frame, state: &MonthViewState, theme: &Theme, busy: bool, now: Instant) {
    const CALENDAR_HEIGHT: u16 = 10; // header + 6 weeks + borders + spare
    const HELP_HEIGHT: u16 = 4;

    let area = frame.area();
    let (main, help) = if state.show_help {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(HELP_HEIGHT)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(30)])
        .split(main);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CALENDAR_HEIGHT), Constraint::Min(3)])
        .split(columns[0]);

    let grid = state.controller.calendar();
    frame.render_widget(CalendarTable::new(theme).render(&grid), left[0]);
    frame.render_widget(entry_list(state, theme, busy), left[1]);
    frame.render_widget(editor_pane(state, theme, now), columns[1]);

    if let Some(help) = help {
        frame.render_widget(help_text(theme), help);
    }
}

fn entry_list(state: &MonthViewState, theme: &Theme, busy: bool) -> Paragraph<'static> {
    let palette = &theme.palette;
    let store = state.controller.store();
    let mut lines = Vec::new();

    if let Some(error) = store.error() {
        lines.push(Line::from(Span::styled(error.to_string(), palette.error.style())));
    }

    if !store.is_loaded() && store.error().is_none() {
        lines.push(Line::from(Span::styled("Loading entries...", palette.muted.style())));
    } else if store.is_empty() && store.error().is_none() {
        lines.push(Line::from(Span::styled("No entries yet", palette.muted.style())));
    }

    for entry in store.entries() {
        lines.push(Line::from(vec![
            Span::styled(
                entry.date.date().format("%a %b %-d, %Y ").to_string(),
                palette.heading.style(),
            ),
            Span::raw(entry.glyph().map(|g| format!("{g} ")).unwrap_or_default()),
            Span::styled(entry.preview.replace('\n', " "), palette.text.style()),
        ]));
    }

    let title = if busy { "Entries ·" } else { "Entries" };
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.frame.style())
            .title(title),
    )
}

fn editor_pane(state: &MonthViewState, theme: &Theme, now: Instant) -> Paragraph<'static> {
    let palette = &theme.palette;
    let editor = state.controller.editor();
    let controls = editor.controls();
    let mut lines = Vec::new();

    let title = editor
        .selected()
        .map(|key| key.label())
        .unwrap_or_else(|| "No date selected".to_string());

    let state_line = match editor.state() {
        EditorState::Idle => "Select a date to write",
        EditorState::Loading => "Loading...",
        EditorState::Saving => "Saving...",
        EditorState::Deleting => "Deleting...",
        EditorState::Ready if editor.is_new() => "New entry",
        EditorState::Ready => "Saved entry",
    };
    lines.push(Line::from(Span::styled(state_line, palette.muted.style())));

    let mut moods = vec![Span::styled("Mood: ", palette.heading.style())];
    for (i, mood) in Mood::ALL.iter().enumerate() {
        let label = format!(" {} {} {} ", i + 1, mood.glyph(), mood.as_str());
        let style = if editor.mood() == Some(*mood) {
            palette.active_mood.emphasized(Modifier::BOLD)
        } else if controls.editable {
            palette.text.style()
        } else {
            palette.muted.style()
        };
        moods.push(Span::styled(label, style));
    }
    if let Some(tag) = editor.mood_tag().filter(|tag| tag.known().is_none()) {
        moods.push(Span::styled(format!(" ({tag}) "), palette.active_mood.style()));
    }
    lines.push(Line::from(moods));
    lines.push(Line::from(""));

    let content_style = if controls.editable {
        palette.text.style()
    } else {
        palette.muted.style()
    };
    let mut content = editor.content().to_string();
    if state.mode == InputMode::Editing {
        content.push('▏');
    }
    for line in content.split('\n') {
        lines.push(Line::from(Span::styled(line.to_string(), content_style)));
    }
    lines.push(Line::from(""));

    if editor.is_confirming_delete() {
        lines.push(Line::from(Span::styled(
            "Delete this entry? y = yes, any other key = no",
            palette.error.emphasized(Modifier::BOLD),
        )));
    }

    if let Some(message) = state.controller.status().visible(now) {
        let style = match message.kind {
            StatusKind::Error => palette.error.style(),
            StatusKind::Success => palette.success.style(),
            StatusKind::Info => palette.hint.style(),
        };
        lines.push(Line::from(Span::styled(message.text.clone(), style)));
    }

    let hint = match (state.mode, controls.can_delete) {
        (InputMode::Editing, _) => "Esc=Done • Ctrl+S=Save",
        (InputMode::Calendar, true) => "i=Write • 1-6=Mood • 0=No mood • s=Save • d=Delete",
        (InputMode::Calendar, false) => "i=Write • 1-6=Mood • 0=No mood • s=Save",
    };
    lines.push(Line::from(Span::styled(hint, palette.hint.style())));

    Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.frame.style())
            .title(title),
    )
}

/// Create help text
fn help_text(theme: &Theme) -> Paragraph<'static> {
    let help_text = vec![
        Line::from(vec![Span::styled(
            "←→/hl=Day • ↑↓/jk=Week • PgUp/PgDn or p/n=Month • t=Today • r=Reload",
            theme.palette.hint.style(),
        )]),
        Line::from(vec![Span::styled(
            "i/Enter=Write • 1-6=Mood • 0=Clear mood • s/Ctrl+S=Save • d=Delete • ?=Help • q=Quit",
            theme.palette.hint.style(),
        )]),
    ];

    Paragraph::new(help_text)
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center)
}
