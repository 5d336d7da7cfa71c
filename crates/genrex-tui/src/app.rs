//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! Key handling is split in two. [`handle_event`] only mutates [`AppState`]
//! and records what needs the knowledge base (a dirty search, a pending
//! preview, a moved tree cursor). [`App::sync`] then answers those requests
//! through the [`Explorer`].

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    format::{instructions_text, search_results_text, single_property_text, GenreDetail},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        genre_tree::{GenreTree, GenreTreeState},
        help::HelpPopup,
        property_picker::{PropertyPicker, PropertyPickerState},
        query_bar::{QueryBar, QueryBarState},
        tab_bar::{TabBar, TabLabel},
        text_pane::{TextPane, TextPaneState},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use genrex_core::{config::Config, Explorer, KnowledgeStore, MatchMode, SearchRequest};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{io, time::Duration};

pub const GENRES_TAB: usize = 0;
pub const SEARCH_TAB: usize = 1;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Genre tree on the genres tab, property picker on the search tab.
    Left,
    /// Detail pane on the genres tab, results pane on the search tab.
    Right,
    /// Property filter input on the search tab.
    Filter,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: usize,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub tree: GenreTreeState,
    pub detail: TextPaneState,
    /// Genre currently shown in the detail pane.
    pub detail_genre: Option<String>,
    pub picker: PropertyPickerState,
    pub filter: QueryBarState,
    pub results: TextPaneState,
    pub request: SearchRequest,
    /// The selection or mode changed since the results were last computed.
    pub search_dirty: bool,
    /// Property to preview on its own at the next sync.
    pub preview: Option<String>,
    pub total_genres: usize,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub quit: bool,
}

impl AppState {
    /// Empty state: no genres, no properties, nothing selected.
    pub fn new(config: Config, theme: Theme) -> Self {
        let mut results = TextPaneState::new("Results");
        results.set_text(&instructions_text());

        Self {
            active_tab: GENRES_TAB,
            focus: Focus::Left,
            prev_focus: Focus::Left,
            tree: GenreTreeState::default(),
            detail: TextPaneState::new("Details"),
            detail_genre: None,
            picker: PropertyPickerState::default(),
            filter: QueryBarState::default(),
            results,
            request: SearchRequest::new(config.search.default_mode),
            search_dirty: false,
            preview: None,
            total_genres: 0,
            theme,
            config,
            show_help: false,
            command_bar: CommandBarState::default(),
            quit: false,
        }
    }

    fn tab_labels(&self) -> [TabLabel<'static>; 2] {
        [
            TabLabel { label: "1:genres", marked: false },
            TabLabel { label: "2:search", marked: !self.request.is_empty() },
        ]
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<S> {
    explorer: Explorer<S>,
    state: AppState,
}

impl<S: KnowledgeStore> App<S> {
    /// Build the tree and the property list from the knowledge base.
    pub fn new(mut explorer: Explorer<S>, config: Config, theme: Theme) -> Self {
        let genres = explorer.genres();
        let pairs: Vec<(String, Option<String>)> = genres
            .iter()
            .map(|genre| {
                let parent = explorer.ancestors(genre).into_iter().next();
                (genre.clone(), parent)
            })
            .collect();
        let properties = explorer.available_properties();
        tracing::info!(
            genres = genres.len(),
            properties = properties.len(),
            root = explorer.root(),
            "taxonomy loaded"
        );

        let mut state = AppState::new(config, theme);
        state.tree = GenreTreeState::from_parents(&pairs);
        state.picker = PropertyPickerState::new(properties);
        state.total_genres = genres.len();

        let mut app = App { explorer, state };
        app.sync();
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(50))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle(&mut self, event: AppEvent) {
        handle_event(&mut self.state, event);
        self.sync();
    }

    /// Answer whatever the last event left pending against the knowledge base.
    fn sync(&mut self) {
        let s = &mut self.state;

        let cursor = s.tree.cursor_id();
        if cursor != s.detail_genre {
            match cursor.as_deref() {
                Some(genre) => {
                    let detail = GenreDetail::load(&mut self.explorer, genre);
                    s.detail.set_lines(detail.lines());
                }
                None => s.detail.set_lines(Vec::new()),
            }
            s.detail_genre = cursor;
        }

        if let Some(property) = s.preview.take() {
            let single = SearchRequest::from_properties([property.as_str()], MatchMode::Any);
            let found = single
                .and_then(|request| self.explorer.search(&request))
                .unwrap_or_default();
            s.results
                .set_text(&single_property_text(&property, &found, s.total_genres));
        }

        if s.search_dirty {
            s.search_dirty = false;
            let text = match self.explorer.search(&s.request) {
                Ok(found) => search_results_text(&s.request, &found, s.total_genres),
                // an empty selection is the only rejection left at this point
                Err(_) => instructions_text(),
            };
            s.results.set_text(&text);
        }
    }
}

// ---------------------------------------------------------------------------
// Event handling
// ---------------------------------------------------------------------------

/// Apply one event to the state.
pub fn handle_event(s: &mut AppState, event: AppEvent) {
    // Help popup intercepts all events; only close keys pass through.
    if s.show_help {
        match event {
            AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                tracing::debug!("help popup closed");
                s.show_help = false;
            }
            _ => {}
        }
        return;
    }

    // Command mode intercepts all events.
    if s.focus == Focus::Command {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                s.command_bar.clear();
                s.focus = s.prev_focus;
            }
            AppEvent::Enter => {
                let input = s.command_bar.input.clone();
                match Command::parse(&input) {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        s.command_bar.clear();
                        s.focus = s.prev_focus;
                        execute_command(s, cmd);
                    }
                    Err(msg) if msg.is_empty() => {
                        s.command_bar.clear();
                        s.focus = s.prev_focus;
                    }
                    Err(msg) => {
                        // Show the error; bar stays open
                        s.command_bar.error = Some(msg);
                    }
                }
            }
            other => s.command_bar.handle(&other),
        }
        return;
    }

    // Filter input owns every key except the ones that leave it.
    if s.focus == Focus::Filter {
        match event {
            AppEvent::Escape | AppEvent::Enter => {
                tracing::debug!("focus: Filter -> Left");
                s.focus = Focus::Left;
            }
            AppEvent::FocusNext => s.focus = Focus::Left,
            AppEvent::Quit => s.quit = true,
            other => {
                if s.filter.handle(&other) {
                    s.picker.set_filter(&s.filter.query);
                }
            }
        }
        return;
    }

    match event {
        AppEvent::Char('?') => {
            tracing::debug!("help popup opened");
            s.show_help = true;
        }

        AppEvent::Char(':') => {
            tracing::debug!(prev_focus = ?s.focus, "entering command mode");
            s.prev_focus = s.focus;
            s.command_bar.clear();
            s.focus = Focus::Command;
        }

        AppEvent::Quit => {
            tracing::debug!("quit");
            s.quit = true;
        }

        AppEvent::SwitchTab(tab) if tab <= SEARCH_TAB => {
            tracing::debug!(tab, "switch tab");
            s.active_tab = tab;
            s.focus = Focus::Left;
        }

        // Left ↔ Right on the genres tab, Left → Right → Filter on search
        AppEvent::FocusNext => {
            let next = match (s.active_tab, s.focus) {
                (_, Focus::Left) => Focus::Right,
                (SEARCH_TAB, Focus::Right) => Focus::Filter,
                _ => Focus::Left,
            };
            tracing::debug!(from = ?s.focus, to = ?next, "focus cycle");
            s.focus = next;
        }

        AppEvent::FilterFocus => {
            tracing::debug!("focus -> Filter");
            s.active_tab = SEARCH_TAB;
            s.focus = Focus::Filter;
        }

        AppEvent::ToggleSelect if s.active_tab == SEARCH_TAB => {
            if let Some(property) = s.picker.current().map(str::to_string) {
                let selected = s.request.toggle(&property);
                tracing::debug!(%property, selected, "selection toggled");
                s.search_dirty = true;
            }
        }

        AppEvent::ToggleMode => {
            s.request.mode = s.request.mode.toggled();
            tracing::debug!(mode = %s.request.mode, "match mode toggled");
            if !s.request.is_empty() {
                s.search_dirty = true;
            }
        }

        AppEvent::ClearSelection => {
            if !s.request.is_empty() {
                s.request.clear();
                s.search_dirty = true;
            }
        }

        AppEvent::Enter if s.active_tab == SEARCH_TAB && s.focus == Focus::Left => {
            s.preview = s.picker.current().map(str::to_string);
        }

        // Paging always scrolls the text pane of the active tab
        AppEvent::ScrollUp | AppEvent::ScrollDown => match s.active_tab {
            GENRES_TAB => s.detail.handle(&event),
            _ => s.results.handle(&event),
        },

        // Terminal resize is handled automatically by ratatui
        AppEvent::Resize(_, _) => {}

        other => dispatch_to_focused(s, other),
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Filter | Focus::Command)
}

/// Route an event to the widget that owns the current focus.
fn dispatch_to_focused(s: &mut AppState, event: AppEvent) {
    match (s.active_tab, s.focus) {
        (GENRES_TAB, Focus::Left) => s.tree.handle(&event),
        (GENRES_TAB, Focus::Right) => s.detail.handle(&event),
        (_, Focus::Left) => s.picker.handle(&event),
        (_, Focus::Right) => s.results.handle(&event),
        // handled before dispatch, should not reach here
        (_, Focus::Filter | Focus::Command) => {}
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let on_search = state.active_tab == SEARCH_TAB;

    // Vertical: 1-line tab bar | body | 3-line filter bar (search tab only)
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(if on_search { 3 } else { 0 }),
        ])
        .split(area);

    let pct = state.config.ui.genre_pane_width_pct.min(90);
    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([Constraint::Percentage(pct), Constraint::Fill(1)])
        .split(vert[1]);

    let labels = state.tab_labels();
    frame.render_widget(TabBar::new(&labels, state.active_tab, &state.theme), vert[0]);

    let left = state.focus == Focus::Left;
    let right = state.focus == Focus::Right;
    if on_search {
        frame.render_widget(
            PropertyPicker::new(&state.picker, &state.request, left, &state.theme),
            horiz[0],
        );
        frame.render_widget(TextPane::new(&state.results, right, &state.theme), horiz[1]);
        frame.render_widget(
            QueryBar::new(
                &state.filter,
                state.request.mode,
                state.focus == Focus::Filter,
                &state.theme,
            ),
            vert[2],
        );
    } else {
        frame.render_widget(GenreTree::new(&state.tree, left, &state.theme), horiz[0]);
        frame.render_widget(TextPane::new(&state.detail, right, &state.theme), horiz[1]);
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if state.focus == Focus::Filter {
        let qb = QueryBar::new(&state.filter, state.request.mode, true, &state.theme);
        frame.set_cursor_position(qb.cursor_position(vert[2]));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
