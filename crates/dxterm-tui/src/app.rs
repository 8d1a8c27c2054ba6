//! Consultation screen state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm loop and tears
//! everything down on exit or panic. It must run inside an entered tokio
//! runtime: the query pipeline and the consultation submit spawn tasks.

use crate::{
    commands::Command,
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        autocomplete::{AutocompleteState, SearchInput, SuggestionPopup},
        command_bar::{CommandBar, CommandBarState},
        diagnosis_list::DiagnosisList,
        header::{PatientHeader, StatusMessage},
        help::HelpPopup,
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dxterm_core::{
    config::Config,
    consultation::ConsultationDraft,
    pipeline::PipelineUpdate,
    types::Patient,
    QueryPipeline,
};
use dxterm_remote::{consultation::failure_message, ConsultationClient, HttpClient};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Diagnoses,
    Search,
    /// Vim-style `:` command line is active.
    Command,
}

type SubmitResult = Result<(), String>;

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub patient: Patient,
    pub draft: ConsultationDraft,
    /// Diagnosis row that the next committed suggestion fills.
    pub selected_row: usize,
    pub search: AutocompleteState,
    pub pipeline: QueryPipeline,
    pub focus: Focus,
    /// Focus before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub status: Option<StatusMessage>,
    pub quit: bool,
    pub saving: bool,
    consultation: ConsultationClient,
    submit_tx: mpsc::UnboundedSender<SubmitResult>,
    submit_rx: mpsc::UnboundedReceiver<SubmitResult>,
}

impl App {
    pub fn new(config: &Config, patient: Patient, pipeline: QueryPipeline, theme: Theme) -> Self {
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        Self {
            draft: ConsultationDraft::new(&patient),
            patient,
            selected_row: 0,
            search: AutocompleteState::default(),
            pipeline,
            focus: Focus::Diagnoses,
            prev_focus: Focus::Diagnoses,
            theme,
            show_help: false,
            command_bar: CommandBarState::default(),
            status: None,
            quit: false,
            saving: false,
            consultation: ConsultationClient::with_client(
                HttpClient::with_timeout(config.api.timeout()),
                config.api.base_url.clone(),
            ),
            submit_tx,
            submit_rx,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        loop {
            self.tick();
            terminal.draw(|frame| draw(frame, self))?;

            if self.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == ct_event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        let app_event = if is_insert_mode(self.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.focus, event = ?ev, "key event");
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

    /// Apply whatever the pipeline and the submit task produced since the
    /// last frame.
    pub fn tick(&mut self) {
        for update in self.pipeline.drain() {
            if let PipelineUpdate::Applied { .. } = update {
                self.search.highlighted = 0;
            }
        }
        self.search.clamp_highlight(self.pipeline.state().suggestions.len());

        while let Ok(result) = self.submit_rx.try_recv() {
            self.saving = false;
            self.status = Some(match result {
                Ok(()) => StatusMessage::success("Consultation saved."),
                Err(message) => StatusMessage::error(message),
            });
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        if self.focus == Focus::Command {
            self.handle_command_bar(event);
            return;
        }

        match event {
            AppEvent::Char('?') if self.focus != Focus::Search => {
                self.show_help = true;
            }
            AppEvent::Char(':') if self.focus != Focus::Search => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::FocusNext => match self.focus {
                Focus::Diagnoses => self.enter_search(),
                Focus::Search | Focus::Command => self.leave_search(),
            },
            AppEvent::SearchFocus => self.enter_search(),
            AppEvent::Escape => {
                if self.focus == Focus::Search {
                    self.leave_search();
                }
            }
            AppEvent::Resize(_, _) => {}
            other => match self.focus {
                Focus::Diagnoses => self.handle_diagnoses(other),
                Focus::Search => self.handle_search(other),
                Focus::Command => {}
            },
        }
    }

    fn handle_command_bar(&mut self, event: AppEvent) {
        match event {
            AppEvent::Escape => {
                self.command_bar.clear();
                self.focus = self.prev_focus;
            }
            AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                    self.execute(cmd);
                }
                Err(msg) if msg.is_empty() => {
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                }
                Err(msg) => self.command_bar.error = Some(msg),
            },
            AppEvent::Quit => self.quit = true,
            other => self.command_bar.handle(&other),
        }
    }

    fn handle_diagnoses(&mut self, event: AppEvent) {
        match event {
            AppEvent::Nav(Direction::Up) if self.selected_row > 0 => {
                self.select_row(self.selected_row - 1);
            }
            AppEvent::Nav(Direction::Down) if self.selected_row + 1 < self.draft.diagnoses.len() => {
                self.select_row(self.selected_row + 1);
            }
            AppEvent::AddRow => {
                let row = self.draft.add_diagnosis();
                self.select_row(row);
            }
            AppEvent::RemoveRow => {
                if let Some(removed) = self.draft.remove_diagnosis(self.selected_row) {
                    tracing::debug!(row = self.selected_row, name = %removed.name, "diagnosis row removed");
                    let last = self.draft.diagnoses.len().saturating_sub(1);
                    self.select_row(self.selected_row.min(last));
                }
            }
            AppEvent::Enter => self.enter_search(),
            _ => {}
        }
    }

    fn handle_search(&mut self, event: AppEvent) {
        if event == AppEvent::Enter {
            self.commit_highlighted();
            return;
        }
        let count = self.pipeline.state().suggestions.len();
        if self.search.handle(&event, count) {
            self.pipeline.input(self.search.input.clone());
        }
    }

    fn enter_search(&mut self) {
        self.focus = Focus::Search;
        self.pipeline.focus();
    }

    fn leave_search(&mut self) {
        self.focus = Focus::Diagnoses;
        self.pipeline.blur();
    }

    fn select_row(&mut self, row: usize) {
        self.selected_row = row;
        self.pipeline.reset();
        let name = self.draft.diagnoses.get(row).map(|d| d.name.as_str()).unwrap_or_default();
        self.search.set_text(name);
    }

    fn commit_highlighted(&mut self) {
        if !self.pipeline.popup_visible() {
            return;
        }
        let Some(selection) = self.pipeline.select(self.search.highlighted) else {
            return;
        };
        let message = format!("{} added ({} codes)", selection.name, selection.codes.len());
        self.selected_row = self.draft.apply_selection(self.selected_row, selection);
        self.search.set_text(&self.pipeline.state().text);
        self.status = Some(StatusMessage::success(message));
    }

    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.quit = true,
            Command::Help => self.show_help = !self.show_help,
            Command::Theme(name) => self.theme = Theme::by_name(&name),
            Command::Note(text) => {
                self.draft.set_notes(text);
                self.status = Some(StatusMessage::info("Notes updated."));
            }
            Command::Med(med) => {
                let name = med.name.clone();
                let total = self.draft.add_medication(med);
                self.status = Some(StatusMessage::info(format!("{name} added ({total} medications)")));
            }
            Command::Save => self.save(),
        }
    }

    fn save(&mut self) {
        if self.saving {
            self.status = Some(StatusMessage::info("Save already in progress."));
            return;
        }
        self.saving = true;
        self.status = Some(StatusMessage::info("Saving consultation..."));

        let draft = self.draft.clone();
        let client = self.consultation.clone();
        let tx = self.submit_tx.clone();
        tokio::spawn(async move {
            let result = client.submit(&draft).await.map_err(|e| {
                tracing::warn!(error = %e, "consultation: submit failed");
                failure_message(&e)
            });
            let _ = tx.send(result);
        });
    }
}

/// True when alphabetic keys should type rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Search | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // header | diagnoses | medications + notes | search input
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(area);

    frame.render_widget(PatientHeader::new(&app.patient, app.status.as_ref(), &app.theme), vert[0]);
    frame.render_widget(
        DiagnosisList::new(
            &app.draft.diagnoses,
            app.selected_row,
            app.focus == Focus::Diagnoses,
            &app.theme,
        ),
        vert[1],
    );
    frame.render_widget(treatment_panel(app), vert[2]);

    let query = app.pipeline.state();
    let input = SearchInput::new(&app.search, &query.status, app.focus == Focus::Search, &app.theme);
    let (cx, cy) = input.cursor_position(vert[3]);
    frame.render_widget(input, vert[3]);

    if app.pipeline.popup_visible() {
        let popup = SuggestionPopup::new(&query.suggestions, app.search.highlighted, &app.theme);
        let popup_area = popup.area(vert[3], vert[1]);
        frame.render_widget(popup, popup_area);
    }

    if app.show_help {
        frame.render_widget(HelpPopup::new(&app.theme), area);
    }

    if app.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&app.command_bar, &app.theme), cmd_area);
        frame.set_cursor_position((app.command_bar.cursor_col(cmd_area), cmd_area.y));
        return;
    }

    if app.focus == Focus::Search {
        frame.set_cursor_position((cx, cy));
    }
}

fn treatment_panel(app: &App) -> Paragraph<'_> {
    let mut lines: Vec<Line> = app
        .draft
        .medications
        .iter()
        .filter(|m| !m.name.is_empty())
        .map(|m| {
            let details = [m.dosage.as_str(), m.frequency.as_str(), m.duration.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            Line::from(vec![Span::raw(format!("• {} ", m.name)), Span::styled(details, app.theme.row_placeholder)])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("no medications (:med)", app.theme.row_placeholder)));
    }
    let notes = if app.draft.notes.is_empty() { "(:note)" } else { app.draft.notes.as_str() };
    lines.push(Line::from(vec![Span::raw("Notes: "), Span::raw(notes)]));

    Paragraph::new(lines)
        .block(Block::bordered().title(" Treatment ").border_style(app.theme.border_unfocused))
        .wrap(Wrap { trim: true })
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
