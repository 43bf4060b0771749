use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::command::{dispatch, Command, Feedback};
use crate::export::Exporter;
use crate::models::{PlayerField, PlayerId, PlayerRecord};
use crate::seed::SeedLoad;
use crate::store::{CommitOutcome, RecordStore};

use super::forms::{backspace, build_line, label_prefix, push_char, submit_line, Focus};
use super::helpers::{key_hints, screen_layout, step_selection};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Borders plus three inputs plus the submit button.
const FORM_HEIGHT: u16 = 6;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;
const TITLE: &str = "Football Players CRUD";
const ACTION_HINT: &str = "[e]dit [d]elete [x] PDF [p]rint";

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Screen state: the record store plus everything needed to draw it.
pub struct App {
    store: RecordStore,
    exporter: Box<dyn Exporter>,
    seed: Option<SeedLoad>,
    focus: Focus,
    selected: usize,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: RecordStore, exporter: Box<dyn Exporter>, seed: Option<SeedLoad>) -> Self {
        Self {
            store,
            exporter,
            seed,
            focus: Focus::default(),
            selected: 0,
            status: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Whether the seed load is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.seed.is_some()
    }

    /// Apply the seed result once it arrives. Failures only reach the log.
    pub fn poll_seed(&mut self) {
        let Some(result) = self.seed.as_ref().and_then(SeedLoad::poll) else {
            return;
        };
        self.seed = None;

        match result {
            Ok(records) => {
                self.store.load_seed(records);
                self.clamp_selection();
            }
            Err(err) => warn!(error = %err, "continuing without seed roster"),
        }
    }

    /// Handle one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let command = match self.focus {
            Focus::Form(field) => self.handle_form_key(code, field),
            Focus::Table => self.handle_table_key(code, &mut exit),
        };

        if let Some(command) = command {
            self.run(command);
        }
        Ok(exit)
    }

    fn handle_form_key(&mut self, code: KeyCode, field: PlayerField) -> Option<Command> {
        let current = self.store.draft_fields();
        let current = current.get(field);
        match code {
            KeyCode::Esc => {
                self.focus = Focus::Table;
                Some(Command::CancelDraft)
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                None
            }
            KeyCode::Up => {
                self.focus = Focus::Form(cycle_field(field, -1));
                None
            }
            KeyCode::Down => {
                self.focus = Focus::Form(cycle_field(field, 1));
                None
            }
            KeyCode::Enter => Some(Command::Submit),
            KeyCode::Backspace => backspace(current).map(|value| Command::SetField(field, value)),
            KeyCode::Char(ch) => push_char(current, ch).map(|value| Command::SetField(field, value)),
            _ => None,
        }
    }

    fn handle_table_key(&mut self, code: KeyCode, exit: &mut bool) -> Option<Command> {
        let len = self.store.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                None
            }
            KeyCode::Up => {
                self.selected = step_selection(self.selected, -1, len);
                None
            }
            KeyCode::Down => {
                self.selected = step_selection(self.selected, 1, len);
                None
            }
            KeyCode::PageUp => {
                self.selected = step_selection(self.selected, -PAGE_STEP, len);
                None
            }
            KeyCode::PageDown => {
                self.selected = step_selection(self.selected, PAGE_STEP, len);
                None
            }
            KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::End => {
                self.selected = len.saturating_sub(1);
                None
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                None
            }
            KeyCode::Char('n') | KeyCode::Char('+') => {
                self.clear_status();
                self.focus = Focus::Form(PlayerField::Name);
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => self.selected_command(Command::Edit),
            KeyCode::Char('d') | KeyCode::Delete => self.selected_command(Command::Delete),
            KeyCode::Char('x') => self.selected_record_command(Command::Export),
            KeyCode::Char('p') => self.selected_record_command(Command::Print),
            _ => None,
        }
    }

    fn selected_command(&mut self, build: fn(PlayerId) -> Command) -> Option<Command> {
        match self.current_record().map(|record| record.id) {
            Some(id) => Some(build(id)),
            None => {
                self.set_status("No player selected.", StatusKind::Error);
                None
            }
        }
    }

    fn selected_record_command(&mut self, build: fn(PlayerRecord) -> Command) -> Option<Command> {
        match self.current_record().cloned() {
            Some(record) => Some(build(record)),
            None => {
                self.set_status("No player selected.", StatusKind::Error);
                None
            }
        }
    }

    /// Dispatch a command and reflect its outcome in focus, selection and
    /// the footer.
    fn run(&mut self, command: Command) {
        let deleted_name = match &command {
            Command::Delete(id) => self.store.get(*id).map(|record| record.name.clone()),
            _ => None,
        };
        let printed_name = match &command {
            Command::Print(record) => Some(record.name.clone()),
            _ => None,
        };

        let feedback = match dispatch(&mut self.store, self.exporter.as_ref(), command) {
            Ok(feedback) => feedback,
            Err(err) => {
                warn!(error = %err, "export failed");
                self.set_status(err.to_string(), StatusKind::Error);
                return;
            }
        };

        match feedback {
            Feedback::Quiet => {}
            Feedback::Committed(CommitOutcome::Created(id)) => {
                let name = self.record_name(id);
                self.selected = self.store.len().saturating_sub(1);
                self.focus = Focus::Form(PlayerField::Name);
                self.set_status(format!("Created {name}."), StatusKind::Info);
            }
            Feedback::Committed(CommitOutcome::Updated(id)) => {
                if let Some(index) = self.store.position_of(id) {
                    self.selected = index;
                }
                let name = self.record_name(id);
                self.focus = Focus::Table;
                self.set_status(format!("Updated {name}."), StatusKind::Info);
            }
            Feedback::Committed(_) => {
                self.focus = Focus::Table;
                self.clear_status();
            }
            Feedback::EditStarted(id) => {
                let name = self.record_name(id);
                self.focus = Focus::Form(PlayerField::Name);
                self.set_status(
                    format!("Editing {name}. Enter to update, Esc to cancel."),
                    StatusKind::Info,
                );
            }
            Feedback::DraftCleared => self.clear_status(),
            Feedback::Deleted(_) => {
                self.clamp_selection();
                let name = deleted_name.unwrap_or_default();
                self.set_status(format!("Deleted {name}."), StatusKind::Info);
            }
            Feedback::Exported(path) => {
                self.set_status(format!("Saved {}.", path.display()), StatusKind::Info);
            }
            Feedback::Printed(_) => {
                let name = printed_name.unwrap_or_default();
                self.set_status(format!("Opened print view for {name}."), StatusKind::Info);
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let [title_area, form_area, table_area, footer_area] =
            screen_layout(area, FORM_HEIGHT, FOOTER_HEIGHT);

        let title = Paragraph::new(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(title, title_area);

        self.draw_form(frame, form_area);
        self.draw_table(frame, table_area);
        self.draw_footer(frame, footer_area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let editing = self.store.draft().editing_id();
        let title = match editing {
            Some(id) => format!("Edit Player {id}"),
            None => "New Player".to_string(),
        };
        let border_style = if matches!(self.focus, Focus::Form(_)) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let fields = self.store.draft_fields();
        let active = self.focus.field();
        let mut lines: Vec<Line> = PlayerField::ALL
            .iter()
            .map(|field| build_line(*field, fields.get(*field), active == Some(*field)))
            .collect();
        lines.push(submit_line(editing.is_some(), active.is_some()));

        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(field) = active {
            let row = PlayerField::ALL
                .iter()
                .position(|candidate| *candidate == field)
                .unwrap_or(0) as u16;
            let column = label_prefix(field).chars().count() + fields.get(field).chars().count();
            let cursor_x = inner.x.saturating_add(column as u16);
            let cursor_y = inner.y.saturating_add(row);
            if cursor_x < inner.right() && cursor_y < inner.bottom() {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Players ({})", self.store.len()))
            .borders(Borders::ALL);

        if self.store.is_empty() {
            let message = if self.is_loading() {
                "Loading players…"
            } else {
                "No players yet. Press [n] to add one."
            };
            let paragraph = Paragraph::new(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            ))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(["Name", "Team", "Position", "Actions"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.store.records().iter().enumerate().map(|(index, record)| {
            let actions = if index == self.selected {
                ACTION_HINT
            } else {
                ""
            };
            Row::new([
                Cell::from(record.name.clone()),
                Cell::from(record.team.clone()),
                Cell::from(record.position.clone()),
                Cell::from(Span::styled(actions, Style::default().fg(Color::Gray))),
            ])
        });

        let highlight = if self.focus == Focus::Table {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(22),
                Constraint::Percentage(26),
                Constraint::Percentage(22),
                Constraint::Percentage(30),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(highlight)
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match self.focus {
            Focus::Form(_) => {
                let submit = if self.store.is_editing() {
                    "Update"
                } else {
                    "Create"
                };
                key_hints(&[
                    ("Enter", submit),
                    ("Tab", "Next Field"),
                    ("Esc", "Cancel"),
                    ("Ctrl-C", "Quit"),
                ])
            }
            Focus::Table => key_hints(&[
                ("↑↓", "Select"),
                ("n", "New"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("x", "Download PDF"),
                ("p", "Print"),
                ("Tab", "Form"),
                ("q", "Quit"),
            ]),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn current_record(&self) -> Option<&PlayerRecord> {
        self.store.records().get(self.selected)
    }

    fn record_name(&self, id: PlayerId) -> String {
        self.store
            .get(id)
            .map(|record| record.name.clone())
            .unwrap_or_default()
    }

    fn clamp_selection(&mut self) {
        let len = self.store.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

fn cycle_field(field: PlayerField, offset: isize) -> PlayerField {
    let all = PlayerField::ALL;
    let index = all.iter().position(|candidate| *candidate == field).unwrap_or(0);
    let len = all.len() as isize;
    let next = (index as isize + offset).rem_euclid(len) as usize;
    all[next]
}
