use std::collections::HashSet;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::db::{Change, RecordStore};
use crate::models::{Field, Student};
use crate::search::{search_with, CaseMatch};
use crate::validation::ValidationError;

use super::forms::{ConfirmDelete, SearchForm, StudentForm};
use super::helpers::{centered_rect, clamp_offset, cursor_column};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 10;
const ABOUT_TEXT: &str = "Student Records keeps a small roster of students \
    (name, course, mobile) in a local SQLite file. Feel free to modify and use this app.";

/// What the keyboard is currently driving: the table itself or one popup.
enum Mode {
    Normal,
    Adding(StudentForm),
    Editing { id: i64, form: StudentForm },
    ConfirmDelete(ConfirmDelete),
    Searching(SearchForm),
    About,
}

/// Outcome of a key press inside the insert/update popup.
enum FormAction {
    Continue,
    Submit,
    Cancel,
}

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

/// Central application state. The store is handed in by the caller and every
/// popup reports back through `App`, so nothing reaches for a global window.
pub struct App {
    store: RecordStore,
    students: Vec<Student>,
    selected: usize,
    /// Ids highlighted by the last search. Cleared on every reload.
    matches: HashSet<i64>,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: RecordStore, students: Vec<Student>) -> Self {
        Self {
            store,
            students,
            selected: 0,
            matches: HashSet::new(),
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.students.get(self.selected)
    }

    pub fn matches(&self) -> &HashSet<i64> {
        &self.matches
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Route a key press to the active mode. Returns `true` when the user asked
    /// to quit. Storage failures are returned as errors and end the session.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Adding(form) => self.handle_add(code, form)?,
            Mode::Editing { id, form } => self.handle_edit(code, id, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::Searching(form) => self.handle_search(code, form),
            Mode::About => Mode::Normal,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.matches.is_empty() {
                    *exit = true;
                } else {
                    self.matches.clear();
                    self.clear_status();
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.students.len().saturating_sub(1),
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Ok(Mode::Adding(StudentForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if let Some(student) = self.selected_student() {
                    let mode = Mode::Editing {
                        id: student.id,
                        form: StudentForm::from_student(student),
                    };
                    self.clear_status();
                    return Ok(mode);
                }
                self.set_status("Please select a student to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(student) = self.selected_student() {
                    let confirm = ConfirmDelete::from(student);
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(confirm));
                }
                self.set_status("Please select a student to delete.", StatusKind::Error);
            }
            KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Char('/') => {
                self.clear_status();
                return Ok(Mode::Searching(SearchForm::default()));
            }
            KeyCode::Char('?') => return Ok(Mode::About),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reload_students(None)?;
                self.set_status(
                    format!("Reloaded {} students.", self.students.len()),
                    StatusKind::Info,
                );
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add(&mut self, code: KeyCode, mut form: StudentForm) -> Result<Mode> {
        match apply_form_key(code, &mut form) {
            FormAction::Cancel => {
                self.set_status("Insert cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            FormAction::Submit => match self.save_new_student(&form) {
                Ok(()) => Ok(Mode::Normal),
                Err(err) => {
                    self.reject_form(err, &mut form)?;
                    Ok(Mode::Adding(form))
                }
            },
            FormAction::Continue => Ok(Mode::Adding(form)),
        }
    }

    fn handle_edit(&mut self, code: KeyCode, id: i64, mut form: StudentForm) -> Result<Mode> {
        match apply_form_key(code, &mut form) {
            FormAction::Cancel => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            FormAction::Submit => match self.save_existing_student(id, &form) {
                Ok(()) => Ok(Mode::Normal),
                Err(err) => {
                    self.reject_form(err, &mut form)?;
                    Ok(Mode::Editing { id, form })
                }
            },
            FormAction::Continue => Ok(Mode::Editing { id, form }),
        }
    }

    /// Keep the form open for validation failures; anything else is a storage
    /// failure and is handed back to the caller.
    fn reject_form(&mut self, err: anyhow::Error, form: &mut StudentForm) -> Result<()> {
        if let Some(invalid) = err.downcast_ref::<ValidationError>() {
            warn!(missing = ?invalid.missing_fields(), "student form rejected");
            let message = invalid.to_string();
            form.error = Some(message.clone());
            self.set_status(message, StatusKind::Error);
            return Ok(());
        }
        Err(err)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm)?;
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut form: SearchForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Enter => {
                self.run_search(&form);
                return Mode::Normal;
            }
            KeyCode::Tab => form.case = form.case.toggle(),
            KeyCode::Backspace => {
                form.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => form.query.push(ch),
            _ => {}
        }
        Mode::Searching(form)
    }

    /// Highlight the loaded rows whose name contains the query. The table is
    /// not refreshed from storage first.
    fn run_search(&mut self, form: &SearchForm) {
        let matches = search_with(&self.students, &form.query, form.case);
        debug!(query = %form.query, case = ?form.case, count = matches.len(), "search");

        if matches.is_empty() {
            self.matches.clear();
            self.set_status(
                format!("No student found with name: {}", form.query),
                StatusKind::Info,
            );
            return;
        }

        if let Some(idx) = self
            .students
            .iter()
            .position(|student| matches.contains(&student.id))
        {
            self.selected = idx;
        }
        let count = matches.len();
        self.matches = matches;
        self.set_status(
            format!("{count} matching student(s) highlighted. Esc clears."),
            StatusKind::Info,
        );
    }

    fn save_new_student(&mut self, form: &StudentForm) -> Result<()> {
        let id = self
            .store
            .insert(&form.name, form.course.as_str(), &form.mobile)?;
        self.reload_students(Some(id))?;
        self.set_status("Student data inserted successfully.", StatusKind::Info);
        Ok(())
    }

    fn save_existing_student(&mut self, id: i64, form: &StudentForm) -> Result<()> {
        let change = self
            .store
            .update(id, &form.name, form.course.as_str(), &form.mobile)?;
        self.reload_students(Some(id))?;
        match change {
            Change::Applied => {
                self.set_status("Student data updated successfully.", StatusKind::Info)
            }
            Change::NotFound => self.set_status(
                format!("Student {id} no longer exists. The list has been refreshed."),
                StatusKind::Error,
            ),
        }
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        let change = self.store.delete(confirm.id)?;
        self.reload_students(None)?;
        match change {
            Change::Applied => {
                self.set_status("The record was deleted successfully!", StatusKind::Info)
            }
            Change::NotFound => self.set_status(
                format!(
                    "Student {} no longer exists. The list has been refreshed.",
                    confirm.id
                ),
                StatusKind::Error,
            ),
        }
        Ok(())
    }

    /// Re-fetch every row after a mutation, optionally moving the selection to
    /// `focus_id`.
    fn reload_students(&mut self, focus_id: Option<i64>) -> Result<()> {
        self.students = self.store.list_all()?;
        self.matches.clear();
        if self.students.is_empty() {
            self.selected = 0;
            return Ok(());
        }

        if let Some(id) = focus_id {
            if let Some(idx) = self.students.iter().position(|s| s.id == id) {
                self.selected = idx;
                return Ok(());
            }
        }

        if self.selected >= self.students.len() {
            self.selected = self.students.len() - 1;
        }

        Ok(())
    }

    fn move_selection(&mut self, offset: isize) {
        self.selected = clamp_offset(self.selected, offset, self.students.len());
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

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Adding(form) => self.draw_student_form(frame, area, "Insert Student Data", form),
            Mode::Editing { form, .. } => {
                self.draw_student_form(frame, area, "Update Student Data", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(form) => self.draw_search(frame, area, form),
            Mode::About => self.draw_about(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Students ({})", self.students.len()));

        if self.students.is_empty() {
            let message = Paragraph::new("No students yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["ID", "Name", "Course", "Mobile"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let match_style = Style::default().fg(Color::Black).bg(Color::Yellow);
        let rows = self.students.iter().map(|student| {
            let row = Row::new(vec![
                Cell::from(student.id.to_string()),
                Cell::from(student.name.clone()),
                Cell::from(student.course.clone()),
                Cell::from(student.mobile.clone()),
            ]);
            if self.matches.contains(&student.id) {
                row.style(match_style)
            } else {
                row
            }
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[f]", " Search   "),
                ("[?]", " About   "),
                ("[q]", " Quit"),
            ],
            Mode::Adding(_) | Mode::Editing { .. } => &[
                ("[Tab]", " Next field   "),
                ("[←→]", " Course   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
            Mode::Searching(_) => &[
                ("[Enter]", " Search   "),
                ("[Tab]", " Match case   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::About => &[("[any key]", " Close")],
        };

        Line::from(
            keys.iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(Field::Name),
            form.build_line(Field::Course),
            form.build_line(Field::Mobile),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = match form.active {
            Field::Name => 0,
            Field::Course => return,
            Field::Mobile => 2,
        };
        let prefix = format!("{}: ", form.active.label()).chars().count();
        frame.set_cursor_position((
            cursor_column(inner, prefix, form.value_len(form.active)),
            inner.y + row,
        ));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Delete Student Data")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete the record for {}?",
                confirm.name
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, form: &SearchForm) {
        let popup_area = centered_rect(60, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Search Student Data")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let case_label = match form.case {
            CaseMatch::Sensitive => "on",
            CaseMatch::Insensitive => "off",
        };
        let lines = vec![
            Line::from(format!("Name: {}", form.query)),
            Line::from(Span::styled(
                format!("Match case: {case_label}"),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        let cursor_x = cursor_column(inner, "Name: ".len(), form.query.chars().count());
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(ABOUT_TEXT)
            .block(Block::default().title("About").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Apply one key press to the insert/update popup.
fn apply_form_key(code: KeyCode, form: &mut StudentForm) -> FormAction {
    match code {
        KeyCode::Esc => return FormAction::Cancel,
        KeyCode::Enter => return FormAction::Submit,
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Left => {
            form.cycle_course(false);
        }
        KeyCode::Right => {
            form.cycle_course(true);
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(ch) => {
            if form.push_char(ch) {
                form.error = None;
            }
        }
        _ => {}
    }
    FormAction::Continue
}
