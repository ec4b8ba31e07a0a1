use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Course, Field, Student};
use crate::search::CaseMatch;

/// Field values for the insert and update popups. The course is a choice
/// widget, so it can only ever hold one of [`Course::ALL`].
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) course: Course,
    pub(crate) mobile: String,
    pub(crate) active: Field,
    pub(crate) error: Option<String>,
}

impl StudentForm {
    /// Populate the form from the selected row. A course outside the known set
    /// falls back to the first choice.
    pub(crate) fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            course: student.course.parse().unwrap_or_default(),
            mobile: student.mobile.clone(),
            active: Field::Name,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            Field::Name => Field::Course,
            Field::Course => Field::Mobile,
            Field::Mobile => Field::Name,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            Field::Name => Field::Mobile,
            Field::Course => Field::Name,
            Field::Mobile => Field::Course,
        };
    }

    /// Step the course choice forward or back. Only acts while the course
    /// field has focus.
    pub(crate) fn cycle_course(&mut self, forward: bool) -> bool {
        if self.active != Field::Course {
            return false;
        }
        self.course = if forward {
            self.course.next()
        } else {
            self.course.previous()
        };
        true
    }

    /// Append a character to the active text field. Returns `false` when the
    /// character was not accepted.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            Field::Name => self.name.push(ch),
            Field::Mobile => self.mobile.push(ch),
            Field::Course => {
                if ch == ' ' {
                    self.course = self.course.next();
                } else {
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            Field::Name => {
                self.name.pop();
            }
            Field::Mobile => {
                self.mobile.pop();
            }
            Field::Course => {}
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: Field) -> Line<'static> {
        let is_active = self.active == field;
        let (display, empty) = match field {
            Field::Name => (self.name.clone(), self.name.is_empty()),
            Field::Mobile => (self.mobile.clone(), self.mobile.is_empty()),
            Field::Course => (format!("< {} >", self.course), false),
        };

        let display = if empty {
            "<required>".to_string()
        } else {
            display
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character count shown for the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: Field) -> usize {
        match field {
            Field::Name => self.name.chars().count(),
            Field::Mobile => self.mobile.chars().count(),
            Field::Course => format!("< {} >", self.course).chars().count(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl From<&Student> for ConfirmDelete {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
        }
    }
}

/// State for the search popup.
#[derive(Default, Clone)]
pub(crate) struct SearchForm {
    pub(crate) query: String,
    pub(crate) case: CaseMatch,
}
