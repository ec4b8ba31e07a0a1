//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so the store, the search
//! helpers and the forms can all share them.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `students` table.
pub struct Student {
    /// Primary key assigned by SQLite. Never edited by the user; edit and
    /// delete flows hand it back to the store.
    pub id: i64,
    pub name: String,
    /// Stored as raw text. The forms only ever write one of the [`Course`]
    /// names, but rows written by other tools are displayed as-is.
    pub course: String,
    /// Free-form phone number, no format validation.
    pub mobile: String,
}

/// Courses offered in the form's choice widget, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Course {
    #[default]
    Biology,
    Math,
    Astronomy,
    Physics,
    Chemistry,
}

impl Course {
    pub const ALL: [Course; 5] = [
        Course::Biology,
        Course::Math,
        Course::Astronomy,
        Course::Physics,
        Course::Chemistry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Course::Biology => "Biology",
            Course::Math => "Math",
            Course::Astronomy => "Astronomy",
            Course::Physics => "Physics",
            Course::Chemistry => "Chemistry",
        }
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|course| *course == self)
            .unwrap_or(0)
    }

    /// The following course, wrapping back to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// The preceding course, wrapping around to the last.
    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a course name is not one of [`Course::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown course: {0}")]
pub struct UnknownCourse(pub String);

impl FromStr for Course {
    type Err = UnknownCourse;

    /// Exact, case-sensitive match against the display names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|course| course.as_str() == s)
            .ok_or_else(|| UnknownCourse(s.to_string()))
    }
}

/// The three user-editable fields of a [`Student`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field {
    #[default]
    Name,
    Course,
    Mobile,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Course => "Course",
            Field::Mobile => "Mobile",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_cycles_in_both_directions() {
        assert_eq!(Course::Biology.next(), Course::Math);
        assert_eq!(Course::Chemistry.next(), Course::Biology);
        assert_eq!(Course::Biology.previous(), Course::Chemistry);
        assert_eq!(Course::Physics.previous(), Course::Astronomy);
    }

    #[test]
    fn course_parses_display_names_only() {
        for course in Course::ALL {
            assert_eq!(course.to_string().parse::<Course>(), Ok(course));
        }
        assert_eq!(
            "math".parse::<Course>(),
            Err(UnknownCourse("math".to_string()))
        );
    }
}
