//! Name search over the records already loaded into the view. Nothing here
//! touches the database; callers decide how to present the matches.

use std::collections::HashSet;

use crate::models::Student;

/// How letters are compared when matching names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMatch {
    /// `"bob"` does not match `"Bob"`.
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseMatch {
    pub fn toggle(self) -> Self {
        match self {
            CaseMatch::Sensitive => CaseMatch::Insensitive,
            CaseMatch::Insensitive => CaseMatch::Sensitive,
        }
    }
}

/// Ids of every record whose name contains `query`, case-sensitively. An
/// empty query matches everything.
pub fn search(records: &[Student], query: &str) -> HashSet<i64> {
    search_with(records, query, CaseMatch::Sensitive)
}

/// Same as [`search`] with an explicit case policy.
pub fn search_with(records: &[Student], query: &str, case: CaseMatch) -> HashSet<i64> {
    match case {
        CaseMatch::Sensitive => records
            .iter()
            .filter(|student| student.name.contains(query))
            .map(|student| student.id)
            .collect(),
        CaseMatch::Insensitive => {
            let needle = query.to_lowercase();
            records
                .iter()
                .filter(|student| student.name.to_lowercase().contains(&needle))
                .map(|student| student.id)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, name: &str) -> Student {
        Student {
            id,
            name: name.to_string(),
            course: "Math".to_string(),
            mobile: "555-0000".to_string(),
        }
    }

    fn roster() -> Vec<Student> {
        vec![student(1, "Ann"), student(2, "Anna"), student(3, "Bob")]
    }

    #[test]
    fn matches_substrings_of_names() {
        assert_eq!(search(&roster(), "Ann"), HashSet::from([1, 2]));
        assert_eq!(search(&roster(), "nn"), HashSet::from([1, 2]));
    }

    #[test]
    fn default_search_is_case_sensitive() {
        assert!(search(&roster(), "bob").is_empty());
        assert_eq!(search(&roster(), "Bob"), HashSet::from([3]));
    }

    #[test]
    fn empty_query_matches_every_record() {
        assert_eq!(search(&roster(), ""), HashSet::from([1, 2, 3]));
        assert!(search(&[], "").is_empty());
    }

    #[test]
    fn absent_substring_matches_nothing() {
        assert!(search(&roster(), "xyz_not_present").is_empty());
    }

    #[test]
    fn only_the_name_column_is_searched() {
        assert!(search(&roster(), "Math").is_empty());
        assert!(search(&roster(), "555").is_empty());
    }

    #[test]
    fn insensitive_matching_is_opt_in() {
        assert_eq!(
            search_with(&roster(), "bob", CaseMatch::Insensitive),
            HashSet::from([3])
        );
        assert_eq!(
            search_with(&roster(), "ANN", CaseMatch::Insensitive),
            HashSet::from([1, 2])
        );
        assert_eq!(CaseMatch::default(), CaseMatch::Sensitive);
    }
}
