use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Person name → day label → free text
pub type CellMap = HashMap<String, HashMap<String, String>>;

/// In-memory shift and note store.
///
/// Rows are keyed by person name, so two people with the same name share a
/// row. Keys are the column labels that were visible when the row was made;
/// nothing re-keys a row when the labels change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShiftGrid {
    people: Vec<String>,
    shifts: CellMap,
    notes: CellMap,
}

impl ShiftGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid with an empty row per name for the given columns
    pub fn with_people<S: AsRef<str>>(names: &[S], columns: &[String]) -> Self {
        let mut grid = Self::new();
        for name in names {
            grid.add_person(name.as_ref(), columns);
        }
        grid
    }

    /// Display order of rows. May contain duplicates.
    pub fn people(&self) -> &[String] {
        &self.people
    }

    /// Whether `name` has a visible row
    pub fn has_person(&self, name: &str) -> bool {
        self.people.iter().any(|p| p == name)
    }

    /// Append a row for `name` with an empty shift for every column.
    ///
    /// Blank or whitespace-only names are ignored and `false` is returned.
    /// The name is stored as given. Adding an existing name appends a second
    /// row and resets the shared mapping entry to empty strings.
    pub fn add_person(&mut self, name: &str, columns: &[String]) -> bool {
        if name.trim().is_empty() {
            return false;
        }

        let row = columns
            .iter()
            .map(|col| (col.clone(), String::new()))
            .collect();
        self.people.push(name.to_string());
        self.shifts.insert(name.to_string(), row);

        debug!(person = %name, columns = columns.len(), "Added person");
        true
    }

    /// Shift text of a cell, `None` when the row has no key for `day`
    pub fn cell(&self, person: &str, day: &str) -> Option<&str> {
        self.shifts
            .get(person)
            .and_then(|row| row.get(day))
            .map(String::as_str)
    }

    /// Replace the shift text of a cell
    pub fn set_cell(&mut self, person: &str, day: &str, value: impl Into<String>) {
        self.shifts
            .entry(person.to_string())
            .or_default()
            .insert(day.to_string(), value.into());
    }

    /// Note text of a cell when notes are kept apart from shifts
    pub fn note(&self, person: &str, day: &str) -> Option<&str> {
        self.notes
            .get(person)
            .and_then(|row| row.get(day))
            .map(String::as_str)
    }

    pub fn set_note(&mut self, person: &str, day: &str, value: impl Into<String>) {
        self.notes
            .entry(person.to_string())
            .or_default()
            .insert(day.to_string(), value.into());
    }

    /// Rows lacking a shift key for at least one of `columns`, in display order
    pub fn stale_rows(&self, columns: &[String]) -> Vec<&str> {
        let mut stale: Vec<&str> = Vec::new();
        for person in &self.people {
            let complete = self
                .shifts
                .get(person)
                .is_some_and(|row| columns.iter().all(|col| row.contains_key(col)));
            if !complete && !stale.contains(&person.as_str()) {
                stale.push(person);
            }
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        ["Monday", "Tuesday", "Wednesday"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_with_people_creates_empty_rows() {
        let grid = ShiftGrid::with_people(&["Sandra", "Emeka"], &columns());
        assert_eq!(grid.people(), ["Sandra", "Emeka"]);
        for col in columns() {
            assert_eq!(grid.cell("Sandra", &col), Some(""));
            assert_eq!(grid.cell("Emeka", &col), Some(""));
        }
    }

    #[test]
    fn test_add_person_blank_is_ignored() {
        let mut grid = ShiftGrid::with_people(&["Sandra"], &columns());
        let before = grid.clone();

        assert!(!grid.add_person("", &columns()));
        assert!(!grid.add_person("   \t\n", &columns()));

        assert_eq!(grid, before);
    }

    #[test]
    fn test_add_person_fills_visible_columns() {
        let mut grid = ShiftGrid::new();
        assert!(grid.add_person("Alex", &columns()));

        assert_eq!(grid.people(), ["Alex"]);
        for col in columns() {
            assert_eq!(grid.cell("Alex", &col), Some(""));
        }
        assert_eq!(grid.cell("Alex", "Sunday"), None);
    }

    #[test]
    fn test_add_person_keeps_name_as_given() {
        let mut grid = ShiftGrid::new();
        grid.add_person(" Alex ", &columns());
        assert_eq!(grid.people(), [" Alex "]);
        assert!(grid.has_person(" Alex "));
        assert!(!grid.has_person("Alex"));
    }

    #[test]
    fn test_duplicate_name_shares_and_resets_row() {
        let mut grid = ShiftGrid::with_people(&["Sandra"], &columns());
        grid.set_cell("Sandra", "Monday", "Early");

        assert!(grid.add_person("Sandra", &columns()));

        assert_eq!(grid.people(), ["Sandra", "Sandra"]);
        assert_eq!(grid.cell("Sandra", "Monday"), Some(""));
    }

    #[test]
    fn test_set_cell_round_trip() {
        let mut grid = ShiftGrid::with_people(&["Sandra", "Emeka"], &columns());
        grid.set_cell("Sandra", "Monday", "09:00-17:00");
        assert_eq!(grid.cell("Sandra", "Monday"), Some("09:00-17:00"));
    }

    #[test]
    fn test_set_cell_overwrites_only_target() {
        let mut grid = ShiftGrid::with_people(&["Sandra", "Emeka"], &columns());
        grid.set_cell("Sandra", "Monday", "Early");
        grid.set_cell("Emeka", "Monday", "Late");
        grid.set_cell("Sandra", "Tuesday", "Night");

        grid.set_cell("Sandra", "Monday", "Off");

        assert_eq!(grid.cell("Sandra", "Monday"), Some("Off"));
        assert_eq!(grid.cell("Emeka", "Monday"), Some("Late"));
        assert_eq!(grid.cell("Sandra", "Tuesday"), Some("Night"));
        assert_eq!(grid.cell("Emeka", "Tuesday"), Some(""));
    }

    #[test]
    fn test_set_cell_accepts_any_text() {
        let mut grid = ShiftGrid::new();
        let long = "x".repeat(10_000);
        grid.set_cell("Ghost", "Friday", long.clone());
        assert_eq!(grid.cell("Ghost", "Friday"), Some(long.as_str()));
        // Writing does not add a visible row
        assert!(grid.people().is_empty());
        assert!(!grid.has_person("Ghost"));
    }

    #[test]
    fn test_notes_are_separate_from_shifts() {
        let mut grid = ShiftGrid::with_people(&["Sandra"], &columns());
        grid.set_cell("Sandra", "Monday", "Early");
        grid.set_note("Sandra", "Monday", "Late arrival");

        assert_eq!(grid.cell("Sandra", "Monday"), Some("Early"));
        assert_eq!(grid.note("Sandra", "Monday"), Some("Late arrival"));
        assert_eq!(grid.note("Sandra", "Tuesday"), None);
    }

    #[test]
    fn test_stale_rows_after_columns_change() {
        let mut grid = ShiftGrid::with_people(&["Sandra", "Emeka"], &columns());
        assert!(grid.stale_rows(&columns()).is_empty());

        let next = vec!["Monday 10/06".to_string(), "Tuesday 11/06".to_string()];
        grid.add_person("Alex", &next);

        assert_eq!(grid.stale_rows(&next), vec!["Sandra", "Emeka"]);
        assert_eq!(grid.stale_rows(&columns()), vec!["Alex"]);
    }
}
