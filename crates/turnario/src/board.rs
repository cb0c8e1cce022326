//! The week grid as a single owned value.
//!
//! A [`Board`] ties together the week offset, the shift/note store, the popup
//! editor and the theme. Every user action is a method call on it; the caller
//! supplies "today" so the board itself never reads the clock.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{GridConfig, NoteMode};
use crate::editor::{Draft, NoteEditor};
use crate::error::{AppError, WeekError};
use crate::grid::ShiftGrid;
use crate::week::{self, Week};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    config: GridConfig,
    offset: i64,
    grid: ShiftGrid,
    editor: NoteEditor,
    theme: Theme,
}

/// One rendered cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub day: String,
    /// `None` when the row has no key for this column
    pub shift: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub person: String,
    pub cells: Vec<CellView>,
}

/// Everything needed to draw the page or answer the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub offset: i64,
    pub dates: Vec<NaiveDate>,
    pub range_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<RowView>,
    pub editor: NoteEditor,
    pub theme: Theme,
    pub config: GridConfig,
}

impl Board {
    /// Create a board on the current week with an empty row per default person
    pub fn new(config: GridConfig, today: NaiveDate) -> Result<Self, WeekError> {
        let columns = week::column_labels(&week::compute_week(today, 0)?, config.columns);
        let grid = ShiftGrid::with_people(config.people.as_slice(), &columns);
        Ok(Self {
            config,
            offset: 0,
            grid,
            editor: NoteEditor::default(),
            theme: Theme::default(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    #[cfg(test)]
    pub fn grid(&self) -> &ShiftGrid {
        &self.grid
    }

    #[cfg(test)]
    pub fn editor(&self) -> &NoteEditor {
        &self.editor
    }

    #[cfg(test)]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn week(&self, today: NaiveDate) -> Result<Week, WeekError> {
        week::compute_week(today, self.offset)
    }

    /// Labels of the currently visible columns
    pub fn columns(&self, today: NaiveDate) -> Result<Vec<String>, WeekError> {
        Ok(week::column_labels(&self.week(today)?, self.config.columns))
    }

    pub fn previous_week(&mut self, today: NaiveDate) -> Result<i64, WeekError> {
        self.move_to(self.offset.saturating_sub(1), today)
    }

    pub fn next_week(&mut self, today: NaiveDate) -> Result<i64, WeekError> {
        self.move_to(self.offset.saturating_add(1), today)
    }

    /// Commit `offset` only if its week can be computed
    fn move_to(&mut self, offset: i64, today: NaiveDate) -> Result<i64, WeekError> {
        week::compute_week(today, offset)?;
        self.offset = offset;
        Ok(self.offset)
    }

    pub fn jump_to_week(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// Add a row keyed by the columns visible today. Blank names are ignored.
    pub fn add_person(&mut self, name: &str, today: NaiveDate) -> Result<bool, WeekError> {
        let columns = self.columns(today)?;
        let added = self.grid.add_person(name, &columns);
        if added {
            info!(person = %name, offset = self.offset, "Person added");
        }
        Ok(added)
    }

    pub fn set_cell(&mut self, person: &str, day: &str, value: impl Into<String>) {
        self.grid.set_cell(person, day, value);
    }

    /// Open the popup on a cell of an existing row
    pub fn open_editor(&mut self, person: &str, day: &str) -> Result<(), AppError> {
        if !self.grid.has_person(person) {
            return Err(AppError::UnknownPerson(person.to_string()));
        }
        self.editor.open(&self.grid, self.config.notes, person, day);
        Ok(())
    }

    pub fn edit_draft(&mut self, content: impl Into<String>) -> Result<(), AppError> {
        if self.editor.edit(content) {
            Ok(())
        } else {
            Err(AppError::EditorClosed)
        }
    }

    pub fn cancel_editor(&mut self) -> Option<Draft> {
        self.editor.cancel()
    }

    pub fn save_editor(&mut self) -> Result<Draft, AppError> {
        let draft = self
            .editor
            .save(&mut self.grid, self.config.notes)
            .ok_or(AppError::EditorClosed)?;
        info!(person = %draft.person, day = %draft.day, "Note committed");
        Ok(draft)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Rows that have no key for some visible column.
    ///
    /// Happens with dated columns once the week changes: rows keep the labels
    /// of the week they were created in.
    pub fn stale_rows(&self, today: NaiveDate) -> Result<Vec<String>, WeekError> {
        let columns = self.columns(today)?;
        let stale = self
            .grid
            .stale_rows(&columns)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        if !stale.is_empty() {
            warn!(
                offset = self.offset,
                rows = ?stale,
                "Rows have no entries for the visible columns"
            );
        }
        Ok(stale)
    }

    pub fn view(&self, today: NaiveDate) -> Result<BoardView, WeekError> {
        let week = self.week(today)?;
        let columns = week::column_labels(&week, self.config.columns);
        let separate_notes = self.config.notes == NoteMode::Separate;

        let rows = self
            .grid
            .people()
            .iter()
            .map(|person| RowView {
                person: person.clone(),
                cells: columns
                    .iter()
                    .map(|day| CellView {
                        day: day.clone(),
                        shift: self.grid.cell(person, day).map(str::to_string),
                        note: separate_notes
                            .then(|| self.grid.note(person, day).map(str::to_string))
                            .flatten(),
                    })
                    .collect(),
            })
            .collect();

        Ok(BoardView {
            offset: self.offset,
            dates: week.to_vec(),
            range_label: week::week_range_label(&week),
            columns,
            rows,
            editor: self.editor.clone(),
            theme: self.theme,
            config: self.config.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnStyle;
    use chrono::{Datelike, Days, Weekday};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    fn board(columns: ColumnStyle, notes: NoteMode) -> Board {
        let config = GridConfig {
            columns,
            notes,
            ..GridConfig::default()
        };
        Board::new(config, today()).unwrap()
    }

    #[test]
    fn test_new_board_has_default_people() {
        let board = board(ColumnStyle::Dated, NoteMode::Overwrite);
        assert_eq!(board.offset(), 0);
        assert_eq!(board.grid().people(), ["Sandra", "Emeka", "Precious"]);
        assert_eq!(board.grid().cell("Emeka", "Wednesday 05/06"), Some(""));
        assert!(board.stale_rows(today()).unwrap().is_empty());
    }

    #[test]
    fn test_week_navigation() {
        let mut board = board(ColumnStyle::Dated, NoteMode::Overwrite);
        assert_eq!(board.previous_week(today()).unwrap(), -1);
        assert_eq!(board.previous_week(today()).unwrap(), -2);
        assert_eq!(board.next_week(today()).unwrap(), -1);
        assert_eq!(
            board.week(today()).unwrap()[0],
            NaiveDate::from_ymd_opt(2024, 5, 27).unwrap()
        );
        assert_eq!(board.columns(today()).unwrap()[0], "Monday 27/05");

        board.jump_to_week(52);
        assert_eq!(board.columns(today()).unwrap()[0], "Monday 02/06");
    }

    /// Last Sunday chrono can represent: its week exists, the next one does not
    fn last_sunday() -> NaiveDate {
        (0..7)
            .filter_map(|d| NaiveDate::MAX.checked_sub_days(Days::new(d)))
            .find(|d| d.weekday() == Weekday::Sun)
            .unwrap()
    }

    #[test]
    fn test_navigation_past_calendar_range_keeps_offset() {
        let edge = last_sunday();
        let mut board = Board::new(GridConfig::default(), edge).unwrap();

        assert_eq!(board.next_week(edge), Err(WeekError::OutOfRange(1)));
        assert_eq!(board.offset(), 0);
        assert!(board.view(edge).is_ok());

        assert_eq!(board.previous_week(edge), Ok(-1));
    }

    #[test]
    fn test_open_editor_refuses_hidden_row() {
        let mut board = board(ColumnStyle::Static, NoteMode::Overwrite);
        board.set_cell("Ghost", "Monday", "x");

        let err = board.open_editor("Ghost", "Monday").unwrap_err();

        assert!(matches!(err, AppError::UnknownPerson(name) if name == "Ghost"));
        assert!(!board.editor().is_open());
    }

    #[test]
    fn test_dated_columns_leave_rows_stale_after_navigation() {
        let mut board = board(ColumnStyle::Dated, NoteMode::Overwrite);
        board.next_week(today()).unwrap();

        assert_eq!(
            board.stale_rows(today()).unwrap(),
            vec!["Sandra", "Emeka", "Precious"]
        );

        let view = board.view(today()).unwrap();
        assert!(view.rows[0].cells.iter().all(|c| c.shift.is_none()));
    }

    #[test]
    fn test_static_columns_survive_navigation() {
        let mut board = board(ColumnStyle::Static, NoteMode::Overwrite);
        board.set_cell("Sandra", "Monday", "Early");
        board.next_week(today()).unwrap();

        assert!(board.stale_rows(today()).unwrap().is_empty());
        assert_eq!(board.grid().cell("Sandra", "Monday"), Some("Early"));
    }

    #[test]
    fn test_add_person_uses_visible_columns() {
        let mut board = board(ColumnStyle::Dated, NoteMode::Overwrite);
        board.next_week(today()).unwrap();
        assert!(board.add_person("Alex", today()).unwrap());

        assert_eq!(board.grid().cell("Alex", "Monday 10/06"), Some(""));
        assert_eq!(board.grid().cell("Alex", "Monday 03/06"), None);
    }

    #[test]
    fn test_add_blank_person_is_ignored() {
        let mut board = board(ColumnStyle::Dated, NoteMode::Overwrite);
        assert!(!board.add_person("  ", today()).unwrap());
        assert_eq!(board.grid().people().len(), 3);
    }

    #[test]
    fn test_editor_round_trip() {
        let mut board = board(ColumnStyle::Static, NoteMode::Overwrite);
        board.set_cell("Sandra", "Friday", "Late arrival");

        board.open_editor("Sandra", "Friday").unwrap();
        assert_eq!(board.editor().draft().unwrap().content, "Late arrival");
        board.cancel_editor();
        assert_eq!(board.grid().cell("Sandra", "Friday"), Some("Late arrival"));

        board.open_editor("Sandra", "Friday").unwrap();
        board.edit_draft("Left early").unwrap();
        let saved = board.save_editor().unwrap();
        assert_eq!(saved.day, "Friday");
        assert_eq!(board.grid().cell("Sandra", "Friday"), Some("Left early"));
        assert_eq!(board.grid().cell("Emeka", "Friday"), Some(""));
    }

    #[test]
    fn test_open_editor_unknown_person() {
        let mut board = board(ColumnStyle::Static, NoteMode::Overwrite);
        let err = board.open_editor("Nobody", "Monday").unwrap_err();
        assert!(matches!(err, AppError::UnknownPerson(name) if name == "Nobody"));
        assert!(!board.editor().is_open());
    }

    #[test]
    fn test_save_without_open_editor() {
        let mut board = board(ColumnStyle::Static, NoteMode::Overwrite);
        assert!(matches!(board.save_editor(), Err(AppError::EditorClosed)));
        assert!(matches!(board.edit_draft("x"), Err(AppError::EditorClosed)));
        assert_eq!(board.cancel_editor(), None);
    }

    #[test]
    fn test_view_with_separate_notes() {
        let mut board = board(ColumnStyle::Static, NoteMode::Separate);
        board.set_cell("Sandra", "Monday", "Early");
        board.open_editor("Sandra", "Monday").unwrap();
        board.edit_draft("Bring keys").unwrap();
        board.save_editor().unwrap();

        let view = board.view(today()).unwrap();
        let monday = &view.rows[0].cells[0];
        assert_eq!(monday.day, "Monday");
        assert_eq!(monday.shift.as_deref(), Some("Early"));
        assert_eq!(monday.note.as_deref(), Some("Bring keys"));
        assert_eq!(view.rows[1].cells[0].note, None);
    }

    #[test]
    fn test_view_header() {
        let board = board(ColumnStyle::Dated, NoteMode::Overwrite);
        let view = board.view(today()).unwrap();
        assert_eq!(view.dates.len(), 7);
        assert_eq!(view.range_label, "Week of 03/06/2024 – 09/06/2024");
        assert_eq!(view.columns[6], "Sunday 09/06");
        assert_eq!(view.rows.len(), 3);
    }

    #[test]
    fn test_toggle_theme() {
        let mut board = board(ColumnStyle::Dated, NoteMode::Overwrite);
        assert_eq!(board.theme(), Theme::Light);
        assert_eq!(board.toggle_theme(), Theme::Dark);
        assert_eq!(board.toggle_theme(), Theme::Light);
        assert_eq!(Theme::Dark.as_str(), "dark");
    }
}
