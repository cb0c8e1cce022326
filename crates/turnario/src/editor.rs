use serde::Serialize;
use tracing::debug;

use crate::config::NoteMode;
use crate::grid::ShiftGrid;

/// Uncommitted popup text bound to one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub person: String,
    pub day: String,
    pub content: String,
}

/// Popup note editor: either closed or open on a single cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum NoteEditor {
    #[default]
    Closed,
    Open(Draft),
}

impl NoteEditor {
    /// Open on (person, day), pre-filling the draft with the committed value.
    ///
    /// Opening while already open rebinds the popup to the new cell.
    pub fn open(&mut self, grid: &ShiftGrid, mode: NoteMode, person: &str, day: &str) {
        let committed = match mode {
            NoteMode::Overwrite => grid.cell(person, day),
            NoteMode::Separate => grid.note(person, day),
        };
        *self = NoteEditor::Open(Draft {
            person: person.to_string(),
            day: day.to_string(),
            content: committed.unwrap_or_default().to_string(),
        });
        debug!(person = %person, day = %day, "Note editor opened");
    }

    pub fn is_open(&self) -> bool {
        matches!(self, NoteEditor::Open(_))
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            NoteEditor::Open(draft) => Some(draft),
            NoteEditor::Closed => None,
        }
    }

    /// Replace the draft text. Returns `false` when closed.
    pub fn edit(&mut self, content: impl Into<String>) -> bool {
        match self {
            NoteEditor::Open(draft) => {
                draft.content = content.into();
                true
            }
            NoteEditor::Closed => false,
        }
    }

    /// Close without touching the store, returning the discarded draft
    pub fn cancel(&mut self) -> Option<Draft> {
        match std::mem::take(self) {
            NoteEditor::Open(draft) => Some(draft),
            NoteEditor::Closed => None,
        }
    }

    /// Commit the draft into the store and close, returning what was written
    pub fn save(&mut self, grid: &mut ShiftGrid, mode: NoteMode) -> Option<Draft> {
        let draft = self.cancel()?;
        match mode {
            NoteMode::Overwrite => grid.set_cell(&draft.person, &draft.day, draft.content.clone()),
            NoteMode::Separate => grid.set_note(&draft.person, &draft.day, draft.content.clone()),
        }
        debug!(person = %draft.person, day = %draft.day, "Note saved");
        Some(draft)
    }
}
