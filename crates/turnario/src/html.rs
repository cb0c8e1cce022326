use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::board::{BoardView, CellView, RowView};
use crate::config::NoteMode;
use crate::editor::Draft;

const EMPTY_CELL: &str = "+ Add note";

/// Write a rendered board to an HTML file
pub fn generate_html(view: &BoardView, path: &Path) -> Result<()> {
    let html = render_page(view);
    fs::write(path, html.into_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn render_page(view: &BoardView) -> Markup {
    let theme = view.theme.as_str();
    let next_theme = view.theme.toggled().as_str();

    html! {
        (DOCTYPE)
        html lang="en" data-theme=(theme) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content="Weekly shift scheduling";
                title { "Shift Planner" }
                style { (PreEscaped(CSS)) }
            }
            body.popup-open[view.editor.is_open()] {
                main.container {
                    header.top {
                        h1 { "Weekly Shift Planner" }
                        form method="post" action="/theme" {
                            button.theme-toggle type="submit" {
                                "Toggle " (capitalize(next_theme)) " Mode"
                            }
                        }
                    }
                    section.week-nav {
                        form method="post" action="/week/previous" {
                            button.nav type="submit" title="Previous week" { "←" }
                        }
                        p #"week-range" { (view.range_label) }
                        form method="post" action="/week/next" {
                            button.nav type="submit" title="Next week" { "→" }
                        }
                    }
                    section.add-person {
                        form method="post" action="/people" {
                            input type="text" name="name" placeholder="Add person name";
                            button.primary type="submit" { "Add Row" }
                        }
                    }
                    section.grid {
                        table {
                            thead {
                                tr {
                                    th.name { "Name" }
                                    @for col in &view.columns {
                                        th { (col) }
                                    }
                                }
                            }
                            tbody {
                                @for row in &view.rows {
                                    (render_row(row, view.config.notes))
                                }
                            }
                        }
                    }
                    @if let Some(draft) = view.editor.draft() {
                        (render_popup(draft))
                    }
                }
                script { (PreEscaped(JAVASCRIPT)) }
            }
        }
    }
}

fn render_row(row: &RowView, mode: NoteMode) -> Markup {
    html! {
        tr {
            td.person { (row.person) }
            @for cell in &row.cells {
                td {
                    @match mode {
                        NoteMode::Overwrite => {
                            (render_note_button(&row.person, cell, cell.shift.as_deref()))
                        }
                        NoteMode::Separate => {
                            (render_shift_input(&row.person, cell))
                            (render_note_button(&row.person, cell, cell.note.as_deref()))
                        }
                    }
                }
            }
        }
    }
}

/// Inline shift editor, submitted on change
fn render_shift_input(person: &str, cell: &CellView) -> Markup {
    html! {
        form.shift method="post" action="/cells" {
            input type="hidden" name="person" value=(person);
            input type="hidden" name="day" value=(cell.day);
            input.shift-input type="text" name="value" value=(cell.shift.as_deref().unwrap_or_default());
        }
    }
}

/// Clickable cell that opens the popup editor
fn render_note_button(person: &str, cell: &CellView, text: Option<&str>) -> Markup {
    let text = text.unwrap_or_default();
    html! {
        form.note method="post" action="/editor/open" {
            input type="hidden" name="person" value=(person);
            input type="hidden" name="day" value=(cell.day);
            button.cell type="submit" title=(text) {
                @if text.is_empty() {
                    span.placeholder { (EMPTY_CELL) }
                } @else {
                    (text)
                }
            }
        }
    }
}

fn render_popup(draft: &Draft) -> Markup {
    html! {
        div.backdrop {
            div.popup #"note-popup" {
                h3 { "Edit Note for " (draft.person) " – " (draft.day) }
                form method="post" action="/editor/save" {
                    textarea name="draft" autofocus { (draft.content) }
                    div.actions {
                        button.secondary type="submit" formaction="/editor/cancel" { "Cancel" }
                        button.save type="submit" { "Save" }
                    }
                }
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const CSS: &str = r#"
:root {
    --background: #ffffff;
    --foreground: #171717;
    --cell: #ffffff;
    --muted: #9ca3af;
    --border: #d1d5db;
    --header: #f3f4f6;
}

[data-theme="dark"] {
    --background: #0a0a0a;
    --foreground: #ededed;
    --cell: #1f2937;
    --muted: #6b7280;
    --border: #374151;
    --header: #111827;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, sans-serif;
    background: var(--background);
    color: var(--foreground);
    min-height: 100vh;
}

body.popup-open {
    overflow: hidden;
}

.container {
    padding: 24px;
}

.top {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 24px;
}

h1 {
    font-size: 1.9em;
    font-weight: 700;
}

button {
    cursor: pointer;
    border: none;
    border-radius: 4px;
    padding: 4px 12px;
}

.theme-toggle {
    background: var(--foreground);
    color: var(--background);
}

.week-nav {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 16px;
}

.nav {
    font-size: 1.25em;
    background: var(--header);
    color: var(--foreground);
}

.add-person {
    margin-bottom: 24px;
}

.add-person input {
    border: 1px solid var(--border);
    border-radius: 4px;
    padding: 4px 8px;
    margin-right: 12px;
}

.primary {
    background: #2563eb;
    color: #fff;
}

.grid {
    overflow-x: auto;
}

table {
    min-width: 100%;
    border-collapse: collapse;
    border: 1px solid var(--border);
}

th, td {
    border: 1px solid var(--border);
    padding: 8px;
}

th {
    background: var(--header);
    text-align: center;
}

th.name {
    text-align: left;
}

td.person {
    font-weight: 500;
    white-space: nowrap;
}

.cell {
    display: block;
    width: 100%;
    min-width: 120px;
    max-width: 200px;
    overflow: hidden;
    text-overflow: ellipsis;
    white-space: nowrap;
    text-align: left;
    background: var(--cell);
    color: var(--foreground);
    border: 1px solid var(--border);
}

.shift-input {
    width: 100%;
    min-width: 120px;
    margin-bottom: 4px;
    padding: 2px 6px;
    border: 1px solid var(--border);
    border-radius: 4px;
}

.placeholder {
    color: var(--muted);
}

.backdrop {
    position: fixed;
    inset: 0;
    background: rgba(0, 0, 0, 0.5);
    display: flex;
    align-items: center;
    justify-content: center;
    z-index: 50;
}

.popup {
    background: var(--background);
    padding: 16px;
    border-radius: 6px;
    width: 24rem;
}

.popup h3 {
    margin-bottom: 8px;
}

.popup textarea {
    width: 100%;
    height: 8rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    padding: 8px;
    margin-bottom: 16px;
}

.actions {
    display: flex;
    justify-content: flex-end;
    gap: 8px;
}

.secondary {
    background: #d1d5db;
}

.save {
    background: #16a34a;
    color: #fff;
}
"#;

const JAVASCRIPT: &str = r#"
// Submit inline shift edits as soon as the input loses focus
document.querySelectorAll('.shift-input').forEach(input => {
    input.addEventListener('change', function() {
        this.form.requestSubmit();
    });
});
"#;
