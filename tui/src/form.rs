//! Form view — lays out and renders the parameter rows, the add row and
//! the status line, and maps mouse positions back to form targets.
//!
//! Rendering and hit-testing share [`FormLayout`] so a click always lands
//! on the cell that was drawn there.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, Focus, Hit};
use crate::theme::Theme;

pub const NAME_WIDTH: u16 = 24;
pub const EDIT_WIDTH: u16 = 8;
pub const ADD_BUTTON_WIDTH: u16 = 7;
pub const PLACEHOLDER: &str = "Enter new parameter name";


// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Screen regions of the form for one frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    /// Bordered block around the parameter rows.
    pub params: Rect,
    /// Inside of `params`; one line per row.
    pub rows: Rect,
    /// Bordered block around the add row.
    pub add: Rect,
    pub add_name: Rect,
    pub add_button: Rect,
    pub status: Rect,
}

impl FormLayout {
    pub fn compute(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // parameter rows
                Constraint::Length(3), // add row
                Constraint::Length(1), // status
            ])
            .split(area);

        let rows = Block::default().borders(Borders::ALL).inner(chunks[0]);
        let add_inner = Block::default().borders(Borders::ALL).inner(chunks[1]);
        let add_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(ADD_BUTTON_WIDTH)])
            .split(add_inner);

        FormLayout {
            params: chunks[0],
            rows,
            add: chunks[1],
            add_name: add_cols[0],
            add_button: add_cols[1],
            status: chunks[2],
        }
    }

    /// How many parameter rows fit.
    pub fn visible_rows(&self) -> usize {
        self.rows.height as usize
    }

    /// Name, edit affordance and value cells of the `line`th visible row.
    pub fn row_cells(&self, line: usize) -> [Rect; 3] {
        let row = Rect {
            x: self.rows.x,
            y: self.rows.y + line as u16,
            width: self.rows.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(NAME_WIDTH),
                Constraint::Length(EDIT_WIDTH),
                Constraint::Min(1),
            ])
            .split(row);
        [cols[0], cols[1], cols[2]]
    }
}


/// First row to draw so that `anchor` stays on screen.
pub fn first_visible_row(anchor: usize, visible: usize) -> usize {
    if visible > 0 && anchor >= visible {
        anchor + 1 - visible
    } else {
        0
    }
}

/// Scroll offset for the current app state. Follows the focused row; with
/// focus on the add row the last parameters stay visible.
pub fn scroll_offset(app: &App, layout: &FormLayout) -> usize {
    let anchor = app
        .focus
        .row()
        .unwrap_or_else(|| app.editor.params().len().saturating_sub(1));
    first_visible_row(anchor, layout.visible_rows())
}


fn inside(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
}

/// Map a terminal position to a form target.
pub fn hit_test(
    layout: &FormLayout,
    offset: usize,
    total_rows: usize,
    column: u16,
    line: u16,
) -> Option<Hit> {
    if inside(layout.add_button, column, line) {
        return Some(Hit::AddButton);
    }
    if inside(layout.add_name, column, line) {
        return Some(Hit::NewName);
    }
    if !inside(layout.rows, column, line) {
        return None;
    }
    let visible_line = (line - layout.rows.y) as usize;
    let row = offset + visible_line;
    if row >= total_rows {
        return None;
    }
    let [name, edit, value] = layout.row_cells(visible_line);
    if inside(name, column, line) {
        Some(Hit::Name(row))
    } else if inside(edit, column, line) {
        Some(Hit::EditToggle(row))
    } else if inside(value, column, line) {
        Some(Hit::Value(row))
    } else {
        None
    }
}


// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the whole form.
pub fn render_form(frame: &mut Frame, layout: &FormLayout, app: &App, theme: &Theme) {
    render_rows(frame, layout, app, theme);
    render_add_row(frame, layout, app, theme);
    render_status(frame, layout.status, app, theme);
}


fn render_rows(frame: &mut Frame, layout: &FormLayout, app: &App, theme: &Theme) {
    let title = if app.editor.is_persistent() {
        " Parameters "
    } else {
        " Parameters (not saved) "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(title);
    frame.render_widget(block, layout.params);

    let offset = scroll_offset(app, layout);
    let params = app.editor.params();
    let session = app.editor.session();
    let visible = params.iter().enumerate().skip(offset).take(layout.visible_rows());

    for (line, (row, param)) in visible.enumerate() {
        let [name_cell, edit_cell, value_cell] = layout.row_cells(line);
        let editing = session.is_editing(param.id);

        // Name: static label, or the scratch while editing.
        if app.focus == Focus::Name(row) {
            render_field(frame, name_cell, app, theme.editing.patch(theme.focused));
        } else if editing {
            let scratch = session.scratch().unwrap_or_default();
            frame.render_widget(Paragraph::new(scratch.to_string()).style(theme.editing), name_cell);
        } else {
            frame.render_widget(Paragraph::new(param.name.clone()).style(theme.label), name_cell);
        }

        let affordance = if editing { "[save]" } else { "[edit]" };
        frame.render_widget(Paragraph::new(affordance).style(theme.affordance), edit_cell);

        if app.focus == Focus::Value(row) {
            render_field(frame, value_cell, app, theme.value.patch(theme.focused));
        } else {
            let value = app.editor.value(param.id).to_string();
            frame.render_widget(Paragraph::new(value).style(theme.value), value_cell);
        }
    }
}


fn render_add_row(frame: &mut Frame, layout: &FormLayout, app: &App, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(" New parameter ");
    frame.render_widget(block, layout.add);

    let focused = app.focus == Focus::NewName;
    let draft = app.editor.new_param_name();
    if draft.is_empty() {
        let style = if focused {
            theme.placeholder.patch(theme.focused)
        } else {
            theme.placeholder
        };
        frame.render_widget(Paragraph::new(PLACEHOLDER).style(style), layout.add_name);
        if focused {
            frame.set_cursor_position((layout.add_name.x, layout.add_name.y));
        }
    } else if focused {
        render_field(frame, layout.add_name, app, theme.value.patch(theme.focused));
    } else {
        frame.render_widget(Paragraph::new(draft.to_string()).style(theme.value), layout.add_name);
    }

    frame.render_widget(
        Paragraph::new("[ + ]").style(theme.affordance),
        layout.add_button,
    );
}


/// Draw the app's text field into `cell` and place the cursor.
fn render_field(frame: &mut Frame, cell: Rect, app: &App, style: Style) {
    let width = cell.width.saturating_sub(1) as usize;
    let (text, cursor) = app.field.visible(width);
    frame.render_widget(Paragraph::new(text).style(style), cell);
    frame.set_cursor_position((cell.x + cursor as u16, cell.y));
}


fn render_status(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let (text, style) = match app.status_message() {
        Some(msg) if app.status_is_error() => (msg.to_string(), theme.error),
        Some(msg) => (msg.to_string(), theme.status),
        None => {
            let hint = if app.editor.session().is_idle() {
                " Tab/\u{2191}\u{2193} move  F2 rename  Enter add  Esc quit"
            } else {
                " Enter save name  F2 save  Ctrl-C quit"
            };
            (hint.to_string(), theme.status)
        }
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
