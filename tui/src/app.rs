//! Form state machine: focus, key routing and mouse activation.
//!
//! `App` owns the [`ParamEditor`] and a single [`TextField`] mirroring the
//! focused field. Edits land in the text field first and are then written
//! to their target: the parameter value, the rename scratch, or the add-row
//! draft. No terminal I/O happens here.

use param_editor_core::{EditorError, ParamEditor};
use tracing::error;

use crate::input::TextField;


// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// Which field receives typed text. Row indices are display positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Name field of a row in edit mode.
    Name(usize),
    /// Value field of a row.
    Value(usize),
    /// Name field on the add row.
    NewName,
}

impl Focus {
    /// The parameter row this focus belongs to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            Focus::Name(r) | Focus::Value(r) => Some(*r),
            Focus::NewName => None,
        }
    }
}


/// A mouse target on the rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Name cell of a row (label, or text field while editing).
    Name(usize),
    /// The `[edit]` / `[save]` affordance of a row.
    EditToggle(usize),
    Value(usize),
    NewName,
    AddButton,
}


/// An action the runner has to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}


// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub editor: ParamEditor,
    pub focus: Focus,
    /// Buffer for the focused field.
    pub field: TextField,
    status_message: Option<(String, u64)>,
    /// Whether the current status message reports a failure.
    status_error: bool,
    status_ttl_ms: u64,
    double_click_ms: u64,
    last_label_click: Option<(usize, u64)>,
}


impl App {
    /// Wrap an editor, focusing the first value field (or the add row when
    /// there are no parameters).
    pub fn new(editor: ParamEditor, double_click_ms: u64) -> Self {
        let focus = if editor.params().is_empty() {
            Focus::NewName
        } else {
            Focus::Value(0)
        };
        let mut app = App {
            editor,
            focus,
            field: TextField::new(),
            status_message: None,
            status_error: false,
            status_ttl_ms: 4000,
            double_click_ms,
            last_label_click: None,
        };
        app.load_field();
        app
    }

    // -------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------

    /// Tab order: for each row its name field (only while editing) and its
    /// value field, then the add row.
    pub fn focus_order(&self) -> Vec<Focus> {
        let session = self.editor.session();
        let mut order = Vec::new();
        for (row, param) in self.editor.params().iter().enumerate() {
            if session.is_editing(param.id) {
                order.push(Focus::Name(row));
            }
            order.push(Focus::Value(row));
        }
        order.push(Focus::NewName);
        order
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.load_field();
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.set_focus(order[(pos + 1) % order.len()]);
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.set_focus(order[(pos + order.len() - 1) % order.len()]);
    }

    /// Id of the parameter shown at `row`.
    pub fn row_id(&self, row: usize) -> Option<u32> {
        self.editor.params().get(row).map(|p| p.id)
    }

    /// Display row of the parameter being renamed.
    pub fn editing_row(&self) -> Option<usize> {
        let id = self.editor.session().editing_id()?;
        self.editor.params().iter().position(|p| p.id == id)
    }

    /// Current text of the target behind `focus`.
    fn target_text(&self, focus: Focus) -> String {
        let text = match focus {
            Focus::Name(row) => self.editor.session().scratch().unwrap_or_else(|| {
                self.editor.params().get(row).map_or("", |p| p.name.as_str())
            }),
            Focus::Value(row) => self.row_id(row).map_or("", |id| self.editor.value(id)),
            Focus::NewName => self.editor.new_param_name(),
        };
        text.to_string()
    }

    fn load_field(&mut self) {
        let text = self.target_text(self.focus);
        self.field.set_text(&text);
    }

    /// Write the text field back to the focused target.
    fn commit_field(&mut self, now_ms: u64) {
        let text = self.field.text();
        match self.focus {
            Focus::Name(_) => {
                self.editor.edit_input(text);
            }
            Focus::Value(row) => {
                if let Some(id) = self.row_id(row) {
                    if let Err(e) = self.editor.change_value(id, text) {
                        self.report_error(&e, now_ms);
                    }
                }
            }
            Focus::NewName => self.editor.set_new_param_name(text),
        }
    }

    // -------------------------------------------------------------------
    // Form operations
    // -------------------------------------------------------------------

    /// The row's edit affordance: save if the row is being edited,
    /// otherwise start editing it.
    pub fn toggle_edit(&mut self, row: usize, now_ms: u64) {
        if self.editing_row() == Some(row) {
            self.save_edit(now_ms);
        } else {
            self.begin_edit(row);
        }
    }

    /// Put `row` into edit mode and focus its name field.
    pub fn begin_edit(&mut self, row: usize) {
        if let Some(id) = self.row_id(row) {
            if self.editor.begin_edit(id) {
                self.set_focus(Focus::Name(row));
            }
        }
    }

    /// Commit the open rename and move focus to that row's value.
    pub fn save_edit(&mut self, now_ms: u64) {
        let row = self.editing_row();
        match self.editor.save_edit() {
            Ok(Some(id)) => self.set_status(&format!("Renamed parameter {}", id), now_ms),
            Ok(None) => {}
            Err(e) => self.report_error(&e, now_ms),
        }
        if let Some(row) = row {
            self.set_focus(Focus::Value(row));
        } else if matches!(self.focus, Focus::Name(_)) {
            self.set_focus(Focus::Value(0));
        }
    }

    /// Add a parameter from the add-row draft.
    pub fn add_param(&mut self, now_ms: u64) {
        match self.editor.add_param() {
            Ok(param) => {
                self.set_status(&format!("Added \"{}\"", param.name), now_ms)
            }
            Err(e) => self.report_error(&e, now_ms),
        }
        if self.focus == Focus::NewName {
            self.load_field();
        }
    }

    /// Show a failed operation on the status line. The in-memory state is
    /// left as it is.
    pub fn report_error(&mut self, e: &EditorError, now_ms: u64) {
        let msg = match e {
            EditorError::IdsExhausted => format!("Cannot add: {}", e),
            _ => {
                error!(error = %e, "storage write failed");
                format!("Storage error: {}", e)
            }
        };
        self.set_status(&msg, now_ms);
        self.status_error = true;
    }

    // -------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------

    /// Route a key press. Returns an action for the runner, if any.
    pub fn handle_key(&mut self, key: Key, now_ms: u64) -> Option<AppAction> {
        match key {
            Key::Ctrl('c') | Key::Ctrl('q') => return Some(AppAction::Quit),
            Key::Escape => {
                if self.editor.session().is_idle() {
                    return Some(AppAction::Quit);
                }
            }
            Key::Tab | Key::Down => self.focus_next(),
            Key::BackTab | Key::Up => self.focus_prev(),
            Key::F(2) | Key::Ctrl('e') => {
                if let Some(row) = self.focus.row() {
                    self.toggle_edit(row, now_ms);
                }
            }
            Key::Enter => match self.focus {
                Focus::Name(_) => self.save_edit(now_ms),
                Focus::NewName => self.add_param(now_ms),
                Focus::Value(_) => self.focus_next(),
            },
            Key::Left => self.field.move_left(),
            Key::Right => self.field.move_right(),
            Key::Home => self.field.move_home(),
            Key::End => self.field.move_end(),
            Key::Char(ch) if !ch.is_control() => {
                self.field.insert(ch);
                self.commit_field(now_ms);
            }
            Key::Backspace => {
                self.field.delete_back();
                self.commit_field(now_ms);
            }
            Key::Delete => {
                self.field.delete_forward();
                self.commit_field(now_ms);
            }
            Key::Ctrl('w') => {
                self.field.delete_word_back();
                self.commit_field(now_ms);
            }
            Key::Ctrl('u') => {
                self.field.clear();
                self.commit_field(now_ms);
            }
            _ => {}
        }
        None
    }

    /// Handle a left click on a form target.
    ///
    /// Two clicks on the same label within the double-click window start
    /// editing that row.
    pub fn click(&mut self, hit: Hit, now_ms: u64) {
        match hit {
            Hit::Name(row) => {
                if self.editing_row() == Some(row) {
                    self.set_focus(Focus::Name(row));
                    return;
                }
                match self.last_label_click {
                    Some((last_row, at))
                        if last_row == row
                            && now_ms.saturating_sub(at) <= self.double_click_ms =>
                    {
                        self.last_label_click = None;
                        self.begin_edit(row);
                    }
                    _ => self.last_label_click = Some((row, now_ms)),
                }
            }
            Hit::EditToggle(row) => self.toggle_edit(row, now_ms),
            Hit::Value(row) => self.set_focus(Focus::Value(row)),
            Hit::NewName => self.set_focus(Focus::NewName),
            Hit::AddButton => self.add_param(now_ms),
        }
    }

    // -------------------------------------------------------------------
    // Status messages
    // -------------------------------------------------------------------

    pub fn set_status(&mut self, msg: &str, now_ms: u64) {
        self.status_message = Some((msg.to_string(), now_ms));
        self.status_error = false;
    }

    /// Clear the status message if it has expired relative to `now_ms`.
    pub fn clear_expired_status(&mut self, now_ms: u64) {
        if let Some((_, created)) = &self.status_message {
            if now_ms.saturating_sub(*created) >= self.status_ttl_ms {
                self.status_message = None;
            }
        }
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn status_is_error(&self) -> bool {
        self.status_message.is_some() && self.status_error
    }
}


// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A simplified key event for the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    F(u8),
    Ctrl(char),
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use param_editor_core::persist::MemoryStorage;
    use param_editor_core::types::{Param, Seed};

    fn app() -> App {
        App::new(ParamEditor::from_seed(Seed::sample()), 400)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(Key::Char(ch), 0);
        }
    }

    // --- Focus ---

    #[test]
    fn starts_on_first_value() {
        let app = app();
        assert_eq!(app.focus, Focus::Value(0));
        assert_eq!(app.field.text(), "everyday");
    }

    #[test]
    fn empty_form_starts_on_add_row() {
        let app = App::new(ParamEditor::from_seed(Seed::default()), 400);
        assert_eq!(app.focus, Focus::NewName);
    }

    #[test]
    fn tab_cycles_through_values_and_add_row() {
        let mut app = app();
        app.handle_key(Key::Tab, 0);
        assert_eq!(app.focus, Focus::Value(1));
        app.handle_key(Key::Tab, 0);
        assert_eq!(app.focus, Focus::NewName);
        app.handle_key(Key::Tab, 0);
        assert_eq!(app.focus, Focus::Value(0));
        app.handle_key(Key::BackTab, 0);
        assert_eq!(app.focus, Focus::NewName);
    }

    #[test]
    fn name_field_joins_tab_order_while_editing() {
        let mut app = app();
        app.begin_edit(1);
        assert_eq!(
            app.focus_order(),
            vec![Focus::Value(0), Focus::Name(1), Focus::Value(1), Focus::NewName]
        );
    }

    // --- Values ---

    #[test]
    fn typing_updates_value() {
        let mut app = app();
        app.handle_key(Key::Down, 0);
        app.handle_key(Key::Ctrl('u'), 0);
        type_text(&mut app, "mini");
        assert_eq!(app.editor.value(2), "mini");
    }

    #[test]
    fn backspace_updates_value() {
        let mut app = app();
        app.handle_key(Key::Backspace, 0);
        assert_eq!(app.editor.value(1), "everyda");
    }

    #[test]
    fn cursor_keys_do_not_change_value() {
        let mut app = app();
        app.handle_key(Key::Left, 0);
        app.handle_key(Key::Home, 0);
        app.handle_key(Key::Char('X'), 0);
        assert_eq!(app.editor.value(1), "Xeveryday");
    }

    // --- Adding ---

    #[test]
    fn enter_on_add_row_adds_parameter() {
        let mut app = app();
        app.set_focus(Focus::NewName);
        type_text(&mut app, "Color");
        app.handle_key(Key::Enter, 0);
        assert_eq!(app.editor.params()[2], Param::new(3, "Color"));
        assert_eq!(app.editor.value(3), "");
        assert!(app.field.is_empty());
        assert_eq!(app.status_message(), Some("Added \"Color\""));
    }

    #[test]
    fn add_button_with_empty_name_uses_generated_label() {
        let mut app = app();
        app.click(Hit::AddButton, 0);
        assert_eq!(app.editor.params()[2].name, "Recent parameter 3");
    }

    // --- Renaming ---

    #[test]
    fn f2_edit_type_enter_renames() {
        let mut app = app();
        app.handle_key(Key::F(2), 0);
        assert_eq!(app.focus, Focus::Name(0));
        assert_eq!(app.field.text(), "Purpose");
        app.handle_key(Key::Ctrl('u'), 0);
        type_text(&mut app, "Occasion");
        // Not committed yet.
        assert_eq!(app.editor.params()[0].name, "Purpose");
        app.handle_key(Key::Enter, 0);
        assert_eq!(app.editor.params()[0].name, "Occasion");
        assert!(app.editor.session().is_idle());
        assert_eq!(app.focus, Focus::Value(0));
    }

    #[test]
    fn edit_affordance_saves_when_row_is_editing() {
        let mut app = app();
        app.click(Hit::EditToggle(1), 0);
        type_text(&mut app, "!");
        app.click(Hit::EditToggle(1), 0);
        assert_eq!(app.editor.params()[1].name, "Length!");
        assert!(app.editor.session().is_idle());
    }

    #[test]
    fn switching_rows_abandons_first_edit() {
        let mut app = app();
        app.click(Hit::EditToggle(0), 0);
        type_text(&mut app, " lost");
        app.click(Hit::EditToggle(1), 0);
        assert_eq!(app.focus, Focus::Name(1));
        assert_eq!(app.field.text(), "Length");
        app.handle_key(Key::Enter, 0);
        assert_eq!(app.editor.params()[0].name, "Purpose");
    }

    #[test]
    fn escape_does_not_quit_while_editing() {
        let mut app = app();
        app.handle_key(Key::F(2), 0);
        assert_eq!(app.handle_key(Key::Escape, 0), None);
        assert!(!app.editor.session().is_idle());
        app.handle_key(Key::Enter, 0);
        assert_eq!(app.handle_key(Key::Escape, 0), Some(AppAction::Quit));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        app.handle_key(Key::F(2), 0);
        assert_eq!(app.handle_key(Key::Ctrl('c'), 0), Some(AppAction::Quit));
    }

    // --- Double activation ---

    #[test]
    fn double_click_on_label_begins_edit() {
        let mut app = app();
        app.click(Hit::Name(1), 1000);
        assert!(app.editor.session().is_idle());
        app.click(Hit::Name(1), 1300);
        assert_eq!(app.editor.session().editing_id(), Some(2));
        assert_eq!(app.focus, Focus::Name(1));
    }

    #[test]
    fn slow_clicks_do_not_begin_edit() {
        let mut app = app();
        app.click(Hit::Name(1), 1000);
        app.click(Hit::Name(1), 1500);
        assert!(app.editor.session().is_idle());
    }

    #[test]
    fn clicks_on_different_labels_do_not_begin_edit() {
        let mut app = app();
        app.click(Hit::Name(0), 1000);
        app.click(Hit::Name(1), 1100);
        assert!(app.editor.session().is_idle());
    }

    // --- Persistence ---

    #[test]
    fn persisted_app_writes_through() {
        let storage = MemoryStorage::new();
        let seed = Seed::sample();
        let (editor, written) =
            ParamEditor::with_storage(seed.params, seed.model, Box::new(storage.clone()));
        written.unwrap();
        let mut app = App::new(editor, 400);
        app.handle_key(Key::Char('!'), 0);

        let (reloaded, _) =
            ParamEditor::with_storage(Vec::new(), Default::default(), Box::new(storage));
        assert_eq!(reloaded.value(1), "everyday!");
    }

    #[test]
    fn add_with_no_id_left_shows_error() {
        let editor = ParamEditor::new(vec![Param::new(u32::MAX, "big")], Default::default());
        let mut app = App::new(editor, 400);
        app.set_focus(Focus::NewName);
        app.handle_key(Key::Char('x'), 0);
        app.handle_key(Key::Enter, 0);
        assert_eq!(app.editor.params().len(), 1);
        assert!(app.status_is_error());
        assert!(app.status_message().is_some_and(|m| m.starts_with("Cannot add")));
        assert_eq!(app.field.text(), "x");
    }

    // --- Status ---

    #[test]
    fn status_expires() {
        let mut app = app();
        app.set_status("hello", 1000);
        app.clear_expired_status(2000);
        assert_eq!(app.status_message(), Some("hello"));
        app.clear_expired_status(5000);
        assert_eq!(app.status_message(), None);
    }
}
