//! Single-line text field editing.
//!
//! A `TextField` is the cursor-aware buffer behind whichever form field has
//! focus. The app loads it from the field's current text when focus moves
//! and writes the text back after every edit.

use unicode_width::UnicodeWidthChar;

/// A single-line text buffer with a cursor.
///
/// Stored as `Vec<char>` so cursor movement is per character, not per byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    buffer: Vec<char>,
    cursor: usize,
}


impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field holding `text` with the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let mut field = Self::new();
        field.set_text(text);
        field
    }

    /// Replace the contents and move the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.chars().collect();
        self.cursor = self.buffer.len();
    }

    pub fn insert(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Backspace.
    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
    }

    /// Forward delete.
    pub fn delete_forward(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Delete the word before the cursor (Ctrl-W).
    pub fn delete_word_back(&mut self) {
        let end = self.cursor;
        while self.cursor > 0 && !self.buffer[self.cursor - 1].is_alphanumeric() {
            self.cursor -= 1;
        }
        while self.cursor > 0 && self.buffer[self.cursor - 1].is_alphanumeric() {
            self.cursor -= 1;
        }
        self.buffer.drain(self.cursor..end);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Cursor position as a character index.
    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The slice of text to show in a cell `width` columns wide, and the
    /// cursor column within it. Scrolls so the cursor stays visible.
    ///
    /// Widths are terminal display columns, so wide characters count twice.
    pub fn visible(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        // The cursor cell itself needs room: one column at the end of the
        // text, otherwise the width of the character under it.
        let cursor_cell = self.buffer.get(self.cursor).map_or(1, |ch| char_width(*ch).max(1));
        let before: usize = self.buffer[..self.cursor].iter().map(|ch| char_width(*ch)).sum();

        let mut start = 0;
        if before + cursor_cell > width {
            start = self.cursor;
            let mut used = cursor_cell;
            while start > 0 {
                let w = char_width(self.buffer[start - 1]);
                if used + w > width {
                    break;
                }
                used += w;
                start -= 1;
            }
        }

        let mut text = String::new();
        let mut used = 0;
        for ch in &self.buffer[start..] {
            let w = char_width(*ch);
            if used + w > width {
                break;
            }
            used += w;
            text.push(*ch);
        }
        let column = self.buffer[start..self.cursor].iter().map(|ch| char_width(*ch)).sum();
        (text, column)
    }
}


fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_puts_cursor_at_end() {
        let f = TextField::from_text("maxi");
        assert_eq!(f.cursor_pos(), 4);
        assert_eq!(f.text(), "maxi");
    }

    #[test]
    fn insert_in_middle() {
        let mut f = TextField::from_text("mxi");
        f.move_home();
        f.move_right();
        f.insert('a');
        assert_eq!(f.text(), "maxi");
        assert_eq!(f.cursor_pos(), 2);
    }

    #[test]
    fn backspace_and_delete() {
        let mut f = TextField::from_text("mini");
        f.delete_back();
        assert_eq!(f.text(), "min");
        f.move_home();
        f.delete_forward();
        assert_eq!(f.text(), "in");
        f.move_home();
        f.delete_back();
        assert_eq!(f.text(), "in");
    }

    #[test]
    fn multibyte_characters() {
        let mut f = TextField::from_text("макси");
        f.delete_back();
        assert_eq!(f.text(), "макс");
        assert_eq!(f.cursor_pos(), 4);
    }

    #[test]
    fn delete_word_back_stops_at_boundary() {
        let mut f = TextField::from_text("hem length");
        f.delete_word_back();
        assert_eq!(f.text(), "hem ");
        f.delete_word_back();
        assert_eq!(f.text(), "");
    }

    #[test]
    fn cursor_moves_are_clamped() {
        let mut f = TextField::from_text("ab");
        f.move_right();
        assert_eq!(f.cursor_pos(), 2);
        f.move_home();
        f.move_left();
        assert_eq!(f.cursor_pos(), 0);
    }

    #[test]
    fn visible_scrolls_to_cursor() {
        let f = TextField::from_text("abcdefgh");
        let (text, col) = f.visible(4);
        assert_eq!(text, "fgh");
        assert_eq!(col, 3);

        let mut g = TextField::from_text("abcdefgh");
        g.move_home();
        assert_eq!(g.visible(4), ("abcd".to_string(), 0));
    }

    #[test]
    fn visible_counts_wide_chars_as_two_columns() {
        let f = TextField::from_text("日本語");
        assert_eq!(f.visible(10), ("日本語".to_string(), 6));
        assert_eq!(f.visible(4), ("語".to_string(), 2));

        let mut g = TextField::from_text("a日b");
        g.move_home();
        g.move_right();
        g.move_right();
        assert_eq!(g.visible(10), ("a日b".to_string(), 3));
    }

    #[test]
    fn clear_resets() {
        let mut f = TextField::from_text("x");
        f.clear();
        assert!(f.is_empty());
        assert_eq!(f.cursor_pos(), 0);
    }
}
