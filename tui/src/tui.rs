//! TUI runner — ratatui event loop with terminal setup and cleanup.
//!
//! The [`Tui`] struct owns the ratatui terminal, the form state machine
//! ([`App`]) and the active [`Theme`]. It draws frames, turns crossterm key
//! and mouse events into [`Key`]s and [`Hit`]s, and expires status messages.

use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::app::{App, AppAction, Key};
use crate::form::{self, FormLayout};
use crate::theme::Theme;


/// The terminal form runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    theme: Theme,
    tick_rate: Duration,
    /// Layout of the last drawn frame, used for mouse hit-testing.
    layout: Option<FormLayout>,
}


impl Tui {
    /// Create a new TUI, entering raw mode, the alternate screen and mouse
    /// capture.
    pub fn new(app: App, theme: Theme) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            app,
            theme,
            tick_rate: Duration::from_millis(250),
            layout: None,
        })
    }

    /// Run the event loop until quit is requested.
    pub fn run(&mut self) -> Result<(), io::Error> {
        info!(theme = %self.theme.name, "form started");
        loop {
            let app = &self.app;
            let theme = &self.theme;
            let mut drawn = None;
            self.terminal.draw(|frame| {
                let layout = FormLayout::compute(frame.area());
                form::render_form(frame, &layout, app, theme);
                drawn = Some(layout);
            })?;
            self.layout = drawn;

            if event::poll(self.tick_rate)? {
                let quit = match event::read()? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        let key = crossterm_to_key(key_event.code, key_event.modifiers);
                        self.app.handle_key(key, now_ms()) == Some(AppAction::Quit)
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        false
                    }
                    _ => false,
                };
                if quit {
                    break;
                }
            }

            self.app.clear_expired_status(now_ms());
        }

        info!("form closed");
        self.shutdown()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(layout) = self.layout else {
            return;
        };
        let offset = form::scroll_offset(&self.app, &layout);
        let total = self.app.editor.params().len();
        if let Some(hit) = form::hit_test(&layout, offset, total, mouse.column, mouse.row) {
            debug!(?hit, "click");
            self.app.click(hit, now_ms());
        }
    }

    /// Restore the terminal to its normal state.
    fn shutdown(&mut self) -> Result<(), io::Error> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}


impl Drop for Tui {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
    }
}


/// Wall-clock milliseconds, the time base for status messages and clicks.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}


// ---------------------------------------------------------------------------
// Key conversion
// ---------------------------------------------------------------------------

/// Convert a crossterm `KeyCode` + `KeyModifiers` into the form's `Key`.
pub fn crossterm_to_key(code: KeyCode, modifiers: KeyModifiers) -> Key {
    if modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(ch) = code {
            return Key::Ctrl(ch.to_ascii_lowercase());
        }
    }
    match code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::F(n) => Key::F(n),
        _ => Key::Char('\0'), // unmapped keys produce a null char
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossterm_char_to_key() {
        let key = crossterm_to_key(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(key, Key::Char('a'));
    }

    #[test]
    fn crossterm_shifted_char_stays_char() {
        let key = crossterm_to_key(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key, Key::Char('A'));
    }

    #[test]
    fn crossterm_ctrl_to_key() {
        assert_eq!(
            crossterm_to_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Key::Ctrl('c')
        );
        assert_eq!(
            crossterm_to_key(KeyCode::Char('E'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            Key::Ctrl('e')
        );
    }

    #[test]
    fn crossterm_tab_variants() {
        assert_eq!(crossterm_to_key(KeyCode::Tab, KeyModifiers::NONE), Key::Tab);
        assert_eq!(crossterm_to_key(KeyCode::BackTab, KeyModifiers::SHIFT), Key::BackTab);
        assert_eq!(crossterm_to_key(KeyCode::Tab, KeyModifiers::SHIFT), Key::BackTab);
    }

    #[test]
    fn crossterm_function_key_to_key() {
        assert_eq!(crossterm_to_key(KeyCode::F(2), KeyModifiers::NONE), Key::F(2));
    }

    #[test]
    fn crossterm_navigation_keys() {
        assert_eq!(crossterm_to_key(KeyCode::Up, KeyModifiers::NONE), Key::Up);
        assert_eq!(crossterm_to_key(KeyCode::Down, KeyModifiers::NONE), Key::Down);
        assert_eq!(crossterm_to_key(KeyCode::Home, KeyModifiers::NONE), Key::Home);
        assert_eq!(crossterm_to_key(KeyCode::End, KeyModifiers::NONE), Key::End);
        assert_eq!(crossterm_to_key(KeyCode::Esc, KeyModifiers::NONE), Key::Escape);
    }

    #[test]
    fn unmapped_key_is_null_char() {
        let key = crossterm_to_key(KeyCode::Insert, KeyModifiers::NONE);
        assert_eq!(key, Key::Char('\0'));
    }
}
