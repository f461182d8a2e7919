#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII-based terminal lifecycle management that guarantees cleanup even on
//! panic. The session owns raw-mode entry/exit and tracks every terminal
//! state change it makes.
//!
//! # Lifecycle Guarantees
//!
//! 1. Each mode (raw, alt-screen, mouse, bracketed paste, focus events) has
//!    a corresponding tracking flag; only modes actually enabled are
//!    disabled again.
//! 2. Drop restores previous state in reverse order of enabling.
//! 3. Because cleanup lives in [`Drop`], it runs during panic unwinding.
//!
//! # Cleanup Order
//!
//! 1. Disable focus events (if enabled)
//! 2. Disable bracketed paste (if enabled)
//! 3. Disable mouse capture (if enabled)
//! 4. Show cursor (always)
//! 5. Leave alternate screen (if enabled)
//! 6. Exit raw mode (always)
//! 7. Flush stdout

use std::io::{self, Write};
use std::time::Duration;

use crate::event::Event;

/// Terminal session configuration.
///
/// All options default to `false`; a full-screen application enables the
/// alternate screen and mouse capture.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Switch to the alternate screen buffer, preserving scrollback.
    pub alternate_screen: bool,
    /// Enable SGR mouse capture.
    pub mouse_capture: bool,
    /// Wrap pasted text in bracketed-paste markers.
    pub bracketed_paste: bool,
    /// Report terminal focus gained/lost.
    pub focus_events: bool,
}

impl SessionOptions {
    /// Options for a full-screen application with mouse support.
    pub fn full_screen() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: true,
            bracketed_paste: true,
            focus_events: false,
        }
    }
}

/// A terminal session that manages raw mode and cleanup.
///
/// Only one `TerminalSession` should exist at a time; creating a second one
/// while the first is alive leaves the terminal in an unspecified state.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
    bracketed_paste_enabled: bool,
    focus_events_enabled: bool,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested features.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled. Failure to enable an
    /// optional feature is also an error; modes enabled before the failure
    /// are rolled back by the drop guard.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;

        let mut session = Self {
            options: options.clone(),
            alternate_screen_enabled: false,
            mouse_enabled: false,
            bracketed_paste_enabled: false,
            focus_events_enabled: false,
        };

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
        }
        if options.mouse_capture {
            crossterm::execute!(stdout, crossterm::event::EnableMouseCapture)?;
            session.mouse_enabled = true;
        }
        if options.bracketed_paste {
            crossterm::execute!(stdout, crossterm::event::EnableBracketedPaste)?;
            session.bracketed_paste_enabled = true;
        }
        if options.focus_events {
            crossterm::execute!(stdout, crossterm::event::EnableFocusChange)?;
            session.focus_events_enabled = true;
        }

        Ok(session)
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Poll for an event with a timeout.
    ///
    /// Returns `Ok(true)` when an event is available, `Ok(false)` on
    /// timeout.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event, blocking until one is available.
    ///
    /// Returns `None` for backend events with no [`Event`] counterpart.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        let raw = crossterm::event::read()?;
        Ok(Event::from_crossterm(raw))
    }

    /// Show the cursor.
    pub fn show_cursor(&self) -> io::Result<()> {
        crossterm::execute!(io::stdout(), crossterm::cursor::Show)
    }

    /// Hide the cursor.
    pub fn hide_cursor(&self) -> io::Result<()> {
        crossterm::execute!(io::stdout(), crossterm::cursor::Hide)
    }

    /// The options this session was created with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Shared between drop and explicit teardown. Errors are ignored;
    /// every step is attempted regardless of earlier failures.
    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.focus_events_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
            self.focus_events_enabled = false;
        }
        if self.bracketed_paste_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableBracketedPaste);
            self.bracketed_paste_enabled = false;
        }
        if self.mouse_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
            self.mouse_enabled = false;
        }

        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }

        let _ = crossterm::terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_is_minimal() {
        let opts = SessionOptions::default();
        assert!(!opts.alternate_screen);
        assert!(!opts.mouse_capture);
        assert!(!opts.bracketed_paste);
        assert!(!opts.focus_events);
    }

    #[test]
    fn full_screen_options_enable_overlay_modes() {
        let opts = SessionOptions::full_screen();
        assert!(opts.alternate_screen);
        assert!(opts.mouse_capture);
        assert!(opts.bracketed_paste);
    }

    // Tests that actually enter raw mode would fight the test runner's
    // terminal, so session setup/teardown is exercised manually.
}
