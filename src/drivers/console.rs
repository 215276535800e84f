use std::io;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};

use super::InputDriver;

/// Reads events straight from the controlling terminal.
#[derive(Debug, Default)]
pub struct ConsoleDriver {
    mouse_capture: bool,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw mode, alternate screen and mouse capture.
    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.set_mouse_capture(true)
    }

    /// Undo [`Self::enter`]. Runs every step even if an earlier one fails.
    pub fn exit(&mut self) -> io::Result<()> {
        let capture = self.set_mouse_capture(false);
        let screen = execute!(io::stdout(), LeaveAlternateScreen);
        let raw = terminal::disable_raw_mode();
        capture.and(screen).and(raw)
    }
}

impl InputDriver for ConsoleDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        crossterm::event::read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled == self.mouse_capture {
            return Ok(());
        }
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)?;
        } else {
            execute!(io::stdout(), DisableMouseCapture)?;
        }
        self.mouse_capture = enabled;
        Ok(())
    }
}
