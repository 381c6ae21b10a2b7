use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::cell::Cell;
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use crate::input::{Key, KeySource};
use crate::syntax::Highlight;
use crate::view::{Frame, Renderer};

/// Rows below the text area: status line and command line
const RESERVED_ROWS: u16 = 2;

/// Terminal handler responsible for rendering
pub struct Terminal {
    stdout: Stdout,
    /// (width, height), updated by [`TerminalKeys`] on resize
    size: Rc<Cell<(u16, u16)>>,
}

impl Terminal {
    pub fn new() -> anyhow::Result<Self> {
        let mut stdout = io::stdout();

        // Enter raw mode and alternate screen
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        let (width, height) = terminal::size()?;
        tracing::debug!("Terminal size {}x{}", width, height);

        Ok(Self {
            stdout,
            size: Rc::new(Cell::new((width, height))),
        })
    }

    /// Get terminal size
    pub fn size(&self) -> (u16, u16) {
        self.size.get()
    }

    /// Keystroke source for this terminal, waiting at most `poll_timeout` per read
    pub fn keys(&self, poll_timeout: Duration) -> TerminalKeys {
        TerminalKeys {
            size: Rc::clone(&self.size),
            poll_timeout,
        }
    }

    fn render_line(&mut self, line: &str, highlights: &[Highlight]) -> anyhow::Result<()> {
        for (col, ch) in line.chars().take(self.size().0 as usize).enumerate() {
            let (fg, bg) = style_at(highlights, col);
            if let Some(bg) = bg {
                queue!(self.stdout, SetBackgroundColor(bg))?;
            }
            if let Some(fg) = fg {
                queue!(self.stdout, SetForegroundColor(fg))?;
            }
            queue!(self.stdout, Print(ch))?;
            if fg.is_some() || bg.is_some() {
                queue!(self.stdout, ResetColor)?;
            }
        }
        Ok(())
    }

    fn render_status_line(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        let width = self.size().0 as usize;
        let left = format!(" {} ", frame.status);
        let right = format!(" {} ", frame.status_right);
        let padding = width.saturating_sub(left.chars().count() + right.chars().count());

        queue!(
            self.stdout,
            SetBackgroundColor(frame.status_color),
            SetForegroundColor(Color::Black),
            Print(&left),
            SetBackgroundColor(Color::DarkGrey),
            SetForegroundColor(Color::White),
            Print(format!("{:padding$}{}", "", right, padding = padding)),
            ResetColor,
        )?;
        Ok(())
    }

    fn render_command_line(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        queue!(self.stdout, Print("\r\n"), terminal::Clear(ClearType::CurrentLine))?;

        if let Some(input) = &frame.command_line {
            queue!(self.stdout, Print(format!(":{}", input)))?;
        } else if let Some(msg) = frame.message {
            queue!(self.stdout, Print(msg))?;
        }
        Ok(())
    }

    fn place_cursor(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        let position = match &frame.command_line {
            Some(input) => Some((self.text_rows() + 1, input.chars().count() + 1)),
            None => frame.cursor,
        };

        match position {
            Some((row, col)) => queue!(
                self.stdout,
                cursor::MoveTo(clamp_u16(col), clamp_u16(row)),
                cursor::Show
            )?,
            None => queue!(self.stdout, cursor::Hide)?,
        }
        Ok(())
    }
}

/// Style of the last highlight covering `col`
fn style_at(highlights: &[Highlight], col: usize) -> (Option<Color>, Option<Color>) {
    highlights
        .iter()
        .rev()
        .find(|h| col >= h.column && col < h.column + h.length)
        .map(|h| (Some(h.fg), h.bg))
        .unwrap_or((None, None))
}

fn clamp_u16(value: usize) -> u16 {
    value.min(u16::MAX as usize) as u16
}

impl Renderer for Terminal {
    fn text_rows(&self) -> usize {
        self.size().1.saturating_sub(RESERVED_ROWS).max(1) as usize
    }

    /// Render a frame to the terminal
    fn draw(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        queue!(self.stdout, cursor::Hide, cursor::MoveTo(0, 0))?;

        let text_rows = self.text_rows();
        for row in 0..text_rows {
            if let Some(line) = frame.lines.get(row) {
                let highlights = frame.highlights.get(row).map(Vec::as_slice).unwrap_or(&[]);
                self.render_line(line, highlights)?;
            } else {
                // Empty line indicator
                queue!(
                    self.stdout,
                    SetForegroundColor(Color::Blue),
                    Print("~"),
                    ResetColor
                )?;
            }

            // Clear to end of line and move to next
            queue!(self.stdout, terminal::Clear(ClearType::UntilNewLine), Print("\r\n"))?;
        }

        self.render_status_line(frame)?;
        self.render_command_line(frame)?;
        self.place_cursor(frame)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Reads keystrokes from the terminal's event queue
pub struct TerminalKeys {
    size: Rc<Cell<(u16, u16)>>,
    poll_timeout: Duration,
}

impl KeySource for TerminalKeys {
    /// Wait up to the poll timeout for one keystroke.
    ///
    /// A resize is absorbed here: the new size is stored and `None` is returned
    /// so the next draw uses it.
    fn read(&mut self) -> anyhow::Result<Option<Key>> {
        if !event::poll(self.poll_timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                Ok(Some(Key::from(key_event)))
            }
            Event::Resize(width, height) => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
                self.size.set((width, height));
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = execute!(
            self.stdout,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
