use crossterm::event::{read, Event, KeyCode as TermKey, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use serpent_core::{
    Attribute, EventSource, GameError, GameResult, GridSurface, InputSource, KeyCode, Platform,
    TimerHandle,
};
use std::io::{stdout, Stdout, Write};
use std::time::Duration;

fn surface_err(e: std::io::Error) -> GameError {
    GameError::Surface(e.to_string())
}

/// Terminal-backed platform: alternate screen in raw mode, one cell per
/// character. Restores the terminal on shutdown or drop.
pub struct TermPlatform {
    stdout: Stdout,
    restored: bool,
}

impl TermPlatform {
    pub fn new() -> anyhow::Result<Self> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        Ok(Self {
            stdout,
            restored: false,
        })
    }

    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        self.restored = true;
    }
}

impl Drop for TermPlatform {
    fn drop(&mut self) {
        self.restore();
    }
}

fn foreground(attribute: Attribute) -> Color {
    if attribute.contains(Attribute::WHITE) {
        Color::White
    } else if attribute.contains(Attribute::FG_RED) {
        Color::Red
    } else if attribute.contains(Attribute::FG_GREEN) {
        Color::Green
    } else if attribute.contains(Attribute::FG_BLUE) {
        Color::Blue
    } else {
        Color::Grey
    }
}

fn background(attribute: Attribute) -> Color {
    if attribute.contains(Attribute::BG_RED) {
        Color::DarkRed
    } else if attribute.contains(Attribute::BG_GREEN) {
        Color::DarkGreen
    } else if attribute.contains(Attribute::BG_BLUE) {
        Color::DarkBlue
    } else {
        Color::Black
    }
}

impl GridSurface for TermPlatform {
    fn dimensions(&self) -> GameResult<(u16, u16)> {
        terminal::size().map_err(|e| GameError::DimensionQuery(e.to_string()))
    }

    fn clear(&mut self) -> GameResult<()> {
        execute!(self.stdout, Clear(ClearType::All)).map_err(surface_err)
    }

    fn set_attribute(&mut self, attribute: Attribute) -> GameResult<()> {
        execute!(
            self.stdout,
            SetForegroundColor(foreground(attribute)),
            SetBackgroundColor(background(attribute))
        )
        .map_err(surface_err)
    }

    fn write_glyph(&mut self, col: u16, row: u16, glyph: char) -> GameResult<()> {
        queue!(self.stdout, cursor::MoveTo(col, row), Print(glyph)).map_err(surface_err)?;
        self.stdout.flush().map_err(surface_err)
    }
}

impl EventSource for TermPlatform {
    fn arm_periodic(&mut self, _interval: Duration) -> GameResult<TimerHandle> {
        // Scheduling lives on the host tick thread; the handle only gates
        // delivery.
        Ok(TimerHandle::new())
    }

    fn cancel_periodic(&mut self, handle: &TimerHandle) -> GameResult<()> {
        handle.disarm();
        Ok(())
    }
}

impl Platform for TermPlatform {
    fn request_shutdown(&mut self) -> GameResult<()> {
        self.restore();
        Ok(())
    }
}

/// Blocking keystroke reader over the terminal event stream.
pub struct TermInput;

impl InputSource for TermInput {
    fn read_key(&mut self) -> GameResult<KeyCode> {
        loop {
            let event = read().map_err(|_| GameError::InputClosed)?;
            let Event::Key(key) = event else { continue };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == TermKey::Char('c') {
                return Ok(KeyCode::Escape);
            }
            return Ok(match key.code {
                TermKey::Up => KeyCode::Up,
                TermKey::Down => KeyCode::Down,
                TermKey::Left => KeyCode::Left,
                TermKey::Right => KeyCode::Right,
                TermKey::Esc => KeyCode::Escape,
                TermKey::F(1) => KeyCode::ForceGameOver,
                TermKey::Char(c) => KeyCode::Printable(c),
                _ => KeyCode::Other,
            });
        }
    }
}
