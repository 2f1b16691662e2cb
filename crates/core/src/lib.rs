pub mod body;
pub mod direction;
pub mod frame;
pub mod game;
pub mod render;
pub mod shared;
pub mod sim;

use std::time::Duration;

mod tests;

pub use body::{Advance, Body};
pub use direction::Direction;
pub use frame::{Frame, Position};
pub use game::{Game, LoopControl};
pub use render::Attribute;
pub use shared::{GameState, TimerHandle};

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Segment arena exhausted at {0} segments")]
    ArenaExhausted(usize),
    #[error("Grid dimension query failed: {0}")]
    DimensionQuery(String),
    #[error("Grid surface write failed: {0}")]
    Surface(String),
    #[error("Periodic timer service failed: {0}")]
    Timer(String),
    #[error("Input source closed")]
    InputClosed,
}

pub type GameResult<T> = Result<T, GameError>;

/// Discriminated keystroke as delivered by the input service. Directional
/// keys and the two designated control keys are meaningful; everything else
/// is carried through and ignored by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Escape,
    /// Designated function key that ends the game without waiting for a
    /// collision (bound to F1 in the terminal frontend).
    ForceGameOver,
    Printable(char),
    Other,
}

impl From<serpent_config::KeyName> for KeyCode {
    fn from(name: serpent_config::KeyName) -> Self {
        match name {
            serpent_config::KeyName::Up => KeyCode::Up,
            serpent_config::KeyName::Down => KeyCode::Down,
            serpent_config::KeyName::Left => KeyCode::Left,
            serpent_config::KeyName::Right => KeyCode::Right,
            serpent_config::KeyName::Escape => KeyCode::Escape,
            serpent_config::KeyName::ForceGameOver => KeyCode::ForceGameOver,
        }
    }
}

/// Trait representing the character-cell console the field is drawn on.
pub trait GridSurface {
    fn dimensions(&self) -> GameResult<(u16, u16)>;
    fn clear(&mut self) -> GameResult<()>;
    fn set_attribute(&mut self, attribute: Attribute) -> GameResult<()>;
    fn write_glyph(&mut self, col: u16, row: u16, glyph: char) -> GameResult<()>;

    fn write_text(&mut self, col: u16, row: u16, text: &str) -> GameResult<()> {
        for (i, glyph) in text.chars().enumerate() {
            self.write_glyph(col + i as u16, row, glyph)?;
        }
        Ok(())
    }
}

/// Trait representing the blocking keystroke service.
pub trait InputSource {
    /// Blocks until the next keystroke arrives. This is the only suspension
    /// point in the polling loop.
    fn read_key(&mut self) -> GameResult<KeyCode>;
}

/// Trait representing the periodic notification service.
pub trait EventSource {
    fn arm_periodic(&mut self, interval: Duration) -> GameResult<TimerHandle>;

    /// Synchronous cancellation: once this returns, the handle is inert and
    /// no further tick is delivered through it.
    fn cancel_periodic(&mut self, handle: &TimerHandle) -> GameResult<()>;
}

/// The full collaborator surface the game loop controller runs against.
pub trait Platform: GridSurface + EventSource {
    fn request_shutdown(&mut self) -> GameResult<()>;
}
