use crate::frame::Position;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::sync::Arc;

use crate::direction::{Direction, DirectionCell};

/// Lifecycle of one game run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
    ShuttingDown,
}

impl GameState {
    fn as_u8(self) -> u8 {
        match self {
            GameState::Playing => 0,
            GameState::GameOver => 1,
            GameState::ShuttingDown => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => GameState::Playing,
            1 => GameState::GameOver,
            _ => GameState::ShuttingDown,
        }
    }
}

impl From<GameState> for serpent_config::EndState {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Playing => serpent_config::EndState::Playing,
            GameState::GameOver => serpent_config::EndState::GameOver,
            GameState::ShuttingDown => serpent_config::EndState::ShuttingDown,
        }
    }
}

/// The state tag, always replaced as a whole. The Playing -> GameOver edge
/// goes through a compare-exchange so that a collision tick and the
/// force-game-over key cannot both win.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(GameState::Playing.as_u8()))
    }

    pub fn load(&self) -> GameState {
        GameState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn store(&self, state: GameState) {
        self.0.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Attempt the Playing -> GameOver transition. Returns true only for
    /// the context that actually performed it.
    pub fn try_end_game(&self) -> bool {
        self.0
            .compare_exchange(
                GameState::Playing.as_u8(),
                GameState::GameOver.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Last rendered head position, packed into one word so the keystroke
/// context reads a coherent pair.
#[derive(Debug)]
pub struct HeadCell(AtomicU32);

impl HeadCell {
    pub fn new(pos: Position) -> Self {
        Self(AtomicU32::new(Self::pack(pos)))
    }

    fn pack(pos: Position) -> u32 {
        ((pos.x as u32) << 16) | (pos.y as u32 & 0xFFFF)
    }

    pub fn load(&self) -> Position {
        let packed = self.0.load(Ordering::SeqCst);
        Position::new((packed >> 16) as i32, (packed & 0xFFFF) as i32)
    }

    pub fn store(&self, pos: Position) {
        self.0.store(Self::pack(pos), Ordering::SeqCst);
    }
}

/// Handle for an armed periodic notification. Cloning shares the underlying
/// flag; disarming makes every clone inert, so a callback invoked after
/// cancellation observes the disarmed flag and does nothing.
#[derive(Debug, Clone)]
pub struct TimerHandle(Arc<AtomicBool>);

impl TimerHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn disarmed() -> Self {
        let handle = Self::new();
        handle.disarm();
        handle
    }

    pub fn is_armed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn disarm(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide values touched from both execution contexts. Each one
/// is updated via a single indivisible operation; there is no lock here.
#[derive(Debug)]
pub struct SharedCells {
    pub direction: DirectionCell,
    pub state: StateCell,
    pub head: HeadCell,
}

impl SharedCells {
    pub fn new(direction: Direction, head: Position) -> Self {
        Self {
            direction: DirectionCell::new(direction),
            state: StateCell::new(),
            head: HeadCell::new(head),
        }
    }
}
