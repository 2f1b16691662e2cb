use crate::frame::{Frame, Position};
use crate::KeyCode;
use std::sync::atomic::{AtomicU8, Ordering};

/// Heading of the body, a unit vector on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }
}

impl From<serpent_config::Heading> for Direction {
    fn from(heading: serpent_config::Heading) -> Self {
        match heading {
            serpent_config::Heading::Up => Direction::Up,
            serpent_config::Heading::Down => Direction::Down,
            serpent_config::Heading::Left => Direction::Left,
            serpent_config::Heading::Right => Direction::Right,
        }
    }
}

/// The current heading, shared between the keystroke context (writer) and
/// the tick context (reader). The whole vector is replaced in a single
/// store; no field-by-field update exists.
#[derive(Debug)]
pub struct DirectionCell(AtomicU8);

impl DirectionCell {
    pub fn new(direction: Direction) -> Self {
        Self(AtomicU8::new(direction.as_u8()))
    }

    pub fn load(&self) -> Direction {
        Direction::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn store(&self, direction: Direction) {
        self.0.store(direction.as_u8(), Ordering::SeqCst);
    }
}

/// Map a directional key to a new heading, discarding turns that point
/// straight into an adjacent boundary cell. Anything that is not a
/// directional key leaves the heading unchanged.
///
/// `cursor` is the last rendered head position, not the next one. Note that
/// this deliberately does not reject a 180-degree reversal into the body's
/// own neck; only literal frame-edge turns are filtered.
pub fn propose_turn(
    cursor: Position,
    current: Direction,
    key: KeyCode,
    frame: &Frame,
) -> Direction {
    let requested = match key {
        KeyCode::Up => Direction::Up,
        KeyCode::Down => Direction::Down,
        KeyCode::Left => Direction::Left,
        KeyCode::Right => Direction::Right,
        _ => return current,
    };

    if frame.is_boundary(cursor.step(requested)) {
        current
    } else {
        requested
    }
}
