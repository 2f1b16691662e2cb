use crate::direction::Direction;

/// One character cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The fixed rectangular playing boundary, derived once from the grid
/// dimensions and never mutated. The border ring occupies the boundary
/// coordinates themselves; the playable interior is everything strictly
/// inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub columns: u16,
    pub rows: u16,
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Frame {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            top: 0,
            bottom: i32::from(rows) - 1,
            left: 0,
            right: i32::from(columns) - 1,
        }
    }

    pub fn center(&self) -> Position {
        Position::new(i32::from(self.columns) / 2, i32::from(self.rows) / 2)
    }

    /// True iff the position sits on one of the four boundary coordinates.
    pub fn is_boundary(&self, pos: Position) -> bool {
        pos.x == self.left || pos.x == self.right || pos.y == self.top || pos.y == self.bottom
    }

    /// Number of playable interior cells; bounds the body arena.
    pub fn interior_area(&self) -> usize {
        usize::from(self.columns.saturating_sub(2)) * usize::from(self.rows.saturating_sub(2))
    }
}
