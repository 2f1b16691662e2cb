use crate::direction::Direction;
use crate::frame::{Frame, Position};
use crate::{GameError, GameResult};

/// One occupied cell, linked toward the tail (`next`) and toward the head
/// (`prev`). Slots are addressed by arena index and never leak outside the
/// `Body`.
#[derive(Debug, Clone)]
struct Segment {
    pos: Position,
    next: Option<usize>,
    prev: Option<usize>,
}

/// Outcome of one advance: the cell the new head occupies and, when the
/// body translated instead of growing, the cell the old tail vacated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub new_head: Position,
    pub freed_tail: Option<Position>,
}

/// Doubly-linked positional chain backed by an arena of slots.
///
/// A `Body` is constructed with its first segment already in place, so the
/// empty chain is unrepresentable and every head/tail read is total. The
/// arena is capped at the playable interior area; steady-state movement
/// relinks the tail slot in place and never allocates.
#[derive(Debug)]
pub struct Body {
    slots: Vec<Segment>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    length: usize,
    capacity: usize,
}

impl Body {
    pub fn new(start: Position, capacity: usize) -> Self {
        Self {
            slots: vec![Segment {
                pos: start,
                next: None,
                prev: None,
            }],
            free: Vec::new(),
            head: 0,
            tail: 0,
            length: 1,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn head_position(&self) -> Position {
        self.slots[self.head].pos
    }

    pub fn tail_position(&self) -> Position {
        self.slots[self.tail].pos
    }

    fn alloc(&mut self, pos: Position) -> GameResult<usize> {
        if self.length == self.capacity {
            return Err(GameError::ArenaExhausted(self.length));
        }
        let slot = Segment {
            pos,
            next: None,
            prev: None,
        };
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = slot;
                Ok(index)
            }
            None => {
                self.slots.push(slot);
                Ok(self.slots.len() - 1)
            }
        }
    }

    /// Link a new segment after the current tail.
    pub fn append(&mut self, pos: Position) -> GameResult<()> {
        let index = self.alloc(pos)?;
        self.slots[index].prev = Some(self.tail);
        self.slots[self.tail].next = Some(index);
        self.tail = index;
        self.length += 1;
        Ok(())
    }

    /// Prepend a new head one cell ahead of the current one; the body grows
    /// by one segment.
    pub fn advance_and_grow(&mut self, direction: Direction) -> GameResult<Advance> {
        let new_head = self.head_position().step(direction);
        let index = self.alloc(new_head)?;
        self.slots[index].next = Some(self.head);
        self.slots[self.head].prev = Some(index);
        self.head = index;
        self.length += 1;
        Ok(Advance {
            new_head,
            freed_tail: None,
        })
    }

    /// Move the body one cell in `direction` without changing its length.
    /// The tail slot is relinked as the new head, so the whole update is one
    /// in-place operation with no allocation and no failure path.
    pub fn advance_and_translate(&mut self, direction: Direction) -> Advance {
        let new_head = self.head_position().step(direction);

        if self.length == 1 {
            let freed = self.slots[self.head].pos;
            self.slots[self.head].pos = new_head;
            return Advance {
                new_head,
                freed_tail: Some(freed),
            };
        }

        let moved = self.tail;
        let freed = self.slots[moved].pos;
        if let Some(new_tail) = self.slots[moved].prev {
            self.slots[new_tail].next = None;
            self.tail = new_tail;
        }

        self.slots[moved].pos = new_head;
        self.slots[moved].prev = None;
        self.slots[moved].next = Some(self.head);
        self.slots[self.head].prev = Some(moved);
        self.head = moved;

        Advance {
            new_head,
            freed_tail: Some(freed),
        }
    }

    /// True iff the head sits on one of the frame's boundary coordinates.
    pub fn collides_with_frame(&self, frame: &Frame) -> bool {
        frame.is_boundary(self.head_position())
    }

    /// Walk head -> tail via the next-links.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let mut cursor = Some(self.head);
        std::iter::from_fn(move || {
            let index = cursor?;
            cursor = self.slots[index].next;
            Some(self.slots[index].pos)
        })
    }

    /// Walk tail -> head via the prev-links.
    pub fn positions_rev(&self) -> impl Iterator<Item = Position> + '_ {
        let mut cursor = Some(self.tail);
        std::iter::from_fn(move || {
            let index = cursor?;
            cursor = self.slots[index].prev;
            Some(self.slots[index].pos)
        })
    }
}
