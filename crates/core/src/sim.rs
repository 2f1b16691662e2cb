use crate::render::{Attribute, BLANK_GLYPH};
use crate::shared::TimerHandle;
use crate::{EventSource, GameError, GameResult, GridSurface, InputSource, KeyCode, Platform};
use std::collections::VecDeque;
use std::time::Duration;

/// In-memory console platform for tests and headless scenario replay:
/// a cell buffer standing in for the grid, a scripted key queue, and
/// recorders for the timer and shutdown services.
#[derive(Debug)]
pub struct SimConsole {
    columns: u16,
    rows: u16,
    cells: Vec<char>,
    attribute: Attribute,
    clear_count: u32,
    keys: VecDeque<KeyCode>,
    armed_interval: Option<Duration>,
    cancel_count: u32,
    shutdown_requests: u32,
    fail_dimension_query: bool,
}

impl SimConsole {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            cells: vec![BLANK_GLYPH; usize::from(columns) * usize::from(rows)],
            attribute: Attribute::WHITE,
            clear_count: 0,
            keys: VecDeque::new(),
            armed_interval: None,
            cancel_count: 0,
            shutdown_requests: 0,
            fail_dimension_query: false,
        }
    }

    /// Same console, but the dimension query reports a failure, forcing the
    /// manifest-geometry fallback path.
    pub fn with_failing_dimensions(columns: u16, rows: u16) -> Self {
        let mut console = Self::new(columns, rows);
        console.fail_dimension_query = true;
        console
    }

    pub fn push_key(&mut self, key: KeyCode) {
        self.keys.push_back(key);
    }

    pub fn push_keys(&mut self, keys: &[KeyCode]) {
        self.keys.extend(keys.iter().copied());
    }

    pub fn glyph_at(&self, col: u16, row: u16) -> char {
        self.cells[usize::from(row) * usize::from(self.columns) + usize::from(col)]
    }

    pub fn row_text(&self, row: u16) -> String {
        (0..self.columns).map(|col| self.glyph_at(col, row)).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.rows).any(|row| self.row_text(row).contains(needle))
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn clear_count(&self) -> u32 {
        self.clear_count
    }

    pub fn armed_interval(&self) -> Option<Duration> {
        self.armed_interval
    }

    pub fn cancel_count(&self) -> u32 {
        self.cancel_count
    }

    pub fn shutdown_requests(&self) -> u32 {
        self.shutdown_requests
    }
}

impl GridSurface for SimConsole {
    fn dimensions(&self) -> GameResult<(u16, u16)> {
        if self.fail_dimension_query {
            return Err(GameError::DimensionQuery("mode query unsupported".into()));
        }
        Ok((self.columns, self.rows))
    }

    fn clear(&mut self) -> GameResult<()> {
        self.cells.fill(BLANK_GLYPH);
        self.clear_count += 1;
        Ok(())
    }

    fn set_attribute(&mut self, attribute: Attribute) -> GameResult<()> {
        self.attribute = attribute;
        Ok(())
    }

    fn write_glyph(&mut self, col: u16, row: u16, glyph: char) -> GameResult<()> {
        if col >= self.columns || row >= self.rows {
            return Err(GameError::Surface(format!(
                "write at ({}, {}) outside {}x{} grid",
                col, row, self.columns, self.rows
            )));
        }
        self.cells[usize::from(row) * usize::from(self.columns) + usize::from(col)] = glyph;
        Ok(())
    }
}

impl InputSource for SimConsole {
    fn read_key(&mut self) -> GameResult<KeyCode> {
        self.keys.pop_front().ok_or(GameError::InputClosed)
    }
}

impl EventSource for SimConsole {
    fn arm_periodic(&mut self, interval: Duration) -> GameResult<TimerHandle> {
        self.armed_interval = Some(interval);
        Ok(TimerHandle::new())
    }

    fn cancel_periodic(&mut self, handle: &TimerHandle) -> GameResult<()> {
        handle.disarm();
        self.cancel_count += 1;
        Ok(())
    }
}

impl Platform for SimConsole {
    fn request_shutdown(&mut self) -> GameResult<()> {
        self.shutdown_requests += 1;
        Ok(())
    }
}
