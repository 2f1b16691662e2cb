use crate::body::Body;
use crate::direction::{propose_turn, Direction};
use crate::frame::{Frame, Position};
use crate::render;
use crate::shared::{GameState, SharedCells, TimerHandle};
use crate::{GameResult, InputSource, KeyCode, Platform};
use serpent_config::GameManifest;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// What the polling loop should do after a keystroke was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrowthPolicy {
    /// Drop the tail every tick; the body only ever translates.
    Translate,
    /// Keep the tail every Nth tick, growing by one segment.
    GrowEvery(u32),
}

/// The game loop controller: owns the body and the platform, and exposes
/// the two entry points the two execution contexts run through.
///
/// `on_tick` belongs to the periodic context, `on_key` to the polling
/// context. In a threaded host the `Game` sits behind a mutex that plays
/// the role of the firmware priority bracket; the direction, state tag and
/// head position additionally live in single-store atomic cells so neither
/// context ever observes a half-written value.
pub struct Game<P: Platform> {
    pub platform: P,
    pub frame: Frame,
    body: Body,
    shared: Arc<SharedCells>,
    timer: TimerHandle,
    tick_interval: Duration,
    policy: GrowthPolicy,
    ticks: u64,
}

impl<P: Platform> Game<P> {
    /// Query the grid, draw the field, and place the initial one-segment
    /// body at the center. The timer is not armed yet; call `start`.
    pub fn new(mut platform: P, manifest: &GameManifest) -> GameResult<Self> {
        let (columns, rows) = match platform.dimensions() {
            Ok(dims) => dims,
            Err(e) => {
                tracing::warn!(
                    "Grid dimension query failed ({}); falling back to manifest geometry {}x{}",
                    e,
                    manifest.board.columns,
                    manifest.board.rows
                );
                (manifest.board.columns, manifest.board.rows)
            }
        };
        let frame = Frame::new(columns, rows);

        render::draw_field(&mut platform, &frame)?;

        let start = frame.center();
        let body = Body::new(start, frame.interior_area());
        platform.write_glyph(start.x as u16, start.y as u16, render::BLOCK_GLYPH)?;

        let direction = Direction::from(manifest.snake.heading);
        let policy = match manifest.snake.grow_every {
            Some(n) => GrowthPolicy::GrowEvery(n),
            None => GrowthPolicy::Translate,
        };

        tracing::info!(
            "Field {}x{}, start at ({}, {}), tick interval {}ms",
            columns,
            rows,
            start.x,
            start.y,
            manifest.board.tick_ms
        );

        Ok(Self {
            platform,
            frame,
            body,
            shared: Arc::new(SharedCells::new(direction, start)),
            timer: TimerHandle::disarmed(),
            tick_interval: Duration::from_millis(manifest.board.tick_ms),
            policy,
            ticks: 0,
        })
    }

    /// Arm the periodic notification.
    pub fn start(&mut self) -> GameResult<()> {
        self.timer = self.platform.arm_periodic(self.tick_interval)?;
        Ok(())
    }

    pub fn state(&self) -> GameState {
        self.shared.state.load()
    }

    pub fn direction(&self) -> Direction {
        self.shared.direction.load()
    }

    pub fn head(&self) -> Position {
        self.body.head_position()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn timer_handle(&self) -> TimerHandle {
        self.timer.clone()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Periodic-context entry point: advance the body one cell and redraw
    /// the delta, or end the game on a boundary hit. A tick delivered after
    /// cancellation, or outside `Playing`, is a no-op.
    pub fn on_tick(&mut self) -> GameResult<()> {
        if !self.timer.is_armed() || self.shared.state.load() != GameState::Playing {
            return Ok(());
        }

        self.ticks += 1;
        let direction = self.shared.direction.load();

        let advance = match self.policy {
            GrowthPolicy::GrowEvery(n) if self.ticks % u64::from(n) == 0 => {
                self.body.advance_and_grow(direction)?
            }
            _ => self.body.advance_and_translate(direction),
        };

        if self.body.collides_with_frame(&self.frame) {
            return self.game_over();
        }

        render::draw_advance(&mut self.platform, &advance)?;
        self.shared.head.store(advance.new_head);
        Ok(())
    }

    /// Polling-context entry point.
    pub fn on_key(&mut self, key: KeyCode) -> GameResult<LoopControl> {
        match key {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                let cursor = self.shared.head.load();
                let current = self.shared.direction.load();
                let next = propose_turn(cursor, current, key, &self.frame);
                self.shared.direction.store(next);
                tracing::debug!("Key {:?} -> heading {:?}", key, next);
                Ok(LoopControl::Continue)
            }
            KeyCode::Escape => {
                self.shared.state.store(GameState::ShuttingDown);
                self.timer.disarm();
                self.platform.request_shutdown()?;
                Ok(LoopControl::Shutdown)
            }
            KeyCode::ForceGameOver => {
                self.game_over()?;
                Ok(LoopControl::Continue)
            }
            KeyCode::Printable(_) | KeyCode::Other => Ok(LoopControl::Continue),
        }
    }

    fn game_over(&mut self) -> GameResult<()> {
        // First transition wins: a force key racing a collision tick must
        // not cancel twice or redraw the banner.
        if !self.shared.state.try_end_game() {
            return Ok(());
        }

        self.platform.cancel_periodic(&self.timer)?;
        self.timer.disarm();
        render::draw_game_over(&mut self.platform, &self.frame)?;
        tracing::info!(
            "Game over after {} ticks, body length {}",
            self.ticks,
            self.body.len()
        );
        Ok(())
    }
}

/// The blocking polling loop. Runs until Escape is handled or the input
/// source closes; the periodic context may run any number of ticks while
/// this sits in `read_key`.
pub fn run_input_loop<P: Platform, I: InputSource>(
    game: &Mutex<Game<P>>,
    input: &mut I,
) -> GameResult<()> {
    loop {
        let key = input.read_key()?;
        let mut game = game.lock().unwrap_or_else(PoisonError::into_inner);
        if game.on_key(key)? == LoopControl::Shutdown {
            return Ok(());
        }
    }
}
