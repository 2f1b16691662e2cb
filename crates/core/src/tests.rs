#[cfg(test)]
mod tests {
    use crate::body::Body;
    use crate::direction::{propose_turn, Direction};
    use crate::frame::{Frame, Position};
    use crate::game::{run_input_loop, Game, LoopControl};
    use crate::render;
    use crate::shared::{GameState, HeadCell, StateCell, TimerHandle};
    use crate::sim::SimConsole;
    use crate::{GameError, GameResult, InputSource, KeyCode};
    use serpent_config::GameManifest;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    fn manifest(columns: u16, rows: u16) -> GameManifest {
        let mut m = GameManifest::default();
        m.board.columns = columns;
        m.board.rows = rows;
        m
    }

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    /// Scripted stand-in for the blocking keystroke service, used to drive
    /// the polling loop without a terminal.
    struct ScriptedInput(VecDeque<KeyCode>);

    impl ScriptedInput {
        fn new(keys: &[KeyCode]) -> Self {
            Self(keys.iter().copied().collect())
        }
    }

    impl InputSource for ScriptedInput {
        fn read_key(&mut self) -> GameResult<KeyCode> {
            self.0.pop_front().ok_or(GameError::InputClosed)
        }
    }

    #[test]
    fn test_body_walks_match_in_reverse() {
        let mut body = Body::new(pos(5, 5), 64);
        body.append(pos(4, 5)).unwrap();
        body.append(pos(3, 5)).unwrap();
        body.append(pos(3, 6)).unwrap();

        assert_eq!(body.len(), 4);

        let forward: Vec<Position> = body.positions().collect();
        let mut backward: Vec<Position> = body.positions_rev().collect();
        backward.reverse();

        assert_eq!(forward.len(), body.len());
        assert_eq!(forward, backward);
        assert_eq!(forward[0], body.head_position());
        assert_eq!(forward[3], body.tail_position());
    }

    #[test]
    fn test_advance_and_grow_extends_by_one() {
        let mut body = Body::new(pos(5, 5), 64);
        body.append(pos(4, 5)).unwrap();
        let before: Vec<Position> = body.positions().collect();

        let advance = body.advance_and_grow(Direction::Right).unwrap();

        assert_eq!(advance.new_head, pos(6, 5));
        assert_eq!(advance.freed_tail, None);
        assert_eq!(body.len(), 3);

        // All prior segments untouched, new head prepended
        let after: Vec<Position> = body.positions().collect();
        assert_eq!(after[0], pos(6, 5));
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn test_advance_and_translate_keeps_length() {
        let mut body = Body::new(pos(5, 5), 64);
        body.append(pos(4, 5)).unwrap();
        body.append(pos(3, 5)).unwrap();

        let advance = body.advance_and_translate(Direction::Down);

        assert_eq!(advance.new_head, pos(5, 6));
        assert_eq!(advance.freed_tail, Some(pos(3, 5)));
        assert_eq!(body.len(), 3);
        assert_eq!(body.head_position(), pos(5, 6));
        assert_eq!(body.tail_position(), pos(4, 5));
        assert!(!body.positions().any(|p| p == pos(3, 5)));
    }

    #[test]
    fn test_translate_single_segment() {
        let mut body = Body::new(pos(5, 5), 64);

        let advance = body.advance_and_translate(Direction::Left);

        assert_eq!(advance.new_head, pos(4, 5));
        assert_eq!(advance.freed_tail, Some(pos(5, 5)));
        assert_eq!(body.len(), 1);
        assert_eq!(body.head_position(), body.tail_position());
    }

    #[test]
    fn test_chain_stays_consistent_under_mixed_advances() {
        let mut body = Body::new(pos(10, 10), 64);
        for i in 0..6 {
            if i % 2 == 0 {
                body.advance_and_grow(Direction::Right).unwrap();
            } else {
                body.advance_and_translate(Direction::Down);
            }
        }

        let forward: Vec<Position> = body.positions().collect();
        let mut backward: Vec<Position> = body.positions_rev().collect();
        backward.reverse();

        assert_eq!(forward.len(), body.len());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_arena_exhaustion_is_an_error() {
        let mut body = Body::new(pos(3, 1), 3);
        body.append(pos(2, 1)).unwrap();
        body.append(pos(1, 1)).unwrap();

        let err = body.append(pos(0, 1)).unwrap_err();
        assert!(matches!(err, GameError::ArenaExhausted(3)));

        let err = body.advance_and_grow(Direction::Right).unwrap_err();
        assert!(matches!(err, GameError::ArenaExhausted(3)));

        // Translation has no allocation and still works at capacity
        let advance = body.advance_and_translate(Direction::Right);
        assert_eq!(body.len(), 3);
        assert_eq!(advance.new_head, pos(4, 1));
        assert_eq!(advance.freed_tail, Some(pos(1, 1)));
    }

    #[test]
    fn test_frame_boundary_predicate() {
        let frame = Frame::new(20, 10);
        assert_eq!(
            (frame.top, frame.bottom, frame.left, frame.right),
            (0, 9, 0, 19)
        );

        for x in 0..20 {
            for y in 0..10 {
                let mut body = Body::new(pos(x, y), 4);
                let expected = x == 0 || x == 19 || y == 0 || y == 9;
                assert_eq!(
                    body.collides_with_frame(&frame),
                    expected,
                    "head at ({}, {})",
                    x,
                    y
                );
                // Appending must not change the head-based query
                body.append(pos(x, y)).unwrap();
                assert_eq!(body.collides_with_frame(&frame), expected);
            }
        }
    }

    #[test]
    fn test_turn_filter_discards_edge_turn() {
        let frame = Frame::new(20, 10);

        // Heading right one cell short of the right boundary: a Right key
        // is silently discarded.
        let kept = propose_turn(pos(18, 5), Direction::Right, KeyCode::Right, &frame);
        assert_eq!(kept, Direction::Right);

        // Same cell, different current heading: still discarded.
        let kept = propose_turn(pos(18, 5), Direction::Down, KeyCode::Right, &frame);
        assert_eq!(kept, Direction::Down);

        // Row adjacent to the top boundary rejects Up.
        let kept = propose_turn(pos(10, 1), Direction::Right, KeyCode::Up, &frame);
        assert_eq!(kept, Direction::Right);
    }

    #[test]
    fn test_turn_filter_accepts_interior_turn_and_is_idempotent() {
        let frame = Frame::new(20, 10);

        let first = propose_turn(pos(10, 5), Direction::Right, KeyCode::Up, &frame);
        let second = propose_turn(pos(10, 5), first, KeyCode::Up, &frame);
        assert_eq!(first, Direction::Up);
        assert_eq!(second, Direction::Up);

        // The filter does not prevent a 180-degree reversal.
        let reversed = propose_turn(pos(10, 5), Direction::Right, KeyCode::Left, &frame);
        assert_eq!(reversed, Direction::Left);
    }

    #[test]
    fn test_turn_filter_ignores_non_directional_keys() {
        let frame = Frame::new(20, 10);
        let kept = propose_turn(pos(10, 5), Direction::Up, KeyCode::Printable('x'), &frame);
        assert_eq!(kept, Direction::Up);
    }

    #[test]
    fn test_state_cell_single_transition() {
        let cell = StateCell::new();
        assert_eq!(cell.load(), GameState::Playing);
        assert!(cell.try_end_game());
        assert!(!cell.try_end_game());
        assert_eq!(cell.load(), GameState::GameOver);
    }

    #[test]
    fn test_head_cell_roundtrip() {
        let cell = HeadCell::new(pos(18, 5));
        assert_eq!(cell.load(), pos(18, 5));
        cell.store(pos(0, 9));
        assert_eq!(cell.load(), pos(0, 9));
    }

    #[test]
    fn test_timer_handle_clones_share_disarm() {
        let handle = TimerHandle::new();
        let clone = handle.clone();
        assert!(clone.is_armed());
        handle.disarm();
        assert!(!clone.is_armed());
    }

    #[test]
    fn test_new_game_draws_field_and_head() {
        let game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();

        let sim = &game.platform;
        assert_eq!(sim.attribute(), render::FIELD_ATTRIBUTE);
        assert_eq!(sim.clear_count(), 1);

        // Border ring on the boundary cells, head block at the center
        assert_eq!(sim.glyph_at(0, 0), render::BLOCK_GLYPH);
        assert_eq!(sim.glyph_at(19, 9), render::BLOCK_GLYPH);
        assert_eq!(sim.glyph_at(0, 5), render::BLOCK_GLYPH);
        assert_eq!(sim.glyph_at(10, 5), render::BLOCK_GLYPH);
        assert_eq!(sim.glyph_at(10, 4), render::BLANK_GLYPH);

        assert_eq!(game.head(), pos(10, 5));
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_dimension_query_fallback_uses_manifest() {
        let sim = SimConsole::with_failing_dimensions(30, 12);
        // The sim grid is larger than the manifest board; the frame must
        // come from the manifest when the query fails.
        let game = Game::new(sim, &manifest(20, 10)).unwrap();
        assert_eq!((game.frame.columns, game.frame.rows), (20, 10));
        assert_eq!(game.head(), pos(10, 5));
    }

    #[test]
    fn test_scenario_a_five_ticks_heading_right() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();
        assert_eq!(
            game.platform.armed_interval(),
            Some(Duration::from_millis(90))
        );

        for _ in 0..5 {
            game.on_tick().unwrap();
        }

        assert_eq!(game.head(), pos(15, 5));
        assert_eq!(game.body().len(), 1);
        assert_eq!(game.state(), GameState::Playing);

        // The vacated cells were erased, the head cell drawn
        assert_eq!(game.platform.glyph_at(15, 5), render::BLOCK_GLYPH);
        assert_eq!(game.platform.glyph_at(14, 5), render::BLANK_GLYPH);
        assert_eq!(game.platform.glyph_at(10, 5), render::BLANK_GLYPH);
    }

    #[test]
    fn test_scenario_b_boundary_collision_ends_game() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();
        let handle = game.timer_handle();

        // Tick 9 moves the head from (10,5) onto the boundary column 19
        for _ in 0..9 {
            game.on_tick().unwrap();
        }

        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.platform.cancel_count(), 1);
        assert!(!handle.is_armed());
        assert_eq!(game.platform.attribute(), render::BANNER_ATTRIBUTE);
        assert!(game.platform.contains_text(render::GAME_OVER_BANNER));

        // Banner centered: 20x10 puts it at row 5, columns 5..15
        assert_eq!(game.platform.row_text(5).trim(), render::GAME_OVER_BANNER);

        // A late tick through the canceled notification is a no-op
        let head = game.head();
        game.on_tick().unwrap();
        assert_eq!(game.head(), head);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.platform.cancel_count(), 1);
    }

    #[test]
    fn test_force_game_over_key() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();
        game.on_tick().unwrap();

        let control = game.on_key(KeyCode::ForceGameOver).unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.platform.cancel_count(), 1);
        assert!(game.platform.contains_text(render::GAME_OVER_BANNER));

        // Second press must not cancel or redraw again
        game.on_key(KeyCode::ForceGameOver).unwrap();
        assert_eq!(game.platform.cancel_count(), 1);
        assert_eq!(game.platform.clear_count(), 2);
    }

    #[test]
    fn test_escape_requests_shutdown_once() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();

        let control = game.on_key(KeyCode::Escape).unwrap();
        assert_eq!(control, LoopControl::Shutdown);
        assert_eq!(game.state(), GameState::ShuttingDown);
        assert_eq!(game.platform.shutdown_requests(), 1);
    }

    #[test]
    fn test_escape_accepted_after_game_over() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();
        game.on_key(KeyCode::ForceGameOver).unwrap();
        assert_eq!(game.state(), GameState::GameOver);

        let control = game.on_key(KeyCode::Escape).unwrap();
        assert_eq!(control, LoopControl::Shutdown);
        assert_eq!(game.state(), GameState::ShuttingDown);
        assert_eq!(game.platform.shutdown_requests(), 1);
    }

    #[test]
    fn test_directional_key_steers_next_tick() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();

        game.on_key(KeyCode::Up).unwrap();
        assert_eq!(game.direction(), Direction::Up);
        game.on_tick().unwrap();
        assert_eq!(game.head(), pos(10, 4));
    }

    #[test]
    fn test_edge_turn_discarded_during_play() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();

        game.on_tick().unwrap(); // (11,5)
        game.on_key(KeyCode::Up).unwrap();
        for _ in 0..4 {
            game.on_tick().unwrap(); // up to (11,1)
        }
        assert_eq!(game.head(), pos(11, 1));

        game.on_key(KeyCode::Right).unwrap();
        game.on_tick().unwrap(); // (12,1)

        // Up would step onto the top border row; the turn is discarded and
        // the body keeps moving right.
        game.on_key(KeyCode::Up).unwrap();
        assert_eq!(game.direction(), Direction::Right);
        game.on_tick().unwrap();
        game.on_tick().unwrap();

        assert_eq!(game.head(), pos(14, 1));
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();

        assert_eq!(
            game.on_key(KeyCode::Printable('q')).unwrap(),
            LoopControl::Continue
        );
        assert_eq!(game.on_key(KeyCode::Other).unwrap(), LoopControl::Continue);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn test_grow_policy_extends_body() {
        let mut m = manifest(20, 10);
        m.snake.grow_every = Some(2);
        let mut game = Game::new(SimConsole::new(20, 10), &m).unwrap();
        game.start().unwrap();

        for _ in 0..4 {
            game.on_tick().unwrap();
        }

        // Ticks 2 and 4 grew, ticks 1 and 3 translated
        assert_eq!(game.body().len(), 3);
        assert_eq!(game.head(), pos(14, 5));
        let positions: Vec<Position> = game.body().positions().collect();
        assert_eq!(positions, vec![pos(14, 5), pos(13, 5), pos(12, 5)]);

        assert_eq!(game.platform.glyph_at(12, 5), render::BLOCK_GLYPH);
        assert_eq!(game.platform.glyph_at(13, 5), render::BLOCK_GLYPH);
        assert_eq!(game.platform.glyph_at(14, 5), render::BLOCK_GLYPH);
        assert_eq!(game.platform.glyph_at(11, 5), render::BLANK_GLYPH);
    }

    #[test]
    fn test_input_loop_runs_until_escape() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();
        let game = Mutex::new(game);

        let mut input = ScriptedInput::new(&[
            KeyCode::Up,
            KeyCode::Printable('z'),
            KeyCode::Escape,
            KeyCode::Down, // never read
        ]);

        run_input_loop(&game, &mut input).unwrap();

        let game = game.lock().unwrap();
        assert_eq!(game.state(), GameState::ShuttingDown);
        assert_eq!(game.direction(), Direction::Up);
        assert_eq!(game.platform.shutdown_requests(), 1);
    }

    #[test]
    fn test_input_loop_surfaces_closed_input() {
        let mut game = Game::new(SimConsole::new(20, 10), &manifest(20, 10)).unwrap();
        game.start().unwrap();
        let game = Mutex::new(game);

        let mut input = ScriptedInput::new(&[KeyCode::Right]);
        let err = run_input_loop(&game, &mut input).unwrap_err();
        assert!(matches!(err, GameError::InputClosed));
    }
}
