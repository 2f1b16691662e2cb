use crate::term::{TermInput, TermPlatform};
use anyhow::Result;
use serpent_config::GameManifest;
use serpent_core::game::{run_input_loop, Game};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// Interactive mode: the tick context runs on a dedicated thread, the main
/// thread blocks on keystrokes. The mutex serializes the two contexts over
/// the game; direction and state stay atomic inside it.
pub fn run(config: Option<&Path>) -> Result<()> {
    let manifest = match config {
        Some(path) => GameManifest::from_file(path)?,
        None => GameManifest::default(),
    };

    let platform = TermPlatform::new()?;
    let mut game = Game::new(platform, &manifest)?;
    game.start()?;

    let handle = game.timer_handle();
    let interval = game.tick_interval();
    let game = Arc::new(Mutex::new(game));

    let ticker = {
        let game = Arc::clone(&game);
        let handle = handle.clone();
        thread::spawn(move || loop {
            thread::sleep(interval);
            // The handle is disarmed by cancellation (game over) and by
            // shutdown; either way this context stops delivering ticks.
            if !handle.is_armed() {
                break;
            }
            let mut game = game.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = game.on_tick() {
                tracing::error!("Tick failed: {}", e);
                break;
            }
        })
    };

    let mut input = TermInput;
    let result = run_input_loop(&game, &mut input);

    handle.disarm();
    let _ = ticker.join();

    {
        let mut game = game.lock().unwrap_or_else(PoisonError::into_inner);
        game.platform.restore();
    }

    result?;
    Ok(())
}
