use anyhow::{Context, Result};
use serde::Serialize;
use serpent_config::{EndState, ScenarioAssertion, ScenarioScript, ScenarioStep};
use serpent_core::game::Game;
use serpent_core::sim::SimConsole;
use serpent_core::{KeyCode, LoopControl};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Outcome of one headless scenario run, also serialized as `result.json`.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub status: String,
    pub state: EndState,
    pub head: [i32; 2],
    pub body_length: usize,
    pub shutdown_requests: u32,
    pub script_hash: String,
    pub failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Replay a scenario script on the simulated console and evaluate its
/// assertions. Script and manifest problems are errors; failed assertions
/// are reported, not errors.
pub fn run_script(script_path: &Path, output_dir: Option<&Path>) -> Result<ScenarioReport> {
    let raw = std::fs::read(script_path)
        .with_context(|| format!("Failed to read scenario script at {:?}", script_path))?;
    let script = ScenarioScript::from_file(script_path)?;
    let script_hash = format!("{:x}", Sha256::digest(&raw));

    let board = &script.inputs.board;
    let sim = SimConsole::new(board.columns, board.rows);
    let mut game = Game::new(sim, &script.inputs)?;
    game.start()?;

    'steps: for step in &script.steps {
        match step {
            ScenarioStep::Ticks(t) => {
                for _ in 0..t.ticks {
                    game.on_tick()?;
                }
            }
            ScenarioStep::Key(k) => {
                if game.on_key(KeyCode::from(k.key))? == LoopControl::Shutdown {
                    // On real firmware the shutdown request does not return
                    break 'steps;
                }
            }
        }
    }

    let head = game.head();
    let mut failures = Vec::new();
    for assertion in &script.assertions {
        match assertion {
            ScenarioAssertion::HeadAt(a) => {
                if [head.x, head.y] != a.head_at {
                    failures.push(format!(
                        "head_at: expected {:?}, got [{}, {}]",
                        a.head_at, head.x, head.y
                    ));
                }
            }
            ScenarioAssertion::BodyLength(a) => {
                if game.body().len() != a.body_length {
                    failures.push(format!(
                        "body_length: expected {}, got {}",
                        a.body_length,
                        game.body().len()
                    ));
                }
            }
            ScenarioAssertion::ExpectedState(a) => {
                let actual = EndState::from(game.state());
                if actual != a.expected_state {
                    failures.push(format!(
                        "expected_state: expected {:?}, got {:?}",
                        a.expected_state, actual
                    ));
                }
            }
            ScenarioAssertion::ShutdownRequests(a) => {
                if game.platform.shutdown_requests() != a.shutdown_requests {
                    failures.push(format!(
                        "shutdown_requests: expected {}, got {}",
                        a.shutdown_requests,
                        game.platform.shutdown_requests()
                    ));
                }
            }
            ScenarioAssertion::BannerContains(a) => {
                if !game.platform.contains_text(&a.banner_contains) {
                    failures.push(format!(
                        "banner_contains: {:?} not found on the grid",
                        a.banner_contains
                    ));
                }
            }
        }
    }

    let report = ScenarioReport {
        status: if failures.is_empty() { "pass" } else { "fail" }.to_string(),
        state: EndState::from(game.state()),
        head: [head.x, head.y],
        body_length: game.body().len(),
        shutdown_requests: game.platform.shutdown_requests(),
        script_hash,
        failures,
    };

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output dir {:?}", dir))?;
        let path = dir.join("result.json");
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write {:?}", path))?;
    }

    Ok(report)
}
