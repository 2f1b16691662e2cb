use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_columns() -> u16 {
    80
}

fn default_rows() -> u16 {
    25
}

fn default_tick_ms() -> u64 {
    // 90ms per tick is a comfortable crawl on an 80-column grid
    90
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Grid width in character cells. Also the fallback geometry when the
    /// console dimension query fails at startup.
    #[serde(default = "default_columns")]
    pub columns: u16,
    #[serde(default = "default_rows")]
    pub rows: u16,
    /// Periodic tick interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            rows: default_rows(),
            tick_ms: default_tick_ms(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SnakeConfig {
    #[serde(default)]
    pub heading: Heading,
    /// Grow by one segment every N ticks. Absent means the body only
    /// translates and never grows.
    #[serde(default)]
    pub grow_every: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct GameManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub snake: SnakeConfig,
}

impl GameManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open game manifest at {:?}", path.as_ref()))?;
        let manifest: Self =
            serde_yaml::from_reader(f).context("Failed to parse Game Manifest YAML")?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        // The border ring eats one cell on each side; anything smaller than
        // 5x5 has no interior left to move in.
        if self.board.columns < 5 || self.board.rows < 5 {
            anyhow::bail!(
                "Board {}x{} is too small; at least 5x5 is required",
                self.board.columns,
                self.board.rows
            );
        }

        if self.board.tick_ms == 0 {
            anyhow::bail!("Board 'tick_ms' must be greater than zero");
        }

        if self.snake.grow_every == Some(0) {
            anyhow::bail!("Snake 'grow_every' must be greater than zero when present");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyName {
    Up,
    Down,
    Left,
    Right,
    Escape,
    ForceGameOver,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndState {
    Playing,
    GameOver,
    ShuttingDown,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TickStep {
    pub ticks: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct KeyStep {
    pub key: KeyName,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum ScenarioStep {
    Ticks(TickStep),
    Key(KeyStep),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct HeadAtAssertion {
    pub head_at: [i32; 2],
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BodyLengthAssertion {
    pub body_length: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct StateAssertion {
    pub expected_state: EndState,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ShutdownAssertion {
    pub shutdown_requests: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BannerAssertion {
    pub banner_contains: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum ScenarioAssertion {
    HeadAt(HeadAtAssertion),
    BodyLength(BodyLengthAssertion),
    ExpectedState(StateAssertion),
    ShutdownRequests(ShutdownAssertion),
    BannerContains(BannerAssertion),
}

/// A scripted headless game run: fixed inputs, a step sequence, and the
/// assertions checked once the steps are exhausted.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioScript {
    pub schema_version: String,
    #[serde(default)]
    pub inputs: GameManifest,
    pub steps: Vec<ScenarioStep>,
    #[serde(default)]
    pub assertions: Vec<ScenarioAssertion>,
}

impl ScenarioScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open scenario script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse Scenario Script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        self.inputs.validate()?;

        for step in &self.steps {
            if let ScenarioStep::Ticks(t) = step {
                if t.ticks == 0 {
                    anyhow::bail!("Step 'ticks' must be greater than zero");
                }
            }
        }

        Ok(())
    }
}
