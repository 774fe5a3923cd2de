//! Game settings.
//!
//! Loaded from an optional JSON file; every field falls back to the
//! classic defaults when absent.

use std::path::Path;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::entities::{build_template, Board, Entity, EntityTemplate, Rgb};
use crate::error::GameError;
use crate::geometry::Vector;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "CHASER_GAME_CONFIG";

/// How often the board is redrawn during the movement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderCadence {
    /// Once, after every entity has moved.
    #[default]
    PerTick,
    /// After each entity is processed, one full redraw per entity.
    PerEntity,
}

/// How many win/lose transitions a single collision pass may trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutcomePolicy {
    /// At most one lose and one win per tick.
    #[default]
    OncePerTick,
    /// One transition for every intersecting ordered pair.
    EveryPair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: Board,
    /// Entities every session starts from.
    pub template: Vec<EntityTemplate>,
    /// Milliseconds between ticks.
    pub tick_ms: u64,
    pub render_cadence: RenderCadence,
    pub outcome_policy: OutcomePolicy,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: Board::default(),
            template: vec![
                EntityTemplate {
                    id: "blob".to_string(),
                    player: true,
                    enemy: false,
                    hazard: false,
                    size: 5.0,
                    color: Rgb(0, 0, 0),
                    position: Vector::new(10.0, 10.0),
                    ai: None,
                },
                EntityTemplate {
                    id: "enemy".to_string(),
                    player: false,
                    enemy: true,
                    hazard: false,
                    size: 10.0,
                    color: Rgb(200, 0, 0),
                    position: Vector::new(300.0, 300.0),
                    ai: Some("chaser".to_string()),
                },
            ],
            tick_ms: 16,
            render_cadence: RenderCadence::PerTick,
            outcome_policy: OutcomePolicy::OncePerTick,
            seed: None,
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Resolve the template into live entities, checking it has exactly
    /// one player and only known behaviors.
    pub fn build_template(&self) -> Result<Vec<Entity>, GameError> {
        build_template(&self.template)
    }

    /// Check the template without keeping the built entities.
    pub fn validate(&self) -> Result<(), GameError> {
        self.build_template().map(|_| ())
    }

    pub fn from_json(json: &str, origin: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|source| GameError::Config {
            path: origin.to_string(),
            source,
        })
    }

    /// Read and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json, &path.display().to_string())?;
        settings.validate()?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from `CHASER_GAME_CONFIG`, else from `arg` (usually the
    /// first command-line argument), else the defaults.
    pub fn from_env(arg: Option<String>) -> Result<Self, GameError> {
        match std::env::var(CONFIG_ENV).ok().or(arg) {
            Some(path) => Self::load(path),
            None => {
                info!("Using default settings");
                Ok(Self::default())
            }
        }
    }
}
