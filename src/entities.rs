//! All game entity types: pure data, no logic.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ai::{Behavior, ChaserMemory, NamedBehavior};
use crate::error::GameError;
use crate::geometry::Vector;

pub const PROJECTILE_SIZE: f64 = 3.0;
pub const PROJECTILE_COLOR: Rgb = Rgb(100, 100, 255);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

// ── Board ────────────────────────────────────────────────────────────────────

/// The fixed playing field. `x` is the width and `y` the height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub x: f64,
    pub y: f64,
    pub background: Rgb,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            x: 500.0,
            y: 500.0,
            background: Rgb(200, 200, 200),
        }
    }
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// Anything on the board: the player, an enemy or a projectile.
///
/// The role of an entity is carried by its capability flags rather than a
/// separate type, so a template can build e.g. a hazardous enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Unique within the current tick only.
    pub id: String,
    pub position: Vector,
    /// Side length of the occupied square.
    pub size: f64,
    pub color: Rgb,
    pub is_player: bool,
    pub is_enemy: bool,
    /// Harmful on contact with the player.
    pub is_hazard: bool,
    pub behavior: Option<Behavior>,
    /// Scratch state owned by `behavior`, created on its first run.
    pub ai_memory: Option<ChaserMemory>,
}

impl Entity {
    pub fn player(id: impl Into<String>, position: Vector, size: f64, color: Rgb) -> Self {
        Entity {
            id: id.into(),
            position,
            size,
            color,
            is_player: true,
            is_enemy: false,
            is_hazard: false,
            behavior: None,
            ai_memory: None,
        }
    }

    pub fn enemy(
        id: impl Into<String>,
        position: Vector,
        size: f64,
        color: Rgb,
        behavior: Option<Behavior>,
    ) -> Self {
        Entity {
            id: id.into(),
            position,
            size,
            color,
            is_player: false,
            is_enemy: true,
            is_hazard: false,
            behavior,
            ai_memory: None,
        }
    }
}

/// A small, fast, hazardous entity flying at a fixed `velocity`.
pub fn create_projectile(id: impl Into<String>, origin: Vector, velocity: Vector) -> Entity {
    Entity {
        id: id.into(),
        position: origin,
        size: PROJECTILE_SIZE,
        color: PROJECTILE_COLOR,
        is_player: false,
        is_enemy: false,
        is_hazard: true,
        behavior: Some(Behavior::Projectile { velocity }),
        ai_memory: None,
    }
}

/// Materialize a live entity set from a template. The copy shares nothing
/// with the template, so moving a live entity never touches it.
pub fn deep_copy(template: &[Entity]) -> Vec<Entity> {
    template.to_vec()
}

// ── Templates ────────────────────────────────────────────────────────────────

/// Serializable description of one entity, as found in the settings file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub id: String,
    #[serde(default)]
    pub player: bool,
    #[serde(default)]
    pub enemy: bool,
    #[serde(default)]
    pub hazard: bool,
    pub size: f64,
    pub color: Rgb,
    pub position: Vector,
    /// Name of a registered behavior, e.g. `"chaser"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<String>,
}

impl EntityTemplate {
    /// Resolve the behavior name once and produce a live entity.
    pub fn build(&self) -> Result<Entity, GameError> {
        let behavior = match &self.ai {
            Some(name) => {
                let named = NamedBehavior::from_name(name)?;
                debug!("{} runs {}", self.id, named.name());
                Some(Behavior::Named(named))
            }
            None => None,
        };
        Ok(Entity {
            id: self.id.clone(),
            position: self.position,
            size: self.size,
            color: self.color,
            is_player: self.player,
            is_enemy: self.enemy,
            is_hazard: self.hazard,
            behavior,
            ai_memory: None,
        })
    }
}

/// Build every template entry, checking that exactly one is the player.
pub fn build_template(entries: &[EntityTemplate]) -> Result<Vec<Entity>, GameError> {
    let players = entries.iter().filter(|s| s.player).count();
    match players {
        0 => return Err(GameError::NoPlayerInTemplate),
        1 => {}
        n => return Err(GameError::MultiplePlayers(n)),
    }
    entries.iter().map(EntityTemplate::build).collect()
}

// ── Scores & input ───────────────────────────────────────────────────────────

/// Win/lose counters. They live as long as the process; resets keep them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub win: u32,
    pub lose: u32,
}

/// Which arrow directions are currently held. Written by the input side,
/// read once per tick by the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}
