//! Per-entity behaviors.
//!
//! A behavior runs once per tick for every non-player entity that has one.
//! It may move its own entity and update its own memory; changes to the
//! entity collection are returned as an [`AiEffect`] and applied by the
//! tick loop once the movement pass is over.

use log::debug;
use rand::Rng;

use crate::entities::{create_projectile, Board, Entity};
use crate::error::GameError;
use crate::geometry::{
    bounding_box, is_valid_position, magnitude, measure_distance, normalize, reflect, translate,
    Vector,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

/// Peak per-axis chaser speed, before jitter.
pub const CHASE_SPEED: f64 = 2.0;
/// Closer than this, the chaser backs off instead.
pub const FLEE_DISTANCE: f64 = 100.0;
/// The chaser fires on every tick that is a multiple of this.
pub const FIRE_INTERVAL: u64 = 50;
pub const PROJECTILE_SPEED: f64 = 3.0;
/// Upper bound on how many ticks a jitter bias is kept.
pub const BIAS_HOLD_MAX: f64 = 20.0;

// ── Behavior references ──────────────────────────────────────────────────────

/// Behaviors that templates can refer to by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedBehavior {
    /// Chase the player with jitter, back off when close, shoot periodically.
    Chaser,
}

impl NamedBehavior {
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        match name {
            "chaser" | "runningAi" => Ok(NamedBehavior::Chaser),
            other => Err(GameError::UnknownBehavior(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NamedBehavior::Chaser => "chaser",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    Named(NamedBehavior),
    /// Straight-line flight with a velocity fixed at creation.
    Projectile { velocity: Vector },
}

impl Behavior {
    /// Whether running this behavior requires a player on the board.
    pub fn needs_player(&self) -> bool {
        matches!(self, Behavior::Named(NamedBehavior::Chaser))
    }
}

/// Chaser scratch state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChaserMemory {
    /// Per-axis speed factors in [0, 1).
    pub bias: Vector,
    /// Ticks left before `bias` is redrawn.
    pub bias_count: i64,
    /// Ticks this chaser has run so far.
    pub bullet_tick: u64,
}

/// A change to the entity collection requested by a behavior.
#[derive(Clone, Debug, PartialEq)]
pub enum AiEffect {
    Spawn(Entity),
    /// Remove the acting entity.
    Despawn,
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

/// Run `entity`'s behavior for one tick. `player` is the player as it
/// currently stands, if the board has a player at all.
pub fn act(
    entity: &mut Entity,
    board: &Board,
    player: Option<&Entity>,
    rng: &mut impl Rng,
) -> Result<Option<AiEffect>, GameError> {
    match entity.behavior {
        Some(Behavior::Named(NamedBehavior::Chaser)) => chase(entity, board, player, rng),
        Some(Behavior::Projectile { velocity }) => Ok(fly(entity, board, velocity)),
        None => Ok(None),
    }
}

fn chase(
    entity: &mut Entity,
    board: &Board,
    player: Option<&Entity>,
    rng: &mut impl Rng,
) -> Result<Option<AiEffect>, GameError> {
    // Jitter: hold a random per-axis bias for a random number of ticks.
    let memory = entity.ai_memory.get_or_insert_with(ChaserMemory::default);
    if memory.bias_count < 1 {
        memory.bias = Vector::new(rng.gen(), rng.gen());
        memory.bias_count = (rng.gen::<f64>() * BIAS_HOLD_MAX).round() as i64;
    }
    memory.bias_count -= 1;
    let bias = memory.bias;

    let player = player.ok_or(GameError::MissingPlayer)?;
    let offset = measure_distance(player, entity);
    let direction = normalize(offset);

    let mut v = direction * CHASE_SPEED * bias;
    if magnitude(offset) < FLEE_DISTANCE {
        v = reflect(v);
    }

    // Both axis checks look at the box of the unclamped move.
    let mut candidate = translate(v, entity.position);
    let b = bounding_box(entity, candidate);
    if b[0].x <= 0.0 || b[3].x >= board.x {
        v.x = 0.0;
        candidate = translate(v, entity.position);
    }
    if b[0].y <= 0.0 || b[3].y >= board.y {
        v.y = 0.0;
        candidate = translate(v, entity.position);
    }
    if is_valid_position(board, entity, candidate) {
        entity.position = candidate;
    }

    let memory = entity.ai_memory.get_or_insert_with(ChaserMemory::default);
    memory.bullet_tick += 1;
    if memory.bullet_tick % FIRE_INTERVAL != 0 {
        return Ok(None);
    }
    let id = format!("{}:b{}", entity.id, memory.bullet_tick);
    debug!("{} fires {} at {:?}", entity.id, id, entity.position);
    Ok(Some(AiEffect::Spawn(create_projectile(
        id,
        entity.position,
        direction * PROJECTILE_SPEED,
    ))))
}

fn fly(entity: &mut Entity, board: &Board, velocity: Vector) -> Option<AiEffect> {
    let candidate = translate(velocity, entity.position);
    if is_valid_position(board, entity, candidate) {
        entity.position = candidate;
        None
    } else {
        debug!("{} left the board", entity.id);
        Some(AiEffect::Despawn)
    }
}
