//! The tick loop.
//!
//! A [`Session`] owns the board, the live entities and the scoreboard.
//! Each call to [`Session::tick`] runs one movement pass (player input and
//! behaviors), draws, then one collision pass that may end the round with
//! a win or a loss. All randomness comes through the injected `rng` and all
//! output through the injected surface, so a tick is fully reproducible.
//!
//! Ticks are expected to be driven by a single fixed-rate timer that never
//! overlaps calls; nothing in here guards against reentrancy.

use log::{debug, info};
use rand::Rng;

use crate::ai::{self, AiEffect};
use crate::display::{render, Canvas, ScoreDisplay};
use crate::entities::{deep_copy, Board, Entity, KeyState, Scoreboard};
use crate::error::GameError;
use crate::geometry::{intersects, is_valid_position, translate, Vector};
use crate::settings::{OutcomePolicy, RenderCadence, Settings};

/// Player speed per tick along each held axis.
pub const PLAYER_SPEED: f64 = 3.0;

/// What a single tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub wins: u32,
    pub losses: u32,
    pub spawned: usize,
    pub despawned: usize,
}

/// Intersecting ordered pairs found by one collision pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Pairs joining the player and a hazard.
    pub hazard: u32,
    /// Pairs joining the player and an enemy.
    pub enemy: u32,
}

pub struct Session {
    pub board: Board,
    template: Vec<Entity>,
    pub entities: Vec<Entity>,
    pub scoreboard: Scoreboard,
    pub render_cadence: RenderCadence,
    pub outcome_policy: OutcomePolicy,
    running: bool,
    /// Ticks run since the session was created.
    pub frame: u64,
}

impl Session {
    pub fn new(settings: &Settings) -> Result<Self, GameError> {
        let template = settings.build_template()?;
        let mut session = Self::from_template(settings.board.clone(), template);
        session.render_cadence = settings.render_cadence;
        session.outcome_policy = settings.outcome_policy;
        info!(
            "Session ready: {}x{} board, {} entities",
            session.board.x,
            session.board.y,
            session.entities.len()
        );
        Ok(session)
    }

    /// A paused session over an already-built template, with default
    /// render and outcome policies.
    pub fn from_template(board: Board, template: Vec<Entity>) -> Self {
        Session {
            board,
            entities: deep_copy(&template),
            template,
            scoreboard: Scoreboard::default(),
            render_cadence: RenderCadence::default(),
            outcome_policy: OutcomePolicy::default(),
            running: false,
            frame: 0,
        }
    }

    pub fn template(&self) -> &[Entity] {
        &self.template
    }

    // ── Session control ──────────────────────────────────────────────────────

    pub fn start(&mut self) {
        if !self.running {
            info!("Started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("Stopped");
        }
        self.running = false;
    }

    /// Flip between running and paused; returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the live entities with a fresh copy of the template and
    /// redraw. Scores are kept.
    pub fn reset_session<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<(), GameError> {
        self.entities = deep_copy(&self.template);
        render(canvas, &self.board, &self.entities)?;
        Ok(())
    }

    fn win<S: Canvas + ScoreDisplay + ?Sized>(&mut self, surface: &mut S) -> Result<(), GameError> {
        self.scoreboard.win += 1;
        info!("Win ({} - {})", self.scoreboard.win, self.scoreboard.lose);
        surface.show_scores(&self.scoreboard)?;
        self.reset_session(surface)
    }

    fn lose<S: Canvas + ScoreDisplay + ?Sized>(&mut self, surface: &mut S) -> Result<(), GameError> {
        self.scoreboard.lose += 1;
        info!("Lose ({} - {})", self.scoreboard.win, self.scoreboard.lose);
        surface.show_scores(&self.scoreboard)?;
        self.reset_session(surface)
    }

    // ── Per-tick update ──────────────────────────────────────────────────────

    /// Advance the simulation by one tick.
    ///
    /// Entities present at the start of the tick move in collection order.
    /// Projectiles spawned or removed by behaviors are applied after the
    /// movement pass, so indices stay stable while it runs.
    ///
    /// Fails with [`GameError::MissingPlayer`] before touching anything when
    /// a behavior needs a player and the board has none.
    pub fn tick<S: Canvas + ScoreDisplay + ?Sized>(
        &mut self,
        keys: &KeyState,
        rng: &mut impl Rng,
        surface: &mut S,
    ) -> Result<TickReport, GameError> {
        let needs_player = self
            .entities
            .iter()
            .any(|e| !e.is_player && e.behavior.is_some_and(|b| b.needs_player()));
        if needs_player && locate_player(&self.entities).is_none() {
            return Err(GameError::MissingPlayer);
        }

        self.frame += 1;
        let mut report = TickReport::default();

        // ── 1. Movement ──────────────────────────────────────────────────────
        let mut spawned: Vec<Entity> = Vec::new();
        let mut despawned: Vec<usize> = Vec::new();

        for i in 0..self.entities.len() {
            if self.entities[i].is_player {
                let v = input_velocity(keys);
                let player = &mut self.entities[i];
                let candidate = translate(v, player.position);
                if is_valid_position(&self.board, player, candidate) {
                    player.position = candidate;
                }
            } else if self.entities[i].behavior.is_some() {
                let player = locate_player(&self.entities).cloned();
                match ai::act(&mut self.entities[i], &self.board, player.as_ref(), rng)? {
                    Some(AiEffect::Spawn(entity)) => spawned.push(entity),
                    Some(AiEffect::Despawn) => despawned.push(i),
                    None => {}
                }
            }

            if self.render_cadence == RenderCadence::PerEntity {
                render(surface, &self.board, &self.entities)?;
            }
        }

        // Indices were pushed in ascending order.
        for &i in despawned.iter().rev() {
            let gone = self.entities.remove(i);
            debug!("Removed {}", gone.id);
        }
        report.despawned = despawned.len();
        report.spawned = spawned.len();
        self.entities.extend(spawned);

        if self.render_cadence == RenderCadence::PerTick {
            render(surface, &self.board, &self.entities)?;
        }

        // ── 2. Collision ─────────────────────────────────────────────────────
        let contacts = find_contacts(&self.entities);
        let (losses, wins) = match self.outcome_policy {
            OutcomePolicy::OncePerTick => (contacts.hazard.min(1), contacts.enemy.min(1)),
            OutcomePolicy::EveryPair => (contacts.hazard, contacts.enemy),
        };
        for _ in 0..losses {
            self.lose(surface)?;
        }
        for _ in 0..wins {
            self.win(surface)?;
        }
        report.losses = losses;
        report.wins = wins;

        Ok(report)
    }
}

/// Velocity requested by the held arrow keys. Keys are applied in the
/// order left, right, up, down; of two opposed keys the later one wins.
pub fn input_velocity(keys: &KeyState) -> Vector {
    let mut v = Vector::ZERO;
    if keys.left {
        v.x = -PLAYER_SPEED;
    }
    if keys.right {
        v.x = PLAYER_SPEED;
    }
    if keys.up {
        v.y = -PLAYER_SPEED;
    }
    if keys.down {
        v.y = PLAYER_SPEED;
    }
    v
}

pub fn locate_player(entities: &[Entity]) -> Option<&Entity> {
    entities.iter().find(|e| e.is_player)
}

/// Test every ordered pair, an entity with itself included.
pub fn find_contacts(entities: &[Entity]) -> Contacts {
    let mut contacts = Contacts::default();
    for a in entities {
        for b in entities {
            if !intersects(a, b) {
                continue;
            }
            let player = a.is_player || b.is_player;
            if player && (a.is_hazard || b.is_hazard) {
                contacts.hazard += 1;
            }
            if player && (a.is_enemy || b.is_enemy) {
                contacts.enemy += 1;
            }
        }
    }
    contacts
}
