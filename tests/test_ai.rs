use chaser_game::ai::*;
use chaser_game::entities::{create_projectile, Board, Entity, Rgb};
use chaser_game::geometry::{magnitude, Vector};
use chaser_game::GameError;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn chaser_at(x: f64, y: f64) -> Entity {
    Entity::enemy(
        "enemy",
        Vector::new(x, y),
        10.0,
        Rgb(200, 0, 0),
        Some(Behavior::Named(NamedBehavior::Chaser)),
    )
}

fn player_at(x: f64, y: f64) -> Entity {
    Entity::player("blob", Vector::new(x, y), 5.0, Rgb(0, 0, 0))
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[test]
fn named_behavior_round_trips_its_name() {
    let b = NamedBehavior::from_name("chaser").unwrap();
    assert_eq!(b.name(), "chaser");
    assert!(NamedBehavior::from_name("Chaser").is_err());
    assert_eq!(NamedBehavior::from_name("runningAi").unwrap().name(), "chaser");
}

#[test]
fn only_the_chaser_needs_a_player() {
    assert!(Behavior::Named(NamedBehavior::Chaser).needs_player());
    let flight = Behavior::Projectile { velocity: Vector::new(3.0, 0.0) };
    assert!(!flight.needs_player());
}

// ── Chaser ────────────────────────────────────────────────────────────────────

#[test]
fn chaser_initialises_memory_on_first_run() {
    let board = Board::default();
    let mut enemy = chaser_at(300.0, 300.0);
    assert!(enemy.ai_memory.is_none());

    act(&mut enemy, &board, Some(&player_at(10.0, 10.0)), &mut seeded_rng()).unwrap();

    let memory = enemy.ai_memory.as_ref().unwrap();
    assert_eq!(memory.bullet_tick, 1);
    assert!((0.0..1.0).contains(&memory.bias.x));
    assert!((0.0..1.0).contains(&memory.bias.y));
    // Redrawn count in 0..=20, minus this tick's decrement
    assert!((-1..=19).contains(&memory.bias_count));
}

#[test]
fn chaser_keeps_bias_while_count_lasts() {
    let board = Board::default();
    let mut enemy = chaser_at(300.0, 300.0);
    enemy.ai_memory = Some(ChaserMemory {
        bias: Vector::new(0.5, 0.25),
        bias_count: 5,
        bullet_tick: 0,
    });

    act(&mut enemy, &board, Some(&player_at(10.0, 10.0)), &mut seeded_rng()).unwrap();

    let memory = enemy.ai_memory.as_ref().unwrap();
    assert_eq!(memory.bias, Vector::new(0.5, 0.25));
    assert_eq!(memory.bias_count, 4);
    // direction (-1, -1) × 2 × bias
    assert_eq!(enemy.position, Vector::new(299.0, 299.5));
}

#[test]
fn chaser_flees_when_close() {
    let board = Board::default();
    let mut enemy = chaser_at(100.0, 100.0);
    enemy.ai_memory = Some(ChaserMemory {
        bias: Vector::new(0.5, 0.5),
        bias_count: 5,
        bullet_tick: 0,
    });

    act(&mut enemy, &board, Some(&player_at(60.0, 60.0)), &mut seeded_rng()).unwrap();
    assert_eq!(enemy.position, Vector::new(101.0, 101.0));
}

#[test]
fn chaser_zeroes_axis_that_would_leave_board() {
    let board = Board::default();
    // Box left edge at 1: fleeing left would cross x = 0
    let mut enemy = chaser_at(6.0, 250.0);
    enemy.ai_memory = Some(ChaserMemory {
        bias: Vector::new(1.0, 1.0) * 0.5,
        bias_count: 5,
        bullet_tick: 0,
    });

    // Player close on the right and below: flee toward (-x, -y)
    act(&mut enemy, &board, Some(&player_at(56.0, 300.0)), &mut seeded_rng()).unwrap();
    assert_eq!(enemy.position, Vector::new(6.0, 249.0));
}

#[test]
fn chaser_fires_every_fiftieth_tick() {
    let board = Board::default();
    let mut enemy = chaser_at(300.0, 300.0);
    enemy.ai_memory = Some(ChaserMemory {
        bias: Vector::ZERO,
        bias_count: 100,
        bullet_tick: 48,
    });
    let blob = player_at(10.0, 10.0);
    let player = Some(&blob);
    let mut rng = seeded_rng();

    assert_eq!(act(&mut enemy, &board, player, &mut rng).unwrap(), None);
    let effect = act(&mut enemy, &board, player, &mut rng).unwrap();
    match effect {
        Some(AiEffect::Spawn(p)) => {
            assert!(p.is_hazard);
            assert_eq!(p.position, enemy.position);
            assert_eq!(
                p.behavior,
                Some(Behavior::Projectile {
                    velocity: Vector::new(-3.0, -3.0)
                })
            );
        }
        other => panic!("expected a projectile, got {:?}", other),
    }
    assert_eq!(act(&mut enemy, &board, player, &mut rng).unwrap(), None);
}

#[test]
fn chaser_without_player_fails() {
    let board = Board::default();
    let mut enemy = chaser_at(300.0, 300.0);
    let err = act(&mut enemy, &board, None, &mut seeded_rng()).unwrap_err();
    assert!(matches!(err, GameError::MissingPlayer));
    assert_eq!(enemy.position, Vector::new(300.0, 300.0));
}

/// Player fixed at (10, 10): the chaser closes in while farther than the
/// flee distance and backs off on the very next tick once inside it.
#[test]
fn chaser_closes_in_then_backs_off() {
    let board = Board::default();
    let blob = player_at(10.0, 10.0);
    let player = blob.position;
    let mut enemy = chaser_at(300.0, 300.0);
    let mut rng = seeded_rng();
    let mut fled = false;

    for _ in 0..2000 {
        let before = magnitude(player - enemy.position);
        act(&mut enemy, &board, Some(&blob), &mut rng).unwrap();
        let after = magnitude(player - enemy.position);
        let bias = enemy.ai_memory.as_ref().unwrap().bias;
        if bias.x == 0.0 && bias.y == 0.0 {
            continue;
        }
        if before >= FLEE_DISTANCE {
            assert!(after < before, "did not close in: {} -> {}", before, after);
        } else {
            assert!(after > before, "did not back off: {} -> {}", before, after);
            fled = true;
        }
    }
    assert!(fled);
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[test]
fn projectile_moves_by_its_velocity() {
    let board = Board::default();
    let mut p = create_projectile("b", Vector::new(100.0, 100.0), Vector::new(3.0, -1.5));
    let effect = act(&mut p, &board, None, &mut seeded_rng()).unwrap();
    assert_eq!(effect, None);
    assert_eq!(p.position, Vector::new(103.0, 98.5));
}

#[test]
fn projectile_despawns_when_leaving_board() {
    let board = Board::default();
    // Box right edge at 496 + 1 = 497; next step would reach 500
    let mut p = create_projectile("b", Vector::new(496.0, 250.0), Vector::new(3.0, 0.0));
    let effect = act(&mut p, &board, None, &mut seeded_rng()).unwrap();
    assert_eq!(effect, Some(AiEffect::Despawn));
    assert_eq!(p.position, Vector::new(496.0, 250.0));
}

#[test]
fn entity_without_behavior_does_nothing() {
    let board = Board::default();
    let mut e = Entity::enemy("rock", Vector::new(50.0, 50.0), 10.0, Rgb(0, 0, 0), None);
    assert_eq!(act(&mut e, &board, None, &mut seeded_rng()).unwrap(), None);
    assert_eq!(e.position, Vector::new(50.0, 50.0));
}
