use std::time::Duration;

use chaser_game::ai::{Behavior, NamedBehavior};
use chaser_game::entities::Rgb;
use chaser_game::geometry::Vector;
use chaser_game::settings::{OutcomePolicy, RenderCadence, Settings};
use chaser_game::{GameError, Session};

#[test]
fn defaults_match_classic_game() {
    let s = Settings::default();
    assert_eq!(s.board.x, 500.0);
    assert_eq!(s.board.y, 500.0);
    assert_eq!(s.tick_interval(), Duration::from_millis(16));
    assert_eq!(s.render_cadence, RenderCadence::PerTick);
    assert_eq!(s.outcome_policy, OutcomePolicy::OncePerTick);
    assert_eq!(s.seed, None);

    let template = s.build_template().unwrap();
    assert_eq!(template.len(), 2);
    assert!(template[0].is_player);
    assert_eq!(template[0].position, Vector::new(10.0, 10.0));
    assert_eq!(template[0].size, 5.0);
    assert!(template[1].is_enemy);
    assert_eq!(template[1].color, Rgb(200, 0, 0));
    assert_eq!(template[1].behavior, Some(Behavior::Named(NamedBehavior::Chaser)));
}

#[test]
fn partial_json_keeps_defaults() {
    let s = Settings::from_json(
        r#"{ "tick_ms": 33, "render_cadence": "per_entity", "seed": 7 }"#,
        "inline",
    )
    .unwrap();
    assert_eq!(s.tick_ms, 33);
    assert_eq!(s.render_cadence, RenderCadence::PerEntity);
    assert_eq!(s.seed, Some(7));
    assert_eq!(s.template, Settings::default().template);
}

#[test]
fn json_template_uses_behavior_names() {
    let json = r#"{
        "board": { "x": 300, "y": 200, "background": [10, 20, 30] },
        "outcome_policy": "every_pair",
        "template": [
            { "id": "me", "player": true, "size": 7, "color": [0, 0, 0], "position": [20, 20] },
            { "id": "them", "enemy": true, "size": 9, "color": [255, 0, 0],
              "position": [150, 100], "ai": "runningAi" }
        ]
    }"#;
    let s = Settings::from_json(json, "inline").unwrap();
    assert_eq!(s.board.background, Rgb(10, 20, 30));
    assert_eq!(s.outcome_policy, OutcomePolicy::EveryPair);

    let session = Session::new(&s).unwrap();
    assert_eq!(session.entities.len(), 2);
    assert_eq!(session.entities[1].position, Vector::new(150.0, 100.0));
    assert_eq!(session.outcome_policy, OutcomePolicy::EveryPair);
}

#[test]
fn bad_json_reports_origin() {
    let err = Settings::from_json("{ not json", "my.json").unwrap_err();
    match err {
        GameError::Config { path, .. } => assert_eq!(path, "my.json"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn session_rejects_template_without_player() {
    let json = r#"{ "template": [
        { "id": "them", "enemy": true, "size": 9, "color": [255, 0, 0], "position": [150, 100] }
    ] }"#;
    let s = Settings::from_json(json, "inline").unwrap();
    assert!(matches!(Session::new(&s), Err(GameError::NoPlayerInTemplate)));
}

#[test]
fn validate_checks_the_template() {
    assert!(Settings::default().validate().is_ok());

    let mut two_players = Settings::default();
    two_players.template[1].player = true;
    assert!(matches!(two_players.validate(), Err(GameError::MultiplePlayers(2))));

    let mut unknown = Settings::default();
    unknown.template[1].ai = Some("teleporter".to_string());
    assert!(matches!(unknown.validate(), Err(GameError::UnknownBehavior(_))));
}

#[test]
fn load_rejects_invalid_template() {
    let path = std::env::temp_dir().join(format!("chaser_game_no_player_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "template": [ { "id": "x", "size": 5, "color": [0, 0, 0], "position": [50, 50] } ] }"#,
    )
    .unwrap();
    let result = Settings::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(GameError::NoPlayerInTemplate)));
}

#[test]
fn settings_round_trip_through_json() {
    let original = Settings::default();
    let json = serde_json::to_string(&original).unwrap();
    let parsed = Settings::from_json(&json, "inline").unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn load_missing_file_is_io_error() {
    let err = Settings::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, GameError::Io(_)));
}
