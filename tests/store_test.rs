//! Integration test: file-backed stores behind the `Game` service

use skillbound::store::snapshot;
use skillbound::{
    Game, GameConfig, JsonPlayerStore, PlayerStore, SkillId, SnapshotPlayerStore, StaticCatalog,
    StoreError,
};
use std::fs;

fn play_a_little<S: PlayerStore>(game: &Game<S, StaticCatalog>) {
    game.create_player("hero", 0).unwrap();
    game.start_skill("hero", SkillId::Woodcutting).unwrap();
    game.advance("hero", 30_000).unwrap();
    game.buy_item("hero", "bronze_sword", 1).unwrap();
    game.equip_item("hero", "bronze_sword").unwrap();
    game.start_combat("hero", "cow").unwrap();
}

#[test]
fn test_json_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let game = Game::new(
        JsonPlayerStore::with_dir(dir.path()).unwrap(),
        StaticCatalog::standard(),
    );
    play_a_little(&game);
    let saved = game.player("hero").unwrap();
    drop(game);

    let reopened = Game::new(
        JsonPlayerStore::with_dir(dir.path()).unwrap(),
        StaticCatalog::standard(),
    );
    assert_eq!(reopened.player("hero").unwrap(), saved);
    assert_eq!(reopened.list_players().unwrap(), vec!["hero"]);
    assert!(dir.path().join("hero.json").exists());
}

#[test]
fn test_snapshot_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let game = Game::new(
        SnapshotPlayerStore::with_dir(dir.path()).unwrap(),
        StaticCatalog::standard(),
    );
    play_a_little(&game);
    let saved = game.player("hero").unwrap();
    drop(game);

    let reopened = Game::new(
        SnapshotPlayerStore::with_dir(dir.path()).unwrap(),
        StaticCatalog::standard(),
    );
    assert_eq!(reopened.player("hero").unwrap(), saved);
}

#[test]
fn test_tampered_snapshot_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let game = Game::new(
        SnapshotPlayerStore::with_dir(dir.path()).unwrap(),
        StaticCatalog::standard(),
    );
    play_a_little(&game);

    let path = dir.path().join("hero.sav");
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xAA;
    fs::write(&path, bytes).unwrap();

    let err = game.player("hero").unwrap_err();
    assert!(matches!(
        err,
        skillbound::GameError::Store(StoreError::Corrupted(_))
    ));
}

#[test]
fn test_snapshot_and_json_hold_the_same_state() {
    let dir = tempfile::tempdir().unwrap();
    let game = Game::new(
        JsonPlayerStore::with_dir(dir.path()).unwrap(),
        StaticCatalog::standard(),
    );
    play_a_little(&game);
    let player = game.player("hero").unwrap();

    let bytes = snapshot::encode(&player).unwrap();
    assert_eq!(snapshot::decode(&bytes).unwrap(), player);
}

#[test]
fn test_config_opens_a_working_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::snapshot_in(dir.path());
    let game = Game::new(config.open_store().unwrap(), config.load_catalog().unwrap())
        .with_max_catch_up(config.max_catch_up_ms);

    game.create_player("hero", 0).unwrap();
    assert_eq!(game.list_players().unwrap(), vec!["hero"]);
    assert!(dir.path().join("hero.sav").exists());
}
