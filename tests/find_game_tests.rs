//! Headless tests for the find-the-Pokémon round loop.
//!
//! The app runs with [`MinimalPlugins`] and a manual clock
//! ([`TimeUpdateStrategy::ManualDuration`]) so each `update()` advances time
//! by exactly [`STEP_MS`].  There is no asset server, so every board is
//! revealed the frame it is spawned.
//!
//! Covered scenarios:
//! 1. Start spawns one target among the decoys and reveals the board.
//! 2. Clicking the target scores and replaces the board.
//! 3. Decoys are not clickable; pressing one leaves the round untouched.
//! 4. A click for a previous round is ignored.
//! 5. Sprites fly to their slots and the pokéball closes.
//! 6. The countdown ends the game; "Back to menu" returns to the start card.
//! 7. A signed-in player's best score is persisted.
//! 8. Leaving the screen resets the session and despawns the board.

use std::time::Duration;

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use pokearcade::board::CurvePath;
use pokearcade::bridge::ScoreKind;
use pokearcade::backend::Backend;
use pokearcade::config::GameConfig;
use pokearcade::find_game::{
    ActiveBoard, BoardRng, BoardSprite, FindBackToMenuButton, FindEndCard, FindGamePlugin,
    FindGameRoot, FindStartCard, Flight, PokeballSprite, TargetSprite,
};
use pokearcade::menu::{AppState, MenuPlugin};
use pokearcade::session::{FindGameEvent, FindPhase, GameSession};
use pokearcade::store::DocumentStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

const STEP_MS: u64 = 200;
const DECOYS: usize = 8;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(duration_ms: f64) -> GameConfig {
    GameConfig {
        game_duration_ms: duration_ms,
        decoy_count: DECOYS,
        ..GameConfig::default()
    }
}

/// Headless app already sitting on the find-game start card.
fn find_app(config: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, InputPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(STEP_MS)));
    app.insert_resource(config);
    app.add_plugins((MenuPlugin, FindGamePlugin));
    app.insert_resource(BoardRng(StdRng::seed_from_u64(7)));
    app.update();

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::FindGame);
    app.update();
    app
}

fn start(app: &mut App) {
    app.world_mut().write_message(FindGameEvent::Start);
    app.update();
}

fn session(app: &App) -> &GameSession {
    app.world().resource::<GameSession>()
}

fn count<T: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<T>>()
        .iter(app.world())
        .count()
}

fn press<T: Component>(app: &mut App) {
    let entity = app
        .world_mut()
        .query_filtered::<Entity, With<T>>()
        .iter(app.world())
        .next()
        .expect("entity not spawned");
    app.world_mut().entity_mut(entity).insert(Interaction::Pressed);
    app.update();
}

fn run_out_clock(app: &mut App) {
    for _ in 0..20 {
        app.update();
        if session(app).phase() == FindPhase::Ended {
            break;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn entering_shows_start_card() {
    let mut app = find_app(config(30_000.0));
    assert_eq!(session(&app).phase(), FindPhase::Menu);
    assert_eq!(count::<FindStartCard>(&mut app), 1);
    assert_eq!(count::<FindGameRoot>(&mut app), 1);
    assert_eq!(count::<BoardSprite>(&mut app), 0);
}

#[test]
fn start_spawns_a_revealed_board() {
    let mut app = find_app(config(30_000.0));
    start(&mut app);

    assert_eq!(session(&app).phase(), FindPhase::Playing);
    assert_eq!(session(&app).round(), 1);
    assert_eq!(count::<FindStartCard>(&mut app), 0, "start card must be gone");
    assert_eq!(count::<BoardSprite>(&mut app), DECOYS + 1);
    assert_eq!(count::<TargetSprite>(&mut app), 1, "exactly one target");

    assert!(app.world().resource::<ActiveBoard>().revealed);
    let hidden = app
        .world_mut()
        .query::<(&BoardSprite, &Visibility)>()
        .iter(app.world())
        .filter(|(_, v)| **v == Visibility::Hidden)
        .count();
    assert_eq!(hidden, 0, "every sprite is visible once revealed");
}

#[test]
fn clicking_the_target_scores_and_repopulates() {
    let mut app = find_app(config(30_000.0));
    start(&mut app);
    press::<TargetSprite>(&mut app);

    assert_eq!(session(&app).score(), 1);
    assert_eq!(session(&app).round(), 2);
    assert_eq!(count::<BoardSprite>(&mut app), DECOYS + 1, "old board replaced");
    let stale = app
        .world_mut()
        .query::<&BoardSprite>()
        .iter(app.world())
        .filter(|s| s.round != 2)
        .count();
    assert_eq!(stale, 0);
}

#[test]
fn clicking_a_decoy_changes_nothing() {
    let mut app = find_app(config(30_000.0));
    start(&mut app);

    let decoys: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, (With<BoardSprite>, Without<TargetSprite>)>()
        .iter(app.world())
        .collect();
    assert_eq!(decoys.len(), DECOYS);
    for &decoy in &decoys {
        let entity = app.world().entity(decoy);
        assert!(!entity.contains::<Button>(), "decoys are not buttons");
        assert!(!entity.contains::<Interaction>(), "decoys take no clicks");
    }

    let board_before: Vec<Entity> = {
        let mut sprites: Vec<Entity> = app
            .world_mut()
            .query_filtered::<Entity, With<BoardSprite>>()
            .iter(app.world())
            .collect();
        sprites.sort();
        sprites
    };

    app.world_mut()
        .entity_mut(decoys[0])
        .insert(Interaction::Pressed);
    app.update();

    assert_eq!(session(&app).score(), 0);
    assert_eq!(session(&app).round(), 1);
    let mut board_after: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<BoardSprite>>()
        .iter(app.world())
        .collect();
    board_after.sort();
    assert_eq!(board_after, board_before, "board is not replaced");
    assert_eq!(board_after.len(), DECOYS + 1);
}

#[test]
fn click_for_previous_round_is_ignored() {
    let mut app = find_app(config(30_000.0));
    start(&mut app);
    press::<TargetSprite>(&mut app);

    app.world_mut()
        .write_message(FindGameEvent::TargetFound { round: 1 });
    app.update();

    assert_eq!(session(&app).score(), 1);
    assert_eq!(session(&app).round(), 2);
}

#[test]
fn sprites_land_on_their_slots() {
    let mut app = find_app(config(30_000.0));
    start(&mut app);
    assert!(app.world().resource::<ActiveBoard>().pokeball_opening);

    for _ in 0..8 {
        app.update();
    }

    let mut query = app.world_mut().query::<(&CurvePath, &Flight, &Node)>();
    for (path, flight, node) in query.iter(app.world()) {
        assert!(flight.landed);
        let slot = path.destination();
        assert_eq!(node.left, Val::Px(slot.left));
        assert_eq!(node.top, Val::Px(slot.top));
    }
    assert!(!app.world().resource::<ActiveBoard>().pokeball_opening);

    let pokeball = app
        .world_mut()
        .query_filtered::<&Visibility, With<PokeballSprite>>()
        .single(app.world())
        .copied()
        .expect("pokeball spawned");
    assert_eq!(pokeball, Visibility::Hidden);
}

#[test]
fn countdown_ends_the_game() {
    let mut app = find_app(config(1_000.0));
    start(&mut app);
    press::<TargetSprite>(&mut app);
    run_out_clock(&mut app);

    assert_eq!(session(&app).phase(), FindPhase::Ended);
    assert_eq!(session(&app).score(), 1);
    assert_eq!(count::<BoardSprite>(&mut app), 0, "board hidden on end");
    assert_eq!(count::<FindEndCard>(&mut app), 1);
    assert_eq!(
        session(&app).final_score_message(),
        "Game Over! Your final score is: 1"
    );

    // The board is gone, so a late click cannot score.
    app.world_mut()
        .write_message(FindGameEvent::TargetFound { round: 2 });
    app.update();
    assert_eq!(session(&app).score(), 1);

    press::<FindBackToMenuButton>(&mut app);
    assert_eq!(session(&app).phase(), FindPhase::Menu);
    assert_eq!(count::<FindEndCard>(&mut app), 0);
    assert_eq!(count::<FindStartCard>(&mut app), 1);
}

#[test]
fn signed_in_best_score_is_persisted() {
    let mut app = find_app(config(1_000.0));
    let uid = app
        .world_mut()
        .resource_mut::<Backend>()
        .register("Ash", "ash@example.com", "AB3$defg", "AB3$defg")
        .expect("registration succeeds")
        .uid;

    start(&mut app);
    press::<TargetSprite>(&mut app);
    press::<TargetSprite>(&mut app);
    let scored = session(&app).score();
    assert!(scored >= 1);
    run_out_clock(&mut app);
    assert_eq!(session(&app).phase(), FindPhase::Ended);

    let best = |app: &App| {
        let user = app
            .world()
            .resource::<Backend>()
            .store
            .get_user(&uid)
            .expect("store readable")
            .expect("user document exists");
        ScoreKind::Find.best_of(&user)
    };
    assert_eq!(best(&app), scored);

    // A worse run keeps the stored best.
    press::<FindBackToMenuButton>(&mut app);
    start(&mut app);
    run_out_clock(&mut app);
    assert_eq!(session(&app).score(), 0);
    assert_eq!(best(&app), scored);
}

#[test]
fn leaving_the_screen_resets_the_session() {
    let mut app = find_app(config(30_000.0));
    start(&mut app);
    press::<TargetSprite>(&mut app);

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::MainMenu);
    app.update();

    assert_eq!(session(&app).phase(), FindPhase::Menu);
    assert_eq!(session(&app).score(), 0);
    assert_eq!(count::<BoardSprite>(&mut app), 0);
    assert_eq!(count::<FindGameRoot>(&mut app), 0);
    assert_eq!(count::<PokeballSprite>(&mut app), 0);
    assert!(!app.world().resource::<ActiveBoard>().revealed);
}
