//! Headless tests for the [`AppState`] screen machine and the menu screens.
//!
//! These tests use [`MinimalPlugins`]: no window, no rendering, no asset
//! server.  Button presses are simulated by writing `Interaction::Pressed`
//! onto the button entity, which is what the UI focus system would do.
//!
//! Covered scenarios:
//! 1. Default initial state is `MainMenu` and its UI is spawned.
//! 2. A main-menu navigation button enters its screen and despawns the menu.
//! 3. "Main menu" on any screen returns to `MainMenu`.
//! 4. The admin screen denies anonymous players.
//! 5. The quiz start button begins a run with the configured timer.
//! 6. Anyone can open the catalog and see its entries.
//! 7. Saving a catalog entry while anonymous shows the sign-in error.
//! 8. A signed-in player saves an entry from the catalog screen.

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use pokearcade::backend::Backend;
use pokearcade::catalog::PokemonForm;
use pokearcade::config::GameConfig;
use pokearcade::menu::{
    AdminView, AppState, BackToMainButton, CatalogDeleteButton, CatalogEditButton,
    CatalogEntryRow, CatalogRoot, CatalogSaveButton, CatalogView, MainMenuRoot, MenuNavButton,
    MenuPlugin, QuizRoot, QuizScreen, QuizStartButton,
};
use pokearcade::quiz::QuizPhase;
use pokearcade::store::DocumentStore;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Minimal headless app with the menu plugin and compiled default config.
///
/// `InputPlugin` registers the keyboard messages read by the form screens.
fn menu_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, InputPlugin));
    app.insert_resource(GameConfig::default());
    app.add_plugins(MenuPlugin);
    app.update();
    app
}

fn state(app: &App) -> AppState {
    app.world().resource::<State<AppState>>().get().clone()
}

fn count<T: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<T>>()
        .iter(app.world())
        .count()
}

fn psyduck() -> PokemonForm {
    PokemonForm {
        name: "Psyduck".into(),
        photo_url: "https://example.com/psyduck.png".into(),
        kind: "water".into(),
        ..Default::default()
    }
}

/// Put one entry in the store behind the app's backend.
fn seed_catalog(app: &mut App) {
    let pokemon = psyduck().to_new_pokemon(None).expect("valid entry");
    app.world_mut()
        .resource_mut::<Backend>()
        .store
        .create_pokemon(pokemon)
        .expect("entry stored");
}

fn stored_pokemon(app: &App) -> usize {
    app.world()
        .resource::<Backend>()
        .store
        .list_pokemon()
        .expect("store readable")
        .len()
}

/// Mark the first entity carrying `T` as pressed, then run two frames: one
/// for the button system, one for the state transition it requested.
fn press<T: Component>(app: &mut App) {
    let button = app
        .world_mut()
        .query_filtered::<Entity, With<T>>()
        .iter(app.world())
        .next()
        .expect("button not spawned");
    app.world_mut().entity_mut(button).insert(Interaction::Pressed);
    app.update();
    app.update();
}

fn press_nav(app: &mut App, target: AppState) {
    let button = app
        .world_mut()
        .query::<(Entity, &MenuNavButton)>()
        .iter(app.world())
        .find(|(_, nav)| nav.0 == target)
        .map(|(entity, _)| entity)
        .expect("nav button not spawned");
    app.world_mut().entity_mut(button).insert(Interaction::Pressed);
    app.update();
    app.update();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_state_is_main_menu() {
    let mut app = menu_app();
    assert_eq!(state(&app), AppState::MainMenu, "initial state must be MainMenu");
    assert_eq!(count::<MainMenuRoot>(&mut app), 1);
}

#[test]
fn nav_button_enters_quiz_and_despawns_menu() {
    let mut app = menu_app();
    press_nav(&mut app, AppState::Quiz);

    assert_eq!(state(&app), AppState::Quiz);
    assert_eq!(count::<MainMenuRoot>(&mut app), 0, "main menu must be despawned");
    assert_eq!(count::<QuizRoot>(&mut app), 1);
}

#[test]
fn main_menu_button_returns_from_any_screen() {
    for target in [
        AppState::Quiz,
        AppState::Leaderboard,
        AppState::Account,
        AppState::Catalog,
        AppState::Admin,
    ] {
        let mut app = menu_app();
        press_nav(&mut app, target.clone());
        assert_eq!(state(&app), target);

        press::<BackToMainButton>(&mut app);
        assert_eq!(state(&app), AppState::MainMenu, "{target:?} must return to MainMenu");
        assert_eq!(count::<MainMenuRoot>(&mut app), 1);
    }
}

#[test]
fn admin_screen_denies_anonymous_players() {
    let mut app = menu_app();
    press_nav(&mut app, AppState::Admin);

    let view = app.world().resource::<AdminView>();
    assert!(!view.is_admin);
    let message = view.message.as_ref().expect("denial message");
    assert!(message.is_error);
    assert_eq!(message.text, "Access denied. Admin privileges required.");
}

#[test]
fn quiz_start_button_begins_a_run() {
    let mut app = menu_app();
    press_nav(&mut app, AppState::Quiz);
    press::<QuizStartButton>(&mut app);

    let screen = app.world().resource::<QuizScreen>();
    assert_eq!(screen.session.phase(), QuizPhase::Running);
    assert_eq!(screen.session.score(), 0);
    assert_eq!(screen.session.question_number(), 0);
    assert_eq!(screen.session.options().len(), 4);
    assert_eq!(
        screen.session.remaining_secs(),
        GameConfig::default().quiz_duration_secs
    );
}

#[test]
fn catalog_lists_entries_for_anonymous_players() {
    let mut app = menu_app();
    seed_catalog(&mut app);
    press_nav(&mut app, AppState::Catalog);

    assert_eq!(state(&app), AppState::Catalog);
    assert_eq!(count::<CatalogRoot>(&mut app), 1);
    assert_eq!(count::<CatalogEntryRow>(&mut app), 1);
    assert_eq!(count::<CatalogEditButton>(&mut app), 0, "no editing while anonymous");
    assert_eq!(count::<CatalogDeleteButton>(&mut app), 0);

    let view = app.world().resource::<CatalogView>();
    assert!(!view.signed_in);
    assert_eq!(view.visible_pokemon()[0].name, "Psyduck");
}

#[test]
fn anonymous_catalog_save_asks_for_sign_in() {
    let mut app = menu_app();
    press_nav(&mut app, AppState::Catalog);
    app.world_mut()
        .resource_mut::<CatalogView>()
        .fill_form(&psyduck());
    press::<CatalogSaveButton>(&mut app);

    let view = app.world().resource::<CatalogView>();
    let message = view.message.as_ref().expect("error message");
    assert!(message.is_error);
    assert_eq!(message.text, "Please log in to manage Pokémon.");
    assert_eq!(stored_pokemon(&app), 0);
}

#[test]
fn signed_in_player_saves_from_catalog_screen() {
    let mut app = menu_app();
    app.world_mut()
        .resource_mut::<Backend>()
        .register("Misty", "misty@example.com", "AB3$defg", "AB3$defg")
        .expect("registration succeeds");
    press_nav(&mut app, AppState::Catalog);
    assert!(app.world().resource::<CatalogView>().signed_in);

    app.world_mut()
        .resource_mut::<CatalogView>()
        .fill_form(&psyduck());
    press::<CatalogSaveButton>(&mut app);

    let view = app.world().resource::<CatalogView>();
    assert_eq!(view.message.as_ref().unwrap().text, "Pokémon added successfully!");
    assert_eq!(view.pokemon.len(), 1);
    assert_eq!(stored_pokemon(&app), 1);
    assert_eq!(count::<CatalogEntryRow>(&mut app), 1);
    assert_eq!(count::<CatalogEditButton>(&mut app), 1);
}
