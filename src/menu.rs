//! Screen state machine and every menu screen.
//!
//! ## States
//!
//! | State         | Description                                   |
//! |---------------|-----------------------------------------------|
//! | `MainMenu`    | Initial state; navigation buttons             |
//! | `FindGame`    | Find-the-Pokémon round loop (`find_game`)     |
//! | `Quiz`        | Who's-that-Pokémon quiz                       |
//! | `Leaderboard` | Best quiz and find-game scores                |
//! | `Account`     | Login / registration form                     |
//! | `Catalog`     | Pokémon list; editing once signed in          |
//! | `Admin`       | User admin toggle                             |
//!
//! Each screen spawns its UI on `OnEnter`, despawns it by root marker on
//! `OnExit` and runs its input systems under `in_state`.

use bevy::prelude::*;

use crate::backend::Backend;
use crate::graphics::GameFont;

mod account;
mod admin;
mod catalog;
mod common;
mod form;
mod leaderboard;
mod main_menu;
mod quiz;
mod types;

pub use account::{AccountForm, AccountMode, FormMessage};
pub use admin::AdminView;
pub use catalog::CatalogView;
pub use form::{FormAction, FormField, TextForm};
pub use leaderboard::LeaderboardView;
pub use quiz::QuizScreen;
pub use types::*;

pub(crate) use common::*;

/// Registers `AppState` and the menu, account, quiz, leaderboard, catalog
/// and admin screens.
///
/// Must be added before [`crate::find_game::FindGamePlugin`], which runs under
/// `in_state(AppState::FindGame)`.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_resource::<GameFont>()
            .init_resource::<Backend>()
            .init_resource::<AccountForm>()
            .init_resource::<QuizScreen>()
            .init_resource::<LeaderboardView>()
            .init_resource::<CatalogView>()
            .init_resource::<AdminView>()
            .add_systems(
                Update,
                (button_hover_system, main_menu::back_to_main_system),
            )
            // Main menu
            .add_systems(OnEnter(AppState::MainMenu), main_menu::setup_main_menu)
            .add_systems(OnExit(AppState::MainMenu), despawn_screen::<MainMenuRoot>)
            .add_systems(
                Update,
                main_menu::main_menu_button_system.run_if(in_state(AppState::MainMenu)),
            )
            // Account
            .add_systems(OnEnter(AppState::Account), account::setup_account)
            .add_systems(OnExit(AppState::Account), despawn_screen::<AccountRoot>)
            .add_systems(
                Update,
                (
                    account::account_input_system,
                    account::account_button_system,
                    account::account_display_system,
                )
                    .chain()
                    .run_if(in_state(AppState::Account)),
            )
            // Quiz
            .add_systems(OnEnter(AppState::Quiz), quiz::setup_quiz)
            .add_systems(OnExit(AppState::Quiz), quiz::cleanup_quiz)
            .add_systems(
                Update,
                (
                    quiz::quiz_clock_system,
                    quiz::quiz_button_system,
                    quiz::quiz_hud_system,
                    quiz::quiz_body_system,
                )
                    .chain()
                    .run_if(in_state(AppState::Quiz)),
            )
            // Leaderboard
            .add_systems(OnEnter(AppState::Leaderboard), leaderboard::setup_leaderboard)
            .add_systems(OnExit(AppState::Leaderboard), despawn_screen::<LeaderboardRoot>)
            .add_systems(
                Update,
                (
                    leaderboard::leaderboard_button_system,
                    leaderboard::leaderboard_tables_system,
                )
                    .chain()
                    .run_if(in_state(AppState::Leaderboard)),
            )
            // Catalog
            .add_systems(OnEnter(AppState::Catalog), catalog::setup_catalog)
            .add_systems(OnExit(AppState::Catalog), despawn_screen::<CatalogRoot>)
            .add_systems(
                Update,
                (
                    catalog::catalog_input_system,
                    catalog::catalog_button_system,
                    catalog::catalog_body_system,
                )
                    .chain()
                    .run_if(in_state(AppState::Catalog)),
            )
            // Admin
            .add_systems(OnEnter(AppState::Admin), admin::setup_admin)
            .add_systems(OnExit(AppState::Admin), despawn_screen::<AdminRoot>)
            .add_systems(
                Update,
                (
                    admin::admin_button_system,
                    admin::admin_body_system,
                )
                    .chain()
                    .run_if(in_state(AppState::Admin)),
            );
    }
}
