use bevy::prelude::*;
use bevy::window::WindowResolution;

use pokearcade::config::{self, GameConfig};
use pokearcade::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use pokearcade::find_game::FindGamePlugin;
use pokearcade::menu::MenuPlugin;
use pokearcade::{backend, graphics};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "PokéArcade".into(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Compiled defaults; load_game_config overwrites them from
        // assets/game.toml (if present).
        .insert_resource(GameConfig::default())
        .add_plugins(MenuPlugin)
        .add_plugins(FindGamePlugin)
        // The initial OnEnter(MainMenu) runs between PreStartup and Startup,
        // so everything the main menu reads is prepared in PreStartup.
        .add_systems(
            PreStartup,
            (
                config::load_game_config,
                backend::open_backend.after(config::load_game_config),
                graphics::load_game_font,
            ),
        )
        .add_systems(Startup, graphics::setup_camera)
        .run();
}
