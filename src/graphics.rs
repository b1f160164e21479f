use bevy::prelude::*;

const GAME_FONT_PATH: &str = "fonts/PressStart2P-Regular.ttf";

/// Game font resource.
///
/// All UI text references `font.0.clone()`.  The default handle is Bevy's
/// built-in font, kept when the custom font is not shipped in `assets/`.
#[derive(Resource, Default)]
pub struct GameFont(pub Handle<Font>);

/// Load the custom font from assets at startup.
///
/// Must run before any UI setup systems that spawn text.
pub fn load_game_font(mut font: ResMut<GameFont>, asset_server: Res<AssetServer>) {
    if std::path::Path::new("assets").join(GAME_FONT_PATH).exists() {
        font.0 = asset_server.load(GAME_FONT_PATH);
        info!("Game font loaded from {GAME_FONT_PATH}");
    } else {
        info!("{GAME_FONT_PATH} not found; using the built-in font");
    }
}

/// UI camera; every screen is built from UI nodes.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
