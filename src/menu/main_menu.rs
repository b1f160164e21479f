use super::*;

/// Spawn the full-screen main menu.
///
/// Layout:
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │               PokéArcade                    │
/// │     Signed in as Ash  /  Playing as guest   │
/// │                                             │
/// │           [ FIND THE POKÉMON ]              │
/// │           [ WHO'S THAT POKÉMON? ]           │
/// │           [ LEADERBOARD ]                   │
/// │           [ ACCOUNT ]                       │
/// │           [ POKÉDEX ]                       │
/// │           [ ADMIN ]                         │
/// │           [ QUIT ]                          │
/// └─────────────────────────────────────────────┘
/// ```
pub(super) fn setup_main_menu(mut commands: Commands, font: Res<GameFont>, backend: Res<Backend>) {
    let status = match backend.display_name() {
        Some(name) => format!("Signed in as {name}"),
        None => "Playing as guest. Sign in to save your best scores.".to_string(),
    };

    commands
        .spawn((
            Node {
                justify_content: JustifyContent::Center,
                ..screen_root_node()
            },
            BackgroundColor(Color::BLACK),
            MainMenuRoot,
        ))
        .with_children(|root| {
            spawn_label(root, &font, "PokéArcade", 56.0, title_color());
            spacer(root, 6.0);
            root.spawn((
                Text::new(status),
                text_font(&font, 16.0),
                TextColor(subtitle_color()),
                SignedInText,
            ));
            spacer(root, 36.0);

            let entries = [
                ("FIND THE POKÉMON", AppState::FindGame),
                ("WHO'S THAT POKÉMON?", AppState::Quiz),
                ("LEADERBOARD", AppState::Leaderboard),
                ("ACCOUNT", AppState::Account),
                ("POKÉDEX", AppState::Catalog),
                ("ADMIN", AppState::Admin),
            ];
            for (label, state) in entries {
                spawn_button(root, &font, label, 300.0, primary_style(), MenuNavButton(state));
                spacer(root, 4.0);
            }

            spacer(root, 10.0);
            spawn_button(root, &font, "QUIT", 300.0, danger_style(), MenuQuitButton);
            spacer(root, 36.0);
            spawn_label(root, &font, "v0.1.0  ·  Bevy 0.17", 12.0, hint_color());
        });
}

/// Navigate on press; Quit sends [`AppExit`].
#[allow(clippy::type_complexity)]
pub(super) fn main_menu_button_system(
    nav_query: Query<(&Interaction, &MenuNavButton), Changed<Interaction>>,
    quit_query: Query<&Interaction, (Changed<Interaction>, With<MenuQuitButton>)>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
) {
    for (interaction, nav) in nav_query.iter() {
        if *interaction == Interaction::Pressed {
            next_state.set(nav.0.clone());
        }
    }

    for interaction in quit_query.iter() {
        if *interaction == Interaction::Pressed {
            exit.write(bevy::app::AppExit::Success);
        }
    }
}

/// Any screen's "Main menu" button.
pub(super) fn back_to_main_system(
    query: Query<&Interaction, (Changed<Interaction>, With<BackToMainButton>)>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for interaction in query.iter() {
        if *interaction == Interaction::Pressed {
            next_state.set(AppState::MainMenu);
        }
    }
}
