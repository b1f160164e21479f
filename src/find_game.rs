//! "Find the Pokémon" screen: the round loop wired into Bevy.
//!
//! [`GameSession`] owns the rules.  This plugin feeds it [`FindGameEvent`]s
//! (button presses, target clicks, one countdown tick per frame) and reacts to
//! the [`Transition`]s it returns, forwarded as [`FindTransition`] messages:
//!
//! | Transition            | Reaction                                        |
//! |-----------------------|-------------------------------------------------|
//! | `Started`/`NextRound` | despawn the old board, populate and spawn a new one |
//! | `Ended`               | despawn the board, show the end card, persist   |
//! | `BackToMenu`          | show the start card                             |
//!
//! ## Systems (registered by `FindGamePlugin`)
//!
//! | System                    | Schedule                  |
//! |---------------------------|---------------------------|
//! | `setup_find_game`         | `OnEnter(FindGame)`       |
//! | `cleanup_find_game`       | `OnExit(FindGame)`        |
//! | input → dispatch → board → gate → flight → HUD | `Update / in FindGame`, chained |

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::backend::Backend;
use crate::board::{launch_origin, populate_round, CurvePath, GateStatus, LoadGate, SpritePool, Viewport};
use crate::bridge::ScoreKind;
use crate::config::GameConfig;
use crate::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::graphics::GameFont;
use crate::menu::{
    back_style, card_bg, card_border, hint_color, label_color, primary_style, spacer, spawn_button,
    spawn_label, subtitle_color, text_font, timer_color, title_color, AppState, BackToMainButton,
};
use crate::session::{FindGameEvent, FindPhase, GameSession, Transition};

// ── Messages & resources ──────────────────────────────────────────────────────

/// A non-ignored [`Transition`] produced by the session this frame.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct FindTransition(pub Transition);

/// Random source for board population; seeded from entropy by default.
#[derive(Resource)]
pub struct BoardRng(pub StdRng);

impl Default for BoardRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// The board currently on screen.
#[derive(Resource, Debug, Default)]
pub struct ActiveBoard {
    /// Round the spawned sprites belong to.
    pub round: u64,
    pub images: Vec<Handle<Image>>,
    pub gate: Option<LoadGate>,
    /// Every image settled (or the load deadline passed); sprites visible.
    pub revealed: bool,
    /// Pokéball shown at the launch origin while sprites are in flight.
    pub pokeball_opening: bool,
}

impl ActiveBoard {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

// ── Components ────────────────────────────────────────────────────────────────

/// Root node of the HUD; despawned on `OnExit(FindGame)`.
#[derive(Component)]
pub struct FindGameRoot;

/// Every sprite of a board, target included.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoardSprite {
    pub round: u64,
}

/// The one clickable sprite of a board.
#[derive(Component, Debug, Clone, Copy)]
pub struct TargetSprite {
    pub round: u64,
}

/// Progress along the sprite's [`CurvePath`].
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Flight {
    pub elapsed: f32,
    pub landed: bool,
}

#[derive(Component)]
pub struct PokeballSprite;

#[derive(Component)]
pub struct FindTimeText;

#[derive(Component)]
pub struct FindScoreText;

/// Instructions overlay shown in `FindPhase::Menu`.
#[derive(Component)]
pub struct FindStartCard;

/// Final-score overlay shown in `FindPhase::Ended`.
#[derive(Component)]
pub struct FindEndCard;

#[derive(Component)]
pub struct FindStartButton;

/// End card's "Back to menu": returns to the start card.
#[derive(Component)]
pub struct FindBackToMenuButton;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct FindGamePlugin;

impl Plugin for FindGamePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<FindGameEvent>()
            .add_message::<FindTransition>()
            .init_resource::<GameConfig>()
            .init_resource::<GameSession>()
            .init_resource::<SpritePool>()
            .init_resource::<ActiveBoard>()
            .init_resource::<BoardRng>()
            .add_systems(OnEnter(AppState::FindGame), setup_find_game)
            .add_systems(OnExit(AppState::FindGame), cleanup_find_game)
            .add_systems(
                Update,
                (
                    find_button_system,
                    target_click_system,
                    countdown_tick_system,
                    dispatch_find_events,
                    apply_round_transitions,
                    persist_find_score,
                    load_gate_system,
                    flight_system,
                    pokeball_system,
                    find_hud_system,
                )
                    .chain()
                    .run_if(in_state(AppState::FindGame)),
            );
    }
}

// ── Enter / exit ──────────────────────────────────────────────────────────────

pub fn setup_find_game(
    mut commands: Commands,
    config: Res<GameConfig>,
    font: Res<GameFont>,
    asset_server: Option<Res<AssetServer>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    commands.insert_resource(GameSession::new(config.game_duration_ms));
    commands.insert_resource(SpritePool::from_config(&config));
    commands.insert_resource(ActiveBoard::default());

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(12.0)),
                column_gap: Val::Px(32.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            ZIndex(100),
            FindGameRoot,
        ))
        .with_children(|hud| {
            hud.spawn((
                Text::new(""),
                text_font(&font, 22.0),
                TextColor(timer_color()),
                FindTimeText,
            ));
            hud.spawn((
                Text::new(""),
                text_font(&font, 22.0),
                TextColor(label_color()),
                FindScoreText,
            ));
        });

    let origin = launch_origin(viewport(&windows), &config);
    let pokeball: Handle<Image> = asset_server
        .as_ref()
        .map(|server| server.load(config.pokeball_image.clone()))
        .unwrap_or_default();
    commands.spawn((
        ImageNode::new(pokeball),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(origin.left),
            top: Val::Px(origin.top),
            width: Val::Px(config.sprite_size),
            height: Val::Px(config.sprite_size),
            ..default()
        },
        Visibility::Hidden,
        ZIndex(50),
        PokeballSprite,
    ));

    spawn_start_card(&mut commands, &font);
}

/// Leaving the screen cancels the countdown and drops the board.
#[allow(clippy::type_complexity)]
pub fn cleanup_find_game(
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    mut board: ResMut<ActiveBoard>,
    screen: Query<
        Entity,
        Or<(
            With<FindGameRoot>,
            With<BoardSprite>,
            With<PokeballSprite>,
            With<FindStartCard>,
            With<FindEndCard>,
        )>,
    >,
) {
    session.reset();
    board.clear();
    for entity in screen.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[allow(clippy::type_complexity)]
pub fn find_button_system(
    start_query: Query<&Interaction, (Changed<Interaction>, With<FindStartButton>)>,
    back_query: Query<&Interaction, (Changed<Interaction>, With<FindBackToMenuButton>)>,
    mut events: MessageWriter<FindGameEvent>,
) {
    if start_query.iter().any(|i| *i == Interaction::Pressed) {
        events.write(FindGameEvent::Start);
    }
    if back_query.iter().any(|i| *i == Interaction::Pressed) {
        events.write(FindGameEvent::ReturnToMenu);
    }
}

/// Only the target is a `Button`; decoys never produce input.
pub fn target_click_system(
    targets: Query<(&Interaction, &TargetSprite), Changed<Interaction>>,
    board: Res<ActiveBoard>,
    mut events: MessageWriter<FindGameEvent>,
) {
    for (interaction, target) in targets.iter() {
        if *interaction == Interaction::Pressed && board.revealed && target.round == board.round {
            events.write(FindGameEvent::TargetFound {
                round: target.round,
            });
        }
    }
}

/// One countdown sample per frame while playing.
pub fn countdown_tick_system(session: Res<GameSession>, mut events: MessageWriter<FindGameEvent>) {
    if session.phase() == FindPhase::Playing {
        events.write(FindGameEvent::Tick);
    }
}

pub fn dispatch_find_events(
    time: Res<Time>,
    mut events: MessageReader<FindGameEvent>,
    mut session: ResMut<GameSession>,
    mut transitions: MessageWriter<FindTransition>,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    for event in events.read() {
        let transition = session.handle(*event, now_ms);
        if transition != Transition::Ignored {
            transitions.write(FindTransition(transition));
        }
    }
}

// ── Board ─────────────────────────────────────────────────────────────────────

fn viewport(windows: &Query<&Window, With<PrimaryWindow>>) -> Viewport {
    match windows.single() {
        Ok(window) => Viewport {
            width: window.width(),
            height: window.height(),
        },
        Err(_) => Viewport {
            width: WINDOW_WIDTH as f32,
            height: WINDOW_HEIGHT as f32,
        },
    }
}

/// Render the last board-affecting transition of the frame.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn apply_round_transitions(
    mut commands: Commands,
    mut transitions: MessageReader<FindTransition>,
    mut board: ResMut<ActiveBoard>,
    mut rng: ResMut<BoardRng>,
    pool: Res<SpritePool>,
    config: Res<GameConfig>,
    time: Res<Time>,
    font: Res<GameFont>,
    session: Res<GameSession>,
    asset_server: Option<Res<AssetServer>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    existing: Query<Entity, Or<(With<BoardSprite>, With<FindStartCard>, With<FindEndCard>)>>,
) {
    let Some(FindTransition(last)) = transitions
        .read()
        .filter(|t| !matches!(t.0, Transition::Ticked { .. }))
        .last()
        .copied()
    else {
        return;
    };

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }
    board.clear();

    match last {
        Transition::Started { round } | Transition::NextRound { round, .. } => {
            let view = viewport(&windows);
            let placed = populate_round(&mut rng.0, view, &pool, &config);
            board.round = round;
            for placement in placed.sprites {
                let image: Handle<Image> = asset_server
                    .as_ref()
                    .map(|server| server.load(placement.image.clone()))
                    .unwrap_or_default();
                board.images.push(image.clone());
                let origin = placement.path.origin;
                let mut sprite = commands.spawn((
                    ImageNode::new(image),
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(origin.left),
                        top: Val::Px(origin.top),
                        width: Val::Px(config.sprite_size),
                        height: Val::Px(config.sprite_size),
                        ..default()
                    },
                    Visibility::Hidden,
                    ZIndex(if placement.is_target { 1 } else { 0 }),
                    BoardSprite { round },
                    placement.path,
                    Flight::default(),
                ));
                if placement.is_target {
                    sprite.insert((Button, TargetSprite { round }));
                }
            }
            board.gate = Some(LoadGate::new(
                board.images.len(),
                time.elapsed_secs_f64(),
                config.image_load_timeout_secs,
            ));
        }
        Transition::Ended { .. } => {
            spawn_end_card(&mut commands, &font, &session.final_score_message());
        }
        Transition::BackToMenu => {
            spawn_start_card(&mut commands, &font);
        }
        Transition::Ticked { .. } | Transition::Ignored => {}
    }
}

/// Keep the best find-game score of the signed-in player.
pub fn persist_find_score(
    mut transitions: MessageReader<FindTransition>,
    backend: Option<ResMut<Backend>>,
) {
    let Some(mut backend) = backend else {
        return;
    };
    for FindTransition(transition) in transitions.read() {
        if let Transition::Ended { final_score } = transition {
            backend.persist_best(ScoreKind::Find, *final_score);
        }
    }
}

fn is_settled(server: &AssetServer, handle: &Handle<Image>) -> bool {
    matches!(
        server.get_load_state(handle.id()),
        Some(LoadState::Loaded) | Some(LoadState::Failed(_))
    )
}

/// Reveal the board once every image settled or the deadline passed.
pub fn load_gate_system(
    time: Res<Time>,
    asset_server: Option<Res<AssetServer>>,
    mut board: ResMut<ActiveBoard>,
    mut sprites: Query<(&BoardSprite, &mut Visibility)>,
) {
    if !matches!(board.gate.as_ref(), Some(gate) if !gate.has_fired()) {
        return;
    }
    let board = &mut *board;
    let Some(gate) = board.gate.as_mut() else {
        return;
    };
    let settled = match &asset_server {
        Some(server) => board.images.iter().filter(|h| is_settled(server, h)).count(),
        None => board.images.len(),
    };
    match gate.poll(settled, time.elapsed_secs_f64()) {
        GateStatus::Pending => return,
        GateStatus::Ready => {}
        GateStatus::TimedOut => warn!(
            "Round {}: {} of {} images still loading at the deadline; revealing anyway",
            board.round,
            gate.total() - settled,
            gate.total()
        ),
    }

    board.revealed = true;
    board.pokeball_opening = true;
    for (sprite, mut visibility) in sprites.iter_mut() {
        if sprite.round == board.round {
            *visibility = Visibility::Inherited;
        }
    }
}

/// Move revealed sprites along their curves; landing closes the pokéball.
pub fn flight_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut board: ResMut<ActiveBoard>,
    mut flights: Query<(&BoardSprite, &CurvePath, &mut Flight, &mut Node)>,
) {
    if !board.revealed {
        return;
    }
    let dt = time.delta_secs();
    for (sprite, path, mut flight, mut node) in flights.iter_mut() {
        if sprite.round != board.round || flight.landed {
            continue;
        }
        flight.elapsed += dt;
        let t = (flight.elapsed / config.flight_duration_secs).min(1.0);
        let at = path.point_at(t);
        node.left = Val::Px(at.left);
        node.top = Val::Px(at.top);
        if t >= 1.0 {
            flight.landed = true;
            board.pokeball_opening = false;
        }
    }
}

pub fn pokeball_system(
    board: Res<ActiveBoard>,
    mut pokeball: Query<&mut Visibility, With<PokeballSprite>>,
) {
    if !board.is_changed() {
        return;
    }
    for mut visibility in pokeball.iter_mut() {
        *visibility = if board.pokeball_opening {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[allow(clippy::type_complexity)]
pub fn find_hud_system(
    session: Res<GameSession>,
    mut time_text: Query<&mut Text, (With<FindTimeText>, Without<FindScoreText>)>,
    mut score_text: Query<&mut Text, (With<FindScoreText>, Without<FindTimeText>)>,
) {
    if !session.is_changed() {
        return;
    }
    for mut text in time_text.iter_mut() {
        text.0 = format!("Time: {:.1}s", session.display_secs());
    }
    for mut text in score_text.iter_mut() {
        text.0 = format!("Score: {}", session.score());
    }
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn overlay_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        position_type: PositionType::Absolute,
        left: Val::Px(0.0),
        top: Val::Px(0.0),
        ..default()
    }
}

fn card_node() -> Node {
    Node {
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        padding: UiRect::all(Val::Px(40.0)),
        row_gap: Val::Px(12.0),
        border: UiRect::all(Val::Px(2.0)),
        min_width: Val::Px(380.0),
        ..default()
    }
}

fn spawn_start_card(commands: &mut Commands, font: &GameFont) {
    commands
        .spawn((
            overlay_node(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.82)),
            ZIndex(300),
            FindStartCard,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((card_node(), BackgroundColor(card_bg()), BorderColor::all(card_border())))
                .with_children(|card| {
                    spawn_label(card, font, "Find the Pokémon!", 40.0, title_color());
                    spawn_label(
                        card,
                        font,
                        "One Pokémon hides among the trainers. Click it to score and get a new board.",
                        15.0,
                        subtitle_color(),
                    );
                    spawn_label(
                        card,
                        font,
                        "Find as many as you can before the clock runs out.",
                        15.0,
                        subtitle_color(),
                    );
                    spacer(card, 8.0);
                    spawn_button(card, font, "START", 220.0, primary_style(), FindStartButton);
                    spawn_button(card, font, "MAIN MENU", 220.0, back_style(), BackToMainButton);
                });
        });
}

fn spawn_end_card(commands: &mut Commands, font: &GameFont, message: &str) {
    commands
        .spawn((
            overlay_node(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.82)),
            ZIndex(300),
            FindEndCard,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((card_node(), BackgroundColor(card_bg()), BorderColor::all(card_border())))
                .with_children(|card| {
                    spawn_label(card, font, message, 26.0, title_color());
                    spawn_label(card, font, "Signed-in players keep their best score.", 13.0, hint_color());
                    spacer(card, 8.0);
                    spawn_button(card, font, "BACK TO MENU", 220.0, primary_style(), FindBackToMenuButton);
                    spawn_button(card, font, "MAIN MENU", 220.0, back_style(), BackToMainButton);
                });
        });
}
