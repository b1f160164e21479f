use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::bridge::ScoreKind;
use crate::quiz::{QuizPhase, QuizSession};

/// Quiz screen state: the session, its one-second clock and the shuffle RNG.
#[derive(Resource)]
pub struct QuizScreen {
    pub session: QuizSession,
    pub clock: Timer,
    pub rng: StdRng,
    /// Body needs rebuilding.
    pub dirty: bool,
    /// Best score already handed to the bridge for this run.
    pub persisted: bool,
}

impl Default for QuizScreen {
    fn default() -> Self {
        Self::new(QuizSession::default())
    }
}

impl QuizScreen {
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            clock: Timer::from_seconds(1.0, TimerMode::Repeating),
            rng: StdRng::from_entropy(),
            dirty: true,
            persisted: false,
        }
    }

    pub fn start(&mut self, signed_in: bool) {
        self.session.start(signed_in, &mut self.rng);
        self.clock.reset();
        self.persisted = false;
        self.dirty = true;
    }

    /// Hand the final score to the bridge once per finished run.
    pub fn persist_if_ended(&mut self, backend: &mut Backend) {
        if self.session.phase() == QuizPhase::Ended && !self.persisted {
            self.persisted = true;
            backend.persist_best(ScoreKind::Quiz, self.session.score());
        }
    }
}

pub(super) fn setup_quiz(
    mut commands: Commands,
    font: Res<GameFont>,
    config: Res<crate::config::GameConfig>,
    mut screen: ResMut<QuizScreen>,
) {
    screen.session = QuizSession::from_config(&config);
    screen.dirty = true;
    screen.persisted = false;

    commands
        .spawn((screen_root_node(), BackgroundColor(Color::BLACK), QuizRoot))
        .with_children(|root| {
            spawn_label(root, &font, "Who's that Pokémon?", 40.0, title_color());
            root.spawn(Node {
                column_gap: Val::Px(40.0),
                ..default()
            })
            .with_children(|hud| {
                hud.spawn((
                    Text::new(""),
                    text_font(&font, 20.0),
                    TextColor(timer_color()),
                    QuizTimerText,
                ));
                hud.spawn((
                    Text::new(""),
                    text_font(&font, 20.0),
                    TextColor(label_color()),
                    QuizScoreText,
                ));
            });
            root.spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(8.0),
                    ..default()
                },
                QuizBody,
            ));
            spacer(root, 12.0);
            spawn_button(root, &font, "MAIN MENU", 240.0, back_style(), BackToMainButton);
        });
}

/// Advance the quiz clock in whole seconds.
pub(super) fn quiz_clock_system(
    time: Res<Time>,
    mut screen: ResMut<QuizScreen>,
    mut backend: ResMut<Backend>,
) {
    if screen.session.phase() != QuizPhase::Running {
        return;
    }
    screen.clock.tick(time.delta());
    for _ in 0..screen.clock.times_finished_this_tick() {
        if screen.session.tick_second() {
            info!("Quiz time is up");
            screen.dirty = true;
            break;
        }
    }
    screen.persist_if_ended(&mut backend);
}

#[allow(clippy::type_complexity)]
pub(super) fn quiz_button_system(
    start_query: Query<
        &Interaction,
        (
            Changed<Interaction>,
            Or<(With<QuizStartButton>, With<QuizAgainButton>)>,
        ),
    >,
    option_query: Query<(&Interaction, &QuizOptionButton), Changed<Interaction>>,
    next_query: Query<&Interaction, (Changed<Interaction>, With<QuizNextButton>)>,
    mut screen: ResMut<QuizScreen>,
    mut backend: ResMut<Backend>,
) {
    let screen = &mut *screen;

    if start_query.iter().any(|i| *i == Interaction::Pressed) {
        screen.start(backend.is_signed_in());
    }

    for (interaction, option) in option_query.iter() {
        if *interaction == Interaction::Pressed && screen.session.check_answer(option.0).is_some() {
            screen.dirty = true;
        }
    }

    if next_query.iter().any(|i| *i == Interaction::Pressed) {
        screen.session.next_question(&mut screen.rng);
        screen.dirty = true;
    }

    screen.persist_if_ended(&mut backend);
}

pub(super) fn quiz_hud_system(
    screen: Res<QuizScreen>,
    mut timer_text: Query<(&mut Text, &mut TextColor), (With<QuizTimerText>, Without<QuizScoreText>)>,
    mut score_text: Query<&mut Text, (With<QuizScoreText>, Without<QuizTimerText>)>,
) {
    if !screen.is_changed() {
        return;
    }
    let session = &screen.session;
    for (mut text, mut color) in timer_text.iter_mut() {
        text.0 = format!("Time: {}s", session.remaining_secs());
        *color = TextColor(if session.is_time_low() {
            warning_color()
        } else {
            timer_color()
        });
    }
    for mut text in score_text.iter_mut() {
        text.0 = format!("Score: {}", session.score());
    }
}

/// Rebuild the body for the current phase and question.
pub(super) fn quiz_body_system(
    mut commands: Commands,
    font: Res<GameFont>,
    asset_server: Option<Res<AssetServer>>,
    mut screen: ResMut<QuizScreen>,
    body: Query<Entity, With<QuizBody>>,
) {
    if !screen.dirty {
        return;
    }
    let Ok(body) = body.single() else {
        return;
    };
    screen.dirty = false;

    let session = &screen.session;
    commands.entity(body).despawn_related::<Children>();
    commands.entity(body).with_children(|body| match session.phase() {
        QuizPhase::Idle => {
            spawn_label(
                body,
                &font,
                "Name as many Pokémon as you can before the clock runs out.",
                16.0,
                subtitle_color(),
            );
            spawn_label(
                body,
                &font,
                "Signed-in players earn a bonus for every correct answer.",
                14.0,
                hint_color(),
            );
            spacer(body, 12.0);
            spawn_button(body, &font, "START QUIZ", 240.0, primary_style(), QuizStartButton);
        }
        QuizPhase::Running => {
            let Some(question) = session.current_question() else {
                return;
            };
            let image_path = if session.has_answered() {
                question.image
            } else {
                question.silhouette
            };
            let image = asset_server
                .as_ref()
                .map(|server| server.load(image_path))
                .unwrap_or_default();
            body.spawn((
                ImageNode::new(image),
                Node {
                    width: Val::Px(220.0),
                    height: Val::Px(220.0),
                    ..default()
                },
            ));
            spawn_label(
                body,
                &font,
                format!("Question {}", session.question_number() + 1),
                14.0,
                hint_color(),
            );
            for &option in session.options() {
                spawn_button(body, &font, option, 280.0, option_style(), QuizOptionButton(option));
            }
            if let Some(answer) = session.answer() {
                let color = match answer {
                    crate::quiz::AnswerResult::Correct => success_color(),
                    crate::quiz::AnswerResult::Wrong { .. } => error_color(),
                };
                spawn_label(body, &font, answer.message(), 18.0, color);
                spawn_button(body, &font, "NEXT", 200.0, primary_style(), QuizNextButton);
            }
        }
        QuizPhase::Ended => {
            spawn_label(body, &font, session.final_score_message(), 24.0, title_color());
            spacer(body, 12.0);
            spawn_button(body, &font, "PLAY AGAIN", 240.0, primary_style(), QuizAgainButton);
        }
    });
}

/// Leaving the screen stops the clock; the next visit starts idle.
pub(super) fn cleanup_quiz(
    mut commands: Commands,
    root: Query<Entity, With<QuizRoot>>,
    mut screen: ResMut<QuizScreen>,
) {
    for entity in root.iter() {
        commands.entity(entity).despawn();
    }
    screen.session.reset();
    screen.dirty = true;
}
