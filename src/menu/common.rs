use bevy::prelude::*;

use crate::graphics::GameFont;

pub(crate) fn start_bg() -> Color {
    Color::srgb(0.08, 0.36, 0.14)
}
pub(crate) fn start_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
pub(crate) fn start_text() -> Color {
    Color::srgb(0.75, 1.0, 0.80)
}
pub(crate) fn quit_bg() -> Color {
    Color::srgb(0.28, 0.06, 0.06)
}
pub(crate) fn quit_border() -> Color {
    Color::srgb(0.60, 0.12, 0.12)
}
pub(crate) fn quit_text() -> Color {
    Color::srgb(1.0, 0.65, 0.65)
}
pub(crate) fn title_color() -> Color {
    Color::srgb(0.98, 0.80, 0.10)
}
pub(crate) fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}
pub(crate) fn hint_color() -> Color {
    Color::srgb(0.28, 0.28, 0.35)
}

pub(crate) fn card_bg() -> Color {
    Color::srgb(0.06, 0.09, 0.18)
}
pub(crate) fn card_border() -> Color {
    Color::srgb(0.22, 0.38, 0.72)
}
pub(crate) fn label_color() -> Color {
    Color::srgb(0.90, 0.90, 1.0)
}
pub(crate) fn back_bg() -> Color {
    Color::srgb(0.12, 0.12, 0.18)
}
pub(crate) fn back_border() -> Color {
    Color::srgb(0.30, 0.30, 0.46)
}
pub(crate) fn back_text() -> Color {
    Color::srgb(0.55, 0.55, 0.70)
}
pub(crate) fn error_color() -> Color {
    Color::srgb(1.0, 0.35, 0.35)
}
pub(crate) fn success_color() -> Color {
    Color::srgb(0.35, 0.90, 0.45)
}
pub(crate) fn warning_color() -> Color {
    Color::srgb(1.0, 0.20, 0.20)
}
pub(crate) fn timer_color() -> Color {
    Color::srgb(0.96, 0.72, 0.0)
}

/// Palette of a clickable button: background, border, resting text colour.
#[derive(Clone, Copy)]
pub(crate) struct ButtonStyle {
    pub bg: Color,
    pub border: Color,
    pub text: Color,
}

pub(crate) fn primary_style() -> ButtonStyle {
    ButtonStyle {
        bg: start_bg(),
        border: start_border(),
        text: start_text(),
    }
}

pub(crate) fn danger_style() -> ButtonStyle {
    ButtonStyle {
        bg: quit_bg(),
        border: quit_border(),
        text: quit_text(),
    }
}

pub(crate) fn back_style() -> ButtonStyle {
    ButtonStyle {
        bg: back_bg(),
        border: back_border(),
        text: back_text(),
    }
}

pub(crate) fn option_style() -> ButtonStyle {
    ButtonStyle {
        bg: card_bg(),
        border: card_border(),
        text: label_color(),
    }
}

/// Resting text colour of a button, restored when the pointer leaves it.
#[derive(Component, Clone, Copy)]
pub(crate) struct RestingTextColor(pub Color);

pub(crate) fn text_font(font: &GameFont, size: f32) -> TextFont {
    TextFont {
        font: font.0.clone(),
        font_size: size,
        ..default()
    }
}

pub(crate) fn spawn_label(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &GameFont,
    text: impl Into<String>,
    size: f32,
    color: Color,
) {
    parent.spawn((Text::new(text), text_font(font, size), TextColor(color)));
}

/// Fixed-size bordered button with a centred label, tagged with `marker`.
pub(crate) fn spawn_button(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &GameFont,
    label: impl Into<String>,
    width: f32,
    style: ButtonStyle,
    marker: impl Bundle,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(width),
                height: Val::Px(44.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(style.bg),
            BorderColor::all(style.border),
            RestingTextColor(style.text),
            marker,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                text_font(font, 17.0),
                TextColor(style.text),
            ));
        });
}

pub(crate) fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

/// Tint button labels white on hover and restore them afterwards.
pub(crate) fn button_hover_system(
    buttons: Query<
        (&Interaction, &Children, &RestingTextColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut btn_text: Query<&mut TextColor>,
) {
    for (interaction, children, resting) in buttons.iter() {
        let color = match interaction {
            Interaction::Hovered | Interaction::Pressed => Color::WHITE,
            Interaction::None => resting.0,
        };
        for child in children.iter() {
            if let Ok(mut text) = btn_text.get_mut(child) {
                *text = TextColor(color);
            }
        }
    }
}

/// Full-screen column root for a screen.
pub(crate) fn screen_root_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        justify_content: JustifyContent::FlexStart,
        align_items: AlignItems::Center,
        flex_direction: FlexDirection::Column,
        padding: UiRect::all(Val::Px(24.0)),
        row_gap: Val::Px(8.0),
        ..default()
    }
}

/// Despawn every entity carrying `T` (and, recursively, its children).
pub(crate) fn despawn_screen<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
