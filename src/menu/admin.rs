use super::account::FormMessage;
use super::*;
use crate::admin::{self, ACCESS_DENIED, LOAD_FAILED, TOGGLE_FAILED};
use crate::store::UserRecord;

/// Admin screen model: users split by role.
#[derive(Resource, Debug, Clone)]
pub struct AdminView {
    pub is_admin: bool,
    pub admins: Vec<UserRecord>,
    pub normal: Vec<UserRecord>,
    pub message: Option<FormMessage>,
    pub dirty: bool,
}

impl Default for AdminView {
    fn default() -> Self {
        Self {
            is_admin: false,
            admins: Vec::new(),
            normal: Vec::new(),
            message: None,
            dirty: true,
        }
    }
}

impl AdminView {
    fn error(&mut self, text: impl Into<String>) {
        self.message = Some(FormMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Check access, then read users.
    pub fn load(&mut self, backend: &Backend) {
        self.dirty = true;
        let identity = backend.current_identity();
        self.is_admin = admin::is_admin(identity.as_ref(), backend.store.as_ref());
        if !self.is_admin {
            self.error(ACCESS_DENIED);
            return;
        }
        match backend.store.list_users() {
            Ok(users) => {
                let (admins, normal) = admin::partition_users(users);
                self.admins = admins;
                self.normal = normal;
            }
            Err(err) => {
                error!("Error loading users: {}", err);
                self.error(LOAD_FAILED);
            }
        }
    }

    pub fn toggle_admin(&mut self, backend: &mut Backend, uid: &str) {
        if !self.is_admin {
            return;
        }
        match admin::toggle_admin(backend.store.as_mut(), uid) {
            Ok(_) => self.load(backend),
            Err(err) => {
                error!("Error updating user admin status: {}", err);
                self.error(TOGGLE_FAILED);
                self.dirty = true;
            }
        }
    }
}

pub(super) fn setup_admin(
    mut commands: Commands,
    font: Res<GameFont>,
    backend: Res<Backend>,
    mut view: ResMut<AdminView>,
) {
    *view = AdminView::default();
    view.load(&backend);

    commands
        .spawn((screen_root_node(), BackgroundColor(Color::BLACK), AdminRoot))
        .with_children(|root| {
            spawn_label(root, &font, "Admin", 40.0, title_color());
            root.spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(6.0),
                    ..default()
                },
                AdminBody,
            ));
            spacer(root, 8.0);
            spawn_button(root, &font, "MAIN MENU", 240.0, back_style(), BackToMainButton);
        });
}

pub(super) fn admin_button_system(
    toggle_query: Query<(&Interaction, &AdminToggleButton), Changed<Interaction>>,
    mut view: ResMut<AdminView>,
    mut backend: ResMut<Backend>,
) {
    for (interaction, button) in toggle_query.iter() {
        if *interaction == Interaction::Pressed {
            view.toggle_admin(&mut backend, &button.0);
        }
    }
}

fn spawn_user_row(parent: &mut ChildSpawnerCommands<'_>, font: &GameFont, user: &UserRecord) {
    parent
        .spawn(Node {
            column_gap: Val::Px(12.0),
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|row| {
            let name = if user.name.trim().is_empty() {
                "(no name)"
            } else {
                user.name.as_str()
            };
            spawn_label(
                row,
                font,
                format!(
                    "{}  <{}>  joined {}",
                    name,
                    user.email,
                    admin::format_created(user.when_created)
                ),
                14.0,
                label_color(),
            );
            let (label, style) = if user.admin {
                ("REVOKE ADMIN", danger_style())
            } else {
                ("MAKE ADMIN", primary_style())
            };
            spawn_button(row, font, label, 160.0, style, AdminToggleButton(user.id.clone()));
        });
}

fn section_node() -> Node {
    Node {
        flex_direction: FlexDirection::Column,
        min_width: Val::Px(560.0),
        padding: UiRect::all(Val::Px(10.0)),
        row_gap: Val::Px(4.0),
        border: UiRect::all(Val::Px(1.0)),
        ..default()
    }
}

pub(super) fn admin_body_system(
    mut commands: Commands,
    font: Res<GameFont>,
    mut view: ResMut<AdminView>,
    body: Query<Entity, With<AdminBody>>,
) {
    if !view.dirty {
        return;
    }
    let Ok(body) = body.single() else {
        return;
    };
    view.dirty = false;

    commands.entity(body).despawn_related::<Children>();
    commands.entity(body).with_children(|body| {
        if let Some(msg) = &view.message {
            let color = if msg.is_error {
                error_color()
            } else {
                success_color()
            };
            spawn_label(body, &font, msg.text.clone(), 15.0, color);
        }
        if !view.is_admin {
            return;
        }

        body.spawn((
            section_node(),
            BackgroundColor(card_bg()),
            BorderColor::all(card_border()),
        ))
        .with_children(|users| {
            let admins = format!("Admins ({})", view.admins.len());
            spawn_label(users, &font, admins, 18.0, title_color());
            for user in &view.admins {
                spawn_user_row(users, &font, user);
            }
            let normal = format!("Users ({})", view.normal.len());
            spawn_label(users, &font, normal, 18.0, title_color());
            for user in &view.normal {
                spawn_user_row(users, &font, user);
            }
        });
    });
}
