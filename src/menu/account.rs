use bevy::input::keyboard::KeyboardInput;

use super::form::{FormAction, FormField, TextForm};
use super::*;

/// Number of field rows the screen reserves (the register form's size).
const FIELD_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountMode {
    #[default]
    Login,
    Register,
}

/// Inline feedback under the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormMessage {
    pub text: String,
    pub is_error: bool,
}

/// Login / registration form state.
#[derive(Resource, Debug, Clone)]
pub struct AccountForm {
    pub mode: AccountMode,
    pub form: TextForm,
    pub message: Option<FormMessage>,
}

impl Default for AccountForm {
    fn default() -> Self {
        Self::login()
    }
}

impl AccountForm {
    pub fn login() -> Self {
        Self {
            mode: AccountMode::Login,
            form: TextForm::new(vec![FormField::text("Email"), FormField::secret("Password")]),
            message: None,
        }
    }

    pub fn register() -> Self {
        Self {
            mode: AccountMode::Register,
            form: TextForm::new(vec![
                FormField::text("Name"),
                FormField::text("Email"),
                FormField::secret("Password"),
                FormField::secret("Confirm password"),
            ]),
            message: None,
        }
    }

    pub fn toggle_mode(&mut self) {
        *self = match self.mode {
            AccountMode::Login => Self::register(),
            AccountMode::Register => Self::login(),
        };
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AccountMode::Login => "Log in",
            AccountMode::Register => "Register",
        }
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.message = Some(FormMessage {
            text: text.into(),
            is_error: true,
        });
    }

    fn set_success(&mut self, text: impl Into<String>) {
        self.message = Some(FormMessage {
            text: text.into(),
            is_error: false,
        });
    }

    /// Run the form against the backend and record the outcome message.
    pub fn submit(&mut self, backend: &mut Backend) {
        self.message = None;
        match self.mode {
            AccountMode::Login => {
                let result = backend.login(self.form.value(0), self.form.value(1));
                match result {
                    Ok(_) => {
                        let name = backend.display_name().unwrap_or_default();
                        self.form.clear();
                        self.set_success(format!("Login successful! Welcome, {name}!"));
                    }
                    Err(err) => self.set_error(err.to_string()),
                }
            }
            AccountMode::Register => {
                let name = self.form.value(0).trim().to_string();
                let result = backend.register(
                    self.form.value(0),
                    self.form.value(1),
                    self.form.value(2),
                    self.form.value(3),
                );
                match result {
                    Ok(_) => {
                        self.form.clear();
                        self.set_success(format!("Registration successful! Welcome, {name}!"));
                    }
                    Err(err) => self.set_error(err.to_string()),
                }
            }
        }
    }

    pub fn logout(&mut self, backend: &mut Backend) {
        if backend.is_signed_in() {
            backend.logout();
            self.set_success("Signed out.");
        }
    }
}

pub(super) fn setup_account(
    mut commands: Commands,
    font: Res<GameFont>,
    backend: Res<Backend>,
    mut account: ResMut<AccountForm>,
) {
    *account = AccountForm::login();
    if let Some(name) = backend.display_name() {
        account.set_success(format!("Signed in as {name}. Press F3 to sign out."));
    }

    commands
        .spawn((screen_root_node(), BackgroundColor(Color::BLACK), AccountRoot))
        .with_children(|root| {
            root.spawn((
                Text::new(account.title()),
                text_font(&font, 40.0),
                TextColor(title_color()),
                AccountTitleText,
            ));
            spacer(root, 8.0);
            spawn_label(
                root,
                &font,
                "Tab: next field   Enter: submit   F2: switch login/register   F3: sign out",
                13.0,
                subtitle_color(),
            );
            spacer(root, 16.0);

            for index in 0..FIELD_ROWS {
                root.spawn((
                    Node {
                        width: Val::Px(520.0),
                        min_height: Val::Px(36.0),
                        padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                    BackgroundColor(card_bg()),
                    BorderColor::all(card_border()),
                ))
                .with_children(|row| {
                    row.spawn((
                        Text::new(account.form.display(index)),
                        text_font(&font, 16.0),
                        TextColor(label_color()),
                        AccountFieldText(index),
                    ));
                });
            }

            spacer(root, 8.0);
            root.spawn((
                Text::new(""),
                text_font(&font, 15.0),
                TextColor(error_color()),
                AccountMessageText,
            ));
            spacer(root, 12.0);

            spawn_button(root, &font, "SUBMIT", 260.0, primary_style(), AccountSubmitButton);
            spawn_button(
                root,
                &font,
                "LOGIN / REGISTER",
                260.0,
                option_style(),
                AccountToggleModeButton,
            );
            spawn_button(root, &font, "SIGN OUT", 260.0, danger_style(), AccountLogoutButton);
            spacer(root, 12.0);
            spawn_button(root, &font, "MAIN MENU", 260.0, back_style(), BackToMainButton);
        });
}

/// Typed text into the focused field; Enter / F2 / F3 shortcuts.
pub(super) fn account_input_system(
    mut inputs: MessageReader<KeyboardInput>,
    keys: Res<ButtonInput<KeyCode>>,
    mut account: ResMut<AccountForm>,
    mut backend: ResMut<Backend>,
) {
    let mut submit = false;
    for input in inputs.read() {
        if account.form.apply_input(input) == FormAction::Submit {
            submit = true;
        }
    }
    if submit {
        account.submit(&mut backend);
    }
    if keys.just_pressed(KeyCode::F2) {
        account.toggle_mode();
    }
    if keys.just_pressed(KeyCode::F3) {
        account.logout(&mut backend);
    }
}

#[allow(clippy::type_complexity)]
pub(super) fn account_button_system(
    submit_query: Query<&Interaction, (Changed<Interaction>, With<AccountSubmitButton>)>,
    toggle_query: Query<&Interaction, (Changed<Interaction>, With<AccountToggleModeButton>)>,
    logout_query: Query<&Interaction, (Changed<Interaction>, With<AccountLogoutButton>)>,
    mut account: ResMut<AccountForm>,
    mut backend: ResMut<Backend>,
) {
    if submit_query.iter().any(|i| *i == Interaction::Pressed) {
        account.submit(&mut backend);
    }
    if toggle_query.iter().any(|i| *i == Interaction::Pressed) {
        account.toggle_mode();
    }
    if logout_query.iter().any(|i| *i == Interaction::Pressed) {
        account.logout(&mut backend);
    }
}

#[allow(clippy::type_complexity)]
pub(super) fn account_display_system(
    account: Res<AccountForm>,
    mut fields: Query<
        (&mut Text, &AccountFieldText),
        (Without<AccountTitleText>, Without<AccountMessageText>),
    >,
    mut title: Query<&mut Text, (With<AccountTitleText>, Without<AccountMessageText>)>,
    mut message: Query<(&mut Text, &mut TextColor), With<AccountMessageText>>,
) {
    if !account.is_changed() {
        return;
    }

    for (mut text, field) in fields.iter_mut() {
        text.0 = account.form.display(field.0);
    }
    for mut text in title.iter_mut() {
        text.0 = account.title().to_string();
    }
    for (mut text, mut color) in message.iter_mut() {
        match &account.message {
            Some(msg) => {
                text.0 = msg.text.clone();
                *color = TextColor(if msg.is_error {
                    error_color()
                } else {
                    success_color()
                });
            }
            None => text.0.clear(),
        }
    }
}
