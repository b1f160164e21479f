//! Keyboard-driven text form shared by the account and catalog screens.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;

const DEFAULT_MAX_LEN: usize = 64;

/// One labelled input.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
    pub max_len: usize,
}

impl FormField {
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: false,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            secret: true,
            ..Self::text(label)
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Edited,
    Submit,
    None,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextForm {
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl TextForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focused: 0 }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focused = 0;
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.focused) {
            if field.value.chars().count() < field.max_len {
                field.value.push(ch);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// `label: value`, masked for secret fields, with a caret on the focused one.
    pub fn display(&self, index: usize) -> String {
        let Some(field) = self.fields.get(index) else {
            return String::new();
        };
        let value = if field.secret {
            "*".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        let caret = if index == self.focused { "_" } else { "" };
        format!("{}: {}{}", field.label, value, caret)
    }

    /// Apply one keyboard message.  Releases are ignored.
    pub fn apply_input(&mut self, input: &KeyboardInput) -> FormAction {
        if input.state != ButtonState::Pressed {
            return FormAction::None;
        }
        match &input.logical_key {
            Key::Backspace => {
                self.backspace();
                FormAction::Edited
            }
            Key::Tab => {
                self.focus_next();
                FormAction::Edited
            }
            Key::Enter => FormAction::Submit,
            Key::Space => {
                self.push_char(' ');
                FormAction::Edited
            }
            Key::Character(text) => {
                for ch in text.chars() {
                    self.push_char(ch);
                }
                FormAction::Edited
            }
            _ => FormAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form() -> TextForm {
        TextForm::new(vec![FormField::text("Email"), FormField::secret("Password")])
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = login_form();
        for ch in "a@b.co".chars() {
            form.push_char(ch);
        }
        form.focus_next();
        for ch in "AB3$".chars() {
            form.push_char(ch);
        }
        form.backspace();
        assert_eq!(form.value(0), "a@b.co");
        assert_eq!(form.value(1), "AB3");
        assert_eq!(form.display(0), "Email: a@b.co");
        assert_eq!(form.display(1), "Password: ***_");
    }

    #[test]
    fn focus_wraps_and_clear_resets() {
        let mut form = login_form();
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focused, 0);
        form.push_char('x');
        form.clear();
        assert_eq!(form.value(0), "");
    }

    #[test]
    fn max_len_and_control_chars() {
        let mut form = TextForm::new(vec![FormField::text("Name").with_max_len(3)]);
        for ch in "abcd\n".chars() {
            form.push_char(ch);
        }
        assert_eq!(form.value(0), "abc");
    }
}
