//! Local form checks run before any backend call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    PASSWORD_MIN_CAPITALS, PASSWORD_MIN_LEN, POKEMON_DESCRIPTION_MAX_LEN, POKEMON_MAX_HEIGHT,
    POKEMON_MAX_WEIGHT, POKEMON_NAME_MIN_LEN,
};
use crate::error::ValidationError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

pub fn is_email_valid(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 8 characters, 2 capitals, 1 digit and 1 symbol (not a letter,
/// digit or whitespace).
pub fn is_password_format_valid(password: &str) -> bool {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return false;
    }
    let capitals = password.chars().filter(|c| c.is_ascii_uppercase()).count();
    if capitals < PASSWORD_MIN_CAPITALS {
        return false;
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    password
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
}

/// Registration form, checked in display order.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !is_email_valid(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_password_format_valid(password) {
        return Err(ValidationError::InvalidPasswordFormat);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_email_valid(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_password_format_valid(password) {
        return Err(ValidationError::InvalidPasswordFormat);
    }
    Ok(())
}

/// `http://` or `https://` followed by a non-empty host.
pub fn is_url_valid(url: &str) -> bool {
    let url = url.trim();
    let rest = match url.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("http") => rest,
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("https") => rest,
        _ => return false,
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !host.chars().any(char::is_whitespace)
}

/// Split a comma-separated abilities field, dropping blanks.
pub fn parse_abilities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Optional numeric field: blank → `None`, otherwise must parse.
pub fn parse_optional_number(
    raw: &str,
    field: &'static str,
) -> Result<Option<f32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ValidationError::NotANumber { field }),
    }
}

/// Catalog entry checks, in display order.
pub fn validate_pokemon_form(
    name: &str,
    photo_url: &str,
    height: Option<f32>,
    weight: Option<f32>,
    description: &str,
) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingPokemonName);
    }
    if name.chars().count() < POKEMON_NAME_MIN_LEN {
        return Err(ValidationError::PokemonNameTooShort);
    }
    let photo_url = photo_url.trim();
    if photo_url.is_empty() {
        return Err(ValidationError::MissingPhotoUrl);
    }
    if !is_url_valid(photo_url) {
        return Err(ValidationError::InvalidPhotoUrl);
    }
    if let Some(h) = height {
        if !(h > 0.0 && h <= POKEMON_MAX_HEIGHT) {
            return Err(ValidationError::HeightOutOfRange);
        }
    }
    if let Some(w) = weight {
        if !(w > 0.0 && w <= POKEMON_MAX_WEIGHT) {
            return Err(ValidationError::WeightOutOfRange);
        }
    }
    if description.trim().chars().count() > POKEMON_DESCRIPTION_MAX_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}
