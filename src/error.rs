//! Error types for forms, accounts, storage and configuration.
//!
//! Three failure classes exist and none of them is fatal:
//!
//! | Class        | Type              | Surfaced as                        |
//! |--------------|-------------------|------------------------------------|
//! | Validation   | `ValidationError` | inline message, no backend call    |
//! | Provider     | `AuthError`       | inline message via code table      |
//! | Best-effort  | `StoreError`      | `error!` log only (score saves)    |
//!
//! `ConfigError` is raised by the config validation helpers and causes the
//! loader to fall back to compiled defaults.

use thiserror::Error;

/// A form field failed a local check before any backend call was made.
///
/// `Display` yields the exact user-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter your name.")]
    MissingName,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error(
        "Invalid password format. Check requirements: min 8 chars, 2 capitals, 1 digit, 1 special character."
    )]
    InvalidPasswordFormat,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please enter a Pokémon name.")]
    MissingPokemonName,

    #[error("Pokémon name must be at least 2 characters long.")]
    PokemonNameTooShort,

    #[error("Please enter a photo URL.")]
    MissingPhotoUrl,

    #[error("Please enter a valid URL (must start with http:// or https://).")]
    InvalidPhotoUrl,

    #[error("Height must be a positive number between 0 and 1000.")]
    HeightOutOfRange,

    #[error("Weight must be a positive number between 0 and 10000.")]
    WeightOutOfRange,

    #[error("Description must be 500 characters or less.")]
    DescriptionTooLong,

    #[error("'{field}' must be a number.")]
    NotANumber { field: &'static str },

    #[error("'{0}' is not a known Pokémon type.")]
    UnknownType(String),
}

/// Failure reported by the identity provider.
///
/// `code` follows the `auth/<reason>` convention; `message` is the provider's
/// raw text, used only when the code has no entry in the message table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Human-readable text for this failure, resolved through the code table.
    pub fn user_message(&self) -> String {
        crate::identity::auth_error_message(&self.code, &self.message)
    }
}

/// Why a sign-in or registration attempt was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccountError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{}", .0.user_message())]
    Auth(#[from] AuthError),
}

/// Document-store failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize store TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unsupported store version {found} (expected {expected})")]
    Version { found: i64, expected: i64 },

    #[error("no {collection} document with id '{id}'")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Saving or deleting a catalog entry failed.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Please log in to manage Pokémon.")]
    NotSignedIn,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to save Pokémon. Please try again.")]
    Store(#[from] StoreError),
}

/// A configuration value is outside its safe operating range.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("config '{name}' = {value} is outside safe range {safe_range}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: f64,
    pub safe_range: &'static str,
}

/// Convenience alias: a `Result` using `StoreError` as the error type.
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience alias: a `Result` using `AuthError` as the error type.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match."
        );
        assert_eq!(
            ValidationError::NotANumber { field: "height" }.to_string(),
            "'height' must be a number."
        );
    }

    #[test]
    fn store_not_found_names_collection_and_id() {
        let err = StoreError::NotFound {
            collection: "pokemon",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "no pokemon document with id 'abc'");
    }
}
