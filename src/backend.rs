//! Bevy resource wrapping the identity provider and the document store.
//!
//! Screens never talk to the providers directly; they go through [`Backend`],
//! which combines validation, provider calls and the matching user-document
//! writes the way each screen needs them.

use bevy::prelude::*;

use crate::bridge::{persist_best_score, PersistOutcome, ScoreKind};
use crate::config::GameConfig;
use crate::error::AccountError;
use crate::identity::{Identity, IdentityProvider, LocalIdentityProvider};
use crate::store::{DocumentStore, MemoryStore, NewUser, TomlFileStore};
use crate::validation;

#[derive(Resource)]
pub struct Backend {
    pub identity: Box<dyn IdentityProvider>,
    pub store: Box<dyn DocumentStore>,
}

impl Default for Backend {
    fn default() -> Self {
        Self::in_memory(&GameConfig::default())
    }
}

impl Backend {
    pub fn new(identity: Box<dyn IdentityProvider>, store: Box<dyn DocumentStore>) -> Self {
        Self { identity, store }
    }

    /// Nothing touches disk; used by tests and as the fallback when the data
    /// directory cannot be opened.
    pub fn in_memory(config: &GameConfig) -> Self {
        Self::new(
            Box::new(LocalIdentityProvider::in_memory(
                config.max_login_attempts,
                config.lockout_secs,
            )),
            Box::new(MemoryStore::new()),
        )
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.current_identity()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_identity().is_some()
    }

    /// Display name from the user document, falling back to the email.
    pub fn display_name(&self) -> Option<String> {
        let identity = self.current_identity()?;
        let name = self
            .store
            .get_user(&identity.uid)
            .ok()
            .flatten()
            .map(|u| u.name)
            .filter(|n| !n.trim().is_empty());
        Some(name.unwrap_or(identity.email))
    }

    /// Validate, create the account, then write its user document.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Identity, AccountError> {
        validation::validate_registration(name, email, password, confirm)?;
        let identity = self.identity.register(email, password).inspect_err(|err| {
            error!("Registration error: {}", err);
        })?;
        let user = NewUser {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            admin: false,
        };
        if let Err(err) = self.store.set_user(&identity.uid, user) {
            error!("Error creating user document for {}: {}", identity.uid, err);
        }
        info!("Registered {}", identity.email);
        Ok(identity)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<Identity, AccountError> {
        validation::validate_login(email, password)?;
        let identity = self.identity.login(email, password).inspect_err(|err| {
            warn!("Login failed: {}", err);
        })?;
        info!("Signed in {}", identity.email);
        Ok(identity)
    }

    pub fn logout(&mut self) {
        if let Some(identity) = self.current_identity() {
            info!("Signed out {}", identity.email);
        }
        self.identity.logout();
    }

    pub fn persist_best(&mut self, kind: ScoreKind, score: u32) -> PersistOutcome {
        let identity = self.identity.current_identity();
        persist_best_score(identity.as_ref(), self.store.as_mut(), kind, score)
    }
}

/// Startup system: open the file-backed providers under `config.data_dir`.
///
/// Either one failing to open falls back to the in-memory version with a
/// warning; the session still works, it just is not saved.
pub fn open_backend(mut commands: Commands, config: Res<GameConfig>) {
    let dir = config.data_dir.as_str();

    let identity: Box<dyn IdentityProvider> =
        match LocalIdentityProvider::open(dir, config.max_login_attempts, config.lockout_secs) {
            Ok(provider) => Box::new(provider),
            Err(err) => {
                warn!("Accounts unavailable ({}); using in-memory accounts", err);
                Box::new(LocalIdentityProvider::in_memory(
                    config.max_login_attempts,
                    config.lockout_secs,
                ))
            }
        };

    let store: Box<dyn DocumentStore> = match TomlFileStore::open(dir) {
        Ok(store) => {
            info!("Opened document store at {}", store.path().display());
            Box::new(store)
        }
        Err(err) => {
            warn!("Document store unavailable ({}); using in-memory store", err);
            Box::new(MemoryStore::new())
        }
    };

    commands.insert_resource(Backend::new(identity, store));
}
