//! Score/persistence bridge: keep each player's best score per mini-game.
//!
//! Called once when a session ends.  Persistence is best-effort: store
//! failures are logged and swallowed so the end-of-game screen never depends
//! on the backend.

use bevy::prelude::*;

use crate::identity::Identity;
use crate::store::{DocumentStore, UserPatch, UserRecord};

/// Which best-score field of the user document to read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreKind {
    Find,
    Quiz,
}

impl ScoreKind {
    pub fn label(self) -> &'static str {
        match self {
            ScoreKind::Find => "find game",
            ScoreKind::Quiz => "quiz",
        }
    }

    /// Stored best for this game; absent counts as zero.
    pub fn best_of(self, user: &UserRecord) -> u32 {
        match self {
            ScoreKind::Find => user.find_score,
            ScoreKind::Quiz => user.quiz_score,
        }
        .unwrap_or(0)
    }

    fn patch(self, score: u32) -> UserPatch {
        match self {
            ScoreKind::Find => UserPatch {
                find_score: Some(score),
                ..Default::default()
            },
            ScoreKind::Quiz => UserPatch {
                quiz_score: Some(score),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// No signed-in identity; the store was not touched.
    Unauthenticated,
    /// New personal best written.
    Improved { previous: u32, new: u32 },
    /// Session score did not beat the stored best.
    Kept { best: u32 },
    /// The store failed; logged and ignored.
    Failed,
}

/// Write `score` as the new best for `identity` if it strictly beats the
/// stored value.
pub fn persist_best_score(
    identity: Option<&Identity>,
    store: &mut dyn DocumentStore,
    kind: ScoreKind,
    score: u32,
) -> PersistOutcome {
    let Some(identity) = identity else {
        info!("Not signed in; {} score {} not saved", kind.label(), score);
        return PersistOutcome::Unauthenticated;
    };

    let previous = match store.get_user(&identity.uid) {
        Ok(user) => user.map(|u| kind.best_of(&u)).unwrap_or(0),
        Err(err) => {
            error!("Error reading {} best for {}: {}", kind.label(), identity.uid, err);
            return PersistOutcome::Failed;
        }
    };

    if score <= previous {
        info!(
            "{} score {} does not beat best {}; keeping best",
            kind.label(),
            score,
            previous
        );
        return PersistOutcome::Kept { best: previous };
    }

    match store.update_user(&identity.uid, kind.patch(score)) {
        Ok(()) => {
            info!(
                "New best {} score saved: {} for user {}",
                kind.label(),
                score,
                identity.uid
            );
            PersistOutcome::Improved {
                previous,
                new: score,
            }
        }
        Err(err) => {
            error!("Error saving {} score: {}", kind.label(), err);
            PersistOutcome::Failed
        }
    }
}
