//! Admin privileges: access check, user partition and the admin toggle.

use bevy::prelude::*;

use crate::error::StoreResult;
use crate::identity::Identity;
use crate::store::{DocumentStore, UserPatch, UserRecord};

pub const ACCESS_DENIED: &str = "Access denied. Admin privileges required.";
pub const LOAD_FAILED: &str = "Failed to load users. Please try again later.";
pub const TOGGLE_FAILED: &str = "Failed to update user status. Please try again.";

/// True only for a signed-in identity whose user document has `admin` set.
/// Store failures deny access.
pub fn is_admin(identity: Option<&Identity>, store: &dyn DocumentStore) -> bool {
    let Some(identity) = identity else {
        return false;
    };
    match store.get_user(&identity.uid) {
        Ok(user) => user.is_some_and(|u| u.admin),
        Err(err) => {
            error!("Error checking admin status: {}", err);
            false
        }
    }
}

/// Split into `(admins, normal users)`, keeping the input order in each.
pub fn partition_users(users: Vec<UserRecord>) -> (Vec<UserRecord>, Vec<UserRecord>) {
    users.into_iter().partition(|u| u.admin)
}

/// Flip the admin flag of `uid`; returns the new value.
pub fn toggle_admin(store: &mut dyn DocumentStore, uid: &str) -> StoreResult<bool> {
    let current = store.get_user(uid)?.is_some_and(|u| u.admin);
    store.update_user(
        uid,
        UserPatch {
            admin: Some(!current),
            ..Default::default()
        },
    )?;
    info!("User {} admin = {}", uid, !current);
    Ok(!current)
}

/// Creation stamp as a UTC date, or `N/A` when unset.
pub fn format_created(unix_secs: u64) -> String {
    if unix_secs == 0 {
        return "N/A".to_string();
    }
    i64::try_from(unix_secs)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewUser};

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        for (id, admin) in [("oak", true), ("ash", false), ("gary", false)] {
            store
                .set_user(
                    id,
                    NewUser {
                        name: id.to_string(),
                        email: format!("{id}@example.com"),
                        admin,
                    },
                )
                .unwrap();
        }
        store
    }

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: uid.into(),
            email: format!("{uid}@example.com"),
        }
    }

    #[test]
    fn only_flagged_users_are_admins() {
        let store = seeded();
        assert!(is_admin(Some(&identity("oak")), &store));
        assert!(!is_admin(Some(&identity("ash")), &store));
        assert!(!is_admin(Some(&identity("missingno")), &store));
        assert!(!is_admin(None, &store));
    }

    #[test]
    fn partition_splits_on_flag() {
        let (admins, normal) = partition_users(seeded().list_users().unwrap());
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].id, "oak");
        assert_eq!(normal.len(), 2);
        assert!(normal.iter().all(|u| !u.admin));
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut store = seeded();
        assert_eq!(toggle_admin(&mut store, "ash").unwrap(), true);
        assert!(store.get_user("ash").unwrap().unwrap().admin);
        assert_eq!(toggle_admin(&mut store, "ash").unwrap(), false);
        assert!(!store.get_user("ash").unwrap().unwrap().admin);
    }

    #[test]
    fn created_stamp_formatting() {
        assert_eq!(format_created(0), "N/A");
        assert_eq!(format_created(86_400), "1970-01-02 00:00 UTC");
    }
}
