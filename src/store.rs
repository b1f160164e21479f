//! Document store for the `users` and `pokemon` collections.
//!
//! [`DocumentStore`] is the seam every screen talks to.  Two backends exist:
//!
//! - [`MemoryStore`]: plain in-process maps; used by tests and as the
//!   working set of the file store.
//! - [`TomlFileStore`]: a [`MemoryStore`] that is loaded from and written back
//!   to `<data_dir>/store.toml` after every mutation.
//!
//! Updates have merge semantics: only the fields present in a patch change,
//! and patching a missing user creates it (upsert).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

const STORE_VERSION: u32 = 1;
const STORE_FILE: &str = "store.toml";

pub const POKEMON: &str = "pokemon";

// ── Documents ─────────────────────────────────────────────────────────────────

/// A document of the `users` collection, keyed by identity id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    /// Unix seconds.
    #[serde(default)]
    pub when_created: u64,
    /// Store-wide insertion counter; orders documents created in the same
    /// second.
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub quiz_score: Option<u32>,
    #[serde(default)]
    pub find_score: Option<u32>,
}

/// Fields written when an account is first created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub admin: bool,
}

/// Partial user update; `None` leaves the stored field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub admin: Option<bool>,
    pub quiz_score: Option<u32>,
    pub find_score: Option<u32>,
}

impl UserPatch {
    fn apply(self, user: &mut UserRecord) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(admin) = self.admin {
            user.admin = admin;
        }
        if let Some(score) = self.quiz_score {
            user.quiz_score = Some(score);
        }
        if let Some(score) = self.find_score {
            user.find_score = Some(score);
        }
    }
}

/// A document of the `pokemon` collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PokemonRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub photo_url: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub when_created: u64,
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Fields of a catalog entry before the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPokemon {
    pub name: String,
    pub photo_url: String,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub abilities: Vec<String>,
    pub created_by: Option<String>,
}

impl NewPokemon {
    fn into_record(self, id: String, (when_created, sequence): (u64, u64)) -> PokemonRecord {
        PokemonRecord {
            id,
            name: self.name,
            photo_url: self.photo_url,
            kind: self.kind,
            description: self.description,
            height: self.height,
            weight: self.weight,
            abilities: self.abilities,
            when_created,
            sequence,
            created_by: self.created_by,
        }
    }

    /// Merge onto an existing record; `None` fields keep the stored value.
    fn merge_into(self, record: &mut PokemonRecord) {
        record.name = self.name;
        record.photo_url = self.photo_url;
        if self.kind.is_some() {
            record.kind = self.kind;
        }
        if self.description.is_some() {
            record.description = self.description;
        }
        if self.height.is_some() {
            record.height = self.height;
        }
        if self.weight.is_some() {
            record.weight = self.weight;
        }
        record.abilities = self.abilities;
        if self.created_by.is_some() {
            record.created_by = self.created_by;
        }
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

pub trait DocumentStore: Send + Sync {
    fn get_user(&self, id: &str) -> StoreResult<Option<UserRecord>>;

    /// Every user, newest first.
    fn list_users(&self) -> StoreResult<Vec<UserRecord>>;

    /// Overwrite the user document and stamp its creation time.
    fn set_user(&mut self, id: &str, user: NewUser) -> StoreResult<()>;

    /// Merge `patch` into the user document, creating it if absent.
    fn update_user(&mut self, id: &str, patch: UserPatch) -> StoreResult<()>;

    fn list_pokemon(&self) -> StoreResult<Vec<PokemonRecord>>;

    fn get_pokemon(&self, id: &str) -> StoreResult<Option<PokemonRecord>>;

    /// Insert a catalog entry and return its generated id.
    fn create_pokemon(&mut self, pokemon: NewPokemon) -> StoreResult<String>;

    fn update_pokemon(&mut self, id: &str, pokemon: NewPokemon) -> StoreResult<()>;

    fn delete_pokemon(&mut self, id: &str) -> StoreResult<()>;
}

pub(crate) fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ── Memory backend ────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    #[serde(default)]
    users: BTreeMap<String, UserRecord>,
    #[serde(default)]
    pokemon: BTreeMap<String, PokemonRecord>,
    /// Last insertion counter handed out.
    #[serde(default)]
    sequence: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock creation second plus the next insertion counter.
    fn next_stamp(&mut self) -> (u64, u64) {
        self.sequence += 1;
        (current_unix_timestamp(), self.sequence)
    }
}

impl DocumentStore for MemoryStore {
    fn get_user(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.get(id).cloned())
    }

    fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.values().cloned().collect();
        users.sort_by(|a, b| {
            (b.when_created, b.sequence).cmp(&(a.when_created, a.sequence))
        });
        Ok(users)
    }

    fn set_user(&mut self, id: &str, user: NewUser) -> StoreResult<()> {
        let (when_created, sequence) = self.next_stamp();
        self.users.insert(
            id.to_string(),
            UserRecord {
                id: id.to_string(),
                name: user.name,
                email: user.email,
                admin: user.admin,
                when_created,
                sequence,
                quiz_score: None,
                find_score: None,
            },
        );
        Ok(())
    }

    fn update_user(&mut self, id: &str, patch: UserPatch) -> StoreResult<()> {
        let stamp = (!self.users.contains_key(id)).then(|| self.next_stamp());
        let user = self.users.entry(id.to_string()).or_insert_with(|| {
            let (when_created, sequence) = stamp.unwrap_or_default();
            UserRecord {
                id: id.to_string(),
                when_created,
                sequence,
                ..Default::default()
            }
        });
        patch.apply(user);
        Ok(())
    }

    fn list_pokemon(&self) -> StoreResult<Vec<PokemonRecord>> {
        Ok(self.pokemon.values().cloned().collect())
    }

    fn get_pokemon(&self, id: &str) -> StoreResult<Option<PokemonRecord>> {
        Ok(self.pokemon.get(id).cloned())
    }

    fn create_pokemon(&mut self, pokemon: NewPokemon) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let stamp = self.next_stamp();
        self.pokemon
            .insert(id.clone(), pokemon.into_record(id.clone(), stamp));
        Ok(id)
    }

    fn update_pokemon(&mut self, id: &str, pokemon: NewPokemon) -> StoreResult<()> {
        match self.pokemon.get_mut(id) {
            Some(record) => {
                pokemon.merge_into(record);
                Ok(())
            }
            None => {
                let stamp = self.next_stamp();
                self.pokemon
                    .insert(id.to_string(), pokemon.into_record(id.to_string(), stamp));
                Ok(())
            }
        }
    }

    fn delete_pokemon(&mut self, id: &str) -> StoreResult<()> {
        self.pokemon
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                collection: POKEMON,
                id: id.to_string(),
            })
    }
}

// ── TOML file backend ─────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone)]
struct StoreSnapshot {
    version: u32,
    saved_at_unix: u64,
    #[serde(default)]
    data: MemoryStore,
}

/// [`MemoryStore`] persisted to `<dir>/store.toml`.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl TomlFileStore {
    /// Open the store under `dir`; a missing file starts empty.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let path = dir.as_ref().join(STORE_FILE);
        let inner = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_snapshot(&contents)?
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, data: &MemoryStore) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let snapshot = StoreSnapshot {
            version: STORE_VERSION,
            saved_at_unix: current_unix_timestamp(),
            data: data.clone(),
        };
        let serialized = toml::to_string_pretty(&snapshot)?;
        fs::write(&self.path, serialized).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Apply `change` to a copy, write the copy, and only then adopt it.  A
    /// failed write leaves the store exactly as it was.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut staged = self.inner.clone();
        let out = change(&mut staged)?;
        self.write(&staged)?;
        self.inner = staged;
        Ok(out)
    }
}

fn parse_snapshot(contents: &str) -> StoreResult<MemoryStore> {
    let mut value: toml::Value = toml::from_str(contents)?;
    if let Some(table) = value.as_table_mut() {
        if !table.contains_key("version") {
            table.insert(
                "version".to_string(),
                toml::Value::Integer(STORE_VERSION as i64),
            );
        }
        if !table.contains_key("saved_at_unix") {
            table.insert("saved_at_unix".to_string(), toml::Value::Integer(0));
        }
    }
    let snapshot: StoreSnapshot = value.try_into()?;
    if snapshot.version != STORE_VERSION {
        return Err(StoreError::Version {
            found: snapshot.version as i64,
            expected: STORE_VERSION as i64,
        });
    }
    Ok(snapshot.data)
}

impl DocumentStore for TomlFileStore {
    fn get_user(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        self.inner.get_user(id)
    }

    fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        self.inner.list_users()
    }

    fn set_user(&mut self, id: &str, user: NewUser) -> StoreResult<()> {
        self.commit(|store| store.set_user(id, user))
    }

    fn update_user(&mut self, id: &str, patch: UserPatch) -> StoreResult<()> {
        self.commit(|store| store.update_user(id, patch))
    }

    fn list_pokemon(&self) -> StoreResult<Vec<PokemonRecord>> {
        self.inner.list_pokemon()
    }

    fn get_pokemon(&self, id: &str) -> StoreResult<Option<PokemonRecord>> {
        self.inner.get_pokemon(id)
    }

    fn create_pokemon(&mut self, pokemon: NewPokemon) -> StoreResult<String> {
        self.commit(|store| store.create_pokemon(pokemon))
    }

    fn update_pokemon(&mut self, id: &str, pokemon: NewPokemon) -> StoreResult<()> {
        self.commit(|store| store.update_pokemon(id, pokemon))
    }

    fn delete_pokemon(&mut self, id: &str) -> StoreResult<()> {
        self.commit(|store| store.delete_pokemon(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("pokearcade-store-{}", uuid::Uuid::new_v4()))
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            admin: false,
        }
    }

    #[test]
    fn users_list_newest_first() {
        let mut store = MemoryStore::new();
        store.set_user("a", new_user("Ash")).unwrap();
        store.set_user("b", new_user("Brock")).unwrap();
        store.set_user("c", new_user("Misty")).unwrap();

        let ids: Vec<String> = store.list_users().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut store = MemoryStore::new();
        store.set_user("a", new_user("Ash")).unwrap();
        store
            .update_user(
                "a",
                UserPatch {
                    find_score: Some(12),
                    ..Default::default()
                },
            )
            .unwrap();

        let user = store.get_user("a").unwrap().unwrap();
        assert_eq!(user.name, "Ash");
        assert_eq!(user.find_score, Some(12));
        assert_eq!(user.quiz_score, None);
    }

    #[test]
    fn update_of_missing_user_upserts() {
        let mut store = MemoryStore::new();
        store
            .update_user(
                "ghost",
                UserPatch {
                    quiz_score: Some(3),
                    ..Default::default()
                },
            )
            .unwrap();
        let user = store.get_user("ghost").unwrap().unwrap();
        assert_eq!(user.id, "ghost");
        assert_eq!(user.quiz_score, Some(3));
    }

    #[test]
    fn pokemon_crud_round_trip() {
        let mut store = MemoryStore::new();
        let id = store
            .create_pokemon(NewPokemon {
                name: "Pikachu".into(),
                photo_url: "https://img.example/pikachu.png".into(),
                height: Some(0.4),
                ..Default::default()
            })
            .unwrap();

        store
            .update_pokemon(
                &id,
                NewPokemon {
                    name: "Pikachu".into(),
                    photo_url: "https://img.example/pika2.png".into(),
                    weight: Some(6.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let record = store.get_pokemon(&id).unwrap().unwrap();
        assert_eq!(record.photo_url, "https://img.example/pika2.png");
        assert_eq!(record.height, Some(0.4), "merge keeps untouched fields");
        assert_eq!(record.weight, Some(6.0));

        store.delete_pokemon(&id).unwrap();
        assert!(store.get_pokemon(&id).unwrap().is_none());
        assert!(matches!(
            store.delete_pokemon(&id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = temp_dir();
        {
            let mut store = TomlFileStore::open(&dir).unwrap();
            store.set_user("a", new_user("Ash")).unwrap();
            store
                .update_user(
                    "a",
                    UserPatch {
                        find_score: Some(9),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
        let store = TomlFileStore::open(&dir).unwrap();
        let user = store.get_user("a").unwrap().unwrap();
        assert_eq!(user.find_score, Some(9));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn file_store_rejects_unknown_version() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STORE_FILE), "version = 99\nsaved_at_unix = 0\n").unwrap();
        assert!(matches!(
            TomlFileStore::open(&dir),
            Err(StoreError::Version { found: 99, .. })
        ));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn creation_stamps_are_wall_clock_seconds() {
        let before = current_unix_timestamp();
        let mut store = MemoryStore::new();
        for (id, name) in [("a", "Ash"), ("b", "Brock"), ("c", "Misty"), ("d", "Oak")] {
            store.set_user(id, new_user(name)).unwrap();
        }
        let after = current_unix_timestamp();

        let users = store.list_users().unwrap();
        for user in &users {
            assert!(
                (before..=after).contains(&user.when_created),
                "{} stamped {} outside {before}..={after}",
                user.id,
                user.when_created
            );
        }
        let sequences: Vec<u64> = users.iter().map(|u| u.sequence).collect();
        assert_eq!(sequences, vec![4, 3, 2, 1], "newest first, same-second ties by sequence");
    }

    #[test]
    fn failed_write_leaves_file_store_unchanged() {
        let file = temp_dir();
        fs::write(&file, "not a directory").unwrap();
        let mut store = TomlFileStore::open(file.join("data")).unwrap();

        assert!(matches!(
            store.set_user("a", new_user("Ash")),
            Err(StoreError::Io { .. })
        ));
        assert!(store.get_user("a").unwrap().is_none());

        assert!(store
            .update_user(
                "a",
                UserPatch {
                    find_score: Some(15),
                    ..Default::default()
                },
            )
            .is_err());
        assert!(store.get_user("a").unwrap().is_none());

        assert!(store
            .create_pokemon(NewPokemon {
                name: "Pikachu".into(),
                photo_url: "https://img.example/pikachu.png".into(),
                ..Default::default()
            })
            .is_err());
        assert!(store.list_pokemon().unwrap().is_empty());
        let _ = fs::remove_file(file);
    }
}
