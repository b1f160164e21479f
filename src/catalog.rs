//! Pokémon catalog: typed entry form, search filter and create/update/delete.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use crate::error::{CatalogError, ValidationError};
use crate::identity::Identity;
use crate::store::{DocumentStore, NewPokemon, PokemonRecord};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl PokemonType {
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Electric,
        PokemonType::Grass,
        PokemonType::Ice,
        PokemonType::Fighting,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Flying,
        PokemonType::Psychic,
        PokemonType::Bug,
        PokemonType::Rock,
        PokemonType::Ghost,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Steel,
        PokemonType::Fairy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PokemonType::Normal => "Normal",
            PokemonType::Fire => "Fire",
            PokemonType::Water => "Water",
            PokemonType::Electric => "Electric",
            PokemonType::Grass => "Grass",
            PokemonType::Ice => "Ice",
            PokemonType::Fighting => "Fighting",
            PokemonType::Poison => "Poison",
            PokemonType::Ground => "Ground",
            PokemonType::Flying => "Flying",
            PokemonType::Psychic => "Psychic",
            PokemonType::Bug => "Bug",
            PokemonType::Rock => "Rock",
            PokemonType::Ghost => "Ghost",
            PokemonType::Dragon => "Dragon",
            PokemonType::Dark => "Dark",
            PokemonType::Steel => "Steel",
            PokemonType::Fairy => "Fairy",
        }
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PokemonType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownType(s.to_string()))
    }
}

/// Raw text of the add/edit form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PokemonForm {
    pub name: String,
    pub photo_url: String,
    pub kind: String,
    pub description: String,
    pub height: String,
    pub weight: String,
    pub abilities: String,
}

impl PokemonForm {
    /// Prefill for editing an existing entry.
    pub fn from_record(record: &PokemonRecord) -> Self {
        Self {
            name: record.name.clone(),
            photo_url: record.photo_url.clone(),
            kind: record.kind.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            height: record.height.map(|h| h.to_string()).unwrap_or_default(),
            weight: record.weight.map(|w| w.to_string()).unwrap_or_default(),
            abilities: record.abilities.join(", "),
        }
    }

    /// Validate and convert; blank optional fields become `None`.
    pub fn to_new_pokemon(&self, created_by: Option<&str>) -> Result<NewPokemon, ValidationError> {
        let height = validation::parse_optional_number(&self.height, "height")?;
        let weight = validation::parse_optional_number(&self.weight, "weight")?;
        validation::validate_pokemon_form(
            &self.name,
            &self.photo_url,
            height,
            weight,
            &self.description,
        )?;
        let kind = match self.kind.trim() {
            "" => None,
            raw => Some(raw.parse::<PokemonType>()?.label().to_string()),
        };
        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(NewPokemon {
            name: self.name.trim().to_string(),
            photo_url: self.photo_url.trim().to_string(),
            kind,
            description,
            height,
            weight,
            abilities: validation::parse_abilities(&self.abilities),
            created_by: created_by.map(str::to_string),
        })
    }
}

/// Case-insensitive substring match on name, type or description; a blank
/// term matches everything.
pub fn filter_pokemon<'a>(list: &'a [PokemonRecord], term: &str) -> Vec<&'a PokemonRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return list.iter().collect();
    }
    let contains = |field: &str| field.to_lowercase().contains(&term);
    list.iter()
        .filter(|p| {
            contains(&p.name)
                || p.kind.as_deref().is_some_and(contains)
                || p.description.as_deref().is_some_and(contains)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { id: String },
    Updated { id: String },
}

impl SaveOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SaveOutcome::Created { .. } => "Pokémon added successfully!",
            SaveOutcome::Updated { .. } => "Pokémon updated successfully!",
        }
    }
}

/// Create a new entry, or merge onto `editing` when given.
pub fn save_pokemon(
    identity: Option<&Identity>,
    store: &mut dyn DocumentStore,
    editing: Option<&str>,
    form: &PokemonForm,
) -> Result<SaveOutcome, CatalogError> {
    let identity = identity.ok_or(CatalogError::NotSignedIn)?;
    let pokemon = form.to_new_pokemon(Some(&identity.uid))?;
    let outcome = match editing {
        Some(id) => {
            store.update_pokemon(id, pokemon).inspect_err(|err| {
                error!("Error updating pokemon {}: {}", id, err);
            })?;
            SaveOutcome::Updated { id: id.to_string() }
        }
        None => {
            let id = store.create_pokemon(pokemon).inspect_err(|err| {
                error!("Error creating pokemon: {}", err);
            })?;
            SaveOutcome::Created { id }
        }
    };
    info!("Catalog entry saved: {:?}", outcome);
    Ok(outcome)
}

pub fn delete_pokemon(
    identity: Option<&Identity>,
    store: &mut dyn DocumentStore,
    id: &str,
) -> Result<(), CatalogError> {
    identity.ok_or(CatalogError::NotSignedIn)?;
    store.delete_pokemon(id).inspect_err(|err| {
        error!("Error deleting pokemon {}: {}", id, err);
    })?;
    info!("Catalog entry {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn pikachu_form() -> PokemonForm {
        PokemonForm {
            name: " Pikachu ".into(),
            photo_url: "https://example.com/pikachu.png".into(),
            kind: "electric".into(),
            description: "Mouse Pokémon".into(),
            height: "0.4".into(),
            weight: "".into(),
            abilities: "Static, Lightning Rod".into(),
        }
    }

    fn trainer() -> Identity {
        Identity {
            uid: "u1".into(),
            email: "red@example.com".into(),
        }
    }

    #[test]
    fn type_parse_is_case_insensitive() {
        assert_eq!("fAiRy".parse::<PokemonType>(), Ok(PokemonType::Fairy));
        assert_eq!(
            "Sound".parse::<PokemonType>(),
            Err(ValidationError::UnknownType("Sound".into()))
        );
        assert_eq!(PokemonType::ALL.len(), 18);
    }

    #[test]
    fn form_converts_to_new_pokemon() {
        let new = pikachu_form().to_new_pokemon(Some("u1")).unwrap();
        assert_eq!(new.name, "Pikachu");
        assert_eq!(new.kind.as_deref(), Some("Electric"));
        assert_eq!(new.height, Some(0.4));
        assert_eq!(new.weight, None);
        assert_eq!(new.abilities, ["Static", "Lightning Rod"]);
        assert_eq!(new.created_by.as_deref(), Some("u1"));
    }

    #[test]
    fn non_numeric_height_is_rejected() {
        let form = PokemonForm {
            height: "tall".into(),
            ..pikachu_form()
        };
        assert_eq!(
            form.to_new_pokemon(None),
            Err(ValidationError::NotANumber { field: "height" })
        );
    }

    #[test]
    fn nan_measurements_never_reach_the_store() {
        let form = PokemonForm {
            height: "NaN".into(),
            weight: "nan".into(),
            ..pikachu_form()
        };
        assert!(form.to_new_pokemon(Some("u1")).is_err());

        let mut store = MemoryStore::new();
        let err = save_pokemon(Some(&trainer()), &mut store, None, &form).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Invalid(ValidationError::NotANumber { field: "height" })
        ));
        assert!(store.list_pokemon().unwrap().is_empty());
    }

    #[test]
    fn save_requires_sign_in() {
        let mut store = MemoryStore::new();
        let err = save_pokemon(None, &mut store, None, &pikachu_form()).unwrap_err();
        assert!(matches!(err, CatalogError::NotSignedIn));
        assert!(store.list_pokemon().unwrap().is_empty());
    }

    #[test]
    fn create_then_update() {
        let mut store = MemoryStore::new();
        let created = save_pokemon(Some(&trainer()), &mut store, None, &pikachu_form()).unwrap();
        let SaveOutcome::Created { id } = created else {
            panic!("expected create");
        };

        let mut form = PokemonForm::from_record(&store.get_pokemon(&id).unwrap().unwrap());
        form.weight = "6".into();
        let updated = save_pokemon(Some(&trainer()), &mut store, Some(&id), &form).unwrap();
        assert_eq!(updated.message(), "Pokémon updated successfully!");

        let stored = store.get_pokemon(&id).unwrap().unwrap();
        assert_eq!(stored.weight, Some(6.0));
        assert_eq!(stored.height, Some(0.4));
    }

    #[test]
    fn delete_missing_entry_surfaces_store_error() {
        let mut store = MemoryStore::new();
        let err = delete_pokemon(Some(&trainer()), &mut store, "nope").unwrap_err();
        assert!(matches!(err, CatalogError::Store(_)));
    }

    #[test]
    fn filter_matches_name_type_and_description() {
        let list = vec![
            PokemonRecord {
                name: "Pikachu".into(),
                kind: Some("Electric".into()),
                ..Default::default()
            },
            PokemonRecord {
                name: "Psyduck".into(),
                description: Some("Always has a headache".into()),
                ..Default::default()
            },
        ];
        assert_eq!(filter_pokemon(&list, "").len(), 2);
        assert_eq!(filter_pokemon(&list, "ELEC")[0].name, "Pikachu");
        assert_eq!(filter_pokemon(&list, "headache")[0].name, "Psyduck");
        assert!(filter_pokemon(&list, "dragon").is_empty());
    }
}
