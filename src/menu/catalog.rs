use bevy::input::keyboard::KeyboardInput;

use super::account::FormMessage;
use super::form::{FormAction, FormField, TextForm};
use super::*;
use crate::catalog::{self, PokemonForm, PokemonType};
use crate::error::CatalogError;
use crate::store::PokemonRecord;

const SEARCH: usize = 0;
const NAME: usize = 1;
const PHOTO_URL: usize = 2;
const KIND: usize = 3;
const DESCRIPTION: usize = 4;
const HEIGHT: usize = 5;
const WEIGHT: usize = 6;
const ABILITIES: usize = 7;

const LOAD_FAILED: &str = "Failed to load Pokémon. Please try again.";
const DELETE_FAILED: &str = "Failed to delete Pokémon. Please try again.";

fn catalog_text_form() -> TextForm {
    TextForm::new(vec![
        FormField::text("Search"),
        FormField::text("Name"),
        FormField::text("Photo URL").with_max_len(256),
        FormField::text("Type"),
        FormField::text("Description")
            .with_max_len(crate::constants::POKEMON_DESCRIPTION_MAX_LEN + 1),
        FormField::text("Height (m)"),
        FormField::text("Weight (kg)"),
        FormField::text("Abilities (comma separated)").with_max_len(256),
    ])
}

/// Catalog screen model. Listing and search are open to everyone; any write
/// needs a signed-in player.
#[derive(Resource, Debug, Clone)]
pub struct CatalogView {
    pub signed_in: bool,
    pub pokemon: Vec<PokemonRecord>,
    pub form: TextForm,
    /// Id of the entry being edited; `None` creates a new one.
    pub editing: Option<String>,
    pub message: Option<FormMessage>,
    pub dirty: bool,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            signed_in: false,
            pokemon: Vec::new(),
            form: catalog_text_form(),
            editing: None,
            message: None,
            dirty: true,
        }
    }
}

impl CatalogView {
    fn error(&mut self, text: impl Into<String>) {
        self.message = Some(FormMessage {
            text: text.into(),
            is_error: true,
        });
        self.dirty = true;
    }

    fn success(&mut self, text: impl Into<String>) {
        self.message = Some(FormMessage {
            text: text.into(),
            is_error: false,
        });
        self.dirty = true;
    }

    pub fn load(&mut self, backend: &Backend) {
        self.dirty = true;
        self.signed_in = backend.is_signed_in();
        match backend.store.list_pokemon() {
            Ok(pokemon) => self.pokemon = pokemon,
            Err(err) => {
                error!("Error loading pokemon: {}", err);
                self.error(LOAD_FAILED);
            }
        }
    }

    pub fn entry_form(&self) -> PokemonForm {
        PokemonForm {
            name: self.form.value(NAME).to_string(),
            photo_url: self.form.value(PHOTO_URL).to_string(),
            kind: self.form.value(KIND).to_string(),
            description: self.form.value(DESCRIPTION).to_string(),
            height: self.form.value(HEIGHT).to_string(),
            weight: self.form.value(WEIGHT).to_string(),
            abilities: self.form.value(ABILITIES).to_string(),
        }
    }

    pub fn fill_form(&mut self, form: &PokemonForm) {
        self.form.set_value(NAME, form.name.clone());
        self.form.set_value(PHOTO_URL, form.photo_url.clone());
        self.form.set_value(KIND, form.kind.clone());
        self.form.set_value(DESCRIPTION, form.description.clone());
        self.form.set_value(HEIGHT, form.height.clone());
        self.form.set_value(WEIGHT, form.weight.clone());
        self.form.set_value(ABILITIES, form.abilities.clone());
        self.dirty = true;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.form.set_value(SEARCH, term.into());
        self.dirty = true;
    }

    /// Entries matching the search field.
    pub fn visible_pokemon(&self) -> Vec<&PokemonRecord> {
        catalog::filter_pokemon(&self.pokemon, self.form.value(SEARCH))
    }

    pub fn start_edit(&mut self, id: &str) {
        if !self.signed_in {
            self.error(CatalogError::NotSignedIn.to_string());
            return;
        }
        let Some(record) = self.pokemon.iter().find(|p| p.id == id) else {
            return;
        };
        let form = PokemonForm::from_record(record);
        self.fill_form(&form);
        self.editing = Some(id.to_string());
        self.form.focused = NAME;
        self.message = None;
    }

    pub fn clear_form(&mut self) {
        let search = self.form.value(SEARCH).to_string();
        self.form = catalog_text_form();
        self.form.set_value(SEARCH, search);
        self.editing = None;
        self.dirty = true;
    }

    /// Sign-in is checked by [`catalog::save_pokemon`]; its error is shown
    /// inline like any validation failure.
    pub fn save(&mut self, backend: &mut Backend) {
        let identity = backend.current_identity();
        let form = self.entry_form();
        let result = catalog::save_pokemon(
            identity.as_ref(),
            backend.store.as_mut(),
            self.editing.as_deref(),
            &form,
        );
        match result {
            Ok(outcome) => {
                self.clear_form();
                self.load(backend);
                self.success(outcome.message());
            }
            Err(err) => self.error(err.to_string()),
        }
    }

    pub fn delete(&mut self, backend: &mut Backend, id: &str) {
        let identity = backend.current_identity();
        match catalog::delete_pokemon(identity.as_ref(), backend.store.as_mut(), id) {
            Ok(()) => {
                if self.editing.as_deref() == Some(id) {
                    self.clear_form();
                }
                self.load(backend);
                self.success("Pokémon deleted successfully!");
            }
            Err(err @ CatalogError::NotSignedIn) => self.error(err.to_string()),
            Err(_) => self.error(DELETE_FAILED),
        }
    }
}

pub(super) fn setup_catalog(
    mut commands: Commands,
    font: Res<GameFont>,
    backend: Res<Backend>,
    mut view: ResMut<CatalogView>,
) {
    *view = CatalogView::default();
    view.load(&backend);

    commands
        .spawn((screen_root_node(), BackgroundColor(Color::BLACK), CatalogRoot))
        .with_children(|root| {
            spawn_label(root, &font, "Pokédex", 40.0, title_color());
            root.spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(6.0),
                    ..default()
                },
                CatalogBody,
            ));
            spacer(root, 8.0);
            spawn_button(root, &font, "MAIN MENU", 240.0, back_style(), BackToMainButton);
        });
}

/// Typing edits the search box and entry form; Enter saves.
pub(super) fn catalog_input_system(
    mut inputs: MessageReader<KeyboardInput>,
    mut view: ResMut<CatalogView>,
    mut backend: ResMut<Backend>,
) {
    let mut submit = false;
    for input in inputs.read() {
        match view.form.apply_input(input) {
            FormAction::Submit => submit = true,
            FormAction::Edited => view.dirty = true,
            FormAction::None => {}
        }
    }
    if submit && view.form.focused != SEARCH {
        view.save(&mut backend);
    }
}

#[allow(clippy::type_complexity)]
pub(super) fn catalog_button_system(
    delete_query: Query<(&Interaction, &CatalogDeleteButton), Changed<Interaction>>,
    edit_query: Query<(&Interaction, &CatalogEditButton), Changed<Interaction>>,
    save_query: Query<&Interaction, (Changed<Interaction>, With<CatalogSaveButton>)>,
    clear_query: Query<&Interaction, (Changed<Interaction>, With<CatalogClearButton>)>,
    mut view: ResMut<CatalogView>,
    mut backend: ResMut<Backend>,
) {
    for (interaction, button) in delete_query.iter() {
        if *interaction == Interaction::Pressed {
            view.delete(&mut backend, &button.0);
        }
    }
    for (interaction, button) in edit_query.iter() {
        if *interaction == Interaction::Pressed {
            view.start_edit(&button.0);
        }
    }
    if save_query.iter().any(|i| *i == Interaction::Pressed) {
        view.save(&mut backend);
    }
    if clear_query.iter().any(|i| *i == Interaction::Pressed) {
        view.clear_form();
    }
}

fn card_node() -> Node {
    Node {
        flex_direction: FlexDirection::Column,
        min_width: Val::Px(560.0),
        padding: UiRect::all(Val::Px(10.0)),
        row_gap: Val::Px(4.0),
        border: UiRect::all(Val::Px(1.0)),
        ..default()
    }
}

fn spawn_entry_form(parent: &mut ChildSpawnerCommands<'_>, font: &GameFont, view: &CatalogView) {
    parent
        .spawn((card_node(), BackgroundColor(card_bg()), BorderColor::all(card_border())))
        .with_children(|card| {
            let heading = match &view.editing {
                Some(_) => "Edit Pokémon",
                None => "Add Pokémon",
            };
            spawn_label(card, font, heading, 18.0, title_color());
            for index in NAME..view.form.fields.len() {
                spawn_label(card, font, view.form.display(index), 14.0, label_color());
            }
            let types: Vec<&str> = PokemonType::ALL.iter().map(|t| t.label()).collect();
            let types = format!("Types: {}", types.join(", "));
            spawn_label(card, font, types, 11.0, hint_color());
            card.spawn(Node {
                column_gap: Val::Px(10.0),
                ..default()
            })
            .with_children(|row| {
                spawn_button(row, font, "SAVE", 140.0, primary_style(), CatalogSaveButton);
                spawn_button(row, font, "CLEAR", 140.0, back_style(), CatalogClearButton);
            });
        });
}

pub(super) fn catalog_body_system(
    mut commands: Commands,
    font: Res<GameFont>,
    mut view: ResMut<CatalogView>,
    body: Query<Entity, With<CatalogBody>>,
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

        if !view.signed_in {
            let hint = "Sign in from Account to add, edit or delete entries.";
            spawn_label(body, &font, hint, 13.0, hint_color());
        }
        spawn_entry_form(body, &font, &view);

        body.spawn((card_node(), BackgroundColor(card_bg()), BorderColor::all(card_border())))
            .with_children(|list| {
                spawn_label(list, &font, view.form.display(SEARCH), 14.0, label_color());
                let visible = view.visible_pokemon();
                let heading = format!("Pokémon ({})", visible.len());
                spawn_label(list, &font, heading, 18.0, title_color());
                for pokemon in visible {
                    list.spawn((
                        Node {
                            column_gap: Val::Px(10.0),
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        CatalogEntryRow,
                    ))
                    .with_children(|row| {
                        let kind = pokemon.kind.as_deref().unwrap_or("?");
                        let label = format!("{} ({})", pokemon.name, kind);
                        spawn_label(row, &font, label, 14.0, label_color());
                        if view.signed_in {
                            let edit = CatalogEditButton(pokemon.id.clone());
                            spawn_button(row, &font, "EDIT", 90.0, option_style(), edit);
                            let delete = CatalogDeleteButton(pokemon.id.clone());
                            spawn_button(row, &font, "DELETE", 90.0, danger_style(), delete);
                        }
                    });
                }
            });
    });
}
