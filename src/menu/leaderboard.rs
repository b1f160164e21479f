use super::*;
use crate::bridge::ScoreKind;
use crate::leaderboard::{rank_users, LeaderboardEntry, Page};

/// Ranked tables plus the shared paging cursor.
#[derive(Resource, Debug, Clone, Default)]
pub struct LeaderboardView {
    pub page: Page,
    pub quiz: Vec<LeaderboardEntry>,
    pub find: Vec<LeaderboardEntry>,
    pub load_error: bool,
    pub dirty: bool,
}

impl LeaderboardView {
    /// Re-read users and re-rank; the cursor returns to page one.
    pub fn reload(&mut self, backend: &Backend) {
        match backend.store.list_users() {
            Ok(users) => {
                self.quiz = rank_users(&users, ScoreKind::Quiz);
                self.find = rank_users(&users, ScoreKind::Find);
                self.load_error = false;
            }
            Err(err) => {
                error!("Error loading leaderboard: {}", err);
                self.quiz.clear();
                self.find.clear();
                self.load_error = true;
            }
        }
        self.page.page = 1;
        self.dirty = true;
    }

    fn longest(&self) -> usize {
        self.quiz.len().max(self.find.len())
    }
}

pub(super) fn setup_leaderboard(
    mut commands: Commands,
    font: Res<GameFont>,
    config: Res<crate::config::GameConfig>,
    backend: Res<Backend>,
    mut view: ResMut<LeaderboardView>,
) {
    view.page = Page::new(config.leaderboard_page_size);
    view.reload(&backend);

    commands
        .spawn((screen_root_node(), BackgroundColor(Color::BLACK), LeaderboardRoot))
        .with_children(|root| {
            spawn_label(root, &font, "Leaderboard", 40.0, title_color());
            spacer(root, 8.0);
            root.spawn((
                Node {
                    column_gap: Val::Px(48.0),
                    align_items: AlignItems::FlexStart,
                    ..default()
                },
                LeaderboardTables,
            ));
            spacer(root, 12.0);
            root.spawn(Node {
                column_gap: Val::Px(12.0),
                ..default()
            })
            .with_children(|row| {
                spawn_button(row, &font, "NEXT PAGE", 180.0, option_style(), LeaderboardNextPageButton);
                spawn_button(row, &font, "PAGE SIZE", 180.0, option_style(), LeaderboardPageSizeButton);
                spawn_button(row, &font, "REFRESH", 180.0, option_style(), LeaderboardRefreshButton);
            });
            spacer(root, 8.0);
            spawn_button(root, &font, "MAIN MENU", 240.0, back_style(), BackToMainButton);
        });
}

#[allow(clippy::type_complexity)]
pub(super) fn leaderboard_button_system(
    next_query: Query<&Interaction, (Changed<Interaction>, With<LeaderboardNextPageButton>)>,
    size_query: Query<&Interaction, (Changed<Interaction>, With<LeaderboardPageSizeButton>)>,
    refresh_query: Query<&Interaction, (Changed<Interaction>, With<LeaderboardRefreshButton>)>,
    backend: Res<Backend>,
    mut view: ResMut<LeaderboardView>,
) {
    if next_query.iter().any(|i| *i == Interaction::Pressed) {
        let total = view.longest();
        view.page.next_page(total);
        view.dirty = true;
    }
    if size_query.iter().any(|i| *i == Interaction::Pressed) {
        view.page.cycle_size();
        view.dirty = true;
    }
    if refresh_query.iter().any(|i| *i == Interaction::Pressed) {
        view.reload(&backend);
    }
}

fn spawn_table(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &GameFont,
    title: &str,
    entries: &[LeaderboardEntry],
    page: Page,
) {
    parent
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                min_width: Val::Px(340.0),
                padding: UiRect::all(Val::Px(14.0)),
                row_gap: Val::Px(4.0),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(card_bg()),
            BorderColor::all(card_border()),
        ))
        .with_children(|table| {
            spawn_label(table, font, title, 22.0, title_color());
            spacer(table, 6.0);
            let rows = page.displayed(entries);
            if rows.is_empty() {
                spawn_label(table, font, "No scores yet.", 15.0, hint_color());
            }
            for (index, entry) in rows.iter().enumerate() {
                spawn_label(
                    table,
                    font,
                    format!("{:>3}. {:<20} {:>5}", page.rank_for_index(index), entry.name, entry.score),
                    15.0,
                    label_color(),
                );
            }
        });
}

pub(super) fn leaderboard_tables_system(
    mut commands: Commands,
    font: Res<GameFont>,
    mut view: ResMut<LeaderboardView>,
    tables: Query<Entity, With<LeaderboardTables>>,
) {
    if !view.dirty {
        return;
    }
    let Ok(tables) = tables.single() else {
        return;
    };
    view.dirty = false;

    let page = view.page;
    let pages = page.page_count(view.longest());
    commands.entity(tables).despawn_related::<Children>();
    commands.entity(tables).with_children(|row| {
        if view.load_error {
            spawn_label(row, &font, "Could not load the leaderboard.", 16.0, error_color());
            return;
        }
        spawn_table(row, &font, "Quiz", &view.quiz, page);
        spawn_table(row, &font, "Find the Pokémon", &view.find, page);
        let size = if page.page_size == 0 {
            "all".to_string()
        } else {
            page.page_size.to_string()
        };
        spawn_label(
            row,
            &font,
            format!("Page {} / {}  ·  {} per page", page.page, pages, size),
            13.0,
            hint_color(),
        );
    });
}
