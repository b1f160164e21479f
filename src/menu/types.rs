use bevy::prelude::*;

/// Top-level screen state machine.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    /// Title screen with the navigation buttons; shown on startup.
    #[default]
    MainMenu,
    /// "Find the Pokémon" mini-game.
    FindGame,
    /// "Who's that Pokémon?" quiz.
    Quiz,
    /// Best-score tables.
    Leaderboard,
    /// Login / registration form.
    Account,
    /// Pokémon catalog; open to everyone, editable once signed in.
    Catalog,
    /// User admin toggle; gated on the admin flag.
    Admin,
}

// ── Main menu ─────────────────────────────────────────────────────────────────

/// Root node of the main-menu UI; entire tree is despawned on `OnExit(MainMenu)`.
#[derive(Component)]
pub struct MainMenuRoot;

/// Main-menu navigation button; pressing it enters `0`.
#[derive(Component, Clone)]
pub struct MenuNavButton(pub AppState);

#[derive(Component)]
pub struct MenuQuitButton;

/// "Back to main menu" button shared by every screen.
#[derive(Component)]
pub struct BackToMainButton;

/// Signed-in status line on the main menu.
#[derive(Component)]
pub struct SignedInText;

// ── Account ───────────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct AccountRoot;

/// Text node showing one form field by index.
#[derive(Component)]
pub struct AccountFieldText(pub usize);

#[derive(Component)]
pub struct AccountTitleText;

#[derive(Component)]
pub struct AccountMessageText;

#[derive(Component)]
pub struct AccountSubmitButton;

#[derive(Component)]
pub struct AccountToggleModeButton;

#[derive(Component)]
pub struct AccountLogoutButton;

// ── Quiz ──────────────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct QuizRoot;

/// Container rebuilt whenever the quiz changes phase or question.
#[derive(Component)]
pub struct QuizBody;

#[derive(Component)]
pub struct QuizTimerText;

#[derive(Component)]
pub struct QuizScoreText;

#[derive(Component)]
pub struct QuizStartButton;

/// Answer option button carrying the option's text.
#[derive(Component)]
pub struct QuizOptionButton(pub &'static str);

#[derive(Component)]
pub struct QuizNextButton;

#[derive(Component)]
pub struct QuizAgainButton;

// ── Leaderboard ───────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct LeaderboardRoot;

/// Container holding the two rendered tables.
#[derive(Component)]
pub struct LeaderboardTables;

#[derive(Component)]
pub struct LeaderboardNextPageButton;

#[derive(Component)]
pub struct LeaderboardPageSizeButton;

#[derive(Component)]
pub struct LeaderboardRefreshButton;

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct CatalogRoot;

/// Container rebuilt after every catalog action or keystroke.
#[derive(Component)]
pub struct CatalogBody;

/// One listed catalog entry.
#[derive(Component)]
pub struct CatalogEntryRow;

/// Delete the catalog entry with this id.
#[derive(Component)]
pub struct CatalogDeleteButton(pub String);

/// Load the catalog entry with this id into the form for editing.
#[derive(Component)]
pub struct CatalogEditButton(pub String);

#[derive(Component)]
pub struct CatalogSaveButton;

#[derive(Component)]
pub struct CatalogClearButton;

// ── Admin ─────────────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct AdminRoot;

/// Container rebuilt after every admin toggle.
#[derive(Component)]
pub struct AdminBody;

/// Flip the admin flag of the user with this id.
#[derive(Component)]
pub struct AdminToggleButton(pub String);
