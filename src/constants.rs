//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  [`crate::config::GameConfig::default`] mirrors every
//! value, and `assets/game.toml` may override any of them at startup.

// ── Find Game: Round ──────────────────────────────────────────────────────────

/// Length of one find-game session in milliseconds.
///
/// The countdown never resets between rounds; finding the target only starts
/// a fresh board.
pub const GAME_DURATION_MS: f64 = 30.0 * 1000.0;

/// Number of trainer sprites available as decoys (`trainers/0.png` … `400.png`).
pub const NUM_TRAINERS: usize = 401;

/// Number of pokemon sprites available as targets (`pokemon/0.png` … `400.png`).
pub const NUM_POKEMONS: usize = 401;

/// Decoys shown alongside the single target every round.
///
/// Total sprites on screen = `DECOY_COUNT + 1`.
pub const DECOY_COUNT: usize = 299;

// ── Find Game: Layout ─────────────────────────────────────────────────────────

/// Edge length of every square sprite (logical pixels).
pub const SPRITE_SIZE: f32 = 70.0;

/// Safety margin kept clear of the viewport edges and the fixed HUD chrome.
///
/// Vertical band: `[2.5·m, h − 1.5·m − SPRITE_SIZE)`.
/// Horizontal band: `[0.3·m, w − 0.2·m − SPRITE_SIZE)`.
pub const SAFE_MARGIN: f32 = 45.0;

/// Fraction of the viewport height at which the shared launch origin sits.
pub const LAUNCH_HEIGHT_FRACTION: f32 = 0.8;

/// Seconds a sprite spends travelling from the launch origin to its slot.
pub const FLIGHT_DURATION_SECS: f32 = 1.0;

/// Seconds to wait for a round's images before revealing the board anyway.
///
/// A stalled image load would otherwise freeze the round forever.
pub const IMAGE_LOAD_TIMEOUT_SECS: f64 = 10.0;

// ── Find Game: Curve ──────────────────────────────────────────────────────────

/// Horizontal control-point weight on the travel delta (`cx = 0.5·dx − 0.3·dy`).
pub const CURVE_CX_DX: f32 = 0.5;
pub const CURVE_CX_DY: f32 = -0.3;

/// Vertical control-point terms (`cy = −0.3·h + 0.0005·dx² − 300·r`).
pub const CURVE_CY_HEIGHT: f32 = -0.3;
pub const CURVE_CY_DX_SQ: f32 = 0.0005;
pub const CURVE_CY_JITTER: f32 = 300.0;

// ── Quiz ──────────────────────────────────────────────────────────────────────

/// Seconds on the quiz clock.
pub const QUIZ_DURATION_SECS: u32 = 60;

/// Questions asked before the quiz ends on its own.
pub const QUIZ_QUESTIONS_PER_ROUND: usize = 4;

/// Extra points per correct answer for signed-in players.
pub const QUIZ_LOGIN_BONUS: u32 = 5;

/// Quiz clock turns red at or below this many seconds.
pub const QUIZ_WARNING_SECS: u32 = 10;

// ── Accounts ──────────────────────────────────────────────────────────────────

/// Consecutive failed logins before an email is temporarily locked.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Seconds an email stays locked after too many failed logins.
pub const LOCKOUT_SECS: u64 = 60;

/// Minimum password length accepted by the format validator.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Minimum number of capital letters in a password.
pub const PASSWORD_MIN_CAPITALS: usize = 2;

// ── Catalog ───────────────────────────────────────────────────────────────────

pub const POKEMON_NAME_MIN_LEN: usize = 2;
pub const POKEMON_MAX_HEIGHT: f32 = 1000.0;
pub const POKEMON_MAX_WEIGHT: f32 = 10000.0;
pub const POKEMON_DESCRIPTION_MAX_LEN: usize = 500;

// ── Storage & Assets ──────────────────────────────────────────────────────────

/// Directory holding `accounts.toml` and `store.toml`.
pub const DATA_DIR: &str = "saves";

/// Asset-relative directory of trainer (decoy) sprites.
pub const TRAINER_IMAGE_DIR: &str = "images/trainers";

/// Asset-relative directory of pokemon (target) sprites.
pub const POKEMON_IMAGE_DIR: &str = "images/pokemon";

/// Asset-relative path of the pokeball shown at the launch origin.
pub const POKEBALL_IMAGE: &str = "images/pokeball_opening.png";

// ── Leaderboard ───────────────────────────────────────────────────────────────

/// Rows per leaderboard page; `0` shows every row on one page.
pub const LEADERBOARD_PAGE_SIZE: usize = 0;

/// Page sizes the leaderboard screen cycles through (after "all").
pub const LEADERBOARD_PAGE_SIZE_OPTIONS: [usize; 3] = [10, 25, 50];

// ── Window ────────────────────────────────────────────────────────────────────

pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;
