//! PokéArcade library
//!
//! A find-the-Pokémon mini-game, a "Who's that Pokémon?" quiz, leaderboards
//! and a small Pokémon catalog with local accounts, built on Bevy UI.

pub mod admin;
pub mod backend;
pub mod board;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod error;
pub mod find_game;
pub mod graphics;
pub mod identity;
pub mod leaderboard;
pub mod menu;
pub mod quiz;
pub mod session;
pub mod store;
pub mod validation;
