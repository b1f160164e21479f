//! Round controller for the find game.
//!
//! [`GameSession`] is the single owner of score, round counter, phase and
//! countdown.  Input arrives as [`FindGameEvent`]s and every call returns a
//! [`Transition`] telling the ECS layer what to do next (repopulate the board,
//! show the end card, persist the score, …).
//!
//! ## State machine
//!
//! ```text
//!  Menu ──Start──▶ Playing ──TargetFound──▶ Playing (next round)
//!                     │
//!                     └──TimerExpired / Tick(0)──▶ Ended ──ReturnToMenu──▶ Menu
//! ```
//!
//! The countdown is authoritative: a target click that lands after the clock
//! reached zero is ignored even if the expiry tick has not been processed yet.

use crate::countdown::{display_seconds, Countdown};
use bevy::prelude::*;

/// Phase of the find-game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FindPhase {
    /// Instructions and start button shown.
    #[default]
    Menu,
    /// Countdown running, board live.
    Playing,
    /// Countdown expired; end card shown.
    Ended,
}

/// Input dispatched onto the round controller.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindGameEvent {
    Start,
    /// The target sprite of `round` was clicked.
    TargetFound { round: u64 },
    /// Per-frame countdown sample.
    Tick,
    TimerExpired,
    ReturnToMenu,
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Event not valid in the current phase (or stale); nothing changed.
    Ignored,
    /// Session started; populate the board for `round`.
    Started { round: u64 },
    /// Target found; score incremented, populate the board for `round`.
    NextRound { round: u64, score: u32 },
    /// Countdown sampled while playing.
    Ticked { display_secs: f64 },
    /// Countdown reached zero; hide the board and persist `final_score`.
    Ended { final_score: u32 },
    BackToMenu,
}

#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    phase: FindPhase,
    score: u32,
    round: u64,
    remaining_ms: f64,
    countdown: Countdown,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(crate::constants::GAME_DURATION_MS)
    }
}

impl GameSession {
    pub fn new(duration_ms: f64) -> Self {
        let countdown = Countdown::new(duration_ms);
        Self {
            phase: FindPhase::Menu,
            score: 0,
            round: 0,
            remaining_ms: countdown.duration_ms(),
            countdown,
        }
    }

    #[inline]
    pub fn phase(&self) -> FindPhase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Identifier of the current round; bumps on every new board.
    #[inline]
    pub fn round(&self) -> u64 {
        self.round
    }

    #[inline]
    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    pub fn display_secs(&self) -> f64 {
        display_seconds(self.remaining_ms)
    }

    pub fn final_score_message(&self) -> String {
        format!("Game Over! Your final score is: {}", self.score)
    }

    /// Dispatch `event` observed at monotonic time `now_ms`.
    pub fn handle(&mut self, event: FindGameEvent, now_ms: f64) -> Transition {
        match event {
            FindGameEvent::Start => self.start(now_ms),
            FindGameEvent::TargetFound { round } => self.on_target_found(round, now_ms),
            FindGameEvent::Tick => self.tick(now_ms),
            FindGameEvent::TimerExpired => self.on_timer_expired(),
            FindGameEvent::ReturnToMenu => self.return_to_menu(),
        }
    }

    /// `Menu → Playing`: zero the score, start the clock, open round one.
    pub fn start(&mut self, now_ms: f64) -> Transition {
        if self.phase != FindPhase::Menu {
            return Transition::Ignored;
        }
        self.score = 0;
        self.round += 1;
        self.phase = FindPhase::Playing;
        self.countdown.start(now_ms);
        self.remaining_ms = self.countdown.duration_ms();
        Transition::Started { round: self.round }
    }

    /// Score a point and open the next round.  The clock keeps running.
    pub fn on_target_found(&mut self, round: u64, now_ms: f64) -> Transition {
        if self.phase != FindPhase::Playing || round != self.round {
            return Transition::Ignored;
        }
        match self.countdown.remaining_at(now_ms) {
            Some(remaining) if remaining > 0.0 => {}
            _ => return Transition::Ignored,
        }
        self.score += 1;
        self.round += 1;
        Transition::NextRound {
            round: self.round,
            score: self.score,
        }
    }

    /// Sample the countdown; ends the session on the first zero sample.
    pub fn tick(&mut self, now_ms: f64) -> Transition {
        if self.phase != FindPhase::Playing {
            return Transition::Ignored;
        }
        let Some(tick) = self.countdown.sample(now_ms) else {
            return Transition::Ignored;
        };
        self.remaining_ms = tick.remaining_ms;
        if tick.expired {
            return self.on_timer_expired();
        }
        Transition::Ticked {
            display_secs: tick.display_secs,
        }
    }

    /// `Playing → Ended`.  Safe to call more than once; later calls are ignored.
    pub fn on_timer_expired(&mut self) -> Transition {
        if self.phase != FindPhase::Playing {
            return Transition::Ignored;
        }
        self.countdown.cancel();
        self.remaining_ms = 0.0;
        self.phase = FindPhase::Ended;
        Transition::Ended {
            final_score: self.score,
        }
    }

    /// `Ended → Menu`.
    pub fn return_to_menu(&mut self) -> Transition {
        if self.phase != FindPhase::Ended {
            return Transition::Ignored;
        }
        self.phase = FindPhase::Menu;
        Transition::BackToMenu
    }

    /// Cancel the clock and drop all per-session state (screen left).
    pub fn reset(&mut self) {
        self.countdown.cancel();
        self.phase = FindPhase::Menu;
        self.score = 0;
        self.remaining_ms = self.countdown.duration_ms();
    }
}
