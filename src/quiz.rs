//! "Who's that Pokémon?" quiz session.
//!
//! A run walks the built-in question bank in order, shuffling the answer
//! options of each question.  The clock is whole seconds, advanced by
//! [`QuizSession::tick_second`].

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub pokemon: &'static str,
    pub silhouette: &'static str,
    pub image: &'static str,
    pub options: [&'static str; 4],
}

pub const QUESTION_BANK: [QuizQuestion; 4] = [
    QuizQuestion {
        pokemon: "Pikachu",
        silhouette: "images/quiz/pikachu_who_0.png",
        image: "images/quiz/pikachu_who_1.png",
        options: ["Pikachu", "Raichu", "Bulbasaur", "Charmander"],
    },
    QuizQuestion {
        pokemon: "Bulbasaur",
        silhouette: "images/quiz/bulbasaur_who_0.png",
        image: "images/quiz/bulbasaur_who_1.png",
        options: ["Squirtle", "Bulbasaur", "Charmander", "Oddish"],
    },
    QuizQuestion {
        pokemon: "Charmander",
        silhouette: "images/quiz/charmander_who_0.png",
        image: "images/quiz/charmander_who_1.png",
        options: ["Charmander", "Charmeleon", "Psyduck", "Growlithe"],
    },
    QuizQuestion {
        pokemon: "Psyduck",
        silhouette: "images/quiz/psyduck_who_0.png",
        image: "images/quiz/psyduck_who_1.png",
        options: ["Psyduck", "Wartortle", "Pikachu", "Poliwag"],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResult {
    Correct,
    Wrong { correct: &'static str },
}

impl AnswerResult {
    pub fn message(&self) -> String {
        match self {
            AnswerResult::Correct => "Correct!".to_string(),
            AnswerResult::Wrong { correct } => format!("Wrong! It was {correct}."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    Idle,
    Running,
    Ended,
}

/// One quiz run plus its idle / ended bookends.
#[derive(Debug, Clone)]
pub struct QuizSession {
    phase: QuizPhase,
    duration_secs: u32,
    questions_per_round: usize,
    login_bonus: u32,
    signed_in: bool,
    remaining_secs: u32,
    score: u32,
    index: usize,
    options: Vec<&'static str>,
    answer: Option<AnswerResult>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl QuizSession {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            phase: QuizPhase::Idle,
            duration_secs: config.quiz_duration_secs,
            questions_per_round: config.quiz_questions_per_round,
            login_bonus: config.quiz_login_bonus,
            signed_in: false,
            remaining_secs: config.quiz_duration_secs,
            score: 0,
            index: 0,
            options: Vec::new(),
            answer: None,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Zero-based question number within the run.
    pub fn question_number(&self) -> usize {
        self.index
    }

    pub fn answer(&self) -> Option<&AnswerResult> {
        self.answer.as_ref()
    }

    pub fn has_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn options(&self) -> &[&'static str] {
        &self.options
    }

    pub fn current_question(&self) -> Option<&'static QuizQuestion> {
        if self.phase != QuizPhase::Running {
            return None;
        }
        Some(&QUESTION_BANK[self.index % QUESTION_BANK.len()])
    }

    /// The clock turns red in the last few seconds.
    pub fn is_time_low(&self) -> bool {
        self.remaining_secs <= crate::constants::QUIZ_WARNING_SECS
    }

    pub fn start(&mut self, signed_in: bool, rng: &mut impl Rng) {
        self.phase = QuizPhase::Running;
        self.signed_in = signed_in;
        self.remaining_secs = self.duration_secs;
        self.score = 0;
        self.index = 0;
        self.load_question(rng);
    }

    /// Advance the clock one second; returns `true` when this tick ended the
    /// run.
    pub fn tick_second(&mut self) -> bool {
        if self.phase != QuizPhase::Running {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.end();
            return true;
        }
        false
    }

    /// Only the first answer to each question counts.
    pub fn check_answer(&mut self, selected: &str) -> Option<&AnswerResult> {
        if self.answer.is_some() {
            return None;
        }
        let question = self.current_question()?;
        let result = if selected == question.pokemon {
            self.score += 1;
            if self.signed_in {
                self.score += self.login_bonus;
            }
            AnswerResult::Correct
        } else {
            AnswerResult::Wrong {
                correct: question.pokemon,
            }
        };
        self.answer = Some(result);
        self.answer.as_ref()
    }

    pub fn next_question(&mut self, rng: &mut impl Rng) {
        if self.phase != QuizPhase::Running {
            return;
        }
        self.index += 1;
        self.load_question(rng);
    }

    fn load_question(&mut self, rng: &mut impl Rng) {
        if self.index >= self.questions_per_round || self.remaining_secs == 0 {
            self.end();
            return;
        }
        let question = &QUESTION_BANK[self.index % QUESTION_BANK.len()];
        self.options = question.options.to_vec();
        self.options.shuffle(rng);
        self.answer = None;
    }

    pub fn end(&mut self) {
        self.phase = QuizPhase::Ended;
        self.options.clear();
    }

    /// Back to the idle screen without touching the last score.
    pub fn back_to_menu(&mut self) {
        if self.phase == QuizPhase::Ended {
            self.phase = QuizPhase::Idle;
        }
    }

    pub fn reset(&mut self) {
        let config_backed = Self {
            duration_secs: self.duration_secs,
            questions_per_round: self.questions_per_round,
            login_bonus: self.login_bonus,
            remaining_secs: self.duration_secs,
            ..Self::default()
        };
        *self = config_backed;
    }

    pub fn final_score_message(&self) -> String {
        let bonus = if self.signed_in {
            " (includes login bonus!)"
        } else {
            ""
        };
        format!("Quiz Complete! Your Score: {}{}", self.score, bonus)
    }
}
