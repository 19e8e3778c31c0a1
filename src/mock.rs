use std::fmt::Display;

use crate::{
    feedback::Scoring,
    strategy::{Attempts, Puzzle, Strategy},
};

/// Plays a fixed list of guesses, in order, until one is right.
#[derive(Debug, Clone)]
pub(crate) struct Mock {
    guesses: Option<Vec<&'static str>>,
}

impl Mock {
    pub(crate) fn new(guesses: impl Into<Option<Vec<&'static str>>>) -> Self {
        Self {
            guesses: guesses.into(),
        }
    }
}

impl Strategy for Mock {
    fn solve(&self, puzzle: &Puzzle<'_>) -> Attempts {
        let mut attempts = puzzle.attempts();

        let guesses: &[&str] = match &self.guesses {
            None => &["nerds", "tithe", "doubt", "point", "parka", "sword"],
            Some(v) => v.as_slice(),
        };

        for guess in guesses {
            let word = puzzle.dictionary().word(guess).unwrap();
            match puzzle.check(word, &mut attempts) {
                Ok((_, true)) | Err(_) => break,
                Ok((_, false)) => {}
            }
        }

        attempts
    }

    fn version(&self) -> &'static str {
        "1.2.4"
    }

    fn scoring(&self) -> Scoring {
        Scoring::Standard
    }

    fn max_turns(&self) -> usize {
        6
    }
}

impl Display for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mock {:?}", self.guesses)
    }
}
