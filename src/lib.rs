#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use std::path::PathBuf;

use thiserror::Error;

pub mod words;
pub use words::{Dictionary, Word};

pub mod feedback;
pub use feedback::{Grade, Pattern, Scoring};

pub mod cache;
pub mod index;

pub mod strategy;
pub use strategy::{Candidates, Strategy};

pub mod solver;
pub use solver::{GuessPool, Solver, SolverConfig};

pub mod opening;

pub mod harness;
pub use harness::Harness;

pub mod perf;
pub use perf::{Perf, Summary};

#[cfg(feature = "stats")]
mod stats;

#[cfg(test)]
mod mock;

/// The result type used throughout `wordle_solver`.
pub type Result<T, E = WordleError> = std::result::Result<T, E>;

/// The errors that `wordle_solver` can produce.
#[derive(Debug, Error)]
pub enum WordleError {
    #[error("invalid word")]
    Word {
        #[from]
        kind: WordError,
    },

    #[error("puzzle encountered error")]
    Puzzle {
        #[from]
        kind: PuzzleError,
    },

    #[error("could not read word list {path}")]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("general IO error")]
    Printing(#[from] std::io::Error),

    #[error("cannot compare a strategy with itself")]
    SelfComparison,

    #[cfg(feature = "stats")]
    #[error("not enough solved games to run statistics")]
    Stats,

    #[cfg(feature = "serde")]
    #[error("trouble serializing a summary")]
    Serde(#[from] serde_json::Error),

    #[error("the test harness encountered an error")]
    Harness {
        #[from]
        kind: HarnessError,
    },
}

#[derive(Debug, Error)]
pub enum WordError {
    /// A word list contained no words.
    #[error("the word list is empty")]
    EmptyDictionary,

    /// A word has a different length than the rest of its dictionary.
    #[error("line {line}: \"{word}\" has {found} letters, expected {expected}")]
    WrongLength {
        line: usize,
        word: String,
        expected: usize,
        found: usize,
    },

    /// A word has a length this crate cannot encode.
    #[error("line {line}: words must have between 1 and {max} letters, found {found}")]
    UnsupportedLength {
        line: usize,
        found: usize,
        max: usize,
    },

    /// A word contains something other than ASCII letters.
    #[error("line {line}: \"{word}\" contains a non-alphabetic character")]
    NotAlphabetic { line: usize, word: String },

    /// The string is not in the dictionary it was looked up in.
    #[error("the string \"{0}\" is not in the word list")]
    NotInWordlist(String),

    /// The word is a valid guess but can never be the answer.
    #[error("the word \"{0}\" is not a possible answer")]
    NotAnAnswer(String),
}

#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The puzzle has already evaluated the maximum number of guesses.
    #[error("the puzzle has already evaluated {0} guesses")]
    OutOfGuesses(usize),

    /// Feedback eliminated every candidate, including the hidden answer.
    #[error("no candidate words remain after guessing {0}")]
    NoCandidates(String),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("test harness already has a baseline")]
    BaselineAlreadySet,

    #[error("no strategies have been added to the harness")]
    NoStrategiesAdded,

    #[error("the strategy {0} failed to produce any attempts")]
    StrategyFailed(String),
}
