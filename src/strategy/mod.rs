//! Tools for playing Wordle puzzles.

use std::fmt::{Debug, Display};

use crate::{
    feedback::{grade, Pattern, Scoring},
    words::{Dictionary, Word},
    PuzzleError, Result,
};

mod candidates;
pub use candidates::Candidates;

/// A specific Wordle puzzle to solve.
///
/// Implementers of [`Strategy`] receive an instance of this struct in the
/// [`solve()`](Strategy::solve()) function. It hides the answer and only
/// hands out the feedback Wordle would show for each guess.
///
/// # Examples
///
/// ```rust
/// # use wordle_solver::{Dictionary, Scoring, strategy::Puzzle};
/// let dict = Dictionary::new(["crane", "slate", "trace"])?;
/// let puzzle = Puzzle::new(&dict, dict.answer("trace")?, Scoring::Standard, 6);
/// let mut attempts = puzzle.attempts();
///
/// let (pattern, correct) = puzzle.check(dict.word("slate")?, &mut attempts)?;
/// assert!(!correct);
/// assert_eq!(pattern.to_string(), "⬛⬛🟩🟨🟩");
///
/// let (_, correct) = puzzle.check(dict.word("trace")?, &mut attempts)?;
/// assert!(correct);
/// assert_eq!(attempts.len(), 2);
/// # Ok::<_, wordle_solver::WordleError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Puzzle<'d> {
    dict: &'d Dictionary,
    answer: Word,
    scoring: Scoring,
    max_turns: usize,
}

impl<'d> Puzzle<'d> {
    /// Creates a new puzzle for `answer` that allows at most `max_turns`
    /// guesses.
    pub fn new(dict: &'d Dictionary, answer: Word, scoring: Scoring, max_turns: usize) -> Self {
        Puzzle {
            dict,
            answer,
            scoring,
            max_turns,
        }
    }

    /// Produces an empty record of attempts sized for this puzzle.
    pub fn attempts(&self) -> Attempts {
        Attempts::new(self.max_turns)
    }

    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    /// The dictionary guesses are looked up in.
    pub fn dictionary(&self) -> &'d Dictionary {
        self.dict
    }

    /// Checks a guess and returns its feedback and whether it was the answer.
    ///
    /// The guess is recorded in `attempts`. If `attempts` is already full this
    /// returns [`PuzzleError::OutOfGuesses`] and records nothing.
    pub fn check(&self, guess: Word, attempts: &mut Attempts) -> Result<(Pattern, bool)> {
        let pattern = grade(
            self.dict.letters(guess),
            self.dict.letters(self.answer),
            self.scoring,
        );
        attempts.push(guess, pattern)?;
        Ok((pattern, guess == self.answer))
    }
}

/// The guesses made on one puzzle and the feedback each received.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Default)]
pub struct Attempts {
    inner: Vec<(Word, Pattern)>,
    limit: usize,
}

impl Attempts {
    /// Creates an empty record that holds at most `limit` guesses.
    pub fn new(limit: usize) -> Self {
        Attempts {
            inner: Vec::new(),
            limit,
        }
    }

    fn push(&mut self, word: Word, pattern: Pattern) -> Result<usize> {
        if self.finished() {
            return Err(PuzzleError::OutOfGuesses(self.limit).into());
        }
        self.inner.push((word, pattern));
        Ok(self.inner.len() - 1)
    }

    /// Returns a slice into the underlying guesses and their feedback.
    pub fn inner(&self) -> &[(Word, Pattern)] {
        self.inner.as_slice()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns true once no more guesses can be recorded.
    pub fn finished(&self) -> bool {
        self.inner.len() >= self.limit
    }

    /// Returns true if the last guess was all correct.
    pub fn solved(&self) -> bool {
        matches!(self.inner.last(), Some((_, pattern)) if pattern.is_solved())
    }

    /// Formats the attempts one guess per line.
    pub fn display<'a>(&'a self, dict: &'a Dictionary) -> impl Display + 'a {
        AttemptsDisplay {
            attempts: self,
            dict,
        }
    }
}

struct AttemptsDisplay<'a> {
    attempts: &'a Attempts,
    dict: &'a Dictionary,
}

impl Display for AttemptsDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some((last, rest)) = self.attempts.inner.split_last() {
            for (word, pattern) in rest {
                writeln!(f, "{} {}", self.dict.text(*word), pattern)?;
            }
            write!(f, "{} {}", self.dict.text(last.0), last.1)?;
        }
        Ok(())
    }
}

/// Trait defining a Wordle strategy.
///
/// The [test harness](crate::Harness) uses [`Display`] to format the name of
/// the strategy, so do not use linebreaks.
pub trait Strategy: Display + Debug {
    /// Tries to solve the given [`Puzzle`] and returns the attempts made.
    ///
    /// Create the returned [`Attempts`] with [`Puzzle::attempts()`] and pass
    /// it to every [`Puzzle::check()`].
    fn solve(&self, puzzle: &Puzzle<'_>) -> Attempts;

    /// Provides a version for this strategy.
    fn version(&self) -> &'static str;

    /// The grading rules this strategy assumes. Puzzles handed to it are
    /// graded the same way.
    fn scoring(&self) -> Scoring;

    /// The most guesses this strategy may make on one puzzle.
    fn max_turns(&self) -> usize;
}
