//! Memoized grading of (guess, answer) pairs.

use std::cell::{Cell, RefCell};

use crate::{
    feedback::{grade, Pattern, Scoring},
    words::{Dictionary, Word},
};

const UNKNOWN: u32 = u32::MAX;

/// A lazily filled table of [`Pattern`]s for every guess against every answer.
///
/// Entries are computed on first use and kept for the life of the cache, so
/// the dictionary it was built for must not change. The table uses interior
/// mutability and is deliberately not [`Sync`].
#[derive(Debug)]
pub struct ResultCache {
    scoring: Scoring,
    num_answers: usize,
    word_len: usize,
    table: RefCell<Vec<u32>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl ResultCache {
    /// Creates an empty cache sized for `dict`.
    pub fn new(dict: &Dictionary, scoring: Scoring) -> Self {
        ResultCache {
            scoring,
            num_answers: dict.num_answers(),
            word_len: dict.word_len(),
            table: RefCell::new(vec![UNKNOWN; dict.num_guesses() * dict.num_answers()]),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    fn slot(&self, guess: Word, answer: Word) -> Option<usize> {
        if answer.index() < self.num_answers {
            Some(guess.index() * self.num_answers + answer.index())
        } else {
            None
        }
    }

    /// Returns the pattern `guess` receives against `answer`, grading it on
    /// a miss.
    ///
    /// Pairs whose second word is not a possible answer are graded but never
    /// stored.
    pub fn get(&self, dict: &Dictionary, guess: Word, answer: Word) -> Pattern {
        let slot = match self.slot(guess, answer) {
            Some(slot) => slot,
            None => return grade(dict.letters(guess), dict.letters(answer), self.scoring),
        };

        let code = self.table.borrow()[slot];
        if code != UNKNOWN {
            self.hits.set(self.hits.get() + 1);
            return Pattern::from_code(code, self.word_len);
        }

        self.misses.set(self.misses.get() + 1);
        let pattern = grade(dict.letters(guess), dict.letters(answer), self.scoring);
        self.table.borrow_mut()[slot] = pattern.code();
        pattern
    }

    /// Stores a full row of patterns for `guess`, one per answer in order.
    pub(crate) fn fill_row(&self, guess: Word, row: &[Pattern]) {
        debug_assert_eq!(row.len(), self.num_answers);
        let start = guess.index() * self.num_answers;
        let mut table = self.table.borrow_mut();
        for (slot, pattern) in table[start..start + row.len()].iter_mut().zip(row) {
            *slot = pattern.code();
        }
    }

    /// The number of pairs graded so far.
    pub fn len(&self) -> usize {
        self.table.borrow().iter().filter(|&&c| c != UNKNOWN).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookups answered from the table and lookups that had to grade.
    pub fn hit_rate(&self) -> (u64, u64) {
        (self.hits.get(), self.misses.get())
    }
}
