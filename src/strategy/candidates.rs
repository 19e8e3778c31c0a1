use std::collections::BTreeSet;

use crate::{
    feedback::Pattern,
    index::PartitionIndex,
    words::{Dictionary, Word},
};

/// The answers still consistent with every piece of feedback in one game.
///
/// Starts as the whole answer list and only ever shrinks. Pruning produces a
/// new set, so earlier sets stay valid for anyone still holding them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Candidates {
    words: BTreeSet<Word>,
}

impl Candidates {
    /// Every answer in `dict`.
    pub fn all(dict: &Dictionary) -> Self {
        dict.answers().collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: Word) -> bool {
        self.words.contains(&word)
    }

    /// The candidates in dictionary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Word> + Clone + '_ {
        self.words.iter().copied()
    }

    /// The remaining word, if exactly one is left.
    pub fn only(&self) -> Option<Word> {
        if self.words.len() == 1 {
            self.words.iter().next().copied()
        } else {
            None
        }
    }

    /// Counts the words of a sorted `bucket` that are still candidates.
    pub fn count_in(&self, bucket: &[Word]) -> usize {
        if bucket.len() <= self.words.len() {
            bucket.iter().filter(|&w| self.words.contains(w)).count()
        } else {
            self.words
                .iter()
                .filter(|&w| bucket.binary_search(w).is_ok())
                .count()
        }
    }

    /// Keeps the candidates that would have produced `pattern` for `guess`.
    pub fn prune(&self, index: &PartitionIndex, guess: Word, pattern: Pattern) -> Candidates {
        let bucket = index.lookup(guess, pattern);
        if bucket.len() <= self.words.len() {
            bucket.iter().copied().filter(|&w| self.contains(w)).collect()
        } else {
            self.iter()
                .filter(|w| bucket.binary_search(w).is_ok())
                .collect()
        }
    }
}

impl FromIterator<Word> for Candidates {
    fn from_iter<T: IntoIterator<Item = Word>>(iter: T) -> Self {
        Candidates {
            words: iter.into_iter().collect(),
        }
    }
}
