//! The (guess, pattern) → answers partition index.

use std::{collections::HashMap, time::Instant};

use log::info;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    cache::ResultCache,
    feedback::Pattern,
    words::{Dictionary, Word},
};

/// For every allowed guess, the answers grouped by the pattern they produce.
///
/// Built once per dictionary and read-only afterwards. Each bucket lists its
/// answers in dictionary order.
#[derive(Debug, Clone, Default)]
pub struct PartitionIndex {
    buckets: Vec<HashMap<Pattern, Vec<Word>>>,
}

impl PartitionIndex {
    /// Grades every guess against every answer and groups the answers.
    ///
    /// Every graded pair is also stored in `cache`.
    pub fn build(dict: &Dictionary, cache: &ResultCache) -> Self {
        let start = Instant::now();
        let answers: Vec<Word> = dict.answers().collect();

        let buckets: Vec<_> = grade_rows(dict, cache, &answers)
            .into_iter()
            .map(|(guess, row)| {
                cache.fill_row(guess, &row);
                let mut partition: HashMap<Pattern, Vec<Word>> = HashMap::new();
                for (&answer, pattern) in answers.iter().zip(row) {
                    partition.entry(pattern).or_default().push(answer);
                }
                partition
            })
            .collect();

        info!(
            "built partition index for {} guesses x {} answers in {:.2?}",
            buckets.len(),
            answers.len(),
            start.elapsed()
        );
        PartitionIndex { buckets }
    }

    /// The answers that give `pattern` when `guess` is played.
    ///
    /// Returns an empty slice when no answer produces that pattern.
    pub fn lookup(&self, guess: Word, pattern: Pattern) -> &[Word] {
        self.buckets
            .get(guess.index())
            .and_then(|partition| partition.get(&pattern))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The number of distinct patterns `guess` can produce.
    pub fn num_patterns(&self, guess: Word) -> usize {
        self.buckets.get(guess.index()).map_or(0, HashMap::len)
    }

    /// The number of guesses indexed.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(feature = "parallel")]
fn grade_rows(
    dict: &Dictionary,
    cache: &ResultCache,
    answers: &[Word],
) -> Vec<(Word, Vec<Pattern>)> {
    use crate::feedback::grade;

    let scoring = cache.scoring();
    dict.guesses()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|guess| {
            let row = answers
                .iter()
                .map(|&answer| grade(dict.letters(guess), dict.letters(answer), scoring))
                .collect();
            (guess, row)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn grade_rows(
    dict: &Dictionary,
    cache: &ResultCache,
    answers: &[Word],
) -> Vec<(Word, Vec<Pattern>)> {
    dict.guesses()
        .map(|guess| {
            let row = answers
                .iter()
                .map(|&answer| cache.get(dict, guess, answer))
                .collect();
            (guess, row)
        })
        .collect()
}
