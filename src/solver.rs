//! The candidate-minimizing solver.
//!
//! Every turn the solver scores each word in its guess pool by how many
//! candidates it would leave behind, summed over every candidate that could be
//! the answer, and plays the lowest-scoring word. A guess that splits the
//! candidates into singletons scores `n`; a guess that tells them all apart
//! from nothing scores `n²`.

use std::{cell::Cell, collections::HashMap, fmt::Display, rc::Rc, time::Instant};

use either::Either;
use log::{debug, info, trace, warn};

use crate::{
    cache::ResultCache,
    feedback::{Pattern, Scoring},
    index::PartitionIndex,
    strategy::{Attempts, Candidates, Puzzle, Strategy},
    words::{Dictionary, Word},
    PuzzleError, Result,
};

/// The words a solver may pick its guesses from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(crate = "serde_crate")
)]
pub enum GuessPool {
    /// Every allowed guess, including words already ruled out.
    Dictionary,

    /// Only the words that could still be the answer.
    Candidates,
}

impl Display for GuessPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuessPool::Dictionary => write!(f, "dictionary"),
            GuessPool::Candidates => write!(f, "candidates"),
        }
    }
}

/// Configuration for a [`Solver`].
///
/// Like the [`Harness`](crate::Harness), the configuration methods consume
/// the existing value and return a new one.
///
/// # Examples
///
/// ```rust
/// # use wordle_solver::{GuessPool, Scoring, SolverConfig};
/// let config = SolverConfig::new()
///     .scoring(Scoring::Lenient)
///     .pool(GuessPool::Candidates)
///     .max_turns(6);
/// assert_eq!(config.max_turns, 6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SolverConfig {
    pub scoring: Scoring,
    pub pool: GuessPool,
    pub max_turns: usize,
    pub final_turn_candidates: bool,
    pub opening: Option<Word>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            scoring: Scoring::Standard,
            pool: GuessPool::Dictionary,
            max_turns: 32,
            final_turn_candidates: true,
            opening: None,
        }
    }
}

impl SolverConfig {
    /// Creates a new configuration with default values.
    ///
    /// Defaults:
    /// 1. standard scoring
    /// 2. guesses may be any word in the dictionary
    /// 3. at most 32 guesses per puzzle
    /// 4. the final allowed guess is always a candidate
    /// 5. the opening guess is computed on first use
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoring(self, scoring: Scoring) -> Self {
        SolverConfig { scoring, ..self }
    }

    pub fn pool(self, pool: GuessPool) -> Self {
        SolverConfig { pool, ..self }
    }

    /// Sets the turn cap. Values below one are raised to one.
    pub fn max_turns(self, max_turns: usize) -> Self {
        SolverConfig {
            max_turns: max_turns.max(1),
            ..self
        }
    }

    /// Controls whether the last allowed guess is restricted to candidates.
    pub fn final_turn_candidates(self, final_turn_candidates: bool) -> Self {
        SolverConfig {
            final_turn_candidates,
            ..self
        }
    }

    /// Uses a precomputed opening guess instead of computing one.
    pub fn opening(self, opening: impl Into<Option<Word>>) -> Self {
        SolverConfig {
            opening: opening.into(),
            ..self
        }
    }
}

/// A guess and how many candidates it fails to eliminate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scored {
    pub word: Word,
    /// The number of candidates left standing, summed over every candidate
    /// as the answer. Lower is better.
    pub score: u64,
    /// Whether the guess could itself be the answer.
    pub is_candidate: bool,
}

impl Scored {
    /// A later guess beats the current best if it scores lower, or if it
    /// scores the same and could be the answer.
    fn beats(&self, other: &Scored) -> bool {
        self.score < other.score || (self.score == other.score && self.is_candidate)
    }
}

#[derive(Debug)]
struct Tables {
    cache: ResultCache,
    index: PartitionIndex,
}

/// A Wordle solver over one dictionary.
///
/// Construction grades every guess against every answer once. Solvers
/// derived with [`with_config()`](Solver::with_config()) share those tables
/// when they use the same [`Scoring`].
#[derive(Debug)]
pub struct Solver<'d> {
    dict: &'d Dictionary,
    tables: Rc<Tables>,
    config: SolverConfig,
    opening: Cell<Option<Word>>,
}

impl<'d> Solver<'d> {
    /// Builds the result cache and partition index for `dict`.
    pub fn new(dict: &'d Dictionary, config: SolverConfig) -> Self {
        let cache = ResultCache::new(dict, config.scoring);
        let index = PartitionIndex::build(dict, &cache);
        Solver {
            dict,
            tables: Rc::new(Tables { cache, index }),
            opening: Cell::new(config.opening),
            config,
        }
    }

    /// A solver with a different configuration over the same dictionary.
    pub fn with_config(&self, config: SolverConfig) -> Self {
        if config.scoring != self.config.scoring {
            return Self::new(self.dict, config);
        }
        // the opening depends on the pool, so only carry it over if it's unchanged
        let opening = match config.opening {
            Some(word) => Some(word),
            None if config.pool == self.config.pool => self.opening.get(),
            None => None,
        };
        Solver {
            dict: self.dict,
            tables: Rc::clone(&self.tables),
            opening: Cell::new(opening),
            config,
        }
    }

    pub fn dictionary(&self) -> &'d Dictionary {
        self.dict
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.tables.cache
    }

    pub fn index(&self) -> &PartitionIndex {
        &self.tables.index
    }

    /// Sums, over every candidate as the answer, how many candidates would
    /// survive `guess`.
    pub fn score(&self, guess: Word, candidates: &Candidates) -> u64 {
        let mut survivors: HashMap<Pattern, u64> = HashMap::new();
        let mut total = 0;
        for answer in candidates.iter() {
            let pattern = self.tables.cache.get(self.dict, guess, answer);
            total += *survivors.entry(pattern).or_insert_with(|| {
                candidates.count_in(self.tables.index.lookup(guess, pattern)) as u64
            });
        }
        total
    }

    /// Picks the guess from `pool` that leaves the fewest candidates.
    ///
    /// Ties go to the last candidate in `pool` with that score, or to the
    /// first non-candidate if no candidate ties. When a single candidate
    /// remains it is returned without scoring anything. Returns `None` if there are no
    /// candidates or the pool is empty.
    pub fn select_guess(
        &self,
        pool: impl IntoIterator<Item = Word>,
        candidates: &Candidates,
    ) -> Option<Scored> {
        if let Some(word) = candidates.only() {
            return Some(Scored {
                word,
                score: 1,
                is_candidate: true,
            });
        }
        if candidates.is_empty() {
            return None;
        }

        let mut best: Option<Scored> = None;
        for word in pool {
            let scored = Scored {
                word,
                score: self.score(word, candidates),
                is_candidate: candidates.contains(word),
            };
            trace!("{} scores {}", self.dict.display(word), scored.score);
            best = match best {
                Some(current) if !scored.beats(&current) => Some(current),
                _ => Some(scored),
            };
        }
        best
    }

    /// The `n` best guesses from `pool`, best first, ordered the way
    /// [`select_guess()`](Solver::select_guess()) breaks ties.
    pub fn rank_guesses(
        &self,
        pool: impl IntoIterator<Item = Word>,
        candidates: &Candidates,
        n: usize,
    ) -> Vec<Scored> {
        use itertools::Itertools;

        pool.into_iter()
            .enumerate()
            .map(|(pos, word)| {
                let scored = Scored {
                    word,
                    score: self.score(word, candidates),
                    is_candidate: candidates.contains(word),
                };
                (pos, scored)
            })
            .sorted_by(|(pa, a), (pb, b)| {
                a.score
                    .cmp(&b.score)
                    .then(b.is_candidate.cmp(&a.is_candidate))
                    .then_with(|| if a.is_candidate { pb.cmp(pa) } else { pa.cmp(pb) })
            })
            .map(|(_, scored)| scored)
            .take(n)
            .collect()
    }

    /// The words this solver may guess on `turn` (counting from one).
    pub fn pool<'a>(
        &'a self,
        turn: usize,
        candidates: &'a Candidates,
    ) -> impl Iterator<Item = Word> + 'a {
        if self.candidates_only(turn) {
            Either::Left(candidates.iter())
        } else {
            Either::Right(self.dict.guesses())
        }
    }

    fn candidates_only(&self, turn: usize) -> bool {
        self.config.pool == GuessPool::Candidates
            || (turn >= self.config.max_turns && self.config.final_turn_candidates)
    }

    /// The best first guess against the whole answer list.
    ///
    /// Computed on first use unless the configuration supplied one. A
    /// supplied opening that can never be the answer is ignored when the
    /// first turn may only guess candidates.
    pub fn best_opening(&self) -> Word {
        if let Some(word) = self.opening.get() {
            if !self.candidates_only(1) || self.dict.is_answer(word) {
                return word;
            }
            warn!(
                "opening {} is not a possible answer, recomputing",
                self.dict.display(word)
            );
        }

        let start = Instant::now();
        let candidates = Candidates::all(self.dict);
        let best = self
            .select_guess(self.pool(1, &candidates), &candidates)
            .map(|s| s.word)
            .unwrap_or_else(|| Word::from_index(0));
        info!(
            "computed opening guess {} in {:.2?}",
            self.dict.display(best),
            start.elapsed()
        );
        self.opening.set(Some(best));
        best
    }

    /// Plays a whole game against `answer` and returns the guesses made.
    ///
    /// Fails with [`PuzzleError::OutOfGuesses`] if the turn cap is reached.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use wordle_solver::{Dictionary, Solver, SolverConfig};
    /// let dict = Dictionary::new(["crane", "slate", "trace"])?;
    /// let solver = Solver::new(&dict, SolverConfig::new());
    ///
    /// let attempts = solver.play(dict.answer("trace")?)?;
    /// assert!(attempts.solved());
    /// assert!(attempts.len() <= 2);
    /// # Ok::<_, wordle_solver::WordleError>(())
    /// ```
    pub fn play(&self, answer: Word) -> Result<Attempts> {
        let puzzle = Puzzle::new(
            self.dict,
            answer,
            self.config.scoring,
            self.config.max_turns,
        );
        let mut attempts = puzzle.attempts();
        self.play_into(&puzzle, &mut attempts)?;
        Ok(attempts)
    }

    fn play_into(&self, puzzle: &Puzzle<'_>, attempts: &mut Attempts) -> Result<()> {
        let mut candidates = Candidates::all(self.dict);

        loop {
            let turn = attempts.len() + 1;
            let guess = if turn == 1 {
                self.best_opening()
            } else {
                match self.select_guess(self.pool(turn, &candidates), &candidates) {
                    Some(scored) => scored.word,
                    None => {
                        return Err(PuzzleError::NoCandidates(
                            self.dict.text(attempts.inner()[turn - 2].0).to_string(),
                        )
                        .into())
                    }
                }
            };

            let (pattern, correct) = puzzle.check(guess, attempts)?;
            debug!(
                "guess #{}: {} {} ({} candidates)",
                turn,
                self.dict.display(guess),
                pattern,
                candidates.len()
            );
            if correct {
                return Ok(());
            }

            candidates = candidates.prune(&self.tables.index, guess, pattern);
            if candidates.is_empty() {
                return Err(PuzzleError::NoCandidates(self.dict.text(guess).to_string()).into());
            }
        }
    }
}

impl Strategy for Solver<'_> {
    fn solve(&self, puzzle: &Puzzle<'_>) -> Attempts {
        let mut attempts = puzzle.attempts();
        if let Err(e) = self.play_into(puzzle, &mut attempts) {
            warn!("{} gave up: {}", self, e);
        }
        attempts
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn scoring(&self) -> Scoring {
        self.config.scoring
    }

    fn max_turns(&self) -> usize {
        self.config.max_turns
    }
}

impl Display for Solver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "wordle_solver::Solver (pool: {}, scoring: {})",
            self.config.pool, self.config.scoring
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::WordleError;

    const WORDS: [&str; 10] = [
        "crane", "slate", "trace", "crate", "raise", "arise", "stare", "roast", "toast", "beast",
    ];

    #[test]
    fn single_candidate_is_returned_immediately() -> Result<()> {
        let dict = Dictionary::new(["aback", "abase", "abate", "zonal"])?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let aback = dict.word("aback")?;
        let candidates: Candidates = [aback].into_iter().collect();

        let scored = solver.select_guess(dict.guesses(), &candidates).unwrap();
        assert_eq!(scored.word, aback);

        let scored = solver.select_guess(std::iter::empty(), &candidates).unwrap();
        assert_eq!(scored.word, aback);
        Ok(())
    }

    #[test]
    fn no_candidates_selects_nothing() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let solver = Solver::new(&dict, SolverConfig::new());
        assert!(solver
            .select_guess(dict.guesses(), &Candidates::default())
            .is_none());
        Ok(())
    }

    #[test]
    fn scores_are_bounded() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let all = Candidates::all(&dict);
        let n = all.len() as u64;

        for guess in dict.guesses() {
            let score = solver.score(guess, &all);
            assert!(score >= n && score <= n * n, "{}", score);
        }
        Ok(())
    }

    #[test]
    fn perfect_and_useless_guesses() -> Result<()> {
        let dict = Dictionary::with_guesses(["abcde", "fghij", "klmno"], ["abfkz", "qqqqq"])?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let all = Candidates::all(&dict);

        // one letter from each answer tells them all apart
        assert_eq!(solver.score(dict.word("abfkz")?, &all), 3);
        // no shared letters with any answer, so every answer looks the same
        assert_eq!(solver.score(dict.word("qqqqq")?, &all), 9);

        let best = solver.select_guess(dict.guesses(), &all).unwrap();
        assert_eq!(best.score, 3);
        Ok(())
    }

    #[test]
    fn ties_prefer_candidates() -> Result<()> {
        // with two candidates, anything that tells them apart scores 2
        let dict = Dictionary::with_guesses(["abcde", "fghij"], ["azzzz"])?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let all = Candidates::all(&dict);
        let azzzz = dict.word("azzzz")?;

        assert_eq!(solver.score(azzzz, &all), 2);
        assert_eq!(solver.score(dict.word("abcde")?, &all), 2);

        // the outsider comes first, but loses the tie
        let pool = [azzzz, dict.word("fghij")?, dict.word("abcde")?];
        let best = solver.select_guess(pool, &all).unwrap();
        assert_eq!(best.word, dict.word("abcde")?);
        assert!(best.is_candidate);

        // an outsider alone never displaces an earlier equal outsider
        let other = Dictionary::with_guesses(["abcde", "fghij"], ["azzzz", "fzzzz"])?;
        let solver = Solver::new(&other, SolverConfig::new());
        let all = Candidates::all(&other);
        let pool = [other.word("azzzz")?, other.word("fzzzz")?];
        let best = solver.select_guess(pool, &all).unwrap();
        assert_eq!(best.word, other.word("azzzz")?);
        Ok(())
    }

    #[test]
    fn last_tied_candidate_wins() -> Result<()> {
        let dict = Dictionary::new(["abcde", "fghij"])?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let all = Candidates::all(&dict);

        assert_eq!(solver.score(dict.word("abcde")?, &all), 2);
        assert_eq!(solver.score(dict.word("fghij")?, &all), 2);

        let best = solver.select_guess(dict.guesses(), &all).unwrap();
        assert_eq!(best.word, dict.word("fghij")?);
        assert_eq!(solver.best_opening(), dict.word("fghij")?);

        let ranked = solver.rank_guesses(dict.guesses(), &all, 2);
        assert_eq!(ranked[0].word, dict.word("fghij")?);
        assert_eq!(ranked[1].word, dict.word("abcde")?);
        Ok(())
    }

    #[test]
    fn supplied_opening_respects_candidate_turns() -> Result<()> {
        let dict = Dictionary::with_guesses(["abcde", "fghij", "klmno"], ["afkzz"])?;
        let afkzz = dict.word("afkzz")?;

        let free = Solver::new(&dict, SolverConfig::new().opening(afkzz));
        assert_eq!(free.best_opening(), afkzz);

        let single = Solver::new(&dict, SolverConfig::new().opening(afkzz).max_turns(1));
        let opening = single.best_opening();
        assert!(dict.is_answer(opening));
        assert!(single.play(opening)?.solved());

        let narrow = free.with_config(
            SolverConfig::new()
                .pool(GuessPool::Candidates)
                .opening(afkzz),
        );
        assert!(dict.is_answer(narrow.best_opening()));
        for answer in dict.answers() {
            let attempts = narrow.play(answer)?;
            assert!(attempts.inner().iter().all(|(w, _)| dict.is_answer(*w)));
        }
        Ok(())
    }

    #[test]
    fn rank_matches_select() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let all = Candidates::all(&dict);

        let ranked = solver.rank_guesses(dict.guesses(), &all, 3);
        let best = solver.select_guess(dict.guesses(), &all).unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0], best);
        assert!(ranked.windows(2).all(|w| w[0].score <= w[1].score));
        Ok(())
    }

    #[test]
    fn solves_every_answer() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        for pool in [GuessPool::Dictionary, GuessPool::Candidates] {
            for scoring in [Scoring::Standard, Scoring::Lenient] {
                let config = SolverConfig::new().pool(pool).scoring(scoring);
                let solver = Solver::new(&dict, config);
                for answer in dict.answers() {
                    let attempts = solver.play(answer)?;
                    assert!(attempts.solved());
                    assert_eq!(attempts.inner().last().unwrap().0, answer);
                    assert!(attempts.len() <= dict.num_answers());
                }
            }
        }
        Ok(())
    }

    #[test]
    fn trace_after_slate() -> Result<()> {
        let dict = Dictionary::new(["crane", "slate", "trace"])?;
        let solver = Solver::new(&dict, SolverConfig::new().opening(dict.word("slate")?));

        let attempts = solver.play(dict.answer("trace")?)?;
        let guesses: Vec<_> = attempts.inner().iter().map(|(w, _)| dict.text(*w)).collect();
        assert_eq!(guesses, ["SLATE", "TRACE"]);
        assert_eq!(attempts.inner()[0].1, Pattern::parse("bbgyg").unwrap());
        Ok(())
    }

    #[test]
    fn turn_cap_is_an_error() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let solver = Solver::new(&dict, SolverConfig::new().max_turns(1));
        let opening = solver.best_opening();
        let other = dict.answers().find(|&w| w != opening).unwrap();

        assert!(matches!(
            solver.play(other),
            Err(WordleError::Puzzle {
                kind: PuzzleError::OutOfGuesses(1)
            })
        ));
        assert!(solver.play(opening)?.solved());
        Ok(())
    }

    #[test]
    fn final_turn_uses_candidates() -> Result<()> {
        let dict = Dictionary::with_guesses(["abcde", "fghij", "klmno"], ["afkzz"])?;
        let solver = Solver::new(&dict, SolverConfig::new().max_turns(3));
        let all = Candidates::all(&dict);

        let everything: Vec<_> = solver.pool(2, &all).collect();
        let last: Vec<_> = solver.pool(3, &all).collect();
        assert_eq!(everything.len(), 4);
        assert_eq!(last, all.iter().collect::<Vec<_>>());

        let relaxed = solver.with_config(solver.config().final_turn_candidates(false));
        assert_eq!(relaxed.pool(3, &all).count(), 4);
        Ok(())
    }

    #[test]
    fn derived_solvers_share_tables() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let narrow = solver.with_config(SolverConfig::new().pool(GuessPool::Candidates));
        let lenient = solver.with_config(SolverConfig::new().scoring(Scoring::Lenient));

        assert!(Rc::ptr_eq(&solver.tables, &narrow.tables));
        assert!(!Rc::ptr_eq(&solver.tables, &lenient.tables));
        assert_eq!(lenient.cache().scoring(), Scoring::Lenient);
        Ok(())
    }

    #[test]
    fn opening_is_memoized() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let first = solver.best_opening();
        assert_eq!(solver.best_opening(), first);

        let all = Candidates::all(&dict);
        let best = solver.select_guess(dict.guesses(), &all).unwrap();
        assert_eq!(first, best.word);
        Ok(())
    }
}
