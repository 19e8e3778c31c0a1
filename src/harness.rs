//! The test harness for running Wordle strategies over many puzzles.

use std::ops::Deref;

#[cfg(feature = "fancy")]
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::{rngs::StdRng, seq::index::sample, SeedableRng};

use crate::{
    perf::{Perf, Summary},
    strategy::{Attempts, Puzzle, Strategy},
    words::{Dictionary, Word},
    HarnessError, Result,
};

/// A test harness that can run many strategies on many puzzles.
///
/// Create one with [`new()`](Harness::new()) and configure it with the
/// builder methods, which consume the existing [`Harness`] and return a new
/// one. Each puzzle is played by every strategy before moving on to the next.
///
/// # Examples
///
/// ```rust
/// # use wordle_solver::{Dictionary, Harness, Solver, SolverConfig};
/// let dict = Dictionary::new(["crane", "slate", "trace", "crate", "stare"])?;
/// let solver = Solver::new(&dict, SolverConfig::new());
///
/// let record = Harness::new(&dict)
///     .quiet()
///     .add_strategy(Box::new(solver))
///     .test_num(3)
///     .seed(7)
///     .run()?;
///
/// assert_eq!(record[0].num_tried(), 3);
/// # Ok::<_, wordle_solver::WordleError>(())
/// ```
#[derive(Debug)]
pub struct Harness<'d> {
    dict: &'d Dictionary,
    strategies: Vec<Box<dyn Strategy + 'd>>,
    #[cfg_attr(not(feature = "fancy"), allow(dead_code))]
    verbose: bool,
    num_games: Option<usize>,
    seed: Option<u64>,
    baseline: Option<usize>,
    baseline_conflict: bool,
}

impl<'d> Harness<'d> {
    /// Creates a new test harness over `dict` with default configuration.
    ///
    /// Defaults:
    /// 1. tests no strategies
    /// 2. quiet mode
    /// 3. runs each strategy on 100 answers chosen at random
    /// 4. seeds the random choice from the operating system
    /// 5. does not compare against a baseline
    pub fn new(dict: &'d Dictionary) -> Self {
        Harness {
            dict,
            strategies: Vec::new(),
            verbose: false,
            num_games: Some(100),
            seed: None,
            baseline: None,
            baseline_conflict: false,
        }
    }

    /// Shows a progress bar while testing.
    pub fn verbose(self) -> Self {
        Harness {
            verbose: true,
            ..self
        }
    }

    /// Makes the harness silent while testing.
    pub fn quiet(self) -> Self {
        Harness {
            verbose: false,
            ..self
        }
    }

    pub fn add_strategy(self, strat: Box<dyn Strategy + 'd>) -> Self {
        let mut strategies = self.strategies;
        strategies.push(strat);
        Harness { strategies, ..self }
    }

    pub fn add_strategies(self, strats: Vec<Box<dyn Strategy + 'd>>) -> Self {
        let mut strategies = self.strategies;
        strategies.extend(strats);
        Harness { strategies, ..self }
    }

    /// Adds a strategy and sets it as the baseline for comparisons.
    pub fn add_baseline(self, strat: Box<dyn Strategy + 'd>) -> Self {
        self.add_strategy(strat).and_baseline()
    }

    /// Sets the most recently added strategy as the baseline for
    /// comparisons.
    ///
    /// Setting a second baseline makes [`run()`](Harness::run()) fail with
    /// [`HarnessError::BaselineAlreadySet`].
    pub fn and_baseline(self) -> Self {
        let baseline_conflict = self.baseline_conflict || self.baseline.is_some();
        Harness {
            baseline: self.strategies.len().checked_sub(1),
            baseline_conflict,
            ..self
        }
    }

    /// Tests each strategy on every possible answer, in dictionary order.
    pub fn test_all(self) -> Self {
        Harness {
            num_games: None,
            ..self
        }
    }

    /// Tests each strategy on `n` distinct answers chosen at random.
    ///
    /// `n` is capped at the number of answers.
    pub fn test_num(self, n: usize) -> Self {
        Harness {
            num_games: Some(n.min(self.dict.num_answers())),
            ..self
        }
    }

    /// Fixes the seed used to pick random answers, making runs repeatable.
    pub fn seed(self, seed: u64) -> Self {
        Harness {
            seed: Some(seed),
            ..self
        }
    }

    /// The answers this harness will test, in the order it will test them.
    pub fn puzzles(&self) -> Vec<Word> {
        match self.num_games {
            None => self.dict.answers().collect(),
            Some(n) => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let total = self.dict.num_answers();
                sample(&mut rng, total, n.min(total))
                    .iter()
                    .map(Word::from_index)
                    .collect()
            }
        }
    }

    /// Runs the harness and produces performances for each strategy.
    ///
    /// The [`Perf`]s are in the same order as the strategies were added.
    pub fn run(&self) -> Result<Record> {
        if self.strategies.is_empty() {
            return Err(HarnessError::NoStrategiesAdded.into());
        }
        if self.baseline_conflict {
            return Err(HarnessError::BaselineAlreadySet.into());
        }

        let puzzles = self.puzzles();
        info!(
            "running {} strateg{} on {} puzzles",
            self.strategies.len(),
            if self.strategies.len() == 1 { "y" } else { "ies" },
            puzzles.len()
        );

        let mut perfs: Vec<Perf> = self
            .strategies
            .iter()
            .map(|strat| Perf::new(strat.as_ref()))
            .collect();

        #[cfg(feature = "fancy")]
        let bar = self.progress_bar(puzzles.len());

        for &answer in &puzzles {
            for (strategy, perf) in self.strategies.iter().zip(perfs.iter_mut()) {
                let attempts = self.run_one(strategy.as_ref(), answer)?;
                perf.tries.push((answer, attempts));
            }
            #[cfg(feature = "fancy")]
            bar.inc(1);
        }

        #[cfg(feature = "fancy")]
        bar.finish_and_clear();

        Ok(Record::new(perfs, self.baseline))
    }

    fn run_one(&self, strategy: &dyn Strategy, answer: Word) -> Result<Attempts> {
        let puzzle = Puzzle::new(self.dict, answer, strategy.scoring(), strategy.max_turns());
        let attempts = strategy.solve(&puzzle);

        if attempts.is_empty() {
            return Err(HarnessError::StrategyFailed(strategy.to_string()).into());
        }
        if !attempts.solved() {
            warn!(
                "{} missed {} after {} guesses",
                strategy,
                self.dict.display(answer),
                attempts.len()
            );
        }
        Ok(attempts)
    }

    #[cfg(feature = "fancy")]
    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.verbose {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{elapsed_precise} [{bar:40}] {pos}/{len} ({eta})")
                .progress_chars("=> "),
        );
        bar
    }
}

/// The results of one harness run.
#[derive(Debug, Clone, Default)]
pub struct Record {
    perfs: Vec<Perf>,
    baseline: Option<usize>,
}

impl Deref for Record {
    type Target = [Perf];

    fn deref(&self) -> &Self::Target {
        &self.perfs
    }
}

impl Record {
    fn new(perfs: Vec<Perf>, baseline: impl Into<Option<usize>>) -> Self {
        Self {
            perfs,
            baseline: baseline.into(),
        }
    }

    /// The performance of the baseline strategy, if one was set.
    pub fn baseline(&self) -> Option<&Perf> {
        self.baseline.and_then(|n| self.perfs.get(n))
    }

    pub fn summaries(&self) -> Vec<Summary<'_>> {
        self.perfs.iter().map(Perf::to_summary).collect()
    }

    /// Serializes every summary as a JSON array.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summaries())?)
    }

    /// Prints every summary with its histogram, compared against the
    /// baseline when there is one.
    pub fn print_report(&self) -> Result<()> {
        let baseline = self.baseline().map(Perf::to_summary);

        for summary in self.summaries() {
            let options = Summary::print_options().histogram(true);
            let options = match &baseline {
                Some(b) if *b != summary => options.compare(b),
                _ => options,
            };
            summary.print(options)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{mock::Mock, Solver, SolverConfig, WordleError};

    const WORDS: [&str; 6] = ["nerds", "tithe", "doubt", "point", "parka", "sword"];

    #[test]
    fn tests_every_answer() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let record = Harness::new(&dict)
            .add_strategy(Box::new(Mock::new(None)))
            .test_all()
            .run()?;

        assert_eq!(record.len(), 1);
        assert_eq!(record[0].num_tried(), 6);
        assert_eq!(record[0].num_solved(), 6);
        let tried: Vec<_> = record[0].tries().iter().map(|(w, _)| *w).collect();
        assert_eq!(tried, dict.answers().collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn seeded_samples_repeat() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let harness = Harness::new(&dict).test_num(4).seed(2022);
        let first = harness.puzzles();

        assert_eq!(first.len(), 4);
        assert_eq!(first, harness.puzzles());
        let mut distinct = first.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 4);
        Ok(())
    }

    #[test]
    fn sample_size_is_capped() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let harness = Harness::new(&dict).test_num(1000).seed(1);
        assert_eq!(harness.puzzles().len(), WORDS.len());
        Ok(())
    }

    #[test]
    fn misses_are_recorded() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(Mock::new(vec!["nerds", "tithe"])),
            Box::new(Mock::new(None)),
        ];
        let record = Harness::new(&dict).add_strategies(strategies).test_all().run()?;

        assert_eq!(record[0].num_solved(), 2);
        assert_eq!(record[1].num_solved(), 6);
        assert_eq!(record[0].to_summary().num_missed(), 4);
        Ok(())
    }

    #[test]
    fn needs_a_strategy() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        assert!(matches!(
            Harness::new(&dict).run(),
            Err(WordleError::Harness {
                kind: HarnessError::NoStrategiesAdded
            })
        ));
        Ok(())
    }

    #[test]
    fn one_baseline_only() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let harness = Harness::new(&dict)
            .add_baseline(Box::new(Mock::new(None)))
            .add_baseline(Box::new(Mock::new(vec!["sword"])));

        assert!(matches!(
            harness.run(),
            Err(WordleError::Harness {
                kind: HarnessError::BaselineAlreadySet
            })
        ));
        Ok(())
    }

    #[test]
    fn empty_attempts_fail_the_run() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let harness = Harness::new(&dict)
            .add_strategy(Box::new(Mock::new(Vec::new())))
            .test_all();

        assert!(matches!(
            harness.run(),
            Err(WordleError::Harness {
                kind: HarnessError::StrategyFailed(_)
            })
        ));
        Ok(())
    }

    #[test]
    fn solver_against_baseline() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let solver = Solver::new(&dict, SolverConfig::new());
        let record = Harness::new(&dict)
            .add_baseline(Box::new(Mock::new(None)))
            .add_strategy(Box::new(solver))
            .test_all()
            .run()?;

        assert_eq!(record.baseline(), Some(&record[0]));
        assert_eq!(record[1].num_solved(), 6);
        let summaries = record.summaries();
        assert!(summaries[1].mean() <= summaries[0].mean());
        Ok(())
    }
}
