//! Evaluating and comparing strategies.

use std::{fmt::Display, io::Write, ops::Deref};

#[cfg(feature = "fancy")]
use comfy_table::{Cell, Color, ColumnConstraint, Row, Table, Width};
#[cfg(feature = "fancy")]
use owo_colors::{AnsiColors, OwoColorize, Stream};

#[cfg(any(feature = "fancy", test))]
use crate::words::Dictionary;
use crate::{
    strategy::{Attempts, Strategy},
    words::Word,
    Result, WordleError,
};

/// A record of one strategy's games after a run of the
/// [test harness](crate::Harness).
///
/// Produce a [`Summary`] with [`to_summary()`](Perf::to_summary()) to get
/// the statistics.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Perf {
    pub(crate) tries: Vec<(Word, Attempts)>,
    strategy_name: String,
}

impl Perf {
    pub(crate) fn new(strat: &dyn Strategy) -> Self {
        Perf {
            tries: Vec::new(),
            strategy_name: format!("{} v{}", strat, strat.version()),
        }
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Every puzzle attempted, with the guesses made on it.
    pub fn tries(&self) -> &[(Word, Attempts)] {
        &self.tries
    }

    pub fn num_tried(&self) -> u32 {
        self.tries.len() as u32
    }

    pub fn num_solved(&self) -> u32 {
        self.solved_counts().count() as u32
    }

    /// Guess counts of the solved games, in the order they were played.
    pub fn solved_counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.tries
            .iter()
            .filter(|(_, attempts)| attempts.solved())
            .map(|(_, attempts)| attempts.len() as u32)
    }

    /// Prints a table with the guesses made on every puzzle, failures
    /// highlighted.
    #[cfg(feature = "fancy")]
    pub fn print_table(&self, dict: &Dictionary) {
        let mut table = Table::new();
        if table.is_tty() {
            table.load_preset(comfy_table::presets::UTF8_FULL);
        } else {
            table.set_table_width(80);
        }
        let width = dict.word_len().max(5) as u16 * 2 + 4;
        let columns = (table.get_table_width().unwrap_or(80) / width).max(1) as usize;

        for chunk in self.tries.chunks(columns) {
            let mut row = Row::new();
            for (word, attempts) in chunk {
                let guesses = attempts
                    .inner()
                    .iter()
                    .map(|(_, pattern)| pattern.to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                let mut cell = Cell::new(format!("{}\n{}", dict.display(*word), guesses));
                if !attempts.solved() {
                    cell = cell.bg(Color::Red).fg(Color::Black);
                }
                row.add_cell(cell);
            }
            table.add_row(row);
        }
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(
                dict.word_len() as u16
            ));
            columns
        ]);
        println!("{}", table);
    }

    /// Computes the statistics for this record.
    pub fn to_summary(&self) -> Summary<'_> {
        let mut counts: Vec<u32> = self.solved_counts().collect();
        counts.sort_unstable();

        let mut histogram = Histogram::default();
        for &n in &counts {
            histogram.add(n);
        }

        let (min, median, max) = match (counts.first(), counts.last()) {
            (Some(&min), Some(&max)) => (Some(min), Some(counts[counts.len() / 2]), Some(max)),
            _ => (None, None, None),
        };
        let mean = if counts.is_empty() {
            None
        } else {
            Some(counts.iter().map(|&n| n as f64).sum::<f64>() / counts.len() as f64)
        };

        Summary {
            strategy_name: &self.strategy_name,
            num_tried: self.num_tried(),
            num_solved: counts.len() as u32,
            min,
            median,
            max,
            mean,
            histogram,
        }
    }
}

impl Display for Perf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_summary())
    }
}

/// Guess-count statistics over one strategy's solved games.
///
/// Games cut off by the turn cap count as missed and are left out of every
/// guess statistic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(crate = "serde_crate")
)]
pub struct Summary<'a> {
    strategy_name: &'a str,
    num_tried: u32,
    num_solved: u32,
    min: Option<u32>,
    median: Option<u32>,
    max: Option<u32>,
    mean: Option<f64>,
    histogram: Histogram,
}

impl<'a> Summary<'a> {
    pub fn strategy_name(&self) -> &'a str {
        self.strategy_name
    }

    pub fn num_tried(&self) -> u32 {
        self.num_tried
    }

    pub fn num_solved(&self) -> u32 {
        self.num_solved
    }

    /// This is always at most [`num_tried()`](Self::num_tried()).
    pub fn num_missed(&self) -> u32 {
        self.num_tried - self.num_solved
    }

    pub fn frac_solved(&self) -> f64 {
        if self.num_tried == 0 {
            0.
        } else {
            self.num_solved as f64 / self.num_tried as f64
        }
    }

    pub fn min(&self) -> Option<u32> {
        self.min
    }

    /// The guess count at index `n / 2` of the sorted solved games.
    pub fn median(&self) -> Option<u32> {
        self.median
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Serializes the summary as a single line of JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Compares this summary's guess counts against `baseline`.
    #[cfg(feature = "stats")]
    pub fn compare<'b>(&self, baseline: &Summary<'b>) -> Result<Comparison<'a, 'b>> {
        if self == baseline {
            return Err(WordleError::SelfComparison);
        }
        Comparison::new(self.clone(), baseline.clone(), 0.05)
    }

    /// Writes the summary to stdout, optionally with its histogram and a
    /// comparison against a baseline.
    pub fn print(&self, options: SummaryPrintOptions<'_>) -> Result<()> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", self)?;

        #[cfg(feature = "stats")]
        if let Some(baseline) = &options.compare {
            match self.compare(baseline) {
                Ok(comparison) => write_comparison(&mut stdout, &comparison)?,
                Err(WordleError::SelfComparison) => {}
                Err(WordleError::Stats) => writeln!(
                    stdout,
                    "Not enough solved games to compare with {}",
                    baseline.strategy_name()
                )?,
                Err(e) => return Err(e),
            }
        }

        if options.histogram && self.num_solved > 0 {
            write!(stdout, "{}", self.histogram)?;
        }
        Ok(())
    }

    pub fn print_options() -> SummaryPrintOptions<'a> {
        SummaryPrintOptions::default()
    }
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:-^80}", format!(" {} ", self.strategy_name))?;
        writeln!(
            f,
            "Ran {} words, solved {} ({:.1}%), missed {}",
            self.num_tried,
            self.num_solved,
            self.frac_solved() * 100.,
            self.num_missed()
        )?;

        match (self.min, self.median, self.max, self.mean) {
            (Some(min), Some(median), Some(max), Some(mean)) => writeln!(
                f,
                "Guesses: min {}, median {}, max {}, mean {:.3}",
                min, median, max, mean
            ),
            _ => writeln!(f, "No puzzles were solved"),
        }
    }
}

#[cfg(feature = "stats")]
fn write_comparison(out: &mut impl Write, comparison: &Comparison<'_, '_>) -> Result<()> {
    let diff = comparison.mean_diff();
    let verdict = if comparison.is_significant() {
        "a sig. diff."
    } else {
        "not a sig. diff."
    };

    #[cfg(feature = "fancy")]
    writeln!(
        out,
        "Mean {:+.3} vs. {} (p = {:.4}), {}",
        diff.if_supports_color(Stream::Stdout, |text| {
            if diff.is_sign_negative() {
                text.color(AnsiColors::Green)
            } else {
                text.color(AnsiColors::Red)
            }
        }),
        comparison.baseline.strategy_name(),
        comparison.p_value(),
        verdict.if_supports_color(Stream::Stdout, |text| text.bold())
    )?;

    #[cfg(not(feature = "fancy"))]
    writeln!(
        out,
        "Mean {:+.3} vs. {} (p = {:.4}), {}",
        diff,
        comparison.baseline.strategy_name(),
        comparison.p_value(),
        verdict
    )?;

    Ok(())
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SummaryPrintOptions<'a> {
    #[cfg_attr(not(feature = "stats"), allow(dead_code))]
    compare: Option<Summary<'a>>,
    histogram: bool,
}

impl<'a> SummaryPrintOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compare(self, baseline: &Summary<'a>) -> Self {
        Self {
            compare: Some(baseline.clone()),
            ..self
        }
    }

    pub fn histogram(self, histogram: bool) -> Self {
        Self { histogram, ..self }
    }
}

/// A mean guess-count comparison between two summaries.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct Comparison<'a, 'b> {
    this: Summary<'a>,
    baseline: Summary<'b>,
    test: crate::stats::WelchsT<f64>,
}

#[cfg(feature = "stats")]
impl<'a, 'b> Comparison<'a, 'b> {
    fn new(this: Summary<'a>, baseline: Summary<'b>, alpha: f64) -> Result<Self> {
        use crate::stats::{Tails, WelchsT};

        let test = WelchsT::two_sample(
            this.histogram.samples(),
            baseline.histogram.samples(),
            alpha,
            Tails::Two,
        )?;
        Ok(Comparison {
            this,
            baseline,
            test,
        })
    }

    /// How many more guesses this strategy needs on average. Negative is
    /// better.
    pub fn mean_diff(&self) -> f64 {
        self.this.mean.unwrap_or(0.) - self.baseline.mean.unwrap_or(0.)
    }

    pub fn p_value(&self) -> f64 {
        self.test.p
    }

    /// Welch's t statistic; negative when this strategy needs fewer guesses.
    pub fn t_statistic(&self) -> f64 {
        self.test.t
    }

    pub fn degrees_of_freedom(&self) -> f64 {
        self.test.df
    }

    pub fn is_significant(&self) -> bool {
        self.test.is_significant()
    }
}

/// Solved games bucketed by guess count; bin `i` holds games solved in
/// `i + 1` guesses.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(crate = "serde_crate")
)]
pub struct Histogram {
    bins: Vec<u32>,
}

impl Histogram {
    fn add(&mut self, guesses: u32) {
        let bin = guesses.max(1) as usize - 1;
        if self.bins.len() <= bin {
            self.bins.resize(bin + 1, 0);
        }
        self.bins[bin] += 1;
    }

    /// One value per solved game, for statistics.
    #[cfg_attr(not(feature = "stats"), allow(dead_code))]
    fn samples(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        self.bins
            .iter()
            .enumerate()
            .flat_map(|(i, &n)| std::iter::repeat((i + 1) as f64).take(n as usize))
    }
}

impl Deref for Histogram {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.bins
    }
}

impl Display for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        let label = self.bins.len().to_string().len();
        let digits = max.to_string().len();
        let per_mark = (max as f32 / (80 - label - digits - 5) as f32).max(1.0);

        for (i, &bin) in self.bins.iter().enumerate() {
            let marks = (bin as f32 / per_mark).floor() as usize;
            writeln!(
                f,
                "{:>label$} |{:■>marks$} ({})",
                i + 1,
                "",
                bin,
                label = label,
                marks = marks
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{mock::Mock, strategy::Puzzle, Scoring};

    const WORDS: [&str; 6] = ["nerds", "tithe", "doubt", "point", "parka", "sword"];

    fn record(dict: &Dictionary, answers: &[&str], max_turns: usize) -> Result<Perf> {
        let mock = Mock::new(None);
        let mut perf = Perf::new(&mock);
        for answer in answers {
            let word = dict.answer(answer)?;
            let puzzle = Puzzle::new(dict, word, Scoring::Standard, max_turns);
            perf.tries.push((word, mock.solve(&puzzle)));
        }
        Ok(perf)
    }

    #[test]
    fn summary_statistics() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        // the mock guesses in list order, so the answer's position is its count
        let perf = record(&dict, &["nerds", "doubt", "parka", "sword"], 6)?;
        let summary = perf.to_summary();

        assert_eq!(summary.num_tried(), 4);
        assert_eq!(summary.num_solved(), 4);
        assert_eq!(summary.min(), Some(1));
        assert_eq!(summary.median(), Some(5));
        assert_eq!(summary.max(), Some(6));
        assert_eq!(summary.mean(), Some(3.75));
        assert_eq!(&summary.histogram()[..], [1, 0, 1, 0, 1, 1]);
        Ok(())
    }

    #[test]
    fn capped_games_are_missed() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let perf = record(&dict, &["tithe", "point", "sword"], 3)?;
        let summary = perf.to_summary();

        assert_eq!(summary.num_solved(), 1);
        assert_eq!(summary.num_missed(), 2);
        assert_eq!(summary.mean(), Some(2.));
        assert_eq!(summary.median(), Some(2));
        Ok(())
    }

    #[test]
    fn nothing_solved() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let perf = record(&dict, &["sword"], 2)?;
        let summary = perf.to_summary();

        assert_eq!(summary.num_solved(), 0);
        assert_eq!(summary.mean(), None);
        assert!(summary.to_string().contains("No puzzles were solved"));
        Ok(())
    }

    #[test]
    fn histogram_lines_fit() {
        let mut histogram = Histogram::default();
        for n in 1..=12 {
            for _ in 0..(n * 1000) {
                histogram.add(n);
            }
        }
        let printed = histogram.to_string();
        assert_eq!(printed.lines().count(), 12);
        assert!(printed.lines().all(|l| l.chars().count() <= 80));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_summary() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let perf = record(&dict, &["nerds", "tithe"], 6)?;
        let json: serde_json::Value = serde_json::from_str(&perf.to_summary().to_json()?)?;

        assert_eq!(json["num_solved"], 2);
        assert_eq!(json["median"], 2);
        assert_eq!(json["histogram"]["bins"], serde_json::json!([1, 1]));
        Ok(())
    }

    #[cfg(feature = "stats")]
    #[test]
    fn compares_against_baseline() -> Result<()> {
        let dict = Dictionary::new(WORDS)?;
        let fast = record(&dict, &["nerds", "tithe", "nerds", "tithe", "nerds"], 6)?;
        let mut slow = record(&dict, &["parka", "sword", "parka", "sword", "sword"], 6)?;
        slow.strategy_name = "slow".to_string();

        let (fast, slow) = (fast.to_summary(), slow.to_summary());
        let comparison = fast.compare(&slow)?;
        assert!(comparison.mean_diff() < 0.);
        assert!(comparison.t_statistic() < 0.);
        assert!(comparison.degrees_of_freedom() > 0.);
        assert!(comparison.is_significant());

        assert!(matches!(fast.compare(&fast), Err(WordleError::SelfComparison)));
        Ok(())
    }
}
