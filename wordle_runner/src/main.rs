use std::{error::Error, path::PathBuf};

use clap::{ArgEnum, Parser, Subcommand};
use log::{debug, error, info, warn};
use wordle_solver::{
    opening::{OpeningCache, DEFAULT_PATH},
    Dictionary, GuessPool, Harness, Scoring, Solver, SolverConfig,
};

/// Solves Wordle by always guessing the word that leaves the fewest
/// candidates behind.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// File with one possible answer per line.
    #[clap(long, parse(from_os_str))]
    answers: PathBuf,

    /// File with extra words that may be guessed but are never answers.
    #[clap(long, parse(from_os_str))]
    guesses: Option<PathBuf>,

    /// Where the best opening guess is cached between runs.
    ///
    /// Delete the file after changing the word lists.
    #[clap(long, parse(from_os_str), default_value = DEFAULT_PATH)]
    opening_cache: PathBuf,

    /// Mark every guessed letter that appears anywhere in the answer, ignoring
    /// how many times it appears.
    #[clap(long)]
    lenient: bool,

    /// Which words the solver may guess.
    #[clap(long, arg_enum, default_value = "dictionary")]
    pool: Pool,

    /// The most guesses allowed per puzzle.
    #[clap(long, default_value = "32")]
    max_turns: usize,

    /// The number of random answers to play.
    ///
    /// If not passed, every answer is played.
    #[clap(short, long)]
    games: Option<usize>,

    /// Seed for choosing random answers.
    #[clap(long)]
    seed: Option<u64>,

    /// Also run the other guess pool and compare against it.
    #[clap(long)]
    compare: bool,

    /// Print the summaries as JSON instead of text.
    #[clap(long)]
    json: bool,

    /// Print the feedback for every puzzle played.
    #[clap(long)]
    table: bool,

    /// Log every guess.
    #[clap(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[clap(short, long)]
    quiet: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a single answer and show each guess.
    Play {
        /// The hidden answer.
        word: String,
    },
}

#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Pool {
    /// Any word in the dictionary.
    Dictionary,

    /// Only words that could still be the answer.
    Candidates,
}

impl From<Pool> for GuessPool {
    fn from(pool: Pool) -> Self {
        match pool {
            Pool::Dictionary => GuessPool::Dictionary,
            Pool::Candidates => GuessPool::Candidates,
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = match (args.verbose, args.quiet) {
        (true, _) => "debug",
        (_, true) => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(args) {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> wordle_solver::Result<()> {
    let dict = Dictionary::load(&args.answers, args.guesses.as_deref())?;
    info!(
        "loaded {} answers and {} guesses of length {}",
        dict.num_answers(),
        dict.num_guesses(),
        dict.word_len()
    );

    let cache = OpeningCache::new(&args.opening_cache);
    let cached = cache.load(&dict);
    let config = SolverConfig::new()
        .scoring(if args.lenient {
            Scoring::Lenient
        } else {
            Scoring::Standard
        })
        .pool(args.pool.into())
        .max_turns(args.max_turns)
        .opening(cached);

    let solver = Solver::new(&dict, config);
    let opening = solver.best_opening();
    if cached != Some(opening) {
        if let Err(e) = cache.store(&dict, opening) {
            warn!("could not write {}: {}", cache.path().display(), e);
        }
    }

    if let Some(Command::Play { word }) = &args.command {
        let answer = dict.answer(word)?;
        let attempts = solver.play(answer)?;
        let (hits, misses) = solver.cache().hit_rate();
        debug!("result cache: {} hits, {} misses", hits, misses);
        println!("{}", attempts.display(&dict));
        println!("Solved {} in {} guesses", dict.display(answer), attempts.len());
        return Ok(());
    }

    let mut harness = Harness::new(&dict);
    if args.compare {
        let other = match args.pool {
            Pool::Dictionary => GuessPool::Candidates,
            Pool::Candidates => GuessPool::Dictionary,
        };
        let baseline = solver.with_config(config.pool(other).opening(None));
        harness = harness.add_baseline(Box::new(baseline));
    }
    harness = harness.add_strategy(Box::new(solver));
    harness = match args.games {
        Some(n) => harness.test_num(n),
        None => harness.test_all(),
    };
    if let Some(seed) = args.seed {
        harness = harness.seed(seed);
    }
    if !args.quiet && !args.json {
        harness = harness.verbose();
    }

    let record = harness.run()?;
    if args.json {
        println!("{}", record.to_json()?);
    } else {
        record.print_report()?;
    }
    if args.table {
        for perf in record.iter() {
            perf.print_table(&dict);
        }
    }
    Ok(())
}
