use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use log::{debug, warn, LevelFilter};
use solver_core::core::engine::{CharacterPolicy, EvaluationStrategy};
use solver_core::persistence::{load_config, open_dictionary, save_report};
use solver_core::{Dictionary, Solution, SolverConfig, SolverEngine};
use std::io::{self, Read};
use std::path::PathBuf;

/// Recovers the key of a monoalphabetic substitution cipher.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Newline-separated word list
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Compiled dictionary snapshot; rewritten whenever --words is given
    #[arg(long)]
    dict_cache: Option<PathBuf>,

    /// Ciphertext file; reads stdin when omitted
    #[arg(short, long)]
    cipher: Option<PathBuf>,

    /// JSON solver configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum fraction of resolved tokens that must be dictionary words
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Reject characters other than letters and whitespace
    #[arg(long)]
    strict: bool,

    /// Re-substitute the whole text at every node
    #[arg(long)]
    naive: bool,

    /// Give up after this many trial assignments
    #[arg(long)]
    max_nodes: Option<u64>,

    /// Write the solution as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = build_config(&args)?;
    let dictionary = build_dictionary(&args)?;
    debug!("dictionary holds {} words", dictionary.len());

    let ciphertext = match &args.cipher {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("could not read ciphertext {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).context("could not read stdin")?;
            input
        }
    };

    let engine = SolverEngine::with_config(dictionary, config);
    let solution = engine.solve(&ciphertext)?;
    print_solution(&solution);

    if let Some(path) = &args.report {
        save_report(&solution, path)
            .with_context(|| format!("could not write report {}", path.display()))?;
        println!("Report saved to '{}'", path.display());
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.strict {
        config.character_policy = CharacterPolicy::Strict;
    }
    if args.naive {
        config.strategy = EvaluationStrategy::Naive;
    }
    if args.max_nodes.is_some() {
        config.max_nodes = args.max_nodes;
    }
    config.validate()?;
    Ok(config)
}

fn build_dictionary(args: &Args) -> Result<Dictionary> {
    if let (Some(words), Some(cache)) = (&args.words, &args.dict_cache) {
        if cache.exists() {
            warn!(
                "rebuilding dictionary snapshot {} from {}",
                cache.display(),
                words.display()
            );
        }
    }
    open_dictionary(args.words.as_deref(), args.dict_cache.as_deref())
        .context("could not prepare the dictionary (use --words, or --dict-cache with an existing snapshot)")
}

fn print_solution(solution: &Solution) {
    println!("{}", "Key".bold());
    println!("{}", solution.key.to_string().green());
    println!();
    println!("{}", "Decoded".bold());
    println!("{}", solution.decoded.trim_end());
    println!();
    println!(
        "{} {} nodes, {} deadends, {} backtracks (order {})",
        "Search:".dark_grey(),
        solution.stats.nodes,
        solution.stats.deadends,
        solution.stats.backtracks,
        solution.cipher_order
    );
}
