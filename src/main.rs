use std::{fs, path::PathBuf, time::Instant};

use anyhow::Context;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use tile_slide::{parse_board, Board, Heuristic, Scenario, SearchOptions, Solution, Solver};

/// Solve a sliding-tile puzzle with A* and report search statistics.
///
/// Board text is one row per line or '/' between rows, with 0 for the
/// blank, e.g. "1 2 3/4 5 6/0 7 8".
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in starting board (used when neither --board nor --random is given)
    #[arg(short, long, value_enum)]
    scenario: Option<Scenario>,

    /// Custom starting board
    #[arg(short, long)]
    board: Option<String>,

    /// Random solvable board with this many tiles per side
    #[arg(short, long, conflicts_with = "board")]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Cost estimator to search with
    #[arg(short = 'H', long, value_enum, default_value_t = Heuristic::Manhattan)]
    heuristic: Heuristic,

    /// Run every heuristic and print a comparison table
    #[arg(short, long)]
    compare: bool,

    /// Print the board after every move of the solution
    #[arg(long)]
    replay: bool,

    /// Give up after closing this many states
    #[arg(long)]
    max_closed: Option<usize>,

    /// Write the solution record(s) as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    start: &'a str,
    side: usize,
    tiles: &'a [u8],
    solutions: &'a [Solution],
}

fn initial_board(args: &Args) -> anyhow::Result<(String, Board)> {
    if let Some(text) = &args.board {
        let board = parse_board(text).with_context(|| format!("reading board '{}'", text))?;
        return Ok(("custom".to_string(), board));
    }

    if let Some(side) = args.random {
        let seed = args.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::scrambled(side, &mut rng)
            .with_context(|| format!("generating a {}x{} board", side, side))?;
        return Ok((format!("random, seed {}", seed), board));
    }

    let scenario = args.scenario.unwrap_or(Scenario::Medium);
    Ok((scenario.to_string(), scenario.board()?))
}

fn print_replay(initial: &Board, solution: &Solution) {
    let mut board = initial.clone();
    for (step, action) in solution.actions.iter().enumerate() {
        match board.apply(action.direction) {
            Some((next, _)) => board = next,
            None => {
                log::error!("move {} ({}) is not playable", step + 1, action);
                return;
            }
        }
        println!("{}. {}", step + 1, action);
        println!("{}", board);
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (label, initial) = initial_board(&args)?;
    let goal = Board::goal(initial.side())?;

    println!("----");
    println!("Start ({}):", label);
    println!("{}", initial);
    println!("----");
    println!("Goal:");
    println!("{}", goal);
    println!("----");

    if !initial.is_solvable_to(&goal) {
        log::warn!("start and goal have different parity; the search will exhaust its half of the state space");
    }

    let options = SearchOptions {
        max_closed: args.max_closed,
    };
    let heuristics = if args.compare {
        Heuristic::ALL.to_vec()
    } else {
        vec![args.heuristic]
    };

    let mut solutions = Vec::new();
    let mut rows = Vec::new();
    for heuristic in heuristics {
        log::info!("searching with {}", heuristic);
        let started = Instant::now();
        let result = Solver::new(heuristic)
            .with_options(options)
            .solve(&initial, &goal);
        let elapsed = started.elapsed();

        match result {
            Ok(solution) => {
                println!(
                    "{}: found a solution in {} moves ({:.4}s).",
                    heuristic,
                    solution.len(),
                    elapsed.as_secs_f64()
                );
                println!(
                    "Closed {} states, peak frontier {} (generated {} total).",
                    solution.stats.closed, solution.stats.peak_frontier, solution.stats.generated
                );
                if args.replay {
                    print_replay(&initial, &solution);
                }
                rows.push(format!(
                    "{:<13}{:>7}{:>10}{:>10}{:>11}{:>10.4}",
                    heuristic.name(),
                    solution.len(),
                    solution.stats.closed,
                    solution.stats.peak_frontier,
                    solution.stats.generated,
                    elapsed.as_secs_f64()
                ));
                solutions.push(solution);
            }
            Err(e) => {
                println!("{}: no solution found: {}", heuristic, e);
                rows.push(format!("{:<13}{:>7}", heuristic.name(), "-"));
            }
        }
    }

    if args.compare {
        println!("----");
        println!(
            "{:<13}{:>7}{:>10}{:>10}{:>11}{:>10}",
            "heuristic", "moves", "closed", "frontier", "generated", "seconds"
        );
        for row in &rows {
            println!("{}", row);
        }
    }

    if let Some(path) = &args.output {
        let report = Report {
            start: &label,
            side: initial.side(),
            tiles: initial.tiles(),
            solutions: &solutions,
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
