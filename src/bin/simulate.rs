use std::path::PathBuf;
use std::time::Instant;

use yatzy_advisor::advisor::Advisor;
use yatzy_advisor::env_config;
use yatzy_advisor::scorecard::Scorecard;
use yatzy_advisor::simulation::simulate_batch;
use yatzy_advisor::state_map::{StateMap, StateValueLookup};

const USAGE: &str =
    "Usage: yatzy-advisor-simulate [--games N] [--seed S] [--state-map PATH] [--output FILE]";

struct Args {
    num_games: usize,
    seed: u64,
    state_map: PathBuf,
    output: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut num_games = 100usize;
    let mut seed = 42u64;
    let mut state_map = env_config::state_map_path();
    let mut output: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                if i < args.len() {
                    num_games = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --games value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--state-map" => {
                i += 1;
                if i < args.len() {
                    state_map = PathBuf::from(&args[i]);
                }
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    output = Some(PathBuf::from(&args[i]));
                }
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!("  --games N          Number of games to simulate (default: 100)");
                println!("  --seed S           RNG seed (default: 42)");
                println!(
                    "  --state-map PATH   State map JSON (default: $YATZY_STATE_MAP or {})",
                    env_config::DEFAULT_STATE_MAP
                );
                println!("  --output FILE      Write scores and statistics as JSON");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        num_games,
        seed,
        state_map,
        output,
    }
}

fn main() {
    env_config::init_tracing();
    let _base = env_config::init_base_path();
    let Args {
        num_games,
        seed,
        state_map,
        output,
    } = parse_args();
    let num_threads = env_config::init_rayon_threads();

    println!("Yatzy Advisor Simulation ({} games)", num_games);

    let t0 = Instant::now();
    let table = StateMap::load(&state_map).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    let load_ms = t0.elapsed().as_secs_f64() * 1000.0;
    let table_ev = table.lookup(&Scorecard::empty(), 0);

    let mut advisor = Advisor::new();
    advisor.init(table);

    println!("  State map:     {} ({:.1} ms)", state_map.display(), load_ms);
    match table_ev {
        Some(ev) => println!("  Starting EV:   {:.4}", ev),
        None => println!("  Starting EV:   (no entry for the empty scorecard)"),
    }
    match advisor.turn_start_ev(&Scorecard::empty(), 0) {
        Ok(ev) => println!("  First turn EV: {:.4} (recomputed)", ev),
        Err(e) => println!("  First turn EV: unavailable ({})", e),
    }
    println!();

    println!(
        "Simulating {} games ({} threads)...",
        num_games, num_threads
    );
    let result = simulate_batch(&advisor, num_games, seed).unwrap_or_else(|e| {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    });

    let per_game_ms = result.elapsed.as_secs_f64() * 1000.0 / num_games.max(1) as f64;
    println!(
        "  Elapsed:     {:.1} ms",
        result.elapsed.as_secs_f64() * 1000.0
    );
    println!("  Per game:    {:.1} ms", per_game_ms);
    println!();

    println!("Results:");
    match table_ev {
        Some(ev) => println!(
            "  Mean score:  {:.2} (table EV: {:.2}, delta: {:+.2})",
            result.mean,
            ev,
            result.mean - ev
        ),
        None => println!("  Mean score:  {:.2}", result.mean),
    }
    println!("  Std dev:     {:.1}", result.std_dev);
    println!("  Min:         {}", result.min);
    println!("  Max:         {}", result.max);
    println!("  Median:      {}", result.median);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
            eprintln!("Failed to serialize results: {}", e);
            std::process::exit(1);
        });
        if let Err(e) = std::fs::write(&path, json) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("  Output:      {}", path.display());
    }
}
