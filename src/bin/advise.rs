use std::path::PathBuf;

use yatzy_advisor::advisor::Advisor;
use yatzy_advisor::constants::CATEGORY_NAMES;
use yatzy_advisor::dice_mechanics::subtract_dice;
use yatzy_advisor::env_config;
use yatzy_advisor::scorecard::Scorecard;

const USAGE: &str = "Usage: yatzy-advisor-advise --scorecard BITS --upper N --dice DDDDD \
                     [--rolls-left R] [--state-map PATH]";

struct Args {
    scorecard: Scorecard,
    upper: i32,
    dice: Vec<u8>,
    rolls_left: u8,
    state_map: PathBuf,
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    std::process::exit(1);
}

/// "12345" or "1,2,3,4,5".
fn parse_dice(s: &str) -> Option<Vec<u8>> {
    s.chars()
        .filter(|c| *c != ',')
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut scorecard: Option<Scorecard> = None;
    let mut upper = 0i32;
    let mut dice: Option<Vec<u8>> = None;
    let mut rolls_left = 0u8;
    let mut state_map = env_config::state_map_path();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scorecard" => {
                i += 1;
                if i < args.len() {
                    scorecard = Some(
                        args[i]
                            .parse()
                            .unwrap_or_else(|e| fail(&format!("Invalid --scorecard: {}", e))),
                    );
                }
            }
            "--upper" => {
                i += 1;
                if i < args.len() {
                    upper = args[i]
                        .parse()
                        .unwrap_or_else(|_| fail(&format!("Invalid --upper value: {}", args[i])));
                }
            }
            "--dice" => {
                i += 1;
                if i < args.len() {
                    dice = Some(
                        parse_dice(&args[i])
                            .unwrap_or_else(|| fail(&format!("Invalid --dice value: {}", args[i]))),
                    );
                }
            }
            "--rolls-left" => {
                i += 1;
                if i < args.len() {
                    rolls_left = args[i].parse().unwrap_or_else(|_| {
                        fail(&format!("Invalid --rolls-left value: {}", args[i]))
                    });
                }
            }
            "--state-map" => {
                i += 1;
                if i < args.len() {
                    state_map = PathBuf::from(&args[i]);
                }
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!("  --scorecard BITS   15 characters of 0/1, Ones first");
                println!("  --upper N          Upper section score so far");
                println!("  --dice DDDDD       Current roll, e.g. 13366");
                println!("  --rolls-left R     1 or 2 for keepers advice, 0 to pick a category (default: 0)");
                println!(
                    "  --state-map PATH   State map JSON (default: $YATZY_STATE_MAP or {})",
                    env_config::DEFAULT_STATE_MAP
                );
                std::process::exit(0);
            }
            other => fail(&format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Args {
        scorecard: scorecard.unwrap_or_else(|| fail("Missing --scorecard")),
        upper,
        dice: dice.unwrap_or_else(|| fail("Missing --dice")),
        rolls_left,
        state_map,
    }
}

fn main() {
    env_config::init_tracing();
    let _base = env_config::init_base_path();
    let args = parse_args();
    env_config::init_rayon_threads();

    let mut advisor = Advisor::new();
    if let Err(e) = advisor.init_from_file(&args.state_map) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if args.rolls_left == 0 {
        match advisor.best_category(&args.scorecard, args.upper, &args.dice) {
            Ok(category) => println!(
                "Score {:?} in {} (category {})",
                args.dice, CATEGORY_NAMES[category], category
            ),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    match advisor.evaluate_keepers(&args.scorecard, args.upper, &args.dice, args.rolls_left) {
        Ok(advice) => {
            println!("Keep {:?} (EV {:.4})", advice.keepers, advice.ev);
            println!("Reroll {:?}", subtract_dice(&args.dice, &advice.keepers));
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
