// Standalone replay tool for recorded Battlesnake games
//
// Usage:
//   cargo run --bin replay -- <archive.json.gz> [options]
//
// Options:
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --seed <n>             Seed for random tie-breaks (default: 0)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use coffee_snake::config::Config;
use coffee_snake::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Battlesnake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <archive> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --seed <N>              Seed for random tie-breaks (default: 0)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay games/20240101T120000Z_game=abc_type=standard_snake=me.json.gz");
    eprintln!("  replay game.json.gz --turns 5,10,15 --verbose");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn value_after(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(v) => v.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let archive_path = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut seed = 0u64;
    let mut turns: Option<Vec<i32>> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--turns" => {
                let value = value_after(&args, i, "--turns");
                turns = Some(parse_turns(&value).unwrap_or_else(|e| {
                    eprintln!("Error parsing turns: {}", e);
                    process::exit(1);
                }));
                i += 1;
            }
            "--seed" => {
                let value = value_after(&args, i, "--seed");
                seed = value.parse().unwrap_or_else(|e| {
                    eprintln!("Invalid seed '{}': {}", value, e);
                    process::exit(1);
                });
                i += 1;
            }
            "--config" => {
                config_path = value_after(&args, i, "--config");
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay archive: {}", archive_path);
    println!();

    let engine = ReplayEngine::new(config, verbose, seed);

    let archive = match engine.load_archive(archive_path) {
        Ok(archive) => archive,
        Err(e) => {
            eprintln!("Error loading archive: {}", e);
            process::exit(1);
        }
    };

    if archive.decisions.is_empty() {
        eprintln!("Error: Archive has no recorded states");
        process::exit(1);
    }

    let results = match turns {
        Some(turns) => {
            println!("Replaying {} specific turn(s)...\n", turns.len());
            engine.replay_turns(&archive, &turns).unwrap_or_else(|e| {
                eprintln!("Error during replay: {}", e);
                process::exit(1);
            })
        }
        None => {
            println!("Replaying all {} states...\n", archive.decisions.len());
            engine.replay_all(&archive)
        }
    };

    engine.print_report(&results);
}
