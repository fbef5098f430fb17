//! Boolnet drift CLI - Run evolutionary trials from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use boolnet_drift::{
    compute::run_sweep,
    record,
    schema::{RunConfig, SearchMode},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Run Boolean network evolution trials from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to run configuration file");
        eprintln!("  generations  Override the configured generation budget");
        eprintln!();
        eprintln!("An example configuration is printed with --example.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: RunConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Some(generations) = args.get(2) {
        config.generations = generations.parse().unwrap_or_else(|e| {
            eprintln!("Error parsing generation budget: {}", e);
            std::process::exit(1);
        });
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mode = match config.mode {
        SearchMode::Drift => "drift",
        SearchMode::HillClimb => "hill-climb",
    };

    println!("Boolean Network Evolution");
    println!("=========================");
    println!("Genes: {} ({} states)", config.n_genes, 1u32 << config.n_genes);
    println!("Mode: {} ({})", mode, config.scoring.name());
    println!("Budget: {} generations per trial", config.generations);
    println!("Sweep: {:?}", config.p_flip);
    println!();

    let out_dir = PathBuf::from("data");
    if let Err(e) = fs::create_dir_all(&out_dir) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }

    println!("Running {} trials...", config.p_flip.len());
    let start = Instant::now();

    let results = run_sweep(&config).unwrap_or_else(|e| {
        eprintln!("Sweep failed: {}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    let mut total_generations = 0u64;

    for result in &results {
        let path = record::save_f1_intervals(&out_dir, &config, result).unwrap_or_else(|e| {
            eprintln!("Error writing interval file: {}", e);
            std::process::exit(1);
        });
        if config.record_landscape {
            record::save_events(&out_dir, &config, result).unwrap_or_else(|e| {
                eprintln!("Error writing event file: {}", e);
                std::process::exit(1);
            });
        }
        total_generations += result.generations;
        println!(
            "  p={}: {} events, {} maximally fit genomes -> {}",
            result.p_flip,
            result.events.len(),
            result.f1_count,
            path.display()
        );
    }

    println!();
    println!(
        "Time: {:.2}s ({:.0} generations/s)",
        elapsed.as_secs_f64(),
        total_generations as f64 / elapsed.as_secs_f64()
    );
}

fn print_example_config() {
    let config = RunConfig::default();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
