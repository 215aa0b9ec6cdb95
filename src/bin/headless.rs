//! Evo-Nav headless runner - evolve without a window.

use std::path::PathBuf;

use evo_nav::simulation::epoch::{TickLimit, WallClock};
use evo_nav::simulation::error::SimulationError;
use evo_nav::simulation::evolution::{EvolutionRunner, StopCondition};
use evo_nav::simulation::params::Params;

const DEFAULT_GENERATIONS: u32 = 20;

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <config.json | --default> [generations] [options]");
    eprintln!();
    eprintln!("Evolve a population without rendering.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json        Path to a parameter file (missing fields use defaults)");
    eprintln!("  --default          Use the built-in parameters");
    eprintln!("  generations        Number of generations to run (default: {DEFAULT_GENERATIONS})");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --ticks N          Bound each epoch by N ticks instead of wall-clock time");
    eprintln!("  --target F         Also stop once the best fitness reaches F");
    eprintln!("  --history PATH     Write per-generation statistics as JSON");
    eprintln!("  --example          Print the default parameters as JSON");
}

struct Options {
    params: Params,
    stop: StopCondition,
    max_ticks: Option<u64>,
    history: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let source = args.get(1).ok_or("missing parameter source")?;
    let params = if source == "--default" {
        Params::default()
    } else {
        Params::load_from_file(source).map_err(|e| format!("loading {source}: {e}"))?
    };

    let mut generations = DEFAULT_GENERATIONS;
    let mut stop_target = None;
    let mut max_ticks = None;
    let mut history = None;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        let mut value = |name: &str| {
            rest.next()
                .ok_or_else(|| format!("{name} needs a value"))
                .cloned()
        };
        match arg.as_str() {
            "--ticks" => {
                max_ticks = Some(
                    value("--ticks")?
                        .parse::<u64>()
                        .map_err(|e| format!("--ticks: {e}"))?,
                );
            }
            "--target" => {
                stop_target = Some(
                    value("--target")?
                        .parse::<f32>()
                        .map_err(|e| format!("--target: {e}"))?,
                );
            }
            "--history" => history = Some(PathBuf::from(value("--history")?)),
            other => {
                generations = other
                    .parse()
                    .map_err(|_| format!("unexpected argument {other:?}"))?;
            }
        }
    }

    let mut stop = StopCondition::generations(generations);
    if let Some(target) = stop_target {
        stop = stop.or_fitness(target);
    }

    Ok(Options {
        params,
        stop,
        max_ticks,
        history,
    })
}

fn run(options: Options) -> Result<(), SimulationError> {
    let epoch_length = options.params.epoch_length();
    let mut runner = EvolutionRunner::new(options.params)?;

    match options.max_ticks {
        Some(ticks) => runner.run(&options.stop, || TickLimit::new(ticks))?,
        None => runner.run(&options.stop, || WallClock::starting_now(epoch_length))?,
    };
    let history = runner.history();

    println!("Evo-Nav Run");
    println!("===========");
    println!("Seed: {}", runner.seed());
    if let Some(best) = history.best_ever {
        println!(
            "Best fitness: {:.2} (generation {}, {} of {} alive)",
            best.best_fitness, best.generation, best.alive, best.population
        );
    }
    println!(
        "Average best fitness (last {}): {:.2}",
        history.len(),
        history.avg_best_fitness()
    );
    println!(
        "Average survival rate: {:.1}%",
        history.avg_survival_rate() * 100.0
    );

    if let Some(path) = &options.history {
        history.save_to_file(path)?;
        println!("History written to {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|arg| arg == "--example") {
        match Params::default().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!();
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
