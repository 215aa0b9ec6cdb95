#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_nav::simulation::epoch::EpochEnd;
use evo_nav::simulation::history::{GenerationSummary, History};

fn create_summary(generation: u32, best_fitness: f32, alive: usize) -> GenerationSummary {
    GenerationSummary {
        generation,
        population: 10,
        alive,
        ticks: 100,
        end: EpochEnd::BudgetExpired,
        best_fitness,
        mean_fitness: best_fitness + 50.0,
        worst_fitness: best_fitness + 100.0,
        survivor_spread: 1.0,
        offspring: 10,
    }
}

#[test]
fn test_record_keeps_a_bounded_window() {
    let mut history = History::new(3);

    for generation in 0..5 {
        history.record(create_summary(generation, 100.0, 5));
    }

    assert_eq!(history.len(), 3);
    assert_eq!(history.summaries[0].generation, 2);
    assert_eq!(history.latest().map(|s| s.generation), Some(4));
}

#[test]
fn test_best_ever_survives_the_window() {
    let mut history = History::new(2);

    history.record(create_summary(0, 300.0, 5));
    history.record(create_summary(1, 20.0, 5));
    history.record(create_summary(2, 150.0, 5));
    history.record(create_summary(3, 90.0, 5));

    let best = history.best_ever.unwrap();
    assert_eq!(best.generation, 1);
    assert_eq!(best.best_fitness, 20.0);
    assert!(history.summaries.iter().all(|s| s.generation != 1));
}

#[test]
fn test_averages() {
    let mut history = History::default();
    assert!(history.is_empty());
    assert_eq!(history.avg_best_fitness(), 0.0);
    assert_eq!(history.avg_survival_rate(), 0.0);

    history.record(create_summary(0, 100.0, 10));
    history.record(create_summary(1, 200.0, 0));

    assert_eq!(history.avg_best_fitness(), 150.0);
    assert_eq!(history.avg_survival_rate(), 0.5);
}

#[test]
fn test_save_to_file() {
    let mut history = History::default();
    history.record(create_summary(0, 42.0, 3));
    let path = std::env::temp_dir().join("evo_nav_history_test.json");

    history.save_to_file(&path).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    let loaded: History = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.best_ever, history.best_ever);
    assert_eq!(loaded.summaries[0].end, EpochEnd::BudgetExpired);

    std::fs::remove_file(&path).ok();
}
