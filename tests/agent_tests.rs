#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::time::Duration;

use evo_nav::simulation::agent::{Agent, Perception};
use evo_nav::simulation::brain::NeuralNetwork;
use evo_nav::simulation::epoch::{EpochBudget, EpochEnd, TickLimit, WallClock, run_epoch};
use evo_nav::simulation::error::SimulationError;
use evo_nav::simulation::field::Field;
use evo_nav::simulation::params::Params;
use geo::{coord, point};
use ndarray::{Array1, Array2, array};

fn create_test_params() -> Params {
    Params {
        seed: Some(1),
        ..Params::default()
    }
}

/// Network whose output is always zero, so decisions leave acceleration unchanged.
fn idle_network() -> NeuralNetwork {
    NeuralNetwork::from_weights(&[5, 2], vec![Array2::zeros((5, 2))], Array1::zeros(2)).unwrap()
}

fn idle_agent_at(x: f32, y: f32) -> Agent {
    Agent::new(
        0,
        point! { x: x, y: y },
        coord! { x: 0.0, y: 0.0 },
        coord! { x: 0.0, y: 0.0 },
        idle_network(),
    )
}

#[test]
fn test_spawn_uses_params() {
    let params = create_test_params();
    let agent = Agent::spawn(4, &params, idle_network());

    assert_eq!(agent.id, 4);
    assert_eq!(agent.position, params.spawn_position);
    assert_eq!(agent.velocity, params.spawn_velocity.0);
    assert_eq!(agent.acceleration, params.spawn_acceleration.0);
    assert!(agent.is_alive());
}

#[test]
fn test_step_updates_velocity_before_position() {
    let mut agent = Agent::new(
        0,
        point! { x: 10.0, y: 20.0 },
        coord! { x: 1.0, y: 2.0 },
        coord! { x: 0.5, y: -1.0 },
        idle_network(),
    );

    agent.step(700.0, 700.0);

    assert_eq!(agent.velocity, coord! { x: 1.5, y: 1.0 });
    assert_eq!(agent.position, point! { x: 11.5, y: 21.0 });
    assert!(agent.is_alive());
}

#[test]
fn test_leaving_the_field_kills() {
    let mut agent = idle_agent_at(1.0, 350.0);
    agent.velocity = coord! { x: -1.0, y: 0.0 };

    // landing exactly on the edge already counts as outside
    agent.step(700.0, 700.0);
    assert!(agent.dead);
    assert_eq!(agent.position, point! { x: 0.0, y: 350.0 });

    let mut agent = idle_agent_at(350.0, 699.0);
    agent.velocity = coord! { x: 0.0, y: 5.0 };
    agent.step(700.0, 700.0);
    assert!(agent.dead);
}

#[test]
fn test_dead_agent_is_frozen() {
    let mut agent = idle_agent_at(350.0, 350.0);
    agent.velocity = coord! { x: 3.0, y: 3.0 };
    agent.acceleration = coord! { x: 1.0, y: 1.0 };
    agent.kill();

    agent.step(700.0, 700.0);

    assert_eq!(agent.position, point! { x: 350.0, y: 350.0 });
    assert_eq!(agent.velocity, coord! { x: 3.0, y: 3.0 });
}

#[test]
fn test_obstacle_collision_kills_and_freezes() {
    let mut field = Field::new(700.0, 700.0, point! { x: 550.0, y: 450.0 });
    field.add_obstacle(point! { x: 100.0, y: 100.0 }, point! { x: 200.0, y: 200.0 });
    let perception = Perception::default();

    let mut agent = idle_agent_at(150.0, 150.0);
    agent.velocity = coord! { x: 1.0, y: 1.0 };
    assert!(agent.check_collision(&field.obstacles));
    assert!(agent.dead);

    agent.update(&field, &perception).unwrap();
    assert_eq!(agent.position, point! { x: 150.0, y: 150.0 });
    assert_eq!(agent.velocity, coord! { x: 1.0, y: 1.0 });
}

#[test]
fn test_obstacle_edge_is_not_a_collision() {
    let mut field = Field::new(700.0, 700.0, point! { x: 550.0, y: 450.0 });
    field.add_obstacle(point! { x: 100.0, y: 100.0 }, point! { x: 200.0, y: 200.0 });

    let mut agent = idle_agent_at(100.0, 150.0);
    assert!(!agent.check_collision(&field.obstacles));
    assert!(agent.is_alive());
}

#[test]
fn test_zero_output_leaves_acceleration_unchanged() {
    let mut agent = idle_agent_at(350.0, 350.0);
    agent.acceleration = coord! { x: 0.25, y: -0.5 };

    agent.decide(&array![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

    assert_eq!(agent.acceleration, coord! { x: 0.25, y: -0.5 });
}

#[test]
fn test_decisions_accumulate_into_acceleration() {
    let network =
        NeuralNetwork::from_weights(&[5, 2], vec![Array2::ones((5, 2))], Array1::ones(2)).unwrap();
    let mut agent = idle_agent_at(350.0, 350.0);
    agent.network = network;
    let inputs = array![10.0, 10.0, 10.0, 10.0, 10.0];

    agent.decide(&inputs).unwrap();
    let first = agent.acceleration;
    assert!(first.x > 0.0 && first.x < 0.5);
    assert_eq!(first.x, first.y);

    agent.decide(&inputs).unwrap();
    assert!((agent.acceleration.x - 2.0 * first.x).abs() < 1e-6);
}

#[test]
fn test_decide_rejects_wrong_output_size() {
    let network =
        NeuralNetwork::from_weights(&[5, 3], vec![Array2::zeros((5, 3))], Array1::zeros(3)).unwrap();
    let mut agent = idle_agent_at(350.0, 350.0);
    agent.network = network;

    let result = agent.decide(&Array1::zeros(5));
    assert!(matches!(
        result,
        Err(SimulationError::OutputSizeMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn test_fitness_adds_penalty_when_dead() {
    let goal = point! { x: 550.0, y: 450.0 };
    let mut agent = idle_agent_at(550.0, 350.0);

    assert_eq!(agent.fitness(&goal, 1000.0), 100.0);
    agent.kill();
    assert_eq!(agent.fitness(&goal, 1000.0), 1100.0);
}

#[test]
fn test_constant_acceleration_trajectory() {
    let params = create_test_params();
    let field = Field::from_params(&params);
    let perception = Perception::from_params(&params);
    let mut agents: Vec<Agent> = (0..2)
        .map(|id| Agent::spawn(id, &params, idle_network()))
        .collect();

    let ticks = 100;
    let outcome = run_epoch(&mut agents, &field, &perception, &mut TickLimit::new(ticks)).unwrap();

    assert_eq!(outcome.ticks, ticks);
    assert_eq!(outcome.alive, 2);
    assert_eq!(outcome.end, EpochEnd::BudgetExpired);

    // p_n = p_0 + n * v_0 + a * n (n + 1) / 2
    let n = ticks as f32;
    let expected = 50.0 + n * 0.01 + 0.01 * n * (n + 1.0) / 2.0;
    for agent in &agents {
        assert!((agent.position.x() - expected).abs() < 0.05);
        assert!((agent.position.y() - expected).abs() < 0.05);
        assert!((agent.velocity.x - (0.01 + n * 0.01)).abs() < 1e-3);
    }
}

#[test]
fn test_epoch_ends_when_everyone_is_dead() {
    let field = Field::new(700.0, 700.0, point! { x: 550.0, y: 450.0 });
    let perception = Perception::default();
    let mut agents = vec![idle_agent_at(2.0, 350.0), idle_agent_at(698.0, 350.0)];
    agents[0].velocity = coord! { x: -5.0, y: 0.0 };
    agents[1].velocity = coord! { x: 5.0, y: 0.0 };

    let outcome =
        run_epoch(&mut agents, &field, &perception, &mut TickLimit::new(1000)).unwrap();

    assert_eq!(outcome.end, EpochEnd::AllDead);
    assert_eq!(outcome.ticks, 1);
    assert_eq!(outcome.alive, 0);
}

#[test]
fn test_tick_limit_allows_exact_tick_count() {
    let field = Field::new(700.0, 700.0, point! { x: 550.0, y: 450.0 });
    let perception = Perception::default();
    let mut agents = vec![idle_agent_at(350.0, 350.0)];

    let outcome = run_epoch(&mut agents, &field, &perception, &mut TickLimit::new(0)).unwrap();
    assert_eq!(outcome.ticks, 0);

    let outcome = run_epoch(&mut agents, &field, &perception, &mut TickLimit::new(7)).unwrap();
    assert_eq!(outcome.ticks, 7);
    assert_eq!(outcome.end, EpochEnd::BudgetExpired);
}

#[test]
fn test_wall_clock_limits() {
    let mut elapsed = WallClock::starting_now(Duration::ZERO);
    assert!(elapsed.expired());
    assert_eq!(elapsed.remaining(), Duration::ZERO);

    // a limit past the range of Instant never expires instead of overflowing
    let mut endless = WallClock::starting_now(Duration::MAX);
    assert!(!endless.expired());
    assert_eq!(endless.remaining(), Duration::MAX);

    let mut running = WallClock::starting_now(Duration::from_secs(60));
    assert!(!running.expired());
    assert!(running.remaining() <= Duration::from_secs(60));
}
