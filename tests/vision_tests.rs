#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::f32::consts::PI;

use evo_nav::simulation::agent::{Agent, GoalOffset, Perception, Ray, Sense, Vision, cast_ray};
use evo_nav::simulation::brain::NeuralNetwork;
use evo_nav::simulation::field::Field;
use geo::{Coord, coord, point};
use ndarray::{Array1, Array2};

fn create_test_field() -> Field {
    Field::new(700.0, 700.0, point! { x: 550.0, y: 450.0 })
}

fn idle_network() -> NeuralNetwork {
    NeuralNetwork::from_weights(&[5, 2], vec![Array2::zeros((5, 2))], Array1::zeros(2)).unwrap()
}

fn agent_at(x: f32, y: f32, velocity: Coord<f32>) -> Agent {
    Agent::new(
        0,
        point! { x: x, y: y },
        velocity,
        coord! { x: 0.0, y: 0.0 },
        idle_network(),
    )
}

/// Per-step advance of a ray along x and y.
fn advance(ray: Ray) -> (f32, f32) {
    match ray {
        Ray::Sloped { slope, step } => (step, slope * step),
        Ray::Vertical { step } => (0.0, step),
    }
}

#[test]
fn test_ray_stops_on_the_boundary() {
    let field = create_test_field();
    let center = point! { x: 350.0, y: 350.0 };

    let hit = cast_ray(center, Ray::Sloped { slope: 0.0, step: 0.5 }, &field);
    assert!(hit.x() >= 700.0 && hit.x() < 700.5);
    assert_eq!(hit.y(), 350.0);

    let hit = cast_ray(center, Ray::Sloped { slope: 0.0, step: -0.5 }, &field);
    assert!(hit.x() <= 0.0 && hit.x() > -0.5);
}

#[test]
fn test_diagonal_ray_reaches_the_corner() {
    let field = create_test_field();

    let hit = cast_ray(
        point! { x: 350.0, y: 350.0 },
        Ray::Sloped { slope: 1.0, step: 0.5 },
        &field,
    );
    assert_eq!(hit.x_y(), (700.0, 700.0));
}

#[test]
fn test_vertical_ray() {
    let field = create_test_field();

    let hit = cast_ray(
        point! { x: 350.0, y: 350.0 },
        Ray::Vertical { step: -0.5 },
        &field,
    );
    assert_eq!(hit.x_y(), (350.0, 0.0));
}

#[test]
fn test_ray_stops_inside_an_obstacle() {
    let mut field = create_test_field();
    field.add_obstacle(point! { x: 400.0, y: 300.0 }, point! { x: 500.0, y: 400.0 });

    let hit = cast_ray(
        point! { x: 350.0, y: 350.0 },
        Ray::Sloped { slope: 0.0, step: 0.5 },
        &field,
    );
    // 400.0 lies on the edge, which is outside the obstacle
    assert_eq!(hit.x_y(), (400.5, 350.0));
}

#[test]
fn test_blocked_origin_is_returned_unchanged() {
    let mut field = create_test_field();
    field.add_obstacle(point! { x: 100.0, y: 100.0 }, point! { x: 200.0, y: 200.0 });
    let ray = Ray::Sloped { slope: 0.3, step: 0.5 };

    let inside = point! { x: 150.0, y: 150.0 };
    assert_eq!(cast_ray(inside, ray, &field), inside);

    let outside = point! { x: -10.0, y: 350.0 };
    assert_eq!(cast_ray(outside, ray, &field), outside);
}

#[test]
fn test_rays_follow_the_heading() {
    let vision = Vision::default();
    let slope = (PI / 8.0).tan();

    let rays = vision.rays(&agent_at(350.0, 350.0, coord! { x: 1.0, y: 0.0 }));
    assert_eq!(rays[1], Ray::Sloped { slope: 0.0, step: 0.5 });
    match (rays[0], rays[2]) {
        (
            Ray::Sloped {
                slope: left,
                step: left_step,
            },
            Ray::Sloped {
                slope: right,
                step: right_step,
            },
        ) => {
            assert!((left + slope).abs() < 1e-6);
            assert!((right - slope).abs() < 1e-6);
            assert_eq!((left_step, right_step), (0.5, 0.5));
        }
        other => panic!("unexpected side rays {other:?}"),
    }

    // moving towards negative x marches every ray backwards
    let rays = vision.rays(&agent_at(350.0, 350.0, coord! { x: -1.0, y: 0.0 }));
    assert!(rays.iter().all(|ray| matches!(ray, Ray::Sloped { step, .. } if *step == -0.5)));
}

#[test]
fn test_steep_side_ray_is_mirrored() {
    let vision = Vision::default();

    // heading ~84 degrees, so heading + 22.5 degrees crosses the vertical
    let rays = vision.rays(&agent_at(350.0, 350.0, coord! { x: 1.0, y: 10.0 }));
    match rays[2] {
        Ray::Sloped { slope, .. } => assert!(slope > 0.0),
        Ray::Vertical { .. } => panic!("side rays are never vertical"),
    }
}

#[test]
fn test_zero_horizontal_velocity_looks_vertically() {
    let field = create_test_field();
    let vision = Vision::default();

    let up = agent_at(350.0, 350.0, coord! { x: 0.0, y: 1.0 });
    assert_eq!(vision.rays(&up)[1], Ray::Vertical { step: 0.5 });
    let down = agent_at(350.0, 350.0, coord! { x: 0.0, y: -1.0 });
    assert_eq!(vision.rays(&down)[1], Ray::Vertical { step: -0.5 });

    let distances = vision.sense(&up, &field);
    assert!(distances.iter().all(|d| d.is_finite()));
    assert_eq!(distances[1], 350.0);

    for agent in [&up, &down] {
        let rays = vision.rays(agent);
        let heading_dy = advance(rays[1]).1;
        for side in [rays[0], rays[2]] {
            let (dx, dy) = advance(side);
            assert!(dx > 0.0, "{side:?} should march towards positive x");
            assert_eq!(dy.signum(), heading_dy.signum(), "{side:?} faces backwards");
        }
    }

    // a fresh agent at rest must not produce NaN either
    let still = agent_at(350.0, 350.0, coord! { x: 0.0, y: 0.0 });
    assert!(vision.sense(&still, &field).iter().all(|d| d.is_finite()));
}

#[test]
fn test_vertical_heading_matches_nearly_vertical_heading() {
    let vision = Vision::default();

    for vy in [1.0, -1.0] {
        let exact = vision.rays(&agent_at(350.0, 350.0, coord! { x: 0.0, y: vy }));
        let nearby = vision.rays(&agent_at(350.0, 350.0, coord! { x: 1e-6, y: vy }));

        for side in [0, 2] {
            let (exact_dx, exact_dy) = advance(exact[side]);
            let (nearby_dx, nearby_dy) = advance(nearby[side]);
            assert_eq!(exact_dx, nearby_dx);
            assert!(
                (exact_dy - nearby_dy).abs() < 1e-3,
                "vy {vy}: side ray {side} advances {exact_dy} instead of {nearby_dy}"
            );
            assert_eq!(exact_dy.signum(), vy.signum());
        }
    }
}

#[test]
fn test_vision_distances_in_an_empty_field() {
    let field = create_test_field();
    let vision = Vision::default();
    let agent = agent_at(350.0, 350.0, coord! { x: 1.0, y: 0.0 });

    let distances = vision.sense(&agent, &field);
    assert_eq!(distances.len(), vision.input_size());
    assert_eq!(distances[1], 350.0);

    // side rays leave through x = 700 after 350 units along x
    let expected = 350.0 * (1.0 + (PI / 8.0).tan().powi(2)).sqrt();
    assert!((distances[0] - expected).abs() < 1.0);
    assert!((distances[2] - expected).abs() < 1.0);
}

#[test]
fn test_goal_offset_reports_each_axis() {
    let field = create_test_field();
    let agent = agent_at(50.0, 500.0, coord! { x: 0.01, y: 0.01 });

    let offset = GoalOffset::new().sense(&agent, &field);
    assert_eq!(offset.to_vec(), vec![500.0_f32, 50.0]);
}

#[test]
fn test_perception_concatenates_senses() {
    let field = create_test_field();
    let perception = Perception::default();
    let agent = agent_at(50.0, 50.0, coord! { x: 0.01, y: 0.01 });

    assert_eq!(perception.total_input_size(), 5);
    let names: Vec<&str> = perception.senses().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Vision", "GoalOffset"]);

    let inputs = perception.perceive(&agent, &field);
    assert_eq!(inputs.len(), 5);
    assert_eq!(inputs[3], 500.0);
    assert_eq!(inputs[4], 400.0);
}
