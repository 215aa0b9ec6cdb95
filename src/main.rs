use evo_nav::simulation::epoch::{EpochBudget, WallClock};
use evo_nav::simulation::error::SimulationError;
use evo_nav::simulation::evolution::EvolutionRunner;
use evo_nav::simulation::field::Field;
use evo_nav::simulation::params::Params;
use macroquad::prelude::*;

mod graphics;

/// Simulation ticks run between two rendered frames.
const TICKS_PER_FRAME: usize = 20;

fn window_conf() -> Conf {
    let params = Params::default();
    Conf {
        window_title: "Evolved Navigators".to_owned(),
        window_width: params.width as i32,
        window_height: params.height as i32,
        ..Default::default()
    }
}

fn load_params() -> Result<Params, SimulationError> {
    match std::env::args().nth(1) {
        Some(path) => Params::load_from_file(path),
        None => Ok(Params::default()),
    }
}

fn exit_with(error: &SimulationError) -> ! {
    eprintln!("Error: {error}");
    std::process::exit(1);
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let params = load_params().unwrap_or_else(|e| exit_with(&e));
    let mut field = Field::from_params(&params);
    let mut pending_corner = None;

    // genesis: each pair of clicks places one obstacle
    loop {
        clear_background(WHITE);

        if is_mouse_button_pressed(MouseButton::Left) {
            let corner = graphics::from_screen(mouse_position(), &field);
            match pending_corner.take() {
                Some(first) => field.add_obstacle(first, corner),
                None => pending_corner = Some(corner),
            }
        }

        graphics::draw_field(&field);
        if let Some(corner) = pending_corner {
            graphics::draw_corner_marker(corner, &field);
        }
        graphics::draw_genesis_hint(field.obstacles.len());

        if is_key_pressed(KeyCode::Enter) {
            break;
        }
        next_frame().await;
    }

    let mut runner = EvolutionRunner::with_field(params, field).unwrap_or_else(|e| exit_with(&e));
    let epoch_length = runner.params().epoch_length();
    let mut clock = WallClock::starting_now(epoch_length);
    let mut ticks = 0;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        for _ in 0..TICKS_PER_FRAME {
            if runner.alive_count() == 0 || clock.expired() {
                break;
            }
            runner.tick().unwrap_or_else(|e| exit_with(&e));
            ticks += 1;
        }

        if runner.alive_count() == 0 || clock.expired() {
            let outcome = runner.outcome_after(ticks);
            runner.evolve(&outcome).unwrap_or_else(|e| exit_with(&e));
            clock = WallClock::starting_now(epoch_length);
            ticks = 0;
        }

        clear_background(WHITE);
        graphics::draw_field(runner.field());
        graphics::draw_agents(runner.agents(), runner.field());
        graphics::draw_status(&runner, clock.remaining().as_secs_f32());

        next_frame().await;
    }
}
