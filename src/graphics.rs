use evo_nav::simulation::agent::Agent;
use evo_nav::simulation::evolution::EvolutionRunner;
use evo_nav::simulation::field::Field;
use geo::point;
use macroquad::prelude::*;

/// Length of the drawn velocity vector per unit of speed.
const VELOCITY_SCALE: f32 = 2.5;
/// Length of the drawn acceleration vector.
const ACCELERATION_LENGTH: f32 = 20.0;

trait ToScreen {
    type Output;
    fn to_screen(&self, field: &Field) -> Self::Output;
}

impl ToScreen for geo::Point<f32> {
    type Output = Vec2;
    fn to_screen(&self, field: &Field) -> Vec2 {
        vec2(
            self.x() * screen_width() / field.width,
            self.y() * screen_height() / field.height,
        )
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, field: &Field) -> f32 {
        let scale_x = screen_width() / field.width;
        let scale_y = screen_height() / field.height;
        self * scale_x.min(scale_y)
    }
}

/// Maps a mouse position back into field coordinates.
pub fn from_screen((x, y): (f32, f32), field: &Field) -> geo::Point<f32> {
    point! {
        x: x * field.width / screen_width(),
        y: y * field.height / screen_height(),
    }
}

pub fn draw_field(field: &Field) {
    for obstacle in &field.obstacles {
        let min = obstacle.min().to_screen(field);
        let max = obstacle.max().to_screen(field);
        draw_rectangle(min.x, min.y, max.x - min.x, max.y - min.y, GRAY);
    }

    let goal = field.goal.to_screen(field);
    draw_circle(goal.x, goal.y, 4.0_f32.to_screen(field), BLACK);
}

pub fn draw_corner_marker(corner: geo::Point<f32>, field: &Field) {
    let p = corner.to_screen(field);
    draw_circle_lines(p.x, p.y, 4.0, 1.0, DARKGRAY);
}

pub fn draw_agents(agents: &[Agent], field: &Field) {
    for agent in agents {
        let pos = agent.position.to_screen(field);

        // acceleration, pointing backwards like an exhaust
        let accel = vec2(agent.acceleration.x, agent.acceleration.y).normalize_or_zero();
        let tail = pos - accel * ACCELERATION_LENGTH.to_screen(field);
        let (accel_color, velocity_color) = if agent.dead {
            (RED, RED)
        } else {
            (BLACK, BLUE)
        };
        draw_line(pos.x, pos.y, tail.x, tail.y, 1.0, accel_color);

        let heading = agent.heading();
        let length = (VELOCITY_SCALE * agent.speed()).to_screen(field);
        draw_line(
            pos.x,
            pos.y,
            pos.x + heading.cos() * length,
            pos.y + heading.sin() * length,
            1.0,
            velocity_color,
        );
    }
}

pub fn draw_genesis_hint(obstacles: usize) {
    let text = format!(
        "Click two corners per obstacle ({obstacles} placed). Press Enter to start."
    );
    let font_size = 20.0;
    let text_size = measure_text(&text, None, font_size as _, 1.0);
    draw_text(
        &text,
        screen_width() / 2. - text_size.width / 2.,
        screen_height() - text_size.height,
        font_size,
        DARKGRAY,
    );
}

pub fn draw_status(runner: &EvolutionRunner, remaining_secs: f32) {
    let mut lines = vec![
        format!("Generation {}", runner.generation()),
        format!(
            "Alive {}/{}  ({:.1}s left)",
            runner.alive_count(),
            runner.agents().len(),
            remaining_secs
        ),
    ];
    if let Some(latest) = runner.history().latest() {
        lines.push(format!("Last best fitness {:.1}", latest.best_fitness));
    }
    if let Some(best) = runner.history().best_ever {
        lines.push(format!(
            "Best ever {:.1} (gen {})",
            best.best_fitness, best.generation
        ));
    }

    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 10.0, 20.0 + i as f32 * 18.0, 18.0, DARKGRAY);
    }
}
