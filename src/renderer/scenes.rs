//! Per-game scene drawing
//!
//! Every function here is a pure read of its state: drawing the same state
//! twice produces the same command stream.

use glam::Vec2;

use super::{Color, Font, Surface, palette};
use crate::sim::Rect;
use crate::sim::asteroid_click::AsteroidState;
use crate::sim::dodge_dots::DodgeState;
use crate::sim::reaction_gate::{ReactionState, RoundPhase, TOTAL_ROUNDS};
use crate::sim::snake_lite::{Cell, SnakeState};
use crate::sim::tiny_runner::{RUNNER_H, RUNNER_W, RUNNER_X, RunnerState};

const HUD_X: f32 = 12.0;
const DODGE_GRID_SPACING: f32 = 24.0;
const CELL_PADDING: f32 = 2.0;
/// Target radius wobble, driven by remaining lifetime
const PULSE_PERIOD_MS: f32 = 130.0;
const PULSE_AMPLITUDE: f32 = 0.06;
const CORE_RING_SCALE: f32 = 0.55;
const CORE_RING_WIDTH: f32 = 3.0;

fn backdrop(surface: &mut dyn Surface, width: f32, height: f32, color: Color) {
    surface.fill_rect(Rect::new(0.0, 0.0, width, height), color);
}

fn hud_line(surface: &mut dyn Surface, text: &str, y: f32) {
    surface.fill_text(text, Vec2::new(HUD_X, y), Font::HUD, palette::HUD_TEXT);
}

/// Dimmed full-field veil with a centered headline and optional detail line
fn game_over_overlay(
    surface: &mut dyn Surface,
    width: f32,
    height: f32,
    headline: &str,
    detail: Option<&str>,
) {
    let center = Vec2::new(width / 2.0, height / 2.0);
    backdrop(surface, width, height, palette::OVERLAY);
    surface.fill_text(
        headline,
        center + Vec2::new(-76.0, -8.0),
        Font::HEADLINE,
        palette::HEADLINE,
    );
    if let Some(detail) = detail {
        surface.fill_text(
            detail,
            center + Vec2::new(-120.0, 20.0),
            Font::HUD,
            palette::HEADLINE,
        );
    }
}

/// Banner shown over a paused session
pub fn draw_paused_banner(surface: &mut dyn Surface, width: f32, height: f32) {
    let center = Vec2::new(width / 2.0, height / 2.0);
    backdrop(surface, width, height, palette::OVERLAY);
    surface.fill_text(
        "PAUSED",
        center + Vec2::new(-44.0, -8.0),
        Font::HEADLINE,
        palette::HEADLINE,
    );
    surface.fill_text(
        "Press resume to continue",
        center + Vec2::new(-78.0, 20.0),
        Font::HINT,
        palette::HUD_MUTED,
    );
}

pub fn draw_asteroid_click(surface: &mut dyn Surface, state: &AsteroidState) {
    backdrop(surface, state.width, state.height, palette::BACKDROP);

    let time = format!("TIME {:.1}s", state.time_left_ms / 1000.0);
    let lines = [
        time,
        format!("SCORE {}", state.score),
        format!("COMBO x{}", state.combo),
    ];
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(
            line,
            Vec2::new(HUD_X, 22.0 + i as f32 * 20.0),
            Font::HUD,
            palette::HUD_MUTED,
        );
    }

    if let Some(target) = state.target {
        let pulse = 1.0 + (target.ttl_ms / PULSE_PERIOD_MS).sin() * PULSE_AMPLITUDE;
        surface.fill_circle(target.pos, target.r * pulse, palette::HAZARD);
        surface.stroke_circle(
            target.pos,
            target.r * CORE_RING_SCALE,
            CORE_RING_WIDTH,
            palette::HAZARD_RIM,
        );
    }

    if state.game_over {
        let detail = format!(
            "Score {} / Accuracy {}%",
            state.score,
            state.accuracy_text()
        );
        game_over_overlay(surface, state.width, state.height, "RESULT", Some(&detail));
    }
}

pub fn draw_dodge_dots(surface: &mut dyn Surface, state: &DodgeState) {
    backdrop(surface, state.width, state.height, palette::BACKDROP_DODGE);

    let columns = (state.width / DODGE_GRID_SPACING).floor() as u32;
    for i in 0..=columns {
        let x = i as f32 * DODGE_GRID_SPACING;
        surface.fill_rect(Rect::new(x, 0.0, 1.0, state.height), palette::GRID_DODGE);
    }

    for dot in &state.dots {
        surface.fill_circle(dot.pos, dot.r, palette::DOT);
    }
    surface.fill_circle(state.player.pos, state.player.r, palette::ACCENT);

    hud_line(surface, &format!("SCORE {}", state.score), 20.0);
    hud_line(
        surface,
        &format!("TIME {:.1}s", state.elapsed_ms / 1000.0),
        40.0,
    );

    if state.game_over {
        game_over_overlay(
            surface,
            state.width,
            state.height,
            "GAME OVER",
            Some("Press restart to play again."),
        );
    }
}

pub fn draw_reaction_gate(surface: &mut dyn Surface, state: &ReactionState) {
    backdrop(surface, state.width, state.height, palette::BACKDROP);
    hud_line(
        surface,
        &format!("ROUND {} / {}", state.round.min(TOTAL_ROUNDS), TOTAL_ROUNDS),
        20.0,
    );

    let center = Vec2::new(state.width / 2.0, state.height / 2.0);
    if state.game_over {
        surface.fill_text(
            "DONE",
            center + Vec2::new(-32.0, -18.0),
            Font::bold(26),
            palette::HEADLINE,
        );
        surface.fill_text(
            &format!("Average reaction {:.1}ms", state.average()),
            center + Vec2::new(-84.0, 8.0),
            Font::HUD,
            palette::HEADLINE,
        );
        return;
    }

    match state.phase {
        RoundPhase::Waiting => {
            surface.fill_text(
                "Wait for it...",
                center + Vec2::new(-80.0, 0.0),
                Font::bold(28),
                palette::WAIT_TEXT,
            );
            surface.fill_text(
                "Pressing too early fails the round.",
                center + Vec2::new(-108.0, 28.0),
                Font::HINT,
                palette::HUD_MUTED,
            );
        }
        RoundPhase::Signal => {
            surface.fill_rect(
                Rect::new(center.x - 110.0, center.y - 50.0, 220.0, 100.0),
                palette::SIGNAL,
            );
            surface.fill_text(
                "NOW!",
                center + Vec2::new(-40.0, 10.0),
                Font::bold(32),
                palette::SIGNAL_TEXT,
            );
        }
        RoundPhase::Clicked | RoundPhase::FalseStart => {}
    }
}

fn cell_rect(cell: Cell, cell_w: f32, cell_h: f32) -> Rect {
    Rect::new(
        cell.x as f32 * cell_w + CELL_PADDING,
        cell.y as f32 * cell_h + CELL_PADDING,
        cell_w - CELL_PADDING * 2.0,
        cell_h - CELL_PADDING * 2.0,
    )
}

pub fn draw_snake_lite(surface: &mut dyn Surface, state: &SnakeState) {
    let (width, height) = (state.width, state.height);
    backdrop(surface, width, height, palette::BACKDROP);

    let cell_w = width / state.cols as f32;
    let cell_h = height / state.rows as f32;
    for c in 0..=state.cols {
        surface.fill_rect(Rect::new(c as f32 * cell_w, 0.0, 1.0, height), palette::GRID);
    }
    for r in 0..=state.rows {
        surface.fill_rect(Rect::new(0.0, r as f32 * cell_h, width, 1.0), palette::GRID);
    }

    surface.fill_rect(cell_rect(state.food, cell_w, cell_h), palette::HAZARD);
    for (i, segment) in state.snake.iter().enumerate() {
        let color = if i == 0 {
            palette::ACCENT_LIGHT
        } else {
            palette::ACCENT
        };
        surface.fill_rect(cell_rect(*segment, cell_w, cell_h), color);
    }

    surface.fill_text(
        &format!("SCORE {}", state.score),
        Vec2::new(10.0, 20.0),
        Font::HUD,
        palette::HUD_TEXT,
    );

    if state.game_over {
        game_over_overlay(surface, width, height, "GAME OVER", None);
    }
}

pub fn draw_tiny_runner(surface: &mut dyn Surface, state: &RunnerState) {
    backdrop(surface, state.width, state.height, palette::BACKDROP);
    surface.fill_rect(
        Rect::new(0.0, state.ground_y, state.width, state.height - state.ground_y),
        palette::GROUND,
    );
    surface.fill_rect(Rect::new(0.0, state.ground_y, state.width, 1.0), palette::GRID);

    for obstacle in &state.obstacles {
        surface.fill_rect(obstacle.rect(), palette::HAZARD);
    }
    surface.fill_rect(
        Rect::new(RUNNER_X, state.y - RUNNER_H, RUNNER_W, RUNNER_H),
        palette::ACCENT,
    );

    hud_line(surface, &format!("DIST {}m", state.distance.floor()), 20.0);

    if state.game_over {
        game_over_overlay(surface, state.width, state.height, "GAME OVER", None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::Playfield;
    use crate::sim::asteroid_click::Target;
    use crate::sim::reaction_gate;
    use crate::sim::tiny_runner;

    const FIELD: Playfield = Playfield::new(720.0, 420.0);

    fn render<F: Fn(&mut DrawList)>(draw: F) -> DrawList {
        let mut list = DrawList::new();
        draw(&mut list);
        list
    }

    #[test]
    fn test_drawing_is_idempotent() {
        let mut asteroid = AsteroidState::new(FIELD, 9);
        asteroid.target = Some(Target {
            pos: Vec2::new(100.0, 100.0),
            r: 20.0,
            ttl_ms: 640.0,
        });
        let first = render(|s| draw_asteroid_click(s, &asteroid));
        let second = render(|s| draw_asteroid_click(s, &asteroid));
        assert_eq!(first, second);

        let snake = SnakeState::new(FIELD, 9);
        assert_eq!(
            render(|s| draw_snake_lite(s, &snake)),
            render(|s| draw_snake_lite(s, &snake))
        );
    }

    #[test]
    fn test_backdrop_comes_first() {
        let dodge = DodgeState::new(FIELD, 1);
        let list = render(|s| draw_dodge_dots(s, &dodge));
        assert_eq!(
            list.commands[0],
            DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 720.0, 420.0),
                color: palette::BACKDROP_DODGE,
            }
        );
        assert!(list.has_text("SCORE 0"));
        assert!(list.has_text("TIME 0.0s"));
        assert!(!list.has_text("GAME OVER"));
    }

    #[test]
    fn test_asteroid_hud_and_result() {
        let state = AsteroidState::new(FIELD, 1);
        let list = render(|s| draw_asteroid_click(s, &state));
        assert_eq!(list.texts(), vec!["TIME 60.0s", "SCORE 0", "COMBO x0"]);

        let mut done = state;
        done.hits = 3;
        done.misses = 1;
        done.score = 30;
        done.game_over = true;
        let list = render(|s| draw_asteroid_click(s, &done));
        assert!(list.has_text("RESULT"));
        assert!(list.has_text("Score 30 / Accuracy 75.0%"));
    }

    #[test]
    fn test_reaction_phases() {
        let state = ReactionState::new(FIELD, 1);
        let list = render(|s| draw_reaction_gate(s, &state));
        assert!(list.has_text("ROUND 1 / 5"));
        assert!(list.has_text("Wait for it"));

        let mut done = state;
        for _ in 0..TOTAL_ROUNDS {
            done = reaction_gate::on_press(done, 0.0);
        }
        let list = render(|s| draw_reaction_gate(s, &done));
        assert!(list.has_text("DONE"));
        assert!(list.has_text("Average reaction 1000.0ms"));
        assert!(!list.has_text("NOW!"));
    }

    #[test]
    fn test_snake_cells_are_inset() {
        let state = SnakeState::new(FIELD, 1);
        let list = render(|s| draw_snake_lite(s, &state));
        let head = cell_rect(state.head(), 30.0, 26.25);
        assert!(list.commands.contains(&DrawCommand::FillRect {
            rect: head,
            color: palette::ACCENT_LIGHT,
        }));
        assert_eq!(head.x, 12.0 * 30.0 + 2.0);
        assert_eq!(head.w, 26.0);
    }

    #[test]
    fn test_runner_overlay_on_game_over() {
        let mut state = RunnerState::new(Playfield::new(720.0, 360.0), 1);
        state.distance = 88.6;
        let list = render(|s| draw_tiny_runner(s, &state));
        assert!(list.has_text("DIST 88m"));
        state.game_over = true;
        let list = render(|s| draw_tiny_runner(s, &state));
        assert!(list.has_text("GAME OVER"));
        // Skipping a step leaves the drawing unchanged
        let stepped = tiny_runner::step(state.clone(), 40.0);
        assert_eq!(render(|s| draw_tiny_runner(s, &stepped)), list);
    }
}
