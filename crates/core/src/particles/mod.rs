//! Firework particles: burst spawning, per-frame integration, culling and
//! painting.
//!
//! Physics constants are per nominal frame. [`ParticleField::step`] applies
//! exactly one such frame; [`ParticleField::advance`] scales the same terms
//! by elapsed time so motion does not depend on the display refresh rate.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    config::{ParticleConfig, Span},
    surface::{Point, Rgb, Surface, Viewport},
};

const TRIANGLE_SCALE: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub color: Rgb,
    pub shape: Shape,
    pub radius: f32,
    pub alpha: f32,
    pub gravity: f32,
    pub friction: f32,
}

impl Particle {
    /// Integrates `frames` nominal frames (fractional values allowed).
    fn integrate(&mut self, frames: f32, fade: f32) {
        self.velocity.y += self.gravity * frames;
        self.position.x += self.velocity.x * frames;
        self.position.y += self.velocity.y * frames;
        let drag = if frames == 1.0 {
            self.friction
        } else {
            self.friction.powf(frames)
        };
        self.velocity.x *= drag;
        self.velocity.y *= drag;
        self.alpha -= fade * frames;
    }

    fn is_dead(&self, floor: f32) -> bool {
        self.alpha <= 0.0 || self.position.y > floor
    }

    fn paint(&self, surface: &mut dyn Surface) {
        let alpha = self.alpha.clamp(0.0, 1.0);
        let Point { x, y } = self.position;
        match self.shape {
            Shape::Circle => surface.fill_circle(self.position, self.radius, self.color, alpha),
            Shape::Square => {
                let size = self.radius * 2.0;
                surface.fill_rect(
                    Point::new(x - size / 2.0, y - size / 2.0),
                    size,
                    size,
                    self.color,
                    alpha,
                );
            }
            Shape::Triangle => {
                let half = self.radius * TRIANGLE_SCALE / 2.0;
                surface.fill_polygon(
                    &[
                        Point::new(x, y - half),
                        Point::new(x - half, y + half),
                        Point::new(x + half, y + half),
                    ],
                    self.color,
                    alpha,
                );
            }
        }
    }
}

/// Live particle set. Ticks every frame whether or not a burst is active.
#[derive(Debug)]
pub struct ParticleField {
    config: ParticleConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
    rng: Pcg32,
    frames: u64,
}

impl ParticleField {
    pub fn new(config: ParticleConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, Pcg32::from_entropy())
    }

    /// Deterministic field for reproducible bursts.
    pub fn with_seed(config: ParticleConfig, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(config, viewport, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleConfig, viewport: Viewport, rng: Pcg32) -> Self {
        Self {
            config,
            viewport,
            particles: Vec::new(),
            rng,
            frames: 0,
        }
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Frames advanced since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves the cull floor to follow the new viewport height.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Spawns a burst using the configured count and palettes.
    pub fn spawn_default_burst(&mut self, origin: Point) {
        let count = self.config.burst_count;
        let colors = self.config.palette.clone();
        let shapes = self.config.shapes.clone();
        self.spawn_burst(origin, count, &colors, &shapes);
    }

    /// Adds `count` particles at `origin` flying in uniformly random
    /// directions. Empty palettes fall back to white circles.
    pub fn spawn_burst(&mut self, origin: Point, count: usize, colors: &[Rgb], shapes: &[Shape]) {
        self.particles.reserve(count);
        for _ in 0..count {
            let radius = sample(&mut self.rng, self.config.radius);
            let speed = sample(&mut self.rng, self.config.speed);
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let gravity = sample(&mut self.rng, self.config.gravity);
            let color = pick(&mut self.rng, colors).unwrap_or(Rgb::new(0xff, 0xff, 0xff));
            let shape = pick(&mut self.rng, shapes).unwrap_or(Shape::Circle);

            self.particles.push(Particle {
                position: origin,
                velocity: Point::new(angle.cos() * speed, angle.sin() * speed),
                color,
                shape,
                radius,
                alpha: 1.0,
                gravity,
                friction: self.config.friction,
            });
        }
        tracing::debug!(count, live = self.particles.len(), "spawned burst");
    }

    /// Advances exactly one nominal frame.
    pub fn step(&mut self) {
        self.integrate(1.0);
    }

    /// Advances by `dt_seconds` of wall-clock time. Non-positive and
    /// non-finite deltas are ignored.
    pub fn advance(&mut self, dt_seconds: f32) {
        if !(dt_seconds > 0.0 && dt_seconds.is_finite()) {
            return;
        }
        self.integrate(dt_seconds * self.config.nominal_fps);
    }

    fn integrate(&mut self, frames: f32) {
        self.frames += 1;
        if self.particles.is_empty() {
            return;
        }
        let fade = self.config.fade_per_frame;
        for particle in &mut self.particles {
            particle.integrate(frames, fade);
        }
        let floor = self.viewport.height + self.config.cull_margin;
        self.particles.retain(|particle| !particle.is_dead(floor));
    }

    /// Clears the surface and paints every live particle.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear();
        for particle in &self.particles {
            particle.paint(surface);
        }
    }
}

fn sample(rng: &mut Pcg32, span: Span) -> f32 {
    if span.max > span.min {
        rng.gen_range(span.min..span.max)
    } else {
        span.min
    }
}

fn pick<T: Copy>(rng: &mut Pcg32, items: &[T]) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.gen_range(0..items.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};

    fn field(height: f32) -> ParticleField {
        ParticleField::with_seed(ParticleConfig::default(), Viewport::new(800.0, height), 7)
    }

    fn single(shape: Shape) -> Particle {
        Particle {
            position: Point::new(10.0, 10.0),
            velocity: Point::new(0.0, 0.0),
            color: Rgb::new(1, 2, 3),
            shape,
            radius: 4.0,
            alpha: 0.5,
            gravity: 0.0,
            friction: 1.0,
        }
    }

    #[test]
    fn burst_adds_exactly_count_particles() {
        let mut field = field(600.0);
        field.spawn_default_burst(Point::new(400.0, 300.0));
        assert_eq!(field.len(), 250);

        field.spawn_burst(Point::new(0.0, 0.0), 3, &[Rgb::new(0, 0, 0)], &[Shape::Square]);
        assert_eq!(field.len(), 253);
    }

    #[test]
    fn burst_parameters_stay_in_range() {
        let mut field = field(600.0);
        field.spawn_default_burst(Point::new(400.0, 300.0));

        for particle in field.particles() {
            assert!((2.0..=6.0).contains(&particle.radius));
            assert!((0.04..=0.10).contains(&particle.gravity));
            let speed = particle.velocity.x.hypot(particle.velocity.y);
            assert!((6.999..=17.001).contains(&speed), "speed {speed}");
            assert_eq!(particle.alpha, 1.0);
            assert_eq!(particle.friction, 0.995);
            assert!(Rgb::FIREWORK_PALETTE.contains(&particle.color));
        }
    }

    #[test]
    fn one_step_applies_gravity_before_moving() {
        let mut field = field(600.0);
        field.spawn_burst(Point::new(0.0, 0.0), 1, &[], &[]);
        let before = field.particles()[0].clone();

        field.step();

        let after = &field.particles()[0];
        let vy = before.velocity.y + before.gravity;
        assert!((after.position.y - vy).abs() < 1e-5);
        assert!((after.position.x - before.velocity.x).abs() < 1e-5);
        assert!((after.velocity.y - vy * 0.995).abs() < 1e-5);
        assert!((after.alpha - 0.988).abs() < 1e-6);
    }

    #[test]
    fn fades_out_after_exactly_84_frames() {
        let mut field = field(1.0e9);
        field.spawn_burst(Point::new(0.0, 0.0), 1, &[], &[]);

        for _ in 0..83 {
            field.step();
        }
        assert_eq!(field.len(), 1);

        field.step();
        assert!(field.is_empty());
    }

    #[test]
    fn count_never_grows_without_spawning() {
        let mut field = field(300.0);
        field.spawn_default_burst(Point::new(400.0, 150.0));

        let mut previous = field.len();
        for _ in 0..120 {
            field.step();
            assert!(field.len() <= previous);
            previous = field.len();
        }
        assert!(field.is_empty());
    }

    #[test]
    fn particles_below_the_margin_are_culled() {
        let mut field = field(100.0);
        field.spawn_burst(Point::new(0.0, 299.0), 50, &[], &[]);
        for _ in 0..40 {
            field.step();
        }
        assert!(field.particles().iter().all(|p| p.position.y <= 300.0));
    }

    #[test]
    fn elapsed_time_matches_nominal_frames() {
        let mut stepped = field(1.0e9);
        let mut timed = field(1.0e9);
        stepped.spawn_burst(Point::new(0.0, 0.0), 1, &[], &[]);
        timed.spawn_burst(Point::new(0.0, 0.0), 1, &[], &[]);

        for _ in 0..10 {
            stepped.step();
            timed.advance(1.0 / 60.0);
        }

        let a = &stepped.particles()[0];
        let b = &timed.particles()[0];
        assert!((a.position.x - b.position.x).abs() < 1e-2);
        assert!((a.position.y - b.position.y).abs() < 1e-2);
        assert!((a.alpha - b.alpha).abs() < 1e-4);
    }

    #[test]
    fn non_finite_deltas_leave_particles_untouched() {
        let mut field = field(600.0);
        field.spawn_burst(Point::new(0.0, 0.0), 10, &[], &[]);
        let before = field.particles().to_vec();

        field.advance(f32::NAN);
        field.advance(f32::INFINITY);
        field.advance(-1.0);
        assert_eq!(field.particles(), before.as_slice());

        for _ in 0..100 {
            field.step();
        }
        assert!(field.is_empty());
    }

    #[test]
    fn empty_field_still_ticks() {
        let mut field = field(600.0);
        field.step();
        field.advance(0.5);
        assert_eq!(field.frames(), 2);
        assert!(field.is_empty());
    }

    #[test]
    fn paints_each_shape() {
        let mut list = DrawList::new();
        single(Shape::Square).paint(&mut list);
        single(Shape::Triangle).paint(&mut list);
        single(Shape::Circle).paint(&mut list);

        assert_eq!(
            list.commands()[0],
            DrawCommand::Rect {
                origin: Point::new(6.0, 6.0),
                width: 8.0,
                height: 8.0,
                color: Rgb::new(1, 2, 3),
                alpha: 0.5,
            }
        );
        assert_eq!(
            list.commands()[1],
            DrawCommand::Polygon {
                points: vec![
                    Point::new(10.0, 5.0),
                    Point::new(5.0, 15.0),
                    Point::new(15.0, 15.0),
                ],
                color: Rgb::new(1, 2, 3),
                alpha: 0.5,
            }
        );
        assert!(matches!(list.commands()[2], DrawCommand::Circle { radius, .. } if radius == 4.0));
    }

    #[test]
    fn render_clears_then_draws_live_particles() {
        let mut field = field(600.0);
        field.spawn_burst(Point::new(0.0, 0.0), 5, &[], &[Shape::Circle]);
        let mut list = DrawList::new();
        field.render(&mut list);

        assert_eq!(list.commands()[0], DrawCommand::Clear);
        assert_eq!(list.current_frame().len(), 5);
    }
}
