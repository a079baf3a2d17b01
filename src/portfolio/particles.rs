//! Animated particle field drawn behind the portfolio page.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Animation, Tick};
use crate::models::Theme;

/// Number of particles in the field.
pub const PARTICLE_COUNT: usize = 55;
/// Roughly one display refresh.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const MAX_SPEED: f64 = 0.3;

/// A single moving dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Fill colour for particles under `theme`.
pub fn particle_color(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "rgba(96,165,250,.55)",
        Theme::Light => "rgba(37,99,235,.25)",
    }
}

/// Snapshot handed to the renderer each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleFrame {
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
    pub particles: Vec<Particle>,
}

/// Particles bouncing inside a rectangular field.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f64,
    height: f64,
    theme: Theme,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Field with randomly placed particles from an OS-seeded generator.
    pub fn new(width: f64, height: f64, theme: Theme) -> Self {
        Self::with_rng(width, height, theme, &mut StdRng::from_entropy())
    }

    /// Deterministic field for a given seed.
    pub fn seeded(width: f64, height: f64, theme: Theme, seed: u64) -> Self {
        Self::with_rng(width, height, theme, &mut StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f64, height: f64, theme: Theme, rng: &mut impl Rng) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
                r: rng.gen::<f64>() * 2.0 + 1.0,
                dx: (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED,
                dy: (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED,
            })
            .collect();

        Self {
            width,
            height,
            theme,
            particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Change the field size. Existing particles are kept and drift back in.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Move every particle one step, bouncing off the field edges.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.dx;
            p.y += p.dy;

            if p.x < 0.0 || p.x > self.width {
                p.dx = -p.dx;
            }
            if p.y < 0.0 || p.y > self.height {
                p.dy = -p.dy;
            }
        }
    }
}

impl Animation for ParticleField {
    type Frame = ParticleFrame;

    fn tick(&mut self) -> Tick {
        self.step();
        Tick::Continue
    }

    fn frame(&self) -> ParticleFrame {
        ParticleFrame {
            width: self.width,
            height: self.height,
            color: particle_color(self.theme),
            particles: self.particles.clone(),
        }
    }

    fn interval(&self) -> Duration {
        FRAME_INTERVAL
    }
}
