//! Falling heart petals over the love tree.
//!
//! A capped pool of particles: petals trickle in from the top until the cap is
//! reached, sway sideways as they fall, and are replaced in place by a fresh
//! petal once they leave the bottom edge. The pool never shrinks or reallocates.

use crate::rng::RandomSource;
use crate::surface::{Placement, Point, Rgba, Surface, heart_path};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PetalParams {
    pub max_petals: usize,
    pub initial_petals: usize,
    /// Per-frame probability of adding one petal while under the cap.
    pub spawn_chance: f64,
    /// Horizontal spawn band as fractions of the surface width.
    pub spawn_band: (f64, f64),
    pub spawn_y: f64,
    pub size_range: (f64, f64),
    pub speed_range: (f64, f64),
    pub drift_range: (f64, f64),
    pub opacity_range: (f64, f64),
    /// Degrees per frame.
    pub rotation_speed_range: (f64, f64),
    pub sway_scale: f64,
    pub drift_damping: f64,
}

impl Default for PetalParams {
    fn default() -> Self {
        Self {
            max_petals: 60,
            initial_petals: 20,
            spawn_chance: 0.04,
            // Biased toward the right side where the tree stands.
            spawn_band: (0.45, 0.95),
            spawn_y: -10.0,
            size_range: (2.0, 6.0),
            speed_range: (0.5, 1.5),
            drift_range: (-1.0, 1.0),
            opacity_range: (0.5, 1.0),
            rotation_speed_range: (-1.0, 1.0),
            sway_scale: 0.01,
            drift_damping: 0.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Petal {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub drift: f64,
    pub opacity: f64,
    /// Degrees.
    pub rotation: f64,
    pub rotation_speed: f64,
}

impl Petal {
    fn spawn<R: RandomSource + ?Sized>(p: &PetalParams, width: f64, rng: &mut R) -> Self {
        Self {
            x: rng.range(width * p.spawn_band.0, width * p.spawn_band.1),
            y: p.spawn_y,
            size: rng.range(p.size_range.0, p.size_range.1),
            speed: rng.range(p.speed_range.0, p.speed_range.1),
            drift: rng.range(p.drift_range.0, p.drift_range.1),
            opacity: rng.range(p.opacity_range.0, p.opacity_range.1),
            rotation: rng.range(0.0, 360.0),
            rotation_speed: rng.range(p.rotation_speed_range.0, p.rotation_speed_range.1),
        }
    }

    fn step(&mut self, p: &PetalParams) {
        self.y += self.speed;
        self.x += (self.y * p.sway_scale).sin() + self.drift * p.drift_damping;
        self.rotation += self.rotation_speed;
    }
}

pub struct PetalField {
    params: PetalParams,
    petals: Vec<Petal>,
    respawned: u64,
}

impl PetalField {
    pub fn new(params: PetalParams) -> Self {
        let petals = Vec::with_capacity(params.max_petals);
        Self {
            params,
            petals,
            respawned: 0,
        }
    }

    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }

    pub fn len(&self) -> usize {
        self.petals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.petals.is_empty()
    }

    /// Total number of in-place replacements so far.
    pub fn respawned(&self) -> u64 {
        self.respawned
    }

    /// Fills the pool with the initial batch (never beyond the cap).
    pub fn seed<R: RandomSource + ?Sized>(&mut self, width: f64, rng: &mut R) {
        let n = self.params.initial_petals.min(self.params.max_petals);
        while self.petals.len() < n {
            self.petals.push(Petal::spawn(&self.params, width, rng));
        }
    }

    /// One animation frame: clear, maybe spawn, advance, recycle and draw.
    pub fn frame<S, R>(&mut self, surface: &mut S, rng: &mut R)
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
    {
        let (width, height) = surface.size();
        surface.clear();

        let p = &self.params;
        if self.petals.len() < p.max_petals && rng.chance(p.spawn_chance) {
            self.petals.push(Petal::spawn(p, width, rng));
        }

        for petal in self.petals.iter_mut() {
            petal.step(p);
            if petal.y > height {
                *petal = Petal::spawn(p, width, rng);
                self.respawned += 1;
            }
            let pink = Rgba::rgba(
                255.0,
                rng.range(160.0, 210.0),
                rng.range(180.0, 220.0),
                petal.opacity,
            );
            surface.fill_path(
                Placement::rotated(Point::new(petal.x, petal.y), petal.rotation.to_radians()),
                &heart_path(petal.size),
                pink,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{seeded, testing::Scripted};
    use crate::surface::RecordingSurface;

    #[test]
    fn test_seed_respects_cap() {
        let mut field = PetalField::new(PetalParams {
            max_petals: 5,
            initial_petals: 20,
            ..PetalParams::default()
        });
        field.seed(800.0, &mut seeded(1));
        assert_eq!(field.len(), 5);
    }

    #[test]
    fn test_spawn_band_and_top_edge() {
        let mut field = PetalField::new(PetalParams::default());
        field.seed(1000.0, &mut seeded(2));
        for petal in field.petals() {
            assert!((450.0..950.0).contains(&petal.x));
            assert_eq!(petal.y, -10.0);
            assert!(petal.speed > 0.0);
        }
    }

    #[test]
    fn test_frame_draws_every_petal_once() {
        let mut field = PetalField::new(PetalParams {
            spawn_chance: 0.0,
            ..PetalParams::default()
        });
        let mut rng = seeded(3);
        let mut surface = RecordingSurface::new(600.0, 500.0);
        field.seed(600.0, &mut rng);
        field.frame(&mut surface, &mut rng);
        assert_eq!(surface.clears(), 1);
        assert_eq!(surface.fills(), 20);
    }

    #[test]
    fn test_spawn_only_under_cap() {
        let params = PetalParams {
            max_petals: 3,
            initial_petals: 0,
            ..PetalParams::default()
        };
        // Always win the spawn roll.
        let mut rng = Scripted::new(&[0.0]);
        let mut field = PetalField::new(params);
        let mut surface = RecordingSurface::new(100.0, 1_000.0);
        for _ in 0..10 {
            field.frame(&mut surface, &mut rng);
        }
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_petal_leaving_bottom_is_replaced_in_place() {
        let mut field = PetalField::new(PetalParams {
            initial_petals: 1,
            spawn_chance: 0.0,
            ..PetalParams::default()
        });
        let mut rng = seeded(4);
        let mut surface = RecordingSurface::new(200.0, 20.0);
        field.seed(200.0, &mut rng);
        let mut frames = 0;
        while field.respawned() == 0 {
            field.frame(&mut surface, &mut rng);
            frames += 1;
            assert!(frames < 1_000, "petal never left the surface");
        }
        assert_eq!(field.len(), 1);
        assert_eq!(field.petals()[0].y, -10.0);
    }
}
