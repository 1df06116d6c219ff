//! Confetti cannons for the unlock and celebration moments.
//!
//! Each [`Cannon`] sprays a cone of paper pieces from a point given in surface
//! fractions. Pieces fly along their launch angle, slow down by `decay` every
//! frame, fall under gravity, flutter (wobble + tilt) and fade out over their
//! tick budget. Streams re-fire the two side cannons every frame until a
//! deadline.

use std::f64::consts::PI;

use crate::rng::RandomSource;
use crate::surface::{Placement, Point, Rgba, Surface, rect_path};

pub const PARTY_COLORS: &[&str] = &["#ffc0cb", "#ffd700", "#ffffff", "#ff69b4"];

#[derive(Clone, Debug, PartialEq)]
pub struct Cannon {
    /// Launch direction in degrees, counter-clockwise from the positive x axis.
    pub angle_deg: f64,
    pub spread_deg: f64,
    pub count: usize,
    /// Origin as fractions of the surface size.
    pub origin: (f64, f64),
    pub colors: Vec<Rgba>,
    pub start_velocity: f64,
    pub decay: f64,
    pub gravity: f64,
    pub scalar: f64,
    pub ticks: u32,
}

impl Default for Cannon {
    fn default() -> Self {
        Self {
            angle_deg: 90.0,
            spread_deg: 45.0,
            count: 50,
            origin: (0.5, 0.5),
            colors: PARTY_COLORS.iter().map(|c| Rgba::from_hex(c)).collect(),
            start_velocity: 45.0,
            decay: 0.9,
            gravity: 1.0,
            scalar: 1.0,
            ticks: 200,
        }
    }
}

impl Cannon {
    /// Left-edge cannon aimed up and to the right.
    pub fn left_side(count: usize) -> Self {
        Self {
            angle_deg: 60.0,
            spread_deg: 55.0,
            count,
            origin: (0.0, 0.5),
            ..Self::default()
        }
    }

    /// Right-edge cannon aimed up and to the left.
    pub fn right_side(count: usize) -> Self {
        Self {
            angle_deg: 120.0,
            spread_deg: 55.0,
            count,
            origin: (1.0, 0.5),
            ..Self::default()
        }
    }
}

fn colors(hex: &[&str]) -> Vec<Rgba> {
    hex.iter().map(|c| Rgba::from_hex(c)).collect()
}

/// The five-cannon burst behind the "Celebration Blast" button.
pub fn celebration_blast() -> Vec<Cannon> {
    const TOTAL: f64 = 500.0;
    let base = Cannon {
        origin: (0.5, 0.7),
        ..Cannon::default()
    };
    let share = |ratio: f64| (TOTAL * ratio).floor() as usize;
    vec![
        Cannon {
            count: share(0.25),
            spread_deg: 26.0,
            start_velocity: 55.0,
            colors: colors(&["#ffc0cb", "#ff69b4"]),
            ..base.clone()
        },
        Cannon {
            count: share(0.2),
            spread_deg: 60.0,
            colors: colors(&["#ffffff", "#ffd700"]),
            ..base.clone()
        },
        Cannon {
            count: share(0.35),
            spread_deg: 100.0,
            decay: 0.91,
            scalar: 0.8,
            colors: colors(&["#ffc0cb", "#ff69b4", "#ffd700"]),
            ..base.clone()
        },
        Cannon {
            count: share(0.1),
            spread_deg: 120.0,
            start_velocity: 25.0,
            decay: 0.92,
            scalar: 1.2,
            colors: colors(&["#ffffff"]),
            ..base.clone()
        },
        Cannon {
            count: share(0.1),
            spread_deg: 120.0,
            start_velocity: 45.0,
            colors: colors(&["#ffc0cb"]),
            ..base
        },
    ]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    /// Screen-space heading in radians (y grows downward).
    pub heading: f64,
    pub decay: f64,
    pub gravity: f64,
    pub wobble: f64,
    pub wobble_speed: f64,
    pub tilt: f64,
    pub tick: u32,
    pub total_ticks: u32,
    pub color: Rgba,
    pub scalar: f64,
}

impl ConfettiPiece {
    fn step(&mut self) {
        self.x += self.heading.cos() * self.velocity;
        self.y += self.heading.sin() * self.velocity + self.gravity * 3.0;
        self.velocity *= self.decay;
        self.wobble += self.wobble_speed;
        self.tilt += 0.1;
        self.tick += 1;
    }

    pub fn is_done(&self) -> bool {
        self.tick >= self.total_ticks
    }

    pub fn fade(&self) -> f64 {
        1.0 - self.tick as f64 / self.total_ticks.max(1) as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Stream {
    until_ms: f64,
    per_cannon: usize,
}

pub struct ConfettiField {
    pieces: Vec<ConfettiPiece>,
    streams: Vec<Stream>,
    max_pieces: usize,
}

impl Default for ConfettiField {
    fn default() -> Self {
        Self::new(2_000)
    }
}

impl ConfettiField {
    pub fn new(max_pieces: usize) -> Self {
        Self {
            pieces: Vec::new(),
            streams: Vec::new(),
            max_pieces,
        }
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn is_idle(&self) -> bool {
        self.pieces.is_empty() && self.streams.is_empty()
    }

    /// Spawns one cannon's worth of pieces; silently truncated at the cap.
    pub fn fire<R: RandomSource + ?Sized>(
        &mut self,
        cannon: &Cannon,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> usize {
        let room = self.max_pieces.saturating_sub(self.pieces.len());
        let n = cannon.count.min(room);
        let center = cannon.angle_deg.to_radians();
        let half_spread = cannon.spread_deg.to_radians() / 2.0;
        for _ in 0..n {
            let color = if cannon.colors.is_empty() {
                Rgba::rgb(255.0, 255.0, 255.0)
            } else {
                let idx = rng.count(0, cannon.colors.len() as u32 - 1) as usize;
                cannon.colors[idx]
            };
            self.pieces.push(ConfettiPiece {
                x: cannon.origin.0 * width,
                y: cannon.origin.1 * height,
                velocity: cannon.start_velocity * 0.5 + rng.next_f64() * cannon.start_velocity,
                // Flip to screen space where y points down.
                heading: -(center + rng.range(-half_spread, half_spread)),
                decay: cannon.decay,
                gravity: cannon.gravity,
                wobble: rng.range(0.0, 10.0),
                wobble_speed: rng.range(0.05, 0.1),
                tilt: rng.range(0.0, PI),
                tick: 0,
                total_ticks: cannon.ticks,
                color,
                scalar: cannon.scalar,
            });
        }
        n
    }

    /// Fires both side cannons every frame until `until_ms`.
    pub fn stream(&mut self, until_ms: f64, per_cannon: usize) {
        self.streams.push(Stream {
            until_ms,
            per_cannon,
        });
    }

    /// Stops every running stream. Pieces already in flight keep falling.
    pub fn cancel_streams(&mut self) {
        self.streams.clear();
    }

    /// Advances one frame. Returns whether anything is still live.
    pub fn frame<S, R>(&mut self, now_ms: f64, surface: &mut S, rng: &mut R) -> bool
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
    {
        let (width, height) = surface.size();
        self.streams.retain(|s| now_ms < s.until_ms);
        let bursts: Vec<usize> = self.streams.iter().map(|s| s.per_cannon).collect();
        for per_cannon in bursts {
            self.fire(&Cannon::left_side(per_cannon), width, height, rng);
            self.fire(&Cannon::right_side(per_cannon), width, height, rng);
        }

        surface.clear();
        self.pieces.retain_mut(|piece| {
            piece.step();
            !piece.is_done() && piece.y < height + 40.0
        });
        for piece in &self.pieces {
            let w = 10.0 * piece.scalar;
            // Wobble narrows the piece as it flips over.
            let h = w * (0.35 + 0.65 * piece.wobble.cos().abs());
            surface.fill_path(
                Placement::rotated(Point::new(piece.x, piece.y), piece.tilt),
                &rect_path(w, h),
                piece.color.with_alpha(piece.fade()),
            );
        }
        !self.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_blast_shares_add_up() {
        let total: usize = celebration_blast().iter().map(|c| c.count).sum();
        assert_eq!(total, 125 + 100 + 175 + 50 + 50);
    }

    #[test]
    fn test_fire_is_capped() {
        let mut field = ConfettiField::new(30);
        let mut rng = seeded(1);
        assert_eq!(field.fire(&Cannon::left_side(20), 800.0, 600.0, &mut rng), 20);
        assert_eq!(field.fire(&Cannon::left_side(20), 800.0, 600.0, &mut rng), 10);
        assert_eq!(field.pieces().len(), 30);
    }

    #[test]
    fn test_side_cannons_start_on_edges_and_head_up() {
        let mut field = ConfettiField::default();
        let mut rng = seeded(2);
        field.fire(&Cannon::left_side(10), 800.0, 600.0, &mut rng);
        field.fire(&Cannon::right_side(10), 800.0, 600.0, &mut rng);
        let (left, right) = field.pieces().split_at(10);
        for p in left {
            assert_eq!((p.x, p.y), (0.0, 300.0));
            assert!(p.heading.cos() > 0.0, "left cannon aims right");
            assert!(p.heading.sin() < 0.0, "aims upward");
        }
        for p in right {
            assert_eq!(p.x, 800.0);
            assert!(p.heading.cos() < 0.0, "right cannon aims left");
        }
    }

    #[test]
    fn test_stream_stops_at_deadline_and_field_drains() {
        let mut field = ConfettiField::default();
        let mut rng = seeded(3);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        field.stream(100.0, 3);
        assert!(field.frame(0.0, &mut surface, &mut rng));
        assert_eq!(field.pieces().len(), 6);
        field.frame(50.0, &mut surface, &mut rng);
        assert_eq!(field.pieces().len(), 12);
        // Past the deadline nothing new is fired.
        field.frame(100.0, &mut surface, &mut rng);
        assert!(field.pieces().len() <= 12);
        let mut t = 100.0;
        while field.frame(t, &mut surface, &mut rng) {
            t += 16.0;
            assert!(t < 100.0 + 16.0 * 500.0, "confetti never settled");
        }
        assert!(field.is_idle());
    }

    #[test]
    fn test_cancelled_stream_fires_no_more() {
        let mut field = ConfettiField::default();
        let mut rng = seeded(6);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        field.stream(5_000.0, 3);
        field.frame(0.0, &mut surface, &mut rng);
        assert_eq!(field.pieces().len(), 6);

        field.cancel_streams();
        field.stream(4_000.0, 5);
        field.frame(16.0, &mut surface, &mut rng);
        // Only the new stream fired: 5 per cannon.
        assert_eq!(field.pieces().len(), 6 + 10);

        field.frame(4_500.0, &mut surface, &mut rng);
        assert_eq!(field.pieces().len(), 16);

        field.stream(10_000.0, 2);
        field.cancel_streams();
        field.frame(4_516.0, &mut surface, &mut rng);
        assert_eq!(field.pieces().len(), 16);
    }

    #[test]
    fn test_pieces_fade_out() {
        let mut field = ConfettiField::default();
        let mut rng = seeded(4);
        field.fire(&Cannon::default(), 100.0, 100.0, &mut rng);
        let mut p = field.pieces()[0];
        assert_eq!(p.fade(), 1.0);
        for _ in 0..100 {
            p.step();
        }
        assert!((p.fade() - 0.5).abs() < 1e-9);
    }
}
