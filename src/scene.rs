//! The love-tree scene: a growing tree on one surface and falling petals on
//! another, with an explicit mounted / torn-down lifecycle so a cancelled scene
//! can never draw again.

use std::f64::consts::FRAC_PI_2;

use crate::petals::{PetalField, PetalParams};
use crate::rng::RandomSource;
use crate::surface::{Point, Surface};
use crate::tree::{Branch, TreeGrower, TreeParams};

pub const ROOT_X_FRACTION: f64 = 0.75;
pub const ROOT_LENGTH: f64 = 90.0;
pub const ROOT_WIDTH: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneState {
    Idle,
    Running,
    TornDown,
}

pub struct LoveTreeScene<R> {
    tree: TreeGrower,
    petals: PetalField,
    rng: R,
    state: SceneState,
}

impl<R: RandomSource> LoveTreeScene<R> {
    pub fn new(tree: TreeParams, petals: PetalParams, rng: R) -> Self {
        Self {
            tree: TreeGrower::new(tree),
            petals: PetalField::new(petals),
            rng,
            state: SceneState::Idle,
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn tree(&self) -> &TreeGrower {
        &self.tree
    }

    pub fn petals(&self) -> &PetalField {
        &self.petals
    }

    /// Plants the tree rooted on the bottom edge, three quarters across, and
    /// seeds the first petals. Ignored unless idle.
    pub fn start<T, P>(&mut self, now_ms: f64, tree_surface: &mut T, petal_surface: &mut P)
    where
        T: Surface + ?Sized,
        P: Surface + ?Sized,
    {
        if self.state != SceneState::Idle {
            return;
        }
        let (w, h) = tree_surface.size();
        tree_surface.clear();
        self.tree.plant(
            now_ms,
            Branch {
                origin: Point::new(w * ROOT_X_FRACTION, h),
                length: ROOT_LENGTH,
                angle: -FRAC_PI_2,
                width: ROOT_WIDTH,
            },
        );
        let (pw, _) = petal_surface.size();
        self.petals.seed(pw, &mut self.rng);
        self.state = SceneState::Running;
        log::info!("event=tree_start module=scene width={w} height={h}");
    }

    /// Advances both animators. Returns `false` once torn down (or before
    /// start), in which case nothing was drawn.
    pub fn frame<T, P>(&mut self, now_ms: f64, tree_surface: &mut T, petal_surface: &mut P) -> bool
    where
        T: Surface + ?Sized,
        P: Surface + ?Sized,
    {
        if self.state != SceneState::Running {
            return false;
        }
        if !self.tree.is_finished() {
            self.tree.advance_to(now_ms, tree_surface, &mut self.rng);
            if self.tree.is_finished() {
                let stats = self.tree.stats();
                log::debug!(
                    "event=tree_done module=scene branches={} leaves={} hearts={}",
                    stats.branches,
                    stats.leaves,
                    stats.hearts
                );
            }
        }
        self.petals.frame(petal_surface, &mut self.rng);
        true
    }

    pub fn teardown(&mut self) {
        self.state = SceneState::TornDown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::surface::RecordingSurface;

    fn scene() -> LoveTreeScene<rand::rngs::SmallRng> {
        LoveTreeScene::new(TreeParams::default(), PetalParams::default(), seeded(9))
    }

    #[test]
    fn test_frame_before_start_draws_nothing() {
        let mut s = scene();
        let mut tree = RecordingSurface::new(800.0, 500.0);
        let mut petals = RecordingSurface::new(800.0, 500.0);
        assert!(!s.frame(0.0, &mut tree, &mut petals));
        assert!(tree.ops.is_empty() && petals.ops.is_empty());
    }

    #[test]
    fn test_root_planted_three_quarters_across() {
        let mut s = scene();
        let mut tree = RecordingSurface::new(800.0, 500.0);
        let mut petals = RecordingSurface::new(800.0, 500.0);
        s.start(0.0, &mut tree, &mut petals);
        assert!(s.frame(0.0, &mut tree, &mut petals));
        let first_line = tree.ops.iter().find_map(|op| match op {
            crate::surface::DrawOp::Line { from, to, width, .. } => Some((*from, *to, *width)),
            _ => None,
        });
        let (from, to, width) = first_line.expect("root drawn");
        assert_eq!(from, Point::new(600.0, 500.0));
        assert!((to.y - 410.0).abs() < 1e-9);
        assert_eq!(width, ROOT_WIDTH);
        assert_eq!(s.petals().len(), 20);
    }

    #[test]
    fn test_teardown_stops_all_drawing() {
        let mut s = scene();
        let mut tree = RecordingSurface::new(800.0, 500.0);
        let mut petals = RecordingSurface::new(800.0, 500.0);
        s.start(0.0, &mut tree, &mut petals);
        for i in 0..10 {
            assert!(s.frame(i as f64 * 16.0, &mut tree, &mut petals));
        }
        s.teardown();
        tree.take();
        petals.take();
        for i in 10..100 {
            assert!(!s.frame(i as f64 * 16.0, &mut tree, &mut petals));
        }
        assert!(tree.ops.is_empty());
        assert!(petals.ops.is_empty());
        assert_eq!(s.state(), SceneState::TornDown);
    }

    #[test]
    fn test_start_is_fire_once() {
        let mut s = scene();
        let mut tree = RecordingSurface::new(800.0, 500.0);
        let mut petals = RecordingSurface::new(800.0, 500.0);
        s.start(0.0, &mut tree, &mut petals);
        s.frame(1_000.0, &mut tree, &mut petals);
        let grown = s.tree().stats().branches;
        s.start(2_000.0, &mut tree, &mut petals);
        assert_eq!(s.tree().stats().branches, grown);
    }
}
