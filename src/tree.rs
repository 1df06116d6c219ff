//! Procedural "love tree" grown in virtual time.
//!
//! Growth is sequential on screen: each level of branches appears a moment after
//! its parent and every twig ends in a delayed cluster of hearts. Instead of real
//! recursion with timers, pending work sits in a queue keyed by virtual due time
//! and [`TreeGrower::advance_to`] drains whatever is due. Given the same seed and
//! the same sequence of `advance_to` calls the drawing is identical.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::FRAC_PI_4;

use crate::rng::RandomSource;
use crate::surface::{Placement, Point, Rgba, Surface, heart_path};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeParams {
    /// Branches at or below this length stop forking and blossom instead.
    pub termination_length: f64,
    pub child_length_min: f64,
    pub child_length_max: f64,
    /// Max absolute turn of a child relative to its parent (radians).
    pub max_turn: f64,
    pub width_decay: f64,
    pub children_min: u32,
    pub children_max: u32,
    pub grow_delay_ms: f64,
    pub bloom_delay_min_ms: f64,
    pub bloom_delay_max_ms: f64,
    pub bloom_min: u32,
    pub bloom_max: u32,
    pub bloom_scatter: f64,
    pub heart_size_min: f64,
    pub heart_size_max: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            termination_length: 8.0,
            child_length_min: 0.7,
            child_length_max: 0.8,
            max_turn: FRAC_PI_4,
            width_decay: 0.7,
            children_min: 2,
            children_max: 3,
            grow_delay_ms: 150.0,
            bloom_delay_min_ms: 200.0,
            bloom_delay_max_ms: 700.0,
            bloom_min: 6,
            bloom_max: 11,
            bloom_scatter: 15.0,
            heart_size_min: 4.0,
            heart_size_max: 10.0,
        }
    }
}

/// One segment of the tree; exists only while its grow task is pending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub origin: Point,
    pub length: f64,
    /// Radians; `-PI/2` points up.
    pub angle: f64,
    pub width: f64,
}

impl Branch {
    pub fn end(&self) -> Point {
        self.origin.along(self.angle, self.length)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrowthEvent {
    Branched { length: f64, children: u32 },
    Leaf { length: f64 },
    Bloomed { hearts: u32 },
}

#[derive(Clone, Copy, Debug)]
enum Task {
    Grow(Branch),
    Bloom(Point),
}

#[derive(Debug)]
struct Pending {
    due_ms: f64,
    seq: u64,
    task: Task,
}

// Min-heap on (due_ms, seq) so equal due times drain in insertion order.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthStats {
    pub branches: u32,
    pub leaves: u32,
    pub hearts: u32,
}

pub struct TreeGrower {
    params: TreeParams,
    queue: BinaryHeap<Pending>,
    next_seq: u64,
    clock_ms: f64,
    stats: GrowthStats,
}

impl TreeGrower {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            queue: BinaryHeap::new(),
            next_seq: 0,
            clock_ms: 0.0,
            stats: GrowthStats::default(),
        }
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    pub fn stats(&self) -> GrowthStats {
        self.stats
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    /// Discards pending work and schedules a new root at `now_ms`.
    pub fn plant(&mut self, now_ms: f64, root: Branch) {
        self.queue.clear();
        self.stats = GrowthStats::default();
        self.clock_ms = now_ms;
        self.schedule(now_ms, Task::Grow(root));
    }

    /// Runs every task due at or before `now_ms`, in due order. Tasks scheduled
    /// while draining are run too if they also fall due.
    pub fn advance_to<S, R>(&mut self, now_ms: f64, surface: &mut S, rng: &mut R) -> Vec<GrowthEvent>
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
    {
        let mut events = Vec::new();
        while self.queue.peek().is_some_and(|p| p.due_ms <= now_ms) {
            let Some(next) = self.queue.pop() else { break };
            // Children are scheduled relative to when their parent was drawn.
            self.clock_ms = next.due_ms;
            let event = match next.task {
                Task::Grow(branch) => self.grow(branch, surface, rng),
                Task::Bloom(at) => self.bloom(at, surface, rng),
            };
            events.push(event);
        }
        self.clock_ms = self.clock_ms.max(now_ms);
        events
    }

    fn schedule(&mut self, due_ms: f64, task: Task) {
        self.queue.push(Pending {
            due_ms,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    fn grow<S, R>(&mut self, branch: Branch, surface: &mut S, rng: &mut R) -> GrowthEvent
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
    {
        let end = branch.end();
        let bark = Rgba::rgb(
            rng.range(100.0, 150.0),
            rng.range(60.0, 90.0),
            rng.range(30.0, 50.0),
        );
        surface.stroke_line(branch.origin, end, branch.width, bark);
        self.stats.branches += 1;

        let p = &self.params;
        if branch.length > p.termination_length {
            let children = rng.count(p.children_min, p.children_max);
            let due = self.clock_ms + p.grow_delay_ms;
            let (lmin, lmax, turn, decay) =
                (p.child_length_min, p.child_length_max, p.max_turn, p.width_decay);
            for _ in 0..children {
                let child = Branch {
                    origin: end,
                    length: branch.length * rng.range(lmin, lmax),
                    angle: branch.angle + rng.range(-turn, turn),
                    width: branch.width * decay,
                };
                self.schedule(due, Task::Grow(child));
            }
            GrowthEvent::Branched {
                length: branch.length,
                children,
            }
        } else {
            let due = self.clock_ms + rng.range(p.bloom_delay_min_ms, p.bloom_delay_max_ms);
            self.schedule(due, Task::Bloom(end));
            self.stats.leaves += 1;
            GrowthEvent::Leaf {
                length: branch.length,
            }
        }
    }

    fn bloom<S, R>(&mut self, at: Point, surface: &mut S, rng: &mut R) -> GrowthEvent
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
    {
        let p = &self.params;
        let hearts = rng.count(p.bloom_min, p.bloom_max);
        let scatter = p.bloom_scatter;
        let (smin, smax) = (p.heart_size_min, p.heart_size_max);
        for _ in 0..hearts {
            let center = Point::new(
                at.x + rng.range(-scatter, scatter),
                at.y + rng.range(-scatter, scatter),
            );
            let size = rng.range(smin, smax);
            let pink = Rgba::rgba(255.0, rng.range(100.0, 160.0), rng.range(140.0, 200.0), 0.9);
            surface.fill_path(Placement::at(center), &heart_path(size), pink);
        }
        self.stats.hearts += hearts;
        GrowthEvent::Bloomed { hearts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{seeded, testing::Scripted};
    use crate::surface::RecordingSurface;
    use std::f64::consts::FRAC_PI_2;

    fn root() -> Branch {
        Branch {
            origin: Point::new(300.0, 500.0),
            length: 90.0,
            angle: -FRAC_PI_2,
            width: 10.0,
        }
    }

    #[test]
    fn test_root_draws_immediately_and_children_wait() {
        let mut grower = TreeGrower::new(TreeParams::default());
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let mut rng = seeded(3);
        grower.plant(1_000.0, root());
        let events = grower.advance_to(1_000.0, &mut surface, &mut rng);
        assert_eq!(events.len(), 1);
        assert_eq!(surface.lines(), 1);
        let GrowthEvent::Branched { children, .. } = events[0] else {
            panic!("root must fork");
        };
        assert_eq!(grower.pending(), children as usize);
        // Nothing else is due before the growth delay.
        assert!(grower.advance_to(1_149.0, &mut surface, &mut rng).is_empty());
        assert_eq!(grower.advance_to(1_150.0, &mut surface, &mut rng).len(), children as usize);
    }

    #[test]
    fn test_full_growth_structure() {
        let mut grower = TreeGrower::new(TreeParams::default());
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let mut rng = seeded(11);
        grower.plant(0.0, root());
        let events = grower.advance_to(f64::MAX, &mut surface, &mut rng);
        assert!(grower.is_finished());

        let mut forks = 0u32;
        let mut leaves = 0u32;
        let mut blooms = 0u32;
        let mut hearts = 0u32;
        for ev in &events {
            match *ev {
                GrowthEvent::Branched { length, children } => {
                    assert!(length > 8.0);
                    assert!((2..=3).contains(&children));
                    forks += children;
                }
                GrowthEvent::Leaf { length } => {
                    assert!(length <= 8.0);
                    leaves += 1;
                }
                GrowthEvent::Bloomed { hearts: h } => {
                    assert!((6..=11).contains(&h));
                    blooms += 1;
                    hearts += h;
                }
            }
        }
        let stats = grower.stats();
        // Every branch except the root was spawned by a fork.
        assert_eq!(stats.branches, forks + 1);
        assert_eq!(leaves, blooms);
        assert_eq!(stats.leaves, leaves);
        assert_eq!(stats.hearts, hearts);
        assert_eq!(surface.lines() as u32, stats.branches);
        assert_eq!(surface.fills() as u32, hearts);
    }

    #[test]
    fn test_short_root_blooms_without_branching() {
        let mut grower = TreeGrower::new(TreeParams::default());
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut rng = seeded(5);
        grower.plant(
            0.0,
            Branch {
                length: 8.0,
                ..root()
            },
        );
        let events = grower.advance_to(10_000.0, &mut surface, &mut rng);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GrowthEvent::Leaf { .. }));
        assert!(matches!(events[1], GrowthEvent::Bloomed { hearts } if hearts >= 6));
        assert_eq!(surface.lines(), 1);
    }

    #[test]
    fn test_child_count_follows_draw() {
        let params = TreeParams::default();
        // Three draws colour the bark, the fourth picks the child count.
        let mut low = Scripted::new(&[0.5, 0.5, 0.5, 0.0, 0.5]);
        let mut grower = TreeGrower::new(params.clone());
        let mut surface = RecordingSurface::new(10.0, 10.0);
        grower.plant(0.0, root());
        let ev = grower.advance_to(0.0, &mut surface, &mut low);
        assert!(matches!(ev[0], GrowthEvent::Branched { children: 2, .. }));

        let mut high = Scripted::new(&[0.5, 0.5, 0.5, 0.99]);
        let mut grower = TreeGrower::new(params);
        grower.plant(0.0, root());
        let ev = grower.advance_to(0.0, &mut surface, &mut high);
        assert!(matches!(ev[0], GrowthEvent::Branched { children: 3, .. }));
    }

    #[test]
    fn test_same_seed_same_drawing() {
        let run = |seed| {
            let mut grower = TreeGrower::new(TreeParams::default());
            let mut surface = RecordingSurface::new(400.0, 500.0);
            let mut rng = seeded(seed);
            grower.plant(0.0, root());
            for t in (0..5_000).step_by(16) {
                grower.advance_to(t as f64, &mut surface, &mut rng);
            }
            surface.ops
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_replant_discards_pending_work() {
        let mut grower = TreeGrower::new(TreeParams::default());
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let mut rng = seeded(8);
        grower.plant(0.0, root());
        grower.advance_to(400.0, &mut surface, &mut rng);
        assert!(grower.pending() > 0);
        grower.plant(
            500.0,
            Branch {
                length: 4.0,
                ..root()
            },
        );
        assert_eq!(grower.pending(), 1);
        assert_eq!(grower.stats(), GrowthStats::default());
    }
}
