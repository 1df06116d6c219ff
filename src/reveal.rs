//! Two-state flow controller: the countdown gates the reveal page.

use crate::timing::{CountdownTick, CountdownTracker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Countdown,
    Reveal,
}

#[derive(Clone, Debug)]
pub struct Orchestrator {
    stage: Stage,
    countdown: CountdownTracker,
}

impl Orchestrator {
    pub fn new(target_ms: i64) -> Self {
        Self {
            stage: Stage::Countdown,
            countdown: CountdownTracker::new(target_ms),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn target_ms(&self) -> i64 {
        self.countdown.target_ms()
    }

    /// Countdown tick; `None` once the reveal is showing (the countdown view and
    /// its timer are gone by then).
    pub fn tick(&mut self, now_ms: i64) -> Option<CountdownTick> {
        if self.stage != Stage::Countdown {
            return None;
        }
        let tick = self.countdown.tick(now_ms);
        if tick.just_expired {
            log::info!("event=countdown_expired module=reveal target_ms={}", self.target_ms());
        }
        Some(tick)
    }

    pub fn can_unlock(&self) -> bool {
        self.stage == Stage::Countdown && self.countdown.is_expired()
    }

    /// Switches to the reveal page. Only allowed after expiry, and only once.
    pub fn unlock(&mut self) -> bool {
        if !self.can_unlock() {
            return false;
        }
        self.stage = Stage::Reveal;
        log::info!("event=reveal_unlocked module=reveal");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_requires_expiry() {
        let mut o = Orchestrator::new(10_000);
        assert!(!o.unlock());
        o.tick(5_000);
        assert!(!o.can_unlock());
        assert!(!o.unlock());
        assert_eq!(o.stage(), Stage::Countdown);
    }

    #[test]
    fn test_unlock_once_after_expiry() {
        let mut o = Orchestrator::new(10_000);
        let t = o.tick(10_000).expect("counting down");
        assert!(t.just_expired);
        assert!(o.unlock());
        assert_eq!(o.stage(), Stage::Reveal);
        assert!(!o.unlock());
        assert_eq!(o.stage(), Stage::Reveal);
    }

    #[test]
    fn test_no_ticks_after_reveal() {
        let mut o = Orchestrator::new(0);
        o.tick(1);
        o.unlock();
        assert!(o.tick(2).is_none());
    }

    #[test]
    fn test_expiry_edge_reported_once() {
        let mut o = Orchestrator::new(100);
        let edges = (0..500)
            .step_by(10)
            .filter_map(|now| o.tick(now))
            .filter(|t| t.just_expired)
            .count();
        assert_eq!(edges, 1);
    }
}
