//! Idle Prompt Scheduler
//!
//! While the drawer is open, every `interval` there is a `probability`
//! chance of showing a short call-to-action bubble. Each candidate is shown
//! at most once per session: candidates live in a fixed arena and are drawn
//! without replacement from an index set, so a seeded RNG gives a fully
//! reproducible sequence.
//!
//! A shown bubble hides itself `visible_for` later whatever else happens.
//! Once the pool is empty nothing is ever shown again.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default call-to-action candidates
pub const DEFAULT_PROMPTS: &[&str] = &[
    "Psst! Want to hear about my coolest project?",
    "I'm better at React than flirting, but I try both!",
    "Ask me anything! Except algorithms before coffee...",
    "Want to know what tech makes me excited?",
    "I can talk code all day. Try me!",
    "Need a developer? Or just a good tech joke?",
];

/// Idle prompt settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Whether idle prompts are shown at all
    pub enabled: bool,
    /// Time between draw attempts, in milliseconds
    pub interval_ms: u64,
    /// Chance (0.0-1.0) that a draw attempt shows a prompt
    pub probability: f64,
    /// How long a shown prompt stays visible, in milliseconds
    pub visible_ms: u64,
    /// Candidate pool
    pub prompts: Vec<String>,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 8_000,
            probability: 0.3,
            visible_ms: 5_000,
            prompts: DEFAULT_PROMPTS.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// Change to the visible bubble produced by a tick
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdleUpdate {
    /// Show this prompt (replacing any visible one)
    Shown(String),
    /// Hide the visible prompt
    Hidden,
}

#[derive(Clone, Copy, Debug)]
struct VisiblePrompt {
    index: usize,
    hide_at: Instant,
}

/// Draw-without-replacement prompt scheduler
#[derive(Debug)]
pub struct IdlePromptScheduler {
    interval: Duration,
    probability: f64,
    visible_for: Duration,
    /// Arena of candidates, never mutated
    pool: Vec<String>,
    /// Indices into `pool` not yet shown
    remaining: Vec<usize>,
    rng: StdRng,
    /// Next draw attempt; `None` while paused
    next_draw: Option<Instant>,
    visible: Option<VisiblePrompt>,
}

impl IdlePromptScheduler {
    /// Create a scheduler seeded from OS entropy
    #[must_use]
    pub fn new(config: &IdleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a scheduler with a fixed seed
    #[must_use]
    pub fn with_seed(config: &IdleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &IdleConfig, rng: StdRng) -> Self {
        let pool = if config.enabled {
            config.prompts.clone()
        } else {
            Vec::new()
        };
        let remaining = (0..pool.len()).collect();

        Self {
            interval: Duration::from_millis(config.interval_ms.max(1)),
            probability: config.probability.clamp(0.0, 1.0),
            visible_for: Duration::from_millis(config.visible_ms),
            pool,
            remaining,
            rng,
            next_draw: None,
            visible: None,
        }
    }

    /// Start (or keep) the draw clock; called when the drawer opens
    pub fn resume(&mut self, now: Instant) {
        if self.next_draw.is_none() {
            self.next_draw = Some(now + self.interval);
        }
    }

    /// Stop drawing; called when the drawer closes
    ///
    /// A visible prompt still hides on its own schedule.
    pub fn pause(&mut self) {
        self.next_draw = None;
    }

    /// Whether the draw clock is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_draw.is_some()
    }

    /// Currently visible prompt
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.visible.map(|v| self.pool[v.index].as_str())
    }

    /// Number of candidates not yet shown
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Whether every candidate has been shown
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Advance to `now`
    pub fn tick(&mut self, now: Instant) -> Vec<IdleUpdate> {
        let mut updates = Vec::new();

        if let Some(visible) = self.visible {
            if now >= visible.hide_at {
                self.visible = None;
                updates.push(IdleUpdate::Hidden);
            }
        }

        let Some(due) = self.next_draw else {
            return updates;
        };
        if now < due {
            return updates;
        }

        // One attempt per due tick; a stalled caller does not get a burst
        let next = due + self.interval;
        self.next_draw = Some(if next > now { next } else { now + self.interval });

        if let Some(text) = self.try_draw(now) {
            updates.push(IdleUpdate::Shown(text));
        }

        updates
    }

    fn try_draw(&mut self, now: Instant) -> Option<String> {
        if self.remaining.is_empty() || !self.rng.gen_bool(self.probability) {
            return None;
        }

        let slot = self.rng.gen_range(0..self.remaining.len());
        let index = self.remaining.swap_remove(slot);
        self.visible = Some(VisiblePrompt {
            index,
            hide_at: now + self.visible_for,
        });

        tracing::trace!(
            prompt = index,
            remaining = self.remaining.len(),
            "Idle prompt drawn"
        );
        Some(self.pool[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn always() -> IdleConfig {
        IdleConfig {
            probability: 1.0,
            ..Default::default()
        }
    }

    fn shown(updates: &[IdleUpdate]) -> Vec<String> {
        updates
            .iter()
            .filter_map(|u| match u {
                IdleUpdate::Shown(text) => Some(text.clone()),
                IdleUpdate::Hidden => None,
            })
            .collect()
    }

    #[test]
    fn test_nothing_before_first_interval() {
        let t0 = Instant::now();
        let mut idle = IdlePromptScheduler::with_seed(&always(), 1);
        idle.resume(t0);

        assert!(idle.tick(t0 + Duration::from_millis(7_999)).is_empty());
        assert_eq!(shown(&idle.tick(t0 + Duration::from_secs(8))).len(), 1);
    }

    #[test]
    fn test_every_prompt_once_then_exhausted() {
        let t0 = Instant::now();
        let mut idle = IdlePromptScheduler::with_seed(&always(), 7);
        idle.resume(t0);

        let mut seen = Vec::new();
        for i in 1..=20u64 {
            seen.extend(shown(&idle.tick(t0 + Duration::from_secs(8 * i))));
        }

        assert_eq!(seen.len(), DEFAULT_PROMPTS.len());
        let unique: HashSet<_> = seen.iter().collect();
        assert_eq!(unique.len(), DEFAULT_PROMPTS.len());
        assert!(idle.is_exhausted());

        for i in 21..=40u64 {
            assert!(shown(&idle.tick(t0 + Duration::from_secs(8 * i))).is_empty());
        }
    }

    #[test]
    fn test_prompt_hides_after_visible_period() {
        let t0 = Instant::now();
        let mut idle = IdlePromptScheduler::with_seed(&always(), 3);
        idle.resume(t0);

        let shown_at = t0 + Duration::from_secs(8);
        let updates = idle.tick(shown_at);
        assert_eq!(shown(&updates).len(), 1);
        assert!(idle.current().is_some());

        assert!(idle.tick(shown_at + Duration::from_millis(4_999)).is_empty());
        assert_eq!(
            idle.tick(shown_at + Duration::from_secs(5)),
            vec![IdleUpdate::Hidden]
        );
        assert!(idle.current().is_none());
    }

    #[test]
    fn test_paused_scheduler_draws_nothing_but_still_hides() {
        let t0 = Instant::now();
        let mut idle = IdlePromptScheduler::with_seed(&always(), 3);
        idle.resume(t0);
        idle.tick(t0 + Duration::from_secs(8));
        idle.pause();
        assert!(!idle.is_running());

        let updates = idle.tick(t0 + Duration::from_secs(60));
        assert_eq!(updates, vec![IdleUpdate::Hidden]);
        assert_eq!(idle.remaining(), DEFAULT_PROMPTS.len() - 1);
    }

    #[test]
    fn test_zero_probability_never_shows() {
        let t0 = Instant::now();
        let config = IdleConfig {
            probability: 0.0,
            ..Default::default()
        };
        let mut idle = IdlePromptScheduler::with_seed(&config, 9);
        idle.resume(t0);
        for i in 1..=50u64 {
            assert!(idle.tick(t0 + Duration::from_secs(8 * i)).is_empty());
        }
        assert_eq!(idle.remaining(), DEFAULT_PROMPTS.len());
    }

    #[test]
    fn test_same_seed_same_order() {
        let t0 = Instant::now();
        let config = IdleConfig {
            probability: 0.5,
            ..Default::default()
        };
        let run = |seed| {
            let mut idle = IdlePromptScheduler::with_seed(&config, seed);
            idle.resume(t0);
            (1..=30u64)
                .flat_map(|i| shown(&idle.tick(t0 + Duration::from_secs(8 * i))))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_disabled_pool_is_empty() {
        let config = IdleConfig {
            enabled: false,
            probability: 1.0,
            ..Default::default()
        };
        let idle = IdlePromptScheduler::with_seed(&config, 0);
        assert!(idle.is_exhausted());
    }
}
