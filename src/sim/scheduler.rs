//! One-shot deferred effects
//!
//! Effects scheduled during a run carry that run's id. They are not cancelled
//! on game over or restart; whoever applies them must compare the id against
//! the current run and drop stale ones.

use glam::IVec2;

use super::grid::Direction;
use super::state::ProjectileKind;

/// Projectile materialization after its telegraph elapses
#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    /// Warning batch to clear; also becomes the projectile id
    pub batch_id: u32,
    pub kind: ProjectileKind,
    pub start: IVec2,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeferredEffect {
    LaunchProjectile(Launch),
}

/// A scheduled effect
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred {
    pub run_id: u32,
    pub due_ms: u64,
    pub effect: DeferredEffect,
}

/// Pending deferred effects, in scheduling order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, run_id: u32, due_ms: u64, effect: DeferredEffect) {
        self.pending.push(Deferred { run_id, due_ms, effect });
    }

    /// Remove and return every effect due at or before `now_ms`, oldest first
    pub fn take_due(&mut self, now_ms: u64) -> Vec<Deferred> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|d| d.due_ms <= now_ms);
        self.pending = pending;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deferred> {
        self.pending.iter()
    }
}
