//! Deadline Sequencer
//!
//! A poll-driven timer queue. Steps are scheduled once, at an absolute due
//! instant, and popped when the caller's clock reaches them. Nothing here
//! sleeps or spawns: the surface polls once per frame and may wait until
//! [`Sequencer::next_deadline`].
//!
//! Ordering is by due instant, then by scheduling order, so steps sharing an
//! offset fire in the order the choreography lists them.
//!
//! Every entry remembers the generation that was current when it was
//! scheduled. [`Sequencer::advance_generation`] bumps the counter and drops
//! everything older, so a reset can never be touched by leftovers from the
//! previous session.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::choreography::{Cue, Step};

/// Exchange generation; incremented on every session reset
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// A cue whose time has come
#[derive(Clone, Debug, PartialEq)]
pub struct DueCue {
    /// When it was due (not when it was popped)
    pub due: Instant,
    /// What to apply
    pub cue: Cue,
}

#[derive(Debug)]
struct Entry {
    due: Instant,
    order: u64,
    generation: Generation,
    cue: Cue,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.order == other.order
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.order.cmp(&other.order))
    }
}

/// Deadline queue of choreography cues
#[derive(Debug, Default)]
pub struct Sequencer {
    queue: BinaryHeap<Reverse<Entry>>,
    generation: Generation,
    next_order: u64,
}

impl Sequencer {
    /// Create an empty sequencer at generation 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of queued cues
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedule `steps` relative to `start`
    pub fn schedule(&mut self, start: Instant, steps: impl IntoIterator<Item = Step>) {
        for step in steps {
            self.schedule_at(start + step.offset, step.cue);
        }
    }

    /// Schedule one cue at an absolute instant
    pub fn schedule_at(&mut self, due: Instant, cue: Cue) {
        let order = self.next_order;
        self.next_order += 1;
        self.queue.push(Reverse(Entry {
            due,
            order,
            generation: self.generation,
            cue,
        }));
    }

    /// Start a new generation, discarding everything queued
    pub fn advance_generation(&mut self) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        let dropped = self.queue.len();
        let current = self.generation;
        self.queue.retain(|Reverse(e)| e.generation == current);
        tracing::debug!(
            generation = %current,
            dropped = dropped - self.queue.len(),
            "Sequencer generation advanced"
        );
        current
    }

    /// Earliest due instant, if anything is queued
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.peek().map(|Reverse(e)| e.due)
    }

    /// Pop the earliest cue if it is due at `now`
    ///
    /// Stale entries (older generation) are skipped.
    pub fn pop_due(&mut self, now: Instant) -> Option<DueCue> {
        loop {
            let due = self.next_deadline()?;
            if due > now {
                return None;
            }
            let Reverse(entry) = self.queue.pop()?;
            if entry.generation != self.generation {
                tracing::trace!(generation = %entry.generation, "Discarding stale cue");
                continue;
            }
            return Some(DueCue {
                due: entry.due,
                cue: entry.cue,
            });
        }
    }
}
