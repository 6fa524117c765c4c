#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Budget-gated sink that caps the number of actions emitted per turn.

use arena_warden_core::{HeroOrder, MAX_COMMANDS_PER_TURN};

/// Per-turn action counter with a fixed ceiling.
///
/// The budget is owned by a single decision pass and reset at its start.
/// Orders beyond the ceiling are dropped and logged rather than emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandBudget {
    ceiling: usize,
    issued: usize,
    dropped: usize,
}

impl CommandBudget {
    /// Creates a budget allowing `ceiling` actions per turn.
    #[must_use]
    pub const fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            issued: 0,
            dropped: 0,
        }
    }

    /// Starts a new turn with an empty counter.
    pub fn reset(&mut self) {
        self.issued = 0;
        self.dropped = 0;
    }

    /// Emits `order` into `out` unless the ceiling has been reached.
    ///
    /// Returns whether the order was emitted. A dropped order leaves the
    /// counter untouched.
    pub fn issue(&mut self, order: HeroOrder, out: &mut Vec<HeroOrder>) -> bool {
        if self.issued >= self.ceiling {
            self.dropped += 1;
            tracing::warn!(
                hero = order.hero.index(),
                issued = self.issued,
                ceiling = self.ceiling,
                action = ?order.action,
                "command limit exceeded for round, dropping action"
            );
            return false;
        }

        out.push(order);
        self.issued += 1;
        true
    }

    /// Number of orders emitted this turn.
    #[must_use]
    pub const fn issued(&self) -> usize {
        self.issued
    }

    /// Number of orders dropped this turn.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Maximum number of orders per turn.
    #[must_use]
    pub const fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Orders that may still be emitted this turn.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.ceiling.saturating_sub(self.issued)
    }
}

impl Default for CommandBudget {
    fn default() -> Self {
        Self::new(MAX_COMMANDS_PER_TURN)
    }
}
