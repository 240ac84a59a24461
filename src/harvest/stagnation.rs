//! Completion policy for the harvesting loop.
//!
//! The page never says "that was everything". Exhaustion has to be inferred
//! from the content extent refusing to grow over enough consecutive cycles,
//! with a hard cycle ceiling underneath so a pathological page can never
//! hold the loop hostage.

use crate::harvest::growth::GrowthOutcome;

/// Whether the loop should keep harvesting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Done,
}

impl Verdict {
    pub fn is_done(self) -> bool {
        matches!(self, Verdict::Done)
    }
}

/// Counts consecutive no-growth cycles and total cycles.
///
/// A cycle is stagnant when the extent did not change and no "load more"
/// affordance was activated. An activated affordance legitimately needs a
/// cycle or two before new content shows up in the extent, so an expansion
/// resets the streak even without visible growth.
#[derive(Debug)]
pub struct CompletionPolicy {
    stagnant_limit: u32,
    max_cycles: u32,
    streak: u32,
    cycles: u32,
}

impl CompletionPolicy {
    pub fn new(stagnant_limit: u32, max_cycles: u32) -> Self {
        Self {
            stagnant_limit,
            max_cycles,
            streak: 0,
            cycles: 0,
        }
    }

    /// Feeds one cycle observation and rules on whether to continue.
    pub fn observe(&mut self, outcome: GrowthOutcome) -> Verdict {
        self.cycles += 1;
        if outcome.after == outcome.before && !outcome.expanded {
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        if self.streak >= self.stagnant_limit || self.cycles >= self.max_cycles {
            Verdict::Done
        } else {
            Verdict::Continue
        }
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}
