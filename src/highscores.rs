//! Best-record bookkeeping
//!
//! Each game keeps a single best value. Score and distance games want it as
//! high as possible; ReactionGate stores an average reaction time where lower
//! wins and 0 means "no record yet".

use serde::{Deserialize, Serialize};

/// How a new record compares against the stored best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOrder {
    HigherIsBetter,
    LowerIsBetter,
}

impl RecordOrder {
    /// Whether `candidate` replaces `best`
    pub fn improves(self, best: f64, candidate: f64) -> bool {
        if !candidate.is_finite() {
            return false;
        }
        match self {
            RecordOrder::HigherIsBetter => candidate > best,
            RecordOrder::LowerIsBetter => candidate > 0.0 && (best <= 0.0 || candidate < best),
        }
    }
}

/// The best value for one game, as shown next to the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestRecord {
    pub value: f64,
    pub order: RecordOrder,
}

impl BestRecord {
    pub fn new(value: f64, order: RecordOrder) -> Self {
        Self { value, order }
    }

    /// Check if a value would set a new record
    pub fn qualifies(&self, candidate: f64) -> bool {
        self.order.improves(self.value, candidate)
    }

    /// Offer a finished game's value; returns true when it became the best
    pub fn offer(&mut self, candidate: f64) -> bool {
        if !self.qualifies(candidate) {
            return false;
        }
        self.value = candidate;
        true
    }

    /// Whether anything has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }

    /// Display string (`-` when empty)
    pub fn display(&self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        match self.order {
            RecordOrder::HigherIsBetter => format!("{}", self.value.floor()),
            RecordOrder::LowerIsBetter => format!("{:.1}ms", self.value),
        }
    }
}
