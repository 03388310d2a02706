//! Bounded, newest-first record of committed conversions

use crate::core::panel::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Number of conversions kept by a session.
pub const HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEntry {
    pub id: Uuid,
    pub amount: f64,
    pub result: f64,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
}

impl ConversionEntry {
    pub fn new(amount: f64, result: f64, direction: Direction) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            result,
            direction,
            timestamp: Utc::now(),
        }
    }
}

/// Holds at most `CAP` entries, newest first. Pushing onto a full history
/// evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct History<const CAP: usize = HISTORY_CAPACITY> {
    entries: VecDeque<ConversionEntry>,
}

impl<const CAP: usize> History<CAP> {
    pub fn new() -> Self {
        const { assert!(CAP > 0, "history capacity must be non-zero") };
        Self {
            entries: VecDeque::with_capacity(CAP),
        }
    }

    /// Prepends `entry` and returns the evicted entry, if any.
    pub fn push(&mut self, entry: ConversionEntry) -> Option<ConversionEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > CAP {
            self.entries.pop_back()
        } else {
            None
        }
    }

    pub fn latest(&self) -> Option<&ConversionEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        CAP
    }

    pub fn to_vec(&self) -> Vec<ConversionEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl<const CAP: usize> Default for History<CAP> {
    fn default() -> Self {
        Self::new()
    }
}
