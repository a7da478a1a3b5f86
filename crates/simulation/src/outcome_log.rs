//! Ring-buffer log of recent grid outcomes.
//!
//! Every placement, discard, recycle, planting, harvest, replay and refusal
//! is pushed into [`OutcomeLog`], so hosts and tests can see what happened
//! to a pointer gesture without diffing the ECS.

use bevy::prelude::*;
use serde::Serialize;

use crate::errors::GridError;
use crate::grid_frame::CellCoord;
use crate::inventory::PlaceableType;

/// Maximum number of entries retained in the ring buffer.
const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Placed {
        tile: Entity,
        cell: CellCoord,
        level: usize,
    },
    /// The tile overflowed its target cell and was despawned.
    Discarded {
        tile: Entity,
        cell: CellCoord,
        refunded: bool,
    },
    Recycled {
        tile: Entity,
        cell: Option<CellCoord>,
        item: PlaceableType,
    },
    Selected {
        tile: Entity,
    },
    Planted {
        crop: Entity,
        tile: Entity,
        kind: PlaceableType,
    },
    Harvested {
        crop: Entity,
        kind: PlaceableType,
        value: u32,
    },
    /// Occupancy was rebuilt after a frame rotation.
    Replayed {
        tiles: usize,
        evicted: usize,
        stale: usize,
    },
    /// A drag was abandoned without placing.
    Cancelled,
    Refused {
        error: GridError,
    },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct OutcomeLog {
    entries: Vec<Outcome>,
    /// Outcomes ever pushed, including evicted ones.
    total: u64,
}

impl OutcomeLog {
    /// Record an outcome, evicting the oldest entry when full.
    pub fn push(&mut self, outcome: Outcome) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(outcome);
        self.total += 1;
    }

    pub fn refuse(&mut self, error: GridError) {
        self.push(Outcome::Refused { error });
    }

    /// Return the last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[Outcome] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Entries pushed after [`OutcomeLog::total`] returned `mark`, limited to
    /// what the buffer still holds.
    pub fn since(&self, mark: u64) -> &[Outcome] {
        let pushed = self.total.saturating_sub(mark);
        self.last_n(usize::try_from(pushed).unwrap_or(usize::MAX))
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn last(&self) -> Option<&Outcome> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_last_n() {
        let mut log = OutcomeLog::default();
        log.push(Outcome::Cancelled);
        log.refuse(GridError::CropNotMature);

        assert_eq!(
            log.last_n(1),
            &[Outcome::Refused {
                error: GridError::CropNotMature
            }]
        );
        assert_eq!(log.last_n(10).len(), 2);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = OutcomeLog::default();
        for i in 0..70 {
            log.push(Outcome::Selected {
                tile: Entity::from_raw(i),
            });
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(
            log.last_n(MAX_ENTRIES)[0],
            Outcome::Selected {
                tile: Entity::from_raw(6)
            }
        );
    }

    #[test]
    fn since_returns_only_new_entries() {
        let mut log = OutcomeLog::default();
        log.push(Outcome::Cancelled);
        let mark = log.total();
        log.refuse(GridError::CropNotMature);
        assert_eq!(log.since(mark).len(), 1);
        assert!(log.since(log.total()).is_empty());
    }

    #[test]
    fn serializes_with_outcome_tag() {
        let json = serde_json::to_value(Outcome::Replayed {
            tiles: 3,
            evicted: 0,
            stale: 1,
        })
        .unwrap();
        assert_eq!(json["outcome"], "replayed");
        assert_eq!(json["stale"], 1);
    }
}
