/// Outcome of a selection decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Serve the curated item at this position
    Curated(usize),
    /// Build the item from templates. Carries the item's position among the
    /// generated items of its stream, which keys the template content.
    Generated(u64),
}

/// Strategy deciding which content serves a given index.
/// Implementations must be pure functions of their inputs so that
/// navigating back to an index shows the same exercise.
pub trait SelectionPolicy {
    fn select(&self, index: u64, curated_count: usize) -> Selection;
}

/// Curated items first, in order; afterwards every `period`-th item replays
/// curated content cyclically and the rest are generated.
///
/// Generated items are numbered consecutively, skipping the replay slots, so
/// template buckets whose variant count shares a factor with `period` still
/// rotate through every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicReplay {
    pub period: u64,
}

impl Default for CyclicReplay {
    fn default() -> Self {
        Self { period: 3 }
    }
}

impl SelectionPolicy for CyclicReplay {
    fn select(&self, index: u64, curated_count: usize) -> Selection {
        let count = curated_count as u64;
        if index < count {
            return Selection::Curated(index as usize);
        }
        if count == 0 {
            return Selection::Generated(index);
        }

        let adjusted = index - count;
        // A period of 0 or 1 replays curated content for the whole tail
        if self.period <= 1 || adjusted % self.period == 0 {
            Selection::Curated((adjusted % count) as usize)
        } else {
            Selection::Generated(adjusted - adjusted / self.period - 1)
        }
    }
}

/// Cycles through the curated bank forever; generates only when it is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CuratedOnly;

impl SelectionPolicy for CuratedOnly {
    fn select(&self, index: u64, curated_count: usize) -> Selection {
        if curated_count == 0 {
            Selection::Generated(index)
        } else {
            Selection::Curated((index % curated_count as u64) as usize)
        }
    }
}
