//! Value histories.
//!
//! A history is an append-only sequence of `(tick, value)` samples for one
//! wire. Samples are backed by a persistent vector, so cloning a history for a
//! renderer is O(1) and never copies samples.

use std::cmp::Ordering;

use wiretrace_foundation::{BitVector, Tick};

// =============================================================================
// Sample
// =============================================================================

/// One recorded value of a wire.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// The tick at which the value settled.
    pub tick: Tick,
    /// The value.
    pub value: BitVector,
}

impl Sample {
    /// Creates a sample.
    #[must_use]
    pub fn new(tick: Tick, value: BitVector) -> Self {
        Self { tick, value }
    }
}

// =============================================================================
// History Sink
// =============================================================================

/// Append-only destination for samples.
///
/// A sink does not check tick order; its writer guarantees ticks never
/// decrease.
pub trait HistorySink {
    /// Appends one sample.
    fn push(&mut self, tick: Tick, value: BitVector);

    /// Returns every sample pushed so far, in insertion order. Each call
    /// starts a fresh pass.
    fn samples(&self) -> impl Iterator<Item = &Sample>;
}

// =============================================================================
// Value History
// =============================================================================

/// The recorded history of one wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueHistory {
    bits: usize,
    samples: im::Vector<Sample>,
}

impl ValueHistory {
    /// Creates an empty history for a `bits`-wide wire.
    #[must_use]
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            samples: im::Vector::new(),
        }
    }

    /// Creates a history holding one initial sample.
    #[must_use]
    pub fn seeded(bits: usize, tick: Tick, value: BitVector) -> Self {
        let mut history = Self::new(bits);
        history.push(tick, value);
        history
    }

    /// Returns the wire width this history was created for.
    #[must_use]
    pub const fn bits(&self) -> usize {
        self.bits
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the sample at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Returns the oldest sample.
    #[must_use]
    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Returns the newest sample.
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Returns the tick of the newest sample.
    #[must_use]
    pub fn last_tick(&self) -> Option<Tick> {
        self.last().map(|s| s.tick)
    }

    /// Returns an iterator over samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Returns the value in force at `tick`: the newest sample at or before
    /// it. Within a tick the last re-evaluation wins.
    #[must_use]
    pub fn value_at(&self, tick: Tick) -> Option<&BitVector> {
        let count = self.count_up_to(tick);
        count
            .checked_sub(1)
            .and_then(|index| self.samples.get(index))
            .map(|s| &s.value)
    }

    /// Returns the samples a renderer needs for `[start, end]`: the sample in
    /// force at `start` (if any) followed by every sample inside the range.
    pub fn window(&self, start: Tick, end: Tick) -> impl Iterator<Item = &Sample> {
        let first = self.count_up_to(start).saturating_sub(1);
        let last = if end < start { first } else { self.count_up_to(end) };
        self.samples
            .iter()
            .skip(first)
            .take(last.saturating_sub(first))
    }

    /// Number of samples with a tick at or before `tick`.
    fn count_up_to(&self, tick: Tick) -> usize {
        // Ticks are non-decreasing, so this is a partition point.
        let probe = |s: &Sample| {
            if s.tick <= tick {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        };
        match self.samples.binary_search_by(probe) {
            Ok(index) | Err(index) => index,
        }
    }
}

impl HistorySink for ValueHistory {
    fn push(&mut self, tick: Tick, value: BitVector) {
        self.samples.push_back(Sample::new(tick, value));
    }

    fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a ValueHistory {
    type Item = &'a Sample;
    type IntoIter = im::vector::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
